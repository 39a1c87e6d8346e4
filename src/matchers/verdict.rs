use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of one assertion: whether it passed and a message describing it.
///
/// The message reads as the expectation, so it serves both the plain and the
/// negated form of an assertion.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub message: String,
    pub pass: bool,
}

impl Verdict {
    pub fn pass(message: impl Into<String>) -> Self {
        Verdict {
            message: message.into(),
            pass: true,
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Verdict {
            message: message.into(),
            pass: false,
        }
    }

    /// Flip the outcome, keeping the message
    pub fn negate(self) -> Self {
        Verdict {
            message: self.message,
            pass: !self.pass,
        }
    }

    /// Panic with the message unless the verdict passed
    #[track_caller]
    pub fn assert(&self) {
        if !self.pass {
            panic!("{}", self.message);
        }
    }

    /// Panic with the message if the verdict passed
    #[track_caller]
    pub fn assert_not(&self) {
        if self.pass {
            panic!("not {}", self.message);
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.pass { "PASS" } else { "FAIL" };
        write!(f, "{}: {}", status, self.message)
    }
}
