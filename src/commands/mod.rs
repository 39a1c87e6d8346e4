use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use crate::{
    matchers::{MatcherName, Matchers, Verdict},
    package::Manifest,
    runtime::Runtime,
};

/// One assertion requested from the command line
#[derive(Debug, Clone, PartialEq)]
pub enum Assertion {
    DependOn {
        dir: PathBuf,
        package: String,
        range: Option<String>,
    },
    DevDependOn {
        dir: PathBuf,
        package: String,
        range: Option<String>,
    },
    BinaryLink {
        dir: PathBuf,
        names: Vec<String>,
    },
}

impl Assertion {
    pub fn matcher_name(&self) -> MatcherName {
        match self {
            Assertion::DependOn { .. } => MatcherName::ToDependOn,
            Assertion::DevDependOn { .. } => MatcherName::ToDevDependOn,
            Assertion::BinaryLink { .. } => MatcherName::ToBinaryLink,
        }
    }
}

/// How a verdict is reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReportOptions {
    /// Invert the assertion
    pub negate: bool,
    /// Print the verdict as JSON instead of its message
    pub json: bool,
}

/// Evaluate an assertion against packages on disk
#[tracing::instrument(skip(matchers))]
pub fn evaluate<R: Runtime>(matchers: &Matchers<R>, assertion: &Assertion) -> Result<Verdict> {
    let name = assertion.matcher_name();
    info!("Evaluating {} on {}", name, matchers.platform());

    match assertion {
        Assertion::DependOn {
            dir,
            package,
            range,
        } => {
            let manifest = Manifest::load(matchers.runtime(), dir)?;
            Ok(matchers.to_depend_on(&manifest, package, range.as_deref()))
        }
        Assertion::DevDependOn {
            dir,
            package,
            range,
        } => {
            let manifest = Manifest::load(matchers.runtime(), dir)?;
            Ok(matchers.to_dev_depend_on(&manifest, package, range.as_deref()))
        }
        Assertion::BinaryLink { dir, names } => {
            matchers.to_binary_link(dir.as_path(), names.clone())
        }
    }
}

/// Apply negation and render the verdict.
/// Returns the text to print and whether the assertion holds.
pub fn report(verdict: Verdict, options: ReportOptions) -> Result<(String, bool)> {
    let verdict = if options.negate {
        verdict.negate()
    } else {
        verdict
    };
    let output = if options.json {
        serde_json::to_string_pretty(&verdict).context("Failed to serialize verdict")?
    } else {
        verdict.message.clone()
    };
    Ok((output, verdict.pass))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::Platform;
    use crate::runtime::MockRuntime;
    use crate::test_utils::test_package_dir;
    use mockall::predicate::eq;

    fn matchers_with_manifest(json: &'static str) -> Matchers<MockRuntime> {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_read_to_string()
            .with(eq(test_package_dir().join("package.json")))
            .returning(move |_| Ok(json.to_string()));
        Matchers::with_platform(runtime, Platform::Unix)
    }

    #[test]
    fn test_assertion_matcher_names() {
        let dir = test_package_dir();
        let depend = Assertion::DependOn {
            dir: dir.clone(),
            package: "a".into(),
            range: None,
        };
        let dev = Assertion::DevDependOn {
            dir: dir.clone(),
            package: "a".into(),
            range: None,
        };
        let link = Assertion::BinaryLink {
            dir,
            names: vec![],
        };
        assert_eq!(depend.matcher_name(), MatcherName::ToDependOn);
        assert_eq!(dev.matcher_name(), MatcherName::ToDevDependOn);
        assert_eq!(link.matcher_name(), MatcherName::ToBinaryLink);
    }

    #[test_log::test]
    fn test_evaluate_depend_on() {
        let matchers = matchers_with_manifest(
            r#"{ "name": "pkg-1", "dependencies": { "a": "^1.0.0" } }"#,
        );
        let verdict = evaluate(
            &matchers,
            &Assertion::DependOn {
                dir: test_package_dir(),
                package: "a".into(),
                range: Some("1.2.0".into()),
            },
        )
        .unwrap();
        assert!(verdict.pass);
        assert_eq!(verdict.message, "expected pkg-1 to depend on a@1.2.0");
    }

    #[test]
    fn test_evaluate_dev_depend_on() {
        let matchers = matchers_with_manifest(
            r#"{ "name": "pkg-1", "dependencies": { "a": "^1.0.0" } }"#,
        );
        let verdict = evaluate(
            &matchers,
            &Assertion::DevDependOn {
                dir: test_package_dir(),
                package: "a".into(),
                range: None,
            },
        )
        .unwrap();
        assert!(!verdict.pass);
        assert!(verdict.message.contains("no devDependencies specified"));
    }

    #[test]
    fn test_evaluate_binary_link() {
        let dir = test_package_dir();
        let mut runtime = MockRuntime::new();
        runtime
            .expect_read_to_string()
            .returning(|_| Ok(r#"{ "name": "pkg-1" }"#.into()));
        runtime
            .expect_read_dir_names()
            .with(eq(dir.join("node_modules").join(".bin")))
            .returning(|_| Ok(vec!["foo".into(), "stray".into()]));
        let matchers = Matchers::with_platform(runtime, Platform::Unix);

        let verdict = evaluate(
            &matchers,
            &Assertion::BinaryLink {
                dir,
                names: vec!["foo".into()],
            },
        )
        .unwrap();
        assert!(!verdict.pass);
        assert_eq!(
            verdict.message,
            "expected pkg-1 to link to foo superfluous: stray"
        );
    }

    #[test]
    fn test_evaluate_missing_manifest_is_an_error() {
        let mut runtime = MockRuntime::new();
        runtime.expect_read_to_string().returning(|_| {
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "not found").into())
        });
        let matchers = Matchers::with_platform(runtime, Platform::Unix);

        let result = evaluate(
            &matchers,
            &Assertion::DependOn {
                dir: test_package_dir(),
                package: "a".into(),
                range: None,
            },
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_report_plain() {
        let (output, ok) = report(Verdict::fail("expected x"), ReportOptions::default()).unwrap();
        assert_eq!(output, "expected x");
        assert!(!ok);
    }

    #[test]
    fn test_report_negated() {
        let options = ReportOptions {
            negate: true,
            json: false,
        };
        let (_, ok) = report(Verdict::fail("expected x"), options).unwrap();
        assert!(ok);
        let (_, ok) = report(Verdict::pass("expected x"), options).unwrap();
        assert!(!ok);
    }

    #[test]
    fn test_report_json() {
        let options = ReportOptions {
            negate: false,
            json: true,
        };
        let (output, ok) = report(Verdict::pass("expected x"), options).unwrap();
        assert!(ok);
        let parsed: Verdict = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed, Verdict::pass("expected x"));
    }
}
