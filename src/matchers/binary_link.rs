use anyhow::Result;
use log::debug;

use super::Verdict;
use crate::package::PackageRef;
use crate::platform::{Platform, expand};
use crate::runtime::Runtime;

/// Executable names a package is expected to link, in the order given.
/// An empty list expects a binary directory with no entries at all.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExpectedLinks(Vec<String>);

impl ExpectedLinks {
    pub fn names(&self) -> &[String] {
        &self.0
    }
}

impl From<&str> for ExpectedLinks {
    fn from(name: &str) -> Self {
        ExpectedLinks(vec![name.to_string()])
    }
}

impl From<String> for ExpectedLinks {
    fn from(name: String) -> Self {
        ExpectedLinks(vec![name])
    }
}

impl From<Vec<String>> for ExpectedLinks {
    fn from(names: Vec<String>) -> Self {
        ExpectedLinks(names)
    }
}

impl From<Vec<&str>> for ExpectedLinks {
    fn from(names: Vec<&str>) -> Self {
        names.as_slice().into()
    }
}

impl From<&[&str]> for ExpectedLinks {
    fn from(names: &[&str]) -> Self {
        ExpectedLinks(names.iter().map(|n| n.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for ExpectedLinks {
    fn from(names: [&str; N]) -> Self {
        names.as_slice().into()
    }
}

/// Checks that a package's binary directory holds exactly the expected links.
pub struct BinaryLinkMatcher<'a, R: Runtime> {
    runtime: &'a R,
    platform: Platform,
}

impl<'a, R: Runtime> BinaryLinkMatcher<'a, R> {
    pub fn new(runtime: &'a R, platform: Platform) -> Self {
        BinaryLinkMatcher { runtime, platform }
    }

    /// Evaluate the assertion.
    ///
    /// A missing manifest or binary directory is an error, not a failed verdict.
    #[tracing::instrument(skip(self, package, expected))]
    pub fn matches(
        &self,
        package: impl Into<PackageRef>,
        expected: impl Into<ExpectedLinks>,
    ) -> Result<Verdict> {
        let package = package.into().resolve(self.runtime)?;
        let links = expand(expected.into().names(), self.platform);
        let expectation = format!("expected {} to link to {}", package.name(), links.join(", "));

        let bin_location = package.bin_location();
        let mut found = self.runtime.read_dir_names(&bin_location)?;
        found.sort();
        debug!(
            "Found {} entries in {}: {:?}",
            found.len(),
            bin_location.display(),
            found
        );

        let missing: Vec<&str> = links
            .iter()
            .filter(|link| !found.contains(*link))
            .map(String::as_str)
            .collect();
        let superfluous: Vec<&str> = found
            .iter()
            .filter(|entry| !links.contains(*entry))
            .map(String::as_str)
            .collect();

        if missing.is_empty() && superfluous.is_empty() {
            return Ok(Verdict::pass(expectation));
        }

        let mut parts = vec![expectation];
        if !missing.is_empty() {
            parts.push(format!("missing: {}", missing.join(", ")));
        }
        if !superfluous.is_empty() {
            parts.push(format!("superfluous: {}", superfluous.join(", ")));
        }
        Ok(Verdict::fail(parts.join(" ")))
    }
}
