//! Assertion matchers for package metadata
//!
//! Three matchers are provided, registered under the names a test framework
//! knows them by:
//!
//! - `toDependOn` - the manifest declares a production dependency
//! - `toDevDependOn` - the manifest declares a development dependency
//! - `toBinaryLink` - the package links exactly the given executables
//!
//! Failed assertions are [`Verdict`]s, never errors. Only a broken fixture
//! (missing manifest, missing binary directory) produces an error.

mod binary_link;
mod dependency;
mod verdict;

use anyhow::Result;
use std::fmt;

use crate::package::{Manifest, PackageRef};
use crate::platform::{DefaultPlatformDetector, Platform, PlatformDetector};
use crate::runtime::Runtime;

pub use binary_link::{BinaryLinkMatcher, ExpectedLinks};
pub use dependency::{DEPEND_ON, DEV_DEPEND_ON, DependencyMatcher};
pub use verdict::Verdict;

/// Names under which the matchers are registered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatcherName {
    ToDependOn,
    ToDevDependOn,
    ToBinaryLink,
}

impl MatcherName {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatcherName::ToDependOn => "toDependOn",
            MatcherName::ToDevDependOn => "toDevDependOn",
            MatcherName::ToBinaryLink => "toBinaryLink",
        }
    }
}

impl fmt::Display for MatcherName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The full matcher set, bound to a runtime and a platform.
pub struct Matchers<R: Runtime> {
    runtime: R,
    platform: Platform,
}

impl<R: Runtime> Matchers<R> {
    /// Matchers for the platform this binary was built for
    pub fn new(runtime: R) -> Self {
        Self::with_detector(runtime, &DefaultPlatformDetector)
    }

    pub fn with_platform(runtime: R, platform: Platform) -> Self {
        Matchers { runtime, platform }
    }

    pub fn with_detector(runtime: R, detector: &dyn PlatformDetector) -> Self {
        Self::with_platform(runtime, detector.detect())
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn runtime(&self) -> &R {
        &self.runtime
    }

    /// `toDependOn`
    pub fn to_depend_on(&self, manifest: &Manifest, package: &str, range: Option<&str>) -> Verdict {
        DEPEND_ON.matches(manifest, package, range)
    }

    /// `toDevDependOn`
    pub fn to_dev_depend_on(
        &self,
        manifest: &Manifest,
        package: &str,
        range: Option<&str>,
    ) -> Verdict {
        DEV_DEPEND_ON.matches(manifest, package, range)
    }

    /// `toBinaryLink`
    pub fn to_binary_link(
        &self,
        package: impl Into<PackageRef>,
        expected: impl Into<ExpectedLinks>,
    ) -> Result<Verdict> {
        BinaryLinkMatcher::new(&self.runtime, self.platform).matches(package, expected)
    }
}
