pub mod commands;
pub mod matchers;
pub mod package;
pub mod platform;
pub mod runtime;

pub use matchers::{ExpectedLinks, MatcherName, Matchers, Verdict};
pub use package::{Manifest, Package, PackageRef};
pub use platform::Platform;
