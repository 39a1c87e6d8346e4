//! Platform detection and executable-name conventions
//!
//! This module detects whether the current platform is Windows-style and
//! expands expected executable names with the `.cmd` shims npm installs
//! next to every binary link on Windows.

mod detection;
mod shims;

pub use detection::{DefaultPlatformDetector, Platform, PlatformDetector};
pub use shims::expand;
