//! Package metadata
//!
//! This module reads `package.json` manifests, pairs them with the directory
//! they were found in, and compares npm version ranges.

mod descriptor;
mod manifest;
mod version;

pub use descriptor::{Package, PackageRef};
pub use manifest::{DependencyKind, DependencyMap, MANIFEST_FILE, Manifest};
pub use version::{VersionRange, ranges_intersect};
