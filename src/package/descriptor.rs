use anyhow::Result;
use log::debug;
use std::path::{Path, PathBuf};

use super::Manifest;
use crate::runtime::Runtime;

/// A package on disk: its manifest paired with the directory it lives in.
#[derive(Debug, Clone, PartialEq)]
pub struct Package {
    manifest: Manifest,
    location: PathBuf,
}

impl Package {
    pub fn new(manifest: Manifest, location: impl Into<PathBuf>) -> Self {
        Package {
            manifest,
            location: location.into(),
        }
    }

    /// Read the manifest in `location` and pair it with that directory.
    #[tracing::instrument(skip(runtime))]
    pub fn load<R: Runtime>(runtime: &R, location: &Path) -> Result<Self> {
        let manifest = Manifest::load(runtime, location)?;
        Ok(Self::new(manifest, location))
    }

    pub fn name(&self) -> &str {
        &self.manifest.name
    }

    pub fn version(&self) -> Option<&str> {
        self.manifest.version.as_deref()
    }

    pub fn is_private(&self) -> bool {
        self.manifest.private
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn location(&self) -> &Path {
        &self.location
    }

    pub fn node_modules_location(&self) -> PathBuf {
        self.location.join("node_modules")
    }

    /// Directory into which the package's executables are linked
    pub fn bin_location(&self) -> PathBuf {
        self.node_modules_location().join(".bin")
    }
}

/// Something that names a package: either a descriptor already in hand,
/// or a directory whose manifest still has to be read.
#[derive(Debug, Clone, PartialEq)]
pub enum PackageRef {
    Direct(Package),
    Location(PathBuf),
}

impl PackageRef {
    /// Turn the reference into a descriptor. `Direct` is used as-is.
    pub fn resolve<R: Runtime>(self, runtime: &R) -> Result<Package> {
        match self {
            PackageRef::Direct(package) => Ok(package),
            PackageRef::Location(dir) => {
                debug!("Resolving package from {}", dir.display());
                Package::load(runtime, &dir)
            }
        }
    }
}

impl From<Package> for PackageRef {
    fn from(package: Package) -> Self {
        PackageRef::Direct(package)
    }
}

impl From<&Package> for PackageRef {
    fn from(package: &Package) -> Self {
        PackageRef::Direct(package.clone())
    }
}

impl From<PathBuf> for PackageRef {
    fn from(dir: PathBuf) -> Self {
        PackageRef::Location(dir)
    }
}

impl From<&Path> for PackageRef {
    fn from(dir: &Path) -> Self {
        PackageRef::Location(dir.to_path_buf())
    }
}

impl From<&PathBuf> for PackageRef {
    fn from(dir: &PathBuf) -> Self {
        PackageRef::Location(dir.clone())
    }
}

impl From<&str> for PackageRef {
    fn from(dir: &str) -> Self {
        PackageRef::Location(PathBuf::from(dir))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::MockRuntime;
    use crate::test_utils::test_package_dir;
    use mockall::predicate::eq;

    #[test]
    fn test_package_locations() {
        let dir = test_package_dir();
        let package = Package::new(Manifest::new("pkg-1"), &dir);

        assert_eq!(package.name(), "pkg-1");
        assert_eq!(package.location(), dir.as_path());
        assert_eq!(package.node_modules_location(), dir.join("node_modules"));
        assert_eq!(
            package.bin_location(),
            dir.join("node_modules").join(".bin")
        );
    }

    #[test]
    fn test_package_load_reads_manifest_once() {
        let mut runtime = MockRuntime::new();
        let dir = test_package_dir();

        runtime
            .expect_read_to_string()
            .with(eq(dir.join("package.json")))
            .times(1)
            .returning(|_| {
                Ok(r#"{ "name": "pkg-1", "version": "1.0.0", "private": true }"#.into())
            });

        let package = Package::load(&runtime, &dir).unwrap();
        assert_eq!(package.name(), "pkg-1");
        assert_eq!(package.version(), Some("1.0.0"));
        assert!(package.is_private());
        assert_eq!(package.manifest().name, "pkg-1");
    }

    #[test]
    fn test_resolve_direct_does_not_touch_runtime() {
        // No expectations: any runtime call would panic
        let runtime = MockRuntime::new();
        let package = Package::new(Manifest::new("direct"), test_package_dir());

        let resolved = PackageRef::from(&package).resolve(&runtime).unwrap();
        assert_eq!(resolved, package);
    }

    #[test]
    fn test_resolve_location_reads_manifest() {
        let mut runtime = MockRuntime::new();
        let dir = test_package_dir();

        runtime
            .expect_read_to_string()
            .with(eq(dir.join("package.json")))
            .returning(|_| Ok(r#"{ "name": "from-disk" }"#.into()));

        let resolved = PackageRef::from(dir.as_path()).resolve(&runtime).unwrap();
        assert_eq!(resolved.name(), "from-disk");
        assert_eq!(resolved.location(), dir.as_path());
    }

    #[test]
    fn test_resolve_location_without_manifest_fails() {
        let mut runtime = MockRuntime::new();
        runtime.expect_read_to_string().returning(|_| {
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "not found").into())
        });

        let result = PackageRef::from(test_package_dir()).resolve(&runtime);
        assert!(result.is_err());
    }

    #[test]
    fn test_package_ref_conversions() {
        let dir = test_package_dir();
        assert_eq!(
            PackageRef::from(dir.clone()),
            PackageRef::Location(dir.clone())
        );
        assert_eq!(PackageRef::from(&dir), PackageRef::Location(dir.clone()));
        assert_eq!(
            PackageRef::from("packages/a"),
            PackageRef::Location(PathBuf::from("packages/a"))
        );

        let package = Package::new(Manifest::new("p"), &dir);
        assert!(matches!(PackageRef::from(package), PackageRef::Direct(_)));
    }
}
