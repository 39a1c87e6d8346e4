use log::debug;

use super::Verdict;
use crate::package::{DependencyKind, Manifest, ranges_intersect};

/// Checks that a manifest declares a dependency of a fixed kind,
/// optionally within a version range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DependencyMatcher {
    kind: DependencyKind,
}

/// `toDependOn`
pub const DEPEND_ON: DependencyMatcher = DependencyMatcher::new(DependencyKind::Dependencies);

/// `toDevDependOn`
pub const DEV_DEPEND_ON: DependencyMatcher =
    DependencyMatcher::new(DependencyKind::DevDependencies);

impl DependencyMatcher {
    pub const fn new(kind: DependencyKind) -> Self {
        DependencyMatcher { kind }
    }

    pub fn verb(&self) -> &'static str {
        match self.kind {
            DependencyKind::Dependencies => "depend",
            DependencyKind::DevDependencies => "dev-depend",
        }
    }

    /// Evaluate the assertion. Every outcome is a verdict; nothing is raised.
    /// An empty `range` counts as no range.
    #[tracing::instrument(skip(self, manifest), fields(manifest = %manifest.name))]
    pub fn matches(&self, manifest: &Manifest, package_name: &str, range: Option<&str>) -> Verdict {
        let range = range.filter(|r| !r.is_empty());
        let field = self.kind.field_name();
        let expectation = self.expectation(manifest, package_name, range);

        let Some(deps) = manifest.dependencies_of(self.kind) else {
            return Verdict::fail(format!("{} but no {} specified", expectation, field));
        };

        let Some(declared) = deps.range(package_name) else {
            return Verdict::fail(format!(
                "{} but it is missing from .{}\n{}",
                expectation,
                field,
                deps.to_pretty_json()
            ));
        };

        if let Some(range) = range {
            let compatible = ranges_intersect(&declared, range).unwrap_or_else(|e| {
                debug!("Treating {} against {} as incompatible: {:#}", declared, range, e);
                false
            });
            if !compatible {
                return Verdict::fail(format!(
                    "{} but {} does not satisfy {}\n{}",
                    expectation,
                    declared,
                    range,
                    deps.to_pretty_json()
                ));
            }
        }

        Verdict::pass(expectation)
    }

    fn expectation(&self, manifest: &Manifest, package_name: &str, range: Option<&str>) -> String {
        let id = match range {
            Some(range) => format!("{}@{}", package_name, range),
            None => package_name.to_string(),
        };
        format!("expected {} to {} on {}", manifest.name, self.verb(), id)
    }
}
