//! npm version ranges.
//!
//! A range is a `||`-separated union of comparator sets. Every comparator set
//! is reduced to a lower and an upper bound. Prerelease versions only match a
//! comparator set that names a prerelease of the same `major.minor.patch`,
//! so each set also remembers which tuples it opened up that way.

use anyhow::{Context, Result, bail};
use semver::{Prerelease, Version};
use std::cmp::Ordering;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Bound {
    version: Version,
    inclusive: bool,
}

impl Bound {
    fn inclusive(version: Version) -> Self {
        Bound {
            version,
            inclusive: true,
        }
    }

    fn exclusive(version: Version) -> Self {
        Bound {
            version,
            inclusive: false,
        }
    }
}

/// Versions between two bounds. A missing bound is unbounded on that side.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct Interval {
    lower: Option<Bound>,
    upper: Option<Bound>,
}

impl Interval {
    fn any() -> Self {
        Interval::default()
    }

    /// `<0.0.0-0`, which nothing satisfies
    fn none() -> Self {
        Interval {
            lower: None,
            upper: Some(Bound::exclusive(floor())),
        }
    }

    fn at_least(version: Version) -> Self {
        Interval {
            lower: Some(Bound::inclusive(version)),
            upper: None,
        }
    }

    fn between(lower: Version, upper: Version) -> Self {
        Interval {
            lower: Some(Bound::inclusive(lower)),
            upper: Some(Bound::exclusive(upper)),
        }
    }

    fn narrow(self, other: Interval) -> Interval {
        Interval {
            lower: tighter_lower(self.lower, other.lower),
            upper: tighter_upper(self.upper, other.upper),
        }
    }

    fn is_empty(&self) -> bool {
        let lower = self
            .lower
            .clone()
            .unwrap_or_else(|| Bound::inclusive(floor()));
        let Some(upper) = &self.upper else {
            return false;
        };
        match lower.version.cmp(&upper.version) {
            Ordering::Less => false,
            Ordering::Equal => !(lower.inclusive && upper.inclusive),
            Ordering::Greater => true,
        }
    }

    /// Lowest release version (no prerelease tag) above the lower bound
    fn first_release(&self) -> Version {
        match &self.lower {
            None => Version::new(0, 0, 0),
            Some(b) if !b.version.pre.is_empty() => {
                Version::new(b.version.major, b.version.minor, b.version.patch)
            }
            Some(b) if b.inclusive => b.version.clone(),
            Some(b) => Version::new(b.version.major, b.version.minor, b.version.patch + 1),
        }
    }

    fn contains(&self, version: &Version) -> bool {
        let above = match &self.lower {
            Some(b) if b.inclusive => version >= &b.version,
            Some(b) => version > &b.version,
            None => true,
        };
        let below = match &self.upper {
            Some(b) if b.inclusive => version <= &b.version,
            Some(b) => version < &b.version,
            None => true,
        };
        above && below
    }
}

fn tighter_lower(a: Option<Bound>, b: Option<Bound>) -> Option<Bound> {
    match (a, b) {
        (Some(a), Some(b)) => Some(match a.version.cmp(&b.version) {
            Ordering::Greater => a,
            Ordering::Less => b,
            Ordering::Equal if !a.inclusive => a,
            Ordering::Equal => b,
        }),
        (bound, None) | (None, bound) => bound,
    }
}

fn tighter_upper(a: Option<Bound>, b: Option<Bound>) -> Option<Bound> {
    match (a, b) {
        (Some(a), Some(b)) => Some(match a.version.cmp(&b.version) {
            Ordering::Less => a,
            Ordering::Greater => b,
            Ordering::Equal if !a.inclusive => a,
            Ordering::Equal => b,
        }),
        (bound, None) | (None, bound) => bound,
    }
}

/// The lowest version there is: `0.0.0-0`
fn floor() -> Version {
    prerelease_zero(0, 0, 0)
}

/// `major.minor.patch-0`, the first prerelease of a version
fn prerelease_zero(major: u64, minor: u64, patch: u64) -> Version {
    let mut version = Version::new(major, minor, patch);
    version.pre = Prerelease::new("0").unwrap_or(Prerelease::EMPTY);
    version
}

/// Largest version component npm accepts (`Number.MAX_SAFE_INTEGER`).
/// Keeps every `component + 1` below in range.
const MAX_COMPONENT: u64 = 9_007_199_254_740_991;

/// A possibly incomplete version such as `1`, `1.2`, `1.x` or `1.2.3-beta.1`
#[derive(Debug, Clone, PartialEq, Eq)]
enum Partial {
    Any,
    Major(u64),
    Minor(u64, u64),
    Full(Version),
}

impl Partial {
    fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        let input = input.strip_prefix('=').unwrap_or(input).trim_start();
        let input = input
            .strip_prefix('v')
            .or_else(|| input.strip_prefix('V'))
            .unwrap_or(input);
        // Build metadata never affects matching
        let input = input.split_once('+').map_or(input, |(core, _)| core);
        let (core, pre) = match input.split_once('-') {
            Some((core, pre)) => (core, Some(pre)),
            None => (input, None),
        };

        let mut numbers = Vec::with_capacity(3);
        if !core.is_empty() {
            for part in core.split('.') {
                if matches!(part, "x" | "X" | "*") {
                    break;
                }
                let number = part
                    .parse::<u64>()
                    .with_context(|| format!("Invalid version component '{}'", part))?;
                if number > MAX_COMPONENT {
                    bail!("Version component '{}' is too large", part);
                }
                numbers.push(number);
            }
            if core.split('.').count() > 3 {
                bail!("Too many version components in '{}'", core);
            }
        }

        let partial = match numbers[..] {
            [] => Partial::Any,
            [major] => Partial::Major(major),
            [major, minor] => Partial::Minor(major, minor),
            [major, minor, patch] => {
                let mut version = Version::new(major, minor, patch);
                if let Some(pre) = pre {
                    version.pre = Prerelease::new(pre)
                        .with_context(|| format!("Invalid prerelease '{}'", pre))?;
                }
                return Ok(Partial::Full(version));
            }
            _ => bail!("Too many version components in '{}'", core),
        };

        if pre.is_some() {
            bail!("Prerelease tag requires a full version: '{}'", input);
        }
        Ok(partial)
    }

    /// `major.minor.patch` of a version carrying a prerelease tag
    fn prerelease_tuple(&self) -> Option<(u64, u64, u64)> {
        match self {
            Partial::Full(v) if !v.pre.is_empty() => Some((v.major, v.minor, v.patch)),
            _ => None,
        }
    }

    /// First version the partial stands for
    fn floor(&self) -> Option<Version> {
        match self {
            Partial::Any => None,
            Partial::Major(major) => Some(Version::new(*major, 0, 0)),
            Partial::Minor(major, minor) => Some(Version::new(*major, *minor, 0)),
            Partial::Full(version) => Some(version.clone()),
        }
    }

    /// First version past everything the partial stands for (exclusive).
    /// `None` for a full version or a wildcard.
    fn ceiling(&self) -> Option<Version> {
        match self {
            Partial::Major(major) => Some(prerelease_zero(major + 1, 0, 0)),
            Partial::Minor(major, minor) => Some(prerelease_zero(*major, minor + 1, 0)),
            Partial::Any | Partial::Full(_) => None,
        }
    }

    /// `=X` / bare `X`: the versions the partial stands for
    fn exact(&self) -> Interval {
        match (self, self.floor(), self.ceiling()) {
            (Partial::Full(version), _, _) => Interval {
                lower: Some(Bound::inclusive(version.clone())),
                upper: Some(Bound::inclusive(version.clone())),
            },
            (_, Some(floor), Some(ceiling)) => Interval::between(floor, ceiling),
            _ => Interval::any(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operator {
    Exact,
    Gt,
    Gte,
    Lt,
    Lte,
    Tilde,
    Caret,
}

impl Operator {
    /// Split a leading operator off a comparator
    fn split(comparator: &str) -> (Operator, &str) {
        const PREFIXES: [(&str, Operator); 8] = [
            (">=", Operator::Gte),
            ("<=", Operator::Lte),
            ("~>", Operator::Tilde),
            (">", Operator::Gt),
            ("<", Operator::Lt),
            ("~", Operator::Tilde),
            ("^", Operator::Caret),
            ("=", Operator::Exact),
        ];
        PREFIXES
            .iter()
            .find_map(|(prefix, op)| comparator.strip_prefix(prefix).map(|rest| (*op, rest)))
            .unwrap_or((Operator::Exact, comparator))
    }

    fn is_bare(token: &str) -> bool {
        matches!(token, ">=" | "<=" | "~>" | ">" | "<" | "~" | "^" | "=")
    }

    fn apply(self, partial: &Partial) -> Interval {
        use Operator::*;

        match (self, partial) {
            (Exact, p) => p.exact(),

            (Gt, Partial::Any) | (Lt, Partial::Any) => Interval::none(),
            (Gte | Lte | Tilde | Caret, Partial::Any) => Interval::any(),

            (Gt, Partial::Full(v)) => Interval {
                lower: Some(Bound::exclusive(v.clone())),
                upper: None,
            },
            (Gt, Partial::Major(major)) => Interval::at_least(Version::new(major + 1, 0, 0)),
            (Gt, Partial::Minor(major, minor)) => {
                Interval::at_least(Version::new(*major, minor + 1, 0))
            }

            (Gte, p) => p.floor().map_or_else(Interval::any, Interval::at_least),

            (Lt, p) => {
                let upper = match p {
                    Partial::Full(v) => v.clone(),
                    Partial::Major(major) => prerelease_zero(*major, 0, 0),
                    Partial::Minor(major, minor) => prerelease_zero(*major, *minor, 0),
                    Partial::Any => floor(),
                };
                Interval {
                    lower: None,
                    upper: Some(Bound::exclusive(upper)),
                }
            }

            (Lte, Partial::Full(v)) => Interval {
                lower: None,
                upper: Some(Bound::inclusive(v.clone())),
            },
            (Lte, p) => Interval {
                lower: None,
                upper: p.ceiling().map(Bound::exclusive),
            },

            (Tilde, Partial::Full(v)) => {
                Interval::between(v.clone(), prerelease_zero(v.major, v.minor + 1, 0))
            }
            (Tilde, p) => p.exact(),

            (Caret, Partial::Full(v)) => {
                let ceiling = if v.major > 0 {
                    prerelease_zero(v.major + 1, 0, 0)
                } else if v.minor > 0 {
                    prerelease_zero(0, v.minor + 1, 0)
                } else {
                    prerelease_zero(0, 0, v.patch + 1)
                };
                Interval::between(v.clone(), ceiling)
            }
            (Caret, Partial::Minor(0, minor)) => {
                Interval::between(Version::new(0, *minor, 0), prerelease_zero(0, minor + 1, 0))
            }
            (Caret, Partial::Minor(major, minor)) => {
                Interval::between(Version::new(*major, *minor, 0), prerelease_zero(major + 1, 0, 0))
            }
            (Caret, p @ Partial::Major(_)) => p.exact(),
        }
    }
}

/// One `||` alternative: the bounds plus the tuples whose prereleases it admits
#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct ComparatorSet {
    interval: Interval,
    prerelease_tuples: Vec<(u64, u64, u64)>,
}

impl ComparatorSet {
    fn intersects(&self, other: &ComparatorSet) -> bool {
        let overlap = self.interval.clone().narrow(other.interval.clone());
        if overlap.is_empty() {
            return false;
        }
        if overlap.contains(&overlap.first_release()) {
            return true;
        }
        self.prerelease_tuples
            .iter()
            .filter(|tuple| other.prerelease_tuples.contains(tuple))
            .any(|&(major, minor, patch)| {
                let prereleases = Interval::between(
                    prerelease_zero(major, minor, patch),
                    Version::new(major, minor, patch),
                );
                !overlap.clone().narrow(prereleases).is_empty()
            })
    }
}

/// A parsed npm version range such as `^1.2.0`, `>=1 <3 || 4.x` or `1.0.0 - 2`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionRange {
    raw: String,
    sets: Vec<ComparatorSet>,
}

impl VersionRange {
    pub fn parse(input: &str) -> Result<Self> {
        let sets = input
            .split("||")
            .map(parse_comparator_set)
            .collect::<Result<Vec<_>>>()
            .with_context(|| format!("Invalid version range '{}'", input.trim()))?;

        Ok(VersionRange {
            raw: input.trim().to_string(),
            sets,
        })
    }

    /// Whether some version satisfies both ranges
    pub fn intersects(&self, other: &VersionRange) -> bool {
        self.sets
            .iter()
            .any(|a| other.sets.iter().any(|b| a.intersects(b)))
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Whether two range strings share at least one version
pub fn ranges_intersect(declared: &str, expected: &str) -> Result<bool> {
    let declared = VersionRange::parse(declared)?;
    let expected = VersionRange::parse(expected)?;
    Ok(declared.intersects(&expected))
}

fn parse_comparator_set(input: &str) -> Result<ComparatorSet> {
    let input = input.trim();

    if let Some((from, to)) = input.split_once(" - ") {
        return parse_hyphen(from, to);
    }

    let mut set = ComparatorSet::default();
    let mut pending: Option<&str> = None;
    for token in input.split_whitespace() {
        // ">= 1.2.3" is the same comparator as ">=1.2.3"
        if Operator::is_bare(token) {
            if pending.is_some() {
                bail!("Dangling operator before '{}'", token);
            }
            pending = Some(token);
            continue;
        }
        let comparator = match pending.take() {
            Some(op) => format!("{}{}", op, token),
            None => token.to_string(),
        };
        let (op, version) = Operator::split(&comparator);
        let partial = Partial::parse(version)?;
        set.prerelease_tuples.extend(partial.prerelease_tuple());
        set.interval = set.interval.narrow(op.apply(&partial));
    }
    if let Some(op) = pending {
        bail!("Operator '{}' is missing a version", op);
    }

    Ok(set)
}

/// `A - B` is `>=A <=B`, with partial versions widened the npm way
fn parse_hyphen(from: &str, to: &str) -> Result<ComparatorSet> {
    let from = Partial::parse(from)?;
    let to = Partial::parse(to)?;

    let upper = match &to {
        Partial::Full(v) => Some(Bound::inclusive(v.clone())),
        other => other.ceiling().map(Bound::exclusive),
    };

    Ok(ComparatorSet {
        interval: Interval {
            lower: from.floor().map(Bound::inclusive),
            upper,
        },
        prerelease_tuples: [from.prerelease_tuple(), to.prerelease_tuple()]
            .into_iter()
            .flatten()
            .collect(),
    })
}
