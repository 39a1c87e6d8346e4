use std::fmt;
use std::str::FromStr;

use anyhow::{Result, bail};

/// Platform family, as far as binary link naming is concerned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Platform {
    /// Windows-style: every link comes with a `.cmd` companion
    Windows,
    #[default]
    Unix,
}

impl Platform {
    /// Detect the current platform from the compile target
    pub fn detect() -> Self {
        #[cfg(windows)]
        {
            Platform::Windows
        }
        #[cfg(not(windows))]
        {
            Platform::Unix
        }
    }

    pub fn is_windows(&self) -> bool {
        matches!(self, Platform::Windows)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Windows => "windows",
            Platform::Unix => "unix",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = anyhow::Error;

    /// Accepts Rust and Node.js spellings (`windows`, `win32`, `linux`, `darwin`, ...)
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "windows" | "win32" | "win" => Ok(Platform::Windows),
            "unix" | "linux" | "macos" | "darwin" | "freebsd" | "openbsd" | "netbsd"
            | "sunos" | "aix" => Ok(Platform::Unix),
            other => bail!("Unknown platform '{}': expected 'windows' or 'unix'", other),
        }
    }
}

/// Trait for platform detection (useful for testing)
pub trait PlatformDetector: Send + Sync {
    fn detect(&self) -> Platform;
}

/// Default platform detector using compile-time detection
pub struct DefaultPlatformDetector;

impl PlatformDetector for DefaultPlatformDetector {
    fn detect(&self) -> Platform {
        Platform::detect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_detect() {
        let platform = Platform::detect();

        #[cfg(windows)]
        assert_eq!(platform, Platform::Windows);

        #[cfg(not(windows))]
        assert_eq!(platform, Platform::Unix);
    }

    #[test]
    fn test_default_platform_detector() {
        let detector = DefaultPlatformDetector;
        assert_eq!(detector.detect(), Platform::detect());
    }

    #[test]
    fn test_platform_from_str() {
        assert_eq!("windows".parse::<Platform>().unwrap(), Platform::Windows);
        assert_eq!("win32".parse::<Platform>().unwrap(), Platform::Windows);
        assert_eq!("Windows".parse::<Platform>().unwrap(), Platform::Windows);
        assert_eq!("linux".parse::<Platform>().unwrap(), Platform::Unix);
        assert_eq!("darwin".parse::<Platform>().unwrap(), Platform::Unix);
        assert_eq!(" unix ".parse::<Platform>().unwrap(), Platform::Unix);
    }

    #[test]
    fn test_platform_from_str_unknown() {
        let err = "plan9".parse::<Platform>().unwrap_err();
        assert!(err.to_string().contains("Unknown platform 'plan9'"));
    }

    #[test]
    fn test_platform_display_round_trips() {
        for platform in [Platform::Windows, Platform::Unix] {
            assert_eq!(platform.to_string().parse::<Platform>().unwrap(), platform);
        }
    }

    #[test]
    fn test_is_windows() {
        assert!(Platform::Windows.is_windows());
        assert!(!Platform::Unix.is_windows());
    }
}
