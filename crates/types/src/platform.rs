use downlink_errors::{Error, PlatformError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::compat::Requirements;

/// Canonical platform identifier.
///
/// `Desktop` is a request-time meta-platform: it is resolved to one of the
/// concrete desktop members before a token is minted, and appears on the
/// wire only as an alias claim meaning "any desktop route".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Ios,
    Android,
    Windows,
    Mac,
    Linux,
    Web,
    Desktop,
    Generic,
}

impl Platform {
    /// All members, in registry order.
    pub const ALL: [Platform; 8] = [
        Platform::Ios,
        Platform::Android,
        Platform::Windows,
        Platform::Mac,
        Platform::Linux,
        Platform::Web,
        Platform::Desktop,
        Platform::Generic,
    ];

    /// Lowercase wire identifier, stable across token payloads and routes.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Ios => "ios",
            Platform::Android => "android",
            Platform::Windows => "windows",
            Platform::Mac => "mac",
            Platform::Linux => "linux",
            Platform::Web => "web",
            Platform::Desktop => "desktop",
            Platform::Generic => "generic",
        }
    }

    /// True for the meta-platform that must be resolved before issuance.
    #[must_use]
    pub fn is_meta(&self) -> bool {
        matches!(self, Platform::Desktop)
    }

    /// True for the concrete members a `desktop` claim may stand in for.
    #[must_use]
    pub fn is_desktop_family(&self) -> bool {
        matches!(
            self,
            Platform::Windows | Platform::Mac | Platform::Linux | Platform::Generic
        )
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ios" => Ok(Platform::Ios),
            "android" => Ok(Platform::Android),
            "windows" | "win" => Ok(Platform::Windows),
            "mac" | "macos" | "osx" => Ok(Platform::Mac),
            "linux" => Ok(Platform::Linux),
            "web" => Ok(Platform::Web),
            "desktop" => Ok(Platform::Desktop),
            "generic" => Ok(Platform::Generic),
            other => Err(PlatformError::Unrecognized {
                value: other.to_string(),
            }
            .into()),
        }
    }
}

/// Static distribution metadata for one platform.
///
/// A platform is either self-hosted (`file_name` set, served from our
/// storage) or store-redirected (`store_url` set), never both.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformConfig {
    pub display_name: String,
    /// Artifact name on durable storage; `None` for store-redirected platforms.
    pub file_name: Option<String>,
    /// External destination; `None` for self-hosted platforms.
    pub store_url: Option<String>,
    #[serde(default)]
    pub requirements: Requirements,
}

impl PlatformConfig {
    /// True when the artifact is served from this system's storage.
    #[must_use]
    pub fn direct_download(&self) -> bool {
        self.file_name.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_aliases() {
        assert_eq!("macos".parse::<Platform>().unwrap(), Platform::Mac);
        assert_eq!("Windows".parse::<Platform>().unwrap(), Platform::Windows);
        assert_eq!(" android ".parse::<Platform>().unwrap(), Platform::Android);
    }

    #[test]
    fn parse_rejects_unknown() {
        assert!("amiga".parse::<Platform>().is_err());
        assert!("".parse::<Platform>().is_err());
    }

    #[test]
    fn wire_name_round_trips() {
        for platform in Platform::ALL {
            assert_eq!(platform.as_str().parse::<Platform>().unwrap(), platform);
        }
    }

    #[test]
    fn desktop_family_membership() {
        assert!(Platform::Windows.is_desktop_family());
        assert!(Platform::Generic.is_desktop_family());
        assert!(!Platform::Ios.is_desktop_family());
        assert!(!Platform::Desktop.is_desktop_family());
        assert!(Platform::Desktop.is_meta());
    }
}
