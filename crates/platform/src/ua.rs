//! User-agent signal extraction
//!
//! The matching rules here are deliberately simple, case-sensitive substring
//! checks on the conventional tokens found in standard user-agent strings.
//! They feed the resolver and the compatibility validator; they are never a
//! security decision.

use downlink_types::BrowserFamily;

/// Operating system families recognizable from a user agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsFamily {
    Windows,
    Mac,
    Linux,
    Android,
    Ios,
}

/// Detected operating system with an optional dotted version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectedOs {
    pub family: OsFamily,
    /// Numeric components, e.g. `[10, 15, 7]` from "Mac OS X 10_15_7".
    pub version: Option<Vec<u32>>,
}

/// Detected browser with an optional major version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectedBrowser {
    pub family: BrowserFamily,
    pub major: Option<u32>,
}

/// Everything we could extract from one user-agent string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientSignals {
    pub os: Option<DetectedOs>,
    pub browser: Option<DetectedBrowser>,
}

impl ClientSignals {
    /// Parse a user-agent string. Never fails; unknown clients produce
    /// empty signals.
    #[must_use]
    pub fn parse(user_agent: &str) -> Self {
        Self {
            os: detect_os(user_agent),
            browser: detect_browser(user_agent),
        }
    }
}

/// Compare dotted versions component-wise, padding the shorter with zeros.
#[must_use]
pub fn version_at_least(actual: &[u32], minimum: &[u32]) -> bool {
    let len = actual.len().max(minimum.len());
    for i in 0..len {
        let a = actual.get(i).copied().unwrap_or(0);
        let m = minimum.get(i).copied().unwrap_or(0);
        if a != m {
            return a > m;
        }
    }
    true
}

/// Parse "10.15.7" or "10_15_7" into numeric components. Empty on no digits.
#[must_use]
pub fn parse_version(s: &str) -> Vec<u32> {
    s.split(|c| c == '.' || c == '_')
        .map_while(|part| part.parse::<u32>().ok())
        .collect()
}

fn version_after<'a>(user_agent: &'a str, marker: &str) -> Option<&'a str> {
    let rest = &user_agent[user_agent.find(marker)? + marker.len()..];
    let end = rest
        .find(|c: char| !c.is_ascii_digit() && c != '.' && c != '_')
        .unwrap_or(rest.len());
    Some(&rest[..end])
}

fn detect_os(user_agent: &str) -> Option<DetectedOs> {
    // iOS before Mac: iPhone/iPad agents also carry "like Mac OS X".
    // Android before Linux: Android agents also carry "Linux".
    if user_agent.contains("iPhone") || user_agent.contains("iPad") {
        let version = version_after(user_agent, "iPhone OS ")
            .or_else(|| version_after(user_agent, "CPU OS "))
            .map(parse_version)
            .filter(|v| !v.is_empty());
        return Some(DetectedOs {
            family: OsFamily::Ios,
            version,
        });
    }
    if user_agent.contains("Android") {
        let version = version_after(user_agent, "Android ")
            .map(parse_version)
            .filter(|v| !v.is_empty());
        return Some(DetectedOs {
            family: OsFamily::Android,
            version,
        });
    }
    if user_agent.contains("Windows") {
        let version = version_after(user_agent, "Windows NT ")
            .map(parse_version)
            .filter(|v| !v.is_empty());
        return Some(DetectedOs {
            family: OsFamily::Windows,
            version,
        });
    }
    if user_agent.contains("Macintosh") || user_agent.contains("Mac OS X") {
        let version = version_after(user_agent, "Mac OS X ")
            .map(parse_version)
            .filter(|v| !v.is_empty());
        return Some(DetectedOs {
            family: OsFamily::Mac,
            version,
        });
    }
    if user_agent.contains("Linux") || user_agent.contains("X11") {
        return Some(DetectedOs {
            family: OsFamily::Linux,
            version: None,
        });
    }
    None
}

fn detect_browser(user_agent: &str) -> Option<DetectedBrowser> {
    // Order matters: Chromium agents carry "Safari/", Edge carries "Chrome/".
    let candidates: [(&str, BrowserFamily); 5] = [
        ("Edg/", BrowserFamily::Edge),
        ("Chrome/", BrowserFamily::Chrome),
        ("CriOS/", BrowserFamily::Chrome),
        ("Firefox/", BrowserFamily::Firefox),
        ("FxiOS/", BrowserFamily::Firefox),
    ];
    for (marker, family) in candidates {
        if user_agent.contains(marker) {
            let major = version_after(user_agent, marker)
                .map(parse_version)
                .and_then(|v| v.first().copied());
            return Some(DetectedBrowser { family, major });
        }
    }
    if user_agent.contains("Safari/") {
        // Safari reports its real version behind "Version/"
        let major = version_after(user_agent, "Version/")
            .map(parse_version)
            .and_then(|v| v.first().copied());
        return Some(DetectedBrowser {
            family: BrowserFamily::Safari,
            major,
        });
    }
    None
}
