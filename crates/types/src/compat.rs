use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Browser families we can identify from a user-agent string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserFamily {
    Chrome,
    Edge,
    Firefox,
    Safari,
}

impl BrowserFamily {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            BrowserFamily::Chrome => "Chrome",
            BrowserFamily::Edge => "Edge",
            BrowserFamily::Firefox => "Firefox",
            BrowserFamily::Safari => "Safari",
        }
    }
}

impl fmt::Display for BrowserFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Minimum client requirements for one platform.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Requirements {
    /// Minimum OS version, dotted-numeric ("10.15", "8.0").
    #[serde(default)]
    pub min_os_version: Option<String>,
    /// Minimum supported major version per browser family; a family absent
    /// from the map is unsupported. Empty map means any browser passes.
    #[serde(default)]
    pub min_browsers: BTreeMap<BrowserFamily, u32>,
    /// Feature flags the client must support (checked against a static
    /// browser support table).
    #[serde(default)]
    pub required_features: Vec<String>,
}

impl Requirements {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.min_os_version.is_none()
            && self.min_browsers.is_empty()
            && self.required_features.is_empty()
    }
}

/// Outcome of a compatibility check; advisory for UX, never a security gate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompatibilityResult {
    pub compatible: bool,
    /// One human-readable reason per failed requirement, in check order.
    pub issues: Vec<String>,
}

impl CompatibilityResult {
    /// A passing result with no issues.
    #[must_use]
    pub fn compatible() -> Self {
        Self {
            compatible: true,
            issues: Vec::new(),
        }
    }

    /// A failing result from the collected issues.
    #[must_use]
    pub fn from_issues(issues: Vec<String>) -> Self {
        Self {
            compatible: issues.is_empty(),
            issues,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_issue_list_is_compatible() {
        let result = CompatibilityResult::from_issues(Vec::new());
        assert!(result.compatible);
    }

    #[test]
    fn issues_flip_the_verdict() {
        let result = CompatibilityResult::from_issues(vec!["OS version below minimum".into()]);
        assert!(!result.compatible);
        assert_eq!(result.issues.len(), 1);
    }

    #[test]
    fn default_requirements_are_empty() {
        assert!(Requirements::default().is_empty());
    }
}
