//! Compatibility validation
//!
//! Evaluates a (platform, user-agent) pair against the platform's declared
//! requirements. The verdict is advisory for UX and never an error: an
//! unknown or meta platform is simply an incompatible result with a single
//! issue. Recommendations are derived from the same evaluation so the two
//! surfaces never disagree.

use downlink_types::{BrowserFamily, CompatibilityResult, Platform};

use crate::registry::PlatformRegistry;
use crate::ua::{parse_version, version_at_least, ClientSignals, OsFamily};

/// One failed requirement, carried internally so issue text and remediation
/// text stay in sync.
#[derive(Debug, Clone)]
enum Issue {
    UnsupportedPlatform,
    OsBelowMinimum { minimum: String },
    BrowserUnsupported,
    BrowserBelowMinimum { family: BrowserFamily, minimum: u32 },
    MissingFeature { feature: String },
}

impl Issue {
    fn message(&self) -> String {
        match self {
            Issue::UnsupportedPlatform => "Unsupported platform".to_string(),
            Issue::OsBelowMinimum { minimum } => {
                format!("OS version below minimum ({minimum} required)")
            }
            Issue::BrowserUnsupported => "Browser not supported".to_string(),
            Issue::BrowserBelowMinimum { family, minimum } => {
                format!("Browser version below minimum ({family} {minimum}+ required)")
            }
            Issue::MissingFeature { feature } => {
                format!("Browser is missing a required feature: {feature}")
            }
        }
    }

    fn remediation(&self) -> Option<String> {
        match self {
            Issue::UnsupportedPlatform => None,
            Issue::OsBelowMinimum { minimum } => Some(format!(
                "Upgrade your operating system to version {minimum} or later"
            )),
            Issue::BrowserUnsupported => {
                Some("Switch to a recent Chrome, Edge, Firefox, or Safari".to_string())
            }
            Issue::BrowserBelowMinimum { family, minimum } => {
                Some(format!("Update {family} to version {minimum} or later"))
            }
            Issue::MissingFeature { .. } => {
                Some("Update your browser to its latest version".to_string())
            }
        }
    }
}

/// Validate a platform/user-agent pair against the platform's requirements.
///
/// Produces one issue per failed requirement; `compatible` iff none failed.
#[must_use]
pub fn validate(
    platform: Platform,
    user_agent: &str,
    registry: &PlatformRegistry,
) -> CompatibilityResult {
    let issues = evaluate(platform, user_agent, registry);
    CompatibilityResult::from_issues(issues.iter().map(Issue::message).collect())
}

/// Remediation suggestions for the same evaluation [`validate`] performs,
/// plus the cross-cutting suggestions: the web-app fallback whenever the
/// client is incompatible, and a pointer at the client's actually-detected
/// platform when it differs from the requested one.
#[must_use]
pub fn recommendations(
    platform: Platform,
    user_agent: &str,
    registry: &PlatformRegistry,
) -> Vec<String> {
    let issues = evaluate(platform, user_agent, registry);
    let mut out: Vec<String> = issues.iter().filter_map(Issue::remediation).collect();

    if !issues.is_empty() && platform != Platform::Web {
        out.push(format!(
            "Use the web app instead: {}",
            registry.web_app_url()
        ));
    }

    if let Some(detected) = detected_platform(user_agent) {
        if detected != platform {
            if let Ok(config) = registry.config_for(detected) {
                out.push(format!(
                    "Looks like you're on {}; consider the {} download instead",
                    config.display_name, config.display_name
                ));
            }
        }
    }

    out
}

fn evaluate(platform: Platform, user_agent: &str, registry: &PlatformRegistry) -> Vec<Issue> {
    let Ok(config) = registry.config_for(platform) else {
        return vec![Issue::UnsupportedPlatform];
    };
    let requirements = &config.requirements;
    if requirements.is_empty() {
        return Vec::new();
    }

    let signals = ClientSignals::parse(user_agent);
    let mut issues = Vec::new();

    // OS floor: only enforceable when the client's detected OS family is the
    // platform under validation and reports a parseable version.
    if let Some(minimum) = &requirements.min_os_version {
        if let Some(os) = &signals.os {
            if os_matches_platform(os.family, platform) {
                if let Some(version) = &os.version {
                    if !version_at_least(version, &parse_version(minimum)) {
                        issues.push(Issue::OsBelowMinimum {
                            minimum: minimum.clone(),
                        });
                    }
                }
            }
        }
    }

    if !requirements.min_browsers.is_empty() {
        match &signals.browser {
            None => issues.push(Issue::BrowserUnsupported),
            Some(browser) => match requirements.min_browsers.get(&browser.family) {
                None => issues.push(Issue::BrowserUnsupported),
                Some(&minimum) => {
                    if browser.major.is_none_or(|major| major < minimum) {
                        issues.push(Issue::BrowserBelowMinimum {
                            family: browser.family,
                            minimum,
                        });
                    }
                }
            },
        }
    }

    if !requirements.required_features.is_empty() {
        if let Some(browser) = &signals.browser {
            for feature in &requirements.required_features {
                if !feature_supported(browser.family, browser.major, feature) {
                    issues.push(Issue::MissingFeature {
                        feature: feature.clone(),
                    });
                }
            }
        }
    }

    issues
}

fn os_matches_platform(family: OsFamily, platform: Platform) -> bool {
    matches!(
        (family, platform),
        (OsFamily::Windows, Platform::Windows)
            | (OsFamily::Mac, Platform::Mac)
            | (OsFamily::Linux, Platform::Linux)
            | (OsFamily::Android, Platform::Android)
            | (OsFamily::Ios, Platform::Ios)
    )
}

fn detected_platform(user_agent: &str) -> Option<Platform> {
    let signals = ClientSignals::parse(user_agent);
    Some(match signals.os?.family {
        OsFamily::Windows => Platform::Windows,
        OsFamily::Mac => Platform::Mac,
        OsFamily::Linux => Platform::Linux,
        OsFamily::Android => Platform::Android,
        OsFamily::Ios => Platform::Ios,
    })
}

/// Static support floors for the feature flags platforms may require.
/// Unknown feature names are assumed supported; the check is advisory.
fn feature_supported(family: BrowserFamily, major: Option<u32>, feature: &str) -> bool {
    let floor = match (feature, family) {
        ("service-worker", BrowserFamily::Chrome) => 45,
        ("service-worker", BrowserFamily::Edge) => 17,
        ("service-worker", BrowserFamily::Firefox) => 44,
        ("service-worker", BrowserFamily::Safari) => 11,
        ("webassembly", BrowserFamily::Chrome) => 57,
        ("webassembly", BrowserFamily::Edge) => 16,
        ("webassembly", BrowserFamily::Firefox) => 52,
        ("webassembly", BrowserFamily::Safari) => 11,
        _ => return true,
    };
    major.is_some_and(|major| major >= floor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::RegistryUrls;

    const OLD_ANDROID: &str = "Mozilla/5.0 (Linux; Android 7.1.2; SM-G610F) \
        AppleWebKit/537.36 (KHTML, like Gecko) Chrome/119.0.0.0 Mobile Safari/537.36";
    const NEW_ANDROID: &str = "Mozilla/5.0 (Linux; Android 13; Pixel 7) \
        AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Mobile Safari/537.36";
    const WINDOWS_CHROME: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
        AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
    const ANCIENT_CHROME: &str = "Mozilla/5.0 (Windows NT 6.1) \
        AppleWebKit/537.36 (KHTML, like Gecko) Chrome/42.0.2311.90 Safari/537.36";

    fn registry() -> PlatformRegistry {
        PlatformRegistry::new(&RegistryUrls::default())
    }

    #[test]
    fn modern_client_passes() {
        let result = validate(Platform::Android, NEW_ANDROID, &registry());
        assert!(result.compatible);
        assert!(result.issues.is_empty());
    }

    #[test]
    fn old_os_fails_with_version_issue_and_upgrade_advice() {
        let registry = registry();
        let result = validate(Platform::Android, OLD_ANDROID, &registry);
        assert!(!result.compatible);
        assert!(result.issues.iter().any(|i| i.contains("OS version")));

        let recs = recommendations(Platform::Android, OLD_ANDROID, &registry);
        assert!(recs.iter().any(|r| r.contains("Upgrade your operating system")));
        assert!(recs.iter().any(|r| r.contains("web app")));
    }

    #[test]
    fn meta_platform_is_unsupported_not_an_error() {
        let result = validate(Platform::Desktop, WINDOWS_CHROME, &registry());
        assert!(!result.compatible);
        assert_eq!(result.issues, vec!["Unsupported platform".to_string()]);
    }

    #[test]
    fn web_rejects_unknown_browser() {
        let result = validate(Platform::Web, "curl/8.0", &registry());
        assert!(!result.compatible);
        assert!(result.issues.iter().any(|i| i.contains("Browser not supported")));
    }

    #[test]
    fn web_rejects_outdated_browser_with_update_advice() {
        let registry = registry();
        let result = validate(Platform::Web, ANCIENT_CHROME, &registry);
        assert!(!result.compatible);
        assert!(result
            .issues
            .iter()
            .any(|i| i.contains("Browser version below minimum")));

        let recs = recommendations(Platform::Web, ANCIENT_CHROME, &registry);
        assert!(recs.iter().any(|r| r.contains("Update Chrome")));
    }

    #[test]
    fn cross_platform_request_suggests_detected_platform() {
        let recs = recommendations(Platform::Mac, WINDOWS_CHROME, &registry());
        assert!(recs.iter().any(|r| r.contains("Windows")));
    }

    #[test]
    fn linux_has_no_requirements() {
        let result = validate(Platform::Linux, "curl/8.0", &registry());
        assert!(result.compatible);
    }
}
