//! Immutable per-platform distribution registry
//!
//! Built once at startup from configuration and never written thereafter.
//! Every lookup goes through [`PlatformRegistry::config_for`]; the meta
//! `desktop` platform is intentionally unregistered because it must be
//! resolved to a concrete member before any metadata lookup.

use std::collections::HashMap;

use downlink_errors::{Error, PlatformError};
use downlink_types::{BrowserFamily, Platform, PlatformConfig, Requirements};

/// External URLs the registry needs for store-redirected platforms.
#[derive(Debug, Clone)]
pub struct RegistryUrls {
    /// Browser-based app, also the universal fallback destination.
    pub web_app: String,
    /// App Store product page for the iOS build.
    pub ios_store: String,
}

impl Default for RegistryUrls {
    fn default() -> Self {
        Self {
            web_app: "https://app.downlink.example/app".to_string(),
            ios_store: "https://apps.apple.com/app/downlink/id000000000".to_string(),
        }
    }
}

/// Process-wide, read-only platform metadata table.
#[derive(Debug, Clone)]
pub struct PlatformRegistry {
    configs: HashMap<Platform, PlatformConfig>,
    web_app_url: String,
}

impl PlatformRegistry {
    /// Build the registry with the default artifact names and requirements.
    #[must_use]
    pub fn new(urls: &RegistryUrls) -> Self {
        let mut configs = HashMap::new();

        configs.insert(
            Platform::Ios,
            PlatformConfig {
                display_name: "iOS".to_string(),
                file_name: None,
                store_url: Some(urls.ios_store.clone()),
                requirements: Requirements {
                    min_os_version: Some("14.0".to_string()),
                    ..Requirements::default()
                },
            },
        );
        configs.insert(
            Platform::Android,
            PlatformConfig {
                display_name: "Android".to_string(),
                file_name: Some("downlink.apk".to_string()),
                store_url: None,
                requirements: Requirements {
                    min_os_version: Some("8.0".to_string()),
                    ..Requirements::default()
                },
            },
        );
        configs.insert(
            Platform::Windows,
            PlatformConfig {
                display_name: "Windows".to_string(),
                file_name: Some("downlink-setup.exe".to_string()),
                store_url: None,
                requirements: Requirements {
                    min_os_version: Some("10.0".to_string()),
                    ..Requirements::default()
                },
            },
        );
        configs.insert(
            Platform::Mac,
            PlatformConfig {
                display_name: "macOS".to_string(),
                file_name: Some("downlink.dmg".to_string()),
                store_url: None,
                requirements: Requirements {
                    min_os_version: Some("10.15".to_string()),
                    ..Requirements::default()
                },
            },
        );
        configs.insert(
            Platform::Linux,
            PlatformConfig {
                display_name: "Linux".to_string(),
                file_name: Some("downlink.AppImage".to_string()),
                store_url: None,
                requirements: Requirements::default(),
            },
        );
        configs.insert(
            Platform::Web,
            PlatformConfig {
                display_name: "Web App".to_string(),
                file_name: None,
                store_url: Some(urls.web_app.clone()),
                requirements: Requirements {
                    min_os_version: None,
                    min_browsers: [
                        (BrowserFamily::Chrome, 90),
                        (BrowserFamily::Edge, 90),
                        (BrowserFamily::Firefox, 88),
                        (BrowserFamily::Safari, 14),
                    ]
                    .into_iter()
                    .collect(),
                    required_features: vec!["service-worker".to_string()],
                },
            },
        );
        configs.insert(
            Platform::Generic,
            PlatformConfig {
                display_name: "Direct Download".to_string(),
                file_name: Some("downlink.tar.gz".to_string()),
                store_url: None,
                requirements: Requirements::default(),
            },
        );

        Self {
            configs,
            web_app_url: urls.web_app.clone(),
        }
    }

    /// Look up distribution metadata for a platform.
    ///
    /// # Errors
    /// Returns `UnknownPlatform` when no config is registered. For enum
    /// inputs this only happens for the meta `desktop` platform, which must
    /// be resolved before lookup; the check is defensive.
    pub fn config_for(&self, platform: Platform) -> Result<&PlatformConfig, Error> {
        self.configs
            .get(&platform)
            .ok_or_else(|| {
                PlatformError::UnknownPlatform {
                    platform: platform.to_string(),
                }
                .into()
            })
    }

    /// The web-app URL used as the universal fallback destination.
    #[must_use]
    pub fn web_app_url(&self) -> &str {
        &self.web_app_url
    }

    /// Registered platforms and their configs, in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (Platform, &PlatformConfig)> {
        self.configs.iter().map(|(p, c)| (*p, c))
    }
}
