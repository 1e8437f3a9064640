//! Meta-platform resolution
//!
//! A declared concrete platform is always honored unchanged. The `desktop`
//! meta-platform (or an absent declaration) is resolved from the user agent
//! with a fixed priority so that spoofed or test agents carrying several OS
//! tokens resolve deterministically: Windows, then Mac, then Linux.

use downlink_types::Platform;

/// Resolve a request to a canonical, non-meta platform.
#[must_use]
pub fn resolve(declared: Option<Platform>, user_agent: &str) -> Platform {
    match declared {
        Some(platform) if !platform.is_meta() => platform,
        _ => sniff_desktop(user_agent),
    }
}

fn sniff_desktop(user_agent: &str) -> Platform {
    if user_agent.contains("Windows") || user_agent.contains("Win64") || user_agent.contains("Win32")
    {
        Platform::Windows
    } else if user_agent.contains("Macintosh") || user_agent.contains("Mac OS X") {
        Platform::Mac
    } else if user_agent.contains("Linux") || user_agent.contains("X11") {
        Platform::Linux
    } else {
        Platform::Generic
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn concrete_declaration_is_returned_unchanged() {
        assert_eq!(
            resolve(Some(Platform::Android), "Mozilla/5.0 (Windows NT 10.0)"),
            Platform::Android
        );
        assert_eq!(resolve(Some(Platform::Web), "curl/8.0"), Platform::Web);
    }

    #[test]
    fn desktop_resolves_from_user_agent() {
        assert_eq!(
            resolve(Some(Platform::Desktop), "Mozilla/5.0 (Windows NT 10.0; Win64; x64)"),
            Platform::Windows
        );
        assert_eq!(
            resolve(Some(Platform::Desktop), "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7)"),
            Platform::Mac
        );
        assert_eq!(
            resolve(Some(Platform::Desktop), "Mozilla/5.0 (X11; Linux x86_64)"),
            Platform::Linux
        );
        assert_eq!(resolve(Some(Platform::Desktop), "curl/8.0"), Platform::Generic);
    }

    #[test]
    fn absent_declaration_behaves_like_desktop() {
        assert_eq!(
            resolve(None, "Mozilla/5.0 (X11; Linux x86_64)"),
            Platform::Linux
        );
        assert_eq!(resolve(None, ""), Platform::Generic);
    }

    #[test]
    fn spoofed_agent_uses_fixed_priority() {
        // Contains both Windows and Mac tokens; Windows wins.
        let spoofed = "Mozilla/5.0 (Windows NT 10.0; Macintosh; Intel Mac OS X 10_15)";
        assert_eq!(resolve(Some(Platform::Desktop), spoofed), Platform::Windows);

        // Mac and Linux tokens; Mac wins.
        let spoofed = "Mozilla/5.0 (Macintosh; X11; Linux x86_64)";
        assert_eq!(resolve(None, spoofed), Platform::Mac);
    }
}
