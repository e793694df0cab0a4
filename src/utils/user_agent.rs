//! User-agent classification for telemetry enrichment
//!
//! Plain substring checks on the lowercased header. Order matters: the
//! first matching rule wins.

const BOT_PATTERNS: &[&str] = &[
    "bot",
    "crawler",
    "spider",
    "scraper",
    "facebook",
    "twitter",
    "linkedin",
    "whatsapp",
    "telegram",
    "slackbot",
    "googlebot",
    "bingbot",
    "yandexbot",
    "baiduspider",
    "duckduckbot",
];

/// Facets derived from a `User-Agent` string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserAgentInfo {
    pub device_type: &'static str,
    pub browser: &'static str,
    pub operating_system: &'static str,
    pub is_bot: bool,
}

impl UserAgentInfo {
    pub fn parse(user_agent: &str) -> Self {
        let ua = user_agent.to_lowercase();
        Self {
            device_type: device_type(&ua),
            browser: browser(&ua),
            operating_system: operating_system(&ua),
            is_bot: BOT_PATTERNS.iter().any(|p| ua.contains(p)),
        }
    }
}

fn device_type(ua: &str) -> &'static str {
    if ua.contains("mobile") || ua.contains("android") || ua.contains("iphone") {
        "mobile"
    } else if ua.contains("tablet") || ua.contains("ipad") {
        "tablet"
    } else {
        "desktop"
    }
}

fn browser(ua: &str) -> &'static str {
    if ua.contains("firefox") {
        "Firefox"
    } else if ua.contains("safari") && !ua.contains("chrome") {
        "Safari"
    } else if ua.contains("chrome") {
        "Chrome"
    } else if ua.contains("edge") {
        "Edge"
    } else if ua.contains("opera") {
        "Opera"
    } else {
        "Unknown"
    }
}

fn operating_system(ua: &str) -> &'static str {
    if ua.contains("windows") {
        "Windows"
    } else if ua.contains("macintosh") || ua.contains("mac os") {
        "macOS"
    } else if ua.contains("linux") {
        "Linux"
    } else if ua.contains("android") {
        "Android"
    } else if ua.contains("ios") || ua.contains("iphone") || ua.contains("ipad") {
        "iOS"
    } else {
        "Unknown"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_desktop_chrome_on_windows() {
        let info = UserAgentInfo::parse(
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36",
        );
        assert_eq!(info.device_type, "desktop");
        assert_eq!(info.browser, "Chrome");
        assert_eq!(info.operating_system, "Windows");
        assert!(!info.is_bot);
    }

    #[test]
    fn test_android_checks_linux_first() {
        let info = UserAgentInfo::parse("Mozilla/5.0 (Linux; Android 14) Firefox/121.0");
        assert_eq!(info.device_type, "mobile");
        assert_eq!(info.browser, "Firefox");
        assert_eq!(info.operating_system, "Linux");
    }

    #[test]
    fn test_ipad_is_tablet() {
        let info = UserAgentInfo::parse("Mozilla/5.0 (iPad; CPU OS 17_0) Safari/604.1");
        assert_eq!(info.device_type, "tablet");
        assert_eq!(info.operating_system, "iOS");
    }

    #[test]
    fn test_bot_detection() {
        assert!(UserAgentInfo::parse("Googlebot/2.1 (+http://www.google.com/bot.html)").is_bot);
        assert!(UserAgentInfo::parse("facebookexternalhit/1.1").is_bot);
        assert_eq!(UserAgentInfo::parse("curl/8.0").browser, "Unknown");
    }
}
