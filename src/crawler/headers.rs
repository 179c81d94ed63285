use rand::seq::SliceRandom;
use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, CONNECTION,
    PRAGMA, USER_AGENT,
};

/// Pool of realistic User-Agent strings for rotation
pub const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:121.0) Gecko/20100101 Firefox/121.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.2 Safari/605.1.15",
    "Mozilla/5.0 (X11; Linux x86_64; rv:121.0) Gecko/20100101 Firefox/121.0",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36 Edg/120.0.0.0",
];

/// Simulated browser fingerprint sent with every request
///
/// An identity is never mutated; rotation replaces it with a new one whose
/// `generation` is one higher. Transports may key per-identity state (such as
/// a cookie session) on the generation.
#[derive(Debug, Clone)]
pub struct Identity {
    generation: u64,
    user_agent: &'static str,
    headers: HeaderMap,
}

impl Identity {
    /// Create an identity with a random user agent from the pool
    pub fn random(generation: u64) -> Self {
        let mut rng = rand::thread_rng();
        let user_agent = USER_AGENTS.choose(&mut rng).unwrap_or(&USER_AGENTS[0]);
        Self::with_user_agent(generation, user_agent)
    }

    /// Create an identity with a fixed user agent
    pub fn with_user_agent(generation: u64, user_agent: &'static str) -> Self {
        Self {
            generation,
            user_agent,
            headers: build_browser_headers(user_agent),
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn user_agent(&self) -> &'static str {
        self.user_agent
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }
}

/// Build browser-like headers so requests look like a person reading the timetable
///
/// # Examples
///
/// ```
/// use kitis::crawler::headers::build_browser_headers;
///
/// let headers = build_browser_headers("Mozilla/5.0 (X11; Linux x86_64)");
/// assert!(headers.contains_key("user-agent"));
/// ```
pub fn build_browser_headers(user_agent: &'static str) -> HeaderMap {
    let mut headers = HeaderMap::new();

    headers.insert(USER_AGENT, HeaderValue::from_static(user_agent));
    headers.insert(
        ACCEPT,
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
        ),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
    headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
    headers.insert(
        HeaderName::from_static("priority"),
        HeaderValue::from_static("u=0, i"),
    );

    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_browser_headers() {
        let headers = build_browser_headers("Mozilla/5.0");

        assert_eq!(
            headers.get(USER_AGENT).unwrap(),
            HeaderValue::from_static("Mozilla/5.0")
        );
        assert_eq!(
            headers.get(ACCEPT_LANGUAGE).unwrap(),
            HeaderValue::from_static("en-US,en;q=0.5")
        );
        assert_eq!(headers.get(PRAGMA).unwrap(), "no-cache");
        assert_eq!(headers.get(CACHE_CONTROL).unwrap(), "no-cache");
        assert_eq!(headers.get("priority").unwrap(), "u=0, i");
    }

    #[test]
    fn test_random_identity_uses_pool() {
        let mut agents = std::collections::HashSet::new();
        for generation in 0..100 {
            let identity = Identity::random(generation);
            assert!(USER_AGENTS.contains(&identity.user_agent()));
            assert_eq!(identity.generation(), generation);
            agents.insert(identity.user_agent());
        }

        // With 100 draws from the pool we should see more than one agent
        assert!(agents.len() > 1, "User agents should rotate");
    }

    #[test]
    fn test_identity_headers_match_user_agent() {
        let identity = Identity::with_user_agent(3, USER_AGENTS[2]);
        assert_eq!(
            identity.headers().get(USER_AGENT).unwrap().to_str().unwrap(),
            USER_AGENTS[2]
        );
    }
}
