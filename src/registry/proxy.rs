//! Proxy selection for registry fetches.
//!
//! `HTTP_PROXY`, `HTTPS_PROXY` and `NO_PROXY` are read in either case (upper
//! case wins). `NO_PROXY` is a comma-separated list accepting:
//!
//! - `*` to bypass everything
//! - `*.example.com` or `.example.com` for a domain and its subdomains
//! - `host` or `host:port` for an exact match
//! - `localhost`, `127.0.0.1` or `::1`, each of which covers every loopback form

use reqwest::Url;

/// Proxy environment captured once per client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProxySettings {
    /// Proxy for `http://` URLs
    pub http: Option<String>,
    /// Proxy for `https://` URLs
    pub https: Option<String>,
    /// Bypass list
    pub no_proxy: Option<String>,
}

fn env_either(upper: &str) -> Option<String> {
    std::env::var(upper)
        .ok()
        .or_else(|| std::env::var(upper.to_lowercase()).ok())
        .filter(|v| !v.trim().is_empty())
}

impl ProxySettings {
    /// Reads the proxy variables from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            http: env_either("HTTP_PROXY"),
            https: env_either("HTTPS_PROXY"),
            no_proxy: env_either("NO_PROXY"),
        }
    }

    /// Whether any proxy is configured.
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.http.is_some() || self.https.is_some()
    }

    /// The proxy to use for `url`, or `None` to connect directly.
    #[must_use]
    pub fn proxy_for(&self, url: &Url) -> Option<Url> {
        if self.no_proxy.as_deref().is_some_and(|np| should_bypass_proxy(url.as_str(), np)) {
            return None;
        }
        let proxy = match url.scheme() {
            "https" => self.https.as_ref().or(self.http.as_ref()),
            "http" => self.http.as_ref(),
            _ => None,
        }?;
        Url::parse(proxy).ok()
    }
}

fn is_loopback(host: &str) -> bool {
    host == "localhost"
        || host == "::1"
        || host.parse::<std::net::Ipv4Addr>().is_ok_and(|ip| ip.is_loopback())
}

/// Whether `url` should skip the proxy given a `NO_PROXY` value.
#[must_use]
pub fn should_bypass_proxy(url: &str, no_proxy: &str) -> bool {
    let Ok(parsed) = Url::parse(url) else {
        return false;
    };
    let Some(host) = parsed.host_str() else {
        return false;
    };
    let host = host.trim_start_matches('[').trim_end_matches(']').to_lowercase();
    let port = parsed.port_or_known_default();

    no_proxy
        .split(',')
        .map(|entry| entry.trim().to_lowercase())
        .filter(|entry| !entry.is_empty())
        .any(|entry| {
            if entry == "*" {
                return true;
            }
            if let Some(domain) = entry.strip_prefix("*.").or_else(|| entry.strip_prefix('.')) {
                return host == domain || host.ends_with(&format!(".{domain}"));
            }

            let bare = entry.trim_start_matches('[').trim_end_matches(']');
            if bare.parse::<std::net::IpAddr>().is_err()
                && let Some((entry_host, entry_port)) = entry.rsplit_once(':')
                && let Ok(entry_port) = entry_port.parse::<u16>()
            {
                let entry_host = entry_host.trim_start_matches('[').trim_end_matches(']');
                return Some(entry_port) == port
                    && (entry_host == host || (is_loopback(entry_host) && is_loopback(&host)));
            }

            bare == host || (is_loopback(bare) && is_loopback(&host))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wildcard_domain() {
        assert!(should_bypass_proxy("https://internal.example.com", "*.example.com"));
        assert!(!should_bypass_proxy("https://other.com", "*.example.com"));
        assert!(should_bypass_proxy("https://a.b.example.com/x", ".example.com"));
        assert!(!should_bypass_proxy("https://notexample.com", ".example.com"));
    }

    #[test]
    fn test_localhost_forms() {
        assert!(should_bypass_proxy("http://localhost:9000", "localhost"));
        assert!(should_bypass_proxy("http://127.0.0.1:9000", "localhost"));
        assert!(should_bypass_proxy("http://[::1]:8080/", "127.0.0.1"));
        assert!(should_bypass_proxy("http://localhost/", "::1"));
    }

    #[test]
    fn test_exact_host_and_port() {
        assert!(should_bypass_proxy("https://registry.local/r.json", "other, registry.local"));
        assert!(should_bypass_proxy("http://registry.local:8080/", "registry.local:8080"));
        assert!(!should_bypass_proxy("http://registry.local:9090/", "registry.local:8080"));
        assert!(should_bypass_proxy("https://anything.io", "*"));
        assert!(!should_bypass_proxy("https://anything.io", ""));
        assert!(!should_bypass_proxy("not a url", "*"));
    }

    #[test]
    fn test_proxy_for_scheme() {
        let settings = ProxySettings {
            http: Some("http://proxy:3128".to_string()),
            https: None,
            no_proxy: Some("localhost".to_string()),
        };
        let remote = Url::parse("https://registry.example.com/registry.json").unwrap();
        assert_eq!(settings.proxy_for(&remote).unwrap().as_str(), "http://proxy:3128/");

        let local = Url::parse("http://localhost:9000/registry.json").unwrap();
        assert!(settings.proxy_for(&local).is_none());
        assert!(settings.is_configured());
    }
}
