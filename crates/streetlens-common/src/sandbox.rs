use reqwest::{Client, ClientBuilder};
use std::collections::HashSet;
use std::time::Duration;
use url::Url;

use crate::error::StreetlensError;

/// A sandbox-capped HTTP client that only allows requests to approved
/// domains. Every outbound call this service makes goes through here.
#[derive(Debug, Clone)]
pub struct SandboxClient {
    client: Client,
    allowlist: HashSet<String>,
}

impl SandboxClient {
    /// Creates a new SandboxClient with the default allowlist of data and AI
    /// providers the service talks to.
    pub fn new() -> Result<Self, StreetlensError> {
        let mut allowlist = HashSet::new();
        // Default Streetlens allowlist
        let domains = vec![
            "api.os.uk",                       // OS NGD features API
            "innovation.nuar-data-services.uk", // NUAR generalised data API
            "api.openai.com",                  // OpenAI LLMs
            "localhost",                       // local OpenAI-compatible backends
            "127.0.0.1",                       // localhost alt
        ];

        for d in domains {
            allowlist.insert(d.to_string());
        }

        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self { client, allowlist })
    }

    /// Appends an exact hostname to the allowlist.
    pub fn allow_domain(&mut self, domain: &str) {
        self.allowlist.insert(domain.to_string());
    }

    /// Validates if a URL is permitted under the current sandbox policy.
    pub fn is_allowed(&self, url: &str) -> bool {
        if let Ok(parsed) = Url::parse(url) {
            if let Some(host) = parsed.host_str() {
                // Check exact match or if it's a subdomain of an allowed domain
                for allowed in &self.allowlist {
                    if host == allowed || host.ends_with(&format!(".{}", allowed)) {
                        return true;
                    }
                }
            }
        }
        false
    }

    /// Exposes the inner `reqwest::Client` builder pattern safely for GET requests.
    pub fn get(&self, url: &str) -> Result<reqwest::RequestBuilder, StreetlensError> {
        if !self.is_allowed(url) {
            return Err(StreetlensError::Sandbox(format!(
                "domain not in allowlist for URL {}",
                url
            )));
        }

        Ok(self.client.get(url))
    }

    /// Exposes the inner `reqwest::Client` builder pattern safely for POST requests.
    pub fn post(&self, url: &str) -> Result<reqwest::RequestBuilder, StreetlensError> {
        if !self.is_allowed(url) {
            return Err(StreetlensError::Sandbox(format!(
                "domain not in allowlist for URL {}",
                url
            )));
        }

        Ok(self.client.post(url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowlist_permits_os_api() {
        let client = SandboxClient::new().unwrap();
        assert!(client.is_allowed("https://api.os.uk/features/ngd/ofa/v1/collections"));
        assert!(client.is_allowed("http://localhost:8080/v1/chat/completions"));
    }

    #[test]
    fn test_allowlist_blocks_unknown_host() {
        let client = SandboxClient::new().unwrap();
        assert!(!client.is_allowed("https://example.com/anything"));
        assert!(client.get("https://example.com/anything").is_err());
    }

    #[test]
    fn test_allow_domain_extends_policy() {
        let mut client = SandboxClient::new().unwrap();
        assert!(!client.is_allowed("https://internal.test/x"));
        client.allow_domain("internal.test");
        assert!(client.is_allowed("https://internal.test/x"));
    }
}
