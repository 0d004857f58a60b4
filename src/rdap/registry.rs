//! Central RDAP server registry.
//!
//! A small, static suffix → URL template mapping with the IANA bootstrap
//! service as the fallback for every suffix we have no dedicated server for.

use std::collections::HashMap;

/// Fallback template for suffixes without a dedicated endpoint
pub const BOOTSTRAP_TEMPLATE: &str = "https://rdap.iana.org/domain/{}";

/// Built-in per-suffix templates. `{}` is replaced by the full domain.
pub const DEFAULT_ENDPOINTS: &[(&str, &str)] = &[
    ("com", "https://rdap.verisign.com/com/v1/domain/{}"),
    ("ai", "https://rdap.identitydigital.services/rdap/domain/{}"),
    ("dev", "https://rdap.googleapis.com/rdap/v1/domain/{}"),
];

/// Top-level suffix of a domain: text after the last dot, lower-cased.
pub fn top_level_suffix(domain: &str) -> String {
    domain
        .rsplit('.')
        .next()
        .unwrap_or(domain)
        .trim()
        .to_lowercase()
}

/// Suffix → RDAP URL template mapping.
///
/// Keys are stored lower-cased, so a suffix can only ever map to one template.
#[derive(Debug, Clone)]
pub struct EndpointTable {
    endpoints: HashMap<String, String>,
    bootstrap: String,
}

impl Default for EndpointTable {
    fn default() -> Self {
        let endpoints = DEFAULT_ENDPOINTS
            .iter()
            .map(|(suffix, template)| (suffix.to_string(), template.to_string()))
            .collect();

        Self {
            endpoints,
            bootstrap: BOOTSTRAP_TEMPLATE.to_string(),
        }
    }
}

impl EndpointTable {
    /// A table with no dedicated endpoints; everything goes to the bootstrap.
    pub fn bootstrap_only() -> Self {
        Self {
            endpoints: HashMap::new(),
            bootstrap: BOOTSTRAP_TEMPLATE.to_string(),
        }
    }

    /// Add or replace the template for `suffix`
    pub fn with_endpoint(mut self, suffix: &str, template: impl Into<String>) -> Self {
        let suffix = suffix.trim().trim_start_matches('.').to_lowercase();
        self.endpoints.insert(suffix, template.into());
        self
    }

    /// Replace the fallback template
    pub fn with_bootstrap(mut self, template: impl Into<String>) -> Self {
        self.bootstrap = template.into();
        self
    }

    /// Dedicated template for `suffix`, if any
    pub fn endpoint_for(&self, suffix: &str) -> Option<&str> {
        self.endpoints
            .get(&suffix.to_lowercase())
            .map(String::as_str)
    }

    /// Suffixes with a dedicated endpoint, sorted
    pub fn suffixes(&self) -> Vec<&str> {
        let mut suffixes: Vec<&str> = self.endpoints.keys().map(String::as_str).collect();
        suffixes.sort_unstable();
        suffixes
    }

    pub fn bootstrap(&self) -> &str {
        &self.bootstrap
    }

    /// Build the RDAP query URL for a fully-qualified domain.
    ///
    /// Never fails: an unknown suffix degrades to the bootstrap template.
    pub fn resolve(&self, domain: &str) -> String {
        let suffix = top_level_suffix(domain);
        let template = self
            .endpoint_for(&suffix)
            .unwrap_or(self.bootstrap.as_str());
        template.replacen("{}", domain, 1)
    }
}

/// Resolve `domain` against the built-in table
pub fn resolve(domain: &str) -> String {
    EndpointTable::default().resolve(domain)
}
