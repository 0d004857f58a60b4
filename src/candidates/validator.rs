//! Domain name validation utilities

use regex::Regex;

use crate::error::{Result, SweepError};

/// Syntactic checks for candidate labels and full domain names
pub struct DomainValidator {
    label: Regex,
    tld: Regex,
}

impl DomainValidator {
    pub fn new() -> Result<Self> {
        let label = Regex::new(r"^[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?$")
            .map_err(|e| crate::internal_error!("Invalid validator pattern: {}", e))?;
        let tld = Regex::new(r"^(?:[a-z]{2,63}|xn--[a-z0-9-]{1,59})$")
            .map_err(|e| crate::internal_error!("Invalid validator pattern: {}", e))?;
        Ok(Self { label, tld })
    }

    /// A single DNS label: 1-63 chars of `a-z0-9-`, no leading/trailing hyphen
    pub fn is_valid_label(&self, label: &str) -> bool {
        self.label.is_match(label)
    }

    pub fn is_valid_tld(&self, tld: &str) -> bool {
        self.tld.is_match(tld)
    }

    /// Validate a lower-cased, fully-qualified domain such as `trysoil.dev`
    pub fn validate(&self, domain: &str) -> Result<()> {
        if domain.is_empty() {
            return Err(SweepError::validation("Domain name cannot be empty"));
        }

        if domain.len() > 253 {
            return Err(crate::validation_error!(
                "Domain name too long (max 253 characters): {}",
                domain
            ));
        }

        let (name, tld) = domain
            .rsplit_once('.')
            .ok_or_else(|| crate::validation_error!("Domain must have at least one dot: {}", domain))?;

        if !self.is_valid_tld(tld) {
            return Err(crate::validation_error!("Invalid TLD '{}' in {}", tld, domain));
        }

        for label in name.split('.') {
            if !self.is_valid_label(label) {
                return Err(crate::validation_error!("Invalid label '{}' in {}", label, domain));
            }
        }

        Ok(())
    }
}
