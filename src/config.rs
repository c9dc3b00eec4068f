use std::env;

use regex::Regex;

use crate::core::domain_filter::DomainFilter;
use crate::error::Error;

/// Configuration read from environment variables by the process bootstrap.
///
/// Credentials are required; everything else carries a documented default.
#[derive(Clone)]
pub struct Configuration {
    pub api_credential_id: String,
    pub api_credential_secret: String,
    pub region: String,
    pub api_url: String,
    pub api_page_size: u32,
    pub default_ttl: u32,
    pub dry_run: bool,
    pub domain_filter: Vec<String>,
    pub exclude_domains: Vec<String>,
    pub regex_domain_filter: String,
    pub regex_domain_exclusion: String,
}

impl Configuration {
    pub fn from_env() -> Result<Self, Error> {
        Ok(Configuration {
            api_credential_id: require_env("BFC_APP_CREDENTIAL_ID")?,
            api_credential_secret: require_env("BFC_APP_CREDENTIAL_SECRET")?,
            region: env::var("BFC_REGION").unwrap_or_else(|_| "HN".to_string()),
            api_url: env::var("BFC_API_URL")
                .unwrap_or_else(|_| "https://manage.bizflycloud.vn/api".to_string()),
            api_page_size: env::var("BFC_API_PAGE_SIZE")
                .unwrap_or_else(|_| "100".to_string())
                .parse()
                .unwrap_or(100),
            default_ttl: env::var("DEFAULT_TTL")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .unwrap_or(60),
            dry_run: env::var("DRY_RUN")
                .unwrap_or_else(|_| "false".to_string())
                .parse()
                .unwrap_or(false),
            domain_filter: split_domains(&env::var("DOMAIN_FILTER").unwrap_or_default()),
            exclude_domains: split_domains(&env::var("EXCLUDE_DOMAIN_FILTER").unwrap_or_default()),
            regex_domain_filter: env::var("REGEX_DOMAIN_FILTER").unwrap_or_default(),
            regex_domain_exclusion: env::var("REGEX_DOMAIN_EXCLUSION").unwrap_or_default(),
        })
    }

    /// Build the configured [`DomainFilter`]. Regex mode takes precedence
    /// over the suffix lists when `REGEX_DOMAIN_FILTER` is set; a malformed
    /// pattern surfaces here rather than at match time.
    pub fn domain_filter(&self) -> Result<DomainFilter, Error> {
        if !self.regex_domain_filter.is_empty() {
            let include = compile_regex("REGEX_DOMAIN_FILTER", &self.regex_domain_filter)?;
            let exclude = if self.regex_domain_exclusion.is_empty() {
                None
            } else {
                Some(compile_regex(
                    "REGEX_DOMAIN_EXCLUSION",
                    &self.regex_domain_exclusion,
                )?)
            };
            return Ok(DomainFilter::new_regex(include, exclude));
        }
        Ok(DomainFilter::new(
            self.domain_filter.clone(),
            self.exclude_domains.clone(),
        ))
    }
}

fn require_env(key: &str) -> Result<String, Error> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(Error::Credential(format!("{key} must be set"))),
    }
}

fn compile_regex(name: &str, pattern: &str) -> Result<Regex, Error> {
    Regex::new(pattern).map_err(|e| Error::InvalidInput(format!("invalid {name} pattern: {e}")))
}

fn split_domains(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|domain| !domain.is_empty())
        .map(str::to_string)
        .collect()
}

pub(crate) mod mock {
    use super::*;

    impl Default for Configuration {
        fn default() -> Self {
            Configuration {
                api_credential_id: String::from("credential-id"),
                api_credential_secret: String::from("credential-secret"),
                region: String::from("HN"),
                api_url: String::from("http://127.0.0.1:8080/api"),
                api_page_size: 100,
                default_ttl: 60,
                dry_run: false,
                domain_filter: Vec::new(),
                exclude_domains: Vec::new(),
                regex_domain_filter: String::new(),
                regex_domain_exclusion: String::new(),
            }
        }
    }
}
