//! IP geolocation lookups.
//!
//! Resolves a caller address to a country name through the ipapi.co JSON API.
//! Callers decide what a failure means; the origin gate treats every error as
//! a denial.

use std::net::IpAddr;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::CoreError;

pub const DEFAULT_BASE_URL: &str = "https://ipapi.co";
const USER_AGENT: &str = concat!("company-registry/", env!("CARGO_PKG_VERSION"));

/// Country lookup for a remote address.
#[async_trait]
pub trait CountryLookup: Send + Sync {
    async fn country_of(&self, ip: IpAddr) -> Result<String, CoreError>;
}

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    country_name: Option<String>,
    #[serde(default)]
    error: bool,
    reason: Option<String>,
}

/// HTTP client for `GET {base_url}/{ip}/json/`.
#[derive(Clone)]
pub struct IpApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl IpApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, CoreError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| CoreError::Network(e.to_string()))?;
        Ok(Self { http, base_url: base_url.trim_end_matches('/').to_string() })
    }

    pub fn lookup_url(&self, ip: IpAddr) -> String {
        format!("{}/{}/json/", self.base_url, ip)
    }
}

#[async_trait]
impl CountryLookup for IpApiClient {
    async fn country_of(&self, ip: IpAddr) -> Result<String, CoreError> {
        let url = self.lookup_url(ip);
        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| CoreError::Network(e.to_string()))?;
        let body = resp
            .json::<IpApiResponse>()
            .await
            .map_err(|e| CoreError::Parse(e.to_string()))?;
        parse_country(body).inspect(|country| debug!(%ip, %country, "geo lookup"))
    }
}

fn parse_country(body: IpApiResponse) -> Result<String, CoreError> {
    if body.error {
        return Err(CoreError::Parse(body.reason.unwrap_or_else(|| "lookup rejected".into())));
    }
    match body.country_name {
        Some(name) if !name.trim().is_empty() => Ok(name),
        _ => Err(CoreError::Parse("country_name missing".into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<String, CoreError> {
        parse_country(serde_json::from_str(json).unwrap())
    }

    #[test]
    fn lookup_url_strips_trailing_slash() {
        let client = IpApiClient::new("https://ipapi.co/", Duration::from_secs(1)).unwrap();
        let ip: IpAddr = "203.0.113.7".parse().unwrap();
        assert_eq!(client.lookup_url(ip), "https://ipapi.co/203.0.113.7/json/");
    }

    #[test]
    fn country_name_is_extracted() {
        assert_eq!(parse(r#"{"ip":"1.2.3.4","country_name":"Cyprus"}"#).unwrap(), "Cyprus");
    }

    #[test]
    fn reserved_address_is_an_error() {
        let err = parse(r#"{"ip":"127.0.0.1","error":true,"reason":"Reserved IP Address"}"#).unwrap_err();
        assert!(err.to_string().contains("Reserved IP Address"));
    }

    #[test]
    fn missing_country_is_an_error() {
        assert!(parse(r#"{"ip":"1.2.3.4"}"#).is_err());
        assert!(parse(r#"{"ip":"1.2.3.4","country_name":"  "}"#).is_err());
    }
}
