//! Caller-origin gate consulted before creating or deleting companies.

use std::net::SocketAddr;

use async_trait::async_trait;
use common::geo::CountryLookup;
use tracing::{debug, warn};

#[async_trait]
pub trait OriginPolicy: Send + Sync {
    async fn is_allowed(&self, addr: SocketAddr) -> bool;
}

/// Used when the origin check is disabled.
pub struct AllowAll;

#[async_trait]
impl OriginPolicy for AllowAll {
    async fn is_allowed(&self, _addr: SocketAddr) -> bool { true }
}

/// Allows callers whose address geolocates to one of `allowed`.
/// Lookup failures deny.
pub struct CountryAllowList<L: CountryLookup> {
    lookup: L,
    allowed: Vec<String>,
}

impl<L: CountryLookup> CountryAllowList<L> {
    pub fn new(lookup: L, allowed: Vec<String>) -> Self {
        let allowed = allowed.into_iter().map(|c| c.trim().to_string()).filter(|c| !c.is_empty()).collect();
        Self { lookup, allowed }
    }
}

#[async_trait]
impl<L: CountryLookup> OriginPolicy for CountryAllowList<L> {
    async fn is_allowed(&self, addr: SocketAddr) -> bool {
        match self.lookup.country_of(addr.ip()).await {
            Ok(country) => {
                let ok = self.allowed.iter().any(|a| a.eq_ignore_ascii_case(country.trim()));
                debug!(ip = %addr.ip(), %country, allowed = ok, "origin checked");
                ok
            }
            Err(e) => {
                warn!(ip = %addr.ip(), error = %e, "origin lookup failed, denying");
                false
            }
        }
    }
}
