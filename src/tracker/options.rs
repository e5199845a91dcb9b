extern crate serde;
extern crate serde_yaml;

use crate::{
    config::{api, cache, fetch},
    error::{storage_error, Result},
};
use serde::{Deserialize, Serialize};
use std::{io::Read, path::PathBuf, time::Duration};

/// Runtime settings. Every field falls back to the compiled-in default.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Options {
    pub catalog_url: String,
    pub fallback_catalog_url: String,
    pub status_url: String,
    pub info_url: String,
    pub page_size: usize,
    /// Seconds before a single request is abandoned.
    pub timeout: u64,
    /// Seconds the cached catalog stays fresh.
    pub catalog_ttl: u64,
    pub cache_path: Option<PathBuf>,
    /// Https proxy for every request.
    pub proxy: Option<String>,
}
impl Default for Options {
    fn default() -> Self {
        Self {
            catalog_url: api::CATALOG_URL.to_string(),
            fallback_catalog_url: api::FALLBACK_CATALOG_URL.to_string(),
            status_url: api::STATUS_URL.to_string(),
            info_url: api::INFO_URL.to_string(),
            page_size: fetch::PAGE_SIZE,
            timeout: fetch::REQUEST_TIMEOUT.as_secs(),
            catalog_ttl: cache::CATALOG_TTL.as_secs(),
            cache_path: None,
            proxy: None,
        }
    }
}
impl Options {
    pub fn from_reader<R: Read>(rdr: R) -> Result<Self> {
        serde_yaml::from_reader(rdr).map_err(|e| storage_error(format!("Error load options: {}", e)))
    }
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
    pub fn catalog_ttl(&self) -> Duration {
        Duration::from_secs(self.catalog_ttl)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_yaml_keeps_defaults() {
        let opt = Options::from_reader("page_size: 50\ntimeout: 3\n".as_bytes()).unwrap();
        assert_eq!(opt.page_size, 50);
        assert_eq!(opt.timeout(), Duration::from_secs(3));
        assert_eq!(opt.catalog_url, api::CATALOG_URL);
        assert_eq!(opt.catalog_ttl(), cache::CATALOG_TTL);
    }
}
