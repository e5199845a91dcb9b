extern crate async_trait;
extern crate reqwest;

use super::{Reply, Transport};
use crate::error::{network_error, Result};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, Proxy};

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Http client talking to the judge.
#[derive(Clone)]
pub struct Session {
    client: Client,
}
impl Session {
    fn from_client(builder: ClientBuilder) -> Result<Self> {
        Ok(Session {
            client: builder
                .user_agent(USER_AGENT)
                .gzip(true)
                .build()
                .map_err(network_error)?,
        })
    }
    pub fn new() -> Result<Self> {
        Self::from_client(Client::builder())
    }
    pub fn with_proxy(proxy: Option<String>) -> Result<Self> {
        match proxy {
            Some(p) => Self::from_client(Client::builder().proxy(Proxy::https(p).map_err(network_error)?)),
            None => Self::new(),
        }
    }
}

#[async_trait]
impl Transport for Session {
    async fn get(&self, url: &str, query: &[(&str, String)]) -> Result<Reply> {
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(network_error)?;
        let status = response.status().as_u16();
        Ok(Reply {
            status,
            body: response.text().await.map_err(network_error)?,
        })
    }
}
