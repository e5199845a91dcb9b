extern crate async_trait;
extern crate serde;
extern crate serde_json;
extern crate tokio;

use crate::error::{malformed, Error, Kind, Result};
use async_trait::async_trait;
use log::debug;
use serde::{de::DeserializeOwned, Deserialize};
use std::time::Duration;

pub mod catalog;
pub mod session;
pub mod submission;
pub mod user;

pub use session::Session;

#[derive(Debug, Clone)]
pub struct Reply {
    pub status: u16,
    pub body: String,
}

/// One GET round trip. Implemented over http by [`Session`].
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str, query: &[(&str, String)]) -> Result<Reply>;
}

#[derive(Deserialize)]
struct Envelope<T> {
    status: String,
    #[serde(default)]
    comment: Option<String>,
    result: Option<T>,
}

/// Sends the request, abandoning it after `timeout`. Only 2xx bodies are returned.
pub(crate) async fn request<T: Transport + ?Sized>(
    transport: &T,
    url: &str,
    query: &[(&str, String)],
    timeout: Duration,
) -> Result<String> {
    debug!("GET {} {:?}", url, query);
    let reply = tokio::time::timeout(timeout, transport.get(url, query))
        .await
        .map_err(|_| Error::with_kind(Kind::Timeout(timeout)))??;
    if (200..300).contains(&reply.status) {
        Ok(reply.body)
    } else {
        let err = Error::with_kind(Kind::Status(reply.status));
        Err(
            match serde_json::from_str::<Envelope<serde_json::Value>>(&reply.body) {
                Ok(Envelope {
                    comment: Some(c), ..
                }) => Error::with_description(Kind::Status(reply.status), c),
                _ => err,
            },
        )
    }
}

/// Unwraps the `{status, comment, result}` envelope of the judge api.
pub(crate) fn parse_api<T: DeserializeOwned>(body: &str) -> Result<T> {
    let envelope: Envelope<T> = serde_json::from_str(body).map_err(malformed)?;
    if envelope.status != "OK" {
        return Err(match envelope.comment {
            Some(c) => Error::with_description(Kind::Api, c),
            None => Error::with_description(Kind::Api, envelope.status),
        });
    }
    envelope
        .result
        .ok_or_else(|| malformed("response without result"))
}


#[cfg(test)]
mod tests {
    use super::{fake::*, *};

    #[tokio::test]
    async fn non_success_status_keeps_comment() {
        let t = FakeTransport::default().route(
            "u",
            Script::Reply(400, r#"{"status":"FAILED","comment":"handle: not found"}"#.into()),
        );
        let err = request(&t, "u", &[], Duration::from_secs(1)).await.unwrap_err();
        assert_eq!(err.kind(), &Kind::Status(400));
        assert_eq!(err.description(), Some("handle: not found"));
    }

    #[tokio::test(start_paused = true)]
    async fn hanging_request_times_out() {
        let t = FakeTransport::default().route("u", Script::Hang);
        let err = request(&t, "u", &[], Duration::from_secs(5)).await.unwrap_err();
        assert_eq!(err.kind(), &Kind::Timeout(Duration::from_secs(5)));
    }

    #[test]
    fn api_failure_status() {
        let err = parse_api::<Vec<u32>>(r#"{"status":"FAILED","comment":"limit"}"#).unwrap_err();
        assert_eq!(err.kind(), &Kind::Api);
        assert_eq!(parse_api::<Vec<u32>>(r#"{"status":"OK","result":[1]}"#).unwrap(), vec![1]);
        assert_eq!(
            parse_api::<Vec<u32>>("<html>").unwrap_err().kind(),
            &Kind::MalformedResponse
        );
    }
}
