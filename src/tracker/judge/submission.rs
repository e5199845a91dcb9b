use super::{parse_api, request, Transport};
use crate::{
    error::{Error, Kind, Result},
    options::Options,
    types::Submission,
};
use log::{debug, info};
use serde_json::Value;

/// One page: the number of records the server sent and the ones that decoded.
struct Page {
    sent: usize,
    submissions: Vec<Submission>,
}

async fn fetch_page<T: Transport + ?Sized>(
    transport: &T,
    options: &Options,
    handle: &str,
    from: usize,
    count: usize,
) -> Result<Page> {
    let body = request(
        transport,
        &options.status_url,
        &[
            ("handle", handle.to_string()),
            ("from", from.to_string()),
            ("count", count.to_string()),
        ],
        options.timeout(),
    )
    .await?;
    let records: Vec<Value> = parse_api(&body)?;
    let sent = records.len();
    let submissions: Vec<Submission> = records
        .into_iter()
        .filter_map(|v| match serde_json::from_value(v) {
            Ok(s) => Some(s),
            Err(e) => {
                debug!("Skipping submission record of {}: {}", handle, e);
                None
            }
        })
        .collect();
    Ok(Page { sent, submissions })
}

/// Reads the complete submission history of `handle`, page by page.
///
/// Stops at the first empty or short page. A failed page fails the whole
/// history; nothing partial is returned.
pub async fn fetch_all_submissions<T: Transport + ?Sized>(
    transport: &T,
    options: &Options,
    handle: &str,
) -> Result<Vec<Submission>> {
    let count = options.page_size.max(1);
    let mut from = 1;
    let mut ret = Vec::new();
    loop {
        let page = fetch_page(transport, options, handle, from, count)
            .await
            .map_err(|e| {
                Error::with_description(
                    Kind::SubmissionsUnavailable,
                    format!("{} from #{}", handle, from),
                )
                .caused_by(e)
            })?;
        debug!(
            "Got {} of {} submissions of {} from #{}",
            page.submissions.len(),
            page.sent,
            handle,
            from
        );
        ret.extend(page.submissions);
        if page.sent < count {
            break;
        }
        from += count;
    }
    info!("Loaded {} submissions of {}", ret.len(), handle);
    Ok(ret)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::judge::fake::{FakeTransport, Script};

    fn page(start: usize, len: usize) -> String {
        let items: Vec<String> = (start..start + len)
            .map(|i| {
                format!(
                    r#"{{"id":{},"creationTimeSeconds":{},"problem":{{"contestId":{},"index":"A","name":"p"}},"verdict":"WRONG_ANSWER"}}"#,
                    i,
                    i,
                    i % 50 + 1
                )
            })
            .collect();
        format!(r#"{{"status":"OK","result":[{}]}}"#, items.join(","))
    }

    fn options() -> Options {
        Options {
            status_url: "status".into(),
            ..Options::default()
        }
    }

    #[tokio::test]
    async fn stops_after_short_page() {
        let t = FakeTransport::default()
            .route("status", Script::Reply(200, page(0, 1000)))
            .route("status", Script::Reply(200, page(1000, 1000)))
            .route("status", Script::Reply(200, page(2000, 437)));
        let all = fetch_all_submissions(&t, &options(), "tourist").await.unwrap();
        assert_eq!(all.len(), 2437);
        assert_eq!(t.calls("status"), 3);
        let froms: Vec<String> = t
            .log
            .lock()
            .unwrap()
            .iter()
            .map(|(_, q)| q.iter().find(|(k, _)| k == "from").unwrap().1.clone())
            .collect();
        assert_eq!(froms, vec!["1", "1001", "2001"]);
    }

    #[tokio::test]
    async fn stops_on_empty_page() {
        let t = FakeTransport::default()
            .route("status", Script::Reply(200, page(0, 1000)))
            .route("status", Script::Reply(200, page(0, 0)));
        let all = fetch_all_submissions(&t, &options(), "tourist").await.unwrap();
        assert_eq!(all.len(), 1000);
        assert_eq!(t.calls("status"), 2);
    }

    #[tokio::test]
    async fn failed_page_discards_history() {
        let t = FakeTransport::default()
            .route("status", Script::Reply(200, page(0, 1000)))
            .route(
                "status",
                Script::Reply(200, r#"{"status":"FAILED","comment":"Call limit exceeded"}"#.into()),
            );
        let err = fetch_all_submissions(&t, &options(), "tourist")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), &Kind::SubmissionsUnavailable);
        assert_eq!(t.calls("status"), 2);
    }

    #[tokio::test]
    async fn bad_records_are_skipped_not_fatal() {
        let body = r#"{"status":"OK","result":[
            {"id":1,"creationTimeSeconds":10,"problem":{"contestId":1,"index":"A","name":"a"},"verdict":"OK"},
            {"id":2,"creationTimeSeconds":11,"problem":{"contestId":2,"index":null},"verdict":"OK"},
            {"id":3,"problem":"not a problem"},
            {"id":4,"creationTimeSeconds":12,"problem":{"contestId":3,"index":5},"verdict":"WRONG_ANSWER"}
        ]}"#;
        let t = FakeTransport::default().route("status", Script::Reply(200, body.into()));
        let all = fetch_all_submissions(&t, &options(), "tourist").await.unwrap();
        let ids: Vec<u64> = all.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 2, 4]);

        let progress = crate::reconcile::reconcile(&all);
        assert_eq!(progress.solved.len(), 1);
        assert!(progress.solved.contains(&crate::types::make_key(1, "A")));
        assert_eq!(progress.attempted.len(), 2);
    }

    #[tokio::test]
    async fn page_counts_skipped_records() {
        let opt = Options {
            page_size: 2,
            ..options()
        };
        let t = FakeTransport::default()
            .route(
                "status",
                Script::Reply(
                    200,
                    r#"{"status":"OK","result":[{"id":1,"problem":{"contestId":1,"index":"A"}},{"id":2,"problem":7}]}"#.into(),
                ),
            )
            .route("status", Script::Reply(200, page(0, 0)));
        let all = fetch_all_submissions(&t, &opt, "tourist").await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(t.calls("status"), 2);
    }

    #[tokio::test]
    async fn zero_page_size_still_asks_for_records() {
        let opt = Options {
            page_size: 0,
            ..options()
        };
        let t = FakeTransport::default().route("status", Script::Reply(200, page(0, 0)));
        fetch_all_submissions(&t, &opt, "tourist").await.unwrap();
        let log = t.log.lock().unwrap();
        let count = log[0].1.iter().find(|(k, _)| k == "count").unwrap();
        assert_eq!(count.1, "1");
    }
}
