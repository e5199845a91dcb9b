extern crate serde;
extern crate serde_json;

use super::{request, Transport};
use crate::{
    error::{malformed, Error, Kind, Result},
    options::Options,
    types::{Problem, ProblemKey},
};
use log::{info, warn};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::{collections::HashMap, time::Duration};

#[derive(Deserialize)]
struct Statistic {
    #[serde(rename = "contestId", default)]
    contest_id: Option<u32>,
    #[serde(default)]
    index: String,
    #[serde(rename = "solvedCount", default)]
    solved_count: u32,
}

/// Layouts a catalog body may arrive in.
#[derive(Debug)]
enum Shape {
    /// `{result: {problems: [...], problemStatistics: [...]}}`
    Nested {
        problems: Value,
        statistics: Option<Value>,
    },
    /// `[...]`
    Flat(Value),
    /// `{"a": [...], "b": [...]}`
    Keyed(Map<String, Value>),
}

fn detect(value: Value) -> Result<Shape> {
    match value {
        Value::Array(_) => Ok(Shape::Flat(value)),
        Value::Object(mut obj) => {
            if let Some(Value::Object(result)) = obj.get_mut("result") {
                if result.get("problems").map_or(false, Value::is_array) {
                    let problems = result.remove("problems").unwrap_or(Value::Null);
                    let statistics = result.remove("problemStatistics").filter(Value::is_array);
                    return Ok(Shape::Nested {
                        problems,
                        statistics,
                    });
                }
            }
            if let Some(Value::String(status)) = obj.get("status") {
                if status != "OK" {
                    let comment = obj
                        .get("comment")
                        .and_then(Value::as_str)
                        .unwrap_or(status.as_str())
                        .to_string();
                    return Err(Error::with_description(Kind::Api, comment));
                }
            }
            if !obj.is_empty() && obj.values().all(Value::is_array) {
                Ok(Shape::Keyed(obj))
            } else {
                Err(malformed("unrecognized catalog layout"))
            }
        }
        _ => Err(malformed("unrecognized catalog layout")),
    }
}

fn problems_of(value: Value) -> Result<Vec<Problem>> {
    serde_json::from_value(value).map_err(malformed)
}

/// Turns any accepted catalog body into one ordered problem list, with
/// global solve counts merged in when the body carries them.
pub fn normalize(body: &str) -> Result<Vec<Problem>> {
    let value: Value = serde_json::from_str(body).map_err(malformed)?;
    let mut problems = match detect(value)? {
        Shape::Nested {
            problems,
            statistics,
        } => {
            let mut problems = problems_of(problems)?;
            if let Some(stat) = statistics {
                let stat: Vec<Statistic> = serde_json::from_value(stat).map_err(malformed)?;
                let counts: HashMap<ProblemKey, u32> = stat
                    .into_iter()
                    .map(|s| {
                        let key = ProblemKey::new(
                            s.contest_id.map(|c| c.to_string()).unwrap_or_default(),
                            &s.index,
                        );
                        (key, s.solved_count)
                    })
                    .collect();
                for p in problems.iter_mut() {
                    p.solved_count = counts.get(&p.key()).copied().unwrap_or(0);
                }
            }
            problems
        }
        Shape::Flat(list) => problems_of(list)?,
        Shape::Keyed(map) => {
            let mut ret = Vec::new();
            for (_, list) in map {
                ret.extend(problems_of(list)?);
            }
            ret
        }
    };
    if problems.is_empty() {
        return Err(malformed("catalog without problems"));
    }
    problems.shrink_to_fit();
    Ok(problems)
}

async fn fetch_from<T: Transport + ?Sized>(
    transport: &T,
    url: &str,
    timeout: Duration,
) -> Result<Vec<Problem>> {
    normalize(&request(transport, url, &[], timeout).await?)
}

/// Loads the catalog from the primary source, falling back to the
/// secondary one on any failure.
pub async fn fetch_catalog<T: Transport + ?Sized>(
    transport: &T,
    options: &Options,
) -> Result<Vec<Problem>> {
    let timeout = options.timeout();
    let primary = match fetch_from(transport, &options.catalog_url, timeout).await {
        Ok(v) => {
            info!("Loaded {} problems from {}", v.len(), options.catalog_url);
            return Ok(v);
        }
        Err(e) => e,
    };
    warn!(
        "Catalog from {} failed: {}. Trying {}",
        options.catalog_url, primary, options.fallback_catalog_url
    );
    match fetch_from(transport, &options.fallback_catalog_url, timeout).await {
        Ok(v) => {
            info!(
                "Loaded {} problems from {}",
                v.len(),
                options.fallback_catalog_url
            );
            Ok(v)
        }
        Err(e) => Err(Error::with_description(
            Kind::CatalogUnavailable,
            format!("primary: {}", primary),
        )
        .caused_by(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::judge::fake::{FakeTransport, Script};

    const NESTED: &str = r#"{"status":"OK","result":{
        "problems":[
            {"contestId":1,"index":"A","name":"Theatre Square","tags":["math"],"rating":1000},
            {"contestId":1,"index":"B","name":"Spreadsheet","tags":["implementation"]},
            {"contestId":2,"index":"a","name":"Winner","tags":[]}
        ],
        "problemStatistics":[
            {"contestId":1,"index":"A","solvedCount":100},
            {"contestId":2,"index":"A","solvedCount":7},
            {"contestId":2,"index":"A","solvedCount":9}
        ]}}"#;

    fn options() -> Options {
        Options {
            catalog_url: "primary".into(),
            fallback_catalog_url: "secondary".into(),
            ..Options::default()
        }
    }

    #[test]
    fn nested_merges_statistics() {
        let p = normalize(NESTED).unwrap();
        assert_eq!(p.len(), 3);
        assert_eq!(p[0].name, "Theatre Square");
        assert_eq!(p[0].rating, Some(1000));
        assert_eq!(p[0].solved_count, 100);
        assert_eq!(p[1].solved_count, 0);
        // duplicate statistic keys: last one wins
        assert_eq!(p[2].solved_count, 9);
    }

    #[test]
    fn flat_and_keyed_shapes() {
        let flat = normalize(r#"[{"contestId":3,"index":"C","name":"x","solvedCount":4}]"#).unwrap();
        assert_eq!(flat[0].key().as_str(), "3-C");
        assert_eq!(flat[0].solved_count, 4);

        let keyed = normalize(
            r#"{"div2":[{"contestId":5,"index":"A","name":"a"}],
                "div1":[{"contestId":5,"index":"B","name":"b"},{"contestId":6,"index":"A","name":"c"}]}"#,
        )
        .unwrap();
        let keys: Vec<_> = keyed.iter().map(|p| p.key().to_string()).collect();
        assert_eq!(keys, vec!["5-A", "5-B", "6-A"]);
    }

    #[test]
    fn unknown_shapes_are_malformed() {
        for body in &["{}", "[]", "42", r#"{"result":{"rows":[]}}"#, "not json"] {
            assert_eq!(
                normalize(body).unwrap_err().kind(),
                &Kind::MalformedResponse,
                "{}",
                body
            );
        }
        assert_eq!(
            normalize(r#"{"status":"FAILED","comment":"Call limit exceeded"}"#)
                .unwrap_err()
                .kind(),
            &Kind::Api
        );
    }

    #[tokio::test]
    async fn primary_success_skips_fallback() {
        let t = FakeTransport::default()
            .route("primary", Script::Reply(200, NESTED.into()))
            .route("secondary", Script::Fail);
        let p = fetch_catalog(&t, &options()).await.unwrap();
        assert_eq!(p.len(), 3);
        assert_eq!(t.calls("primary"), 1);
        assert_eq!(t.calls("secondary"), 0);
    }

    #[tokio::test]
    async fn server_error_falls_back_once() {
        let t = FakeTransport::default()
            .route("primary", Script::Reply(500, "oops".into()))
            .route(
                "secondary",
                Script::Reply(200, r#"{"result":{"problems":[{"contestId":9,"index":"Z","name":"z"}]}}"#.into()),
            );
        let p = fetch_catalog(&t, &options()).await.unwrap();
        assert_eq!(p[0].key().as_str(), "9-Z");
        assert_eq!(t.calls("primary"), 1);
        assert_eq!(t.calls("secondary"), 1);
    }

    #[tokio::test]
    async fn malformed_primary_falls_back() {
        let t = FakeTransport::default()
            .route("primary", Script::Reply(200, "<html></html>".into()))
            .route("secondary", Script::Reply(200, NESTED.into()));
        assert_eq!(fetch_catalog(&t, &options()).await.unwrap().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_then_fallback_failure_is_unavailable() {
        let t = FakeTransport::default()
            .route("primary", Script::Hang)
            .route("secondary", Script::Fail);
        let err = fetch_catalog(&t, &options()).await.unwrap_err();
        assert_eq!(err.kind(), &Kind::CatalogUnavailable);
        assert_eq!(t.calls("secondary"), 1);
    }
}
