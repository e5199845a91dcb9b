extern crate regex;
extern crate serde;
extern crate serde_json;

use crate::config::api::PROBLEM_URL;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::{
    collections::{HashMap, HashSet},
    fmt,
};

const GYM_CONTEST_ID: u32 = 100_000;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Problem {
    #[serde(rename = "contestId", default, skip_serializing_if = "Option::is_none")]
    pub contest_id: Option<u32>,
    #[serde(default, deserialize_with = "lenient_index")]
    pub index: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<u32>,
    #[serde(rename = "solvedCount", default)]
    pub solved_count: u32,
}
/// Numbers are kept as text, anything else becomes empty and fails
/// the index check later.
fn lenient_index<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<String, D::Error> {
    Ok(match Option::<Value>::deserialize(d)? {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    })
}

impl Problem {
    pub fn key(&self) -> ProblemKey {
        ProblemKey::new(contest_text(self.contest_id), &self.index)
    }
    pub fn link(&self) -> String {
        problem_url(self.contest_id, &normalize_index(&self.index))
    }
}
impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.key(), self.name)
    }
}

/// Join key between the catalog and a submission history: `contest-INDEX`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProblemKey(String);

impl ProblemKey {
    pub fn new<C: fmt::Display>(contest: C, index: &str) -> Self {
        Self(format!(
            "{}-{}",
            contest.to_string().trim(),
            normalize_index(index)
        ))
    }
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}
impl fmt::Display for ProblemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

pub fn make_key<C: fmt::Display>(contest: C, index: &str) -> ProblemKey {
    ProblemKey::new(contest, index)
}
pub fn normalize_index(index: &str) -> String {
    index.trim().to_uppercase()
}

pub(crate) struct IndexCheck(Regex);
impl IndexCheck {
    pub(crate) fn new() -> Self {
        Self(Regex::new("^[[:alnum:]]+$").unwrap())
    }
    pub(crate) fn is_valid(&self, normalized: &str) -> bool {
        self.0.is_match(normalized)
    }
}

fn contest_text(contest: Option<u32>) -> String {
    contest.map(|c| c.to_string()).unwrap_or_default()
}
pub fn problem_url(contest: Option<u32>, index: &str) -> String {
    let contest = contest_text(contest);
    match contest.parse::<u32>() {
        Ok(id) if id >= GYM_CONTEST_ID => format!("{}/gym/{}/problem/{}", PROBLEM_URL, id, index),
        _ => format!("{}/contest/{}/problem/{}", PROBLEM_URL, contest, index),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Submission {
    #[serde(default)]
    pub id: u64,
    #[serde(rename = "creationTimeSeconds", default)]
    pub creation_time: i64,
    #[serde(default)]
    pub problem: Problem,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verdict: Option<String>,
}
impl Submission {
    pub fn is_accepted(&self) -> bool {
        self.verdict.as_deref() == Some(ACCEPTED)
    }
}
pub const ACCEPTED: &str = "OK";

/// Everything a user sent for one problem, folded into a single record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Attempt {
    pub key: ProblemKey,
    #[serde(rename = "contestId")]
    pub contest_id: Option<u32>,
    pub index: String,
    pub name: String,
    pub tags: Vec<String>,
    pub attempts: usize,
    #[serde(rename = "lastVerdict")]
    pub last_verdict: Option<String>,
    #[serde(rename = "lastTime")]
    pub last_time: i64,
    pub link: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserInfo {
    pub handle: String,
    #[serde(default)]
    pub rating: Option<i32>,
    #[serde(rename = "maxRating", default)]
    pub max_rating: Option<i32>,
    #[serde(default)]
    pub rank: Option<String>,
    #[serde(rename = "titlePhoto", default)]
    pub title_photo: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserProgress {
    pub solved: HashSet<ProblemKey>,
    pub attempted: HashMap<ProblemKey, Attempt>,
}
impl UserProgress {
    pub fn is_empty(&self) -> bool {
        self.attempted.is_empty() && self.solved.is_empty()
    }
}
