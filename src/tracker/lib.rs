pub mod cache;
pub(crate) mod config;
pub mod error;
pub mod judge;
pub mod metrics;
pub mod options;
pub mod query;
pub mod reconcile;
pub mod tracker;
pub mod types;

pub use crate::{
    error::{Error, Kind, Result},
    options::Options,
    tracker::{Snapshot, Status, Tracker},
    types::{make_key, Attempt, Problem, ProblemKey, Submission, UserInfo, UserProgress},
};
