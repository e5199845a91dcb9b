use crate::types::{normalize_index, Attempt, IndexCheck, ProblemKey, Submission, UserProgress};
use log::debug;
use std::collections::hash_map::Entry;

/// Folds a submission history into solved keys and per-problem attempts.
///
/// The result depends only on the submissions, never on earlier state.
/// Name and tags of an attempt come from the first submission seen for its
/// problem; the last verdict from the most recent one.
pub fn reconcile<'a, I>(submissions: I) -> UserProgress
where
    I: IntoIterator<Item = &'a Submission>,
{
    let check = IndexCheck::new();
    let mut ret = UserProgress::default();
    let mut dropped = 0usize;
    for s in submissions {
        let index = normalize_index(&s.problem.index);
        if !check.is_valid(&index) {
            dropped += 1;
            continue;
        }
        let key = s.problem.key();
        let attempt = match ret.attempted.entry(key.clone()) {
            Entry::Occupied(e) => e.into_mut(),
            Entry::Vacant(e) => e.insert(Attempt {
                key: key.clone(),
                contest_id: s.problem.contest_id,
                link: s.problem.link(),
                index,
                name: s.problem.name.clone(),
                tags: s.problem.tags.clone(),
                attempts: 0,
                last_verdict: None,
                last_time: i64::MIN,
            }),
        };
        attempt.attempts += 1;
        if s.creation_time >= attempt.last_time {
            attempt.last_time = s.creation_time;
            attempt.last_verdict = s.verdict.clone();
        }
        if s.is_accepted() {
            ret.solved.insert(key);
        }
    }
    if dropped != 0 {
        debug!("Dropped {} submissions with malformed problem index", dropped);
    }
    ret
}

/// Attempts whose problem was never accepted, most recent first.
pub fn attempted_unsolved(progress: &UserProgress) -> Vec<Attempt> {
    let mut ret: Vec<Attempt> = progress
        .attempted
        .values()
        .filter(|a| !progress.solved.contains(&a.key))
        .cloned()
        .collect();
    ret.sort_by(|a, b| b.last_time.cmp(&a.last_time).then_with(|| a.key.cmp(&b.key)));
    ret
}

pub fn is_solved(progress: &UserProgress, key: &ProblemKey) -> bool {
    progress.solved.contains(key)
}
