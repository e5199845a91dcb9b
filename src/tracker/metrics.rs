use crate::types::{Attempt, ProblemKey};
use serde::Serialize;
use std::collections::HashSet;

/// How the catalog splits for one user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Metrics {
    pub total: usize,
    pub solved: usize,
    pub attempted: usize,
    pub not_tried: usize,
}

pub fn compute(
    catalog: &HashSet<ProblemKey>,
    solved: &HashSet<ProblemKey>,
    attempted_unsolved: &[Attempt],
) -> Metrics {
    let solved_in = catalog.iter().filter(|k| solved.contains(*k)).count();
    let attempted = attempted_unsolved
        .iter()
        .map(|a| &a.key)
        .collect::<HashSet<_>>()
        .into_iter()
        .filter(|k| catalog.contains(*k))
        .count();
    Metrics {
        total: catalog.len(),
        solved: solved_in,
        attempted,
        not_tried: catalog.len().saturating_sub(solved_in + attempted),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::make_key;

    fn attempt(contest: u32, index: &str) -> Attempt {
        Attempt {
            key: make_key(contest, index),
            contest_id: Some(contest),
            index: index.to_string(),
            name: String::new(),
            tags: Vec::new(),
            attempts: 1,
            last_verdict: None,
            last_time: 0,
            link: String::new(),
        }
    }

    #[test]
    fn example_counts() {
        let catalog = vec![make_key(1, "A"), make_key(1, "B"), make_key(2, "A")]
            .into_iter()
            .collect();
        let solved = vec![make_key(1, "A")].into_iter().collect();
        let m = compute(&catalog, &solved, &[attempt(2, "A")]);
        assert_eq!(
            m,
            Metrics {
                total: 3,
                solved: 1,
                attempted: 1,
                not_tried: 1
            }
        );
    }

    #[test]
    fn outside_catalog_is_ignored_and_never_negative() {
        let catalog = vec![make_key(1, "A")].into_iter().collect();
        let solved = vec![make_key(1, "A"), make_key(9, "A")].into_iter().collect();
        let unsolved = vec![attempt(8, "A"), attempt(8, "B"), attempt(8, "B")];
        let m = compute(&catalog, &solved, &unsolved);
        assert_eq!(m.solved, 1);
        assert_eq!(m.attempted, 0);
        assert_eq!(m.not_tried, 0);

        let m = compute(&HashSet::new(), &solved, &unsolved);
        assert_eq!(m, Metrics::default());
    }
}
