//! Read-side helpers over a loaded catalog and a user's progress.

use crate::{
    reconcile::is_solved,
    types::{Problem, UserProgress},
};
use std::{cmp::Reverse, collections::BTreeMap, str::FromStr};

pub type TagCounts = BTreeMap<String, usize>;

pub fn tag_counts<'a, I: IntoIterator<Item = &'a Problem>>(problems: I) -> TagCounts {
    let mut ret = TagCounts::new();
    for p in problems {
        for t in &p.tags {
            *ret.entry(t.clone()).or_insert(0) += 1;
        }
    }
    ret
}

/// Most used tags first, ties by name.
pub fn sorted_tags(counts: &TagCounts) -> Vec<(&str, usize)> {
    let mut ret: Vec<(&str, usize)> = counts.iter().map(|(t, c)| (t.as_str(), *c)).collect();
    ret.sort_by_key(|(t, c)| (Reverse(*c), *t));
    ret
}

pub struct Ladder<'a> {
    pub problems: Vec<&'a Problem>,
    pub tags: TagCounts,
}

/// Problems rated exactly `rating`, optionally narrowed to one tag. Tag
/// counts cover every problem of the rating.
pub fn ladder<'a>(problems: &'a [Problem], rating: u32, tag: Option<&str>) -> Ladder<'a> {
    let rated: Vec<&Problem> = problems
        .iter()
        .filter(|p| p.rating == Some(rating))
        .collect();
    let tags = tag_counts(rated.iter().copied());
    Ladder {
        problems: rated
            .into_iter()
            .filter(|p| tag.map_or(true, |t| p.tags.iter().any(|x| x == t)))
            .collect(),
        tags,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Acceptance,
    Newest,
    Oldest,
}
impl Default for SortOrder {
    fn default() -> Self {
        Self::Newest
    }
}
impl FromStr for SortOrder {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "acceptance" => Ok(Self::Acceptance),
            "new" | "newest" => Ok(Self::Newest),
            "old" | "oldest" => Ok(Self::Oldest),
            other => Err(format!("unknown sort order {}", other)),
        }
    }
}

pub fn sort_problems(problems: &mut [&Problem], order: SortOrder) {
    let contest = |p: &Problem| p.contest_id.unwrap_or(0);
    match order {
        SortOrder::Acceptance => problems.sort_by_key(|p| Reverse(p.solved_count)),
        SortOrder::Newest => problems.sort_by_key(|p| Reverse(contest(*p))),
        SortOrder::Oldest => problems.sort_by_key(|p| contest(*p)),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserStatus {
    Solved,
    Failed,
    Unsolved,
}

pub fn status_of(problem: &Problem, progress: &UserProgress) -> UserStatus {
    let key = problem.key();
    if is_solved(progress, &key) {
        UserStatus::Solved
    } else if progress.attempted.contains_key(&key) {
        UserStatus::Failed
    } else {
        UserStatus::Unsolved
    }
}

pub fn hide_solved<'a>(problems: Vec<&'a Problem>, progress: &UserProgress) -> Vec<&'a Problem> {
    problems
        .into_iter()
        .filter(|p| status_of(p, progress) != UserStatus::Solved)
        .collect()
}

#[derive(Debug, PartialEq)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    pub page: usize,
    pub total_pages: usize,
}

/// 1-based pages; out of range requests land on the nearest page.
pub fn paginate<T>(items: &[T], page: usize, per_page: usize) -> Page<'_, T> {
    let per_page = per_page.max(1);
    let total_pages = ((items.len() + per_page - 1) / per_page).max(1);
    let page = page.max(1).min(total_pages);
    let begin = ((page - 1) * per_page).min(items.len());
    let end = (begin + per_page).min(items.len());
    Page {
        items: &items[begin..end],
        page,
        total_pages,
    }
}
