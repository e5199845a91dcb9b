extern crate termcolor;

use crate::{
    read::{read_optional, read_value, read_yes},
    write::{write_page_footer, write_problem, write_result},
};
use cf_tracker::{
    query::{self, hide_solved, paginate, sort_problems, sorted_tags, status_of, SortOrder},
    Problem, Tracker,
};
use std::io::Write;
use termcolor::StandardStream;

const PER_PAGE: usize = 20;
const TOP_TAGS: usize = 10;

pub async fn load(stdout: &mut StandardStream, tracker: &Tracker) {
    if write_result(stdout, tracker.fetch_catalog_once().await, "Catalog ready") {
        summary(stdout, tracker);
    }
}

pub async fn refresh(stdout: &mut StandardStream, tracker: &Tracker) {
    if write_result(stdout, tracker.refresh_catalog().await, "Catalog refreshed") {
        summary(stdout, tracker);
    }
}

fn summary(stdout: &mut StandardStream, tracker: &Tracker) {
    let catalog = tracker.catalog();
    write_info!(stdout, "Catalog", "{} problems", catalog.problems.len());
    for (tag, count) in sorted_tags(&catalog.tags).into_iter().take(TOP_TAGS) {
        write_info!(stdout, "Tag", "{:<28} {}", tag, count);
    }
}

fn show(stdout: &mut StandardStream, tracker: &Tracker, mut problems: Vec<&Problem>) {
    let progress = tracker.progress();
    let order = match read_value(stdout, b"Sort (newest/oldest/acceptance): ", SortOrder::default())
    {
        Some(v) => v,
        None => return,
    };
    if !progress.is_empty() && read_yes(stdout, b"Hide solved [y/N]: ") {
        problems = hide_solved(problems, &progress);
    }
    sort_problems(&mut problems, order);
    let page = match read_value(stdout, b"Page [1]: ", 1usize) {
        Some(v) => v,
        None => return,
    };
    let page = paginate(&problems, page, PER_PAGE);
    for p in page.items {
        write_problem(stdout, p, status_of(p, &progress));
    }
    write_page_footer(stdout, &page, problems.len());
}

/// Problems of one rating, with the tag spread of that rating.
pub async fn ladder(stdout: &mut StandardStream, tracker: &Tracker) {
    if !write_result(stdout, tracker.fetch_catalog_once().await, "Catalog ready") {
        return;
    }
    let rating = match read_value(stdout, b"Rating [800]: ", 800u32) {
        Some(v) => v,
        None => return,
    };
    let tag = match read_optional(stdout, b"Tag (empty for all): ") {
        Some(v) => v,
        None => return,
    };
    let catalog = tracker.catalog();
    let ladder = query::ladder(&catalog.problems, rating, tag.as_deref());
    for (tag, count) in sorted_tags(&ladder.tags).into_iter().take(TOP_TAGS) {
        write_info!(stdout, "Tag", "{:<28} {}", tag, count);
    }
    if ladder.problems.is_empty() {
        write_warn!(stdout, "Ladder", "No problems rated {}", rating);
        return;
    }
    show(stdout, tracker, ladder.problems);
}

/// The whole catalog, optionally narrowed to one tag.
pub async fn list(stdout: &mut StandardStream, tracker: &Tracker) {
    if !write_result(stdout, tracker.fetch_catalog_once().await, "Catalog ready") {
        return;
    }
    let tag = match read_optional(stdout, b"Tag (empty for all): ") {
        Some(v) => v,
        None => return,
    };
    let catalog = tracker.catalog();
    let problems: Vec<&Problem> = catalog
        .problems
        .iter()
        .filter(|p| tag.as_ref().map_or(true, |t| p.tags.contains(t)))
        .collect();
    show(stdout, tracker, problems);
}
