extern crate termcolor;

use crate::{
    read::{read_line, read_value},
    write::{write_attempt, write_metrics, write_page_footer, write_result, write_status},
};
use cf_tracker::{query::paginate, Tracker};
use std::io::Write;
use termcolor::StandardStream;

const PER_PAGE: usize = 20;

pub async fn load(stdout: &mut StandardStream, tracker: &Tracker, handle: &str) {
    write_info!(stdout, "Info", "Loading submissions of {}", handle);
    if write_result(stdout, tracker.load_user(handle).await, "User loaded") {
        stats(stdout, tracker);
    }
}

pub async fn select(stdout: &mut StandardStream, tracker: &Tracker) {
    if let Some(handle) = read_line(stdout, b"Handle: ") {
        load(stdout, tracker, &handle).await;
    }
}

pub async fn resume(stdout: &mut StandardStream, tracker: &Tracker) {
    match tracker.resume().await {
        Ok(Some(handle)) => {
            write_ok!(stdout, "Resume", "Restored {}", handle);
            stats(stdout, tracker);
        }
        Ok(None) => (),
        Err(e) => write_error!(stdout, "Resume", "{}", e),
    }
}

pub fn clear(stdout: &mut StandardStream, tracker: &Tracker) {
    tracker.clear_user();
    write_ok!(stdout, "Success", "Forgot current user");
}

pub fn stats(stdout: &mut StandardStream, tracker: &Tracker) {
    let snap = tracker.snapshot();
    write_status(stdout, "Catalog", &snap.catalog_status);
    match &snap.handle {
        Some(h) => write_info!(stdout, "User", "{}", h),
        None => {
            write_warn!(stdout, "User", "none selected");
            return;
        }
    }
    if let Some(info) = &snap.user_info {
        write_info!(
            stdout,
            "Rating",
            "{} (max {}) {}",
            info.rating.map_or_else(|| "-".to_string(), |r| r.to_string()),
            info.max_rating
                .map_or_else(|| "-".to_string(), |r| r.to_string()),
            info.rank.as_deref().unwrap_or("")
        );
    } else if let Some(e) = snap.info_status.error() {
        write_warn!(stdout, "Rating", "{}", e);
    }
    write_status(stdout, "Progress", &snap.progress_status);
    write_metrics(stdout, &snap.metrics);
}

/// Problems tried but never accepted, most recent first.
pub fn unsolved(stdout: &mut StandardStream, tracker: &Tracker) {
    let list = tracker.attempted_unsolved();
    if list.is_empty() {
        write_info!(stdout, "Unsolved", "Nothing attempted and unsolved");
        return;
    }
    let page = match read_value(stdout, b"Page [1]: ", 1usize) {
        Some(v) => v,
        None => return,
    };
    let page = paginate(&list, page, PER_PAGE);
    for a in page.items {
        write_attempt(stdout, a);
    }
    write_page_footer(stdout, &page, list.len());
}
