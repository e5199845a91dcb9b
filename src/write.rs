extern crate termcolor;

use cf_tracker::{
    metrics::Metrics,
    query::{Page, UserStatus},
    Attempt, Problem, Result, Status,
};
use chrono::{Local, TimeZone};
use std::io::Write;
use termcolor::{Color, ColorSpec, StandardStream, WriteColor};

pub fn write_result(stdout: &mut StandardStream, result: Result<()>, success: &str) -> bool {
    match result {
        Ok(_) => {
            write_ok!(stdout, "Success", "{}", success);
            true
        }
        Err(e) => {
            write_error!(stdout, "Error", "{}", e);
            false
        }
    }
}

pub fn write_status(stdout: &mut StandardStream, what: &str, status: &Status) {
    match status {
        Status::Idle => write_info!(stdout, what, "not loaded"),
        Status::Fetching => write_info!(stdout, what, "loading"),
        Status::Ready => write_ok!(stdout, what, "ready"),
        Status::Failed(e) => write_error!(stdout, what, "{}", e),
    }
}

pub fn write_metrics(stdout: &mut StandardStream, metrics: &Metrics) {
    write_info!(
        stdout,
        "Stats",
        "{} problems, {} solved, {} attempted, {} not tried",
        metrics.total,
        metrics.solved,
        metrics.attempted,
        metrics.not_tried
    );
}

fn status_color(status: UserStatus) -> Option<Color> {
    match status {
        UserStatus::Solved => Some(Color::Green),
        UserStatus::Failed => Some(Color::Red),
        UserStatus::Unsolved => None,
    }
}

pub fn write_problem(stdout: &mut StandardStream, problem: &Problem, status: UserStatus) {
    let _ = stdout.set_color(ColorSpec::new().set_fg(status_color(status)));
    let _ = write!(stdout, "{:>10} ", problem.key());
    let _ = stdout.reset();
    let _ = writeln!(
        stdout,
        "{:<40} {:>5} {:>7}  {}",
        problem.name,
        problem
            .rating
            .map_or_else(|| "-".to_string(), |r| r.to_string()),
        problem.solved_count,
        problem.tags.join(",")
    );
}

pub fn write_attempt(stdout: &mut StandardStream, attempt: &Attempt) {
    let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Red)));
    let _ = write!(stdout, "{:>10} ", attempt.key);
    let _ = stdout.reset();
    let _ = writeln!(
        stdout,
        "{:<40} {:>3} tries  {:<20} {}  {}",
        attempt.name,
        attempt.attempts,
        attempt.last_verdict.as_deref().unwrap_or("-"),
        Local.timestamp(attempt.last_time, 0).format("%Y-%m-%d %H:%M"),
        attempt.link
    );
}

pub fn write_page_footer<T>(stdout: &mut StandardStream, page: &Page<'_, T>, total: usize) {
    write_info!(
        stdout,
        "Page",
        "{}/{} ({} items)",
        page.page,
        page.total_pages,
        total
    );
}
