extern crate termcolor;

use std::{
    fmt::Display,
    io::{stdin, Write},
    str::FromStr,
};
use termcolor::{StandardStream, WriteColor};

/// Reads one trimmed line into `dest`. Returns `false` once stdin is closed.
pub fn read_line_to(stdout: &mut StandardStream, prompt: &[u8], dest: &mut String) -> bool {
    dest.clear();
    loop {
        let _ = stdout.write(prompt);
        let _ = stdout.flush();
        match stdin().read_line(dest) {
            Ok(0) => return false,
            Ok(_) => {
                let trim = dest.trim();
                *dest = trim.to_string();
                return true;
            }
            Err(e) => write_error!(stdout, "Error", "Read: {}", e),
        }
        let _ = stdout.reset();
    }
}
pub fn read_line(stdout: &mut StandardStream, prompt: &[u8]) -> Option<String> {
    let mut ret = String::new();
    if read_line_to(stdout, prompt, &mut ret) {
        Some(ret)
    } else {
        None
    }
}

/// Parses a value, asking again on bad input. An empty line gives `default`.
pub fn read_value<T>(stdout: &mut StandardStream, prompt: &[u8], default: T) -> Option<T>
where
    T: FromStr,
    T::Err: Display,
{
    let mut buf = String::new();
    loop {
        if !read_line_to(stdout, prompt, &mut buf) {
            return None;
        }
        if buf.is_empty() {
            return Some(default);
        }
        match buf.parse::<T>() {
            Ok(v) => return Some(v),
            Err(e) => write_error!(stdout, "Error", "parse {}: {}", buf, e),
        }
        let _ = stdout.reset();
    }
}

/// Like [`read_line`], with an empty answer mapped to `None`.
pub fn read_optional(stdout: &mut StandardStream, prompt: &[u8]) -> Option<Option<String>> {
    read_line(stdout, prompt).map(|s| if s.is_empty() { None } else { Some(s) })
}

pub fn read_yes(stdout: &mut StandardStream, prompt: &[u8]) -> bool {
    matches!(
        read_line(stdout, prompt).as_deref().map(str::to_ascii_lowercase).as_deref(),
        Some("y") | Some("yes")
    )
}
