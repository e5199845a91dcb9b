use chrono::{DateTime, Local};
use std::{env, io::Write, path::Path, process::Command};
include!("./src/tracker/config.rs");

fn launch(cmd: &mut Command) -> String {
    cmd.output()
        .ok()
        .and_then(|v| String::from_utf8(v.stdout).ok())
        .unwrap_or_default()
}
fn exec<I: std::iter::IntoIterator<Item = impl AsRef<std::ffi::OsStr>>>(
    cmd: &str,
    args: I,
) -> String {
    launch(Command::new(cmd).args(args))
}
fn or_unknown(s: String) -> String {
    let trim = s.trim();
    if trim.is_empty() {
        "unknown".to_string()
    } else {
        trim.to_string()
    }
}

fn set_short_version(out_dir: &Path, date: &DateTime<Local>, branch: &str, profile: &str) {
    write!(
        std::fs::File::create(out_dir.join("version")).expect("Failed to create version file"),
        "(git@{} {} {}) {}",
        or_unknown(exec("git", &["log", "-1", "--pretty=format:%h"])),
        branch,
        date.format("%Y-%m-%d"),
        profile
    )
    .unwrap();
}
fn set_long_version(out_dir: &Path, date: &DateTime<Local>, branch: &str, profile: &str) {
    let mut f = std::io::BufWriter::new(
        std::fs::File::create(out_dir.join("long_version")).expect("Failed to create long version"),
    );
    writeln!(&mut f, "{}", profile).unwrap();
    writeln!(
        &mut f,
        "commit: {} git@{}",
        branch,
        or_unknown(exec("git", &["log", "-1", "--pretty=format:%H"]))
    )
    .unwrap();
    writeln!(
        &mut f,
        "rustc: {} {}",
        or_unknown(exec(
            env::var("RUSTC").unwrap_or_else(|_| "rustc".to_string()).as_str(),
            &["--version"]
        )),
        env::var("TARGET").unwrap_or_default()
    )
    .unwrap();
    writeln!(&mut f, "date: {}", date.to_rfc3339()).unwrap();
    writeln!(
        &mut f,
        "host: {}",
        or_unknown(launch(&mut Command::new("hostname")))
    )
    .unwrap();
    writeln!(
        &mut f,
        r#"api:
    catalog: {}
    fallback: {}
    status: {}
    info: {}"#,
        api::CATALOG_URL,
        api::FALLBACK_CATALOG_URL,
        api::STATUS_URL,
        api::INFO_URL
    )
    .unwrap();
    writeln!(
        &mut f,
        r#"fetch:
    page_size: {}
    timeout: {}s
cache:
    catalog_ttl: {}s
    "#,
        fetch::PAGE_SIZE,
        fetch::REQUEST_TIMEOUT.as_secs_f32(),
        cache::CATALOG_TTL.as_secs_f32()
    )
    .unwrap();
}
fn get_branch() -> String {
    let branch = exec("git", &["symbolic-ref", "--short", "-q", "HEAD"]);
    let trim = branch.trim();
    if trim.is_empty() {
        or_unknown(exec("git", &["describe", "--tags", "--exact-match", "HEAD"]))
    } else {
        trim.to_string()
    }
}

fn main() {
    let profile = env::var("PROFILE").unwrap();
    let buf = env::var("OUT_DIR").unwrap();
    let out_dir = Path::new(buf.as_str());
    let branch = get_branch();
    let time = Local::now();
    set_short_version(out_dir, &time, &branch, &profile);
    set_long_version(out_dir, &time, &branch, &profile);
}
