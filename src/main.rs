extern crate clap;
extern crate pretty_env_logger;
extern crate termcolor;
extern crate tokio;

use cf_tracker::{Options, Tracker};
use clap::{crate_description, crate_name, Arg, Command};
use pretty_env_logger::init_timed;
use std::{fs::File, io::Write, path::PathBuf};
use termcolor::{ColorChoice, StandardStream, WriteColor};

#[macro_use]
mod color;
mod command {
    pub mod catalog;
    pub mod user;
}
mod read;
mod write;

use read::read_line;

const HELP: &str = r#"catalog   load the problem catalog
refresh   fetch the catalog again
ladder    problems of one rating
list      browse the catalog
user      load a handle
clear     forget the current user
stats     user and catalog summary
unsolved  attempted but unsolved problems
exit      quit"#;

fn options(stdout: &mut StandardStream, app: &clap::ArgMatches) -> Option<Options> {
    let mut ret = match app.value_of("config") {
        Some(f) => match File::open(f)
            .map_err(|e| e.to_string())
            .and_then(|v| Options::from_reader(v).map_err(|e| e.to_string()))
        {
            Ok(v) => v,
            Err(e) => {
                write_error!(stdout, "Error", "Error load config {}: {}", f, e);
                return None;
            }
        },
        None => Options::default(),
    };
    if let Some(p) = app.value_of("cache") {
        ret.cache_path = Some(PathBuf::from(p));
    }
    Some(ret)
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    init_timed();
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    let app = Command::new(crate_name!())
        .about(crate_description!())
        .version(get_version!("version"))
        .long_version(get_version!("long_version"))
        .arg(Arg::new("handle").help("Codeforces handle to load on start"))
        .arg(
            Arg::new("config")
                .long("config")
                .takes_value(true)
                .help("Yaml file overriding the built-in options"),
        )
        .arg(
            Arg::new("cache")
                .long("cache")
                .takes_value(true)
                .help("File keeping the cache between runs"),
        )
        .get_matches();
    let tracker = match options(&mut stdout, &app).map(Tracker::from_options) {
        Some(Ok(v)) => v,
        Some(Err(e)) => {
            write_error!(&mut stdout, "Error", "{}", e);
            return;
        }
        None => return,
    };
    match app.value_of("handle") {
        Some(h) => command::user::load(&mut stdout, &tracker, h).await,
        None => command::user::resume(&mut stdout, &tracker).await,
    }
    let _ = stdout.reset();
    while let Some(line) = read_line(&mut stdout, b"cf-tracker> ") {
        match line.as_str() {
            "" => (),
            "catalog" => command::catalog::load(&mut stdout, &tracker).await,
            "refresh" => command::catalog::refresh(&mut stdout, &tracker).await,
            "ladder" => command::catalog::ladder(&mut stdout, &tracker).await,
            "list" => command::catalog::list(&mut stdout, &tracker).await,
            "user" => command::user::select(&mut stdout, &tracker).await,
            "clear" => command::user::clear(&mut stdout, &tracker),
            "stats" => command::user::stats(&mut stdout, &tracker),
            "unsolved" => command::user::unsolved(&mut stdout, &tracker),
            "help" => {
                let _ = writeln!(&mut stdout, "{}", HELP);
            }
            "exit" => break,
            unknown => write_error!(
                &mut stdout,
                "Error",
                r#"cf-tracker: unknown command "{}", try "help""#,
                unknown
            ),
        }
        let _ = stdout.reset();
    }
}
