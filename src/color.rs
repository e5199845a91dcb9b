extern crate termcolor;

use std::io;
use termcolor::{Color, ColorSpec, StandardStream, WriteColor};

macro_rules! get_version {
    ($file:expr) => {
        concat!(
            env!("CARGO_PKG_VERSION"),
            " ",
            include_str!(concat!(env!("OUT_DIR"), "/", $file))
        )
    };
}

pub fn set_fg(stdout: &mut StandardStream, color: Option<Color>) -> io::Result<()> {
    stdout.set_color(ColorSpec::new().set_fg(color).set_intense(true))
}

/// Label in `color`, then the message in the default color.
macro_rules! write_color {
    ($dest:expr, $color:expr, $typ:expr, $($arg:tt)*) => {{
        let _ = $crate::color::set_fg($dest, Some($color));
        let _ = write!($dest, "{:>8}: ", $typ);
        let _ = $crate::color::set_fg($dest, None);
        let _ = writeln!($dest, $($arg)*);
    }};
}

macro_rules! write_error {
    ($dest:expr, $typ:expr, $($arg:tt)*) => {
        write_color!($dest, ::termcolor::Color::Red, $typ, $($arg)*)
    };
}

macro_rules! write_warn {
    ($dest:expr, $typ:expr, $($arg:tt)*) => {
        write_color!($dest, ::termcolor::Color::Yellow, $typ, $($arg)*)
    };
}

macro_rules! write_info {
    ($dest:expr, $typ:expr, $($arg:tt)*) => {
        write_color!($dest, ::termcolor::Color::Blue, $typ, $($arg)*)
    };
}

macro_rules! write_ok {
    ($dest:expr, $typ:expr, $($arg:tt)*) => {
        write_color!($dest, ::termcolor::Color::Green, $typ, $($arg)*)
    };
}
