use crate::{args::Args, MainError};
use log::{warn, Level, LevelFilter};
use simplelog::{
    format_description, Color, ColorChoice, ConfigBuilder, FormatItem, LevelPadding, TermLogger,
    TerminalMode,
};

/// RFC 3339 with milliseconds, the offset is shown even in UTC.
const TIMESTAMP_FORMAT: &[FormatItem<'_>] = format_description!(
    "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3][offset_hour sign:mandatory]:[offset_minute]"
);

/// `--quiet` wins over any number of `-v`.
fn level_filter(quiet: bool, verbose: u8) -> LevelFilter {
    match (quiet, verbose) {
        (true, _) => LevelFilter::Error,
        (false, 0) => LevelFilter::Info,
        (false, 1) => LevelFilter::Debug,
        (false, _) => LevelFilter::Trace,
    }
}

/// Log to the terminal, only the records of this crate.
///
/// Jobs and triggers run on different threads, so from debug level the thread is shown.
/// If the local offset cannot be determined, for example in a multithreaded
/// process on some platforms, the timestamps fall back to UTC.
pub fn init_logger(args: &Args) -> Result<(), MainError> {
    let mut builder = ConfigBuilder::new();
    builder
        .add_filter_allow_str(env!("CARGO_CRATE_NAME"))
        .set_level_color(Level::Debug, Some(Color::Magenta))
        .set_level_color(Level::Trace, None)
        .set_level_padding(LevelPadding::Right)
        .set_target_level(LevelFilter::Off)
        .set_thread_level(LevelFilter::Debug)
        .set_time_format_custom(TIMESTAMP_FORMAT);
    let is_local = builder.set_time_offset_to_local().is_ok();

    TermLogger::init(
        level_filter(args.quiet, args.verbose),
        builder.build(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )?;

    if !is_local {
        warn!("Cannot determine the local timezone, logging in UTC.");
    }
    if args.verbose > 2 {
        warn!("It won't get more verbose than tracing every git command.");
    }

    Ok(())
}
