use duration_string::DurationString;
use gumdrop::Options;

/// Keep one checkout per branch of a git remote in sync, triggered by push webhooks.
#[derive(Debug, Options)]
pub struct Args {
    /// The git remote, it has to match the repository URL of the push events.
    #[options(free)]
    pub remote_url: Option<String>,

    /// The directory holding one checkout for every branch.
    #[options(free)]
    pub base_dir: Option<String>,

    /// Sweep every branch with this delay, set to 0s to disable.
    ///
    /// Can be a number postfixed with s(econd), m(inutes), h(ours), d(ays)
    #[options(long = "every", default = "5m")]
    pub delay: DurationString,

    /// Runs an HTTP server on the address, that receives the push webhooks.
    #[options(no_short, default = "127.0.0.1:8080")]
    pub http: String,

    /// Sweep only once and exit. Useful for cronjobs.
    #[options()]
    pub once: bool,

    /// The git executable to run, it can contain additional arguments.
    #[options(no_short, default = "git")]
    pub git: String,

    /// Increase verbosity, can be set multiple times (-v debug, -vv tracing)
    #[options(count)]
    pub verbose: u8,

    /// Only print errors.
    #[options()]
    pub quiet: bool,

    /// Print the current version.
    #[options(short = "V")]
    pub version: bool,

    /// Print this help.
    #[options()]
    pub help: bool,
}

pub fn parse_args() -> Args {
    Args::parse_args_default_or_exit()
}
