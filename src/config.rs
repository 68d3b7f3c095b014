use crate::cli::{Args, ColorChoice};

/// What to do with the program once it is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Run,
    DumpTokens,
    DumpAst,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub color_enabled: bool,
    /// Default `tracing` filter, used when RUST_LOG is unset.
    pub log_filter: &'static str,
    pub print_results: bool,
    pub mode: Mode,
    /// Name shown in diagnostics.
    pub source_name: String,
}

impl AppConfig {
    pub fn from_args(args: &Args) -> Self {
        let color_enabled = match args.color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => atty::is(atty::Stream::Stderr) && atty::is(atty::Stream::Stdout),
        };

        let log_filter = match args.verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        };

        let mode = if args.tokens {
            Mode::DumpTokens
        } else if args.ast {
            Mode::DumpAst
        } else {
            Mode::Run
        };

        let source_name = match (&args.file, &args.eval) {
            (Some(path), _) => path.display().to_string(),
            (None, Some(_)) => "<eval>".to_string(),
            (None, None) => "<stdin>".to_string(),
        };

        AppConfig {
            color_enabled,
            log_filter,
            print_results: args.results,
            mode,
            source_name,
        }
    }
}
