use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "tim")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Interpreter for the tim list language", long_about = None)]
pub struct Args {
    /// Program to run. Reads stdin when neither FILE nor --eval is given.
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    #[arg(short, long, value_name = "SOURCE", conflicts_with = "file")]
    pub eval: Option<String>,

    #[arg(long = "color", value_name = "WHEN", default_value = "auto")]
    pub color: ColorChoice,

    /// -v for debug logs, -vv for trace logs. RUST_LOG takes precedence.
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Print each top-level result on its own line.
    #[arg(long = "results")]
    pub results: bool,

    /// Dump the token stream instead of running.
    #[arg(long = "tokens")]
    pub tokens: bool,

    /// Dump the parsed statements instead of running.
    #[arg(long = "ast", conflicts_with = "tokens")]
    pub ast: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate shell completions.
    Complete {
        #[arg(value_name = "SHELL")]
        shell: Shell,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorChoice {
    Auto,
    Always,
    Never,
}

impl std::str::FromStr for ColorChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(ColorChoice::Auto),
            "always" => Ok(ColorChoice::Always),
            "never" => Ok(ColorChoice::Never),
            _ => Err(format!(
                "Invalid color choice: {}. Must be 'auto', 'always', or 'never'",
                s
            )),
        }
    }
}

pub fn generate_completions(shell: Shell) {
    let mut cmd = Args::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, &bin_name, &mut io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_file_and_flags() {
        let args = Args::try_parse_from(["tim", "main.tim", "-vv", "--results", "--color", "never"]).unwrap();
        assert_eq!(args.file, Some(PathBuf::from("main.tim")));
        assert_eq!(args.verbose, 2);
        assert!(args.results);
        assert_eq!(args.color, ColorChoice::Never);
    }

    #[test]
    fn test_eval_conflicts_with_file() {
        assert!(Args::try_parse_from(["tim", "main.tim", "-e", "(1)"]).is_err());
    }

    #[test]
    fn test_invalid_color() {
        assert!(Args::try_parse_from(["tim", "--color", "sometimes"]).is_err());
    }

    #[test]
    fn test_command_is_well_formed() {
        Args::command().debug_assert();
    }
}
