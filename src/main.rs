use clap::Parser;
use owo_colors::OwoColorize;
use std::io::{self, Read};
use std::process::ExitCode;
use tim::cli::{generate_completions, Args, Commands};
use tim::config::{AppConfig, Mode};
use tim::diagnostic::render_diagnostic;
use tim::format::render;
use tim::interpreter::{parse, Interpreter};
use tim::{tokenize, Error};

/// sysexits.h EX_NOINPUT
const EXIT_NO_INPUT: u8 = 66;

fn main() -> ExitCode {
    let args = Args::parse();

    if let Some(Commands::Complete { shell }) = args.command {
        generate_completions(shell);
        return ExitCode::SUCCESS;
    }

    let config = AppConfig::from_args(&args);
    init_tracing(&config);

    let source = match read_source(&args) {
        Ok(source) => source,
        Err(message) => {
            error_message(&config, &message);
            return ExitCode::from(EXIT_NO_INPUT);
        }
    };
    tracing::debug!(bytes = source.len(), name = %config.source_name, "read program");

    match execute(&source, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            let rendered = render_diagnostic(
                &source,
                &config.source_name,
                &error.to_diagnostic(),
                config.color_enabled,
            );
            eprint!("{}", rendered);
            ExitCode::from(error.exit_code())
        }
    }
}

fn execute(source: &str, config: &AppConfig) -> Result<(), Error> {
    let tokens = tokenize(source)?;
    if config.mode == Mode::DumpTokens {
        for token in &tokens {
            println!("{}", token);
        }
        return Ok(());
    }

    let statements = parse(tokens)?;
    if config.mode == Mode::DumpAst {
        for statement in &statements {
            println!("{:#?}", statement);
        }
        return Ok(());
    }

    let mut interpreter = Interpreter::new();
    let results = interpreter.interpret_or_exit(&statements, |error| {
        let rendered = render_diagnostic(
            source,
            &config.source_name,
            &error.to_diagnostic(),
            config.color_enabled,
        );
        eprint!("{}", rendered);
    });
    if config.print_results {
        for result in &results {
            println!("{}", render(result));
        }
    }
    Ok(())
}

fn read_source(args: &Args) -> Result<String, String> {
    if let Some(source) = &args.eval {
        return Ok(source.clone());
    }

    if let Some(path) = &args.file {
        return std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e));
    }

    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .map_err(|e| format!("Failed to read from stdin: {}", e))?;
    Ok(buffer)
}

fn init_tracing(config: &AppConfig) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.log_filter));
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(io::stderr)
                .with_ansi(config.color_enabled)
                .with_target(false)
                .without_time(),
        )
        .with(filter)
        .init();
}

fn error_message(config: &AppConfig, message: &str) {
    if config.color_enabled {
        eprintln!("{}", message.red().bold());
    } else {
        eprintln!("{}", message);
    }
}
