use clap::{Parser, Subcommand};
use phoenix_bindgen::{generate_bindings, GenerateOptions, GeneratorError};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

/// Generate pybind11 binding fragments from parsed Phoenix headers
#[derive(Parser, Debug)]
#[command(name = "phoenix-bindgen")]
#[command(about = "Generate binding fragments from header metadata", long_about = None)]
struct Args {
    /// Log at debug level (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Transform every header and write `<stem>.gen.json` documents
    Generate {
        /// Directory holding header metadata (`*.json`) and configs (`*.toml`)
        #[arg(short, long)]
        input: PathBuf,

        /// Directory the generated documents are written to
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Run every pass without writing anything
    Check {
        #[arg(short, long)]
        input: PathBuf,
    },
}

fn run(args: Args) -> Result<(), GeneratorError> {
    let options = match args.command {
        Command::Generate { input, output } => GenerateOptions {
            input_dir: input,
            output_dir: Some(output),
        },
        Command::Check { input } => GenerateOptions {
            input_dir: input,
            output_dir: None,
        },
    };

    let result = generate_bindings(&options)?;
    let functions: usize = result.headers.iter().map(|h| h.functions.len()).sum();
    info!(
        headers = result.headers.len(),
        functions,
        written = result.written.len(),
        "generation complete"
    );
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    use tracing_subscriber::{fmt, EnvFilter};

    let default_level = if args.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(
                header = e.header.as_deref().unwrap_or("-"),
                function = e.function.as_deref().unwrap_or("-"),
                "{}",
                e
            );
            for hint in &e.hints {
                error!("hint: {}", hint);
            }
            ExitCode::FAILURE
        }
    }
}
