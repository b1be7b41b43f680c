use std::{
    fs::read_to_string,
    path::{Path, PathBuf},
    process::ExitCode,
    time::Instant,
};

use clap::Parser;
use tracing::info;

use dsharp::{
    check_source,
    errors::errors::{Error, ErrorTip},
    get_line_at_position,
    logger::{self, LogLevel},
};

/// Parses and type checks a dsharp source file.
#[derive(Parser)]
#[command(version, about)]
struct Args {
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Log more of the pipeline, repeat for more detail
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let args = Args::parse();
    logger::init(LogLevel::from_verbosity(args.verbose));

    let file_name = args
        .input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| args.input.to_string_lossy().into_owned());

    let source = match read_to_string(&args.input) {
        Ok(source) => source,
        Err(error) => {
            eprintln!("Error: could not read {}: {}", args.input.display(), error);
            return ExitCode::FAILURE;
        }
    };

    let start = Instant::now();
    let result = check_source(&source, &file_name);
    info!("checked {} in {:?}", file_name, start.elapsed());

    match result {
        Ok(_) => {
            println!("{}: no errors", args.input.display());
            ExitCode::SUCCESS
        }
        Err(errors) => {
            for error in &errors {
                display_error(error, &source, &args.input);
            }

            eprintln!(
                "{} error{} found",
                errors.len(),
                if errors.len() == 1 { "" } else { "s" }
            );
            ExitCode::FAILURE
        }
    }
}

fn display_error(error: &Error, source: &str, file: &Path) {
    /*
        Error: name (tip)
        -> main.ds:20:9
           |
        20 | a := #
           | -----^
    */

    let position = error.get_position();

    match error.get_tip() {
        ErrorTip::None => eprintln!("Error: {}", error.get_error_name()),
        tip => eprintln!("Error: {} ({})", error.get_error_name(), tip),
    }
    eprintln!(
        "-> {}:{}:{}",
        file.display(),
        position.line,
        position.column
    );

    let Some(line_text) = get_line_at_position(source, position.line) else {
        eprintln!("{}", error);
        return;
    };

    let line_str = position.line.to_string();
    let padding = line_str.len() + 2;

    let trimmed = line_text.trim_start();
    let removed_whitespace = line_text.len() - trimmed.len();

    eprintln!("{:>padding$}", "|");
    eprintln!("{} | {}", line_str, trimmed.trim_end());

    let arrows = (position.column as usize)
        .saturating_sub(removed_whitespace)
        .max(1);

    eprintln!("{:>padding$} {:->arrows$}", "|", "^");
}
