//! Thin front-end: read a binary image from disk, run it to completion
//! against process stdin/stdout/stderr.

use std::process::ExitCode;

use clap::Parser;
use ijvm_engine::Interpreter;
use ijvm_image::BinaryImage;

#[derive(Parser)]
#[command(name = "ijvm", about = "Run a compact stack-based IJVM-style program image")]
struct Args {
    /// path to the binary program image
    image: std::path::PathBuf,

    /// increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    let image = match BinaryImage::load_path(&args.image) {
        Ok(image) => image,
        Err(err) => {
            eprintln!("ijvm: couldn't load {}: {err}", args.image.display());
            return ExitCode::FAILURE;
        }
    };

    let mut interpreter = Interpreter::new();
    interpreter.load_image(image);
    interpreter.run();

    match interpreter.last_trap() {
        Some(trap) => {
            eprintln!("ijvm: halted on trap: {trap}");
            ExitCode::FAILURE
        }
        None => ExitCode::SUCCESS,
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| level.into());
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
