//! Command line driver: compile IR text to a Turing machine transition table.

use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use bumpalo::Bump;
use clap::Parser;

use tmgen::ir::Module;
use tmgen::tape::backend::{session_for, TapeBackend};

#[derive(Parser)]
#[command(name = "tmgen")]
#[command(about = "Compile register-machine IR to a Turing machine transition table.")]
struct Cli {
    /// Input IR file; reads stdin when omitted.
    input: Option<PathBuf>,

    /// Write the transition table here instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print generation statistics to stderr.
    #[arg(long)]
    stats: bool,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("tmgen: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), String> {
    let text = match &cli.input {
        Some(path) => fs::read_to_string(path)
            .map_err(|e| format!("cannot read {}: {e}", path.display()))?,
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|e| format!("cannot read stdin: {e}"))?;
            buffer
        }
    };

    let module = Module::parse(&text).map_err(|e| e.to_string())?;

    let arena = Bump::new();
    let session = session_for(&arena, &module);
    TapeBackend::new(&session)
        .translate(&module)
        .map_err(|e| e.to_string())?;

    if cli.stats {
        eprint!("{}", session.stats());
    }
    let program = session.finish();

    match &cli.output {
        Some(path) => fs::write(path, program.to_string())
            .map_err(|e| format!("cannot write {}: {e}", path.display()))?,
        None => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            write!(out, "{program}").map_err(|e| format!("cannot write stdout: {e}"))?;
        }
    }
    Ok(())
}
