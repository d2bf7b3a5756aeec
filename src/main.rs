use std::io::BufRead;
use std::num::NonZeroUsize;
use std::process::ExitCode;

use clap::Parser;
use mips_interpret::batch::{interpret_all, BatchFlags};
use mips_interpret::err::Error;
use mips_interpret::parse::tokenize;

#[derive(Parser, Debug)]
#[command(author, version, about = "Explains the 32-bit encoding of MIPS instructions")]
struct Args {
    /// Instructions to interpret (e.g., "add $t0, $s1, $s2").
    /// If none are given, instructions are read from stdin, one per line.
    instructions: Vec<String>,
    /// Number of worker threads (defaults to the available parallelism)
    #[arg(short, long)]
    jobs: Option<NonZeroUsize>,
    /// Only print the hexadecimal encoding of each instruction
    #[arg(long)]
    hex: bool,
}

/// Reads instructions one per line, skipping lines that are blank or only a comment.
fn instruction_lines(reader: impl BufRead) -> std::io::Result<Vec<String>> {
    let mut lines = vec![];
    for line in reader.lines() {
        let line = line?;
        if tokenize(&line).is_ok() {
            lines.push(line);
        }
    }
    Ok(lines)
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let lines = match args.instructions.is_empty() {
        true => match instruction_lines(std::io::stdin().lock()) {
            Ok(lines) => lines,
            Err(e) => {
                eprintln!("error: could not read stdin: {e}");
                return ExitCode::FAILURE;
            }
        },
        false => args.instructions,
    };

    let mut flags = BatchFlags::default();
    if let Some(jobs) = args.jobs {
        flags.workers = jobs;
    }

    let mut failed = false;
    for (line, result) in lines.iter().zip(interpret_all(&lines, flags)) {
        match result {
            Ok(interp) if args.hex => println!("{}", interp.hex),
            Ok(interp) => println!("{interp}"),
            Err(e) => {
                failed = true;
                eprintln!("{}", line.trim());
                eprintln!("error ({} stage): {e}", e.stage());
                if let Some(help) = e.help() {
                    eprintln!("help: {help}");
                }
                if !args.hex {
                    eprintln!();
                }
            }
        }
    }

    match failed {
        true  => ExitCode::FAILURE,
        false => ExitCode::SUCCESS,
    }
}
