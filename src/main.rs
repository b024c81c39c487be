use undocalc::Calculator;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use clap::Parser;

/// Line-oriented integer calculator with undo (u), redo (r) and evaluate (=).
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Read expressions from this file instead of standard input
    input: Option<PathBuf>,
    /// Don't print error messages, only results
    #[arg(short, long)]
    quiet: bool,
}

fn open_input(path: Option<&Path>) -> Result<Box<dyn BufRead>> {
    Ok(match path {
        Some(path) => {
            let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
            Box::new(BufReader::new(file))
        },
        None => Box::new(io::stdin().lock())
    })
}

// Bytes that aren't UTF-8 become U+FFFD and get reported as invalid characters by the calculator
fn run(mut reader: impl BufRead, out: &mut impl Write, quiet: bool) -> Result<()> {
    let mut calc = Calculator::new();
    let mut raw = Vec::new();
    loop {
        raw.clear();
        if reader.read_until(b'\n', &mut raw).context("reading input")? == 0 { break }
        let line = String::from_utf8_lossy(&raw);
        let line = line.strip_suffix('\n').unwrap_or(&line);
        let line = line.strip_suffix('\r').unwrap_or(line);
        for output in calc.process_line(line) {
            match output {
                Ok(value) => writeln!(out, "{}", value)?,
                Err(e) if !quiet => writeln!(out, "Error: {}", e)?,
                Err(_) => ()
            }
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    pretty_env_logger::init();
    let args = Args::parse();
    log::debug!("Command line arguments: {:?}", args);

    let reader = open_input(args.input.as_deref())?;
    let stdout = io::stdout();
    run(reader, &mut stdout.lock(), args.quiet)
}
