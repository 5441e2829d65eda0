// wwec: WWE to C compiler

use std::fs;
use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use crossterm::style::{Color, Stylize};
use tracing::info;
use tracing_subscriber::EnvFilter;

use wwec::toolchain::Toolchain;
use wwec::CompileError;

/// What the compiler should produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Emit {
    /// Native executable (default)
    Exe,
    /// Generated C source
    C,
    /// Token listing, one `lexeme -> KIND` per line
    Tokens,
    /// Statement tree
    Ast,
    /// Archived scopes of the symbol table
    Symbols,
}

/// Compile WWE programs to native executables through C.
#[derive(Parser, Debug)]
#[command(name = "wwec", version, about = "Compile WWE programs to native executables through C")]
struct Cli {
    /// Path to the .wwe source file
    input: PathBuf,

    /// Output path: the executable, or the C file with `--emit c`
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// What to produce
    #[arg(long, value_enum, default_value = "exe")]
    emit: Emit,

    /// C compiler command, extra arguments allowed
    #[arg(long, env = "WWEC_CC", default_value = "cc")]
    cc: String,

    /// Keep the generated C next to the executable as `<output>_temp.c`
    #[arg(long)]
    keep_c: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(&cli) {
        report(&err);
        process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let source = fs::read_to_string(&cli.input)
        .with_context(|| format!("could not read '{}'", cli.input.display()))?;

    if cli.emit == Emit::Tokens {
        let mut out = io::stdout().lock();
        for token in wwec::tokenize(&source) {
            writeln!(out, "{}", token)?;
        }
        return Ok(());
    }

    info!("Parsing {}...", cli.input.display());
    let compilation = wwec::compile(&source)?;
    info!(
        "Parsed successfully. Found {} top-level statements.",
        compilation.program.statements.len()
    );

    match cli.emit {
        Emit::Tokens => {}
        Emit::Ast => print!("{}", compilation.program),
        Emit::Symbols => print!("{}", compilation.symbols.dump_history()),
        Emit::C => match &cli.output {
            Some(path) => fs::write(path, &compilation.c_source)
                .with_context(|| format!("could not write '{}'", path.display()))?,
            None => print!("{}", compilation.c_source),
        },
        Emit::Exe => {
            let output = cli
                .output
                .clone()
                .unwrap_or_else(|| default_executable(&cli.input));

            let built = Toolchain::new(cli.cc.as_str())
                .keep_c(cli.keep_c)
                .build(&compilation.c_source, &output)
                .context("translation failed")?;

            eprintln!(
                "{} {}",
                paint("Finished", Color::Green),
                built.executable.display()
            );
            if let Some(kept) = built.kept_source {
                eprintln!("{} {}", paint("Kept C source", Color::Green), kept.display());
            }
        }
    }

    Ok(())
}

/// Input path with its extension stripped
fn default_executable(input: &Path) -> PathBuf {
    input.with_extension("")
}

fn report(err: &anyhow::Error) {
    match err.downcast_ref::<CompileError>() {
        Some(compile_err) => {
            eprintln!("{}: {}", paint(compile_err.category(), Color::Red), compile_err)
        }
        None => eprintln!("{}: {:#}", paint("error", Color::Red), err),
    }
}

/// Bold colour on a terminal, plain text otherwise
fn paint(text: &str, color: Color) -> String {
    if io::stderr().is_terminal() {
        text.with(color).bold().to_string()
    } else {
        text.to_string()
    }
}
