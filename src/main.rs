use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::Colorize;
use miette::Result;

use ls8::{Machine, Program, Terminal};

/// Emulator for the LS-8, an 8-bit teaching CPU.
#[derive(Parser)]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Quickly provide a `.ls8` file to run
    path: Option<PathBuf>,

    /// Print machine state before every instruction
    #[arg(short, long, env = "LS8_TRACE")]
    trace: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Run a `.ls8` program and print its output to the terminal
    Run {
        /// `.ls8` file to run
        name: PathBuf,
        /// Print machine state before every instruction
        #[arg(short, long, env = "LS8_TRACE")]
        trace: bool,
        /// Produce minimal output, suited for blackbox tests
        #[arg(short, long)]
        minimal: bool,
    },
    /// Load a `.ls8` file without running it
    Check {
        /// File to check
        name: PathBuf,
    },
}

fn main() -> miette::Result<()> {
    use MsgColor::*;
    let args = Args::parse();

    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new() //
                .context_lines(ls8::DIAGNOSTIC_CONTEXT_LINES)
                .build(),
        )
    }))?;

    if let Some(command) = args.command {
        match command {
            Command::Run {
                name,
                trace,
                minimal,
            } => run(&name, trace, minimal),
            Command::Check { name } => {
                file_message(Green, "Checking", &name);
                let program = Program::from_file(&name)?;
                let summary = format!("{} bytes, no errors found!", program.len());
                message(Green, "Success", summary.as_str());
                Ok(())
            }
        }
    } else if let Some(path) = args.path {
        run(&path, args.trace, false)
    } else {
        println!("\n~ ls8 v{VERSION} ~");
        println!("{SHORT_INFO}");
        std::process::exit(0);
    }
}

#[allow(unused)]
enum MsgColor {
    Green,
    Cyan,
    Red,
}

fn file_message(color: MsgColor, left: &str, right: &PathBuf) {
    let right = format!("target {}", right.display());
    message(color, left, right.as_str());
}

// Status lines go to stderr, stdout belongs to the running program
fn message<S>(color: MsgColor, left: S, right: S)
where
    S: Colorize + std::fmt::Display,
{
    let left = match color {
        MsgColor::Green => left.green(),
        MsgColor::Cyan => left.cyan(),
        MsgColor::Red => left.red(),
    };
    eprintln!("{left:>12} {right}");
}

fn run(name: &PathBuf, trace: bool, minimal: bool) -> Result<()> {
    if !minimal {
        file_message(MsgColor::Green, "Loading", name);
    }
    let program = Program::from_file(name)?;

    let mut machine = Machine::with_program(&program, Terminal::new(minimal))?;
    machine.set_trace(trace);

    if !minimal {
        message(MsgColor::Green, "Running", "loaded program");
    }
    machine.run()?;

    if !minimal {
        message(MsgColor::Cyan, "Halted", "");
        file_message(MsgColor::Green, "Completed", name);
    }
    Ok(())
}

const SHORT_INFO: &str = r"
Welcome to ls8, an emulator for the LS-8 8-bit teaching CPU.
Run a program with `ls8 <file.ls8>`.
Please use `-h` or `--help` to access the usage instructions and documentation.
";

const VERSION: &str = env!("CARGO_PKG_VERSION");
