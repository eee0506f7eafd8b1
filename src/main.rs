//! Monkey CLI

use clap::error::ErrorKind;
use clap::{Parser, ValueEnum};

const USAGE: &str = "usage: monkey [i|c] (i: interpreter mode, c: compiler mode)";

#[derive(Parser)]
#[command(name = "monkey", version, about = "The Monkey programming language")]
struct Cli {
    /// Backend to start
    #[arg(value_enum)]
    mode: Mode,
}

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    /// Tree-walking interpreter REPL
    #[value(name = "i")]
    Interpreter,
    /// Bytecode compiler + VM REPL
    #[value(name = "c")]
    Compiler,
}

fn main() -> rustyline::Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(error)
            if matches!(
                error.kind(),
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion
            ) =>
        {
            let _ = error.print();
            return Ok(());
        }
        Err(_) => {
            println!("{USAGE}");
            return Ok(());
        }
    };

    println!("Hello! This is the Monkey programming language!");
    println!("Feel free to type in commands");

    match cli.mode {
        Mode::Interpreter => monkey::repl::start_interpreter(),
        Mode::Compiler => monkey::repl::start_compiler(),
    }
}
