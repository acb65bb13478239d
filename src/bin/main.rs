use monkey::{
    interpreter::Interpreter,
    parser::Parser,
    scanner::Scanner,
    value::Value,
};
use clap::Parser as _;
use std::{
    io::{self, Write},
    path::{Path, PathBuf},
};

const PROMPT: &str = ">> ";

const MONKEY_FACE: &str = r#"            __,__
   .--.  .-"     "-.  .--.
  / .. \/  .-. .-.  \/ .. \
 | |  '|  /   Y   \  |'  | |
 | \   \  \ 0 | 0 /  /   / |
  \ '- ,\.-"""""""-./, -' /
   ''-' /_   ^ ^   _\ '-''
       |  \._   _./  |
       \   \ '~' /   /
        '._ '-=-' _.'
           '-----'
"#;

/// Runs a Monkey script, or starts an interactive session when none is given.
#[derive(clap::Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Script to run
    script: Option<PathBuf>,
}

fn main() -> io::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.script {
        Some(path) => run_file(&path),
        None => run_prompt(),
    }
}

fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    // Only initialize if RUST_LOG is set
    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry()
            .with(fmt::layer().with_target(true).with_level(true).with_writer(io::stderr))
            .with(EnvFilter::from_default_env())
            .init();
    }
}

fn run_file(path: &Path) -> io::Result<()> {
    let contents = std::fs::read_to_string(path)?;
    let mut monkey = Monkey::new(io::stdout(), io::stderr());
    match monkey.run(contents.as_str())? {
        Outcome::ParseErrors => std::process::exit(65),
        Outcome::RuntimeError => std::process::exit(70),
        Outcome::Done => Ok(()),
    }
}

fn run_prompt() -> io::Result<()> {
    let mut buffer = String::new();
    let stdin = io::stdin();
    let mut out = io::stdout();

    let mut monkey = Monkey::new(io::stdout(), io::stderr());
    writeln!(out, "Welcome to the Monkey programming language!")?;

    loop {
        write!(out, "{}", PROMPT)?;
        out.flush()?;

        buffer.clear();

        let num_bytes = stdin.read_line(&mut buffer)?;
        if num_bytes == 0 || buffer.trim() == "exit" { break };

        monkey.run(buffer.as_str())?;
    }

    Ok(())
}

#[derive(Debug, PartialEq)]
enum Outcome {
    Done,
    ParseErrors,
    RuntimeError,
}

/// Parses and evaluates source text against one long-lived environment.
struct Monkey<Out, ErrOut> {
    interpreter: Interpreter,
    out: Out,
    err_out: ErrOut,
}

impl <Out: Write, ErrOut: Write> Monkey<Out, ErrOut> {
    fn new(out: Out, err_out: ErrOut) -> Self {
        Self {
            interpreter: Interpreter::default(),
            out,
            err_out,
        }
    }

    fn run(&mut self, source: &str) -> io::Result<Outcome> {
        let mut parser = Parser::new(Scanner::new(source));
        let program = parser.parse_program();

        let errors = parser.into_errors();
        if !errors.is_empty() {
            write!(self.err_out, "{}", MONKEY_FACE)?;
            writeln!(self.err_out, "Oops! We ran into some monkey business here!")?;
            writeln!(self.err_out, "\tParser errors:")?;
            for e in errors.iter() {
                writeln!(self.err_out, "\t{}", e)?;
            }
            return Ok(Outcome::ParseErrors)
        }

        match self.interpreter.interpret(&program) {
            Value::Null => Ok(Outcome::Done),
            error @ Value::Error(_) => {
                writeln!(self.err_out, "{}", error)?;
                Ok(Outcome::RuntimeError)
            },
            value => {
                writeln!(self.out, "{}", value)?;
                Ok(Outcome::Done)
            },
        }
    }
}
