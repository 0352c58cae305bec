use clap::{Args, Parser, Subcommand, ValueEnum};
use miette::{IntoDiagnostic, Report, WrapErr};
use rpncalc::*;
use std::io::{self, BufRead, Write};

#[derive(Parser, Debug)]
#[command(version, about = "Reverse Polish Notation calculator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the tokens of an expression
    Tokenize {
        expression: String,
        #[arg(long, value_enum, default_value_t = Mode::Real)]
        mode: Mode,
    },
    /// Evaluate a single expression
    Eval {
        expression: String,
        #[command(flatten)]
        options: EvalOptions,
    },
    /// Evaluate expressions read line by line
    Calc {
        #[command(flatten)]
        options: EvalOptions,
    },
}

#[derive(Args, Debug, Clone, Copy)]
struct EvalOptions {
    #[arg(long, value_enum, default_value_t = Mode::Real)]
    mode: Mode,
    /// Which operand is the left-hand side of a binary operator
    #[arg(long, value_enum, default_value_t = Order::Accumulator)]
    order: Order,
    /// Print every evaluation step to stderr
    #[arg(long)]
    trace: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Real,
    Integer,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum Order {
    Accumulator,
    Stack,
}

impl From<Order> for OperandOrder {
    fn from(order: Order) -> Self {
        match order {
            Order::Accumulator => OperandOrder::AccumulatorFirst,
            Order::Stack => OperandOrder::StackFirst,
        }
    }
}

fn with_source(err: Error, input: &str) -> Report {
    Report::new(err).with_source_code(input.to_string())
}

fn tokenize<N: Number>(expression: &str) -> miette::Result<()> {
    for token in Lexer::<N>::new(expression) {
        match token {
            Ok(token) => println!("{token:?}"),
            Err(err) => return Err(with_source(err, expression)),
        }
    }
    Ok(())
}

fn eval<N: Number>(expression: &str, options: EvalOptions) -> miette::Result<N> {
    let evaluator = Evaluator::<N>::with_order(options.order.into());
    if !options.trace {
        return evaluator
            .evaluate(expression)
            .map_err(|err| with_source(err, expression));
    }

    let (result, steps) = evaluator
        .trace(expression)
        .map_err(|err| with_source(err, expression))?;
    for step in steps {
        eprintln!("{step}");
    }
    Ok(result)
}

fn calc<N: Number>(options: EvalOptions) -> miette::Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("calc> ");
        io::stdout()
            .flush()
            .into_diagnostic()
            .wrap_err("flushing stdout failed")?;

        let Some(line) = lines.next() else {
            println!();
            break;
        };
        let line = line.into_diagnostic().wrap_err("reading stdin failed")?;
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit") {
            break;
        }

        match eval::<N>(input, options) {
            Ok(res) => println!("{res}"),
            Err(report) => eprintln!("{report:?}"),
        }
    }
    Ok(())
}

fn main() -> miette::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Tokenize { expression, mode } => match mode {
            Mode::Real => tokenize::<f64>(&expression)?,
            Mode::Integer => tokenize::<i64>(&expression)?,
        },
        Commands::Eval {
            expression,
            options,
        } => match options.mode {
            Mode::Real => println!("{}", eval::<f64>(&expression, options)?),
            Mode::Integer => println!("{}", eval::<i64>(&expression, options)?),
        },
        Commands::Calc { options } => match options.mode {
            Mode::Real => calc::<f64>(options)?,
            Mode::Integer => calc::<i64>(options)?,
        },
    }

    Ok(())
}
