use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Context;
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

use hiraya::{tokenizer, Program};

fn main() -> anyhow::Result<()> {
    initialize_logging()?;

    let cli = Hiraya::parse();

    match cli.subcmd {
        HirayaSubcommand::Run(run) => execute(run)?,
        HirayaSubcommand::Tokens(tokens) => {
            let source = hiraya::read_source(&tokens.source)?;
            let tokens = tokenizer::tokenize(&source);
            println!("{}", serde_json::to_string_pretty(&tokens)?);
        }
    }

    Ok(())
}

fn execute(run: Run) -> anyhow::Result<()> {
    let source = hiraya::read_source(&run.source)?;

    let program = Program::parse(&source)
        .with_context(|| format!("failed to parse {}", run.source.display()))?;
    debug!(
        tokens = program.tokens.len(),
        statements = program.statements.len(),
        "Parsed source file"
    );
    if run.emit.contains(&Emit::Tokens) {
        println!("{}", serde_json::to_string_pretty(&program.tokens)?);
    }
    if run.emit.contains(&Emit::Ast) {
        println!("{}", serde_json::to_string_pretty(&program.statements)?);
    }

    let interpreter = program
        .run(std::io::stdout())
        .with_context(|| format!("failed to run {}", run.source.display()))?;
    info!(statements = program.statements.len(), "Program finished");

    if run.emit.contains(&Emit::Bindings) {
        println!("{}", serde_json::to_string_pretty(interpreter.bindings())?);
    }

    Ok(())
}

fn initialize_logging() -> anyhow::Result<()> {
    let env_filter = env::var("RUST_LOG").unwrap_or_default();

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(EnvFilter::from_str(&env_filter)?),
        )
        .init();
    Ok(())
}

#[derive(clap::Parser)]
#[clap(name = "hiraya", about = "Run Hiraya scripts.")]
struct Hiraya {
    #[clap(subcommand)]
    subcmd: HirayaSubcommand,
}

#[derive(clap::Subcommand)]
enum HirayaSubcommand {
    /// Run a script
    Run(Run),
    /// Print the token list of a script as JSON
    Tokens(Tokens),
}

#[derive(clap::Parser)]
struct Run {
    /// Path to the source file
    source: PathBuf,

    /// Also print an intermediate stage as JSON (repeatable)
    #[clap(long, value_enum)]
    emit: Vec<Emit>,
}

#[derive(clap::Parser)]
struct Tokens {
    /// Path to the source file
    source: PathBuf,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
enum Emit {
    Tokens,
    Ast,
    Bindings,
}
