//=====================================================
// File: main.rs
//=====================================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: Glint CLI entry point
// Objective: Command-line interface for running .glt scripts, dumping their
//            AST as JSON, and evaluating JSON-encoded programs
//=====================================================

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result, anyhow};
use clap::{Args as ClapArgs, Parser, Subcommand};
use log::{debug, info};

use glint::ast::Node;
use glint::config::GlintConfig;
use glint::interpreter::Interpreter;
use glint::parse_source;

#[derive(Parser, Debug)]
#[command(name = "glint", about = "Glint interpreter CLI")]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Execute a .glt source file.
    Run(RunArgs),
    /// Print the parsed program of a .glt file as JSON.
    Ast(AstArgs),
    /// Evaluate a JSON-encoded program produced by an external parser.
    EvalAst(EvalArgs),
}

#[derive(ClapArgs, Debug, Clone)]
pub struct RuntimeFlags {
    /// Print each non-empty top-level result after evaluation.
    #[arg(long = "print-results")]
    pub print_results: bool,

    /// Seed the random builtin for reproducible runs.
    #[arg(long = "seed")]
    pub seed: Option<u64>,

    /// Path to a TOML config file.
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct RunArgs {
    /// Path to the script to execute.
    pub script: PathBuf,

    /// Print parsed AST before execution.
    #[arg(long = "print-ast")]
    pub print_ast: bool,

    #[command(flatten)]
    pub runtime: RuntimeFlags,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct AstArgs {
    /// Path to the script to parse.
    pub script: PathBuf,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct EvalArgs {
    /// JSON file holding an array of top-level nodes.
    pub program: PathBuf,

    #[command(flatten)]
    pub runtime: RuntimeFlags,
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    match args.command {
        Command::Run(cmd) => {
            let config = load_config(&cmd.runtime)?;
            let program = parse_file(&cmd.script)?;
            if cmd.print_ast {
                println!("{program:#?}");
            }
            Ok(execute(&program, &config))
        }
        Command::Ast(cmd) => {
            init_logging("warn");
            let program = parse_file(&cmd.script)?;
            let json = serde_json::to_string_pretty(&program)
                .map_err(|err| anyhow!("failed to serialise AST: {err}"))?;
            println!("{json}");
            Ok(ExitCode::SUCCESS)
        }
        Command::EvalAst(cmd) => {
            let config = load_config(&cmd.runtime)?;
            let source = fs::read_to_string(&cmd.program)
                .with_context(|| format!("failed to read {}", cmd.program.display()))?;
            let program: Vec<Node> = serde_json::from_str(&source)
                .with_context(|| format!("invalid program JSON in {}", cmd.program.display()))?;
            Ok(execute(&program, &config))
        }
    }
}

fn init_logging(default_level: &str) {
    let env = env_logger::Env::default().default_filter_or(default_level);
    // A second initialisation only happens in tests; ignoring it is harmless.
    let _ = env_logger::Builder::from_env(env).try_init();
}

/// Resolve the config file, then let command-line flags override it.
fn load_config(flags: &RuntimeFlags) -> Result<GlintConfig> {
    let (mut config, path) = GlintConfig::resolve(flags.config.as_deref())?;
    init_logging(&config.logging.level);
    match path {
        Some(path) => info!("loaded config from {}", path.display()),
        None => debug!("no config file found, using defaults"),
    }
    if flags.print_results {
        config.runtime.print_results = true;
    }
    if flags.seed.is_some() {
        config.runtime.random_seed = flags.seed;
    }
    Ok(config)
}

fn parse_file(path: &Path) -> Result<Vec<Node>> {
    let source =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    parse_source(&source).map_err(|err| anyhow!("{}: {err}", path.display()))
}

fn execute(program: &[Node], config: &GlintConfig) -> ExitCode {
    let mut interpreter = Interpreter::with_config(&config.runtime);
    match interpreter.evaluate(program) {
        Ok(results) => {
            if config.runtime.print_results {
                for value in results.iter().filter(|value| !value.is_empty_result()) {
                    println!("{value}");
                }
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

//=====================================================
// End of file
//=====================================================
