//! BankVM - CLI
//!
//! Command-line interface to execute BankVM assembly files.

use std::fs;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use log::{debug, LevelFilter};

use bankvm_core::{ProgramLoader, VirtualMachine, VmConfig};

/// Run a BankVM assembly program
#[derive(Parser, Debug)]
#[command(name = "bankvm", version, about)]
struct Cli {
    /// Assembly file (.asm) to execute
    input_file: PathBuf,

    /// Log each run at debug level and dump the final state
    #[arg(short, long)]
    debug: bool,

    /// TOML configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override the base interest rate pushed by SENSOR_JUROS
    #[arg(long, value_name = "RATE")]
    rate: Option<f64>,

    /// Reject programs that jump to undeclared labels before running them
    #[arg(long)]
    strict_labels: bool,

    /// Print the final stack, accounts and variables as JSON
    #[arg(long)]
    dump_state: bool,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.debug);

    if let Err(e) = run(&cli) {
        eprintln!("error: {}", e);
        process::exit(1);
    }
}

fn init_logging(debug: bool) {
    let mut builder = env_logger::Builder::from_default_env();
    if debug {
        builder.filter_level(LevelFilter::Debug);
        // RUST_LOG still refines the level, e.g. RUST_LOG=trace for per-step output
        if let Ok(spec) = std::env::var("RUST_LOG") {
            builder.parse_filters(&spec);
        }
    }
    builder.format_timestamp(None).init();
}

/// Loads configuration and program, runs it, and reports the final state.
///
/// # Errors
/// Returns a printable message if the configuration or input file cannot be
/// read, the program fails to load, or execution fails.
fn run(cli: &Cli) -> Result<(), String> {
    let mut config = match &cli.config {
        Some(path) => VmConfig::load(path)
            .map_err(|e| format!("failed to load config '{}': {}", path.display(), e))?,
        None => VmConfig::default(),
    };
    if let Some(rate) = cli.rate {
        config = config.with_interest_rate(rate);
        config.validate().map_err(|e| e.to_string())?;
    }

    let source = fs::read_to_string(&cli.input_file)
        .map_err(|e| format!("cannot read '{}': {}", cli.input_file.display(), e))?;

    let loaded = if cli.strict_labels {
        ProgramLoader::load_strict(&source)
    } else {
        ProgramLoader::load(&source)
    };
    let program = loaded.map_err(|e| format!("failed to load program: {}", e))?;

    let mut vm = VirtualMachine::new(config, program);
    let result = vm.run();

    if cli.debug {
        debug!("final stack: {:?}", vm.stack());
        for (name, balance) in vm.accounts().iter() {
            debug!("account {} = {}", name, balance);
        }
        for (name, value) in vm.variables().iter() {
            debug!("variable {} = {:?}", name, value);
        }
    }

    if cli.dump_state {
        match serde_json::to_string_pretty(&vm.snapshot()) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("failed to serialize state: {}", e),
        }
    }

    result.map_err(|e| format!("execution failed: {}", e))
}
