use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "jitlower")]
#[command(about = "jitlower - lower JIT operator graphs to tensor IR")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Lower a graph dump and print the resulting function
    Lower {
        input: PathBuf,

        #[arg(short, long)]
        output: Option<PathBuf>,

        /// JSON file with lowering options
        #[arg(long)]
        config: Option<PathBuf>,

        /// Skip nodes that cannot be lowered instead of failing
        #[arg(long)]
        skip_unsupported: bool,

        /// Print source locations next to each operation
        #[arg(long)]
        locations: bool,

        #[arg(long)]
        json: bool,

        #[arg(long)]
        color: bool,

        #[arg(short, long)]
        verbose: bool,
    },

    /// Check that a graph dump parses
    Check {
        input: PathBuf,

        #[arg(short, long)]
        verbose: bool,
    },

    /// List every registered operator schema
    Patterns,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let verbose = match &cli.command {
        Commands::Lower { verbose, .. } | Commands::Check { verbose, .. } => *verbose,
        Commands::Patterns => false,
    };
    init_tracing(verbose);

    match cli.command {
        Commands::Lower {
            input,
            output,
            config,
            skip_unsupported,
            locations,
            json,
            color,
            verbose,
        } => cmd_lower(LowerArgs {
            input,
            output,
            config,
            skip_unsupported,
            locations,
            json,
            color,
            verbose,
        }),
        Commands::Check { input, verbose } => cmd_check(input, verbose),
        Commands::Patterns => cmd_patterns(),
    }
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let default = if verbose { "debug" } else { "warn" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .try_init();
}

struct LowerArgs {
    input: PathBuf,
    output: Option<PathBuf>,
    config: Option<PathBuf>,
    skip_unsupported: bool,
    locations: bool,
    json: bool,
    color: bool,
    verbose: bool,
}

fn load_config(path: Option<&Path>) -> Result<jitlower_transform::LoweringConfig> {
    let Some(path) = path else {
        return Ok(Default::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("invalid config {}", path.display()))
}

fn cmd_lower(args: LowerArgs) -> Result<()> {
    use colored::*;
    use jitlower_emit::{emit_function, EmitterConfig, OutputFormat};
    use jitlower_transform::{lower_graph_text, UnsupportedPolicy};
    use std::fs;
    use std::time::Instant;

    let mut config = load_config(args.config.as_deref())?;
    if args.skip_unsupported {
        config.on_unsupported = UnsupportedPolicy::Skip;
    }

    if args.verbose {
        eprintln!("{}", " jitlower".bright_blue().bold());
        eprintln!("{}", "=".repeat(50).bright_blue());
        eprintln!(" Input: {}", args.input.display());
        if let Some(ref out) = args.output {
            eprintln!(" Output: {}", out.display());
        }
        eprintln!(" Unsupported nodes: {:?}", config.on_unsupported);
        eprintln!();
    }

    let start = Instant::now();
    let source = fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let lowered = lower_graph_text(&source, &config)
        .with_context(|| format!("failed to lower {}", args.input.display()))?;

    let format = if args.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };
    let emitter_config = EmitterConfig {
        use_colors: args.color && args.output.is_none(),
        include_locations: args.locations,
        ..EmitterConfig::default()
    };
    let text = emit_function(&lowered.function, format, &emitter_config)?;

    match &args.output {
        Some(path) => fs::write(path, &text)?,
        None => print!("{}", text),
    }

    for skipped in &lowered.report.skipped {
        eprintln!(
            "{} node {} ({}): {:?}",
            "skipped".yellow(),
            skipped.index,
            skipped.kind,
            skipped.reason
        );
    }
    for output in &lowered.report.dropped_outputs {
        eprintln!("{} graph output {}", "dropped".yellow(), output);
    }

    if args.verbose {
        eprintln!(
            "\n {} {} nodes lowered, {} skipped in {:.3}s",
            "SUCCESS:".bright_green().bold(),
            lowered.report.converted,
            lowered.report.skipped.len(),
            start.elapsed().as_secs_f64()
        );
    }

    Ok(())
}

fn cmd_check(input: PathBuf, verbose: bool) -> Result<()> {
    use colored::*;
    use std::fs;

    let source = fs::read_to_string(&input)
        .with_context(|| format!("failed to read {}", input.display()))?;

    match jitlower_transform::read_graph(&source) {
        Ok(graph) => {
            println!("{}", " VALID".bright_green().bold());
            if verbose {
                println!(
                    "   {} inputs, {} nodes, {} outputs",
                    graph.inputs.len(),
                    graph.nodes.len(),
                    graph.outputs.len()
                );
            }
            Ok(())
        }
        Err(e) => {
            println!("{}", " INVALID".bright_red().bold());
            println!("\n{}", "Parse Error:".bright_red());
            println!("{}", e);
            Err(anyhow::anyhow!("Validation failed"))
        }
    }
}

fn cmd_patterns() -> Result<()> {
    let registry = jitlower_transform::initialize_global_registry()?;
    for schema in registry.schemas() {
        let name = registry.lookup(schema).map(|c| c.name).unwrap_or("?");
        println!("{:<10} {}", name, schema);
    }
    Ok(())
}
