//! Command line runner for the cycling cellular automata

use anyhow::{Context, Result};
use automata_cycle::{
    automaton::FrameSink,
    config::{CliOverrides, Settings},
    engine_from_settings,
    utils::{ColorOutput, FrameFormatter, TerminalSink},
};
use clap::{Parser, Subcommand};
use log::{info, LevelFilter};
use simple_logger::SimpleLogger;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "automata_cycle")]
#[command(about = "Animate cellular automata on a toroidal grid")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Animate the automaton in the terminal
    Run {
        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        /// Grid width in cells (overrides config)
        #[arg(long, allow_negative_numbers = true)]
        width: Option<i64>,

        /// Grid height in cells (overrides config)
        #[arg(long, allow_negative_numbers = true)]
        height: Option<i64>,

        /// Milliseconds between ticks (overrides config)
        #[arg(short, long, allow_negative_numbers = true)]
        interval: Option<i64>,

        /// Catalog index of the rule set to start with (overrides config)
        #[arg(short, long)]
        rule: Option<usize>,

        /// Seed for the initial-state generator (overrides config)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Stop after this many generations
        #[arg(short, long)]
        generations: Option<u64>,

        /// Advance to the next rule set every N generations
        #[arg(long)]
        cycle_every: Option<u64>,

        /// Do not draw frames
        #[arg(long)]
        no_display: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// List the rule sets in the catalog
    Rules {
        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create example configuration files
    Setup {
        /// Directory to create files in
        #[arg(short, long, default_value = ".")]
        directory: PathBuf,

        /// Force overwrite existing files
        #[arg(short, long)]
        force: bool,
    },
}

/// Parameters of the `run` command
struct RunOptions {
    config: PathBuf,
    overrides: CliOverrides,
    generations: Option<u64>,
    cycle_every: Option<u64>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let verbose = matches!(cli.command, Commands::Run { verbose: true, .. });
    SimpleLogger::new()
        .with_level(if verbose { LevelFilter::Debug } else { LevelFilter::Warn })
        .init()
        .context("Failed to initialize logging")?;

    match cli.command {
        Commands::Run {
            config,
            width,
            height,
            interval,
            rule,
            seed,
            generations,
            cycle_every,
            no_display,
            ..
        } => {
            let overrides = CliOverrides {
                width,
                height,
                interval_ms: interval,
                initial_rule_set: rule,
                rng_seed: seed,
                no_display,
            };
            run_command(RunOptions {
                config,
                overrides,
                generations,
                cycle_every,
            })
        }
        Commands::Rules { config, json } => rules_command(config, json),
        Commands::Setup { directory, force } => setup_command(directory, force),
    }
}

fn load_settings(config_path: &PathBuf) -> Result<Settings> {
    if config_path.exists() {
        Settings::from_file(config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))
    } else {
        let message = format!("Config file {} not found, using defaults", config_path.display());
        println!("{}", ColorOutput::warning(&message));
        Ok(Settings::default())
    }
}

fn run_command(options: RunOptions) -> Result<()> {
    let mut settings = load_settings(&options.config)?;
    settings.merge_with_cli(&options.overrides);
    settings.validate().context("Configuration validation failed")?;

    let mut engine = engine_from_settings(&settings)?;
    let display = &settings.display;
    let mut sink = TerminalSink::stdout(display.enabled, display.clear_screen, display.show_status);

    sink.frame(&engine.snapshot()).context("Failed to draw frame")?;
    engine.start(settings.simulation.interval_ms)?;

    let started = Instant::now();
    let mut ticks: u64 = 0;
    let mut since_switch: u64 = 0;

    while options.generations.map_or(true, |limit| ticks < limit) {
        let Some(due) = engine.next_due() else { break };
        let now = Instant::now();
        if due > now {
            std::thread::sleep(due - now);
        }

        if let Some(snapshot) = engine.poll(Instant::now()) {
            sink.frame(&snapshot).context("Failed to draw frame")?;
            ticks += 1;
            since_switch += 1;
        }

        if options.cycle_every.is_some_and(|every| every > 0 && since_switch >= every) {
            engine.next_rule_set();
            since_switch = 0;
            sink.frame(&engine.snapshot()).context("Failed to draw frame")?;
        }
    }

    engine.stop();
    info!("Ran {} ticks in {:.3}s", ticks, started.elapsed().as_secs_f64());

    let snapshot = engine.snapshot();
    let message = format!(
        "Finished after {} ticks: {}",
        ticks,
        FrameFormatter::format_status(&snapshot)
    );
    println!("{}", ColorOutput::success(&message));
    Ok(())
}

fn rules_command(config_path: PathBuf, json: bool) -> Result<()> {
    let settings = load_settings(&config_path)?;
    let catalog = settings.build_catalog()?;

    if json {
        let json = FrameFormatter::catalog_json(&catalog).context("Failed to serialize catalog")?;
        println!("{}", json);
    } else {
        let current = Some(settings.simulation.initial_rule_set);
        print!("{}", FrameFormatter::format_catalog(&catalog, current));
    }
    Ok(())
}

fn setup_command(directory: PathBuf, force: bool) -> Result<()> {
    println!("{}", ColorOutput::info("Setting up configuration..."));

    let config_dir = directory.join("config");
    std::fs::create_dir_all(&config_dir)
        .with_context(|| format!("Failed to create directory {}", config_dir.display()))?;

    let files = [
        (config_dir.join("default.yaml"), Settings::default()),
        (config_dir.join("custom_catalog.yaml"), Settings::custom_catalog_example()),
    ];

    for (path, settings) in files {
        if !path.exists() || force {
            settings
                .to_file(&path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Created: {}", path.display());
        } else {
            let message = format!("Skipped: {} (already exists)", path.display());
            println!("{}", ColorOutput::warning(&message));
        }
    }

    println!("\n{}", ColorOutput::success("Setup complete!"));
    println!("Run: cargo run -- run --config {}", config_dir.join("default.yaml").display());
    Ok(())
}
