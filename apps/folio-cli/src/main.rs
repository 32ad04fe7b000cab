use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use folio_input::Action;
use folio_kernel::{Showcase, ShowcaseConfig, SimulationLoop};
use folio_physics::PhysicsBackend;
use folio_scene::DebugTextRenderer;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "folio-cli", about = "Headless tools for the folio showcase")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version, crate info and the built-in portfolio
    Info,
    /// Simulate frames without a window and print the last one
    Run {
        /// Scene config (.yaml, .yml or .json); the built-in portfolio if omitted
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Number of frames to run
        #[arg(short, long, default_value = "120")]
        frames: u64,
        /// Wall-clock time per frame, in milliseconds
        #[arg(short, long, default_value = "16.0")]
        delta_ms: f32,
        /// Press reset before this frame
        #[arg(long)]
        reset_at: Option<u64>,
    },
    /// Dump the built-in config
    Config {
        #[arg(short, long, value_enum, default_value = "yaml")]
        format: Format,
    },
    /// Check a config file and report problems
    Validate { path: PathBuf },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Yaml,
    Json,
}

fn load_config(path: Option<&Path>) -> anyhow::Result<ShowcaseConfig> {
    match path {
        Some(path) => ShowcaseConfig::load(path)
            .with_context(|| format!("failed to load config from {}", path.display())),
        None => Ok(ShowcaseConfig::default()),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .init();

    match cli.command {
        Commands::Info => {
            println!("folio-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("physics: {}", folio_physics::crate_info());
            println!("scene: {}", folio_scene::crate_info());
            println!("input: {}", folio_input::crate_info());
            println!("kernel: {}", folio_kernel::crate_info());

            let config = ShowcaseConfig::default();
            println!(
                "built-in portfolio: {} exhibits, max step {} s, reset key {}",
                config.exhibits.len(),
                config.physics.max_step,
                config.controls.reset_key
            );
            for e in &config.exhibits {
                let title = e.top_label.as_ref().map(|l| l.title.as_str()).unwrap_or("-");
                println!(
                    "  {:<12} at ({:.0}, {:.0}, {:.0})  {}",
                    e.name, e.position.x, e.position.y, e.position.z, title
                );
            }
        }
        Commands::Run {
            config,
            frames,
            delta_ms,
            reset_at,
        } => {
            let config = load_config(config.as_deref())?;
            let mut showcase = Showcase::from_config(&config)?;
            let mut sim = SimulationLoop::new();
            let mut renderer = DebugTextRenderer::new();
            let mut overlay = DebugTextRenderer::new();
            let delta = delta_ms / 1000.0;

            let mut last = None;
            for frame in 0..frames {
                if reset_at == Some(frame) {
                    showcase.apply(Action::Reset);
                }
                last = Some(sim.advance(&mut showcase, delta, &mut renderer, &mut overlay));
            }

            match last {
                Some(out) => {
                    print!("{}", out.scene);
                    print!("{}", out.overlay);
                    let hovered = out
                        .report
                        .hovered
                        .and_then(|i| showcase.registry().get(i))
                        .map(|e| e.name())
                        .unwrap_or("none");
                    println!(
                        "frames={} simulated={:.3}s last_step={:.4}s hovered={}",
                        sim.frames(),
                        showcase.physics().simulated_time(),
                        out.report.step,
                        hovered
                    );
                }
                None => println!("no frames run"),
            }
        }
        Commands::Config { format } => {
            let config = ShowcaseConfig::default();
            let text = match format {
                Format::Yaml => config.to_yaml()?,
                Format::Json => config.to_json()?,
            };
            println!("{text}");
        }
        Commands::Validate { path } => {
            let config = load_config(Some(&path))?;
            println!("{}: OK ({} exhibits)", path.display(), config.exhibits.len());
        }
    }

    Ok(())
}
