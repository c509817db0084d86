use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use neonwire::{
    ConnectorEngine, CpuSurface, EngineConfig, HostEvent, ManualClock, RecordingSurface,
    StaticLayout, VisualSurface,
};

#[derive(Parser, Debug)]
#[command(name = "neonwire", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the animation headlessly and write the last frame as a PNG.
    Frame(FrameArgs),
    /// Run the animation headlessly and print engine statistics as JSON.
    Simulate(RunArgs),
    /// Print the default engine configuration as JSON.
    Config,
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Page layout JSON (viewport and element boxes).
    #[arg(long)]
    layout: PathBuf,

    /// Engine configuration JSON. Missing fields keep their defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of ticks to run.
    #[arg(long, default_value_t = 120)]
    ticks: u32,

    /// Simulated frame rate.
    #[arg(long, default_value_t = 60.0)]
    fps: f64,
}

#[derive(Args, Debug)]
struct FrameArgs {
    #[command(flatten)]
    run: RunArgs,

    /// Device pixel ratio of the output.
    #[arg(long, default_value_t = 1.0)]
    dpr: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    let cli = Cli::parse();
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Simulate(args) => cmd_simulate(args),
        Command::Config => cmd_config(),
    }
}

fn load_inputs(args: &RunArgs) -> anyhow::Result<(StaticLayout, EngineConfig)> {
    anyhow::ensure!(
        args.fps.is_finite() && args.fps > 0.0,
        "--fps must be a positive number"
    );
    let layout = StaticLayout::from_path(&args.layout)
        .with_context(|| format!("load layout '{}'", args.layout.display()))?;
    let config = match &args.config {
        Some(path) => EngineConfig::from_path(path)
            .with_context(|| format!("load config '{}'", path.display()))?,
        None => EngineConfig::default(),
    };
    Ok((layout, config))
}

fn run(
    args: &RunArgs,
    layout: &StaticLayout,
    config: EngineConfig,
    surface: &mut dyn VisualSurface,
) -> anyhow::Result<ConnectorEngine> {
    let mut engine = ConnectorEngine::new(config)?;
    engine.handle_event(&HostEvent::Load);

    let clock = ManualClock::new(0.0);
    let step_ms = 1000.0 / args.fps;
    for _ in 0..args.ticks {
        engine.tick(&clock, layout, surface);
        clock.advance_ms(step_ms);
    }
    tracing::info!(ticks = args.ticks, stats = ?engine.stats(), "run finished");
    Ok(engine)
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let (layout, config) = load_inputs(&args.run)?;
    let mut surface = CpuSurface::new(layout.viewport, args.dpr)?;
    run(&args.run, &layout, config, &mut surface)?;
    let frame = surface.render_frame()?;

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    neonwire::save_png(&frame, &args.out)
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_simulate(args: RunArgs) -> anyhow::Result<()> {
    let (layout, config) = load_inputs(&args)?;
    let mut surface = RecordingSurface::new();
    let engine = run(&args, &layout, config, &mut surface)?;
    println!("{}", serde_json::to_string_pretty(&engine.stats())?);
    Ok(())
}

fn cmd_config() -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(&EngineConfig::default())?);
    Ok(())
}
