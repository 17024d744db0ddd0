use std::{
    io::{self, BufWriter, Write},
    path::PathBuf,
    rc::Rc,
};

use clap::{Parser, Subcommand, ValueEnum};
use plucky_core::{
    svg_document, timeline, wave, AnimationController, FrameScheduler, ManualScheduler, PathSink,
    Phase, PluckConfig, PluckyError, RecordingSink, ReducedMotionSignal, ReducedMotionSource,
};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

fn main() -> plucky_core::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Path {
            amplitude,
            half_waves,
            svg,
        } => run_path(amplitude, half_waves, svg),
        Commands::Simulate(args) => run_simulate(args),
        Commands::Config => {
            println!("{}", serde_json::to_string_pretty(&PluckConfig::default())?);
            Ok(())
        }
    }
}

fn run_path(amplitude: f64, half_waves: u32, svg: bool) -> plucky_core::Result<()> {
    let config = PluckConfig {
        amplitude,
        num_half_waves: half_waves,
        ..PluckConfig::default()
    };
    config.validate()?;

    let path = wave::generate(config.amplitude, config.num_half_waves);
    if svg {
        println!("{}", svg_document(&path));
    } else {
        println!("{path}");
    }
    Ok(())
}

fn run_simulate(args: SimulateArgs) -> plucky_core::Result<()> {
    let mut config = match &args.config {
        Some(path) => PluckConfig::from_json_file(path)?,
        None => PluckConfig::default(),
    };
    for (name, value) in &args.set {
        config.apply_attribute(name, value)?;
    }
    if !(args.fps.is_finite() && args.fps > 0.0) {
        return Err(PluckyError::msg("--fps must be a positive number"));
    }

    let mut events = args.events.clone();
    events.sort_by(|a, b| a.at_ms.total_cmp(&b.at_ms));
    let until = args.until.unwrap_or_else(|| {
        let last = events.last().map(|event| event.at_ms).unwrap_or(0.0);
        last + config.pull_duration.max(config.release_duration) + 100.0
    });
    let interval = 1000.0 / args.fps;

    tracing::info!(?config, events = events.len(), until, "starting simulation");

    let signal = ReducedMotionSignal::new(args.reduced_motion);
    let mut controller = AnimationController::new(
        config,
        Rc::new(signal.clone()),
        ManualScheduler::new(),
        RecordingSink::new(),
    );

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    controller.init();
    flush_frames(&mut controller, 0.0, args.json, &mut out)?;

    let mut pending = events.into_iter().peekable();
    let mut toggle_at = args.toggle_reduced_at;
    let mut now = 0.0;
    while now < until {
        while let Some(event) = pending.next_if(|event| event.at_ms <= now) {
            tracing::info!(kind = ?event.kind, at_ms = event.at_ms, "pointer event");
            dispatch(&mut controller, event.kind);
        }
        if toggle_at.is_some_and(|at| now >= at) {
            toggle_at = None;
            let active = !signal.is_active();
            tracing::info!(active, at_ms = now, "toggling reduced motion");
            signal.set(active);
        }

        timeline::tick(&mut controller, interval);
        now = controller.scheduler().now();
        flush_frames(&mut controller, now, args.json, &mut out)?;
    }

    out.flush()?;
    tracing::info!(
        amplitude = controller.current_amplitude(),
        phase = ?controller.phase(),
        "simulation finished"
    );
    Ok(())
}

/// Host-side mapping of pointer events onto the two animation triggers.
fn dispatch<S: FrameScheduler, K: PathSink>(
    controller: &mut AnimationController<S, K>,
    event: PointerEvent,
) {
    match event {
        PointerEvent::Enter => controller.pull(),
        PointerEvent::Leave => controller.release(),
    }
}

#[derive(Debug, Serialize)]
struct FrameRecord<'a> {
    time_ms: f64,
    amplitude: f64,
    phase: Phase,
    path: &'a str,
}

fn flush_frames(
    controller: &mut AnimationController<ManualScheduler, RecordingSink>,
    time_ms: f64,
    json: bool,
    out: &mut impl Write,
) -> plucky_core::Result<()> {
    let phase = controller.phase();
    for path in controller.sink().paths() {
        let amplitude = path
            .lobe_peak(0)
            .map(|peak| wave::BASELINE_Y - peak.y)
            .unwrap_or(0.0);
        let data = path.to_string();
        if json {
            let record = FrameRecord {
                time_ms,
                amplitude,
                phase,
                path: &data,
            };
            serde_json::to_writer(&mut *out, &record)?;
            writeln!(out)?;
        } else {
            writeln!(out, "{time_ms:>9.2} {amplitude:>+.6} {data}")?;
        }
    }
    controller.sink_mut().clear();
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .try_init();
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Plucked wavy underline animation engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the wave path for a fixed amplitude.
    Path {
        /// Peak amplitude (em).
        #[arg(short, long, default_value_t = 0.3)]
        amplitude: f64,
        /// Number of half wavelengths.
        #[arg(short = 'n', long, default_value_t = 4)]
        half_waves: u32,
        /// Wrap the path in a standalone SVG document.
        #[arg(long)]
        svg: bool,
    },
    /// Drive the animation with synthetic frames and print every emitted path.
    Simulate(SimulateArgs),
    /// Print the default configuration as JSON.
    Config,
}

#[derive(clap::Args, Debug)]
struct SimulateArgs {
    /// JSON configuration file (kebab-case keys, missing keys keep defaults).
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Override a single attribute, e.g. `--set decay-freq=4`.
    #[arg(long = "set", value_parser = parse_attribute)]
    set: Vec<(String, String)>,
    /// Start with the reduced-motion preference on.
    #[arg(long)]
    reduced_motion: bool,
    /// Flip the reduced-motion preference at this time (ms).
    #[arg(long)]
    toggle_reduced_at: Option<f64>,
    /// Frame rate of the synthetic scheduler.
    #[arg(long, default_value_t = 60.0)]
    fps: f64,
    /// Pointer events as `kind:ms`, comma separated.
    #[arg(
        short,
        long,
        value_delimiter = ',',
        value_parser = parse_event,
        default_value = "enter:0,leave:300"
    )]
    events: Vec<TimedEvent>,
    /// Stop after this many milliseconds.
    #[arg(long)]
    until: Option<f64>,
    /// Print one JSON object per emitted path.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PointerEvent {
    Enter,
    Leave,
}

#[derive(Debug, Clone, Copy)]
struct TimedEvent {
    kind: PointerEvent,
    at_ms: f64,
}

fn parse_event(raw: &str) -> Result<TimedEvent, String> {
    let (kind, at) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected `kind:ms`, got `{raw}`"))?;
    let kind = PointerEvent::from_str(kind.trim(), true)?;
    let at_ms = at
        .trim()
        .parse::<f64>()
        .map_err(|err| format!("invalid time `{at}`: {err}"))?;
    if !at_ms.is_finite() || at_ms < 0.0 {
        return Err(format!("event time must be >= 0, got `{at}`"));
    }
    Ok(TimedEvent { kind, at_ms })
}

fn parse_attribute(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(name, value)| (name.trim().to_string(), value.trim().to_string()))
        .ok_or_else(|| format!("expected `name=value`, got `{raw}`"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_timed_events() {
        let event = parse_event("leave:250").unwrap();
        assert_eq!(event.kind, PointerEvent::Leave);
        assert_eq!(event.at_ms, 250.0);

        assert!(parse_event("enter").is_err());
        assert!(parse_event("hover:10").is_err());
        assert!(parse_event("enter:-5").is_err());
    }

    #[test]
    fn parses_attribute_overrides() {
        assert_eq!(
            parse_attribute("decay-freq=4").unwrap(),
            ("decay-freq".to_string(), "4".to_string())
        );
        assert!(parse_attribute("decay-freq").is_err());
    }

    #[test]
    fn dispatch_maps_pointer_events_to_triggers() {
        let mut controller = AnimationController::new(
            PluckConfig::default(),
            Rc::new(ReducedMotionSignal::new(false)),
            ManualScheduler::new(),
            RecordingSink::new(),
        );
        controller.init();

        dispatch(&mut controller, PointerEvent::Enter);
        assert_eq!(controller.phase(), Phase::Pulling);
        dispatch(&mut controller, PointerEvent::Leave);
        assert_eq!(controller.phase(), Phase::Releasing);
        assert_eq!(controller.scheduler().outstanding(), 1);
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
