use folio_core::{SkippedRecord, YearMonth};
use folio_layout::svg::{SvgOptions, render_timeline_svg};
use folio_layout::{TimelineConfig, TimelineLayout, TimelineLayoutOptions};
use otter::{SeedOptions, Simulation, SimulationConfig, Transform};
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "FOLIO_LOG";

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Content(folio_core::Error),
    Layout(folio_layout::Error),
    Physics(otter::Error),
    Json(serde_json::Error),
    Yaml(serde_yaml::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Content(err) => write!(f, "{err}"),
            CliError::Layout(err) => write!(f, "{err}"),
            CliError::Physics(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
            CliError::Yaml(err) => write!(f, "YAML error: {err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<folio_core::Error> for CliError {
    fn from(value: folio_core::Error) -> Self {
        Self::Content(value)
    }
}

impl From<folio_layout::Error> for CliError {
    fn from(value: folio_layout::Error) -> Self {
        Self::Layout(value)
    }
}

impl From<otter::Error> for CliError {
    fn from(value: otter::Error) -> Self {
        Self::Physics(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<serde_yaml::Error> for CliError {
    fn from(value: serde_yaml::Error) -> Self {
        Self::Yaml(value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum Command {
    #[default]
    Layout,
    Render,
    Simulate,
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    pretty: bool,
    config: Option<String>,
    today: Option<YearMonth>,
    diagram_id: Option<String>,
    out: Option<String>,
    frames: usize,
    seed: Option<u64>,
    frame_ms: Option<f64>,
}

/// Settings file shape accepted by `--config`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct FolioConfig {
    timeline: TimelineConfig,
    simulation: SimulationConfig,
    seeding: SeedOptions,
}

impl FolioConfig {
    fn load(path: &str) -> Result<Self, CliError> {
        let text = std::fs::read_to_string(path)?;
        let is_yaml = Path::new(path)
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));
        let config: FolioConfig = if is_yaml {
            serde_yaml::from_str(&text)?
        } else {
            serde_json::from_str(&text)?
        };
        config.timeline.validate()?;
        config.simulation.validate()?;
        tracing::debug!(path, "loaded config");
        Ok(config)
    }
}

#[derive(Serialize)]
struct LayoutOut<'a> {
    layout: &'a TimelineLayout,
    skipped: &'a [SkippedRecord],
}

#[derive(Serialize)]
struct SimulateOut {
    circles: usize,
    frames: usize,
    collisions: usize,
    transforms: Vec<Transform>,
}

fn usage() -> &'static str {
    "folio\n\
\n\
USAGE:\n\
  folio [layout] [--pretty] [--config <path>] [--today YYYY-MM] [<path>|-]\n\
  folio render [--config <path>] [--today YYYY-MM] [--id <diagram-id>] [--out <path>] [<path>|-]\n\
  folio simulate [--pretty] [--config <path>] [--frames <n>] [--seed <n>] [--frame-ms <ms>] [<path>|-]\n\
\n\
NOTES:\n\
  - If <path> is omitted or '-', input is read from stdin.\n\
  - layout and render read an experience feed; simulate reads a skill tag feed.\n\
  - --config accepts YAML (.yaml/.yml) or JSON with optional timeline, simulation and seeding sections.\n\
  - --today defaults to the current local month.\n\
  - render prints SVG to stdout by default; use --out to write a file.\n\
  - Set FOLIO_LOG (e.g. FOLIO_LOG=debug) for diagnostics on stderr.\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args {
        command: Command::Layout,
        frames: 60,
        ..Default::default()
    };

    let mut it = argv.iter().skip(1).peekable();
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "layout" => args.command = Command::Layout,
            "render" => args.command = Command::Render,
            "simulate" => args.command = Command::Simulate,
            "--pretty" => args.pretty = true,
            "--config" => {
                let Some(path) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.config = Some(path.clone());
            }
            "--today" => {
                let Some(month) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.today = Some(
                    month
                        .parse::<YearMonth>()
                        .map_err(|_| CliError::Usage(usage()))?,
                );
            }
            "--id" => {
                let Some(id) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.diagram_id = Some(id.clone());
            }
            "--out" => {
                let Some(out) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.out = Some(out.clone());
            }
            "--frames" => {
                let Some(n) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.frames = n.parse::<usize>().map_err(|_| CliError::Usage(usage()))?;
            }
            "--seed" => {
                let Some(seed) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.seed = Some(seed.parse::<u64>().map_err(|_| CliError::Usage(usage()))?);
            }
            "--frame-ms" => {
                let Some(ms) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                let ms = ms.parse::<f64>().map_err(|_| CliError::Usage(usage()))?;
                if !(ms.is_finite() && ms >= 0.0) {
                    return Err(CliError::Usage(usage()));
                }
                args.frame_ms = Some(ms);
            }
            "--" => {
                if let Some(rest) = it.next() {
                    if args.input.is_some() {
                        return Err(CliError::Usage(usage()));
                    }
                    args.input = Some(rest.clone());
                }
                if it.next().is_some() {
                    return Err(CliError::Usage(usage()));
                }
            }
            "-" => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some("-".to_string());
            }
            other if other.starts_with('-') => return Err(CliError::Usage(usage())),
            path => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(path.to_string());
            }
        }
    }

    Ok(args)
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    if pretty {
        serde_json::to_writer_pretty(std::io::stdout().lock(), value)?;
    } else {
        serde_json::to_writer(std::io::stdout().lock(), value)?;
    }
    Ok(())
}

fn write_text(text: &str, out: Option<&str>) -> Result<(), CliError> {
    match out {
        None | Some("-") => {
            print!("{text}");
            Ok(())
        }
        Some(path) => {
            std::fs::write(path, text)?;
            Ok(())
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

fn run(args: Args) -> Result<(), CliError> {
    let config = match args.config.as_deref() {
        Some(path) => FolioConfig::load(path)?,
        None => FolioConfig::default(),
    };
    let text = read_input(args.input.as_deref())?;

    match args.command {
        Command::Layout | Command::Render => {
            let records = folio_core::parse_experience_feed(&text)?;
            let ingested = folio_core::ingest(&records);
            let today = args.today.unwrap_or_else(YearMonth::today);
            let options = TimelineLayoutOptions::new(today).with_config(config.timeline);
            let layout = folio_layout::layout_timeline(&ingested.items, &options)?;

            if let Command::Layout = args.command {
                let out = LayoutOut {
                    layout: &layout,
                    skipped: &ingested.skipped,
                };
                write_json(&out, args.pretty)?;
                return Ok(());
            }

            let mut svg_options = SvgOptions::default();
            if let Some(id) = args.diagram_id {
                svg_options.diagram_id = id;
            }
            let svg = render_timeline_svg(&layout, &svg_options);
            write_text(&svg, args.out.as_deref())
        }
        Command::Simulate => {
            let tags = folio_core::parse_skill_feed(&text)?;
            let mut seeding = config.seeding;
            if let Some(seed) = args.seed {
                seeding.random_seed = seed;
            }
            let specs = otter::seed_circles(&tags, &config.simulation, &seeding);
            let mut sim = Simulation::new(config.simulation)?;
            for spec in specs {
                sim.register(spec)?;
            }
            let frame_ms = args.frame_ms.unwrap_or(sim.config().nominal_frame_ms);
            let circles = sim.live_count();

            let mut frames = 0;
            let mut collisions = 0;
            let mut now_ms = 0.0;
            for _ in 0..args.frames {
                let Some(frame) = sim.frame(now_ms) else {
                    break;
                };
                frames += 1;
                collisions += frame.collisions;
                now_ms += frame_ms;
            }
            tracing::info!(circles, frames, collisions, "simulation finished");

            let out = SimulateOut {
                circles,
                frames,
                collisions,
                transforms: sim.transforms(),
            };
            write_json(&out, args.pretty)
        }
    }
}

fn main() {
    init_tracing();

    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = run(args) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
