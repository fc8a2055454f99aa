#![deny(unsafe_code)]
//! CLI binary for flipfield.
//!
//! Subcommands:
//! - `run`: spawn the particle field, tick it, write a PNG snapshot
//! - `curve`: print the analytic orientation/divergence curves
//! - `schema`: print every parameter with its default and range
//!
//! Logging goes through `env_logger`; set `RUST_LOG=debug` for run details.

mod error;

use clap::{Parser, Subcommand, ValueEnum};
use error::CliError;
use flipfield_analytic::{sample_curve, CurveParams};
use flipfield_core::{Control, Engine, RunSpec, Scheduler};
use flipfield_dynamics::{FlipDynamics, FlipParams};
use flipfield_render::{export, render_frame, Rgb, Style, Viewport};
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "flipfield", about = "Boundary-flip particle field explorer")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum CurveFormat {
    Csv,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Tick the particle field and write a PNG snapshot of the last frame.
    Run {
        /// Number of ticks.
        #[arg(short, long, default_value_t = 600)]
        ticks: u64,

        /// Spawn seed for deterministic output.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Parameter overrides as a JSON object.
        #[arg(long, default_value = "{}")]
        params: String,

        /// Load params, seed and ticks from a JSON run file instead.
        #[arg(long, conflicts_with_all = ["params", "seed", "ticks"])]
        run_file: Option<PathBuf>,

        /// Milliseconds between ticks (0 runs flat out).
        #[arg(long, default_value_t = 0)]
        interval_ms: u64,

        /// Log the regime census every N ticks (0 disables).
        #[arg(long, default_value_t = 0)]
        report_every: u64,

        /// Canvas size in pixels.
        #[arg(long, default_value_t = 600)]
        size: usize,

        /// Pixels per radius unit.
        #[arg(long, default_value_t = 1.0)]
        scale: f64,

        /// Color for normal particles.
        #[arg(long, default_value = "#0ea5e9")]
        normal_color: String,

        /// Color for flipped particles.
        #[arg(long, default_value = "#f43f5e")]
        flipped_color: String,

        /// Output file path.
        #[arg(short, long, default_value = "field.png")]
        output: PathBuf,
    },
    /// Print the analytic curves sampled over the radial domain.
    Curve {
        /// Parameter overrides as a JSON object.
        #[arg(long, default_value = "{}")]
        params: String,

        /// Output format (ignored with --json, which always emits JSON).
        #[arg(short, long, value_enum, default_value_t = CurveFormat::Csv)]
        format: CurveFormat,

        /// Write to a file instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the parameter schema for the dynamics and the curves.
    Schema,
}

fn parse_params(text: &str) -> Result<serde_json::Value, CliError> {
    let params: serde_json::Value = serde_json::from_str(text)
        .map_err(|e| CliError::Input(format!("invalid --params JSON: {e}")))?;
    if !params.is_object() {
        return Err(CliError::Input("--params must be a JSON object".into()));
    }
    Ok(params)
}

fn load_run_file(path: &Path) -> Result<RunSpec, CliError> {
    let text = fs::read_to_string(path)?;
    RunSpec::from_json_str(&text)
        .map_err(|e| CliError::Input(format!("invalid run file {}: {e}", path.display())))
}

fn parse_color(text: &str) -> Result<Rgb, CliError> {
    Rgb::from_hex(text).map_err(|e| CliError::Input(e.to_string()))
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Schema => {
            let defaults = FlipDynamics::new(FlipParams::default(), 0)?;
            let schema = serde_json::json!({
                "dynamics": defaults.param_schema(),
                "curve": CurveParams::schema(),
            });
            println!("{}", serde_json::to_string_pretty(&schema)?);
        }
        Command::Curve {
            params,
            format,
            output,
        } => {
            let curve = CurveParams::from_json(&parse_params(&params)?);
            curve.validate()?;
            let samples = sample_curve(&curve);

            let text = match (cli.json, format) {
                (true, _) | (false, CurveFormat::Json) => {
                    serde_json::to_string_pretty(&export::to_json(samples))?
                }
                (false, CurveFormat::Csv) => {
                    let mut buf = Vec::new();
                    export::write_csv(samples, &mut buf)?;
                    String::from_utf8(buf)
                        .map_err(|e| CliError::Serialization(e.to_string()))?
                }
            };

            match output {
                Some(path) => {
                    fs::write(&path, text)?;
                    log::info!("wrote curve to {}", path.display());
                }
                None => print!("{text}"),
            }
        }
        Command::Run {
            ticks,
            seed,
            params,
            run_file,
            interval_ms,
            report_every,
            size,
            scale,
            normal_color,
            flipped_color,
            output,
        } => {
            let run = match run_file {
                Some(path) => load_run_file(&path)?,
                None => RunSpec {
                    params: parse_params(&params)?,
                    seed,
                    ticks,
                },
            };

            let style = Style {
                normal: parse_color(&normal_color)?,
                flipped: parse_color(&flipped_color)?,
                ..Style::default()
            };

            let mut engine = FlipDynamics::from_json(&run.params, run.seed)?;

            let mut scheduler = Scheduler::new().with_tick_limit(run.ticks);
            if interval_ms > 0 {
                scheduler = scheduler.with_interval(Duration::from_millis(interval_ms));
            }
            let summary = scheduler.run(&mut engine, |tick, store| {
                if report_every > 0 && tick % report_every == 0 {
                    let census = store.census();
                    log::info!(
                        "tick {tick}: {} normal, {} flipped",
                        census.normal,
                        census.flipped
                    );
                }
                Control::Continue
            });

            let boundary = engine.flip_params().boundary_radius;
            let viewport = Viewport { size, scale };
            let frame = render_frame(engine.particles(), boundary, &viewport, &style)?;
            flipfield_render::snapshot::write_png(&frame, &output)?;

            let census = engine.particles().census();
            if cli.json {
                let info = serde_json::json!({
                    "seed": run.seed,
                    "ticks": summary.ticks,
                    "particles": engine.particles().len(),
                    "normal": census.normal,
                    "flipped": census.flipped,
                    "crossings": engine.crossings(),
                    "respawns": engine.respawns(),
                    "params": engine.params(),
                    "output": output.display().to_string(),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                eprintln!(
                    "ran {} ticks (seed {}): {} normal, {} flipped, {} crossings, {} respawns -> {}",
                    summary.ticks,
                    run.seed,
                    census.normal,
                    census.flipped,
                    engine.crossings(),
                    engine.respawns(),
                    output.display()
                );
            }
        }
    }

    Ok(())
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn run_defaults_parse() {
        let cli = Cli::try_parse_from(["flipfield", "run"]).unwrap();
        match cli.command {
            Command::Run {
                ticks, seed, size, ..
            } => {
                assert_eq!(ticks, 600);
                assert_eq!(seed, 42);
                assert_eq!(size, 600);
            }
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn run_file_conflicts_with_inline_params() {
        let parsed =
            Cli::try_parse_from(["flipfield", "run", "--run-file", "a.json", "--seed", "3"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn curve_format_parses() {
        let cli = Cli::try_parse_from(["flipfield", "curve", "--format", "json"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Curve {
                format: CurveFormat::Json,
                ..
            }
        ));
    }

    #[test]
    fn parse_params_rejects_non_object() {
        assert_eq!(parse_params("[1]").err().map(|e| e.exit_code()), Some(12));
        assert_eq!(parse_params("{bad").err().map(|e| e.exit_code()), Some(12));
        assert!(parse_params(r#"{"speed_cap": 3}"#).is_ok());
    }

    #[test]
    fn parse_color_maps_to_input_error() {
        assert_eq!(parse_color("#12").err().map(|e| e.exit_code()), Some(12));
        assert!(parse_color("#0ea5e9").is_ok());
    }

    #[test]
    fn curve_writes_csv_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("curve.csv");
        let cli = Cli::try_parse_from([
            "flipfield",
            "curve",
            "--output",
            path.to_str().unwrap(),
        ])
        .unwrap();
        run(cli).ok().unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with(export::CSV_HEADER));
    }

    #[test]
    fn malformed_run_file_exit_12() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.json");
        fs::write(&path, "{not json").unwrap();
        let cli = Cli::try_parse_from([
            "flipfield",
            "run",
            "--run-file",
            path.to_str().unwrap(),
            "--output",
            dir.path().join("field.png").to_str().unwrap(),
        ])
        .unwrap();
        assert_eq!(run(cli).err().map(|e| e.exit_code()), Some(12));
    }

    #[test]
    fn missing_run_file_exit_11() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        assert_eq!(load_run_file(&path).err().map(|e| e.exit_code()), Some(11));
    }

    #[test]
    fn run_file_drives_run_and_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.json");
        fs::write(&path, r#"{"params": {"population": 8}, "seed": 7, "ticks": 3}"#).unwrap();
        let output = dir.path().join("field.png");
        let cli = Cli::try_parse_from([
            "flipfield",
            "run",
            "--run-file",
            path.to_str().unwrap(),
            "--size",
            "64",
            "--output",
            output.to_str().unwrap(),
        ])
        .unwrap();
        run(cli).ok().unwrap();
        assert!(output.exists());
    }

    #[test]
    fn invalid_dynamics_params_exit_10() {
        let cli = Cli::try_parse_from([
            "flipfield",
            "run",
            "--ticks",
            "1",
            "--params",
            r#"{"spawn_min": 10}"#,
            "--output",
            "unused.png",
        ])
        .unwrap();
        assert_eq!(run(cli).err().map(|e| e.exit_code()), Some(10));
    }
}
