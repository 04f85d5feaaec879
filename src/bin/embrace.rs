use std::{collections::VecDeque, path::PathBuf, sync::Arc, time::Duration};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use embrace::{
    DirFrameSource, FrameSequenceLoader, ProgressStore, SceneConfig, SceneKind, SleepBackoff,
    Stage, StageEvent, TrackSlot,
};

#[derive(Parser, Debug)]
#[command(name = "embrace", version)]
struct Cli {
    /// Log scene transitions and loader activity to stderr.
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Drive a headless session on a virtual clock and print its events.
    Play(PlayArgs),
    /// Load every track and report its state.
    Inspect(InspectArgs),
    /// Clear persisted progress.
    Reset(ResetArgs),
}

#[derive(Parser, Debug)]
struct PlayArgs {
    /// Asset root containing `{base}/frame_NNN.png` sequences.
    #[arg(long)]
    assets: PathBuf,

    /// Comma-separated answers, e.g. `y,y,n,y,y`.
    #[arg(long, value_delimiter = ',', value_parser = parse_answer)]
    answers: Vec<bool>,

    /// Scene config JSON; defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Progress file.
    #[arg(long, default_value = "embrace-progress.json")]
    state: PathBuf,

    /// Virtual milliseconds per simulated display frame.
    #[arg(long, default_value_t = 16)]
    step_ms: u64,

    /// Stop after this much virtual time even if the session has not settled.
    #[arg(long, default_value_t = 120_000)]
    until_ms: u64,
}

#[derive(Parser, Debug)]
struct InspectArgs {
    #[arg(long)]
    assets: PathBuf,

    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct ResetArgs {
    #[arg(long, default_value = "embrace-progress.json")]
    state: PathBuf,

    /// Leave the file alone and make the next session start over instead.
    #[arg(long)]
    on_next_open: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .init();

    match cli.cmd {
        Command::Play(args) => cmd_play(args),
        Command::Inspect(args) => cmd_inspect(args),
        Command::Reset(args) => cmd_reset(args),
    }
}

fn parse_answer(s: &str) -> Result<bool, String> {
    match s.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" | "true" | "1" => Ok(true),
        "n" | "no" | "false" | "0" => Ok(false),
        other => Err(format!("expected y or n, got '{other}'")),
    }
}

fn read_config(path: Option<&PathBuf>) -> anyhow::Result<SceneConfig> {
    let Some(path) = path else {
        return Ok(SceneConfig::default());
    };
    SceneConfig::from_path(path).with_context(|| format!("load config '{}'", path.display()))
}

fn cmd_play(args: PlayArgs) -> anyhow::Result<()> {
    anyhow::ensure!(args.step_ms > 0, "--step-ms must be positive");
    let config = read_config(args.config.as_ref())?;
    let store = ProgressStore::new(&args.state);

    let mut stage = Stage::open(config, store, Duration::ZERO)?;
    stage.load_blocking(
        Arc::new(DirFrameSource::new(&args.assets)),
        Arc::new(SleepBackoff),
    )?;

    let mut answers: VecDeque<bool> = args.answers.into_iter().collect();
    let step = Duration::from_millis(args.step_ms);
    let until = Duration::from_millis(args.until_ms);
    let mut now = Duration::ZERO;

    while now <= until {
        for event in stage.advance(now) {
            print_event(now, &event)?;
        }

        if stage.is_ready() && !stage.is_locked(now) && !stage.scene().is_walking() {
            if let Some(positive) = answers.front().copied() {
                if stage.progress().current_question().is_some() {
                    answers.pop_front();
                    let outcome = stage.answer(positive, now)?;
                    println!(
                        "{:>7}ms answer {} -> closeness {} ({:?})",
                        now.as_millis(),
                        if positive { "y" } else { "n" },
                        stage.progress().closeness,
                        outcome.scene
                    );
                } else {
                    answers.clear();
                }
            }
        }

        if settled(&stage, answers.is_empty()) {
            break;
        }
        now += step;
    }

    let snapshot = serde_json::to_string_pretty(&stage.snapshot()).context("serialize snapshot")?;
    println!("{snapshot}");
    stage.teardown();
    Ok(())
}

fn settled(stage: &Stage, out_of_answers: bool) -> bool {
    if !out_of_answers || stage.scene().is_walking() {
        return false;
    }
    match stage.progress().scene {
        SceneKind::Heart => true,
        SceneKind::Hug => false,
        SceneKind::Questions | SceneKind::DoneNonperfect => stage.is_ready(),
    }
}

fn print_event(now: Duration, event: &StageEvent) -> anyhow::Result<()> {
    let json = serde_json::to_string(event).context("serialize event")?;
    println!("{:>7}ms {json}", now.as_millis());
    Ok(())
}

fn cmd_inspect(args: InspectArgs) -> anyhow::Result<()> {
    let config = read_config(args.config.as_ref())?;
    let loader = FrameSequenceLoader::new(
        Arc::new(DirFrameSource::new(&args.assets)),
        Arc::new(SleepBackoff),
        config.loader.clone(),
    )?;

    let mut failed = 0usize;
    for (slot, spec) in TrackSlot::ALL.iter().zip(config.tracks.all()) {
        match loader.load(spec) {
            Ok(frames) => println!(
                "{slot:?} '{}': loaded {} frames ({} missing)",
                spec.base_path(),
                frames.len(),
                frames.failed_count()
            ),
            Err(e) => {
                failed += 1;
                println!("{slot:?} '{}': failed ({e})", spec.base_path());
            }
        }
    }
    eprintln!("{failed} of {} tracks failed", TrackSlot::ALL.len());
    Ok(())
}

fn cmd_reset(args: ResetArgs) -> anyhow::Result<()> {
    let store = ProgressStore::new(&args.state);
    if args.on_next_open {
        store.set_force_reset()?;
        eprintln!("next session at {} will start over", args.state.display());
    } else {
        store.clear()?;
        eprintln!("cleared {}", args.state.display());
    }
    Ok(())
}
