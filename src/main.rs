use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use rfads::platform::sim::SimPlayerConfig;
use rfads::platform::{MediaSource, Player, PlayerEvent, SimPlayer, SimTech, TextTrackMode};
use rfads::{is_middleware_mediator_supported, AdSession, AdsConfig, HostCapabilities};

#[derive(Parser)]
#[command(name = "rfads", version, about = "Replay ad-insertion scenarios against a simulated player")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a JSON scenario and print the resulting player state
    Run {
        scenario: PathBuf,
        /// Pretty-print the report
        #[arg(long)]
        pretty: bool,
    },
    /// Check whether play middleware would be used on a host
    Probe {
        #[arg(long)]
        ios: bool,
        #[arg(long)]
        android: bool,
        /// Host exposes a middleware registration hook
        #[arg(long)]
        hook: bool,
        /// Host exposes the middleware terminator sentinel
        #[arg(long)]
        terminator: bool,
    },
}

#[derive(Deserialize)]
struct Scenario {
    #[serde(default)]
    config: AdsConfig,
    host: Option<HostCapabilities>,
    player: SimPlayerConfig,
    steps: Vec<Step>,
}

#[derive(Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
enum Step {
    Signal { name: String },
    PlayRequest,
    BeginAdBreak,
    EndAdBreak,
    DisableNextRestore,
    LoadAdSource {
        src: String,
        #[serde(rename = "type", default)]
        mime_type: String,
    },
    SwapTech { tech: SimTech },
    SetEnded { ended: bool },
    Event { name: String },
    RunTimers,
}

#[derive(Serialize)]
struct TrackReport {
    id: String,
    mode: TextTrackMode,
}

#[derive(Serialize)]
struct RestoreReport {
    outcome: Option<String>,
    resume_checks: u32,
    attempts_remaining: u32,
}

#[derive(Serialize)]
struct Report {
    state: &'static str,
    should_block_play: bool,
    current_src: String,
    current_time: f64,
    play_calls: usize,
    loads: usize,
    seeks: Vec<f64>,
    events: Vec<String>,
    classes: Vec<String>,
    tracks: Vec<TrackReport>,
    restore: Option<RestoreReport>,
}

fn run_step(session: &mut AdSession<SimPlayer>, step: Step) -> anyhow::Result<()> {
    match step {
        Step::Signal { name } => {
            if !session.dispatch_named(&name) {
                bail!("unknown signal '{}'", name);
            }
        }
        Step::PlayRequest => {
            session.intercept_play();
        }
        Step::BeginAdBreak => {
            session.begin_ad_break();
        }
        Step::EndAdBreak => {
            session.end_ad_break();
        }
        Step::DisableNextRestore => session.disable_next_snapshot_restore(),
        Step::LoadAdSource { src, mime_type } => session
            .player_mut()
            .load_ad_source(MediaSource::new(src, mime_type)),
        Step::SwapTech { tech } => session.player_mut().swap_tech(tech),
        Step::SetEnded { ended } => session.player_mut().set_ended(ended),
        Step::Event { name } => {
            session.handle_event(&PlayerEvent::from_name(&name));
        }
        Step::RunTimers => {
            session.run_timers();
        }
    }
    Ok(())
}

fn report(session: &AdSession<SimPlayer>) -> Report {
    let player = session.player();
    Report {
        state: session.state_name(),
        should_block_play: session.ads().should_block_play,
        current_src: player.current_src(),
        current_time: player.current_time(),
        play_calls: player.play_calls(),
        loads: player.loads(),
        seeks: player.seeks().to_vec(),
        events: player.events().to_vec(),
        classes: player.classes().to_vec(),
        tracks: player
            .text_tracks()
            .iter()
            .map(|t| TrackReport {
                id: t.id().to_string(),
                mode: t.mode(),
            })
            .collect(),
        restore: session.restore().map(|r| RestoreReport {
            outcome: r.outcome().map(|o| format!("{:?}", o)),
            resume_checks: r.resume_checks(),
            attempts_remaining: r.attempts_remaining(),
        }),
    }
}

fn run(path: &PathBuf, pretty: bool) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read scenario {}", path.display()))?;
    let scenario: Scenario = serde_json::from_str(&raw).map_err(rfads::Error::from)?;

    let player = SimPlayer::from_config(&scenario.player);
    let mut session = AdSession::start(player, scenario.config);
    if let Some(host) = &scenario.host {
        session = session.with_middleware(host);
    }

    for (i, step) in scenario.steps.into_iter().enumerate() {
        run_step(&mut session, step).with_context(|| format!("step {} failed", i))?;
    }

    let report = report(&session);
    let out = if pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{}", out);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Run { scenario, pretty } => run(&scenario, pretty),
        Command::Probe {
            ios,
            android,
            hook,
            terminator,
        } => {
            let host = HostCapabilities {
                platform: rfads::platform::Platform {
                    is_ios: ios,
                    is_android: android,
                },
                has_middleware_hook: hook,
                has_terminator: terminator,
            };
            println!("{}", is_middleware_mediator_supported(&host));
            Ok(())
        }
    }
}
