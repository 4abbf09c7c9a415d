// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Drill grasp demo driver.
//!
//! Builds one of the drill scenarios against a simulated robot and runs it
//! through the task queue. Confirmation prompts go to stderr; answers are
//! read line by line from stdin.
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tokio::sync::mpsc;
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use grasp_config::{check, load_file, ConfigService, FsConfigStore};
use grasp_dry_tests::SimRig;
use grasp_sched::ChannelOperator;
use grasp_tasks::ScenarioConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Scenario {
    /// Walk to the drill, grasp it and stand up
    Autonomous,
    /// Preview the approach and grasp plans
    Nominal,
    /// Preview switching the held drill on
    TurnOn,
}

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Scenario to run
    #[clap(short, long, value_enum, default_value_t = Scenario::Autonomous)]
    scenario: Scenario,

    /// Milliseconds between sequencer cycles (overrides the config)
    #[clap(short, long)]
    tick_ms: Option<u64>,

    /// Run without confirmation prompts
    #[clap(long)]
    no_prompt: bool,

    /// Directory holding scenario.json
    #[clap(long)]
    config_dir: Option<PathBuf>,

    /// Scenario file (.yaml, .yml or .json), used instead of the stored config
    #[clap(long)]
    scenario_file: Option<PathBuf>,

    /// Store the effective scenario config before running
    #[clap(long)]
    save_config: bool,

    /// Log verbosity
    #[clap(long, default_value_t = Level::INFO)]
    log_level: Level,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(args.log_level)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = load_config(&args)?;
    info!(
        scenario = ?args.scenario,
        tick_ms = config.tick_ms,
        prompts = config.prompts_enabled,
        "starting drill demo"
    );

    let rig = SimRig::new();
    let mut demo = rig.demo(config);
    let steps = match args.scenario {
        Scenario::Autonomous => demo.autonomous_sequence(),
        Scenario::Nominal => {
            demo.spawn_object()?;
            demo.nominal_preview_sequence()
        }
        Scenario::TurnOn => demo.turn_on_preview_sequence(),
    };
    let mut queue = demo.into_queue(steps).with_operator(terminal_operator());

    let outcome = queue.run().await;
    for command in rig.commands() {
        info!(?command, "robot command");
    }
    match outcome.into_result() {
        Ok(()) => {
            info!(cycles = queue.cycles(), "scenario complete");
            Ok(())
        }
        Err(abort) => {
            error!(%abort, "scenario aborted");
            Err(abort.into())
        }
    }
}

fn config_store(args: &Args) -> Result<FsConfigStore> {
    Ok(match &args.config_dir {
        Some(dir) => FsConfigStore::with_root(dir),
        None => FsConfigStore::new()?,
    })
}

/// The scenario file wins over the stored config; the store is only touched
/// when it is read or `--save-config` writes it.
fn load_config(args: &Args) -> Result<ScenarioConfig> {
    let mut config = match &args.scenario_file {
        Some(path) => load_file::<ScenarioConfig>(path)
            .with_context(|| format!("loading scenario file {}", path.display()))?,
        None => ConfigService::new(config_store(args)?)
            .load_checked(ScenarioConfig::KEY)
            .context("loading stored scenario config")?,
    };
    if let Some(tick_ms) = args.tick_ms {
        config.tick_ms = tick_ms;
    }
    if args.no_prompt {
        config.prompts_enabled = false;
    }
    check("command line", &config)?;

    if args.save_config {
        let service = ConfigService::new(config_store(args)?);
        service.save(ScenarioConfig::KEY, &config)?;
        let path = service.store().path_for(ScenarioConfig::KEY);
        info!(path = %path.display(), "scenario config saved");
    }
    Ok(config)
}

/// Prompts on stderr, answers from stdin lines. EOF on stdin declines.
fn terminal_operator() -> ChannelOperator {
    let (prompt_tx, mut prompt_rx) = mpsc::unbounded_channel::<String>();
    let (answer_tx, answer_rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        while let Some(prompt) = prompt_rx.recv().await {
            if let Err(err) = show_prompt(&prompt) {
                warn!(%err, "could not write prompt");
            }
        }
    });
    // Blocking reads stay off the runtime.
    std::thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if answer_tx.send(line).is_err() {
                break;
            }
        }
    });

    ChannelOperator::new(prompt_tx, answer_rx)
}

fn show_prompt(prompt: &str) -> io::Result<()> {
    let mut stderr = io::stderr().lock();
    write!(stderr, "{prompt}")?;
    stderr.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> Args {
        Args::parse_from(std::iter::once("grasp-demo").chain(extra.iter().copied()))
    }

    #[test]
    fn scenario_file_leaves_the_config_dir_alone() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("drill.yaml");
        std::fs::write(&file, "grasping_hand: right\ntick_ms: 5\n").unwrap();
        let config_dir = dir.path().join("config");

        let args = args(&[
            "--scenario-file",
            file.to_str().unwrap(),
            "--config-dir",
            config_dir.to_str().unwrap(),
        ]);
        let config = load_config(&args).unwrap();
        assert_eq!(config.tick_ms, 5);
        assert!(!config_dir.exists());
    }

    #[test]
    fn save_config_writes_the_effective_scenario() {
        let dir = tempfile::tempdir().unwrap();
        let config_dir = dir.path().join("config");
        let args = args(&[
            "--config-dir",
            config_dir.to_str().unwrap(),
            "--tick-ms",
            "7",
            "--no-prompt",
            "--save-config",
        ]);
        load_config(&args).unwrap();

        let stored: ScenarioConfig = ConfigService::new(FsConfigStore::with_root(&config_dir))
            .load_checked(ScenarioConfig::KEY)
            .unwrap();
        assert_eq!(stored.tick_ms, 7);
        assert!(!stored.prompts_enabled);
    }

    #[test]
    fn zero_tick_from_the_command_line_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("drill.json");
        std::fs::write(&file, "{}").unwrap();
        let args = args(&["--scenario-file", file.to_str().unwrap(), "--tick-ms", "0"]);
        let err = load_config(&args).unwrap_err();
        assert!(err.to_string().contains("tick_ms"), "{err:#}");
    }
}
