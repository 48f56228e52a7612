use std::{path::PathBuf, time::Duration};

use clap::{Parser, Subcommand};
use duelris_ai::Difficulty;
use duelris_battle::BattleConfig;
use duelris_engine::{BlockSeed, GameMode};

use crate::{
    logging::{self, Fallback, LogArgs},
    util,
};

use self::{battle::BattleArg, simulate::SimulateArg};

mod battle;
mod simulate;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    #[clap(flatten)]
    log: LogArgs,
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Play a two-player battle in the terminal
    Battle(#[clap(flatten)] BattleArg),
    /// Run AI-vs-AI battles headless and report the results as JSON
    Simulate(#[clap(flatten)] SimulateArg),
}

/// Battle settings shared by every subcommand.
///
/// Values given on the command line override the config file, which in turn
/// overrides the built-in defaults.
#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct MatchArgs {
    /// Path to a battle config file (JSON format)
    #[clap(long)]
    config: Option<PathBuf>,
    /// Match mode: normal, item, timelimit, playervsai or aivsai
    #[clap(long)]
    mode: Option<GameMode>,
    /// AI strength in player-vs-AI battles: normal or hard
    #[clap(long)]
    difficulty: Option<Difficulty>,
    /// Block sequence seed shared by both players (32 hex digits)
    #[clap(long)]
    seed: Option<BlockSeed>,
    /// Countdown length of time-limit battles in seconds
    #[clap(long)]
    time_limit: Option<u32>,
    /// Interval between gravity steps in milliseconds
    #[clap(long)]
    gravity_ms: Option<u64>,
}

impl MatchArgs {
    pub(crate) fn resolve(&self) -> anyhow::Result<BattleConfig> {
        let mut config = match &self.config {
            Some(path) => util::read_battle_config_file(path)?,
            None => BattleConfig::default(),
        };
        if let Some(mode) = self.mode {
            config.mode = mode;
        }
        if let Some(difficulty) = self.difficulty {
            config.difficulty = difficulty;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(time_limit) = self.time_limit {
            config.time_limit_secs = time_limit;
        }
        if let Some(gravity_ms) = self.gravity_ms {
            config.gravity_interval = Duration::from_millis(gravity_ms);
        }
        config.validate()?;
        Ok(config)
    }
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode.unwrap_or(Mode::Battle(BattleArg::default())) {
        Mode::Battle(arg) => {
            logging::init(&args.log, Fallback::Discard)?;
            battle::run(&arg)?;
        }
        Mode::Simulate(arg) => {
            logging::init(&args.log, Fallback::Stderr)?;
            simulate::run(&arg)?;
        }
    }
    Ok(())
}
