use std::rc::Rc;

use duelris_battle::BattleCoordinator;
use duelris_engine::SystemClock;

use crate::{
    command::{MatchArgs, battle::app::BattleApp},
    tui::Tui,
};

mod app;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct BattleArg {
    #[clap(flatten)]
    match_args: MatchArgs,
}

impl BattleArg {
    #[cfg(test)]
    pub(crate) fn match_args(&self) -> &MatchArgs {
        &self.match_args
    }
}

pub(crate) fn run(arg: &BattleArg) -> anyhow::Result<()> {
    let config = arg.match_args.resolve()?;
    tracing::info!(mode = %config.mode, difficulty = %config.difficulty, "starting battle");
    let battle = BattleCoordinator::new(config, Rc::new(SystemClock::new()))?;

    let mut app = BattleApp::new(battle);
    Tui::new().run(&mut app)?;

    match app.finish() {
        Some(outcome) => println!(
            "{} wins ({} - {})",
            outcome.winner, outcome.scores[0], outcome.scores[1]
        ),
        None => println!("Battle abandoned"),
    }
    Ok(())
}
