use crate::{
    rng::LifeRng,
    session::{LifeSession, Outcome},
};
use serde::{Deserialize, Serialize};

/// All player-issued commands.
/// Variants are added over time, never removed or reordered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum PlayerCommand {
    // ── Turn ──────────────────────────────────────
    ChooseOption { index: usize },
    UseActivity { index: usize },
    AdvanceYear,

    // ── Log ───────────────────────────────────────
    LogCategoryVisit {
        title: String,
        #[serde(default)]
        note:  Option<String>,
    },
}

impl PlayerCommand {
    /// Run this command against `session`.
    pub fn execute<R: LifeRng>(&self, session: &mut LifeSession<R>) -> Outcome {
        match self {
            PlayerCommand::ChooseOption { index } => session.choose_option(*index),
            PlayerCommand::UseActivity { index } => session.use_activity(*index),
            PlayerCommand::AdvanceYear => session.advance_year(),
            PlayerCommand::LogCategoryVisit { title, note } => {
                session.log_category_visit(title, note.as_deref());
                Outcome::Applied
            }
        }
    }
}
