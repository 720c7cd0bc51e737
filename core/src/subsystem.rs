//! Year-step trait and the context each step works on.
//!
//! RULE: Every per-year step implements YearSubsystem.
//! The engine calls apply() on each registered step in registration
//! order, once per year. Later steps observe the mutations of earlier
//! ones within the same year.
//! Execution order is fixed and documented in engine.rs.

use crate::{
    config::EngineConfig,
    effect::Effect,
    event::{LifeEvent, LifeEventKind},
    rng::LifeRng,
    subject::Subject,
};

/// Whether the rest of the year still runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepFlow {
    Continue,
    /// Stop processing this year (the subject died).
    Halt,
}

/// The year being built: the subject's next state plus everything logged
/// along the way.
pub struct YearContext<'a> {
    pub subject: Subject,
    pub config:  &'a EngineConfig,
    pub events:  Vec<LifeEvent>,
}

impl<'a> YearContext<'a> {
    pub fn new(subject: Subject, config: &'a EngineConfig) -> Self {
        Self {
            subject,
            config,
            events: Vec::new(),
        }
    }

    /// Append a log entry stamped with the subject's current age.
    pub fn log(
        &mut self,
        kind: LifeEventKind,
        title: impl Into<String>,
        description: impl Into<String>,
        impact: Option<String>,
    ) {
        let age = self.subject.age;
        self.events
            .push(LifeEvent::new(age, kind, title, description).with_impact(impact));
    }

    /// Apply an effect to the subject and return its summary.
    pub fn apply(&mut self, effect: &Effect) -> Option<String> {
        effect.apply(&mut self.subject)
    }
}

/// The contract every per-year step must fulfill.
pub trait YearSubsystem: Send {
    /// Unique stable name for this step.
    fn name(&self) -> &'static str;

    /// Called once per year by the engine.
    ///
    /// - `ctx`: the subject being advanced, the tables, and this year's log
    /// - `rng`: the session's single random stream
    fn apply(&self, ctx: &mut YearContext<'_>, rng: &mut dyn LifeRng) -> StepFlow;
}
