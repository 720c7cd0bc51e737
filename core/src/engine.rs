//! The year engine: one simulated year as a pure step over the subject.
//!
//! EXECUTION ORDER (fixed, documented, never reordered):
//!   0. Engine internals: age +1, orientation resolution
//!   1. Mortality          (halts the year on death)
//!   2. Economy
//!   3. Household          (spouse, children)
//!   4. Milestone
//!   5. Random event
//!   6. Career             (first job, promotion)
//!   7. Relationship       (dating, marriage, birth)
//!   8. Drift              (the "another year" entry)
//!
//! RULES:
//!   - Steps execute in registration order, once per year.
//!   - Later steps observe the mutations of earlier ones.
//!   - All randomness flows through the single `LifeRng` passed in.
//!   - A dead subject is never advanced.
//!
//! Selecting the next story node and activity set happens in the session,
//! after the engine returns.

use crate::{
    career_subsystem::CareerSubsystem,
    config::EngineConfig,
    drift_subsystem::DriftSubsystem,
    economy_subsystem::EconomySubsystem,
    event::LifeEvent,
    household_subsystem::HouseholdSubsystem,
    milestone_subsystem::MilestoneSubsystem,
    mortality_subsystem::MortalitySubsystem,
    random_event_subsystem::RandomEventSubsystem,
    relationship_subsystem::RelationshipSubsystem,
    rng::LifeRng,
    subject::{SexualOrientation, Subject},
    subsystem::{StepFlow, YearContext, YearSubsystem},
};
use std::sync::Arc;

/// The result of advancing one year.
#[derive(Debug, Clone)]
pub struct YearOutcome {
    pub subject: Subject,
    /// Entries logged during the year, oldest first.
    pub events:  Vec<LifeEvent>,
    pub died:    bool,
}

pub struct YearEngine {
    config: Arc<EngineConfig>,
    steps:  Vec<Box<dyn YearSubsystem>>,
}

impl YearEngine {
    /// An engine with no steps registered.
    pub fn new(config: Arc<EngineConfig>) -> Self {
        Self {
            config,
            steps: Vec::new(),
        }
    }

    /// Build a fully wired engine with all steps registered.
    /// Call this instead of new() + manual register() calls.
    pub fn build(config: Arc<EngineConfig>) -> Self {
        let mut engine = YearEngine::new(config);

        // EXECUTION ORDER: fixed, documented, never reordered.
        engine.register(Box::new(MortalitySubsystem));
        engine.register(Box::new(EconomySubsystem));
        engine.register(Box::new(HouseholdSubsystem));
        engine.register(Box::new(MilestoneSubsystem));
        engine.register(Box::new(RandomEventSubsystem));
        engine.register(Box::new(CareerSubsystem));
        engine.register(Box::new(RelationshipSubsystem));
        engine.register(Box::new(DriftSubsystem));
        engine
    }

    /// Register a step. Call in the documented execution order.
    pub fn register(&mut self, step: Box<dyn YearSubsystem>) {
        self.steps.push(step);
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Registered step names, in execution order.
    pub fn step_names(&self) -> Vec<&'static str> {
        self.steps.iter().map(|s| s.name()).collect()
    }

    /// Advance `subject` by one year. Returns `None` for a dead subject.
    pub fn advance(&self, subject: &Subject, rng: &mut dyn LifeRng) -> Option<YearOutcome> {
        if !subject.alive {
            return None;
        }

        let mut ctx = YearContext::new(subject.clone(), &self.config);
        ctx.subject.age += 1;
        resolve_orientation(&mut ctx.subject, self.config.rates.orientation_min_age, rng);

        let mut died = false;
        for step in &self.steps {
            if step.apply(&mut ctx, rng) == StepFlow::Halt {
                log::debug!("age {}: year halted by {}", ctx.subject.age, step.name());
                died = !ctx.subject.alive;
                break;
            }
        }

        Some(YearOutcome {
            subject: ctx.subject,
            events: ctx.events,
            died,
        })
    }
}

/// Settle a questioning orientation once the subject is old enough.
/// One roll in [1, 100]: 1-55 heterosexual, 56-70 homosexual,
/// 71-90 bisexual/pan, 91-98 asexual, 99-100 bisexual/pan.
pub fn resolve_orientation(subject: &mut Subject, min_age: u32, rng: &mut dyn LifeRng) {
    if subject.orientation != SexualOrientation::Questioning || subject.age < min_age {
        return;
    }
    subject.orientation = match rng.range_inclusive(1, 100) {
        1..=55 => SexualOrientation::Heterosexual,
        56..=70 => SexualOrientation::Homosexual,
        71..=90 => SexualOrientation::BisexualPan,
        91..=98 => SexualOrientation::Asexual,
        _ => SexualOrientation::BisexualPan,
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        attributes::Stat,
        family::IncomeLevel,
        rng::{ScriptedRng, SimRng},
        subject::{create_subject, tests::family_with_income, DeathCause, SubjectSeed},
    };

    fn subject() -> Subject {
        create_subject(
            SubjectSeed {
                name: "Kivanc".into(),
                gender: "Male".into(),
                country: "Turkey".into(),
            },
            family_with_income(IncomeLevel::Medium),
            &EngineConfig::default(),
            &mut SimRng::new(18),
        )
    }

    #[test]
    fn steps_register_in_documented_order() {
        let engine = YearEngine::build(Arc::new(EngineConfig::default()));
        assert_eq!(
            engine.step_names(),
            vec![
                "mortality",
                "economy",
                "household",
                "milestone",
                "random_event",
                "career",
                "relationship",
                "drift"
            ]
        );
    }

    #[test]
    fn advance_is_a_pure_step() {
        let engine = YearEngine::build(Arc::new(EngineConfig::default()));
        let before = subject();
        let outcome = engine.advance(&before, &mut SimRng::new(1)).unwrap();
        assert_eq!(before.age, 0);
        assert_eq!(outcome.subject.age, 1);
        assert!(!outcome.died);
        assert_eq!(outcome.events.last().unwrap().title, "Another year passed");
    }

    #[test]
    fn death_halts_the_year() {
        let engine = YearEngine::build(Arc::new(EngineConfig::default()));
        let mut s = subject();
        s.age = 40;
        s.salary = 50_000;
        s.job_title = Some("Senior".into());
        s.stats.set(Stat::Health, 0);
        let money = s.money;
        let outcome = engine.advance(&s, &mut ScriptedRng::new([])).unwrap();
        assert!(outcome.died);
        assert_eq!(outcome.subject.death_cause, Some(DeathCause::Health));
        assert_eq!(outcome.subject.money, money);
        assert_eq!(outcome.events.len(), 1);
    }

    #[test]
    fn dead_subject_is_not_advanced() {
        let engine = YearEngine::build(Arc::new(EngineConfig::default()));
        let mut s = subject();
        s.die(DeathCause::Illness);
        assert!(engine.advance(&s, &mut SimRng::new(1)).is_none());
    }

    #[test]
    fn orientation_waits_for_min_age_and_resolves_once() {
        let mut s = subject();
        s.age = 11;
        resolve_orientation(&mut s, 12, &mut ScriptedRng::new([]));
        assert_eq!(s.orientation, SexualOrientation::Questioning);

        s.age = 12;
        // roll = floor(0.6 * 100) + 1 = 61
        resolve_orientation(&mut s, 12, &mut ScriptedRng::new([0.6]));
        assert_eq!(s.orientation, SexualOrientation::Homosexual);

        let mut rng = ScriptedRng::new([0.0]);
        resolve_orientation(&mut s, 12, &mut rng);
        assert_eq!(s.orientation, SexualOrientation::Homosexual);
        assert_eq!(rng.drawn(), 0);
    }

    #[test]
    fn orientation_roll_bands() {
        let cases = [
            (0.0, SexualOrientation::Heterosexual),
            (0.54, SexualOrientation::Heterosexual),
            (0.55, SexualOrientation::Homosexual),
            (0.75, SexualOrientation::BisexualPan),
            (0.95, SexualOrientation::Asexual),
            (0.99, SexualOrientation::BisexualPan),
        ];
        for (draw, expected) in cases {
            let mut s = subject();
            s.age = 12;
            resolve_orientation(&mut s, 12, &mut ScriptedRng::new([draw]));
            assert_eq!(s.orientation, expected, "draw {draw}");
        }
    }
}
