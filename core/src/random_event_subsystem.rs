//! Flavor events: a chance each year to draw one event from the pool and
//! apply its effect.

use crate::{
    event::LifeEventKind,
    rng::{pick, LifeRng},
    subsystem::{StepFlow, YearContext, YearSubsystem},
};

pub struct RandomEventSubsystem;

impl YearSubsystem for RandomEventSubsystem {
    fn name(&self) -> &'static str {
        "random_event"
    }

    fn apply(&self, ctx: &mut YearContext<'_>, rng: &mut dyn LifeRng) -> StepFlow {
        let config = ctx.config;
        if !rng.chance(config.rates.random_event_chance) {
            return StepFlow::Continue;
        }
        let Some(event) = pick(rng, &config.random_events.events) else {
            return StepFlow::Continue;
        };

        let impact = ctx.apply(&event.effect);
        log::debug!("age {}: random event '{}'", ctx.subject.age, event.title);
        ctx.log(LifeEventKind::Random, event.title.clone(), event.description.clone(), impact);
        StepFlow::Continue
    }
}
