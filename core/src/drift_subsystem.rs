//! Yearly attribute drift and the "another year" log entry.
//!
//! Small independent deltas, each clamped:
//!   beauty/looks  [-1, 1], [-2, 1] after 30 (one delta applied to both)
//!   luck          [-1, 1]
//!   reputation    [0, 2]   only after 16
//!   income power  [0, 3]   only after 18
//!   health        [-1, 1]
//!   happiness     [-1, 2]
//!
//! Draws happen in that order; gated stats draw nothing when skipped.

use crate::{
    attributes::Stat,
    effect::Effect,
    event::LifeEventKind,
    rng::LifeRng,
    subsystem::{StepFlow, YearContext, YearSubsystem},
    types::Age,
};

pub struct DriftSubsystem;

/// Roll this year's drift for a subject of `age`.
pub fn roll_drift(age: Age, rng: &mut dyn LifeRng) -> Effect {
    let appearance = if age > 30 { draw(rng, -2, 1) } else { draw(rng, -1, 1) };
    let luck = draw(rng, -1, 1);
    let reputation = if age > 16 { draw(rng, 0, 2) } else { 0 };
    let income_power = if age > 18 { draw(rng, 0, 3) } else { 0 };
    let health = draw(rng, -1, 1);
    let happiness = draw(rng, -1, 2);

    Effect::new()
        .stat(Stat::Beauty, appearance)
        .stat(Stat::Looks, appearance)
        .stat(Stat::Luck, luck)
        .stat(Stat::Reputation, reputation)
        .stat(Stat::IncomePower, income_power)
        .stat(Stat::Health, health)
        .stat(Stat::Happiness, happiness)
}

fn draw(rng: &mut dyn LifeRng, lo: i64, hi: i64) -> i32 {
    rng.range_inclusive(lo, hi) as i32
}

impl YearSubsystem for DriftSubsystem {
    fn name(&self) -> &'static str {
        "drift"
    }

    fn apply(&self, ctx: &mut YearContext<'_>, rng: &mut dyn LifeRng) -> StepFlow {
        let drift = roll_drift(ctx.subject.age, rng);
        let impact = ctx.apply(&drift);
        ctx.log(LifeEventKind::Age, "Another year passed", "A new year begins.", impact);
        StepFlow::Continue
    }
}
