//! Death-risk check.
//!
//! Three independent hazards, checked in order:
//!   - health at or below zero: certain death
//!   - depression: very low happiness after the orientation age
//!   - accident / illness / natural causes: grows with age, capped
//!
//! A death halts the rest of the year.

use crate::{
    attributes::Stat,
    event::LifeEventKind,
    rng::{pick, LifeRng},
    subject::DeathCause,
    subsystem::{StepFlow, YearContext, YearSubsystem},
};

pub struct MortalitySubsystem;

impl MortalitySubsystem {
    fn roll(&self, ctx: &YearContext<'_>, rng: &mut dyn LifeRng) -> Option<(DeathCause, &'static str)> {
        let s = &ctx.subject;
        let rates = &ctx.config.rates;

        if s.stat(Stat::Health) <= 0 {
            return Some((DeathCause::Health, "Your health gave out."));
        }

        if s.stat(Stat::Happiness) <= rates.depression_happiness_max
            && s.age >= rates.depression_min_age
            && rng.chance(rates.depression_death_chance)
        {
            return Some((DeathCause::Depression, "Your happiness had run out."));
        }

        if s.age > rates.accident_min_age {
            let chance = accident_chance(s.age - rates.accident_min_age, rates.accident_chance_per_year)
                .min(rates.accident_chance_cap);
            if rng.chance(chance) {
                let cause = pick(rng, &DeathCause::RANDOM_POOL)
                    .copied()
                    .unwrap_or(DeathCause::NaturalCauses);
                let note = match cause {
                    DeathCause::Accident => "You died in an accident.",
                    DeathCause::Illness => "An illness took you.",
                    _ => "You died of natural causes.",
                };
                return Some((cause, note));
            }
        }

        None
    }
}

/// Per-year accident death chance after `years_over` years past the
/// minimum age, before the cap.
pub fn accident_chance(years_over: u32, per_year: f64) -> f64 {
    years_over as f64 * per_year
}

impl YearSubsystem for MortalitySubsystem {
    fn name(&self) -> &'static str {
        "mortality"
    }

    fn apply(&self, ctx: &mut YearContext<'_>, rng: &mut dyn LifeRng) -> StepFlow {
        let Some((cause, note)) = self.roll(ctx, rng) else {
            return StepFlow::Continue;
        };

        ctx.subject.die(cause);
        log::info!(
            "subject '{}' died at {} ({cause})",
            ctx.subject.name,
            ctx.subject.age
        );
        ctx.log(LifeEventKind::Random, "You died", note, None);
        StepFlow::Halt
    }
}
