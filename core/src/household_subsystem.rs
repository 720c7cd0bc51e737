//! Spouse and children, once per year.
//!
//! The spouse ages, counts another year together, and the relationship
//! quality drifts. A poor marriage may end in divorce, which clears the
//! spouse and costs happiness. Children simply age.
//!
//! Draw order: quality drift, then the divorce roll only when quality is
//! below the threshold and the subject is an adult.

use crate::{
    attributes::Stat,
    effect::Effect,
    event::LifeEventKind,
    rng::LifeRng,
    subject::RelationshipStatus,
    subsystem::{StepFlow, YearContext, YearSubsystem},
    types::clamp_stat,
};

pub struct HouseholdSubsystem;

impl HouseholdSubsystem {
    fn update_spouse(&self, ctx: &mut YearContext<'_>, rng: &mut dyn LifeRng) {
        if ctx.subject.relationship != RelationshipStatus::Married {
            return;
        }
        let config = ctx.config;
        let rates = &config.rates;
        let subject_age = ctx.subject.age;
        let Some(spouse) = ctx.subject.spouse.as_mut() else {
            return;
        };

        spouse.age += 1;
        spouse.years_together += 1;
        let drift = rng.range_inclusive(-rates.spouse_quality_drift, rates.spouse_quality_drift) as i32;
        spouse.relationship_quality = clamp_stat(spouse.relationship_quality + drift);

        let divorce = spouse.relationship_quality < rates.divorce_quality_below
            && subject_age >= rates.divorce_min_age
            && rng.chance(rates.divorce_chance);
        if !divorce {
            return;
        }

        let name = spouse.name.clone();
        let penalty = Effect::new().stat(Stat::Happiness, -rates.divorce_happiness_penalty);
        ctx.subject.spouse = None;
        ctx.subject.partner_name = None;
        ctx.subject.relationship = RelationshipStatus::Single;
        let impact = ctx.apply(&penalty);
        log::info!("subject '{}' divorced {name} at {subject_age}", ctx.subject.name);
        ctx.log(
            LifeEventKind::Relationship,
            "Divorced",
            format!("You split up with {name}."),
            impact,
        );
    }
}

impl YearSubsystem for HouseholdSubsystem {
    fn name(&self) -> &'static str {
        "household"
    }

    fn apply(&self, ctx: &mut YearContext<'_>, rng: &mut dyn LifeRng) -> StepFlow {
        self.update_spouse(ctx, rng);
        for child in &mut ctx.subject.children {
            child.age += 1;
        }
        StepFlow::Continue
    }
}
