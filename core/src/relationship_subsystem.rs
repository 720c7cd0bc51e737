//! Relationship progression: single -> dating -> married -> children.
//!
//! One branch per year, chosen by current status:
//!   - single, old enough: may start dating (partner name remembered)
//!   - dating, adult: may marry; the partner becomes the spouse
//!   - married with a spouse, in the birth window, below the child cap:
//!     may have a child
//!
//! Draw order per branch:
//!   dating:   roll, partner name
//!   marriage: roll, [partner name if none], [spouse age, gender, quality, id]
//!   birth:    roll, child name, gender, id

use crate::{
    attributes::Stat,
    effect::Effect,
    event::LifeEventKind,
    rng::{pick, LifeRng},
    subject::{Child, RelationshipStatus, Spouse},
    subsystem::{StepFlow, YearContext, YearSubsystem},
    types::clamp_stat,
};

pub struct RelationshipSubsystem;

const FALLBACK_PARTNER: &str = "Partner";
const FALLBACK_GENDER: &str = "Female";

impl RelationshipSubsystem {
    fn start_dating(&self, ctx: &mut YearContext<'_>, rng: &mut dyn LifeRng) {
        let config = ctx.config;
        let rates = &config.rates;
        if ctx.subject.age < rates.dating_min_age || !rng.chance(rates.dating_chance) {
            return;
        }
        let partner = pick(rng, &config.names.partner)
            .cloned()
            .unwrap_or_else(|| FALLBACK_PARTNER.into());

        ctx.subject.relationship = RelationshipStatus::Dating;
        ctx.subject.partner_name = Some(partner.clone());
        let impact = ctx.apply(&Effect::new().stat(Stat::Happiness, rates.dating_happiness));
        log::debug!("age {}: started dating {partner}", ctx.subject.age);
        ctx.log(
            LifeEventKind::Relationship,
            "New relationship",
            format!("You started dating {partner}."),
            impact,
        );
    }

    fn marry(&self, ctx: &mut YearContext<'_>, rng: &mut dyn LifeRng) {
        let config = ctx.config;
        let rates = &config.rates;
        if ctx.subject.age < rates.marriage_min_age || !rng.chance(rates.marriage_chance) {
            return;
        }
        let name = match ctx.subject.partner_name.clone() {
            Some(name) => name,
            None => pick(rng, &config.names.partner)
                .cloned()
                .unwrap_or_else(|| FALLBACK_PARTNER.into()),
        };

        if ctx.subject.spouse.is_none() {
            let age_offset = rng.range_inclusive(-rates.spouse_age_spread, rates.spouse_age_spread);
            let gender = pick(rng, &config.names.genders)
                .cloned()
                .unwrap_or_else(|| FALLBACK_GENDER.into());
            let quality = rates.spouse_quality_base
                + rng.range_inclusive(-rates.spouse_quality_spread, rates.spouse_quality_spread) as i32;
            ctx.subject.spouse = Some(Spouse {
                id: rng.uuid(),
                name: name.clone(),
                age: (ctx.subject.age as i64 + age_offset).max(0) as u32,
                gender,
                occupation: None,
                relationship_quality: clamp_stat(quality),
                years_together: 0,
            });
        }

        ctx.subject.relationship = RelationshipStatus::Married;
        ctx.subject.partner_name = Some(name.clone());
        let impact = ctx.apply(&Effect::new().stat(Stat::Happiness, rates.marriage_happiness));
        log::info!("subject '{}' married {name} at {}", ctx.subject.name, ctx.subject.age);
        ctx.log(
            LifeEventKind::Relationship,
            "Married!",
            format!("You married {name}."),
            impact,
        );
    }

    fn have_child(&self, ctx: &mut YearContext<'_>, rng: &mut dyn LifeRng) {
        let config = ctx.config;
        let rates = &config.rates;
        let s = &ctx.subject;
        let eligible = s.spouse.is_some()
            && (rates.birth_min_age..=rates.birth_max_age).contains(&s.age)
            && s.children.len() < rates.max_children;
        if !eligible || !rng.chance(rates.birth_chance) {
            return;
        }
        let name = pick(rng, &config.names.child)
            .cloned()
            .unwrap_or_else(|| "Baby".into());
        let gender = pick(rng, &config.names.genders)
            .cloned()
            .unwrap_or_else(|| FALLBACK_GENDER.into());

        ctx.subject.children.push(Child {
            id: rng.uuid(),
            name: name.clone(),
            age: 0,
            gender,
            relationship_quality: rates.child_quality,
        });
        let impact = ctx.apply(&Effect::new().stat(Stat::Happiness, rates.birth_happiness));
        log::info!("subject '{}' had a child, {name}", ctx.subject.name);
        ctx.log(
            LifeEventKind::Relationship,
            "A child is born!",
            format!("{name} came into the world."),
            impact,
        );
    }
}

impl YearSubsystem for RelationshipSubsystem {
    fn name(&self) -> &'static str {
        "relationship"
    }

    fn apply(&self, ctx: &mut YearContext<'_>, rng: &mut dyn LifeRng) -> StepFlow {
        match ctx.subject.relationship {
            RelationshipStatus::Single => self.start_dating(ctx, rng),
            RelationshipStatus::Dating => self.marry(ctx, rng),
            RelationshipStatus::Married => self.have_child(ctx, rng),
        }
        StepFlow::Continue
    }
}
