//! Work: the first-job offer and yearly promotion chances.
//!
//! First job: only in the exact year the subject reaches `first_job_age`
//! with no job yet. The starter salary is `base + uniform[0, spread]`.
//!
//! Promotion: any adult with a paying job rolls once a year with
//! probability `(smarts + reputation) / 200`. A title outside the tier
//! table promotes to the entry tier; the top tier has nowhere to go and
//! does not roll. New salary = tier base + tier base * income power / 100,
//! using income power from before the promotion bonus.

use crate::{
    attributes::Stat,
    config::CareerTables,
    effect::Effect,
    event::LifeEventKind,
    rng::{pick, LifeRng},
    subject::Subject,
    subsystem::{StepFlow, YearContext, YearSubsystem},
    types::Money,
};

pub struct CareerSubsystem;

/// Salary for `title` given the subject's income power.
pub fn salary_for(career: &CareerTables, title: &str, income_power: i32) -> Option<Money> {
    career
        .tier(title)
        .map(|tier| tier.base_salary + tier.base_salary * income_power as Money / 100)
}

/// Yearly promotion probability.
pub fn promotion_chance(subject: &Subject) -> f64 {
    (subject.stat(Stat::Smarts) + subject.stat(Stat::Reputation)) as f64 / 200.0
}

impl CareerSubsystem {
    fn offer_first_job(&self, ctx: &mut YearContext<'_>, rng: &mut dyn LifeRng) {
        let config = ctx.config;
        let (rates, career) = (&config.rates, &config.career);
        if ctx.subject.age != rates.first_job_age || ctx.subject.job_title.is_some() {
            return;
        }
        if !rng.chance(rates.first_job_chance) {
            return;
        }
        let Some(job) = pick(rng, &career.first_jobs) else {
            return;
        };
        let salary = career.first_job_salary_base + rng.range_inclusive(0, career.first_job_salary_spread);

        let effect = Effect::new()
            .set_job_title(job.as_str())
            .stat(Stat::IncomePower, career.first_job_income_power);
        let summary = ctx.apply(&effect);
        ctx.subject.salary = salary;
        log::info!("subject '{}' started work as {job} at {salary}", ctx.subject.name);
        ctx.log(
            LifeEventKind::Career,
            "Your first job!",
            format!("You started working as a {job}."),
            with_salary(summary, salary),
        );
    }

    fn try_promotion(&self, ctx: &mut YearContext<'_>, rng: &mut dyn LifeRng) {
        let config = ctx.config;
        let career = &config.career;
        if ctx.subject.age < config.rates.career_min_age || !ctx.subject.is_employed() {
            return;
        }
        let Some(current) = ctx.subject.job_title.clone() else {
            return;
        };
        let successors = career.successors_of(&current);
        if successors.is_empty() {
            return;
        }
        if !rng.chance(promotion_chance(&ctx.subject)) {
            return;
        }
        let Some(next) = pick(rng, &successors).map(|s| s.to_string()) else {
            return;
        };

        let salary = salary_for(career, &next, ctx.subject.stat(Stat::IncomePower))
            .unwrap_or(ctx.subject.salary);
        let effect = Effect::new()
            .set_job_title(next.as_str())
            .stat(Stat::IncomePower, career.promotion_income_power);
        let summary = ctx.apply(&effect);
        ctx.subject.salary = salary;
        log::info!("subject '{}' promoted from {current} to {next}", ctx.subject.name);
        ctx.log(
            LifeEventKind::Career,
            "Promoted!",
            format!("New position: {next}."),
            with_salary(summary, salary),
        );
    }
}

fn with_salary(summary: Option<String>, salary: Money) -> Option<String> {
    let salary = format!("Salary {salary}");
    Some(match summary {
        Some(s) => format!("{s}, {salary}"),
        None => salary,
    })
}

impl YearSubsystem for CareerSubsystem {
    fn name(&self) -> &'static str {
        "career"
    }

    fn apply(&self, ctx: &mut YearContext<'_>, rng: &mut dyn LifeRng) -> StepFlow {
        self.offer_first_job(ctx, rng);
        self.try_promotion(ctx, rng);
        StepFlow::Continue
    }
}
