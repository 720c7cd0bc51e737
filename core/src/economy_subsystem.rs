//! Yearly household economy.
//!
//! An employed subject banks a year's salary, minus living expenses,
//! an extra share when married, and a share per child. Every share is
//! computed from salary and truncated to whole units.
//! No randomness.

use crate::{
    config::YearlyRates,
    rng::LifeRng,
    subject::{RelationshipStatus, Subject},
    subsystem::{StepFlow, YearContext, YearSubsystem},
    types::Money,
};

pub struct EconomySubsystem;

/// Salary share as whole currency units.
fn share(salary: Money, fraction: f64) -> Money {
    (salary as f64 * fraction) as Money
}

/// Total yearly expenses for `subject` given its salary.
pub fn yearly_expenses(subject: &Subject, rates: &YearlyRates) -> Money {
    let salary = subject.salary;
    let mut expenses = share(salary, rates.living_expense_share);
    if subject.relationship == RelationshipStatus::Married {
        expenses += share(salary, rates.spouse_expense_share);
    }
    expenses += subject.children.len() as Money * share(salary, rates.child_expense_share);
    expenses
}

impl YearSubsystem for EconomySubsystem {
    fn name(&self) -> &'static str {
        "economy"
    }

    fn apply(&self, ctx: &mut YearContext<'_>, _rng: &mut dyn LifeRng) -> StepFlow {
        if ctx.subject.salary <= 0 {
            return StepFlow::Continue;
        }
        let salary = ctx.subject.salary;
        let expenses = yearly_expenses(&ctx.subject, &ctx.config.rates);
        ctx.subject.adjust_money(salary);
        ctx.subject.adjust_money(-expenses);
        log::debug!(
            "age {}: salary {salary}, expenses {expenses}, balance {}",
            ctx.subject.age,
            ctx.subject.money
        );
        StepFlow::Continue
    }
}
