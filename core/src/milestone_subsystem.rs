//! One-time achievements.
//!
//! RULE: each achievement is unlocked at most once per life. Every unlock
//! is also written to the log as a milestone entry.
//! No randomness.

use crate::{
    event::LifeEventKind,
    rng::LifeRng,
    subject::{EducationLevel, RelationshipStatus, Subject},
    subsystem::{StepFlow, YearContext, YearSubsystem},
    types::Age,
};

pub const STARTED_PRIMARY: &str = "Started primary school";
pub const STARTED_SECONDARY: &str = "Started secondary school";
pub const STARTED_UNIVERSITY: &str = "Started university";
pub const FIRST_JOB: &str = "First job";
pub const MARRIED: &str = "Married";
pub const FIRST_CHILD: &str = "First child";

/// Age at which each education level normally begins.
const EDUCATION_STARTS: [(Age, EducationLevel, &str, &str); 3] = [
    (6, EducationLevel::Primary, STARTED_PRIMARY, "You started primary school!"),
    (12, EducationLevel::Secondary, STARTED_SECONDARY, "You started secondary school!"),
    (18, EducationLevel::University, STARTED_UNIVERSITY, "You started university!"),
];

pub struct MilestoneSubsystem;

/// Achievements the subject qualifies for right now, with their log text.
pub fn reached_milestones(subject: &Subject) -> Vec<(&'static str, &'static str)> {
    let mut reached: Vec<(&'static str, &'static str)> = EDUCATION_STARTS
        .iter()
        .filter(|(age, level, _, _)| subject.age == *age && subject.education == *level)
        .map(|(_, _, label, note)| (*label, *note))
        .collect();

    if subject.job_title.is_some() {
        reached.push((FIRST_JOB, "You landed your first job."));
    }
    if subject.relationship == RelationshipStatus::Married {
        reached.push((MARRIED, "You tied the knot."));
    }
    if !subject.children.is_empty() {
        reached.push((FIRST_CHILD, "You became a parent."));
    }
    reached
}

impl YearSubsystem for MilestoneSubsystem {
    fn name(&self) -> &'static str {
        "milestone"
    }

    fn apply(&self, ctx: &mut YearContext<'_>, _rng: &mut dyn LifeRng) -> StepFlow {
        for (label, note) in reached_milestones(&ctx.subject) {
            if ctx.subject.unlock(label) {
                log::debug!("age {}: unlocked '{label}'", ctx.subject.age);
                ctx.log(LifeEventKind::Milestone, "Milestone", note, Some(label.to_string()));
            }
        }
        StepFlow::Continue
    }
}
