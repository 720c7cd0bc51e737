//! Sparse deltas applied to a subject.
//!
//! An `Effect` is an ordered list of `Change`s. Absent fields mean "no
//! change", so an empty list is the identity. Application is total: it
//! never fails for a well-formed effect.
//!
//! JSON shape (one object per change):
//!   [{ "kind": "stat", "stat": "luck", "delta": 2 },
//!    { "kind": "money", "delta": -500 },
//!    { "kind": "set_job_title", "title": "Barista" }]

use crate::{
    attributes::Stat,
    subject::{CareerPath, EducationLevel, RelationshipStatus, Subject},
    types::{signed, Money},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Change {
    Stat { stat: Stat, delta: i32 },
    Money { delta: Money },
    SetEducation { level: EducationLevel },
    SetRelationship { status: RelationshipStatus },
    SetJobTitle { title: String },
    SetCareerPath { path: CareerPath },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Effect {
    pub changes: Vec<Change>,
}

impl Effect {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn stat(mut self, stat: Stat, delta: i32) -> Self {
        self.changes.push(Change::Stat { stat, delta });
        self
    }

    pub fn money(mut self, delta: Money) -> Self {
        self.changes.push(Change::Money { delta });
        self
    }

    pub fn set_education(mut self, level: EducationLevel) -> Self {
        self.changes.push(Change::SetEducation { level });
        self
    }

    pub fn set_relationship(mut self, status: RelationshipStatus) -> Self {
        self.changes.push(Change::SetRelationship { status });
        self
    }

    pub fn set_job_title(mut self, title: impl Into<String>) -> Self {
        self.changes.push(Change::SetJobTitle { title: title.into() });
        self
    }

    pub fn set_career_path(mut self, path: CareerPath) -> Self {
        self.changes.push(Change::SetCareerPath { path });
        self
    }

    /// Apply every change to `subject` and describe what changed.
    ///
    /// Stats add then clamp to [0, 100]; money adds then floors at 0;
    /// set-changes overwrite. The summary lists the requested deltas
    /// (zero deltas are skipped) joined by ", ", or `None` when nothing
    /// was listed. A dead subject is left untouched.
    pub fn apply(&self, subject: &mut Subject) -> Option<String> {
        if !subject.alive {
            return None;
        }

        let mut parts: Vec<String> = Vec::new();
        for change in &self.changes {
            match change {
                Change::Stat { stat, delta } => {
                    subject.stats.adjust(*stat, *delta);
                    if *delta != 0 {
                        parts.push(format!("{} {}", stat.label(), signed(*delta as i64)));
                    }
                }
                Change::Money { delta } => {
                    subject.adjust_money(*delta);
                    if *delta != 0 {
                        parts.push(format!("Money {}", signed(*delta)));
                    }
                }
                Change::SetEducation { level } => {
                    subject.education = *level;
                    parts.push(format!("Education {}", level.label()));
                }
                Change::SetRelationship { status } => {
                    subject.relationship = *status;
                    parts.push(format!("Relationship {}", status.label()));
                }
                Change::SetJobTitle { title } => {
                    subject.job_title = Some(title.clone());
                    parts.push(format!("Job: {title}"));
                }
                Change::SetCareerPath { path } => {
                    subject.career_path = *path;
                    parts.push(format!("Career focus {}", path.label()));
                }
            }
        }

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }
}

/// Apply an optional effect, as carried by options and activities.
pub fn apply_optional(effect: Option<&Effect>, subject: &mut Subject) -> Option<String> {
    effect.and_then(|e| e.apply(subject))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::EngineConfig,
        family::IncomeLevel,
        rng::SimRng,
        subject::{create_subject, tests::family_with_income, SubjectSeed},
    };

    fn subject() -> Subject {
        create_subject(
            SubjectSeed {
                name: "Ada".into(),
                gender: "Female".into(),
                country: "Germany".into(),
            },
            family_with_income(IncomeLevel::Medium),
            &EngineConfig::default(),
            &mut SimRng::new(3),
        )
    }

    #[test]
    fn empty_effect_is_identity() {
        let mut s = subject();
        let before = s.clone();
        assert_eq!(Effect::new().apply(&mut s), None);
        assert_eq!(s, before);
    }

    #[test]
    fn summary_lists_signed_deltas_in_order() {
        let mut s = subject();
        let summary = Effect::new()
            .stat(Stat::Luck, 2)
            .stat(Stat::Reputation, -1)
            .money(1_000)
            .apply(&mut s);
        assert_eq!(summary.as_deref(), Some("Luck +2, Reputation -1, Money +1000"));
    }

    #[test]
    fn set_changes_overwrite() {
        let mut s = subject();
        let summary = Effect::new()
            .set_education(EducationLevel::University)
            .set_relationship(RelationshipStatus::Dating)
            .set_job_title("Barista")
            .set_career_path(CareerPath::Arts)
            .apply(&mut s)
            .unwrap();
        assert_eq!(s.education, EducationLevel::University);
        assert_eq!(s.relationship, RelationshipStatus::Dating);
        assert_eq!(s.job_title.as_deref(), Some("Barista"));
        assert_eq!(s.career_path, CareerPath::Arts);
        assert!(summary.contains("Job: Barista"));
    }

    #[test]
    fn money_floors_at_zero() {
        let mut s = subject();
        s.money = 300;
        Effect::new().money(-2_000).apply(&mut s);
        assert_eq!(s.money, 0);
    }

    #[test]
    fn zero_delta_is_not_reported() {
        let mut s = subject();
        assert_eq!(Effect::new().stat(Stat::Aura, 0).apply(&mut s), None);
    }

    #[test]
    fn dead_subject_is_untouched() {
        let mut s = subject();
        s.alive = false;
        let before = s.clone();
        assert_eq!(Effect::new().stat(Stat::Health, 10).apply(&mut s), None);
        assert_eq!(s, before);
    }

    #[test]
    fn parses_tagged_json() {
        let json = r#"[
            { "kind": "stat", "stat": "education_prestige", "delta": 4 },
            { "kind": "money", "delta": -500 },
            { "kind": "set_career_path", "path": "stem" }
        ]"#;
        let effect: Effect = serde_json::from_str(json).unwrap();
        assert_eq!(effect.changes.len(), 3);
        assert_eq!(
            effect.changes[0],
            Change::Stat { stat: Stat::EducationPrestige, delta: 4 }
        );
    }
}
