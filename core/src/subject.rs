//! The simulated life.
//!
//! RULE: once `alive` is false the subject is terminal. Nothing in the
//! engine mutates stats, relationships or career after death.

use crate::{
    attributes::{Attributes, Stat},
    config::EngineConfig,
    family::{FamilyBackground, IncomeLevel},
    rng::{pick, LifeRng},
    types::{clamp_stat, Age, Money},
};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EducationLevel {
    None,
    Primary,
    Secondary,
    University,
    Graduate,
}

impl EducationLevel {
    pub fn label(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Primary => "Primary school",
            Self::Secondary => "Secondary school",
            Self::University => "University",
            Self::Graduate => "Graduate school",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipStatus {
    Single,
    Dating,
    Married,
}

impl RelationshipStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Single => "Single",
            Self::Dating => "Dating",
            Self::Married => "Married",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CareerPath {
    Stem,
    Arts,
    Care,
    Business,
    Social,
    Trades,
}

impl CareerPath {
    pub const ALL: [CareerPath; 6] = [
        CareerPath::Stem,
        CareerPath::Arts,
        CareerPath::Care,
        CareerPath::Business,
        CareerPath::Social,
        CareerPath::Trades,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Stem => "STEM",
            Self::Arts => "Arts",
            Self::Care => "Care",
            Self::Business => "Business",
            Self::Social => "Social sciences",
            Self::Trades => "Trades",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SexualOrientation {
    Questioning,
    Heterosexual,
    Homosexual,
    BisexualPan,
    Asexual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeathCause {
    Health,
    Depression,
    Accident,
    Illness,
    NaturalCauses,
}

impl DeathCause {
    /// Causes drawn by the age-scaled random death roll.
    pub const RANDOM_POOL: [DeathCause; 3] = [
        DeathCause::Accident,
        DeathCause::Illness,
        DeathCause::NaturalCauses,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Health => "health",
            Self::Depression => "depression",
            Self::Accident => "accident",
            Self::Illness => "illness",
            Self::NaturalCauses => "natural_causes",
        }
    }
}

impl fmt::Display for DeathCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spouse {
    pub id:                   Uuid,
    pub name:                 String,
    pub age:                  Age,
    pub gender:               String,
    pub occupation:           Option<String>,
    pub relationship_quality: i32,
    pub years_together:       u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Child {
    pub id:                   Uuid,
    pub name:                 String,
    pub age:                  Age,
    pub gender:               String,
    pub relationship_quality: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    pub id:                  Uuid,
    pub name:                String,
    pub age:                 Age,
    pub gender:              String,
    pub country:             String,
    pub stats:               Attributes,
    pub money:               Money,
    pub education:           EducationLevel,
    pub job_title:           Option<String>,
    pub salary:              Money,
    pub relationship:        RelationshipStatus,
    /// Who the subject is dating; becomes the spouse on marriage.
    pub partner_name:        Option<String>,
    pub spouse:              Option<Spouse>,
    /// Birth order.
    pub children:            Vec<Child>,
    pub career_path:         CareerPath,
    pub orientation:         SexualOrientation,
    /// Unlock order; each label appears at most once.
    pub achievements:        Vec<String>,
    pub criminal_record:     Vec<String>,
    pub family:              FamilyBackground,
    pub alive:               bool,
    pub death_cause:         Option<DeathCause>,
    pub year_of_death:       Option<Age>,
}

impl Subject {
    pub fn stat(&self, stat: Stat) -> i32 {
        self.stats.get(stat)
    }

    pub fn is_employed(&self) -> bool {
        self.job_title.is_some() && self.salary > 0
    }

    pub fn has_achievement(&self, label: &str) -> bool {
        self.achievements.iter().any(|a| a == label)
    }

    /// Record an achievement. Returns false if it was already unlocked.
    pub fn unlock(&mut self, label: &str) -> bool {
        if self.has_achievement(label) {
            return false;
        }
        self.achievements.push(label.to_string());
        true
    }

    /// Add to money, flooring at zero. Returns the change actually applied.
    pub fn adjust_money(&mut self, delta: Money) -> Money {
        let before = self.money;
        self.money = (self.money.saturating_add(delta)).max(0);
        self.money - before
    }

    pub fn die(&mut self, cause: DeathCause) {
        self.alive = false;
        self.death_cause = Some(cause);
        self.year_of_death = Some(self.age);
    }
}

// ── Creation ───────────────────────────────────────────────────────────────

/// Player-chosen identity for a new life.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectSeed {
    pub name:    String,
    pub gender:  String,
    pub country: String,
}

/// Build a newborn subject. Starting stats follow the household income
/// bracket with bounded jitter.
pub fn create_subject(
    seed: SubjectSeed,
    family: FamilyBackground,
    config: &EngineConfig,
    rng: &mut dyn LifeRng,
) -> Subject {
    let income = family.household_income_level();
    let base = baseline_for(income);
    let (edu_base, network_base, income_base) = (
        education_base_for(income),
        network_base_for(income),
        income_power_base_for(income),
    );

    let mut stats = Attributes::uniform(50);
    stats.set(Stat::Health, 90);
    stats.set(Stat::Happiness, 85);
    stats.set(Stat::Smarts, jittered(rng, base, 12));
    stats.set(Stat::Looks, jittered(rng, base, 12));
    stats.set(Stat::Intelligence, jittered(rng, base, 12));
    stats.set(Stat::Beauty, jittered(rng, base, 14));
    stats.set(Stat::Luck, jittered(rng, 48, 18));
    stats.set(Stat::Aura, jittered(rng, base, 10));
    stats.set(Stat::EducationPrestige, jittered(rng, edu_base, 12));
    stats.set(Stat::Network, jittered(rng, network_base, 15));
    stats.set(Stat::Reputation, jittered(rng, 50, 20));
    stats.set(Stat::IncomePower, jittered(rng, income_base, 15));

    let money = rng.range_inclusive(0, 5_000);
    let career_path = pick(rng, &CareerPath::ALL)
        .copied()
        .unwrap_or(CareerPath::Social);

    let name = if seed.name.trim().is_empty() {
        pick(rng, &config.names.subject)
            .cloned()
            .unwrap_or_else(|| "Nameless".into())
    } else {
        seed.name
    };

    log::debug!(
        "created subject '{name}' in {} (household income {income:?})",
        seed.country
    );

    Subject {
        id: rng.uuid(),
        name,
        age: 0,
        gender: seed.gender,
        country: seed.country,
        stats,
        money,
        education: EducationLevel::Primary,
        job_title: None,
        salary: 0,
        relationship: RelationshipStatus::Single,
        partner_name: None,
        spouse: None,
        children: Vec::new(),
        career_path,
        orientation: SexualOrientation::Questioning,
        achievements: Vec::new(),
        criminal_record: Vec::new(),
        family,
        alive: true,
        death_cause: None,
        year_of_death: None,
    }
}

fn jittered(rng: &mut dyn LifeRng, base: i32, spread: i32) -> i32 {
    let offset = rng.range_inclusive(-(spread as i64), spread as i64) as i32;
    clamp_stat(base + offset)
}

fn baseline_for(income: IncomeLevel) -> i32 {
    match income {
        IncomeLevel::None => 28,
        IncomeLevel::Low => 40,
        IncomeLevel::Medium => 55,
        IncomeLevel::High => 70,
        IncomeLevel::VeryHigh => 80,
    }
}

fn education_base_for(income: IncomeLevel) -> i32 {
    match income {
        IncomeLevel::None => 25,
        IncomeLevel::Low => 45,
        IncomeLevel::Medium => 60,
        IncomeLevel::High => 75,
        IncomeLevel::VeryHigh => 85,
    }
}

fn network_base_for(income: IncomeLevel) -> i32 {
    match income {
        IncomeLevel::None => 20,
        IncomeLevel::Low => 35,
        IncomeLevel::Medium => 55,
        IncomeLevel::High => 70,
        IncomeLevel::VeryHigh => 82,
    }
}

fn income_power_base_for(income: IncomeLevel) -> i32 {
    match income {
        IncomeLevel::None => 18,
        IncomeLevel::Low => 35,
        IncomeLevel::Medium => 55,
        IncomeLevel::High => 72,
        IncomeLevel::VeryHigh => 88,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::family::{Parent, ParentRole, ParentsMaritalStatus};
    use crate::rng::{ScriptedRng, SimRng};

    pub(crate) fn family_with_income(level: IncomeLevel) -> FamilyBackground {
        let parent = |role: ParentRole| Parent {
            role,
            name: Some("Test".into()),
            gender: Some(role.gender_label().into()),
            occupation: None,
            income_level: level,
            alive: true,
            death_cause: None,
            known: true,
        };
        FamilyBackground {
            parents: vec![parent(ParentRole::Mother), parent(ParentRole::Father)],
            marital_status: ParentsMaritalStatus::Married,
            has_prenup: None,
            adopted: false,
            custody: None,
        }
    }

    fn seed() -> SubjectSeed {
        SubjectSeed {
            name: "Deniz".into(),
            gender: "Female".into(),
            country: "Turkey".into(),
        }
    }

    #[test]
    fn starting_stats_stay_within_jitter_of_income_base() {
        let config = EngineConfig::default();
        let mut rng = SimRng::new(5);
        for _ in 0..50 {
            let s = create_subject(seed(), family_with_income(IncomeLevel::High), &config, &mut rng);
            assert!((58..=82).contains(&s.stat(Stat::Smarts)));
            assert!((57..=87).contains(&s.stat(Stat::IncomePower)));
            assert!((0..=5_000).contains(&s.money));
            assert_eq!(s.stat(Stat::Health), 90);
            assert_eq!(s.stat(Stat::Happiness), 85);
        }
    }

    #[test]
    fn newborn_defaults() {
        let config = EngineConfig::default();
        let s = create_subject(
            seed(),
            family_with_income(IncomeLevel::Low),
            &config,
            &mut ScriptedRng::new([]),
        );
        assert_eq!(s.age, 0);
        assert!(s.alive);
        assert_eq!(s.education, EducationLevel::Primary);
        assert_eq!(s.orientation, SexualOrientation::Questioning);
        assert_eq!(s.relationship, RelationshipStatus::Single);
        assert_eq!(s.name, "Deniz");
    }

    #[test]
    fn blank_name_draws_from_pool() {
        let config = EngineConfig::default();
        let mut blank = seed();
        blank.name = "  ".into();
        let s = create_subject(
            blank,
            family_with_income(IncomeLevel::Medium),
            &config,
            &mut ScriptedRng::new([]).with_fallback(0.0),
        );
        assert_eq!(s.name, config.names.subject[0]);
    }

    #[test]
    fn money_never_goes_negative() {
        let config = EngineConfig::default();
        let mut s = create_subject(
            seed(),
            family_with_income(IncomeLevel::Medium),
            &config,
            &mut SimRng::new(1),
        );
        s.money = 100;
        assert_eq!(s.adjust_money(-250), -100);
        assert_eq!(s.money, 0);
    }

    #[test]
    fn achievements_unlock_once() {
        let config = EngineConfig::default();
        let mut s = create_subject(
            seed(),
            family_with_income(IncomeLevel::Medium),
            &config,
            &mut SimRng::new(2),
        );
        assert!(s.unlock("First job"));
        assert!(!s.unlock("First job"));
        assert_eq!(s.achievements.len(), 1);
    }
}
