//! Immutable lookup tables injected into the engine at construction.
//!
//! RULE: nothing here is mutated after load. Sessions hold the config
//! behind an `Arc` and only ever read it.
//!
//! Every section carries `#[serde(default)]`, so `data/tables/engine.json`
//! only needs to name what it overrides.

use crate::{
    attributes::Stat,
    effect::Effect,
    error::{SimError, SimResult},
    family::IncomeLevel,
};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub family:        FamilyTables,
    pub names:         NamePools,
    pub career:        CareerTables,
    pub rates:         YearlyRates,
    pub random_events: RandomEventPool,
}

impl EngineConfig {
    /// Load from the data/ directory, on top of the built-in tables.
    /// In tests, use `EngineConfig::default()`.
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let path = format!("{data_dir}/tables/engine.json");
        let content = std::fs::read_to_string(&path)
            .map_err(SimError::Io)
            .with_context(|| format!("Cannot read {path}"))?;
        let config: EngineConfig = serde_json::from_str(&content)?;
        config.validate()?;
        log::debug!(
            "loaded engine tables from {path}: {} countries, {} job tiers, {} random events",
            config.family.income_by_country.len(),
            config.career.tiers.len(),
            config.random_events.events.len()
        );
        Ok(config)
    }

    /// Reject tables the engine cannot draw from.
    pub fn validate(&self) -> SimResult<()> {
        if self.family.default_income.is_empty() {
            return Err(SimError::InvalidTable {
                table: "family.default_income",
                reason: "default income distribution is empty".into(),
            });
        }
        if self.career.first_jobs.is_empty() {
            return Err(SimError::InvalidTable {
                table: "career.first_jobs",
                reason: "starter job pool is empty".into(),
            });
        }
        if let Some(tier) = self.career.tiers.iter().find(|t| t.base_salary <= 0) {
            return Err(SimError::InvalidTable {
                table: "career.tiers",
                reason: format!("tier '{}' has no positive base salary", tier.title),
            });
        }
        Ok(())
    }
}

// ── Family generation ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FamilyTables {
    /// Each entry is one equally likely outcome; repeats encode weight.
    pub income_by_country:    BTreeMap<String, Vec<IncomeLevel>>,
    pub default_income:       Vec<IncomeLevel>,
    pub occupations:          BTreeMap<IncomeLevel, Vec<String>>,
    pub known_probability:    f64,
    pub alive_probability:    f64,
    pub married_probability:  f64,
    /// Applied only when not married; the remainder is never-married.
    pub divorced_probability: f64,
    pub prenup_probability:   f64,
    pub adoption_probability: f64,
    /// Largest allowed ordinal gap between the parents' incomes.
    pub max_income_gap:       i32,
    /// Father regenerations before accepting the closest candidate.
    pub max_father_retries:   u32,
}

impl FamilyTables {
    /// The income distribution for `country`, or the default one.
    pub fn income_distribution(&self, country: &str) -> &[IncomeLevel] {
        match self.income_by_country.get(country) {
            Some(levels) if !levels.is_empty() => levels,
            _ => &self.default_income,
        }
    }

    pub fn occupations_for(&self, level: IncomeLevel) -> &[String] {
        self.occupations
            .get(&level)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

impl Default for FamilyTables {
    fn default() -> Self {
        use IncomeLevel::{High, Low, Medium, VeryHigh};
        let countries: Vec<(&str, Vec<IncomeLevel>)> = vec![
            ("Afghanistan",    vec![Low, Medium, Medium, High]),
            ("Angola",         vec![Low, Medium, Medium, High]),
            ("Argentina",      vec![Low, Medium, Medium, High]),
            ("Australia",      vec![Medium, High, VeryHigh]),
            ("Azerbaijan",     vec![Low, Medium, Medium, High]),
            ("Bangladesh",     vec![Low, Low, Medium]),
            ("Belgium",        vec![Medium, High, VeryHigh]),
            ("Brazil",         vec![Low, Medium, Medium, High]),
            ("Bulgaria",       vec![Low, Medium, Medium]),
            ("Canada",         vec![Medium, High, VeryHigh]),
            ("China",          vec![Low, Medium, Medium, High, VeryHigh]),
            ("Denmark",        vec![Medium, High, VeryHigh]),
            ("France",         vec![Medium, Medium, High, VeryHigh]),
            ("Germany",        vec![Low, Medium, Medium, High]),
            ("Greece",         vec![Low, Medium, Medium]),
            ("India",          vec![Low, Low, Medium, Medium]),
            ("Iran",           vec![Low, Low, Medium]),
            ("Israel",         vec![Medium, High, VeryHigh]),
            ("Italy",          vec![Medium, Medium, High]),
            ("Japan",          vec![Medium, High, VeryHigh]),
            ("Mexico",         vec![Low, Medium, Medium, High]),
            ("Norway",         vec![High, High, VeryHigh]),
            ("Pakistan",       vec![IncomeLevel::None, Low, Low, Medium]),
            ("Poland",         vec![Low, Medium, Medium, High]),
            ("Romania",        vec![Low, Medium, Medium]),
            ("Russia",         vec![Low, Medium, High]),
            ("Saudi Arabia",   vec![Low, Medium, High, VeryHigh]),
            ("Sweden",         vec![Medium, High, VeryHigh, VeryHigh]),
            ("Turkey",         vec![Low, Low, Medium, Medium, High]),
            ("Uganda",         vec![IncomeLevel::None, Low, Low, Medium]),
            ("Ukraine",        vec![Low, Medium, Medium]),
            ("United Kingdom", vec![Medium, High, VeryHigh]),
            ("United States",  vec![Low, Medium, Medium, High]),
            ("Zimbabwe",       vec![Low, Medium, Medium, High]),
        ];

        let occupations: [(IncomeLevel, &[&str]); 5] = [
            (IncomeLevel::None, &["Unemployed", "Long-term ill", "Home carer"]),
            (Low,      &["Cleaner", "Security guard", "Driver"]),
            (Medium,   &["Teacher", "Nurse", "Civil servant", "Technician"]),
            (High,     &["Lawyer", "Engineer", "Manager"]),
            (VeryHigh, &["Doctor", "CEO", "Diplomat"]),
        ];

        Self {
            income_by_country: countries
                .into_iter()
                .map(|(c, levels)| (c.to_string(), levels))
                .collect(),
            default_income: vec![Low, Medium, Medium, High],
            occupations: occupations
                .into_iter()
                .map(|(level, jobs)| (level, jobs.iter().map(|j| j.to_string()).collect()))
                .collect(),
            known_probability: 0.85,
            alive_probability: 0.90,
            married_probability: 0.70,
            divorced_probability: 0.50,
            prenup_probability: 0.30,
            adoption_probability: 0.05,
            max_income_gap: 2,
            max_father_retries: 64,
        }
    }
}

// ── Names ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NamePools {
    pub female:  Vec<String>,
    pub male:    Vec<String>,
    pub partner: Vec<String>,
    pub child:   Vec<String>,
    pub subject: Vec<String>,
    /// Gender labels drawn for spouses and children.
    pub genders: Vec<String>,
}

impl Default for NamePools {
    fn default() -> Self {
        fn owned(names: &[&str]) -> Vec<String> {
            names.iter().map(|n| n.to_string()).collect()
        }
        Self {
            female: owned(&["Ayse", "Fatma", "Elif", "Zeynep", "Lara", "Maria", "Hannah", "Sofia"]),
            male: owned(&["Ahmet", "Mehmet", "Ali", "Burak", "Can", "James", "Lukas", "Mateo"]),
            partner: owned(&["Alex", "Sam", "Jordan", "Taylor", "Casey", "Morgan", "Riley"]),
            child: owned(&["Aydin", "Deniz", "Ege", "Lara", "Aras", "Mira", "Baran", "Ruya"]),
            subject: owned(&["Deniz", "Ege", "Baran", "Aras", "Lara", "Ruya", "Ada", "Mira", "Kivanc", "Arda"]),
            genders: owned(&["Female", "Male", "Non-binary"]),
        }
    }
}

// ── Careers ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobTier {
    pub title:       String,
    pub base_salary: i64,
    pub successors:  Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CareerTables {
    pub first_jobs:                Vec<String>,
    pub first_job_salary_base:     i64,
    /// Starter salary is `base + uniform[0, spread]`.
    pub first_job_salary_spread:   i64,
    pub first_job_income_power:    i32,
    pub tiers:                     Vec<JobTier>,
    /// Successor for any title outside the tier table.
    pub entry_tier:                String,
    pub promotion_income_power:    i32,
}

impl CareerTables {
    pub fn tier(&self, title: &str) -> Option<&JobTier> {
        self.tiers.iter().find(|t| t.title == title)
    }

    /// Valid next titles for `title`. Empty at the top of the ladder.
    pub fn successors_of(&self, title: &str) -> Vec<&str> {
        match self.tier(title) {
            Some(tier) => tier.successors.iter().map(String::as_str).collect(),
            None => vec![self.entry_tier.as_str()],
        }
    }
}

impl Default for CareerTables {
    fn default() -> Self {
        let ladder: [(&str, i64, &[&str]); 8] = [
            ("Junior",    30_000,  &["Mid-level", "Senior", "Lead"]),
            ("Mid-level", 50_000,  &["Senior", "Lead", "Manager"]),
            ("Senior",    80_000,  &["Lead", "Manager", "Director"]),
            ("Lead",      120_000, &["Manager", "Director", "VP"]),
            ("Manager",   150_000, &["Director", "VP", "C-Level"]),
            ("Director",  200_000, &["VP", "C-Level"]),
            ("VP",        300_000, &["C-Level"]),
            ("C-Level",   500_000, &[]),
        ];
        Self {
            first_jobs: ["Cashier", "Waiter", "Cleaner", "Security guard", "Call center agent"]
                .iter()
                .map(|j| j.to_string())
                .collect(),
            first_job_salary_base: 20_000,
            first_job_salary_spread: 10_000,
            first_job_income_power: 3,
            tiers: ladder
                .iter()
                .map(|(title, base, next)| JobTier {
                    title: title.to_string(),
                    base_salary: *base,
                    successors: next.iter().map(|s| s.to_string()).collect(),
                })
                .collect(),
            entry_tier: "Junior".into(),
            promotion_income_power: 5,
        }
    }
}

// ── Per-year rates ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct YearlyRates {
    pub orientation_min_age:        u32,

    // Mortality
    pub depression_happiness_max:   i32,
    pub depression_min_age:         u32,
    pub depression_death_chance:    f64,
    pub accident_min_age:           u32,
    pub accident_chance_per_year:   f64,
    pub accident_chance_cap:        f64,

    // Household economy, as shares of salary
    pub living_expense_share:       f64,
    pub spouse_expense_share:       f64,
    pub child_expense_share:        f64,

    // Marriage
    pub spouse_quality_drift:       i64,
    pub divorce_quality_below:      i32,
    pub divorce_min_age:            u32,
    pub divorce_chance:             f64,
    pub divorce_happiness_penalty:  i32,

    pub random_event_chance:        f64,

    // Work
    pub first_job_age:              u32,
    pub first_job_chance:           f64,
    pub career_min_age:             u32,

    // Relationships
    pub dating_min_age:             u32,
    pub dating_chance:              f64,
    pub dating_happiness:           i32,
    pub marriage_min_age:           u32,
    pub marriage_chance:            f64,
    pub marriage_happiness:         i32,
    pub spouse_age_spread:          i64,
    pub spouse_quality_base:        i32,
    pub spouse_quality_spread:      i64,
    pub birth_min_age:              u32,
    pub birth_max_age:              u32,
    pub max_children:               usize,
    pub birth_chance:               f64,
    pub birth_happiness:            i32,
    pub child_quality:              i32,
}

impl Default for YearlyRates {
    fn default() -> Self {
        Self {
            orientation_min_age: 12,
            depression_happiness_max: 5,
            depression_min_age: 12,
            depression_death_chance: 0.10,
            accident_min_age: 5,
            accident_chance_per_year: 0.0001,
            accident_chance_cap: 0.01,
            living_expense_share: 0.30,
            spouse_expense_share: 0.20,
            child_expense_share: 0.10,
            spouse_quality_drift: 5,
            divorce_quality_below: 20,
            divorce_min_age: 18,
            divorce_chance: 0.15,
            divorce_happiness_penalty: 10,
            random_event_chance: 0.30,
            first_job_age: 18,
            first_job_chance: 0.40,
            career_min_age: 18,
            dating_min_age: 16,
            dating_chance: 0.20,
            dating_happiness: 5,
            marriage_min_age: 18,
            marriage_chance: 0.20,
            marriage_happiness: 10,
            spouse_age_spread: 3,
            spouse_quality_base: 70,
            spouse_quality_spread: 10,
            birth_min_age: 20,
            birth_max_age: 45,
            max_children: 5,
            birth_chance: 0.15,
            birth_happiness: 15,
            child_quality: 80,
        }
    }
}

// ── Random events ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomEventDef {
    pub title:       String,
    pub description: String,
    pub effect:      Effect,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RandomEventPool {
    pub events: Vec<RandomEventDef>,
}

impl Default for RandomEventPool {
    fn default() -> Self {
        let event = |title: &str, description: &str, effect: Effect| RandomEventDef {
            title: title.into(),
            description: description.into(),
            effect,
        };
        Self {
            events: vec![
                event("Caught the flu", "You spent a week in bed.",
                    Effect::new().stat(Stat::Health, -5)),
                event("Small windfall", "You won a small lottery prize.",
                    Effect::new().money(1_000).stat(Stat::Happiness, 5)),
                event("New friend", "You struck up a new friendship.",
                    Effect::new().stat(Stat::Network, 3).stat(Stat::Happiness, 2)),
                event("Serious illness", "You went through a serious illness.",
                    Effect::new().stat(Stat::Health, -15).money(-2_000)),
                event("Lucky day", "Everything went your way today.",
                    Effect::new().stat(Stat::Luck, 5).money(500)),
                event("Minor accident", "You had a minor accident.",
                    Effect::new().stat(Stat::Health, -10).money(-1_500)),
                event("Surprise gift", "Someone gave you an unexpected gift.",
                    Effect::new().stat(Stat::Happiness, 5).money(300)),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tables_validate() {
        EngineConfig::default().validate().unwrap();
    }

    #[test]
    fn unknown_country_uses_default_distribution() {
        let tables = FamilyTables::default();
        assert_eq!(
            tables.income_distribution("Atlantis"),
            tables.default_income.as_slice()
        );
        assert_eq!(
            tables.income_distribution("Norway"),
            &[IncomeLevel::High, IncomeLevel::High, IncomeLevel::VeryHigh]
        );
    }

    #[test]
    fn empty_country_list_falls_back() {
        let mut tables = FamilyTables::default();
        tables.income_by_country.insert("Nowhere".into(), vec![]);
        assert_eq!(tables.income_distribution("Nowhere").len(), 4);
    }

    #[test]
    fn successors_cover_unknown_and_top_titles() {
        let career = CareerTables::default();
        assert_eq!(career.successors_of("Cashier"), vec!["Junior"]);
        assert!(career.successors_of("C-Level").is_empty());
        assert_eq!(career.successors_of("VP"), vec!["C-Level"]);
    }

    #[test]
    fn partial_json_overrides_only_named_sections() {
        let json = r#"{ "rates": { "random_event_chance": 0.5 } }"#;
        let config: EngineConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.rates.random_event_chance, 0.5);
        assert_eq!(config.rates.dating_chance, 0.20);
        assert_eq!(config.random_events.events.len(), 7);
        assert!(!config.family.income_by_country.is_empty());
    }

    #[test]
    fn invalid_tier_is_rejected() {
        let mut config = EngineConfig::default();
        config.career.tiers[0].base_salary = 0;
        assert!(matches!(
            config.validate(),
            Err(SimError::InvalidTable { table: "career.tiers", .. })
        ));
    }

    #[test]
    fn missing_tables_file_is_an_io_error() {
        let err = EngineConfig::load("./no-such-data-dir").unwrap_err();
        assert!(matches!(err.downcast_ref::<SimError>(), Some(SimError::Io(_))));
        assert!(err.to_string().contains("engine.json"));
    }
}
