//! Procedural household generation.
//!
//! RULE: the generator is a pure function of the tables and the RNG stream.
//! Same tables + same draws = same family.
//!
//! Draw order per parent (fixed, tests depend on it):
//!   known, alive, income, [death cause if dead], [name, occupation if known]
//! then, for the household: adopted, married, [divorced], [prenup, custody].
//!
//! The father is regenerated until the parents' income ordinals are within
//! `max_income_gap`. The loop is capped at `max_father_retries`; when the
//! cap is hit the closest candidate seen is kept.

use crate::{
    config::{FamilyTables, NamePools},
    family::{
        CustodyDecision, FamilyBackground, IncomeLevel, Parent, ParentDeathCause, ParentRole,
        ParentsMaritalStatus,
    },
    rng::{pick, LifeRng},
};

/// How a generated family came about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationReport {
    /// Father candidates discarded by the income-balance check.
    pub father_retries: u32,
    /// True when the retry cap was reached and the closest candidate kept.
    pub capped:         bool,
}

pub struct FamilyGenerator<'a> {
    tables: &'a FamilyTables,
    names:  &'a NamePools,
}

impl<'a> FamilyGenerator<'a> {
    pub fn new(tables: &'a FamilyTables, names: &'a NamePools) -> Self {
        Self { tables, names }
    }

    pub fn generate(&self, country: &str, rng: &mut dyn LifeRng) -> FamilyBackground {
        self.generate_with_report(country, rng).0
    }

    pub fn generate_with_report(
        &self,
        country: &str,
        rng: &mut dyn LifeRng,
    ) -> (FamilyBackground, GenerationReport) {
        let mother = self.parent(ParentRole::Mother, country, rng);
        let (father, report) = self.balanced_father(&mother, country, rng);

        let t = self.tables;
        let adopted = rng.chance(t.adoption_probability);
        let marital_status = if rng.chance(t.married_probability) {
            ParentsMaritalStatus::Married
        } else if rng.chance(t.divorced_probability) {
            ParentsMaritalStatus::Divorced
        } else {
            ParentsMaritalStatus::NeverMarried
        };

        let (has_prenup, custody) = if marital_status == ParentsMaritalStatus::Divorced {
            let prenup = rng.chance(t.prenup_probability);
            let custody = pick(rng, &CustodyDecision::ALL).copied();
            (Some(prenup), custody)
        } else {
            (None, None)
        };

        log::debug!(
            "family for {country}: mother {:?}, father {:?}, {marital_status:?}, {} father retries",
            mother.income_level,
            father.income_level,
            report.father_retries
        );

        let family = FamilyBackground {
            parents: vec![mother, father],
            marital_status,
            has_prenup,
            adopted,
            custody,
        };
        (family, report)
    }

    /// Regenerate the father until the income gap is acceptable or the
    /// retry cap is reached.
    fn balanced_father(
        &self,
        mother: &Parent,
        country: &str,
        rng: &mut dyn LifeRng,
    ) -> (Parent, GenerationReport) {
        let max_gap = self.tables.max_income_gap;
        let cap = self.tables.max_father_retries;

        let mut candidate = self.parent(ParentRole::Father, country, rng);
        let mut closest = candidate.clone();
        let mut retries = 0;

        while mother.income_level.gap(candidate.income_level) > max_gap {
            if retries == cap {
                log::warn!(
                    "family for {country}: father income never within {max_gap} of {:?} \
                     after {cap} retries, keeping closest candidate",
                    mother.income_level
                );
                return (closest, GenerationReport { father_retries: retries, capped: true });
            }

            retries += 1;
            candidate = self.parent(ParentRole::Father, country, rng);
            if mother.income_level.gap(candidate.income_level)
                < mother.income_level.gap(closest.income_level)
            {
                closest = candidate.clone();
            }
        }

        (candidate, GenerationReport { father_retries: retries, capped: false })
    }

    fn parent(&self, role: ParentRole, country: &str, rng: &mut dyn LifeRng) -> Parent {
        let known = rng.chance(self.tables.known_probability);
        let alive = rng.chance(self.tables.alive_probability);
        let income = pick(rng, self.tables.income_distribution(country))
            .copied()
            .unwrap_or(IncomeLevel::Medium);
        let death_cause = if alive {
            None
        } else {
            pick(rng, &ParentDeathCause::ALL).copied()
        };

        let (name, occupation) = if known {
            let pool = match role {
                ParentRole::Mother => &self.names.female,
                ParentRole::Father => &self.names.male,
            };
            let name = pick(rng, pool).cloned();
            let occupation = pick(rng, self.tables.occupations_for(income)).cloned();
            (name, occupation)
        } else {
            (None, None)
        };

        Parent {
            role,
            name,
            gender: Some(role.gender_label().to_string()),
            occupation,
            income_level: if known { income } else { IncomeLevel::None },
            alive,
            death_cause,
            known,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{ScriptedRng, SimRng};

    fn tables_with(country: &str, levels: Vec<IncomeLevel>) -> FamilyTables {
        let mut tables = FamilyTables::default();
        tables.income_by_country.insert(country.into(), levels);
        tables
    }

    #[test]
    fn known_parent_gets_name_and_matching_occupation() {
        let tables = tables_with("X", vec![IncomeLevel::High]);
        let names = NamePools::default();
        let gen = FamilyGenerator::new(&tables, &names);
        // known, alive, income, name, occupation
        let mother = gen.parent(
            ParentRole::Mother,
            "X",
            &mut ScriptedRng::new([0.0, 0.0, 0.0, 0.0, 0.0]),
        );
        assert!(mother.known && mother.alive);
        assert_eq!(mother.income_level, IncomeLevel::High);
        assert_eq!(mother.name.as_deref(), Some(names.female[0].as_str()));
        assert_eq!(mother.occupation.as_deref(), Some("Lawyer"));
        assert_eq!(mother.gender.as_deref(), Some("Female"));
        assert!(mother.death_cause.is_none());
    }

    #[test]
    fn unknown_dead_parent_has_no_details() {
        let tables = tables_with("X", vec![IncomeLevel::High]);
        let names = NamePools::default();
        let gen = FamilyGenerator::new(&tables, &names);
        // not known (0.9 >= 0.85), dead (0.95 >= 0.9), income, death cause
        let father = gen.parent(
            ParentRole::Father,
            "X",
            &mut ScriptedRng::new([0.9, 0.95, 0.0, 0.5]),
        );
        assert!(!father.known);
        assert!(!father.alive);
        assert_eq!(father.death_cause, Some(ParentDeathCause::War));
        assert_eq!(father.income_level, IncomeLevel::None);
        assert!(father.name.is_none() && father.occupation.is_none());
    }

    #[test]
    fn divorce_sets_prenup_and_custody() {
        let tables = tables_with("X", vec![IncomeLevel::Medium]);
        let names = NamePools::default();
        let gen = FamilyGenerator::new(&tables, &names);
        let draws = [
            0.0, 0.0, 0.0, 0.0, 0.0, // mother
            0.0, 0.0, 0.0, 0.0, 0.0, // father
            0.5, // not adopted
            0.8, // not married
            0.1, // divorced
            0.1, // prenup
            0.5, // custody: shared
        ];
        let family = gen.generate("X", &mut ScriptedRng::new(draws));
        assert_eq!(family.marital_status, ParentsMaritalStatus::Divorced);
        assert_eq!(family.has_prenup, Some(true));
        assert_eq!(family.custody, Some(CustodyDecision::Shared));
        assert!(!family.adopted);
    }

    #[test]
    fn married_parents_have_no_prenup_or_custody() {
        let tables = FamilyTables::default();
        let names = NamePools::default();
        let gen = FamilyGenerator::new(&tables, &names);
        let mut draws = vec![0.0; 10];
        draws.extend([0.01, 0.2]); // adopted, married
        let family = gen.generate("Germany", &mut ScriptedRng::new(draws));
        assert!(family.adopted);
        assert_eq!(family.marital_status, ParentsMaritalStatus::Married);
        assert!(family.has_prenup.is_none());
        assert!(family.custody.is_none());
    }

    #[test]
    fn cap_keeps_closest_candidate() {
        let mut tables = tables_with("X", vec![IncomeLevel::None, IncomeLevel::High, IncomeLevel::VeryHigh]);
        tables.max_father_retries = 2;
        tables.max_income_gap = 0;
        let names = NamePools::default();
        let gen = FamilyGenerator::new(&tables, &names);
        let draws = [
            0.0, 0.0, 0.0, 0.0, 0.0, // mother known, income None
            0.0, 0.0, 0.9, 0.0, 0.0, // father VeryHigh (gap 4)
            0.0, 0.0, 0.5, 0.0, 0.0, // father High (gap 3)
            0.0, 0.0, 0.9, 0.0, 0.0, // father VeryHigh (gap 4), cap reached
        ];
        let (family, report) = gen.generate_with_report("X", &mut ScriptedRng::new(draws));
        assert!(report.capped);
        assert_eq!(report.father_retries, 2);
        let father = family.parent(ParentRole::Father).unwrap();
        assert_eq!(father.income_level, IncomeLevel::High);
    }

    #[test]
    fn seeded_generation_is_reproducible() {
        let tables = FamilyTables::default();
        let names = NamePools::default();
        let gen = FamilyGenerator::new(&tables, &names);
        let a = gen.generate("Turkey", &mut SimRng::new(77));
        let b = gen.generate("Turkey", &mut SimRng::new(77));
        assert_eq!(a, b);
    }
}
