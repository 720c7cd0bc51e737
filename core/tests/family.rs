//! Family generation: income balance between the parents.

use lifepath_core::{
    config::{FamilyTables, NamePools},
    family::{IncomeLevel, ParentRole, ParentsMaritalStatus},
    family_generator::FamilyGenerator,
    rng::{ScriptedRng, SimRng},
};
use proptest::prelude::*;

fn tables_with(country: &str, levels: Vec<IncomeLevel>) -> FamilyTables {
    let mut tables = FamilyTables::default();
    tables.income_by_country.insert(country.into(), levels);
    tables
}

/// Draws for a known, living parent: known, alive, income, name, occupation.
fn known_parent(income_draw: f64) -> [f64; 5] {
    [0.0, 0.0, income_draw, 0.0, 0.0]
}

#[test]
fn balanced_pair_needs_no_retry() {
    use IncomeLevel::{High, Low};
    let tables = tables_with("X", vec![Low, Low, Low, High]);
    let names = NamePools::default();
    let gen = FamilyGenerator::new(&tables, &names);

    let mut draws = Vec::new();
    draws.extend(known_parent(0.0)); // mother: low
    draws.extend(known_parent(0.9)); // father: high, gap 2
    let (family, report) = gen.generate_with_report("X", &mut ScriptedRng::new(draws));

    assert_eq!(report.father_retries, 0);
    assert!(!report.capped);
    assert_eq!(family.parent(ParentRole::Mother).unwrap().income_level, Low);
    assert_eq!(family.parent(ParentRole::Father).unwrap().income_level, High);
}

#[test]
fn father_is_redrawn_until_gap_fits() {
    use IncomeLevel::{Low, VeryHigh};
    let tables = tables_with("X", vec![Low, Low, Low, VeryHigh]);
    let names = NamePools::default();
    let gen = FamilyGenerator::new(&tables, &names);

    let mut draws = Vec::new();
    draws.extend(known_parent(0.0)); // mother: low
    draws.extend(known_parent(0.9)); // father: very high, gap 3
    draws.extend(known_parent(0.9)); // father: very high again
    draws.extend(known_parent(0.3)); // father: low
    draws.extend([0.5, 0.2]); // not adopted, married
    let mut rng = ScriptedRng::new(draws);
    let (family, report) = gen.generate_with_report("X", &mut rng);

    assert_eq!(report.father_retries, 2);
    assert!(!report.capped);
    assert_eq!(rng.remaining(), 0);
    assert_eq!(family.parent(ParentRole::Father).unwrap().income_level, Low);
    assert_eq!(family.marital_status, ParentsMaritalStatus::Married);
    assert!(family.has_prenup.is_none());
}

#[test]
fn unreachable_balance_terminates_at_the_cap() {
    use IncomeLevel::VeryHigh;
    let mut tables = tables_with("X", vec![VeryHigh]);
    tables.max_father_retries = 5;
    let names = NamePools::default();
    let gen = FamilyGenerator::new(&tables, &names);

    // Mother unknown (income none), every father known and very high.
    let mut draws = vec![0.9, 0.0, 0.0];
    for _ in 0..6 {
        draws.extend(known_parent(0.0));
    }
    let (family, report) = gen.generate_with_report("X", &mut ScriptedRng::new(draws));

    assert!(report.capped);
    assert_eq!(report.father_retries, 5);
    assert_eq!(family.parents.len(), 2);
}

#[test]
fn unknown_country_uses_default_distribution() {
    let tables = FamilyTables::default();
    let names = NamePools::default();
    let gen = FamilyGenerator::new(&tables, &names);
    let mut rng = SimRng::new(31);
    for _ in 0..200 {
        let family = gen.generate("Atlantis", &mut rng);
        for parent in family.parents.iter().filter(|p| p.known) {
            assert!(tables.default_income.contains(&parent.income_level));
        }
    }
}

proptest! {
    #[test]
    fn known_parents_stay_within_two_income_levels(seed in any::<u64>(), country_idx in 0usize..40) {
        let tables = FamilyTables::default();
        let names = NamePools::default();
        let countries: Vec<&String> = tables.income_by_country.keys().collect();
        let country = countries.get(country_idx).map(|c| c.as_str()).unwrap_or("Elsewhere");

        let gen = FamilyGenerator::new(&tables, &names);
        let (family, report) = gen.generate_with_report(country, &mut SimRng::new(seed));
        let mother = family.parent(ParentRole::Mother).unwrap();
        let father = family.parent(ParentRole::Father).unwrap();

        if mother.known && father.known {
            prop_assert!(report.capped || mother.income_level.gap(father.income_level) <= 2);
        }
        prop_assert_eq!(family.has_prenup.is_some(), family.marital_status == ParentsMaritalStatus::Divorced);
        prop_assert_eq!(family.custody.is_some(), family.marital_status == ParentsMaritalStatus::Divorced);
        for parent in &family.parents {
            prop_assert_eq!(parent.death_cause.is_some(), !parent.alive);
            if !parent.known {
                prop_assert!(parent.name.is_none());
                prop_assert!(parent.occupation.is_none());
            }
        }
    }
}
