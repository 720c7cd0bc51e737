//! Household background of a new subject.
//!
//! Produced once by the family generator and never mutated afterwards.

use serde::{Deserialize, Serialize};

/// Household income bracket, ordered none < low < medium < high < very_high.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncomeLevel {
    None,
    Low,
    Medium,
    High,
    VeryHigh,
}

impl IncomeLevel {
    pub const ALL: [IncomeLevel; 5] = [
        IncomeLevel::None,
        IncomeLevel::Low,
        IncomeLevel::Medium,
        IncomeLevel::High,
        IncomeLevel::VeryHigh,
    ];

    pub fn ordinal(&self) -> i32 {
        match self {
            Self::None => 0,
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
            Self::VeryHigh => 4,
        }
    }

    /// Inverse of `ordinal`; anything above the top bracket saturates.
    pub fn from_ordinal(ordinal: i32) -> Self {
        match ordinal {
            i32::MIN..=0 => Self::None,
            1 => Self::Low,
            2 => Self::Medium,
            3 => Self::High,
            _ => Self::VeryHigh,
        }
    }

    /// Absolute ordinal distance between two brackets.
    pub fn gap(&self, other: IncomeLevel) -> i32 {
        (self.ordinal() - other.ordinal()).abs()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParentRole {
    Mother,
    Father,
}

impl ParentRole {
    pub fn gender_label(&self) -> &'static str {
        match self {
            Self::Mother => "Female",
            Self::Father => "Male",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParentDeathCause {
    Illness,
    Accident,
    War,
    NaturalCauses,
}

impl ParentDeathCause {
    pub const ALL: [ParentDeathCause; 4] = [
        ParentDeathCause::Illness,
        ParentDeathCause::Accident,
        ParentDeathCause::War,
        ParentDeathCause::NaturalCauses,
    ];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parent {
    pub role:         ParentRole,
    /// Populated only when the subject knows this parent.
    pub name:         Option<String>,
    pub gender:       Option<String>,
    pub occupation:   Option<String>,
    /// `None` bracket when the parent is unknown to the subject.
    pub income_level: IncomeLevel,
    pub alive:        bool,
    /// Present only when `alive` is false.
    pub death_cause:  Option<ParentDeathCause>,
    pub known:        bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParentsMaritalStatus {
    Married,
    Divorced,
    NeverMarried,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustodyDecision {
    Mother,
    Father,
    Shared,
    CourtDecided,
    ChildChose,
}

impl CustodyDecision {
    pub const ALL: [CustodyDecision; 5] = [
        CustodyDecision::Mother,
        CustodyDecision::Father,
        CustodyDecision::Shared,
        CustodyDecision::CourtDecided,
        CustodyDecision::ChildChose,
    ];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FamilyBackground {
    /// Zero, one or two parents.
    pub parents:        Vec<Parent>,
    pub marital_status: ParentsMaritalStatus,
    /// Defined only when divorced.
    pub has_prenup:     Option<bool>,
    pub adopted:        bool,
    /// Defined only when divorced.
    pub custody:        Option<CustodyDecision>,
}

impl FamilyBackground {
    /// Average of the known parents' income ordinals, rounded down.
    /// No known parent means the lowest bracket.
    pub fn household_income_level(&self) -> IncomeLevel {
        let known: Vec<i32> = self
            .parents
            .iter()
            .filter(|p| p.known)
            .map(|p| p.income_level.ordinal())
            .collect();
        if known.is_empty() {
            return IncomeLevel::None;
        }
        let avg = known.iter().sum::<i32>() / known.len() as i32;
        IncomeLevel::from_ordinal(avg)
    }

    pub fn parent(&self, role: ParentRole) -> Option<&Parent> {
        self.parents.iter().find(|p| p.role == role)
    }
}
