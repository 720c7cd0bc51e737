//! Bounded attribute model.
//!
//! RULE: every stat lives in [0, 100] at all times.
//! The only mutation primitive is `Attributes::adjust`, which adds then
//! clamps. Deserialized values are clamped on the way in.

use crate::types::clamp_stat;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single bounded stat value in [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub struct StatValue(i32);

impl StatValue {
    pub fn new(raw: i32) -> Self {
        Self(clamp_stat(raw))
    }

    pub fn get(self) -> i32 {
        self.0
    }
}

impl From<i32> for StatValue {
    fn from(raw: i32) -> Self {
        Self::new(raw)
    }
}

impl From<StatValue> for i32 {
    fn from(value: StatValue) -> Self {
        value.0
    }
}

impl Default for StatValue {
    fn default() -> Self {
        Self(50)
    }
}

/// Every bounded stat the subject carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stat {
    Intelligence,
    Beauty,
    Luck,
    Aura,
    EducationPrestige,
    Network,
    Reputation,
    IncomePower,
    Health,
    Happiness,
    Smarts,
    Looks,
}

impl Stat {
    pub const ALL: [Stat; 12] = [
        Stat::Intelligence,
        Stat::Beauty,
        Stat::Luck,
        Stat::Aura,
        Stat::EducationPrestige,
        Stat::Network,
        Stat::Reputation,
        Stat::IncomePower,
        Stat::Health,
        Stat::Happiness,
        Stat::Smarts,
        Stat::Looks,
    ];

    /// Human-readable label used in impact summaries.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Intelligence => "Intelligence",
            Self::Beauty => "Beauty",
            Self::Luck => "Luck",
            Self::Aura => "Aura",
            Self::EducationPrestige => "Education prestige",
            Self::Network => "Network",
            Self::Reputation => "Reputation",
            Self::IncomePower => "Income power",
            Self::Health => "Health",
            Self::Happiness => "Happiness",
            Self::Smarts => "Smarts",
            Self::Looks => "Looks",
        }
    }
}

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Attributes {
    pub intelligence:       StatValue,
    pub beauty:             StatValue,
    pub luck:               StatValue,
    pub aura:               StatValue,
    pub education_prestige: StatValue,
    pub network:            StatValue,
    pub reputation:         StatValue,
    pub income_power:       StatValue,
    pub health:             StatValue,
    pub happiness:          StatValue,
    pub smarts:             StatValue,
    pub looks:              StatValue,
}

impl Attributes {
    /// All stats at the same starting value.
    pub fn uniform(value: i32) -> Self {
        let v = StatValue::new(value);
        Self {
            intelligence: v,
            beauty: v,
            luck: v,
            aura: v,
            education_prestige: v,
            network: v,
            reputation: v,
            income_power: v,
            health: v,
            happiness: v,
            smarts: v,
            looks: v,
        }
    }

    pub fn get(&self, stat: Stat) -> i32 {
        self.slot(stat).get()
    }

    pub fn set(&mut self, stat: Stat, value: i32) {
        *self.slot_mut(stat) = StatValue::new(value);
    }

    /// Add `delta`, clamp, and return the change actually applied.
    pub fn adjust(&mut self, stat: Stat, delta: i32) -> i32 {
        let slot = self.slot_mut(stat);
        let before = slot.get();
        *slot = StatValue::new(before.saturating_add(delta));
        slot.get() - before
    }

    fn slot(&self, stat: Stat) -> &StatValue {
        match stat {
            Stat::Intelligence => &self.intelligence,
            Stat::Beauty => &self.beauty,
            Stat::Luck => &self.luck,
            Stat::Aura => &self.aura,
            Stat::EducationPrestige => &self.education_prestige,
            Stat::Network => &self.network,
            Stat::Reputation => &self.reputation,
            Stat::IncomePower => &self.income_power,
            Stat::Health => &self.health,
            Stat::Happiness => &self.happiness,
            Stat::Smarts => &self.smarts,
            Stat::Looks => &self.looks,
        }
    }

    fn slot_mut(&mut self, stat: Stat) -> &mut StatValue {
        match stat {
            Stat::Intelligence => &mut self.intelligence,
            Stat::Beauty => &mut self.beauty,
            Stat::Luck => &mut self.luck,
            Stat::Aura => &mut self.aura,
            Stat::EducationPrestige => &mut self.education_prestige,
            Stat::Network => &mut self.network,
            Stat::Reputation => &mut self.reputation,
            Stat::IncomePower => &mut self.income_power,
            Stat::Health => &mut self.health,
            Stat::Happiness => &mut self.happiness,
            Stat::Smarts => &mut self.smarts,
            Stat::Looks => &mut self.looks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjust_clamps_and_reports_applied_delta() {
        let mut attrs = Attributes::uniform(95);
        assert_eq!(attrs.adjust(Stat::Luck, 10), 5);
        assert_eq!(attrs.get(Stat::Luck), 100);
        assert_eq!(attrs.adjust(Stat::Health, -200), -95);
        assert_eq!(attrs.get(Stat::Health), 0);
    }

    #[test]
    fn adjust_touches_only_the_named_stat() {
        let mut attrs = Attributes::uniform(40);
        attrs.adjust(Stat::Aura, 7);
        for stat in Stat::ALL {
            let expected = if stat == Stat::Aura { 47 } else { 40 };
            assert_eq!(attrs.get(stat), expected, "{stat}");
        }
    }

    #[test]
    fn deserialization_clamps_out_of_range_values() {
        let mut json = serde_json::to_value(Attributes::uniform(10)).unwrap();
        json["health"] = serde_json::json!(250);
        json["luck"] = serde_json::json!(-3);
        let attrs: Attributes = serde_json::from_value(json).unwrap();
        assert_eq!(attrs.get(Stat::Health), 100);
        assert_eq!(attrs.get(Stat::Luck), 0);
    }
}
