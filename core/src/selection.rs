//! Eligibility filtering and weighted selection.
//!
//! RULE: a node is eligible iff its age window covers the subject's age,
//! it is repeatable or not yet visited, and every requirement holds.
//! Candidates are always iterated in catalog order, so a fixed seed
//! reproduces the same pick.
//!
//! Weighted draw: sum `max(weight, 1)` over the candidates, roll a uniform
//! integer in [1, total], subtract weights in order until the roll is <= 0.

use crate::{
    content::{requirements_met, Activity, Catalog, StoryNode, StoryOption},
    rng::LifeRng,
    subject::Subject,
    types::{Age, NodeId},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Ids of non-repeatable nodes already resolved.
pub type VisitedSet = BTreeSet<NodeId>;

/// Fewest activities offered when enough are eligible.
pub const MIN_ACTIVITY_OFFER: usize = 3;
/// Most activities offered in one year.
pub const MAX_ACTIVITY_OFFER: usize = 6;

/// Anything that carries a selection weight.
pub trait Weighted {
    fn weight(&self) -> i32;

    /// Malformed weights (<= 0) count as 1.
    fn effective_weight(&self) -> u64 {
        self.weight().max(1) as u64
    }
}

impl Weighted for StoryNode {
    fn weight(&self) -> i32 {
        self.weight
    }
}

impl Weighted for Activity {
    fn weight(&self) -> i32 {
        self.weight
    }
}

/// Cumulative-weight draw. Returns the index of the chosen candidate,
/// or `None` for an empty slice.
pub fn weighted_index<T: Weighted + ?Sized>(candidates: &[&T], rng: &mut dyn LifeRng) -> Option<usize> {
    if candidates.is_empty() {
        return None;
    }
    let total: u64 = candidates.iter().map(|c| c.effective_weight()).sum();
    let mut roll = rng.range_inclusive(1, total as i64);
    for (i, candidate) in candidates.iter().enumerate() {
        roll -= candidate.effective_weight() as i64;
        if roll <= 0 {
            return Some(i);
        }
    }
    // Unreachable with a roll in [1, total]; keep the last candidate.
    Some(candidates.len() - 1)
}

// ── Story nodes ────────────────────────────────────────────────────────────

pub fn node_is_eligible(node: &StoryNode, subject: &Subject, visited: &VisitedSet) -> bool {
    node.covers_age(subject.age)
        && (node.repeatable || !visited.contains(&node.id))
        && requirements_met(node.requirements.as_deref(), subject)
}

/// Every eligible node, in catalog order.
pub fn eligible_nodes<'a>(
    catalog: &'a Catalog,
    subject: &Subject,
    visited: &VisitedSet,
) -> Vec<&'a StoryNode> {
    catalog
        .nodes()
        .iter()
        .filter(|node| node_is_eligible(node, subject, visited))
        .collect()
}

/// Issues synthetic "quiet year" nodes with ids that never repeat
/// within a session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuietYears {
    issued: u64,
}

impl QuietYears {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fillers handed out so far.
    pub fn issued(&self) -> u64 {
        self.issued
    }

    pub fn next_node(&mut self, age: Age) -> StoryNode {
        self.issued += 1;
        StoryNode {
            id: format!("quiet-{age}-{}", self.issued),
            title: Some("A quiet year".into()),
            description: "Nothing big happened this year. Small habits are laying \
                          the ground for bigger decisions later on."
                .into(),
            min_age: age,
            max_age: age,
            weight: 1,
            repeatable: true,
            requirements: None,
            options: vec![StoryOption {
                text: "Keep to your routine".into(),
                next_node_id: None,
                advance_year: false,
                effect: None,
            }],
        }
    }
}

/// Whether `id` was manufactured by `QuietYears`.
pub fn is_quiet_year(id: &str) -> bool {
    id.starts_with("quiet-")
}

/// Weighted pick over the eligible nodes for the subject's current age,
/// or a fresh quiet-year filler when nothing is eligible.
pub fn select_node(
    catalog: &Catalog,
    subject: &Subject,
    visited: &VisitedSet,
    quiet: &mut QuietYears,
    rng: &mut dyn LifeRng,
) -> StoryNode {
    let eligible = eligible_nodes(catalog, subject, visited);
    match weighted_index(&eligible, rng) {
        Some(i) => {
            log::debug!(
                "age {}: selected node '{}' from {} eligible",
                subject.age,
                eligible[i].id,
                eligible.len()
            );
            eligible[i].clone()
        }
        None => {
            let filler = quiet.next_node(subject.age);
            log::debug!("age {}: no eligible node, issuing '{}'", subject.age, filler.id);
            filler
        }
    }
}

/// The node that follows a resolved option. An explicit successor is used
/// only if it exists and is eligible; otherwise fall back to weighted
/// selection.
pub fn resolve_successor(
    option: &StoryOption,
    catalog: &Catalog,
    subject: &Subject,
    visited: &VisitedSet,
    quiet: &mut QuietYears,
    rng: &mut dyn LifeRng,
) -> StoryNode {
    if let Some(next) = option
        .next_node_id
        .as_deref()
        .and_then(|id| catalog.node(id))
        .filter(|node| node_is_eligible(node, subject, visited))
    {
        return next.clone();
    }
    if let Some(id) = &option.next_node_id {
        log::debug!("successor '{id}' missing or ineligible at age {}", subject.age);
    }
    select_node(catalog, subject, visited, quiet, rng)
}

// ── Activities ─────────────────────────────────────────────────────────────

pub fn activity_is_eligible(activity: &Activity, subject: &Subject) -> bool {
    activity.covers_age(subject.age) && requirements_met(activity.requirements.as_deref(), subject)
}

/// How many activities to offer out of `eligible` candidates.
pub fn activity_target(eligible: usize) -> usize {
    (eligible / 2).clamp(MIN_ACTIVITY_OFFER, MAX_ACTIVITY_OFFER)
}

/// Weighted draws without replacement until the pool is empty or the
/// target count is reached.
pub fn select_activities(catalog: &Catalog, subject: &Subject, rng: &mut dyn LifeRng) -> Vec<Activity> {
    let mut pool: Vec<&Activity> = catalog
        .activities()
        .iter()
        .filter(|a| activity_is_eligible(a, subject))
        .collect();
    let target = activity_target(pool.len());

    let mut offered = Vec::with_capacity(target.min(pool.len()));
    while offered.len() < target {
        let Some(i) = weighted_index(&pool, rng) else {
            break;
        };
        offered.push(pool.remove(i).clone());
    }
    offered
}
