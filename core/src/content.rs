//! Read-only narrative content: story nodes and side activities.
//!
//! RULE: the catalog is never mutated after construction. Sessions share it
//! behind an `Arc`.
//! Catalog order is the iteration order for weighted selection, so the
//! same seed always reproduces the same pick.

use crate::{
    attributes::Stat,
    effect::Effect,
    error::{SimError, SimResult},
    subject::Subject,
    types::{Age, NodeId},
};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One AND-ed predicate over the subject. Absent clauses always pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Requirement {
    pub genders:          Option<Vec<String>>,
    pub countries:        Option<Vec<String>>,
    pub min_intelligence: Option<i32>,
    pub max_intelligence: Option<i32>,
    pub min_beauty:       Option<i32>,
    pub min_luck:         Option<i32>,
    pub min_aura:         Option<i32>,
}

impl Requirement {
    pub fn is_met(&self, subject: &Subject) -> bool {
        let listed = |allowed: &Option<Vec<String>>, value: &str| match allowed {
            Some(list) if !list.is_empty() => list.iter().any(|v| v == value),
            _ => true,
        };
        let at_least = |min: Option<i32>, stat: Stat| min.map_or(true, |m| subject.stat(stat) >= m);

        listed(&self.genders, &subject.gender)
            && listed(&self.countries, &subject.country)
            && at_least(self.min_intelligence, Stat::Intelligence)
            && self
                .max_intelligence
                .map_or(true, |m| subject.stat(Stat::Intelligence) <= m)
            && at_least(self.min_beauty, Stat::Beauty)
            && at_least(self.min_luck, Stat::Luck)
            && at_least(self.min_aura, Stat::Aura)
    }
}

/// True when every requirement holds. An absent or empty list always holds.
pub fn requirements_met(requirements: Option<&[Requirement]>, subject: &Subject) -> bool {
    requirements.map_or(true, |reqs| reqs.iter().all(|r| r.is_met(subject)))
}

// ── Story nodes ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryOption {
    pub text:         String,
    /// Absent: the engine picks the successor itself.
    #[serde(default)]
    pub next_node_id: Option<NodeId>,
    #[serde(default)]
    pub advance_year: bool,
    #[serde(default)]
    pub effect:       Option<Effect>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryNode {
    pub id:           NodeId,
    #[serde(default)]
    pub title:        Option<String>,
    pub description:  String,
    pub min_age:      Age,
    pub max_age:      Age,
    /// Values of zero or below count as 1.
    #[serde(default = "default_weight")]
    pub weight:       i32,
    #[serde(default)]
    pub repeatable:   bool,
    #[serde(default)]
    pub requirements: Option<Vec<Requirement>>,
    pub options:      Vec<StoryOption>,
}

impl StoryNode {
    /// The log title: the authored title, or the start of the description.
    pub fn display_title(&self) -> String {
        match &self.title {
            Some(title) => title.clone(),
            None => self.description.chars().take(48).collect(),
        }
    }

    pub fn covers_age(&self, age: Age) -> bool {
        self.min_age <= age && age <= self.max_age
    }
}

fn default_weight() -> i32 {
    1
}

// ── Activities ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityCategory {
    Health,
    Social,
    Education,
    Career,
    Finance,
    Activism,
    Leisure,
    Relationship,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub title:        String,
    pub summary:      String,
    pub category:     ActivityCategory,
    pub min_age:      Age,
    pub max_age:      Age,
    #[serde(default = "default_weight")]
    pub weight:       i32,
    #[serde(default)]
    pub requirements: Option<Vec<Requirement>>,
    #[serde(default)]
    pub effect:       Option<Effect>,
}

impl Activity {
    pub fn covers_age(&self, age: Age) -> bool {
        self.min_age <= age && age <= self.max_age
    }
}

// ── Catalog ────────────────────────────────────────────────────────────────

/// All story nodes and activities, in authored order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    nodes:      Vec<StoryNode>,
    by_id:      HashMap<NodeId, usize>,
    activities: Vec<Activity>,
}

impl Catalog {
    /// Build a catalog. Node ids must be unique.
    pub fn new(nodes: Vec<StoryNode>, activities: Vec<Activity>) -> SimResult<Self> {
        let mut by_id = HashMap::with_capacity(nodes.len());
        for (i, node) in nodes.iter().enumerate() {
            if by_id.insert(node.id.clone(), i).is_some() {
                return Err(SimError::DuplicateNode { id: node.id.clone() });
            }
        }
        Ok(Self { nodes, by_id, activities })
    }

    /// Parse the two catalog documents.
    pub fn from_json(nodes_json: &str, activities_json: &str) -> SimResult<Self> {
        let nodes: Vec<StoryNode> = serde_json::from_str(nodes_json)?;
        let activities: Vec<Activity> = serde_json::from_str(activities_json)?;
        Self::new(nodes, activities)
    }

    /// Load `catalog/story_nodes.json` and `catalog/activities.json`
    /// from the data/ directory.
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let read = |file: &str| {
            let path = format!("{data_dir}/catalog/{file}");
            std::fs::read_to_string(&path)
                .map_err(SimError::Io)
                .with_context(|| format!("Cannot read {path}"))
        };
        let catalog = Self::from_json(&read("story_nodes.json")?, &read("activities.json")?)?;
        log::debug!(
            "loaded catalog from {data_dir}: {} story nodes, {} activities",
            catalog.nodes.len(),
            catalog.activities.len()
        );
        Ok(catalog)
    }

    pub fn node(&self, id: &str) -> Option<&StoryNode> {
        self.by_id.get(id).map(|&i| &self.nodes[i])
    }

    pub fn nodes(&self) -> &[StoryNode] {
        &self.nodes
    }

    pub fn activities(&self) -> &[Activity] {
        &self.activities
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
