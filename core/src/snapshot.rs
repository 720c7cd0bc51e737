//! Snapshot serialization: full session state to/from JSON.
//!
//! A snapshot captures everything needed to continue a session without
//! replaying it: the subject, the visited set, the presented node, the
//! offered activities, the turn flags, the filler counter, and the log.
//!
//! The catalog and tables are NOT captured. A snapshot is restored against
//! a catalog reference supplied by the caller, and is rejected if it names
//! story nodes that catalog does not contain.

use crate::{
    content::{Activity, StoryNode},
    error::SimResult,
    event::LifeLog,
    selection::{QuietYears, VisitedSet},
    subject::Subject,
};
use serde::{Deserialize, Serialize};

/// Bumped whenever the snapshot shape changes incompatibly.
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub version:           u32,
    pub subject:           Subject,
    pub visited:           VisitedSet,
    pub current_node:      StoryNode,
    pub activities:        Vec<Activity>,
    pub log:               LifeLog,
    pub quiet:             QuietYears,
    pub main_resolved:     bool,
    pub actions_this_year: u32,
}

impl SessionSnapshot {
    pub fn to_json(&self) -> SimResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> SimResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
