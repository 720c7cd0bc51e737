//! Session controller: one life being played.
//!
//! Owns the subject, the presented node, the offered activities, the log,
//! and the single random stream. Exposes the player-facing operations:
//!   - choose_option     resolve the presented node (once per year)
//!   - use_activity      apply an offered activity and withdraw it
//!   - advance_year      run the year engine, then re-select node and offer
//!
//! RULES:
//!   - Every operation is total. Rejected calls return `Outcome::Ignored`
//!     and leave the session untouched.
//!   - A dead subject is terminal: nothing mutates it again.
//!   - At most one main resolution per year.
//!   - Catalog and tables are shared read-only behind `Arc`.

use crate::{
    config::EngineConfig,
    content::{Activity, Catalog, StoryNode, StoryOption},
    effect::apply_optional,
    engine::YearEngine,
    error::{SimError, SimResult},
    event::{LifeEvent, LifeEventKind, LifeLog},
    family_generator::FamilyGenerator,
    rng::LifeRng,
    selection::{is_quiet_year, resolve_successor, select_activities, select_node, QuietYears, VisitedSet},
    snapshot::{SessionSnapshot, SNAPSHOT_VERSION},
    subject::{create_subject, DeathCause, RelationshipStatus, Subject, SubjectSeed},
    types::{Age, Money},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Id of the catalog node every new life opens on.
pub const START_NODE_ID: &str = "start";
/// Id of the placeholder used when the catalog has no start node.
pub const FALLBACK_START_ID: &str = "start-fallback";

const DEFAULT_BROWSE_NOTE: &str = "Browsed the category";

/// Why a player operation was not applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IgnoreReason {
    SubjectDead,
    MainChoiceAlreadyMade,
    UnknownOption,
    UnknownActivity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum Outcome {
    Applied,
    Ignored(IgnoreReason),
}

impl Outcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied)
    }
}

/// Serializable digest of a life, for runners and end screens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifeSummary {
    pub name:         String,
    pub country:      String,
    pub age:          Age,
    pub alive:        bool,
    pub death_cause:  Option<DeathCause>,
    pub money:        Money,
    pub job_title:    Option<String>,
    pub salary:       Money,
    pub relationship: RelationshipStatus,
    pub children:     usize,
    pub achievements: Vec<String>,
    pub log_entries:  usize,
}

pub struct LifeSession<R: LifeRng> {
    catalog:           Arc<Catalog>,
    config:            Arc<EngineConfig>,
    engine:            YearEngine,
    rng:               R,
    subject:           Subject,
    current_node:      StoryNode,
    activities:        Vec<Activity>,
    log:               LifeLog,
    visited:           VisitedSet,
    quiet:             QuietYears,
    main_resolved:     bool,
    actions_this_year: u32,
}

impl<R: LifeRng> LifeSession<R> {
    /// Start a new life: generate the family, create the subject, open on
    /// the catalog's start node and draw the first activity offer.
    pub fn start(
        catalog: Arc<Catalog>,
        config: Arc<EngineConfig>,
        seed: SubjectSeed,
        mut rng: R,
    ) -> Self {
        let family = FamilyGenerator::new(&config.family, &config.names).generate(&seed.country, &mut rng);
        let subject = create_subject(seed, family, &config, &mut rng);
        log::info!(
            "new life: '{}' ({}) in {}",
            subject.name,
            subject.gender,
            subject.country
        );
        Self::from_subject(catalog, config, subject, rng)
    }

    /// Open a session on an existing newborn (or any) subject at the start
    /// node.
    pub fn from_subject(
        catalog: Arc<Catalog>,
        config: Arc<EngineConfig>,
        subject: Subject,
        rng: R,
    ) -> Self {
        let current_node = match catalog.node(START_NODE_ID) {
            Some(node) => node.clone(),
            None => {
                log::warn!("catalog has no '{START_NODE_ID}' node, using placeholder");
                fallback_start_node()
            }
        };
        let mut session = Self::assemble(catalog, config, subject, VisitedSet::new(), current_node, rng);
        session.refresh_activities();
        session
    }

    /// Rebuild a session from a saved subject and visited set. The node and
    /// activity offer are re-selected for the subject's current age.
    pub fn resume(
        catalog: Arc<Catalog>,
        config: Arc<EngineConfig>,
        subject: Subject,
        visited: VisitedSet,
        rng: R,
    ) -> SimResult<Self> {
        check_visited(&catalog, &visited)?;
        let placeholder = fallback_start_node();
        let mut session = Self::assemble(catalog, config, subject, visited, placeholder, rng);
        session.current_node = select_node(
            &session.catalog,
            &session.subject,
            &session.visited,
            &mut session.quiet,
            &mut session.rng,
        );
        session.refresh_activities();
        Ok(session)
    }

    /// Restore a session exactly as it was when `snapshot` was taken.
    pub fn restore(
        catalog: Arc<Catalog>,
        config: Arc<EngineConfig>,
        snapshot: SessionSnapshot,
        rng: R,
    ) -> SimResult<Self> {
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(SimError::SnapshotMismatch {
                reason: format!(
                    "snapshot version {} (expected {SNAPSHOT_VERSION})",
                    snapshot.version
                ),
            });
        }
        check_visited(&catalog, &snapshot.visited)?;
        let node_id = snapshot.current_node.id.as_str();
        if node_id != FALLBACK_START_ID && !is_quiet_year(node_id) && catalog.node(node_id).is_none() {
            return Err(SimError::SnapshotMismatch {
                reason: format!("current node '{node_id}' is not in the catalog"),
            });
        }

        let mut session = Self::assemble(
            catalog,
            config,
            snapshot.subject,
            snapshot.visited,
            snapshot.current_node,
            rng,
        );
        session.activities = snapshot.activities;
        session.log = snapshot.log;
        session.quiet = snapshot.quiet;
        session.main_resolved = snapshot.main_resolved;
        session.actions_this_year = snapshot.actions_this_year;
        Ok(session)
    }

    fn assemble(
        catalog: Arc<Catalog>,
        config: Arc<EngineConfig>,
        subject: Subject,
        visited: VisitedSet,
        current_node: StoryNode,
        rng: R,
    ) -> Self {
        let engine = YearEngine::build(Arc::clone(&config));
        Self {
            catalog,
            config,
            engine,
            rng,
            subject,
            current_node,
            activities: Vec::new(),
            log: LifeLog::new(),
            visited,
            quiet: QuietYears::new(),
            main_resolved: false,
            actions_this_year: 0,
        }
    }

    // ── Read-only views ──────────────────────────────────────────────────

    pub fn subject(&self) -> &Subject {
        &self.subject
    }

    pub fn current_node(&self) -> &StoryNode {
        &self.current_node
    }

    pub fn activities(&self) -> &[Activity] {
        &self.activities
    }

    pub fn log(&self) -> &LifeLog {
        &self.log
    }

    pub fn visited(&self) -> &VisitedSet {
        &self.visited
    }

    pub fn main_resolved(&self) -> bool {
        self.main_resolved
    }

    pub fn actions_this_year(&self) -> u32 {
        self.actions_this_year
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn is_over(&self) -> bool {
        !self.subject.alive
    }

    // ── Player operations ────────────────────────────────────────────────

    /// Resolve the presented node with its option at `index`.
    pub fn choose_option(&mut self, index: usize) -> Outcome {
        if !self.subject.alive {
            return Outcome::Ignored(IgnoreReason::SubjectDead);
        }
        if self.main_resolved {
            return Outcome::Ignored(IgnoreReason::MainChoiceAlreadyMade);
        }
        let Some(option) = self.current_node.options.get(index).cloned() else {
            return Outcome::Ignored(IgnoreReason::UnknownOption);
        };

        let impact = apply_optional(option.effect.as_ref(), &mut self.subject);
        self.log.push(
            LifeEvent::new(
                self.subject.age,
                LifeEventKind::Main,
                self.current_node.display_title(),
                option.text.clone(),
            )
            .with_impact(impact),
        );
        if !self.current_node.repeatable {
            self.visited.insert(self.current_node.id.clone());
        }
        self.actions_this_year += 1;
        self.main_resolved = true;
        log::debug!(
            "age {}: resolved '{}' with '{}'",
            self.subject.age,
            self.current_node.id,
            option.text
        );

        if option.advance_year {
            self.advance_year();
        } else {
            self.present_successor(&option);
        }
        Outcome::Applied
    }

    /// Apply the offered activity at `index` and withdraw it from the offer.
    pub fn use_activity(&mut self, index: usize) -> Outcome {
        if !self.subject.alive {
            return Outcome::Ignored(IgnoreReason::SubjectDead);
        }
        if index >= self.activities.len() {
            return Outcome::Ignored(IgnoreReason::UnknownActivity);
        }
        let activity = self.activities.remove(index);
        let impact = apply_optional(activity.effect.as_ref(), &mut self.subject);
        self.actions_this_year += 1;
        self.log.push(
            LifeEvent::new(
                self.subject.age,
                LifeEventKind::Activity,
                activity.title,
                activity.summary,
            )
            .with_impact(impact),
        );
        Outcome::Applied
    }

    /// Run one simulated year, then re-select the node and activity offer
    /// for the new age.
    pub fn advance_year(&mut self) -> Outcome {
        let Some(year) = self.engine.advance(&self.subject, &mut self.rng) else {
            return Outcome::Ignored(IgnoreReason::SubjectDead);
        };
        self.subject = year.subject;
        self.log.extend(year.events);
        self.main_resolved = false;
        self.actions_this_year = 0;

        if year.died {
            self.activities.clear();
            log::info!(
                "'{}' died at {} ({})",
                self.subject.name,
                self.subject.age,
                self.subject
                    .death_cause
                    .map(|c| c.as_str())
                    .unwrap_or("unknown")
            );
            return Outcome::Applied;
        }

        self.current_node = select_node(
            &self.catalog,
            &self.subject,
            &self.visited,
            &mut self.quiet,
            &mut self.rng,
        );
        self.refresh_activities();
        Outcome::Applied
    }

    /// Note in the log that the player browsed an activity category.
    pub fn log_category_visit(&mut self, title: &str, note: Option<&str>) {
        self.log.push(LifeEvent::new(
            self.subject.age,
            LifeEventKind::Activity,
            title,
            note.unwrap_or(DEFAULT_BROWSE_NOTE),
        ));
    }

    pub fn summary(&self) -> LifeSummary {
        let s = &self.subject;
        LifeSummary {
            name: s.name.clone(),
            country: s.country.clone(),
            age: s.age,
            alive: s.alive,
            death_cause: s.death_cause,
            money: s.money,
            job_title: s.job_title.clone(),
            salary: s.salary,
            relationship: s.relationship,
            children: s.children.len(),
            achievements: s.achievements.clone(),
            log_entries: self.log.len(),
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            version: SNAPSHOT_VERSION,
            subject: self.subject.clone(),
            visited: self.visited.clone(),
            current_node: self.current_node.clone(),
            activities: self.activities.clone(),
            log: self.log.clone(),
            quiet: self.quiet.clone(),
            main_resolved: self.main_resolved,
            actions_this_year: self.actions_this_year,
        }
    }

    fn present_successor(&mut self, option: &StoryOption) {
        self.current_node = resolve_successor(
            option,
            &self.catalog,
            &self.subject,
            &self.visited,
            &mut self.quiet,
            &mut self.rng,
        );
    }

    fn refresh_activities(&mut self) {
        self.activities = if self.subject.alive {
            select_activities(&self.catalog, &self.subject, &mut self.rng)
        } else {
            Vec::new()
        };
    }
}

/// Every visited id must name a catalog node. The placeholder start node
/// is the one id a catalog never carries.
fn check_visited(catalog: &Catalog, visited: &VisitedSet) -> SimResult<()> {
    match visited
        .iter()
        .find(|id| id.as_str() != FALLBACK_START_ID && catalog.node(id).is_none())
    {
        Some(id) => Err(SimError::SnapshotMismatch {
            reason: format!("visited node '{id}' is not in the catalog"),
        }),
        None => Ok(()),
    }
}

/// Presented when the catalog has no start node.
fn fallback_start_node() -> StoryNode {
    StoryNode {
        id: FALLBACK_START_ID.into(),
        title: Some("First breath".into()),
        description: "No story was found for this life. Keep writing your own.".into(),
        min_age: 0,
        max_age: 0,
        weight: 1,
        repeatable: false,
        requirements: None,
        options: vec![StoryOption {
            text: "Continue".into(),
            next_node_id: None,
            advance_year: false,
            effect: None,
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        attributes::Stat,
        content::ActivityCategory,
        effect::Effect,
        rng::{ScriptedRng, SimRng},
    };

    fn seed() -> SubjectSeed {
        SubjectSeed {
            name: "Ege".into(),
            gender: "Male".into(),
            country: "Turkey".into(),
        }
    }

    fn option(text: &str, advance_year: bool, effect: Option<Effect>) -> StoryOption {
        StoryOption {
            text: text.into(),
            next_node_id: None,
            advance_year,
            effect,
        }
    }

    fn catalog() -> Arc<Catalog> {
        let start = StoryNode {
            id: START_NODE_ID.into(),
            title: Some("Born".into()),
            description: "You took your first breath.".into(),
            min_age: 0,
            max_age: 0,
            weight: 1,
            repeatable: false,
            requirements: None,
            options: vec![
                option("Cry loudly", false, Some(Effect::new().stat(Stat::Aura, 2))),
                option("Sleep", true, None),
            ],
        };
        let activity = |title: &str| Activity {
            title: title.into(),
            summary: format!("{title} summary"),
            category: ActivityCategory::Leisure,
            min_age: 0,
            max_age: 120,
            weight: 1,
            requirements: None,
            effect: Some(Effect::new().stat(Stat::Happiness, 1)),
        };
        Arc::new(
            Catalog::new(
                vec![start],
                vec![activity("Park"), activity("Library"), activity("Beach"), activity("Zoo")],
            )
            .unwrap(),
        )
    }

    fn session(seed_value: u64) -> LifeSession<SimRng> {
        LifeSession::start(catalog(), Arc::new(EngineConfig::default()), seed(), SimRng::new(seed_value))
    }

    #[test]
    fn new_life_opens_on_start_node() {
        let s = session(1);
        assert_eq!(s.current_node().id, START_NODE_ID);
        assert_eq!(s.subject().age, 0);
        assert_eq!(s.activities().len(), 3);
        assert!(s.log().is_empty());
        assert!(!s.main_resolved());
    }

    #[test]
    fn missing_start_node_uses_placeholder() {
        let empty = Arc::new(Catalog::default());
        let s = LifeSession::start(empty, Arc::new(EngineConfig::default()), seed(), SimRng::new(1));
        assert_eq!(s.current_node().id, FALLBACK_START_ID);
        assert_eq!(s.current_node().options.len(), 1);
        assert!(s.activities().is_empty());
    }

    #[test]
    fn choosing_logs_and_marks_the_year_resolved() {
        let mut s = session(2);
        let aura = s.subject().stat(Stat::Aura);
        assert_eq!(s.choose_option(0), Outcome::Applied);
        assert!(s.main_resolved());
        assert_eq!(s.actions_this_year(), 1);
        assert!(s.visited().contains(START_NODE_ID));
        assert_eq!(s.subject().stat(Stat::Aura), (aura + 2).min(100));

        let entry = s.log().latest().unwrap();
        assert_eq!(entry.kind, LifeEventKind::Main);
        assert_eq!(entry.title, "Born");
        assert_eq!(entry.description, "Cry loudly");
    }

    #[test]
    fn unknown_option_is_ignored() {
        let mut s = session(3);
        assert_eq!(s.choose_option(9), Outcome::Ignored(IgnoreReason::UnknownOption));
        assert!(!s.main_resolved());
        assert!(s.log().is_empty());
    }

    #[test]
    fn advancing_option_runs_the_year() {
        let mut s = session(4);
        assert_eq!(s.choose_option(1), Outcome::Applied);
        assert_eq!(s.subject().age, 1);
        assert!(!s.main_resolved());
        assert_eq!(s.actions_this_year(), 0);
        // start only covers age 0, so the next node is a filler
        assert!(is_quiet_year(&s.current_node().id));
    }

    #[test]
    fn used_activity_is_withdrawn() {
        let mut s = session(5);
        let title = s.activities()[0].title.clone();
        assert_eq!(s.use_activity(0), Outcome::Applied);
        assert_eq!(s.activities().len(), 2);
        assert!(s.activities().iter().all(|a| a.title != title));
        let entry = s.log().latest().unwrap();
        assert_eq!(entry.kind, LifeEventKind::Activity);
        assert_eq!(entry.title, title);
        assert_eq!(s.use_activity(7), Outcome::Ignored(IgnoreReason::UnknownActivity));
    }

    #[test]
    fn category_visit_is_an_activity_note() {
        let mut s = session(6);
        s.log_category_visit("Education", None);
        s.log_category_visit("Health", Some("Looked at the gym"));
        let entries: Vec<_> = s.log().newest_first().collect();
        assert_eq!(entries[0].description, "Looked at the gym");
        assert_eq!(entries[1].description, DEFAULT_BROWSE_NOTE);
        assert!(entries.iter().all(|e| e.kind == LifeEventKind::Activity));
    }

    #[test]
    fn snapshot_restores_the_same_session() {
        let mut s = session(7);
        s.choose_option(0);
        s.use_activity(0);
        let snapshot = s.snapshot();
        let json = snapshot.to_json().unwrap();

        let restored = LifeSession::restore(
            catalog(),
            Arc::new(EngineConfig::default()),
            SessionSnapshot::from_json(&json).unwrap(),
            SimRng::new(7),
        )
        .unwrap();
        assert_eq!(restored.snapshot(), snapshot);
        assert!(restored.main_resolved());
    }

    #[test]
    fn snapshot_with_unknown_node_is_rejected() {
        let s = session(8);
        let mut snapshot = s.snapshot();
        snapshot.visited.insert("ghost".into());
        let result = LifeSession::restore(
            catalog(),
            Arc::new(EngineConfig::default()),
            snapshot,
            SimRng::new(8),
        );
        assert!(matches!(result, Err(SimError::SnapshotMismatch { .. })));
    }

    #[test]
    fn placeholder_start_survives_restore_and_resume() {
        let empty = Arc::new(Catalog::default());
        let config = Arc::new(EngineConfig::default());
        let mut s = LifeSession::start(Arc::clone(&empty), Arc::clone(&config), seed(), SimRng::new(12));
        assert_eq!(s.choose_option(0), Outcome::Applied);
        assert!(s.visited().contains(FALLBACK_START_ID));

        let snapshot = s.snapshot();
        let restored = LifeSession::restore(
            Arc::clone(&empty),
            Arc::clone(&config),
            snapshot.clone(),
            SimRng::new(12),
        )
        .unwrap();
        assert_eq!(restored.snapshot(), snapshot);

        let resumed = LifeSession::resume(
            empty,
            config,
            snapshot.subject,
            snapshot.visited,
            SimRng::new(12),
        )
        .unwrap();
        assert!(is_quiet_year(&resumed.current_node().id));
    }

    #[test]
    fn resume_reselects_for_current_age() {
        let s = session(9);
        let mut subject = s.subject().clone();
        subject.age = 0;
        let visited: VisitedSet = [START_NODE_ID.to_string()].into_iter().collect();
        let resumed = LifeSession::resume(
            catalog(),
            Arc::new(EngineConfig::default()),
            subject,
            visited,
            ScriptedRng::new([]),
        )
        .unwrap();
        assert!(is_quiet_year(&resumed.current_node().id));
        assert_eq!(resumed.activities().len(), 3);
    }

    #[test]
    fn summary_reflects_the_subject() {
        let mut s = session(10);
        s.advance_year();
        let summary = s.summary();
        assert_eq!(summary.age, 1);
        assert!(summary.alive);
        assert_eq!(summary.name, "Ege");
        assert_eq!(summary.log_entries, s.log().len());
    }
}
