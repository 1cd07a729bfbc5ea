use std::collections::BTreeSet;

use super::events::TeamEvent;
use super::value_objects::Level;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Team aggregate root
///
/// A project group of students with a level, a raw score and a technology
/// stack. Enforces the membership and scoring rules of a single team; rules
/// spanning several teams live in the engine.
///
/// # Invariants
/// - Name cannot be empty
/// - Capacity is positive and the member count never exceeds it
/// - Score is never negative
/// - Level only moves forward, one step at a time
///
/// # Example
/// ```
/// use academia_api::domain::team::{Level, Team};
///
/// let (team, events) = Team::new("Alpha", Some(Level::Junior), 3).expect("valid team");
/// let team = team.with_technologies(["Java", "Spring"]);
///
/// assert_eq!(team.name(), "Alpha");
/// assert!(team.can_accept_new_members());
/// assert_eq!(events.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Team {
    id: Uuid,
    name: String,
    level: Option<Level>,
    created_at: DateTime<Utc>,
    score: Option<i32>,
    max_students: u32,
    members: BTreeSet<Uuid>,
    technologies: BTreeSet<String>,
    project_in_progress: Option<bool>,
    performance_index: Option<f64>,
    last_evaluation: Option<DateTime<Utc>>,
    detail_id: Option<Uuid>,
    version: i64,
}

/// Raw team data as stored by a repository
///
/// Used to rebuild a [`Team`] without re-running creation rules.
#[derive(Debug, Clone, PartialEq)]
pub struct TeamRecord {
    pub id: Uuid,
    pub name: String,
    pub level: Option<Level>,
    pub created_at: DateTime<Utc>,
    pub score: Option<i32>,
    pub max_students: u32,
    pub members: BTreeSet<Uuid>,
    pub technologies: BTreeSet<String>,
    pub project_in_progress: Option<bool>,
    pub performance_index: Option<f64>,
    pub last_evaluation: Option<DateTime<Utc>>,
    pub detail_id: Option<Uuid>,
    pub version: i64,
}

impl Team {
    /// Creates a new Team aggregate
    ///
    /// # Arguments
    /// * `name` - Display name (cannot be empty)
    /// * `level` - Initial level, `None` for an unclassified team
    /// * `max_students` - Capacity (must be positive)
    ///
    /// # Returns
    /// * `Ok((Team, Vec<TeamEvent>))` - New team and events generated
    /// * `Err(String)` - If any invariant is violated
    pub fn new(
        name: impl Into<String>,
        level: Option<Level>,
        max_students: u32,
    ) -> Result<(Self, Vec<TeamEvent>), String> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err("Name cannot be empty".to_string());
        }

        if max_students == 0 {
            return Err("Maximum student count must be positive".to_string());
        }

        let team = Self {
            id: Uuid::new_v4(),
            name,
            level,
            created_at: Utc::now(),
            score: None,
            max_students,
            members: BTreeSet::new(),
            technologies: BTreeSet::new(),
            project_in_progress: None,
            performance_index: None,
            last_evaluation: None,
            detail_id: None,
            version: 0,
        };

        let events = vec![TeamEvent::Created {
            team_id: team.id,
            name: team.name.clone(),
            max_students,
        }];

        Ok((team, events))
    }

    /// Sets the technologies currently in use, replacing any previous set
    pub fn with_technologies<I, S>(mut self, technologies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.technologies.clear();
        for technology in technologies {
            self.add_technology(technology);
        }
        self
    }

    /// Sets the project-in-progress flag
    pub fn with_project_in_progress(mut self, in_progress: bool) -> Self {
        self.project_in_progress = Some(in_progress);
        self
    }

    /// Links the team to its detail record
    pub fn with_detail(mut self, detail_id: Uuid) -> Self {
        self.detail_id = Some(detail_id);
        self
    }

    // ===== Identity and capacity =====

    /// Renames the team
    ///
    /// # Business Rules
    /// - Name cannot be empty
    pub fn rename(&mut self, name: impl Into<String>) -> Result<TeamEvent, String> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err("Name cannot be empty".to_string());
        }

        self.name = name;

        Ok(TeamEvent::Renamed {
            team_id: self.id,
            name: self.name.clone(),
        })
    }

    /// Changes the capacity
    ///
    /// # Business Rules
    /// - Capacity must be positive
    /// - Capacity cannot drop below the current member count
    pub fn resize(&mut self, max_students: u32) -> Result<TeamEvent, String> {
        if max_students == 0 {
            return Err("Maximum student count must be positive".to_string());
        }

        if (max_students as usize) < self.members.len() {
            return Err(format!(
                "Capacity {} is below the current member count {}",
                max_students,
                self.members.len()
            ));
        }

        let previous = std::mem::replace(&mut self.max_students, max_students);

        Ok(TeamEvent::Resized {
            team_id: self.id,
            previous,
            max_students,
        })
    }

    // ===== Membership =====

    /// Whether one more student fits
    pub fn can_accept_new_members(&self) -> bool {
        self.members.len() < self.max_students as usize
    }

    pub fn has_member(&self, student_id: Uuid) -> bool {
        self.members.contains(&student_id)
    }

    /// Adds a student to the team
    ///
    /// # Business Rules
    /// - Team must have room left
    /// - Student must not already be a member
    pub fn add_member(&mut self, student_id: Uuid) -> Result<TeamEvent, String> {
        if self.has_member(student_id) {
            return Err(format!("Student {} is already a member", student_id));
        }

        if !self.can_accept_new_members() {
            return Err(format!(
                "Team is full ({} of {} students)",
                self.members.len(),
                self.max_students
            ));
        }

        self.members.insert(student_id);

        Ok(TeamEvent::MemberJoined {
            team_id: self.id,
            student_id,
        })
    }

    /// Removes a student from the team
    pub fn remove_member(&mut self, student_id: Uuid) -> Result<TeamEvent, String> {
        if !self.members.remove(&student_id) {
            return Err(format!("Student {} is not a member", student_id));
        }

        Ok(TeamEvent::MemberLeft {
            team_id: self.id,
            student_id,
        })
    }

    // ===== Technologies =====

    /// Adds a technology to the stack
    ///
    /// Returns `false` when the name is blank or already present, compared
    /// case-insensitively.
    pub fn add_technology(&mut self, technology: impl Into<String>) -> bool {
        let technology = technology.into().trim().to_string();
        if technology.is_empty() || self.uses_technology(&technology) {
            return false;
        }
        self.technologies.insert(technology)
    }

    /// Case-insensitive lookup in the technology stack
    pub fn uses_technology(&self, technology: &str) -> bool {
        self.technologies
            .iter()
            .any(|t| t.eq_ignore_ascii_case(technology))
    }

    // ===== Scoring =====

    /// Replaces the raw score
    ///
    /// # Business Rules
    /// - Score cannot be negative
    pub fn update_score(&mut self, score: i32) -> Result<TeamEvent, String> {
        if score < 0 {
            return Err(format!("Score cannot be negative: {}", score));
        }

        let previous = self.score.replace(score);

        Ok(TeamEvent::ScoreUpdated {
            team_id: self.id,
            previous,
            score,
        })
    }

    /// Caches a freshly computed performance index
    pub fn record_performance(&mut self, performance: f64) -> TeamEvent {
        self.performance_index = Some(performance);

        TeamEvent::PerformanceEvaluated {
            team_id: self.id,
            performance,
        }
    }

    /// Caches a performance index and stamps the evaluation time
    pub fn record_evaluation(&mut self, performance: f64, at: DateTime<Utc>) -> TeamEvent {
        self.last_evaluation = Some(at);
        self.record_performance(performance)
    }

    // ===== Evolution =====

    /// Promotes the team one level
    ///
    /// # Returns
    /// * `Ok(TeamEvent)` - Promoted event generated
    /// * `Err(String)` - If the team has no level or is already Expert
    pub fn promote(&mut self) -> Result<TeamEvent, String> {
        let from = self
            .level
            .ok_or_else(|| "Cannot promote a team without a level".to_string())?;
        let to = from
            .next()
            .filter(|next| from.can_transition_to(*next))
            .ok_or_else(|| format!("Cannot promote team at {} level", from))?;

        self.level = Some(to);

        Ok(TeamEvent::Promoted {
            team_id: self.id,
            from,
            to,
        })
    }

    // ===== Getters =====

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn level(&self) -> Option<Level> {
        self.level
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn score(&self) -> Option<i32> {
        self.score
    }

    pub fn max_students(&self) -> u32 {
        self.max_students
    }

    /// Member student IDs, in a stable order
    pub fn members(&self) -> &BTreeSet<Uuid> {
        &self.members
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn technologies(&self) -> &BTreeSet<String> {
        &self.technologies
    }

    pub fn project_in_progress(&self) -> Option<bool> {
        self.project_in_progress
    }

    pub fn performance_index(&self) -> Option<f64> {
        self.performance_index
    }

    pub fn last_evaluation(&self) -> Option<DateTime<Utc>> {
        self.last_evaluation
    }

    pub fn detail_id(&self) -> Option<Uuid> {
        self.detail_id
    }

    /// Optimistic-concurrency version; `0` until first saved
    pub fn version(&self) -> i64 {
        self.version
    }

    /// Stamps the version assigned by a repository after a successful save
    pub(crate) fn mark_persisted(&mut self, version: i64) {
        self.version = version;
    }

    /// Reconstructs a Team from persistence layer data
    ///
    /// This bypasses creation rules since the data was validated before it
    /// was stored.
    ///
    /// # Note
    /// Only to be used by repository implementations and test fixtures.
    pub fn from_record(record: TeamRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            level: record.level,
            created_at: record.created_at,
            score: record.score,
            max_students: record.max_students,
            members: record.members,
            technologies: record.technologies,
            project_in_progress: record.project_in_progress,
            performance_index: record.performance_index,
            last_evaluation: record.last_evaluation,
            detail_id: record.detail_id,
            version: record.version,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn junior_team(capacity: u32) -> Team {
        let (team, _) = Team::new("Alpha", Some(Level::Junior), capacity).unwrap();
        team
    }

    #[test]
    fn create_team_with_valid_fields() {
        let result = Team::new("Alpha", Some(Level::Junior), 3);

        assert!(result.is_ok());
        let (team, events) = result.unwrap();

        assert_eq!(team.name(), "Alpha");
        assert_eq!(team.level(), Some(Level::Junior));
        assert_eq!(team.max_students(), 3);
        assert_eq!(team.score(), None);
        assert_eq!(team.version(), 0);
        assert!(team.members().is_empty());
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], TeamEvent::Created { .. }));
    }

    #[test]
    fn create_team_with_empty_name_fails() {
        let result = Team::new("  ", Some(Level::Junior), 3);

        assert!(result.is_err());
        assert!(result.unwrap_err().contains("Name cannot be empty"));
    }

    #[test]
    fn create_team_with_zero_capacity_fails() {
        let result = Team::new("Alpha", None, 0);

        assert!(result.is_err());
        assert!(result.unwrap_err().contains("must be positive"));
    }

    #[test]
    fn capacity_tracks_member_count() {
        let mut team = junior_team(2);
        assert!(team.can_accept_new_members());

        team.add_member(Uuid::new_v4()).unwrap();
        assert!(team.can_accept_new_members());

        team.add_member(Uuid::new_v4()).unwrap();
        assert!(!team.can_accept_new_members());
    }

    #[test]
    fn add_member_to_full_team_fails() {
        let mut team = junior_team(1);
        team.add_member(Uuid::new_v4()).unwrap();

        let result = team.add_member(Uuid::new_v4());

        assert!(result.is_err());
        assert_eq!(team.member_count(), 1);
    }

    #[test]
    fn add_existing_member_fails() {
        let mut team = junior_team(3);
        let student = Uuid::new_v4();
        team.add_member(student).unwrap();

        assert!(team.add_member(student).is_err());
        assert_eq!(team.member_count(), 1);
    }

    #[test]
    fn remove_member() {
        let mut team = junior_team(3);
        let student = Uuid::new_v4();
        team.add_member(student).unwrap();

        let event = team.remove_member(student).unwrap();

        assert!(!team.has_member(student));
        assert_eq!(
            event,
            TeamEvent::MemberLeft {
                team_id: team.id(),
                student_id: student
            }
        );
        assert!(team.remove_member(student).is_err());
    }

    #[test]
    fn technologies_are_unique_ignoring_case() {
        let mut team = junior_team(3).with_technologies(["Java", "java", " Spring "]);

        assert_eq!(team.technologies().len(), 2);
        assert!(team.uses_technology("SPRING"));
        assert!(!team.add_technology("JAVA"));
        assert!(!team.add_technology(""));
        assert!(team.add_technology("React"));
    }

    #[test]
    fn update_score_rejects_negative_values() {
        let mut team = junior_team(3);
        team.update_score(80).unwrap();

        let result = team.update_score(-10);

        assert!(result.is_err());
        assert_eq!(team.score(), Some(80));
    }

    #[test]
    fn update_score_reports_previous_value() {
        let mut team = junior_team(3);
        team.update_score(80).unwrap();

        let event = team.update_score(90).unwrap();

        assert_eq!(
            event,
            TeamEvent::ScoreUpdated {
                team_id: team.id(),
                previous: Some(80),
                score: 90
            }
        );
    }

    #[test]
    fn record_evaluation_sets_both_fields() {
        let mut team = junior_team(3);
        let now = Utc::now();

        team.record_evaluation(72.5, now);

        assert_eq!(team.performance_index(), Some(72.5));
        assert_eq!(team.last_evaluation(), Some(now));
    }

    #[test]
    fn promote_walks_the_levels() {
        let mut team = junior_team(3);

        team.promote().unwrap();
        assert_eq!(team.level(), Some(Level::Senior));

        team.promote().unwrap();
        assert_eq!(team.level(), Some(Level::Expert));

        assert!(team.promote().is_err());
        assert_eq!(team.level(), Some(Level::Expert));
    }

    #[test]
    fn promote_without_level_fails() {
        let (mut team, _) = Team::new("Loose", None, 3).unwrap();

        assert!(team.promote().is_err());
        assert_eq!(team.level(), None);
    }

    #[test]
    fn from_record_round_trips_fields() {
        let record = TeamRecord {
            id: Uuid::new_v4(),
            name: "Stored".to_string(),
            level: Some(Level::Senior),
            created_at: Utc::now(),
            score: Some(95),
            max_students: 4,
            members: BTreeSet::from([Uuid::new_v4()]),
            technologies: BTreeSet::from(["Docker".to_string()]),
            project_in_progress: Some(true),
            performance_index: Some(92.0),
            last_evaluation: None,
            detail_id: None,
            version: 7,
        };

        let team = Team::from_record(record.clone());

        assert_eq!(team.id(), record.id);
        assert_eq!(team.score(), Some(95));
        assert_eq!(team.member_count(), 1);
        assert_eq!(team.version(), 7);
    }

    #[test]
    fn rename_rejects_blank_name() {
        let mut team = junior_team(3);

        assert!(team.rename(" ").is_err());
        assert_eq!(team.name(), "Alpha");

        let event = team.rename("Beta").unwrap();
        assert_eq!(team.name(), "Beta");
        assert!(matches!(event, TeamEvent::Renamed { .. }));
    }

    #[test]
    fn resize_cannot_drop_below_member_count() {
        let mut team = junior_team(3);
        team.add_member(Uuid::new_v4()).unwrap();
        team.add_member(Uuid::new_v4()).unwrap();

        let result = team.resize(1);
        assert!(result.unwrap_err().contains("below the current member count"));
        assert_eq!(team.max_students(), 3);

        assert!(team.resize(0).is_err());

        let event = team.resize(2).unwrap();
        assert_eq!(
            event,
            TeamEvent::Resized {
                team_id: team.id(),
                previous: 3,
                max_students: 2,
            }
        );
        assert!(!team.can_accept_new_members());
    }

    #[test]
    fn with_detail_links_record() {
        let detail_id = Uuid::new_v4();
        let team = junior_team(3).with_detail(detail_id);

        assert_eq!(team.detail_id(), Some(detail_id));
    }
}
