use uuid::Uuid;

use super::value_objects::Level;

/// Domain events that occur within the Team aggregate
///
/// Every mutator on [`Team`](super::Team) returns the event it produced.
/// The engine records them in the log once the change has been persisted.
///
/// # Example
/// ```
/// use academia_api::domain::team::events::TeamEvent;
/// use uuid::Uuid;
///
/// let event = TeamEvent::ScoreUpdated {
///     team_id: Uuid::new_v4(),
///     previous: None,
///     score: 80,
/// };
/// assert!(matches!(event, TeamEvent::ScoreUpdated { score: 80, .. }));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum TeamEvent {
    /// Fired when a team is created
    Created {
        /// ID of the newly created team
        team_id: Uuid,
        /// The team's display name
        name: String,
        /// Capacity the team was created with
        max_students: u32,
    },
    /// Fired when a student joins the team
    MemberJoined { team_id: Uuid, student_id: Uuid },
    /// Fired when a student leaves the team
    MemberLeft { team_id: Uuid, student_id: Uuid },
    /// Fired when the raw score changes
    ScoreUpdated {
        team_id: Uuid,
        previous: Option<i32>,
        score: i32,
    },
    /// Fired when the performance index is recomputed
    PerformanceEvaluated { team_id: Uuid, performance: f64 },
    /// Fired when a team moves up one level
    Promoted {
        team_id: Uuid,
        from: Level,
        to: Level,
    },
    /// Fired when a team's name changes
    Renamed { team_id: Uuid, name: String },
    /// Fired when a team's capacity changes
    Resized {
        team_id: Uuid,
        previous: u32,
        max_students: u32,
    },
}

impl TeamEvent {
    /// Returns the team_id for this event
    pub fn team_id(&self) -> Uuid {
        match self {
            TeamEvent::Created { team_id, .. }
            | TeamEvent::MemberJoined { team_id, .. }
            | TeamEvent::MemberLeft { team_id, .. }
            | TeamEvent::ScoreUpdated { team_id, .. }
            | TeamEvent::PerformanceEvaluated { team_id, .. }
            | TeamEvent::Promoted { team_id, .. }
            | TeamEvent::Renamed { team_id, .. }
            | TeamEvent::Resized { team_id, .. } => *team_id,
        }
    }

    /// Short machine-friendly name used as a log field
    pub fn kind(&self) -> &'static str {
        match self {
            TeamEvent::Created { .. } => "created",
            TeamEvent::MemberJoined { .. } => "member_joined",
            TeamEvent::MemberLeft { .. } => "member_left",
            TeamEvent::ScoreUpdated { .. } => "score_updated",
            TeamEvent::PerformanceEvaluated { .. } => "performance_evaluated",
            TeamEvent::Promoted { .. } => "promoted",
            TeamEvent::Renamed { .. } => "renamed",
            TeamEvent::Resized { .. } => "resized",
        }
    }
}
