//! Team lifecycle and scoring engine
//!
//! [`TeamService`] is stateless between calls: every operation loads what it
//! needs from the stores, applies the rules of the Team aggregate and writes
//! the result back. Operations are grouped by concern:
//!
//! - [`membership`]: capacity checks, add/remove, cross-team transfer, raw score
//! - [`scoring`]: level averages and the performance index
//! - [`recommendation`]: technology-gap suggestions
//! - [`evaluation`]: next evaluation date
//! - [`evolution`]: batch level promotion
//! - [`registry`]: create/get/list/update/delete used by the HTTP layer
//! - [`students`]: student registration, so members can be resolved

pub mod errors;
pub mod evaluation;
pub mod evolution;
pub mod membership;
pub mod recommendation;
pub mod registry;
pub mod scoring;
pub mod students;

use std::future::Future;
use std::sync::Arc;

use uuid::Uuid;

use crate::domain::repositories::{RepositoryError, StudentRepository, TeamRepository};
use crate::domain::student::ContractActivity;
use crate::domain::team::{Team, TeamEvent};

pub use errors::{TeamError, TeamResult};
pub use evolution::{EvolutionFailure, EvolutionReport, Promotion};
pub use registry::{NewTeam, TeamUpdate};
pub use scoring::ScoringWeights;

/// Tunables of the engine
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSettings {
    pub weights: ScoringWeights,
    pub contract_activity: ContractActivity,
    /// Extra attempts after a version conflict before giving up
    pub transfer_retries: u32,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            weights: ScoringWeights::default(),
            contract_activity: ContractActivity::default(),
            transfer_retries: 3,
        }
    }
}

/// Entry point for every team operation
pub struct TeamService {
    teams: Arc<dyn TeamRepository>,
    students: Arc<dyn StudentRepository>,
    settings: EngineSettings,
}

impl TeamService {
    pub fn new(
        teams: Arc<dyn TeamRepository>,
        students: Arc<dyn StudentRepository>,
        settings: EngineSettings,
    ) -> Self {
        Self {
            teams,
            students,
            settings,
        }
    }

    /// Loads a team, reporting a missing one as `NotFound`
    async fn load_team(&self, team_id: Uuid) -> TeamResult<Team> {
        self.teams
            .find_by_id(team_id)
            .await?
            .ok_or_else(|| TeamError::team_not_found(team_id))
    }

    /// Loads a team an evaluation formula needs; a missing one is an invalid argument
    async fn load_team_for_evaluation(&self, team_id: Uuid) -> TeamResult<Team> {
        self.teams
            .find_by_id(team_id)
            .await?
            .ok_or_else(|| TeamError::InvalidArgument(format!("Team not found: {}", team_id)))
    }

    /// Runs `op` again from scratch while it fails with a version conflict
    async fn retry_on_conflict<T, F, Fut>(&self, mut op: F) -> TeamResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = TeamResult<T>>,
    {
        let mut attempt = 0;
        loop {
            match op().await {
                Err(TeamError::Repository(RepositoryError::Conflict { id }))
                    if attempt < self.settings.transfer_retries =>
                {
                    attempt += 1;
                    tracing::debug!(team_id = %id, attempt, "Version conflict, retrying");
                }
                result => return result,
            }
        }
    }
}

/// Records committed domain events in the log
fn publish(events: impl IntoIterator<Item = TeamEvent>) {
    for event in events {
        tracing::info!(
            team_id = %event.team_id(),
            kind = event.kind(),
            ?event,
            "Team event"
        );
    }
}
