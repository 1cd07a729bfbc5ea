use async_trait::async_trait;
use uuid::Uuid;

use super::errors::RepositoryResult;
use crate::domain::team::Team;

/// Repository trait for Team aggregate
///
/// Saves are guarded by [`Team::version`]: a save only succeeds if the stored
/// version still equals the version the team was loaded with, and returns the
/// team stamped with its new version. A stale write fails with
/// [`RepositoryError::Conflict`](super::RepositoryError::Conflict).
#[async_trait]
pub trait TeamRepository: Send + Sync {
    /// Find a team by its ID
    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Team>>;

    /// Load every team
    async fn find_all(&self) -> RepositoryResult<Vec<Team>>;

    /// Save a team (insert or update)
    async fn save(&self, team: &Team) -> RepositoryResult<Team>;

    /// Save several teams atomically: either every write is committed or none is
    async fn save_all(&self, teams: &[Team]) -> RepositoryResult<Vec<Team>>;

    /// Delete a team by ID, returning whether it existed
    async fn delete(&self, id: Uuid) -> RepositoryResult<bool>;
}
