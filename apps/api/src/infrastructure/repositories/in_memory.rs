use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::repositories::{
    RepositoryError, RepositoryResult, StudentRepository, TeamRepository,
};
use crate::domain::student::Student;
use crate::domain::team::Team;

/// Process-local TeamRepository
///
/// Used when no database is configured and by the test suites. Applies the
/// same version check as the PostgreSQL adapter; a batch is validated as a
/// whole under one write lock before any team is written.
#[derive(Debug, Default)]
pub struct InMemoryTeamRepository {
    teams: RwLock<HashMap<Uuid, Team>>,
}

impl InMemoryTeamRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn check_version(stored: &HashMap<Uuid, Team>, team: &Team) -> RepositoryResult<()> {
        let current = stored.get(&team.id()).map(Team::version).unwrap_or(0);
        if current != team.version() {
            return Err(RepositoryError::Conflict { id: team.id() });
        }
        Ok(())
    }

    fn stamped(team: &Team) -> Team {
        let mut saved = team.clone();
        saved.mark_persisted(team.version() + 1);
        saved
    }
}

#[async_trait]
impl TeamRepository for InMemoryTeamRepository {
    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Team>> {
        Ok(self.teams.read().await.get(&id).cloned())
    }

    async fn find_all(&self) -> RepositoryResult<Vec<Team>> {
        let mut teams: Vec<Team> = self.teams.read().await.values().cloned().collect();
        teams.sort_by_key(|team| (team.created_at(), team.id()));
        Ok(teams)
    }

    async fn save(&self, team: &Team) -> RepositoryResult<Team> {
        let mut stored = self.teams.write().await;
        Self::check_version(&stored, team)?;

        let saved = Self::stamped(team);
        stored.insert(saved.id(), saved.clone());
        Ok(saved)
    }

    async fn save_all(&self, teams: &[Team]) -> RepositoryResult<Vec<Team>> {
        let mut stored = self.teams.write().await;

        let mut seen = HashSet::new();
        for team in teams {
            if !seen.insert(team.id()) {
                return Err(RepositoryError::Conflict { id: team.id() });
            }
            Self::check_version(&stored, team)?;
        }

        let saved: Vec<Team> = teams.iter().map(Self::stamped).collect();
        for team in &saved {
            stored.insert(team.id(), team.clone());
        }
        Ok(saved)
    }

    async fn delete(&self, id: Uuid) -> RepositoryResult<bool> {
        Ok(self.teams.write().await.remove(&id).is_some())
    }
}

/// Process-local StudentRepository
#[derive(Debug, Default)]
pub struct InMemoryStudentRepository {
    students: RwLock<HashMap<Uuid, Student>>,
}

impl InMemoryStudentRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StudentRepository for InMemoryStudentRepository {
    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Student>> {
        Ok(self.students.read().await.get(&id).cloned())
    }

    async fn save(&self, student: &Student) -> RepositoryResult<()> {
        self.students
            .write()
            .await
            .insert(student.id, student.clone());
        Ok(())
    }
}
