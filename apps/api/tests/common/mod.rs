//! Shared fixtures for the integration suites

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use academia_api::domain::repositories::{
    RepositoryError, RepositoryResult, StudentRepository, TeamRepository,
};
use academia_api::domain::student::{Contract, Specialty, Student};
use academia_api::domain::team::{Level, Team};
use academia_api::infrastructure::repositories::{
    InMemoryStudentRepository, InMemoryTeamRepository,
};
use academia_api::services::{EngineSettings, TeamService};
use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// A contract running through 2024
pub fn contract(archived: bool) -> Contract {
    Contract {
        id: Uuid::new_v4(),
        start_date: date(2024, 1, 1),
        end_date: date(2024, 12, 31),
        specialty: Specialty::Cloud,
        archived,
        amount: Decimal::from(1500),
    }
}

pub fn student_with_active_contract() -> Student {
    Student::new("Ada", "Lovelace").with_contract(contract(false))
}

pub fn student_with_archived_contract() -> Student {
    Student::new("Alan", "Turing").with_contract(contract(true))
}

pub fn new_team(level: Option<Level>, max_students: u32) -> Team {
    let (team, _) = Team::new("Team", level, max_students).unwrap();
    team
}

/// Stores `team`, returning the persisted copy
pub async fn store(repo: &dyn TeamRepository, team: Team) -> Team {
    repo.save(&team).await.unwrap()
}

/// Stores a team after adding `members`
pub async fn store_with_members(
    repo: &dyn TeamRepository,
    level: Option<Level>,
    max_students: u32,
    members: &[Uuid],
) -> Team {
    let mut team = new_team(level, max_students);
    for member in members {
        team.add_member(*member).unwrap();
    }
    store(repo, team).await
}

/// Stores a team whose performance is exactly `score` under default weights
pub async fn store_scored(repo: &dyn TeamRepository, score: i32) -> Team {
    let mut team = new_team(None, 5);
    team.update_score(score).unwrap();
    store(repo, team).await
}

pub fn service(
    teams: Arc<dyn TeamRepository>,
    students: Arc<InMemoryStudentRepository>,
) -> TeamService {
    service_with(teams, students, EngineSettings::default())
}

pub fn service_with(
    teams: Arc<dyn TeamRepository>,
    students: Arc<InMemoryStudentRepository>,
    settings: EngineSettings,
) -> TeamService {
    TeamService::new(teams, students as Arc<dyn StudentRepository>, settings)
}

/// In-memory stores plus a service over them
pub struct Fixture {
    pub teams: Arc<CountingTeamRepository>,
    pub students: Arc<InMemoryStudentRepository>,
    pub service: TeamService,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_settings(EngineSettings::default())
    }

    pub fn with_settings(settings: EngineSettings) -> Self {
        let teams = Arc::new(CountingTeamRepository::new(InMemoryTeamRepository::new()));
        let students = Arc::new(InMemoryStudentRepository::new());
        let service = service_with(teams.clone(), students.clone(), settings);

        Self {
            teams,
            students,
            service,
        }
    }

    pub async fn student(&self, student: Student) -> Uuid {
        let id = student.id;
        self.students.save(&student).await.unwrap();
        id
    }

    pub async fn team(&self, id: Uuid) -> Team {
        self.teams.find_by_id(id).await.unwrap().unwrap()
    }
}

/// Counts every write reaching the wrapped repository
pub struct CountingTeamRepository {
    inner: InMemoryTeamRepository,
    writes: AtomicUsize,
}

impl CountingTeamRepository {
    pub fn new(inner: InMemoryTeamRepository) -> Self {
        Self {
            inner,
            writes: AtomicUsize::new(0),
        }
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn reset(&self) {
        self.writes.store(0, Ordering::SeqCst);
    }
}

#[async_trait]
impl TeamRepository for CountingTeamRepository {
    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Team>> {
        self.inner.find_by_id(id).await
    }

    async fn find_all(&self) -> RepositoryResult<Vec<Team>> {
        self.inner.find_all().await
    }

    async fn save(&self, team: &Team) -> RepositoryResult<Team> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.save(team).await
    }

    async fn save_all(&self, teams: &[Team]) -> RepositoryResult<Vec<Team>> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.save_all(teams).await
    }

    async fn delete(&self, id: Uuid) -> RepositoryResult<bool> {
        self.inner.delete(id).await
    }
}

/// Rejects every write touching one team
pub struct FailingTeamRepository {
    pub inner: InMemoryTeamRepository,
    pub failing_id: Uuid,
}

impl FailingTeamRepository {
    fn check(&self, team: &Team) -> RepositoryResult<()> {
        if team.id() == self.failing_id {
            return Err(RepositoryError::Database("connection reset".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl TeamRepository for FailingTeamRepository {
    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Team>> {
        self.inner.find_by_id(id).await
    }

    async fn find_all(&self) -> RepositoryResult<Vec<Team>> {
        self.inner.find_all().await
    }

    async fn save(&self, team: &Team) -> RepositoryResult<Team> {
        self.check(team)?;
        self.inner.save(team).await
    }

    async fn save_all(&self, teams: &[Team]) -> RepositoryResult<Vec<Team>> {
        for team in teams {
            self.check(team)?;
        }
        self.inner.save_all(teams).await
    }

    async fn delete(&self, id: Uuid) -> RepositoryResult<bool> {
        self.inner.delete(id).await
    }
}

/// Reports a version conflict on the first `conflicts` writes
pub struct ConflictingTeamRepository {
    pub inner: InMemoryTeamRepository,
    pub conflicts: AtomicUsize,
}

impl ConflictingTeamRepository {
    pub fn new(inner: InMemoryTeamRepository, conflicts: usize) -> Self {
        Self {
            inner,
            conflicts: AtomicUsize::new(conflicts),
        }
    }

    fn take_conflict(&self, id: Uuid) -> RepositoryResult<()> {
        let remaining = self.conflicts.load(Ordering::SeqCst);
        if remaining > 0 {
            self.conflicts.store(remaining - 1, Ordering::SeqCst);
            return Err(RepositoryError::Conflict { id });
        }
        Ok(())
    }
}

#[async_trait]
impl TeamRepository for ConflictingTeamRepository {
    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Team>> {
        self.inner.find_by_id(id).await
    }

    async fn find_all(&self) -> RepositoryResult<Vec<Team>> {
        self.inner.find_all().await
    }

    async fn save(&self, team: &Team) -> RepositoryResult<Team> {
        self.take_conflict(team.id())?;
        self.inner.save(team).await
    }

    async fn save_all(&self, teams: &[Team]) -> RepositoryResult<Vec<Team>> {
        if let Some(first) = teams.first() {
            self.take_conflict(first.id())?;
        }
        self.inner.save_all(teams).await
    }

    async fn delete(&self, id: Uuid) -> RepositoryResult<bool> {
        self.inner.delete(id).await
    }
}
