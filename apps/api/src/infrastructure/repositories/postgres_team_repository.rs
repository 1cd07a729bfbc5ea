use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::domain::repositories::{RepositoryError, RepositoryResult, TeamRepository};
use crate::domain::team::{Level, Team, TeamRecord};

const TEAM_COLUMNS: &str = r#"
    id, name, level, created_at, score, max_students,
    project_in_progress, performance_index, last_evaluation, detail_id, version
"#;

/// PostgreSQL implementation of TeamRepository
///
/// A team spans three tables: `teams`, `team_members` and
/// `team_technologies`. Every save runs in a transaction and is guarded by
/// the `version` column.
pub struct PostgresTeamRepository {
    pool: PgPool,
}

impl PostgresTeamRepository {
    /// Creates a new PostgresTeamRepository
    ///
    /// # Arguments
    /// * `pool` - SQLx connection pool for PostgreSQL
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Attaches members and technologies to team rows
    async fn hydrate(&self, rows: Vec<TeamRow>) -> RepositoryResult<Vec<Team>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();

        let member_rows: Vec<(Uuid, Uuid)> = sqlx::query_as(
            r#"
            SELECT team_id, student_id
            FROM team_members
            WHERE team_id = ANY($1)
            "#,
        )
        .bind(ids.as_slice())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to load team members", e))?;

        let technology_rows: Vec<(Uuid, String)> = sqlx::query_as(
            r#"
            SELECT team_id, technology
            FROM team_technologies
            WHERE team_id = ANY($1)
            "#,
        )
        .bind(ids.as_slice())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to load team technologies", e))?;

        let mut members: HashMap<Uuid, BTreeSet<Uuid>> = HashMap::new();
        for (team_id, student_id) in member_rows {
            members.entry(team_id).or_default().insert(student_id);
        }
        let mut technologies: HashMap<Uuid, BTreeSet<String>> = HashMap::new();
        for (team_id, technology) in technology_rows {
            technologies.entry(team_id).or_default().insert(technology);
        }

        rows.into_iter()
            .map(|row| {
                let id = row.id;
                row.into_team(
                    members.remove(&id).unwrap_or_default(),
                    technologies.remove(&id).unwrap_or_default(),
                )
            })
            .collect()
    }
}

#[derive(sqlx::FromRow)]
struct TeamRow {
    id: Uuid,
    name: String,
    level: Option<Level>,
    created_at: DateTime<Utc>,
    score: Option<i32>,
    max_students: i32,
    project_in_progress: Option<bool>,
    performance_index: Option<f64>,
    last_evaluation: Option<DateTime<Utc>>,
    detail_id: Option<Uuid>,
    version: i64,
}

impl TeamRow {
    fn into_team(
        self,
        members: BTreeSet<Uuid>,
        technologies: BTreeSet<String>,
    ) -> RepositoryResult<Team> {
        let max_students = u32::try_from(self.max_students).map_err(|_| {
            RepositoryError::Corrupt(format!(
                "Team {} has invalid capacity {}",
                self.id, self.max_students
            ))
        })?;

        Ok(Team::from_record(TeamRecord {
            id: self.id,
            name: self.name,
            level: self.level,
            created_at: self.created_at,
            score: self.score,
            max_students,
            members,
            technologies,
            project_in_progress: self.project_in_progress,
            performance_index: self.performance_index,
            last_evaluation: self.last_evaluation,
            detail_id: self.detail_id,
            version: self.version,
        }))
    }
}

fn db_error(context: &str, e: sqlx::Error) -> RepositoryError {
    RepositoryError::Database(format!("{}: {}", context, e))
}

/// Writes one team inside an open transaction
async fn write_team(conn: &mut PgConnection, team: &Team) -> RepositoryResult<Team> {
    let max_students = i32::try_from(team.max_students()).map_err(|_| {
        RepositoryError::Corrupt(format!("Team {} capacity does not fit in storage", team.id()))
    })?;

    let version: Option<i64> = if team.version() == 0 {
        sqlx::query_scalar(
            r#"
            INSERT INTO teams (
                id, name, level, created_at, score, max_students,
                project_in_progress, performance_index, last_evaluation, detail_id, version
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, 1)
            ON CONFLICT (id) DO NOTHING
            RETURNING version
            "#,
        )
        .bind(team.id())
        .bind(team.name())
        .bind(team.level())
        .bind(team.created_at())
        .bind(team.score())
        .bind(max_students)
        .bind(team.project_in_progress())
        .bind(team.performance_index())
        .bind(team.last_evaluation())
        .bind(team.detail_id())
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| db_error("Failed to insert team", e))?
    } else {
        sqlx::query_scalar(
            r#"
            UPDATE teams SET
                name = $2,
                level = $3,
                score = $4,
                max_students = $5,
                project_in_progress = $6,
                performance_index = $7,
                last_evaluation = $8,
                detail_id = $9,
                version = version + 1
            WHERE id = $1 AND version = $10
            RETURNING version
            "#,
        )
        .bind(team.id())
        .bind(team.name())
        .bind(team.level())
        .bind(team.score())
        .bind(max_students)
        .bind(team.project_in_progress())
        .bind(team.performance_index())
        .bind(team.last_evaluation())
        .bind(team.detail_id())
        .bind(team.version())
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| db_error("Failed to update team", e))?
    };

    let Some(version) = version else {
        return Err(RepositoryError::Conflict { id: team.id() });
    };

    sqlx::query("DELETE FROM team_members WHERE team_id = $1")
        .bind(team.id())
        .execute(&mut *conn)
        .await
        .map_err(|e| db_error("Failed to clear team members", e))?;

    let members: Vec<Uuid> = team.members().iter().copied().collect();
    sqlx::query(
        r#"
        INSERT INTO team_members (team_id, student_id)
        SELECT $1, UNNEST($2::uuid[])
        "#,
    )
    .bind(team.id())
    .bind(members.as_slice())
    .execute(&mut *conn)
    .await
    .map_err(|e| db_error("Failed to save team members", e))?;

    sqlx::query("DELETE FROM team_technologies WHERE team_id = $1")
        .bind(team.id())
        .execute(&mut *conn)
        .await
        .map_err(|e| db_error("Failed to clear team technologies", e))?;

    let technologies: Vec<String> = team.technologies().iter().cloned().collect();
    sqlx::query(
        r#"
        INSERT INTO team_technologies (team_id, technology)
        SELECT $1, UNNEST($2::text[])
        "#,
    )
    .bind(team.id())
    .bind(technologies.as_slice())
    .execute(&mut *conn)
    .await
    .map_err(|e| db_error("Failed to save team technologies", e))?;

    let mut saved = team.clone();
    saved.mark_persisted(version);
    Ok(saved)
}

#[async_trait]
impl TeamRepository for PostgresTeamRepository {
    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Team>> {
        let row: Option<TeamRow> =
            sqlx::query_as(&format!("SELECT {} FROM teams WHERE id = $1", TEAM_COLUMNS))
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| db_error("Failed to find team by id", e))?;

        match row {
            Some(row) => Ok(self.hydrate(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn find_all(&self) -> RepositoryResult<Vec<Team>> {
        let rows: Vec<TeamRow> = sqlx::query_as(&format!(
            "SELECT {} FROM teams ORDER BY created_at, id",
            TEAM_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to list teams", e))?;

        self.hydrate(rows).await
    }

    async fn save(&self, team: &Team) -> RepositoryResult<Team> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("Failed to begin transaction", e))?;

        let saved = write_team(&mut tx, team).await?;

        tx.commit()
            .await
            .map_err(|e| db_error("Failed to commit team", e))?;

        Ok(saved)
    }

    async fn save_all(&self, teams: &[Team]) -> RepositoryResult<Vec<Team>> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("Failed to begin transaction", e))?;

        let mut saved = Vec::with_capacity(teams.len());
        for team in teams {
            // An error drops `tx`, which rolls the whole batch back
            saved.push(write_team(&mut tx, team).await?);
        }

        tx.commit()
            .await
            .map_err(|e| db_error("Failed to commit teams", e))?;

        Ok(saved)
    }

    async fn delete(&self, id: Uuid) -> RepositoryResult<bool> {
        let result = sqlx::query("DELETE FROM teams WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to delete team", e))?;

        Ok(result.rows_affected() > 0)
    }
}
