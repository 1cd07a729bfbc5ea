use uuid::Uuid;

use super::{publish, TeamError, TeamResult, TeamService};
use crate::domain::team::{Level, Team};

/// Fields accepted when creating a team
#[derive(Debug, Clone, Default)]
pub struct NewTeam {
    pub name: String,
    pub level: Option<Level>,
    pub max_students: u32,
    pub technologies: Vec<String>,
    pub project_in_progress: Option<bool>,
}

/// Fields changed by an update; `None` leaves a field as it is
#[derive(Debug, Clone, Default)]
pub struct TeamUpdate {
    pub name: Option<String>,
    pub max_students: Option<u32>,
    /// Replaces the whole technology stack
    pub technologies: Option<Vec<String>>,
    pub project_in_progress: Option<bool>,
    pub detail_id: Option<Uuid>,
}

impl TeamService {
    /// Creates and stores a new team
    ///
    /// # Errors
    /// * `InvalidArgument` - If the name is empty or the capacity is zero
    pub async fn create_team(&self, new: NewTeam) -> TeamResult<Team> {
        let (team, events) =
            Team::new(new.name, new.level, new.max_students).map_err(TeamError::InvalidArgument)?;
        let mut team = team.with_technologies(new.technologies);
        if let Some(in_progress) = new.project_in_progress {
            team = team.with_project_in_progress(in_progress);
        }

        let saved = self.teams.save(&team).await?;
        publish(events);

        Ok(saved)
    }

    pub async fn get_team(&self, team_id: Uuid) -> TeamResult<Team> {
        self.load_team(team_id).await
    }

    pub async fn list_teams(&self) -> TeamResult<Vec<Team>> {
        Ok(self.teams.find_all().await?)
    }

    /// Applies `update` to a stored team
    ///
    /// Either every field is applied and the team saved once, or nothing is
    /// written. Retried from a fresh load on a version conflict.
    ///
    /// # Errors
    /// * `NotFound` - If the team does not exist
    /// * `InvalidArgument` - If the name is blank or the capacity is zero or
    ///   below the current member count
    pub async fn update_team(&self, team_id: Uuid, update: TeamUpdate) -> TeamResult<Team> {
        let update = &update;
        self.retry_on_conflict(move || self.try_update_team(team_id, update))
            .await
    }

    async fn try_update_team(&self, team_id: Uuid, update: &TeamUpdate) -> TeamResult<Team> {
        let mut team = self.load_team(team_id).await?;
        let mut events = Vec::new();

        if let Some(name) = &update.name {
            events.push(team.rename(name.as_str()).map_err(TeamError::InvalidArgument)?);
        }
        if let Some(max_students) = update.max_students {
            events.push(team.resize(max_students).map_err(TeamError::InvalidArgument)?);
        }
        if let Some(technologies) = &update.technologies {
            team = team.with_technologies(technologies.iter().map(String::as_str));
        }
        if let Some(in_progress) = update.project_in_progress {
            team = team.with_project_in_progress(in_progress);
        }
        if let Some(detail_id) = update.detail_id {
            team = team.with_detail(detail_id);
        }

        let saved = self.teams.save(&team).await?;
        publish(events);
        tracing::info!(%team_id, "Team updated");

        Ok(saved)
    }

    /// Deletes a team
    ///
    /// # Errors
    /// * `NotFound` - If the team does not exist
    pub async fn delete_team(&self, team_id: Uuid) -> TeamResult<()> {
        if !self.teams.delete(team_id).await? {
            return Err(TeamError::team_not_found(team_id));
        }

        tracing::info!(%team_id, "Team deleted");
        Ok(())
    }
}
