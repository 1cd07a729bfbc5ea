use uuid::Uuid;

use super::{publish, TeamError, TeamResult, TeamService};
use crate::domain::team::Team;

impl TeamService {
    /// Whether the team has room for one more student
    ///
    /// # Errors
    /// * `NotFound` - If the team does not exist
    pub async fn can_accept_new_members(&self, team_id: Uuid) -> TeamResult<bool> {
        let team = self.load_team(team_id).await?;
        Ok(team.can_accept_new_members())
    }

    /// Adds a student to a team
    ///
    /// Returns `Ok(false)` without writing anything if the team is full or
    /// the student is already a member.
    ///
    /// # Errors
    /// * `NotFound` - If the team or the student does not exist
    pub async fn add_member(&self, team_id: Uuid, student_id: Uuid) -> TeamResult<bool> {
        self.retry_on_conflict(move || self.try_add_member(team_id, student_id))
            .await
    }

    async fn try_add_member(&self, team_id: Uuid, student_id: Uuid) -> TeamResult<bool> {
        let mut team = self.load_team(team_id).await?;
        if self.students.find_by_id(student_id).await?.is_none() {
            return Err(TeamError::student_not_found(student_id));
        }

        if team.has_member(student_id) || !team.can_accept_new_members() {
            tracing::debug!(%team_id, %student_id, "Member not added");
            return Ok(false);
        }

        let event = team.add_member(student_id).map_err(TeamError::InvalidArgument)?;
        self.teams.save(&team).await?;
        publish([event]);

        Ok(true)
    }

    /// Removes a student from a team
    ///
    /// Returns `Ok(false)` if the student was not a member.
    ///
    /// # Errors
    /// * `NotFound` - If the team does not exist
    pub async fn remove_member(&self, team_id: Uuid, student_id: Uuid) -> TeamResult<bool> {
        self.retry_on_conflict(move || self.try_remove_member(team_id, student_id))
            .await
    }

    async fn try_remove_member(&self, team_id: Uuid, student_id: Uuid) -> TeamResult<bool> {
        let mut team = self.load_team(team_id).await?;
        if !team.has_member(student_id) {
            return Ok(false);
        }

        let event = team.remove_member(student_id).map_err(TeamError::InvalidArgument)?;
        self.teams.save(&team).await?;
        publish([event]);

        Ok(true)
    }

    /// Moves a student from one team to another
    ///
    /// Both teams are written in a single atomic batch. Nothing is written
    /// and `Ok(false)` is returned when:
    /// - the source team, destination team or student does not exist
    /// - source and destination are the same team
    /// - the destination is full
    /// - the student is not a member of the source team
    ///
    /// The capacity check is repeated on every attempt; a concurrent change
    /// to either team invalidates the batch and the transfer starts over from
    /// freshly loaded teams.
    pub async fn transfer_student(
        &self,
        student_id: Uuid,
        source_id: Uuid,
        destination_id: Uuid,
    ) -> TeamResult<bool> {
        self.retry_on_conflict(move || self.try_transfer(student_id, source_id, destination_id))
            .await
    }

    async fn try_transfer(
        &self,
        student_id: Uuid,
        source_id: Uuid,
        destination_id: Uuid,
    ) -> TeamResult<bool> {
        if source_id == destination_id {
            tracing::debug!(
                %student_id,
                team_id = %source_id,
                "Transfer to the same team rejected"
            );
            return Ok(false);
        }

        let Some(mut source) = self.teams.find_by_id(source_id).await? else {
            tracing::debug!(%source_id, "Transfer rejected: unknown source team");
            return Ok(false);
        };
        let Some(mut destination) = self.teams.find_by_id(destination_id).await? else {
            tracing::debug!(%destination_id, "Transfer rejected: unknown destination team");
            return Ok(false);
        };
        if self.students.find_by_id(student_id).await?.is_none() {
            tracing::debug!(%student_id, "Transfer rejected: unknown student");
            return Ok(false);
        }

        if !destination.can_accept_new_members() {
            tracing::debug!(%destination_id, "Transfer rejected: destination is full");
            return Ok(false);
        }
        if !source.has_member(student_id) {
            tracing::debug!(%student_id, %source_id, "Transfer rejected: not a member of source");
            return Ok(false);
        }

        let left = source
            .remove_member(student_id)
            .map_err(TeamError::InvalidArgument)?;
        let joined = destination
            .add_member(student_id)
            .map_err(TeamError::InvalidArgument)?;

        self.teams.save_all(&[source, destination]).await?;
        publish([left, joined]);

        tracing::info!(%student_id, %source_id, %destination_id, "Student transferred");
        Ok(true)
    }

    /// Replaces a team's raw score
    ///
    /// # Errors
    /// * `InvalidArgument` - If `score` is negative (checked before any load)
    /// * `NotFound` - If the team does not exist
    pub async fn update_score(&self, team_id: Uuid, score: i32) -> TeamResult<Team> {
        if score < 0 {
            return Err(TeamError::InvalidArgument(format!(
                "Score cannot be negative: {}",
                score
            )));
        }

        let mut team = self.load_team(team_id).await?;
        let event = team.update_score(score).map_err(TeamError::InvalidArgument)?;
        let saved = self.teams.save(&team).await?;
        publish([event]);

        Ok(saved)
    }
}
