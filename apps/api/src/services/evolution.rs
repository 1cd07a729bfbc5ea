use chrono::{NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::{publish, TeamError, TeamResult, TeamService};
use crate::domain::team::{Level, Team};

/// Outcome of one evolution pass
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EvolutionReport {
    /// Number of teams looked at
    pub examined: usize,
    pub promoted: Vec<Promotion>,
    /// Teams whose evaluation or save failed; the pass went on without them
    pub failures: Vec<EvolutionFailure>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Promotion {
    pub team_id: Uuid,
    pub from: Level,
    pub to: Level,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvolutionFailure {
    pub team_id: Uuid,
    pub reason: String,
}

impl TeamService {
    /// Promotes every eligible team one level, judging contracts as of today
    pub async fn evolve_teams(&self) -> TeamResult<EvolutionReport> {
        self.evolve_teams_on(Utc::now().date_naive()).await
    }

    /// Promotes every eligible team one level
    ///
    /// A Junior or Senior team moves up when at least one of its members has
    /// an active contract on `today`. Teams left as they are get no write at
    /// all; a promoted team is saved once. A failure on one team is recorded
    /// in the report and the remaining teams are still processed.
    ///
    /// # Errors
    /// Only a failure to list the teams aborts the pass.
    pub async fn evolve_teams_on(&self, today: NaiveDate) -> TeamResult<EvolutionReport> {
        let teams = self.teams.find_all().await?;
        let mut report = EvolutionReport::default();

        for team in teams {
            report.examined += 1;
            let team_id = team.id();

            match self.evolve_team(team, today).await {
                Ok(Some(promotion)) => report.promoted.push(promotion),
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(%team_id, error = %e, "Team evolution failed");
                    report.failures.push(EvolutionFailure {
                        team_id,
                        reason: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            examined = report.examined,
            promoted = report.promoted.len(),
            failed = report.failures.len(),
            "Team evolution finished"
        );

        Ok(report)
    }

    async fn evolve_team(&self, mut team: Team, today: NaiveDate) -> TeamResult<Option<Promotion>> {
        let Some(from) = team.level() else {
            return Ok(None);
        };
        let Some(to) = from.next() else {
            return Ok(None);
        };

        if !self.has_active_member(&team, today).await? {
            tracing::debug!(
                team_id = %team.id(),
                level = %from,
                "No active contract among members"
            );
            return Ok(None);
        }

        let event = team.promote().map_err(TeamError::InvalidArgument)?;
        self.teams.save(&team).await?;
        publish([event]);

        Ok(Some(Promotion {
            team_id: team.id(),
            from,
            to,
        }))
    }

    /// True if any member resolves to a student with an active contract
    async fn has_active_member(&self, team: &Team, today: NaiveDate) -> TeamResult<bool> {
        let activity = self.settings.contract_activity;

        for student_id in team.members() {
            match self.students.find_by_id(*student_id).await? {
                Some(student) if student.has_active_contract(activity, today) => return Ok(true),
                Some(_) => {}
                None => {
                    tracing::debug!(team_id = %team.id(), %student_id, "Member not found, skipped");
                }
            }
        }

        Ok(false)
    }
}
