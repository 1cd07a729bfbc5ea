use chrono::{DateTime, Months, Utc};
use uuid::Uuid;

use super::{TeamError, TeamResult, TeamService};

/// Interval before a team's first evaluation
pub const FIRST_EVALUATION_MONTHS: u32 = 1;

/// Months until the next evaluation for a given performance index
///
/// | performance | interval |
/// |-------------|----------|
/// | >= 90       | 6 months |
/// | 70 to < 90  | 3 months |
/// | < 70        | 1 month  |
pub fn months_until_next_evaluation(performance: f64) -> u32 {
    if performance >= 90.0 {
        6
    } else if performance >= 70.0 {
        3
    } else {
        1
    }
}

impl TeamService {
    /// Schedules the next evaluation of a team relative to the current time
    ///
    /// See [`schedule_next_evaluation_at`](Self::schedule_next_evaluation_at).
    pub async fn schedule_next_evaluation(&self, team_id: Uuid) -> TeamResult<DateTime<Utc>> {
        self.schedule_next_evaluation_at(team_id, Utc::now()).await
    }

    /// Schedules the next evaluation of a team relative to `now`
    ///
    /// A team never evaluated before is due one month after `now`. Otherwise
    /// the performance index is recomputed and the interval follows
    /// [`months_until_next_evaluation`]. The refreshed index and
    /// `last_evaluation = now` are persisted in a single save.
    ///
    /// # Errors
    /// * `InvalidArgument` - If the team does not exist
    pub async fn schedule_next_evaluation_at(
        &self,
        team_id: Uuid,
        now: DateTime<Utc>,
    ) -> TeamResult<DateTime<Utc>> {
        let team = self.load_team_for_evaluation(team_id).await?;
        let performance = self.settings.weights.performance_of(&team);

        let months = if team.last_evaluation().is_none() {
            FIRST_EVALUATION_MONTHS
        } else {
            months_until_next_evaluation(performance)
        };
        let next = now.checked_add_months(Months::new(months)).ok_or_else(|| {
            TeamError::InvalidArgument(format!(
                "Evaluation date out of range: {} + {} months",
                now, months
            ))
        })?;

        self.store_performance(team, performance, Some(now)).await?;
        tracing::info!(
            %team_id,
            performance,
            months,
            next_evaluation = %next,
            "Evaluation scheduled"
        );

        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn high_performance_waits_six_months() {
        assert_eq!(months_until_next_evaluation(95.0), 6);
        assert_eq!(months_until_next_evaluation(90.0), 6);
    }

    #[test]
    fn medium_performance_waits_three_months() {
        assert_eq!(months_until_next_evaluation(89.99), 3);
        assert_eq!(months_until_next_evaluation(75.0), 3);
        assert_eq!(months_until_next_evaluation(70.0), 3);
    }

    #[test]
    fn low_performance_waits_one_month() {
        assert_eq!(months_until_next_evaluation(69.9), 1);
        assert_eq!(months_until_next_evaluation(60.0), 1);
        assert_eq!(months_until_next_evaluation(0.0), 1);
    }
}
