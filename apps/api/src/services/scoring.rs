use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{publish, TeamResult, TeamService};
use crate::domain::team::{Level, Team};

/// Weights of the performance formula
///
/// ```text
/// performance = score
///             + level_bonus(level)
///             + technology_count * technology_weight
///             + (project_in_progress ? project_bonus : 0)
/// ```
///
/// Missing fields contribute nothing, so a team with no score, level,
/// technologies or project flag evaluates to `0.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub junior_bonus: f64,
    pub senior_bonus: f64,
    pub expert_bonus: f64,
    pub technology_weight: f64,
    pub project_bonus: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            junior_bonus: 5.0,
            senior_bonus: 10.0,
            expert_bonus: 15.0,
            technology_weight: 2.0,
            project_bonus: 5.0,
        }
    }
}

impl ScoringWeights {
    /// Checks that the weights keep the formula monotonic
    ///
    /// # Validation Rules
    /// - Every weight is finite
    /// - `0 <= junior_bonus < senior_bonus < expert_bonus`
    /// - `technology_weight > 0`
    /// - `project_bonus >= 0`
    pub fn validate(&self) -> Result<(), String> {
        let all = [
            self.junior_bonus,
            self.senior_bonus,
            self.expert_bonus,
            self.technology_weight,
            self.project_bonus,
        ];
        if all.iter().any(|w| !w.is_finite()) {
            return Err("Scoring weights must be finite".to_string());
        }

        if !(0.0 <= self.junior_bonus
            && self.junior_bonus < self.senior_bonus
            && self.senior_bonus < self.expert_bonus)
        {
            return Err(format!(
                "Level bonuses must satisfy 0 <= junior < senior < expert (got {}, {}, {})",
                self.junior_bonus, self.senior_bonus, self.expert_bonus
            ));
        }

        if self.technology_weight <= 0.0 {
            return Err("Technology weight must be positive".to_string());
        }

        if self.project_bonus < 0.0 {
            return Err("Project bonus cannot be negative".to_string());
        }

        Ok(())
    }

    pub fn level_bonus(&self, level: Option<Level>) -> f64 {
        match level {
            Some(Level::Junior) => self.junior_bonus,
            Some(Level::Senior) => self.senior_bonus,
            Some(Level::Expert) => self.expert_bonus,
            None => 0.0,
        }
    }

    /// Computes the performance index of a team
    pub fn performance_of(&self, team: &Team) -> f64 {
        let score = team.score().map(f64::from).unwrap_or(0.0);
        let technologies = team.technologies().len() as f64 * self.technology_weight;
        let project = if team.project_in_progress() == Some(true) {
            self.project_bonus
        } else {
            0.0
        };

        score + self.level_bonus(team.level()) + technologies + project
    }
}

/// Mean score per level
///
/// Teams without a score are left out of both the sum and the count; teams
/// without a level are not grouped. Levels with no scored team are absent.
pub fn average_score_by_level<'a>(
    teams: impl IntoIterator<Item = &'a Team>,
) -> BTreeMap<Level, f64> {
    let totals = teams
        .into_iter()
        .fold(BTreeMap::<Level, (i64, u32)>::new(), |mut acc, team| {
            if let (Some(level), Some(score)) = (team.level(), team.score()) {
                let entry = acc.entry(level).or_insert((0, 0));
                entry.0 += i64::from(score);
                entry.1 += 1;
            }
            acc
        });

    totals
        .into_iter()
        .map(|(level, (sum, count))| (level, sum as f64 / f64::from(count)))
        .collect()
}

impl TeamService {
    /// Mean raw score of every level that has at least one scored team
    pub async fn average_score_by_level(&self) -> TeamResult<BTreeMap<Level, f64>> {
        let teams = self.teams.find_all().await?;
        Ok(average_score_by_level(&teams))
    }

    /// Recomputes and stores a team's performance index
    ///
    /// The team is saved exactly once.
    ///
    /// # Errors
    /// * `InvalidArgument` - If the team does not exist
    pub async fn evaluate_performance(&self, team_id: Uuid) -> TeamResult<f64> {
        let team = self.load_team_for_evaluation(team_id).await?;
        let performance = self.settings.weights.performance_of(&team);

        self.store_performance(team, performance, None).await?;

        Ok(performance)
    }

    /// Writes a computed performance index, optionally stamping the evaluation
    /// time in the same save
    pub(super) async fn store_performance(
        &self,
        mut team: Team,
        performance: f64,
        evaluated_at: Option<DateTime<Utc>>,
    ) -> TeamResult<Team> {
        let event = match evaluated_at {
            Some(at) => team.record_evaluation(performance, at),
            None => team.record_performance(performance),
        };
        let saved = self.teams.save(&team).await?;
        publish([event]);

        Ok(saved)
    }
}
