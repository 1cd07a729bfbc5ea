use std::collections::BTreeSet;

use uuid::Uuid;

use super::{TeamResult, TeamService};
use crate::domain::team::{Level, Team};

/// Pool for teams that have not been given a level yet
const BASE_POOL: &[&str] = &["Git", "SQL", "HTML/CSS"];
const JUNIOR_POOL: &[&str] = &["Angular", "Git", "Spring Boot", "SQL"];
const SENIOR_POOL: &[&str] = &["Microservices", "Docker", "Kubernetes", "Kafka"];
const EXPERT_POOL: &[&str] = &["Cloud Native", "DevOps", "Terraform", "Service Mesh"];

/// Candidate technologies for a level
pub fn candidate_pool(level: Option<Level>) -> &'static [&'static str] {
    match level {
        None => BASE_POOL,
        Some(Level::Junior) => JUNIOR_POOL,
        Some(Level::Senior) => SENIOR_POOL,
        Some(Level::Expert) => EXPERT_POOL,
    }
}

/// Technologies from the team's level pool it does not use yet
///
/// When every entry of the level pool is already in use the next level's
/// pool is tried, and so on up to Expert.
///
/// A team that already uses every technology from its own pool up to the
/// Expert pool gets an empty set. Nothing outside the pools is suggested.
pub fn recommend_for(team: &Team) -> BTreeSet<String> {
    for level in pool_chain(team.level()) {
        let picks: BTreeSet<String> = candidate_pool(level)
            .iter()
            .filter(|technology| !team.uses_technology(technology))
            .map(|technology| technology.to_string())
            .collect();
        if !picks.is_empty() {
            return picks;
        }
    }

    BTreeSet::new()
}

/// Levels whose pools are tried, in order
fn pool_chain(level: Option<Level>) -> Vec<Option<Level>> {
    let mut chain = Vec::new();
    let mut next = match level {
        None => {
            chain.push(None);
            Some(Level::Junior)
        }
        some => some,
    };
    while let Some(current) = next {
        chain.push(Some(current));
        next = current.next();
    }
    chain
}

impl TeamService {
    /// Suggests technologies matching the team's level that it does not use yet
    ///
    /// # Errors
    /// * `InvalidArgument` - If the team does not exist
    pub async fn recommend_technologies(&self, team_id: Uuid) -> TeamResult<BTreeSet<String>> {
        let team = self.load_team_for_evaluation(team_id).await?;
        Ok(recommend_for(&team))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn team(level: Option<Level>, technologies: &[&str]) -> Team {
        let (team, _) = Team::new("Alpha", level, 3).unwrap();
        team.with_technologies(technologies.iter().copied())
    }

    #[test]
    fn junior_team_gets_junior_pool_minus_known() {
        let picks = recommend_for(&team(Some(Level::Junior), &["Java", "Spring"]));

        assert!(!picks.is_empty());
        assert!(!picks.contains("Java"));
        assert!(!picks.contains("Spring"));
        assert!(picks.contains("Angular") || picks.contains("Git"));
    }

    #[test]
    fn senior_team_gets_senior_pool() {
        let picks = recommend_for(&team(Some(Level::Senior), &["Java"]));

        assert!(picks.contains("Microservices") || picks.contains("Docker"));
    }

    #[test]
    fn expert_team_gets_expert_pool() {
        let picks = recommend_for(&team(Some(Level::Expert), &[]));

        assert!(picks.contains("Cloud Native") || picks.contains("DevOps"));
    }

    #[test]
    fn known_technologies_are_never_recommended() {
        let picks = recommend_for(&team(Some(Level::Senior), &["docker", "Kafka"]));

        assert!(!picks.iter().any(|t| t.eq_ignore_ascii_case("docker")));
        assert!(!picks.contains("Kafka"));
        assert!(picks.contains("Microservices"));
    }

    #[test]
    fn team_without_level_gets_base_pool() {
        let picks = recommend_for(&team(None, &[]));

        let expected: BTreeSet<String> = BASE_POOL.iter().map(|t| t.to_string()).collect();
        assert_eq!(picks, expected);
    }

    #[test]
    fn exhausted_pool_falls_through_to_next_level() {
        let picks = recommend_for(&team(Some(Level::Junior), JUNIOR_POOL));

        let expected: BTreeSet<String> = SENIOR_POOL.iter().map(|t| t.to_string()).collect();
        assert_eq!(picks, expected);
    }

    #[test]
    fn exhausted_base_pool_falls_through_to_junior() {
        let picks = recommend_for(&team(None, BASE_POOL));

        assert_eq!(
            picks,
            BTreeSet::from(["Angular".to_string(), "Spring Boot".to_string()])
        );
    }

    #[test]
    fn pool_chain_walks_up_to_expert() {
        assert_eq!(
            pool_chain(None),
            vec![
                None,
                Some(Level::Junior),
                Some(Level::Senior),
                Some(Level::Expert)
            ]
        );
        assert_eq!(pool_chain(Some(Level::Expert)), vec![Some(Level::Expert)]);
    }

    #[test]
    fn expert_with_everything_gets_nothing() {
        let picks = recommend_for(&team(Some(Level::Expert), EXPERT_POOL));

        assert!(picks.is_empty());
    }
}
