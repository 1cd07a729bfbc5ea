// API layer module (adapters for controllers)
// Follows Hexagonal Architecture - API is an adapter

pub mod errors;
pub mod handlers;

use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::services::TeamService;
use handlers::{health, students, teams};

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub teams: Arc<TeamService>,
}

impl AppState {
    pub fn new(teams: TeamService) -> Self {
        Self {
            teams: Arc::new(teams),
        }
    }
}

/// Builds the application routes
pub fn router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Team registry
        .route("/api/teams", post(teams::create_team).get(teams::list_teams))
        .route(
            "/api/teams/:id",
            get(teams::get_team)
                .put(teams::update_team)
                .delete(teams::delete_team),
        )
        // Students
        .route("/api/students", post(students::create_student))
        .route("/api/students/:id", get(students::get_student))
        // Membership
        .route("/api/teams/:id/capacity", get(teams::can_accept_new_members))
        .route("/api/teams/:id/members", post(teams::add_member))
        .route(
            "/api/teams/:id/members/:student_id",
            axum::routing::delete(teams::remove_member),
        )
        .route("/api/transfers", post(teams::transfer_student))
        // Scoring
        .route("/api/teams/:id/score", put(teams::update_score))
        .route("/api/teams/:id/performance", post(teams::evaluate_performance))
        .route(
            "/api/statistics/average-score",
            get(teams::average_score_by_level),
        )
        // Recommendation, evaluation, evolution
        .route(
            "/api/teams/:id/recommendations",
            get(teams::recommend_technologies),
        )
        .route("/api/teams/:id/evaluation", post(teams::schedule_evaluation))
        .route("/api/evolutions", post(teams::evolve_teams))
        .with_state(state)
}
