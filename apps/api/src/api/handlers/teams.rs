use std::collections::BTreeMap;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::AppState;
use crate::domain::team::{Level, Team};
use crate::services::{EvolutionReport, NewTeam, TeamUpdate};

/// Request body for creating a team
#[derive(Debug, Deserialize)]
pub struct CreateTeamRequest {
    pub name: String,
    pub level: Option<Level>,
    pub max_students: u32,
    #[serde(default)]
    pub technologies: Vec<String>,
    pub project_in_progress: Option<bool>,
}

/// Request body for updating a team; absent fields are left unchanged
#[derive(Debug, Deserialize)]
pub struct UpdateTeamRequest {
    pub name: Option<String>,
    pub max_students: Option<u32>,
    pub technologies: Option<Vec<String>>,
    pub project_in_progress: Option<bool>,
    pub detail_id: Option<Uuid>,
}

/// Team as returned by the API
#[derive(Debug, Serialize)]
pub struct TeamResponse {
    pub id: Uuid,
    pub name: String,
    pub level: Option<Level>,
    pub created_at: DateTime<Utc>,
    pub score: Option<i32>,
    pub max_students: u32,
    pub members: Vec<Uuid>,
    pub technologies: Vec<String>,
    pub project_in_progress: Option<bool>,
    pub performance_index: Option<f64>,
    pub last_evaluation: Option<DateTime<Utc>>,
    pub detail_id: Option<Uuid>,
}

impl From<&Team> for TeamResponse {
    fn from(team: &Team) -> Self {
        Self {
            id: team.id(),
            name: team.name().to_string(),
            level: team.level(),
            created_at: team.created_at(),
            score: team.score(),
            max_students: team.max_students(),
            members: team.members().iter().copied().collect(),
            technologies: team.technologies().iter().cloned().collect(),
            project_in_progress: team.project_in_progress(),
            performance_index: team.performance_index(),
            last_evaluation: team.last_evaluation(),
            detail_id: team.detail_id(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CapacityResponse {
    pub team_id: Uuid,
    pub can_accept_new_members: bool,
}

#[derive(Debug, Deserialize)]
pub struct MemberRequest {
    pub student_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct MembershipResponse {
    pub team_id: Uuid,
    pub student_id: Uuid,
    pub changed: bool,
}

#[derive(Debug, Deserialize)]
pub struct TransferRequest {
    pub student_id: Uuid,
    pub source_team_id: Uuid,
    pub destination_team_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct TransferResponse {
    pub transferred: bool,
}

#[derive(Debug, Deserialize)]
pub struct UpdateScoreRequest {
    pub score: i32,
}

#[derive(Debug, Serialize)]
pub struct PerformanceResponse {
    pub team_id: Uuid,
    pub performance: f64,
}

#[derive(Debug, Serialize)]
pub struct RecommendationsResponse {
    pub team_id: Uuid,
    pub technologies: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct EvaluationResponse {
    pub team_id: Uuid,
    pub next_evaluation: DateTime<Utc>,
}

/// Create a new team
///
/// POST /api/teams
pub async fn create_team(
    State(state): State<AppState>,
    Json(req): Json<CreateTeamRequest>,
) -> Result<(StatusCode, Json<TeamResponse>), ApiError> {
    let team = state
        .teams
        .create_team(NewTeam {
            name: req.name,
            level: req.level,
            max_students: req.max_students,
            technologies: req.technologies,
            project_in_progress: req.project_in_progress,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(TeamResponse::from(&team))))
}

/// List every team
///
/// GET /api/teams
pub async fn list_teams(
    State(state): State<AppState>,
) -> Result<Json<Vec<TeamResponse>>, ApiError> {
    let teams = state.teams.list_teams().await?;

    Ok(Json(teams.iter().map(TeamResponse::from).collect()))
}

/// Get a team by ID
///
/// GET /api/teams/:id
pub async fn get_team(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TeamResponse>, ApiError> {
    let team = state.teams.get_team(id).await?;

    Ok(Json(TeamResponse::from(&team)))
}

/// Update a team's name, capacity, technologies, project flag or detail link
///
/// PUT /api/teams/:id
pub async fn update_team(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateTeamRequest>,
) -> Result<Json<TeamResponse>, ApiError> {
    let team = state
        .teams
        .update_team(
            id,
            TeamUpdate {
                name: req.name,
                max_students: req.max_students,
                technologies: req.technologies,
                project_in_progress: req.project_in_progress,
                detail_id: req.detail_id,
            },
        )
        .await?;

    Ok(Json(TeamResponse::from(&team)))
}

/// Delete a team
///
/// DELETE /api/teams/:id
pub async fn delete_team(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.teams.delete_team(id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/teams/:id/capacity
pub async fn can_accept_new_members(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CapacityResponse>, ApiError> {
    let can_accept_new_members = state.teams.can_accept_new_members(id).await?;

    Ok(Json(CapacityResponse {
        team_id: id,
        can_accept_new_members,
    }))
}

/// POST /api/teams/:id/members
pub async fn add_member(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<MemberRequest>,
) -> Result<Json<MembershipResponse>, ApiError> {
    let changed = state.teams.add_member(id, req.student_id).await?;

    Ok(Json(MembershipResponse {
        team_id: id,
        student_id: req.student_id,
        changed,
    }))
}

/// DELETE /api/teams/:id/members/:student_id
pub async fn remove_member(
    State(state): State<AppState>,
    Path((id, student_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<MembershipResponse>, ApiError> {
    let changed = state.teams.remove_member(id, student_id).await?;

    Ok(Json(MembershipResponse {
        team_id: id,
        student_id,
        changed,
    }))
}

/// Move a student between teams
///
/// POST /api/transfers
pub async fn transfer_student(
    State(state): State<AppState>,
    Json(req): Json<TransferRequest>,
) -> Result<Json<TransferResponse>, ApiError> {
    let transferred = state
        .teams
        .transfer_student(req.student_id, req.source_team_id, req.destination_team_id)
        .await?;

    Ok(Json(TransferResponse { transferred }))
}

/// PUT /api/teams/:id/score
pub async fn update_score(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateScoreRequest>,
) -> Result<Json<TeamResponse>, ApiError> {
    let team = state.teams.update_score(id, req.score).await?;

    Ok(Json(TeamResponse::from(&team)))
}

/// POST /api/teams/:id/performance
pub async fn evaluate_performance(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PerformanceResponse>, ApiError> {
    let performance = state.teams.evaluate_performance(id).await?;

    Ok(Json(PerformanceResponse {
        team_id: id,
        performance,
    }))
}

/// GET /api/statistics/average-score
pub async fn average_score_by_level(
    State(state): State<AppState>,
) -> Result<Json<BTreeMap<Level, f64>>, ApiError> {
    Ok(Json(state.teams.average_score_by_level().await?))
}

/// GET /api/teams/:id/recommendations
pub async fn recommend_technologies(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RecommendationsResponse>, ApiError> {
    let technologies = state.teams.recommend_technologies(id).await?;

    Ok(Json(RecommendationsResponse {
        team_id: id,
        technologies: technologies.into_iter().collect(),
    }))
}

/// POST /api/teams/:id/evaluation
pub async fn schedule_evaluation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<EvaluationResponse>, ApiError> {
    let next_evaluation = state.teams.schedule_next_evaluation(id).await?;

    Ok(Json(EvaluationResponse {
        team_id: id,
        next_evaluation,
    }))
}

/// Run one promotion pass over every team
///
/// POST /api/evolutions
pub async fn evolve_teams(
    State(state): State<AppState>,
) -> Result<Json<EvolutionReport>, ApiError> {
    Ok(Json(state.teams.evolve_teams().await?))
}
