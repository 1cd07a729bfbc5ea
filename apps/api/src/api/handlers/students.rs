use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::AppState;
use crate::domain::student::{Contract, Specialty, Student};

/// Request body for registering a student
#[derive(Debug, Deserialize)]
pub struct CreateStudentRequest {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub contracts: Vec<ContractRequest>,
}

#[derive(Debug, Deserialize)]
pub struct ContractRequest {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub specialty: Specialty,
    #[serde(default)]
    pub archived: bool,
    pub amount: Decimal,
}

impl From<ContractRequest> for Contract {
    fn from(req: ContractRequest) -> Self {
        Contract {
            id: Uuid::new_v4(),
            start_date: req.start_date,
            end_date: req.end_date,
            specialty: req.specialty,
            archived: req.archived,
            amount: req.amount,
        }
    }
}

/// Register a student with its contracts
///
/// POST /api/students
pub async fn create_student(
    State(state): State<AppState>,
    Json(req): Json<CreateStudentRequest>,
) -> Result<(StatusCode, Json<Student>), ApiError> {
    let student = req
        .contracts
        .into_iter()
        .fold(Student::new(req.first_name, req.last_name), |student, contract| {
            student.with_contract(contract.into())
        });

    let student = state.teams.register_student(student).await?;

    Ok((StatusCode::CREATED, Json(student)))
}

/// GET /api/students/:id
pub async fn get_student(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Student>, ApiError> {
    Ok(Json(state.teams.get_student(id).await?))
}
