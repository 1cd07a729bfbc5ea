use uuid::Uuid;

use super::{TeamError, TeamResult, TeamService};
use crate::domain::student::Student;

impl TeamService {
    /// Validates and stores a student together with its contracts
    ///
    /// # Errors
    /// * `InvalidArgument` - If a name is blank or a contract ends before it starts
    pub async fn register_student(&self, student: Student) -> TeamResult<Student> {
        student.validate().map_err(TeamError::InvalidArgument)?;
        self.students.save(&student).await?;

        tracing::info!(
            student_id = %student.id,
            contracts = student.contracts.len(),
            "Student registered"
        );

        Ok(student)
    }

    /// # Errors
    /// * `NotFound` - If the student does not exist
    pub async fn get_student(&self, student_id: Uuid) -> TeamResult<Student> {
        self.students
            .find_by_id(student_id)
            .await?
            .ok_or_else(|| TeamError::student_not_found(student_id))
    }
}
