use async_trait::async_trait;
use uuid::Uuid;

use super::errors::RepositoryResult;
use crate::domain::student::Student;

/// Access to students and their contracts
#[async_trait]
pub trait StudentRepository: Send + Sync {
    /// Find a student by ID, contracts included
    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Student>>;

    /// Save a student (insert or update), replacing its contracts
    async fn save(&self, student: &Student) -> RepositoryResult<()>;
}
