// Repository implementations (data access layer)
// Adapters that implement domain repository interfaces

pub mod in_memory;
pub mod postgres_student_repository;
pub mod postgres_team_repository;

pub use in_memory::{InMemoryStudentRepository, InMemoryTeamRepository};
pub use postgres_student_repository::PostgresStudentRepository;
pub use postgres_team_repository::PostgresTeamRepository;
