use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::repositories::{RepositoryError, RepositoryResult, StudentRepository};
use crate::domain::student::{Contract, Specialty, Student};

/// PostgreSQL implementation of StudentRepository
pub struct PostgresStudentRepository {
    pool: PgPool,
}

impl PostgresStudentRepository {
    /// Creates a new PostgresStudentRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct StudentRow {
    id: Uuid,
    first_name: String,
    last_name: String,
}

#[derive(sqlx::FromRow)]
struct ContractRow {
    id: Uuid,
    start_date: NaiveDate,
    end_date: NaiveDate,
    specialty: Specialty,
    archived: bool,
    amount: Decimal,
}

impl From<ContractRow> for Contract {
    fn from(r: ContractRow) -> Self {
        Contract {
            id: r.id,
            start_date: r.start_date,
            end_date: r.end_date,
            specialty: r.specialty,
            archived: r.archived,
            amount: r.amount,
        }
    }
}

#[async_trait]
impl StudentRepository for PostgresStudentRepository {
    async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<Student>> {
        let row: Option<StudentRow> = sqlx::query_as(
            r#"
            SELECT id, first_name, last_name
            FROM students
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(format!("Failed to find student by id: {}", e)))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let contracts: Vec<ContractRow> = sqlx::query_as(
            r#"
            SELECT id, start_date, end_date, specialty, archived, amount
            FROM contracts
            WHERE student_id = $1
            ORDER BY start_date
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(format!("Failed to load contracts: {}", e)))?;

        Ok(Some(Student {
            id: row.id,
            first_name: row.first_name,
            last_name: row.last_name,
            contracts: contracts.into_iter().map(Contract::from).collect(),
        }))
    }

    async fn save(&self, student: &Student) -> RepositoryResult<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepositoryError::Database(format!("Failed to begin transaction: {}", e)))?;

        sqlx::query(
            r#"
            INSERT INTO students (id, first_name, last_name)
            VALUES ($1, $2, $3)
            ON CONFLICT (id) DO UPDATE
            SET first_name = EXCLUDED.first_name, last_name = EXCLUDED.last_name
            "#,
        )
        .bind(student.id)
        .bind(&student.first_name)
        .bind(&student.last_name)
        .execute(&mut *tx)
        .await
        .map_err(|e| RepositoryError::Database(format!("Failed to save student: {}", e)))?;

        sqlx::query("DELETE FROM contracts WHERE student_id = $1")
            .bind(student.id)
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::Database(format!("Failed to clear contracts: {}", e)))?;

        for contract in &student.contracts {
            sqlx::query(
                r#"
                INSERT INTO contracts (
                    id, student_id, start_date, end_date, specialty, archived, amount
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                "#,
            )
            .bind(contract.id)
            .bind(student.id)
            .bind(contract.start_date)
            .bind(contract.end_date)
            .bind(contract.specialty)
            .bind(contract.archived)
            .bind(contract.amount)
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::Database(format!("Failed to save contract: {}", e)))?;
        }

        tx.commit()
            .await
            .map_err(|e| RepositoryError::Database(format!("Failed to commit student: {}", e)))?;

        Ok(())
    }
}
