use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Field a contract is signed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "contract_specialty", rename_all = "lowercase")]
pub enum Specialty {
    Ai,
    Networks,
    Cloud,
    Security,
}

/// Rule deciding whether a contract counts as active
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractActivity {
    /// Any contract that is not archived
    #[default]
    NonArchived,
    /// Not archived and `today` falls within the contract's date range
    NonArchivedInRange,
}

/// A time-boxed engagement attached to a student
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contract {
    pub id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub specialty: Specialty,
    pub archived: bool,
    pub amount: Decimal,
}

impl Contract {
    /// Whether the contract counts as active under `activity` on `today`
    ///
    /// # Example
    /// ```
    /// use academia_api::domain::student::{Contract, ContractActivity, Specialty};
    /// use chrono::NaiveDate;
    /// use rust_decimal::Decimal;
    /// use uuid::Uuid;
    ///
    /// let contract = Contract {
    ///     id: Uuid::new_v4(),
    ///     start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
    ///     end_date: NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
    ///     specialty: Specialty::Cloud,
    ///     archived: false,
    ///     amount: Decimal::from(1200),
    /// };
    /// let later = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
    ///
    /// assert!(contract.is_active(ContractActivity::NonArchived, later));
    /// assert!(!contract.is_active(ContractActivity::NonArchivedInRange, later));
    /// ```
    pub fn is_active(&self, activity: ContractActivity, today: NaiveDate) -> bool {
        if self.archived {
            return false;
        }

        match activity {
            ContractActivity::NonArchived => true,
            ContractActivity::NonArchivedInRange => {
                self.start_date <= today && today <= self.end_date
            }
        }
    }
}
