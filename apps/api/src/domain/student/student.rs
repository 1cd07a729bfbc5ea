use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::contract::{Contract, ContractActivity};

/// Student as seen by the team engine
///
/// A student with no contracts and a student whose contract list was never
/// loaded are treated the same way: both have an empty `contracts` vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub contracts: Vec<Contract>,
}

impl Student {
    /// Creates a student without contracts
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            contracts: Vec::new(),
        }
    }

    /// Attaches a contract
    pub fn with_contract(mut self, contract: Contract) -> Self {
        self.contracts.push(contract);
        self
    }

    /// True if at least one contract is active under `activity`
    pub fn has_active_contract(&self, activity: ContractActivity, today: NaiveDate) -> bool {
        self.contracts
            .iter()
            .any(|contract| contract.is_active(activity, today))
    }

    /// Checks the rules a student must satisfy before it is stored
    ///
    /// # Business Rules
    /// - First and last name cannot be empty
    /// - Every contract ends on or after its start date
    pub fn validate(&self) -> Result<(), String> {
        if self.first_name.trim().is_empty() || self.last_name.trim().is_empty() {
            return Err("Student name cannot be empty".to_string());
        }

        if let Some(contract) = self.contracts.iter().find(|c| c.end_date < c.start_date) {
            return Err(format!(
                "Contract {} ends before it starts ({} < {})",
                contract.id, contract.end_date, contract.start_date
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::student::Specialty;
    use rust_decimal::Decimal;

    fn contract(archived: bool) -> Contract {
        Contract {
            id: Uuid::new_v4(),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
            specialty: Specialty::Security,
            archived,
            amount: Decimal::from(500),
        }
    }

    #[test]
    fn student_without_contracts_is_inactive() {
        let student = Student::new("John", "Doe");
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();

        assert!(!student.has_active_contract(ContractActivity::NonArchived, today));
    }

    #[test]
    fn one_live_contract_is_enough() {
        let student = Student::new("Jane", "Roe")
            .with_contract(contract(true))
            .with_contract(contract(false));
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();

        assert!(student.has_active_contract(ContractActivity::NonArchived, today));
    }

    #[test]
    fn only_archived_contracts_is_inactive() {
        let student = Student::new("Jane", "Roe")
            .with_contract(contract(true))
            .with_contract(contract(true));
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();

        assert!(!student.has_active_contract(ContractActivity::NonArchived, today));
    }

    #[test]
    fn validation_rejects_blank_names_and_inverted_contracts() {
        assert!(Student::new("Ada", "Lovelace").validate().is_ok());
        assert!(Student::new(" ", "Lovelace").validate().is_err());

        let mut inverted = contract(false);
        inverted.end_date = NaiveDate::from_ymd_opt(2023, 12, 31).unwrap();
        let student = Student::new("Ada", "Lovelace").with_contract(inverted);

        assert!(student.validate().unwrap_err().contains("ends before it starts"));
    }
}
