// Student domain module
// Students are owned by the surrounding CRUD layer; the engine only reads
// them to inspect contract activity.

#![allow(clippy::module_inception)]

pub mod contract;
pub mod student;

pub use contract::{Contract, ContractActivity, Specialty};
pub use student::Student;
