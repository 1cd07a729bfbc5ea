//! Academia API Library
//!
//! Team lifecycle and scoring engine for an academic program: membership
//! and transfers, performance scoring, technology recommendations,
//! evaluation scheduling and level evolution, exposed over HTTP.

pub mod api;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod services;
