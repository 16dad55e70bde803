//! `PostgreSQL` persistence for agreements.

mod models;
mod repository;
mod schema;

pub use repository::{AgreementPgPool, PostgresAgreementRepository};
