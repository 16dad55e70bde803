//! Ceremony agreement lifecycle management.
//!
//! An agreement moves from the officiant's draft through the couple's
//! signatures, payment and the officiant's countersignature, and is finally
//! consumed when a ceremony is submitted against it. The status gates which
//! mutations are legal and which side effects fire. The module follows
//! hexagonal architecture:
//!
//! - Domain types and pure transitions in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
