//! Vowbook: booking workflow backend for wedding officiants.
//!
//! This crate implements the agreement lifecycle a couple and their officiant
//! move through before a ceremony: drafting, signing, payment,
//! countersigning and consumption by a submitted ceremony.
//!
//! # Architecture
//!
//! Vowbook follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (database, filesystem, etc.)
//!
//! # Modules
//!
//! - [`agreement`]: Agreement state machine, storage and side effects
//! - [`config`]: Environment-driven runtime settings

pub mod agreement;
pub mod config;
