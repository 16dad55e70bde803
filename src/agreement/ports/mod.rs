//! Port contracts for agreement lifecycle management.
//!
//! Ports define infrastructure-agnostic interfaces used by agreement services.

pub mod accounts;
pub mod file_store;
pub mod notification;
pub mod repository;

pub use accounts::{
    AccountContact, AccountDirectory, AccountDirectoryError, AccountDirectoryResult,
};
pub use file_store::{SignatureFileStore, SignatureFileStoreError, SignatureFileStoreResult};
pub use notification::{
    EmailError, EmailMessage, EmailResult, EmailSender, NotificationError, NotificationResult,
    NotificationSender,
};
pub use repository::{
    AgreementFilter, AgreementRepository, AgreementRepositoryError, AgreementRepositoryResult,
    AgreementSort,
};
