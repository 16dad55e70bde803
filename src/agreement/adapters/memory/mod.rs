//! In-memory adapters for tests and local deterministic runs.

mod accounts;
mod file_store;
mod outbox;
mod repository;

pub use accounts::InMemoryAccountDirectory;
pub use file_store::InMemorySignatureStore;
pub use outbox::{RecordingEmailSender, RecordingNotificationSender};
pub use repository::InMemoryAgreementRepository;
