//! Shared world state for agreement lifecycle BDD scenarios.

use std::sync::Arc;

use eyre::WrapErr;
use mockable::DefaultClock;
use rstest::fixture;
use vowbook::agreement::{
    adapters::memory::{
        InMemoryAccountDirectory, InMemoryAgreementRepository, InMemorySignatureStore,
        RecordingEmailSender, RecordingNotificationSender,
    },
    domain::{Agreement, CeremonyDetailsPatch, SignatureUpload},
    services::{AgreementEffectDispatcher, AgreementLifecycleError, AgreementLifecycleService},
};
use vowbook::config::LifecycleConfig;

/// Service type used by the BDD world.
pub type TestAgreementService =
    AgreementLifecycleService<InMemoryAgreementRepository, InMemorySignatureStore, DefaultClock>;

/// Scenario world for agreement lifecycle behaviour tests.
pub struct AgreementWorld {
    pub service: TestAgreementService,
    pub notifications: Arc<RecordingNotificationSender>,
    pub pending_parties: Option<(String, String)>,
    pub pending_details: CeremonyDetailsPatch,
    pub agreement: Option<Agreement>,
    pub last_result: Option<Result<Agreement, AgreementLifecycleError>>,
}

impl AgreementWorld {
    /// Creates a world backed by in-memory adapters.
    #[must_use]
    pub fn new() -> Self {
        let config = LifecycleConfig::default();
        let notifications = Arc::new(RecordingNotificationSender::new());
        let dispatcher = AgreementEffectDispatcher::new(
            notifications.clone(),
            Arc::new(RecordingEmailSender::new()),
            Arc::new(InMemoryAccountDirectory::new()),
            config.mail_from,
        );
        let service = AgreementLifecycleService::new(
            Arc::new(InMemoryAgreementRepository::new()),
            Arc::new(InMemorySignatureStore::new(config.public_base_url)),
            dispatcher,
            Arc::new(DefaultClock),
        )
        .with_payment_policy(config.payment_policy);

        Self {
            service,
            notifications,
            pending_parties: None,
            pending_details: CeremonyDetailsPatch::new(),
            agreement: None,
            last_result: None,
        }
    }

    /// Returns the agreement created by an earlier step.
    ///
    /// # Errors
    ///
    /// Returns an error when no agreement has been created yet.
    pub fn agreement(&self) -> Result<&Agreement, eyre::Report> {
        self.agreement
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing agreement in scenario world"))
    }

    /// Records an operation outcome, keeping the agreement current on success.
    pub fn record(&mut self, result: Result<Agreement, AgreementLifecycleError>) {
        if let Ok(ref updated) = result {
            self.agreement = Some(updated.clone());
        }
        self.last_result = Some(result);
    }
}

impl Default for AgreementWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> AgreementWorld {
    AgreementWorld::default()
}

/// Builds a small PNG-named signature upload.
///
/// # Errors
///
/// Returns an error when the upload is rejected.
pub fn signature(file_name: &str) -> Result<SignatureUpload, eyre::Report> {
    SignatureUpload::new(file_name, vec![0x89, 0x50, 0x4E, 0x47])
        .wrap_err_with(|| format!("build signature upload {file_name}"))
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
