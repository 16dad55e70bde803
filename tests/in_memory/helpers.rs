//! Shared test helpers for in-memory agreement integration tests.

use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use vowbook::agreement::{
    adapters::memory::{
        InMemoryAccountDirectory, InMemoryAgreementRepository, InMemorySignatureStore,
        RecordingEmailSender, RecordingNotificationSender,
    },
    domain::{AccountId, Agreement, Amount, CeremonyDetailsPatch, SignatureUpload},
    ports::AccountContact,
    services::{AgreementEffectDispatcher, AgreementLifecycleService, CreateAgreementRequest},
};
use vowbook::config::LifecycleConfig;

/// Couple account used across the in-memory suites.
pub const COUPLE: &str = "couple-ada-grace";

/// Officiant account used across the in-memory suites.
pub const OFFICIANT: &str = "officiant-lovelace";

/// Service type wired to in-memory adapters.
pub type TestService =
    AgreementLifecycleService<InMemoryAgreementRepository, InMemorySignatureStore, DefaultClock>;

/// Lifecycle service together with the recorders behind it.
pub struct Fixture {
    pub service: TestService,
    pub files: Arc<InMemorySignatureStore>,
    pub notifications: Arc<RecordingNotificationSender>,
    pub email: Arc<RecordingEmailSender>,
    pub accounts: Arc<InMemoryAccountDirectory>,
}

/// Provides a service over fresh in-memory adapters, with a contact on file
/// for the couple.
///
/// # Errors
///
/// Returns an error if the couple's contact cannot be registered.
#[fixture]
pub fn fixture() -> Result<Fixture, eyre::Report> {
    let config = LifecycleConfig::from_lookup(|name| match name {
        "VOWBOOK_PUBLIC_BASE_URL" => Some("https://vows.example/".to_owned()),
        "VOWBOOK_MAIL_FROM" => Some("\"Erie Wedding Officiants\" <hello@vows.example>".to_owned()),
        _ => None,
    })?;
    build(config)
}

/// Wires a service over fresh in-memory adapters using `config`.
///
/// # Errors
///
/// Returns an error if the couple's contact cannot be registered.
pub fn build(config: LifecycleConfig) -> Result<Fixture, eyre::Report> {
    let files = Arc::new(InMemorySignatureStore::new(config.public_base_url));
    let notifications = Arc::new(RecordingNotificationSender::new());
    let email = Arc::new(RecordingEmailSender::new());
    let accounts = Arc::new(InMemoryAccountDirectory::new());
    accounts.insert_contact(
        AccountId::new(COUPLE)?,
        AccountContact {
            email: "ada.grace@example.com".to_owned(),
            display_name: None,
        },
    )?;

    let dispatcher = AgreementEffectDispatcher::new(
        notifications.clone(),
        email.clone(),
        accounts.clone(),
        config.mail_from,
    );
    let service = AgreementLifecycleService::new(
        Arc::new(InMemoryAgreementRepository::new()),
        files.clone(),
        dispatcher,
        Arc::new(DefaultClock),
    )
    .with_payment_policy(config.payment_policy);

    Ok(Fixture {
        service,
        files,
        notifications,
        email,
        accounts,
    })
}

/// Returns ceremony details for a `price` + `travel_fee` dollar ceremony.
///
/// # Errors
///
/// Returns an error if either amount is out of range.
pub fn ceremony(price: u64, travel_fee: u64) -> Result<CeremonyDetailsPatch, eyre::Report> {
    Ok(CeremonyDetailsPatch::new()
        .with_officiant_name("Rev. Lovelace")
        .with_partner1_name("Ada")
        .with_partner2_name("Grace")
        .with_location("Frontier Park")
        .with_price(Amount::from_dollars(price)?)
        .with_travel_fee(Amount::from_dollars(travel_fee)?))
}

/// Builds a signature image upload.
///
/// # Errors
///
/// Returns an error if the upload is rejected.
pub fn signature(file_name: &str) -> Result<SignatureUpload, eyre::Report> {
    Ok(SignatureUpload::new(file_name, vec![0xFF, 0xD8, 0xFF])?)
}

/// Drives a new agreement for the shared couple through payment and the
/// officiant's countersignature.
///
/// # Errors
///
/// Returns an error if any lifecycle step fails.
pub async fn countersigned_agreement(
    service: &TestService,
    price: u64,
    travel_fee: u64,
) -> Result<Agreement, eyre::Report> {
    let created = service
        .create_agreement(CreateAgreementRequest::new(
            COUPLE,
            OFFICIANT,
            ceremony(price, travel_fee)?,
        ))
        .await?;
    service
        .upload_signatures(
            created.id(),
            Some(signature("partner1.jpg")?),
            Some(signature("partner2.jpg")?),
        )
        .await?;
    service.mark_payment_completed(created.id()).await?;
    let countersigned = service
        .upload_officiant_signature(created.id(), Some(signature("officiant.jpg")?))
        .await?;
    Ok(countersigned)
}
