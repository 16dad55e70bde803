//! In-memory integration tests for ceremony readiness and consumption.

use super::helpers::{
    COUPLE, Fixture, OFFICIANT, ceremony, countersigned_agreement, fixture, signature,
};
use rstest::rstest;
use vowbook::agreement::{
    domain::{AccountId, AgreementStatus, Amount, EventSubmitted},
    services::{AgreementFailureKind, AgreementLifecycleError, CreateAgreementRequest},
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn readiness_reports_total_price(
    fixture: Result<Fixture, eyre::Report>,
) -> eyre::Result<()> {
    let fx = fixture?;
    let agreement = countersigned_agreement(&fx.service, 650, 75).await?;

    let readiness = fx
        .service
        .ceremony_readiness(&AccountId::new(COUPLE)?, &AccountId::new(OFFICIANT)?)
        .await?;
    eyre::ensure!(readiness.agreement_id == agreement.id());
    eyre::ensure!(readiness.ceremony_price == Amount::from_dollars(725)?);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn readiness_requires_countersignature(
    fixture: Result<Fixture, eyre::Report>,
) -> eyre::Result<()> {
    let fx = fixture?;
    let created = fx
        .service
        .create_agreement(CreateAgreementRequest::new(COUPLE, OFFICIANT, ceremony(500, 0)?))
        .await?;
    fx.service
        .upload_signatures(
            created.id(),
            Some(signature("a.png")?),
            Some(signature("b.png")?),
        )
        .await?;
    fx.service.mark_payment_completed(created.id()).await?;

    let result = fx
        .service
        .ceremony_readiness(&AccountId::new(COUPLE)?, &AccountId::new(OFFICIANT)?)
        .await;
    eyre::ensure!(
        matches!(result, Err(AgreementLifecycleError::NoSignedAgreement { .. })),
        "expected NoSignedAgreement, got {result:?}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn submission_consumes_agreement_once(
    fixture: Result<Fixture, eyre::Report>,
) -> eyre::Result<()> {
    let fx = fixture?;
    let agreement = countersigned_agreement(&fx.service, 500, 0).await?;
    let event = EventSubmitted::new(AccountId::new(COUPLE)?, AccountId::new(OFFICIANT)?);

    let used = fx.service.consume_for_ceremony(&event).await?;
    eyre::ensure!(used.id() == agreement.id());
    eyre::ensure!(used.status() == AgreementStatus::Used);
    eyre::ensure!(used.is_used_for_ceremony());
    eyre::ensure!(used.timeline().ceremony_submitted_at.is_some());

    let Err(err) = fx.service.consume_for_ceremony(&event).await else {
        eyre::bail!("a used agreement cannot back a second ceremony");
    };
    eyre::ensure!(err.kind() == AgreementFailureKind::NotFound, "got {err}");

    let Err(direct) = fx.service.mark_used_for_ceremony(agreement.id()).await else {
        eyre::bail!("a used agreement cannot be consumed again");
    };
    eyre::ensure!(
        direct.kind() == AgreementFailureKind::InvalidTransition,
        "got {direct}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn submission_for_another_officiant_finds_nothing(
    fixture: Result<Fixture, eyre::Report>,
) -> eyre::Result<()> {
    let fx = fixture?;
    countersigned_agreement(&fx.service, 500, 0).await?;
    let event = EventSubmitted::new(AccountId::new(COUPLE)?, AccountId::new("officiant-other")?);

    let result = fx.service.consume_for_ceremony(&event).await;
    eyre::ensure!(
        matches!(result, Err(AgreementLifecycleError::NoSignedAgreement { .. })),
        "expected NoSignedAgreement, got {result:?}"
    );
    Ok(())
}
