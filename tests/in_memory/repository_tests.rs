//! In-memory integration tests for agreement persistence semantics.

use super::helpers::{COUPLE, OFFICIANT, ceremony};
use mockable::DefaultClock;
use rstest::{fixture, rstest};
use vowbook::agreement::{
    adapters::memory::InMemoryAgreementRepository,
    domain::{AccountId, Agreement, AgreementRevision, AgreementStatus},
    ports::{AgreementFilter, AgreementRepository, AgreementRepositoryError, AgreementSort},
};

#[fixture]
fn repo() -> InMemoryAgreementRepository {
    InMemoryAgreementRepository::new()
}

fn draft(couple: &str, officiant: &str) -> Result<Agreement, eyre::Report> {
    Ok(Agreement::new(
        AccountId::new(couple)?,
        AccountId::new(officiant)?,
        ceremony(500, 0)?.into_details(),
        &DefaultClock,
    ))
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn store_rejects_duplicate_identifiers(
    repo: InMemoryAgreementRepository,
) -> eyre::Result<()> {
    let agreement = draft(COUPLE, OFFICIANT)?;
    repo.store(&agreement).await?;

    let result = repo.store(&agreement).await;
    eyre::ensure!(
        matches!(
            result,
            Err(AgreementRepositoryError::DuplicateAgreement(id)) if id == agreement.id()
        ),
        "expected DuplicateAgreement, got {result:?}"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn conditional_update_rejects_stale_status(
    repo: InMemoryAgreementRepository,
) -> eyre::Result<()> {
    let agreement = draft(COUPLE, OFFICIANT)?;
    repo.store(&agreement).await?;

    let stale = AgreementRevision {
        status: AgreementStatus::UserSigned,
        version: agreement.version(),
    };
    let result = repo.update_conditional(&agreement, stale).await;
    eyre::ensure!(
        matches!(
            result,
            Err(AgreementRepositoryError::Conflict { expected, .. }) if expected == stale
        ),
        "expected Conflict, got {result:?}"
    );

    repo.update_conditional(&agreement, agreement.revision()).await?;
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn conditional_writes_report_missing_agreements(
    repo: InMemoryAgreementRepository,
) -> eyre::Result<()> {
    let agreement = draft(COUPLE, OFFICIANT)?;

    let update = repo.update_conditional(&agreement, agreement.revision()).await;
    eyre::ensure!(matches!(update, Err(AgreementRepositoryError::NotFound(_))));

    let delete = repo.delete_conditional(agreement.id(), agreement.revision()).await;
    eyre::ensure!(matches!(delete, Err(AgreementRepositoryError::NotFound(_))));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn conditional_delete_keeps_agreement_on_conflict(
    repo: InMemoryAgreementRepository,
) -> eyre::Result<()> {
    let agreement = draft(COUPLE, OFFICIANT)?;
    repo.store(&agreement).await?;

    let newer = AgreementRevision {
        version: agreement.version() + 1,
        ..agreement.revision()
    };
    let result = repo.delete_conditional(agreement.id(), newer).await;
    eyre::ensure!(matches!(result, Err(AgreementRepositoryError::Conflict { .. })));
    eyre::ensure!(repo.find_by_id(agreement.id()).await?.is_some());

    repo.delete_conditional(agreement.id(), agreement.revision()).await?;
    eyre::ensure!(repo.find_by_id(agreement.id()).await?.is_none());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn find_many_applies_every_filter(repo: InMemoryAgreementRepository) -> eyre::Result<()> {
    let ours = draft(COUPLE, OFFICIANT)?;
    let other_couple = draft("couple-other", OFFICIANT)?;
    let other_officiant = draft(COUPLE, "officiant-other")?;
    for agreement in [&ours, &other_couple, &other_officiant] {
        repo.store(agreement).await?;
    }

    let pair = AgreementFilter::any()
        .with_user(AccountId::new(COUPLE)?)
        .with_officiant(AccountId::new(OFFICIANT)?);
    let found = repo.find_many(&pair, AgreementSort::NewestFirst).await?;
    let ids: Vec<_> = found.iter().map(Agreement::id).collect();
    eyre::ensure!(ids == vec![ours.id()], "unexpected matches {ids:?}");

    let by_officiant = AgreementFilter::any().with_officiant(AccountId::new(OFFICIANT)?);
    let found = repo.find_many(&by_officiant, AgreementSort::OldestFirst).await?;
    eyre::ensure!(found.len() == 2);

    let signed_only = AgreementFilter::any().with_statuses([AgreementStatus::UserSigned]);
    let found = repo.find_many(&signed_only, AgreementSort::NewestFirst).await?;
    eyre::ensure!(found.is_empty());
    Ok(())
}
