//! Then steps for agreement lifecycle BDD scenarios.

use super::world::{AgreementWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::then;
use vowbook::agreement::domain::AgreementStatus;

#[then(r#"the agreement status is "{status}""#)]
fn agreement_status_is(world: &AgreementWorld, status: String) -> Result<(), eyre::Report> {
    let expected = AgreementStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid expected status in scenario: {err}"))?;
    let agreement_id = world.agreement()?.id();
    let stored = run_async(world.service.find_by_id(agreement_id))
        .wrap_err("reload agreement for status check")?;

    if stored.status() != expected {
        return Err(eyre::eyre!(
            "expected status {expected}, found {}",
            stored.status()
        ));
    }
    Ok(())
}

#[then(r#"the operation fails with "{kind}""#)]
fn operation_fails_with(world: &AgreementWorld, kind: String) -> Result<(), eyre::Report> {
    let result = world
        .last_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing operation result"))?;

    match result {
        Err(err) if err.kind().as_str() == kind => Ok(()),
        Err(err) => Err(eyre::eyre!("expected {kind} failure, got {}: {err}", err.kind())),
        Ok(agreement) => Err(eyre::eyre!(
            "expected {kind} failure, but agreement moved to {}",
            agreement.status()
        )),
    }
}

#[then(r#"couple "{couple}" was notified "{text}""#)]
fn couple_was_notified(
    world: &AgreementWorld,
    couple: String,
    text: String,
) -> Result<(), eyre::Report> {
    let delivered = world
        .notifications
        .sent()
        .into_iter()
        .any(|notification| {
            notification.recipient.as_str() == couple && notification.text == text
        });
    eyre::ensure!(delivered, "no notification {text:?} for {couple}");
    Ok(())
}

#[then("the agreement is marked as used for a ceremony")]
fn agreement_marked_used(world: &AgreementWorld) -> Result<(), eyre::Report> {
    let agreement_id = world.agreement()?.id();
    let stored = run_async(world.service.find_by_id(agreement_id))
        .wrap_err("reload agreement for usage check")?;
    eyre::ensure!(stored.is_used_for_ceremony(), "agreement was not marked as used");
    eyre::ensure!(
        stored.timeline().ceremony_submitted_at.is_some(),
        "agreement has no used_at timestamp"
    );
    Ok(())
}
