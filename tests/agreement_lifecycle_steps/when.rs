//! When steps for agreement lifecycle BDD scenarios.

use super::given::submission_for;
use super::world::{AgreementWorld, run_async, signature};
use eyre::WrapErr;
use rstest_bdd_macros::when;
use vowbook::agreement::domain::{AccountId, CeremonyDetailsPatch};

#[when("both partners upload their signatures")]
fn partners_upload(world: &mut AgreementWorld) -> Result<(), eyre::Report> {
    let agreement_id = world.agreement()?.id();
    let result = run_async(world.service.upload_signatures(
        agreement_id,
        Some(signature("partner1.png")?),
        Some(signature("partner2.jpg")?),
    ));
    world.record(result);
    Ok(())
}

#[when("only the first partner uploads a signature")]
fn first_partner_uploads(world: &mut AgreementWorld) -> Result<(), eyre::Report> {
    let agreement_id = world.agreement()?.id();
    let result = run_async(world.service.upload_signatures(
        agreement_id,
        Some(signature("partner1.png")?),
        None,
    ));
    world.record(result);
    Ok(())
}

#[when("the officiant requests payment")]
fn officiant_requests_payment(world: &mut AgreementWorld) -> Result<(), eyre::Report> {
    let agreement_id = world.agreement()?.id();
    let result = run_async(world.service.request_payment(agreement_id));
    world.record(result);
    Ok(())
}

#[when("the payment is confirmed")]
fn payment_confirmed(world: &mut AgreementWorld) -> Result<(), eyre::Report> {
    let agreement_id = world.agreement()?.id();
    let result = run_async(world.service.mark_payment_completed(agreement_id));
    world.record(result);
    Ok(())
}

#[when(r#"account "{requester}" changes the location to "{location}""#)]
fn account_changes_location(
    world: &mut AgreementWorld,
    requester: String,
    location: String,
) -> Result<(), eyre::Report> {
    let agreement_id = world.agreement()?.id();
    let requester_id = AccountId::new(requester).wrap_err("requester account id")?;
    let patch = CeremonyDetailsPatch::new().with_location(location);
    let result = run_async(
        world
            .service
            .fill_details(agreement_id, &requester_id, &patch),
    );
    world.record(result);
    Ok(())
}

#[when(r#"account "{requester}" deletes the agreement"#)]
fn account_deletes(world: &mut AgreementWorld, requester: String) -> Result<(), eyre::Report> {
    let agreement_id = world.agreement()?.id();
    let requester_id = AccountId::new(requester).wrap_err("requester account id")?;
    let result = run_async(world.service.delete_agreement(agreement_id, &requester_id));
    world.last_result = Some(result);
    Ok(())
}

#[when(r#"the ceremony for couple "{couple}" is submitted"#)]
fn ceremony_submitted(world: &mut AgreementWorld, couple: String) -> Result<(), eyre::Report> {
    let event = submission_for(world, &couple)?;
    let result = run_async(world.service.consume_for_ceremony(&event));
    world.record(result);
    Ok(())
}
