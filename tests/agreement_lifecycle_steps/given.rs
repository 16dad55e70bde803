//! Given steps for agreement lifecycle BDD scenarios.

use super::world::{AgreementWorld, run_async, signature};
use eyre::WrapErr;
use rstest_bdd_macros::given;
use vowbook::agreement::{
    domain::{AccountId, Amount, EventSubmitted},
    services::CreateAgreementRequest,
};

#[given(r#"an officiant "{officiant}" drafting for couple "{couple}""#)]
fn officiant_drafting(world: &mut AgreementWorld, officiant: String, couple: String) {
    world.pending_parties = Some((couple, officiant));
    world.pending_details = world
        .pending_details
        .clone()
        .with_officiant_name("Rev. Lovelace")
        .with_partner1_name("Ada")
        .with_partner2_name("Grace")
        .with_location("Presque Isle State Park");
}

#[given("the ceremony costs ${price:u64} with a ${travel_fee:u64} travel fee")]
fn ceremony_costs(
    world: &mut AgreementWorld,
    price: u64,
    travel_fee: u64,
) -> Result<(), eyre::Report> {
    let price_amount = Amount::from_dollars(price).wrap_err("ceremony price")?;
    let travel_amount = Amount::from_dollars(travel_fee).wrap_err("travel fee")?;
    world.pending_details = world
        .pending_details
        .clone()
        .with_price(price_amount)
        .with_travel_fee(travel_amount);
    Ok(())
}

#[given("the agreement has been created")]
fn agreement_created(world: &mut AgreementWorld) -> Result<(), eyre::Report> {
    let (couple, officiant) = world
        .pending_parties
        .clone()
        .ok_or_else(|| eyre::eyre!("missing pending parties in scenario world"))?;
    let request = CreateAgreementRequest::new(couple, officiant, world.pending_details.clone());
    let created = run_async(world.service.create_agreement(request))
        .wrap_err("create agreement for scenario")?;
    world.agreement = Some(created);
    Ok(())
}

#[given("both partners have signed")]
fn partners_signed(world: &mut AgreementWorld) -> Result<(), eyre::Report> {
    sign_both(world)
}

fn sign_both(world: &mut AgreementWorld) -> Result<(), eyre::Report> {
    let agreement_id = world.agreement()?.id();
    let signed = run_async(world.service.upload_signatures(
        agreement_id,
        Some(signature("partner1.png")?),
        Some(signature("partner2.png")?),
    ))
    .wrap_err("upload partner signatures in scenario setup")?;
    world.agreement = Some(signed);
    Ok(())
}

#[given("the agreement has been paid for")]
fn agreement_paid(world: &mut AgreementWorld) -> Result<(), eyre::Report> {
    sign_both(world)?;
    let agreement_id = world.agreement()?.id();
    run_async(world.service.request_payment(agreement_id))
        .wrap_err("request payment in scenario setup")?;
    let paid = run_async(world.service.mark_payment_completed(agreement_id))
        .wrap_err("confirm payment in scenario setup")?;
    world.agreement = Some(paid);
    Ok(())
}

#[given("the officiant has countersigned")]
fn officiant_countersigned(world: &mut AgreementWorld) -> Result<(), eyre::Report> {
    let agreement_id = world.agreement()?.id();
    let countersigned = run_async(
        world
            .service
            .upload_officiant_signature(agreement_id, Some(signature("officiant.png")?)),
    )
    .wrap_err("upload officiant signature in scenario setup")?;
    world.agreement = Some(countersigned);
    Ok(())
}

#[given(r#"the ceremony for couple "{couple}" has been submitted"#)]
fn ceremony_already_submitted(
    world: &mut AgreementWorld,
    couple: String,
) -> Result<(), eyre::Report> {
    let event = submission_for(world, &couple)?;
    let used = run_async(world.service.consume_for_ceremony(&event))
        .wrap_err("consume agreement in scenario setup")?;
    world.agreement = Some(used);
    Ok(())
}

/// Builds the submission message for `couple` and the agreement's officiant.
///
/// # Errors
///
/// Returns an error when no agreement exists or the couple id is blank.
pub fn submission_for(
    world: &AgreementWorld,
    couple: &str,
) -> Result<EventSubmitted, eyre::Report> {
    let officiant_id = world.agreement()?.officiant_id().clone();
    let user_id = AccountId::new(couple).wrap_err("couple account id")?;
    Ok(EventSubmitted::new(user_id, officiant_id))
}
