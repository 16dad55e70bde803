//! Rendering for the "agreement ready" email sent to couples.

use crate::agreement::{
    domain::Agreement,
    ports::{AccountContact, EmailError, EmailMessage},
};
use chrono::{DateTime, Utc};
use chrono_tz::{America::New_York, Tz};
use minijinja::{AutoEscape, Environment};
use serde_json::{Map, Value};

/// Subject line of the "agreement ready" email.
pub const AGREEMENT_READY_SUBJECT: &str = "New Wedding Agreement - Erie Wedding Officiants";

const AGREEMENT_READY_TEMPLATE: &str = "\
<h2>Your Wedding Agreement is Ready</h2>
<p>Hello {{ greeting }},</p>
<p>Your officiant has created a ceremony agreement for you. Please log in to review and sign.</p>
<p><strong>Agreement Details:</strong></p>
<ul>
  <li>Partners: {{ partner1 }} &amp; {{ partner2 }}</li>
  <li>Date: {{ event_date }}</li>
  <li>Location: {{ location }}</li>
  <li>Ceremony Fee: {{ price }}</li>
{%- if travel_fee %}
  <li>Travel Fee: {{ travel_fee }}</li>
{%- endif %}
  <li>Total: {{ total }}</li>
</ul>
<p>Please log in to your account to review and sign the agreement.</p>
<p>Best regards,<br>Erie Wedding Officiants</p>
";

const UNSET: &str = "TBD";

/// Zone in which ceremony dates are shown to couples.
pub const CEREMONY_TIME_ZONE: Tz = New_York;

/// Renders the email announcing a newly created agreement.
///
/// # Errors
///
/// Returns [`EmailError::Render`] when the total overflows or the template
/// fails to render.
pub fn render_agreement_ready(
    agreement: &Agreement,
    contact: &AccountContact,
    from: &str,
) -> Result<EmailMessage, EmailError> {
    let details = agreement.details();
    let total = agreement
        .total()
        .map_err(|error| EmailError::Render(error.to_string()))?;

    let greeting = contact
        .display_name
        .as_deref()
        .or_else(|| details.partner1_name.as_deref())
        .unwrap_or("there");
    let event_date = details
        .event_date
        .map_or_else(|| UNSET.to_owned(), format_event_date);

    let mut context = Map::new();
    context.insert("greeting".to_owned(), text(greeting));
    context.insert("partner1".to_owned(), optional_text(details.partner1_name.as_deref()));
    context.insert("partner2".to_owned(), optional_text(details.partner2_name.as_deref()));
    context.insert("event_date".to_owned(), Value::String(event_date));
    context.insert("location".to_owned(), optional_text(details.location.as_deref()));
    context.insert(
        "price".to_owned(),
        Value::String(details.price.to_fixed_string()),
    );
    if !details.travel_fee.is_zero() {
        context.insert(
            "travel_fee".to_owned(),
            Value::String(details.travel_fee.to_fixed_string()),
        );
    }
    context.insert("total".to_owned(), Value::String(total.to_fixed_string()));

    let mut environment = Environment::new();
    environment.set_auto_escape_callback(|_| AutoEscape::Html);
    let html = environment
        .render_str(AGREEMENT_READY_TEMPLATE, context)
        .map_err(|error| EmailError::Render(error.to_string()))?;

    Ok(EmailMessage {
        from: from.to_owned(),
        to: contact.email.clone(),
        subject: AGREEMENT_READY_SUBJECT.to_owned(),
        html,
    })
}

/// Formats a ceremony date as the calendar day it falls on in
/// [`CEREMONY_TIME_ZONE`], e.g. `June 20, 2026`.
fn format_event_date(date: DateTime<Utc>) -> String {
    date.with_timezone(&CEREMONY_TIME_ZONE)
        .format("%B %-d, %Y")
        .to_string()
}

fn text(value: &str) -> Value {
    Value::String(value.to_owned())
}

fn optional_text(value: Option<&str>) -> Value {
    text(value.unwrap_or(UNSET))
}
