//! Diesel row models for agreement persistence.

use super::schema::agreements;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for agreement records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = agreements)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AgreementRow {
    /// Agreement identifier.
    pub id: uuid::Uuid,
    /// Couple account identifier.
    pub user_id: String,
    /// Officiant account identifier.
    pub officiant_id: String,
    /// Officiant display name.
    pub officiant_name: Option<String>,
    /// Scheduled ceremony date.
    pub event_date: Option<DateTime<Utc>>,
    /// First partner's name.
    pub partner1_name: Option<String>,
    /// Second partner's name.
    pub partner2_name: Option<String>,
    /// Ceremony location.
    pub location: Option<String>,
    /// Ceremony fee in cents.
    pub price_cents: i64,
    /// Travel fee in cents.
    pub travel_fee_cents: i64,
    /// First partner's signature URL.
    pub partner1_signature: Option<String>,
    /// Second partner's signature URL.
    pub partner2_signature: Option<String>,
    /// Officiant's signature URL.
    pub officiant_signature: Option<String>,
    /// Lifecycle status.
    pub status: String,
    /// Write counter bumped by every committed change.
    pub version: i64,
    /// Whether a ceremony consumed the agreement.
    pub is_used_for_ceremony: bool,
    /// Details filled timestamp.
    pub officiant_filled_at: Option<DateTime<Utc>>,
    /// Couple signature timestamp.
    pub user_signed_at: Option<DateTime<Utc>>,
    /// Payment request timestamp.
    pub payment_requested_at: Option<DateTime<Utc>>,
    /// Payment confirmation timestamp.
    pub payment_completed_at: Option<DateTime<Utc>>,
    /// Officiant signature timestamp.
    pub officiant_signed_at: Option<DateTime<Utc>>,
    /// Completion timestamp.
    pub completed_at: Option<DateTime<Utc>>,
    /// Ceremony submission timestamp.
    pub ceremony_submitted_at: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert and full-replacement model for agreement records.
///
/// `None` values are written as `NULL` so an update replaces every column.
/// The primary key is excluded from the changeset.
#[derive(Debug, Clone, PartialEq, Eq, Insertable, AsChangeset)]
#[diesel(table_name = agreements)]
#[diesel(treat_none_as_null = true)]
pub struct NewAgreementRow {
    /// Agreement identifier.
    pub id: uuid::Uuid,
    /// Couple account identifier.
    pub user_id: String,
    /// Officiant account identifier.
    pub officiant_id: String,
    /// Officiant display name.
    pub officiant_name: Option<String>,
    /// Scheduled ceremony date.
    pub event_date: Option<DateTime<Utc>>,
    /// First partner's name.
    pub partner1_name: Option<String>,
    /// Second partner's name.
    pub partner2_name: Option<String>,
    /// Ceremony location.
    pub location: Option<String>,
    /// Ceremony fee in cents.
    pub price_cents: i64,
    /// Travel fee in cents.
    pub travel_fee_cents: i64,
    /// First partner's signature URL.
    pub partner1_signature: Option<String>,
    /// Second partner's signature URL.
    pub partner2_signature: Option<String>,
    /// Officiant's signature URL.
    pub officiant_signature: Option<String>,
    /// Lifecycle status.
    pub status: String,
    /// Write counter bumped by every committed change.
    pub version: i64,
    /// Whether a ceremony consumed the agreement.
    pub is_used_for_ceremony: bool,
    /// Details filled timestamp.
    pub officiant_filled_at: Option<DateTime<Utc>>,
    /// Couple signature timestamp.
    pub user_signed_at: Option<DateTime<Utc>>,
    /// Payment request timestamp.
    pub payment_requested_at: Option<DateTime<Utc>>,
    /// Payment confirmation timestamp.
    pub payment_completed_at: Option<DateTime<Utc>>,
    /// Officiant signature timestamp.
    pub officiant_signed_at: Option<DateTime<Utc>>,
    /// Completion timestamp.
    pub completed_at: Option<DateTime<Utc>>,
    /// Ceremony submission timestamp.
    pub ceremony_submitted_at: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
