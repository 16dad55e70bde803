//! Officiant-supplied ceremony details.

use super::{AgreementDomainError, Amount};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Ceremony details filled in by the officiant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CeremonyDetails {
    /// Officiant display name printed on the agreement.
    pub officiant_name: Option<String>,
    /// Scheduled ceremony date.
    pub event_date: Option<DateTime<Utc>>,
    /// First partner's name.
    pub partner1_name: Option<String>,
    /// Second partner's name.
    pub partner2_name: Option<String>,
    /// Ceremony location.
    pub location: Option<String>,
    /// Ceremony fee.
    pub price: Amount,
    /// Travel fee added to the ceremony fee.
    pub travel_fee: Amount,
}

impl CeremonyDetails {
    /// Returns the total payable amount (`price + travel_fee`).
    ///
    /// # Errors
    ///
    /// Returns [`AgreementDomainError::TotalOverflow`] when the sum leaves the
    /// supported range.
    pub const fn total(&self) -> Result<Amount, AgreementDomainError> {
        self.price.checked_add(self.travel_fee)
    }

    /// Returns `"{partner1} & {partner2}"` when both names are known.
    #[must_use]
    pub fn couple_names(&self) -> Option<String> {
        match (&self.partner1_name, &self.partner2_name) {
            (Some(first), Some(second)) => Some(format!("{first} & {second}")),
            _ => None,
        }
    }
}

/// Partial update to [`CeremonyDetails`].
///
/// Each field is applied only when supplied. Blank text values are treated as
/// absent so they cannot erase details already on file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CeremonyDetailsPatch {
    officiant_name: Option<String>,
    event_date: Option<DateTime<Utc>>,
    partner1_name: Option<String>,
    partner2_name: Option<String>,
    location: Option<String>,
    price: Option<Amount>,
    travel_fee: Option<Amount>,
}

impl CeremonyDetailsPatch {
    /// Creates an empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the officiant name.
    #[must_use]
    pub fn with_officiant_name(mut self, value: impl Into<String>) -> Self {
        self.officiant_name = Some(value.into());
        self
    }

    /// Sets the ceremony date.
    #[must_use]
    pub const fn with_event_date(mut self, value: DateTime<Utc>) -> Self {
        self.event_date = Some(value);
        self
    }

    /// Sets the first partner's name.
    #[must_use]
    pub fn with_partner1_name(mut self, value: impl Into<String>) -> Self {
        self.partner1_name = Some(value.into());
        self
    }

    /// Sets the second partner's name.
    #[must_use]
    pub fn with_partner2_name(mut self, value: impl Into<String>) -> Self {
        self.partner2_name = Some(value.into());
        self
    }

    /// Sets the ceremony location.
    #[must_use]
    pub fn with_location(mut self, value: impl Into<String>) -> Self {
        self.location = Some(value.into());
        self
    }

    /// Sets the ceremony fee.
    #[must_use]
    pub const fn with_price(mut self, value: Amount) -> Self {
        self.price = Some(value);
        self
    }

    /// Sets the travel fee.
    #[must_use]
    pub const fn with_travel_fee(mut self, value: Amount) -> Self {
        self.travel_fee = Some(value);
        self
    }

    /// Builds full details from this patch, defaulting unspecified fees to
    /// zero.
    #[must_use]
    pub fn into_details(self) -> CeremonyDetails {
        let mut details = CeremonyDetails::default();
        self.apply_to(&mut details);
        details
    }

    /// Applies every supplied field to `details`.
    pub fn apply_to(&self, details: &mut CeremonyDetails) {
        merge_text(&mut details.officiant_name, self.officiant_name.as_deref());
        merge_text(&mut details.partner1_name, self.partner1_name.as_deref());
        merge_text(&mut details.partner2_name, self.partner2_name.as_deref());
        merge_text(&mut details.location, self.location.as_deref());
        if let Some(date) = self.event_date {
            details.event_date = Some(date);
        }
        if let Some(price) = self.price {
            details.price = price;
        }
        if let Some(travel_fee) = self.travel_fee {
            details.travel_fee = travel_fee;
        }
    }
}

fn merge_text(field: &mut Option<String>, value: Option<&str>) {
    let Some(text) = value.map(str::trim).filter(|text| !text.is_empty()) else {
        return;
    };
    *field = Some(text.to_owned());
}
