//! Shared fixtures for agreement unit tests.

use crate::agreement::domain::{AccountId, Agreement, Amount, CeremonyDetailsPatch};
use chrono::{DateTime, Duration, Local, TimeZone, Utc};
use mockable::Clock;
use std::sync::Mutex;

pub const USER: &str = "couple-1";
pub const OFFICIANT: &str = "officiant-1";

/// Clock that starts at a fixed instant and advances one minute per reading.
#[derive(Debug)]
pub struct SteppingClock {
    next: Mutex<DateTime<Utc>>,
}

impl SteppingClock {
    pub fn starting_at(start: DateTime<Utc>) -> Self {
        Self {
            next: Mutex::new(start),
        }
    }

    /// Returns the instant the next reading will produce.
    pub fn peek(&self) -> DateTime<Utc> {
        *self.next.lock().expect("clock lock")
    }
}

impl Default for SteppingClock {
    fn default() -> Self {
        let start = Utc
            .with_ymd_and_hms(2026, 3, 1, 9, 0, 0)
            .single()
            .expect("valid start instant");
        Self::starting_at(start)
    }
}

impl Clock for SteppingClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        let mut next = self.next.lock().expect("clock lock");
        let now = *next;
        *next = now + Duration::minutes(1);
        now
    }
}

pub fn account(id: &str) -> AccountId {
    AccountId::new(id).expect("valid account id")
}

pub fn dollars(value: u64) -> Amount {
    Amount::from_dollars(value).expect("valid amount")
}

/// Details for Ada and Grace's $500 ceremony with a $50 travel fee.
pub fn ceremony_patch() -> CeremonyDetailsPatch {
    CeremonyDetailsPatch::new()
        .with_officiant_name("Rev. Lovelace")
        .with_partner1_name("Ada")
        .with_partner2_name("Grace")
        .with_location("Presque Isle State Park")
        .with_price(dollars(500))
        .with_travel_fee(dollars(50))
}

pub fn drafted_agreement(clock: &SteppingClock) -> Agreement {
    Agreement::new(
        account(USER),
        account(OFFICIANT),
        ceremony_patch().into_details(),
        clock,
    )
}
