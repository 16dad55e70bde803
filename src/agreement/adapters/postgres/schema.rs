//! Diesel schema for agreement persistence.

diesel::table! {
    /// Ceremony agreements between a couple and an officiant.
    agreements (id) {
        /// Agreement identifier.
        id -> Uuid,
        /// Couple account identifier.
        #[max_length = 255]
        user_id -> Varchar,
        /// Officiant account identifier.
        #[max_length = 255]
        officiant_id -> Varchar,
        /// Officiant display name.
        officiant_name -> Nullable<Text>,
        /// Scheduled ceremony date.
        event_date -> Nullable<Timestamptz>,
        /// First partner's name.
        partner1_name -> Nullable<Text>,
        /// Second partner's name.
        partner2_name -> Nullable<Text>,
        /// Ceremony location.
        location -> Nullable<Text>,
        /// Ceremony fee in cents.
        price_cents -> Int8,
        /// Travel fee in cents.
        travel_fee_cents -> Int8,
        /// First partner's signature URL.
        partner1_signature -> Nullable<Text>,
        /// Second partner's signature URL.
        partner2_signature -> Nullable<Text>,
        /// Officiant's signature URL.
        officiant_signature -> Nullable<Text>,
        /// Lifecycle status.
        #[max_length = 50]
        status -> Varchar,
        /// Write counter bumped by every committed change.
        version -> Int8,
        /// Whether a ceremony consumed the agreement.
        is_used_for_ceremony -> Bool,
        /// Details filled timestamp.
        officiant_filled_at -> Nullable<Timestamptz>,
        /// Couple signature timestamp.
        user_signed_at -> Nullable<Timestamptz>,
        /// Payment request timestamp.
        payment_requested_at -> Nullable<Timestamptz>,
        /// Payment confirmation timestamp.
        payment_completed_at -> Nullable<Timestamptz>,
        /// Officiant signature timestamp.
        officiant_signed_at -> Nullable<Timestamptz>,
        /// Completion timestamp.
        completed_at -> Nullable<Timestamptz>,
        /// Ceremony submission timestamp.
        ceremony_submitted_at -> Nullable<Timestamptz>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
