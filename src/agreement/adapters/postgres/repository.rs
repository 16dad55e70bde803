//! `PostgreSQL` repository implementation for agreement storage.

use super::{
    models::{AgreementRow, NewAgreementRow},
    schema::agreements,
};
use crate::agreement::{
    domain::{
        AccountId, Agreement, AgreementId, AgreementRevision, AgreementSignatures,
        AgreementStatus, AgreementTimeline, Amount, CeremonyDetails, PersistedAgreementData,
        SignatureUrl,
    },
    ports::{
        AgreementFilter, AgreementRepository, AgreementRepositoryError, AgreementRepositoryResult,
        AgreementSort,
    },
};
use async_trait::async_trait;
use diesel::pg::{Pg, PgConnection};
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by agreement adapters.
pub type AgreementPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed agreement repository.
///
/// Conditional writes are single `UPDATE`/`DELETE` statements filtered on
/// the identifier, the expected status and the expected version, so the
/// database decides the winner among concurrent transitions.
#[derive(Debug, Clone)]
pub struct PostgresAgreementRepository {
    pool: AgreementPgPool,
}

impl PostgresAgreementRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: AgreementPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> AgreementRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> AgreementRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(AgreementRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(AgreementRepositoryError::persistence)?
    }
}

#[async_trait]
impl AgreementRepository for PostgresAgreementRepository {
    async fn store(&self, agreement: &Agreement) -> AgreementRepositoryResult<()> {
        let agreement_id = agreement.id();
        let new_row = to_new_row(agreement)?;

        self.run_blocking(move |connection| {
            diesel::insert_into(agreements::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        AgreementRepositoryError::DuplicateAgreement(agreement_id)
                    }
                    _ => AgreementRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: AgreementId) -> AgreementRepositoryResult<Option<Agreement>> {
        self.run_blocking(move |connection| {
            let row = agreements::table
                .filter(agreements::id.eq(id.into_inner()))
                .select(AgreementRow::as_select())
                .first::<AgreementRow>(connection)
                .optional()
                .map_err(AgreementRepositoryError::persistence)?;
            row.map(row_to_agreement).transpose()
        })
        .await
    }

    async fn find_many(
        &self,
        filter: &AgreementFilter,
        sort: AgreementSort,
    ) -> AgreementRepositoryResult<Vec<Agreement>> {
        let criteria = filter.clone();
        self.run_blocking(move |connection| {
            let mut query: agreements::BoxedQuery<'static, Pg> = agreements::table.into_boxed();
            if let Some(user_id) = criteria.user_id() {
                query = query.filter(agreements::user_id.eq(user_id.as_str().to_owned()));
            }
            if let Some(officiant_id) = criteria.officiant_id() {
                query = query.filter(agreements::officiant_id.eq(officiant_id.as_str().to_owned()));
            }
            if let Some(statuses) = criteria.statuses() {
                let names: Vec<&'static str> =
                    statuses.iter().map(|status| status.as_str()).collect();
                query = query.filter(agreements::status.eq_any(names));
            }
            query = match sort {
                AgreementSort::NewestFirst => {
                    query.order((agreements::created_at.desc(), agreements::id.desc()))
                }
                AgreementSort::OldestFirst => {
                    query.order((agreements::created_at.asc(), agreements::id.asc()))
                }
            };

            let rows = query
                .select(AgreementRow::as_select())
                .load::<AgreementRow>(connection)
                .map_err(AgreementRepositoryError::persistence)?;
            rows.into_iter().map(row_to_agreement).collect()
        })
        .await
    }

    async fn update_conditional(
        &self,
        agreement: &Agreement,
        expected: AgreementRevision,
    ) -> AgreementRepositoryResult<()> {
        let agreement_id = agreement.id();
        let row = to_new_row(agreement)?;
        let expected_version = version_to_column(expected.version)?;

        self.run_blocking(move |connection| {
            let updated = diesel::update(
                agreements::table
                    .filter(agreements::id.eq(agreement_id.into_inner()))
                    .filter(agreements::status.eq(expected.status.as_str()))
                    .filter(agreements::version.eq(expected_version)),
            )
            .set(&row)
            .execute(connection)
            .map_err(AgreementRepositoryError::persistence)?;

            if updated == 0 {
                return Err(missed_write_error(connection, agreement_id, expected));
            }
            Ok(())
        })
        .await
    }

    async fn delete_conditional(
        &self,
        id: AgreementId,
        expected: AgreementRevision,
    ) -> AgreementRepositoryResult<()> {
        let expected_version = version_to_column(expected.version)?;

        self.run_blocking(move |connection| {
            let deleted = diesel::delete(
                agreements::table
                    .filter(agreements::id.eq(id.into_inner()))
                    .filter(agreements::status.eq(expected.status.as_str()))
                    .filter(agreements::version.eq(expected_version)),
            )
            .execute(connection)
            .map_err(AgreementRepositoryError::persistence)?;

            if deleted == 0 {
                return Err(missed_write_error(connection, id, expected));
            }
            Ok(())
        })
        .await
    }
}

/// Explains why a conditional write matched no rows.
fn missed_write_error(
    connection: &mut PgConnection,
    id: AgreementId,
    expected: AgreementRevision,
) -> AgreementRepositoryError {
    let still_exists = agreements::table
        .filter(agreements::id.eq(id.into_inner()))
        .select(agreements::id)
        .first::<uuid::Uuid>(connection)
        .optional();

    match still_exists {
        Ok(Some(_)) => AgreementRepositoryError::Conflict { id, expected },
        Ok(None) => AgreementRepositoryError::NotFound(id),
        Err(err) => AgreementRepositoryError::persistence(err),
    }
}

fn cents_to_column(amount: Amount) -> AgreementRepositoryResult<i64> {
    i64::try_from(amount.cents()).map_err(AgreementRepositoryError::persistence)
}

fn version_to_column(version: u64) -> AgreementRepositoryResult<i64> {
    i64::try_from(version).map_err(AgreementRepositoryError::persistence)
}

fn column_to_version(version: i64) -> AgreementRepositoryResult<u64> {
    u64::try_from(version).map_err(AgreementRepositoryError::persistence)
}

fn column_to_amount(cents: i64) -> AgreementRepositoryResult<Amount> {
    let unsigned = u64::try_from(cents).map_err(AgreementRepositoryError::persistence)?;
    Amount::from_cents(unsigned).map_err(AgreementRepositoryError::persistence)
}

fn column_to_signature(value: Option<String>) -> AgreementRepositoryResult<Option<SignatureUrl>> {
    value
        .map(SignatureUrl::new)
        .transpose()
        .map_err(AgreementRepositoryError::persistence)
}

pub(super) fn to_new_row(agreement: &Agreement) -> AgreementRepositoryResult<NewAgreementRow> {
    let details = agreement.details();
    let signatures = agreement.signatures();
    let timeline = agreement.timeline();

    Ok(NewAgreementRow {
        id: agreement.id().into_inner(),
        user_id: agreement.user_id().as_str().to_owned(),
        officiant_id: agreement.officiant_id().as_str().to_owned(),
        officiant_name: details.officiant_name.clone(),
        event_date: details.event_date,
        partner1_name: details.partner1_name.clone(),
        partner2_name: details.partner2_name.clone(),
        location: details.location.clone(),
        price_cents: cents_to_column(details.price)?,
        travel_fee_cents: cents_to_column(details.travel_fee)?,
        partner1_signature: signatures.partner1.as_ref().map(|url| url.as_str().to_owned()),
        partner2_signature: signatures.partner2.as_ref().map(|url| url.as_str().to_owned()),
        officiant_signature: signatures
            .officiant
            .as_ref()
            .map(|url| url.as_str().to_owned()),
        status: agreement.status().as_str().to_owned(),
        version: version_to_column(agreement.version())?,
        is_used_for_ceremony: agreement.is_used_for_ceremony(),
        officiant_filled_at: timeline.officiant_filled_at,
        user_signed_at: timeline.user_signed_at,
        payment_requested_at: timeline.payment_requested_at,
        payment_completed_at: timeline.payment_completed_at,
        officiant_signed_at: timeline.officiant_signed_at,
        completed_at: timeline.completed_at,
        ceremony_submitted_at: timeline.ceremony_submitted_at,
        created_at: timeline.created_at,
        updated_at: timeline.updated_at,
    })
}

pub(super) fn row_to_agreement(row: AgreementRow) -> AgreementRepositoryResult<Agreement> {
    let AgreementRow {
        id,
        user_id,
        officiant_id,
        officiant_name,
        event_date,
        partner1_name,
        partner2_name,
        location,
        price_cents,
        travel_fee_cents,
        partner1_signature,
        partner2_signature,
        officiant_signature,
        status: persisted_status,
        version,
        is_used_for_ceremony,
        officiant_filled_at,
        user_signed_at,
        payment_requested_at,
        payment_completed_at,
        officiant_signed_at,
        completed_at,
        ceremony_submitted_at,
        created_at,
        updated_at,
    } = row;

    let status = AgreementStatus::try_from(persisted_status.as_str())
        .map_err(AgreementRepositoryError::persistence)?;

    let data = PersistedAgreementData {
        id: AgreementId::from_uuid(id),
        user_id: AccountId::new(user_id).map_err(AgreementRepositoryError::persistence)?,
        officiant_id: AccountId::new(officiant_id)
            .map_err(AgreementRepositoryError::persistence)?,
        details: CeremonyDetails {
            officiant_name,
            event_date,
            partner1_name,
            partner2_name,
            location,
            price: column_to_amount(price_cents)?,
            travel_fee: column_to_amount(travel_fee_cents)?,
        },
        signatures: AgreementSignatures {
            partner1: column_to_signature(partner1_signature)?,
            partner2: column_to_signature(partner2_signature)?,
            officiant: column_to_signature(officiant_signature)?,
        },
        status,
        version: column_to_version(version)?,
        is_used_for_ceremony,
        timeline: AgreementTimeline {
            created_at,
            updated_at,
            officiant_filled_at,
            user_signed_at,
            payment_requested_at,
            payment_completed_at,
            officiant_signed_at,
            completed_at,
            ceremony_submitted_at,
        },
    };
    Ok(Agreement::from_persisted(data))
}
