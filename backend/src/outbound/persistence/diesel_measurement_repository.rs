//! PostgreSQL-backed `MeasurementRepository` implementation using Diesel ORM.
//!
//! Rows are append-only. Reads order by the insertion sequence so callers
//! see measurements in the order they were recorded.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::{debug, warn};

use crate::domain::ports::{MeasurementRepository, MeasurementRepositoryError};
use crate::domain::{DateRange, Measurement, UserId};

use super::models::{MeasurementRow, NewMeasurementRow};
use super::pool::{DbPool, PoolError};
use super::schema::measurements;

/// Diesel-backed implementation of the `MeasurementRepository` port.
#[derive(Clone)]
pub struct DieselMeasurementRepository {
    pool: DbPool,
}

impl DieselMeasurementRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> MeasurementRepositoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            MeasurementRepositoryError::connection(message)
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> MeasurementRepositoryError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => MeasurementRepositoryError::query("record not found"),
        DieselError::QueryBuilderError(_) => {
            MeasurementRepositoryError::query("database query error")
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            MeasurementRepositoryError::connection("database connection error")
        }
        _ => MeasurementRepositoryError::query("database error"),
    }
}

fn rows_to_measurements(rows: Vec<MeasurementRow>) -> Vec<Measurement> {
    rows.into_iter()
        .filter_map(|row| {
            let id = row.id;
            let measurement = row.into_domain();
            if measurement.is_none() {
                warn!(%id, "skipping stored measurement with blank user id");
            }
            measurement
        })
        .collect()
}

/// Order `(user, first sequence)` pairs by first appearance.
fn first_seen_order(mut users: Vec<(String, Option<i64>)>) -> Vec<UserId> {
    users.sort_by_key(|(_, first_seq)| first_seq.unwrap_or(i64::MAX));
    users
        .into_iter()
        .filter_map(|(user_id, _)| UserId::new(user_id).ok())
        .collect()
}

#[async_trait]
impl MeasurementRepository for DieselMeasurementRepository {
    async fn append(&self, measurement: &Measurement) -> Result<(), MeasurementRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::insert_into(measurements::table)
            .values(NewMeasurementRow::from(measurement))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(())
    }

    async fn find_by_user(
        &self,
        user_id: &UserId,
        range: Option<DateRange>,
    ) -> Result<Vec<Measurement>, MeasurementRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut query = measurements::table
            .filter(measurements::user_id.eq(user_id.as_ref()))
            .order(measurements::seq.asc())
            .select(MeasurementRow::as_select())
            .into_boxed();
        if let Some(range) = range {
            query = query.filter(measurements::recorded_at.between(range.start(), range.end()));
        }

        let rows: Vec<MeasurementRow> = query.load(&mut conn).await.map_err(map_diesel_error)?;
        Ok(rows_to_measurements(rows))
    }

    async fn list_user_ids(&self) -> Result<Vec<UserId>, MeasurementRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let users: Vec<(String, Option<i64>)> = measurements::table
            .group_by(measurements::user_id)
            .select((measurements::user_id, diesel::dsl::min(measurements::seq)))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(first_seen_order(users))
    }
}
