//! Diesel table definitions mirroring `backend/migrations`.
//!
//! Keep in step with the migrations; `diesel print-schema` regenerates them
//! from a live database.

diesel::table! {
    /// Append-only blood-pressure readings.
    measurements (id) {
        /// Primary key: UUID v4 assigned by the domain.
        id -> Uuid,
        /// Insertion sequence; the only ordering reads rely on.
        seq -> Int8,
        /// Opaque user identifier from the request path.
        user_id -> Text,
        systolic -> Int4,
        diastolic -> Int4,
        pulse -> Nullable<Int4>,
        /// Date string exactly as submitted.
        date -> Text,
        /// Instant the date string denotes, when it could be interpreted.
        recorded_at -> Nullable<Timestamptz>,
        created_at -> Timestamptz,
    }
}
