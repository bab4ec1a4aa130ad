//! Diesel schema for ingestion status persistence.

diesel::table! {
    /// Per-tenant ingestion status records. Absence means `DONE`.
    ingestion_statuses (tenant_id) {
        /// Tenant identifier.
        #[max_length = 32]
        tenant_id -> Varchar,
        /// Status flag in its storage form.
        #[max_length = 16]
        status -> Varchar,
        /// Optional diagnostic message.
        message -> Nullable<Text>,
        /// Last write timestamp.
        updated_at -> Timestamptz,
    }
}
