//! Diesel schema for workspace persistence.

diesel::table! {
    /// Registered tenant workspaces.
    workspaces (tenant_id) {
        /// Tenant identifier.
        #[max_length = 32]
        tenant_id -> Varchar,
        /// Base64 ciphertext of the client database URL.
        encrypted_db_url -> Text,
        /// Checksum of the last schema handed to ingestion.
        #[max_length = 64]
        checksum -> Varchar,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
