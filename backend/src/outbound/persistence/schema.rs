//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the SQL migrations exactly; Diesel uses them
//! for compile-time query validation. Regenerate with `diesel print-schema`
//! when the migrations change.

diesel::table! {
    /// Volunteer submissions from the public form.
    ///
    /// Rows are immutable after insert; there is no update path.
    volunteers (id) {
        /// Primary key: UUID v4 assigned at insert time.
        id -> Uuid,
        /// Full name as submitted.
        nome -> Varchar,
        /// Contact email.
        email -> Varchar,
        /// Masked WhatsApp number `(99) 99999-9999`.
        telefone -> Varchar,
        /// Street, number, complement.
        endereco -> Varchar,
        /// One of the served-city literals.
        cidade -> Varchar,
        /// One of the volunteer-area literals.
        area -> Varchar,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Staff accounts allowed to view the volunteer listing.
    staff_accounts (id) {
        /// Primary key: UUID v4.
        id -> Uuid,
        /// Unique login name.
        username -> Varchar,
        /// Hex-encoded salted SHA-256 of the password.
        password_digest -> Varchar,
        /// Per-account random salt, hex encoded.
        password_salt -> Varchar,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}
