//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly; Diesel uses
//! them for compile-time query validation and type-safe SQL generation.
//! Regenerate with `diesel print-schema` after migrations change.

diesel::table! {
    /// Contact records.
    ///
    /// `email` and `linkedin_url` carry partial unique indexes (unique where
    /// not null) that back the reconciliation identity keys.
    contacts (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        name -> Varchar,
        title -> Nullable<Varchar>,
        company -> Nullable<Varchar>,
        /// Identity key, unique where not null.
        email -> Nullable<Varchar>,
        /// Identity key, unique where not null.
        linkedin_url -> Nullable<Varchar>,
        phone -> Nullable<Varchar>,
        /// Normalized lowercase tags.
        tags -> Array<Text>,
        source -> Nullable<Varchar>,
        /// Lifecycle stage stored as snake_case text.
        relationship_stage -> Varchar,
        notes -> Nullable<Text>,
        last_interaction_at -> Nullable<Timestamptz>,
        /// Set-null reference to the owning campaign.
        campaign_id -> Nullable<Uuid>,
        is_archived -> Bool,
        archived_at -> Nullable<Timestamptz>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Companion relationship records, one per contact.
    ///
    /// `contact_id` is unique and cascades on contact deletion. The stage and
    /// last-interaction columns mirror the contact within every mutating
    /// transaction.
    relationships (id) {
        id -> Uuid,
        contact_id -> Uuid,
        stage -> Varchar,
        last_interaction -> Nullable<Timestamptz>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Append-only interaction log.
    actions (id) {
        id -> Uuid,
        /// Owning contact, cascades on deletion.
        contact_id -> Uuid,
        /// Interaction kind stored as snake_case text.
        action_type -> Varchar,
        details -> Jsonb,
        status -> Varchar,
        /// Effective interaction time; may be backdated by the caller.
        timestamp -> Timestamptz,
        metadata -> Jsonb,
        scheduled_for -> Nullable<Timestamptz>,
        completed_at -> Nullable<Timestamptz>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Outreach campaigns.
    campaigns (id) {
        id -> Uuid,
        user_prompt -> Text,
        /// Normalized lowercase target tags.
        target_tags -> Array<Text>,
        created_at -> Timestamptz,
        started_at -> Nullable<Timestamptz>,
        completed_at -> Nullable<Timestamptz>,
    }
}

diesel::joinable!(relationships -> contacts (contact_id));
diesel::joinable!(actions -> contacts (contact_id));
diesel::joinable!(contacts -> campaigns (campaign_id));

diesel::allow_tables_to_appear_in_same_query!(contacts, relationships, actions, campaigns);
