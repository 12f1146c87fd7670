//! Diesel table definitions.
//!
//! Must match `backend/migrations` exactly; regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered users. `email` is unique and stored lower-cased.
    users (id) {
        /// Primary key (UUID v4).
        id -> Uuid,
        /// Normalised email address.
        email -> Varchar,
        /// Display name, 2 to 50 characters.
        name -> Varchar,
        /// Encoded credential hash.
        password_hash -> Text,
        /// Genre preference tags.
        genres -> Array<Text>,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Reading-list entries.
    books (id) {
        /// Primary key (UUID v4).
        id -> Uuid,
        /// Owning user.
        user_id -> Uuid,
        /// External catalog key.
        catalog_id -> Text,
        /// Title.
        title -> Text,
        /// Authors in catalog order.
        authors -> Array<Text>,
        /// Free-form description.
        description -> Nullable<Text>,
        /// Category tags.
        categories -> Array<Text>,
        /// Cover image reference.
        image_ref -> Nullable<Text>,
        /// Reading status in kebab-case.
        status -> Varchar,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(books -> users (user_id));
diesel::allow_tables_to_appear_in_same_query!(books, users);
