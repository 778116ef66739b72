//! Diesel schema for enforcement settings.

diesel::table! {
    /// Enforcement mode per scope and policy.
    enforcement_settings (scope_key, policy) {
        /// `global` or `department:<uuid>`.
        #[max_length = 64]
        scope_key -> Varchar,
        /// Policy name.
        #[max_length = 32]
        policy -> Varchar,
        /// `warn` or `block`.
        #[max_length = 10]
        mode -> Varchar,
        /// Last write timestamp.
        updated_at -> Timestamptz,
    }
}
