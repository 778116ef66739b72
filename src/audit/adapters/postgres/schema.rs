//! Diesel schema for history tables.

diesel::table! {
    /// Append-only task status changes.
    task_status_history (id) {
        /// Entry identifier.
        id -> Uuid,
        /// Insertion order.
        seq -> Int8,
        /// Task that changed.
        task_id -> Uuid,
        /// Previous status; null for the creation entry.
        #[max_length = 50]
        from_status -> Nullable<Varchar>,
        /// New status.
        #[max_length = 50]
        to_status -> Varchar,
        /// Acting user.
        changed_by -> Uuid,
        /// Optional note.
        note -> Nullable<Text>,
        /// When the change was recorded.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Append-only checklist completion flips.
    checklist_state_history (id) {
        /// Entry identifier.
        id -> Uuid,
        /// Insertion order.
        seq -> Int8,
        /// Item that flipped.
        checklist_item_id -> Uuid,
        /// Task owning the item.
        task_id -> Uuid,
        /// `CHECKED` or `UNCHECKED`.
        #[max_length = 20]
        action -> Varchar,
        /// Acting user.
        actor_id -> Uuid,
        /// Acting user's display name.
        actor_name -> Text,
        /// Optional reason.
        reason -> Nullable<Text>,
        /// When the flip was recorded.
        created_at -> Timestamptz,
    }
}
