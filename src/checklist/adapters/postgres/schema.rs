//! Diesel schema for checklist items.

diesel::table! {
    /// Checklist entries attached to tasks.
    checklist_items (id) {
        /// Item identifier.
        id -> Uuid,
        /// Owning task.
        task_id -> Uuid,
        /// Item text.
        text -> Text,
        /// Whether completion is mandatory.
        is_mandatory -> Bool,
        /// Whether the item is checked.
        is_completed -> Bool,
        /// Who last checked the item.
        completed_by -> Nullable<Uuid>,
        /// When the item was last checked.
        completed_at -> Nullable<Timestamptz>,
        /// Who last unchecked the item.
        unchecked_by -> Nullable<Uuid>,
        /// Why the item was last unchecked.
        unchecked_reason -> Nullable<Text>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
