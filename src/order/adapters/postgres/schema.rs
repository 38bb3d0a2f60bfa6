//! Diesel schema for order lifecycle persistence.

diesel::table! {
    /// Service orders.
    orders (id) {
        /// Internal order identifier.
        id -> Uuid,
        /// Optional external order code.
        #[max_length = 100]
        code -> Nullable<Text>,
        /// Project or voucher reference.
        #[max_length = 255]
        reference -> Text,
        /// Equipment model.
        #[max_length = 255]
        equipment -> Text,
        /// Requested service.
        service_description -> Text,
        /// Optional operating-system image label.
        #[max_length = 100]
        system_image -> Nullable<Text>,
        /// Requested machine count.
        quantity -> Int4,
        /// Lookup code from `order_statuses`.
        status_code -> Int2,
        /// Urgent flag.
        urgent -> Bool,
        /// Persisted queue priority.
        priority -> Int4,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// First entry into a terminal status.
        concluded_at -> Nullable<Timestamptz>,
        /// Identity of the last editor.
        #[max_length = 120]
        last_modified_by -> Text,
    }
}

diesel::table! {
    /// Append-only status history.
    order_status_history (id) {
        /// Surrogate key preserving insertion order.
        id -> Int8,
        /// Owning order.
        order_id -> Uuid,
        /// Status before the change; null marks creation.
        previous_status_code -> Nullable<Int2>,
        /// Status after the change.
        new_status_code -> Int2,
        /// Change timestamp.
        changed_at -> Timestamptz,
        /// Identity performing the change.
        #[max_length = 120]
        changed_by -> Text,
    }
}
