//! Diesel schema for the tracker tables.

diesel::table! {
    /// Board records.
    boards (id) {
        /// Board rowid.
        id -> BigInt,
        /// Board name.
        name -> Text,
    }
}

diesel::table! {
    /// Cards-list records. The global archived list has a null board.
    card_lists (id) {
        /// List rowid.
        id -> BigInt,
        /// List name.
        name -> Text,
        /// Owning board rowid, null for the archived list.
        board_id -> Nullable<BigInt>,
    }
}

diesel::table! {
    /// Card records.
    cards (id) {
        /// Card rowid.
        id -> BigInt,
        /// Card name.
        name -> Text,
        /// Task description.
        description -> Text,
        /// Creating user.
        user_id -> BigInt,
        /// Assigned user, if any.
        assignee_id -> Nullable<BigInt>,
        /// Expiration timestamp, if any.
        expiration_date -> Nullable<TimestamptzSqlite>,
        /// Priority as its canonical numeric value.
        priority -> Integer,
        /// Containing list rowid.
        list_id -> BigInt,
        /// Creation timestamp.
        created_at -> TimestamptzSqlite,
        /// Last-modification timestamp.
        last_modified_at -> TimestamptzSqlite,
    }
}

diesel::table! {
    /// Tag records.
    tags (id) {
        /// Tag rowid.
        id -> BigInt,
        /// Tag name.
        name -> Text,
        /// Display color, if any.
        color -> Nullable<Integer>,
    }
}

diesel::table! {
    /// Card-to-tag links.
    card_tags (card_id, tag_id) {
        /// Linked card rowid.
        card_id -> BigInt,
        /// Linked tag rowid.
        tag_id -> BigInt,
    }
}

diesel::table! {
    /// Parent-to-child card links.
    card_children (parent_id, child_id) {
        /// Parent card rowid.
        parent_id -> BigInt,
        /// Child card rowid.
        child_id -> BigInt,
    }
}

diesel::table! {
    /// Recurrence plans, at most one per card.
    plans (id) {
        /// Plan rowid.
        id -> BigInt,
        /// Owning card rowid.
        card_id -> BigInt,
        /// Recurrence interval in whole seconds.
        interval_seconds -> BigInt,
        /// Timestamp of the most recent materialized occurrence.
        last_created_at -> TimestamptzSqlite,
    }
}

diesel::table! {
    /// Explicit access rows for (object, user) pairs.
    access_rights (object_kind, object_id, user_id) {
        /// Kind of the guarded object.
        object_kind -> Text,
        /// Rowid of the guarded object.
        object_id -> BigInt,
        /// The user the row applies to.
        user_id -> BigInt,
        /// Permission bits.
        access -> Integer,
    }
}

diesel::allow_tables_to_appear_in_same_query!(
    boards,
    card_lists,
    cards,
    tags,
    card_tags,
    card_children,
    plans,
    access_rights,
);
