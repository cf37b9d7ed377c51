//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the DDL in `ddl.rs` exactly. They are used by
//! Diesel for compile-time query validation and type-safe SQL generation.

diesel::table! {
    /// Purchasable insurance products, written once by the seed routine.
    insurance_plans (id) {
        id -> Int4,
        name -> Text,
        provider -> Text,
        base_price -> Int4,
        medical_coverage -> Int4,
        trip_cancellation -> Text,
        baggage_protection -> Int4,
        emergency_evacuation -> Nullable<Int4>,
        adventure_activities -> Bool,
        rental_car_coverage -> Nullable<Int4>,
        rating -> Nullable<Text>,
        reviews -> Nullable<Int4>,
        /// Destination the plan applies to, or `all`.
        country -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Append-only log of user actions against plans.
    plan_interactions (id) {
        id -> Int4,
        plan_id -> Int4,
        user_id -> Nullable<Text>,
        device_id -> Text,
        interaction_type -> Text,
        /// Server-generated event time.
        #[sql_name = "timestamp"]
        recorded_at -> Timestamptz,
        metadata -> Nullable<Jsonb>,
    }
}

diesel::joinable!(plan_interactions -> insurance_plans (plan_id));

diesel::allow_tables_to_appear_in_same_query!(insurance_plans, plan_interactions);
