//! Embedded DDL creating the plan tables.
//!
//! Statements are idempotent so they can run on every start.

/// Create both tables and the indexes backing the interaction lookups.
pub(crate) const CREATE_SCHEMA: &str = r"
CREATE TABLE IF NOT EXISTS insurance_plans (
    id SERIAL PRIMARY KEY,
    name TEXT NOT NULL,
    provider TEXT NOT NULL,
    base_price INTEGER NOT NULL CHECK (base_price >= 0),
    medical_coverage INTEGER NOT NULL CHECK (medical_coverage >= 0),
    trip_cancellation TEXT NOT NULL,
    baggage_protection INTEGER NOT NULL CHECK (baggage_protection >= 0),
    emergency_evacuation INTEGER CHECK (emergency_evacuation >= 0),
    adventure_activities BOOLEAN NOT NULL DEFAULT FALSE,
    rental_car_coverage INTEGER CHECK (rental_car_coverage >= 0),
    rating TEXT,
    reviews INTEGER DEFAULT 0 CHECK (reviews >= 0),
    country TEXT NOT NULL DEFAULT 'all',
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE TABLE IF NOT EXISTS plan_interactions (
    id SERIAL PRIMARY KEY,
    plan_id INTEGER NOT NULL REFERENCES insurance_plans(id),
    user_id TEXT,
    device_id TEXT NOT NULL,
    interaction_type TEXT NOT NULL,
    timestamp TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    metadata JSONB
);

CREATE INDEX IF NOT EXISTS plan_interactions_plan_id_idx
    ON plan_interactions (plan_id);
CREATE INDEX IF NOT EXISTS plan_interactions_device_id_idx
    ON plan_interactions (device_id);
CREATE INDEX IF NOT EXISTS plan_interactions_user_id_idx
    ON plan_interactions (user_id);
";

/// Advisory lock key serialising schema creation and seeding across
/// processes.
pub(crate) const CATALOGUE_LOCK_KEY: i64 = 0x6272_696b_6900_0001;

/// Take the catalogue lock for the rest of the current transaction.
pub(crate) const ACQUIRE_CATALOGUE_LOCK: &str = "SELECT pg_advisory_xact_lock($1)";

/// Plans ranked by interaction count. Plans without interactions are
/// excluded by the inner join.
pub(crate) const POPULAR_PLANS: &str = r"
SELECT p.*, COUNT(i.id) AS interaction_count
FROM insurance_plans p
INNER JOIN plan_interactions i ON i.plan_id = p.id
GROUP BY p.id
ORDER BY interaction_count DESC, p.id ASC
LIMIT $1
";
