//! Insurance plan aggregate, filter criteria, and popularity ranking types.
//!
//! Plans are created once by the seed routine and are read-only afterwards,
//! so the types here only validate on construction and expose accessors.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Country sentinel meaning "matches any destination filter".
pub const ANY_COUNTRY: &str = "all";

/// Database-generated identifier of an insurance plan.
///
/// # Examples
/// ```
/// use briki_api::domain::PlanId;
///
/// let id: PlanId = "42".parse().expect("integer id");
/// assert_eq!(id.get(), 42);
/// assert!("forty-two".parse::<PlanId>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlanId(i32);

impl PlanId {
    /// Wrap a raw identifier.
    #[must_use]
    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    /// Return the raw identifier.
    #[must_use]
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for PlanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Raised when a textual plan identifier is not an integer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("plan id must be an integer, got {raw:?}")]
pub struct PlanIdParseError {
    raw: String,
}

impl FromStr for PlanId {
    type Err = PlanIdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i32>()
            .map(Self)
            .map_err(|_| PlanIdParseError { raw: s.to_owned() })
    }
}

/// Validation failures for plan attributes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanValidationError {
    /// A required text field is empty once trimmed.
    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },
    /// A price or coverage amount is negative.
    #[error("{field} must be non-negative, got {value}")]
    NegativeAmount { field: &'static str, value: i32 },
}

/// Descriptive attributes shared by new and persisted plans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanAttributes {
    pub name: String,
    pub provider: String,
    pub base_price: i32,
    pub medical_coverage: i32,
    pub trip_cancellation: String,
    pub baggage_protection: i32,
    pub emergency_evacuation: Option<i32>,
    pub adventure_activities: bool,
    pub rental_car_coverage: Option<i32>,
    pub rating: Option<String>,
    pub reviews: Option<i32>,
    pub country: String,
}

impl PlanAttributes {
    /// Check the text and amount invariants.
    ///
    /// # Errors
    /// Returns the first [`PlanValidationError`] encountered.
    pub fn validate(&self) -> Result<(), PlanValidationError> {
        require_text("name", &self.name)?;
        require_text("provider", &self.provider)?;
        require_text("country", &self.country)?;

        let amounts = [
            ("basePrice", Some(self.base_price)),
            ("medicalCoverage", Some(self.medical_coverage)),
            ("baggageProtection", Some(self.baggage_protection)),
            ("emergencyEvacuation", self.emergency_evacuation),
            ("rentalCarCoverage", self.rental_car_coverage),
            ("reviews", self.reviews),
        ];
        for (field, value) in amounts {
            if let Some(value) = value.filter(|amount| *amount < 0) {
                return Err(PlanValidationError::NegativeAmount { field, value });
            }
        }
        Ok(())
    }

    /// Whether the plan applies to every destination.
    #[must_use]
    pub fn covers_any_country(&self) -> bool {
        self.country == ANY_COUNTRY
    }
}

fn require_text(field: &'static str, value: &str) -> Result<(), PlanValidationError> {
    if value.trim().is_empty() {
        return Err(PlanValidationError::EmptyField { field });
    }
    Ok(())
}

/// A plan that has not been persisted yet (used by seeding).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewInsurancePlan {
    attributes: PlanAttributes,
}

impl NewInsurancePlan {
    /// Validate and wrap the attributes.
    ///
    /// # Errors
    /// Returns [`PlanValidationError`] when an invariant is violated.
    pub fn new(attributes: PlanAttributes) -> Result<Self, PlanValidationError> {
        attributes.validate()?;
        Ok(Self { attributes })
    }

    /// Borrow the plan attributes.
    #[must_use]
    pub fn attributes(&self) -> &PlanAttributes {
        &self.attributes
    }
}

/// A persisted insurance plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsurancePlan {
    id: PlanId,
    attributes: PlanAttributes,
    created_at: DateTime<Utc>,
}

impl InsurancePlan {
    /// Build a plan from persisted values.
    ///
    /// # Errors
    /// Returns [`PlanValidationError`] when stored values violate an invariant.
    pub fn new(
        id: PlanId,
        attributes: PlanAttributes,
        created_at: DateTime<Utc>,
    ) -> Result<Self, PlanValidationError> {
        attributes.validate()?;
        Ok(Self {
            id,
            attributes,
            created_at,
        })
    }

    #[must_use]
    pub fn id(&self) -> PlanId {
        self.id
    }

    #[must_use]
    pub fn attributes(&self) -> &PlanAttributes {
        &self.attributes
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Optional criteria accepted by the plan filter endpoint.
///
/// Only `destination`, `include_adventure_activities` and
/// `min_medical_coverage` constrain results. The remaining fields are parsed
/// and carried so callers keep a stable contract, but have no agreed
/// semantics yet and are never applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlanFilter {
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub age: Option<i32>,
    pub travelers_count: Option<i32>,
    pub min_medical_coverage: Option<i32>,
    pub include_adventure_activities: Option<bool>,
}

impl PlanFilter {
    /// Test a plan against the applied predicates.
    #[must_use]
    pub fn matches(&self, plan: &InsurancePlan) -> bool {
        let attrs = plan.attributes();
        let destination_ok = self
            .destination
            .as_deref()
            .is_none_or(|dest| attrs.country == dest || attrs.covers_any_country());
        let adventure_ok = self
            .include_adventure_activities
            .is_none_or(|wanted| attrs.adventure_activities == wanted);
        let coverage_ok = self
            .min_medical_coverage
            .is_none_or(|min| attrs.medical_coverage >= min);
        destination_ok && adventure_ok && coverage_ok
    }

    /// Names of criteria that were supplied but are not applied.
    ///
    /// # Examples
    /// ```
    /// use briki_api::domain::PlanFilter;
    ///
    /// let filter = PlanFilter {
    ///     origin: Some("Bogota".to_owned()),
    ///     include_adventure_activities: Some(true),
    ///     ..PlanFilter::default()
    /// };
    /// assert_eq!(filter.unapplied_criteria(), vec!["origin"]);
    /// ```
    #[must_use]
    pub fn unapplied_criteria(&self) -> Vec<&'static str> {
        [
            ("origin", self.origin.is_some()),
            ("startDate", self.start_date.is_some()),
            ("endDate", self.end_date.is_some()),
            ("age", self.age.is_some()),
            ("travelersCount", self.travelers_count.is_some()),
        ]
        .into_iter()
        .filter_map(|(name, present)| present.then_some(name))
        .collect()
    }
}

/// Maximum number of plans returned by the popularity ranking.
pub const MAX_POPULAR_LIMIT: i64 = 50;

/// Number of plans returned by the popularity ranking.
///
/// # Examples
/// ```
/// use briki_api::domain::PopularLimit;
///
/// assert_eq!(PopularLimit::default().get(), 5);
/// assert_eq!(PopularLimit::from_requested(0).get(), 5);
/// assert_eq!(PopularLimit::from_requested(1_000).get(), 50);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PopularLimit(i64);

/// Plans returned when no usable limit is requested.
pub const DEFAULT_POPULAR_LIMIT: i64 = 5;

impl PopularLimit {
    /// Interpret a requested limit. Values below 1 fall back to the default;
    /// larger values are capped at [`MAX_POPULAR_LIMIT`].
    #[must_use]
    pub fn from_requested(requested: i64) -> Self {
        if requested < 1 {
            Self::default()
        } else {
            Self(requested.min(MAX_POPULAR_LIMIT))
        }
    }

    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl Default for PopularLimit {
    fn default() -> Self {
        Self(DEFAULT_POPULAR_LIMIT)
    }
}

/// A plan together with its recorded interaction count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopularPlan {
    pub plan: InsurancePlan,
    pub interaction_count: i64,
}
