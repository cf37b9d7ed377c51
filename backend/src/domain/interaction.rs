//! Plan interaction events: what a user or device did with a plan.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::PlanId;

/// Kind of action recorded against a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionType {
    View,
    Selection,
    Comparison,
    CheckoutStart,
    CheckoutComplete,
}

impl InteractionType {
    /// Every accepted interaction type, in display order.
    pub const ALL: [Self; 5] = [
        Self::View,
        Self::Selection,
        Self::Comparison,
        Self::CheckoutStart,
        Self::CheckoutComplete,
    ];

    /// Stored and wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Selection => "selection",
            Self::Comparison => "comparison",
            Self::CheckoutStart => "checkout_start",
            Self::CheckoutComplete => "checkout_complete",
        }
    }

    /// Comma-separated list of accepted values for error messages.
    ///
    /// # Examples
    /// ```
    /// use briki_api::domain::InteractionType;
    ///
    /// assert_eq!(
    ///     InteractionType::accepted_values(),
    ///     "view, selection, comparison, checkout_start, checkout_complete"
    /// );
    /// ```
    #[must_use]
    pub fn accepted_values() -> String {
        Self::ALL
            .iter()
            .map(|kind| kind.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for InteractionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when an interaction type is not one of the accepted values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown interaction type {raw:?}")]
pub struct UnknownInteractionType {
    raw: String,
}

impl FromStr for InteractionType {
    type Err = UnknownInteractionType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownInteractionType { raw: s.to_owned() })
    }
}

/// Validation failures for interaction identity fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InteractionValidationError {
    #[error("device id must not be empty")]
    EmptyDeviceId,
    #[error("at least one of user id or device id is required")]
    MissingSubject,
}

/// Anonymous device identifier attached to every interaction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeviceId(String);

impl DeviceId {
    /// Validate and wrap a device identifier.
    ///
    /// # Errors
    /// Returns [`InteractionValidationError::EmptyDeviceId`] when blank.
    pub fn new(raw: impl Into<String>) -> Result<Self, InteractionValidationError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(InteractionValidationError::EmptyDeviceId);
        }
        Ok(Self(raw))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for DeviceId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Identity used to look up interaction history.
///
/// Matching is inclusive: a row matches when its user id equals `user_id`
/// or its device id equals `device_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractionSubject {
    user_id: Option<String>,
    device_id: Option<String>,
}

impl InteractionSubject {
    /// Build a subject from optional identifiers; blank values count as
    /// absent.
    ///
    /// # Errors
    /// Returns [`InteractionValidationError::MissingSubject`] when neither
    /// identifier is present.
    ///
    /// # Examples
    /// ```
    /// use briki_api::domain::InteractionSubject;
    ///
    /// assert!(InteractionSubject::new(None, Some("device-1".into())).is_ok());
    /// assert!(InteractionSubject::new(Some(String::new()), None).is_err());
    /// ```
    pub fn new(
        user_id: Option<String>,
        device_id: Option<String>,
    ) -> Result<Self, InteractionValidationError> {
        let user_id = user_id.filter(|value| !value.trim().is_empty());
        let device_id = device_id.filter(|value| !value.trim().is_empty());
        if user_id.is_none() && device_id.is_none() {
            return Err(InteractionValidationError::MissingSubject);
        }
        Ok(Self { user_id, device_id })
    }

    #[must_use]
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    #[must_use]
    pub fn device_id(&self) -> Option<&str> {
        self.device_id.as_deref()
    }

    /// Whether a recorded interaction belongs to this subject.
    #[must_use]
    pub fn matches(&self, interaction: &PlanInteraction) -> bool {
        let user_match = self
            .user_id()
            .is_some_and(|user| interaction.user_id.as_deref() == Some(user));
        let device_match = self
            .device_id()
            .is_some_and(|device| interaction.device_id.as_str() == device);
        user_match || device_match
    }
}

/// Interaction event to be recorded.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPlanInteraction {
    pub plan_id: PlanId,
    pub device_id: DeviceId,
    pub interaction_type: InteractionType,
    pub user_id: Option<String>,
    pub metadata: Option<Value>,
}

/// Interaction event as stored.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanInteraction {
    pub id: i32,
    pub plan_id: PlanId,
    pub user_id: Option<String>,
    pub device_id: DeviceId,
    pub interaction_type: InteractionType,
    pub recorded_at: DateTime<Utc>,
    pub metadata: Option<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("view", Some(InteractionType::View))]
    #[case("checkout_start", Some(InteractionType::CheckoutStart))]
    #[case("checkout_complete", Some(InteractionType::CheckoutComplete))]
    #[case("VIEW", None)]
    #[case("bogus", None)]
    fn interaction_type_parsing(#[case] raw: &str, #[case] expected: Option<InteractionType>) {
        assert_eq!(raw.parse::<InteractionType>().ok(), expected);
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_value(InteractionType::CheckoutComplete).expect("serialise");
        assert_eq!(json, serde_json::json!("checkout_complete"));
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn blank_device_ids_are_rejected(#[case] raw: &str) {
        assert_eq!(
            DeviceId::new(raw),
            Err(InteractionValidationError::EmptyDeviceId)
        );
    }

    fn interaction(user_id: Option<&str>, device_id: &str) -> PlanInteraction {
        PlanInteraction {
            id: 1,
            plan_id: PlanId::new(1),
            user_id: user_id.map(str::to_owned),
            device_id: DeviceId::new(device_id).expect("device id"),
            interaction_type: InteractionType::View,
            recorded_at: Utc::now(),
            metadata: None,
        }
    }

    #[rstest]
    #[case(Some("u1"), None, Some("u1"), "d9", true)]
    #[case(None, Some("d1"), None, "d1", true)]
    #[case(Some("u1"), Some("d1"), Some("u2"), "d1", true)]
    #[case(Some("u1"), Some("d1"), None, "d2", false)]
    fn subject_matching_is_inclusive(
        #[case] user: Option<&str>,
        #[case] device: Option<&str>,
        #[case] row_user: Option<&str>,
        #[case] row_device: &str,
        #[case] expected: bool,
    ) {
        let subject = InteractionSubject::new(user.map(str::to_owned), device.map(str::to_owned))
            .expect("subject");
        assert_eq!(subject.matches(&interaction(row_user, row_device)), expected);
    }

    #[test]
    fn subject_requires_an_identifier() {
        assert_eq!(
            InteractionSubject::new(None, Some("  ".to_owned())),
            Err(InteractionValidationError::MissingSubject)
        );
    }
}
