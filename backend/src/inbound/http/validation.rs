//! Shared validation and query parsing helpers for inbound HTTP adapters.

use serde_json::json;

use crate::domain::{Error, InteractionType, PlanId};

/// Validation error codes carried in error envelope details.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ValidationCode {
    MissingField,
    InvalidInteger,
    InvalidEnum,
}

impl ValidationCode {
    fn as_str(self) -> &'static str {
        match self {
            Self::MissingField => "missing_field",
            Self::InvalidInteger => "invalid_integer",
            Self::InvalidEnum => "invalid_enum",
        }
    }
}

/// Newtype wrapper for HTTP field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub(crate) fn as_str(self) -> &'static str {
        self.0
    }
}

pub(crate) const PLAN_ID: FieldName = FieldName::new("planId");
pub(crate) const DEVICE_ID: FieldName = FieldName::new("deviceId");
pub(crate) const INTERACTION_TYPE: FieldName = FieldName::new("interactionType");

/// Build a 400 naming every missing required field.
pub(crate) fn missing_fields_error(fields: &[FieldName]) -> Error {
    let names: Vec<&str> = fields.iter().map(|field| field.as_str()).collect();
    Error::invalid_request(format!("Missing required fields: {}", names.join(", "))).with_details(
        json!({
            "fields": names,
            "code": ValidationCode::MissingField.as_str(),
        }),
    )
}

pub(crate) fn invalid_plan_id_error(field: FieldName, value: &str) -> Error {
    Error::invalid_request("Invalid plan ID").with_details(json!({
        "field": field.as_str(),
        "value": value,
        "code": ValidationCode::InvalidInteger.as_str(),
    }))
}

pub(crate) fn invalid_interaction_type_error(value: &str) -> Error {
    Error::invalid_request(format!(
        "Invalid interaction type. Must be one of: {}",
        InteractionType::accepted_values()
    ))
    .with_details(json!({
        "field": INTERACTION_TYPE.as_str(),
        "value": value,
        "code": ValidationCode::InvalidEnum.as_str(),
    }))
}

/// Parse a plan identifier from a path segment.
pub(crate) fn parse_plan_id(raw: &str, field: FieldName) -> Result<PlanId, Error> {
    raw.parse().map_err(|_| invalid_plan_id_error(field, raw))
}

/// Parse the leading integer of a query value, ignoring trailing text.
///
/// Values without leading digits, or outside `i32`, yield `None`.
pub(crate) fn lenient_int(raw: Option<&str>) -> Option<i32> {
    let trimmed = raw?.trim_start();
    let (sign, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => ("-", trimmed.get(1..)?),
        Some(b'+') => ("", trimmed.get(1..)?),
        _ => ("", trimmed),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let leading = digits.get(..end).filter(|value| !value.is_empty())?;
    format!("{sign}{leading}").parse().ok()
}

/// Present-only boolean: `Some(true)` only for the literal `"true"`.
pub(crate) fn present_flag(raw: Option<&str>) -> Option<bool> {
    raw.map(|value| value == "true")
}

/// First value supplied for `key` in a raw query; repeats are ignored.
///
/// Lenient endpoints extract `web::Query<Vec<(String, String)>>`, which
/// accepts repeated and unknown keys, and pick values out with this.
pub(crate) fn first_value(pairs: &[(String, String)], key: &str) -> Option<String> {
    pairs
        .iter()
        .find(|(name, _)| name == key)
        .map(|(_, value)| value.clone())
}

/// Treat blank strings as absent.
pub(crate) fn non_blank(raw: Option<String>) -> Option<String> {
    raw.filter(|value| !value.trim().is_empty())
}
