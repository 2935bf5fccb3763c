//! Core data model for the trust register.
//!
//! Records are serialized with camelCase keys and upper-case enum names so the
//! persisted layout matches what the browser front end stored.
//!
//! With the `typescript` feature enabled, these types can be exported to TypeScript
//! using ts-rs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[cfg(feature = "typescript")]
use ts_rs::TS;

/// Pseudonym substituted for profiles persisted before handles existed.
pub const LEGACY_HANDLE_FALLBACK: &str = "CITIZEN-LEGACY";

fn legacy_handle() -> String {
    LEGACY_HANDLE_FALLBACK.to_string()
}

/// The citizen identity held by the register.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// Display name, editable by the owner
    pub name: String,
    /// External reference shown on the record, e.g. `#8492-AX`
    pub external_ref: String,
    /// Stable pseudonym shown in the public view
    #[serde(default = "legacy_handle")]
    pub public_handle: String,
}

/// Lifecycle status of an incident.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IncidentStatus {
    /// Reported by a third party, not yet confirmed
    #[default]
    Reported,
    /// Confirmed by the counterparty
    Verified,
    /// Awaiting resolution
    Pending,
    /// Settled
    Resolved,
}

impl IncidentStatus {
    /// Upper-case label used in rendered output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Reported => "REPORTED",
            Self::Verified => "VERIFIED",
            Self::Pending => "PENDING",
            Self::Resolved => "RESOLVED",
        }
    }

    pub fn all() -> [Self; 4] {
        [Self::Reported, Self::Verified, Self::Pending, Self::Resolved]
    }
}

impl std::fmt::Display for IncidentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for IncidentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown incident status: {s}"))
    }
}

/// A recorded debt or claim affecting the reliability score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct Incident {
    /// Opaque unique identifier
    pub id: String,
    /// When the incident was recorded
    pub date: DateTime<Utc>,
    pub title: String,
    pub description: String,
    /// Amount owed, never negative
    pub amount: f64,
    pub status: IncidentStatus,
    /// Cosmetic point impact shown next to the entry; the score is recomputed
    /// independently of this value.
    pub score_impact: i32,
}

impl Incident {
    /// One-line description of the financial impact, free of identifying text.
    pub fn impact_summary(&self) -> String {
        format!(
            "Analyse this incident: an amount of {:.2} with status {} is published on the register \
             and cost {} points of reliability. Is this proportionate?",
            self.amount,
            self.status,
            self.score_impact.abs()
        )
    }
}

/// User-supplied fields for a new incident.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IncidentInput {
    pub title: String,
    /// Raw amount; invalid or absent values become 0
    pub amount: Option<f64>,
    pub description: String,
    /// Defaults to [`IncidentStatus::Reported`]
    pub status: Option<IncidentStatus>,
}

impl IncidentInput {
    /// Create input with a title.
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Set the amount.
    pub fn with_amount(mut self, amount: f64) -> Self {
        self.amount = Some(amount);
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the status.
    pub fn with_status(mut self, status: IncidentStatus) -> Self {
        self.status = Some(status);
        self
    }
}

/// Coerce a raw amount to a finite, non-negative number.
pub fn sanitize_amount(amount: Option<f64>) -> f64 {
    match amount {
        Some(value) if value.is_finite() && value > 0.0 => value,
        _ => 0.0,
    }
}

/// Parse a textual amount, falling back to 0 for anything unparsable.
pub fn coerce_amount(raw: &str) -> f64 {
    sanitize_amount(raw.trim().replace(',', ".").parse::<f64>().ok())
}

/// How the user signed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthMethod {
    Google,
    Facebook,
    Anonymous,
}

impl AuthMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Google => "GOOGLE",
            Self::Facebook => "FACEBOOK",
            Self::Anonymous => "ANONYMOUS",
        }
    }

    /// Whether this method carries a federated identity.
    pub fn is_federated(&self) -> bool {
        !matches!(self, Self::Anonymous)
    }

    /// Display name given to a profile created through this method.
    pub fn default_display_name(&self) -> &'static str {
        match self {
            Self::Google => "Google Citizen",
            Self::Facebook => "Facebook Citizen",
            Self::Anonymous => "Guest",
        }
    }
}

impl std::fmt::Display for AuthMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AuthMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GOOGLE" => Ok(Self::Google),
            "FACEBOOK" => Ok(Self::Facebook),
            "ANONYMOUS" | "GUEST" => Ok(Self::Anonymous),
            other => Err(format!("unknown login method: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_coercion() {
        assert_eq!(sanitize_amount(None), 0.0);
        assert_eq!(sanitize_amount(Some(-12.0)), 0.0);
        assert_eq!(sanitize_amount(Some(f64::NAN)), 0.0);
        assert_eq!(sanitize_amount(Some(f64::INFINITY)), 0.0);
        assert_eq!(sanitize_amount(Some(45.5)), 45.5);

        assert_eq!(coerce_amount("200"), 200.0);
        assert_eq!(coerce_amount(" 12,50 "), 12.5);
        assert_eq!(coerce_amount("lots"), 0.0);
        assert_eq!(coerce_amount(""), 0.0);
    }

    #[test]
    fn test_legacy_profile_gets_fallback_handle() {
        let json = r##"{"name":"Moreau, Thomas","externalRef":"#8492-AX"}"##;
        let profile: Profile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.public_handle, LEGACY_HANDLE_FALLBACK);
        assert_eq!(profile.external_ref, "#8492-AX");
    }

    #[test]
    fn test_incident_wire_shape() {
        let incident = Incident {
            id: "abc".to_string(),
            date: Utc::now(),
            title: "Rent".to_string(),
            description: "Landlord".to_string(),
            amount: 200.0,
            status: IncidentStatus::Pending,
            score_impact: -7,
        };

        let value = serde_json::to_value(&incident).unwrap();
        assert_eq!(value["status"], "PENDING");
        assert_eq!(value["scoreImpact"], -7);
    }

    #[test]
    fn test_status_and_method_parsing() {
        assert_eq!("verified".parse::<IncidentStatus>(), Ok(IncidentStatus::Verified));
        assert!("settled".parse::<IncidentStatus>().is_err());
        assert_eq!("Google".parse::<AuthMethod>(), Ok(AuthMethod::Google));
        assert_eq!("guest".parse::<AuthMethod>(), Ok(AuthMethod::Anonymous));
        assert!(!AuthMethod::Anonymous.is_federated());
    }

    #[test]
    fn test_impact_summary_omits_identifying_text() {
        let incident = Incident {
            id: "abc".to_string(),
            date: Utc::now(),
            title: "Loan from J. Moreau".to_string(),
            description: "Family loan".to_string(),
            amount: 500.0,
            status: IncidentStatus::Reported,
            score_impact: -12,
        };

        let summary = incident.impact_summary();
        assert!(summary.contains("500.00"));
        assert!(summary.contains("REPORTED"));
        assert!(summary.contains("12 points"));
        assert!(!summary.contains("Moreau"));
    }
}
