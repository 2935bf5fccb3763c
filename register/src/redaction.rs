//! Public/owner projection of a citizen record.
//!
//! [`project`] builds what a renderer may show. In [`RedactionMode::Public`]
//! only amounts, dates, statuses and derived pseudonymous labels leave this
//! module; names, titles and descriptions are replaced. Projection never
//! touches stored data.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::scoring::ScoreReport;
use crate::types::{Incident, IncidentStatus, Profile};

#[cfg(feature = "typescript")]
use ts_rs::TS;

/// Shown instead of a description while redacted.
pub const REDACTION_MARKER: &str = "[REDACTED]";

/// Shown instead of the name when no public handle is available yet.
pub const HANDLE_PLACEHOLDER: &str = "LOADING...";

/// Prefix of the synthetic label replacing incident titles.
pub const LABEL_PREFIX: &str = "DOSSIER-";

/// Presentation mode of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "lowercase")]
pub enum RedactionMode {
    /// Identity hidden, financial figures visible
    #[default]
    Public,
    /// Everything visible, record editable
    Owner,
}

impl RedactionMode {
    pub fn is_redacted(&self) -> bool {
        matches!(self, Self::Public)
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Public => Self::Owner,
            Self::Owner => Self::Public,
        }
    }

    pub fn from_redacted(redacted: bool) -> Self {
        if redacted {
            Self::Public
        } else {
            Self::Owner
        }
    }
}

/// Identity portion of a projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct IdentityView {
    /// Name in owner mode, public handle (or placeholder) when redacted
    pub display_name: String,
    /// Only present in owner mode
    pub external_ref: Option<String>,
}

/// One incident as exposed to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct IncidentView {
    /// Real title, or a synthetic label when redacted
    pub title: String,
    /// Real description, or [`REDACTION_MARKER`] when redacted
    pub description: String,
    pub amount: f64,
    pub status: IncidentStatus,
    pub date: DateTime<Utc>,
    /// Only present in owner mode
    pub score_impact: Option<i32>,
    /// Id to pass to the delete action; only present in owner mode
    pub delete_handle: Option<String>,
}

/// Everything a renderer needs to draw a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct ViewModel {
    pub mode: RedactionMode,
    pub identity: IdentityView,
    pub incidents: Vec<IncidentView>,
    pub report: ScoreReport,
    /// Whether the owner may edit the profile
    pub editable: bool,
}

/// Deterministic pseudonymous label for an incident id.
pub fn incident_label(id: &str) -> String {
    let digest = Sha256::digest(id.as_bytes());
    format!("{}{}", LABEL_PREFIX, hex::encode_upper(&digest[..3]))
}

/// Project a profile and ledger for rendering.
pub fn project(profile: Option<&Profile>, incidents: &[Incident], mode: RedactionMode) -> ViewModel {
    let redacted = mode.is_redacted();

    let identity = if redacted {
        IdentityView {
            display_name: profile
                .map(|p| p.public_handle.clone())
                .filter(|h| !h.is_empty())
                .unwrap_or_else(|| HANDLE_PLACEHOLDER.to_string()),
            external_ref: None,
        }
    } else {
        IdentityView {
            display_name: profile
                .map(|p| p.name.clone())
                .unwrap_or_else(|| HANDLE_PLACEHOLDER.to_string()),
            external_ref: profile.map(|p| p.external_ref.clone()),
        }
    };

    ViewModel {
        mode,
        identity,
        incidents: incidents
            .iter()
            .map(|incident| project_incident(incident, redacted))
            .collect(),
        report: ScoreReport::from_incidents(incidents),
        editable: !redacted && profile.is_some(),
    }
}

fn project_incident(incident: &Incident, redacted: bool) -> IncidentView {
    if redacted {
        IncidentView {
            title: incident_label(&incident.id),
            description: REDACTION_MARKER.to_string(),
            amount: incident.amount,
            status: incident.status,
            date: incident.date,
            score_impact: None,
            delete_handle: None,
        }
    } else {
        IncidentView {
            title: incident.title.clone(),
            description: incident.description.clone(),
            amount: incident.amount,
            status: incident.status,
            date: incident.date,
            score_impact: Some(incident.score_impact),
            delete_handle: Some(incident.id.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> Profile {
        Profile {
            name: "Moreau, Thomas".to_string(),
            external_ref: "#8492-AX".to_string(),
            public_handle: "q7$Lm2!xPa".to_string(),
        }
    }

    fn ledger() -> Vec<Incident> {
        vec![
            Incident {
                id: "b2".to_string(),
                date: Utc::now(),
                title: "Missed repayment (Lydia)".to_string(),
                description: "Shared costs of 45 left unpaid".to_string(),
                amount: 45.0,
                status: IncidentStatus::Reported,
                score_impact: -12,
            },
            Incident {
                id: "a1".to_string(),
                date: Utc::now(),
                title: "Informal family debt".to_string(),
                description: "Loan declared by J. Moreau".to_string(),
                amount: 500.0,
                status: IncidentStatus::Pending,
                score_impact: -6,
            },
        ]
    }

    #[test]
    fn test_default_mode_is_public() {
        assert_eq!(RedactionMode::default(), RedactionMode::Public);
        assert!(RedactionMode::default().is_redacted());
        assert_eq!(RedactionMode::Public.toggled(), RedactionMode::Owner);
        assert_eq!(RedactionMode::from_redacted(false), RedactionMode::Owner);
    }

    #[test]
    fn test_public_projection_hides_identity() {
        let profile = profile();
        let incidents = ledger();
        let view = project(Some(&profile), &incidents, RedactionMode::Public);

        assert_eq!(view.identity.display_name, "q7$Lm2!xPa");
        assert!(view.identity.external_ref.is_none());
        assert!(!view.editable);

        for (projected, original) in view.incidents.iter().zip(&incidents) {
            assert!(projected.title.starts_with(LABEL_PREFIX));
            assert_ne!(projected.title, original.title);
            assert_eq!(projected.description, REDACTION_MARKER);
            assert_eq!(projected.amount, original.amount);
            assert_eq!(projected.status, original.status);
            assert_eq!(projected.date, original.date);
            assert!(projected.score_impact.is_none());
            assert!(projected.delete_handle.is_none());
        }

        let rendered = serde_json::to_string(&view).unwrap();
        assert!(!rendered.contains("Moreau"));
        assert!(!rendered.contains("Lydia"));
        assert!(!rendered.contains("family"));
    }

    #[test]
    fn test_owner_projection_passes_through() {
        let profile = profile();
        let incidents = ledger();
        let view = project(Some(&profile), &incidents, RedactionMode::Owner);

        assert_eq!(view.identity.display_name, "Moreau, Thomas");
        assert_eq!(view.identity.external_ref.as_deref(), Some("#8492-AX"));
        assert!(view.editable);
        assert_eq!(view.incidents[0].title, "Missed repayment (Lydia)");
        assert_eq!(view.incidents[1].description, "Loan declared by J. Moreau");
        assert_eq!(view.incidents[0].delete_handle.as_deref(), Some("b2"));
        assert_eq!(view.incidents[0].score_impact, Some(-12));
    }

    #[test]
    fn test_missing_profile_uses_placeholder() {
        let view = project(None, &ledger(), RedactionMode::Public);
        assert_eq!(view.identity.display_name, HANDLE_PLACEHOLDER);
        assert!(!view.editable);

        let owner_view = project(None, &[], RedactionMode::Owner);
        assert!(!owner_view.editable);
    }

    #[test]
    fn test_figures_identical_in_both_modes() {
        let profile = profile();
        let incidents = ledger();
        let public = project(Some(&profile), &incidents, RedactionMode::Public);
        let owner = project(Some(&profile), &incidents, RedactionMode::Owner);

        assert_eq!(public.report, owner.report);
        assert_eq!(public.report.total_debt, 545.0);
        assert_eq!(public.report.critical_count, 1);
    }

    #[test]
    fn test_labels_are_stable_and_distinct() {
        assert_eq!(incident_label("a1"), incident_label("a1"));
        assert_ne!(incident_label("a1"), incident_label("b2"));
        assert_eq!(incident_label("a1").len(), LABEL_PREFIX.len() + 6);
    }
}
