//! Reliability scoring.
//!
//! The score is never stored: it is recomputed from the ledger on every read.
//!
//! ```text
//! score = clamp(100 + Σ status_adjustment − floor(total_debt / 100), 0, 100)
//! ```

use serde::{Deserialize, Serialize};

use crate::types::{Incident, IncidentStatus};

#[cfg(feature = "typescript")]
use ts_rs::TS;

/// Score of an empty ledger.
pub const BASE_SCORE: i64 = 100;

/// Upper bound of the score.
pub const MAX_SCORE: u8 = 100;

/// Debt units per point of penalty.
pub const DEBT_PER_POINT: f64 = 100.0;

/// Point adjustment contributed by an incident's status.
pub fn status_adjustment(status: IncidentStatus) -> i64 {
    match status {
        IncidentStatus::Reported => -15,
        IncidentStatus::Pending => -5,
        IncidentStatus::Verified => 2,
        IncidentStatus::Resolved => 0,
    }
}

/// Sum of incident amounts.
pub fn total_debt(incidents: &[Incident]) -> f64 {
    incidents.iter().map(|i| i.amount).sum()
}

/// Number of incidents still in the REPORTED state.
pub fn critical_count(incidents: &[Incident]) -> usize {
    incidents
        .iter()
        .filter(|i| i.status == IncidentStatus::Reported)
        .count()
}

/// Points lost to outstanding debt.
pub fn debt_penalty(total_debt: f64) -> i64 {
    if !total_debt.is_finite() || total_debt <= 0.0 {
        return if total_debt == f64::INFINITY { i64::MAX } else { 0 };
    }
    // Saturating float-to-int cast.
    (total_debt / DEBT_PER_POINT).floor() as i64
}

/// Compute the reliability score of a ledger, always within `0..=100`.
pub fn compute_score(incidents: &[Incident]) -> u8 {
    let adjustments: i64 = incidents.iter().map(|i| status_adjustment(i.status)).sum();
    let raw = BASE_SCORE
        .saturating_add(adjustments)
        .saturating_sub(debt_penalty(total_debt(incidents)));

    raw.clamp(0, MAX_SCORE as i64) as u8
}

/// Qualitative reading of a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScoreBand {
    /// 80 and above
    Reliable,
    /// 50 to 79
    Watch,
    /// Below 50, flagged as an at-risk profile
    AtRisk,
}

impl ScoreBand {
    pub fn of(score: u8) -> Self {
        match score {
            80.. => Self::Reliable,
            50..=79 => Self::Watch,
            _ => Self::AtRisk,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Reliable => "RELIABLE",
            Self::Watch => "WATCH",
            Self::AtRisk => "AT RISK",
        }
    }
}

/// Derived figures shown next to a ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct ScoreReport {
    pub score: u8,
    pub total_debt: f64,
    pub critical_count: usize,
    pub band: ScoreBand,
}

impl ScoreReport {
    pub fn from_incidents(incidents: &[Incident]) -> Self {
        let score = compute_score(incidents);
        Self {
            score,
            total_debt: total_debt(incidents),
            critical_count: critical_count(incidents),
            band: ScoreBand::of(score),
        }
    }
}
