//! Advisory dialogue: an append-only transcript in front of an [`Advisor`].
//!
//! At most one request is in flight. A send made while another is pending is
//! ignored, not queued. Advisor failures never escape: they become a fixed
//! assistant turn.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::advisor::{Advisor, AdvisorError};
use crate::topic::Topic;

/// Appended when the advisor call fails.
pub const CONNECTION_LOST: &str = "CRITICAL ERROR: CONNECTION LOST.";

/// Appended when the advisor answers with nothing.
pub const INSUFFICIENT_DATA: &str = "ANALYSIS IMPOSSIBLE: INSUFFICIENT DATA.";

/// Greeting when no topic is selected.
pub const STANDBY_GREETING: &str = "STANDBY MODE ACTIVE.\n\nSelect a dossier to start a specific \
critique, or question the system as a whole.";

/// Greeting naming a selected topic.
pub fn topic_greeting(topic: &Topic) -> String {
    format!(
        "DOSSIER ANALYSIS: [{}]\n\nThe system is ready to deconstruct the assumptions of this dossier.",
        topic.title().to_uppercase()
    )
}

/// Who wrote a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Assistant,
}

/// One transcript entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub id: Uuid,
    pub role: TurnRole,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl Turn {
    fn new(role: TurnRole, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Why a send did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Text was empty after trimming
    Blank,
    /// Another request is in flight
    Busy,
}

/// Result of [`AdvisoryDialogue::send`].
#[derive(Debug, Clone, PartialEq)]
pub enum SendOutcome {
    /// The advisor answered; the reply is the last turn
    Answered(Turn),
    /// The advisor failed; a fixed-text turn was appended
    Failed(Turn),
    /// The topic changed while waiting; the reply was dropped
    Superseded,
    /// Nothing was appended
    Ignored(IgnoreReason),
}

/// Clears the busy flag however the send ends, including cancellation.
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Transcript plus the topic it is about.
pub struct AdvisoryDialogue {
    advisor: Arc<dyn Advisor>,
    topic: Mutex<Option<Topic>>,
    transcript: Mutex<Vec<Turn>>,
    busy: AtomicBool,
    /// Bumped on every topic change so late replies can be recognised
    epoch: AtomicU64,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl AdvisoryDialogue {
    /// Create a dialogue in standby.
    pub fn new(advisor: Arc<dyn Advisor>) -> Self {
        Self {
            advisor,
            topic: Mutex::new(None),
            transcript: Mutex::new(vec![Turn::new(TurnRole::Assistant, STANDBY_GREETING)]),
            busy: AtomicBool::new(false),
            epoch: AtomicU64::new(0),
        }
    }

    /// Create a dialogue about `topic`.
    pub fn with_topic(advisor: Arc<dyn Advisor>, topic: Topic) -> Self {
        let dialogue = Self::new(advisor);
        dialogue.select_topic(Some(topic));
        dialogue
    }

    /// Switch topic. The transcript is reset to a single greeting turn.
    pub fn select_topic(&self, topic: Option<Topic>) {
        let greeting = match &topic {
            Some(topic) => topic_greeting(topic),
            None => STANDBY_GREETING.to_string(),
        };
        debug!(topic = topic.as_ref().map(Topic::title), "Selecting advisory topic");

        let mut transcript = lock(&self.transcript);
        self.epoch.fetch_add(1, Ordering::AcqRel);
        *lock(&self.topic) = topic;
        *transcript = vec![Turn::new(TurnRole::Assistant, greeting)];
    }

    /// Currently selected topic.
    pub fn topic(&self) -> Option<Topic> {
        lock(&self.topic).clone()
    }

    /// Snapshot of the transcript, oldest first.
    pub fn transcript(&self) -> Vec<Turn> {
        lock(&self.transcript).clone()
    }

    /// Whether a request is in flight.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Send user text to the advisor.
    pub async fn send(&self, text: &str) -> SendOutcome {
        let text = text.trim();
        if text.is_empty() {
            return SendOutcome::Ignored(IgnoreReason::Blank);
        }
        self.exchange(Some(text)).await
    }

    /// Ask for an opening analysis of the current topic, with no user turn.
    pub async fn request_analysis(&self) -> SendOutcome {
        self.exchange(None).await
    }

    async fn exchange(&self, user_text: Option<&str>) -> SendOutcome {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("Advisor busy, ignoring send");
            return SendOutcome::Ignored(IgnoreReason::Busy);
        }
        let _guard = BusyGuard(&self.busy);

        let (epoch, topic) = {
            let mut transcript = lock(&self.transcript);
            if let Some(text) = user_text {
                transcript.push(Turn::new(TurnRole::User, text));
            }
            let topic = lock(&self.topic).clone().unwrap_or_else(Topic::general);
            (self.epoch.load(Ordering::Acquire), topic)
        };

        let result = self.advisor.generate(&topic, user_text).await;

        let (reply, failed) = match result {
            Ok(text) => (Turn::new(TurnRole::Assistant, text), false),
            Err(AdvisorError::EmptyCompletion { backend }) => {
                warn!(backend = %backend, "Advisor returned no text");
                (Turn::new(TurnRole::Assistant, INSUFFICIENT_DATA), false)
            }
            Err(e) => {
                warn!(error = %e, "Advisor call failed");
                (Turn::new(TurnRole::Assistant, CONNECTION_LOST), true)
            }
        };

        let mut transcript = lock(&self.transcript);
        if self.epoch.load(Ordering::Acquire) != epoch {
            debug!("Topic changed during request, dropping reply");
            return SendOutcome::Superseded;
        }
        transcript.push(reply.clone());

        if failed {
            SendOutcome::Failed(reply)
        } else {
            SendOutcome::Answered(reply)
        }
    }
}
