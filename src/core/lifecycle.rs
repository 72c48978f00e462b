//! Transaction lifecycle: `Idle -> Review -> Sign -> Submit -> Submitted |
//! Failed`. One tag is active at a time and the built transaction is
//! associated 1:1 with the current intent: it is cleared on reset and on
//! both terminal states, so a dispatched transaction can never be
//! resubmitted without rebuilding.
//!
//! Interactive signers (QR/deeplink) stream [`SignerEvent`]s over a channel:
//! zero or more `Pending` events followed by exactly one terminal event.
//! Silent signers skip `Sign` and go straight to `Submit`.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{error, warn};

/// One emission of an interactive signing round-trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SignerEvent {
    /// Out-of-band approval is required; payloads for rendering.
    Pending {
        #[serde(skip_serializing_if = "Option::is_none")]
        qr_image: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        deeplink: Option<String>,
    },
    Success { hash: String },
    Failed { message: String },
}

/// Current position in the transaction lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LifecycleTag {
    #[default]
    Idle,
    Review,
    Sign,
    Submit,
    Submitted { explorer_url: String },
    Failed { message: String },
}

impl LifecycleTag {
    pub fn is_terminal(&self) -> bool {
        matches!(self, LifecycleTag::Submitted { .. } | LifecycleTag::Failed { .. })
    }
}

/// Lifecycle state plus the built transaction it governs. `T` is the
/// chain-specific built form (extrinsic or ledger transaction).
#[derive(Debug, Clone, PartialEq)]
pub struct Lifecycle<T> {
    tag: LifecycleTag,
    built: Option<T>,
}

impl<T> Default for Lifecycle<T> {
    fn default() -> Self {
        Self {
            tag: LifecycleTag::Idle,
            built: None,
        }
    }
}

impl<T> Lifecycle<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tag(&self) -> &LifecycleTag {
        &self.tag
    }

    pub fn built(&self) -> Option<&T> {
        self.built.as_ref()
    }

    /// Enters review with a freshly built transaction, replacing any
    /// previous intent.
    pub fn review(&mut self, built: T) {
        self.tag = LifecycleTag::Review;
        self.built = Some(built);
    }

    /// Modal close or navigation away: clears the tag and the in-flight
    /// built transaction.
    pub fn reset(&mut self) {
        self.tag = LifecycleTag::Idle;
        self.built = None;
    }

    /// Silent signers go straight here from review.
    pub fn submitting(&mut self) {
        self.tag = LifecycleTag::Submit;
    }

    /// Terminal success. The built transaction is discarded; callers should
    /// trigger a balance/pool refetch.
    pub fn submitted(&mut self, explorer_url: String) {
        self.tag = LifecycleTag::Submitted { explorer_url };
        self.built = None;
    }

    /// Terminal failure, carrying the provider's message verbatim.
    pub fn failed(&mut self, message: String) {
        error!(message = %message, "transaction failed");
        self.tag = LifecycleTag::Failed { message };
        self.built = None;
    }

    /// Drives the tag through an interactive signing session. Pending
    /// events move the tag to `Sign` and are forwarded to `on_pending`
    /// (QR/deeplink rendering); the first terminal event decides the
    /// outcome and further events are not read. A channel that closes
    /// without a terminal event counts as a failure.
    pub async fn drive_signing(
        &mut self,
        mut events: mpsc::Receiver<SignerEvent>,
        explorer_url: impl Fn(&str) -> String,
        mut on_pending: impl FnMut(&SignerEvent),
    ) {
        while let Some(event) = events.recv().await {
            match event {
                SignerEvent::Pending { .. } => {
                    self.tag = LifecycleTag::Sign;
                    on_pending(&event);
                }
                SignerEvent::Success { hash } => {
                    self.tag = LifecycleTag::Submit;
                    self.submitted(explorer_url(&hash));
                    return;
                }
                SignerEvent::Failed { message } => {
                    self.failed(message);
                    return;
                }
            }
        }
        warn!("signer channel closed without a terminal event");
        self.failed("signing was cancelled".to_string());
    }
}
