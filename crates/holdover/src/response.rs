//! The outgoing result/response channel.
//!
//! Every host instance delivers exactly one [`DialogResponse`] on its terminal
//! transition. The response carries the result code of the last interactive
//! action, the dialog identifier, the caller's parameters echoed back
//! unchanged, and any payload the interaction or a
//! [`ResponseCollector`](crate::ResponseCollector) produced.

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

/// Opaque key-value payload attached to requests and responses.
///
/// Callers put whatever they need in here; the host never inspects it and
/// echoes it back verbatim in the terminal response.
pub type Params = serde_json::Map<String, serde_json::Value>;

/// What ended the dialog.
///
/// `Custom` codes come from a [`ResponseCollector`](crate::ResponseCollector)
/// that wants to report something richer than the built-in interactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResultCode {
    /// Dismissed without a decision: outside tap, back press, or remote
    /// dismissal.
    Cancelled,
    /// The positive button was clicked.
    PositiveButton,
    /// The negative button was clicked.
    NegativeButton,
    /// The neutral button was clicked.
    NeutralButton,
    /// An entry of the single-choice list was selected.
    SingleChoice,
    /// An entry of the multi-choice list was toggled.
    MultiChoice,
    /// An entry of the plain item list was clicked.
    PlainChoice,
    /// Caller-defined code supplied by a response collector.
    Custom(i32),
}

impl ResultCode {
    /// Returns true for the cancelled code.
    pub fn is_cancelled(self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// The single message a host delivers when it terminates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogResponse {
    /// Result code of the last interactive action.
    pub code: ResultCode,
    /// Identifier of the dialog that produced this response.
    pub identifier: String,
    /// Caller parameters, echoed back unchanged. Empty when none were given.
    #[serde(default)]
    pub params: Params,
    /// Selected index, when the last action touched a list or a button.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub which: Option<usize>,
    /// Checked state, when the last action toggled a multi-choice entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checked: Option<bool>,
    /// Structured payload produced by a response collector.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responses: Option<Params>,
}

impl DialogResponse {
    /// The response every host starts from: cancelled, identifier and
    /// parameters filled in, no interaction payload.
    pub(crate) fn basic(identifier: &str, params: Option<&Params>) -> Self {
        Self {
            code: ResultCode::Cancelled,
            identifier: identifier.to_string(),
            params: params.cloned().unwrap_or_default(),
            which: None,
            checked: None,
            responses: None,
        }
    }

    /// Returns true if the dialog ended without a decision.
    pub fn is_cancelled(&self) -> bool {
        self.code.is_cancelled()
    }
}

/// Where the terminal response goes.
///
/// The sink is handed over at host creation and consumed on delivery, so a
/// host can never emit more than one response. Any `FnOnce(DialogResponse)`
/// closure is a sink:
///
/// ```
/// use holdover::{DialogResponse, ResponseSink};
///
/// let sink: Box<dyn ResponseSink> =
///     Box::new(|response: DialogResponse| println!("{}", response.identifier));
/// # let _ = sink;
/// ```
pub trait ResponseSink {
    /// Deliver the terminal response, consuming the sink.
    fn deliver(self: Box<Self>, response: DialogResponse);
}

impl<F: FnOnce(DialogResponse)> ResponseSink for F {
    fn deliver(self: Box<Self>, response: DialogResponse) {
        (*self)(response)
    }
}

/// In-memory sink for tests and examples.
///
/// Clones share the same backing store, so a test can keep one handle and
/// give the host another.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    delivered: Arc<Mutex<Vec<DialogResponse>>>,
}

impl RecordingSink {
    /// Create an empty recording sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// A boxed sink delivering into this recorder.
    pub fn sink(&self) -> Box<dyn ResponseSink> {
        let delivered = Arc::clone(&self.delivered);
        Box::new(move |response: DialogResponse| {
            delivered.lock().expect("lock poisoned").push(response);
        })
    }

    /// Number of responses delivered so far.
    pub fn count(&self) -> usize {
        self.delivered.lock().expect("lock poisoned").len()
    }

    /// Snapshot of all delivered responses.
    pub fn responses(&self) -> Vec<DialogResponse> {
        self.delivered.lock().expect("lock poisoned").clone()
    }

    /// Remove and return all delivered responses.
    pub fn take(&self) -> Vec<DialogResponse> {
        std::mem::take(&mut *self.delivered.lock().expect("lock poisoned"))
    }
}
