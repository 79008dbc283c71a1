//! Dialog configuration, show requests, and the persisted snapshot.
//!
//! A [`ShowRequest`] is what callers hand to the runtime to get a dialog on
//! screen. The host turns it into a [`DialogConfig`], the snapshot of record
//! that survives recreation: every field round-trips losslessly through
//! [`Snapshot`] so a rebuilt host is indistinguishable from the original.

use serde::{Deserialize, Serialize};

use crate::content::DialogContent;
use crate::error::HostError;
use crate::response::Params;

/// Theme value meaning "use the default style".
pub const DEFAULT_THEME: u32 = 0;

/// The configuration a host owns for its whole life.
///
/// Created from the initial [`ShowRequest`] or reconstructed from a persisted
/// [`Snapshot`]; mutated only by the restore step, never by UI code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogConfig {
    /// Globally unique name of this dialog instance while it is active.
    pub identifier: String,
    /// Opaque handle the content vault resolves to a content object.
    pub provider_id: Option<String>,
    /// Whether outside taps and back presses dismiss the dialog.
    pub cancelable: bool,
    /// Pass-through style resource id; [`DEFAULT_THEME`] means no override.
    pub theme: u32,
    /// Caller payload, echoed back unchanged in the terminal response.
    pub params: Option<Params>,
    /// True only across a destroy/recreate pair with a native alert attached.
    pub reborn: bool,
}

impl DialogConfig {
    /// Encode this configuration for persistence.
    pub fn to_snapshot(&self) -> Result<Snapshot, HostError> {
        Ok(Snapshot(serde_json::to_value(self)?))
    }

    /// Reconstruct a configuration from a persisted snapshot.
    pub fn from_snapshot(snapshot: &Snapshot) -> Result<Self, HostError> {
        Ok(serde_json::from_value(snapshot.0.clone())?)
    }
}

/// Opaque persisted form of a [`DialogConfig`].
///
/// Written by [`DialogHost::save_state`](crate::DialogHost::save_state)
/// before any teardown; the runtime adapter stores it wherever its platform
/// keeps instance state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot(serde_json::Value);

/// A caller's request to show a dialog.
///
/// Content is supplied either embedded (moved into the host) or as a vault
/// handle resolved at first creation:
///
/// ```
/// use holdover::{BasicAlertContent, ShowRequest};
///
/// let request = ShowRequest::new("confirm-delete")
///     .content(
///         BasicAlertContent::new()
///             .message("Delete 3 items?")
///             .positive_text("Delete")
///             .negative_text("Keep"),
///     )
///     .cancelable(false);
/// # let _ = request;
/// ```
pub struct ShowRequest {
    identifier: String,
    content: Option<Box<dyn DialogContent>>,
    provider_id: Option<String>,
    cancelable: bool,
    theme: u32,
    params: Option<Params>,
}

impl ShowRequest {
    /// Start a request for the given identifier.
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            content: None,
            provider_id: None,
            cancelable: true,
            theme: DEFAULT_THEME,
            params: None,
        }
    }

    /// Embed the content object directly.
    pub fn content(mut self, content: impl DialogContent + 'static) -> Self {
        self.content = Some(Box::new(content));
        self
    }

    /// Embed an already-boxed content object.
    pub fn boxed_content(mut self, content: Box<dyn DialogContent>) -> Self {
        self.content = Some(content);
        self
    }

    /// Reference content deposited in a vault instead of embedding it.
    pub fn provider(mut self, provider_id: impl Into<String>) -> Self {
        self.provider_id = Some(provider_id.into());
        self
    }

    /// Whether outside taps and back presses dismiss the dialog.
    /// Defaults to `true`.
    pub fn cancelable(mut self, cancelable: bool) -> Self {
        self.cancelable = cancelable;
        self
    }

    /// Style resource passed through to the presentation.
    pub fn theme(mut self, theme: u32) -> Self {
        self.theme = theme;
        self
    }

    /// Attach the full caller payload.
    pub fn params(mut self, params: Params) -> Self {
        self.params = Some(params);
        self
    }

    /// Attach a single payload entry.
    pub fn param(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.params
            .get_or_insert_with(Params::new)
            .insert(key.into(), value.into());
        self
    }

    pub(crate) fn into_parts(self) -> (DialogConfig, Option<Box<dyn DialogContent>>) {
        let config = DialogConfig {
            identifier: self.identifier,
            provider_id: self.provider_id,
            cancelable: self.cancelable,
            theme: self.theme,
            params: self.params,
            reborn: false,
        };
        (config, self.content)
    }
}
