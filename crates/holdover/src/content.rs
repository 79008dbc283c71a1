//! Content objects and their optional capabilities.
//!
//! A content object describes what a dialog shows. Plain content is mounted
//! into the host's container region; content with the alert capability
//! produces a declarative [`AlertBuilder`] description instead and the host
//! presents it as a native-style alert.
//!
//! Capabilities are discovered through query methods rather than downcasting:
//! a content object opts in by returning `Some(self)` from the matching
//! `as_*` method.

use crate::alert::{AlertBuilder, AlertView};
use crate::response::{DialogResponse, Params, ResultCode};

/// Base trait for everything a dialog can show.
///
/// All capability queries default to `None`; implement the ones the content
/// supports:
///
/// ```
/// use holdover::{AlertBuilder, AlertContent, DialogContent};
///
/// struct Farewell;
///
/// impl DialogContent for Farewell {
///     fn as_alert_content(&mut self) -> Option<&mut dyn AlertContent> {
///         Some(self)
///     }
/// }
///
/// impl AlertContent for Farewell {
///     fn build_alert(&mut self, builder: &mut AlertBuilder) {
///         builder.message("Goodbye").positive_button("Bye");
///     }
/// }
/// ```
pub trait DialogContent {
    /// The alert-builder capability; content with it is shown in alert mode.
    fn as_alert_content(&mut self) -> Option<&mut dyn AlertContent> {
        None
    }

    /// The response-collector capability, consulted at termination.
    fn as_response_collector(&mut self) -> Option<&mut dyn ResponseCollector> {
        None
    }

    /// The child-response capability, for content that launches nested
    /// dialogs and wants their results forwarded.
    fn as_child_listener(&mut self) -> Option<&mut dyn ChildResponseListener> {
        None
    }
}

/// Capability of content that describes a native-style alert.
pub trait AlertContent {
    /// Describe the alert. Called once per host creation, including after
    /// recreation, so handlers can be fresh closures every time.
    fn build_alert(&mut self, builder: &mut AlertBuilder);

    /// Called after the alert became visible, with the final view.
    fn alert_shown(&mut self, _view: &AlertView) {}
}

/// Capability of content that supplies a structured response at termination.
pub trait ResponseCollector {
    /// Fill in the structured response payload.
    fn collect_responses(&mut self, out: &mut Params);

    /// The result code to report instead of the interaction default.
    fn result_code(&self) -> ResultCode;
}

/// Capability of content that wants nested dialog results forwarded to it.
pub trait ChildResponseListener {
    /// A dialog launched by this content delivered its response.
    fn child_response(&mut self, response: &DialogResponse);
}

/// Ready-made builder-driven content configured declaratively.
///
/// Covers the common "message plus buttons" alerts without a custom content
/// type:
///
/// ```
/// use holdover::BasicAlertContent;
///
/// let content = BasicAlertContent::new()
///     .message("Sample message")
///     .positive_text("OK");
/// # let _ = content;
/// ```
#[derive(Debug, Clone, Default)]
pub struct BasicAlertContent {
    title: Option<String>,
    message: Option<String>,
    positive: Option<String>,
    negative: Option<String>,
    neutral: Option<String>,
    plain_items: Vec<String>,
    single_items: Vec<String>,
    single_preselected: Option<usize>,
    multi_items: Vec<(String, bool)>,
}

impl BasicAlertContent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the alert title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the alert message.
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Label the positive button.
    pub fn positive_text(mut self, label: impl Into<String>) -> Self {
        self.positive = Some(label.into());
        self
    }

    /// Label the negative button.
    pub fn negative_text(mut self, label: impl Into<String>) -> Self {
        self.negative = Some(label.into());
        self
    }

    /// Label the neutral button.
    pub fn neutral_text(mut self, label: impl Into<String>) -> Self {
        self.neutral = Some(label.into());
        self
    }

    /// Show a plain item list.
    pub fn plain_items(mut self, items: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.plain_items = items.into_iter().map(Into::into).collect();
        self
    }

    /// Show a single-choice list, optionally preselecting an entry.
    pub fn single_choice(
        mut self,
        items: impl IntoIterator<Item = impl Into<String>>,
        preselected: Option<usize>,
    ) -> Self {
        self.single_items = items.into_iter().map(Into::into).collect();
        self.single_preselected = preselected;
        self
    }

    /// Show a multi-choice list with initial checked states.
    pub fn multi_choice(
        mut self,
        items: impl IntoIterator<Item = (impl Into<String>, bool)>,
    ) -> Self {
        self.multi_items = items
            .into_iter()
            .map(|(label, checked)| (label.into(), checked))
            .collect();
        self
    }
}

impl DialogContent for BasicAlertContent {
    fn as_alert_content(&mut self) -> Option<&mut dyn AlertContent> {
        Some(self)
    }
}

impl AlertContent for BasicAlertContent {
    fn build_alert(&mut self, builder: &mut AlertBuilder) {
        if let Some(title) = &self.title {
            builder.title(title.clone());
        }
        if let Some(message) = &self.message {
            builder.message(message.clone());
        }
        if let Some(label) = &self.positive {
            builder.positive_button(label.clone());
        }
        if let Some(label) = &self.negative {
            builder.negative_button(label.clone());
        }
        if let Some(label) = &self.neutral {
            builder.neutral_button(label.clone());
        }
        if !self.plain_items.is_empty() {
            builder.plain_items(self.plain_items.clone());
        }
        if !self.single_items.is_empty() {
            builder.single_choice_items(self.single_items.clone(), self.single_preselected);
        }
        if !self.multi_items.is_empty() {
            builder.multi_choice_items(self.multi_items.clone());
        }
    }
}
