//! The declarative alert contract.
//!
//! Builder-driven content describes an alert once through an [`AlertBuilder`];
//! the host consumes the description, wires every dismissal path into its
//! outgoing response, and hands the render-only [`AlertView`] projection to
//! the presentation surface. User interaction comes back as [`AlertEvent`]s.

use crate::response::ResultCode;

/// Context passed to overriding handlers.
///
/// An overriding handler replaces the platform's automatic dismiss-on-click:
/// the dialog stays up until the handler asks for dismissal.
#[derive(Debug, Default)]
pub struct AlertCtx {
    dismiss_requested: bool,
}

impl AlertCtx {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Request dismissal once the handler returns.
    pub fn dismiss(&mut self) {
        self.dismiss_requested = true;
    }

    pub(crate) fn dismiss_requested(&self) -> bool {
        self.dismiss_requested
    }
}

/// Overriding handler for a button click.
pub type ButtonHandler = Box<dyn FnMut(&mut AlertCtx)>;
/// Overriding handler for a single-choice or plain-item selection.
pub type ChoiceHandler = Box<dyn FnMut(&mut AlertCtx, usize)>;
/// Overriding handler for a multi-choice toggle.
pub type ToggleHandler = Box<dyn FnMut(&mut AlertCtx, usize, bool)>;
/// Overriding handler for dismissal; the alert construct is already gone.
pub type DismissHandler = Box<dyn FnMut()>;

/// The three alert buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonKind {
    Positive,
    Negative,
    Neutral,
}

impl ButtonKind {
    /// Position of the button in the response's `which` field.
    pub(crate) fn ordinal(self) -> usize {
        match self {
            Self::Positive => 0,
            Self::Negative => 1,
            Self::Neutral => 2,
        }
    }

    pub(crate) fn result_code(self) -> ResultCode {
        match self {
            Self::Positive => ResultCode::PositiveButton,
            Self::Negative => ResultCode::NegativeButton,
            Self::Neutral => ResultCode::NeutralButton,
        }
    }
}

/// An interaction on the presented alert, fed into the host by the runtime
/// adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertEvent {
    /// A button was clicked.
    Button(ButtonKind),
    /// A single-choice entry was selected.
    SingleChoice(usize),
    /// A multi-choice entry was toggled to the given state.
    MultiChoice(usize, bool),
    /// A plain list item was clicked.
    PlainChoice(usize),
    /// The alert was cancelled (outside tap or system dismiss).
    Cancel,
    /// The alert construct went away.
    Dismissed,
}

/// Declarative description of an alert, filled in by builder-driven content.
///
/// The builder is consumed exactly once per host creation. Labels become the
/// [`AlertView`] handed to the surface; overriding handlers stay with the
/// host, which chains them behind its own result recording.
#[derive(Default)]
pub struct AlertBuilder {
    pub(crate) title: Option<String>,
    pub(crate) message: Option<String>,
    pub(crate) positive: Option<String>,
    pub(crate) negative: Option<String>,
    pub(crate) neutral: Option<String>,
    pub(crate) plain_items: Vec<String>,
    pub(crate) single_items: Vec<String>,
    pub(crate) single_preselected: Option<usize>,
    pub(crate) multi_items: Vec<String>,
    pub(crate) multi_checked: Vec<bool>,
    pub(crate) positive_override: Option<ButtonHandler>,
    pub(crate) negative_override: Option<ButtonHandler>,
    pub(crate) neutral_override: Option<ButtonHandler>,
    pub(crate) single_override: Option<ChoiceHandler>,
    pub(crate) multi_override: Option<ToggleHandler>,
    pub(crate) plain_override: Option<ChoiceHandler>,
    pub(crate) dismiss_override: Option<DismissHandler>,
}

impl AlertBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the alert title.
    pub fn title(&mut self, title: impl Into<String>) -> &mut Self {
        self.title = Some(title.into());
        self
    }

    /// Set the alert message.
    pub fn message(&mut self, message: impl Into<String>) -> &mut Self {
        self.message = Some(message.into());
        self
    }

    /// Add a positive button with the given label.
    pub fn positive_button(&mut self, label: impl Into<String>) -> &mut Self {
        self.positive = Some(label.into());
        self
    }

    /// Add a negative button with the given label.
    pub fn negative_button(&mut self, label: impl Into<String>) -> &mut Self {
        self.negative = Some(label.into());
        self
    }

    /// Add a neutral button with the given label.
    pub fn neutral_button(&mut self, label: impl Into<String>) -> &mut Self {
        self.neutral = Some(label.into());
        self
    }

    /// Intercept positive clicks instead of auto-dismissing.
    pub fn on_positive(&mut self, handler: impl FnMut(&mut AlertCtx) + 'static) -> &mut Self {
        self.positive_override = Some(Box::new(handler));
        self
    }

    /// Intercept negative clicks instead of auto-dismissing.
    pub fn on_negative(&mut self, handler: impl FnMut(&mut AlertCtx) + 'static) -> &mut Self {
        self.negative_override = Some(Box::new(handler));
        self
    }

    /// Intercept neutral clicks instead of auto-dismissing.
    pub fn on_neutral(&mut self, handler: impl FnMut(&mut AlertCtx) + 'static) -> &mut Self {
        self.neutral_override = Some(Box::new(handler));
        self
    }

    /// Show a plain item list.
    pub fn plain_items(
        &mut self,
        items: impl IntoIterator<Item = impl Into<String>>,
    ) -> &mut Self {
        self.plain_items = items.into_iter().map(Into::into).collect();
        self
    }

    /// Chain a handler behind plain-item clicks.
    pub fn on_plain_choice(
        &mut self,
        handler: impl FnMut(&mut AlertCtx, usize) + 'static,
    ) -> &mut Self {
        self.plain_override = Some(Box::new(handler));
        self
    }

    /// Show a single-choice list, optionally preselecting an entry.
    pub fn single_choice_items(
        &mut self,
        items: impl IntoIterator<Item = impl Into<String>>,
        preselected: Option<usize>,
    ) -> &mut Self {
        self.single_items = items.into_iter().map(Into::into).collect();
        self.single_preselected = preselected;
        self
    }

    /// Chain a handler behind single-choice selections.
    pub fn on_single_choice(
        &mut self,
        handler: impl FnMut(&mut AlertCtx, usize) + 'static,
    ) -> &mut Self {
        self.single_override = Some(Box::new(handler));
        self
    }

    /// Show a multi-choice list with initial checked states.
    pub fn multi_choice_items(
        &mut self,
        items: impl IntoIterator<Item = (impl Into<String>, bool)>,
    ) -> &mut Self {
        let (items, checked): (Vec<String>, Vec<bool>) = items
            .into_iter()
            .map(|(label, checked)| (label.into(), checked))
            .unzip();
        self.multi_items = items;
        self.multi_checked = checked;
        self
    }

    /// Chain a handler behind multi-choice toggles.
    pub fn on_multi_choice(
        &mut self,
        handler: impl FnMut(&mut AlertCtx, usize, bool) + 'static,
    ) -> &mut Self {
        self.multi_override = Some(Box::new(handler));
        self
    }

    /// Intercept the final dismissal.
    pub fn on_dismiss(&mut self, handler: impl FnMut() + 'static) -> &mut Self {
        self.dismiss_override = Some(Box::new(handler));
        self
    }
}

/// Render-only projection of a built alert, handed to the presentation
/// surface. Carries no handlers; interaction goes back through the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertView {
    pub title: Option<String>,
    pub message: Option<String>,
    pub positive: Option<String>,
    pub negative: Option<String>,
    pub neutral: Option<String>,
    pub plain_items: Vec<String>,
    pub single_items: Vec<String>,
    pub single_preselected: Option<usize>,
    pub multi_items: Vec<String>,
    pub multi_checked: Vec<bool>,
    /// Whether outside taps and back presses dismiss the alert.
    pub cancelable: bool,
    /// Pass-through style resource; 0 means the default style.
    pub theme: u32,
}

impl AlertView {
    /// Whether the given button is part of this alert.
    pub fn has_button(&self, kind: ButtonKind) -> bool {
        match kind {
            ButtonKind::Positive => self.positive.is_some(),
            ButtonKind::Negative => self.negative.is_some(),
            ButtonKind::Neutral => self.neutral.is_some(),
        }
    }

    /// Label of the given button, if present.
    pub fn button_label(&self, kind: ButtonKind) -> Option<&str> {
        match kind {
            ButtonKind::Positive => self.positive.as_deref(),
            ButtonKind::Negative => self.negative.as_deref(),
            ButtonKind::Neutral => self.neutral.as_deref(),
        }
    }
}
