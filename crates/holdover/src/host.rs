//! The dialog host lifecycle state machine.
//!
//! A [`DialogHost`] owns one dialog instance from request to terminal
//! response. The host itself has no UI: an injected lifecycle event source
//! (the runtime adapter) drives it through explicit methods, and a
//! [`HostSurface`] adapter does the actual presenting. This keeps the state
//! machine runnable under any UI toolkit and fully testable in memory.
//!
//! ```text
//! Initializing ── abandon / raced dismiss ──────────────┐
//!      │                                                ▼
//!      ├─ fragment mode ─┐                          Finishing ── Destroyed
//!      └─ alert mode ────┴──► Showing ── finish ───────┘
//!                                │
//!                                └─ destroy(recreating) ──► RebirthPending
//! ```
//!
//! A recreation (`RebirthPending`) never finalizes the outgoing response;
//! the adapter persists the [`Snapshot`], retains the content object, and
//! creates a fresh host from [`CreateOrigin::Restored`] with a re-supplied
//! response sink. The `reborn` flag makes the alert teardown inside that
//! window indistinguishable from no dismissal at all.
//!
//! A note on rapid double recreation: the `reborn` flag is set and cleared
//! synchronously inside the teardown that dismisses the attached alert, so a
//! second recreation arriving before the rebuilt host re-attaches its alert
//! finds no attached construct and leaves the flag alone. That window has no
//! known failure, but it is reasoned about, not guarded.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::debug;

use crate::alert::{
    AlertBuilder, AlertCtx, AlertEvent, AlertView, ButtonHandler, ButtonKind, ChoiceHandler,
    DismissHandler, ToggleHandler,
};
use crate::config::{DialogConfig, ShowRequest, Snapshot, DEFAULT_THEME};
use crate::content::DialogContent;
use crate::dismiss::{shared_bus, DismissBus, Subscription};
use crate::error::HostError;
use crate::provider::{shared_vault, ContentProvider};
use crate::registry::{shared_registry, Registry};
use crate::response::{DialogResponse, Params, ResponseSink, ResultCode};

/// Lifecycle states of a host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostState {
    /// Restoring configuration and resolving content.
    Initializing,
    /// Visible and interactive.
    Showing,
    /// Terminal response resolved; waiting for the adapter to tear down.
    Finishing,
    /// Torn down for recreation; a restored host takes over.
    RebirthPending,
    /// Permanently gone.
    Destroyed,
}

/// How the host presents its content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostMode {
    /// Plain content mounted into the container region.
    Fragment,
    /// Builder-driven content presented as a native-style alert.
    Alert,
}

/// How a host comes to life.
pub enum CreateOrigin {
    /// First creation, from a caller's request.
    Fresh(ShowRequest),
    /// Recreation after a configuration change. `content` is the
    /// still-attached content object the adapter retained from
    /// [`DialogHost::destroy`].
    Restored {
        snapshot: Snapshot,
        content: Option<Box<dyn DialogContent>>,
    },
}

/// Presentation adapter supplied per UI runtime.
///
/// The host decides *what* happens; the surface renders it. Interaction on
/// a presented alert comes back through [`DialogHost::alert_event`].
pub trait HostSurface {
    /// Mount plain content into the container region. Returns `false` when
    /// the region does not exist in the layout.
    fn mount_content(&mut self, content: &mut dyn DialogContent) -> bool;

    /// Apply a non-default theme to the host's appearance. Only called in
    /// fragment mode; alert mode supplies its own chrome.
    fn apply_theme(&mut self, _theme: u32) {}

    /// Render the built alert.
    fn present_alert(&mut self, view: &AlertView);

    /// Tear down the presented alert construct.
    fn close_alert(&mut self);
}

/// Collaborators injected into a host.
///
/// Defaults to the process-wide registry, dismiss bus, and content vault;
/// tests swap in fresh instances to stay isolated.
pub struct HostDeps {
    registry: Arc<dyn Registry>,
    bus: DismissBus,
    provider: Arc<dyn ContentProvider>,
    sink: Option<Box<dyn ResponseSink>>,
}

impl HostDeps {
    /// Collaborators backed by the process-wide services, with no sink.
    pub fn new() -> Self {
        let registry: Arc<dyn Registry> = shared_registry();
        let provider: Arc<dyn ContentProvider> = shared_vault();
        Self {
            registry,
            bus: shared_bus(),
            provider,
            sink: None,
        }
    }

    /// Where the terminal response goes.
    pub fn sink(mut self, sink: Box<dyn ResponseSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Replace the identifier registry.
    pub fn registry(mut self, registry: Arc<dyn Registry>) -> Self {
        self.registry = registry;
        self
    }

    /// Replace the remote dismiss bus.
    pub fn bus(mut self, bus: DismissBus) -> Self {
        self.bus = bus;
        self
    }

    /// Replace the content provider.
    pub fn provider(mut self, provider: Arc<dyn ContentProvider>) -> Self {
        self.provider = provider;
        self
    }
}

impl Default for HostDeps {
    fn default() -> Self {
        Self::new()
    }
}

/// A built alert: the render-only view plus the caller's overriding
/// handlers, kept host-side so recording always runs first.
struct WiredAlert {
    view: AlertView,
    positive_override: Option<ButtonHandler>,
    negative_override: Option<ButtonHandler>,
    neutral_override: Option<ButtonHandler>,
    single_override: Option<ChoiceHandler>,
    multi_override: Option<ToggleHandler>,
    plain_override: Option<ChoiceHandler>,
    dismiss_override: Option<DismissHandler>,
    attached: bool,
}

impl WiredAlert {
    fn wire(builder: AlertBuilder, cancelable: bool, theme: u32) -> Self {
        let view = AlertView {
            title: builder.title,
            message: builder.message,
            positive: builder.positive,
            negative: builder.negative,
            neutral: builder.neutral,
            plain_items: builder.plain_items,
            single_items: builder.single_items,
            single_preselected: builder.single_preselected,
            multi_items: builder.multi_items,
            multi_checked: builder.multi_checked,
            cancelable,
            theme,
        };
        Self {
            view,
            positive_override: builder.positive_override,
            negative_override: builder.negative_override,
            neutral_override: builder.neutral_override,
            single_override: builder.single_override,
            multi_override: builder.multi_override,
            plain_override: builder.plain_override,
            dismiss_override: builder.dismiss_override,
            attached: true,
        }
    }

    fn override_for(&self, kind: ButtonKind) -> Option<&ButtonHandler> {
        match kind {
            ButtonKind::Positive => self.positive_override.as_ref(),
            ButtonKind::Negative => self.negative_override.as_ref(),
            ButtonKind::Neutral => self.neutral_override.as_ref(),
        }
    }

    fn override_for_mut(&mut self, kind: ButtonKind) -> Option<&mut ButtonHandler> {
        match kind {
            ButtonKind::Positive => self.positive_override.as_mut(),
            ButtonKind::Negative => self.negative_override.as_mut(),
            ButtonKind::Neutral => self.neutral_override.as_mut(),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum ChoiceKind {
    Single,
    Multi,
    Plain,
}

/// The unit that owns one dialog instance's lifecycle.
pub struct DialogHost {
    config: DialogConfig,
    state: HostState,
    mode: HostMode,
    content: Option<Box<dyn DialogContent>>,
    alert: Option<WiredAlert>,
    pending: Option<DialogResponse>,
    responses_collected: bool,
    sink: Option<Box<dyn ResponseSink>>,
    registry: Arc<dyn Registry>,
    bus: DismissBus,
    remote_dismiss: Arc<AtomicBool>,
    subscription: Option<Subscription>,
}

impl DialogHost {
    /// Bring a host to life, fresh or restored.
    ///
    /// A fresh creation resolves the content handle, confirms the show
    /// against the registry (consuming a dismiss that raced ahead), decides
    /// the mode, and builds the UI. Restoration skips registry confirmation
    /// and mounting; the adapter already retained the attached content.
    ///
    /// The returned host may already be [`HostState::Finishing`] — an
    /// expired content handle or a consumed raced dismiss never shows. The
    /// adapter reacts by completing teardown with [`Self::destroy`].
    pub fn create(
        origin: CreateOrigin,
        deps: HostDeps,
        surface: &mut dyn HostSurface,
    ) -> Result<Self, HostError> {
        let HostDeps {
            registry,
            bus,
            provider,
            sink,
        } = deps;

        let (config, mut content, fresh) = match origin {
            CreateOrigin::Fresh(request) => {
                let (config, content) = request.into_parts();
                (config, content, true)
            }
            CreateOrigin::Restored { snapshot, content } => {
                (DialogConfig::from_snapshot(&snapshot)?, content, false)
            }
        };
        if config.identifier.is_empty() {
            return Err(HostError::EmptyIdentifier);
        }

        if fresh && content.is_none() {
            if let Some(provider_id) = &config.provider_id {
                if let Some(claimed) = provider.claim(provider_id) {
                    let claimed: Box<dyn DialogContent> = claimed;
                    content = Some(claimed);
                }
            }
        }

        let mut host = Self {
            config,
            state: HostState::Initializing,
            mode: HostMode::Fragment,
            content,
            alert: None,
            pending: None,
            responses_collected: false,
            sink,
            registry,
            bus,
            remote_dismiss: Arc::new(AtomicBool::new(false)),
            subscription: None,
        };

        // An expired or already-claimed handle abandons the dialog silently;
        // the caller sees no result at all.
        if host.config.provider_id.is_some() && host.content.is_none() {
            debug!(
                "dialog {}: content handle expired, abandoning",
                host.config.identifier
            );
            host.finish();
            return Ok(host);
        }

        let alert_capable = match host.content.as_mut() {
            Some(content) => content.as_alert_content().is_some(),
            None => false,
        };
        host.mode = if alert_capable {
            HostMode::Alert
        } else {
            HostMode::Fragment
        };

        if host.mode == HostMode::Fragment
            && host.content.is_some()
            && host.config.theme != DEFAULT_THEME
        {
            surface.apply_theme(host.config.theme);
        }

        // First creation only: mark shown and consume a dismiss that raced
        // ahead, in one registry critical section. Either order of show and
        // dismiss converges to "not shown".
        if fresh && host.registry.confirm_show(&host.config.identifier) {
            host.finish();
            return Ok(host);
        }

        match host.mode {
            HostMode::Alert => host.build_and_present_alert(surface),
            HostMode::Fragment => {
                if fresh {
                    if let Some(content) = host.content.as_mut() {
                        if !surface.mount_content(&mut **content) {
                            host.registry.deregister(&host.config.identifier);
                            return Err(HostError::MissingContainer);
                        }
                    }
                }
            }
        }

        host.state = HostState::Showing;
        Ok(host)
    }

    /// Current lifecycle state.
    pub fn state(&self) -> HostState {
        self.state
    }

    /// Presentation mode decided at creation.
    pub fn mode(&self) -> HostMode {
        self.mode
    }

    /// The dialog's identifier.
    pub fn identifier(&self) -> &str {
        &self.config.identifier
    }

    /// The configuration snapshot of record.
    pub fn config(&self) -> &DialogConfig {
        &self.config
    }

    /// Whether the host is visible and interactive.
    pub fn is_showing(&self) -> bool {
        self.state == HostState::Showing
    }

    /// Whether the host resolved its terminal response and awaits teardown.
    pub fn is_finishing(&self) -> bool {
        self.state == HostState::Finishing
    }

    /// The host became visible to the user; subscribe to remote dismissal.
    pub fn start(&mut self) {
        if self.state != HostState::Showing || self.subscription.is_some() {
            return;
        }
        let flag = Arc::clone(&self.remote_dismiss);
        self.subscription = Some(self.bus.subscribe(&self.config.identifier, move || {
            flag.store(true, Ordering::SeqCst);
        }));
    }

    /// The host left the screen; stop listening for remote dismissal.
    pub fn stop(&mut self) {
        self.subscription = None;
    }

    /// React to signals received since the host last had control.
    ///
    /// Remote dismissal is asynchronous: the bus sets a flag and the owning
    /// thread acts on it here. Returns true when a dismissal was honoured.
    pub fn process_signals(&mut self) -> bool {
        if !self.remote_dismiss.swap(false, Ordering::SeqCst) {
            return false;
        }
        if self.state != HostState::Showing {
            return false;
        }
        debug!("dialog {}: dismissed remotely", self.config.identifier);
        self.finish();
        true
    }

    /// An interaction on the presented alert.
    pub fn alert_event(&mut self, event: AlertEvent, surface: &mut dyn HostSurface) {
        if self.mode != HostMode::Alert {
            return;
        }
        match event {
            AlertEvent::Button(kind) => self.button_clicked(kind, surface),
            AlertEvent::SingleChoice(which) => {
                self.choice_selected(ChoiceKind::Single, which, None, surface);
            }
            AlertEvent::MultiChoice(which, checked) => {
                self.choice_selected(ChoiceKind::Multi, which, Some(checked), surface);
            }
            AlertEvent::PlainChoice(which) => {
                self.choice_selected(ChoiceKind::Plain, which, None, surface);
            }
            AlertEvent::Cancel => self.cancelled(surface),
            AlertEvent::Dismissed => self.external_dismissed(),
        }
    }

    /// System back input. A no-op unless the dialog is cancelable;
    /// fragment mode has no navigation history to unwind.
    pub fn back_pressed(&mut self, surface: &mut dyn HostSurface) {
        if self.state != HostState::Showing || !self.config.cancelable {
            return;
        }
        match self.mode {
            HostMode::Alert => self.cancelled(surface),
            HostMode::Fragment => self.finish(),
        }
    }

    /// Tap outside the dialog region. A no-op unless cancelable.
    pub fn outside_tap(&mut self, surface: &mut dyn HostSurface) {
        if self.state != HostState::Showing || !self.config.cancelable {
            return;
        }
        match self.mode {
            HostMode::Alert => self.cancelled(surface),
            HostMode::Fragment => self.finish(),
        }
    }

    /// Resolve the terminal response and enter `Finishing`.
    ///
    /// Fragment mode composes the basic response (identifier, parameters,
    /// cancelled) and then lets the response-collector capability override
    /// payload and code; alert mode delivers what the wiring recorded.
    /// Idempotent: only the first terminal transition delivers.
    pub fn finish(&mut self) {
        if matches!(self.state, HostState::Finishing | HostState::Destroyed) {
            return;
        }
        if self.mode == HostMode::Fragment && self.content.is_some() && self.pending.is_none() {
            self.pending = Some(DialogResponse::basic(
                &self.config.identifier,
                self.config.params.as_ref(),
            ));
        }
        self.collect_responses();
        self.state = HostState::Finishing;
        self.deliver();
    }

    /// Persist the configuration. The adapter must call this before any
    /// teardown so restoration is lossless.
    pub fn save_state(&self) -> Result<Snapshot, HostError> {
        self.config.to_snapshot()
    }

    /// Tear the host down.
    ///
    /// Permanent teardown (`recreating == false`) finalizes the response if
    /// nothing did yet, deregisters the identifier, and dismisses any
    /// attached alert. Recreation-only teardown marks the alert dismissal as
    /// transient via the `reborn` flag and returns the content object for
    /// the adapter to retain and pass back in [`CreateOrigin::Restored`].
    pub fn destroy(
        &mut self,
        recreating: bool,
        surface: &mut dyn HostSurface,
    ) -> Option<Box<dyn DialogContent>> {
        if matches!(self.state, HostState::Destroyed | HostState::RebirthPending) {
            return None;
        }
        self.subscription = None;

        if recreating {
            if self.alert_attached() {
                // the paired dismissal below must read this as transient
                self.config.reborn = true;
                debug!(
                    "dialog {}: tearing down for rebirth",
                    self.config.identifier
                );
                self.close_attached_alert(surface);
            }
            self.state = HostState::RebirthPending;
            return self.content.take();
        }

        self.finish();
        self.registry.deregister(&self.config.identifier);
        self.close_attached_alert(surface);
        self.state = HostState::Destroyed;
        None
    }

    /// Forward a nested dialog's response to content that listens for it.
    pub fn deliver_child_response(&mut self, response: &DialogResponse) {
        if let Some(content) = self.content.as_mut() {
            if let Some(listener) = content.as_child_listener() {
                listener.child_response(response);
            }
        }
    }

    fn build_and_present_alert(&mut self, surface: &mut dyn HostSurface) {
        let mut builder = AlertBuilder::new();
        if let Some(content) = self.content.as_mut() {
            if let Some(alert_content) = content.as_alert_content() {
                alert_content.build_alert(&mut builder);
            }
        }
        let wired = WiredAlert::wire(builder, self.config.cancelable, self.config.theme);

        // the outgoing response starts as "cancelled" with the basics filled in
        self.pending = Some(DialogResponse::basic(
            &self.config.identifier,
            self.config.params.as_ref(),
        ));

        surface.present_alert(&wired.view);
        self.alert = Some(wired);
        self.post_show();
    }

    /// The pass after the alert became visible: overridden buttons record
    /// their code up front (their click later runs only the override,
    /// bypassing auto-dismiss), and the content gets the built view.
    fn post_show(&mut self) {
        let mut codes = Vec::new();
        if let Some(alert) = self.alert.as_ref() {
            for kind in [ButtonKind::Positive, ButtonKind::Negative, ButtonKind::Neutral] {
                if alert.view.has_button(kind) && alert.override_for(kind).is_some() {
                    codes.push(kind.result_code());
                }
            }
        }
        for code in codes {
            self.record(code, None, None);
        }

        if let (Some(alert), Some(content)) = (self.alert.as_ref(), self.content.as_mut()) {
            if let Some(alert_content) = content.as_alert_content() {
                alert_content.alert_shown(&alert.view);
            }
        }
    }

    /// Write the interaction into the outgoing response. Always runs before
    /// any caller-supplied handler, so overrides cannot suppress capture.
    fn record(&mut self, code: ResultCode, which: Option<usize>, checked: Option<bool>) {
        if let Some(pending) = self.pending.as_mut() {
            pending.code = code;
            if which.is_some() {
                pending.which = which;
            }
            if checked.is_some() {
                pending.checked = checked;
            }
        }
    }

    fn button_clicked(&mut self, kind: ButtonKind, surface: &mut dyn HostSurface) {
        if self.state != HostState::Showing {
            return;
        }
        let (present, has_override) = match self.alert.as_ref() {
            Some(alert) => (
                alert.view.has_button(kind),
                alert.override_for(kind).is_some(),
            ),
            None => (false, false),
        };
        if !present {
            return;
        }

        if has_override {
            // code was recorded at show time; the override decides dismissal
            let mut ctx = AlertCtx::new();
            if let Some(alert) = self.alert.as_mut() {
                if let Some(callback) = alert.override_for_mut(kind) {
                    callback(&mut ctx);
                }
            }
            if ctx.dismiss_requested() {
                self.close_attached_alert(surface);
            }
        } else {
            self.record(kind.result_code(), Some(kind.ordinal()), None);
            self.close_attached_alert(surface);
        }
    }

    fn choice_selected(
        &mut self,
        kind: ChoiceKind,
        which: usize,
        checked: Option<bool>,
        surface: &mut dyn HostSurface,
    ) {
        if self.state != HostState::Showing {
            return;
        }
        let present = match self.alert.as_ref() {
            Some(alert) => match kind {
                ChoiceKind::Single => !alert.view.single_items.is_empty(),
                ChoiceKind::Multi => !alert.view.multi_items.is_empty(),
                ChoiceKind::Plain => !alert.view.plain_items.is_empty(),
            },
            None => false,
        };
        if !present {
            return;
        }

        let code = match kind {
            ChoiceKind::Single => ResultCode::SingleChoice,
            ChoiceKind::Multi => ResultCode::MultiChoice,
            ChoiceKind::Plain => ResultCode::PlainChoice,
        };
        self.record(code, Some(which), checked);

        let mut ctx = AlertCtx::new();
        let mut ran = false;
        if let Some(alert) = self.alert.as_mut() {
            match kind {
                ChoiceKind::Single => {
                    if let Some(callback) = alert.single_override.as_mut() {
                        callback(&mut ctx, which);
                        ran = true;
                    }
                }
                ChoiceKind::Multi => {
                    if let Some(callback) = alert.multi_override.as_mut() {
                        callback(&mut ctx, which, checked.unwrap_or(false));
                        ran = true;
                    }
                }
                ChoiceKind::Plain => {
                    if let Some(callback) = alert.plain_override.as_mut() {
                        callback(&mut ctx, which);
                        ran = true;
                    }
                }
            }
        }

        match kind {
            // plain item lists close on click, like the platform's
            ChoiceKind::Plain => self.close_attached_alert(surface),
            _ => {
                if ran && ctx.dismiss_requested() {
                    self.close_attached_alert(surface);
                }
            }
        }
    }

    fn cancelled(&mut self, surface: &mut dyn HostSurface) {
        if self.state != HostState::Showing || !self.config.cancelable {
            return;
        }
        // cancellation reports no interaction payload
        self.pending = Some(DialogResponse::basic(
            &self.config.identifier,
            self.config.params.as_ref(),
        ));
        self.close_attached_alert(surface);
    }

    fn external_dismissed(&mut self) {
        if let Some(alert) = self.alert.as_mut() {
            alert.attached = false;
        }
        self.alert_dismissed();
    }

    fn alert_attached(&self) -> bool {
        self.alert.as_ref().map(|a| a.attached).unwrap_or(false)
    }

    fn close_attached_alert(&mut self, surface: &mut dyn HostSurface) {
        let was_attached = match self.alert.as_mut() {
            Some(alert) if alert.attached => {
                alert.attached = false;
                true
            }
            _ => false,
        };
        if was_attached {
            surface.close_alert();
            self.alert_dismissed();
        }
    }

    /// The single dismissal sink every alert teardown funnels into.
    ///
    /// During rebirth the dismissal is transient: clear the flag and do
    /// nothing else; the next `Initializing` pass rebuilds the construct.
    fn alert_dismissed(&mut self) {
        if self.config.reborn {
            self.config.reborn = false;
            debug!(
                "dialog {}: transient dismissal during rebirth",
                self.config.identifier
            );
            return;
        }
        if matches!(self.state, HostState::Finishing | HostState::Destroyed) {
            return;
        }
        self.collect_responses();
        if let Some(alert) = self.alert.as_mut() {
            if let Some(callback) = alert.dismiss_override.as_mut() {
                callback();
            }
        }
        self.finish();
    }

    fn collect_responses(&mut self) {
        if self.responses_collected {
            return;
        }
        self.responses_collected = true;
        let Some(pending) = self.pending.as_mut() else {
            return;
        };
        let Some(content) = self.content.as_mut() else {
            return;
        };
        let Some(collector) = content.as_response_collector() else {
            return;
        };
        let mut out = Params::new();
        collector.collect_responses(&mut out);
        pending.responses = Some(out);
        pending.code = collector.result_code();
    }

    fn deliver(&mut self) {
        if let Some(response) = self.pending.take() {
            if let Some(sink) = self.sink.take() {
                sink.deliver(response);
            }
        } else {
            // nothing to report; the sink is consumed so nothing ever leaks
            self.sink = None;
        }
    }
}

/// In-memory [`HostSurface`] for tests and examples.
#[derive(Debug, Default)]
pub struct MockSurface {
    missing_container: bool,
    /// How many times plain content was mounted.
    pub mounted: usize,
    /// Themes applied, in order.
    pub themes: Vec<u32>,
    /// Alert views presented, in order.
    pub presented: Vec<AlertView>,
    /// How many times an alert construct was closed.
    pub closed: usize,
}

impl MockSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// A surface whose layout lacks the container region, for exercising the
    /// fatal fragment-mode configuration error.
    pub fn without_container() -> Self {
        Self {
            missing_container: true,
            ..Self::default()
        }
    }
}

impl HostSurface for MockSurface {
    fn mount_content(&mut self, _content: &mut dyn DialogContent) -> bool {
        if self.missing_container {
            return false;
        }
        self.mounted += 1;
        true
    }

    fn apply_theme(&mut self, theme: u32) {
        self.themes.push(theme);
    }

    fn present_alert(&mut self, view: &AlertView) {
        self.presented.push(view.clone());
    }

    fn close_alert(&mut self) {
        self.closed += 1;
    }
}
