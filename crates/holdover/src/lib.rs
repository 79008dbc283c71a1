//! Holdover - dialogs hosted in their own lifecycle unit.
//!
//! A holdover dialog is shown by a dedicated host instead of the screen that
//! triggered it, so it survives that screen's destruction, rotation, or
//! backgrounding, and can be dismissed remotely by identifier. The crate is
//! UI-toolkit agnostic: the host is an explicit lifecycle state machine
//! driven by an injected event source, and a small [`HostSurface`] adapter
//! does the actual presenting.
//!
//! # Quick Start
//!
//! ```
//! use holdover::{
//!     AlertEvent, BasicAlertContent, ButtonKind, CreateOrigin, DialogHost, HostDeps,
//!     MockSurface, RecordingSink, ResultCode, ShowRequest,
//! };
//!
//! let sink = RecordingSink::new();
//! let mut surface = MockSurface::new();
//!
//! let request = ShowRequest::new("greeting")
//!     .content(BasicAlertContent::new().message("Sample message").positive_text("OK"));
//!
//! let mut host = DialogHost::create(
//!     CreateOrigin::Fresh(request),
//!     HostDeps::new().sink(sink.sink()),
//!     &mut surface,
//! )
//! .unwrap();
//! host.start();
//!
//! // the user clicks OK
//! host.alert_event(AlertEvent::Button(ButtonKind::Positive), &mut surface);
//! host.stop();
//! host.destroy(false, &mut surface);
//!
//! let response = sink.take().pop().unwrap();
//! assert_eq!(response.code, ResultCode::PositiveButton);
//! assert_eq!(response.identifier, "greeting");
//! ```
//!
//! # Architecture
//!
//! ```text
//! caller ──ShowRequest──► DialogHost ◄──lifecycle events── runtime adapter
//!                            │  │
//!              Registry ◄────┘  └────► HostSurface (render only)
//!             DismissBus ◄── request_dismiss(identifier)
//!                            │
//!                            └──DialogResponse──► ResponseSink
//! ```
//!
//! - [`DialogHost`] owns one dialog's configuration and lifecycle, decides
//!   fragment-vs-alert mode, wires every dismissal path into the single
//!   outgoing response, and survives recreation through [`Snapshot`]s.
//! - [`Registry`] tracks shown identifiers process-wide and resolves the
//!   show/dismiss race: either order converges to "not shown".
//! - [`DismissBus`] carries identifier-scoped remote dismiss signals to
//!   whichever host is currently listening.
//! - [`ContentVault`] hands content objects from callers to hosts by opaque
//!   one-shot handles.
//!
//! # Content capabilities
//!
//! Content opts into behavior through capability queries on
//! [`DialogContent`]: the alert capability ([`AlertContent`]) switches the
//! host to alert mode, the collector capability ([`ResponseCollector`])
//! contributes a structured payload and result code at termination, and the
//! child-listener capability receives nested dialog results.

mod alert;
mod config;
mod content;
mod dismiss;
mod error;
mod host;
mod provider;
mod registry;
mod response;

pub use alert::{
    AlertBuilder, AlertCtx, AlertEvent, AlertView, ButtonHandler, ButtonKind, ChoiceHandler,
    DismissHandler, ToggleHandler,
};
pub use config::{DialogConfig, ShowRequest, Snapshot, DEFAULT_THEME};
pub use content::{
    AlertContent, BasicAlertContent, ChildResponseListener, DialogContent, ResponseCollector,
};
pub use dismiss::{request_dismiss, request_dismiss_with, shared_bus, DismissBus, Subscription};
pub use error::HostError;
pub use host::{CreateOrigin, DialogHost, HostDeps, HostMode, HostState, HostSurface, MockSurface};
pub use provider::{shared_vault, ContentProvider, ContentVault};
pub use registry::{shared_registry, DismissRoute, Registry, SharedRegistry};
pub use response::{DialogResponse, Params, RecordingSink, ResponseSink, ResultCode};
