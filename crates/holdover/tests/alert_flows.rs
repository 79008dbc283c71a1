//! End-to-end alert interaction flows: result codes, payloads, override
//! bypass, and cancel gating.

mod common;

use std::cell::Cell;
use std::rc::Rc;

use common::isolated_deps;
use holdover::{
    AlertBuilder, AlertContent, AlertEvent, BasicAlertContent, ButtonKind, CreateOrigin,
    DialogContent, DialogHost, HostState, MockSurface, Params, RecordingSink, Registry,
    ResponseCollector, ResultCode, ShowRequest,
};

fn sample_alert() -> BasicAlertContent {
    BasicAlertContent::new()
        .message("Sample message")
        .positive_text("OK")
        .negative_text("Cancel")
        .neutral_text("Later")
}

#[test]
fn positive_click_delivers_positive_button() {
    let sink = RecordingSink::new();
    let (deps, registry, _bus) = isolated_deps(&sink);
    let mut surface = MockSurface::new();

    let request = ShowRequest::new("d1")
        .content(BasicAlertContent::new().message("Sample message").positive_text("OK"));
    let mut host = DialogHost::create(CreateOrigin::Fresh(request), deps, &mut surface).unwrap();
    host.start();

    host.alert_event(AlertEvent::Button(ButtonKind::Positive), &mut surface);
    assert!(host.is_finishing());
    host.stop();
    host.destroy(false, &mut surface);

    let responses = sink.take();
    assert_eq!(responses.len(), 1);
    assert_eq!(responses[0].code, ResultCode::PositiveButton);
    assert_eq!(responses[0].identifier, "d1");
    assert_eq!(responses[0].which, Some(0));
    assert!(!registry.is_shown("d1"));
}

#[test]
fn each_button_reports_its_own_code_and_ordinal() {
    for (kind, code, ordinal) in [
        (ButtonKind::Positive, ResultCode::PositiveButton, 0),
        (ButtonKind::Negative, ResultCode::NegativeButton, 1),
        (ButtonKind::Neutral, ResultCode::NeutralButton, 2),
    ] {
        let sink = RecordingSink::new();
        let (deps, _registry, _bus) = isolated_deps(&sink);
        let mut surface = MockSurface::new();
        let mut host = DialogHost::create(
            CreateOrigin::Fresh(ShowRequest::new("d1").content(sample_alert())),
            deps,
            &mut surface,
        )
        .unwrap();

        host.alert_event(AlertEvent::Button(kind), &mut surface);
        host.destroy(false, &mut surface);

        let responses = sink.take();
        assert_eq!(responses.len(), 1);
        assert_eq!(responses[0].code, code);
        assert_eq!(responses[0].which, Some(ordinal));
    }
}

#[test]
fn outside_tap_cancels_without_payload() {
    let sink = RecordingSink::new();
    let (deps, _registry, _bus) = isolated_deps(&sink);
    let mut surface = MockSurface::new();
    let content = sample_alert().single_choice(["red", "green", "blue"], None);
    let mut host = DialogHost::create(
        CreateOrigin::Fresh(ShowRequest::new("d1").content(content).param("origin", "menu")),
        deps,
        &mut surface,
    )
    .unwrap();

    // a selection happened, but the cancel wipes the interaction payload
    host.alert_event(AlertEvent::SingleChoice(2), &mut surface);
    host.outside_tap(&mut surface);
    host.destroy(false, &mut surface);

    let responses = sink.take();
    assert_eq!(responses.len(), 1);
    assert_eq!(responses[0].code, ResultCode::Cancelled);
    assert_eq!(responses[0].which, None);
    assert_eq!(responses[0].checked, None);
    // the caller payload still echoes back
    assert_eq!(responses[0].params.get("origin"), Some(&serde_json::json!("menu")));
}

#[test]
fn non_cancelable_suppresses_back_and_outside_tap() {
    let sink = RecordingSink::new();
    let (deps, _registry, _bus) = isolated_deps(&sink);
    let mut surface = MockSurface::new();
    let mut host = DialogHost::create(
        CreateOrigin::Fresh(ShowRequest::new("d1").content(sample_alert()).cancelable(false)),
        deps,
        &mut surface,
    )
    .unwrap();

    host.back_pressed(&mut surface);
    host.outside_tap(&mut surface);
    host.alert_event(AlertEvent::Cancel, &mut surface);

    assert_eq!(host.state(), HostState::Showing);
    assert_eq!(surface.closed, 0);
    assert_eq!(sink.count(), 0);
}

#[test]
fn single_choice_records_without_dismissing() {
    let sink = RecordingSink::new();
    let (deps, _registry, _bus) = isolated_deps(&sink);
    let mut surface = MockSurface::new();
    let content = sample_alert().single_choice(["red", "green", "blue"], Some(0));
    let mut host = DialogHost::create(
        CreateOrigin::Fresh(ShowRequest::new("d1").content(content)),
        deps,
        &mut surface,
    )
    .unwrap();

    host.alert_event(AlertEvent::SingleChoice(1), &mut surface);
    assert!(host.is_showing());
    assert_eq!(surface.closed, 0);

    host.alert_event(AlertEvent::Button(ButtonKind::Positive), &mut surface);
    host.destroy(false, &mut surface);

    let responses = sink.take();
    assert_eq!(responses.len(), 1);
    // the button was the last interaction and overwrote the selection
    assert_eq!(responses[0].code, ResultCode::PositiveButton);
    assert_eq!(responses[0].which, Some(0));
}

#[test]
fn multi_choice_toggle_keeps_checked_state() {
    let sink = RecordingSink::new();
    let (deps, _registry, _bus) = isolated_deps(&sink);
    let mut surface = MockSurface::new();
    let content = BasicAlertContent::new()
        .message("pick some")
        .positive_text("Done")
        .multi_choice([("a", false), ("b", true)]);
    let mut host = DialogHost::create(
        CreateOrigin::Fresh(ShowRequest::new("d1").content(content)),
        deps,
        &mut surface,
    )
    .unwrap();

    host.alert_event(AlertEvent::MultiChoice(1, false), &mut surface);
    assert!(host.is_showing());

    host.alert_event(AlertEvent::Button(ButtonKind::Positive), &mut surface);
    host.destroy(false, &mut surface);

    let responses = sink.take();
    assert_eq!(responses[0].code, ResultCode::PositiveButton);
    assert_eq!(responses[0].checked, Some(false));
}

#[test]
fn plain_choice_dismisses_on_click() {
    let sink = RecordingSink::new();
    let (deps, _registry, _bus) = isolated_deps(&sink);
    let mut surface = MockSurface::new();
    let content = BasicAlertContent::new().plain_items(["copy", "move", "delete"]);
    let mut host = DialogHost::create(
        CreateOrigin::Fresh(ShowRequest::new("d1").content(content)),
        deps,
        &mut surface,
    )
    .unwrap();

    host.alert_event(AlertEvent::PlainChoice(2), &mut surface);
    assert!(host.is_finishing());
    assert_eq!(surface.closed, 1);
    host.destroy(false, &mut surface);

    let responses = sink.take();
    assert_eq!(responses.len(), 1);
    assert_eq!(responses[0].code, ResultCode::PlainChoice);
    assert_eq!(responses[0].which, Some(2));
}

/// Content whose positive button requires a second click to confirm.
struct DoubleConfirm {
    clicks: Rc<Cell<u32>>,
}

impl DialogContent for DoubleConfirm {
    fn as_alert_content(&mut self) -> Option<&mut dyn AlertContent> {
        Some(self)
    }
}

impl AlertContent for DoubleConfirm {
    fn build_alert(&mut self, builder: &mut AlertBuilder) {
        let clicks = Rc::clone(&self.clicks);
        builder.message("Really?").positive_button("Delete");
        builder.on_positive(move |ctx| {
            let n = clicks.get() + 1;
            clicks.set(n);
            if n >= 2 {
                ctx.dismiss();
            }
        });
    }
}

#[test]
fn overriding_handler_bypasses_auto_dismiss() {
    let clicks = Rc::new(Cell::new(0));
    let sink = RecordingSink::new();
    let (deps, _registry, _bus) = isolated_deps(&sink);
    let mut surface = MockSurface::new();
    let mut host = DialogHost::create(
        CreateOrigin::Fresh(ShowRequest::new("d1").content(DoubleConfirm {
            clicks: Rc::clone(&clicks),
        })),
        deps,
        &mut surface,
    )
    .unwrap();

    // first click: only the override runs, the alert stays up
    host.alert_event(AlertEvent::Button(ButtonKind::Positive), &mut surface);
    assert_eq!(clicks.get(), 1);
    assert!(host.is_showing());
    assert_eq!(surface.closed, 0);
    assert_eq!(sink.count(), 0);

    // second click: the override asks for dismissal
    host.alert_event(AlertEvent::Button(ButtonKind::Positive), &mut surface);
    assert_eq!(clicks.get(), 2);
    assert!(host.is_finishing());
    assert_eq!(surface.closed, 1);
    host.destroy(false, &mut surface);

    let responses = sink.take();
    assert_eq!(responses.len(), 1);
    // the code was recorded when the alert became visible
    assert_eq!(responses[0].code, ResultCode::PositiveButton);
}

/// Alert content that also collects a structured response at termination.
struct RatingPrompt {
    stars: Rc<Cell<u32>>,
}

impl DialogContent for RatingPrompt {
    fn as_alert_content(&mut self) -> Option<&mut dyn AlertContent> {
        Some(self)
    }
    fn as_response_collector(&mut self) -> Option<&mut dyn ResponseCollector> {
        Some(self)
    }
}

impl AlertContent for RatingPrompt {
    fn build_alert(&mut self, builder: &mut AlertBuilder) {
        let stars = Rc::clone(&self.stars);
        builder
            .message("Rate us")
            .single_choice_items(["1", "2", "3", "4", "5"], None)
            .positive_button("Submit");
        builder.on_single_choice(move |_ctx, which| {
            stars.set(which as u32 + 1);
        });
    }
}

impl ResponseCollector for RatingPrompt {
    fn collect_responses(&mut self, out: &mut Params) {
        out.insert("stars".into(), serde_json::json!(self.stars.get()));
    }
    fn result_code(&self) -> ResultCode {
        ResultCode::Custom(100)
    }
}

#[test]
fn collector_fills_responses_and_overrides_code() {
    let stars = Rc::new(Cell::new(0));
    let sink = RecordingSink::new();
    let (deps, _registry, _bus) = isolated_deps(&sink);
    let mut surface = MockSurface::new();
    let mut host = DialogHost::create(
        CreateOrigin::Fresh(ShowRequest::new("rate").content(RatingPrompt {
            stars: Rc::clone(&stars),
        })),
        deps,
        &mut surface,
    )
    .unwrap();

    host.alert_event(AlertEvent::SingleChoice(3), &mut surface);
    host.alert_event(AlertEvent::Button(ButtonKind::Positive), &mut surface);
    host.destroy(false, &mut surface);

    let responses = sink.take();
    assert_eq!(responses.len(), 1);
    assert_eq!(responses[0].code, ResultCode::Custom(100));
    let collected = responses[0].responses.as_ref().unwrap();
    assert_eq!(collected.get("stars"), Some(&serde_json::json!(4)));
}

#[test]
fn dismiss_override_runs_on_real_dismissal() {
    struct Noisy {
        dismissals: Rc<Cell<u32>>,
    }
    impl DialogContent for Noisy {
        fn as_alert_content(&mut self) -> Option<&mut dyn AlertContent> {
            Some(self)
        }
    }
    impl AlertContent for Noisy {
        fn build_alert(&mut self, builder: &mut AlertBuilder) {
            let dismissals = Rc::clone(&self.dismissals);
            builder.message("m").positive_button("OK");
            builder.on_dismiss(move || {
                dismissals.set(dismissals.get() + 1);
            });
        }
    }

    let dismissals = Rc::new(Cell::new(0));
    let sink = RecordingSink::new();
    let (deps, _registry, _bus) = isolated_deps(&sink);
    let mut surface = MockSurface::new();
    let mut host = DialogHost::create(
        CreateOrigin::Fresh(ShowRequest::new("d1").content(Noisy {
            dismissals: Rc::clone(&dismissals),
        })),
        deps,
        &mut surface,
    )
    .unwrap();

    host.alert_event(AlertEvent::Button(ButtonKind::Positive), &mut surface);
    host.destroy(false, &mut surface);

    assert_eq!(dismissals.get(), 1);
    assert_eq!(sink.count(), 1);
}

#[test]
fn events_for_absent_surfaces_are_ignored() {
    let sink = RecordingSink::new();
    let (deps, _registry, _bus) = isolated_deps(&sink);
    let mut surface = MockSurface::new();
    // message-only alert: no buttons, no lists
    let content = BasicAlertContent::new().message("hi").positive_text("OK");
    let mut host = DialogHost::create(
        CreateOrigin::Fresh(ShowRequest::new("d1").content(content)),
        deps,
        &mut surface,
    )
    .unwrap();

    host.alert_event(AlertEvent::Button(ButtonKind::Negative), &mut surface);
    host.alert_event(AlertEvent::SingleChoice(0), &mut surface);
    host.alert_event(AlertEvent::PlainChoice(0), &mut surface);

    assert!(host.is_showing());
    assert_eq!(sink.count(), 0);
}
