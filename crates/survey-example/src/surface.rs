//! Terminal presentation adapter and event pump.
//!
//! `TermSurface` renders what the host decides to show; `pump` plays the
//! role of the UI runtime's event loop, translating keyboard input into
//! lifecycle calls and alert events.

use anyhow::Result;
use console::{style, Term};
use holdover::{
    request_dismiss, AlertEvent, AlertView, ButtonKind, DialogContent, DialogHost, HostSurface,
};

/// Presents dialogs as framed blocks on the terminal.
pub struct TermSurface {
    term: Term,
}

impl TermSurface {
    pub fn new() -> Self {
        Self {
            term: Term::stdout(),
        }
    }

    fn line(&self, text: &str) {
        let _ = self.term.write_line(text);
    }
}

impl HostSurface for TermSurface {
    fn mount_content(&mut self, _content: &mut dyn DialogContent) -> bool {
        self.line(&format!("{}", style("-- dialog container --").dim()));
        true
    }

    fn apply_theme(&mut self, theme: u32) {
        self.line(&format!("{}", style(format!("(styled with theme {theme})")).dim()));
    }

    fn present_alert(&mut self, view: &AlertView) {
        self.line("");
        if let Some(title) = &view.title {
            self.line(&format!("{}", style(title).bold().underlined()));
        }
        if let Some(message) = &view.message {
            self.line(message);
        }
        if !view.plain_items.is_empty() {
            for (i, item) in view.plain_items.iter().enumerate() {
                self.line(&format!("  i {}  {item}", i + 1));
            }
        }
        if !view.single_items.is_empty() {
            for (i, item) in view.single_items.iter().enumerate() {
                let mark = if view.single_preselected == Some(i) { "(x)" } else { "( )" };
                self.line(&format!("  s {}  {mark} {item}", i + 1));
            }
        }
        if !view.multi_items.is_empty() {
            for (i, item) in view.multi_items.iter().enumerate() {
                let checked = view.multi_checked.get(i).copied().unwrap_or(false);
                let mark = if checked { "[x]" } else { "[ ]" };
                self.line(&format!("  m {}  {mark} {item}", i + 1));
            }
        }

        let mut buttons = Vec::new();
        for (key, kind) in [("p", ButtonKind::Positive), ("n", ButtonKind::Negative), ("u", ButtonKind::Neutral)] {
            if let Some(label) = view.button_label(kind) {
                buttons.push(format!("[{key}] {label}"));
            }
        }
        if !buttons.is_empty() {
            self.line(&format!("{}", style(buttons.join("   ")).cyan()));
        }
        self.line(&format!(
            "{}",
            style("(t = tap outside, b = back, r = remote dismiss)").dim()
        ));
    }

    fn close_alert(&mut self) {
        self.line(&format!("{}", style("(alert dismissed)").dim()));
    }
}

/// Why the pump returned.
#[derive(Debug, PartialEq, Eq)]
pub enum PumpOutcome {
    /// The host resolved its terminal response.
    Finished,
    /// The user asked for a simulated configuration change.
    RotateRequested,
}

enum Input {
    Event(AlertEvent),
    OutsideTap,
    Back,
    Remote,
    Rotate,
}

fn parse(line: &str) -> Option<Input> {
    let mut tokens = line.split_whitespace();
    let head = tokens.next()?;
    let index = tokens
        .next()
        .and_then(|t| t.parse::<usize>().ok())
        .and_then(|n| n.checked_sub(1));
    match head {
        "p" | "ok" => Some(Input::Event(AlertEvent::Button(ButtonKind::Positive))),
        "n" => Some(Input::Event(AlertEvent::Button(ButtonKind::Negative))),
        "u" => Some(Input::Event(AlertEvent::Button(ButtonKind::Neutral))),
        "s" => index.map(|i| Input::Event(AlertEvent::SingleChoice(i))),
        "i" => index.map(|i| Input::Event(AlertEvent::PlainChoice(i))),
        "m" => index.map(|i| Input::Event(AlertEvent::MultiChoice(i, true))),
        "M" => index.map(|i| Input::Event(AlertEvent::MultiChoice(i, false))),
        "t" => Some(Input::OutsideTap),
        "b" => Some(Input::Back),
        "r" => Some(Input::Remote),
        "rot" => Some(Input::Rotate),
        _ => None,
    }
}

/// Drive a showing host until it finishes or asks to rotate.
///
/// The caller completes teardown: `destroy(false)` after `Finished`, the
/// save/retain/recreate dance after `RotateRequested`.
pub fn pump(
    host: &mut DialogHost,
    surface: &mut TermSurface,
    allow_rotate: bool,
) -> Result<PumpOutcome> {
    host.start();
    while host.is_showing() {
        let line = surface.term.read_line()?;
        match parse(line.trim()) {
            Some(Input::Event(event)) => host.alert_event(event, surface),
            Some(Input::OutsideTap) => host.outside_tap(surface),
            Some(Input::Back) => host.back_pressed(surface),
            Some(Input::Remote) => {
                // dismiss ourselves the way any other screen would
                request_dismiss(host.identifier());
                host.process_signals();
            }
            Some(Input::Rotate) if allow_rotate => {
                host.stop();
                return Ok(PumpOutcome::RotateRequested);
            }
            Some(Input::Rotate) | None => {
                surface.line(&format!("{}", style("unrecognized input").dim()));
            }
        }
    }
    host.stop();
    Ok(PumpOutcome::Finished)
}
