//! Survey - a worked example of holdover dialog hosting.
//!
//! Each scenario shows a dialog in its own host, drives it with keyboard
//! input through the terminal surface, and prints the single response the
//! host delivers. Run with `RUST_LOG=debug` to watch lifecycle decisions.

mod surface;

use std::cell::Cell;
use std::rc::Rc;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use clap::{Parser, Subcommand};
use console::style;
use holdover::{
    shared_vault, AlertBuilder, AlertContent, BasicAlertContent, CreateOrigin, DialogContent,
    DialogHost, DialogResponse, HostDeps, Params, ResponseCollector, ResponseSink, ResultCode,
    ShowRequest,
};

use surface::{pump, PumpOutcome, TermSurface};

#[derive(Parser)]
#[command(name = "survey", about = "Dialogs that outlive their caller")]
struct Cli {
    #[command(subcommand)]
    scenario: Option<Scenario>,
}

#[derive(Subcommand, Clone, Copy)]
enum Scenario {
    /// A basic message alert with an OK button
    Alert,
    /// Choice lists plus a double-confirm button override
    Choices,
    /// Plain content handed off through the vault, collecting a response
    Form,
    /// Simulated configuration change while an alert is up
    Rotate,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.scenario.unwrap_or(Scenario::Alert) {
        Scenario::Alert => alert_scenario(),
        Scenario::Choices => choices_scenario(),
        Scenario::Form => form_scenario(),
        Scenario::Rotate => rotate_scenario(),
    }
}

/// A sink that prints whatever the host reports back.
fn print_sink() -> Box<dyn ResponseSink> {
    Box::new(|response: DialogResponse| {
        println!();
        println!(
            "{} {:?} from {}",
            style("result:").green().bold(),
            response.code,
            style(&response.identifier).bold()
        );
        if let Some(which) = response.which {
            println!("  which: {which}");
        }
        if let Some(checked) = response.checked {
            println!("  checked: {checked}");
        }
        if let Some(responses) = &response.responses {
            println!(
                "  responses: {}",
                serde_json::to_string(responses).unwrap_or_default()
            );
        }
    })
}

fn alert_scenario() -> Result<()> {
    let mut surface = TermSurface::new();
    let request = ShowRequest::new("sample-alert")
        .content(
            BasicAlertContent::new()
                .title("Sample")
                .message("Sample message")
                .positive_text("OK"),
        )
        .param("origin", "alert-scenario");

    let mut host = DialogHost::create(
        CreateOrigin::Fresh(request),
        HostDeps::new().sink(print_sink()),
        &mut surface,
    )?;
    pump(&mut host, &mut surface, false)?;
    host.destroy(false, &mut surface);
    Ok(())
}

/// Content whose delete button insists on a second click.
struct DeletePrompt {
    clicks: Rc<Cell<u32>>,
}

impl DialogContent for DeletePrompt {
    fn as_alert_content(&mut self) -> Option<&mut dyn AlertContent> {
        Some(self)
    }
}

impl AlertContent for DeletePrompt {
    fn build_alert(&mut self, builder: &mut AlertBuilder) {
        let clicks = Rc::clone(&self.clicks);
        builder
            .title("Cleanup")
            .message("Choose what to remove")
            .single_choice_items(["Cache", "Downloads", "Everything"], Some(0))
            .negative_button("Keep")
            .positive_button("Delete");
        builder.on_positive(move |ctx| {
            let n = clicks.get() + 1;
            clicks.set(n);
            if n >= 2 {
                ctx.dismiss();
            } else {
                println!("{}", style("click [p] again to confirm").yellow());
            }
        });
    }
}

fn choices_scenario() -> Result<()> {
    let mut surface = TermSurface::new();
    let request = ShowRequest::new("cleanup").content(DeletePrompt {
        clicks: Rc::new(Cell::new(0)),
    });

    let mut host = DialogHost::create(
        CreateOrigin::Fresh(request),
        HostDeps::new().sink(print_sink()),
        &mut surface,
    )?;
    pump(&mut host, &mut surface, false)?;
    host.destroy(false, &mut surface);
    Ok(())
}

/// Plain content that collects a typed answer. Vault deposits must be
/// `Send`, so the shared answer slot is an `Arc<Mutex<_>>`.
struct NamePrompt {
    answer: Arc<Mutex<String>>,
}

impl DialogContent for NamePrompt {
    fn as_response_collector(&mut self) -> Option<&mut dyn ResponseCollector> {
        Some(self)
    }
}

impl ResponseCollector for NamePrompt {
    fn collect_responses(&mut self, out: &mut Params) {
        let answer = self.answer.lock().expect("lock poisoned").clone();
        out.insert("name".into(), serde_json::Value::String(answer));
    }
    fn result_code(&self) -> ResultCode {
        ResultCode::Custom(1)
    }
}

fn form_scenario() -> Result<()> {
    let mut surface = TermSurface::new();
    let answer = Arc::new(Mutex::new(String::new()));

    // hand the content off the way a remote caller would: by vault handle
    let handle = shared_vault().deposit(NamePrompt {
        answer: Arc::clone(&answer),
    });
    let request = ShowRequest::new("ask-name").provider(handle).theme(2);

    let mut host = DialogHost::create(
        CreateOrigin::Fresh(request),
        HostDeps::new().sink(print_sink()),
        &mut surface,
    )?;

    host.start();
    println!("What is your name?");
    let line = console::Term::stdout().read_line()?;
    *answer.lock().expect("lock poisoned") = line.trim().to_string();
    host.finish();
    host.stop();
    host.destroy(false, &mut surface);
    Ok(())
}

fn rotate_scenario() -> Result<()> {
    let mut surface = TermSurface::new();
    println!(
        "{}",
        style("type `rot` while the alert is up to simulate a configuration change").dim()
    );

    let request = ShowRequest::new("rotating").content(
        BasicAlertContent::new()
            .title("Still here")
            .message("This alert survives recreation")
            .positive_text("Done")
            .neutral_text("Later"),
    );
    let mut host = DialogHost::create(
        CreateOrigin::Fresh(request),
        HostDeps::new().sink(print_sink()),
        &mut surface,
    )?;

    loop {
        match pump(&mut host, &mut surface, true)? {
            PumpOutcome::Finished => {
                host.destroy(false, &mut surface);
                return Ok(());
            }
            PumpOutcome::RotateRequested => {
                // the same persist/retain/rebuild dance a real runtime does
                let snapshot = host.save_state()?;
                let retained = host.destroy(true, &mut surface);
                println!("{}", style("-- configuration change --").magenta());
                host = DialogHost::create(
                    CreateOrigin::Restored {
                        snapshot,
                        content: retained,
                    },
                    HostDeps::new().sink(print_sink()),
                    &mut surface,
                )?;
            }
        }
    }
}
