//! Page simulator for the QuickPress overlay.
//!
//! Loads a page fixture (JSON array of element snapshots), replays a script of
//! steps against an `OverlayController` backed by the in-memory document, and
//! prints what the overlay showed and which controls were activated.
//!
//! Run with: cargo run -- --page demos/page.json --steps "ctrl+q,/save,1"
//!
//! Steps (comma separated):
//! - `ctrl+q`, `escape`, `3` - key presses from the focused element; once the
//!   overlay search field has focus, plain characters are typed into it
//! - `input:3` - a key press while focus is inside a page text input
//! - `/text` - type into the overlay search field
//! - `@N` - click list entry N (0-based)
//! - `!highlight` - deliver a `HIGHLIGHT` message

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::info;

use quickpress::config::{
    default_settings_path, seed_default_shortcut, ConfigStore, InstallReason, JsonFileStore,
    MemoryStore,
};
use quickpress::error::{QuickPressError, ResultExt};
use quickpress::host::synthetic::{load_page_fixture, Focus, SyntheticDocument};
use quickpress::messaging::RuntimeMessage;
use quickpress::{logging, EventTarget, KeyDisposition, KeyEvent, OverlayController};

/// QuickPress - replay keyboard sessions against a page fixture
#[derive(Parser)]
#[command(name = "quickpress")]
#[command(about = "Replay keyboard sessions against a page fixture")]
#[command(version)]
struct Cli {
    /// Page fixture: JSON array of element snapshots in document order
    #[arg(long)]
    page: PathBuf,

    /// Comma-separated steps to replay
    #[arg(long, default_value = "ctrl+q")]
    steps: String,

    /// Settings file (defaults to ~/.quickpress/settings.json)
    #[arg(long, conflicts_with = "no_settings")]
    settings: Option<PathBuf>,

    /// Use an in-memory settings store instead of a file
    #[arg(long)]
    no_settings: bool,

    /// Print the recent log buffer at the end
    #[arg(long)]
    show_log: bool,
}

enum Step {
    /// Dispatched from whatever the document has focused.
    Key(KeyEvent),
    /// Dispatched from a page text input.
    KeyInField(KeyEvent),
    Search(String),
    Click(usize),
    Highlight,
}

impl Step {
    fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        if let Some(query) = raw.strip_prefix('/') {
            return Ok(Step::Search(query.to_string()));
        }
        if let Some(index) = raw.strip_prefix('@') {
            let index = index
                .parse()
                .with_context(|| format!("invalid entry index in step '{}'", raw))?;
            return Ok(Step::Click(index));
        }
        if raw.eq_ignore_ascii_case("!highlight") {
            return Ok(Step::Highlight);
        }
        if let Some(key) = raw.strip_prefix("input:") {
            let event = KeyEvent::parse(key)?.on_target(EventTarget::element("input"));
            return Ok(Step::KeyInField(event));
        }
        Ok(Step::Key(KeyEvent::parse(raw)?))
    }
}

fn open_store(cli: &Cli) -> Result<Arc<dyn ConfigStore>> {
    if cli.no_settings {
        return Ok(Arc::new(MemoryStore::new()));
    }
    let path = cli.settings.clone().unwrap_or_else(default_settings_path);
    let first_run = !path.exists();
    let store = JsonFileStore::new(path);
    if first_run {
        // A failed seed surfaces again when the controller reads the store.
        seed_default_shortcut(&store, InstallReason::Install).log_err();
    }
    Ok(Arc::new(store))
}

/// Append a printable key to the search query when the search field has focus.
fn type_into_search(
    controller: &mut OverlayController<SyntheticDocument>,
    event: &KeyEvent,
) -> bool {
    if controller.host().focused() != Some(Focus::SearchField)
        || event.ctrl
        || event.alt
        || event.meta
        || event.key.chars().count() != 1
    {
        return false;
    }
    let Some(session) = controller.session() else {
        return false;
    };
    let query = format!("{}{}", session.view().query, event.key);
    controller.on_search_input(&query);
    true
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let _guard = logging::init();

    let fixture = std::fs::read_to_string(&cli.page)
        .with_context(|| format!("failed to read page fixture {}", cli.page.display()))?;
    let elements = load_page_fixture(&fixture)
        .with_context(|| format!("failed to parse page fixture {}", cli.page.display()))?;

    let steps = cli
        .steps
        .split(',')
        .filter(|s| !s.trim().is_empty())
        .map(Step::parse)
        .collect::<Result<Vec<_>>>()?;
    if steps.is_empty() {
        bail!("no steps to replay");
    }

    let store = open_store(&cli)?;
    let mut controller = OverlayController::new(SyntheticDocument::new(elements));
    if let Err(e) = controller.connect_config(&store) {
        let err = QuickPressError::from(e);
        eprintln!("{}. Using {}.", err.user_message(), controller.gesture());
    }

    info!(
        event_type = "app_lifecycle",
        action = "replay",
        steps = steps.len(),
        gesture = %controller.gesture(),
        "Replaying steps"
    );
    println!("Activation gesture: {}", controller.gesture());

    for (raw, step) in cli.steps.split(',').filter(|s| !s.trim().is_empty()).zip(steps) {
        controller.pump_config_changes();

        let outcome = match step {
            Step::Key(event) => {
                let event = event.on_target(controller.host().focused_target());
                match controller.handle_key_event(&event) {
                    KeyDisposition::Handled => "handled",
                    KeyDisposition::Passthrough if type_into_search(&mut controller, &event) => {
                        "typed"
                    }
                    KeyDisposition::Passthrough => "passthrough",
                }
            }
            Step::KeyInField(event) => match controller.handle_key_event(&event) {
                KeyDisposition::Handled => "handled",
                KeyDisposition::Passthrough => "passthrough",
            },
            Step::Search(query) => {
                controller.on_search_input(&query);
                "filtered"
            }
            Step::Click(index) => {
                controller.on_entry_click(index);
                "clicked"
            }
            Step::Highlight => {
                let response = controller.handle_message(&RuntimeMessage::Highlight);
                if response.ok {
                    "acknowledged"
                } else {
                    "rejected"
                }
            }
        };

        for _ in 0..controller.host_mut().take_animation_frames() {
            controller.on_animation_frame();
        }

        println!("> {:<12} {:<12} {:?}", raw.trim(), outcome, controller.phase());
        if let Some(session) = controller.session() {
            print!("{}", session.view().to_text());
        }
    }

    let doc = controller.host();
    if doc.activations().is_empty() {
        println!("No controls activated.");
    }
    for record in doc.activations() {
        println!(
            "Activated element {} (overlay present: {}, marks left: {})",
            record.element.0, record.overlay_present, record.marked_elements
        );
    }

    if cli.show_log {
        println!("--- recent log ---");
        for line in logging::get_recent_logs() {
            println!("{}", line);
        }
    }

    Ok(())
}
