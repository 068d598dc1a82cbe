use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tokio::sync::mpsc;

use crate::catalog::Catalog;
use crate::commands::premium::show_plans;
use crate::config::AppConfig;
use crate::gate::{AccessGate, GateEvent, SharedSession, UpsellEnforcer, UserSession};
use crate::premium::{self, Plan};
use crate::reader::{EntryDenied, ReadingView, format_countdown};

/// Reader input commands
#[derive(Debug, PartialEq, Eq)]
enum ReaderInput {
    Next,
    Previous,
    Bigger,
    Smaller,
    Dark,
    Upgrade,
    Status,
    Quit,
    Help,
}

impl ReaderInput {
    fn parse(line: &str) -> Self {
        match line.trim().to_lowercase().as_str() {
            "n" | "next" => ReaderInput::Next,
            "p" | "prev" | "previous" => ReaderInput::Previous,
            "+" => ReaderInput::Bigger,
            "-" => ReaderInput::Smaller,
            "d" | "dark" => ReaderInput::Dark,
            "upgrade" | "premium" => ReaderInput::Upgrade,
            "s" | "status" => ReaderInput::Status,
            "q" | "quit" | "exit" => ReaderInput::Quit,
            _ => ReaderInput::Help,
        }
    }
}

/// How a reading view was left
#[derive(Debug, PartialEq, Eq)]
enum ViewExit {
    Quit,
    Blocked,
}

/// What the reader chose on the upsell page
#[derive(Debug, PartialEq, Eq)]
enum UpsellChoice {
    Upgraded,
    Leave,
}

/// Whether a countdown tick is worth printing
fn should_announce(remaining_seconds: u64) -> bool {
    remaining_seconds % 60 == 0 || remaining_seconds <= 10
}

/// Open the interactive reader on stdin
pub async fn run(
    catalog: &Catalog,
    config: &AppConfig,
    id: &str,
    name: &str,
    start_premium: bool,
    used: u64,
) -> Result<()> {
    let mut user = UserSession::new(name).with_reading_time(used);
    if start_premium {
        user = user.with_premium();
    }
    let session = SharedSession::new(user);

    read_book(catalog, config, id, &session, BufReader::new(tokio::io::stdin())).await?;

    tracing::info!(
        "Reader closed after {}s of reading today",
        session.reading_time_today()
    );

    Ok(())
}

/// Reading loop for one session
///
/// A block leaves the view for the upsell page. Upgrading there reopens the
/// same work for the same session.
async fn read_book<R>(
    catalog: &Catalog,
    config: &AppConfig,
    id: &str,
    session: &SharedSession,
    input: R,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let book = catalog
        .find(id)
        .with_context(|| format!("Book not found: {}", id))?;

    let gate = AccessGate::new(&config.gate);
    let enforcer = UpsellEnforcer::new(gate.limit_seconds());
    let mut lines = input.lines();

    loop {
        let (tx, events) = mpsc::unbounded_channel::<GateEvent>();
        match ReadingView::open(&gate, session, book, Arc::new(tx)) {
            Ok(view) => {
                if read_view(view, events, &gate, session, &mut lines).await? == ViewExit::Quit {
                    return Ok(());
                }
            }
            Err(EntryDenied::BudgetExhausted) => {}
        }

        println!("\n{}", enforcer.enforce_block(&session.snapshot()));
        show_plans(gate.limit_seconds());

        match upsell(session, &mut lines).await? {
            UpsellChoice::Upgraded => continue,
            UpsellChoice::Leave => return Ok(()),
        }
    }
}

async fn read_view<R>(
    mut view: ReadingView,
    mut events: mpsc::UnboundedReceiver<GateEvent>,
    gate: &AccessGate,
    session: &SharedSession,
    lines: &mut Lines<R>,
) -> Result<ViewExit>
where
    R: AsyncBufRead + Unpin,
{
    println!("\n=== {} ===", view.book().title);
    println!("{}", view.watermark());
    print_remaining(gate, session, view.is_metered());
    println!("Commands: n, p, +, -, d, upgrade, status, q\n");

    let mut events_open = true;

    let exit = loop {
        tokio::select! {
            event = events.recv(), if events_open => match event {
                Some(GateEvent::Tick { remaining_seconds, .. }) => {
                    if should_announce(remaining_seconds) {
                        println!("⏱ {} left", format_countdown(remaining_seconds));
                    }
                }
                Some(GateEvent::Blocked { .. }) => break ViewExit::Blocked,
                Some(GateEvent::Unlocked) => {
                    println!("Premium unlocked, reading is now unlimited.");
                }
                None => events_open = false,
            },
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read input")? else {
                    break ViewExit::Quit;
                };

                match ReaderInput::parse(&line) {
                    ReaderInput::Next => {
                        println!("Page {} / {}", view.next_page(), view.book().pages);
                    }
                    ReaderInput::Previous => {
                        println!("Page {} / {}", view.previous_page(), view.book().pages);
                    }
                    ReaderInput::Bigger => println!("Font size {}px", view.increase_font()),
                    ReaderInput::Smaller => println!("Font size {}px", view.decrease_font()),
                    ReaderInput::Dark => {
                        let mode = if view.toggle_dark_mode() { "Night" } else { "Day" };
                        println!("{} mode", mode);
                    }
                    ReaderInput::Upgrade => subscribe(session),
                    ReaderInput::Status => print_status(&view, gate, session),
                    ReaderInput::Quit => break ViewExit::Quit,
                    ReaderInput::Help => {
                        println!("n: next page, p: previous page, +/-: font size, d: night mode, upgrade, status, q: quit");
                    }
                }
            }
        }
    };

    view.close();
    Ok(exit)
}

/// Upsell page shown while blocked; only `upgrade` and `q` do anything
async fn upsell<R>(session: &SharedSession, lines: &mut Lines<R>) -> Result<UpsellChoice>
where
    R: AsyncBufRead + Unpin,
{
    while let Some(line) = lines.next_line().await.context("Failed to read input")? {
        match ReaderInput::parse(&line) {
            ReaderInput::Upgrade => {
                subscribe(session);
                return Ok(UpsellChoice::Upgraded);
            }
            ReaderInput::Quit => return Ok(UpsellChoice::Leave),
            _ => println!("Type 'upgrade' to go Premium or 'q' to leave."),
        }
    }

    Ok(UpsellChoice::Leave)
}

fn subscribe(session: &SharedSession) {
    if premium::upgrade(session, Plan::Monthly) {
        println!("Subscribed: {}", Plan::Monthly.price_label());
    } else {
        println!("Already premium.");
    }
}

fn print_status(view: &ReadingView, gate: &AccessGate, session: &SharedSession) {
    println!(
        "Page {} / {}, font {}px, {} mode",
        view.current_page(),
        view.book().pages,
        view.font_size(),
        if view.is_dark_mode() { "night" } else { "day" }
    );
    print_remaining(gate, session, view.is_metered());
}

fn print_remaining(gate: &AccessGate, session: &SharedSession, metered: bool) {
    if session.is_premium() {
        println!("Premium: unlimited reading");
        return;
    }
    if !metered {
        println!("Free work: not metered");
        return;
    }
    if let Some(seconds) = gate.compute_remaining(&session.snapshot()).seconds() {
        println!("{} left today", format_countdown(seconds));
    }
}
