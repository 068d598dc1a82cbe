use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

use crate::catalog::Book;
use crate::gate::{AccessGate, GateObserver, SharedSession, TickHandle};

pub const MIN_FONT_SIZE: u32 = 12;
pub const MAX_FONT_SIZE: u32 = 24;
pub const DEFAULT_FONT_SIZE: u32 = 16;
const FONT_STEP: u32 = 2;

/// Why the reader refused to open
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EntryDenied {
    #[error("free reading time exhausted")]
    BudgetExhausted,
}

/// An open reading view
///
/// Owns the tick process for metered reading; closing or dropping the view
/// stops it.
#[derive(Debug)]
pub struct ReadingView {
    book: Book,
    session: SharedSession,
    ticks: Option<TickHandle>,
    current_page: u32,
    font_size: u32,
    dark_mode: bool,
}

impl ReadingView {
    /// Open `book` for the session
    ///
    /// Works not marked premium bypass the gate entirely. Premium works are
    /// metered for free sessions and refused once the budget is spent.
    pub fn open(
        gate: &AccessGate,
        session: &SharedSession,
        book: &Book,
        observer: Arc<dyn GateObserver>,
    ) -> Result<Self, EntryDenied> {
        let ticks = if book.is_premium {
            if gate.is_blocked(&session.snapshot()) {
                info!("Refusing reader for '{}': free budget spent", book.title);
                return Err(EntryDenied::BudgetExhausted);
            }
            Some(gate.start_session(session, observer))
        } else {
            debug!("'{}' is free to read, gate bypassed", book.title);
            None
        };

        info!("Opened reader for '{}'", book.title);

        Ok(Self {
            book: book.clone(),
            session: session.clone(),
            ticks,
            current_page: 1,
            font_size: DEFAULT_FONT_SIZE,
            dark_mode: false,
        })
    }

    pub fn book(&self) -> &Book {
        &self.book
    }

    /// Whether reading time is currently being counted
    pub fn is_metered(&self) -> bool {
        self.ticks.as_ref().is_some_and(TickHandle::is_running)
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn font_size(&self) -> u32 {
        self.font_size
    }

    pub fn is_dark_mode(&self) -> bool {
        self.dark_mode
    }

    pub fn next_page(&mut self) -> u32 {
        self.current_page = (self.current_page + 1).min(self.book.pages).max(1);
        self.current_page
    }

    pub fn previous_page(&mut self) -> u32 {
        self.current_page = self.current_page.saturating_sub(1).max(1);
        self.current_page
    }

    pub fn increase_font(&mut self) -> u32 {
        self.font_size = (self.font_size + FONT_STEP).min(MAX_FONT_SIZE);
        self.font_size
    }

    pub fn decrease_font(&mut self) -> u32 {
        self.font_size = self.font_size.saturating_sub(FONT_STEP).max(MIN_FONT_SIZE);
        self.font_size
    }

    pub fn toggle_dark_mode(&mut self) -> bool {
        self.dark_mode = !self.dark_mode;
        self.dark_mode
    }

    /// Anti-copy watermark identifying the reader
    pub fn watermark(&self) -> String {
        let session = self.session.snapshot();
        format!("{} - {}", session.name, session.user_id)
    }

    /// Close the view and stop metering
    pub fn close(self) {
        drop(self);
    }
}

impl Drop for ReadingView {
    fn drop(&mut self) {
        if let Some(ticks) = &self.ticks {
            AccessGate::stop_session(ticks);
        }
        debug!("Closed reader for '{}'", self.book.title);
    }
}

/// Render a countdown as "{m}m {s}s"
pub fn format_countdown(seconds: u64) -> String {
    format!("{}m {}s", seconds / 60, seconds % 60)
}
