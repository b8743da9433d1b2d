//! Terminal front-end and entry point.
//!
//! This module is the thin runtime around the library: it reads one command
//! per line from stdin, turns it into library events, executes the effects the
//! event handler returns, and prints a fresh frame after every change.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │  current-thread tokio runtime                │
//! │                                              │
//! │   stdin lines ──► Event ──► handle_event     │
//! │                               │              │
//! │                         Vec<Effect>          │
//! │                 ┌─────────────┴──────────┐   │
//! │            LoadBatch                 Dispatch│
//! │          data.batch()       dispatcher.invoke│
//! │                 │                        │   │
//! │           BatchLoaded          FuturesUnordered
//! │                 │                        │   │
//! │                 └──► handle_event ◄── ActionFinished
//! └──────────────────────────────────────────────┘
//! ```
//!
//! Bulk actions run concurrently with input: while one is in flight the table
//! stays interactive and other actions can be started.
//!
//! # Commands
//!
//! In normal mode:
//! - `j`/`down`: Move down
//! - `k`/`up`: Move up
//! - `x`/`space`: Toggle the row under the cursor
//! - `a`: Select all visible rows (again: deselect them)
//! - `c`: Clear the selection
//! - `m`: Toggle multi-select mode
//! - `u`/`o`: Show users / orders
//! - `r`: Refresh the current batch
//! - `1`-`9`: Run the numbered bulk action
//! - `/text`: Filter rows by `text`
//! - `q`: Quit once running bulk actions have finished
//!
//! In search mode:
//! - `/` or `esc`: Clear the filter and leave search mode
//! - `backspace`: Remove the last filter character
//! - any other line: Appended to the filter
//!
//! # Usage
//!
//! ```text
//! bulkbar [--config <PATH>] [KEY=VALUE]...
//! bulkbar --help
//! bulkbar context=orders latency_ms=1500 theme=catppuccin-latte
//! ```

#![allow(clippy::multiple_crate_versions)]

use std::collections::VecDeque;
use std::io::Write;
use std::process::ExitCode;
use std::rc::Rc;

use futures_util::future::LocalBoxFuture;
use futures_util::stream::{FuturesUnordered, StreamExt};
use tokio::io::{AsyncBufReadExt, BufReader};
use clap::Parser;
use tracing::Instrument;

use bulkbar::bulk::{ActionDispatcher, DispatchOutcome, ToastLog};
use bulkbar::domain::Context;
use bulkbar::storage::{DataSource, MemoryStore};
use bulkbar::config::Cli;
use bulkbar::{handle_event, AppState, BulkbarError, Config, Effect, Event, InputMode};

/// Number of toasts kept on screen.
const TOAST_CAPACITY: usize = 3;

type Pending<'d> = FuturesUnordered<LocalBoxFuture<'d, DispatchOutcome>>;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let config = match Cli::parse().into_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("bulkbar: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Some(log_file) = bulkbar::observability::init_tracing(&config) {
        tracing::debug!(log_file = %log_file.display(), "tracing initialized");
    }

    let span = tracing::info_span!("run", context = %config.context, latency_ms = config.latency_ms);
    match run(&config).instrument(span).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "bulkbar stopped");
            eprintln!("bulkbar: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Runs the event loop until `q` or end of input.
///
/// # Errors
///
/// Returns an error if the seed data cannot be loaded, the dispatcher tables
/// are inconsistent, or stdin/stdout fail.
async fn run(config: &Config) -> Result<(), BulkbarError> {
    let store = Rc::new(MemoryStore::seeded()?);
    let data: Rc<dyn DataSource> = store;
    let toasts = Rc::new(ToastLog::new(TOAST_CAPACITY));
    let dispatcher = ActionDispatcher::builtin(config.latency(), Rc::clone(&data), toasts.clone())
        .map_err(|e| BulkbarError::Config(e.to_string()))?;

    let mut runtime = Runtime {
        state: bulkbar::initialize(config),
        dispatcher: &dispatcher,
        data: data.as_ref(),
        toasts: &toasts,
        pending: FuturesUnordered::new(),
        rows: config.rows,
        cols: config.cols,
    };

    let initial = Event::SwitchContext(config.context);
    if !runtime.apply(initial) {
        return Ok(());
    }
    runtime.draw()?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut input_open = true;

    while input_open || !runtime.pending.is_empty() {
        tokio::select! {
            line = lines.next_line(), if input_open => match line? {
                Some(line) => {
                    let events = parse_command(&line, runtime.state.input_mode);
                    if events.is_empty() {
                        tracing::debug!(line = %line, "unrecognized command");
                        continue;
                    }
                    let mut running = true;
                    for event in events {
                        running = runtime.apply(event);
                        if !running {
                            break;
                        }
                    }
                    runtime.draw()?;
                    if !running {
                        tracing::info!(in_flight = runtime.pending.len(), "quit requested");
                        if !runtime.pending.is_empty() {
                            runtime.drain().await;
                            runtime.draw()?;
                        }
                        return Ok(());
                    }
                }
                None => {
                    tracing::debug!(in_flight = runtime.pending.len(), "input closed, draining bulk actions");
                    input_open = false;
                }
            },
            Some(outcome) = runtime.pending.next(), if !runtime.pending.is_empty() => {
                runtime.apply(Event::ActionFinished(outcome));
                runtime.draw()?;
            }
        }
    }

    Ok(())
}

/// What executing an effect leads to.
enum FollowUp {
    /// Feed this event back in right away.
    Event(Event),
    /// Nothing now; a dispatch reports through `pending`.
    Later,
    Quit,
}

/// Runtime state: the library state plus the collaborators effects need.
struct Runtime<'d> {
    state: AppState,
    dispatcher: &'d ActionDispatcher,
    data: &'d dyn DataSource,
    toasts: &'d ToastLog,
    pending: Pending<'d>,
    rows: usize,
    cols: usize,
}

impl<'d> Runtime<'d> {
    /// Handles `event` and every event its effects produce.
    ///
    /// # Returns
    ///
    /// `false` once a [`Effect::Quit`] was produced.
    fn apply(&mut self, event: Event) -> bool {
        let mut queue = VecDeque::from([event]);

        while let Some(event) = queue.pop_front() {
            let effects = match handle_event(&mut self.state, self.dispatcher.registry(), &event) {
                Ok((_, effects)) => effects,
                Err(e) => {
                    tracing::warn!(error = %e, "error handling event");
                    continue;
                }
            };

            for effect in effects {
                match self.execute(effect) {
                    FollowUp::Event(next) => queue.push_back(next),
                    FollowUp::Quit => return false,
                    FollowUp::Later => {}
                }
            }
        }

        true
    }

    /// Waits for every in-flight dispatch and applies its outcome.
    async fn drain(&mut self) {
        while let Some(outcome) = self.pending.next().await {
            self.apply(Event::ActionFinished(outcome));
        }
    }

    fn execute(&mut self, effect: Effect) -> FollowUp {
        match effect {
            Effect::LoadBatch(context) => match self.data.batch(context) {
                Ok(entities) => {
                    tracing::debug!(context = %context, count = entities.len(), "batch loaded");
                    FollowUp::Event(Event::BatchLoaded { context, entities })
                }
                Err(e) => {
                    tracing::warn!(context = %context, error = %e, "failed to load batch");
                    FollowUp::Later
                }
            },
            Effect::Dispatch {
                context,
                action,
                entities,
            } => {
                match self.dispatcher.invoke(context, &action, entities) {
                    Ok(future) => self.pending.push(future),
                    Err(e) => tracing::warn!(context = %context, action = %action, error = %e, "dispatch refused"),
                }
                FollowUp::Later
            }
            Effect::Quit => FollowUp::Quit,
        }
    }

    /// Writes the current frame to stdout.
    fn draw(&self) -> Result<(), BulkbarError> {
        let frame = bulkbar::ui::render(
            &self.state,
            self.dispatcher.registry(),
            &self.toasts.recent(),
            self.rows,
            self.cols,
        );
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(frame.as_bytes())?;
        stdout.write_all(b"\n")?;
        stdout.flush()?;
        Ok(())
    }
}

/// Maps one line of input to the events it stands for.
///
/// Unknown commands map to no events.
fn parse_command(line: &str, mode: InputMode) -> Vec<Event> {
    let command = line.trim();

    if mode == InputMode::Search {
        return match command {
            "/" | "esc" => vec![Event::ExitSearch],
            "backspace" | "bs" => vec![Event::Backspace],
            text => text.chars().map(Event::Char).collect(),
        };
    }

    if let Some(query) = command.strip_prefix('/') {
        let mut events = vec![Event::SearchMode];
        events.extend(query.chars().map(Event::Char));
        return events;
    }

    let event = match command {
        "j" | "down" => Event::KeyDown,
        "k" | "up" => Event::KeyUp,
        "x" | "space" => Event::ToggleRow,
        "a" => Event::SelectAll,
        "c" => Event::ClearSelection,
        "m" => Event::ToggleMultiSelect,
        "u" => Event::SwitchContext(Context::Users),
        "o" => Event::SwitchContext(Context::Orders),
        "r" => Event::Refresh,
        "q" | "quit" => Event::Quit,
        digit => match digit.parse::<usize>() {
            Ok(n @ 1..=9) => Event::InvokeAction(n - 1),
            _ => return vec![],
        },
    };

    vec![event]
}

#[cfg(test)]
mod tests {
    use super::*;
    use bulkbar::bulk::NotificationKind;
    use bulkbar::domain::{Entity, Order, OrderStatus};
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn quit_waits_for_running_actions() {
        let store = Rc::new(MemoryStore::from_entities(vec![
            Entity::from(Order::new("o-1", "Ada", 1000)),
            Entity::from(Order::new("o-2", "Grace", 2000)),
        ]));
        let data: Rc<dyn DataSource> = store.clone();
        let toasts = Rc::new(ToastLog::new(TOAST_CAPACITY));
        let dispatcher =
            ActionDispatcher::builtin(Duration::from_millis(500), Rc::clone(&data), toasts.clone()).unwrap();
        let config = Config {
            context: Context::Orders,
            ..Config::default()
        };
        let mut runtime = Runtime {
            state: bulkbar::initialize(&config),
            dispatcher: &dispatcher,
            data: data.as_ref(),
            toasts: &toasts,
            pending: FuturesUnordered::new(),
            rows: config.rows,
            cols: config.cols,
        };

        assert!(runtime.apply(Event::SwitchContext(Context::Orders)));
        assert!(runtime.apply(Event::SelectAll));
        assert!(runtime.apply(Event::InvokeAction(0)));
        assert_eq!(runtime.pending.len(), 1);
        assert!(!runtime.apply(Event::Quit));

        runtime.drain().await;

        assert!(runtime.pending.is_empty());
        assert!(!dispatcher.registry().actions_for(Context::Orders)[0].is_busy());
        assert_eq!(toasts.latest().unwrap().kind, NotificationKind::Success);
        assert_eq!(store.revision(), 1);
        assert!(runtime.state.table.selection().is_empty());
        let statuses: Vec<OrderStatus> = runtime
            .state
            .table
            .rows()
            .iter()
            .filter_map(Entity::as_order)
            .map(|order| order.status)
            .collect();
        assert_eq!(statuses, vec![OrderStatus::Processed; 2]);
    }

    #[test]
    fn normal_mode_commands() {
        assert_eq!(parse_command("j", InputMode::Normal), vec![Event::KeyDown]);
        assert_eq!(parse_command(" x ", InputMode::Normal), vec![Event::ToggleRow]);
        assert_eq!(
            parse_command("o", InputMode::Normal),
            vec![Event::SwitchContext(Context::Orders)]
        );
        assert_eq!(parse_command("2", InputMode::Normal), vec![Event::InvokeAction(1)]);
        assert!(parse_command("0", InputMode::Normal).is_empty());
        assert!(parse_command("hello", InputMode::Normal).is_empty());
    }

    #[test]
    fn slash_starts_a_filter() {
        assert_eq!(
            parse_command("/ad", InputMode::Normal),
            vec![Event::SearchMode, Event::Char('a'), Event::Char('d')]
        );
    }

    #[test]
    fn search_mode_treats_lines_as_text() {
        assert_eq!(
            parse_command("jk", InputMode::Search),
            vec![Event::Char('j'), Event::Char('k')]
        );
        assert_eq!(parse_command("/", InputMode::Search), vec![Event::ExitSearch]);
        assert_eq!(parse_command("bs", InputMode::Search), vec![Event::Backspace]);
    }
}
