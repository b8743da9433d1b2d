//! End-to-end bulk-action flows: events in, effects executed against the
//! in-memory store and the dispatcher, outcomes fed back.

use std::rc::Rc;
use std::time::Duration;

use futures_util::future::LocalBoxFuture;

use bulkbar::bulk::{ActionDispatcher, DispatchOutcome, NotificationKind, ToastLog};
use bulkbar::domain::{Context, Entity, Order, OrderStatus, User};
use bulkbar::storage::{DataSource, MemoryStore};
use bulkbar::{handle_event, initialize, AppState, Config, Effect, Event};

const LATENCY: Duration = Duration::from_millis(500);

struct Harness {
    state: AppState,
    store: Rc<MemoryStore>,
    toasts: Rc<ToastLog>,
}

/// A harness showing `context`, plus a dispatcher over the same store.
fn setup(context: Context) -> (Harness, ActionDispatcher) {
    let store = Rc::new(MemoryStore::from_entities(vec![
        Entity::from(Order::new("o-1", "Ada", 1000)),
        Entity::from(Order::new("o-2", "Grace", 2000)),
        Entity::from(Order::new("o-3", "Alan", 3000)),
        Entity::from(User::new("u-1", "Barbara", "barbara@example.com")),
        Entity::from(User::new("u-2", "Ken", "ken@example.com")),
    ]));
    let toasts = Rc::new(ToastLog::new(5));
    let data: Rc<dyn DataSource> = store.clone();
    let dispatcher = ActionDispatcher::builtin(LATENCY, data, toasts.clone()).unwrap();

    let config = Config {
        context,
        ..Config::default()
    };
    let mut harness = Harness {
        state: initialize(&config),
        store,
        toasts,
    };
    assert!(harness.send(&dispatcher, Event::SwitchContext(context)).is_empty());
    (harness, dispatcher)
}

impl Harness {
    /// Handles an event, loading batches inline and returning started
    /// dispatches.
    fn send<'d>(&mut self, dispatcher: &'d ActionDispatcher, event: Event) -> Vec<LocalBoxFuture<'d, DispatchOutcome>> {
        let mut queue = vec![event];
        let mut started = Vec::new();

        while let Some(event) = queue.pop() {
            let (_, effects) = handle_event(&mut self.state, dispatcher.registry(), &event).unwrap();
            for effect in effects {
                match effect {
                    Effect::LoadBatch(context) => queue.push(Event::BatchLoaded {
                        context,
                        entities: self.store.batch(context).unwrap(),
                    }),
                    Effect::Dispatch {
                        context,
                        action,
                        entities,
                    } => started.push(dispatcher.invoke(context, &action, entities).unwrap()),
                    Effect::Quit => {}
                }
            }
        }

        started
    }

    fn statuses(&self) -> Vec<OrderStatus> {
        self.state
            .table
            .rows()
            .iter()
            .filter_map(Entity::as_order)
            .map(|order| order.status)
            .collect()
    }
}

fn is_busy(dispatcher: &ActionDispatcher, context: Context, index: usize) -> bool {
    dispatcher.registry().actions_for(context)[index].is_busy()
}

fn single(mut started: Vec<LocalBoxFuture<'_, DispatchOutcome>>) -> LocalBoxFuture<'_, DispatchOutcome> {
    assert_eq!(started.len(), 1, "expected exactly one dispatch");
    started.remove(0)
}

#[tokio::test(start_paused = true)]
async fn processing_orders_updates_rows_and_clears_selection() {
    let (mut harness, dispatcher) = setup(Context::Orders);
    harness.send(&dispatcher, Event::SelectAll);
    assert_eq!(harness.state.table.selection().count(), 3);

    let future = single(harness.send(&dispatcher, Event::InvokeAction(0)));
    let outcome = future.await;

    assert!(matches!(outcome, DispatchOutcome::Succeeded { ref updated, .. } if updated.len() == 3));
    assert!(!is_busy(&dispatcher, Context::Orders, 0));

    harness.send(&dispatcher, Event::ActionFinished(outcome));

    assert!(harness.state.table.selection().is_empty());
    assert_eq!(harness.statuses(), vec![OrderStatus::Processed; 3]);

    let kinds: Vec<NotificationKind> = harness.toasts.recent().iter().map(|toast| toast.kind).collect();
    assert_eq!(kinds, vec![NotificationKind::Started, NotificationKind::Success]);
    assert_eq!(harness.toasts.latest().unwrap().message, "Process: 3 orders updated");
}

#[tokio::test(start_paused = true)]
async fn failed_action_keeps_selection_and_data() {
    let (mut harness, dispatcher) = setup(Context::Orders);
    harness.send(&dispatcher, Event::ToggleRow);
    harness.send(&dispatcher, Event::KeyDown);
    harness.send(&dispatcher, Event::ToggleRow);

    // Pending orders cannot ship.
    let outcome = single(harness.send(&dispatcher, Event::InvokeAction(1))).await;
    assert!(matches!(outcome, DispatchOutcome::Failed { .. }));

    harness.send(&dispatcher, Event::ActionFinished(outcome));

    assert_eq!(harness.state.table.selection().count(), 2);
    assert_eq!(harness.store.revision(), 0);
    assert_eq!(harness.statuses(), vec![OrderStatus::Pending; 3]);

    let latest = harness.toasts.latest().unwrap();
    assert_eq!(latest.kind, NotificationKind::Failure);
    assert!(latest.message.starts_with("Ship failed: o-1 rejected"));
}

#[tokio::test(start_paused = true)]
async fn running_action_refuses_a_second_invocation() {
    let (mut harness, dispatcher) = setup(Context::Orders);
    harness.send(&dispatcher, Event::SelectAll);

    let started = harness.send(&dispatcher, Event::InvokeAction(0));
    assert_eq!(started.len(), 1);
    drop(started);
    assert!(!is_busy(&dispatcher, Context::Orders, 0), "dropped dispatch releases busy");

    let process = single(harness.send(&dispatcher, Event::InvokeAction(0)));
    assert!(is_busy(&dispatcher, Context::Orders, 0));

    let refused = harness.send(&dispatcher, Event::InvokeAction(0));
    assert!(refused.is_empty());
    assert_eq!(harness.state.hint.as_deref(), Some("Process is still running"));

    process.await;
    assert!(!is_busy(&dispatcher, Context::Orders, 0));
}

#[tokio::test(start_paused = true)]
async fn different_actions_run_concurrently() {
    let (mut harness, dispatcher) = setup(Context::Orders);
    harness.send(&dispatcher, Event::SelectAll);

    let mut started = harness.send(&dispatcher, Event::InvokeAction(0));
    started.extend(harness.send(&dispatcher, Event::InvokeAction(2)));
    assert_eq!(started.len(), 2);

    let cancel = started.pop().unwrap();
    let process = started.pop().unwrap();

    let begin = tokio::time::Instant::now();
    let (processed, cancelled) = tokio::join!(process, cancel);

    assert_eq!(begin.elapsed(), LATENCY);
    assert!(matches!(processed, DispatchOutcome::Succeeded { .. }));
    assert!(matches!(cancelled, DispatchOutcome::Succeeded { .. }));
}

#[tokio::test(start_paused = true)]
async fn outcome_for_another_context_leaves_the_table_alone() {
    let (mut harness, dispatcher) = setup(Context::Orders);
    harness.send(&dispatcher, Event::SelectAll);
    let outcome_future = harness.send(&dispatcher, Event::InvokeAction(0)).pop().unwrap();
    let outcome = outcome_future.await;

    harness.send(&dispatcher, Event::SwitchContext(Context::Users));
    harness.send(&dispatcher, Event::ToggleRow);
    harness.send(&dispatcher, Event::ActionFinished(outcome));

    assert_eq!(harness.state.table.context(), Context::Users);
    assert_eq!(harness.state.table.selection().count(), 1);
    assert_eq!(harness.store.revision(), 1);
}

#[tokio::test(start_paused = true)]
async fn frame_shows_the_bulk_action_bar() {
    let (mut harness, dispatcher) = setup(Context::Orders);
    harness.send(&dispatcher, Event::SelectAll);

    let frame = bulkbar::ui::render(
        &harness.state,
        dispatcher.registry(),
        &harness.toasts.recent(),
        24,
        100,
    );

    assert!(frame.contains("3 orders selected"));
    assert!(frame.contains("1 Process"));
    assert!(frame.contains("3 Cancel"));

    harness.send(&dispatcher, Event::ClearSelection);
    let frame = bulkbar::ui::render(&harness.state, dispatcher.registry(), &[], 24, 100);
    assert!(!frame.contains("selected"));
}
