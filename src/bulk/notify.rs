//! User-facing notifications emitted by the dispatcher.
//!
//! The dispatcher only ever writes notifications; it never reads them back.
//! [`ToastLog`] is the collaborator used by the terminal front-end: it keeps a
//! short history for the toast area and logs every notification.

use std::cell::RefCell;
use std::collections::VecDeque;

/// Stage of a bulk action a notification reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Started,
    Success,
    Failure,
}

/// A single notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

/// Consumer of dispatcher notifications.
pub trait Notifier {
    fn notify(&self, kind: NotificationKind, message: &str);
}

/// Bounded, most-recent-last notification history.
///
/// # Example
///
/// ```
/// use bulkbar::bulk::{NotificationKind, Notifier, ToastLog};
///
/// let toasts = ToastLog::new(2);
/// toasts.notify(NotificationKind::Started, "one");
/// toasts.notify(NotificationKind::Success, "two");
/// toasts.notify(NotificationKind::Started, "three");
///
/// let recent = toasts.recent();
/// assert_eq!(recent.len(), 2);
/// assert_eq!(recent[1].message, "three");
/// ```
#[derive(Debug)]
pub struct ToastLog {
    capacity: usize,
    entries: RefCell<VecDeque<Notification>>,
}

impl ToastLog {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: RefCell::new(VecDeque::new()),
        }
    }

    /// Snapshot of the retained notifications, oldest first.
    #[must_use]
    pub fn recent(&self) -> Vec<Notification> {
        self.entries.borrow().iter().cloned().collect()
    }

    /// The newest notification, if any.
    #[must_use]
    pub fn latest(&self) -> Option<Notification> {
        self.entries.borrow().back().cloned()
    }
}

impl Notifier for ToastLog {
    fn notify(&self, kind: NotificationKind, message: &str) {
        match kind {
            NotificationKind::Failure => tracing::warn!(kind = ?kind, message = %message, "bulk action notification"),
            _ => tracing::info!(kind = ?kind, message = %message, "bulk action notification"),
        }

        let mut entries = self.entries.borrow_mut();
        if entries.len() == self.capacity {
            entries.pop_front();
        }
        entries.push_back(Notification {
            kind,
            message: message.to_string(),
        });
    }
}
