//! Where tooltips end up.
//!
//! The scheduler only decides *when*. A [`RenderSink`] makes the tooltip
//! visible and hides it again. Sinks are called from the waiter's runtime
//! thread as well as the UI thread, so a sink bound to a UI toolkit has to
//! hand the change over to its UI thread itself. [`TooltipSlot`] does that
//! by publishing over a watch channel.

use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::watch;

use crate::request::{TooltipContent, TooltipPosition};

/// Applies and clears the visible tooltip.
pub trait RenderSink: Send + Sync {
    /// Show `text` at `position`. Replaces any tooltip already visible.
    fn show(&self, text: &str, position: Option<TooltipPosition>);

    /// Hide the tooltip. Does nothing when already hidden.
    fn clear(&self);
}

/// Idempotent visible-tooltip record shared with a UI layer.
///
/// Showing identical content while it is visible, or clearing while hidden,
/// changes nothing and wakes no subscriber.
pub struct TooltipSlot {
    tx: watch::Sender<Option<TooltipContent>>,
    changes: AtomicU64,
}

impl TooltipSlot {
    /// Create an empty slot.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx, changes: AtomicU64::new(0) }
    }

    /// Subscribe to visible-tooltip changes.
    pub fn subscribe(&self) -> watch::Receiver<Option<TooltipContent>> {
        self.tx.subscribe()
    }

    /// The tooltip currently visible, if any.
    pub fn current(&self) -> Option<TooltipContent> {
        self.tx.borrow().clone()
    }

    /// Whether a tooltip is visible.
    pub fn is_visible(&self) -> bool {
        self.tx.borrow().is_some()
    }

    /// Number of observable changes so far.
    pub fn changes(&self) -> u64 {
        self.changes.load(Ordering::SeqCst)
    }

    fn publish(&self, modify: impl FnOnce(&mut Option<TooltipContent>) -> bool) {
        if self.tx.send_if_modified(modify) {
            self.changes.fetch_add(1, Ordering::SeqCst);
        }
    }
}

impl Default for TooltipSlot {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderSink for TooltipSlot {
    fn show(&self, text: &str, position: Option<TooltipPosition>) {
        self.publish(|current| {
            let unchanged = current
                .as_ref()
                .is_some_and(|visible| visible.text == text && visible.position == position);
            if unchanged {
                return false;
            }
            *current = Some(TooltipContent { text: text.to_string(), position });
            true
        });
    }

    fn clear(&self) {
        self.publish(|current| current.take().is_some());
    }
}
