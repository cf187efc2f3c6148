//! Tooltip display scheduling.
//!
//! Interactive elements report pointer enter/leave to a [`TooltipScheduler`].
//! The scheduler keeps at most one pending request and at most one
//! background waiter. The waiter sleeps until the pending request is due,
//! rechecks on every wake, and renders only if the request is still current.
//! Cancellation is implicit: clearing the pending request is enough for the
//! waiter to exit on its next wake.
//!
//! No lock is held while a content callback or a sink method runs. State
//! transitions queue their sink commands in an outbox under the state lock,
//! and whichever caller wins the `drain` try-lock applies them in order.
//! A caller that loses the try-lock returns immediately; the winner picks up
//! its commands before releasing.

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::time::Instant;

use crate::config::{LeavePolicy, ReenterPolicy, ShownRecording, TooltipConfig};
use crate::logging::{SCHEDULER_TARGET, WAITER_TARGET};
use crate::policy::DelayPolicy;
use crate::request::{content_fn, ContentFn, TargetId, TooltipContent, TooltipRequest};
use crate::sink::RenderSink;

/// A request together with the time it becomes due.
#[derive(Debug)]
struct PendingTooltip {
    request: TooltipRequest,
    due_at: Instant,
}

/// Sink call produced by a state transition, applied outside the state lock.
#[derive(Debug)]
enum SinkCommand {
    Show { target: TargetId, content: TooltipContent },
    Clear { target: TargetId },
}

/// State shared between the UI thread and the waiter.
#[derive(Debug, Default)]
struct SchedulerState {
    /// Most recent hovered element awaiting display.
    pending: Option<PendingTooltip>,
    /// Bumped every time `pending` is replaced or dropped.
    generation: u64,
    /// Time of the most recent display. `None` is the infinite past.
    last_shown_at: Option<Instant>,
    /// True while a waiter task is alive.
    waiter_active: bool,
    /// Element whose tooltip is on screen.
    visible: Option<TargetId>,
    /// Sink commands not yet applied, oldest first.
    outbox: VecDeque<SinkCommand>,
}

#[derive(Debug, Default)]
struct Counters {
    active_waiters: AtomicUsize,
    peak_waiters: AtomicUsize,
    waiters_spawned: AtomicUsize,
    renders: AtomicUsize,
    clears: AtomicUsize,
}

/// Snapshot of scheduler instrumentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SchedulerStats {
    /// Waiter tasks currently alive.
    pub active_waiters: usize,
    /// Highest number of simultaneously alive waiters observed.
    pub peak_waiters: usize,
    /// Waiter tasks started since construction.
    pub waiters_spawned: usize,
    /// `show` calls made on the sink.
    pub renders: usize,
    /// `clear` calls made on the sink.
    pub clears: usize,
}

struct Shared {
    config: TooltipConfig,
    policy: DelayPolicy,
    state: Mutex<SchedulerState>,
    /// Held by the one caller currently applying the outbox.
    drain: Mutex<()>,
    sink: Arc<dyn RenderSink>,
    runtime: Handle,
    counters: Counters,
}

impl Shared {
    /// Apply queued sink commands unless another caller already is.
    fn drain_outbox(&self) {
        loop {
            let Some(draining) = self.drain.try_lock() else {
                return;
            };
            loop {
                let Some(command) = self.state.lock().outbox.pop_front() else {
                    break;
                };
                self.apply(command);
            }
            drop(draining);

            // A command queued after our last pop but before the unlock
            // found the drain busy and left it to us.
            if self.state.lock().outbox.is_empty() {
                return;
            }
        }
    }

    fn apply(&self, command: SinkCommand) {
        match command {
            SinkCommand::Show { target, content } => {
                self.sink.show(&content.text, content.position);
                self.counters.renders.fetch_add(1, Ordering::SeqCst);
                tracing::debug!(target: SCHEDULER_TARGET, %target, "Tooltip shown");
            }
            SinkCommand::Clear { target } => {
                self.sink.clear();
                self.counters.clears.fetch_add(1, Ordering::SeqCst);
                tracing::debug!(target: SCHEDULER_TARGET, %target, "Tooltip cleared");
            }
        }
    }
}

/// Decides when to show a delayed tooltip for hovered elements.
///
/// Cloning is cheap; clones share the same state.
#[derive(Clone)]
pub struct TooltipScheduler {
    shared: Arc<Shared>,
}

impl TooltipScheduler {
    /// Create a scheduler whose waiters run on `runtime`.
    pub fn new(config: TooltipConfig, sink: Arc<dyn RenderSink>, runtime: Handle) -> Self {
        let policy = DelayPolicy::from(&config);
        Self {
            shared: Arc::new(Shared {
                config,
                policy,
                state: Mutex::new(SchedulerState::default()),
                drain: Mutex::new(()),
                sink,
                runtime,
                counters: Counters::default(),
            }),
        }
    }

    /// Create a scheduler on the tokio runtime of the calling context.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn on_current_runtime(config: TooltipConfig, sink: Arc<dyn RenderSink>) -> Self {
        Self::new(config, sink, Handle::current())
    }

    /// Configuration this scheduler was built with.
    pub fn config(&self) -> &TooltipConfig {
        &self.shared.config
    }

    /// The pointer entered `target`. `content` is called only if the tooltip
    /// is eventually shown.
    pub fn on_enter<F, C>(&self, target: TargetId, content: F)
    where
        F: Fn() -> C + Send + Sync + 'static,
        C: Into<TooltipContent>,
    {
        self.enter(TooltipRequest::new(target, content_fn(content)));
    }

    /// Arm `request`, replacing whatever was pending.
    pub fn enter(&self, request: TooltipRequest) {
        let behavior = self.shared.config.behavior;
        let now = Instant::now();
        let target = request.target();

        let spawn = {
            let mut state = self.shared.state.lock();
            let due_at = match &state.pending {
                Some(pending)
                    if behavior.reenter == ReenterPolicy::KeepDue
                        && pending.request.target() == target =>
                {
                    pending.due_at
                }
                _ => now + self.shared.policy.delay(now, state.last_shown_at),
            };
            if behavior.record_shown == ShownRecording::OnRequest {
                state.last_shown_at = Some(now);
            }
            state.pending = Some(PendingTooltip { request, due_at });
            state.generation += 1;
            tracing::debug!(
                target: SCHEDULER_TARGET,
                %target,
                delay_ms = due_at.saturating_duration_since(now).as_millis() as u64,
                "Tooltip armed"
            );

            if state.waiter_active {
                false
            } else {
                state.waiter_active = true;
                true
            }
        };

        if spawn {
            self.spawn_waiter();
        }
    }

    /// The pointer left `target`.
    ///
    /// Drops the pending request if it belongs to `target` and hides a
    /// visible tooltip according to the leave policy. The clear reaches the
    /// sink before this returns unless another thread is mid-way through a
    /// sink call, in which case that thread delivers it right after.
    pub fn on_leave(&self, target: TargetId) {
        {
            let mut state = self.shared.state.lock();

            if state.pending.as_ref().is_some_and(|pending| pending.request.target() == target) {
                state.pending = None;
                state.generation += 1;
                tracing::debug!(target: SCHEDULER_TARGET, %target, "Pending tooltip cancelled");
            }

            let clear = match self.shared.config.behavior.leave {
                LeavePolicy::ShownElementOnly => state.visible == Some(target),
                LeavePolicy::AnyVisible => state.visible.is_some(),
            };
            if !clear {
                return;
            }
            state.visible = None;
            state.outbox.push_back(SinkCommand::Clear { target });
        }

        self.shared.drain_outbox();
    }

    /// The pointer moved within `target`. Tooltips do not follow the pointer.
    pub fn on_move(&self, _target: TargetId) {}

    /// Bind `target` and its content callback into a [`TooltipHandle`].
    pub fn handle<F, C>(&self, target: TargetId, content: F) -> TooltipHandle
    where
        F: Fn() -> C + Send + Sync + 'static,
        C: Into<TooltipContent>,
    {
        TooltipHandle { scheduler: self.clone(), target, content: content_fn(content) }
    }

    /// Element whose tooltip is currently on screen.
    pub fn visible_target(&self) -> Option<TargetId> {
        self.shared.state.lock().visible
    }

    /// Element waiting for its tooltip.
    pub fn pending_target(&self) -> Option<TargetId> {
        self.shared.state.lock().pending.as_ref().map(|pending| pending.request.target())
    }

    /// Time of the last display, if any.
    pub fn last_shown_at(&self) -> Option<Instant> {
        self.shared.state.lock().last_shown_at
    }

    /// Whether a waiter task is alive.
    pub fn is_waiting(&self) -> bool {
        self.shared.state.lock().waiter_active
    }

    /// No waiter is alive and every sink command has been applied.
    pub fn is_idle(&self) -> bool {
        let state = self.shared.state.lock();
        !state.waiter_active && state.outbox.is_empty() && !self.shared.drain.is_locked()
    }

    /// Instrumentation counters.
    pub fn stats(&self) -> SchedulerStats {
        let counters = &self.shared.counters;
        SchedulerStats {
            active_waiters: counters.active_waiters.load(Ordering::SeqCst),
            peak_waiters: counters.peak_waiters.load(Ordering::SeqCst),
            waiters_spawned: counters.waiters_spawned.load(Ordering::SeqCst),
            renders: counters.renders.load(Ordering::SeqCst),
            clears: counters.clears.load(Ordering::SeqCst),
        }
    }

    fn spawn_waiter(&self) {
        let counters = &self.shared.counters;
        let alive = counters.active_waiters.fetch_add(1, Ordering::SeqCst) + 1;
        counters.peak_waiters.fetch_max(alive, Ordering::SeqCst);
        counters.waiters_spawned.fetch_add(1, Ordering::SeqCst);

        let waiter = Waiter { shared: self.shared.clone(), retired: false };
        tracing::trace!(target: WAITER_TARGET, "Spawning tooltip waiter");
        self.shared.runtime.spawn(waiter.run());
    }
}

impl std::fmt::Debug for TooltipScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TooltipScheduler")
            .field("config", &self.shared.config)
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}

/// Outcome of one waiter iteration.
enum Step {
    Sleep(Duration),
    /// Pending changed while content was being built.
    Recheck,
    Done,
}

/// Background task that fires the pending tooltip once it is due.
struct Waiter {
    shared: Arc<Shared>,
    retired: bool,
}

impl Waiter {
    async fn run(mut self) {
        loop {
            match self.step() {
                Step::Sleep(remaining) => tokio::time::sleep(remaining).await,
                Step::Recheck => continue,
                Step::Done => return,
            }
        }
    }

    fn step(&mut self) -> Step {
        let shared = self.shared.clone();

        let (request, generation) = {
            let mut state = shared.state.lock();
            let now = Instant::now();

            let Some((request, due_at)) =
                state.pending.as_ref().map(|pending| (pending.request.clone(), pending.due_at))
            else {
                self.retire(&mut state);
                tracing::trace!(target: WAITER_TARGET, "Nothing pending, waiter exiting");
                return Step::Done;
            };

            if now < due_at {
                let remaining = due_at - now;
                tracing::trace!(
                    target: WAITER_TARGET,
                    remaining_ms = remaining.as_millis() as u64,
                    "Waiter sleeping"
                );
                return Step::Sleep(remaining);
            }

            (request, state.generation)
        };

        // The callback may re-enter the scheduler, so it runs unlocked.
        let content = request.content();
        let target = request.target();

        {
            let mut state = shared.state.lock();
            if state.generation != generation {
                tracing::trace!(
                    target: WAITER_TARGET,
                    %target,
                    "Request replaced while building content"
                );
                return Step::Recheck;
            }

            state.pending = None;
            state.generation += 1;
            state.last_shown_at = Some(Instant::now());
            state.visible = Some(target);
            state.outbox.push_back(SinkCommand::Show { target, content });
            self.retire(&mut state);
        }

        shared.drain_outbox();
        Step::Done
    }

    /// Mark this waiter as gone. Must be called with the state lock held so a
    /// successor cannot be counted before this one is uncounted.
    fn retire(&mut self, state: &mut SchedulerState) {
        if self.retired {
            return;
        }
        self.retired = true;
        state.waiter_active = false;
        self.shared.counters.active_waiters.fetch_sub(1, Ordering::SeqCst);
    }
}

impl Drop for Waiter {
    // Runtime shutdown drops the task mid-sleep.
    fn drop(&mut self) {
        if !self.retired {
            let shared = self.shared.clone();
            let mut state = shared.state.lock();
            self.retire(&mut state);
            tracing::trace!(target: WAITER_TARGET, "Waiter dropped before completion");
        }
    }
}


/// Hover capability of an interactive element.
pub trait HoverTarget {
    /// The pointer entered the element.
    fn on_enter(&self);
    /// The pointer left the element.
    fn on_leave(&self);
    /// The pointer moved within the element.
    fn on_move(&self);
}

/// An element's binding to a scheduler: its id and content callback.
#[derive(Clone)]
pub struct TooltipHandle {
    scheduler: TooltipScheduler,
    target: TargetId,
    content: ContentFn,
}

impl TooltipHandle {
    /// The element id.
    pub fn target(&self) -> TargetId {
        self.target
    }
}

impl HoverTarget for TooltipHandle {
    fn on_enter(&self) {
        self.scheduler.enter(TooltipRequest::new(self.target, self.content.clone()));
    }

    fn on_leave(&self) {
        self.scheduler.on_leave(self.target);
    }

    fn on_move(&self) {
        self.scheduler.on_move(self.target);
    }
}

impl std::fmt::Debug for TooltipHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TooltipHandle").field("target", &self.target).finish_non_exhaustive()
    }
}
