//! Timing verification tests for the tooltip scheduler.
//!
//! These run on tokio's paused clock with
//! initial = 1000ms, subsequent = 200ms, cooldown = 3000ms and check:
//! - a settled hover renders exactly once after the delay
//! - an early leave renders nothing
//! - the warm regime applies within the cooldown, the cold one after it
//! - rapid re-entry renders only the last element
//! - at most one waiter is ever alive
//! - repeated clears and shows have no additional effect
//! - each behavior switch
//!
//! The ordering tests run on a real multi-thread runtime with zero delays.

#[cfg(test)]
mod tests {
    use crate::config::{LeavePolicy, ReenterPolicy, ShownRecording, TooltipBehavior, TooltipConfig};
    use crate::request::{TargetId, TooltipPosition};
    use crate::scheduler::{HoverTarget, TooltipScheduler};
    use crate::sink::{RenderSink, TooltipSlot};
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::{sleep_until, Instant};

    /// Allowed deviation from the expected render time.
    const TOLERANCE: Duration = Duration::from_millis(5);

    #[derive(Debug, Clone, PartialEq)]
    enum Event {
        Show(String),
        Clear,
    }

    /// Records sink calls with their offset from test start.
    struct RecordingSink {
        start: Instant,
        events: Mutex<Vec<(Duration, Event)>>,
    }

    impl RecordingSink {
        fn new(start: Instant) -> Arc<Self> {
            Arc::new(Self { start, events: Mutex::new(Vec::new()) })
        }

        fn events(&self) -> Vec<(Duration, Event)> {
            self.events.lock().clone()
        }

        fn shows(&self) -> Vec<(Duration, String)> {
            self.events()
                .into_iter()
                .filter_map(|(at, event)| match event {
                    Event::Show(text) => Some((at, text)),
                    Event::Clear => None,
                })
                .collect()
        }

        fn clears(&self) -> usize {
            self.events().iter().filter(|(_, event)| *event == Event::Clear).count()
        }

        fn record(&self, event: Event) {
            let at = Instant::now().duration_since(self.start);
            self.events.lock().push((at, event));
        }
    }

    impl RenderSink for RecordingSink {
        fn show(&self, text: &str, _position: Option<TooltipPosition>) {
            self.record(Event::Show(text.to_string()));
        }

        fn clear(&self) {
            self.record(Event::Clear);
        }
    }

    /// Sink whose `show` blocks its caller, like a toolkit busy painting.
    struct SlowSink {
        delay: Duration,
        showing: AtomicBool,
        events: Mutex<Vec<Event>>,
    }

    impl SlowSink {
        fn new(delay: Duration) -> Arc<Self> {
            Arc::new(Self {
                delay,
                showing: AtomicBool::new(false),
                events: Mutex::new(Vec::new()),
            })
        }

        fn events(&self) -> Vec<Event> {
            self.events.lock().clone()
        }
    }

    impl RenderSink for SlowSink {
        fn show(&self, text: &str, _position: Option<TooltipPosition>) {
            self.showing.store(true, Ordering::SeqCst);
            std::thread::sleep(self.delay);
            self.events.lock().push(Event::Show(text.to_string()));
        }

        fn clear(&self) {
            self.events.lock().push(Event::Clear);
        }
    }

    fn config() -> TooltipConfig {
        TooltipConfig::new(
            Duration::from_millis(1000),
            Duration::from_millis(200),
            Duration::from_millis(3000),
        )
    }

    fn scheduler_with(config: TooltipConfig) -> (TooltipScheduler, Arc<RecordingSink>, Instant) {
        let start = Instant::now();
        let sink = RecordingSink::new(start);
        let scheduler = TooltipScheduler::on_current_runtime(config, sink.clone());
        (scheduler, sink, start)
    }

    fn zero_delays() -> TooltipConfig {
        TooltipConfig::new(Duration::ZERO, Duration::ZERO, Duration::ZERO)
    }

    /// Poll `done` in wall-clock time, failing after five seconds.
    async fn wait_until(done: impl Fn() -> bool) {
        let deadline = std::time::Instant::now() + Duration::from_secs(5);
        while !done() {
            assert!(std::time::Instant::now() < deadline, "timed out waiting for scheduler");
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
    }

    async fn at(start: Instant, ms: u64) {
        sleep_until(start + Duration::from_millis(ms)).await;
    }

    fn assert_near(actual: Duration, expected_ms: u64) {
        let expected = Duration::from_millis(expected_ms);
        assert!(
            actual >= expected && actual <= expected + TOLERANCE,
            "expected render at ~{:?}, got {:?}",
            expected,
            actual
        );
    }

    // =========================================================================
    // Settled hover
    // =========================================================================

    #[tokio::test(start_paused = true)]
    async fn test_settled_hover_renders_once_after_initial_delay() {
        let (scheduler, sink, start) = scheduler_with(config());
        let a = TargetId::next();

        scheduler.on_enter(a, || "A");
        at(start, 5000).await;

        let shows = sink.shows();
        assert_eq!(shows.len(), 1);
        assert_eq!(shows[0].1, "A");
        assert_near(shows[0].0, 1000);
        assert_eq!(scheduler.visible_target(), Some(a));
        assert!(!scheduler.is_waiting());
    }

    #[tokio::test(start_paused = true)]
    async fn test_early_leave_renders_nothing() {
        let (scheduler, sink, start) = scheduler_with(config());
        let a = TargetId::next();

        scheduler.on_enter(a, || "A");
        at(start, 500).await;
        scheduler.on_leave(a);
        at(start, 3000).await;

        assert!(sink.shows().is_empty());
        assert!(sink.clears() <= 1);
        assert_eq!(scheduler.last_shown_at(), None);
        assert!(!scheduler.is_waiting());
        assert_eq!(scheduler.stats().active_waiters, 0);
    }

    // =========================================================================
    // Delay regimes
    // =========================================================================

    #[tokio::test(start_paused = true)]
    async fn test_subsequent_delay_within_cooldown() {
        let (scheduler, sink, start) = scheduler_with(config());
        let (a, b) = (TargetId::next(), TargetId::next());

        scheduler.on_enter(a, || "A");
        at(start, 1200).await;
        scheduler.on_leave(a);
        at(start, 1500).await;
        scheduler.on_enter(b, || "B");
        at(start, 4000).await;

        let events = sink.events();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].1, Event::Show("A".into()));
        assert_near(events[0].0, 1000);
        assert_eq!(events[1].1, Event::Clear);
        assert_near(events[1].0, 1200);
        assert_eq!(events[2].1, Event::Show("B".into()));
        assert_near(events[2].0, 1700);
    }

    #[tokio::test(start_paused = true)]
    async fn test_initial_delay_after_cooldown() {
        let (scheduler, sink, start) = scheduler_with(config());
        let (a, b) = (TargetId::next(), TargetId::next());

        scheduler.on_enter(a, || "A");
        at(start, 1200).await;
        scheduler.on_leave(a);
        at(start, 5000).await;
        scheduler.on_enter(b, || "B");
        at(start, 8000).await;

        let shows = sink.shows();
        assert_eq!(shows.len(), 2);
        assert_near(shows[0].0, 1000);
        assert_eq!(shows[1].1, "B");
        assert_near(shows[1].0, 6000);
    }

    // =========================================================================
    // Rapid re-entry
    // =========================================================================

    #[tokio::test(start_paused = true)]
    async fn test_rapid_reentry_renders_only_last() {
        let (scheduler, sink, start) = scheduler_with(config());
        let stale_calls = Arc::new(AtomicUsize::new(0));

        let calls = stale_calls.clone();
        scheduler.on_enter(TargetId::next(), move || {
            calls.fetch_add(1, Ordering::SeqCst);
            "A"
        });
        at(start, 300).await;
        let calls = stale_calls.clone();
        scheduler.on_enter(TargetId::next(), move || {
            calls.fetch_add(1, Ordering::SeqCst);
            "B"
        });
        at(start, 600).await;
        scheduler.on_enter(TargetId::next(), || "C");
        at(start, 4000).await;

        let shows = sink.shows();
        assert_eq!(shows.len(), 1);
        assert_eq!(shows[0].1, "C");
        assert_near(shows[0].0, 1600);
        assert_eq!(stale_calls.load(Ordering::SeqCst), 0);

        let stats = scheduler.stats();
        assert_eq!(stats.waiters_spawned, 1);
        assert_eq!(stats.peak_waiters, 1);
        assert_eq!(stats.renders, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_leaving_superseded_element_keeps_new_request() {
        let (scheduler, sink, start) = scheduler_with(config());
        let (a, b) = (TargetId::next(), TargetId::next());

        scheduler.on_enter(a, || "A");
        at(start, 100).await;
        scheduler.on_enter(b, || "B");
        // Leave for A arrives after enter for B
        scheduler.on_leave(a);
        at(start, 3000).await;

        let shows = sink.shows();
        assert_eq!(shows.len(), 1);
        assert_eq!(shows[0].1, "B");
        assert_near(shows[0].0, 1100);
    }

    // =========================================================================
    // Single waiter
    // =========================================================================

    #[tokio::test(start_paused = true)]
    async fn test_at_most_one_waiter_under_churn() {
        let (scheduler, sink, start) = scheduler_with(config());
        let targets: Vec<TargetId> = (0..8).map(|_| TargetId::next()).collect();

        for step in 0..200u64 {
            let target = targets[(step % targets.len() as u64) as usize];
            if step % 3 == 2 {
                scheduler.on_leave(target);
            } else {
                scheduler.on_enter(target, move || format!("{target}"));
            }
            assert!(scheduler.stats().active_waiters <= 1);
            at(start, step * 37).await;
        }
        at(start, 20_000).await;

        let stats = scheduler.stats();
        assert_eq!(stats.peak_waiters, 1);
        assert_eq!(stats.active_waiters, 0);
        assert!(!scheduler.is_waiting());
        assert_eq!(stats.renders, sink.shows().len());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_single_waiter_across_threads() {
        let slot = Arc::new(TooltipSlot::new());
        let scheduler = TooltipScheduler::on_current_runtime(zero_delays(), slot.clone());

        let threads: Vec<_> = (0..4)
            .map(|_| {
                let scheduler = scheduler.clone();
                std::thread::spawn(move || {
                    let target = TargetId::next();
                    for _ in 0..250 {
                        scheduler.on_enter(target, || "busy");
                        scheduler.on_leave(target);
                    }
                })
            })
            .collect();
        for thread in threads {
            thread.join().unwrap();
        }

        let deadline = std::time::Instant::now() + Duration::from_secs(5);
        while scheduler.is_waiting() && std::time::Instant::now() < deadline {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        let stats = scheduler.stats();
        assert!(!scheduler.is_waiting());
        assert_eq!(stats.active_waiters, 0);
        assert_eq!(stats.peak_waiters, 1);
    }

    #[test]
    fn test_runtime_shutdown_releases_waiter() {
        let runtime = tokio::runtime::Builder::new_current_thread().enable_time().build().unwrap();
        let slot = Arc::new(TooltipSlot::new());
        let scheduler = TooltipScheduler::new(config(), slot, runtime.handle().clone());

        scheduler.on_enter(TargetId::next(), || "never");
        assert!(scheduler.is_waiting());
        assert_eq!(scheduler.stats().active_waiters, 1);

        drop(runtime);
        assert!(!scheduler.is_waiting());
        assert_eq!(scheduler.stats().active_waiters, 0);
    }

    // =========================================================================
    // Sink ordering and re-entrancy
    // =========================================================================

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_leave_does_not_wait_for_slow_show() {
        let sink = SlowSink::new(Duration::from_millis(500));
        let scheduler = TooltipScheduler::on_current_runtime(zero_delays(), sink.clone());
        let a = TargetId::next();

        scheduler.on_enter(a, || "A");
        wait_until(|| sink.showing.load(Ordering::SeqCst)).await;

        let started = std::time::Instant::now();
        scheduler.on_leave(a);
        let blocked = started.elapsed();
        assert!(blocked < Duration::from_millis(100), "on_leave blocked for {blocked:?}");
        assert_eq!(scheduler.visible_target(), None);

        // The clear is delivered by the waiter once its show returns
        wait_until(|| scheduler.is_idle()).await;
        assert_eq!(sink.events(), vec![Event::Show("A".into()), Event::Clear]);
        assert_eq!(scheduler.stats().clears, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_content_callback_may_leave_its_own_element() {
        let (scheduler, sink, start) = scheduler_with(config());
        let a = TargetId::next();
        let calls = Arc::new(AtomicUsize::new(0));

        let inner = scheduler.clone();
        let counted = calls.clone();
        scheduler.on_enter(a, move || {
            counted.fetch_add(1, Ordering::SeqCst);
            inner.on_leave(a);
            "A"
        });
        at(start, 3000).await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(sink.events().is_empty());
        assert_eq!(scheduler.last_shown_at(), None);
        assert!(scheduler.is_idle());
        assert_eq!(scheduler.stats().active_waiters, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_content_callback_may_arm_another_element() {
        let (scheduler, sink, start) = scheduler_with(config());
        let (a, b) = (TargetId::next(), TargetId::next());

        let inner = scheduler.clone();
        scheduler.on_enter(a, move || {
            inner.on_enter(b, || "B");
            "A"
        });
        at(start, 5000).await;

        // A's content is discarded; B starts its own cold delay at 1000ms
        let shows = sink.shows();
        assert_eq!(shows.len(), 1);
        assert_eq!(shows[0].1, "B");
        assert_near(shows[0].0, 2000);
        assert_eq!(scheduler.stats().waiters_spawned, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_slot_matches_visible_target_after_concurrent_churn() {
        let slot = Arc::new(TooltipSlot::new());
        let scheduler = TooltipScheduler::on_current_runtime(zero_delays(), slot.clone());

        for round in 0..20 {
            let threads: Vec<_> = (0..4)
                .map(|ix| {
                    let scheduler = scheduler.clone();
                    std::thread::spawn(move || {
                        let target = TargetId::next();
                        for step in 0..200 {
                            scheduler.on_enter(target, move || format!("{target}"));
                            if step % 3 == 0 {
                                std::thread::yield_now();
                            }
                            scheduler.on_leave(target);
                        }
                        // Half the threads end with the pointer still inside
                        if (ix + round) % 2 == 1 {
                            scheduler.on_enter(target, move || format!("{target}"));
                        }
                    })
                })
                .collect();
            for thread in threads {
                thread.join().unwrap();
            }

            wait_until(|| scheduler.is_idle()).await;
            let visible = scheduler.visible_target();
            assert_eq!(slot.is_visible(), visible.is_some(), "round {round}");
            if let Some(target) = visible {
                assert_eq!(slot.current().map(|c| c.text), Some(target.to_string()));
            }
        }

        let stats = scheduler.stats();
        assert_eq!(stats.peak_waiters, 1);
        assert_eq!(stats.active_waiters, 0);
    }

    // =========================================================================
    // Idempotence
    // =========================================================================

    #[tokio::test(start_paused = true)]
    async fn test_repeated_leave_clears_once() {
        let start = Instant::now();
        let slot = Arc::new(TooltipSlot::new());
        let scheduler = TooltipScheduler::on_current_runtime(config(), slot.clone());
        let a = TargetId::next();

        scheduler.on_enter(a, || "A");
        at(start, 1500).await;
        assert!(slot.is_visible());

        scheduler.on_leave(a);
        scheduler.on_leave(a);
        assert!(!slot.is_visible());
        assert_eq!(scheduler.stats().clears, 1);
        assert_eq!(slot.changes(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_same_content_twice_is_one_change() {
        let start = Instant::now();
        let slot = Arc::new(TooltipSlot::new());
        let scheduler = TooltipScheduler::on_current_runtime(config(), slot.clone());
        let a = TargetId::next();

        // Re-hover without leaving: the same text is shown again
        scheduler.on_enter(a, || "A");
        at(start, 1100).await;
        scheduler.on_enter(a, || "A");
        at(start, 2000).await;

        assert_eq!(scheduler.stats().renders, 2);
        assert_eq!(slot.changes(), 1);
    }

    // =========================================================================
    // Behavior switches
    // =========================================================================

    #[tokio::test(start_paused = true)]
    async fn test_reenter_same_element_resets_due() {
        let (scheduler, sink, start) = scheduler_with(config());
        let a = TargetId::next();

        scheduler.on_enter(a, || "A");
        at(start, 500).await;
        scheduler.on_enter(a, || "A");
        at(start, 3000).await;

        assert_near(sink.shows()[0].0, 1500);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reenter_same_element_keeps_due() {
        let behavior = TooltipBehavior { reenter: ReenterPolicy::KeepDue, ..Default::default() };
        let (scheduler, sink, start) = scheduler_with(config().with_behavior(behavior));
        let a = TargetId::next();

        scheduler.on_enter(a, || "old");
        at(start, 500).await;
        scheduler.on_enter(a, || "new");
        at(start, 3000).await;

        let shows = sink.shows();
        assert_eq!(shows.len(), 1);
        assert_eq!(shows[0].1, "new");
        assert_near(shows[0].0, 1000);
    }

    #[tokio::test(start_paused = true)]
    async fn test_leave_of_other_element_keeps_visible_tooltip() {
        let (scheduler, sink, start) = scheduler_with(config());
        let (a, b) = (TargetId::next(), TargetId::next());

        scheduler.on_enter(a, || "A");
        at(start, 1100).await;
        scheduler.on_enter(b, || "B");
        scheduler.on_leave(b);
        at(start, 3000).await;

        assert_eq!(sink.clears(), 0);
        assert_eq!(scheduler.visible_target(), Some(a));
    }

    #[tokio::test(start_paused = true)]
    async fn test_leave_any_visible_clears() {
        let behavior = TooltipBehavior { leave: LeavePolicy::AnyVisible, ..Default::default() };
        let (scheduler, sink, start) = scheduler_with(config().with_behavior(behavior));
        let (a, b) = (TargetId::next(), TargetId::next());

        scheduler.on_enter(a, || "A");
        at(start, 1100).await;
        scheduler.on_enter(b, || "B");
        scheduler.on_leave(b);
        at(start, 3000).await;

        assert_eq!(sink.clears(), 1);
        assert_eq!(sink.shows().len(), 1);
        assert_eq!(scheduler.visible_target(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_request_does_not_warm_up() {
        let (scheduler, sink, start) = scheduler_with(config());
        let (a, b) = (TargetId::next(), TargetId::next());

        scheduler.on_enter(a, || "A");
        at(start, 500).await;
        scheduler.on_leave(a);
        at(start, 1000).await;
        scheduler.on_enter(b, || "B");
        at(start, 4000).await;

        assert_near(sink.shows()[0].0, 2000);
    }

    #[tokio::test(start_paused = true)]
    async fn test_record_on_request_warms_up() {
        let behavior =
            TooltipBehavior { record_shown: ShownRecording::OnRequest, ..Default::default() };
        let (scheduler, sink, start) = scheduler_with(config().with_behavior(behavior));
        let (a, b) = (TargetId::next(), TargetId::next());

        scheduler.on_enter(a, || "A");
        at(start, 500).await;
        scheduler.on_leave(a);
        at(start, 1000).await;
        scheduler.on_enter(b, || "B");
        at(start, 4000).await;

        assert_near(sink.shows()[0].0, 1200);
    }

    // =========================================================================
    // Hover capability
    // =========================================================================

    #[tokio::test(start_paused = true)]
    async fn test_handle_drives_scheduler() {
        let (scheduler, sink, start) = scheduler_with(config());
        let handle = scheduler.handle(TargetId::next(), || "Track 3 - Album");

        handle.on_enter();
        handle.on_move();
        at(start, 1000).await;
        handle.on_move();
        at(start, 1500).await;
        handle.on_leave();

        assert_eq!(
            sink.events().into_iter().map(|(_, e)| e).collect::<Vec<_>>(),
            vec![Event::Show("Track 3 - Album".into()), Event::Clear]
        );
        assert_eq!(scheduler.visible_target(), None);
        assert_eq!(scheduler.pending_target(), None);
    }
}
