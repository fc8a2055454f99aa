//! Explicit, cancellable tick loop.
//!
//! The [`Scheduler`] owns the tick cadence: each iteration calls
//! [`Engine::step`] and then hands the fresh snapshot to a render consumer.
//! The consumer only ever sees a shared borrow that ends before the next
//! step, which gives the single-writer/single-reader ordering without locks.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crate::engine::Engine;
use crate::particle::ParticleStore;

/// Cloneable flag that stops a running [`Scheduler`] before its next tick.
///
/// Safe to trigger from another thread or from inside the consumer.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    cancelled: Arc<AtomicBool>,
}

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// What the consumer wants the scheduler to do after a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Stop,
}

/// Why a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    TickLimit,
    Cancelled,
    Consumer,
}

/// Outcome of [`Scheduler::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Ticks applied during this run (not counting earlier runs of the same engine).
    pub ticks: u64,
    pub stop_reason: StopReason,
}

/// Repeating step-then-render task.
///
/// With no tick limit and no interval the loop runs as fast as possible until
/// cancelled or until the consumer returns [`Control::Stop`].
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    interval: Option<Duration>,
    tick_limit: Option<u64>,
    cancel: CancelHandle,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Minimum wall-clock time between the start of consecutive ticks.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = Some(interval);
        self
    }

    /// Stop after this many ticks.
    pub fn with_tick_limit(mut self, ticks: u64) -> Self {
        self.tick_limit = Some(ticks);
        self
    }

    /// Handle that cancels this scheduler (and its clones).
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Drives `engine` until the tick limit, cancellation, or `Control::Stop`.
    ///
    /// Cancellation is observed between ticks; a tick is never partially applied.
    pub fn run<E, F>(&self, engine: &mut E, mut consumer: F) -> RunSummary
    where
        E: Engine + ?Sized,
        F: FnMut(u64, &ParticleStore) -> Control,
    {
        let mut ticks = 0u64;
        loop {
            if self.cancel.is_cancelled() {
                return self.finish(ticks, StopReason::Cancelled);
            }
            if self.tick_limit.is_some_and(|limit| ticks >= limit) {
                return self.finish(ticks, StopReason::TickLimit);
            }

            let started = Instant::now();
            engine.step();
            ticks += 1;

            if consumer(engine.tick(), engine.particles()) == Control::Stop {
                return self.finish(ticks, StopReason::Consumer);
            }

            if let Some(interval) = self.interval {
                let elapsed = started.elapsed();
                match interval.checked_sub(elapsed) {
                    Some(remaining) => thread::sleep(remaining),
                    None => log::debug!(
                        "tick {} took {elapsed:?}, over the {interval:?} interval",
                        engine.tick()
                    ),
                }
            }
        }
    }

    fn finish(&self, ticks: u64, stop_reason: StopReason) -> RunSummary {
        log::debug!("scheduler stopped after {ticks} ticks ({stop_reason:?})");
        RunSummary { ticks, stop_reason }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particle::Particle;
    use serde_json::{json, Value};

    struct CountingEngine {
        store: ParticleStore,
        ticks: u64,
    }

    impl CountingEngine {
        fn new() -> Self {
            Self {
                store: ParticleStore::new(vec![Particle::new(0, 0.0, 0.0, 0.0)]),
                ticks: 0,
            }
        }
    }

    impl Engine for CountingEngine {
        fn step(&mut self) {
            self.ticks += 1;
            let t = self.ticks as f64;
            self.store = self.store.map(|p| {
                let mut next = *p;
                next.radius = t;
                next
            });
        }

        fn particles(&self) -> &ParticleStore {
            &self.store
        }

        fn tick(&self) -> u64 {
            self.ticks
        }

        fn params(&self) -> Value {
            json!({})
        }

        fn param_schema(&self) -> Value {
            json!({})
        }
    }

    #[test]
    fn tick_limit_stops_run() {
        let mut engine = CountingEngine::new();
        let summary = Scheduler::new()
            .with_tick_limit(25)
            .run(&mut engine, |_, _| Control::Continue);
        assert_eq!(summary.ticks, 25);
        assert_eq!(summary.stop_reason, StopReason::TickLimit);
        assert_eq!(engine.tick(), 25);
    }

    #[test]
    fn zero_tick_limit_never_steps() {
        let mut engine = CountingEngine::new();
        let summary = Scheduler::new()
            .with_tick_limit(0)
            .run(&mut engine, |_, _| Control::Continue);
        assert_eq!(summary.ticks, 0);
        assert_eq!(engine.tick(), 0);
    }

    #[test]
    fn consumer_sees_every_tick_after_step() {
        let mut engine = CountingEngine::new();
        let mut seen = Vec::new();
        Scheduler::new().with_tick_limit(5).run(&mut engine, |tick, store| {
            // the snapshot already reflects the tick it is reported with
            seen.push((tick, store.get(0).map(|p| p.radius)));
            Control::Continue
        });
        let expected: Vec<_> = (1..=5).map(|t| (t, Some(t as f64))).collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn consumer_can_stop_the_loop() {
        let mut engine = CountingEngine::new();
        let summary = Scheduler::new().run(&mut engine, |tick, _| {
            if tick == 3 {
                Control::Stop
            } else {
                Control::Continue
            }
        });
        assert_eq!(summary.ticks, 3);
        assert_eq!(summary.stop_reason, StopReason::Consumer);
    }

    #[test]
    fn cancel_from_inside_consumer_stops_before_next_tick() {
        let mut engine = CountingEngine::new();
        let scheduler = Scheduler::new();
        let handle = scheduler.cancel_handle();
        let summary = scheduler.run(&mut engine, |tick, _| {
            if tick == 7 {
                handle.cancel();
            }
            Control::Continue
        });
        assert_eq!(summary.ticks, 7);
        assert_eq!(summary.stop_reason, StopReason::Cancelled);
    }

    #[test]
    fn cancel_before_run_applies_no_ticks() {
        let mut engine = CountingEngine::new();
        let scheduler = Scheduler::new();
        scheduler.cancel_handle().cancel();
        let summary = scheduler.run(&mut engine, |_, _| Control::Continue);
        assert_eq!(summary.ticks, 0);
        assert_eq!(summary.stop_reason, StopReason::Cancelled);
    }

    #[test]
    fn cancel_from_another_thread() {
        let mut engine = CountingEngine::new();
        let scheduler = Scheduler::new().with_interval(Duration::from_millis(1));
        let handle = scheduler.cancel_handle();
        let canceller = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            handle.cancel();
        });
        let summary = scheduler.run(&mut engine, |_, _| Control::Continue);
        canceller.join().unwrap();
        assert_eq!(summary.stop_reason, StopReason::Cancelled);
        assert!(summary.ticks > 0);
    }

    #[test]
    fn interval_paces_ticks() {
        let mut engine = CountingEngine::new();
        let started = Instant::now();
        Scheduler::new()
            .with_interval(Duration::from_millis(5))
            .with_tick_limit(4)
            .run(&mut engine, |_, _| Control::Continue);
        assert!(started.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn works_with_dyn_engine() {
        let mut engine: Box<dyn Engine> = Box::new(CountingEngine::new());
        let summary = Scheduler::new()
            .with_tick_limit(2)
            .run(engine.as_mut(), |_, _| Control::Continue);
        assert_eq!(summary.ticks, 2);
    }
}
