//! Abortable Barrier

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// How often a waiting thread re-checks the abort flag.
pub const ABORT_POLL_INTERVAL: Duration = Duration::from_millis(10);

#[derive(Debug, Default)]
struct BarrierState {
    /// Number of threads that must arrive before the barrier opens.
    participants: usize,

    /// Number of threads currently waiting.
    arrived: usize,

    /// Incremented every time the barrier opens.
    generation: u64,
}

/// A reusable rendezvous point for a fixed number of threads that gives up
/// waiting once a shared abort flag is raised.
#[derive(Debug, Default)]
pub struct AbortableBarrier {
    state: Mutex<BarrierState>,
    cvar: Condvar,
}

impl AbortableBarrier {
    /// Create a new barrier for `participants` threads.
    ///
    /// * `participants` - Number of threads that meet at the barrier.
    pub fn new(participants: usize) -> Self {
        Self {
            state: Mutex::new(BarrierState {
                participants,
                ..BarrierState::default()
            }),
            cvar: Condvar::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, BarrierState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Forget any waiting threads and expect `participants` threads from now
    /// on. Only valid while no thread is waiting.
    ///
    /// * `participants` - Number of threads that meet at the barrier.
    pub fn reset(&self, participants: usize) {
        let mut state = self.lock();
        state.participants = participants;
        state.arrived = 0;
        state.generation = state.generation.wrapping_add(1);
    }

    /// Block until every participant has called `wait()`. Returns `false`
    /// without waiting for the others if `abort` is or becomes set.
    ///
    /// * `abort` - The shared abort flag.
    pub fn wait(&self, abort: &AtomicBool) -> bool {
        let mut state = self.lock();
        if abort.load(Ordering::Acquire) {
            return false;
        }

        let generation = state.generation;
        state.arrived += 1;
        if state.arrived >= state.participants {
            state.arrived = 0;
            state.generation = generation.wrapping_add(1);
            self.cvar.notify_all();
            return true;
        }

        while state.generation == generation {
            if abort.load(Ordering::Acquire) {
                state.arrived -= 1;
                return false;
            }
            state = match self.cvar.wait_timeout(state, ABORT_POLL_INTERVAL) {
                Ok((guard, _)) => guard,
                Err(poisoned) => poisoned.into_inner().0,
            };
        }
        true
    }

    /// Wake every waiting thread so it re-checks the abort flag.
    pub fn wake_all(&self) {
        let _state = self.lock();
        self.cvar.notify_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;
    use std::thread;
    use std::time::Instant;

    #[test]
    fn nobody_passes_until_everyone_arrived() {
        const N: usize = 6;
        let barrier = Arc::new(AbortableBarrier::new(N));
        let abort = Arc::new(AtomicBool::new(false));
        let arrived = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..N)
            .map(|i| {
                let (barrier, abort, arrived) = (Arc::clone(&barrier), Arc::clone(&abort), Arc::clone(&arrived));
                thread::spawn(move || {
                    for round in 0..20 {
                        if i == round % N {
                            thread::sleep(Duration::from_millis(1));
                        }
                        arrived.fetch_add(1, Ordering::SeqCst);
                        assert!(barrier.wait(&abort));
                        assert!(arrived.load(Ordering::SeqCst) >= (round + 1) * N);
                        assert!(barrier.wait(&abort));
                    }
                })
            })
            .collect();

        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(arrived.load(Ordering::SeqCst), 20 * N);
    }

    #[test]
    fn abort_releases_waiters() {
        let barrier = Arc::new(AbortableBarrier::new(3));
        let abort = Arc::new(AtomicBool::new(false));

        let waiter = {
            let (barrier, abort) = (Arc::clone(&barrier), Arc::clone(&abort));
            thread::spawn(move || barrier.wait(&abort))
        };

        thread::sleep(Duration::from_millis(20));
        let start = Instant::now();
        abort.store(true, Ordering::Release);
        barrier.wake_all();

        assert!(!waiter.join().unwrap());
        assert!(start.elapsed() < Duration::from_secs(1));
        assert!(!barrier.wait(&abort));
    }

    #[test]
    fn reset_changes_participant_count() {
        let barrier = AbortableBarrier::new(4);
        let abort = AtomicBool::new(false);
        barrier.reset(1);
        assert!(barrier.wait(&abort));
        assert!(barrier.wait(&abort));
    }
}
