//! Cancellation and the interruptible inter-frame wait.
//!
//! The delay between frames can be minutes long, yet quitting must take
//! effect within a second. [`wait_interruptibly`] sleeps in one-second ticks
//! and polls for cancellation after each tick.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//!
//! use slow_movie::{CancellationToken, Sleeper, WaitOutcome, wait_interruptibly};
//!
//! struct NoSleep;
//! impl Sleeper for NoSleep {
//!     fn sleep(&mut self, _duration: Duration) {}
//! }
//!
//! let token = CancellationToken::new();
//! let mut ticks = 0;
//! let outcome = wait_interruptibly(60, &mut NoSleep, &token, || {
//!     ticks += 1;
//!     ticks == 3
//! });
//! assert_eq!(outcome, WaitOutcome::Cancelled);
//! assert!(token.is_cancelled());
//! ```

use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    thread,
    time::Duration,
};

/// Granularity of the cancellation check during a wait.
pub const WAIT_TICK: Duration = Duration::from_secs(1);

/// Cooperative cancellation token backed by an [`AtomicBool`].
///
/// Clones share state, so a token handed to another thread (or a signal
/// handler) can stop playback at the next poll point.
#[derive(Debug, Clone)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Create a new, non-cancelled token.
    pub fn new() -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Request cancellation. All clones observe it.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Check whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Something that can block the current thread for a while.
pub trait Sleeper {
    fn sleep(&mut self, duration: Duration);
}

/// [`Sleeper`] backed by [`std::thread::sleep`].
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&mut self, duration: Duration) {
        thread::sleep(duration);
    }
}

/// How a wait ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    /// The full delay elapsed.
    Completed,
    /// Cancellation was observed; the token is now cancelled.
    Cancelled,
}

/// Wait `delay_seconds`, one [`WAIT_TICK`] at a time.
///
/// After every tick `poll` is called (typically draining the display's input
/// events) and `token` is checked. Either one requesting cancellation ends
/// the wait early and leaves `token` cancelled, so the worst-case reaction
/// time is one tick.
pub fn wait_interruptibly<S, F>(
    delay_seconds: u64,
    sleeper: &mut S,
    token: &CancellationToken,
    mut poll: F,
) -> WaitOutcome
where
    S: Sleeper + ?Sized,
    F: FnMut() -> bool,
{
    for _ in 0..delay_seconds {
        sleeper.sleep(WAIT_TICK);
        if poll() {
            token.cancel();
        }
        if token.is_cancelled() {
            return WaitOutcome::Cancelled;
        }
    }
    WaitOutcome::Completed
}
