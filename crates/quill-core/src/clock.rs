//! Clocks and one-shot timers.
//!
//! Widgets never read the system time directly: they are handed an
//! `Arc<dyn Clock>` so tests can drive time deterministically, and an
//! `Arc<dyn Timers>` for one-shot expirations such as key repeat.
//!
//! An [`Expiry`] is a single-writer/single-reader flag. The timer side flips
//! it to `true` exactly once; the frame side polls it. It is never reset, a
//! new timer hands out a new `Expiry`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock, mpsc};
use std::thread::JoinHandle;

use parking_lot::Mutex;
use web_time::{Duration, Instant};

pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> Instant;
}

pub struct SystemClock;
impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock you can drive by hand.
pub struct TestClock {
    t: Mutex<Instant>,
}

impl TestClock {
    pub fn new(t: Instant) -> Self {
        Self { t: Mutex::new(t) }
    }

    pub fn set(&self, t: Instant) {
        *self.t.lock() = t;
    }

    pub fn advance(&self, d: Duration) {
        *self.t.lock() += d;
    }
}

impl Default for TestClock {
    fn default() -> Self {
        Self::new(Instant::now())
    }
}

impl Clock for TestClock {
    fn now(&self) -> Instant {
        *self.t.lock()
    }
}

/// Monotonic "has this timer fired" flag.
#[derive(Clone, Debug, Default)]
pub struct Expiry(Arc<AtomicBool>);

impl Expiry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_expired(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    pub fn fire(&self) {
        self.0.store(true, Ordering::Release);
    }
}

pub trait Timers: Send + Sync + 'static {
    /// Arms a one-shot timer. The returned flag flips once `delay` has elapsed.
    fn arm(&self, delay: Duration) -> Expiry;

    /// Gives pull-based implementations a chance to fire due timers. Called
    /// once at the start of every frame evaluation.
    fn pump(&self) {}
}

/// Fires timers from a background thread.
///
/// Where no thread can be spawned (wasm), it degrades to [`ManualTimers`] on
/// the system clock, fired by [`Timers::pump`] at the start of each frame.
pub struct ThreadTimers {
    backend: Backend,
}

enum Backend {
    Worker(mpsc::Sender<(Instant, Expiry)>),
    Pumped(ManualTimers),
}

impl ThreadTimers {
    pub fn new() -> Self {
        match Self::spawn() {
            Ok((timers, _worker)) => timers,
            Err(e) => {
                log::warn!("timers: failed to spawn worker thread ({e}); firing on pump");
                Self::pumped(Arc::new(SystemClock))
            }
        }
    }

    fn spawn() -> std::io::Result<(Self, JoinHandle<()>)> {
        let (tx, rx) = mpsc::channel();
        let worker = std::thread::Builder::new()
            .name("quill-timers".into())
            .spawn(move || timer_worker(rx))?;
        let timers = Self {
            backend: Backend::Worker(tx),
        };
        Ok((timers, worker))
    }

    /// Threadless instance: timers fire when pumped, against `clock`.
    pub fn pumped(clock: Arc<dyn Clock>) -> Self {
        Self {
            backend: Backend::Pumped(ManualTimers::new(clock)),
        }
    }

    /// Process-wide instance, started on first use.
    pub fn shared() -> Arc<ThreadTimers> {
        static SHARED: OnceLock<Arc<ThreadTimers>> = OnceLock::new();
        SHARED.get_or_init(|| Arc::new(ThreadTimers::new())).clone()
    }

    pub fn is_threaded(&self) -> bool {
        matches!(self.backend, Backend::Worker(_))
    }
}

impl Default for ThreadTimers {
    fn default() -> Self {
        Self::new()
    }
}

impl Timers for ThreadTimers {
    fn arm(&self, delay: Duration) -> Expiry {
        match &self.backend {
            Backend::Worker(tx) => {
                let expiry = Expiry::new();
                if tx.send((Instant::now() + delay, expiry.clone())).is_err() {
                    // The worker only goes away by panicking.
                    log::error!("timers: worker thread is gone; firing immediately");
                    expiry.fire();
                }
                expiry
            }
            Backend::Pumped(timers) => timers.arm(delay),
        }
    }

    fn pump(&self) {
        if let Backend::Pumped(timers) = &self.backend {
            timers.pump();
        }
    }
}

fn timer_worker(rx: mpsc::Receiver<(Instant, Expiry)>) {
    let mut pending: Vec<(Instant, Expiry)> = Vec::new();
    loop {
        let now = Instant::now();
        pending.retain(|(deadline, expiry)| {
            if *deadline <= now {
                expiry.fire();
                false
            } else {
                true
            }
        });

        let next = pending.iter().map(|(deadline, _)| *deadline).min();
        let msg = match next {
            Some(deadline) => match rx.recv_timeout(deadline.saturating_duration_since(now)) {
                Ok(m) => Some(m),
                Err(mpsc::RecvTimeoutError::Timeout) => None,
                Err(mpsc::RecvTimeoutError::Disconnected) => return,
            },
            None => match rx.recv() {
                Ok(m) => Some(m),
                Err(_) => return,
            },
        };
        if let Some(m) = msg {
            pending.push(m);
        }
    }
}

/// Fires timers when pumped, against an injected clock. Suits tests and hosts
/// without threads (wasm).
pub struct ManualTimers {
    clock: Arc<dyn Clock>,
    pending: Mutex<Vec<(Instant, Expiry)>>,
}

impl ManualTimers {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            pending: Mutex::new(Vec::new()),
        }
    }

    pub fn pending(&self) -> usize {
        self.pending.lock().len()
    }
}

impl Timers for ManualTimers {
    fn arm(&self, delay: Duration) -> Expiry {
        let expiry = Expiry::new();
        self.pending
            .lock()
            .push((self.clock.now() + delay, expiry.clone()));
        expiry
    }

    fn pump(&self) {
        let now = self.clock.now();
        self.pending.lock().retain(|(deadline, expiry)| {
            if *deadline <= now {
                expiry.fire();
                false
            } else {
                true
            }
        });
    }
}
