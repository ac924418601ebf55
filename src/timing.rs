use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use futures_timer::Delay;

#[derive(Debug, Default)]
struct DebounceState {
    latest: u64,
    pending: Option<u64>,
}

/// Delays work until a quiet period has passed with no newer request.
///
/// Every [`Debouncer::run`] takes a fresh ticket; only the holder of the
/// latest uncancelled ticket gets to execute once the delay elapses.
#[derive(Clone, Debug)]
pub struct Debouncer {
    delay: Duration,
    state: Arc<Mutex<DebounceState>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            state: Arc::new(Mutex::new(DebounceState::default())),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub async fn run<F, R>(&self, f: F) -> Option<R>
    where
        F: FnOnce() -> R,
    {
        let armed = Armed {
            debouncer: self,
            ticket: self.arm(),
        };
        Delay::new(self.delay).await;
        if !self.settle(armed.ticket) {
            return None;
        }
        Some(f())
    }

    pub fn cancel(&self) -> bool {
        self.lock().pending.take().is_some()
    }

    pub fn is_pending(&self) -> bool {
        self.lock().pending.is_some()
    }

    fn arm(&self) -> u64 {
        let mut state = self.lock();
        state.latest = state.latest.wrapping_add(1);
        state.pending = Some(state.latest);
        state.latest
    }

    fn settle(&self, ticket: u64) -> bool {
        let mut state = self.lock();
        if state.pending != Some(ticket) {
            return false;
        }
        state.pending = None;
        true
    }

    fn lock(&self) -> MutexGuard<'_, DebounceState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

// Disarms the ticket when a run is dropped before its delay elapses.
struct Armed<'a> {
    debouncer: &'a Debouncer,
    ticket: u64,
}

impl Drop for Armed<'_> {
    fn drop(&mut self) {
        self.debouncer.settle(self.ticket);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::FutureExt;
    use futures::executor::block_on;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    #[test]
    fn lone_run_executes_after_delay() {
        let debouncer = Debouncer::new(Duration::from_millis(10));
        let result = block_on(debouncer.run(|| 7));
        assert_eq!(result, Some(7));
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn newer_run_supersedes_older_one() {
        let debouncer = Debouncer::new(Duration::from_millis(40));
        let calls = Arc::new(AtomicUsize::new(0));

        let first = {
            let debouncer = debouncer.clone();
            let calls = calls.clone();
            thread::spawn(move || {
                block_on(debouncer.run(|| calls.fetch_add(1, Ordering::SeqCst)))
            })
        };
        thread::sleep(Duration::from_millis(5));
        let second = {
            let debouncer = debouncer.clone();
            let calls = calls.clone();
            thread::spawn(move || {
                block_on(debouncer.run(|| calls.fetch_add(1, Ordering::SeqCst)))
            })
        };

        assert_eq!(first.join().expect("first joins"), None);
        assert_eq!(second.join().expect("second joins"), Some(0));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn cancel_prevents_pending_run() {
        let debouncer = Debouncer::new(Duration::from_millis(30));
        let pending = {
            let debouncer = debouncer.clone();
            thread::spawn(move || block_on(debouncer.run(|| ())))
        };
        thread::sleep(Duration::from_millis(5));
        assert!(debouncer.is_pending());
        assert!(debouncer.cancel());
        assert!(!debouncer.cancel());
        assert_eq!(pending.join().expect("pending joins"), None);
    }

    #[test]
    fn dropped_run_releases_its_ticket() {
        let debouncer = Debouncer::new(Duration::from_millis(30));
        assert_eq!(debouncer.run(|| ()).now_or_never(), None);
        assert!(!debouncer.is_pending());
        assert!(!debouncer.cancel());
    }

    #[test]
    fn dropped_superseded_run_keeps_newer_ticket() {
        let debouncer = Debouncer::new(Duration::from_millis(30));
        let mut older = Box::pin(debouncer.run(|| 1));
        assert_eq!((&mut older).now_or_never(), None);
        let newer = {
            let debouncer = debouncer.clone();
            thread::spawn(move || block_on(debouncer.run(|| 2)))
        };
        thread::sleep(Duration::from_millis(5));
        drop(older);
        assert!(debouncer.is_pending());
        assert_eq!(newer.join().expect("newer joins"), Some(2));
    }
}
