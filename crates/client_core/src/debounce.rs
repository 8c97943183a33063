use std::{
    future::Future,
    sync::{
        atomic::{AtomicU8, Ordering},
        Arc, Mutex, MutexGuard, PoisonError,
    },
    time::Duration,
};

use tokio::{runtime::Handle, task::JoinHandle};

const ARMED: u8 = 0;
const FIRED: u8 = 1;
const DISARMED: u8 = 2;

/// Trailing-edge debounce: every `call` restarts a single-shot timer, and
/// only the callback from the last call made inside the window runs.
///
/// Timers run on the runtime handed to [`Debouncer::new`], so `call` may be
/// made from any thread. A later `call` only cancels a timer that has not
/// fired yet; a callback that has already started runs to completion.
pub struct Debouncer {
    delay: Duration,
    runtime: Handle,
    armed: Mutex<Option<Armed>>,
}

struct Armed {
    task: JoinHandle<()>,
    state: Arc<AtomicU8>,
}

impl Armed {
    fn has_fired(&self) -> bool {
        self.state.load(Ordering::SeqCst) == FIRED
    }

    /// Wins or loses against the timer in one step: once the timer has
    /// claimed `FIRED` the task is left alone.
    fn disarm(self) {
        if self
            .state
            .compare_exchange(ARMED, DISARMED, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
        {
            self.task.abort();
        }
    }
}

impl Debouncer {
    pub fn new(delay: Duration, runtime: Handle) -> Self {
        Self {
            delay,
            runtime,
            armed: Mutex::new(None),
        }
    }

    pub fn call<F, Fut>(&self, callback: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let delay = self.delay;
        let state = Arc::new(AtomicU8::new(ARMED));
        let task = self.runtime.spawn({
            let state = Arc::clone(&state);
            async move {
                tokio::time::sleep(delay).await;
                if state
                    .compare_exchange(ARMED, FIRED, Ordering::SeqCst, Ordering::SeqCst)
                    .is_ok()
                {
                    callback().await;
                }
            }
        });
        let previous = self.lock_armed().replace(Armed { task, state });
        if let Some(previous) = previous {
            previous.disarm();
        }
    }

    pub fn cancel(&self) {
        let armed = self.lock_armed().take();
        if let Some(armed) = armed {
            armed.disarm();
        }
    }

    /// A timer is armed and has not fired yet.
    pub fn is_pending(&self) -> bool {
        self.lock_armed()
            .as_ref()
            .is_some_and(|armed| !armed.has_fired() && !armed.task.is_finished())
    }

    /// A timer is armed or the most recent callback is still running.
    pub fn is_active(&self) -> bool {
        self.lock_armed()
            .as_ref()
            .is_some_and(|armed| !armed.task.is_finished())
    }

    fn lock_armed(&self) -> MutexGuard<'_, Option<Armed>> {
        self.armed.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use tokio::time::sleep;

    use super::*;

    fn debouncer() -> Debouncer {
        Debouncer::new(Duration::from_millis(300), Handle::current())
    }

    #[tokio::test(start_paused = true)]
    async fn burst_inside_window_fires_once() {
        let debouncer = debouncer();
        let fired = Arc::new(AtomicUsize::new(0));

        for _ in 0..5 {
            let fired = Arc::clone(&fired);
            debouncer.call(move || async move {
                fired.fetch_add(1, Ordering::SeqCst);
            });
            sleep(Duration::from_millis(50)).await;
        }
        assert!(debouncer.is_pending());
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        sleep(Duration::from_millis(400)).await;
        tokio::task::yield_now().await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert!(!debouncer.is_pending());
        assert!(!debouncer.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn only_the_last_callback_runs() {
        let debouncer = debouncer();
        let seen = Arc::new(Mutex::new(Vec::new()));

        for value in ["k", "key", "keynote"] {
            let seen = Arc::clone(&seen);
            debouncer.call(move || async move {
                seen.lock().expect("seen").push(value);
            });
            sleep(Duration::from_millis(100)).await;
        }
        sleep(Duration::from_millis(400)).await;
        tokio::task::yield_now().await;

        assert_eq!(*seen.lock().expect("seen"), vec!["keynote"]);
    }

    #[tokio::test(start_paused = true)]
    async fn calls_separated_by_full_window_fire_separately() {
        let debouncer = debouncer();
        let fired = Arc::new(AtomicUsize::new(0));

        for _ in 0..2 {
            let fired = Arc::clone(&fired);
            debouncer.call(move || async move {
                fired.fetch_add(1, Ordering::SeqCst);
            });
            sleep(Duration::from_millis(350)).await;
            tokio::task::yield_now().await;
        }
        assert_eq!(fired.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_drops_the_armed_timer() {
        let debouncer = debouncer();
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&fired);
        debouncer.call(move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        debouncer.cancel();

        sleep(Duration::from_millis(500)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn started_callback_survives_a_new_call() {
        let debouncer = debouncer();
        let finished = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&finished);
        debouncer.call(move || async move {
            sleep(Duration::from_millis(500)).await;
            counter.fetch_add(1, Ordering::SeqCst);
        });
        sleep(Duration::from_millis(350)).await;
        assert!(!debouncer.is_pending());
        assert!(debouncer.is_active());

        let counter = Arc::clone(&finished);
        debouncer.call(move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        sleep(Duration::from_millis(1000)).await;
        tokio::task::yield_now().await;
        assert_eq!(finished.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_after_firing_lets_the_callback_finish() {
        let debouncer = debouncer();
        let finished = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&finished);
        debouncer.call(move || async move {
            sleep(Duration::from_millis(500)).await;
            counter.fetch_add(1, Ordering::SeqCst);
        });
        sleep(Duration::from_millis(350)).await;
        debouncer.cancel();

        sleep(Duration::from_millis(600)).await;
        tokio::task::yield_now().await;
        assert_eq!(finished.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn calls_from_a_plain_thread_run_on_the_captured_runtime() {
        let debouncer = debouncer();
        let fired = Arc::new(AtomicUsize::new(0));

        std::thread::scope(|scope| {
            scope.spawn(|| {
                for _ in 0..3 {
                    let fired = Arc::clone(&fired);
                    debouncer.call(move || async move {
                        fired.fetch_add(1, Ordering::SeqCst);
                    });
                }
            });
        });
        assert!(debouncer.is_pending());

        sleep(Duration::from_millis(400)).await;
        tokio::task::yield_now().await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }
}
