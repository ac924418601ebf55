use std::fmt::{Debug, Formatter};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, RwLockWriteGuard};
use std::time::{Duration, Instant};

use futures::future::{AbortHandle, abortable};
use futures::task::{Spawn, SpawnExt};
use futures_timer::Delay;

use crate::contracts::{Renderer, VisualState};
use crate::form::{FormError, FormResult};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct NotificationId(pub u64);

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum NotificationKind {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Notification {
    pub id: NotificationId,
    pub message: String,
    pub kind: NotificationKind,
    pub created_at: Instant,
}

struct Visible {
    notification: Notification,
    timer: Option<AbortHandle>,
}

#[derive(Default)]
struct PresenterState {
    current: Option<Visible>,
}

#[derive(Clone)]
pub struct NotificationPresenter {
    next_id: Arc<AtomicU64>,
    state: Arc<RwLock<PresenterState>>,
    renderer: Arc<dyn Renderer>,
    spawner: Arc<dyn Spawn + Send + Sync>,
    auto_dismiss: Duration,
}

impl Debug for NotificationPresenter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationPresenter")
            .field("auto_dismiss", &self.auto_dismiss)
            .field("current", &self.current())
            .finish()
    }
}

impl NotificationPresenter {
    pub const DEFAULT_AUTO_DISMISS: Duration = Duration::from_secs(5);

    pub fn new(renderer: Arc<dyn Renderer>, spawner: Arc<dyn Spawn + Send + Sync>) -> Self {
        Self {
            next_id: Arc::new(AtomicU64::new(0)),
            state: Arc::new(RwLock::new(PresenterState::default())),
            renderer,
            spawner,
            auto_dismiss: Self::DEFAULT_AUTO_DISMISS,
        }
    }

    pub fn auto_dismiss(mut self, value: Duration) -> Self {
        self.auto_dismiss = value;
        self
    }

    pub fn renderer(&self) -> Arc<dyn Renderer> {
        self.renderer.clone()
    }

    pub fn notify(
        &self,
        message: impl Into<String>,
        kind: NotificationKind,
    ) -> FormResult<NotificationId> {
        let id = NotificationId(self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        let notification = Notification {
            id,
            message: message.into(),
            kind,
            created_at: Instant::now(),
        };

        let previous = self.lock()?.current.replace(Visible {
            notification: notification.clone(),
            timer: None,
        });
        if let Some(previous) = previous {
            self.remove(previous);
        }
        tracing::debug!(id = id.0, ?kind, "notification shown");
        self.renderer
            .set_visual_state(VisualState::NotificationShown(notification));

        let presenter = self.clone();
        let delay = self.auto_dismiss;
        let (timer, handle) = abortable(async move {
            Delay::new(delay).await;
            presenter.expire(id);
        });
        if let Err(error) = self.spawner.spawn(async move {
            let _ = timer.await;
        }) {
            self.take_if(id);
            return Err(FormError::Spawn(error.to_string()));
        }

        let mut state = self.lock()?;
        match state.current.as_mut() {
            Some(visible) if visible.notification.id == id => visible.timer = Some(handle),
            _ => handle.abort(),
        }
        Ok(id)
    }

    pub fn dismiss(&self, id: NotificationId) -> bool {
        let removed = self.take_if(id);
        if removed {
            tracing::debug!(id = id.0, "notification dismissed");
        }
        removed
    }

    pub fn clear(&self) -> bool {
        let taken = match self.lock() {
            Ok(mut state) => state.current.take(),
            Err(_) => None,
        };
        match taken {
            Some(visible) => {
                self.remove(visible);
                true
            }
            None => false,
        }
    }

    pub fn current(&self) -> Option<Notification> {
        self.state
            .read()
            .ok()?
            .current
            .as_ref()
            .map(|visible| visible.notification.clone())
    }

    fn expire(&self, id: NotificationId) {
        if self.take_if(id) {
            tracing::debug!(id = id.0, "notification auto-dismissed");
        }
    }

    fn take_if(&self, id: NotificationId) -> bool {
        let taken = match self.lock() {
            Ok(mut state) => {
                if state
                    .current
                    .as_ref()
                    .is_some_and(|visible| visible.notification.id == id)
                {
                    state.current.take()
                } else {
                    None
                }
            }
            Err(_) => None,
        };
        match taken {
            Some(visible) => {
                self.remove(visible);
                true
            }
            None => false,
        }
    }

    fn remove(&self, visible: Visible) {
        if let Some(timer) = visible.timer {
            timer.abort();
        }
        self.renderer
            .set_visual_state(VisualState::NotificationRemoved(visible.notification.id));
    }

    fn lock(&self) -> FormResult<RwLockWriteGuard<'_, PresenterState>> {
        self.state
            .write()
            .map_err(|_| FormError::StatePoisoned("writing notification slot"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contracts::RecordingRenderer;
    use futures::executor::ThreadPool;
    use futures::task::{FutureObj, SpawnError};
    use std::thread;

    struct ShutdownSpawner;

    impl Spawn for ShutdownSpawner {
        fn spawn_obj(&self, _future: FutureObj<'static, ()>) -> Result<(), SpawnError> {
            Err(SpawnError::shutdown())
        }
    }

    fn presenter(auto_dismiss_ms: u64) -> (NotificationPresenter, RecordingRenderer) {
        let renderer = RecordingRenderer::default();
        let pool = ThreadPool::new().expect("thread pool");
        let presenter = NotificationPresenter::new(Arc::new(renderer.clone()), Arc::new(pool))
            .auto_dismiss(Duration::from_millis(auto_dismiss_ms));
        (presenter, renderer)
    }

    fn removals(renderer: &RecordingRenderer, id: NotificationId) -> usize {
        renderer
            .events()
            .iter()
            .filter(|event| **event == VisualState::NotificationRemoved(id))
            .count()
    }

    #[test]
    fn new_notification_replaces_visible_one() {
        let (presenter, renderer) = presenter(5_000);
        let first = presenter
            .notify("first", NotificationKind::Info)
            .expect("notify first");
        let second = presenter
            .notify("second", NotificationKind::Warning)
            .expect("notify second");

        let current = presenter.current().expect("one visible");
        assert_eq!(current.id, second);
        assert_eq!(current.message, "second");
        assert_eq!(current.kind, NotificationKind::Warning);
        assert_eq!(removals(&renderer, first), 1);
    }

    #[test]
    fn auto_dismiss_removes_after_duration() {
        let (presenter, renderer) = presenter(20);
        let id = presenter
            .notify("bye", NotificationKind::Success)
            .expect("notify");
        thread::sleep(Duration::from_millis(120));
        assert!(presenter.current().is_none());
        assert_eq!(removals(&renderer, id), 1);
    }

    #[test]
    fn manual_dismiss_cancels_auto_dismiss() {
        let (presenter, renderer) = presenter(30);
        let id = presenter
            .notify("close me", NotificationKind::Error)
            .expect("notify");
        assert!(presenter.dismiss(id));
        assert!(!presenter.dismiss(id));
        thread::sleep(Duration::from_millis(120));
        assert_eq!(removals(&renderer, id), 1);
    }

    #[test]
    fn stale_timer_leaves_newer_notification_alone() {
        let (presenter, _renderer) = presenter(60);
        presenter
            .notify("old", NotificationKind::Info)
            .expect("notify old");
        thread::sleep(Duration::from_millis(35));
        let newer = presenter
            .notify("new", NotificationKind::Info)
            .expect("notify new");
        thread::sleep(Duration::from_millis(35));
        assert_eq!(presenter.current().map(|n| n.id), Some(newer));
    }

    #[test]
    fn refused_timer_does_not_leave_a_banner_behind() {
        let renderer = RecordingRenderer::default();
        let presenter =
            NotificationPresenter::new(Arc::new(renderer.clone()), Arc::new(ShutdownSpawner));
        let error = presenter
            .notify("stuck?", NotificationKind::Info)
            .expect_err("spawner is shut down");

        assert!(matches!(error, FormError::Spawn(_)));
        assert!(presenter.current().is_none());
        assert_eq!(removals(&renderer, NotificationId(1)), 1);
    }
}
