use std::sync::{Arc, Mutex, MutexGuard};

use crate::feedback::{Notification, NotificationId};
use crate::form::{FieldDecoration, FieldKey};

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SubmitControl {
    pub enabled: bool,
    pub label: String,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum VisualState {
    Field {
        key: FieldKey,
        decoration: FieldDecoration,
    },
    SubmitControl(SubmitControl),
    NotificationShown(Notification),
    NotificationRemoved(NotificationId),
}

pub trait Renderer: Send + Sync + 'static {
    fn set_visual_state(&self, state: VisualState);
}

impl<F> Renderer for F
where
    F: Fn(VisualState) + Send + Sync + 'static,
{
    fn set_visual_state(&self, state: VisualState) {
        (self)(state)
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn set_visual_state(&self, _state: VisualState) {}
}

#[derive(Clone, Debug, Default)]
pub struct RecordingRenderer {
    events: Arc<Mutex<Vec<VisualState>>>,
}

impl RecordingRenderer {
    pub fn events(&self) -> Vec<VisualState> {
        self.lock().clone()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn last_submit_control(&self) -> Option<SubmitControl> {
        self.lock().iter().rev().find_map(|event| match event {
            VisualState::SubmitControl(control) => Some(control.clone()),
            _ => None,
        })
    }

    pub fn field_decorations(&self, key: FieldKey) -> Vec<FieldDecoration> {
        self.lock()
            .iter()
            .filter_map(|event| match event {
                VisualState::Field {
                    key: field,
                    decoration,
                } if *field == key => Some(decoration.clone()),
                _ => None,
            })
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<VisualState>> {
        match self.events.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl Renderer for RecordingRenderer {
    fn set_visual_state(&self, state: VisualState) {
        self.lock().push(state);
    }
}
