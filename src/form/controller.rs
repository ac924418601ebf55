use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use thiserror::Error;

use super::submit::Submitter;
use super::validation::{FormModel, RuleSet, ValidationResult};
use crate::analytics::track_event;
use crate::config::ContactFormConfig;
use crate::contracts::{Renderer, SubmitControl, VisualState};
use crate::feedback::{NotificationKind, NotificationPresenter};
use crate::timing::Debouncer;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct FieldKey(&'static str);

impl FieldKey {
    pub const fn new(value: &'static str) -> Self {
        Self(value)
    }

    pub const fn as_str(self) -> &'static str {
        self.0
    }
}

impl Display for FieldKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SubmitState {
    Idle,
    Submitting,
    Done,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum FieldDecoration {
    #[default]
    Clear,
    Error(String),
    Success,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SubmitOutcome {
    Sent,
    Rejected(ValidationResult),
    Failed(String),
    Ignored,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FormOptions {
    pub debounce: Duration,
    pub idle_label: String,
    pub busy_label: String,
    pub success_message: String,
}

impl Default for FormOptions {
    fn default() -> Self {
        Self::from(&ContactFormConfig::default())
    }
}

impl From<&ContactFormConfig> for FormOptions {
    fn from(config: &ContactFormConfig) -> Self {
        Self {
            debounce: config.debounce(),
            idle_label: config.idle_label.clone(),
            busy_label: config.busy_label.clone(),
            success_message: config.success_message.clone(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct FormSnapshot<T> {
    pub model: T,
    pub submit_state: SubmitState,
    pub submit_count: u32,
    pub submit_enabled: bool,
    pub decorations: BTreeMap<FieldKey, FieldDecoration>,
}

#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum FormError {
    #[error("form state lock poisoned while {0}")]
    StatePoisoned(&'static str),
    #[error("invalid submit state transition: {from:?} -> {to:?}")]
    InvalidStateTransition { from: SubmitState, to: SubmitState },
    #[error("form has no field named `{0}`")]
    UnknownField(String),
    #[error("failed to schedule timer: {0}")]
    Spawn(String),
}

pub type FormResult<T> = Result<T, FormError>;

pub(super) struct FormState<T> {
    pub(super) model: T,
    pub(super) submit_state: SubmitState,
    pub(super) submit_count: u32,
    pub(super) decorations: BTreeMap<FieldKey, FieldDecoration>,
}

#[derive(Clone)]
pub struct FormController<T>
where
    T: FormModel,
{
    pub(super) options: FormOptions,
    pub(super) rules: Arc<RuleSet>,
    pub(super) state: Arc<RwLock<FormState<T>>>,
    pub(super) debouncers: Arc<BTreeMap<FieldKey, Debouncer>>,
    pub(super) submitter: Arc<dyn Submitter<T>>,
    pub(super) renderer: Arc<dyn Renderer>,
    pub(super) notifications: NotificationPresenter,
}

impl<T> FormController<T>
where
    T: FormModel,
{
    pub fn new(
        rules: RuleSet,
        options: FormOptions,
        submitter: impl Submitter<T> + 'static,
        notifications: NotificationPresenter,
    ) -> Self {
        let debouncers = T::field_keys()
            .iter()
            .map(|key| (*key, Debouncer::new(options.debounce)))
            .collect();
        Self {
            renderer: notifications.renderer(),
            options,
            rules: Arc::new(rules),
            state: Arc::new(RwLock::new(FormState {
                model: T::default(),
                submit_state: SubmitState::Idle,
                submit_count: 0,
                decorations: BTreeMap::new(),
            })),
            debouncers: Arc::new(debouncers),
            submitter: Arc::new(submitter),
            notifications,
        }
    }

    pub fn options(&self) -> &FormOptions {
        &self.options
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn notifications(&self) -> &NotificationPresenter {
        &self.notifications
    }

    pub fn submit_state(&self) -> FormResult<SubmitState> {
        Ok(read_lock(&self.state, "reading submit state")?.submit_state)
    }

    pub fn is_submit_enabled(&self) -> FormResult<bool> {
        Ok(self.submit_state()? != SubmitState::Submitting)
    }

    pub fn model(&self) -> FormResult<T> {
        Ok(read_lock(&self.state, "reading form model")?.model.clone())
    }

    pub fn decoration(&self, key: FieldKey) -> FormResult<FieldDecoration> {
        Ok(read_lock(&self.state, "reading field decoration")?
            .decorations
            .get(&key)
            .cloned()
            .unwrap_or_default())
    }

    pub fn snapshot(&self) -> FormResult<FormSnapshot<T>> {
        let state = read_lock(&self.state, "creating form snapshot")?;
        Ok(FormSnapshot {
            model: state.model.clone(),
            submit_state: state.submit_state,
            submit_count: state.submit_count,
            submit_enabled: state.submit_state != SubmitState::Submitting,
            decorations: state.decorations.clone(),
        })
    }

    pub async fn submit(&self) -> FormResult<SubmitOutcome> {
        let attempt = {
            let mut state = write_lock(&self.state, "preparing submit")?;
            if state.submit_state == SubmitState::Submitting {
                tracing::warn!("submit ignored: a submission is already in flight");
                return Ok(SubmitOutcome::Ignored);
            }
            let model = state.model.trimmed();
            match self.rules.first_failure(&model) {
                Some(failure) => Err(failure),
                None => {
                    transition_submit_state(&mut state, SubmitState::Submitting)?;
                    state.submit_count = state.submit_count.saturating_add(1);
                    Ok(model)
                }
            }
        };

        let model = match attempt {
            Ok(model) => model,
            Err((key, result)) => {
                self.decorate(key, FieldDecoration::Error(result.message.clone()))?;
                self.render_submit_control(true);
                self.announce(result.message.clone(), NotificationKind::Error);
                return Ok(SubmitOutcome::Rejected(result));
            }
        };

        self.render_submit_control(false);
        track_event("Contact", "Form Submission Attempted");

        match self.submitter.submit(model).await {
            Ok(()) => {
                self.enter_done(true)?;
                self.announce(self.options.success_message.clone(), NotificationKind::Success);
                self.return_to_idle()?;
                track_event("Contact", "Form Submitted");
                Ok(SubmitOutcome::Sent)
            }
            Err(reason) => {
                tracing::warn!(%reason, "contact form submission failed");
                self.enter_done(false)?;
                self.announce(reason.clone(), NotificationKind::Error);
                self.return_to_idle()?;
                Ok(SubmitOutcome::Failed(reason))
            }
        }
    }

    // An in-flight submission keeps the control disabled until it completes.
    pub fn reset(&self) -> FormResult<()> {
        self.cancel_debounces();
        let in_flight = {
            let mut state = write_lock(&self.state, "resetting form")?;
            state.model = T::default();
            state.decorations.clear();
            if state.submit_state == SubmitState::Submitting {
                true
            } else {
                transition_submit_state(&mut state, SubmitState::Idle)?;
                false
            }
        };
        self.render_cleared_fields();
        if !in_flight {
            self.render_submit_control(true);
        }
        Ok(())
    }

    pub fn teardown(&self) {
        let cancelled = self.cancel_debounces();
        let dismissed = self.notifications.clear();
        tracing::debug!(cancelled, dismissed, "form torn down");
    }

    pub(super) fn decorate(&self, key: FieldKey, decoration: FieldDecoration) -> FormResult<()> {
        {
            let mut state = write_lock(&self.state, "writing field decoration")?;
            state.decorations.insert(key, decoration.clone());
        }
        self.renderer
            .set_visual_state(VisualState::Field { key, decoration });
        Ok(())
    }

    pub(super) fn debouncer(&self, key: FieldKey) -> FormResult<&Debouncer> {
        self.debouncers
            .get(&key)
            .ok_or_else(|| FormError::UnknownField(key.to_string()))
    }

    fn announce(&self, message: String, kind: NotificationKind) {
        if let Err(error) = self.notifications.notify(message, kind) {
            tracing::warn!(%error, ?kind, "notification not shown");
        }
    }

    fn enter_done(&self, clear_fields: bool) -> FormResult<()> {
        {
            let mut state = write_lock(&self.state, "completing submit")?;
            transition_submit_state(&mut state, SubmitState::Done)?;
            if clear_fields {
                state.model = T::default();
                state.decorations.clear();
            }
        }
        if clear_fields {
            self.cancel_debounces();
            self.render_cleared_fields();
        }
        Ok(())
    }

    fn return_to_idle(&self) -> FormResult<()> {
        {
            let mut state = write_lock(&self.state, "returning to idle")?;
            transition_submit_state(&mut state, SubmitState::Idle)?;
        }
        self.render_submit_control(true);
        Ok(())
    }

    fn cancel_debounces(&self) -> usize {
        self.debouncers
            .values()
            .filter(|debouncer| debouncer.cancel())
            .count()
    }

    fn render_cleared_fields(&self) {
        for key in T::field_keys() {
            self.renderer.set_visual_state(VisualState::Field {
                key: *key,
                decoration: FieldDecoration::Clear,
            });
        }
    }

    fn render_submit_control(&self, enabled: bool) {
        let label = if enabled {
            self.options.idle_label.clone()
        } else {
            self.options.busy_label.clone()
        };
        self.renderer
            .set_visual_state(VisualState::SubmitControl(SubmitControl { enabled, label }));
    }
}

pub(super) fn transition_submit_state<T>(
    state: &mut FormState<T>,
    next: SubmitState,
) -> FormResult<()> {
    let current = state.submit_state;
    if current == next {
        return Ok(());
    }

    let allowed = matches!(
        (current, next),
        (SubmitState::Idle, SubmitState::Submitting)
            | (SubmitState::Submitting, SubmitState::Done)
            | (SubmitState::Done, SubmitState::Idle)
    );
    if !allowed {
        return Err(FormError::InvalidStateTransition {
            from: current,
            to: next,
        });
    }
    tracing::debug!(from = ?current, to = ?next, "submit state transition");
    state.submit_state = next;
    Ok(())
}

pub(super) fn read_lock<'a, T>(
    lock: &'a RwLock<T>,
    context: &'static str,
) -> FormResult<RwLockReadGuard<'a, T>> {
    lock.read().map_err(|_| FormError::StatePoisoned(context))
}

pub(super) fn write_lock<'a, T>(
    lock: &'a RwLock<T>,
    context: &'static str,
) -> FormResult<RwLockWriteGuard<'a, T>> {
    lock.write().map_err(|_| FormError::StatePoisoned(context))
}
