pub mod analytics;
pub mod config;
pub mod contact;
pub mod contracts;
pub mod feedback;
pub mod form;
pub mod prelude;
pub mod timing;

pub use crate::config::{ConfigError, ContactFormConfig};
pub use crate::contact::{
    ContactForm, ContactFormController, contact_controller, contact_controller_with,
    validate_contact_field, validate_contact_form,
};
pub use crate::contracts::{NullRenderer, RecordingRenderer, Renderer, SubmitControl, VisualState};
pub use crate::feedback::{Notification, NotificationId, NotificationKind, NotificationPresenter};
pub use crate::timing::Debouncer;
