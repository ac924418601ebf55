pub use crate::config::ContactFormConfig;
pub use crate::contact::{ContactForm, ContactFormController, contact_controller};
pub use crate::contracts::{Renderer, VisualState};
pub use crate::feedback::{NotificationKind, NotificationPresenter};
pub use crate::form::{
    FieldDecoration, FieldKey, FieldLens, FormController, FormError, FormModel, FormResult,
    SubmitOutcome, SubmitState, ValidationResult,
};
