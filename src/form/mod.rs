mod controller;
mod input;
mod submit;
mod validation;


pub use contactkit_form_derive::FormModel;
pub use controller::{
    FieldDecoration, FieldKey, FormController, FormError, FormOptions, FormResult, FormSnapshot,
    SubmitOutcome, SubmitState,
};
pub use submit::{BoxedSubmitFuture, SimulatedSubmitter, Submitter};
pub use validation::{FieldLens, FormModel, RuleSet, ValidationResult, ValidationRule};
