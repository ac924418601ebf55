use std::sync::{Arc, LazyLock};

use futures::task::Spawn;
use regex::Regex;

use crate::config::ContactFormConfig;
use crate::contracts::Renderer;
use crate::feedback::NotificationPresenter;
use crate::form::{
    FieldKey, FormController, FormModel, FormOptions, RuleSet, SimulatedSubmitter, Submitter,
    ValidationResult, ValidationRule,
};

pub const NAME: FieldKey = FieldKey::new("name");
pub const EMAIL: FieldKey = FieldKey::new("email");
pub const SUBJECT: FieldKey = FieldKey::new("subject");
pub const MESSAGE: FieldKey = FieldKey::new("message");

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
});

static CONTACT_RULES: LazyLock<RuleSet> = LazyLock::new(contact_rules);

#[derive(Clone, Debug, Default, Eq, PartialEq, FormModel)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl ContactForm {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        subject: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            subject: subject.into(),
            message: message.into(),
        }
    }
}

pub type ContactFormController = FormController<ContactForm>;

pub fn contact_rules() -> RuleSet {
    RuleSet::new()
        .rule(
            NAME,
            ValidationRule::new("Name must be at least 2 characters long.").min_len(2),
        )
        .rule(
            EMAIL,
            ValidationRule::new("Please enter a valid email address.")
                .pattern(EMAIL_PATTERN.clone()),
        )
        .rule(
            SUBJECT,
            ValidationRule::new("Subject must be at least 5 characters long.").min_len(5),
        )
        .rule(
            MESSAGE,
            ValidationRule::new("Message must be at least 10 characters long.").min_len(10),
        )
}

pub fn validate_contact_field(field_name: &str, raw_value: &str) -> ValidationResult {
    CONTACT_RULES.validate_field(field_name, raw_value)
}

pub fn validate_contact_form(form: &ContactForm) -> ValidationResult {
    CONTACT_RULES.validate_form(form)
}

/// Wires a contact form with the reference simulated submission latency.
pub fn contact_controller(
    config: &ContactFormConfig,
    renderer: Arc<dyn Renderer>,
    spawner: Arc<dyn Spawn + Send + Sync>,
) -> ContactFormController {
    contact_controller_with(
        config,
        renderer,
        spawner,
        SimulatedSubmitter::new(config.submit_latency()),
    )
}

pub fn contact_controller_with(
    config: &ContactFormConfig,
    renderer: Arc<dyn Renderer>,
    spawner: Arc<dyn Spawn + Send + Sync>,
    submitter: impl Submitter<ContactForm> + 'static,
) -> ContactFormController {
    let notifications = NotificationPresenter::new(renderer, spawner)
        .auto_dismiss(config.notification_duration());
    FormController::new(
        contact_rules(),
        FormOptions::from(config),
        submitter,
        notifications,
    )
}
