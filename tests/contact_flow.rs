use std::sync::Arc;
use std::thread;
use std::time::Duration;

use contactkit::contact::{EMAIL, NAME};
use contactkit::form::{FieldDecoration, SubmitOutcome, SubmitState};
use contactkit::{
    ContactFormConfig, NotificationKind, RecordingRenderer, VisualState, contact_controller,
};
use futures::executor::{ThreadPool, block_on};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

fn fast_config() -> ContactFormConfig {
    ContactFormConfig::from_toml_str(
        r#"
        debounce_ms = 20
        submit_latency_ms = 60
        notification_ms = 150
        "#,
    )
    .expect("config parses")
}

#[test]
fn visitor_fixes_mistakes_and_sends_message() {
    init_tracing();
    let renderer = RecordingRenderer::default();
    let controller = contact_controller(
        &fast_config(),
        Arc::new(renderer.clone()),
        Arc::new(ThreadPool::new().expect("thread pool")),
    );

    let typed = block_on(controller.input("name", "A")).expect("type name");
    assert_eq!(typed.map(|result| result.valid), Some(false));
    let typed = block_on(controller.input("name", "Ada")).expect("fix name");
    assert_eq!(typed.map(|result| result.valid), Some(true));
    assert_eq!(
        controller.decoration(NAME).expect("name decoration"),
        FieldDecoration::Success
    );

    controller.set_by_key("email", "ada@b").expect("email");
    assert!(
        !controller
            .blur("email")
            .expect("blur email")
            .expect("validated")
            .valid
    );
    let rejected = block_on(controller.submit()).expect("first submit");
    assert!(matches!(rejected, SubmitOutcome::Rejected(ref result) if result.message == "Please enter a valid email address."));
    assert!(matches!(
        controller.decoration(EMAIL).expect("email decoration"),
        FieldDecoration::Error(_)
    ));

    controller.set_by_key("email", "ada@b.co").expect("email");
    controller.set_by_key("subject", "Hello").expect("subject");
    controller
        .set_by_key("message", "Nice portfolio!")
        .expect("message");

    let submitting = {
        let controller = controller.clone();
        thread::spawn(move || block_on(controller.submit()).expect("submit"))
    };
    thread::sleep(Duration::from_millis(15));
    assert_eq!(
        controller.submit_state().expect("state"),
        SubmitState::Submitting
    );
    assert_eq!(submitting.join().expect("joins"), SubmitOutcome::Sent);

    let notification = controller.notifications().current().expect("visible");
    assert_eq!(notification.kind, NotificationKind::Success);
    assert_eq!(
        notification.message,
        "Message sent successfully! I'll get back to you soon."
    );
    assert!(controller.is_submit_enabled().expect("enabled"));

    thread::sleep(Duration::from_millis(300));
    assert!(controller.notifications().current().is_none());
}

#[test]
fn dismissed_notification_is_removed_exactly_once() {
    init_tracing();
    let renderer = RecordingRenderer::default();
    let controller = contact_controller(
        &fast_config(),
        Arc::new(renderer.clone()),
        Arc::new(ThreadPool::new().expect("thread pool")),
    );

    let outcome = block_on(controller.submit()).expect("submit empty form");
    assert!(matches!(outcome, SubmitOutcome::Rejected(ref result) if result.message == "Please enter your name."));
    let id = controller
        .notifications()
        .current()
        .expect("error visible")
        .id;

    assert!(controller.notifications().dismiss(id));
    thread::sleep(Duration::from_millis(300));

    let removals = renderer
        .events()
        .into_iter()
        .filter(|event| *event == VisualState::NotificationRemoved(id))
        .count();
    assert_eq!(removals, 1);
}

#[test]
fn separate_forms_do_not_share_state() {
    let pool = Arc::new(ThreadPool::new().expect("thread pool"));
    let first = contact_controller(&fast_config(), Arc::new(RecordingRenderer::default()), pool.clone());
    let second = contact_controller(&fast_config(), Arc::new(RecordingRenderer::default()), pool);

    first.set_by_key("name", "Ada").expect("set name");
    first.blur("name").expect("blur");

    assert_eq!(second.model().expect("model").name, "");
    assert_eq!(
        second.decoration(NAME).expect("decoration"),
        FieldDecoration::Clear
    );
    assert!(second.notifications().current().is_none());
}
