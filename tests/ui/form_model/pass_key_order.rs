use contactkit::form::{FieldKey, FormModel};

#[derive(Clone, Default, contactkit::form::FormModel)]
struct CallbackForm {
    full_name: String,
    phone_number: String,
}

fn main() {
    let keys = CallbackForm::field_keys()
        .iter()
        .map(|key| key.as_str())
        .collect::<Vec<_>>();
    assert_eq!(keys, ["full_name", "phone_number"]);

    let mut model = CallbackForm::default();
    assert!(model.set_value(FieldKey::new("phone_number"), " 555 ".to_string()));
    assert!(!model.set_value(FieldKey::new("email"), "x".to_string()));
    assert_eq!(model.trimmed().phone_number, "555");

    let _lens: CallbackFormFullNameLens = CallbackForm::fields().full_name();
}
