use contactkit::form::{FieldLens, FormModel};

#[derive(Clone, Default, contactkit::form::FormModel)]
struct DemoForm {
    email: String,
}

fn main() {
    let fields = DemoForm::fields();
    let lens = fields.email();
    let mut model = DemoForm {
        email: "a@folio.dev".to_string(),
    };
    lens.set(&mut model, "b@folio.dev".to_string());
    assert_eq!(lens.key().as_str(), "email");
    assert_eq!(lens.get(&model), "b@folio.dev");
    assert_eq!(model.value(lens.key()), Some("b@folio.dev"));
}
