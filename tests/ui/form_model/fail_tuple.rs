#[derive(contactkit::form::FormModel)]
struct TupleForm(String, String);

fn main() {}
