#[derive(contactkit::form::FormModel)]
enum ChannelForm {
    Email(String),
    Phone(String),
}

fn main() {}
