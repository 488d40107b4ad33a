use cmdwire::Command;
use cmdwire_macros::command;

#[command(name = "mock")]
struct MockCommand {
    message: String,
}

fn main() {
    let cmd = MockCommand {
        message: "mock123".into(),
    };
    assert_eq!(MockCommand::NAME, "mock");
    assert_eq!(cmd.command_name(), "mock");
    assert_eq!(cmd.clone().message, "mock123");
}
