use cmdwire::Command;
use cmdwire_macros::command;

#[command]
struct Ping {}

fn main() {
    assert_eq!(Ping::NAME, "Ping");
    println!("{:?}", Ping {});
}
