use cmdwire_macros::command;

#[command(name = "tick")]
struct Tick;

fn main() {}
