use cmdwire_macros::command;

#[command(name = "ping", name = "pong")]
struct Ping {
    seq: u32,
}

fn main() {}
