use cmdwire_macros::command;

#[command(label = "ping")]
struct Ping {
    seq: u32,
}

fn main() {}
