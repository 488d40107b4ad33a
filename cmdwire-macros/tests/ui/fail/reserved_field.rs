use cmdwire_macros::command;

#[command(name = "ping")]
struct Ping {
    commandname: String,
    seq: u32,
}

fn main() {}
