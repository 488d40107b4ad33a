use cmdwire_macros::command;

#[command(name = "")]
struct Ping {
    seq: u32,
}

fn main() {}
