use cmdwire_macros::command;

#[command(name = "pair")]
struct Pair(u32, u32);

fn main() {}
