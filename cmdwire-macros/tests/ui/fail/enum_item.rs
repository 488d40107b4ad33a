use cmdwire_macros::command;

#[command(name = "choice")]
enum Choice {
    Left,
    Right,
}

fn main() {}
