use cmdwire_macros::command;

#[command(name = "tagged")]
struct Tagged {
    x: i32,
    #[serde(default, alias = "commandname")]
    label: String,
}

fn main() {}
