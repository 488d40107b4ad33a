use cmdwire_macros::command;

#[command(name = "tagged")]
struct Tagged {
    #[serde(rename = "commandname")]
    label: String,
    x: i32,
}

fn main() {}
