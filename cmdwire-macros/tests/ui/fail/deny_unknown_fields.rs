use cmdwire_macros::command;

#[command(name = "strict")]
#[serde(deny_unknown_fields)]
struct Strict {
    value: u32,
}

fn main() {}
