use cmdwire::Command;
use cmdwire_macros::command;
use serde::{Deserialize, Serialize};

#[command(name = "chat.post")]
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PostMessage {
    room_id: u64,
    body: String,
    #[serde(default)]
    mentions: Vec<String>,
}

fn main() {
    let a = PostMessage {
        room_id: 1,
        body: "hi".into(),
        mentions: vec![],
    };
    assert_eq!(a.clone(), a);
    assert_eq!(PostMessage::NAME, "chat.post");
}
