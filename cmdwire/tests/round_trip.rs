use cmdwire::{CommandRegistry, DISCRIMINATOR};
use cmdwire_macros::command;
use proptest::prelude::*;
use serde_json::Value;
use std::io;
use std::sync::{Arc, Mutex};

#[command(name = "note")]
#[derive(PartialEq)]
struct Note {
    author: String,
    body: String,
    priority: i64,
    labels: Vec<String>,
}

fn registry() -> CommandRegistry<()> {
    CommandRegistry::new(
        |_: &(), _: &str| -> io::Result<()> { Ok(()) },
        Vec::<()>::new,
    )
}

fn note() -> impl Strategy<Value = Note> {
    (
        any::<String>(),
        any::<String>(),
        any::<i64>(),
        prop::collection::vec(any::<String>(), 0..4),
    )
        .prop_map(|(author, body, priority, labels)| Note {
            author,
            body,
            priority,
            labels,
        })
}

proptest! {
    #[test]
    fn serialized_notes_dispatch_to_equal_values(original in note()) {
        let reg = registry();
        let received = Arc::new(Mutex::new(None));
        let sink = received.clone();
        reg.register_fn::<Note, _>(move |_: &(), cmd: Note| {
            *sink.lock().unwrap() = Some(cmd);
            Ok(())
        });

        let json = reg.serialize(&original).unwrap();
        let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
        rt.block_on(reg.dispatch(&(), &json)).unwrap();

        prop_assert_eq!(received.lock().unwrap().take(), Some(original));
    }

    #[test]
    fn discriminator_is_independent_of_payload(original in note()) {
        let json = registry().serialize(&original).unwrap();
        let doc: Value = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(doc[DISCRIMINATOR].as_str(), Some("note"));
        prop_assert_eq!(doc.as_object().map(|m| m.len()), Some(5));
    }
}
