/// 内存聊天室示例
/// 每个客户端一个 mpsc 通道充当传输层：客户端发来的 JSON 经 `dispatch` 路由到处理器，
/// 处理器再通过 `broadcast` 把消息推给房间内其他客户端。
use async_trait::async_trait;
use cmdwire::transport::Transport;
use cmdwire::{CommandError, CommandHandler, CommandRegistry};
use cmdwire_macros::command;
use dashmap::DashMap;
use std::io;
use std::sync::{Arc, OnceLock};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

type ClientId = u32;

// ============================================================================
// 传输层：客户端 ID -> 出站通道
// ============================================================================

#[derive(Clone, Default)]
struct Connections {
    outbox: Arc<DashMap<ClientId, mpsc::UnboundedSender<String>>>,
}

impl Connections {
    fn connect(&self, id: ClientId) -> mpsc::UnboundedReceiver<String> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.outbox.insert(id, tx);
        rx
    }

    fn online(&self) -> Vec<ClientId> {
        let mut ids: Vec<ClientId> = self.outbox.iter().map(|e| *e.key()).collect();
        ids.sort_unstable();
        ids
    }
}

#[async_trait]
impl Transport<ClientId> for Connections {
    async fn send(&self, recipient: &ClientId, message: &str) -> io::Result<()> {
        let Some(tx) = self.outbox.get(recipient).map(|t| t.clone()) else {
            return Err(io::Error::new(io::ErrorKind::NotConnected, "unknown client"));
        };
        tx.send(message.to_string())
            .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "client hung up"))
    }
}

// ============================================================================
// 命令
// ============================================================================

#[command(name = "say")]
struct Say {
    text: String,
}

#[command(name = "said")]
struct Said {
    from: ClientId,
    text: String,
}

// 处理器需要回调注册表本身来广播
struct SayHandler {
    registry: Arc<OnceLock<Arc<CommandRegistry<ClientId>>>>,
}

#[async_trait]
impl CommandHandler<ClientId, Say> for SayHandler {
    async fn handle(&self, sender: &ClientId, cmd: Say) -> anyhow::Result<()> {
        let registry = self
            .registry
            .get()
            .ok_or_else(|| anyhow::anyhow!("registry not ready"))?;
        let from = *sender;
        let out = Said {
            from,
            text: cmd.text,
        };
        registry.broadcast_filtered(&out, move |c| *c != from).await?;
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("cmdwire=debug")),
        )
        .init();

    let connections = Connections::default();
    let mut inboxes: Vec<_> = (1..=3).map(|id| (id, connections.connect(id))).collect();

    let targets = {
        let connections = connections.clone();
        move || connections.online()
    };
    let registry = Arc::new(CommandRegistry::new(connections.clone(), targets));

    let slot = Arc::new(OnceLock::new());
    registry.register::<Say, _>(Arc::new(SayHandler {
        registry: slot.clone(),
    }));
    let _ = slot.set(registry.clone());

    registry
        .dispatch(&1, r#"{"commandname":"say","text":"hello room"}"#)
        .await?;

    for (id, inbox) in inboxes.iter_mut() {
        while let Ok(frame) = inbox.try_recv() {
            println!("client {id} <- {frame}");
        }
    }

    // 未注册的命令 -> 退回基础命令，最终以 UnhandledCommandType 报告
    if let Err(CommandError::UnhandledCommandType { command, .. }) = registry
        .dispatch(&2, r#"{"commandname":"shout","text":"HEY"}"#)
        .await
    {
        eprintln!("no handler for command: {command}");
    }

    Ok(())
}
