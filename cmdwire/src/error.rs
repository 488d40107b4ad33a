//! 统一错误定义
//!
//! 入站（dispatch）与出站（serialize/send/broadcast）的全部失败都以
//! `CommandError` 同步返回，核心不吞掉任何错误，也不做重试。
//!
use thiserror::Error;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum CommandError {
    // --- 入站 ---
    #[error("malformed input: {source}")]
    MalformedInput {
        #[source]
        source: serde_json::Error,
    },

    #[error("missing discriminator: no string `commandname` field")]
    MissingDiscriminator,

    #[error("deserialization failed: command={command}, reason={source}")]
    Deserialization {
        command: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("unhandled command type: command={command}, type={type_name}")]
    UnhandledCommandType {
        command: String,
        type_name: &'static str,
    },

    #[error("handler failed: type={command_type}, reason={source}")]
    Handler {
        command_type: &'static str,
        #[source]
        source: anyhow::Error,
    },

    #[error("type mismatch: expected={expected}, found={found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    // --- 出站 ---
    #[error("serialization failed: command={command}, reason={reason}")]
    Serialization {
        command: &'static str,
        reason: String,
    },

    #[error("transport error: {source}")]
    Transport {
        #[from]
        source: std::io::Error,
    },

    #[error("broadcast partially failed: delivered={delivered}, failed={}", .failures.len())]
    PartialBroadcast {
        delivered: usize,
        failures: Vec<CommandError>,
    },
}

/// 统一 Result 类型别名
pub type CommandResult<T> = Result<T, CommandError>;
