//! 命令注册与分发（cmdwire）
//!
//! 将带 `commandname` 判别字段的 JSON 消息映射为具体命令类型并路由到已注册的处理器，
//! 反过来把具体命令序列化为 JSON 交给注入的传输函数，可选地按谓词广播：
//! - 命令（`command`）：`Command` trait 与未注册名称的退回类型 `BaseCommand`
//! - 处理器（`handler`）：`(发送方, 命令)` 回调
//! - 传输（`transport`）：注入的发送函数与广播目标枚举
//! - 注册表（`registry`）：注册、分发、序列化、发送与广播
//!
//! 本 crate 不包含连接管理、重试或协议协商，消息分帧由上游传输层负责。
//!
//! 典型用法：
//! 1. 用 `#[cmdwire_macros::command(name = "...")]` 定义命令；
//! 2. 以发送函数与广播目标构造 `CommandRegistry`；
//! 3. 启动阶段 `register` 各命令的处理器；
//! 4. 传输层收到完整消息后调用 `dispatch`，出站使用 `send/broadcast`。
//!
pub mod codec;
pub mod command;
pub mod config;
pub mod error;
pub mod handler;
pub mod registry;
pub mod transport;

pub use command::{BaseCommand, Command, DISCRIMINATOR};
pub use error::{CommandError, CommandResult};
pub use handler::{CommandHandler, handler_fn};
pub use registry::CommandRegistry;
