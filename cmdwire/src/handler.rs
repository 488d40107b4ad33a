//! 命令处理器（CommandHandler）
//!
//! 以 `(发送方, 具体命令)` 调用的回调。处理器返回的错误会原样经由
//! `CommandRegistry::dispatch` 传播给调用方，分发器不做任何恢复。
//!
use async_trait::async_trait;

#[async_trait]
pub trait CommandHandler<S, C>: Send + Sync
where
    S: Sync,
    C: Send + 'static,
{
    async fn handle(&self, sender: &S, cmd: C) -> anyhow::Result<()>;
}

/// 将同步闭包包装为 [`CommandHandler`]
pub struct FnHandler<F> {
    f: F,
}

/// 由闭包构造处理器：`handler_fn(|sender, cmd| { ...; Ok(()) })`
pub fn handler_fn<F>(f: F) -> FnHandler<F> {
    FnHandler { f }
}

#[async_trait]
impl<S, C, F> CommandHandler<S, C> for FnHandler<F>
where
    S: Sync,
    C: Send + 'static,
    F: Fn(&S, C) -> anyhow::Result<()> + Send + Sync,
{
    async fn handle(&self, sender: &S, cmd: C) -> anyhow::Result<()> {
        (self.f)(sender, cmd)
    }
}
