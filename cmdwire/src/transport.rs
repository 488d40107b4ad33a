//! 传输协作方
//!
//! 注册表本身不关心字节如何到达客户端，也不维护连接列表，这两件事通过注入完成：
//! - `Transport`：把一条完整的 JSON 消息交给某个接收方；
//! - `BroadcastTargets`：每次广播时重新枚举候选接收方（不缓存）。
//!
//! 两者都为普通闭包提供了实现，便于直接注入函数。
//!
use async_trait::async_trait;
use std::io;

/// 发送函数：`(recipient, message) -> io::Result<()>`
///
/// 阻塞与否完全由实现决定；挂起的发送会挂起调用它的 `send/broadcast`。
#[async_trait]
pub trait Transport<S>: Send + Sync {
    async fn send(&self, recipient: &S, message: &str) -> io::Result<()>;
}

#[async_trait]
impl<S, F> Transport<S> for F
where
    S: Sync,
    F: Fn(&S, &str) -> io::Result<()> + Send + Sync,
{
    async fn send(&self, recipient: &S, message: &str) -> io::Result<()> {
        (self)(recipient, message)
    }
}

/// 广播目标序列；有限或无限由调用方负责
pub type Targets<S> = Box<dyn Iterator<Item = S> + Send>;

/// 广播目标枚举：每次调用都重新计算
pub trait BroadcastTargets<S>: Send + Sync {
    fn targets(&self) -> Targets<S>;
}

impl<S, F, I> BroadcastTargets<S> for F
where
    F: Fn() -> I + Send + Sync,
    I: IntoIterator<Item = S>,
    I::IntoIter: Send + 'static,
{
    fn targets(&self) -> Targets<S> {
        Box::new((self)().into_iter())
    }
}
