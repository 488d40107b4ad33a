/// 广播时单个接收方发送失败的处理策略
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BroadcastPolicy {
    /// 遇到第一个失败即中止，剩余接收方不再发送
    #[default]
    FailFast,
    /// 继续向剩余接收方发送，结束后汇总失败
    ContinueOnError,
}

/// 注册表配置
#[derive(Clone, Copy, Debug, Default)]
pub struct RegistryConfig {
    pub broadcast_policy: BroadcastPolicy,
}

impl RegistryConfig {
    pub fn with_broadcast_policy(mut self, policy: BroadcastPolicy) -> Self {
        self.broadcast_policy = policy;
        self
    }
}
