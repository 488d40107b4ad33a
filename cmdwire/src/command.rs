use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// 线上格式中标识命令类型的判别字段
pub const DISCRIMINATOR: &str = "commandname";

/// 线上命令（Command）
///
/// 一条具名、带负载的消息，在注册表与传输层之间交换。
/// - 序列化后为一个 JSON 对象：`commandname` 判别字段 + 结构体的全部字段；
/// - 负载必须序列化为 JSON 对象，因此命令应为具名字段结构体；
/// - 构造后类型不可变，负载字段通常只在构造或反序列化时设置一次。
///
/// 关联常量：
/// - `NAME`：命令在线上的稳定名称，用于路由。避免依赖 `type_name::<T>()`。
///
/// 通常通过 `cmdwire_macros::command` 属性宏实现本 trait。
pub trait Command: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// 命令的稳定名称（写入 `commandname`）
    const NAME: &'static str;

    fn command_name(&self) -> &'static str {
        Self::NAME
    }
}

/// 基础命令：仅包含判别字段
///
/// 当收到未注册的命令名时，分发器退回到该类型进行反序列化，
/// 因而处理器只能拿到名称，拿不到任何负载。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseCommand {
    pub commandname: String,
}

impl BaseCommand {
    pub fn name(&self) -> &str {
        &self.commandname
    }
}
