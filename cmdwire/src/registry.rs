use crate::{
    codec::{JsonCodec, SerdeJsonCodec},
    command::{BaseCommand, Command, DISCRIMINATOR},
    config::{BroadcastPolicy, RegistryConfig},
    error::{CommandError, CommandResult},
    handler::{CommandHandler, handler_fn},
    transport::{BroadcastTargets, Transport},
};
use bon::Builder;
use dashmap::DashMap;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::any::{Any, TypeId, type_name};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tracing::{debug, trace, warn};

type BoxAnySend = Box<dyn Any + Send>;

type CmdHandlerFuture<'a> = Pin<Box<dyn Future<Output = CommandResult<()>> + Send + 'a>>;

type CmdHandlerFn<S> =
    Arc<dyn for<'a> Fn(&'a S, BoxAnySend) -> CmdHandlerFuture<'a> + Send + Sync>;

/// 命令名解析出的类型：TypeId 与对应的反序列化入口
#[derive(Clone, Copy)]
struct CommandType {
    type_id: TypeId,
    type_name: &'static str,
    decode: fn(Value) -> Result<BoxAnySend, serde_json::Error>,
}

impl CommandType {
    fn of<C>() -> Self
    where
        C: DeserializeOwned + Send + 'static,
    {
        Self {
            type_id: TypeId::of::<C>(),
            type_name: type_name::<C>(),
            decode: decode_as::<C>,
        }
    }
}

fn decode_as<C>(document: Value) -> Result<BoxAnySend, serde_json::Error>
where
    C: DeserializeOwned + Send + 'static,
{
    serde_json::from_value::<C>(document).map(|cmd| Box::new(cmd) as BoxAnySend)
}

// 固定闭包签名，使其对 `&'a S` 的生命周期保持高阶
fn erase<S, F>(f: F) -> CmdHandlerFn<S>
where
    F: for<'a> Fn(&'a S, BoxAnySend) -> CmdHandlerFuture<'a> + Send + Sync + 'static,
{
    Arc::new(f)
}

fn default_codec() -> Arc<dyn JsonCodec> {
    Arc::new(SerdeJsonCodec)
}

/// 命令注册表与分发器
///
/// 持有两张映射：
/// - 命令名 -> 命令类型（决定入站 JSON 反序列化成什么）；
/// - 命令类型（TypeId）-> 处理器（类型擦除，调用时再向下转型）。
///
/// 入站：`dispatch` 解析 JSON、提取 `commandname`、解析类型（未注册时退回 [`BaseCommand`]）、
/// 反序列化并调用处理器。出站：`serialize/send/broadcast` 把具体命令编码为 JSON 并交给注入的
/// [`Transport`]。
///
/// 两张映射基于 `DashMap`，注册与分发可以并发进行；但并发注册与进行中的分发之间
/// 的先后顺序不做保证，通常应在启动阶段完成注册。
#[derive(Builder)]
pub struct CommandRegistry<S> {
    transport: Arc<dyn Transport<S>>,
    targets: Arc<dyn BroadcastTargets<S>>,
    #[builder(default = default_codec())]
    codec: Arc<dyn JsonCodec>,
    #[builder(default)]
    config: RegistryConfig,
    #[builder(skip)]
    names: DashMap<String, CommandType>,
    #[builder(skip)]
    handlers: DashMap<TypeId, CmdHandlerFn<S>>,
}

impl<S> CommandRegistry<S>
where
    S: Send + Sync + 'static,
{
    /// 以默认编解码器与配置创建注册表
    pub fn new<T, B>(transport: T, targets: B) -> Self
    where
        T: Transport<S> + 'static,
        B: BroadcastTargets<S> + 'static,
    {
        Self::builder()
            .transport(Arc::new(transport))
            .targets(Arc::new(targets))
            .build()
    }

    /// 注册命令及其处理器；同名或同类型重复注册时后者覆盖前者
    ///
    /// 名称改绑到另一类型时，旧类型的处理器随之移除（一个类型只有一个 `NAME`，
    /// 失去名称后不再可达）。
    pub fn register<C, H>(&self, handler: Arc<H>)
    where
        C: Command,
        H: CommandHandler<S, C> + 'static,
    {
        if let Some(previous) = self.names.insert(C::NAME.to_string(), CommandType::of::<C>()) {
            if previous.type_id != TypeId::of::<C>() {
                warn!(
                    command = C::NAME,
                    previous = previous.type_name,
                    current = type_name::<C>(),
                    "command name rebound to a different type"
                );
                self.handlers.remove(&previous.type_id);
            }
        }
        self.insert_handler::<C, H>(handler);
        debug!(command = C::NAME, type_name = type_name::<C>(), "command registered");
    }

    /// 以同步闭包注册处理器
    pub fn register_fn<C, F>(&self, f: F)
    where
        C: Command,
        F: Fn(&S, C) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.register::<C, _>(Arc::new(handler_fn(f)));
    }

    /// 为未注册命令名（退回 [`BaseCommand`] 的情形）挂载处理器
    pub fn register_fallback<H>(&self, handler: Arc<H>)
    where
        H: CommandHandler<S, BaseCommand> + 'static,
    {
        self.insert_handler::<BaseCommand, H>(handler);
        debug!("fallback handler registered");
    }

    fn insert_handler<C, H>(&self, handler: Arc<H>)
    where
        C: Send + 'static,
        H: CommandHandler<S, C> + 'static,
    {
        let f = erase::<S, _>(move |sender, boxed_cmd| {
            let handler = handler.clone();

            Box::pin(async move {
                // 键与闭包同一泛型 C，正常情况下 downcast 不会失败
                match boxed_cmd.downcast::<C>() {
                    Ok(cmd) => handler.handle(sender, *cmd).await.map_err(|source| {
                        CommandError::Handler {
                            command_type: type_name::<C>(),
                            source,
                        }
                    }),
                    Err(_) => Err(CommandError::TypeMismatch {
                        expected: type_name::<C>(),
                        found: "unknown",
                    }),
                }
            })
        });

        if self.handlers.insert(TypeId::of::<C>(), f).is_some() {
            warn!(type_name = type_name::<C>(), "handler replaced");
        }
    }

    /// 分发一条入站 JSON 消息
    ///
    /// 依次：解析 -> 提取 `commandname` -> 解析类型（未注册退回 `BaseCommand`）
    /// -> 反序列化 -> 查找处理器 -> 调用。任一步失败都直接返回对应错误。
    pub async fn dispatch(&self, sender: &S, raw: &str) -> CommandResult<()> {
        let document = self
            .codec
            .decode(raw)
            .map_err(|source| CommandError::MalformedInput { source })?;

        let Some(name) = document
            .get(DISCRIMINATOR)
            .and_then(Value::as_str)
            .map(str::to_owned)
        else {
            return Err(CommandError::MissingDiscriminator);
        };

        let command_type = self.resolve(&name);
        let command = (command_type.decode)(document).map_err(|source| {
            CommandError::Deserialization {
                command: name.clone(),
                source,
            }
        })?;

        let Some(handler) = self
            .handlers
            .get(&command_type.type_id)
            .map(|h| h.clone())
        else {
            return Err(CommandError::UnhandledCommandType {
                command: name,
                type_name: command_type.type_name,
            });
        };

        debug!(command = %name, "dispatching command");
        (handler)(sender, command).await
    }

    fn resolve(&self, name: &str) -> CommandType {
        match self.names.get(name) {
            Some(entry) => *entry,
            None => {
                warn!(command = name, "unregistered command name, falling back to base command");
                CommandType::of::<BaseCommand>()
            }
        }
    }

    /// 序列化命令：负载字段 + `commandname`
    ///
    /// `commandname` 总是等于 `C::NAME`，即使负载中有同名字段也会被覆盖。
    pub fn serialize<C: Command>(&self, command: &C) -> CommandResult<String> {
        let document = to_document(command)?;
        self.codec
            .encode(&document)
            .map_err(|e| CommandError::Serialization {
                command: C::NAME,
                reason: e.to_string(),
            })
    }

    /// 序列化后交给注入的发送函数
    pub async fn send<C: Command>(&self, command: &C, recipient: &S) -> CommandResult<()> {
        let message = self.serialize(command)?;
        debug!(command = C::NAME, "sending command");
        self.deliver(recipient, &message).await
    }

    /// 向全部广播目标发送
    pub async fn broadcast<C: Command>(&self, command: &C) -> CommandResult<usize> {
        self.broadcast_filtered(command, |_| true).await
    }

    /// 向满足谓词的广播目标按枚举顺序逐个发送，返回成功投递数
    ///
    /// 目标序列每次调用都重新枚举。单个发送失败时按 [`BroadcastPolicy`] 处理：
    /// `FailFast` 立即返回该错误，剩余目标不再发送；`ContinueOnError` 发送完全部目标后
    /// 以 [`CommandError::PartialBroadcast`] 汇总失败。
    pub async fn broadcast_filtered<C, P>(&self, command: &C, predicate: P) -> CommandResult<usize>
    where
        C: Command,
        P: Fn(&S) -> bool + Send + Sync,
    {
        let message = self.serialize(command)?;
        let mut delivered = 0;
        let mut failures = Vec::new();

        for recipient in self.targets.targets().filter(|r| predicate(r)) {
            trace!(command = C::NAME, delivered, "broadcasting to recipient");
            match self.deliver(&recipient, &message).await {
                Ok(()) => delivered += 1,
                Err(err) => match self.config.broadcast_policy {
                    BroadcastPolicy::FailFast => {
                        warn!(command = C::NAME, delivered, error = %err, "broadcast aborted");
                        return Err(err);
                    }
                    BroadcastPolicy::ContinueOnError => failures.push(err),
                },
            }
        }

        if failures.is_empty() {
            debug!(command = C::NAME, delivered, "broadcast complete");
            Ok(delivered)
        } else {
            warn!(
                command = C::NAME,
                delivered,
                failed = failures.len(),
                "broadcast partially failed"
            );
            Err(CommandError::PartialBroadcast {
                delivered,
                failures,
            })
        }
    }

    async fn deliver(&self, recipient: &S, message: &str) -> CommandResult<()> {
        self.transport.send(recipient, message).await?;
        Ok(())
    }
}

impl<S> CommandRegistry<S> {
    /// 已注册的命令名列表（只读视图）
    pub fn registered_commands(&self) -> Vec<String> {
        self.names.iter().map(|e| e.key().clone()).collect()
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }
}

fn to_document<C: Command>(command: &C) -> CommandResult<Value> {
    let fail = |reason: String| CommandError::Serialization {
        command: C::NAME,
        reason,
    };

    let mut payload = match serde_json::to_value(command).map_err(|e| fail(e.to_string()))? {
        Value::Object(map) => map,
        _ => return Err(fail("payload must serialize to a JSON object".to_string())),
    };
    payload.insert(DISCRIMINATOR.to_string(), Value::String(C::NAME.to_string()));

    Ok(Value::Object(payload))
}
