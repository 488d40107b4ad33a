use proc_macro::TokenStream;

mod command;
mod utils;

/// 命令宏
/// 将具名字段结构体声明为线上命令：
/// - 合并/追加派生：`Debug, Clone, serde::Serialize, serde::Deserialize`
/// - 自动实现 `::cmdwire::Command`（`NAME` 即 `commandname` 的取值）
/// - 支持参数：`#[command(name = "mock")]`，默认取结构体名
///
/// 线上名为 `commandname` 的字段（含 `rename`、`rename_all` 与 `alias` 的结果）为判别字段保留；`#[serde(deny_unknown_fields)]` 会导致
/// 解码时拒绝判别字段，因此同样被禁止。
///
/// ```ignore
/// #[command(name = "mock")]
/// struct MockCommand {
///     message: String,
/// }
/// ```
#[proc_macro_attribute]
pub fn command(attr: TokenStream, item: TokenStream) -> TokenStream {
    command::expand(attr, item)
}
