//! JSON 编解码
//!
//! 注册表只在“原始字符串 <-> 通用文档（`serde_json::Value`）”这一层使用编解码器；
//! 文档到具体命令类型的映射始终由 serde 派生完成。
//!
use serde_json::Value;

pub trait JsonCodec: Send + Sync {
    /// 将原始字符串解析为通用文档
    fn decode(&self, raw: &str) -> Result<Value, serde_json::Error>;

    /// 将通用文档渲染为线上字符串
    fn encode(&self, document: &Value) -> Result<String, serde_json::Error>;
}

/// 默认编解码器：紧凑输出
#[derive(Clone, Copy, Debug, Default)]
pub struct SerdeJsonCodec;

impl JsonCodec for SerdeJsonCodec {
    fn decode(&self, raw: &str) -> Result<Value, serde_json::Error> {
        serde_json::from_str(raw)
    }

    fn encode(&self, document: &Value) -> Result<String, serde_json::Error> {
        serde_json::to_string(document)
    }
}

/// 带缩进的输出，便于调试
#[derive(Clone, Copy, Debug, Default)]
pub struct PrettyJsonCodec;

impl JsonCodec for PrettyJsonCodec {
    fn decode(&self, raw: &str) -> Result<Value, serde_json::Error> {
        serde_json::from_str(raw)
    }

    fn encode(&self, document: &Value) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn compact_codec_emits_single_line() {
        let out = SerdeJsonCodec.encode(&json!({"a": 1, "b": [1, 2]})).unwrap();
        assert!(!out.contains('\n'));
    }

    #[test]
    fn pretty_codec_decodes_what_it_encodes() {
        let doc = json!({"commandname": "mock", "message": "x"});
        let out = PrettyJsonCodec.encode(&doc).unwrap();
        assert!(out.contains('\n'));
        assert_eq!(PrettyJsonCodec.decode(&out).unwrap(), doc);
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(SerdeJsonCodec.decode("{not json").is_err());
    }
}
