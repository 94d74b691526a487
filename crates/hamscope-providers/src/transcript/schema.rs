//! Wire schema for agent transcript JSONL records.
//!
//! Transcripts are append-only and loosely shaped; every field that is not
//! structurally required is optional with a safe default, and unknown record
//! or content kinds decode to `Unknown` instead of failing the line.

use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawRecord {
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub message: Option<RawMessage>,
}

#[derive(Debug, Deserialize, Clone)]
pub(crate) struct RawMessage {
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub usage: Option<UsageBlock>,
    #[serde(default, deserialize_with = "deserialize_content")]
    pub content: Vec<ContentBlock>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Role {
    User,
    Assistant,
    Other,
}

impl RawMessage {
    /// Role with anything unrecognized collapsed to `Other`.
    pub fn role(&self) -> Role {
        match self.role.as_deref() {
            Some("user") => Role::User,
            Some("assistant") => Role::Assistant,
            _ => Role::Other,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, Default)]
pub(crate) struct UsageBlock {
    #[serde(default)]
    pub input_tokens: u64,
    #[serde(default)]
    pub output_tokens: u64,
    #[serde(default)]
    pub cache_read_input_tokens: u64,
    #[serde(default)]
    pub cache_creation_input_tokens: u64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(tag = "type")]
#[serde(rename_all = "snake_case")]
pub(crate) enum ContentBlock {
    Text {
        #[serde(default)]
        text: String,
    },
    ToolUse {
        name: String,
        #[serde(default)]
        input: Value,
    },
    #[serde(other)]
    Unknown,
}

/// Message content arrives either as a bare string or a block array.
fn deserialize_content<'de, D>(deserializer: D) -> Result<Vec<ContentBlock>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrArray {
        String(String),
        Array(Vec<ContentBlock>),
    }

    match StringOrArray::deserialize(deserializer)? {
        StringOrArray::String(s) => Ok(vec![ContentBlock::Text { text: s }]),
        StringOrArray::Array(arr) => Ok(arr),
    }
}

impl ContentBlock {
    /// Target path of a "Read" tool invocation, if this block is one.
    pub fn read_file_path(&self) -> Option<&str> {
        match self {
            ContentBlock::ToolUse { name, input } if name == "Read" => {
                input.get("file_path").and_then(Value::as_str)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_assistant_record_with_usage_and_tool_use() {
        let line = r#"{
            "sessionId": "abc",
            "timestamp": "2025-06-01T10:00:00Z",
            "message": {
                "role": "assistant",
                "model": "claude-sonnet-4-5",
                "usage": {"input_tokens": 10, "output_tokens": 5, "cache_read_input_tokens": 2},
                "content": [
                    {"type": "text", "text": "reading"},
                    {"type": "tool_use", "id": "t1", "name": "Read", "input": {"file_path": "/p/src/a.rs"}}
                ]
            }
        }"#;
        let record: RawRecord = serde_json::from_str(line).unwrap();
        let msg = record.message.unwrap();
        assert_eq!(msg.role(), Role::Assistant);
        assert_eq!(msg.usage.unwrap().input_tokens, 10);
        assert_eq!(
            msg.content.iter().filter_map(|b| b.read_file_path()).next(),
            Some("/p/src/a.rs")
        );
    }

    #[test]
    fn decodes_string_content_and_unknown_blocks() {
        let line = r#"{"message": {"role": "user", "content": "hello"}}"#;
        let record: RawRecord = serde_json::from_str(line).unwrap();
        let msg = record.message.unwrap();
        assert_eq!(msg.role(), Role::User);
        assert!(matches!(msg.content[0], ContentBlock::Text { .. }));

        let line = r#"{"message": {"role": "assistant", "content": [{"type": "thinking", "thinking": "..."}]}}"#;
        let record: RawRecord = serde_json::from_str(line).unwrap();
        assert!(matches!(
            record.message.unwrap().content[0],
            ContentBlock::Unknown
        ));
    }

    #[test]
    fn tolerates_missing_fields() {
        let record: RawRecord = serde_json::from_str(r#"{"type": "summary"}"#).unwrap();
        assert!(record.session_id.is_none());
        assert!(record.message.is_none());
    }

    #[test]
    fn non_read_tool_use_has_no_file_path() {
        let block: ContentBlock = serde_json::from_str(
            r#"{"type": "tool_use", "name": "Bash", "input": {"command": "ls"}}"#,
        )
        .unwrap();
        assert_eq!(block.read_file_path(), None);
    }
}
