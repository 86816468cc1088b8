//! SMS message records as they arrive from the device log

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One logged SMS.
///
/// The device log is not uniform: depending on the client version the text
/// lives under `body`, `content` or `message`, and the sender under
/// `address`, `sender` or `from`. Every key is kept as seen so the extractor
/// can pick one field per collection. A key that is present but `null` or
/// non-text is recorded as the empty string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(default, deserialize_with = "present_text", skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,

    #[serde(default, deserialize_with = "present_text", skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    #[serde(default, deserialize_with = "present_text", skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(default, deserialize_with = "present_text", skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    #[serde(default, deserialize_with = "present_text", skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,

    #[serde(default, deserialize_with = "present_text", skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
}

/// Any present key yields `Some`; only string values keep their text.
fn present_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(Some(match value {
        Value::String(text) => text,
        _ => String::new(),
    }))
}

impl Message {
    /// Create a message with the canonical `body` and `address` keys.
    pub fn new(body: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            body: Some(body.into()),
            address: Some(address.into()),
            ..Self::default()
        }
    }
}

/// Which key a collection's message text is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyField {
    Body,
    Content,
    Message,
    /// No message carries any known text key.
    Missing,
}

/// Which key a collection's sender is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressField {
    Address,
    Sender,
    From,
    /// No message carries any known sender key.
    Missing,
}

/// Placeholder sender used when no message has any sender key.
pub const UNKNOWN_ADDRESS: &str = "unknown";

impl BodyField {
    /// Resolve the text key for a whole collection.
    ///
    /// The first key present on at least one message wins, in the order
    /// `body`, `content`, `message`.
    pub fn resolve(messages: &[Message]) -> Self {
        if messages.iter().any(|m| m.body.is_some()) {
            BodyField::Body
        } else if messages.iter().any(|m| m.content.is_some()) {
            BodyField::Content
        } else if messages.iter().any(|m| m.message.is_some()) {
            BodyField::Message
        } else {
            BodyField::Missing
        }
    }

    /// Read the text of one message; absent values read as empty.
    pub fn read<'a>(&self, message: &'a Message) -> &'a str {
        let field = match self {
            BodyField::Body => &message.body,
            BodyField::Content => &message.content,
            BodyField::Message => &message.message,
            BodyField::Missing => return "",
        };
        field.as_deref().unwrap_or("")
    }
}

impl AddressField {
    /// Resolve the sender key for a whole collection (`address`, `sender`, `from`).
    pub fn resolve(messages: &[Message]) -> Self {
        if messages.iter().any(|m| m.address.is_some()) {
            AddressField::Address
        } else if messages.iter().any(|m| m.sender.is_some()) {
            AddressField::Sender
        } else if messages.iter().any(|m| m.from.is_some()) {
            AddressField::From
        } else {
            AddressField::Missing
        }
    }

    /// Read the sender of one message.
    pub fn read<'a>(&self, message: &'a Message) -> &'a str {
        let field = match self {
            AddressField::Address => &message.address,
            AddressField::Sender => &message.sender,
            AddressField::From => &message.from,
            AddressField::Missing => return UNKNOWN_ADDRESS,
        };
        field.as_deref().unwrap_or("")
    }
}
