//! # Messages
//!
//! One unit of chat content. Each kind carries exactly one payload shape,
//! so a text message can never accidentally hold a coordinate.
//!
//! Messages are immutable once built: there are no setters, only
//! constructors. The store deletes them, it never edits them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier for a message (UUID v4 as a string).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct MessageId(String);

impl MessageId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MessageId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// A chat message. Serialized as `{ "type": "text", "text": "..." }` etc.
///
/// The `id` is never read from input: every deserialized message gets a
/// fresh one, so seeds in the config file can't collide.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Message {
    Text {
        #[serde(skip_deserializing, default)]
        id: MessageId,
        text: String,
    },
    Image {
        #[serde(skip_deserializing, default)]
        id: MessageId,
        uri: String,
    },
    Location {
        #[serde(skip_deserializing, default)]
        id: MessageId,
        coordinate: Coordinate,
    },
    Audio {
        #[serde(skip_deserializing, default)]
        id: MessageId,
        audio_uri: String,
    },
}

impl Message {
    pub fn text(text: impl Into<String>) -> Self {
        Message::Text {
            id: MessageId::new(),
            text: text.into(),
        }
    }

    pub fn image(uri: impl Into<String>) -> Self {
        Message::Image {
            id: MessageId::new(),
            uri: uri.into(),
        }
    }

    pub fn location(coordinate: Coordinate) -> Self {
        Message::Location {
            id: MessageId::new(),
            coordinate,
        }
    }

    pub fn audio(audio_uri: impl Into<String>) -> Self {
        Message::Audio {
            id: MessageId::new(),
            audio_uri: audio_uri.into(),
        }
    }

    pub fn id(&self) -> &MessageId {
        match self {
            Message::Text { id, .. }
            | Message::Image { id, .. }
            | Message::Location { id, .. }
            | Message::Audio { id, .. } => id,
        }
    }

    /// Short lowercase name of the kind, used in logs and bubble titles.
    pub fn kind(&self) -> &'static str {
        match self {
            Message::Text { .. } => "text",
            Message::Image { .. } => "image",
            Message::Location { .. } => "location",
            Message::Audio { .. } => "audio",
        }
    }
}

/// The conversation shown on first launch when no seed is configured.
/// Newest first, matching the store's order.
pub fn demo_conversation() -> Vec<Message> {
    vec![
        Message::image("https://unsplash.it/300/300"),
        Message::text("World"),
        Message::text("Hello"),
        Message::location(Coordinate {
            latitude: 37.78825,
            longitude: -122.4324,
        }),
    ]
}
