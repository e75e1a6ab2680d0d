use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{timestamp, Doctor};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRoom {
    pub id: i64,
    pub patient_id: i64,
    pub doctor_id: i64,
    #[serde(default, deserialize_with = "timestamp::deserialize_option")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub doctor: Option<Doctor>,
    #[serde(default)]
    pub last_message: Option<ChatMessage>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: i64,
    pub room_id: i64,
    pub sender_id: i64,
    pub content: String,
    #[serde(default, deserialize_with = "timestamp::deserialize_option")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_read: bool,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct StartChat {
    pub doctor_id: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewMessage<'a> {
    pub content: &'a str,
}
