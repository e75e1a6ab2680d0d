use crate::envelope::{decode, ListPayload};
use crate::error::ApiError;
use crate::executor::Executor;
use crate::request::{with_query, Pagination};
use crate::types::{ChatMessage, ChatRoom, NewMessage, StartChat};

use super::{require_id, require_text};

/// Patient-doctor chat rooms. Messages are fetched on demand; there is no
/// live subscription.
pub struct ChatApi<'a> {
    executor: &'a Executor,
}

impl<'a> ChatApi<'a> {
    pub(crate) fn new(executor: &'a Executor) -> Self {
        Self { executor }
    }

    /// Open a room with `doctor_id`, or get the existing one.
    pub async fn start_chat(&self, doctor_id: i64) -> Result<ChatRoom, ApiError> {
        require_id(doctor_id, "doctor_id")?;
        self.executor
            .post("/chat/rooms", &StartChat { doctor_id })
            .await
            .and_then(decode)
            .inspect_err(|error| tracing::error!(%error, doctor_id, "failed to start chat"))
    }

    pub async fn rooms(&self, page: Pagination) -> Result<Vec<ChatRoom>, ApiError> {
        self.executor
            .get(&with_query("/chat/rooms", &page.query_pairs()))
            .await
            .and_then(ListPayload::<ChatRoom>::decode)
            .map(ListPayload::into_items)
            .inspect_err(|error| tracing::error!(%error, "failed to load chat rooms"))
    }

    pub async fn messages(
        &self,
        room_id: i64,
        page: Pagination,
    ) -> Result<Vec<ChatMessage>, ApiError> {
        self.executor
            .get(&with_query(&format!("/chat/rooms/{room_id}/messages"), &page.query_pairs()))
            .await
            .and_then(ListPayload::<ChatMessage>::decode)
            .map(ListPayload::into_items)
            .inspect_err(|error| tracing::error!(%error, room_id, "failed to load messages"))
    }

    pub async fn send_message(&self, room_id: i64, content: &str) -> Result<ChatMessage, ApiError> {
        let content = require_text(content, "message")?;
        self.executor
            .post(&format!("/chat/rooms/{room_id}/messages"), &NewMessage { content })
            .await
            .and_then(decode)
            .inspect_err(|error| tracing::error!(%error, room_id, "failed to send message"))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::testing::{executor, ScriptedTransport};
    use crate::token::MemoryTokenStore;

    #[tokio::test]
    async fn start_chat_posts_doctor_id() {
        let transport = ScriptedTransport::new();
        transport.push_json(
            201,
            json!({"id": 5, "patient_id": 1, "doctor_id": 3, "doctor": {"id": 3, "rating": "4.2"}}),
        );
        let exec = executor(&transport, MemoryTokenStore::with_access_token("t"));

        let room = ChatApi::new(&exec).start_chat(3).await.unwrap();

        assert_eq!(room.id, 5);
        assert_eq!(room.doctor.unwrap().rating, 4.2);
        let sent = transport.requests();
        assert_eq!(sent[0].path, "http://localhost:8000/api/v1/chat/rooms");
        assert_eq!(sent[0].body.as_deref(), Some(r#"{"doctor_id":3}"#));
    }

    #[tokio::test]
    async fn messages_are_paginated() {
        let transport = ScriptedTransport::new();
        transport.push_json(
            200,
            json!({"data": [{"id": 1, "room_id": 5, "sender_id": 1, "content": "Hello"}]}),
        );
        let exec = executor(&transport, MemoryTokenStore::new());

        let messages = ChatApi::new(&exec).messages(5, Pagination::new(0, 50)).await.unwrap();

        assert_eq!(messages[0].content, "Hello");
        assert!(!messages[0].is_read);
        assert_eq!(
            transport.requests()[0].path,
            "http://localhost:8000/api/v1/chat/rooms/5/messages?skip=0&limit=50"
        );
    }

    #[tokio::test]
    async fn blank_message_is_not_sent() {
        let transport = ScriptedTransport::new();
        let exec = executor(&transport, MemoryTokenStore::new());

        let err = ChatApi::new(&exec).send_message(5, " \n ").await.unwrap_err();
        assert_eq!(err.to_string(), "message is required");
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn message_is_trimmed_before_sending() {
        let transport = ScriptedTransport::new();
        transport.push_json(201, json!({"id": 2, "room_id": 5, "sender_id": 1, "content": "Hi"}));
        let exec = executor(&transport, MemoryTokenStore::new());

        ChatApi::new(&exec).send_message(5, "  Hi ").await.unwrap();
        assert_eq!(transport.requests()[0].body.as_deref(), Some(r#"{"content":"Hi"}"#));
    }
}
