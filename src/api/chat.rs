use serde::{Deserialize, Serialize};

use super::ApiClient;
use crate::error::ApiResult;
use crate::models::{Chat, Message};

#[derive(Deserialize)]
struct ChatsEnvelope {
    chats: Vec<Chat>,
}

#[derive(Deserialize)]
struct MessagesEnvelope {
    messages: Vec<Message>,
}

#[derive(Deserialize)]
struct SentMessageEnvelope {
    message: Message,
}

/// Result of opening a chat with another user. The backend reuses an
/// existing chat when one exists, in which case only the id comes back.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatCreated {
    pub chat_id: String,
    #[serde(default)]
    pub chat: Option<Chat>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateChatBody<'a> {
    participant_id: &'a str,
}

#[derive(Serialize)]
struct SendMessageBody<'a> {
    content: &'a str,
}

impl ApiClient {
    /// GET /api/chats — every chat the user participates in, with last
    /// message preview and unread count as the backend computed them.
    pub async fn get_chats(&self) -> ApiResult<Vec<Chat>> {
        let req = self.authed(self.get("/api/chats"));
        let envelope: ChatsEnvelope =
            self.report("Failed to fetch chats", self.send(req).await)?;
        Ok(envelope.chats)
    }

    /// POST /api/chats
    pub async fn create_chat(&self, participant_id: &str) -> ApiResult<ChatCreated> {
        let body = CreateChatBody { participant_id };
        let req = self.authed(self.post("/api/chats").json(&body));
        self.report("Failed to start chat", self.send(req).await)
    }

    /// GET /api/chats/{id}/messages — oldest first; the backend marks them
    /// read as a side effect.
    pub async fn get_messages(&self, chat_id: &str) -> ApiResult<Vec<Message>> {
        let req = self.authed(self.get(&format!("/api/chats/{chat_id}/messages")));
        let envelope: MessagesEnvelope =
            self.report("Failed to fetch messages", self.send(req).await)?;
        Ok(envelope.messages)
    }

    /// POST /api/chats/{id}/messages
    pub async fn send_message(&self, chat_id: &str, content: &str) -> ApiResult<Message> {
        let body = SendMessageBody { content };
        let req = self.authed(self.post(&format!("/api/chats/{chat_id}/messages")).json(&body));
        let envelope: SentMessageEnvelope =
            self.report("Failed to send message", self.send(req).await)?;
        Ok(envelope.message)
    }
}
