use std::sync::Arc;

use crate::api::ApiClient;
use crate::error::ApiResult;
use crate::models::{Chat, Message};
use crate::pages::InFlight;

/// The open conversation within the chat page. Messages have no local
/// persistence; they are re-fetched whenever the conversation is opened.
pub struct Conversation {
    pub chat_id: String,
    pub messages: Vec<Message>,
}

/// The messaging page: the chat list plus at most one open conversation.
/// Unread counts are displayed as last fetched.
pub struct ChatPage {
    api: Arc<ApiClient>,
    pub chats: Vec<Chat>,
    pub open: Option<Conversation>,
    in_flight: InFlight,
}

impl ChatPage {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self {
            api,
            chats: Vec::new(),
            open: None,
            in_flight: InFlight::default(),
        }
    }

    pub async fn load(&mut self) -> ApiResult<()> {
        self.chats = self.api.get_chats().await?;
        Ok(())
    }

    /// Open one conversation, fetching its messages (the backend marks them
    /// read as a side effect).
    pub async fn open_chat(&mut self, chat_id: &str) -> ApiResult<()> {
        let messages = self.api.get_messages(chat_id).await?;
        self.open = Some(Conversation {
            chat_id: chat_id.to_string(),
            messages,
        });
        Ok(())
    }

    /// Send a message in the open conversation; the server's stored message
    /// is appended on success.
    pub async fn send(&mut self, content: &str) -> bool {
        let Some(chat_id) = self.open.as_ref().map(|c| c.chat_id.clone()) else {
            return false;
        };
        if !self.in_flight.try_begin("send") {
            return false;
        }
        let result = self.api.send_message(&chat_id, content).await;
        self.in_flight.finish("send");
        match result {
            Ok(message) => {
                if let Some(conversation) = self.open.as_mut() {
                    conversation.messages.push(message);
                }
                true
            }
            Err(_) => false,
        }
    }

    /// Start (or resume) a chat with another user. Returns the chat id on
    /// success; a brand-new chat is added to the list.
    pub async fn start_chat(&mut self, participant_id: &str) -> Option<String> {
        match self.api.create_chat(participant_id).await {
            Ok(created) => {
                if let Some(chat) = created.chat {
                    if !self.chats.iter().any(|c| c.id == chat.id) {
                        self.chats.push(chat);
                    }
                }
                Some(created.chat_id)
            }
            Err(_) => None,
        }
    }
}
