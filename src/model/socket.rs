use serde::{Deserialize, Serialize};

use crate::model::notification::NotificationDto;

/// Frames a client sends over the notification socket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ClientEvent {
    JoinNotifications { user_id: String, token: String },
    LeaveNotifications { user_id: String },
}

/// Frames the server pushes to a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ServerEvent {
    NewNotification(NotificationDto),
    Joined {
        #[serde(rename = "userId")]
        user_id: String,
    },
    Left {
        #[serde(rename = "userId")]
        user_id: String,
    },
    Error { message: String },
}
