//! Notification WebSocket.
//!
//! Clients join the rooms of the users they want notifications for and then receive
//! every notification stored for those users while the connection is open.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures_util::{
    stream::{SplitSink, SplitStream},
    SinkExt, StreamExt,
};
use std::time::Duration;
use tokio::{sync::mpsc, time::Instant};

use crate::{
    model::{socket::ClientEvent, socket::ServerEvent, user::Role},
    server::{
        service::{
            auth::JwtKeys,
            notifier::{ConnectionId, NotificationHub},
        },
        state::AppState,
    },
};

const PING_INTERVAL: Duration = Duration::from_secs(30);

/// A connection that has not answered a ping for this long is closed.
const PONG_TIMEOUT: Duration = Duration::from_secs(60);

/// Deadline for the pong to the oldest unanswered ping.
#[derive(Debug, Default)]
struct Heartbeat {
    deadline: Option<Instant>,
}

impl Heartbeat {
    /// Later pings do not push back a deadline that is already running.
    fn ping_sent(&mut self, now: Instant) {
        self.deadline.get_or_insert(now + PONG_TIMEOUT);
    }

    fn pong_received(&mut self) {
        self.deadline = None;
    }

}

/// Resolves once `deadline` passes; never resolves without one.
async fn pong_overdue(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

pub async fn notification_socket(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let (sender, receiver) = socket.split();
    let (connection, rx) = state.hub.register().await;

    tracing::debug!("Socket connection {} opened", connection);

    run_socket_loop(sender, receiver, rx, &state.hub, &state.jwt, connection).await;

    state.hub.disconnect(connection).await;

    tracing::debug!("Socket connection {} closed", connection);
}

/// Forwards hub events to the client, answers client frames and keeps the connection
/// alive with pings until either side goes away.
async fn run_socket_loop(
    mut sender: SplitSink<WebSocket, Message>,
    mut receiver: SplitStream<WebSocket>,
    mut rx: mpsc::Receiver<ServerEvent>,
    hub: &NotificationHub,
    jwt: &JwtKeys,
    connection: ConnectionId,
) {
    let mut ping_interval = tokio::time::interval(PING_INTERVAL);
    // First tick fires immediately.
    ping_interval.tick().await;

    let mut heartbeat = Heartbeat::default();

    loop {
        tokio::select! {
            _ = pong_overdue(heartbeat.deadline) => {
                tracing::debug!("Socket connection {} missed its pong", connection);
                break;
            }

            _ = ping_interval.tick() => {
                if sender.send(Message::Ping(Default::default())).await.is_err() {
                    break;
                }
                heartbeat.ping_sent(Instant::now());
            }

            event = rx.recv() => {
                let Some(event) = event else {
                    break;
                };
                if send_event(&mut sender, &event).await.is_err() {
                    break;
                }
            }

            msg = receiver.next() => {
                match msg {
                    Some(Ok(Message::Pong(_))) => heartbeat.pong_received(),
                    Some(Ok(Message::Text(text))) => {
                        let reply = handle_frame(text.as_str(), hub, jwt, connection).await;
                        if send_event(&mut sender, &reply).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::debug!("Socket connection {} failed: {}", connection, e);
                        break;
                    }
                }
            }
        }
    }

    let _ = sender.send(Message::Close(None)).await;
}

async fn send_event(
    sender: &mut SplitSink<WebSocket, Message>,
    event: &ServerEvent,
) -> Result<(), axum::Error> {
    match serde_json::to_string(event) {
        Ok(json) => sender.send(Message::Text(json.into())).await,
        Err(e) => {
            tracing::error!("Failed to serialize socket event: {}", e);
            Ok(())
        }
    }
}

/// Applies one client frame to the hub and returns the reply for the client.
async fn handle_frame(
    text: &str,
    hub: &NotificationHub,
    jwt: &JwtKeys,
    connection: ConnectionId,
) -> ServerEvent {
    let event: ClientEvent = match serde_json::from_str(text) {
        Ok(event) => event,
        Err(_) => {
            return ServerEvent::Error {
                message: "Unknown event".to_string(),
            }
        }
    };

    match event {
        ClientEvent::JoinNotifications { user_id, token } => {
            if let Err(message) = authorize_join(jwt, &user_id, &token) {
                return ServerEvent::Error {
                    message: message.to_string(),
                };
            }
            hub.join(&user_id, connection).await;
            tracing::debug!("Connection {} joined notifications of {}", connection, user_id);

            ServerEvent::Joined { user_id }
        }
        ClientEvent::LeaveNotifications { user_id } => {
            hub.leave(&user_id, connection).await;

            ServerEvent::Left { user_id }
        }
    }
}

/// A token may join its own user's room; admin tokens may join any room.
fn authorize_join(jwt: &JwtKeys, user_id: &str, token: &str) -> Result<(), &'static str> {
    let token = token.strip_prefix("Bearer ").unwrap_or(token);
    let claims = jwt.verify(token).map_err(|_| "Invalid token")?;

    if claims.id == user_id || claims.role == Role::Admin {
        Ok(())
    } else {
        Err("Unauthorized access")
    }
}
