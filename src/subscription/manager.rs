use crate::store::{DashboardStore, StoreUpdate};
use crate::subscription::protocol::{ClientMessage, ServerMessage, Topic};
use axum::extract::ws::{Message, WebSocket};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{error, info, warn};

/// Manages a single WebSocket connection with topic subscriptions
pub struct ConnectionManager {
    /// Topics this connection is subscribed to
    subscriptions: HashSet<Topic>,
}

impl ConnectionManager {
    pub fn new() -> Self {
        Self {
            subscriptions: HashSet::new(),
        }
    }

    /// Handle WebSocket connection lifecycle
    pub async fn handle(
        mut self,
        mut socket: WebSocket,
        mut update_rx: broadcast::Receiver<StoreUpdate>,
        store: Arc<DashboardStore>,
    ) {
        info!("WebSocket connection established");

        if let Err(e) = send_snapshot(&mut socket, &store).await {
            error!(error = %e, "Failed to send initial snapshot");
            return;
        }

        loop {
            tokio::select! {
                // Handle incoming client messages
                msg = socket.recv() => {
                    let outcome = match self.handle_incoming(msg, &store) {
                        Incoming::Continue => Ok(()),
                        Incoming::Reply(reply) => send(&mut socket, &reply).await,
                        Incoming::Pong(data) => socket
                            .send(Message::Pong(data))
                            .await
                            .map_err(anyhow::Error::from),
                        Incoming::Close => break,
                    };
                    if let Err(e) = outcome {
                        error!(error = %e, "Failed to reply to client");
                        break;
                    }
                }

                // Handle store updates from broadcast channel
                result = update_rx.recv() => {
                    match result {
                        Ok(StoreUpdate::Refreshed { .. }) => {
                            if let Err(e) = send_snapshot(&mut socket, &store).await {
                                error!(error = %e, "Failed to send snapshot");
                                break;
                            }
                        }
                        Ok(update) => {
                            if self.should_forward_update(&update) {
                                if let Err(e) = send(&mut socket, &ServerMessage::from(update)).await {
                                    error!(error = %e, "Failed to send store update");
                                    break;
                                }
                            }
                        }
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            warn!(skipped = skipped, "WebSocket lagged, skipped updates");
                            // Continue processing
                        }
                        Err(broadcast::error::RecvError::Closed) => {
                            error!("Store broadcast channel closed");
                            break;
                        }
                    }
                }
            }
        }

        info!("WebSocket connection closed");
    }

    /// Decide what to do with one frame from the peer; `None` means the
    /// stream ended without a Close frame
    fn handle_incoming(
        &mut self,
        msg: Option<Result<Message, axum::Error>>,
        store: &DashboardStore,
    ) -> Incoming {
        match msg {
            None => {
                info!("WebSocket peer went away");
                Incoming::Close
            }
            Some(Ok(Message::Text(text))) => match self.handle_client_message(&text, store) {
                Ok(()) => Incoming::Continue,
                Err(e) => {
                    warn!(error = %e, "Rejected client message");
                    Incoming::Reply(ServerMessage::Error {
                        error: e.to_string(),
                    })
                }
            },
            Some(Ok(Message::Close(_))) => {
                info!("WebSocket client disconnected");
                Incoming::Close
            }
            Some(Ok(Message::Ping(data))) => Incoming::Pong(data),
            // Ignore binary, pong messages
            Some(Ok(_)) => Incoming::Continue,
            Some(Err(e)) => {
                warn!(error = %e, "WebSocket error");
                Incoming::Close
            }
        }
    }

    /// Handle client message (subscribe/unsubscribe/acknowledge/refresh)
    fn handle_client_message(&mut self, text: &str, store: &DashboardStore) -> anyhow::Result<()> {
        let msg: ClientMessage = serde_json::from_str(text)?;
        self.apply(msg, store);
        Ok(())
    }

    fn apply(&mut self, msg: ClientMessage, store: &DashboardStore) {
        match msg {
            ClientMessage::Subscribe { topic } => {
                info!(topic = ?topic, "Client subscribed to topic");
                self.subscriptions.insert(topic);
            }
            ClientMessage::Unsubscribe { topic } => {
                info!(topic = ?topic, "Client unsubscribed from topic");
                self.subscriptions.remove(&topic);
            }
            ClientMessage::Acknowledge { alert_id } => store.acknowledge_alert(&alert_id),
            ClientMessage::Refresh => store.refresh_data(),
        }
    }

    /// Check if update should be forwarded to this connection
    fn should_forward_update(&self, update: &StoreUpdate) -> bool {
        // If no subscriptions, forward all updates
        if self.subscriptions.is_empty() {
            return true;
        }

        match Topic::of(update) {
            Some(topic) => self.subscriptions.contains(&topic),
            None => true,
        }
    }
}

/// Action taken for one incoming frame
#[derive(Debug)]
enum Incoming {
    Continue,
    Reply(ServerMessage),
    Pong(Vec<u8>),
    Close,
}

impl Default for ConnectionManager {
    fn default() -> Self {
        Self::new()
    }
}

async fn send_snapshot(socket: &mut WebSocket, store: &DashboardStore) -> anyhow::Result<()> {
    let msg = ServerMessage::Snapshot {
        data: store.snapshot(),
    };
    send(socket, &msg).await
}

async fn send(socket: &mut WebSocket, msg: &ServerMessage) -> anyhow::Result<()> {
    let json = serde_json::to_string(msg)?;
    socket.send(Message::Text(json)).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimulationConfig;
    use chrono::Utc;

    fn store() -> DashboardStore {
        let store = DashboardStore::new(SimulationConfig {
            seed: Some(31),
            ..SimulationConfig::default()
        });
        store.initialize();
        store
    }

    fn sample_update() -> StoreUpdate {
        StoreUpdate::DevicesUpdated {
            devices: vec![],
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_no_subscriptions_forwards_everything() {
        let manager = ConnectionManager::new();
        assert!(manager.should_forward_update(&sample_update()));
    }

    #[test]
    fn test_topic_subscription_filters_updates() {
        let store = store();
        let mut manager = ConnectionManager::new();
        manager.apply(ClientMessage::Subscribe { topic: Topic::Alerts }, &store);

        assert!(!manager.should_forward_update(&sample_update()));
        assert!(manager.should_forward_update(&StoreUpdate::AlertAcknowledged {
            alert_id: "alert-1".to_string(),
            timestamp: Utc::now(),
        }));
        assert!(manager.should_forward_update(&StoreUpdate::Refreshed { timestamp: Utc::now() }));

        manager.apply(ClientMessage::Unsubscribe { topic: Topic::Alerts }, &store);
        assert!(manager.should_forward_update(&sample_update()));
    }

    #[test]
    fn test_incoming_frames() {
        let store = store();
        let mut manager = ConnectionManager::new();

        // Stream ended without a Close frame
        assert!(matches!(manager.handle_incoming(None, &store), Incoming::Close));
        assert!(matches!(
            manager.handle_incoming(Some(Ok(Message::Close(None))), &store),
            Incoming::Close
        ));
        assert!(matches!(
            manager.handle_incoming(Some(Ok(Message::Ping(vec![1, 2]))), &store),
            Incoming::Pong(ref data) if data == &vec![1, 2]
        ));
        assert!(matches!(
            manager.handle_incoming(Some(Ok(Message::Text("not json".to_string()))), &store),
            Incoming::Reply(ServerMessage::Error { .. })
        ));
        assert!(matches!(
            manager.handle_incoming(
                Some(Ok(Message::Text(r#"{"type":"subscribe","topic":"devices"}"#.to_string()))),
                &store
            ),
            Incoming::Continue
        ));
        assert!(manager.subscriptions.contains(&Topic::Devices));
    }

    #[test]
    fn test_acknowledge_message_reaches_store() {
        let store = store();
        let mut manager = ConnectionManager::new();

        manager.apply(
            ClientMessage::Acknowledge {
                alert_id: "alert-5".to_string(),
            },
            &store,
        );

        let alert = store.alerts().into_iter().find(|a| a.id == "alert-5").unwrap();
        assert!(alert.acknowledged);
    }
}
