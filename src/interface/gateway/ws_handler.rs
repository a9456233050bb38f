//! WebSocket connection handler
//!
//! Each socket becomes one switchboard connection. Inbound text frames are
//! decoded and dispatched in arrival order; outbound events are drained
//! from the connection's queue onto the socket. When either side stops,
//! the switchboard tears down whatever the connection was part of before
//! the connection is forgotten.

use crate::application::outbox::OutboundReceiver;
use crate::application::Switchboard;
use crate::domain::shared::value_objects::ConnectionId;
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures::{
    sink::SinkExt,
    stream::{SplitSink, SplitStream, StreamExt},
};
use tracing::{debug, error, info, warn};

/// `GET /ws`
pub async fn ws_handler(ws: WebSocketUpgrade, State(switchboard): State<Switchboard>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, switchboard))
}

async fn handle_socket(socket: WebSocket, switchboard: Switchboard) {
    let (sender, receiver) = socket.split();
    let (connection_id, outbound) = switchboard.connect().await;

    info!("Gateway connection established: {}", connection_id);

    let mut send_task = tokio::spawn(forward_outbound(connection_id, outbound, sender));
    let mut recv_task = tokio::spawn(dispatch_inbound(
        connection_id,
        receiver,
        switchboard.clone(),
    ));

    // Wait for either task to finish
    tokio::select! {
        _ = (&mut send_task) => {
            debug!("Send task finished for {}", connection_id);
            recv_task.abort();
        }
        _ = (&mut recv_task) => {
            debug!("Receive task finished for {}", connection_id);
            send_task.abort();
        }
    }

    switchboard.disconnect(connection_id).await;
    info!("Gateway connection closed: {}", connection_id);
}

async fn forward_outbound(
    connection_id: ConnectionId,
    mut outbound: OutboundReceiver,
    mut sender: SplitSink<WebSocket, Message>,
) {
    while let Some(event) = outbound.recv().await {
        let json = match serde_json::to_string(&event) {
            Ok(j) => j,
            Err(e) => {
                error!("Failed to serialize event for {}: {}", connection_id, e);
                continue;
            }
        };

        if sender.send(Message::Text(json)).await.is_err() {
            debug!("Socket write failed for {}", connection_id);
            break;
        }
    }
}

async fn dispatch_inbound(
    connection_id: ConnectionId,
    mut receiver: SplitStream<WebSocket>,
    switchboard: Switchboard,
) {
    while let Some(result) = receiver.next().await {
        match result {
            Ok(Message::Text(text)) => {
                debug!("Received from {}: {}", connection_id, text);
                switchboard.handle_text(connection_id, &text).await;
            }
            Ok(Message::Close(_)) => {
                info!("WebSocket closed by {}", connection_id);
                break;
            }
            Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {
                // axum answers pings itself
            }
            Ok(Message::Binary(_)) => {
                warn!("Ignoring binary frame from {}", connection_id);
            }
            Err(e) => {
                error!("WebSocket error for {}: {}", connection_id, e);
                break;
            }
        }
    }
}
