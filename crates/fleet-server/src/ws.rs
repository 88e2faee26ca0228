//! WebSocket push channel for observers.
//!
//! Connect handshake: one `layout` message (cell coordinates + adjacency),
//! one `state_snapshot` (all robots and jobs), then the live
//! `robot_update`/`job_update` stream.  A subscriber that falls behind the
//! bounded broadcast buffer gets a fresh snapshot instead of the lost
//! events.

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use serde_json::json;
use tokio::sync::broadcast::error::RecvError;

use crate::routes::Service;

pub async fn upgrade(State(service): State<Service>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| serve(socket, service))
}

type WsSender = SplitSink<WebSocket, Message>;

async fn serve(socket: WebSocket, service: Service) {
    // Subscribe before the snapshot so no event between the two is lost.
    let mut events = service.subscribe();
    let (mut sender, mut receiver) = socket.split();

    if send_layout(&mut sender, &service).await.is_err()
        || send_snapshot(&mut sender, &service).await.is_err()
    {
        return;
    }

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(event) => {
                    let Ok(text) = serde_json::to_string(&event) else { continue };
                    if sender.send(Message::Text(text)).await.is_err() {
                        return;
                    }
                }
                // Fell behind the buffer: resynchronize with a snapshot.
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "observer lagged; resending snapshot");
                    if send_snapshot(&mut sender, &service).await.is_err() {
                        return;
                    }
                }
                Err(RecvError::Closed) => return,
            },
            // Observers are write-only; reading just services pings and
            // detects disconnects.
            incoming = receiver.next() => match incoming {
                Some(Ok(_)) => {}
                _ => return,
            },
        }
    }
}

async fn send_layout(sender: &mut WsSender, service: &Service) -> Result<(), axum::Error> {
    let map = service.map();
    let mut nodes = serde_json::Map::new();
    let mut graph = serde_json::Map::new();
    for cell in map.cells() {
        let (x, y) = map.coordinates(cell);
        nodes.insert(map.name(cell).to_string(), json!([x, y]));

        let mut edges = serde_json::Map::new();
        for (heading, to) in map.neighbors(cell) {
            edges.insert(heading.as_str().to_string(), json!(map.name(to)));
        }
        graph.insert(map.name(cell).to_string(), edges.into());
    }

    let message = json!({
        "event": "layout",
        "data": { "nodes": nodes, "graph": graph },
    });
    sender.send(Message::Text(message.to_string())).await
}

async fn send_snapshot(sender: &mut WsSender, service: &Service) -> Result<(), axum::Error> {
    let snapshot = service.snapshot();
    let mut robots = serde_json::Map::new();
    for (id, view) in &snapshot.robots {
        let value = serde_json::to_value(view).unwrap_or(serde_json::Value::Null);
        robots.insert(id.to_string(), value);
    }

    let message = json!({
        "event": "state_snapshot",
        "data": { "robots": robots, "jobs": snapshot.jobs },
    });
    sender.send(Message::Text(message.to_string())).await
}
