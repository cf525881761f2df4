//! SSE 事件流
//!
//! `GET /api/events/orders?restaurant_id=` 把事件中心的 broadcast
//! 通道扇出成一条 SSE 流。连接握手先发一条 `hello` 带当前版本号；
//! 订阅端滞后丢事件时发 `resync` 提示客户端全量刷新。

use std::convert::Infallible;

use axum::{
    Router,
    extract::{Query, State},
    response::sse::{Event, KeepAlive, Sse},
    routing::get,
};
use futures::{Stream, StreamExt};
use serde::Deserialize;
use tokio::sync::broadcast;

use crate::core::ServerState;
use shared::message::FeedEvent;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/events/orders", get(order_events))
}

#[derive(Debug, Deserialize)]
pub struct EventsQuery {
    pub restaurant_id: String,
}

/// GET /api/events/orders - 订单事件流
pub async fn order_events(
    State(state): State<ServerState>,
    Query(query): Query<EventsQuery>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.events.subscribe();
    let version = state.events.current_version(&query.restaurant_id);

    let hello = Event::default()
        .event("hello")
        .data(format!("{{\"version\":{}}}", version));

    let updates = futures::stream::unfold(
        (rx, query.restaurant_id),
        |(mut rx, restaurant_id)| async move {
            loop {
                match rx.recv().await {
                    Ok(event) => {
                        if event.restaurant_id != restaurant_id {
                            continue;
                        }
                        let sse = feed_to_sse(&event);
                        return Some((Ok(sse), (rx, restaurant_id)));
                    }
                    Err(broadcast::error::RecvError::Lagged(missed)) => {
                        // 滞后的订阅者丢了事件，提示客户端全量刷新
                        tracing::warn!(missed, "SSE subscriber lagged, requesting resync");
                        let sse = Event::default()
                            .event("resync")
                            .data(format!("{{\"missed\":{}}}", missed));
                        return Some((Ok(sse), (rx, restaurant_id)));
                    }
                    Err(broadcast::error::RecvError::Closed) => return None,
                }
            }
        },
    );

    let stream =
        futures::stream::once(async move { Ok::<_, Infallible>(hello) }).chain(updates);
    Sse::new(stream).keep_alive(KeepAlive::default())
}

fn feed_to_sse(event: &FeedEvent) -> Event {
    let data = event
        .to_json()
        .unwrap_or_else(|_| "{}".to_string());
    Event::default()
        .event(event.kind.to_string())
        .id(event.version.to_string())
        .data(data)
}
