//! Refresh stream
//!
//! `GET /api/events` is a server-sent-event stream of
//! [`SyncPayload`](shared::SyncPayload) frames, one per changed resource.
//! A client that sees a `resync` event has missed frames and should refetch.

use std::convert::Infallible;
use std::time::Duration;

use axum::{
    Router,
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
    routing::get,
};
use futures::stream::{self, Stream};
use tokio::sync::broadcast::error::RecvError;

use crate::auth::CurrentUser;
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/events", get(stream_events))
}

async fn stream_events(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    tracing::debug!(user_id = %user.id, role = %user.role, "Refresh stream opened");
    let rx = state.subscribe_sync();

    let stream = stream::unfold(rx, |mut rx| async move {
        loop {
            match rx.recv().await {
                Ok(payload) => {
                    let event = match Event::default().event("sync").json_data(&payload) {
                        Ok(event) => event,
                        Err(e) => {
                            tracing::warn!(error = %e, "Sync payload not serializable");
                            continue;
                        }
                    };
                    return Some((Ok(event), rx));
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Refresh stream lagged");
                    let event = Event::default().event("resync").data(skipped.to_string());
                    return Some((Ok(event), rx));
                }
                Err(RecvError::Closed) => return None,
            }
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::new().interval(Duration::from_secs(15)))
}
