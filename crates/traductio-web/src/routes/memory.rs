//! Translation memory routes - statistics, clearing and live updates.

use askama::Template;
use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use futures::stream::Stream;
use std::convert::Infallible;
use std::sync::Arc;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tracing::{debug, info};

use crate::state::AppState;
use crate::templates::MemoryStatsTemplate;

/// Current entry count.
///
/// HTMX: Replaces `#tm-count`.
pub async fn memory_stats(State(state): State<Arc<AppState>>) -> MemoryStatsTemplate {
    MemoryStatsTemplate {
        count: state.assistant.memory_count().await,
        oob: false,
    }
}

/// Delete every entry and return the new count.
pub async fn clear_memory(State(state): State<Arc<AppState>>) -> MemoryStatsTemplate {
    state.assistant.clear_memory().await;
    info!("Translation memory cleared");

    MemoryStatsTemplate {
        count: state.assistant.memory_count().await,
        oob: false,
    }
}

/// SSE stream of entry counts, pushed after every persisted change.
///
/// Sends the current count on connect. A subscriber that falls behind skips
/// to the latest count instead of replaying missed updates.
#[allow(tail_expr_drop_order)] // Drop order change in async_stream macro is harmless here
pub async fn memory_events(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let receiver = state.assistant.subscribe().await;

    let stream = async_stream::stream! {
        let mut updates = BroadcastStream::new(receiver);
        let mut count = state.assistant.memory_count().await;

        loop {
            let template = MemoryStatsTemplate { count, oob: false };
            if let Ok(html) = template.render() {
                yield Ok(Event::default().event("memory").data(html));
            }

            match updates.next().await {
                Some(Ok(update)) => count = update.count,
                Some(Err(BroadcastStreamRecvError::Lagged(skipped))) => {
                    debug!("Memory event subscriber lagged by {}", skipped);
                    count = state.assistant.memory_count().await;
                }
                None => break,
            }
        }
    };

    Sse::new(stream).keep_alive(KeepAlive::default())
}
