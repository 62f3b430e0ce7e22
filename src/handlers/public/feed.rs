use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::Stream;
use std::convert::Infallible;
use tracing::warn;

use crate::realtime::hub::FeedHub;

/// GET /feed/reactions - Server-sent stream of reaction change events.
///
/// Each subscriber holds its own feed position; when the client disconnects
/// the subscription is dropped with the stream, releasing interest on every
/// exit path. Consumers treat the stream as deltas over the bulk map and
/// re-fetch it if they fall behind.
pub async fn reactions() -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let subscription = FeedHub::global().subscribe();

    let stream = futures::stream::unfold(subscription, |mut subscription| async move {
        loop {
            let change = subscription.next().await?;
            match Event::default().event("reaction").json_data(&change) {
                Ok(event) => return Some((Ok::<_, Infallible>(event), subscription)),
                Err(e) => {
                    warn!("Skipping unserializable feed event: {}", e);
                    continue;
                }
            }
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
