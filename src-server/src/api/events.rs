//! Invalidation stream
//!
//! Server-sent events telling an open dashboard which route went stale.

use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use std::convert::Infallible;
use std::sync::Arc;
use tokio_stream::wrappers::{errors::BroadcastStreamRecvError, BroadcastStream};
use tokio_stream::{Stream, StreamExt};

use crate::context::OrgContext;
use crate::invalidation::{Invalidation, CRM_ROUTE};
use crate::AppState;

/// Name of the SSE event carrying an invalidation
pub const INVALIDATE_EVENT: &str = "invalidate";

pub async fn stream_invalidations(
    State(state): State<Arc<AppState>>,
    ctx: OrgContext,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let org = ctx.organization_id;
    log::debug!("Invalidation stream opened for {}", org);

    let events = BroadcastStream::new(state.invalidation.subscribe()).filter_map(move |received| {
        match received {
            Ok(invalidation) if invalidation.organization_id == org => Some(to_event(&invalidation)),
            Ok(_) => None,
            // Missed events: have the view refetch everything it shows.
            Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                log::warn!("Invalidation stream for {} lagged by {} events", org, skipped);
                Some(to_event(&Invalidation {
                    organization_id: org.clone(),
                    path: CRM_ROUTE.to_string(),
                }))
            }
        }
    });

    Sse::new(events).keep_alive(KeepAlive::default())
}

fn to_event(invalidation: &Invalidation) -> Result<Event, Infallible> {
    Ok(Event::default()
        .event(INVALIDATE_EVENT)
        .data(invalidation.path.as_str()))
}
