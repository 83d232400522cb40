use crate::event::PanelEvent;
use crate::subscription::{Subscription, SubscriptionId};
use crossterm::event::EventStream;
use futures::StreamExt;
use std::sync::Arc;

/// Marker type giving terminal input a stable subscription id.
pub struct TerminalEvents;

/// Subscribe to keyboard, pointer, resize and paste events.
///
/// `map` returns `None` to drop an event. The crossterm `EventStream` is
/// created inside the spawned task: building one eagerly on every
/// `subscriptions()` call would poke crossterm's global reader and steal
/// events from the stream that is already running.
pub fn terminal_events<Msg: Send + 'static>(
    map: impl Fn(PanelEvent) -> Option<Msg> + Send + Sync + 'static,
) -> Subscription<Msg> {
    let map = Arc::new(map);
    Subscription::from_stream_fn(SubscriptionId::of::<TerminalEvents>(), move || {
        let stream = EventStream::new().filter_map(move |result| {
            let map = map.clone();
            async move {
                match result {
                    Ok(event) => PanelEvent::from_crossterm(event).and_then(|ev| map(ev)),
                    Err(err) => {
                        tracing::warn!(%err, "terminal event stream error");
                        None
                    }
                }
            }
        });
        Box::pin(stream)
    })
}
