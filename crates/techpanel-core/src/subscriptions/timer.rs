use crate::subscription::{SubscriptionId, SubscriptionSource};
use futures::stream::BoxStream;
use futures::StreamExt;
use std::time::{Duration, Instant};

/// A repeating timer. The panel uses one to animate the busy indicator while
/// a request is in flight.
///
/// ```rust,ignore
/// subscribe(Every::new(Duration::from_millis(120), "busy")).map(|_| Msg::Tick)
/// ```
pub struct Every {
    pub interval: Duration,
    /// Distinguishes several timers of the same interval.
    pub id: &'static str,
}

impl Every {
    pub fn new(interval: Duration, id: &'static str) -> Self {
        Self { interval, id }
    }
}

impl SubscriptionSource for Every {
    type Output = Instant;

    fn id(&self) -> SubscriptionId {
        SubscriptionId::with_str::<Self>(self.id)
    }

    fn stream(self) -> BoxStream<'static, Instant> {
        let stream =
            tokio_stream::wrappers::IntervalStream::new(tokio::time::interval(self.interval))
                .map(|tick| tick.into_std());
        Box::pin(stream)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timers_with_different_keys_differ() {
        let a = Every::new(Duration::from_millis(100), "busy");
        let b = Every::new(Duration::from_millis(100), "clock");
        assert_ne!(a.id(), b.id());
    }

    #[tokio::test]
    async fn every_ticks() {
        let mut stream = Every::new(Duration::from_millis(5), "t").stream();
        assert!(stream.next().await.is_some());
        assert!(stream.next().await.is_some());
    }
}
