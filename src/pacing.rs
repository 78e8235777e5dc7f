//! Pacing strategies for streamed listings

use futures::stream::{self, BoxStream, StreamExt};
use std::time::Duration;

/// How a listing stream is throttled on its way to the consumer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pacing {
    /// Emit items as soon as they are produced
    Unpaced,

    /// Shift the whole sequence by one delay; items then flow as fast as
    /// the producer yields them
    Sequence(Duration),

    /// Delay every item individually
    ///
    /// The delay for the next item only starts once the consumer polls for
    /// it, so a slow consumer also slows the upstream scan.
    PerElement(Duration),
}

impl Pacing {
    /// Applies the pacing to a stream
    pub fn apply<T>(self, items: BoxStream<'static, T>) -> BoxStream<'static, T>
    where
        T: Send + 'static,
    {
        match self {
            Pacing::Unpaced => items,
            Pacing::Sequence(delay) => stream::once(async move {
                tokio::time::sleep(delay).await;
                items
            })
            .flatten()
            .boxed(),
            Pacing::PerElement(delay) => items
                .then(move |item| async move {
                    tokio::time::sleep(delay).await;
                    item
                })
                .boxed(),
        }
    }
}
