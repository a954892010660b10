//! Audio sink interface.

use std::collections::VecDeque;
use webmkit_opus::PcmBuffer;

/// Receives decoded PCM for playback.
///
/// In a full player this is backed by an audio server connection; the
/// session only requires somewhere to enqueue buffers in order.
pub trait AudioSink {
    /// Queue one buffer for playback.
    fn enqueue(&mut self, buffer: PcmBuffer);
}

/// An [`AudioSink`] that buffers everything in memory.
#[derive(Debug, Default)]
pub struct QueueSink {
    queue: VecDeque<PcmBuffer>,
}

impl QueueSink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of queued buffers.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Whether the sink is empty.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Dequeue the oldest buffer.
    pub fn pop(&mut self) -> Option<PcmBuffer> {
        self.queue.pop_front()
    }

    /// Total queued samples across all buffers.
    pub fn queued_samples(&self) -> usize {
        self.queue.iter().map(|b| b.samples.len()).sum()
    }
}

impl AudioSink for QueueSink {
    fn enqueue(&mut self, buffer: PcmBuffer) {
        self.queue.push_back(buffer);
    }
}
