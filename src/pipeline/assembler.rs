use crate::{
    error::ServiceError,
    spotify::{MAX_TRACKS_PER_REQUEST, MusicService},
};

/// What to do with a batch the service refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchPolicy {
    /// Extra attempts after the first failed send. `0` drops the batch
    /// right away.
    pub retries: u32,
}

/// A batch that could not be sent; its tracks are gone from the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedBatch {
    pub track_count: usize,
    pub attempts: u32,
    pub error: ServiceError,
}

/// Result of one [`PlaylistAssembler::add`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlushOutcome {
    Buffered,
    Sent(usize),
    Dropped(FailedBatch),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssemblySummary {
    pub added: usize,
    pub sent: usize,
    pub dropped: usize,
    pub batches_sent: usize,
    pub failed: Vec<FailedBatch>,
}

/// Buffers track ids and appends them to the target playlist in batches of
/// at most `batch_size`.
///
/// A full batch goes out as soon as the buffer reaches `batch_size`; the
/// remainder goes out in [`finish`](Self::finish), which consumes the
/// assembler. Sent plus dropped always equals added.
pub struct PlaylistAssembler<'a, C: MusicService + ?Sized> {
    client: &'a C,
    playlist_id: String,
    batch_size: usize,
    policy: BatchPolicy,
    buffer: Vec<String>,
    summary: AssemblySummary,
}

impl<'a, C: MusicService + ?Sized> PlaylistAssembler<'a, C> {
    /// `batch_size` is clamped to `1..=100`.
    pub fn new(client: &'a C, playlist_id: impl Into<String>, batch_size: usize, policy: BatchPolicy) -> Self {
        let batch_size = batch_size.clamp(1, MAX_TRACKS_PER_REQUEST);
        Self {
            client,
            playlist_id: playlist_id.into(),
            batch_size,
            policy,
            buffer: Vec::with_capacity(batch_size),
            summary: AssemblySummary::default(),
        }
    }

    pub async fn add(&mut self, track_id: impl Into<String>) -> FlushOutcome {
        self.buffer.push(track_id.into());
        self.summary.added += 1;

        if self.buffer.len() >= self.batch_size {
            self.flush().await
        } else {
            FlushOutcome::Buffered
        }
    }

    /// Sends whatever is still buffered and returns the run's totals.
    pub async fn finish(mut self) -> AssemblySummary {
        while !self.buffer.is_empty() {
            self.flush().await;
        }
        self.summary
    }

    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    pub fn summary(&self) -> &AssemblySummary {
        &self.summary
    }

    async fn flush(&mut self) -> FlushOutcome {
        let take = self.buffer.len().min(self.batch_size);
        let batch: Vec<String> = self.buffer.drain(..take).collect();
        if batch.is_empty() {
            return FlushOutcome::Buffered;
        }

        let mut attempts = 0;
        loop {
            attempts += 1;
            match self.client.add_tracks(&self.playlist_id, &batch).await {
                Ok(()) => {
                    self.summary.sent += batch.len();
                    self.summary.batches_sent += 1;
                    return FlushOutcome::Sent(batch.len());
                }
                Err(e) if attempts <= self.policy.retries => {
                    log::warn!(
                        "adding {} tracks to {} failed (attempt {attempts}), retrying: {e}",
                        batch.len(),
                        self.playlist_id
                    );
                }
                Err(e) => {
                    log::warn!(
                        "dropping {} tracks for {} after {attempts} attempt(s): {e}",
                        batch.len(),
                        self.playlist_id
                    );
                    let failed = FailedBatch {
                        track_count: batch.len(),
                        attempts,
                        error: e,
                    };
                    self.summary.dropped += batch.len();
                    self.summary.failed.push(failed.clone());
                    return FlushOutcome::Dropped(failed);
                }
            }
        }
    }
}
