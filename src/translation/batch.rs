/*!
 * Batch translation processing.
 *
 * This module dispatches a sequence of chunks to the translation service
 * with bounded concurrency, reports progress as chunks complete, and
 * returns the results in input order.
 */

use futures::stream::{self, StreamExt, TryStreamExt};
use log::{debug, error, warn};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use crate::errors::TranslationError;
use crate::providers::google::{MachineTranslationRequest, MachineTranslationResponse};
use crate::providers::openai::{OpenAIRequest, OpenAIResponse};
use crate::providers::Provider;

use super::backend::{is_exhausted_rate_limit, TranslationResult};
use super::core::TranslationServiceProvider;

/// Batch translator for dispatching chunks concurrently
pub struct BatchTranslator<'a, L, M> {
    /// The translation service to use
    service: &'a TranslationServiceProvider<L, M>,

    /// Maximum number of concurrent requests
    max_concurrent_requests: usize,
}

impl<'a, L, M> BatchTranslator<'a, L, M>
where
    L: Provider<Request = OpenAIRequest, Response = OpenAIResponse>,
    M: Provider<Request = MachineTranslationRequest, Response = MachineTranslationResponse>,
{
    /// Create a new batch translator
    pub fn new(service: &'a TranslationServiceProvider<L, M>, max_concurrent_requests: usize) -> Self {
        Self {
            service,
            max_concurrent_requests: max_concurrent_requests.max(1),
        }
    }

    /// Pool width in use
    pub fn max_concurrent_requests(&self) -> usize {
        self.max_concurrent_requests
    }

    /// Translate every chunk, keeping the input order in the output
    ///
    /// Chunks are pulled from `chunks` only as pool slots free up. The first
    /// error stops the batch: chunks still in flight are dropped and no
    /// further chunks are started. `progress_callback` receives the number of
    /// chunks completed so far.
    pub async fn translate_chunks<I>(
        &self,
        chunks: I,
        progress_callback: impl Fn(usize),
    ) -> Result<Vec<TranslationResult>, TranslationError>
    where
        I: IntoIterator<Item = String>,
    {
        let completed = AtomicUsize::new(0);
        let completed = &completed;
        let progress_callback = &progress_callback;
        let service = self.service;

        let mut results = stream::iter(chunks.into_iter().enumerate())
            .map(move |(index, chunk)| async move {
                let start_time = Instant::now();
                let result = service.get_translated_data(chunk).await;

                let current = completed.fetch_add(1, Ordering::SeqCst) + 1;
                progress_callback(current);

                match result {
                    Ok(result) => {
                        if let TranslationResult::Missing { reason } = &result {
                            warn!("Chunk {} has no translation: {}", index + 1, reason);
                        } else {
                            debug!("Chunk {} completed in {:?}", index + 1, start_time.elapsed());
                        }
                        Ok((index, result))
                    }
                    Err(e) => {
                        error!("Chunk {} failed: {}", index + 1, e);
                        if is_exhausted_rate_limit(&e) {
                            warn!("Still rate limited after every retry; try fewer concurrent requests");
                        }
                        Err(TranslationError::ChunkFailed { index, source: Box::new(e) })
                    }
                }
            })
            .buffer_unordered(self.max_concurrent_requests)
            .try_collect::<Vec<_>>()
            .await?;

        // Sort results by chunk index to restore the original order
        results.sort_by_key(|(index, _)| *index);
        Ok(results.into_iter().map(|(_, result)| result).collect())
    }
}
