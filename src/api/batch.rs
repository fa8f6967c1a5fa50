// src/api/batch.rs
//! Chunked batch submission.
//!
//! Splits a batch into contiguous chunks and submits them one after the
//! other. There is no rollback: when a chunk fails, every earlier chunk
//! has already been written and the destination is partially updated.

use crate::error::AppError;
use crate::types::ValidationError;

/// Outcome of a fully successful chunked write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChunkedWrite {
    pub items_written: usize,
    pub requests: usize,
}

/// Submits `items` in order through `write_fn`, at most `chunk_size` at a time.
///
/// `write_fn` receives the chunk index and the chunk. Issues
/// `ceil(items.len() / chunk_size)` calls; an empty batch issues none.
pub async fn write_in_chunks<T, F, Fut>(
    destination: &str,
    items: &[T],
    chunk_size: usize,
    mut write_fn: F,
) -> Result<ChunkedWrite, AppError>
where
    F: FnMut(usize, &[T]) -> Fut,
    Fut: std::future::Future<Output = Result<(), AppError>>,
{
    if chunk_size == 0 {
        return Err(ValidationError::ZeroChunkSize.into());
    }

    let mut outcome = ChunkedWrite::default();
    for (index, chunk) in items.chunks(chunk_size).enumerate() {
        write_fn(index, chunk).await.map_err(|e| {
            log::error!(
                "{}: chunk {} failed after {} items were written; destination is partially updated",
                destination,
                index,
                outcome.items_written
            );
            e
        })?;
        outcome.items_written += chunk.len();
        outcome.requests += 1;
    }

    Ok(outcome)
}
