//! Batch analysis over comment records

use futures::stream::{self, StreamExt};
use tracing::info;

use crate::comment::{CommentRecord, CommentVerdict};
use crate::detector::SpamDetector;

/// Classify `records` with at most `concurrency` classifications in flight.
///
/// Verdicts come back in input order.
pub async fn classify_batch(
    detector: &SpamDetector,
    records: &[CommentRecord],
    concurrency: usize,
) -> Vec<CommentVerdict> {
    let verdicts: Vec<CommentVerdict> = stream::iter(records)
        .map(|record| async move {
            CommentVerdict {
                comment_id: record.id.clone(),
                is_spam: detector.is_spam(&record.text).await,
            }
        })
        .buffered(concurrency.max(1))
        .collect()
        .await;

    let spam = verdicts.iter().filter(|v| v.is_spam).count();
    info!(
        "Batch complete: {} comments, {} spam, {} legitimate",
        verdicts.len(),
        spam,
        verdicts.len() - spam
    );

    verdicts
}
