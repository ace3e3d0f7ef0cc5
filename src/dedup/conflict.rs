use crate::config::DedupWindows;
use crate::domain::dedup::{ConflictResult, ConflictType, elapsed_ms};
use crate::domain::message::{TimestampMs, TransactionRecord};
use crate::validation::phone::normalize_lossy;
use rust_decimal::Decimal;

const EXACT_CONFIDENCE_FLOOR: f64 = 90.0;
const SIMILAR_CONFIDENCE_FLOOR: f64 = 75.0;

/// Compares a candidate transaction against stored records.
///
/// Holds no history of its own; the caller supplies the records to compare.
#[derive(Debug, Clone)]
pub struct ConflictDetector {
    exact_window_ms: u64,
    similar_window_ms: u64,
}

impl Default for ConflictDetector {
    fn default() -> Self {
        Self::new(&DedupWindows::default())
    }
}

impl ConflictDetector {
    pub fn new(windows: &DedupWindows) -> Self {
        Self {
            exact_window_ms: windows.exact_window_ms,
            similar_window_ms: windows.similar_window_ms,
        }
    }

    /// Finds the record nearest in time with the same phone and amount.
    ///
    /// Within the exact window the result is `ExactDuplicate` with confidence
    /// 90..=100; within the similar window it is `SimilarTransaction` with
    /// confidence falling linearly from 90 to 75. Anything else is `None`.
    pub fn detect(
        &self,
        phone: &str,
        amount: Decimal,
        timestamp: TimestampMs,
        existing: &[TransactionRecord],
    ) -> ConflictResult {
        let phone = normalize_lossy(phone);

        let nearest = existing
            .iter()
            .filter(|r| r.amount == amount && normalize_lossy(&r.phone) == phone)
            .map(|r| (elapsed_ms(timestamp, r.timestamp), r))
            .min_by_key(|(elapsed, _)| *elapsed);

        let Some((elapsed, record)) = nearest else {
            return ConflictResult::none();
        };

        let (conflict_type, confidence) = if elapsed <= self.exact_window_ms {
            (ConflictType::ExactDuplicate, self.exact_confidence(elapsed))
        } else if elapsed <= self.similar_window_ms {
            (
                ConflictType::SimilarTransaction,
                self.similar_confidence(elapsed),
            )
        } else {
            return ConflictResult::none();
        };

        ConflictResult {
            has_conflict: true,
            conflict_type,
            matched_record: Some(record.clone()),
            confidence_score: to_score(confidence),
        }
    }

    fn exact_confidence(&self, elapsed: u64) -> f64 {
        let fraction = ratio(elapsed, self.exact_window_ms);
        100.0 - (100.0 - EXACT_CONFIDENCE_FLOOR) * fraction
    }

    fn similar_confidence(&self, elapsed: u64) -> f64 {
        let span = self.similar_window_ms.saturating_sub(self.exact_window_ms);
        let fraction = ratio(elapsed.saturating_sub(self.exact_window_ms), span);
        EXACT_CONFIDENCE_FLOOR - (EXACT_CONFIDENCE_FLOOR - SIMILAR_CONFIDENCE_FLOOR) * fraction
    }
}

fn ratio(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        return 1.0;
    }
    (part as f64 / whole as f64).clamp(0.0, 1.0)
}

fn to_score(confidence: f64) -> u8 {
    confidence.round().clamp(0.0, 100.0) as u8
}
