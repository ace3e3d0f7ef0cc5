use super::hasher::ContentHasher;
use super::signature::SignatureExtractor;
use super::similarity::SimilarityScorer;
use crate::config::DedupWindows;
use crate::domain::dedup::{
    DetectorStats, DuplicateCheckResult, DuplicateType, MessageSignature, elapsed_ms,
};
use crate::domain::message::TimestampMs;
use crate::validation::phone::normalize_lossy;
use std::collections::{HashMap, VecDeque};
use tracing::debug;

#[derive(Debug, Clone)]
struct SeenMessage {
    text: String,
    hash: String,
    signature: MessageSignature,
    timestamp: TimestampMs,
}

/// In-memory duplicate detector over recently seen messages.
///
/// History is evicted by age (`history_retention_ms`) and by count
/// (`max_messages_per_phone`) on every write, so it stays bounded under
/// continuous ingestion. Calls for the same phone must arrive in order;
/// the detector does no locking of its own.
#[derive(Debug)]
pub struct TransactionDuplicateDetector {
    windows: DedupWindows,
    hasher: ContentHasher,
    extractor: SignatureExtractor,
    scorer: SimilarityScorer,
    /// Latest sighting per `(phone, content hash)`.
    hashes: HashMap<(String, String), TimestampMs>,
    recent: HashMap<String, VecDeque<SeenMessage>>,
}

impl Default for TransactionDuplicateDetector {
    fn default() -> Self {
        Self::new(DedupWindows::default())
    }
}

impl TransactionDuplicateDetector {
    pub fn new(windows: DedupWindows) -> Self {
        Self {
            windows,
            hasher: ContentHasher::new(),
            extractor: SignatureExtractor::new(),
            scorer: SimilarityScorer::new(),
            hashes: HashMap::new(),
            recent: HashMap::new(),
        }
    }

    /// Classifies `message` against history without recording it.
    ///
    /// Checks run in order: exact hash within the exact window, then
    /// similarity within the similar window, then burst volume. The first
    /// hit wins.
    pub fn is_duplicate(
        &self,
        message: &str,
        phone: &str,
        timestamp: TimestampMs,
    ) -> DuplicateCheckResult {
        let phone = normalize_lossy(phone);
        let Some(history) = self.recent.get(&phone) else {
            return DuplicateCheckResult::none();
        };

        let hash = self.hasher.hash(message);
        if let Some(&seen_at) = self.hashes.get(&(phone.clone(), hash.clone()))
            && let Some(previous) = history.iter().rev().find(|m| m.hash == hash)
        {
            let elapsed = elapsed_ms(timestamp, seen_at);
            if elapsed <= self.windows.exact_window_ms {
                debug!(%phone, elapsed, "exact duplicate");
                return DuplicateCheckResult::matched(
                    DuplicateType::Exact,
                    &previous.text,
                    elapsed,
                );
            }
        }

        let signature = self.extractor.extract(message);
        for seen in history.iter().rev() {
            let elapsed = elapsed_ms(timestamp, seen.timestamp);
            if elapsed > self.windows.similar_window_ms {
                continue;
            }
            let score =
                self.scorer
                    .score_messages(message, &signature, &seen.text, &seen.signature);
            if score >= self.windows.similarity_threshold {
                debug!(%phone, elapsed, score, "similar message");
                return DuplicateCheckResult::matched(DuplicateType::Similar, &seen.text, elapsed);
            }
        }

        let in_window: Vec<&SeenMessage> = history
            .iter()
            .filter(|m| elapsed_ms(timestamp, m.timestamp) <= self.windows.burst_window_ms)
            .collect();
        if in_window.len() + 1 >= self.windows.burst_threshold
            && let Some(latest) = in_window.iter().max_by_key(|m| m.timestamp)
        {
            let elapsed = elapsed_ms(timestamp, latest.timestamp);
            debug!(%phone, count = in_window.len() + 1, "message burst");
            return DuplicateCheckResult::matched(DuplicateType::Burst, &latest.text, elapsed);
        }

        DuplicateCheckResult::none()
    }

    /// Records `message` and evicts anything older than the retention horizon.
    pub fn register_message(&mut self, message: &str, phone: &str, timestamp: TimestampMs) {
        let phone = normalize_lossy(phone);
        let hash = self.hasher.hash(message);

        self.hashes.insert((phone.clone(), hash.clone()), timestamp);

        let history = self.recent.entry(phone.clone()).or_default();
        history.push_back(SeenMessage {
            text: message.to_string(),
            hash,
            signature: self.extractor.extract(message),
            timestamp,
        });
        while history.len() > self.windows.max_messages_per_phone {
            let Some(evicted) = history.pop_front() else {
                break;
            };
            if !history.iter().any(|m| m.hash == evicted.hash) {
                self.hashes.remove(&(phone.clone(), evicted.hash));
            }
        }

        self.prune(timestamp);
    }

    /// Drops every entry older than `now - history_retention_ms`.
    pub fn prune(&mut self, now: TimestampMs) {
        let retention = self.windows.history_retention_ms;
        let expired = |timestamp: TimestampMs| {
            now > timestamp && elapsed_ms(now, timestamp) > retention
        };

        self.hashes.retain(|_, seen_at| !expired(*seen_at));
        self.recent.retain(|_, history| {
            history.retain(|m| !expired(m.timestamp));
            !history.is_empty()
        });
    }

    pub fn stats(&self) -> DetectorStats {
        let phones_tracked = self.recent.len();
        let messages: usize = self.recent.values().map(VecDeque::len).sum();
        DetectorStats {
            total_hashes: self.hashes.len(),
            phones_tracked,
            avg_per_phone: if phones_tracked == 0 {
                0.0
            } else {
                messages as f64 / phones_tracked as f64
            },
        }
    }

    pub fn clear(&mut self) {
        self.hashes.clear();
        self.recent.clear();
    }
}
