use crate::domain::dedup::MessageSignature;

/// Normalized edit-distance similarity between two messages.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimilarityScorer;

impl SimilarityScorer {
    pub fn new() -> Self {
        Self
    }

    /// `1 - distance / max_len` over lowercased text, clamped to `[0, 1]`.
    ///
    /// Symmetric, and `compare(m, m) == 1.0` for every `m` (including empty).
    pub fn compare(&self, a: &str, b: &str) -> f64 {
        let a: Vec<char> = a.to_lowercase().chars().collect();
        let b: Vec<char> = b.to_lowercase().chars().collect();
        let longest = a.len().max(b.len());
        if longest == 0 {
            return 1.0;
        }
        let distance = levenshtein(&a, &b);
        (1.0 - distance as f64 / longest as f64).clamp(0.0, 1.0)
    }

    /// Text similarity, raised to 1.0 when both messages carry the same
    /// transaction reference code.
    pub fn score_messages(
        &self,
        a: &str,
        a_signature: &MessageSignature,
        b: &str,
        b_signature: &MessageSignature,
    ) -> f64 {
        if a_signature.shares_reference(b_signature) {
            return 1.0;
        }
        self.compare(a, b)
    }
}

fn levenshtein(a: &[char], b: &[char]) -> usize {
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        current[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            current[j + 1] = (previous[j + 1] + 1)
                .min(current[j] + 1)
                .min(previous[j] + cost);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b.len()]
}
