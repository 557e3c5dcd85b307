//! BM25 relevance scoring.

/// Statistics for one term in one document field.
#[derive(Debug, Clone, Copy)]
pub struct TermStats {
    /// Occurrences of the term in the field.
    pub term_freq: f32,
    /// Documents whose field contains the term.
    pub doc_freq: u64,
    /// Terms in this document's field.
    pub field_length: u32,
    /// Average terms per document in the field.
    pub avg_field_length: f32,
    /// Documents in the snapshot.
    pub total_docs: u64,
}

/// BM25 scorer.
#[derive(Debug, Clone)]
pub struct BM25Scorer {
    k1: f32,
    b: f32,
}

impl BM25Scorer {
    pub fn new(k1: f32, b: f32) -> Self {
        BM25Scorer { k1, b }
    }

    pub fn k1(&self) -> f32 {
        self.k1
    }

    pub fn b(&self) -> f32 {
        self.b
    }

    /// IDF = ln(1 + (N - df + 0.5) / (df + 0.5)), which stays positive even
    /// for terms present in most documents.
    pub fn idf(&self, doc_freq: u64, total_docs: u64) -> f32 {
        if doc_freq == 0 || total_docs == 0 {
            return 0.0;
        }
        let n = total_docs as f32;
        let df = doc_freq as f32;
        (1.0 + (n - df + 0.5) / (df + 0.5)).ln()
    }

    /// TF = (tf * (k1 + 1)) / (tf + k1 * (1 - b + b * len / avg_len))
    pub fn tf(&self, term_freq: f32, field_length: u32, avg_field_length: f32) -> f32 {
        if term_freq <= 0.0 {
            return 0.0;
        }
        let norm = if avg_field_length > 0.0 {
            1.0 - self.b + self.b * (field_length as f32 / avg_field_length)
        } else {
            1.0
        };
        (term_freq * (self.k1 + 1.0)) / (term_freq + self.k1 * norm)
    }

    pub fn score(&self, stats: TermStats) -> f32 {
        self.idf(stats.doc_freq, stats.total_docs)
            * self.tf(stats.term_freq, stats.field_length, stats.avg_field_length)
    }
}

impl Default for BM25Scorer {
    fn default() -> Self {
        BM25Scorer::new(1.2, 0.75)
    }
}
