//! Engine Configuration

/// Default similarity threshold for the threshold query
pub const DEFAULT_THRESHOLD: f64 = 0.8;

/// Similarity engine configuration
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Inclusive similarity threshold used by `scan_default`
    pub threshold: f64,

    /// Number of scan workers (0 = auto-detect, 1 = sequential)
    pub workers: usize,

    /// Candidates below this count are always scanned sequentially
    pub parallel_min_candidates: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            workers: 1,
            parallel_min_candidates: 4096,
        }
    }
}

impl EngineConfig {
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_parallel_min_candidates(mut self, min: usize) -> Self {
        self.parallel_min_candidates = min;
        self
    }

    /// Resolved worker count
    pub fn effective_workers(&self) -> usize {
        if self.workers == 0 {
            num_cpus::get().max(1)
        } else {
            self.workers
        }
    }
}
