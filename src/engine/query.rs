//! Similarity Engine
//!
//! Brute-force best-match and threshold queries over a loaded population.
//! Each query is one pass over every non-target entity in insertion order.

use std::ops::Range;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

use super::config::EngineConfig;
use super::similarity::{similarity, similarity_unchecked};
use crate::error::{Error, Result};
use crate::metrics::Metrics;
use crate::population::{Entity, Population};

/// One scored entity produced by a query
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    /// Position of the entity in the population
    pub index: usize,
    /// Entity identifier
    pub id: String,
    /// Similarity to the target
    pub score: f64,
}

/// Entities at or above a similarity threshold, in scan order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchSet(Vec<MatchResult>);

impl MatchSet {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MatchResult> {
        self.0.iter()
    }

    /// Whether any match carries `id`
    pub fn contains_id(&self, id: &str) -> bool {
        self.0.iter().any(|m| m.id == id)
    }

    pub fn into_vec(self) -> Vec<MatchResult> {
        self.0
    }
}

impl<'a> IntoIterator for &'a MatchSet {
    type Item = &'a MatchResult;
    type IntoIter = std::slice::Iter<'a, MatchResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for MatchSet {
    type Item = MatchResult;
    type IntoIter = std::vec::IntoIter<MatchResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Result of a combined best-match and threshold scan
#[derive(Debug, Clone, PartialEq)]
pub struct ScanReport {
    /// Target index
    pub target: usize,
    /// Inclusive threshold used for `matches`
    pub threshold: f64,
    /// Highest scoring non-target entity, earliest on ties
    pub best: MatchResult,
    pub matches: MatchSet,
}

/// Partial result over one contiguous candidate range
#[derive(Debug, Default)]
struct ShardResult {
    best: Option<(usize, f64)>,
    matches: Vec<(usize, f64)>,
    comparisons: u64,
}

impl ShardResult {
    /// Fold a later shard into this one, keeping the earliest best on ties
    fn merge(&mut self, later: ShardResult) {
        if let Some((index, score)) = later.best {
            if self.best.map_or(true, |(_, current)| improves(score, current)) {
                self.best = Some((index, score));
            }
        }
        self.matches.extend(later.matches);
        self.comparisons += later.comparisons;
    }
}

/// Similarity engine over an immutable population
pub struct SimilarityEngine {
    population: Population,
    config: EngineConfig,
    metrics: Arc<Metrics>,
}

impl SimilarityEngine {
    /// Create an engine with default configuration
    pub fn new(population: Population) -> Self {
        Self::with_config(population, EngineConfig::default())
    }

    pub fn with_config(population: Population, config: EngineConfig) -> Self {
        Self {
            population,
            config,
            metrics: Arc::new(Metrics::new()),
        }
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn metrics(&self) -> &Arc<Metrics> {
        &self.metrics
    }

    /// Similarity between two entities of the population
    pub fn pair_similarity(&self, a: usize, b: usize) -> Result<f64> {
        let a = self.entity(a)?;
        let b = self.entity(b)?;
        similarity(&a.features, &b.features)
    }

    /// Most similar other entity to `target`
    ///
    /// Fails with `InsufficientData` when the population has fewer than two
    /// entities.
    pub fn nearest_neighbor(&self, target: usize) -> Result<MatchResult> {
        self.require_neighbors()?;
        let start = Instant::now();
        let shard = self.run(target, None)?;
        self.metrics
            .record_query("nearest", shard.comparisons, start.elapsed());
        self.best_of(&shard)
    }

    /// Every other entity whose similarity to `target` is at least `threshold`
    pub fn matches_above_threshold(&self, target: usize, threshold: f64) -> Result<MatchSet> {
        let start = Instant::now();
        let shard = self.run(target, Some(threshold))?;
        self.metrics
            .record_query("threshold", shard.comparisons, start.elapsed());
        Ok(self.match_set(shard.matches))
    }

    /// Best match and threshold matches in a single pass
    pub fn scan(&self, target: usize, threshold: f64) -> Result<ScanReport> {
        self.require_neighbors()?;
        let start = Instant::now();
        let shard = self.run(target, Some(threshold))?;
        self.metrics
            .record_query("scan", shard.comparisons, start.elapsed());

        let best = self.best_of(&shard)?;
        Ok(ScanReport {
            target,
            threshold,
            best,
            matches: self.match_set(shard.matches),
        })
    }

    /// [`scan`](Self::scan) with the configured threshold
    pub fn scan_default(&self, target: usize) -> Result<ScanReport> {
        self.scan(target, self.config.threshold)
    }

    fn entity(&self, index: usize) -> Result<&Entity> {
        self.population
            .get(index)
            .ok_or(Error::TargetOutOfRange {
                index,
                entities: self.population.len(),
            })
    }

    fn require_neighbors(&self) -> Result<()> {
        if self.population.len() < 2 {
            return Err(Error::InsufficientData {
                entities: self.population.len(),
            });
        }
        Ok(())
    }

    fn best_of(&self, shard: &ShardResult) -> Result<MatchResult> {
        let (index, score) = shard.best.ok_or(Error::InsufficientData {
            entities: self.population.len(),
        })?;
        Ok(self.to_match(index, score))
    }

    fn to_match(&self, index: usize, score: f64) -> MatchResult {
        MatchResult {
            index,
            id: self.population.entities()[index].id.clone(),
            score,
        }
    }

    fn match_set(&self, matches: Vec<(usize, f64)>) -> MatchSet {
        MatchSet(
            matches
                .into_iter()
                .map(|(index, score)| self.to_match(index, score))
                .collect(),
        )
    }

    /// Scan all candidates, sharding across workers when configured
    fn run(&self, target: usize, threshold: Option<f64>) -> Result<ShardResult> {
        let target_vec = self.entity(target)?.features.as_slice();
        let entities = self.population.entities();
        let workers = self.config.effective_workers();

        if workers <= 1 || entities.len() < self.config.parallel_min_candidates.max(2) {
            debug!("Sequential scan for target {} over {} entities", target, entities.len());
            return Ok(scan_range(entities, target, target_vec, 0..entities.len(), threshold));
        }

        let chunk = entities.len().div_ceil(workers);
        let ranges: Vec<Range<usize>> = (0..entities.len())
            .step_by(chunk)
            .map(|start| start..(start + chunk).min(entities.len()))
            .collect();
        debug!(
            "Sharded scan for target {} over {} entities in {} shards",
            target,
            entities.len(),
            ranges.len()
        );

        let shards = crossbeam::thread::scope(|s| {
            let handles: Vec<_> = ranges
                .into_iter()
                .map(|range| s.spawn(move |_| scan_range(entities, target, target_vec, range, threshold)))
                .collect();
            handles
                .into_iter()
                .map(|h| h.join())
                .collect::<std::result::Result<Vec<_>, _>>()
        })
        .map_err(|_| Error::ScanWorker)?
        .map_err(|_| Error::ScanWorker)?;

        let mut merged = ShardResult::default();
        for shard in shards {
            merged.merge(shard);
        }
        Ok(merged)
    }
}

/// Strictly greater wins; a NaN never wins and never stays best
#[inline]
fn improves(score: f64, best: f64) -> bool {
    !score.is_nan() && (best.is_nan() || score > best)
}

/// Score every non-target entity in `range`, in order
fn scan_range(
    entities: &[Entity],
    target: usize,
    target_vec: &[f64],
    range: Range<usize>,
    threshold: Option<f64>,
) -> ShardResult {
    let mut shard = ShardResult::default();

    for index in range {
        if index == target {
            continue;
        }
        let score = similarity_unchecked(target_vec, &entities[index].features);
        shard.comparisons += 1;

        if shard.best.map_or(true, |(_, best)| improves(score, best)) {
            shard.best = Some((index, score));
        }
        if threshold.is_some_and(|t| score >= t) {
            shard.matches.push((index, score));
        }
    }

    shard
}
