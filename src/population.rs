//! Population Model
//!
//! Ordered, immutable set of entities loaded for a query session.

use hashbrown::HashMap;
use std::ops::Deref;

/// In-band sentinel for "no observation"
///
/// A real observation of exactly -1.0 is indistinguishable from a missing one.
/// The table writer never rounds an observed value onto this sentinel; see
/// `table::write`.
pub const MISSING: f64 = -1.0;

/// Whether a feature value is the missing sentinel
#[inline]
pub fn is_missing(value: f64) -> bool {
    value == MISSING
}

/// Fixed-length feature vector, possibly holding `MISSING` entries
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeatureVector(Vec<f64>);

impl FeatureVector {
    pub fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    /// Number of non-missing positions
    pub fn observed(&self) -> usize {
        self.0.iter().filter(|v| !is_missing(**v)).count()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<f64> {
        self.0
    }
}

impl Deref for FeatureVector {
    type Target = [f64];

    fn deref(&self) -> &[f64] {
        &self.0
    }
}

impl From<Vec<f64>> for FeatureVector {
    fn from(values: Vec<f64>) -> Self {
        Self(values)
    }
}

/// One row of the population
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    /// Identifier, taken verbatim from the source
    pub id: String,
    /// Feature values in header order
    pub features: FeatureVector,
}

impl Entity {
    pub fn new(id: impl Into<String>, features: impl Into<FeatureVector>) -> Self {
        Self {
            id: id.into(),
            features: features.into(),
        }
    }

    /// Get feature dimension
    pub fn dim(&self) -> usize {
        self.features.len()
    }
}

/// Column names of a population table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// Name of the identifier column
    pub id_column: String,
    /// Feature column names, opaque labels
    pub features: Vec<String>,
}

impl Header {
    pub fn new(id_column: impl Into<String>, features: Vec<String>) -> Self {
        Self {
            id_column: id_column.into(),
            features,
        }
    }

    /// Feature dimension D
    pub fn dimension(&self) -> usize {
        self.features.len()
    }
}

/// Ordered collection of entities sharing one header
#[derive(Debug, Clone)]
pub struct Population {
    header: Header,
    entities: Vec<Entity>,
    /// First index for each identifier
    positions: HashMap<String, usize>,
}

impl Population {
    /// Build a population, checking every vector against the header width
    pub fn new(header: Header, entities: Vec<Entity>) -> crate::Result<Self> {
        let dimension = header.dimension();
        if let Some(bad) = entities.iter().find(|e| e.dim() != dimension) {
            return Err(crate::Error::DimensionMismatch {
                left: dimension,
                right: bad.dim(),
            });
        }

        let mut positions = HashMap::with_capacity(entities.len());
        for (index, entity) in entities.iter().enumerate() {
            positions.entry(entity.id.clone()).or_insert(index);
        }

        Ok(Self {
            header,
            entities,
            positions,
        })
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn dimension(&self) -> usize {
        self.header.dimension()
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn get(&self, index: usize) -> Option<&Entity> {
        self.entities.get(index)
    }

    /// Index of the first entity carrying `id`
    pub fn position(&self, id: &str) -> Option<usize> {
        self.positions.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(d: usize) -> Header {
        Header::new("user_id", (0..d).map(|i| format!("f{}", i)).collect())
    }

    #[test]
    fn test_observed_count() {
        let v = FeatureVector::new(vec![2.0, MISSING, 4.0]);
        assert_eq!(v.observed(), 2);
        assert_eq!(v.len(), 3);
    }

    #[test]
    fn test_dimension_mismatch_rejected() {
        let entities = vec![
            Entity::new("a", vec![1.0, 2.0]),
            Entity::new("b", vec![1.0]),
        ];
        let result = Population::new(header(2), entities);
        assert!(matches!(
            result,
            Err(crate::Error::DimensionMismatch { left: 2, right: 1 })
        ));
    }

    #[test]
    fn test_position_first_duplicate_wins() {
        let entities = vec![
            Entity::new("a", vec![1.0]),
            Entity::new("b", vec![2.0]),
            Entity::new("a", vec![3.0]),
        ];
        let pop = Population::new(header(1), entities).unwrap();

        assert_eq!(pop.len(), 3);
        assert_eq!(pop.position("a"), Some(0));
        assert_eq!(pop.position("b"), Some(1));
        assert_eq!(pop.position("zzz"), None);
    }
}
