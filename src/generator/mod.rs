//! Synthetic Data Generator
//!
//! Produces user behavior populations: each user touches a fixed layout of
//! services, and each service contributes the metrics of its profile.
//! All randomness flows from one explicitly seeded generator.

mod profile;

pub use profile::{MetricSpec, ServiceProfile};

use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::population::{Entity, Header, Population, MISSING};

/// Generator configuration
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Number of users (rows)
    pub users: usize,
    /// Number of services per user
    pub services: usize,
    /// RNG seed (None = seed from OS entropy)
    pub seed: Option<u64>,
    /// Probability that an observation is written as missing
    pub missing_rate: f64,
    /// Identifier column name
    pub id_column: String,
    /// Identifier prefix, followed by the 1-based row number
    pub id_prefix: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            users: 1000,
            services: 100,
            seed: None,
            missing_rate: 0.0,
            id_column: "user_id".to_string(),
            id_prefix: "user_".to_string(),
        }
    }
}

impl GeneratorConfig {
    pub fn with_users(mut self, users: usize) -> Self {
        self.users = users;
        self
    }

    pub fn with_services(mut self, services: usize) -> Self {
        self.services = services;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_missing_rate(mut self, rate: f64) -> Self {
        self.missing_rate = rate;
        self
    }
}

/// Seedable population generator
pub struct Generator {
    config: GeneratorConfig,
    rng: StdRng,
    profiles: WeightedIndex<f64>,
}

impl Generator {
    /// Create a generator, seeding from config or OS entropy
    pub fn new(config: GeneratorConfig) -> Result<Self> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, rng)
    }

    /// Create a generator around a caller-owned RNG
    pub fn with_rng(config: GeneratorConfig, rng: StdRng) -> Result<Self> {
        if !(0.0..=1.0).contains(&config.missing_rate) {
            return Err(Error::InvalidConfig(format!(
                "missing rate {} outside [0, 1]",
                config.missing_rate
            )));
        }
        let profiles = WeightedIndex::new(ServiceProfile::ALL.iter().map(|p| p.weight()))
            .map_err(|e| Error::InvalidConfig(format!("profile weights: {}", e)))?;

        Ok(Self {
            config,
            rng,
            profiles,
        })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Draw one profile from the weight table
    pub fn pick_profile(&mut self) -> ServiceProfile {
        ServiceProfile::ALL[self.profiles.sample(&mut self.rng)]
    }

    /// Draw the profile of every service
    pub fn layout(&mut self) -> Vec<ServiceProfile> {
        (0..self.config.services)
            .map(|_| self.pick_profile())
            .collect()
    }

    /// Column names for a layout: `s{service}_{metric}`
    pub fn header(&self, layout: &[ServiceProfile]) -> Header {
        let features = layout
            .iter()
            .enumerate()
            .flat_map(|(i, profile)| {
                profile
                    .metrics()
                    .iter()
                    .map(move |spec| format!("s{}_{}", i + 1, spec.name))
            })
            .collect();
        Header::new(self.config.id_column.clone(), features)
    }

    /// Sample one user's feature vector for a layout
    pub fn sample_row(&mut self, layout: &[ServiceProfile]) -> Vec<f64> {
        let missing_rate = self.config.missing_rate;
        let mut row = Vec::with_capacity(layout.len() * 3);
        for profile in layout {
            for spec in profile.metrics() {
                if missing_rate > 0.0 && self.rng.gen_bool(missing_rate) {
                    row.push(MISSING);
                } else {
                    row.push(spec.sample(&mut self.rng));
                }
            }
        }
        row
    }

    /// Generate a whole population over one service layout
    pub fn generate(&mut self) -> Result<Population> {
        let layout = self.layout();
        let header = self.header(&layout);
        debug!("Service layout: {:?}", layout);
        info!(
            "Generating {} users x {} services ({} features)",
            self.config.users,
            self.config.services,
            header.dimension()
        );

        let entities = (1..=self.config.users)
            .map(|n| {
                let id = format!("{}{}", self.config.id_prefix, n);
                Entity::new(id, self.sample_row(&layout))
            })
            .collect();

        Population::new(header, entities)
    }
}
