//! Service Profiles
//!
//! Categorical service kinds, each with its own metric names and value ranges.

use rand::Rng;

/// Value template for one metric: uniform over `[base, base + span)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricSpec {
    pub name: &'static str,
    pub base: f64,
    pub span: f64,
}

impl MetricSpec {
    const fn new(name: &'static str, base: f64, span: f64) -> Self {
        Self { name, base, span }
    }

    /// Draw one observation
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        rng.gen::<f64>() * self.span + self.base
    }
}

const API_SERVER: [MetricSpec; 3] = [
    MetricSpec::new("http_resp", 50.0, 100.0),
    MetricSpec::new("http_rate", 10.0, 50.0),
    MetricSpec::new("http_err", 0.0, 5.0),
];

const API_WITH_DATABASE: [MetricSpec; 3] = [
    MetricSpec::new("db_lat", 100.0, 150.0),
    MetricSpec::new("db_rate", 5.0, 30.0),
    MetricSpec::new("db_err", 0.0, 10.0),
];

const KAFKA_PRODUCER: [MetricSpec; 3] = [
    MetricSpec::new("msg_prod", 500.0, 1000.0),
    MetricSpec::new("pub_lat", 50.0, 100.0),
    MetricSpec::new("pub_fail", 0.0, 1.0),
];

const KAFKA_CONSUMER: [MetricSpec; 3] = [
    MetricSpec::new("msg_cons", 600.0, 1200.0),
    MetricSpec::new("proc_lat", 20.0, 80.0),
    MetricSpec::new("cons_err", 0.0, 2.0),
];

/// Kind of microservice a user interacts with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceProfile {
    ApiServer,
    ApiWithDatabase,
    KafkaProducer,
    KafkaConsumer,
}

impl ServiceProfile {
    /// Every profile, in weight-table order
    pub const ALL: [ServiceProfile; 4] = [
        ServiceProfile::ApiServer,
        ServiceProfile::ApiWithDatabase,
        ServiceProfile::KafkaProducer,
        ServiceProfile::KafkaConsumer,
    ];

    /// Share of services drawn with this profile
    pub fn weight(self) -> f64 {
        match self {
            ServiceProfile::ApiServer => 0.4,
            ServiceProfile::ApiWithDatabase => 0.4,
            ServiceProfile::KafkaProducer => 0.1,
            ServiceProfile::KafkaConsumer => 0.1,
        }
    }

    pub fn metrics(self) -> &'static [MetricSpec] {
        match self {
            ServiceProfile::ApiServer => &API_SERVER,
            ServiceProfile::ApiWithDatabase => &API_WITH_DATABASE,
            ServiceProfile::KafkaProducer => &KAFKA_PRODUCER,
            ServiceProfile::KafkaConsumer => &KAFKA_CONSUMER,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ServiceProfile::ApiServer => "API Server",
            ServiceProfile::ApiWithDatabase => "API with Database",
            ServiceProfile::KafkaProducer => "Kafka Producer",
            ServiceProfile::KafkaConsumer => "Kafka Consumer",
        }
    }
}

impl std::fmt::Display for ServiceProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
