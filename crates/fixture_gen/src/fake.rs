//! Fake cloud identifiers.
//!
//! Provides deterministic resource ids, CIDR blocks, regions and names.

use rand::Rng;

/// Regions resources are spread over
const REGIONS: &[&str] = &[
    "us-east-1",
    "us-west-2",
    "eu-west-1",
    "eu-central-1",
    "ap-southeast-2",
    "ap-northeast-1",
];

/// Account alias parts
const TEAMS: &[&str] = &[
    "payments", "identity", "search", "billing", "platform", "data", "edge", "mobile", "ml",
    "security", "network", "shared",
];

const STAGES: &[&str] = &["dev", "test", "staging", "prod"];

/// Words used in Name tags
const TIERS: &[&str] = &["app", "db", "web", "cache", "batch", "ingress", "egress", "mgmt"];

/// Fake data generator with deterministic RNG
pub struct FakeData<R: Rng> {
    rng: R,
}

impl<R: Rng> FakeData<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Twelve digit account number
    pub fn account_id(&mut self) -> String {
        format!("{:012}", self.rng.random_range(100_000_000_000u64..999_999_999_999))
    }

    /// `team-stage` alias
    pub fn account_alias(&mut self) -> String {
        let team = TEAMS[self.rng.random_range(0..TEAMS.len())];
        let stage = STAGES[self.rng.random_range(0..STAGES.len())];
        format!("{}-{}", team, stage)
    }

    pub fn region(&mut self) -> &'static str {
        REGIONS[self.rng.random_range(0..REGIONS.len())]
    }

    /// `prefix-` followed by 17 hex digits
    pub fn resource_id(&mut self, prefix: &str) -> String {
        let id: u64 = self.rng.random_range(0..(1u64 << 60));
        format!("{}-{:017x}", prefix, id)
    }

    /// `10.x.0.0/16`
    pub fn vpc_cidr(&mut self) -> String {
        format!("10.{}.0.0/16", self.rng.random_range(0..=255u8))
    }

    /// `tier-stage-n` Name tag
    pub fn name_tag(&mut self) -> String {
        let tier = TIERS[self.rng.random_range(0..TIERS.len())];
        let stage = STAGES[self.rng.random_range(0..STAGES.len())];
        format!("{}-{}-{}", tier, stage, self.rng.random_range(1..100u32))
    }

    /// Availability zone letter a-c
    pub fn zone_suffix(&mut self) -> char {
        (b'a' + self.rng.random_range(0..3u8)) as char
    }

    /// Random boolean with given probability of true
    pub fn bool_with_probability(&mut self, probability: f64) -> bool {
        self.rng.random_bool(probability)
    }

    /// Integer in range
    pub fn int_range(&mut self, min: usize, max: usize) -> usize {
        self.rng.random_range(min..=max)
    }

    /// Pick up to `count` distinct indices below `len`, skipping `exclude`
    pub fn pick_indices(&mut self, len: usize, count: usize, exclude: usize) -> Vec<usize> {
        let mut picked = Vec::new();
        if len <= 1 {
            return picked;
        }
        for _ in 0..count * 3 {
            if picked.len() == count {
                break;
            }
            let i = self.rng.random_range(0..len);
            if i != exclude && !picked.contains(&i) {
                picked.push(i);
            }
        }
        picked
    }
}
