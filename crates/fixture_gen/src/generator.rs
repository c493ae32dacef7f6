//! Inventory generator.
//!
//! Produces deterministic, cross-referenced network inventories: every subnet
//! and attachment names a generated VPC, and peerings only point at VPCs in
//! the same inventory.

use crate::fake::FakeData;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde_json::{json, Value};

/// Generation scale presets
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scale {
    /// 3 accounts, ~6 VPCs
    Small,
    /// 10 accounts, ~40 VPCs
    Medium,
    /// 50 accounts, ~400 VPCs
    Large,
}

impl Scale {
    pub fn accounts(&self) -> usize {
        match self {
            Scale::Small => 3,
            Scale::Medium => 10,
            Scale::Large => 50,
        }
    }

    pub fn vpcs_per_account(&self) -> usize {
        match self {
            Scale::Small => 2,
            Scale::Medium => 4,
            Scale::Large => 8,
        }
    }

    pub fn subnets_per_vpc(&self) -> usize {
        match self {
            Scale::Small => 3,
            Scale::Medium => 4,
            Scale::Large => 6,
        }
    }

    pub fn max_peers(&self) -> usize {
        match self {
            Scale::Small => 2,
            Scale::Medium => 3,
            Scale::Large => 5,
        }
    }
}

impl std::str::FromStr for Scale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "small" | "s" => Ok(Scale::Small),
            "medium" | "m" => Ok(Scale::Medium),
            "large" | "l" => Ok(Scale::Large),
            _ => Err(format!("Unknown scale: {}. Use small, medium, or large", s)),
        }
    }
}

/// Generated record sets, each a list of JSON objects
#[derive(Debug, Clone, Default)]
pub struct Inventory {
    pub vpcs: Vec<Value>,
    pub subnets: Vec<Value>,
    pub attachments: Vec<Value>,
}

impl Inventory {
    /// Record set by kind name
    pub fn get(&self, kind: &str) -> Option<&[Value]> {
        match kind {
            "vpcs" => Some(&self.vpcs),
            "subnets" => Some(&self.subnets),
            "attachments" => Some(&self.attachments),
            _ => None,
        }
    }
}

pub struct Generator {
    fake: FakeData<ChaCha8Rng>,
    scale: Scale,
}

struct Vpc {
    id: String,
    account_id: String,
    region: &'static str,
    second_octet: String,
}

impl Generator {
    pub fn new(seed: u64, scale: Scale) -> Self {
        Self {
            fake: FakeData::new(ChaCha8Rng::seed_from_u64(seed)),
            scale,
        }
    }

    pub fn generate(&mut self) -> Inventory {
        let mut inventory = Inventory::default();
        let mut vpcs = Vec::new();

        for _ in 0..self.scale.accounts() {
            let account_id = self.fake.account_id();
            let alias = self.fake.account_alias();
            let region = self.fake.region();

            for _ in 0..self.scale.vpcs_per_account() {
                let id = self.fake.resource_id("vpc");
                let cidr = self.fake.vpc_cidr();
                let second_octet = cidr.split('.').nth(1).unwrap_or("0").to_string();
                inventory.vpcs.push(json!({
                    "Name": self.fake.name_tag(),
                    "VpcId": id,
                    "AccountId": account_id,
                    "Account": alias,
                    "Region": region,
                    "Cidr": cidr,
                    "IsDefault": self.fake.bool_with_probability(0.1),
                    "Peers": [],
                }));
                vpcs.push(Vpc {
                    id,
                    account_id: account_id.clone(),
                    region,
                    second_octet,
                });
            }
        }

        self.add_peerings(&mut inventory, &vpcs);
        self.add_subnets(&mut inventory, &vpcs);
        self.add_attachments(&mut inventory, &vpcs);
        inventory
    }

    fn add_peerings(&mut self, inventory: &mut Inventory, vpcs: &[Vpc]) {
        for i in 0..vpcs.len() {
            let count = self.fake.int_range(0, self.scale.max_peers());
            let peers: Vec<Value> = self
                .fake
                .pick_indices(vpcs.len(), count, i)
                .into_iter()
                .map(|j| Value::String(vpcs[j].id.clone()))
                .collect();
            inventory.vpcs[i]["Peers"] = Value::Array(peers);
        }
    }

    fn add_subnets(&mut self, inventory: &mut Inventory, vpcs: &[Vpc]) {
        for vpc in vpcs {
            for n in 0..self.scale.subnets_per_vpc() {
                inventory.subnets.push(json!({
                    "SubnetId": self.fake.resource_id("subnet"),
                    "VpcId": vpc.id,
                    "AvailabilityZone": format!("{}{}", vpc.region, self.fake.zone_suffix()),
                    "Cidr": format!("10.{}.{}.0/24", vpc.second_octet, n),
                    "Public": self.fake.bool_with_probability(0.3),
                }));
            }
        }
    }

    /// One transit gateway per region; roughly half the VPCs attach to it
    fn add_attachments(&mut self, inventory: &mut Inventory, vpcs: &[Vpc]) {
        let mut gateways: Vec<(&'static str, String)> = Vec::new();
        for vpc in vpcs {
            if !self.fake.bool_with_probability(0.5) {
                continue;
            }
            let gateway = match gateways.iter().find(|(region, _)| *region == vpc.region) {
                Some((_, id)) => id.clone(),
                None => {
                    let id = self.fake.resource_id("tgw");
                    gateways.push((vpc.region, id.clone()));
                    id
                }
            };
            inventory.attachments.push(json!({
                "AttachmentId": self.fake.resource_id("tgw-attach"),
                "TransitGatewayId": gateway,
                "VpcId": vpc.id,
                "AccountId": vpc.account_id,
                "Region": vpc.region,
            }));
        }
    }
}
