//! Cloud inventory generator for cloudscope integration tests and benchmarks.
//!
//! Generates deterministic VPC, subnet, peering and transit gateway
//! attachment records as JSON objects, the same shape `cloudscope render`
//! reads.
//!
//! # Example
//!
//! ```rust
//! use fixture_gen::{Generator, Scale};
//!
//! let inventory = Generator::new(42, Scale::Small).generate();
//! let json = serde_json::to_string(&inventory.vpcs).unwrap();
//! assert!(json.starts_with("[{"));
//! ```

pub mod fake;
pub mod generator;

pub use generator::{Generator, Inventory, Scale};
