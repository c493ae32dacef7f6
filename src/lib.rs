//! Rendering engine for cloud resource inventories.
//!
//! Collectors produce [`Record`]s; a [`Report`] projects them into tables,
//! flat files, graphs or draw.io imports and hands the result to an
//! [`OutputSink`].

pub mod error;
pub mod json_schema;
pub mod logging;
pub mod record;
pub mod render;
pub mod settings;
pub mod sink;

pub use error::{RenderError, Result};
pub use record::{Record, RecordCollection, Schema, Value};
pub use render::Report;
pub use settings::{Destination, OutputFormat, RenderSettings};
pub use sink::{OutputSink, WriteMode};
