//! Deep merge of TOML values.
//!
//! The merge operates on raw [`toml::Value`] trees rather than deserialized
//! structs, so a key missing from a layer never overrides the layer below.

mod deep;
mod types;

pub use deep::{deep_merge_tracking, record_all_leaves};
pub use types::{ConfigLayer, FieldSources};
