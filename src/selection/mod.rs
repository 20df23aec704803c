//! Region analysis over the binary foreground mask.
//!
//! - **Connected components**: flood-fill labeling and counting

pub mod components;

pub use components::{count_components, count_components_with, Connectivity};
