//! Client-side features built on the API layer.

pub mod features;
