//! Core type definitions used across the Stockroom workspace.

pub mod id;

pub use id::*;
