//! Protected resources, the actions performed on them, and their lifecycle.

pub mod action;
pub mod kind;
pub mod snapshot;
pub mod state;
pub mod workflow;

pub use action::Action;
pub use kind::ResourceKind;
pub use snapshot::ResourceSnapshot;
pub use state::ResourceState;
pub use workflow::transition;
