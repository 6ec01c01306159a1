//! Resource authorization: declarative rule tables and the decision procedure.

pub mod authorizer;
pub mod registry;
pub mod rule;

pub use authorizer::{Authorizer, Decision, DecisionSource, Verdict};
pub use registry::PolicyRegistry;
pub use rule::{Clause, Ownership, Rule};
