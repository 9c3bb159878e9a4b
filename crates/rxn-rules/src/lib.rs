#![deny(missing_docs)]
#![doc = "Conservation rule set: a closed catalog of edge, node and graph rules evaluated on the edges adjacent to one node."]

mod additive;
mod edge;
mod graph;
mod parity;
mod rule;
pub mod spin;
mod view;

pub use rule::{AdditiveQn, EdgeRule, GraphRule, NodeRule, Rule, RuleCost};
pub use view::{NodeView, Restriction, Side, Verdict, Violation, ViolationKind};
