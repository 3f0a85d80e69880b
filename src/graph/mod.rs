//! Flat node/edge model consumed by the canvas.

pub mod condition;
pub mod index;
pub mod types;

pub use condition::{Condition, ConditionOperator};
pub use index::FlowIndex;
pub use types::*;
