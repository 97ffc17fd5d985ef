pub mod boundness;
pub mod coverability;

pub use boundness::{BoundnessResult, check_boundness};
pub use coverability::{
    Budget, BuildError, BuildLimits, CoverabilityBuilder, CoverabilityTree, NodeTag, TreeEdge,
    TreeNode,
};
