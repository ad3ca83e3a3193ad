pub mod blackboard;
pub mod htn;

pub use blackboard::{
    Action, BlackboardInput, BlackboardOutput, BlackboardPlanner, Condition, ConditionOperator,
    Contribution, Entry, KnowledgeSource,
};
pub use htn::{DecompositionNode, HtnInput, HtnOutput, HtnPlanner, Method, Task};
