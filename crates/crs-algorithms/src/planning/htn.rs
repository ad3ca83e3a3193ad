//! Hierarchical task network decomposition.
//!
//! Method selection is first-applicable among methods sorted by priority
//! descending: the highest-priority method whose precondition holds is
//! taken and never revisited, even if a later decomposition step fails. A
//! full backtracking planner was considered and rejected as an open design
//! choice; see the project's grounding notes for the rationale.
//!
//! Cycle detection is per decomposition path, not global: the same compound
//! task may appear in two independent branches of the tree, but not twice
//! along one root-to-leaf path.

use crate::contract::{Algorithm, AlgorithmContext, Evaluable, Property};
use crate::error::AlgorithmError;
use crs_store::{Delta, Snapshot};
use crs_types::NodeId;

#[derive(Debug, Clone)]
pub enum Task {
    Primitive(NodeId),
    Compound { name: String, methods: Vec<Method> },
}

#[derive(Clone)]
pub struct Method {
    pub name: String,
    pub priority: i32,
    pub precondition: fn(&[NodeId]) -> bool,
    pub subtasks: Vec<Task>,
}

impl std::fmt::Debug for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Method")
            .field("name", &self.name)
            .field("priority", &self.priority)
            .field("subtasks", &self.subtasks)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct HtnInput {
    pub root: Task,
    pub known_facts: Vec<NodeId>,
    pub max_depth: usize,
    pub max_plan_length: usize,
}

/// The decomposition tree actually taken, mirroring `Task` but recording
/// which method resolved each compound task.
#[derive(Debug, Clone)]
pub enum DecompositionNode {
    Primitive(NodeId),
    Compound { task: String, method: String, children: Vec<DecompositionNode> },
}

#[derive(Debug, Clone)]
pub struct HtnOutput {
    pub plan: Vec<NodeId>,
    pub tree: DecompositionNode,
    pub depth_reached: usize,
    pub methods_considered: usize,
}

#[derive(Default)]
pub struct HtnPlanner;

impl Evaluable for HtnPlanner {
    fn name(&self) -> &'static str {
        "htn"
    }
    fn input_type(&self) -> &'static str {
        "HtnInput"
    }
    fn output_type(&self) -> &'static str {
        "HtnOutput"
    }
    fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(2)
    }
    fn properties(&self) -> Vec<Property> {
        vec![
            Property::new("all_primitive", "every task in the returned plan is a primitive task"),
            Property::new("declared_method", "every decomposition in the tree names a method that was declared on its task"),
        ]
    }
}

impl Algorithm for HtnPlanner {
    type Input = HtnInput;
    type Output = HtnOutput;

    fn process(
        &self,
        ctx: &AlgorithmContext,
        _snapshot: &Snapshot,
        input: Self::Input,
    ) -> Result<(Self::Output, Option<Delta>), AlgorithmError> {
        let mut plan = Vec::new();
        let mut counters = Counters { depth_reached: 0, methods_considered: 0 };
        let mut path = Vec::new();
        let tree = decompose(
            &input.root,
            &input.known_facts,
            &mut plan,
            &mut path,
            ctx,
            0,
            &input,
            &mut counters,
        )?;
        Ok((
            HtnOutput {
                plan,
                tree,
                depth_reached: counters.depth_reached,
                methods_considered: counters.methods_considered,
            },
            None,
        ))
    }
}

struct Counters {
    depth_reached: usize,
    methods_considered: usize,
}

#[allow(clippy::too_many_arguments)]
fn decompose(
    task: &Task,
    facts: &[NodeId],
    plan: &mut Vec<NodeId>,
    path: &mut Vec<String>,
    ctx: &AlgorithmContext,
    depth: usize,
    input: &HtnInput,
    counters: &mut Counters,
) -> Result<DecompositionNode, AlgorithmError> {
    if depth > input.max_depth {
        return Err(AlgorithmError::InvalidConfiguration("task network exceeds maximum decomposition depth".into()));
    }
    if ctx.is_cancelled() {
        return Err(AlgorithmError::Cancelled("htn decomposition cancelled".into()));
    }
    counters.depth_reached = counters.depth_reached.max(depth);

    match task {
        Task::Primitive(node) => {
            if plan.len() >= input.max_plan_length {
                return Err(AlgorithmError::InvalidConfiguration("task network exceeds maximum plan length".into()));
            }
            plan.push(*node);
            Ok(DecompositionNode::Primitive(*node))
        }
        Task::Compound { name, methods } => {
            if path.contains(name) {
                return Err(AlgorithmError::InvalidInput {
                    expected: "an acyclic decomposition path",
                    actual: "a compound task recurred along its own decomposition path",
                });
            }
            if methods.is_empty() {
                return Err(AlgorithmError::InvalidInput { expected: "at least one method", actual: "no methods declared for task" });
            }
            let mut ordered: Vec<&Method> = methods.iter().collect();
            ordered.sort_by(|a, b| b.priority.cmp(&a.priority));
            let method = ordered
                .into_iter()
                .find(|m| (m.precondition)(facts))
                .ok_or(AlgorithmError::InvalidInput { expected: "an applicable method", actual: "no method precondition satisfied" })?;
            counters.methods_considered += 1;

            path.push(name.clone());
            let mut children = Vec::with_capacity(method.subtasks.len());
            for sub in &method.subtasks {
                children.push(decompose(sub, facts, plan, path, ctx, depth + 1, input, counters)?);
            }
            path.pop();

            Ok(DecompositionNode::Compound { task: name.clone(), method: method.name.clone(), children })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn always(_facts: &[NodeId]) -> bool {
        true
    }

    fn never(_facts: &[NodeId]) -> bool {
        false
    }

    fn input(root: Task) -> HtnInput {
        HtnInput { root, known_facts: vec![], max_depth: 64, max_plan_length: 256 }
    }

    #[test]
    fn decomposes_to_only_primitive_tasks() {
        let leaf_a = NodeId::new();
        let leaf_b = NodeId::new();
        let root = Task::Compound {
            name: "build".into(),
            methods: vec![Method { name: "sequential".into(), priority: 0, precondition: always, subtasks: vec![Task::Primitive(leaf_a), Task::Primitive(leaf_b)] }],
        };
        let planner = HtnPlanner;
        let ctx = AlgorithmContext::unbounded();
        let store = crs_store::CrsStore::default();
        let snapshot = store.snapshot();
        let (output, delta) = planner.process(&ctx, &snapshot, input(root)).unwrap();
        assert_eq!(output.plan, vec![leaf_a, leaf_b]);
        assert!(delta.is_none());
    }

    #[test]
    fn nested_decomposition_reports_depth_and_method_count() {
        let b = NodeId::new();
        let d = NodeId::new();
        let task_c = Task::Compound {
            name: "C".into(),
            methods: vec![Method { name: "c-to-d".into(), priority: 0, precondition: always, subtasks: vec![Task::Primitive(d)] }],
        };
        let root = Task::Compound {
            name: "A".into(),
            methods: vec![Method { name: "a-to-bc".into(), priority: 0, precondition: always, subtasks: vec![Task::Primitive(b), task_c] }],
        };
        let planner = HtnPlanner;
        let ctx = AlgorithmContext::unbounded();
        let store = crs_store::CrsStore::default();
        let snapshot = store.snapshot();
        let (output, _) = planner.process(&ctx, &snapshot, input(root)).unwrap();

        assert_eq!(output.plan, vec![b, d]);
        assert_eq!(output.depth_reached, 2);
        assert_eq!(output.methods_considered, 2);
    }

    #[test]
    fn picks_the_highest_priority_applicable_method() {
        let low_leaf = NodeId::new();
        let high_leaf = NodeId::new();
        let root = Task::Compound {
            name: "choose".into(),
            methods: vec![
                Method { name: "low".into(), priority: 0, precondition: always, subtasks: vec![Task::Primitive(low_leaf)] },
                Method { name: "high".into(), priority: 10, precondition: always, subtasks: vec![Task::Primitive(high_leaf)] },
            ],
        };
        let planner = HtnPlanner;
        let ctx = AlgorithmContext::unbounded();
        let store = crs_store::CrsStore::default();
        let snapshot = store.snapshot();
        let (output, _) = planner.process(&ctx, &snapshot, input(root)).unwrap();
        assert_eq!(output.plan, vec![high_leaf]);
    }

    #[test]
    fn rejects_when_no_method_applies() {
        let root = Task::Compound { name: "stuck".into(), methods: vec![Method { name: "impossible".into(), priority: 0, precondition: never, subtasks: vec![] }] };
        let planner = HtnPlanner;
        let ctx = AlgorithmContext::unbounded();
        let store = crs_store::CrsStore::default();
        let snapshot = store.snapshot();
        let result = planner.process(&ctx, &snapshot, input(root));
        assert!(result.is_err());
    }

    #[test]
    fn rejects_a_task_that_recurs_on_its_own_path() {
        let cyclic_method = Method { name: "loops".into(), priority: 0, precondition: always, subtasks: vec![] };
        let mut root_methods = vec![cyclic_method.clone()];
        let self_ref = Task::Compound { name: "loop".into(), methods: root_methods.clone() };
        root_methods[0].subtasks = vec![self_ref];
        let root = Task::Compound { name: "loop".into(), methods: root_methods };

        let planner = HtnPlanner;
        let ctx = AlgorithmContext::unbounded();
        let store = crs_store::CrsStore::default();
        let snapshot = store.snapshot();
        let result = planner.process(&ctx, &snapshot, input(root));
        assert!(result.is_err());
    }
}
