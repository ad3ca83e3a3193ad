//! Blackboard planner: independent knowledge sources post level-keyed,
//! confidence-tagged entries to a shared state until a goal condition is
//! met or nothing more can be triggered.
//!
//! Entries live at a `(level, key)` coordinate — e.g. `raw.input` is level
//! `"raw"`, key `"input"` — and each carries a confidence in `[0, 1]`. A
//! knowledge source is "triggered" when every one of its conditions holds
//! against the current state; among triggered sources, the highest-priority
//! one fires, ties broken by its position in the source list.

use crate::contract::{Algorithm, AlgorithmContext, Evaluable, Property};
use crate::error::AlgorithmError;
use crs_store::{Delta, Snapshot};
use std::collections::HashMap;

pub type Level = String;
pub type Key = String;

#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub value: String,
    pub confidence: f64,
}

/// A condition against a single `(level, key)` entry: the entry must exist
/// (and, for `Equals`, match a value) at or above `min_confidence`.
#[derive(Debug, Clone)]
pub struct Condition {
    pub level: Level,
    pub key: Key,
    pub operator: ConditionOperator,
    pub min_confidence: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConditionOperator {
    Exists,
    Equals(String),
}

#[derive(Debug, Clone)]
pub struct Action {
    pub level: Level,
    pub key: Key,
    pub value: String,
    pub confidence: f64,
}

/// A production: fires in full (all actions) when every trigger condition
/// holds. Ties in priority are broken by the source's position in the input
/// list, so source order is itself a tiebreak key.
#[derive(Debug, Clone)]
pub struct KnowledgeSource {
    pub name: String,
    pub priority: i32,
    pub triggers: Vec<Condition>,
    pub actions: Vec<Action>,
}

#[derive(Debug, Clone)]
pub struct Contribution {
    pub source: String,
    pub level: Level,
    pub key: Key,
    pub confidence: f64,
}

#[derive(Debug, Clone, Default)]
pub struct BlackboardState {
    entries: HashMap<(Level, Key), Entry>,
}

impl BlackboardState {
    fn condition_holds(&self, condition: &Condition) -> bool {
        match self.entries.get(&(condition.level.clone(), condition.key.clone())) {
            Some(entry) if entry.confidence >= condition.min_confidence => match &condition.operator {
                ConditionOperator::Exists => true,
                ConditionOperator::Equals(expected) => &entry.value == expected,
            },
            _ => false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BlackboardInput {
    pub initial: Vec<(Level, Key, Entry)>,
    pub sources: Vec<KnowledgeSource>,
    pub goal: Vec<Condition>,
    pub max_iterations: usize,
    pub max_contributions: usize,
}

#[derive(Debug, Clone)]
pub struct BlackboardOutput {
    pub contributions: Vec<Contribution>,
    pub activation_counts: HashMap<String, usize>,
    pub goal_reached: bool,
}

#[derive(Default)]
pub struct BlackboardPlanner;

impl Evaluable for BlackboardPlanner {
    fn name(&self) -> &'static str {
        "blackboard"
    }
    fn input_type(&self) -> &'static str {
        "BlackboardInput"
    }
    fn output_type(&self) -> &'static str {
        "BlackboardOutput"
    }
    fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(2)
    }
    fn properties(&self) -> Vec<Property> {
        vec![
            Property::new(
                "contributions_reference_known_sources",
                "every contribution's source id exists in the input source list",
            ),
            Property::new(
                "final_state_matches_actions",
                "the final entry set corresponds exactly to the actions taken",
            ),
        ]
    }
}

impl Algorithm for BlackboardPlanner {
    type Input = BlackboardInput;
    type Output = BlackboardOutput;

    fn process(
        &self,
        ctx: &AlgorithmContext,
        _snapshot: &Snapshot,
        input: Self::Input,
    ) -> Result<(Self::Output, Option<Delta>), AlgorithmError> {
        let mut state = BlackboardState::default();
        for (level, key, entry) in input.initial {
            state.entries.insert((level, key), entry);
        }

        let mut activation_counts: HashMap<String, usize> =
            input.sources.iter().map(|s| (s.name.clone(), 0)).collect();
        let mut contributions = Vec::new();
        let mut goal_reached = false;

        for _ in 0..input.max_iterations {
            if ctx.is_cancelled() {
                return Err(AlgorithmError::Cancelled("blackboard planner cancelled".into()));
            }
            if goal_met(&state, &input.goal) {
                goal_reached = true;
                break;
            }
            let Some(selected) = select_source(&state, &input.sources) else { break };

            for action in &selected.actions {
                state.entries.insert(
                    (action.level.clone(), action.key.clone()),
                    Entry { value: action.value.clone(), confidence: action.confidence },
                );
                contributions.push(Contribution {
                    source: selected.name.clone(),
                    level: action.level.clone(),
                    key: action.key.clone(),
                    confidence: action.confidence,
                });
            }
            *activation_counts.entry(selected.name.clone()).or_insert(0) += 1;

            if contributions.len() >= input.max_contributions {
                break;
            }
        }
        if !goal_reached && goal_met(&state, &input.goal) {
            goal_reached = true;
        }

        Ok((BlackboardOutput { contributions, activation_counts, goal_reached }, None))
    }
}

fn goal_met(state: &BlackboardState, goal: &[Condition]) -> bool {
    !goal.is_empty() && goal.iter().all(|c| state.condition_holds(c))
}

/// The highest-priority source whose triggers all hold; ties broken by
/// position in `sources` (the earlier source wins).
fn select_source<'a>(state: &BlackboardState, sources: &'a [KnowledgeSource]) -> Option<&'a KnowledgeSource> {
    let mut best: Option<&KnowledgeSource> = None;
    for source in sources {
        if !source.triggers.iter().all(|c| state.condition_holds(c)) {
            continue;
        }
        let better = match best {
            Some(b) => source.priority > b.priority,
            None => true,
        };
        if better {
            best = Some(source);
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reaches_goal_after_one_triggered_source_contributes() {
        let source = KnowledgeSource {
            name: "analyzer".into(),
            priority: 0,
            triggers: vec![Condition {
                level: "raw".into(),
                key: "input".into(),
                operator: ConditionOperator::Exists,
                min_confidence: 0.0,
            }],
            actions: vec![Action {
                level: "analyzed".into(),
                key: "result".into(),
                value: "ok".into(),
                confidence: 0.9,
            }],
        };
        let input = BlackboardInput {
            initial: vec![("raw".into(), "input".into(), Entry { value: "x".into(), confidence: 1.0 })],
            sources: vec![source],
            goal: vec![Condition {
                level: "analyzed".into(),
                key: "result".into(),
                operator: ConditionOperator::Exists,
                min_confidence: 0.0,
            }],
            max_iterations: 10,
            max_contributions: 10,
        };

        let planner = BlackboardPlanner;
        let ctx = AlgorithmContext::unbounded();
        let store = crs_store::CrsStore::default();
        let snapshot = store.snapshot();
        let (output, delta) = planner.process(&ctx, &snapshot, input).unwrap();

        assert!(output.goal_reached);
        assert_eq!(output.contributions.len(), 1);
        assert_eq!(output.activation_counts.get("analyzer"), Some(&1));
        assert!(delta.is_none());
    }

    #[test]
    fn higher_priority_source_fires_first_on_a_tie_in_triggers() {
        let low = KnowledgeSource {
            name: "low".into(),
            priority: 0,
            triggers: vec![],
            actions: vec![Action { level: "l".into(), key: "k".into(), value: "low".into(), confidence: 1.0 }],
        };
        let high = KnowledgeSource {
            name: "high".into(),
            priority: 5,
            triggers: vec![],
            actions: vec![Action { level: "l".into(), key: "k".into(), value: "high".into(), confidence: 1.0 }],
        };
        let input = BlackboardInput {
            initial: vec![],
            sources: vec![low, high],
            goal: vec![Condition {
                level: "never".into(),
                key: "reached".into(),
                operator: ConditionOperator::Exists,
                min_confidence: 0.0,
            }],
            max_iterations: 1,
            max_contributions: 10,
        };

        let planner = BlackboardPlanner;
        let ctx = AlgorithmContext::unbounded();
        let store = crs_store::CrsStore::default();
        let snapshot = store.snapshot();
        let (output, _) = planner.process(&ctx, &snapshot, input).unwrap();

        assert_eq!(output.contributions[0].source, "high");
        assert!(!output.goal_reached);
    }

    #[test]
    fn stops_with_no_contributions_when_no_source_is_triggered() {
        let source = KnowledgeSource {
            name: "dormant".into(),
            priority: 0,
            triggers: vec![Condition {
                level: "raw".into(),
                key: "missing".into(),
                operator: ConditionOperator::Exists,
                min_confidence: 0.0,
            }],
            actions: vec![],
        };
        let input = BlackboardInput {
            initial: vec![],
            sources: vec![source],
            goal: vec![Condition {
                level: "any".into(),
                key: "key".into(),
                operator: ConditionOperator::Exists,
                min_confidence: 0.0,
            }],
            max_iterations: 10,
            max_contributions: 10,
        };

        let planner = BlackboardPlanner;
        let ctx = AlgorithmContext::unbounded();
        let store = crs_store::CrsStore::default();
        let snapshot = store.snapshot();
        let (output, _) = planner.process(&ctx, &snapshot, input).unwrap();

        assert!(output.contributions.is_empty());
        assert!(!output.goal_reached);
        assert_eq!(output.activation_counts.get("dormant"), Some(&0));
    }
}
