//! Runs an algorithm's declared [`Property`](crate::contract::Property) set
//! against its own output, turning the informal claims an algorithm makes
//! about itself into something a test harness can assert on.
//!
//! This supplements the algorithm contract with a generic verification hook
//! in the style of the constraint checkers: rather than each
//! algorithm hand-rolling invariant assertions, a [`PropertyCheck`]
//! closure is registered per property name and applied uniformly.

use crate::contract::{Evaluable, Property};
use std::collections::HashMap;

pub type PropertyCheck<Output> = fn(&Output) -> bool;

pub struct PropertyChecker<Output> {
    checks: HashMap<&'static str, PropertyCheck<Output>>,
}

impl<Output> Default for PropertyChecker<Output> {
    fn default() -> Self {
        Self { checks: HashMap::new() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyViolation {
    pub property_name: &'static str,
    pub description: &'static str,
}

impl<Output> PropertyChecker<Output> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: &'static str, check: PropertyCheck<Output>) {
        self.checks.insert(name, check);
    }

    /// Evaluate every property the algorithm declares that also has a
    /// registered check. A declared property with no registered check is
    /// silently skipped rather than treated as a failure: not every
    /// property is mechanically checkable from the output alone.
    #[must_use]
    pub fn verify(&self, declared: &[Property], output: &Output) -> Vec<PropertyViolation> {
        let violations: Vec<PropertyViolation> = declared
            .iter()
            .filter_map(|property| {
                let check = self.checks.get(property.name)?;
                if check(output) {
                    None
                } else {
                    Some(PropertyViolation { property_name: property.name, description: property.description })
                }
            })
            .collect();
        for violation in &violations {
            tracing::warn!(property = violation.property_name, description = violation.description, "property violation");
        }
        violations
    }

    #[must_use]
    pub fn verify_algorithm<A>(&self, algorithm: &A, output: &Output) -> Vec<PropertyViolation>
    where
        A: Evaluable,
    {
        self.verify(&algorithm.properties(), output)
    }
}
