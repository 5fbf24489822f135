//! Dry-run validation of the registered bean graph.
//!
//! Validation inspects definitions and the constructors the container would
//! select, without invoking any of them. It catches the configuration errors
//! that would otherwise surface on the first `get_bean`: missing definitions,
//! unselectable constructors and dependency cycles.

use std::collections::HashMap;
use std::fmt;

use crate::error::CreationFailure;
use crate::error::DiError;
use crate::key::Key;
use crate::registration::Registry;
use crate::selection::select_constructor;

/// A problem found by [`Container::validate`](crate::Container::validate).
#[derive(Debug, Clone)]
pub enum ValidationIssue {
    /// A selected constructor needs a type that has no definition
    MissingDependency {
        bean: &'static str,
        dependency: &'static str,
    },
    /// No constructor can be selected for the bean's implementation
    Unconstructible {
        bean: &'static str,
        failure: CreationFailure,
    },
    /// Requested types that depend on each other; first and last entries match
    CircularDependency { cycle: Vec<&'static str> },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::MissingDependency { bean, dependency } => {
                write!(f, "'{}' depends on '{}', which is not registered", bean, dependency)
            }
            ValidationIssue::Unconstructible { bean, failure } => {
                write!(f, "'{}' cannot be constructed: {}", bean, failure)
            }
            ValidationIssue::CircularDependency { cycle } => {
                write!(f, "Circular dependency: {}", cycle.join(" -> "))
            }
        }
    }
}

/// Outcome of validating every definition in a container
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    /// Problems in discovery order
    pub issues: Vec<ValidationIssue>,
    /// Number of definitions inspected
    pub checked: usize,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn missing_dependencies(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues
            .iter()
            .filter(|issue| matches!(issue, ValidationIssue::MissingDependency { .. }))
    }

    pub fn cycles(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues
            .iter()
            .filter(|issue| matches!(issue, ValidationIssue::CircularDependency { .. }))
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    InProgress,
    Done,
}

pub(crate) fn validate(registry: &Registry) -> ValidationReport {
    let mut report = ValidationReport {
        issues: Vec::new(),
        checked: registry.len(),
    };

    // Edges follow the constructor the engine would pick
    let mut edges: HashMap<Key, Vec<Key>> = HashMap::new();
    for definition in registry.definitions() {
        match select_constructor(&definition.class) {
            Ok(selected) => {
                let mut dependencies = Vec::with_capacity(selected.constructor.arity());
                for parameter in selected.constructor.parameters() {
                    if registry.contains(parameter) {
                        dependencies.push(*parameter);
                    } else {
                        report.issues.push(ValidationIssue::MissingDependency {
                            bean: definition.requested.display_name(),
                            dependency: parameter.display_name(),
                        });
                    }
                }
                edges.insert(definition.requested, dependencies);
            }
            Err(DiError::BeanCreation { failure, .. }) => {
                report.issues.push(ValidationIssue::Unconstructible {
                    bean: definition.requested.display_name(),
                    failure,
                });
            }
            Err(_) => {}
        }
    }

    let mut marks: HashMap<Key, Mark> = HashMap::new();
    let mut path: Vec<Key> = Vec::new();
    for definition in registry.definitions() {
        visit(definition.requested, &edges, &mut marks, &mut path, &mut report.issues);
    }

    report
}

fn visit(
    key: Key,
    edges: &HashMap<Key, Vec<Key>>,
    marks: &mut HashMap<Key, Mark>,
    path: &mut Vec<Key>,
    issues: &mut Vec<ValidationIssue>,
) {
    match marks.get(&key) {
        Some(Mark::Done) => return,
        Some(Mark::InProgress) => {
            if let Some(start) = path.iter().position(|k| *k == key) {
                let mut cycle: Vec<&'static str> =
                    path[start..].iter().map(|k| k.display_name()).collect();
                cycle.push(key.display_name());
                issues.push(ValidationIssue::CircularDependency { cycle });
            }
            return;
        }
        None => {}
    }

    marks.insert(key, Mark::InProgress);
    path.push(key);
    if let Some(dependencies) = edges.get(&key) {
        for dependency in dependencies {
            visit(*dependency, edges, marks, path, issues);
        }
    }
    path.pop();
    marks.insert(key, Mark::Done);
}
