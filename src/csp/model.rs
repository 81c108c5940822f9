//! Finite-domain constraint model.
//!
//! A [`CspModel`] holds variables with ordered, duplicate-free domains and
//! constraints over them. Constraints are any type implementing
//! [`Constraint`]; the model caches each constraint's scope and an index
//! from variables to the constraints that mention them.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Handle to a variable in a [`CspModel`]. Ids follow declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VarId(pub usize);

impl VarId {
    /// Position in declaration order.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for VarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// A predicate over a fixed scope of variables.
///
/// The solver only evaluates a constraint once every variable in its scope
/// has a value (or, during forward checking, a tentative one).
pub trait Constraint<V> {
    /// Variables the constraint reads, in the order `is_satisfied` expects.
    fn scope(&self) -> Vec<VarId>;

    /// Evaluates the constraint. `values[i]` is the value of `scope()[i]`.
    fn is_satisfied(&self, values: &[&V]) -> bool;
}

/// A named decision variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable<V> {
    /// Unique name.
    pub name: String,
    /// Candidate values, in the order the solver tries them.
    pub domain: Vec<V>,
}

/// Errors raised while building a model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CspError {
    #[error("variable '{0}' is declared twice")]
    DuplicateVariable(String),
    #[error("variable '{variable}' has a duplicate value at domain position {position}")]
    DuplicateValue { variable: String, position: usize },
    #[error("variable '{0}' has an empty domain")]
    EmptyDomain(String),
    #[error("constraint references unknown variable {0}")]
    UnknownVariable(VarId),
    #[error("constraint has an empty scope")]
    EmptyScope,
    #[error("constraint mentions variable '{0}' more than once")]
    RepeatedScopeVariable(String),
}

/// A constraint satisfaction problem.
#[derive(Debug, Clone)]
pub struct CspModel<V, C> {
    variables: Vec<Variable<V>>,
    names: HashMap<String, VarId>,
    constraints: Vec<C>,
    scopes: Vec<Vec<VarId>>,
    watchers: Vec<Vec<usize>>,
}

impl<V, C> Default for CspModel<V, C> {
    fn default() -> Self {
        Self {
            variables: Vec::new(),
            names: HashMap::new(),
            constraints: Vec::new(),
            scopes: Vec::new(),
            watchers: Vec::new(),
        }
    }
}

impl<V: PartialEq, C: Constraint<V>> CspModel<V, C> {
    /// Creates an empty model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a variable.
    ///
    /// # Errors
    /// Duplicate names, empty domains, and repeated domain values are rejected.
    pub fn add_variable(
        &mut self,
        name: impl Into<String>,
        domain: Vec<V>,
    ) -> Result<VarId, CspError> {
        let name = name.into();
        if self.names.contains_key(&name) {
            return Err(CspError::DuplicateVariable(name));
        }
        if domain.is_empty() {
            return Err(CspError::EmptyDomain(name));
        }
        if let Some(position) =
            (1..domain.len()).find(|&i| domain[..i].contains(&domain[i]))
        {
            return Err(CspError::DuplicateValue {
                variable: name,
                position,
            });
        }

        let id = VarId(self.variables.len());
        self.names.insert(name.clone(), id);
        self.variables.push(Variable { name, domain });
        self.watchers.push(Vec::new());
        Ok(id)
    }

    /// Posts a constraint.
    ///
    /// # Errors
    /// The scope must be non-empty, reference declared variables only, and
    /// mention each variable at most once.
    pub fn add_constraint(&mut self, constraint: C) -> Result<(), CspError> {
        let scope = constraint.scope();
        if scope.is_empty() {
            return Err(CspError::EmptyScope);
        }
        for (i, var) in scope.iter().enumerate() {
            let variable = self
                .variables
                .get(var.index())
                .ok_or(CspError::UnknownVariable(*var))?;
            if scope[..i].contains(var) {
                return Err(CspError::RepeatedScopeVariable(variable.name.clone()));
            }
        }

        let index = self.constraints.len();
        for var in &scope {
            self.watchers[var.index()].push(index);
        }
        self.constraints.push(constraint);
        self.scopes.push(scope);
        Ok(())
    }
}

impl<V, C> CspModel<V, C> {
    /// Number of variables.
    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }

    /// Number of constraints.
    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    /// All variables in declaration order.
    pub fn variables(&self) -> &[Variable<V>] {
        &self.variables
    }

    /// A variable by id.
    pub fn variable(&self, id: VarId) -> Option<&Variable<V>> {
        self.variables.get(id.index())
    }

    /// Looks up a variable id by name.
    pub fn var_id(&self, name: &str) -> Option<VarId> {
        self.names.get(name).copied()
    }

    /// All constraints in posting order.
    pub fn constraints(&self) -> &[C] {
        &self.constraints
    }

    /// Cached scope of constraint `index`.
    pub fn scope(&self, index: usize) -> &[VarId] {
        &self.scopes[index]
    }

    /// Indices of the constraints that mention `var`.
    pub fn constraints_on(&self, var: VarId) -> &[usize] {
        self.watchers
            .get(var.index())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Domain sizes, a quick measure of the search space.
    pub fn domain_sizes(&self) -> Vec<usize> {
        self.variables.iter().map(|v| v.domain.len()).collect()
    }
}

/// A complete assignment returned by the solver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment<V> {
    names: Vec<String>,
    values: Vec<V>,
}

impl<V> Assignment<V> {
    pub(crate) fn new(names: Vec<String>, values: Vec<V>) -> Self {
        Self { names, values }
    }

    /// Value of a variable.
    pub fn get(&self, var: VarId) -> Option<&V> {
        self.values.get(var.index())
    }

    /// Value of a variable by name.
    pub fn get_by_name(&self, name: &str) -> Option<&V> {
        self.names
            .iter()
            .position(|n| n == name)
            .and_then(|i| self.values.get(i))
    }

    /// `(name, value)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.names.iter().map(String::as_str).zip(self.values.iter())
    }

    /// Number of assigned variables.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the assignment is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NotEqual(VarId, VarId);

    impl Constraint<i32> for NotEqual {
        fn scope(&self) -> Vec<VarId> {
            vec![self.0, self.1]
        }
        fn is_satisfied(&self, values: &[&i32]) -> bool {
            values[0] != values[1]
        }
    }

    #[test]
    fn test_add_variables_and_constraints() {
        let mut m: CspModel<i32, NotEqual> = CspModel::new();
        let a = m.add_variable("a", vec![1, 2, 3]).unwrap();
        let b = m.add_variable("b", vec![1, 2]).unwrap();
        m.add_constraint(NotEqual(a, b)).unwrap();

        assert_eq!(m.variable_count(), 2);
        assert_eq!(m.constraint_count(), 1);
        assert_eq!(m.var_id("b"), Some(b));
        assert_eq!(m.constraints_on(a), &[0]);
        assert_eq!(m.scope(0), &[a, b]);
        assert_eq!(m.domain_sizes(), vec![3, 2]);
    }

    #[test]
    fn test_rejects_bad_variables() {
        let mut m: CspModel<i32, NotEqual> = CspModel::new();
        m.add_variable("a", vec![1]).unwrap();
        assert_eq!(
            m.add_variable("a", vec![2]),
            Err(CspError::DuplicateVariable("a".into()))
        );
        assert_eq!(
            m.add_variable("b", vec![]),
            Err(CspError::EmptyDomain("b".into()))
        );
        assert_eq!(
            m.add_variable("c", vec![1, 2, 1]),
            Err(CspError::DuplicateValue {
                variable: "c".into(),
                position: 2
            })
        );
    }

    #[test]
    fn test_rejects_bad_scopes() {
        let mut m: CspModel<i32, NotEqual> = CspModel::new();
        let a = m.add_variable("a", vec![1, 2]).unwrap();
        assert_eq!(
            m.add_constraint(NotEqual(a, VarId(9))),
            Err(CspError::UnknownVariable(VarId(9)))
        );
        assert_eq!(
            m.add_constraint(NotEqual(a, a)),
            Err(CspError::RepeatedScopeVariable("a".into()))
        );
        assert_eq!(m.constraint_count(), 0);
    }

    #[test]
    fn test_assignment_lookup() {
        let asg = Assignment::new(vec!["x".into(), "y".into()], vec![4, 7]);
        assert_eq!(asg.get(VarId(1)), Some(&7));
        assert_eq!(asg.get_by_name("x"), Some(&4));
        assert_eq!(asg.get_by_name("z"), None);
        assert_eq!(asg.iter().count(), 2);
        assert_eq!(asg.len(), 2);
    }
}
