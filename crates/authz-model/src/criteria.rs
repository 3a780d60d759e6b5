use std::fmt;

use serde::{Deserialize, Serialize};

use crate::rule::TermRule;

/// Which side of the decision a criteria set argues for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CriteriaRole {
    Inclusion,
    Exclusion,
}

impl CriteriaRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Inclusion => "inclusion",
            Self::Exclusion => "exclusion",
        }
    }
}

impl fmt::Display for CriteriaRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named, ordered collection of rules.
///
/// Order never changes the outcome, every rule is evaluated, but it is kept
/// so audit output lists rules the way the configuration does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CriteriaSet {
    name: String,
    role: CriteriaRole,
    rules: Vec<TermRule>,
}

impl CriteriaSet {
    pub fn new(name: impl Into<String>, role: CriteriaRole, rules: Vec<TermRule>) -> Self {
        let name = name.into();
        let name = if name.trim().is_empty() {
            role.as_str().to_string()
        } else {
            name
        };
        Self { name, role, rules }
    }

    pub fn empty(role: CriteriaRole) -> Self {
        Self::new(role.as_str(), role, Vec::new())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> CriteriaRole {
        self.role
    }

    pub fn rules(&self) -> &[TermRule] {
        &self.rules
    }

    pub fn get(&self, position: usize) -> Option<&TermRule> {
        self.rules.get(position)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TermRule> {
        self.rules.iter()
    }
}

impl<'a> IntoIterator for &'a CriteriaSet {
    type Item = &'a TermRule;
    type IntoIter = std::slice::Iter<'a, TermRule>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
