//! Category priority lookup and category matching.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::Category;

/// Resolves the priority of a category. Higher values win overlap conflicts.
///
/// Implementations must be pure and total: every category gets a
/// deterministic priority, usually `0` for unknown ones.
pub trait PriorityProvider {
    fn priority_of(&self, category: &Category) -> i32;
}

impl<F> PriorityProvider for F
where
    F: Fn(&Category) -> i32,
{
    fn priority_of(&self, category: &Category) -> i32 {
        self(category)
    }
}

/// Selects the categories a timesheet is built from.
pub trait CategoryMatcher {
    fn matches(&self, category: &Category) -> bool;
}

impl<F> CategoryMatcher for F
where
    F: Fn(&Category) -> bool,
{
    fn matches(&self, category: &Category) -> bool {
        self(category)
    }
}

/// Configured category priorities. Unknown categories have priority 0.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryPriorities(HashMap<Category, i32>);

impl CategoryPriorities {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the priority of a category, returning the previous one.
    pub fn insert(&mut self, category: Category, priority: i32) -> Option<i32> {
        self.0.insert(category, priority)
    }

    pub fn get(&self, category: &Category) -> Option<i32> {
        self.0.get(category).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(Category, i32)> for CategoryPriorities {
    fn from_iter<I: IntoIterator<Item = (Category, i32)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl PriorityProvider for CategoryPriorities {
    fn priority_of(&self, category: &Category) -> i32 {
        self.get(category).unwrap_or(0)
    }
}
