//! Model class registry.
//!
//! Persisters accept objects of their bound model class and of its subclasses.
//! The class hierarchy is declared up front in a `ModelRegistry` and checked by
//! name, so no runtime type inspection is needed.

use std::collections::{HashMap, HashSet};

/// Registry of model classes and their parent class.
#[derive(Debug, Clone, Default)]
pub struct ModelRegistry {
    parents: HashMap<String, Option<String>>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a root model class.
    pub fn register(&mut self, class: impl Into<String>) {
        self.parents.entry(class.into()).or_insert(None);
    }

    /// Register `class` as a direct subclass of `parent`.
    ///
    /// The parent does not need to be registered first.
    pub fn register_subclass(&mut self, class: impl Into<String>, parent: impl Into<String>) {
        self.parents.insert(class.into(), Some(parent.into()));
    }

    /// Builder form of [`ModelRegistry::register`].
    pub fn with_model(mut self, class: impl Into<String>) -> Self {
        self.register(class);
        self
    }

    /// Builder form of [`ModelRegistry::register_subclass`].
    pub fn with_subclass(mut self, class: impl Into<String>, parent: impl Into<String>) -> Self {
        self.register_subclass(class, parent);
        self
    }

    pub fn contains(&self, class: &str) -> bool {
        self.parents.contains_key(class)
    }

    /// Parent of `class`, if it has one.
    pub fn parent_of(&self, class: &str) -> Option<&str> {
        self.parents.get(class)?.as_deref()
    }

    /// Check whether `class` is `ancestor` or one of its subclasses.
    ///
    /// Unregistered classes only match themselves. A cyclic hierarchy stops
    /// the walk instead of looping.
    pub fn is_a(&self, class: &str, ancestor: &str) -> bool {
        let mut visited = HashSet::new();
        let mut current = Some(class);

        while let Some(name) = current {
            if name == ancestor {
                return true;
            }
            if !visited.insert(name) {
                return false;
            }
            current = self.parent_of(name);
        }

        false
    }
}
