use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

use crate::{ConfigError, Result};

/// Ordered set of facts, keyed by name.
pub type FactSet<W> = BTreeSet<Fact<W>>;

/// A named boolean predicate over the world context `W`.
///
/// Facts are cheap handles: cloning shares the same predicate. Equality, ordering and hashing only
/// look at the name, so two handles with the same name are the same fact inside a [`FactSet`].
pub struct Fact<W> {
    name: Rc<str>,
    predicate: Rc<dyn Fn(&W) -> bool>,
}

impl<W: 'static> Fact<W> {
    pub fn new(name: impl AsRef<str>, predicate: impl Fn(&W) -> bool + 'static) -> Self {
        Self {
            name: Rc::from(name.as_ref()),
            predicate: Rc::new(predicate),
        }
    }

    /// A fact whose value never changes.
    pub fn constant(name: impl AsRef<str>, value: bool) -> Self {
        Self::new(name, move |_| value)
    }

    /// A fact backed by a provider that may not be able to answer.
    ///
    /// When the provider returns `None` the fact evaluates to `default`, so evaluation stays total.
    pub fn fallible(
        name: impl AsRef<str>,
        default: bool,
        provider: impl Fn(&W) -> Option<bool> + 'static,
    ) -> Self {
        let fact_name: Rc<str> = Rc::from(name.as_ref());
        let log_name = Rc::clone(&fact_name);
        Self {
            name: fact_name,
            predicate: Rc::new(move |world: &W| match provider(world) {
                Some(value) => value,
                None => {
                    tracing::warn!(fact = %log_name, default, "fact provider unavailable, using default");
                    default
                }
            }),
        }
    }
}

impl<W> Fact<W> {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Evaluate against the current world. Has no side effects on `W`.
    pub fn evaluate(&self, world: &W) -> bool {
        (self.predicate)(world)
    }
}

impl<W> Clone for Fact<W> {
    fn clone(&self) -> Self {
        Self {
            name: Rc::clone(&self.name),
            predicate: Rc::clone(&self.predicate),
        }
    }
}

impl<W> fmt::Debug for Fact<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Fact").field(&self.name).finish()
    }
}

impl<W> PartialEq for Fact<W> {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl<W> Eq for Fact<W> {}

impl<W> PartialOrd for Fact<W> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<W> Ord for Fact<W> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(&other.name)
    }
}

impl<W> Hash for Fact<W> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

/// Interned name -> fact table.
///
/// Actions and goals should take their facts from one registry so that every reference to a name
/// shares the same predicate.
pub struct FactRegistry<W> {
    facts: BTreeMap<Rc<str>, Fact<W>>,
}

impl<W> Default for FactRegistry<W> {
    fn default() -> Self {
        Self {
            facts: BTreeMap::new(),
        }
    }
}

impl<W: 'static> FactRegistry<W> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.facts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.facts.contains_key(name)
    }

    /// Register a predicate under `name` and return its handle.
    pub fn add(
        &mut self,
        name: impl AsRef<str>,
        predicate: impl Fn(&W) -> bool + 'static,
    ) -> Result<Fact<W>> {
        self.insert(Fact::new(name, predicate))
    }

    /// Register an already-built fact.
    pub fn insert(&mut self, fact: Fact<W>) -> Result<Fact<W>> {
        if self.facts.contains_key(fact.name()) {
            return Err(ConfigError::DuplicateFact(fact.name().to_string()));
        }
        self.facts.insert(Rc::clone(&fact.name), fact.clone());
        Ok(fact)
    }

    pub fn get(&self, name: &str) -> Option<Fact<W>> {
        self.facts.get(name).cloned()
    }

    pub fn require(&self, name: &str) -> Result<Fact<W>> {
        self.get(name)
            .ok_or_else(|| ConfigError::UnknownFact(name.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Fact<W>> {
        self.facts.values()
    }
}

impl<W> fmt::Debug for FactRegistry<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.facts.keys()).finish()
    }
}
