//! Change tracking for entities read for later mutation.

use std::ops::{Deref, DerefMut};

use crate::entity::Entity;

/// An entity paired with a snapshot of its state as last read from or
/// written to the store.
///
/// [`Repository::update`](crate::Repository::update) compares the two and
/// skips the round trip when nothing changed.
#[derive(Debug, Clone)]
pub struct Tracked<E: Entity> {
    entity: E,
    snapshot: Option<E>,
}

impl<E: Entity> Tracked<E> {
    /// Track an entity exactly as it was loaded.
    pub fn loaded(entity: E) -> Self {
        Self {
            snapshot: Some(entity.clone()),
            entity,
        }
    }

    /// Track an entity that was not loaded through the repository.
    ///
    /// With no snapshot to compare against it always counts as modified.
    pub fn attach(entity: E) -> Self {
        Self {
            entity,
            snapshot: None,
        }
    }

    /// Whether the entity differs from its snapshot.
    pub fn is_modified(&self) -> bool {
        self.snapshot.as_ref() != Some(&self.entity)
    }

    /// Record the current state as persisted.
    pub(crate) fn mark_clean(&mut self) {
        self.snapshot = Some(self.entity.clone());
    }

    /// Stop tracking and return the entity.
    pub fn into_inner(self) -> E {
        self.entity
    }
}

impl<E: Entity> Deref for Tracked<E> {
    type Target = E;

    fn deref(&self) -> &E {
        &self.entity
    }
}

impl<E: Entity> DerefMut for Tracked<E> {
    fn deref_mut(&mut self) -> &mut E {
        &mut self.entity
    }
}

#[cfg(test)]
mod tests {
    use storefront_core::types::CustomerId;
    use storefront_entity::Customer;

    use super::*;

    fn john() -> Customer {
        Customer {
            id: CustomerId(1),
            first_name: "John".to_string(),
            surname: "Smith".to_string(),
        }
    }

    #[test]
    fn test_loaded_starts_clean() {
        let tracked = Tracked::loaded(john());
        assert!(!tracked.is_modified());
        assert_eq!(tracked.first_name, "John");
    }

    #[test]
    fn test_mutation_marks_modified() {
        let mut tracked = Tracked::loaded(john());
        tracked.surname = "Smyth".to_string();
        assert!(tracked.is_modified());
        tracked.mark_clean();
        assert!(!tracked.is_modified());
    }

    #[test]
    fn test_reverting_a_change_is_clean() {
        let mut tracked = Tracked::loaded(john());
        tracked.first_name = "Jon".to_string();
        tracked.first_name = "John".to_string();
        assert!(!tracked.is_modified());
    }

    #[test]
    fn test_attached_is_always_modified() {
        let tracked = Tracked::attach(john());
        assert!(tracked.is_modified());
        assert_eq!(tracked.into_inner(), john());
    }
}
