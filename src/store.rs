//! Registered instance store
//!
//! Ordered, append-only list of instances that opted in to receive bound
//! values. The set of declarations an instance matches is resolved once at
//! registration time. Duplicate registrations are allowed; a duplicate simply
//! receives the same write twice.

use parking_lot::Mutex;
use tracing::debug;

use crate::bindable::SharedBindable;
use crate::declaration::{ArgValue, SlotId};
use crate::error::ArgError;
use crate::registry::Registry;

struct Target {
    instance: SharedBindable,
    /// Declaration indices this instance matched at registration time
    matched: Vec<usize>,
}

/// Ordered collection of binding targets
#[derive(Default)]
pub struct InstanceStore {
    targets: Mutex<Vec<Target>>,
}

impl InstanceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an instance, resolving its matching declarations once
    pub fn register(&self, registry: &Registry, instance: SharedBindable) {
        let matched: Vec<usize> = {
            let guard = instance.lock();
            registry
                .declarations()
                .iter()
                .enumerate()
                .filter(|(_, decl)| guard.exposes(decl.slot()))
                .map(|(idx, _)| idx)
                .collect()
        };

        debug!(matched = matched.len(), "registered binding target");
        self.targets.lock().push(Target { instance, matched });
    }

    pub fn len(&self) -> usize {
        self.targets.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.lock().is_empty()
    }

    /// Assign a resolved value to every target matching the declaration,
    /// in registration order
    ///
    /// Holds the store lock for the whole pass, so registrations racing an
    /// in-flight binding pass serialize instead of interleaving.
    pub(crate) fn assign_all(
        &self,
        decl_idx: usize,
        slot: &SlotId,
        value: &ArgValue,
    ) -> Result<(), ArgError> {
        for target in self.targets.lock().iter() {
            if target.matched.contains(&decl_idx) {
                target.instance.lock().assign(slot, value)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bindable::{share, Bindable};
    use crate::declaration::{Declaration, Names, ValueKind};
    use serde_json::json;

    struct Counter {
        hits: usize,
        value: i64,
    }

    impl Bindable for Counter {
        fn exposes(&self, slot: &SlotId) -> bool {
            slot == &SlotId::new("Counter", "value")
        }

        fn assign(&mut self, slot: &SlotId, value: &ArgValue) -> Result<(), ArgError> {
            self.hits += 1;
            self.value = value.convert_to(slot)?;
            Ok(())
        }
    }

    fn registry() -> Registry {
        Registry::from_declarations(vec![Declaration::new(
            SlotId::new("Counter", "value"),
            ValueKind::Integer,
            Names::long("value"),
        )
        .default_value(json!(0))])
    }

    #[test]
    fn registration_resolves_matches() {
        let registry = registry();
        let store = InstanceStore::new();
        let counter = share(Counter { hits: 0, value: 0 });

        store.register(&registry, counter.clone());
        assert_eq!(store.len(), 1);

        store
            .assign_all(0, &SlotId::new("Counter", "value"), &ArgValue::Integer(7))
            .unwrap();
        assert_eq!(counter.lock().value, 7);
    }

    #[test]
    fn duplicate_registration_double_writes() {
        let registry = registry();
        let store = InstanceStore::new();
        let counter = share(Counter { hits: 0, value: 0 });

        store.register(&registry, counter.clone());
        store.register(&registry, counter.clone());
        assert_eq!(store.len(), 2);

        store
            .assign_all(0, &SlotId::new("Counter", "value"), &ArgValue::Integer(3))
            .unwrap();
        assert_eq!(counter.lock().hits, 2);
        assert_eq!(counter.lock().value, 3);
    }

    #[test]
    fn non_matching_instance_is_never_assigned() {
        struct Unrelated;
        impl Bindable for Unrelated {
            fn exposes(&self, _slot: &SlotId) -> bool {
                false
            }
            fn assign(&mut self, slot: &SlotId, _value: &ArgValue) -> Result<(), ArgError> {
                panic!("assign called for unexposed slot {slot}");
            }
        }

        let registry = registry();
        let store = InstanceStore::new();
        store.register(&registry, share(Unrelated));

        store
            .assign_all(0, &SlotId::new("Counter", "value"), &ArgValue::Integer(1))
            .unwrap();
    }
}
