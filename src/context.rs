//! Binding context - the orchestrator
//!
//! A `Context` pairs a declaration registry with an instance store and runs
//! the binding pass: decide whether help was requested, resolve each
//! declaration to a user-supplied value or its default, and write the result
//! onto every registered instance with a matching slot.

use tracing::debug;

use crate::bindable::{Bindable, SharedBindable};
use crate::declaration::ArgValue;
use crate::error::ArgError;
use crate::registry::Registry;
use crate::store::InstanceStore;
use crate::tokens;

/// A registry plus the instances registered against it
pub struct Context<'r> {
    registry: &'r Registry,
    store: InstanceStore,
}

impl Context<'static> {
    /// Context over the process-wide registry
    pub fn new() -> Self {
        Self::with_registry(Registry::global())
    }
}

impl Default for Context<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'r> Context<'r> {
    /// Context over an explicit registry, for independent binding contexts
    pub fn with_registry(registry: &'r Registry) -> Self {
        Self {
            registry,
            store: InstanceStore::new(),
        }
    }

    pub fn registry(&self) -> &Registry {
        self.registry
    }

    /// Register an instance as having slots that receive bound values
    pub fn register(&self, instance: SharedBindable) {
        self.store.register(self.registry, instance);
    }

    /// Set every matching slot on a single instance to its default
    ///
    /// Does not touch the shared store and consults no user-supplied
    /// arguments. Idempotent.
    pub fn initialize_defaults(&self, instance: &mut dyn Bindable) -> Result<(), ArgError> {
        for decl in self.registry.declarations() {
            if instance.exposes(decl.slot()) {
                let value = decl.converted_default()?;
                instance.assign(decl.slot(), &value)?;
            }
        }
        Ok(())
    }

    /// Parse `args` and set all registered instances' matching slots to
    /// either their default or their supplied value
    ///
    /// Returns `Ok(true)` iff help was requested; help detection always
    /// short-circuits the binding pass. Tokenization and conversion complete
    /// before the first assignment, so a reported error means no instance
    /// was touched.
    pub fn initialize(
        &self,
        args: &[String],
        parameter_delimiters: &[String],
        help_parameter: &str,
    ) -> Result<bool, ArgError> {
        self.registry.ensure_unambiguous()?;

        if tokens::help_requested(args, parameter_delimiters, help_parameter) {
            debug!("help requested, short-circuiting binding pass");
            return Ok(true);
        }

        let supplied = tokens::resolve_supplied(args, parameter_delimiters, self.registry)?;

        // Convert every needed default up front: a bad default must not leave
        // the store partially bound
        let defaults: Vec<(usize, ArgValue)> = self
            .registry
            .declarations()
            .iter()
            .enumerate()
            .filter(|(idx, _)| !supplied.contains_key(idx))
            .map(|(idx, decl)| Ok((idx, decl.converted_default()?)))
            .collect::<Result<_, ArgError>>()?;

        debug!(
            supplied = supplied.len(),
            defaulted = defaults.len(),
            "resolved binding pass"
        );

        for (idx, value) in &defaults {
            let slot = self.registry.declarations()[*idx].slot();
            self.store.assign_all(*idx, slot, value)?;
        }

        let mut supplied: Vec<(usize, ArgValue)> = supplied.into_iter().collect();
        supplied.sort_unstable_by_key(|(idx, _)| *idx);
        for (idx, value) in &supplied {
            let slot = self.registry.declarations()[*idx].slot();
            self.store.assign_all(*idx, slot, value)?;
        }

        Ok(false)
    }
}
