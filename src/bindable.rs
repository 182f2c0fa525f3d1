//! Binding-target capability
//!
//! Instances opt in to receiving bound values by implementing `Bindable`:
//! "does this slot belong to me" plus "write this value into that slot".
//! Matching is resolved once at registration time, not re-derived per bind.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::declaration::{ArgValue, SlotId};
use crate::error::ArgError;

/// Capability implemented by types that receive bound argument values
pub trait Bindable {
    /// Whether this instance's type exposes the given slot
    fn exposes(&self, slot: &SlotId) -> bool;

    /// Write a resolved value into the slot
    ///
    /// Called only for slots the instance reported as exposed. The value is
    /// already converted to the slot's declared kind; implementations narrow
    /// it with `ArgValue::convert_to`.
    fn assign(&mut self, slot: &SlotId, value: &ArgValue) -> Result<(), ArgError>;
}

/// Shared handle under which instances are registered
///
/// The binder and the owning caller synchronize on the same lock, so values
/// bound here are visible to the caller's later reads.
pub type SharedBindable = Arc<Mutex<dyn Bindable + Send>>;

/// Wrap an instance for registration, keeping a typed handle for the caller
pub fn share<T: Bindable + Send + 'static>(instance: T) -> Arc<Mutex<T>> {
    Arc::new(Mutex::new(instance))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Flag {
        verbose: bool,
    }

    impl Bindable for Flag {
        fn exposes(&self, slot: &SlotId) -> bool {
            slot == &SlotId::new("Flag", "verbose")
        }

        fn assign(&mut self, slot: &SlotId, value: &ArgValue) -> Result<(), ArgError> {
            self.verbose = value.convert_to(slot)?;
            Ok(())
        }
    }

    #[test]
    fn exposes_and_assigns() {
        let mut flag = Flag { verbose: false };
        let slot = SlotId::new("Flag", "verbose");
        assert!(flag.exposes(&slot));
        assert!(!flag.exposes(&SlotId::new("Flag", "other")));

        flag.assign(&slot, &ArgValue::Boolean(true)).unwrap();
        assert!(flag.verbose);
    }

    #[test]
    fn shared_handle_is_usable_as_trait_object() {
        let handle = share(Flag { verbose: false });
        let shared: SharedBindable = handle.clone();
        shared
            .lock()
            .assign(&SlotId::new("Flag", "verbose"), &ArgValue::Boolean(true))
            .unwrap();
        assert!(handle.lock().verbose);
    }
}
