//! Declaration registry with one-time memoized scan
//!
//! `Registry::global()` runs the source scan at most once per process; every
//! caller observes the same completed registry. Independent registries can be
//! built with `from_declarations` for isolated binding contexts and tests.
//!
//! Uses FxHashMap for faster hashing on small string keys.

use once_cell::sync::OnceCell;
use rustc_hash::FxHashMap;
use std::collections::hash_map::Entry;
use tracing::{debug, warn};

use crate::declaration::Declaration;
use crate::error::ArgError;
use crate::source::DeclarationSource;

static GLOBAL: OnceCell<Registry> = OnceCell::new();

#[cfg(test)]
static GLOBAL_SCANS: std::sync::atomic::AtomicUsize = std::sync::atomic::AtomicUsize::new(0);

/// All declarations known to the process, indexed by name
pub struct Registry {
    declarations: Vec<Declaration>,
    /// Long and short names → declaration index
    by_name: FxHashMap<String, usize>,
    /// Names claimed by more than one declaration → their slot identities
    ambiguous: FxHashMap<String, Vec<String>>,
}

impl Registry {
    /// The process-wide registry; first call performs the scan
    pub fn global() -> &'static Registry {
        GLOBAL.get_or_init(|| {
            #[cfg(test)]
            GLOBAL_SCANS.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
            Registry::scan()
        })
    }

    /// Full pass over every collected declaration source
    ///
    /// The scan itself never fails: a source whose loader errors is logged
    /// and skipped, everything else lands in the registry.
    pub fn scan() -> Registry {
        Self::from_sources(inventory::iter::<DeclarationSource>.into_iter())
    }

    fn from_sources<'a>(sources: impl Iterator<Item = &'a DeclarationSource>) -> Registry {
        let mut declarations = Vec::new();
        let mut seen = 0usize;

        for source in sources {
            seen += 1;
            match (source.load)() {
                Ok(decls) => declarations.extend(decls),
                Err(err) => {
                    warn!(source = source.type_name, %err, "skipping unavailable declaration source");
                }
            }
        }

        let registry = Self::from_declarations(declarations);
        debug!(
            sources = seen,
            declarations = registry.declarations.len(),
            "declaration scan complete"
        );
        registry
    }

    /// Build an independent registry from explicit declarations
    pub fn from_declarations(declarations: Vec<Declaration>) -> Registry {
        let mut by_name: FxHashMap<String, usize> = FxHashMap::default();
        let mut ambiguous: FxHashMap<String, Vec<String>> = FxHashMap::default();

        for (idx, decl) in declarations.iter().enumerate() {
            let names = [decl.names().long_name(), decl.names().short_name()];
            for name in names.into_iter().flatten() {
                match by_name.entry(name.to_string()) {
                    Entry::Vacant(entry) => {
                        entry.insert(idx);
                    }
                    Entry::Occupied(entry) => {
                        let first = *entry.get();
                        ambiguous
                            .entry(name.to_string())
                            .or_insert_with(|| vec![declarations[first].slot().to_string()])
                            .push(decl.slot().to_string());
                    }
                }
            }
        }

        Registry {
            declarations,
            by_name,
            ambiguous,
        }
    }

    pub fn declarations(&self) -> &[Declaration] {
        &self.declarations
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// Look up a delimiter-stripped name against all long and short names
    pub(crate) fn lookup(&self, stripped: &str) -> Option<usize> {
        self.by_name.get(stripped).copied()
    }

    /// Refuse to bind while any name resolves to more than one slot
    pub fn ensure_unambiguous(&self) -> Result<(), ArgError> {
        match self.ambiguous.iter().next() {
            Some((name, slots)) => Err(ArgError::AmbiguousName {
                name: name.clone(),
                slots: slots.clone(),
            }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declaration::{Names, SlotId, ValueKind};
    use serde_json::json;
    use std::sync::atomic::Ordering;

    fn decl(type_name: &str, field: &str, names: Names) -> Declaration {
        Declaration::new(SlotId::new(type_name, field), ValueKind::Text, names)
            .default_value(json!(""))
    }

    #[test]
    fn lookup_finds_long_and_short_names() {
        let registry = Registry::from_declarations(vec![decl(
            "Config",
            "port",
            Names::long_short("port", "p"),
        )]);

        assert_eq!(registry.lookup("port"), Some(0));
        assert_eq!(registry.lookup("p"), Some(0));
        assert_eq!(registry.lookup("q"), None);
        assert!(registry.ensure_unambiguous().is_ok());
    }

    #[test]
    fn duplicate_names_are_recorded_as_ambiguous() {
        let registry = Registry::from_declarations(vec![
            decl("ClientConfig", "port", Names::long("port")),
            decl("ServerConfig", "port", Names::long("port")),
        ]);

        let err = registry.ensure_unambiguous().unwrap_err();
        match err {
            ArgError::AmbiguousName { name, slots } => {
                assert_eq!(name, "port");
                assert_eq!(slots.len(), 2);
            }
            other => panic!("expected AmbiguousName, got {other}"),
        }
    }

    #[test]
    fn long_of_one_colliding_with_short_of_another_is_ambiguous() {
        let registry = Registry::from_declarations(vec![
            decl("A", "x", Names::long("v")),
            decl("B", "y", Names::short("v")),
        ]);
        assert!(registry.ensure_unambiguous().is_err());
    }

    #[test]
    fn failing_source_is_skipped() {
        fn good() -> Result<Vec<Declaration>, ArgError> {
            Ok(vec![Declaration::new(
                SlotId::new("Good", "value"),
                ValueKind::Text,
                Names::long("good-value"),
            )])
        }
        fn bad() -> Result<Vec<Declaration>, ArgError> {
            Err(ArgError::SourceUnavailable {
                type_name: "Bad".to_string(),
                reason: "metadata not loadable".to_string(),
            })
        }

        let sources = [
            DeclarationSource::new("Good", good),
            DeclarationSource::new("Bad", bad),
        ];
        let registry = Registry::from_sources(sources.iter());

        assert_eq!(registry.declarations().len(), 1);
        assert_eq!(registry.lookup("good-value"), Some(0));
    }

    #[test]
    fn global_scan_runs_at_most_once() {
        let handles: Vec<_> = (0..8)
            .map(|_| std::thread::spawn(|| Registry::global() as *const Registry as usize))
            .collect();
        let pointers: Vec<usize> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert!(pointers.windows(2).all(|w| w[0] == w[1]));
        assert!(GLOBAL_SCANS.load(Ordering::Relaxed) <= 1);
    }
}
