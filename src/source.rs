//! Declaration source registration via `inventory`
//!
//! Each bindable type submits a `DeclarationSource` with `inventory::submit!`.
//! The registry scan collects every submitted source across the program at
//! first use, replacing runtime metadata reflection with link-time
//! registration.

use crate::declaration::Declaration;
use crate::error::ArgError;

/// Loader producing a type's declarations
pub type SourceLoader = fn() -> Result<Vec<Declaration>, ArgError>;

/// Static declaration source collected via `inventory`
pub struct DeclarationSource {
    /// Owning type name, used in scan diagnostics only
    pub type_name: &'static str,
    /// Produces the type's declarations; a failing loader is skipped by the
    /// scan, it never aborts it
    pub load: SourceLoader,
}

impl DeclarationSource {
    pub const fn new(type_name: &'static str, load: SourceLoader) -> Self {
        Self { type_name, load }
    }
}

inventory::collect!(DeclarationSource);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declaration::{Names, SlotId, ValueKind};
    use serde_json::json;

    fn probe_declarations() -> Result<Vec<Declaration>, ArgError> {
        Ok(vec![Declaration::new(
            SlotId::new("SourceProbe", "marker"),
            ValueKind::Text,
            Names::long("source-probe-marker"),
        )
        .default_value(json!("present"))])
    }

    inventory::submit! {
        DeclarationSource::new("SourceProbe", probe_declarations)
    }

    #[test]
    fn submitted_source_is_collected() {
        let found = inventory::iter::<DeclarationSource>
            .into_iter()
            .any(|source| source.type_name == "SourceProbe");
        assert!(found);
    }

    #[test]
    fn loader_yields_declarations() {
        let source = inventory::iter::<DeclarationSource>
            .into_iter()
            .find(|source| source.type_name == "SourceProbe")
            .unwrap();
        let decls = (source.load)().unwrap();
        assert_eq!(decls.len(), 1);
        assert_eq!(decls[0].slot(), &SlotId::new("SourceProbe", "marker"));
    }
}
