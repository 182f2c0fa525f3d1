//! Argbind - declarative command-line argument binding
//!
//! Consumer types describe their bindable slots through `DeclarationSource`s
//! collected at link time, register live instances on a `Context`, and a
//! single `initialize` call resolves raw tokens against the declarations and
//! writes supplied-or-default values onto every matching instance.

pub mod bindable;
pub mod context;
pub mod declaration;
pub mod error;
pub mod registry;
pub mod source;
pub mod store;
mod tokens;

pub use bindable::{share, Bindable, SharedBindable};
pub use context::Context;
pub use declaration::{ArgValue, Declaration, FromArgValue, Names, SlotId, ValueKind};
pub use error::{ArgError, FixSuggestion};
pub use registry::Registry;
pub use source::{DeclarationSource, SourceLoader};
pub use store::InstanceStore;

/// Re-exported so consumers can `submit!` sources without a direct dependency
pub use inventory;
