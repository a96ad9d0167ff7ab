//! # sborcodec-core
//!
//! Typed schema combinators over the SBOR value tree a ledger gateway
//! returns. A schema is built once from the [`s`] factory, then used to turn
//! untyped trees into strongly-shaped values or reject them with a
//! path-qualified [`SborError`].
//!
//! ```
//! use sborcodec_core::{s, Schema, SborKind, SborValue};
//!
//! let balance = s::structure((("resource", s::address()), ("amount", s::decimal())));
//! let value = SborValue::tuple(vec![
//!     SborValue::reference("resource_rdx1abc").named("resource"),
//!     SborValue::integer(SborKind::U8, "1").unwrap().named("amount"),
//! ]);
//! let err = balance.safe_parse(&value).unwrap_err();
//! assert_eq!(err.path, vec!["amount"]);
//! ```

pub mod collection;
pub mod definition;
pub mod error;
pub mod factory;
pub mod leaf;
pub mod number;
pub mod option;
pub mod options;
pub mod path;
pub mod recursive;
pub mod schema;
pub mod structure;
pub mod tuple;
pub mod types;
pub mod value;
pub mod variant;

pub use definition::{DefinitionMeta, SchemaDefinition, SchemaRegistry};
pub use error::{BatchParseError, RegistryError, SborError, SborErrorKind};
pub use factory as s;
pub use number::Integer;
pub use options::{ErrorMode, ParseOptions};
pub use path::Path;
pub use recursive::{Recursive, RecursiveRef};
pub use schema::{BoxedSchema, PayloadSchema, Schema};
pub use types::{DynSchema, ParsedValue, PayloadType, SchemaType};
pub use value::{KindSet, MapEntry, SborKind, SborNode, SborValue};
pub use variant::{EnumValue, Variant};
