//! Tag-driven conversion of records into generic string-keyed maps.
//!
//! A record describes its fields once, at compile time, with
//! `#[derive(Record)]`. Each field carries tags per namespace:
//!
//! ```ignore
//! use structmap::{Record, struct_to_map};
//!
//! #[derive(Record)]
//! pub struct Filter {
//!     #[tag(json = "name,wildcard", map = "n")]
//!     pub name: String,
//!     #[tag(json = "age,omitempty")]
//!     pub age: Option<u32>,
//!     #[tag(json = "page,dive")]
//!     pub page: Page,
//! }
//!
//! let map = struct_to_map(&filter, "json", "")?;
//! ```
//!
//! Tag value format: `key,option,option`. Options: `-` (ignore),
//! `omitempty`, `dive`, `wildcard`, `dotted`. Fields without a tag in the
//! selected namespace, and non-`pub` fields, are never mapped.

extern crate self as structmap;

pub mod convert;
pub mod dispatch;
pub mod error;
pub mod field;
pub mod hook;
pub mod options;
pub mod output;
pub mod schema;
pub mod tag;
pub mod value;

pub use structmap_derive::Record;

pub use convert::{RecordExt, convert, struct_to_map};
pub use error::{Error, ErrorKind, Result};
pub use field::{Field, Kind, Record};
pub use hook::{HookOutputs, IntoHookOutputs};
pub use options::{EmptyKeyPolicy, Options};
pub use output::{query_pairs, to_json};
pub use schema::FieldDescriptor;
pub use tag::{Directive, Flags};
pub use value::{Complex, IntoValue, MappedStruct, Value};
