use crate::dispatch::dispatch;
use crate::error::{Error, Result};
use crate::field::{Field, Kind, Record, resolve};
use crate::hook::try_override;
use crate::options::{EmptyKeyPolicy, Options};
use crate::schema::FieldDescriptor;
use crate::tag::{Directive, parse_tag};
use crate::value::{MappedStruct, Value};

/// Map a record by its tags.
///
/// `tag` selects the tag namespace (`json`, `map`, or anything else declared
/// with `#[tag(...)]`). `method` names the override hook; pass `""` to
/// disable hooks. Options:
///   - `omitempty` to omit zero-valued fields
///   - `dive` to map a nested record's fields directly into the parent map
///   - `wildcard` to wrap a string value in `%`
///   - `dotted` to map a nested record's fields as `parent.child`
///
/// ```ignore
/// #[derive(Record)]
/// struct A {
///     #[tag(json = "aa")]
///     pub aa: String,
///     #[tag(json = "b,dotted")]
///     pub b: B,
/// }
///
/// #[derive(Record)]
/// struct B {
///     #[tag(json = "c")]
///     pub c: String,
/// }
///
/// // {"aa": .., "b.c": ..}; with `b,dive`: {"aa": .., "c": ..}
/// let map = struct_to_map(&a, "json", "")?;
/// ```
pub fn struct_to_map<T: Field>(data: &T, tag: &str, method: &str) -> Result<MappedStruct> {
    Converter {
        tag,
        method,
        empty_key: EmptyKeyPolicy::default(),
    }
    .run(data)
}

/// Map a record using [`Options`].
pub fn convert<T: Field>(data: &T, options: &Options) -> Result<MappedStruct> {
    Converter::from(options).run(data)
}

/// Method-call form of [`struct_to_map`] for records.
pub trait RecordExt: Record + Field + Sized {
    fn to_map(&self, tag: &str, method: &str) -> Result<MappedStruct> {
        struct_to_map(self, tag, method)
    }

    fn to_map_with(&self, options: &Options) -> Result<MappedStruct> {
        convert(self, options)
    }
}

impl<T: Record + Field> RecordExt for T {}

struct Converter<'o> {
    tag: &'o str,
    method: &'o str,
    empty_key: EmptyKeyPolicy,
}

impl<'o> From<&'o Options> for Converter<'o> {
    fn from(options: &'o Options) -> Self {
        Self {
            tag: &options.tag,
            method: options.method(),
            empty_key: options.empty_key,
        }
    }
}

impl Converter<'_> {
    fn run(&self, data: &dyn Field) -> Result<MappedStruct> {
        let (_, kind) = resolve(data).ok_or(Error::NilInput)?;
        let record = match kind {
            Kind::Record(record) => record,
            other => return Err(Error::NotARecord { kind: other.name() }),
        };

        tracing::debug!(record = record.type_name(), tag = %self.tag, "mapping record");
        let result = self.record(record)?;
        tracing::debug!(record = record.type_name(), keys = result.len(), "record mapped");
        Ok(result)
    }

    /// Map one record. Each call owns its map; nested results are merged
    /// into the caller's map after they are complete.
    fn record(&self, record: &dyn Record) -> Result<MappedStruct> {
        let mut result = MappedStruct::new();

        for (index, desc) in record.fields().iter().enumerate() {
            if !desc.exported {
                continue;
            }

            let directive = parse_tag(desc, self.tag);
            if directive.is_ignored() {
                continue;
            }

            let Some(value) = record.field(index) else {
                continue;
            };
            if directive.omit_empty() && value.is_zero() {
                tracing::trace!(field = desc.name, reason = "omitempty", "field skipped");
                continue;
            }

            let Some((value, kind)) = resolve(value) else {
                tracing::trace!(field = desc.name, reason = "nil", "field skipped");
                continue;
            };

            if let Some((key, value)) = try_override(value, self.method)? {
                if !key.is_empty() {
                    tracing::trace!(field = desc.name, %key, method = %self.method, "field overridden");
                    result.insert(key, value);
                    continue;
                }
            }

            match kind {
                Kind::Record(nested) => {
                    let nested = self.record(nested)?;
                    if directive.dive() {
                        result.extend(nested);
                    } else if directive.dotted() {
                        let key = self.key(desc, &directive)?;
                        result.extend(
                            nested
                                .into_iter()
                                .map(|(k, v)| (format!("{key}.{k}"), v)),
                        );
                    } else {
                        let key = self.key(desc, &directive)?;
                        result.insert(key.to_string(), Value::Map(nested));
                    }
                }
                kind => {
                    let kind_name = kind.name();
                    match dispatch(kind, &directive) {
                        Some(value) => {
                            let key = self.key(desc, &directive)?;
                            result.insert(key.to_string(), value);
                        }
                        None => {
                            tracing::trace!(field = desc.name, kind = kind_name, "field dropped");
                        }
                    }
                }
            }
        }

        Ok(result)
    }

    fn key<'d>(&self, desc: &FieldDescriptor, directive: &Directive<'d>) -> Result<&'d str> {
        if !directive.key.is_empty() {
            return Ok(directive.key);
        }
        match self.empty_key {
            EmptyKeyPolicy::Keep => {
                tracing::warn!(field = desc.name, tag = %self.tag, "field mapped under an empty key");
                Ok(directive.key)
            }
            EmptyKeyPolicy::Reject => Err(Error::EmptyKey {
                field: desc.name,
                tag: self.tag.to_string(),
            }),
        }
    }
}
