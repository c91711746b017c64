/// Static metadata of one record field.
///
/// Emitted by `#[derive(Record)]` as a `'static` slice per record type, so
/// the schema is built once at compile time and shared by every conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Rust field name (for observability — logs, errors).
    pub name: &'static str,
    /// `pub` fields are exported. Non-exported fields are never mapped.
    pub exported: bool,
    /// `(namespace, raw tag value)` pairs, e.g. `("json", "aa,omitempty")`.
    pub tags: &'static [(&'static str, &'static str)],
}

impl FieldDescriptor {
    pub const fn new(
        name: &'static str,
        exported: bool,
        tags: &'static [(&'static str, &'static str)],
    ) -> Self {
        Self {
            name,
            exported,
            tags,
        }
    }

    /// Raw tag value under `namespace`, if the field declares one.
    pub fn lookup(&self, namespace: &str) -> Option<&'static str> {
        self.tags
            .iter()
            .find(|(ns, _)| *ns == namespace)
            .map(|(_, v)| *v)
    }
}
