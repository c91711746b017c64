use crate::field::Kind;
use crate::tag::Directive;
use crate::value::Value;

/// Convert a resolved, non-record field value into a generic value.
///
/// Returns `None` when the value is dropped: unsupported kinds, and pointers
/// or records, which the composer handles before calling this.
pub fn dispatch(kind: Kind<'_>, directive: &Directive<'_>) -> Option<Value> {
    let value = match kind {
        Kind::Container(v) | Kind::Any(v) => v,
        Kind::Int(v) => Value::Int(v),
        Kind::Uint(v) => Value::Uint(v),
        Kind::Float(v) => Value::Float(v),
        Kind::Complex(v) => Value::Complex(v),
        Kind::Bool(v) => Value::Bool(v),
        Kind::Str(s) if directive.wildcard() => Value::String(format!("%{s}%")),
        Kind::Str(s) => Value::String(s.to_string()),
        Kind::Pointer(_) | Kind::Record(_) | Kind::Unsupported(_) => return None,
    };
    Some(value)
}
