use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;
use std::sync::Arc;

use crate::hook::HookOutputs;
use crate::schema::FieldDescriptor;
use crate::value::{Complex, IntoValue, Value};

/// Runtime kind of a field value, as seen by the converter.
///
/// Strategy by kind:
/// - Pointer: resolved before anything else; an empty pointer skips the field
/// - Record: converted recursively
/// - Scalars: widened to the matching [`Value`] variant
/// - Container, Any: already generic, passed through untouched
/// - Unsupported: silently dropped
pub enum Kind<'a> {
    /// `Option`, `Box`, `Rc`, `Arc`. `None` is a null pointer.
    Pointer(Option<&'a dyn Field>),
    Record(&'a dyn Record),
    Int(i64),
    Uint(u64),
    Float(f64),
    Complex(Complex),
    Bool(bool),
    Str(&'a str),
    /// Sequence, array, set or map, already converted element by element.
    Container(Value),
    /// Dynamically typed value (`Value`, `serde_json::Value`).
    Any(Value),
    /// Functions and other values with no generic representation.
    Unsupported(&'static str),
}

impl Kind<'_> {
    pub fn name(&self) -> &'static str {
        match self {
            Kind::Pointer(_) => "ptr",
            Kind::Record(_) => "struct",
            Kind::Int(_) => "int",
            Kind::Uint(_) => "uint",
            Kind::Float(_) => "float",
            Kind::Complex(_) => "complex",
            Kind::Bool(_) => "bool",
            Kind::Str(_) => "string",
            Kind::Container(_) => "container",
            Kind::Any(_) => "interface",
            Kind::Unsupported(name) => name,
        }
    }
}

impl fmt::Debug for Kind<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A value that can sit in a record field.
///
/// Implemented for scalars, strings, pointer-like wrappers and std
/// containers. `#[derive(Record)]` implements it for records. Implement it
/// by hand for newtypes that need a hook or a custom kind.
pub trait Field {
    fn kind(&self) -> Kind<'_>;

    /// Whether the value is the zero value of its type (`omitempty`).
    fn is_zero(&self) -> bool;

    /// Invoke the zero-argument hook named `method`, if this type has one.
    fn hook(&self, _method: &str) -> Option<HookOutputs> {
        None
    }
}

/// A struct-like aggregate with a static schema.
///
/// Usually derived: `#[derive(Record)]`.
pub trait Record {
    /// Type name (for observability — logs).
    fn type_name(&self) -> &'static str;

    /// Field descriptors in declaration order.
    fn fields(&self) -> &'static [FieldDescriptor];

    /// Value of the field at `index` in [`Record::fields`].
    fn field(&self, index: usize) -> Option<&dyn Field>;
}

/// Follow pointer indirection until a non-pointer value.
///
/// Returns the value together with its kind, so containers are converted
/// only once. Returns `None` as soon as a null pointer is met.
pub fn resolve<'a>(mut value: &'a dyn Field) -> Option<(&'a dyn Field, Kind<'a>)> {
    loop {
        match value.kind() {
            Kind::Pointer(Some(inner)) => value = inner,
            Kind::Pointer(None) => return None,
            kind => return Some((value, kind)),
        }
    }
}

// ---------------------------------------------------------------------------
// Scalars
// ---------------------------------------------------------------------------

macro_rules! scalar_field {
    ($kind:ident, $wide:ty: $($ty:ty),*) => {
        $(
            impl Field for $ty {
                fn kind(&self) -> Kind<'_> {
                    Kind::$kind(*self as $wide)
                }

                fn is_zero(&self) -> bool {
                    *self == 0
                }
            }
        )*
    };
}

scalar_field!(Int, i64: i8, i16, i32, i64, isize);
scalar_field!(Uint, u64: u8, u16, u32, u64, usize);

// Floats compare bits: `-0.0` is not zero.
impl Field for f32 {
    fn kind(&self) -> Kind<'_> {
        Kind::Float(f64::from(*self))
    }

    fn is_zero(&self) -> bool {
        self.to_bits() == 0
    }
}

impl Field for f64 {
    fn kind(&self) -> Kind<'_> {
        Kind::Float(*self)
    }

    fn is_zero(&self) -> bool {
        self.to_bits() == 0
    }
}

impl Field for bool {
    fn kind(&self) -> Kind<'_> {
        Kind::Bool(*self)
    }

    fn is_zero(&self) -> bool {
        !*self
    }
}

impl Field for Complex {
    fn kind(&self) -> Kind<'_> {
        Kind::Complex(*self)
    }

    fn is_zero(&self) -> bool {
        Complex::is_zero(self)
    }
}

impl Field for String {
    fn kind(&self) -> Kind<'_> {
        Kind::Str(self)
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl Field for str {
    fn kind(&self) -> Kind<'_> {
        Kind::Str(self)
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl Field for Cow<'_, str> {
    fn kind(&self) -> Kind<'_> {
        Kind::Str(self)
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Any-kind values: zero only when null, like an empty interface
// ---------------------------------------------------------------------------

impl Field for Value {
    fn kind(&self) -> Kind<'_> {
        Kind::Any(self.clone())
    }

    fn is_zero(&self) -> bool {
        self.is_null()
    }
}

impl Field for serde_json::Value {
    fn kind(&self) -> Kind<'_> {
        Kind::Any(Value::from(self.clone()))
    }

    fn is_zero(&self) -> bool {
        self.is_null()
    }
}

// ---------------------------------------------------------------------------
// Pointers: non-null wrappers are never zero
// ---------------------------------------------------------------------------

impl<T: Field> Field for Option<T> {
    fn kind(&self) -> Kind<'_> {
        Kind::Pointer(self.as_ref().map(|v| v as &dyn Field))
    }

    fn is_zero(&self) -> bool {
        self.is_none()
    }
}

macro_rules! pointer_field {
    ($($ptr:ident),*) => {
        $(
            impl<T: Field> Field for $ptr<T> {
                fn kind(&self) -> Kind<'_> {
                    Kind::Pointer(Some(&**self as &dyn Field))
                }

                fn is_zero(&self) -> bool {
                    false
                }
            }
        )*
    };
}

pointer_field!(Box, Rc, Arc);

/// Borrowed values are transparent: a reference is never null.
impl<T: Field + ?Sized> Field for &T {
    fn kind(&self) -> Kind<'_> {
        (**self).kind()
    }

    fn is_zero(&self) -> bool {
        (**self).is_zero()
    }

    fn hook(&self, method: &str) -> Option<HookOutputs> {
        (**self).hook(method)
    }
}

// ---------------------------------------------------------------------------
// Containers: passed through as generic values
// ---------------------------------------------------------------------------

impl<T: IntoValue> Field for Vec<T> {
    fn kind(&self) -> Kind<'_> {
        Kind::Container(self.to_value())
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl<T: IntoValue + Field, const N: usize> Field for [T; N] {
    fn kind(&self) -> Kind<'_> {
        Kind::Container(self.to_value())
    }

    /// An array is zero when every element is.
    fn is_zero(&self) -> bool {
        self.iter().all(Field::is_zero)
    }
}

impl<T: IntoValue> Field for VecDeque<T> {
    fn kind(&self) -> Kind<'_> {
        Kind::Container(self.to_value())
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl<T: IntoValue, S> Field for HashSet<T, S> {
    fn kind(&self) -> Kind<'_> {
        Kind::Container(self.to_value())
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl<T: IntoValue> Field for BTreeSet<T> {
    fn kind(&self) -> Kind<'_> {
        Kind::Container(self.to_value())
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl<K: fmt::Display, V: IntoValue, S> Field for HashMap<K, V, S> {
    fn kind(&self) -> Kind<'_> {
        Kind::Container(self.to_value())
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl<K: fmt::Display, V: IntoValue> Field for BTreeMap<K, V> {
    fn kind(&self) -> Kind<'_> {
        Kind::Container(self.to_value())
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Unsupported kinds
// ---------------------------------------------------------------------------

impl<R> Field for fn() -> R {
    fn kind(&self) -> Kind<'_> {
        Kind::Unsupported("func")
    }

    fn is_zero(&self) -> bool {
        false
    }
}

impl<T: ?Sized> Field for PhantomData<T> {
    fn kind(&self) -> Kind<'_> {
        Kind::Unsupported("phantom")
    }

    fn is_zero(&self) -> bool {
        true
    }
}

impl Field for () {
    fn kind(&self) -> Kind<'_> {
        Kind::Unsupported("unit")
    }

    fn is_zero(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_follows_every_layer() {
        let v: Option<Box<i32>> = Some(Box::new(5));
        let (inner, kind) = resolve(&v).unwrap();
        assert!(matches!(kind, Kind::Int(5)));
        assert!(!inner.is_zero());

        let nested: Option<Option<u8>> = Some(None);
        assert!(resolve(&nested).is_none());
    }

    #[test]
    fn zero_values() {
        assert!(0u32.is_zero());
        assert!(String::new().is_zero());
        assert!(Option::<i32>::None.is_zero());
        assert!(!Some(0i32).is_zero());
        assert!(!Box::new(0i32).is_zero());
        assert!(Vec::<u8>::new().is_zero());
        assert!([0u8; 3].is_zero());
        assert!(![0u8, 1].is_zero());
        assert!(Field::is_zero(&Value::Null));
        assert!(!Field::is_zero(&Value::Int(0)));
        assert!(Field::is_zero(&""));
    }

    #[test]
    fn zero_is_bitwise_for_floats() {
        assert!(0.0f64.is_zero());
        assert!(0.0f32.is_zero());
        assert!(!(-0.0f64).is_zero());
        assert!(!(-0.0f32).is_zero());
        assert!(Field::is_zero(&Complex::new(0.0, 0.0)));
        assert!(!Field::is_zero(&Complex::new(-0.0, 0.0)));
        assert!(!Field::is_zero(&Complex::new(0.0, -0.0)));
    }

    #[test]
    fn arrays_ask_each_element() {
        assert!([None::<i32>, None].is_zero());
        assert!(![Some(0i32)].is_zero());
        assert!([Value::Null].is_zero());
        assert!(![Value::Int(0)].is_zero());
        assert!(![-0.0f64].is_zero());
    }

    #[test]
    fn kind_names() {
        assert_eq!(3i8.kind().name(), "int");
        assert_eq!("x".kind().name(), "string");
        assert_eq!(vec![1u8].kind().name(), "container");
        let f: fn() -> u8 = || 1;
        assert_eq!(f.kind().name(), "func");
    }
}
