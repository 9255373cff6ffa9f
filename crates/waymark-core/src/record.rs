//! Records and their field descriptors.
//!
//! A [`Record`] is a flat struct whose fields carry a wire name, the key
//! used for the field in path segments, query strings and JSON bodies.
//! `#[derive(Record)]` builds a static descriptor table once per type so
//! binding and URL evaluation never inspect types at request time.

use std::any::TypeId;
use std::fmt;

use serde::de::IgnoredAny;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Static description of one record field.
#[derive(Debug, Clone, Copy)]
pub struct FieldDescriptor {
    /// Rust identifier of the field.
    pub ident: &'static str,
    /// Wire annotation exactly as written, modifiers included
    /// (`"age,omitempty"`). `None` if the field has no annotation.
    pub wire: Option<&'static str>,
    /// Field type as written in the struct.
    pub type_name: &'static str,
    /// Identity of the field type.
    pub type_id: fn() -> TypeId,
    /// Whether the field exposes a [`FieldValue`].
    pub bindable: bool,
}

impl FieldDescriptor {
    /// Returns the wire name, i.e. the annotation up to the first comma.
    #[must_use]
    pub fn wire_name(&self) -> Option<&'static str> {
        self.wire
            .map(|wire| wire.split_once(',').map_or(wire, |(name, _)| name))
    }

    /// Returns true if both fields have the same type.
    #[must_use]
    pub fn same_type(&self, other: &FieldDescriptor) -> bool {
        (self.type_id)() == (other.type_id)()
    }
}

/// A flat struct with wire-named fields.
///
/// Usually implemented with `#[derive(Record)]`:
///
/// ```rust
/// use waymark_core::{Nullable, Record};
///
/// #[derive(Debug, Default, Record)]
/// struct UserParams {
///     #[wire("user_id")]
///     user_id: i64,
///     #[wire("age,omitempty")]
///     age: Nullable<u32>,
/// }
///
/// let fields = UserParams::fields();
/// assert_eq!(fields[1].wire, Some("age,omitempty"));
/// assert_eq!(fields[1].wire_name(), Some("age"));
/// ```
pub trait Record: Default + Send + 'static {
    /// Name of the struct, used in error messages.
    fn type_name() -> &'static str;

    /// Field descriptors in declaration order.
    fn fields() -> &'static [FieldDescriptor];

    /// Returns the field at `index`, or `None` for opaque fields.
    fn field(&self, index: usize) -> Option<&dyn FieldValue>;

    /// Returns the field at `index` mutably, or `None` for opaque fields.
    fn field_mut(&mut self, index: usize) -> Option<&mut dyn FieldValue>;

    /// Returns the index of the field with the given wire name.
    fn field_index(wire_name: &str) -> Option<usize> {
        Self::fields()
            .iter()
            .position(|f| f.wire_name() == Some(wire_name))
    }
}

/// Coarse classification of a bindable field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Assigned verbatim.
    Text,
    /// Base-10 signed integer.
    Signed,
    /// Base-10 unsigned integer.
    Unsigned,
    /// A [`Nullable`](crate::Nullable) wrapper around another kind.
    Nullable,
    /// Anything else, named for error messages.
    Other(&'static str),
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => f.write_str("string"),
            Self::Signed => f.write_str("int"),
            Self::Unsigned => f.write_str("uint"),
            Self::Nullable => f.write_str("nullable"),
            Self::Other(name) => f.write_str(name),
        }
    }
}

/// A raw value the field cannot hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("value is not a valid {expected}")]
pub struct ScalarError {
    /// Kind the field expected.
    pub expected: FieldKind,
}

/// A field the binder can write and templates can render.
///
/// Implemented for `String`, the primitive integers and
/// [`Nullable`](crate::Nullable). Newtype ids implement it by delegating to
/// their inner value and are marked `#[wire("name", scalar)]`.
pub trait FieldValue: Send {
    /// Kind used for binder dispatch.
    fn kind(&self) -> FieldKind;

    /// Parses `raw` into the field.
    fn set_scalar(&mut self, raw: &str) -> Result<(), ScalarError>;

    /// Nullable capability: `Some` if this field is a presence wrapper.
    fn nullable_mut(&mut self) -> Option<&mut dyn NullableField> {
        None
    }

    /// True for the zero value of the type.
    fn is_zero(&self) -> bool;

    /// String form used in URLs.
    fn to_wire(&self) -> String;
}

/// A presence flag around a payload field.
pub trait NullableField {
    /// Marks the value as present.
    fn mark_present(&mut self);

    /// Returns the wrapped payload.
    fn payload_mut(&mut self) -> &mut dyn FieldValue;
}

impl FieldValue for String {
    fn kind(&self) -> FieldKind {
        FieldKind::Text
    }

    fn set_scalar(&mut self, raw: &str) -> Result<(), ScalarError> {
        raw.clone_into(self);
        Ok(())
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }

    fn to_wire(&self) -> String {
        self.clone()
    }
}

macro_rules! int_field_value {
    ($kind:ident, $wide:ty => $($ty:ty),+) => {
        $(
            impl FieldValue for $ty {
                fn kind(&self) -> FieldKind {
                    FieldKind::$kind
                }

                fn set_scalar(&mut self, raw: &str) -> Result<(), ScalarError> {
                    let invalid = ScalarError { expected: FieldKind::$kind };
                    let wide: $wide = raw.parse().map_err(|_| invalid)?;
                    *self = <$ty>::try_from(wide).map_err(|_| invalid)?;
                    Ok(())
                }

                fn is_zero(&self) -> bool {
                    *self == 0
                }

                fn to_wire(&self) -> String {
                    self.to_string()
                }
            }
        )+
    };
}

int_field_value!(Signed, i64 => i8, i16, i32, i64, isize);
int_field_value!(Unsigned, u64 => u8, u16, u32, u64, usize);

/// A record with no fields, for templates without parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Empty;

impl Record for Empty {
    fn type_name() -> &'static str {
        "Empty"
    }

    fn fields() -> &'static [FieldDescriptor] {
        &[]
    }

    fn field(&self, _index: usize) -> Option<&dyn FieldValue> {
        None
    }

    fn field_mut(&mut self, _index: usize) -> Option<&mut dyn FieldValue> {
        None
    }
}

/// Serializes as `{}`.
impl Serialize for Empty {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_struct("Empty", 0)?.end()
    }
}

/// Accepts and discards any body.
impl<'de> Deserialize<'de> for Empty {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        IgnoredAny::deserialize(deserializer)?;
        Ok(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Nullable;

    #[derive(Debug, Default, PartialEq, crate::Record)]
    struct Sample {
        #[wire("name")]
        name: String,
        #[wire("age,omitempty")]
        age: i32,
        #[wire("counter")]
        counter: u8,
        note: String,
        #[wire("tags")]
        tags: Vec<String>,
        #[wire("score")]
        score: Nullable<i64>,
    }

    #[test]
    fn test_descriptors_follow_declaration_order() {
        let idents: Vec<_> = Sample::fields().iter().map(|f| f.ident).collect();
        assert_eq!(idents, ["name", "age", "counter", "note", "tags", "score"]);
        assert_eq!(Sample::type_name(), "Sample");
    }

    #[test]
    fn test_wire_name_strips_modifiers() {
        let fields = Sample::fields();
        assert_eq!(fields[1].wire, Some("age,omitempty"));
        assert_eq!(fields[1].wire_name(), Some("age"));
        assert_eq!(fields[3].wire_name(), None);
        assert_eq!(Sample::field_index("age"), Some(1));
        assert_eq!(Sample::field_index("note"), None);
    }

    #[test]
    fn test_opaque_fields_have_no_value() {
        let mut sample = Sample::default();
        assert!(!Sample::fields()[4].bindable);
        assert!(sample.field(4).is_none());
        assert!(sample.field_mut(4).is_none());
        assert!(sample.field(5).is_some());
        assert!(sample.field(6).is_none());
    }

    #[test]
    fn test_signed_parse_narrows() {
        let mut value: i8 = 0;
        assert!(value.set_scalar("-128").is_ok());
        assert_eq!(value, -128);
        assert_eq!(
            value.set_scalar("300"),
            Err(ScalarError {
                expected: FieldKind::Signed
            })
        );
        assert_eq!(value, -128);
    }

    #[test]
    fn test_unsigned_rejects_negative() {
        let mut value: u32 = 7;
        assert!(value.set_scalar("-1").is_err());
        assert!(value.set_scalar("A9").is_err());
        assert!(value.set_scalar("89").is_ok());
        assert_eq!(value, 89);
    }

    #[test]
    fn test_zero_values() {
        assert!(String::new().is_zero());
        assert!(!"x".to_string().is_zero());
        assert!(0_u64.is_zero());
        assert!(!(-3_i16).is_zero());
    }

    #[test]
    fn test_same_type() {
        let fields = Sample::fields();
        assert!(fields[0].same_type(&fields[3]));
        assert!(!fields[0].same_type(&fields[1]));
    }

    #[test]
    fn test_empty_record() {
        assert!(Empty::fields().is_empty());
        assert_eq!(Empty::field_index("anything"), None);
    }

    #[test]
    fn test_empty_serde() {
        assert_eq!(serde_json::to_string(&Empty).unwrap(), "{}");
        assert_eq!(serde_json::from_str::<Empty>(r#"{"a": [1, 2]}"#).unwrap(), Empty);
        assert_eq!(serde_json::from_str::<Empty>("null").unwrap(), Empty);
    }
}
