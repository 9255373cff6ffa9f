//! Presence-tracking wrapper.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::record::{FieldKind, FieldValue, NullableField, ScalarError};

/// A value that may be absent, distinguishing "omitted" from "zero".
///
/// Serializes as `null` when absent and as the inner value otherwise.
/// Deserializing `null` yields an absent value; combine with
/// `#[serde(default)]` so a missing key is absent too.
///
/// # Example
///
/// ```rust
/// use waymark_core::Nullable;
///
/// let age = Nullable::new(0_u32);
/// assert!(!age.is_null());
/// assert_eq!(serde_json::to_string(&age).unwrap(), "0");
///
/// let missing: Nullable<u32> = Nullable::null();
/// assert_eq!(serde_json::to_string(&missing).unwrap(), "null");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Nullable<V> {
    /// Whether a value was supplied.
    pub present: bool,
    /// The payload; meaningful only when `present`.
    pub value: V,
}

impl<V> Nullable<V> {
    /// Creates a present value.
    #[must_use]
    pub const fn new(value: V) -> Self {
        Self {
            present: true,
            value,
        }
    }

    /// Creates an absent value.
    #[must_use]
    pub fn null() -> Self
    where
        V: Default,
    {
        Self::default()
    }

    /// Returns true if no value was supplied.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        !self.present
    }

    /// Returns the payload if present.
    #[must_use]
    pub const fn get(&self) -> Option<&V> {
        if self.present {
            Some(&self.value)
        } else {
            None
        }
    }

    /// Converts into an `Option`.
    #[must_use]
    pub fn into_option(self) -> Option<V> {
        self.present.then_some(self.value)
    }
}

impl<V: Default> From<Option<V>> for Nullable<V> {
    fn from(value: Option<V>) -> Self {
        value.map_or_else(Self::null, Self::new)
    }
}

impl<V: Serialize> Serialize for Nullable<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.get() {
            Some(value) => value.serialize(serializer),
            None => serializer.serialize_none(),
        }
    }
}

impl<'de, V: Deserialize<'de> + Default> Deserialize<'de> for Nullable<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<V>::deserialize(deserializer).map(Self::from)
    }
}

impl<V: FieldValue> FieldValue for Nullable<V> {
    fn kind(&self) -> FieldKind {
        FieldKind::Nullable
    }

    fn set_scalar(&mut self, raw: &str) -> Result<(), ScalarError> {
        self.present = true;
        self.value.set_scalar(raw)
    }

    fn nullable_mut(&mut self) -> Option<&mut dyn NullableField> {
        Some(self)
    }

    fn is_zero(&self) -> bool {
        !self.present
    }

    fn to_wire(&self) -> String {
        self.get().map(FieldValue::to_wire).unwrap_or_default()
    }
}

impl<V: FieldValue> NullableField for Nullable<V> {
    fn mark_present(&mut self) {
        self.present = true;
    }

    fn payload_mut(&mut self) -> &mut dyn FieldValue {
        &mut self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Default, Deserialize, PartialEq)]
    #[serde(default)]
    struct Body {
        age: Nullable<i32>,
        name: Nullable<String>,
    }

    #[test]
    fn test_json_null_and_missing_are_absent() {
        let body: Body = serde_json::from_str(r#"{"age": null}"#).unwrap();
        assert!(body.age.is_null());
        assert!(body.name.is_null());
    }

    #[test]
    fn test_json_zero_is_present() {
        let body: Body = serde_json::from_str(r#"{"age": 0, "name": ""}"#).unwrap();
        assert_eq!(body.age, Nullable::new(0));
        assert_eq!(body.name.get().map(String::as_str), Some(""));
    }

    #[test]
    fn test_serialize() {
        assert_eq!(serde_json::to_string(&Nullable::new("x")).unwrap(), r#""x""#);
        assert_eq!(serde_json::to_string(&Nullable::<i32>::null()).unwrap(), "null");
    }

    #[test]
    fn test_option_conversions() {
        assert_eq!(Nullable::from(Some(5)).into_option(), Some(5));
        assert_eq!(Nullable::<i32>::from(None).into_option(), None);
    }

    #[test]
    fn test_field_value_capability() {
        let mut age: Nullable<i64> = Nullable::null();
        assert!(age.is_zero());
        assert_eq!(age.to_wire(), "");

        let nullable = age.nullable_mut().unwrap();
        nullable.mark_present();
        nullable.payload_mut().set_scalar("41").unwrap();

        assert_eq!(age, Nullable::new(41));
        assert!(!age.is_zero());
        assert_eq!(age.to_wire(), "41");
    }

    #[test]
    fn test_present_zero_renders() {
        assert_eq!(Nullable::new(0_u8).to_wire(), "0");
        assert!(!Nullable::new(0_u8).is_zero());
    }

    #[test]
    fn test_scalars_have_no_nullable_capability() {
        let mut value = String::new();
        assert!(value.nullable_mut().is_none());
    }
}
