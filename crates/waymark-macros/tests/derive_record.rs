//! Integration tests for `#[derive(Record)]`.
//!
//! These exercise the generated code against the real core traits.

use std::any::TypeId;

use serde::{Deserialize, Serialize};
use waymark_core::{
    check_is_subset, FieldKind, FieldValue, Nullable, PathTemplate, Record, ScalarError,
};

/// A newtype id bound through `#[wire(.., scalar)]`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
struct UserId(i64);

impl FieldValue for UserId {
    fn kind(&self) -> FieldKind {
        FieldKind::Signed
    }

    fn set_scalar(&mut self, raw: &str) -> Result<(), ScalarError> {
        self.0.set_scalar(raw)
    }

    fn is_zero(&self) -> bool {
        self.0 == 0
    }

    fn to_wire(&self) -> String {
        self.0.to_string()
    }
}

#[derive(Debug, Default, Record)]
struct UserPath {
    #[wire("user_id", scalar)]
    user_id: UserId,
}

#[derive(Debug, Default, PartialEq, Record, Serialize, Deserialize)]
#[serde(default)]
struct UserRequest {
    #[wire("user_id", scalar)]
    user_id: UserId,
    #[wire("search")]
    search: String,
    #[wire("age,omitempty")]
    age: Nullable<u16>,
    #[wire("setting")]
    setting: Setting,
    notes: Vec<String>,
}

#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
struct Setting {
    path: String,
    count: i64,
}

#[derive(Debug, Default, Record)]
#[record(crate = "::waymark_core")]
struct Explicit {
    #[wire("q")]
    q: String,
}

#[derive(Debug, Default, Record)]
struct NoFields {}

#[test]
fn test_descriptor_table() {
    let fields = UserRequest::fields();
    assert_eq!(fields.len(), 5);

    assert_eq!(fields[0].ident, "user_id");
    assert_eq!(fields[0].type_name, "UserId");
    assert!(fields[0].bindable);
    assert_eq!((fields[0].type_id)(), TypeId::of::<UserId>());

    assert_eq!(fields[2].wire, Some("age,omitempty"));
    assert_eq!(fields[2].type_name, "Nullable<u16>");

    assert!(!fields[3].bindable);
    assert_eq!(fields[4].wire, None);
}

#[test]
fn test_descriptor_table_is_static() {
    assert!(std::ptr::eq(UserRequest::fields(), UserRequest::fields()));
}

#[test]
fn test_field_accessors_write_through() {
    let mut req = UserRequest::default();

    req.field_mut(0).unwrap().set_scalar("123").unwrap();
    req.field_mut(1).unwrap().set_scalar("text").unwrap();
    req.field_mut(2).unwrap().set_scalar("7").unwrap();

    assert_eq!(req.user_id, UserId(123));
    assert_eq!(req.search, "text");
    assert_eq!(req.age, Nullable::new(7));
    assert!(req.field_mut(3).is_none());
    assert_eq!(req.field(0).unwrap().to_wire(), "123");
}

#[test]
fn test_scalar_newtype_in_template_and_shape_check() {
    let path = PathTemplate::<UserPath>::new("/api/users/{user_id}").unwrap();
    assert_eq!(path.eval(&UserPath { user_id: UserId(9) }), "/api/users/9");

    check_is_subset::<UserRequest, UserPath>().unwrap();
}

#[test]
fn test_serde_derive_coexists() {
    let req: UserRequest = serde_json::from_str(
        r#"{"user_id": 33, "search": "s", "setting": {"path": "p", "count": 8899}}"#,
    )
    .unwrap();

    assert_eq!(req.user_id, UserId(33));
    assert!(req.age.is_null());
    assert_eq!(req.setting.count, 8899);
}

#[test]
fn test_crate_attribute_and_empty_struct() {
    assert_eq!(Explicit::type_name(), "Explicit");
    assert_eq!(Explicit::field_index("q"), Some(0));
    assert!(NoFields::fields().is_empty());
    assert!(NoFields::default().field(0).is_none());
}
