//! The field binder.
//!
//! Walks a record's descriptors and writes raw string values into the
//! fields whose wire names are in the filter.

use waymark_core::{FieldDescriptor, FieldKind, FieldValue, PathTemplate, Record};
use waymark_router::Params;

use crate::error::BindError;
use crate::source::{QuerySource, RouteSource, ValueSource};

/// Binds values from `source` into `record`.
///
/// Only fields whose wire name is in `wire_names` are considered. A missing
/// or empty value leaves the field untouched. Fields are visited in
/// declaration order and the first failure stops binding; fields assigned
/// before it keep their new values.
///
/// # Errors
///
/// [`BindError::Parse`] when a value does not fit its field, and
/// [`BindError::UnrecognizedFieldType`] when a non-empty value targets a
/// field with no string mapping.
///
/// # Example
///
/// ```rust
/// use std::collections::HashMap;
/// use waymark_core::Record;
/// use waymark_extract::bind;
///
/// #[derive(Debug, Default, Record)]
/// struct Filter {
///     #[wire("name")]
///     name: String,
///     #[wire("limit")]
///     limit: u32,
/// }
///
/// let values = HashMap::from([
///     ("name".to_string(), "user01".to_string()),
///     ("limit".to_string(), "20".to_string()),
/// ]);
///
/// let mut filter = Filter::default();
/// bind(&mut filter, &["name", "limit"], &values).unwrap();
/// assert_eq!(filter.name, "user01");
/// assert_eq!(filter.limit, 20);
/// ```
pub fn bind<R, S>(record: &mut R, wire_names: &[&str], source: &S) -> Result<(), BindError>
where
    R: Record,
    S: ValueSource + ?Sized,
{
    for (index, descriptor) in R::fields().iter().enumerate() {
        let Some(name) = descriptor.wire_name() else {
            continue;
        };
        if !wire_names.contains(&name) {
            continue;
        }
        let Some(raw) = source.value(name) else {
            continue;
        };
        if raw.is_empty() {
            continue;
        }

        match record.field_mut(index) {
            Some(field) => assign(field, descriptor, &raw)?,
            None => {
                return Err(BindError::UnrecognizedFieldType {
                    field: descriptor.ident,
                    kind: descriptor.type_name.to_string(),
                })
            }
        }
    }
    Ok(())
}

/// Binds path and query values for a route.
///
/// Placeholder names of `template` read from `params`; every other wire
/// name of the template's record reads from `query`.
///
/// # Errors
///
/// Same as [`bind`].
pub fn bind_route<R, P>(
    record: &mut R,
    template: &PathTemplate<P>,
    params: &Params,
    query: Option<&str>,
) -> Result<(), BindError>
where
    R: Record,
{
    let query = QuerySource::parse(query);
    let source = RouteSource::new(template.path_params(), params, &query);
    bind(record, template.all_params(), &source)
}

fn assign(
    field: &mut dyn FieldValue,
    descriptor: &FieldDescriptor,
    raw: &str,
) -> Result<(), BindError> {
    if let Some(nullable) = field.nullable_mut() {
        nullable.mark_present();
        return assign(nullable.payload_mut(), descriptor, raw);
    }

    match field.kind() {
        FieldKind::Text | FieldKind::Signed | FieldKind::Unsigned => {
            field.set_scalar(raw).map_err(|_| BindError::Parse {
                field: descriptor.ident,
                value: raw.to_string(),
            })
        }
        kind @ (FieldKind::Nullable | FieldKind::Other(_)) => {
            Err(BindError::UnrecognizedFieldType {
                field: descriptor.ident,
                kind: kind.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use waymark_core::{Nullable, ScalarError};

    #[derive(Debug, Default, PartialEq, Record)]
    struct ReqBody {
        #[wire("name")]
        name: String,
        #[wire("age,omitempty")]
        age: i32,
        #[wire("counter")]
        counter: u32,
    }

    #[derive(Debug, Default, PartialEq, Record)]
    struct WithNullable {
        #[wire("name")]
        name: String,
        #[wire("age")]
        age: Nullable<i64>,
        #[wire("count")]
        count: Nullable<u8>,
    }

    #[derive(Debug, Default, Record)]
    struct WithOpaque {
        #[wire("name")]
        name: Vec<String>,
    }

    #[derive(Debug, Default, PartialEq)]
    struct Ratio(f64);

    impl FieldValue for Ratio {
        fn kind(&self) -> FieldKind {
            FieldKind::Other("float")
        }

        fn set_scalar(&mut self, _raw: &str) -> Result<(), ScalarError> {
            Err(ScalarError {
                expected: self.kind(),
            })
        }

        fn is_zero(&self) -> bool {
            self.0 == 0.0
        }

        fn to_wire(&self) -> String {
            self.0.to_string()
        }
    }

    #[derive(Debug, Default, Record)]
    struct WithOtherKind {
        #[wire("ratio", scalar)]
        ratio: Ratio,
    }

    fn values(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_bind_all() {
        let source = values(&[("name", "user01"), ("age", "1234"), ("counter", "89")]);
        let mut req = ReqBody::default();

        bind(&mut req, &["name", "age", "counter"], &source).unwrap();
        assert_eq!(
            req,
            ReqBody {
                name: "user01".to_string(),
                age: 1234,
                counter: 89
            }
        );
    }

    #[test]
    fn test_bind_respects_filter() {
        let source = values(&[("name", "user01"), ("age", "1234"), ("counter", "89")]);
        let mut req = ReqBody::default();

        bind(&mut req, &["name", "counter"], &source).unwrap();
        assert_eq!(req.age, 0);
        assert_eq!(req.counter, 89);
    }

    #[test]
    fn test_bind_missing_values_keep_zero() {
        let source = values(&[("name", "user01")]);
        let mut req = ReqBody::default();

        bind(&mut req, &["name", "age", "counter"], &source).unwrap();
        assert_eq!(
            req,
            ReqBody {
                name: "user01".to_string(),
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_bind_empty_value_is_absent() {
        let source = values(&[("name", ""), ("age", "")]);
        let mut req = ReqBody {
            name: "kept".to_string(),
            age: 5,
            counter: 0,
        };

        bind(&mut req, &["name", "age"], &source).unwrap();
        assert_eq!(req.name, "kept");
        assert_eq!(req.age, 5);
    }

    #[test]
    fn test_bind_not_a_number() {
        let source = values(&[("name", "user01"), ("age", "AB"), ("counter", "89")]);
        let mut req = ReqBody::default();

        let err = bind(&mut req, &["name", "age", "counter"], &source).unwrap_err();
        assert_eq!(
            err,
            BindError::Parse {
                field: "age",
                value: "AB".to_string()
            }
        );
        // Fields before the failure stay assigned, later ones are untouched.
        assert_eq!(req.name, "user01");
        assert_eq!(req.counter, 0);
    }

    #[test]
    fn test_bind_parse_error_names_rust_field() {
        #[derive(Debug, Default, Record)]
        struct Renamed {
            #[wire("user_age")]
            age: i32,
            #[wire("user_limit")]
            limit: Nullable<u16>,
        }

        let mut req = Renamed::default();
        let err = bind(&mut req, &["user_age"], &values(&[("user_age", "AB")])).unwrap_err();
        assert_eq!(
            err,
            BindError::Parse {
                field: "age",
                value: "AB".to_string()
            }
        );
        assert_eq!(err.to_string(), "can not parse value 'AB' into field 'age'");

        let mut req = Renamed::default();
        let err = bind(&mut req, &["user_limit"], &values(&[("user_limit", "x")])).unwrap_err();
        assert!(matches!(err, BindError::Parse { field: "limit", .. }));

        // Lookup goes by wire name only.
        let mut req = Renamed::default();
        bind(&mut req, &["user_age"], &values(&[("age", "AB")])).unwrap();
        assert_eq!(req.age, 0);
    }

    #[test]
    fn test_bind_unsigned_rejects_negative() {
        let source = values(&[("counter", "-1")]);
        let mut req = ReqBody::default();

        let err = bind(&mut req, &["counter"], &source).unwrap_err();
        assert_eq!(err.to_string(), "can not parse value '-1' into field 'counter'");
    }

    #[test]
    fn test_bind_signed_overflow() {
        let source = values(&[("age", "3000000000")]);
        let mut req = ReqBody::default();

        assert!(matches!(
            bind(&mut req, &["age"], &source),
            Err(BindError::Parse { field: "age", .. })
        ));
    }

    #[test]
    fn test_bind_nullable() {
        let source = values(&[("name", "user01"), ("age", "41")]);
        let mut req = WithNullable::default();

        bind(&mut req, &["name", "age", "count"], &source).unwrap();
        assert_eq!(req.age, Nullable::new(41));
        assert!(req.count.is_null());
    }

    #[test]
    fn test_bind_nullable_empty_stays_null() {
        let source = values(&[("age", "")]);
        let mut req = WithNullable::default();

        bind(&mut req, &["age"], &source).unwrap();
        assert!(req.age.is_null());
    }

    #[test]
    fn test_bind_nullable_failure_keeps_presence() {
        let source = values(&[("count", "300")]);
        let mut req = WithNullable::default();

        let err = bind(&mut req, &["count"], &source).unwrap_err();
        assert_eq!(
            err,
            BindError::Parse {
                field: "count",
                value: "300".to_string()
            }
        );
        assert!(req.count.present);
        assert_eq!(req.count.value, 0);
    }

    #[test]
    fn test_bind_opaque_field() {
        let source = values(&[("name", "x")]);
        let mut req = WithOpaque::default();

        let err = bind(&mut req, &["name"], &source).unwrap_err();
        assert_eq!(err.to_string(), "unrecognized field type 'Vec<String>' of field 'name'");
    }

    #[test]
    fn test_bind_opaque_field_without_value_is_fine() {
        let mut req = WithOpaque::default();
        bind(&mut req, &["name"], &values(&[])).unwrap();
    }

    #[test]
    fn test_bind_other_kind() {
        let source = values(&[("ratio", "0.5")]);
        let mut req = WithOtherKind::default();

        let err = bind(&mut req, &["ratio"], &source).unwrap_err();
        assert_eq!(err.to_string(), "unrecognized field type 'float' of field 'ratio'");
        assert_eq!(req.ratio, Ratio(0.0));
    }

    #[test]
    fn test_bind_route_prefers_path_for_placeholders() {
        #[derive(Debug, Default, Record)]
        struct UserParams {
            #[wire("user_id")]
            user_id: i64,
            #[wire("search")]
            search: String,
        }

        let template = PathTemplate::<UserParams>::new("/api/users/{user_id}").unwrap();
        let mut params = Params::new();
        params.push("user_id", "123");

        let mut req = UserParams::default();
        bind_route(&mut req, &template, &params, Some("user_id=5&search=%3Cdiv%3E")).unwrap();
        assert_eq!(req.user_id, 123);
        assert_eq!(req.search, "<div>");
    }
}
