//! Records shared by the end-to-end route tests.

#![allow(dead_code)]

use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use waymark_core::{FieldKind, FieldValue, PathTemplate, Record, ScalarError};

pub const USER_PATH: &str = "/api/users/{user_id}";

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

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

#[derive(Debug, Default, Clone, PartialEq, Record)]
pub struct UserParams {
    #[wire("user_id", scalar)]
    pub user_id: UserId,
    #[wire("search")]
    pub search: String,
    #[wire("age")]
    pub age: i32,
}

#[derive(Debug, Default, Clone, PartialEq, Record, Deserialize)]
#[serde(default)]
pub struct UserGetRequest {
    #[wire("user_id", scalar)]
    pub user_id: UserId,
    #[wire("search")]
    pub search: String,
    #[wire("age")]
    pub age: i32,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSetting {
    pub path: String,
    pub count: i64,
}

#[derive(Debug, Default, Clone, PartialEq, Record, Deserialize)]
#[serde(default)]
pub struct UserPostRequest {
    #[wire("user_id", scalar)]
    pub user_id: UserId,
    #[wire("search")]
    pub search: String,
    #[wire("age")]
    pub age: i32,
    #[wire("body")]
    pub body: String,
    #[wire("setting")]
    pub setting: UserSetting,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserGetResponse {
    pub user_id: UserId,
    pub username: String,
}

pub fn user_path() -> PathTemplate<UserParams> {
    PathTemplate::new(USER_PATH).unwrap()
}

/// Remembers the last request a handler saw.
#[derive(Debug)]
pub struct Captured<T>(Arc<Mutex<Option<T>>>);

impl<T> Clone for Captured<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T: Clone> Captured<T> {
    pub fn new() -> Self {
        Self(Arc::new(Mutex::new(None)))
    }

    pub fn store(&self, value: T) {
        *self.0.lock() = Some(value);
    }

    pub fn get(&self) -> Option<T> {
        self.0.lock().clone()
    }
}

pub const POST_BODY: &str = r#"
{
  "user_id": 33,
  "search": "search text",
  "body": "Some Body",
  "setting": {
    "path": "some path",
    "count": 8899
  }
}
"#;

pub const BAD_COUNT_BODY: &str = r#"
{
  "user_id": 33,
  "search": "search text",
  "body": "Some Body",
  "setting": {
    "path": "some path",
    "count": "mm"
  }
}
"#;
