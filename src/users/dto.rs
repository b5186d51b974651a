use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::users::{error::UserError, repo::StoreError, repo_types::NewUser};

pub const FIELDS_REQUIRED: &str = "All fields are required";
pub const NAME_REQUIRED: &str = "Name query parameter required";

/// Body of `POST /signup`.
///
/// Fields stay as raw JSON so that presence is judged by [`is_present`]
/// rather than by the extractor.
#[derive(Default, Deserialize)]
pub struct SignupRequest {
    #[serde(default)]
    pub name: Option<Value>,
    #[serde(default)]
    pub email: Option<Value>,
    #[serde(default)]
    pub age: Option<Value>,
    #[serde(default)]
    pub location: Option<Value>,
    #[serde(default)]
    pub password: Option<Value>,
}

impl std::fmt::Debug for SignupRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignupRequest")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("age", &self.age)
            .field("location", &self.location)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Signup fields that passed the presence check. The password is still in
/// clear text here and must be hashed before it reaches the store.
pub struct ValidSignup {
    pub name: String,
    pub email: String,
    pub age: i32,
    pub location: String,
    pub password: String,
}

impl std::fmt::Debug for ValidSignup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidSignup")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("age", &self.age)
            .field("location", &self.location)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl ValidSignup {
    pub fn into_new_user(self, password_hash: String) -> NewUser {
        NewUser {
            name: self.name,
            email: self.email,
            age: self.age,
            location: self.location,
            password_hash,
        }
    }
}

impl SignupRequest {
    pub fn validate(self) -> Result<ValidSignup, UserError> {
        let fields = [
            &self.name,
            &self.email,
            &self.age,
            &self.location,
            &self.password,
        ];
        if !fields.iter().all(|f| matches!(f, Some(v) if is_present(v))) {
            return Err(UserError::Validation(FIELDS_REQUIRED));
        }

        Ok(ValidSignup {
            name: text_column(self.name, "name")?,
            email: text_column(self.email, "email")?,
            age: int_column(self.age, "age")?,
            location: text_column(self.location, "location")?,
            password: text_column(self.password, "password")?,
        })
    }
}

/// JSON truthiness: `null`, `false`, `""` and zero count as missing.
pub fn is_present(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

// Scalars are rendered as text the way a text column would store them.
fn text_column(v: Option<Value>, column: &'static str) -> Result<String, UserError> {
    match v {
        Some(Value::String(s)) => Ok(s),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(Value::Bool(b)) => Ok(b.to_string()),
        _ => Err(StoreError::InvalidValue { column }.into()),
    }
}

fn int_column(v: Option<Value>, column: &'static str) -> Result<i32, UserError> {
    let parsed = match &v {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| whole_f64(n))
            .and_then(|i| i32::try_from(i).ok()),
        Some(Value::String(s)) => s.trim().parse::<i32>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| StoreError::InvalidValue { column }.into())
}

// 30.0 is the integer 30 to a JSON client
fn whole_f64(n: &serde_json::Number) -> Option<i64> {
    n.as_f64()
        .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64)
        .map(|f| f as i64)
}

#[derive(Debug, Default, Deserialize)]
pub struct ProfileQuery {
    pub name: Option<String>,
}

impl ProfileQuery {
    /// Picks the first `name` when the parameter is repeated.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let name = pairs
            .into_iter()
            .find_map(|(k, v)| (k == "name").then_some(v));
        Self { name }
    }

    pub fn validate(self) -> Result<String, UserError> {
        match self.name {
            Some(name) if !name.is_empty() => Ok(name),
            _ => Err(UserError::Validation(NAME_REQUIRED)),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
