use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One discrete screen of the client. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    Login,
    Register,
    Dashboard,
    Profile,
    Settings,
}

impl View {
    pub fn label(self) -> &'static str {
        match self {
            View::Login => "Login",
            View::Register => "Register",
            View::Dashboard => "Dashboard",
            View::Profile => "Profile",
            View::Settings => "Settings",
        }
    }

    /// Views that may only be shown while an identity is logged in.
    pub fn requires_session(self) -> bool {
        matches!(self, View::Dashboard | View::Profile | View::Settings)
    }
}

/// Profile fields exactly as the backend returned them.
///
/// The client does not interpret the map beyond the `username` field; the
/// profile view renders whatever keys are present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileData(pub Map<String, Value>);

impl ProfileData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accepts only JSON objects; anything else is not a profile.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self(fields)),
            _ => None,
        }
    }

    pub fn username(&self) -> Option<&str> {
        self.0
            .get("username")
            .and_then(Value::as_str)
            .filter(|username| !username.is_empty())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
