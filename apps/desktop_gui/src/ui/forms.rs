//! Editable drafts behind the form views. None of this is session state; the
//! controller only sees what a submit button turns into an event.

use client_core::AppEvent;
use serde_json::Value;
use shared::domain::ProfileData;

#[derive(Debug, Default, Clone)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    generation: u64,
}

impl LoginForm {
    pub fn submit(&mut self) -> AppEvent {
        AppEvent::LoginSubmitted {
            username: self.username.clone(),
            password: std::mem::take(&mut self.password),
        }
    }

    /// Clears the fields once per successful login.
    pub fn sync(&mut self, generation: u64) {
        if self.generation != generation {
            self.generation = generation;
            self.username.clear();
            self.password.clear();
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct RegisterForm {
    pub username: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegisterForm {
    pub fn submit(&mut self) -> AppEvent {
        AppEvent::RegisterSubmitted {
            username: self.username.clone(),
            password: std::mem::take(&mut self.password),
            confirm_password: std::mem::take(&mut self.confirm_password),
        }
    }
}

/// One row of the profile editor.
#[derive(Debug, Clone, PartialEq)]
pub enum ProfileField {
    Text { key: String, value: String },
    ReadOnly { key: String, rendered: String },
}

#[derive(Debug, Default, Clone)]
pub struct ProfileForm {
    pub fields: Vec<ProfileField>,
    loaded_from: Option<ProfileData>,
}

impl ProfileForm {
    /// Reloads the drafts whenever the controller holds a different profile.
    pub fn sync(&mut self, profile: Option<&ProfileData>) {
        if self.loaded_from.as_ref() == profile {
            return;
        }
        self.loaded_from = profile.cloned();
        self.fields = profile
            .map(|profile| {
                profile
                    .iter()
                    .map(|(key, value)| match value {
                        Value::String(text) => ProfileField::Text {
                            key: key.clone(),
                            value: text.clone(),
                        },
                        other => ProfileField::ReadOnly {
                            key: key.clone(),
                            rendered: other.to_string(),
                        },
                    })
                    .collect()
            })
            .unwrap_or_default();
    }

    /// Only editable text fields are sent back.
    pub fn edited_fields(&self) -> ProfileData {
        let mut data = ProfileData::new();
        for field in &self.fields {
            if let ProfileField::Text { key, value } = field {
                data.insert(key.clone(), value.trim().to_string());
            }
        }
        data
    }

    pub fn is_dirty(&self) -> bool {
        let Some(loaded) = &self.loaded_from else {
            return false;
        };
        self.fields.iter().any(|field| match field {
            ProfileField::Text { key, value } => {
                loaded.get(key).and_then(Value::as_str) != Some(value.trim())
            }
            ProfileField::ReadOnly { .. } => false,
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn login_form_clears_after_successful_login_generation_bump() {
        let mut form = LoginForm::default();
        form.username = "alice@mindzap.io".to_string();
        form.password = "pw".to_string();

        let AppEvent::LoginSubmitted { username, password } = form.submit() else {
            panic!("expected login submission");
        };
        assert_eq!(username, "alice@mindzap.io");
        assert_eq!(password, "pw");
        assert!(form.password.is_empty());
        assert_eq!(form.username, "alice@mindzap.io");

        form.sync(0);
        assert_eq!(form.username, "alice@mindzap.io");
        form.sync(1);
        assert!(form.username.is_empty());
    }

    #[test]
    fn profile_form_edits_only_text_fields() {
        let profile = ProfileData::from_value(json!({
            "username": "alice@mindzap.io",
            "full_name": "Alice",
            "age": 31
        }))
        .expect("object");
        let mut form = ProfileForm::default();
        form.sync(Some(&profile));
        assert!(!form.is_dirty());
        assert!(form
            .fields
            .contains(&ProfileField::ReadOnly {
                key: "age".to_string(),
                rendered: "31".to_string(),
            }));

        for field in &mut form.fields {
            if let ProfileField::Text { key, value } = field {
                if key == "full_name" {
                    *value = "Alice Liddell ".to_string();
                }
            }
        }
        assert!(form.is_dirty());

        let edited = form.edited_fields();
        assert_eq!(edited.get("full_name"), Some(&json!("Alice Liddell")));
        assert_eq!(edited.get("username"), Some(&json!("alice@mindzap.io")));
        assert!(edited.get("age").is_none());
    }

    #[test]
    fn profile_form_reloads_when_profile_changes() {
        let first = ProfileData::from_value(json!({ "username": "a@mindzap.io" })).expect("object");
        let second = ProfileData::from_value(json!({ "username": "b@mindzap.io" })).expect("object");
        let mut form = ProfileForm::default();
        form.sync(Some(&first));
        form.sync(Some(&second));
        assert_eq!(
            form.fields,
            vec![ProfileField::Text {
                key: "username".to_string(),
                value: "b@mindzap.io".to_string(),
            }]
        );
        form.sync(None);
        assert!(form.fields.is_empty());
    }

    #[test]
    fn register_form_keeps_username_after_submit() {
        let mut form = RegisterForm {
            username: "new@mindzap.io".to_string(),
            password: "pw".to_string(),
            confirm_password: "pw".to_string(),
        };
        let AppEvent::RegisterSubmitted {
            username,
            confirm_password,
            ..
        } = form.submit()
        else {
            panic!("expected register submission");
        };
        assert_eq!(username, "new@mindzap.io");
        assert_eq!(confirm_password, "pw");
        assert_eq!(form.username, "new@mindzap.io");
        assert!(form.password.is_empty() && form.confirm_password.is_empty());
    }
}
