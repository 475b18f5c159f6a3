use serde::{Deserialize, Serialize};

/// Row of `users`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    pub id: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub names: Option<String>,
    pub surnames: Option<String>,
    pub rol_name: Option<String>,
    pub client_id: Option<String>,
    pub institution_id: Option<String>,
    pub company_id: Option<String>,
    pub first_login: Option<bool>,
    #[serde(rename = "tokenReset")]
    pub token_reset: Option<String>,
}

impl User {
    pub fn display_name_or(&self, fallback: &str) -> String {
        self.display_name
            .clone()
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| fallback.to_string())
    }

    /// Address usable as a mail recipient.
    pub fn deliverable_email(&self) -> Option<&str> {
        self.email.as_deref().filter(|e| e.contains('@'))
    }
}

/// `id, email, display_name` projection used for recipient lists.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UserSummary {
    pub id: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
}

impl UserSummary {
    pub fn deliverable_email(&self) -> Option<&str> {
        self.email.as_deref().filter(|e| e.contains('@'))
    }
}

/// Insert payload for `users` created through sign-up.
#[derive(Debug, Clone, Serialize)]
pub struct NewUser {
    pub id: String,
    pub email: String,
    pub first_login: bool,
    pub institution_id: Option<String>,
    pub names: String,
    pub surnames: String,
    pub enable: bool,
    pub rol_name: String,
    pub company_id: Option<String>,
    pub phone_number: String,
    pub photo_url: Option<String>,
    pub register_by_email: String,
    pub title: String,
    pub hourly_rates: bool,
    pub hour_value: f64,
    pub category: String,
    pub register_by_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn token_reset_keeps_camel_case_column() {
        let user: User = serde_json::from_value(json!({
            "id": "u1",
            "email": "ana@estudio.ec",
            "tokenReset": "abc",
            "unknown_column": 1
        }))
        .unwrap();
        assert_eq!(user.token_reset.as_deref(), Some("abc"));
        assert!(user.display_name.is_none());
    }

    #[test]
    fn deliverable_email_requires_at_sign() {
        let mut user = User { email: Some("nobody".to_string()), ..Default::default() };
        assert!(user.deliverable_email().is_none());
        user.email = Some("ana@estudio.ec".to_string());
        assert_eq!(user.deliverable_email(), Some("ana@estudio.ec"));
    }

    #[test]
    fn display_name_fallback() {
        let user = User { display_name: Some(String::new()), ..Default::default() };
        assert_eq!(user.display_name_or("Usuario desconocido"), "Usuario desconocido");
    }
}
