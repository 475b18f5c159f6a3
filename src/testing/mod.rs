//! Helpers shared by unit and integration tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use uuid::Uuid;

use crate::app::AppState;
use crate::config::AppConfig;
use crate::mail::{MailError, Mailer, OutgoingEmail};

/// Service-role key the test configuration is provisioned with.
pub const TEST_SERVICE_ROLE: &str = "test-service-role";

/// Mailer that keeps every message instead of delivering it.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<OutgoingEmail>>,
    fail: bool,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A mailer whose every send is rejected.
    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<(), MailError> {
        if self.fail {
            return Err(MailError::NoRecipients);
        }
        if !email.has_recipients() {
            return Err(MailError::NoRecipients);
        }
        self.sent.lock().unwrap_or_else(|e| e.into_inner()).push(email);
        Ok(())
    }
}

/// Development-mode configuration with both projects pointing at `base_url`.
pub fn test_config(base_url: &str) -> AppConfig {
    let mut config = AppConfig::default();
    config.supabase.url = base_url.to_string();
    config.supabase.sb_url = base_url.to_string();
    config.supabase.anon_key = "test-anon-key".to_string();
    config.supabase.service_role_key = TEST_SERVICE_ROLE.to_string();
    config.supabase.sb_service_role = TEST_SERVICE_ROLE.to_string();
    config.security.reset_secret = "test-reset-secret".to_string();
    config
}

/// Same as [`test_config`] but provisioned as production (`SB_KEY` equals the anon key).
pub fn production_config(base_url: &str) -> AppConfig {
    let mut config = test_config(base_url);
    config.supabase.sb_key = config.supabase.anon_key.clone();
    config
}

pub fn test_state(config: AppConfig, mailer: Arc<RecordingMailer>) -> AppState {
    AppState::new(config, mailer)
}

/// Random row id in the shape the backend hands out.
pub fn fixture_id() -> String {
    Uuid::new_v4().to_string()
}
