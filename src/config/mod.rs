use chrono_tz::Tz;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

pub const DEFAULT_TIMEZONE: Tz = chrono_tz::America::Guayaquil;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub supabase: SupabaseConfig,
    pub smtp: SmtpConfig,
    pub branding: BrandingConfig,
    pub security: SecurityConfig,
    pub report: ReportConfig,
    pub server: ServerConfig,
}

/// Which credential set the deployment was provisioned with.
///
/// A deployment is `Production` when its public key (`SB_KEY`) is the
/// hosted project's anon key. Requests may still opt into the development
/// path by sending `"test": true` in the body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SupabaseConfig {
    /// SUPABASE_URL - public project URL used with forwarded user tokens
    pub url: String,
    /// SUPABASE_ANON_KEY
    pub anon_key: String,
    /// SUPABASE_SERVICE_ROLE_KEY
    pub service_role_key: String,
    /// SB_URL - project URL used with service credentials
    pub sb_url: String,
    /// SB_KEY
    pub sb_key: String,
    /// SB_SERVICE_ROLE
    pub sb_service_role: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub sender_name: String,
    pub sender_email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrandingConfig {
    pub app_name: String,
    pub app_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub reset_secret: String,
    pub reset_token_ttl_secs: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    pub timezone: String,
    pub logo_bucket: String,
    pub logo_path: String,
    pub files_bucket: String,
    pub footer_lines: Vec<String>,
    pub signature_lines: Vec<String>,
    pub signed_url_ttl_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
}

impl SupabaseConfig {
    /// Production branch for a single request.
    pub fn is_production(&self, test: bool) -> bool {
        !self.sb_key.is_empty() && self.sb_key == self.anon_key && !test
    }
}

impl ReportConfig {
    pub fn tz(&self) -> Tz {
        self.timezone.parse().unwrap_or(DEFAULT_TIMEZONE)
    }
}

impl SmtpConfig {
    pub fn from_header(&self) -> String {
        format!("{} <{}>", self.sender_name, self.sender_email)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            environment: Environment::Development,
            supabase: SupabaseConfig::default(),
            smtp: SmtpConfig {
                host: "smtp.sendgrid.net".to_string(),
                port: 587,
                user: "apikey".to_string(),
                password: String::new(),
                sender_name: "AION".to_string(),
                sender_email: "no-reply@localhost".to_string(),
            },
            branding: BrandingConfig {
                app_name: "AION".to_string(),
                app_url: "http://localhost:5173/".to_string(),
            },
            security: SecurityConfig {
                reset_secret: String::new(),
                reset_token_ttl_secs: 60 * 60,
            },
            report: ReportConfig {
                timezone: DEFAULT_TIMEZONE.name().to_string(),
                logo_bucket: "assets".to_string(),
                logo_path: "landing/under_construction/logo_quezada.png".to_string(),
                files_bucket: "files".to_string(),
                footer_lines: Vec::new(),
                signature_lines: Vec::new(),
                signed_url_ttl_secs: 3600,
            },
            server: ServerConfig { port: 3000 },
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default().with_env_overrides();
        config.environment = if config.supabase.is_production(false) {
            Environment::Production
        } else {
            Environment::Development
        };
        config
    }

    /// Settings that leave some routes unable to work.
    pub fn warnings(&self) -> Vec<&'static str> {
        let mut warnings = Vec::new();
        if self.security.reset_secret.is_empty() {
            warnings.push("SECRET_JWT is not set; forgot-password requests will fail");
        }
        if self.supabase.sb_url.is_empty() || self.supabase.sb_service_role.is_empty() {
            warnings.push("SB_URL or SB_SERVICE_ROLE is not set; development requests and sweeps will fail");
        }
        if self.smtp.password.is_empty() {
            warnings.push("SENDGRID_API_KEY is not set; outgoing email will be rejected by the relay");
        }
        warnings
    }

    fn with_env_overrides(mut self) -> Self {
        // Supabase credentials
        if let Ok(v) = env::var("SUPABASE_URL") {
            self.supabase.url = v;
        }
        if let Ok(v) = env::var("SUPABASE_ANON_KEY") {
            self.supabase.anon_key = v;
        }
        if let Ok(v) = env::var("SUPABASE_SERVICE_ROLE_KEY") {
            self.supabase.service_role_key = v;
        }
        if let Ok(v) = env::var("SB_URL") {
            self.supabase.sb_url = v;
        }
        if let Ok(v) = env::var("SB_KEY") {
            self.supabase.sb_key = v;
        }
        if let Ok(v) = env::var("SB_SERVICE_ROLE") {
            self.supabase.sb_service_role = v;
        }

        // SMTP relay
        if let Ok(v) = env::var("SENDGRID_HOST") {
            self.smtp.host = v;
        }
        if let Ok(v) = env::var("SENDGRID_PORT") {
            self.smtp.port = v.parse().unwrap_or(self.smtp.port);
        }
        if let Ok(v) = env::var("SENDGRID_USER") {
            self.smtp.user = v;
        }
        if let Ok(v) = env::var("SENDGRID_API_KEY") {
            self.smtp.password = v;
        }
        if let Ok(v) = env::var("SENDGRID_SENDER_NAME") {
            self.smtp.sender_name = v;
        }
        if let Ok(v) = env::var("SENDGRID_SENDER_EMAIL") {
            self.smtp.sender_email = v;
        }

        // Branding
        if let Ok(v) = env::var("AION_NAME") {
            self.branding.app_name = v;
        }
        if let Ok(v) = env::var("AION_URL") {
            self.branding.app_url = v;
        }

        // Security
        if let Ok(v) = env::var("SECRET_JWT") {
            self.security.reset_secret = v;
        }

        // Reports
        if let Ok(v) = env::var("REPORT_TIMEZONE") {
            self.report.timezone = v;
        }
        if let Ok(v) = env::var("REPORT_LOGO_BUCKET") {
            self.report.logo_bucket = v;
        }
        if let Ok(v) = env::var("REPORT_LOGO_PATH") {
            self.report.logo_path = v;
        }
        if let Ok(v) = env::var("REPORT_FILES_BUCKET") {
            self.report.files_bucket = v;
        }
        if let Ok(v) = env::var("REPORT_FOOTER_LINES") {
            self.report.footer_lines = split_lines(&v);
        }
        if let Ok(v) = env::var("REPORT_SIGNATURE_LINES") {
            self.report.signature_lines = split_lines(&v);
        }
        if let Ok(v) = env::var("REPORT_SIGNED_URL_TTL_SECS") {
            self.report.signed_url_ttl_secs = v.parse().unwrap_or(self.report.signed_url_ttl_secs);
        }

        // Server
        if let Some(port) = env::var("AION_API_PORT")
            .ok()
            .or_else(|| env::var("PORT").ok())
            .and_then(|s| s.parse::<u16>().ok())
        {
            self.server.port = port;
        }

        self
    }
}

fn split_lines(raw: &str) -> Vec<String> {
    raw.split('|')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.security.reset_token_ttl_secs, 3600);
        assert_eq!(config.report.files_bucket, "files");
        assert_eq!(config.report.tz(), chrono_tz::America::Guayaquil);
    }

    #[test]
    fn missing_reset_secret_is_reported() {
        let mut config = AppConfig::default();
        assert!(config.warnings().iter().any(|w| w.starts_with("SECRET_JWT")));

        config.security.reset_secret = "s3cret".to_string();
        config.supabase.sb_url = "http://localhost:54321".to_string();
        config.supabase.sb_service_role = "service".to_string();
        config.smtp.password = "SG.key".to_string();
        assert!(config.warnings().is_empty());
    }

    #[test]
    fn test_production_requires_matching_anon_key() {
        let mut supabase = SupabaseConfig {
            anon_key: "anon".to_string(),
            sb_key: "anon".to_string(),
            ..Default::default()
        };
        assert!(supabase.is_production(false));
        assert!(!supabase.is_production(true));

        supabase.sb_key = "other".to_string();
        assert!(!supabase.is_production(false));
    }

    #[test]
    fn test_empty_keys_are_never_production() {
        let supabase = SupabaseConfig::default();
        assert!(!supabase.is_production(false));
    }

    #[test]
    fn test_split_lines() {
        assert_eq!(
            split_lines("Av. Amazonas | Quito || Ecuador "),
            vec!["Av. Amazonas", "Quito", "Ecuador"]
        );
        assert!(split_lines("").is_empty());
    }

    #[test]
    fn test_unknown_timezone_falls_back() {
        let mut report = AppConfig::default().report;
        report.timezone = "Mars/Olympus".to_string();
        assert_eq!(report.tz(), DEFAULT_TIMEZONE);
    }

    #[test]
    fn test_from_header() {
        let smtp = AppConfig::default().smtp;
        assert_eq!(smtp.from_header(), "AION <no-reply@localhost>");
    }
}
