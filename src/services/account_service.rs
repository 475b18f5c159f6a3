use serde_json::json;
use uuid::Uuid;

use crate::auth::{generate_reset_token, provisional_password, verify_reset_token, ResetClaims};
use crate::config::AppConfig;
use crate::error::ApiError;
use crate::mail::{templates, Mailer, OutgoingEmail};
use crate::models::{Company, Institution, NewUser, User};
use crate::supabase::{SupabaseClient, UserAttributes};

const NOT_AVAILABLE: &str = "N/D";

/// Fields accepted when an administrator registers a new user.
#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(default)]
pub struct SignUpRequest {
    pub email: Option<String>,
    pub institucion_id: Option<String>,
    pub company_id: Option<String>,
    pub registrado_por_id: Option<String>,
    pub nombres: Option<String>,
    pub apellidos: Option<String>,
    pub habilitado: Option<bool>,
    pub rol: Option<String>,
    pub numero_telefono: Option<String>,
    pub url_foto_perfil: Option<String>,
    pub registrado_por_email: Option<String>,
    pub titulo: Option<String>,
    pub honorarios_por_hora: Option<bool>,
    pub valor_hora: Option<f64>,
    pub categoria: Option<String>,
    pub test: bool,
}

/// Account and password flows against the `users` table and the auth server.
pub struct AccountService<'a> {
    db: &'a SupabaseClient,
    config: &'a AppConfig,
    mailer: &'a dyn Mailer,
}

impl<'a> AccountService<'a> {
    pub fn new(db: &'a SupabaseClient, config: &'a AppConfig, mailer: &'a dyn Mailer) -> Self {
        Self { db, config, mailer }
    }

    /// Re-authenticate with the old password, then set the new one.
    pub async fn change_password(
        &self,
        email: &str,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), ApiError> {
        let session = self
            .db
            .sign_in_with_password(email, old_password)
            .await
            .map_err(|e| {
                tracing::warn!("Sign-in with old password failed for {}: {}", email, e);
                ApiError::unauthorized("La contraseña anterior o email no es correcto")
            })?;

        self.registered_user(email).await?;

        self.db
            .update_user(&session.access_token, &UserAttributes::password(new_password))
            .await?;
        tracing::info!("Password changed for {}", email);
        Ok(())
    }

    /// Store a one-hour reset token on the user and mail the confirmation link.
    pub async fn forgot_password(&self, email: &str) -> Result<(), ApiError> {
        let user = self.registered_user(email).await?;

        let claims = ResetClaims::new(
            user.id.clone(),
            user.email.clone().unwrap_or_else(|| email.to_string()),
            user.display_name.clone().unwrap_or_default(),
            self.config.security.reset_token_ttl_secs,
        );
        let token = generate_reset_token(&self.config.security, &claims)
            .map_err(|e| ApiError::internal_server_error(e.to_string()))?;

        self.db
            .from("users")
            .eq("id", &user.id)
            .update(&json!({ "tokenReset": token }))
            .await?;

        self.deliver(templates::reset_link(&self.config.branding, email, &claims.nombre, &token))
            .await;
        Ok(())
    }

    /// Exchange a valid reset token for a provisional password.
    pub async fn confirm_forgot_password(&self, email: &str, token: &str) -> Result<(), ApiError> {
        let user = self.registered_user(email).await?;

        if user.token_reset.as_deref() != Some(token) {
            return Err(ApiError::unauthorized("El token de reseteo no coincide"));
        }
        if let Err(e) = verify_reset_token(&self.config.security, token) {
            tracing::warn!("Reset token rejected for {}: {}", email, e);
            return Err(ApiError::unauthorized("El token de reseteo no es correcto o expiró"));
        }

        let password = self.issue_provisional_password(&user).await?;

        self.db
            .from("users")
            .eq("id", &user.id)
            .update(&json!({ "first_login": true, "tokenReset": null }))
            .await?;

        let name = user.display_name.clone().unwrap_or_default();
        self.deliver(templates::reset_confirmation(&self.config.branding, email, &name, &password))
            .await;
        Ok(())
    }

    /// Direct reset without a token round-trip.
    pub async fn reset_password(&self, email: &str) -> Result<(), ApiError> {
        let user = self.registered_user(email).await?;
        let password = self.issue_provisional_password(&user).await?;

        self.db
            .from("users")
            .eq("id", &user.id)
            .update(&json!({ "first_login": true }))
            .await?;

        let name = user.display_name.clone().unwrap_or_default();
        self.deliver(templates::reset_confirmation(&self.config.branding, email, &name, &password))
            .await;
        Ok(())
    }

    pub async fn sign_up(&self, request: &SignUpRequest) -> Result<(), ApiError> {
        let email = required(request.email.as_deref(), "No se proporcionó un email")?;

        if self.find_user(email).await?.is_some() {
            return Err(ApiError::conflict("El usuario ya se encuentra registrado"));
        }

        let password = provisional_password();
        let identity = self.db.sign_up(email, &password).await.map_err(|e| {
            tracing::error!("Auth sign-up failed for {}: {}", email, e);
            ApiError::unauthorized(e.to_string())
        })?;
        tracing::info!("Auth user {} created", identity.id);

        let institution: Institution = self
            .db
            .from("institution")
            .eq("id", request.institucion_id.as_deref().unwrap_or_default())
            .limit(1)
            .select_one()
            .await?;

        let company = match request.company_id.as_deref().filter(|id| !id.is_empty()) {
            Some(company_id) => Some(
                self.db
                    .from("companies")
                    .eq("id", company_id)
                    .limit(1)
                    .select_one::<Company>()
                    .await?,
            ),
            None => None,
        };

        let registered_by: User = self
            .db
            .from("users")
            .eq("id", request.registrado_por_id.as_deref().unwrap_or_default())
            .limit(1)
            .select_one()
            .await?;

        let or_na = |value: &Option<String>| value.clone().unwrap_or_else(|| NOT_AVAILABLE.to_string());
        let row = NewUser {
            id: identity.id.clone(),
            email: identity.email.clone().unwrap_or_else(|| email.to_string()),
            first_login: true,
            institution_id: Some(institution.id),
            names: or_na(&request.nombres),
            surnames: or_na(&request.apellidos),
            enable: request.habilitado.unwrap_or(true),
            rol_name: or_na(&request.rol),
            company_id: company.map(|c| c.id),
            phone_number: or_na(&request.numero_telefono),
            photo_url: request.url_foto_perfil.clone(),
            register_by_email: or_na(&request.registrado_por_email),
            title: or_na(&request.titulo),
            hourly_rates: request.honorarios_por_hora.unwrap_or(true),
            hour_value: request.valor_hora.unwrap_or(0.0),
            category: or_na(&request.categoria),
            register_by_id: Some(registered_by.id),
        };
        self.db.from("users").insert_minimal(&row).await?;

        self.deliver(templates::welcome(
            &self.config.branding,
            email,
            &row.names,
            &row.surnames,
            &password,
        ))
        .await;
        Ok(())
    }

    /// Move a user to a new address, on the auth server first.
    pub async fn change_user_email(
        &self,
        admin: &SupabaseClient,
        user_id: Option<&str>,
        email: Option<&str>,
    ) -> Result<(), ApiError> {
        let user_id = required(user_id, "No se proporcionó un id de usuario")?;
        let email = required(email, "No se proporcionó un email")?;
        if Uuid::parse_str(user_id).is_err() {
            return Err(ApiError::bad_request("El id de usuario no es válido"));
        }

        let taken = self
            .db
            .from("users")
            .select("id")
            .eq("email", email)
            .neq("id", user_id)
            .count()
            .await?;
        if taken > 0 {
            return Err(ApiError::conflict("Ya se encuentra un usuario registrado con ese email."));
        }

        admin
            .admin_update_user_by_id(user_id, &UserAttributes::email(email))
            .await
            .map_err(|e| ApiError::internal_server_error(e.to_string()))?;

        self.db
            .from("users")
            .eq("id", user_id)
            .update(&json!({ "email": email }))
            .await?;
        tracing::info!("User {} moved to {}", user_id, email);
        Ok(())
    }

    async fn find_user(&self, email: &str) -> Result<Option<User>, ApiError> {
        Ok(self.db.from("users").eq("email", email).select_optional().await?)
    }

    async fn registered_user(&self, email: &str) -> Result<User, ApiError> {
        self.find_user(email)
            .await?
            .ok_or_else(|| ApiError::not_found("El usuario no se encuentra registrado"))
    }

    async fn issue_provisional_password(&self, user: &User) -> Result<String, ApiError> {
        let password = provisional_password();
        self.db
            .admin_update_user_by_id(&user.id, &UserAttributes::password(password.clone()))
            .await
            .map_err(|e| {
                tracing::error!("Password reset failed for {}: {}", user.id, e);
                ApiError::unauthorized(e.to_string())
            })?;
        Ok(password)
    }

    /// Account mail is best-effort; the account change already happened.
    async fn deliver(&self, email: OutgoingEmail) {
        let subject = email.subject.clone();
        if let Err(e) = self.mailer.send(email).await {
            tracing::error!("Failed to send '{}': {}", subject, e);
        }
    }
}

/// Non-empty field or a 400 with `message`.
pub fn required<'v>(value: Option<&'v str>, message: &str) -> Result<&'v str, ApiError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::bad_request(message))
}
