use serde::Deserialize;

/// Row of `actividades`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Activity {
    pub id: String,
    pub activity_name: Option<String>,
    pub responsible_id: Option<String>,
    pub end_date_planned: Option<String>,
    pub close: Option<bool>,
    pub notif_push_pre: bool,
    pub notif_push_exp: bool,
    pub notif_push_post: bool,
}

/// Row of `client_tramites`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Tramite {
    pub id: String,
    pub tramite_name: Option<String>,
    pub responsible_id: Option<String>,
    pub end_date_planned: Option<String>,
    pub close: Option<bool>,
    pub notif_push_pre: bool,
    pub notif_push_exp: bool,
    pub notif_push_post: bool,
    pub notif_email_post: bool,
    pub notif_push_admin_post: bool,
}

/// Row of `habilitantes`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Habilitante {
    pub id: String,
    pub habilitantes_name: Option<String>,
    pub client_id: Option<String>,
    pub exp_date: Option<String>,
    pub notif_push_pre: bool,
    pub notif_push_exp: bool,
    pub notif_push_post: bool,
}
