use serde::Deserialize;

/// Row of `caja_chica_registros`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CajaChicaRegistro {
    pub id: String,
    pub concept: Option<String>,
    pub date: Option<String>,
    pub value: Option<f64>,
    pub caso_id: Option<String>,
    pub client_id: Option<String>,
    pub register_by_id: Option<String>,
    pub internal_liquidation: bool,
    pub client_liquidation: bool,
    pub notif_push_pre: bool,
    pub notif_email_pre: bool,
}

/// Row of `caja_chica_reg_detail`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CajaChicaDetail {
    pub caja_chica_id: String,
    pub details: Option<String>,
}

/// Row of `caja_chica_soportes`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CajaChicaSoporte {
    pub caja_chica_id: String,
    pub file_url: String,
    pub file_type: String,
}

/// Row of `caja_chica_saldos`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CajaChicaSaldo {
    pub id: String,
    pub user_id: Option<String>,
    pub available_balance: Option<f64>,
    pub pending_liquidation: Option<f64>,
}

/// Row of `reg_facturable`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RegFacturable {
    pub id: String,
    pub activity: Option<String>,
    pub details: Option<String>,
    pub created_at: Option<String>,
    pub start_date_time: Option<String>,
    pub end_date_time: Option<String>,
    pub duration_real: Option<f64>,
    pub duration_to_bill: Option<f64>,
    pub hour_value: Option<f64>,
    pub total_value: Option<f64>,
    pub register_by_id: Option<String>,
    pub is_liquidated: bool,
    pub notif_push_pre: bool,
    pub notif_email_pre: bool,
}
