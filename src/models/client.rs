use serde::Deserialize;

/// Row of `client`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Client {
    pub id: String,
    pub client_name: Option<String>,
    /// RUC / tax id used in liquidation codes and storage paths.
    pub id_number: Option<String>,
}

/// Row of `client_casos`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ClientCase {
    pub id: String,
    pub case_name: Option<String>,
    pub client_id: Option<String>,
}

/// Row of `institution`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Institution {
    pub id: String,
    pub name: Option<String>,
}

/// Row of `companies`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Company {
    pub id: String,
    pub company_name: Option<String>,
}
