use serde::{Deserialize, Serialize};

/// Insert payload for `reg_facturable_liq`.
#[derive(Debug, Clone, Serialize)]
pub struct RegFacturableLiq {
    pub client_id: String,
    pub caso_id: String,
    pub duration_total: f64,
    pub value_total: f64,
    pub user_id_liquidator: String,
    pub liq_code: String,
    pub pdf_url: String,
    pub pdf_url_cliente: String,
}

/// Insert payload for `caja_chica_liq_internal`.
#[derive(Debug, Clone, Serialize)]
pub struct CajaChicaLiqInternal {
    pub liquidation_value: f64,
    pub user_id_liquidator: String,
    pub int_liq_code: String,
    pub user_id: String,
    pub initial_balance: f64,
    pub final_balance: f64,
    pub refund: f64,
    pub pdf_url: String,
}

/// Insert payload for `caja_chica_liq_client`.
#[derive(Debug, Clone, Serialize)]
pub struct CajaChicaLiqClient {
    pub caso_id: String,
    pub client_id: String,
    pub client_liq_code: String,
    pub user_id_liquidator: String,
    pub value: f64,
    pub pdf_url: String,
}

/// Id of a freshly inserted row. Numeric and uuid keys both read as text.
#[derive(Debug, Clone, Deserialize)]
pub struct InsertedRow {
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,
}

fn id_as_string<'de, D: serde::Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(id) => Ok(id),
        serde_json::Value::Number(id) => Ok(id.to_string()),
        other => Err(serde::de::Error::custom(format!("unexpected id {}", other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inserted_ids_accept_numbers() {
        let row: InsertedRow = serde_json::from_str(r#"{"id": 42}"#).unwrap();
        assert_eq!(row.id, "42");
        let row: InsertedRow = serde_json::from_str(r#"{"id": "9b1d"}"#).unwrap();
        assert_eq!(row.id, "9b1d");
    }
}
