use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;

use crate::config::AppConfig;
use crate::error::ApiError;
use crate::models::{
    CajaChicaDetail, CajaChicaLiqClient, CajaChicaLiqInternal, CajaChicaRegistro, CajaChicaSaldo,
    CajaChicaSoporte, Client, ClientCase, InsertedRow, RegFacturable, RegFacturableLiq, UserSummary,
};
use crate::report::code::{sequenced, CodeFamily, UNKNOWN_RUC};
use crate::report::format::{format_date, format_duration, format_hour, format_money_opt, month_stamp};
use crate::report::{self, Attachment, AttachmentKind, Report, ReportKind, ReportRow};
use crate::services::account_service::required;
use crate::supabase::SupabaseClient;

const PDF_CONTENT_TYPE: &str = "application/pdf";
const RECEIPT_TYPES: [&str; 4] = ["png", "pdf", "jpg", "jpeg"];
const DETAIL_SEPARATOR: &str = " / ";

const UNKNOWN_USER: &str = "Usuario desconocido";
const UNKNOWN_CASE: &str = "Caso desconocido";
const UNKNOWN_CLIENT: &str = "Cliente desconocido";
const UNKNOWN_DETAIL: &str = "Detalle desconocido";

/// Body shared by the three liquidation routes; each checks its own fields.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LiquidationRequest {
    pub ids: Vec<String>,
    pub client_id: Option<String>,
    pub caso_id: Option<String>,
    pub liquidator_id: Option<String>,
    pub user_id: Option<String>,
    pub test: bool,
}

impl LiquidationRequest {
    fn ids(&self) -> Result<&[String], ApiError> {
        if self.ids.iter().all(|id| id.trim().is_empty()) {
            return Err(ApiError::bad_request("No se proporcionaron IDs válidos"));
        }
        Ok(&self.ids)
    }
}

/// Liquidation workflows: render the report, store it, record the
/// liquidation and mark the source rows.
///
/// Steps run in sequence without a transaction. A failure after the upload
/// leaves the stored PDF behind.
pub struct LiquidationService<'a> {
    db: &'a SupabaseClient,
    config: &'a AppConfig,
}

impl<'a> LiquidationService<'a> {
    pub fn new(db: &'a SupabaseClient, config: &'a AppConfig) -> Self {
        Self { db, config }
    }

    /// Billable hours of one case. Returns a signed URL to the firm copy.
    pub async fn billable(&self, request: &LiquidationRequest, now: DateTime<Utc>) -> Result<String, ApiError> {
        let ids = request.ids()?;
        let (Some(client_id), Some(caso_id), Some(liquidator_id)) = (
            non_empty(&request.client_id),
            non_empty(&request.caso_id),
            non_empty(&request.liquidator_id),
        ) else {
            return Err(ApiError::bad_request(
                "No se proporcionaron client_id o caso_id o liquidator_id",
            ));
        };

        let case_name = self.case_name(caso_id).await?;
        let ruc = self.client_ruc(client_id).await?;
        let code = self.next_code(CodeFamily::Billable, Some(&ruc), now).await?;

        let records: Vec<RegFacturable> = self
            .db
            .from("reg_facturable")
            .eq("is_liquidated", false)
            .in_list("id", ids)
            .select_all()
            .await?;
        if records.is_empty() {
            return Err(ApiError::not_found("No se encontraron datos"));
        }

        let users = self
            .display_names(records.iter().filter_map(|r| r.register_by_id.as_deref()))
            .await?;
        let tz = self.config.report.tz();
        let rows: Vec<ReportRow> = records
            .iter()
            .map(|r| ReportRow {
                date: format_date(r.start_date_time.as_deref(), tz),
                description: r.details.clone().unwrap_or_default(),
                user: lookup(&users, r.register_by_id.as_deref(), UNKNOWN_USER),
                start: format_hour(r.start_date_time.as_deref(), tz),
                end: format_hour(r.end_date_time.as_deref(), tz),
                hours_worked: format_duration(r.duration_real),
                hours_billed: format_duration(r.duration_to_bill),
                hourly_rate: format_money_opt(r.hour_value),
                value: format_money_opt(r.total_value),
                ..Default::default()
            })
            .collect();

        let duration_total: f64 = records.iter().filter_map(|r| r.duration_to_bill).sum();
        let value_total: f64 = records.iter().filter_map(|r| r.total_value).sum();

        let logo = self.logo().await;
        let case = Some(case_name.as_str());
        let internal_pdf = report::render(&self.report(
            ReportKind::BillableInternal,
            &code,
            case,
            value_total,
            rows.clone(),
            logo.clone(),
            Vec::new(),
        ))?;
        let client_pdf = report::render(&self.report(
            ReportKind::BillableClient,
            &code,
            case,
            value_total,
            rows,
            logo,
            Vec::new(),
        ))?;

        let folder = format!("clientes/{}/registros_facturables_liquidaciones", ruc);
        let internal_path = format!("{}/{}.pdf", folder, code);
        let client_path = format!("{}/{}-cliente.pdf", folder, code);
        let pdf_url = self.upload(&internal_path, internal_pdf).await?;
        let pdf_url_cliente = self.upload(&client_path, client_pdf).await?;

        let liquidation = RegFacturableLiq {
            client_id: client_id.to_string(),
            caso_id: caso_id.to_string(),
            duration_total,
            value_total,
            user_id_liquidator: liquidator_id.to_string(),
            liq_code: code.clone(),
            pdf_url,
            pdf_url_cliente,
        };
        let liquidation_id = self.insert_liquidation(CodeFamily::Billable, &liquidation).await?;

        self.db
            .from("reg_facturable")
            .in_list("id", ids)
            .update(&json!({ "is_liquidated": true, "reg_facturable_liq_id": liquidation_id }))
            .await?;

        tracing::info!("Billable liquidation {} covers {} records", code, records.len());
        self.signed_url(&internal_path).await
    }

    /// Petty cash spent by one user, settled with the firm.
    pub async fn petty_cash_internal(
        &self,
        request: &LiquidationRequest,
        now: DateTime<Utc>,
    ) -> Result<String, ApiError> {
        let ids = request.ids()?;
        let liquidator_id = required(request.liquidator_id.as_deref(), "No se proporcionó liquidator_id")?;
        let user_id = required(request.user_id.as_deref(), "No se proporcionó user_id")?;

        let cases: Vec<ClientCase> = self.db.from("client_casos").select("id,case_name").select_all().await?;
        let cases: HashMap<String, String> = cases
            .into_iter()
            .filter_map(|c| Some((c.id, c.case_name?)))
            .collect();
        let clients: Vec<Client> = self.db.from("client").select("id,client_name").select_all().await?;
        let clients: HashMap<String, String> = clients
            .into_iter()
            .filter_map(|c| Some((c.id, c.client_name?)))
            .collect();

        let code = self.next_code(CodeFamily::PettyCashInternal, None, now).await?;

        let records: Vec<CajaChicaRegistro> = self
            .db
            .from("caja_chica_registros")
            .eq("internal_liquidation", false)
            .in_list("id", ids)
            .select_all()
            .await?;
        if records.is_empty() {
            return Err(ApiError::not_found(
                "No se encontraron datos o ya hizo la liquidación interna de alguno de los registros",
            ));
        }

        let user: UserSummary = self
            .db
            .from("users")
            .select("id,display_name,email")
            .eq("id", user_id)
            .select_one()
            .await?;
        let user_name = user
            .display_name
            .clone()
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| UNKNOWN_USER.to_string());

        let details = self.details(ids).await?;
        let tz = self.config.report.tz();
        let rows: Vec<ReportRow> = records
            .iter()
            .map(|r| ReportRow {
                date: format_date(r.date.as_deref(), tz),
                description: r.concept.clone().unwrap_or_default(),
                details: details.get(&r.id).cloned().unwrap_or_else(|| UNKNOWN_DETAIL.to_string()),
                user: user_name.clone(),
                value: format_money_opt(r.value),
                client: lookup(&clients, r.client_id.as_deref(), UNKNOWN_CLIENT),
                case: lookup(&cases, r.caso_id.as_deref(), UNKNOWN_CASE),
                ..Default::default()
            })
            .collect();

        let receipts = self.receipts(&records).await?;
        let total: f64 = records.iter().filter_map(|r| r.value).sum();
        let logo = self.logo().await;
        let pdf = report::render(&self.report(
            ReportKind::PettyCashInternal,
            &code,
            None,
            total,
            rows,
            logo,
            receipts,
        ))?;

        let saldo: Option<CajaChicaSaldo> = self
            .db
            .from("caja_chica_saldos")
            .eq("user_id", user_id)
            .select_optional()
            .await?;
        let available = saldo.as_ref().and_then(|s| s.available_balance).unwrap_or(0.0);
        let pending = saldo.as_ref().and_then(|s| s.pending_liquidation).unwrap_or(0.0);

        let path = format!(
            "users/{}/caja_chica_interna_liquidaciones/{}.pdf",
            user.email.as_deref().unwrap_or_default(),
            code
        );
        let pdf_url = self.upload(&path, pdf).await?;

        let liquidation = CajaChicaLiqInternal {
            liquidation_value: total,
            user_id_liquidator: liquidator_id.to_string(),
            int_liq_code: code.clone(),
            user_id: user_id.to_string(),
            initial_balance: available,
            final_balance: if saldo.is_some() { available + total } else { 0.0 },
            refund: total,
            pdf_url,
        };
        let liquidation_id = self.insert_liquidation(CodeFamily::PettyCashInternal, &liquidation).await?;

        self.db
            .from("caja_chica_registros")
            .in_list("id", ids)
            .update(&json!({ "internal_liquidation": true, "internal_liquidation_id": liquidation_id }))
            .await?;

        if saldo.is_some() {
            self.db
                .from("caja_chica_saldos")
                .eq("user_id", user_id)
                .update(&json!({
                    "available_balance": available + total,
                    "pending_liquidation": pending - total,
                }))
                .await?;
        } else {
            tracing::warn!("User {} has no caja chica balance row; balance left untouched", user_id);
        }

        tracing::info!("Internal petty cash liquidation {} for user {}", code, user_id);
        self.signed_url(&path).await
    }

    /// Petty cash already settled internally, billed to the client of a case.
    pub async fn petty_cash_client(
        &self,
        request: &LiquidationRequest,
        now: DateTime<Utc>,
    ) -> Result<String, ApiError> {
        let ids = request.ids()?;
        let caso_id = required(request.caso_id.as_deref(), "No se proporcionó caso_id")?;
        let client_id = required(request.client_id.as_deref(), "No se proporcionó client_id")?;
        let liquidator_id = required(request.liquidator_id.as_deref(), "No se proporcionó liquidator_id")?;

        let case_name = self.case_name(caso_id).await?;
        let ruc = self.client_ruc(client_id).await?;
        let code = self.next_code(CodeFamily::PettyCashClient, Some(&ruc), now).await?;

        let records: Vec<CajaChicaRegistro> = self
            .db
            .from("caja_chica_registros")
            .eq("internal_liquidation", true)
            .eq("client_liquidation", false)
            .in_list("id", ids)
            .select_all()
            .await?;
        if records.is_empty() {
            return Err(ApiError::not_found(
                "No se encontraron datos o aún no ha hecho la liquidación interna de alguno de los registros",
            ));
        }

        let users = self
            .display_names(records.iter().filter_map(|r| r.register_by_id.as_deref()))
            .await?;
        let details = self.details(ids).await?;
        let tz = self.config.report.tz();
        let rows: Vec<ReportRow> = records
            .iter()
            .map(|r| ReportRow {
                date: format_date(r.date.as_deref(), tz),
                description: r.concept.clone().unwrap_or_default(),
                details: details.get(&r.id).cloned().unwrap_or_else(|| UNKNOWN_DETAIL.to_string()),
                user: lookup(&users, r.register_by_id.as_deref(), UNKNOWN_USER),
                value: format_money_opt(r.value),
                ..Default::default()
            })
            .collect();

        let receipts = self.receipts(&records).await?;
        let total: f64 = records.iter().filter_map(|r| r.value).sum();
        let logo = self.logo().await;
        let pdf = report::render(&self.report(
            ReportKind::PettyCashClient,
            &code,
            Some(case_name.as_str()),
            total,
            rows,
            logo,
            receipts,
        ))?;

        let path = format!("clientes/{}/caja_chica_cliente_liquidaciones/{}.pdf", ruc, code);
        let pdf_url = self.upload(&path, pdf).await?;

        let liquidation = CajaChicaLiqClient {
            caso_id: caso_id.to_string(),
            client_id: client_id.to_string(),
            client_liq_code: code.clone(),
            user_id_liquidator: liquidator_id.to_string(),
            value: total,
            pdf_url,
        };
        let liquidation_id = self.insert_liquidation(CodeFamily::PettyCashClient, &liquidation).await?;

        self.db
            .from("caja_chica_registros")
            .in_list("id", ids)
            .update(&json!({ "client_liquidation": true, "client_liquidation_id": liquidation_id }))
            .await?;

        tracing::info!("Client petty cash liquidation {} for case {}", code, caso_id);
        self.signed_url(&path).await
    }

    async fn case_name(&self, caso_id: &str) -> Result<String, ApiError> {
        let case: ClientCase = self
            .db
            .from("client_casos")
            .select("id,case_name")
            .eq("id", caso_id)
            .select_one()
            .await?;
        Ok(case
            .case_name
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| UNKNOWN_CASE.to_string()))
    }

    async fn client_ruc(&self, client_id: &str) -> Result<String, ApiError> {
        let client: Client = self
            .db
            .from("client")
            .select("id,id_number")
            .eq("id", client_id)
            .select_one()
            .await?;
        Ok(client
            .id_number
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| UNKNOWN_RUC.to_string()))
    }

    async fn next_code(&self, family: CodeFamily, ruc: Option<&str>, now: DateTime<Utc>) -> Result<String, ApiError> {
        let stamp = month_stamp(&now.with_timezone(&self.config.report.tz()));
        let base = family.base(ruc, &stamp);
        let existing = self
            .db
            .from(family.table())
            .select(family.column())
            .like(family.column(), format!("{}*", base))
            .count()
            .await?;
        Ok(sequenced(&base, existing))
    }

    async fn display_names<'i>(&self, ids: impl Iterator<Item = &'i str>) -> Result<HashMap<String, String>, ApiError> {
        let mut ids: Vec<&str> = ids.collect();
        ids.sort_unstable();
        ids.dedup();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let users: Vec<UserSummary> = self
            .db
            .from("users")
            .select("id,display_name")
            .in_list("id", &ids)
            .select_all()
            .await?;
        Ok(users
            .into_iter()
            .filter_map(|u| Some((u.id, u.display_name?)))
            .collect())
    }

    /// Detail lines per petty-cash record, joined for display.
    async fn details(&self, ids: &[String]) -> Result<HashMap<String, String>, ApiError> {
        let rows: Vec<CajaChicaDetail> = self
            .db
            .from("caja_chica_reg_detail")
            .select("details,caja_chica_id")
            .in_list("caja_chica_id", ids)
            .select_all()
            .await?;
        Ok(group_details(rows))
    }

    async fn receipts(&self, records: &[CajaChicaRegistro]) -> Result<Vec<Attachment>, ApiError> {
        let bucket = &self.config.report.files_bucket;
        let type_filter = receipt_type_filter();
        let type_filter: Vec<&str> = type_filter.iter().map(String::as_str).collect();
        let mut attachments = Vec::new();
        for record in records {
            let soportes: Vec<CajaChicaSoporte> = self
                .db
                .from("caja_chica_soportes")
                .select("caja_chica_id,file_url,file_type")
                .eq("caja_chica_id", &record.id)
                .or(&type_filter)
                .select_all()
                .await?;
            for soporte in soportes {
                if soporte.file_url.is_empty() || soporte.file_type.is_empty() {
                    continue;
                }
                let Some(kind) = AttachmentKind::from_file_type(&soporte.file_type) else {
                    continue;
                };
                let bytes = self.db.storage_download(bucket, &receipt_path(&soporte.file_url)).await?;
                attachments.push(Attachment { kind, bytes });
            }
        }
        Ok(attachments)
    }

    /// Logo for the header block; reports render without one when it cannot be fetched.
    async fn logo(&self) -> Option<Vec<u8>> {
        let report = &self.config.report;
        match self.db.storage_download(&report.logo_bucket, &report.logo_path).await {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                tracing::warn!("Report logo {}/{} unavailable: {}", report.logo_bucket, report.logo_path, e);
                None
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn report(
        &self,
        kind: ReportKind,
        code: &str,
        case_name: Option<&str>,
        total: f64,
        rows: Vec<ReportRow>,
        logo: Option<Vec<u8>>,
        attachments: Vec<Attachment>,
    ) -> Report {
        Report {
            kind,
            code: code.to_string(),
            case_name: case_name.map(str::to_string),
            total,
            rows,
            logo,
            attachments,
            footer_lines: self.config.report.footer_lines.clone(),
            signature_lines: self.config.report.signature_lines.clone(),
        }
    }

    /// Upload into the files bucket, returning the stored key.
    async fn upload(&self, path: &str, pdf: Vec<u8>) -> Result<String, ApiError> {
        Ok(self
            .db
            .storage_upload(&self.config.report.files_bucket, path, pdf, PDF_CONTENT_TYPE)
            .await?)
    }

    async fn insert_liquidation<B: serde::Serialize>(&self, family: CodeFamily, row: &B) -> Result<String, ApiError> {
        let inserted: Vec<InsertedRow> = self.db.from(family.table()).insert(&[row]).await?;
        inserted
            .into_iter()
            .next()
            .map(|r| r.id)
            .ok_or_else(|| ApiError::internal_server_error(format!("{} insert returned no row", family.table())))
    }

    async fn signed_url(&self, path: &str) -> Result<String, ApiError> {
        let report = &self.config.report;
        Ok(self
            .db
            .storage_signed_url(&report.files_bucket, path, report.signed_url_ttl_secs)
            .await?)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn lookup(map: &HashMap<String, String>, key: Option<&str>, fallback: &str) -> String {
    key.and_then(|k| map.get(k))
        .filter(|v| !v.is_empty())
        .cloned()
        .unwrap_or_else(|| fallback.to_string())
}

/// Receipt types matched without regard to case (`Png`, `JPEG`, ...).
fn receipt_type_filter() -> Vec<String> {
    RECEIPT_TYPES
        .iter()
        .map(|t| format!("file_type.ilike.{}", t))
        .collect()
}

fn group_details(rows: Vec<CajaChicaDetail>) -> HashMap<String, String> {
    let mut grouped: HashMap<String, Vec<String>> = HashMap::new();
    for row in rows {
        if let Some(details) = row.details {
            grouped.entry(row.caja_chica_id).or_default().push(details);
        }
    }
    grouped
        .into_iter()
        .map(|(id, lines)| (id, lines.join(DETAIL_SEPARATOR)))
        .collect()
}

/// Object path inside the files bucket; stored URLs carry a `files/` prefix.
fn receipt_path(file_url: &str) -> String {
    file_url.replacen("files/", "", 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn details_are_grouped_per_record_in_order() {
        let rows = vec![
            CajaChicaDetail { caja_chica_id: "a".to_string(), details: Some("Taxi".to_string()) },
            CajaChicaDetail { caja_chica_id: "b".to_string(), details: Some("Copias".to_string()) },
            CajaChicaDetail { caja_chica_id: "a".to_string(), details: Some("Peaje".to_string()) },
            CajaChicaDetail { caja_chica_id: "b".to_string(), details: None },
        ];
        let grouped = group_details(rows);
        assert_eq!(grouped["a"], "Taxi / Peaje");
        assert_eq!(grouped["b"], "Copias");
    }

    #[test]
    fn receipt_path_strips_first_bucket_prefix() {
        assert_eq!(receipt_path("files/users/a/recibo.png"), "users/a/recibo.png");
        assert_eq!(receipt_path("users/files/x.pdf"), "users/x.pdf");
        assert_eq!(receipt_path("users/a.pdf"), "users/a.pdf");
    }

    #[test]
    fn receipt_types_match_any_case() {
        assert_eq!(
            receipt_type_filter(),
            vec![
                "file_type.ilike.png",
                "file_type.ilike.pdf",
                "file_type.ilike.jpg",
                "file_type.ilike.jpeg",
            ]
        );
    }

    #[test]
    fn lookup_falls_back_for_missing_keys() {
        let mut names = HashMap::new();
        names.insert("u1".to_string(), "Ana".to_string());
        names.insert("u2".to_string(), String::new());
        assert_eq!(lookup(&names, Some("u1"), UNKNOWN_USER), "Ana");
        assert_eq!(lookup(&names, Some("u2"), UNKNOWN_USER), UNKNOWN_USER);
        assert_eq!(lookup(&names, None, UNKNOWN_USER), UNKNOWN_USER);
    }

    #[test]
    fn ids_must_not_be_empty() {
        let request = LiquidationRequest::default();
        assert_eq!(
            request.ids().unwrap_err(),
            ApiError::bad_request("No se proporcionaron IDs válidos")
        );
        let request: LiquidationRequest = serde_json::from_value(json!({ "ids": ["r1"] })).unwrap();
        assert_eq!(request.ids().unwrap(), ["r1".to_string()]);
    }
}
