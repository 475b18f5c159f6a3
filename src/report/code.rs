/// Stand-in tax id for clients without one.
pub const UNKNOWN_RUC: &str = "RUC desconocido";

/// Liquidation code families, one per liquidation table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeFamily {
    /// `RFL-{ruc}-{MM-YYYY}` in `reg_facturable_liq.liq_code`
    Billable,
    /// `CCIL-{MM-YYYY}` in `caja_chica_liq_internal.int_liq_code`
    PettyCashInternal,
    /// `CCCL-{ruc}-{MM-YYYY}` in `caja_chica_liq_client.client_liq_code`
    PettyCashClient,
}

impl CodeFamily {
    pub fn table(self) -> &'static str {
        match self {
            CodeFamily::Billable => "reg_facturable_liq",
            CodeFamily::PettyCashInternal => "caja_chica_liq_internal",
            CodeFamily::PettyCashClient => "caja_chica_liq_client",
        }
    }

    pub fn column(self) -> &'static str {
        match self {
            CodeFamily::Billable => "liq_code",
            CodeFamily::PettyCashInternal => "int_liq_code",
            CodeFamily::PettyCashClient => "client_liq_code",
        }
    }

    pub fn base(self, ruc: Option<&str>, month_stamp: &str) -> String {
        let ruc = ruc.filter(|r| !r.is_empty()).unwrap_or(UNKNOWN_RUC);
        match self {
            CodeFamily::Billable => format!("RFL-{}-{}", ruc, month_stamp),
            CodeFamily::PettyCashInternal => format!("CCIL-{}", month_stamp),
            CodeFamily::PettyCashClient => format!("CCCL-{}-{}", ruc, month_stamp),
        }
    }
}

/// Next code after `existing` codes sharing `base`.
pub fn sequenced(base: &str, existing: usize) -> String {
    format!("{}-{:03}", base, existing + 1)
}
