use std::str::FromStr;

use chrono::{DateTime, Duration, NaiveDate, SecondsFormat, TimeZone, Utc};
use chrono_tz::Tz;
use serde_json::json;

use crate::config::{AppConfig, BrandingConfig};
use crate::error::ApiError;
use crate::mail::{templates, Mailer, OutgoingEmail};
use crate::models::{
    Activity, CajaChicaRegistro, Habilitante, NewPushNotification, RegFacturable, Tramite, User,
    UserSummary,
};
use crate::report::format::format_date;
use crate::services::account_service::required;
use crate::supabase::{QueryBuilder, SupabaseClient};

const PUSH_TABLE: &str = "notifications_push";
const LEDGER_GRACE_DAYS: i64 = 10;
const ADVICE: &str = "Le recomendamos tomar las acciones pertinentes.";

/// The five scheduled sweeps, addressed by their route segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepKind {
    Actividades,
    Tramites,
    CajaChica,
    Factura,
    Habilitantes,
}

impl SweepKind {
    pub const ALL: [SweepKind; 5] = [
        SweepKind::Actividades,
        SweepKind::Tramites,
        SweepKind::CajaChica,
        SweepKind::Factura,
        SweepKind::Habilitantes,
    ];

    pub fn path(self) -> &'static str {
        match self {
            SweepKind::Actividades => "actividades",
            SweepKind::Tramites => "tramites",
            SweepKind::CajaChica => "cajachica",
            SweepKind::Factura => "factura",
            SweepKind::Habilitantes => "habilitantes",
        }
    }

    /// Entity name used in summary messages.
    pub fn label(self) -> &'static str {
        match self {
            SweepKind::Actividades => "actividades",
            SweepKind::Tramites => "trámites",
            SweepKind::CajaChica => "caja chica",
            SweepKind::Factura => "registros facturables",
            SweepKind::Habilitantes => "habilitantes",
        }
    }

    pub fn sends_email(self) -> bool {
        matches!(self, SweepKind::Tramites | SweepKind::CajaChica | SweepKind::Factura)
    }
}

impl FromStr for SweepKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SweepKind::ALL
            .into_iter()
            .find(|kind| kind.path().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown sweep '{}'", s))
    }
}

/// Deadline window relative to the start of today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepWindow {
    /// Due tomorrow.
    DayBefore,
    /// Due today.
    SameDay,
    /// Overdue.
    DayAfter,
}

impl SweepWindow {
    pub const ALL: [SweepWindow; 3] = [SweepWindow::DayBefore, SweepWindow::SameDay, SweepWindow::DayAfter];

    /// Flag column that records the push for this window.
    pub fn flag(self) -> &'static str {
        match self {
            SweepWindow::DayBefore => "notif_push_pre",
            SweepWindow::SameDay => "notif_push_exp",
            SweepWindow::DayAfter => "notif_push_post",
        }
    }

    pub fn category(self) -> &'static str {
        match self {
            SweepWindow::DayBefore => "Prevencimiento",
            SweepWindow::SameDay => "Vencimiento",
            SweepWindow::DayAfter => "Postvencimiento",
        }
    }
}

/// Day boundaries of one sweep run, as UTC instants.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepDates {
    pub today: DateTime<Utc>,
    pub tomorrow: DateTime<Utc>,
    pub in_two_days: DateTime<Utc>,
    pub ledger_cutoff: DateTime<Utc>,
    tz: Tz,
}

impl SweepDates {
    pub fn starting(now: DateTime<Utc>, tz: Tz) -> Self {
        let date = now.with_timezone(&tz).date_naive();
        let midnight = |offset: i64| local_midnight(date + Duration::days(offset), tz);
        Self {
            today: midnight(0),
            tomorrow: midnight(1),
            in_two_days: midnight(2),
            ledger_cutoff: midnight(-LEDGER_GRACE_DAYS),
            tz,
        }
    }

    fn bound(instant: &DateTime<Utc>) -> String {
        instant.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    /// Restrict `column` to the deadline window.
    fn within<'q>(&self, query: QueryBuilder<'q>, column: &str, window: SweepWindow) -> QueryBuilder<'q> {
        match window {
            SweepWindow::DayBefore => query
                .gte(column, Self::bound(&self.tomorrow))
                .lt(column, Self::bound(&self.in_two_days)),
            SweepWindow::SameDay => query
                .gte(column, Self::bound(&self.today))
                .lt(column, Self::bound(&self.tomorrow)),
            SweepWindow::DayAfter => query.lt(column, Self::bound(&self.today)),
        }
    }

    /// `DD/MM/YYYY` of a stored date, today when absent.
    fn label(&self, raw: Option<&str>) -> String {
        let formatted = format_date(raw, self.tz);
        if formatted.is_empty() {
            self.today.with_timezone(&self.tz).format("%d/%m/%Y").to_string()
        } else {
            formatted
        }
    }
}

fn local_midnight(date: NaiveDate, tz: Tz) -> DateTime<Utc> {
    let naive = date.and_time(chrono::NaiveTime::MIN);
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&naive))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepCounters {
    pub total: usize,
    pub ok: usize,
    pub fail: usize,
}

impl SweepCounters {
    fn record(&mut self, succeeded: bool) {
        self.total += 1;
        if succeeded {
            self.ok += 1;
        } else {
            self.fail += 1;
        }
    }
}

/// Outcome of one sweep run.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepSummary {
    pub kind: SweepKind,
    pub push: SweepCounters,
    pub email: SweepCounters,
}

impl SweepSummary {
    fn new(kind: SweepKind) -> Self {
        Self {
            kind,
            push: SweepCounters::default(),
            email: SweepCounters::default(),
        }
    }

    pub fn message(&self) -> String {
        let label = self.kind.label();
        let failed = |n: usize| if n == 0 { "ningunas".to_string() } else { n.to_string() };

        if !self.kind.sends_email() {
            if self.push.total == 0 {
                return format!("No hay notificaciones push pendientes para {}.", label);
            }
            let done = if self.push.ok == 0 { "No hubo".to_string() } else { format!("Hubo {}", self.push.ok) };
            return format!(
                "{} notificaciones push de {} exitosas y {} fallidas.",
                done,
                label,
                failed(self.push.fail)
            );
        }

        let mut message = if self.push.total == 0 {
            format!("No hay notificaciones push pendientes para {} ", label)
        } else {
            let done = if self.push.ok == 0 { "No hubo".to_string() } else { format!("Hubo {}", self.push.ok) };
            format!(
                "{} notificaciones push de {} exitosas y {} fallidas ",
                done,
                label,
                failed(self.push.fail)
            )
        };
        if self.email.total == 0 {
            message.push_str(&format!("y no hay notificaciones email pendientes para {}.", label));
        } else {
            let done = if self.email.ok == 0 { "y no hubo".to_string() } else { format!("y hubo {}", self.email.ok) };
            message.push_str(&format!(
                "{} notificaciones email de {} exitosas y {} fallidas.",
                done,
                label,
                failed(self.email.fail)
            ));
        }
        message
    }
}

/// Push text for deadline-driven entities.
fn deadline_text(kind: SweepKind, window: SweepWindow, name: &str, date: &str) -> String {
    let subject = match kind {
        SweepKind::Tramites => "Su trámite asignado",
        SweepKind::Habilitantes => "Su habilitante asignada",
        _ => "Su actividad asignada",
    };
    match (kind, window) {
        (SweepKind::Tramites, SweepWindow::SameDay) => format!("{} {} vence hoy. {}", subject, name, ADVICE),
        (SweepKind::Tramites, SweepWindow::DayAfter) => format!("{} {} venció el {}. {}", subject, name, date, ADVICE),
        (_, SweepWindow::DayBefore) => format!("{} '{}' vence mañana. {}", subject, name, ADVICE),
        (_, SweepWindow::SameDay) => format!("{} '{}' vence hoy. {}", subject, name, ADVICE),
        (_, SweepWindow::DayAfter) => format!("{} '{}' venció el {}. {}", subject, name, date, ADVICE),
    }
}

fn deadline_title(kind: SweepKind, window: SweepWindow) -> &'static str {
    let overdue = window == SweepWindow::DayAfter;
    match (kind, overdue) {
        (SweepKind::Tramites, false) => "Trámite Por Vencer",
        (SweepKind::Tramites, true) => "Trámite Vencido",
        (SweepKind::Habilitantes, false) => "Habilitante Por Vencer",
        (SweepKind::Habilitantes, true) => "Habilitante Vencida",
        (_, false) => "Actividad Por Vencer",
        (_, true) => "Actividad Vencida",
    }
}

/// Push and email sweeps over deadlines and unliquidated ledger records.
///
/// Every sweep is best-effort: a failed query skips its window, a failed
/// insert or send is counted and the item skipped, a failed flag update is
/// only logged.
pub struct NotificationService<'a> {
    db: &'a SupabaseClient,
    config: &'a AppConfig,
    mailer: &'a dyn Mailer,
}

impl<'a> NotificationService<'a> {
    pub fn new(db: &'a SupabaseClient, config: &'a AppConfig, mailer: &'a dyn Mailer) -> Self {
        Self { db, config, mailer }
    }

    pub async fn run(&self, kind: SweepKind, now: DateTime<Utc>) -> SweepSummary {
        let dates = SweepDates::starting(now, self.config.report.tz());
        tracing::info!("Running {} sweep for day starting {}", kind.path(), dates.today);
        let summary = match kind {
            SweepKind::Actividades => self.actividades(&dates).await,
            SweepKind::Tramites => self.tramites(&dates).await,
            SweepKind::CajaChica => self.caja_chica(&dates).await,
            SweepKind::Factura => self.factura(&dates).await,
            SweepKind::Habilitantes => self.habilitantes(&dates).await,
        };
        tracing::info!("{}", summary.message());
        summary
    }

    /// Free-form email on behalf of a signed-in user.
    pub async fn custom_email(
        &self,
        email: Option<&str>,
        subject: Option<&str>,
        html: Option<&str>,
    ) -> Result<(), ApiError> {
        let email = required(email, "No se proporcionó email")?;
        let subject = required(subject, "No se proporcionó un asunto")?;
        let html = required(html, "No se proporcionó un mensaje html")?;

        self.mailer.send(OutgoingEmail::to(email, subject, html)).await?;
        Ok(())
    }

    async fn actividades(&self, dates: &SweepDates) -> SweepSummary {
        let kind = SweepKind::Actividades;
        let mut summary = SweepSummary::new(kind);

        for window in SweepWindow::ALL {
            let query = self.db.from("actividades").eq("close", false).eq(window.flag(), false);
            let rows: Vec<Activity> = match dates.within(query, "end_date_planned", window).select_all().await {
                Ok(rows) => rows,
                Err(e) => {
                    tracing::error!("Failed to load actividades ({:?}): {}", window, e);
                    continue;
                }
            };
            for activity in rows {
                let name = activity.activity_name.as_deref().unwrap_or_default();
                let date = dates.label(activity.end_date_planned.as_deref());
                let push = NewPushNotification::unread(
                    activity.responsible_id.clone(),
                    &activity.id,
                    window.category(),
                    deadline_title(kind, window),
                    deadline_text(kind, window, name, &date),
                );
                if self.push(push, &mut summary.push).await {
                    self.flag("actividades", &activity.id, window.flag()).await;
                }
            }
        }
        summary
    }

    async fn habilitantes(&self, dates: &SweepDates) -> SweepSummary {
        let kind = SweepKind::Habilitantes;
        let mut summary = SweepSummary::new(kind);

        let users: Vec<User> = self
            .db
            .from("users")
            .select("id,client_id")
            .select_all()
            .await
            .unwrap_or_else(|e| {
                tracing::error!("Failed to load users for habilitantes: {}", e);
                Vec::new()
            });
        // Last user registered under the habilitante's client.
        let recipient = |client_id: Option<&str>| {
            users
                .iter()
                .rev()
                .find(|u| u.client_id.as_deref() == client_id)
                .map(|u| u.id.clone())
        };

        for window in SweepWindow::ALL {
            let query = self.db.from("habilitantes").eq(window.flag(), false);
            let rows: Vec<Habilitante> = match dates.within(query, "exp_date", window).select_all().await {
                Ok(rows) => rows,
                Err(e) => {
                    tracing::error!("Failed to load habilitantes ({:?}): {}", window, e);
                    continue;
                }
            };
            for habilitante in rows {
                let name = habilitante.habilitantes_name.as_deref().unwrap_or_default();
                let date = dates.label(habilitante.exp_date.as_deref());
                let push = NewPushNotification::unread(
                    recipient(habilitante.client_id.as_deref()),
                    &habilitante.id,
                    window.category(),
                    deadline_title(kind, window),
                    deadline_text(kind, window, name, &date),
                );
                if self.push(push, &mut summary.push).await {
                    self.flag("habilitantes", &habilitante.id, window.flag()).await;
                }
            }
        }
        summary
    }

    async fn tramites(&self, dates: &SweepDates) -> SweepSummary {
        let kind = SweepKind::Tramites;
        let mut summary = SweepSummary::new(kind);

        for window in [SweepWindow::DayBefore, SweepWindow::SameDay] {
            let query = self.db.from("client_tramites").eq("close", false).eq(window.flag(), false);
            let rows: Vec<Tramite> = match dates.within(query, "end_date_planned", window).select_all().await {
                Ok(rows) => rows,
                Err(e) => {
                    tracing::error!("Failed to load tramites ({:?}): {}", window, e);
                    continue;
                }
            };
            for tramite in rows {
                let name = tramite.tramite_name.as_deref().unwrap_or_default();
                let push = NewPushNotification::unread(
                    tramite.responsible_id.clone(),
                    &tramite.id,
                    window.category(),
                    deadline_title(kind, window),
                    deadline_text(kind, window, name, ""),
                );
                if self.push(push, &mut summary.push).await {
                    self.flag("client_tramites", &tramite.id, window.flag()).await;
                }
            }
        }

        let overdue = self
            .db
            .from("client_tramites")
            .eq("close", false)
            .or(&[
                "notif_email_post.eq.false",
                "notif_push_post.eq.false",
                "notif_push_admin_post.eq.false",
            ]);
        let rows: Vec<Tramite> = match dates
            .within(overdue, "end_date_planned", SweepWindow::DayAfter)
            .select_all()
            .await
        {
            Ok(rows) => rows,
            Err(e) => {
                tracing::error!("Failed to load overdue tramites: {}", e);
                return summary;
            }
        };
        if rows.is_empty() {
            return summary;
        }

        let Some(admins) = self.users_with_role("Administrador").await else {
            return summary;
        };
        let admin_emails: Vec<String> = admins
            .iter()
            .filter_map(|a| a.deliverable_email().map(str::to_string))
            .collect();
        if admin_emails.is_empty() {
            tracing::warn!("No administrator has a deliverable email; overdue tramites skipped");
            return summary;
        }

        for tramite in rows {
            self.overdue_tramite(&tramite, dates, &admins, &admin_emails, &mut summary)
                .await;
        }
        summary
    }

    async fn overdue_tramite(
        &self,
        tramite: &Tramite,
        dates: &SweepDates,
        admins: &[UserSummary],
        admin_emails: &[String],
        summary: &mut SweepSummary,
    ) {
        let responsible: User = match self
            .db
            .from("users")
            .eq("id", tramite.responsible_id.as_deref().unwrap_or_default())
            .select_one()
            .await
        {
            Ok(user) => user,
            Err(e) => {
                tracing::warn!("Responsible user of tramite {} not found: {}", tramite.id, e);
                return;
            }
        };
        let Some(to) = responsible.deliverable_email() else {
            tracing::warn!("Responsible user {} has no deliverable email", responsible.id);
            return;
        };

        let name = tramite.tramite_name.as_deref().unwrap_or_default();
        let date = dates.label(tramite.end_date_planned.as_deref());
        let responsible_name = responsible.display_name.clone().unwrap_or_default();

        if !tramite.notif_email_post {
            let email = templates::tramite_expired(
                &self.config.branding,
                to,
                admin_emails.to_vec(),
                name,
                &responsible_name,
                &date,
            );
            if !self.mail(email, &mut summary.email).await {
                return;
            }
            self.flag("client_tramites", &tramite.id, "notif_email_post").await;
        }

        if !tramite.notif_push_post {
            let push = NewPushNotification::unread(
                Some(responsible.id.clone()),
                &tramite.id,
                SweepWindow::DayAfter.category(),
                deadline_title(SweepKind::Tramites, SweepWindow::DayAfter),
                deadline_text(SweepKind::Tramites, SweepWindow::DayAfter, name, &date),
            )
            .mailed(true);
            if !self.push(push, &mut summary.push).await {
                return;
            }
            self.flag("client_tramites", &tramite.id, "notif_push_post").await;
        }

        if !tramite.notif_push_admin_post {
            for admin in admins {
                let push = NewPushNotification::unread(
                    Some(admin.id.clone()),
                    &tramite.id,
                    SweepWindow::DayAfter.category(),
                    deadline_title(SweepKind::Tramites, SweepWindow::DayAfter),
                    format!(
                        "El trámite {} asignado a {} venció el {}. {}",
                        name, responsible_name, date, ADVICE
                    ),
                );
                self.push(push, &mut summary.push).await;
            }
            self.flag("client_tramites", &tramite.id, "notif_push_admin_post").await;
        }
    }

    async fn caja_chica(&self, dates: &SweepDates) -> SweepSummary {
        let mut summary = SweepSummary::new(SweepKind::CajaChica);

        let rows: Vec<CajaChicaRegistro> = match self
            .db
            .from("caja_chica_registros")
            .eq("client_liquidation", false)
            .or(&["notif_push_pre.eq.false", "notif_email_pre.eq.false"])
            .lte("date", SweepDates::bound(&dates.ledger_cutoff))
            .select_all()
            .await
        {
            Ok(rows) => rows,
            Err(e) => {
                tracing::error!("Failed to load caja chica records: {}", e);
                return summary;
            }
        };

        let records = rows
            .into_iter()
            .map(|r| PendingRecord {
                date: dates.label(r.date.as_deref()),
                concept: r.concept.unwrap_or_default(),
                email_sent: r.notif_email_pre,
                push_sent: r.notif_push_pre,
                id: r.id,
            })
            .collect();
        self.remind_supervisors(&LedgerSweep::CAJA_CHICA, records, &mut summary).await;
        summary
    }

    async fn factura(&self, dates: &SweepDates) -> SweepSummary {
        let mut summary = SweepSummary::new(SweepKind::Factura);

        let rows: Vec<RegFacturable> = match self
            .db
            .from("reg_facturable")
            .eq("is_liquidated", false)
            .or(&["notif_push_pre.eq.false", "notif_email_pre.eq.false"])
            .lte("created_at", SweepDates::bound(&dates.ledger_cutoff))
            .select_all()
            .await
        {
            Ok(rows) => rows,
            Err(e) => {
                tracing::error!("Failed to load registros facturables: {}", e);
                return summary;
            }
        };

        let records = rows
            .into_iter()
            .map(|r| PendingRecord {
                date: dates.label(r.created_at.as_deref()),
                concept: r.activity.unwrap_or_default(),
                email_sent: r.notif_email_pre,
                push_sent: r.notif_push_pre,
                id: r.id,
            })
            .collect();
        self.remind_supervisors(&LedgerSweep::FACTURA, records, &mut summary).await;
        summary
    }

    /// BCC email to every supervisor, then one push each, per record.
    async fn remind_supervisors(
        &self,
        sweep: &LedgerSweep,
        records: Vec<PendingRecord>,
        summary: &mut SweepSummary,
    ) {
        if records.is_empty() {
            return;
        }
        let Some(supervisors) = self.users_with_role("Supervisor").await else {
            return;
        };
        let emails: Vec<String> = supervisors
            .iter()
            .filter_map(|s| s.deliverable_email().map(str::to_string))
            .collect();
        if emails.is_empty() {
            tracing::warn!("No supervisor has a deliverable email; {} skipped", sweep.table);
            return;
        }

        for record in records {
            if !record.email_sent {
                let email = (sweep.email)(&self.config.branding, emails.clone(), &record.concept, &record.date);
                if !self.mail(email, &mut summary.email).await {
                    continue;
                }
                if !self.flag(sweep.table, &record.id, "notif_email_pre").await {
                    continue;
                }
            }
            if !record.push_sent {
                for supervisor in &supervisors {
                    let push = NewPushNotification::unread(
                        Some(supervisor.id.clone()),
                        &record.id,
                        sweep.category,
                        sweep.title,
                        (sweep.push_text)(&record.concept, &record.date),
                    )
                    .mailed(true);
                    self.push(push, &mut summary.push).await;
                }
                self.flag(sweep.table, &record.id, "notif_push_pre").await;
            }
        }
    }

    async fn users_with_role(&self, role: &str) -> Option<Vec<UserSummary>> {
        match self
            .db
            .from("users")
            .select("id,email,display_name")
            .eq("rol_name", role)
            .select_all()
            .await
        {
            Ok(users) => Some(users),
            Err(e) => {
                tracing::error!("Failed to load users with role {}: {}", role, e);
                None
            }
        }
    }

    async fn push(&self, notification: NewPushNotification, counters: &mut SweepCounters) -> bool {
        let result = self.db.from(PUSH_TABLE).insert_minimal(&notification).await;
        counters.record(result.is_ok());
        match result {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(
                    "Failed to store push '{}' for {}: {}",
                    notification.notification_title,
                    notification.related_id,
                    e
                );
                false
            }
        }
    }

    async fn mail(&self, email: OutgoingEmail, counters: &mut SweepCounters) -> bool {
        let subject = email.subject.clone();
        let result = self.mailer.send(email).await;
        counters.record(result.is_ok());
        match result {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("Failed to send '{}': {}", subject, e);
                false
            }
        }
    }

    async fn flag(&self, table: &str, id: &str, column: &str) -> bool {
        match self.db.from(table).eq("id", id).update(&json!({ column: true })).await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("Failed to set {}.{} on {}: {}", table, column, id, e);
                false
            }
        }
    }
}

/// Ledger table reminded after the grace period.
struct LedgerSweep {
    table: &'static str,
    category: &'static str,
    title: &'static str,
    email: fn(&BrandingConfig, Vec<String>, &str, &str) -> OutgoingEmail,
    push_text: fn(&str, &str) -> String,
}

impl LedgerSweep {
    const CAJA_CHICA: LedgerSweep = LedgerSweep {
        table: "caja_chica_registros",
        category: "Caja Chica No Liquidada",
        title: "Caja Chica Sin Liquidar",
        email: templates::petty_cash_pending,
        push_text: petty_cash_text,
    };
    const FACTURA: LedgerSweep = LedgerSweep {
        table: "reg_facturable",
        category: "Registro Facturable No Liquidado",
        title: "Registro Facturable Sin Liquidar",
        email: templates::billable_pending,
        push_text: billable_text,
    };
}

fn petty_cash_text(concept: &str, date: &str) -> String {
    format!(
        "La caja chica por concepto de {} de {} aún no ha sido liquidada. {}",
        concept, date, ADVICE
    )
}

fn billable_text(activity: &str, date: &str) -> String {
    format!(
        "El registro facturable por concepto de {} de {} aún no ha sido liquidado. {}",
        activity, date, ADVICE
    )
}

struct PendingRecord {
    id: String,
    concept: String,
    date: String,
    email_sent: bool,
    push_sent: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(kind: SweepKind, push: (usize, usize, usize), email: (usize, usize, usize)) -> SweepSummary {
        SweepSummary {
            kind,
            push: SweepCounters { total: push.0, ok: push.1, fail: push.2 },
            email: SweepCounters { total: email.0, ok: email.1, fail: email.2 },
        }
    }

    #[test]
    fn push_only_messages() {
        assert_eq!(
            summary(SweepKind::Actividades, (0, 0, 0), (0, 0, 0)).message(),
            "No hay notificaciones push pendientes para actividades."
        );
        assert_eq!(
            summary(SweepKind::Habilitantes, (3, 2, 1), (0, 0, 0)).message(),
            "Hubo 2 notificaciones push de habilitantes exitosas y 1 fallidas."
        );
        assert_eq!(
            summary(SweepKind::Actividades, (2, 0, 2), (0, 0, 0)).message(),
            "No hubo notificaciones push de actividades exitosas y 2 fallidas."
        );
    }

    #[test]
    fn messages_with_email_channel() {
        assert_eq!(
            summary(SweepKind::CajaChica, (0, 0, 0), (0, 0, 0)).message(),
            "No hay notificaciones push pendientes para caja chica y no hay notificaciones email pendientes para caja chica."
        );
        assert_eq!(
            summary(SweepKind::Tramites, (4, 4, 0), (1, 0, 1)).message(),
            "Hubo 4 notificaciones push de trámites exitosas y ningunas fallidas y no hubo notificaciones email de trámites exitosas y 1 fallidas."
        );
        assert_eq!(
            summary(SweepKind::Factura, (0, 0, 0), (2, 2, 0)).message(),
            "No hay notificaciones push pendientes para registros facturables y hubo 2 notificaciones email de registros facturables exitosas y ningunas fallidas."
        );
    }

    #[test]
    fn windows_start_at_local_midnight() {
        // 03:00 UTC on May 2nd is still May 1st in Guayaquil (UTC-5).
        let now = Utc.with_ymd_and_hms(2024, 5, 2, 3, 0, 0).unwrap();
        let dates = SweepDates::starting(now, chrono_tz::America::Guayaquil);
        assert_eq!(dates.today, Utc.with_ymd_and_hms(2024, 5, 1, 5, 0, 0).unwrap());
        assert_eq!(dates.tomorrow, Utc.with_ymd_and_hms(2024, 5, 2, 5, 0, 0).unwrap());
        assert_eq!(dates.in_two_days, Utc.with_ymd_and_hms(2024, 5, 3, 5, 0, 0).unwrap());
        assert_eq!(dates.ledger_cutoff, Utc.with_ymd_and_hms(2024, 4, 21, 5, 0, 0).unwrap());
        assert_eq!(SweepDates::bound(&dates.today), "2024-05-01T05:00:00.000Z");
    }

    #[test]
    fn date_label_defaults_to_today() {
        let now = Utc.with_ymd_and_hms(2024, 5, 2, 15, 0, 0).unwrap();
        let dates = SweepDates::starting(now, chrono_tz::America::Guayaquil);
        assert_eq!(dates.label(None), "02/05/2024");
        assert_eq!(dates.label(Some("2024-04-30")), "30/04/2024");
    }

    #[test]
    fn deadline_texts() {
        assert_eq!(
            deadline_text(SweepKind::Actividades, SweepWindow::DayBefore, "Audiencia", ""),
            "Su actividad asignada 'Audiencia' vence mañana. Le recomendamos tomar las acciones pertinentes."
        );
        assert_eq!(
            deadline_text(SweepKind::Tramites, SweepWindow::SameDay, "Registro", ""),
            "Su trámite asignado Registro vence hoy. Le recomendamos tomar las acciones pertinentes."
        );
        assert_eq!(
            deadline_text(SweepKind::Habilitantes, SweepWindow::DayAfter, "RUC", "01/05/2024"),
            "Su habilitante asignada 'RUC' venció el 01/05/2024. Le recomendamos tomar las acciones pertinentes."
        );
        assert_eq!(deadline_title(SweepKind::Habilitantes, SweepWindow::DayAfter), "Habilitante Vencida");
        assert_eq!(deadline_title(SweepKind::Tramites, SweepWindow::SameDay), "Trámite Por Vencer");
    }

    #[test]
    fn sweep_kind_parses_route_segment() {
        assert_eq!("cajachica".parse::<SweepKind>(), Ok(SweepKind::CajaChica));
        assert_eq!("Factura".parse::<SweepKind>(), Ok(SweepKind::Factura));
        assert!("otros".parse::<SweepKind>().is_err());
        assert!(SweepKind::Tramites.sends_email());
        assert!(!SweepKind::Habilitantes.sends_email());
    }

    #[test]
    fn ledger_push_texts() {
        assert_eq!(
            (LedgerSweep::CAJA_CHICA.push_text)("Taxi", "01/05/2024"),
            "La caja chica por concepto de Taxi de 01/05/2024 aún no ha sido liquidada. Le recomendamos tomar las acciones pertinentes."
        );
        assert_eq!(
            (LedgerSweep::FACTURA.push_text)("Audiencia", "01/05/2024"),
            "El registro facturable por concepto de Audiencia de 01/05/2024 aún no ha sido liquidado. Le recomendamos tomar las acciones pertinentes."
        );
    }

    #[test]
    fn window_flags_and_categories() {
        assert_eq!(SweepWindow::SameDay.flag(), "notif_push_exp");
        assert_eq!(SweepWindow::DayAfter.category(), "Postvencimiento");
    }
}
