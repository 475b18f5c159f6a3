// HTML bodies for every outgoing email. Plain string interpolation; the
// values come from our own database and configuration.

use crate::config::BrandingConfig;

use super::OutgoingEmail;

fn signature(brand: &BrandingConfig) -> String {
    format!("<p>Atentamente</p><p><b>El equipo de {}</b></p>", brand.app_name)
}

fn platform_link(brand: &BrandingConfig) -> String {
    format!(
        "<p>Para ingresar a la plataforma de {name} puede ingresar a través del siguiente link: <a href=\"{url}\">{name}</a></p>",
        name = brand.app_name,
        url = brand.app_url
    )
}

/// Welcome message with the provisional password of a new account.
pub fn welcome(brand: &BrandingConfig, email: &str, names: &str, surnames: &str, password: &str) -> OutgoingEmail {
    let html = format!(
        "<p>Hola {names} {surnames}</p><p>Has sido registrado en la plataforma de {app}.</p><p>Su usuario es el correo electrónico {email} y su contraseña provisional: <b>{password}</b></p><p>Al iniciar sesión por primera vez se le solicitará cambiar la contraseña.</p>{link}{sig}",
        app = brand.app_name,
        link = platform_link(brand),
        sig = signature(brand),
    );
    OutgoingEmail::to(email, format!("Registro de usuario exitoso en {}", brand.app_name), html)
}

/// Link that confirms a password reset request.
pub fn reset_link(brand: &BrandingConfig, email: &str, name: &str, token: &str) -> OutgoingEmail {
    let html = format!(
        "<p>Hola {name}</p><p>Se le ha enviado este email porque se solicitó un reseteo de contraseña en {app}.</p><p>Si usted no lo solicitó puede hacer caso omiso a este email.</p><p>De lo contrario, puede hacer click en el link de abajo para confirmar el reseteo de la contraseña. Este enlace tiene una duración de 1 hora pasado este tiempo deberá solicitar un reseteo de contraseña nuevamente.</p><p>Puede confirmar a través del siguiente link: <a href=\"{url}login?email={email}&token={token}\">{app}</a></p>{sig}",
        app = brand.app_name,
        url = brand.app_url,
        sig = signature(brand),
    );
    OutgoingEmail::to(email, format!("Reestablecimiento de contraseña en {}", brand.app_name), html)
}

/// Provisional password issued after a reset.
pub fn reset_confirmation(brand: &BrandingConfig, email: &str, name: &str, password: &str) -> OutgoingEmail {
    let html = format!(
        "<p>Hola {name}</p><p>Su contraseña ha sido reestablecida correctamente en {app}.</p><p>Su contraseña provisional: <b>{password}</b></p><p>Al iniciar sesión se le solicitará cambiar la contraseña.</p>{link}{sig}",
        app = brand.app_name,
        link = platform_link(brand),
        sig = signature(brand),
    );
    OutgoingEmail::to(
        email,
        format!("Confirmación de Reestablecimiento de contraseña en {}", brand.app_name),
        html,
    )
}

fn alert_body(brand: &BrandingConfig, heading: &str, paragraph: String) -> String {
    format!(
        "<h2>{heading}</h2><p>{paragraph}</p><p>Muchas gracias</p><p>Atentamente,</p><p><b>El equipo de {}</b></p>",
        brand.app_name
    )
}

/// Overdue procedure, addressed to the responsible user with administrators in BCC.
pub fn tramite_expired(
    brand: &BrandingConfig,
    to: &str,
    admins: Vec<String>,
    tramite_name: &str,
    responsible: &str,
    date: &str,
) -> OutgoingEmail {
    let paragraph = format!(
        "El trámite <strong>{tramite_name}</strong> asignado al usuario <strong>{responsible}</strong> venció el <strong>{date}</strong>. Le recomendamos tomar las acciones pertinentes."
    );
    OutgoingEmail::to(to, "Trámite Vencido", alert_body(brand, "TRÁMITE VENCIDO", paragraph)).with_bcc(admins)
}

/// Petty-cash record still pending liquidation, BCC to supervisors.
pub fn petty_cash_pending(brand: &BrandingConfig, supervisors: Vec<String>, concept: &str, date: &str) -> OutgoingEmail {
    let paragraph = format!(
        "La caja chica por concepto <strong>{concept}</strong> de fecha <strong>{date}</strong> aún no ha sido liquidada. Le recomendamos tomar las acciones pertinentes."
    );
    OutgoingEmail {
        to: Vec::new(),
        bcc: supervisors,
        subject: "Caja Chica Sin Liquidar".to_string(),
        html: alert_body(brand, "CAJA CHICA SIN LIQUIDAR", paragraph),
    }
}

/// Billable record still pending liquidation, BCC to supervisors.
pub fn billable_pending(brand: &BrandingConfig, supervisors: Vec<String>, activity: &str, date: &str) -> OutgoingEmail {
    let paragraph = format!(
        "El registro facturable por concepto <strong>{activity}</strong> de fecha <strong>{date}</strong> aún no ha sido liquidado. Le recomendamos tomar las acciones pertinentes."
    );
    OutgoingEmail {
        to: Vec::new(),
        bcc: supervisors,
        subject: "Registro Facturable Sin Liquidar".to_string(),
        html: alert_body(brand, "REGISTRO FACTURABLE SIN LIQUIDAR", paragraph),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brand() -> BrandingConfig {
        BrandingConfig {
            app_name: "AION".to_string(),
            app_url: "https://app.aion.ec/".to_string(),
        }
    }

    #[test]
    fn reset_link_points_at_login() {
        let email = reset_link(&brand(), "ana@estudio.ec", "Ana", "tok");
        assert_eq!(email.to, vec!["ana@estudio.ec"]);
        assert_eq!(email.subject, "Reestablecimiento de contraseña en AION");
        assert!(email
            .html
            .contains("href=\"https://app.aion.ec/login?email=ana@estudio.ec&token=tok\""));
    }

    #[test]
    fn welcome_carries_password() {
        let email = welcome(&brand(), "ana@estudio.ec", "Ana", "Pérez", "XyZ123");
        assert!(email.html.starts_with("<p>Hola Ana Pérez</p>"));
        assert!(email.html.contains("<b>XyZ123</b>"));
        assert!(email.html.contains("<b>El equipo de AION</b>"));
    }

    #[test]
    fn tramite_expired_uses_bcc_for_admins() {
        let email = tramite_expired(
            &brand(),
            "resp@estudio.ec",
            vec!["admin@estudio.ec".to_string()],
            "Registro de marca",
            "Ana Pérez",
            "01/05/2024",
        );
        assert_eq!(email.subject, "Trámite Vencido");
        assert_eq!(email.bcc, vec!["admin@estudio.ec"]);
        assert!(email.html.contains("<h2>TRÁMITE VENCIDO</h2>"));
        assert!(email.html.contains("venció el <strong>01/05/2024</strong>"));
    }

    #[test]
    fn pending_alerts_have_no_direct_recipient() {
        let email = petty_cash_pending(&brand(), vec!["sup@estudio.ec".to_string()], "Taxi", "01/05/2024");
        assert!(email.to.is_empty());
        assert!(email.has_recipients());

        let email = billable_pending(&brand(), vec!["sup@estudio.ec".to_string()], "Audiencia", "01/05/2024");
        assert_eq!(email.subject, "Registro Facturable Sin Liquidar");
    }
}
