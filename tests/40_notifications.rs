mod common;

use axum::http::StatusCode;
use common::{message, TestApp};
use httpmock::prelude::*;
use httpmock::Method::PATCH;
use serde_json::json;

#[tokio::test]
async fn actividades_without_pending_rows() {
    let app = TestApp::start().await;
    app.backend
        .mock_async(|when, then| {
            when.method(GET).path("/rest/v1/actividades");
            then.status(200).json_body(json!([]));
        })
        .await;

    let (status, body) = app.get("/notifications/actividades").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(message(&body), "No hay notificaciones push pendientes para actividades.");
}

#[tokio::test]
async fn actividades_due_today_get_one_push_and_a_flag() {
    let app = TestApp::start().await;
    for flag in ["notif_push_pre", "notif_push_post"] {
        app.backend
            .mock_async(|when, then| {
                when.method(GET).path("/rest/v1/actividades").query_param(flag, "eq.false");
                then.status(200).json_body(json!([]));
            })
            .await;
    }
    app.backend
        .mock_async(|when, then| {
            when.method(GET)
                .path("/rest/v1/actividades")
                .query_param("notif_push_exp", "eq.false");
            then.status(200).json_body(json!([{
                "id": "a1",
                "activity_name": "Audiencia preliminar",
                "responsible_id": "u1",
                "end_date_planned": "2024-05-02T15:00:00Z"
            }]));
        })
        .await;
    let push = app
        .backend
        .mock_async(|when, then| {
            when.method(POST)
                .path("/rest/v1/notifications_push")
                .json_body_partial(r#"{ "category": "Vencimiento", "related_id": "a1", "user_id": "u1" }"#);
            then.status(201);
        })
        .await;
    let flag = app
        .backend
        .mock_async(|when, then| {
            when.method(PATCH)
                .path("/rest/v1/actividades")
                .query_param("id", "eq.a1")
                .json_body(json!({ "notif_push_exp": true }));
            then.status(204);
        })
        .await;

    let (status, body) = app.get("/notifications/actividades").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        message(&body),
        "Hubo 1 notificaciones push de actividades exitosas y ningunas fallidas."
    );
    push.assert_async().await;
    flag.assert_async().await;
}

#[tokio::test]
async fn failed_push_leaves_the_flag_unset() {
    let app = TestApp::start().await;
    app.backend
        .mock_async(|when, then| {
            when.method(GET).path("/rest/v1/habilitantes");
            then.status(200).json_body(json!([{ "id": "h1", "client_id": "c1", "habilitantes_name": "Patente municipal" }]));
        })
        .await;
    app.backend
        .mock_async(|when, then| {
            when.method(GET).path("/rest/v1/users");
            then.status(200).json_body(json!([{ "id": "u9", "client_id": "c1" }]));
        })
        .await;
    app.backend
        .mock_async(|when, then| {
            when.method(POST).path("/rest/v1/notifications_push");
            then.status(500).json_body(json!({ "message": "insert failed" }));
        })
        .await;
    let flag = app
        .backend
        .mock_async(|when, then| {
            when.method(PATCH).path("/rest/v1/habilitantes");
            then.status(204);
        })
        .await;

    let (status, body) = app.get("/notifications/habilitantes").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        message(&body),
        "No hubo notificaciones push de habilitantes exitosas y 3 fallidas."
    );
    assert_eq!(flag.hits_async().await, 0);
}

#[tokio::test]
async fn caja_chica_reminds_every_supervisor() {
    let app = TestApp::start().await;
    app.backend
        .mock_async(|when, then| {
            when.method(GET)
                .path("/rest/v1/caja_chica_registros")
                .query_param("client_liquidation", "eq.false");
            then.status(200).json_body(json!([{
                "id": "cc1",
                "concept": "Copias notariadas",
                "date": "2024-04-10T17:00:00Z"
            }]));
        })
        .await;
    app.backend
        .mock_async(|when, then| {
            when.method(GET).path("/rest/v1/users").query_param("rol_name", "eq.Supervisor");
            then.status(200).json_body(json!([
                { "id": "s1", "email": "sup1@estudio.ec" },
                { "id": "s2", "email": "sup2@estudio.ec" }
            ]));
        })
        .await;
    let pushes = app
        .backend
        .mock_async(|when, then| {
            when.method(POST).path("/rest/v1/notifications_push");
            then.status(201);
        })
        .await;
    app.backend
        .mock_async(|when, then| {
            when.method(PATCH).path("/rest/v1/caja_chica_registros");
            then.status(204);
        })
        .await;

    let (status, body) = app.get("/notifications/cajachica").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        message(&body),
        "Hubo 2 notificaciones push de caja chica exitosas y ningunas fallidas y hubo 1 notificaciones email de caja chica exitosas y ningunas fallidas."
    );
    assert_eq!(pushes.hits_async().await, 2);

    let sent = app.mailer.sent();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].to.is_empty());
    assert_eq!(sent[0].bcc, vec!["sup1@estudio.ec".to_string(), "sup2@estudio.ec".to_string()]);
}

#[tokio::test]
async fn mail_failure_skips_the_record() {
    let app = TestApp::with_failing_mailer().await;
    app.backend
        .mock_async(|when, then| {
            when.method(GET).path("/rest/v1/reg_facturable");
            then.status(200).json_body(json!([{ "id": "rf1", "activity": "Revisión de contrato" }]));
        })
        .await;
    app.backend
        .mock_async(|when, then| {
            when.method(GET).path("/rest/v1/users");
            then.status(200).json_body(json!([{ "id": "s1", "email": "sup1@estudio.ec" }]));
        })
        .await;
    let pushes = app
        .backend
        .mock_async(|when, then| {
            when.method(POST).path("/rest/v1/notifications_push");
            then.status(201);
        })
        .await;

    let (status, body) = app.get("/notifications/factura").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        message(&body),
        "No hay notificaciones push pendientes para registros facturables y no hubo notificaciones email de registros facturables exitosas y 1 fallidas."
    );
    assert_eq!(pushes.hits_async().await, 0);
}

#[tokio::test]
async fn tramites_without_pending_rows() {
    let app = TestApp::start().await;
    app.backend
        .mock_async(|when, then| {
            when.method(GET).path("/rest/v1/client_tramites");
            then.status(200).json_body(json!([]));
        })
        .await;
    app.backend
        .mock_async(|when, then| {
            when.method(GET).path("/rest/v1/users");
            then.status(200).json_body(json!([]));
        })
        .await;

    let (status, body) = app.get("/notifications/tramites").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        message(&body),
        "No hay notificaciones push pendientes para trámites y no hay notificaciones email pendientes para trámites."
    );
}

/// Mocks shared by the overdue trámite runs: empty upcoming windows, one
/// overdue row, one administrator and the responsible user.
async fn overdue_tramite_backend(app: &TestApp, row: serde_json::Value) {
    for flag in ["notif_push_pre", "notif_push_exp"] {
        app.backend
            .mock_async(|when, then| {
                when.method(GET).path("/rest/v1/client_tramites").query_param(flag, "eq.false");
                then.status(200).json_body(json!([]));
            })
            .await;
    }
    app.backend
        .mock_async(|when, then| {
            when.method(GET).path("/rest/v1/client_tramites").query_param_exists("or");
            then.status(200).json_body(json!([row]));
        })
        .await;
    app.backend
        .mock_async(|when, then| {
            when.method(GET).path("/rest/v1/users").query_param("rol_name", "eq.Administrador");
            then.status(200).json_body(json!([{ "id": "ad1", "email": "admin@estudio.ec" }]));
        })
        .await;
    app.backend
        .mock_async(|when, then| {
            when.method(GET).path("/rest/v1/users").query_param("id", "eq.u1");
            then.status(200).json_body(json!([{
                "id": "u1",
                "email": "luis@estudio.ec",
                "display_name": "Luis Mora"
            }]));
        })
        .await;
}

#[tokio::test]
async fn overdue_tramite_mails_responsible_and_pushes_everyone() {
    let app = TestApp::start().await;
    overdue_tramite_backend(
        &app,
        json!({
            "id": "t1",
            "tramite_name": "Inscripción de marca",
            "responsible_id": "u1",
            "end_date_planned": "2024-04-28T15:00:00Z"
        }),
    )
    .await;
    let responsible_push = app
        .backend
        .mock_async(|when, then| {
            when.method(POST)
                .path("/rest/v1/notifications_push")
                .json_body_partial(r#"{ "user_id": "u1", "related_id": "t1", "email": true, "category": "Postvencimiento" }"#);
            then.status(201);
        })
        .await;
    let admin_push = app
        .backend
        .mock_async(|when, then| {
            when.method(POST)
                .path("/rest/v1/notifications_push")
                .json_body_partial(r#"{ "user_id": "ad1", "related_id": "t1" }"#);
            then.status(201);
        })
        .await;
    let mut flags = Vec::new();
    for column in ["notif_email_post", "notif_push_post", "notif_push_admin_post"] {
        flags.push(
            app.backend
                .mock_async(|when, then| {
                    when.method(PATCH)
                        .path("/rest/v1/client_tramites")
                        .query_param("id", "eq.t1")
                        .json_body(json!({ column: true }));
                    then.status(204);
                })
                .await,
        );
    }

    let (status, body) = app.get("/notifications/tramites").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        message(&body),
        "Hubo 2 notificaciones push de trámites exitosas y ningunas fallidas y hubo 1 notificaciones email de trámites exitosas y ningunas fallidas."
    );
    responsible_push.assert_async().await;
    admin_push.assert_async().await;
    for flag in &flags {
        flag.assert_async().await;
    }

    let sent = app.mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, vec!["luis@estudio.ec".to_string()]);
    assert_eq!(sent[0].bcc, vec!["admin@estudio.ec".to_string()]);
    assert!(sent[0].html.contains("Inscripción de marca"));
}

#[tokio::test]
async fn overdue_tramite_only_repeats_what_is_unflagged() {
    let app = TestApp::start().await;
    overdue_tramite_backend(
        &app,
        json!({
            "id": "t1",
            "tramite_name": "Inscripción de marca",
            "responsible_id": "u1",
            "end_date_planned": "2024-04-28T15:00:00Z",
            "notif_email_post": true,
            "notif_push_post": true,
            "notif_push_admin_post": false
        }),
    )
    .await;
    let responsible_push = app
        .backend
        .mock_async(|when, then| {
            when.method(POST)
                .path("/rest/v1/notifications_push")
                .json_body_partial(r#"{ "user_id": "u1" }"#);
            then.status(201);
        })
        .await;
    let admin_push = app
        .backend
        .mock_async(|when, then| {
            when.method(POST)
                .path("/rest/v1/notifications_push")
                .json_body_partial(r#"{ "user_id": "ad1" }"#);
            then.status(201);
        })
        .await;
    let mut responsible_flags = Vec::new();
    for column in ["notif_email_post", "notif_push_post"] {
        responsible_flags.push(
            app.backend
                .mock_async(|when, then| {
                    when.method(PATCH)
                        .path("/rest/v1/client_tramites")
                        .json_body(json!({ column: true }));
                    then.status(204);
                })
                .await,
        );
    }
    let admin_flag = app
        .backend
        .mock_async(|when, then| {
            when.method(PATCH)
                .path("/rest/v1/client_tramites")
                .json_body(json!({ "notif_push_admin_post": true }));
            then.status(204);
        })
        .await;

    let (status, body) = app.get("/notifications/tramites").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        message(&body),
        "Hubo 1 notificaciones push de trámites exitosas y ningunas fallidas y no hay notificaciones email pendientes para trámites."
    );
    assert!(app.mailer.sent().is_empty());
    assert_eq!(responsible_push.hits_async().await, 0);
    assert_eq!(admin_push.hits_async().await, 1);
    for flag in &responsible_flags {
        assert_eq!(flag.hits_async().await, 0);
    }
    admin_flag.assert_async().await;
}

#[tokio::test]
async fn custom_email_requires_subject() {
    let app = TestApp::start().await;
    let (status, body) = app
        .post(
            "/notifications/customEmail",
            json!({ "email": "cliente@empresa.ec", "html_format": "<p>Hola</p>" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(message(&body).contains("No se proporcionó un asunto"));
    assert!(app.mailer.sent().is_empty());
}

#[tokio::test]
async fn custom_email_is_sent() {
    let app = TestApp::start().await;
    let (status, body) = app
        .post(
            "/notifications/customEmail",
            json!({ "email": "cliente@empresa.ec", "subject": "Avance", "html_format": "<p>Hola</p>" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(message(&body), "Correo electrónico enviado correctamente.");

    let sent = app.mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].subject, "Avance");
    assert_eq!(sent[0].html, "<p>Hola</p>");
}

#[tokio::test]
async fn sweep_in_production_needs_a_token() {
    let app = TestApp::production().await;
    let (status, _) = app.get("/notifications/actividades").await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
