use std::time::Duration;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use clinic_api::{
    config::AppConfig,
    db::{create_pool, run_migrations},
    dto::users::NewUser,
    models::Role,
    routes::create_app,
    services::user_service,
    state::AppState,
};
use serde_json::{Value, json};
use tower::ServiceExt;

// Integration flow: admin logs in and creates staff; secretary registers a
// patient and books an appointment; doctor records tooth work; admin deletes
// the patient and everything attached goes with it.
#[tokio::test]
async fn clinic_staff_flow() -> anyhow::Result<()> {
    // Allow skipping when no DB is configured in the environment.
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
            );
            return Ok(());
        }
    };

    let state = setup_state(&database_url).await?;
    user_service::register_user(
        &state,
        NewUser {
            email: "admin@clinic.example".into(),
            password: "admin123".into(),
            role: Role::Admin,
        },
    )
    .await?;
    let app = create_app(state.clone());

    // Login
    let (status, body) = send(
        &app,
        Method::POST,
        "/users/login",
        None,
        Some(json!({ "email": "admin@clinic.example", "password": "admin123" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "Admin");
    let admin = body["token"].as_str().unwrap().to_string();
    let identity = state.tokens.verify(Some(&admin))?;
    assert_eq!(identity.email, "admin@clinic.example");
    assert_eq!(identity.role, Role::Admin);

    let (status, body) = send(
        &app,
        Method::POST,
        "/users/login",
        None,
        Some(json!({ "email": "admin@clinic.example", "password": "wrong-password" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Invalid email or password.");

    let (status, body) = send(
        &app,
        Method::POST,
        "/users/login",
        None,
        Some(json!({ "email": "nobody@clinic.example", "password": "whatever" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "User not found.");

    // Staff accounts
    for (email, role) in [
        ("secretary@clinic.example", "Secretary"),
        ("doctor@clinic.example", "Doctor"),
    ] {
        let (status, body) = send(
            &app,
            Method::POST,
            "/users/register",
            Some(&admin),
            Some(json!({ "email": email, "password": "secret1", "role": role })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["message"], "User created successfully.");
    }

    let (status, body) = send(
        &app,
        Method::POST,
        "/users/register",
        Some(&admin),
        Some(json!({ "email": "doctor@clinic.example", "password": "secret1", "role": "Doctor" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "User already exists.");

    let (_, users) = send(&app, Method::GET, "/users/allusers", Some(&admin), None).await;
    let users = users.as_array().unwrap();
    assert_eq!(users.len(), 3);
    assert!(users.iter().all(|u| u.get("password").is_none()));

    let secretary = login(&app, "secretary@clinic.example", "secret1").await;
    let doctor = login(&app, "doctor@clinic.example", "secret1").await;

    // Patients
    let (status, body) = send(
        &app,
        Method::POST,
        "/patients/register",
        Some(&secretary),
        Some(json!({ "name": "Jane Doe" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({ "message": "Patient added successfully." }));

    let (_, patients) = send(&app, Method::GET, "/patients/allpatients", Some(&secretary), None).await;
    let patient_id = patients[0]["id"].as_i64().unwrap();

    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/patients/edit/{patient_id}"),
        Some(&secretary),
        Some(json!({ "medical_history": "Penicillin allergy" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, patient) = send(
        &app,
        Method::GET,
        &format!("/patients/getpatient/{patient_id}"),
        Some(&secretary),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(patient["name"], "Jane Doe");
    assert_eq!(patient["medical_history"], "Penicillin allergy");
    assert_eq!(patient["contact"], Value::Null);

    let (status, body) = send(
        &app,
        Method::PUT,
        "/patients/edit/999999",
        Some(&secretary),
        Some(json!({ "name": "Nobody" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Patient not found.");

    // Appointments
    let (status, _) = send(
        &app,
        Method::POST,
        "/appointments/register",
        Some(&secretary),
        Some(json!({
            "patient_id": patient_id,
            "date": "2025-06-01T14:00:00Z",
            "description": "Cleaning"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        &app,
        Method::POST,
        "/appointments/register",
        Some(&secretary),
        Some(json!({
            "patient_id": 999999,
            "date": "2025-06-01",
            "description": "Ghost"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Patient not found.");

    let (_, on_day) = send(
        &app,
        Method::GET,
        "/appointments/getappointmentsD?date=2025-06-01",
        Some(&secretary),
        None,
    )
    .await;
    assert_eq!(on_day.as_array().unwrap().len(), 1);
    let (_, next_day) = send(
        &app,
        Method::GET,
        "/appointments/getappointmentsD?date=2025-06-02",
        Some(&secretary),
        None,
    )
    .await;
    assert!(next_day.as_array().unwrap().is_empty());

    let (_, for_patient) = send(
        &app,
        Method::GET,
        &format!("/appointments/getappointmentP/{patient_id}"),
        Some(&secretary),
        None,
    )
    .await;
    let appointment_id = for_patient[0]["id"].as_i64().unwrap();
    assert_eq!(for_patient[0]["description"], "Cleaning");

    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/appointments/edit/{appointment_id}"),
        Some(&secretary),
        Some(json!({ "description": "Deep cleaning" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Tooth work: repeating the upsert keeps one row with the latest values.
    let tooth_uri = format!("/teeth/patients/{patient_id}/teeth/14");
    for notes in ["First visit", "Second visit"] {
        let (status, body) = send(
            &app,
            Method::PUT,
            &tooth_uri,
            Some(&doctor),
            Some(json!({ "status": "filled", "notes": notes })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Tooth 14 updated successfully.");
    }
    let teeth_uri = format!("/teeth/patients/{patient_id}/teeth");
    let (_, teeth) = send(&app, Method::GET, &teeth_uri, Some(&doctor), None).await;
    let teeth = teeth.as_array().unwrap();
    assert_eq!(teeth.len(), 1);
    assert_eq!(teeth[0]["tooth_number"], 14);
    assert_eq!(teeth[0]["notes"], "Second visit");

    // Deleting the patient removes its appointments and tooth work.
    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/patients/delete/{patient_id}"),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (_, teeth) = send(&app, Method::GET, &teeth_uri, Some(&doctor), None).await;
    assert!(teeth.as_array().unwrap().is_empty());
    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/appointments/delete/{appointment_id}"),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    Ok(())
}

async fn setup_state(database_url: &str) -> anyhow::Result<AppState> {
    let pool = create_pool(database_url, 5).await?;
    run_migrations(&pool).await?;

    // Clean tables between runs
    sqlx::query(
        "TRUNCATE TABLE teeth_work, appointments, patients, users RESTART IDENTITY CASCADE",
    )
    .execute(&pool)
    .await?;

    let config = AppConfig {
        database_url: database_url.to_string(),
        host: "127.0.0.1".into(),
        port: 0,
        jwt_secret: "clinic-flow-secret".into(),
        token_ttl: Duration::from_secs(3600),
        store_timeout: Duration::from_secs(5),
        max_connections: 5,
    };
    Ok(AppState::new(pool, &config))
}

async fn login(app: &Router, email: &str, password: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/users/login",
        None,
        Some(json!({ "email": email, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed for {email}");
    body["token"].as_str().unwrap().to_string()
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let body = match body {
        Some(json) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    let response = app.clone().oneshot(request.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}
