use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
};
use chrono::Utc;
use gym_admin::db;
use gym_admin::entities::{member, membership_type};
use gym_admin::settings::Settings;
use gym_admin::validation::{DAY_TAKEN, EMAIL_TAKEN, MEMBER_REQUIRED};
use gym_admin::{AppState, build_router};
use sea_orm::{ActiveModelTrait, ConnectionTrait, DatabaseConnection, Set};
use serde_json::Value;
use tower::Service;

/// Helper function to create a router over a fresh in-memory database
async fn create_test_app() -> (Router, DatabaseConnection) {
    let settings = Settings {
        database_url: "sqlite::memory:".to_string(),
        max_connections: 1,
        debug: true,
        enable_swagger: true,
        port: 8080,
    };
    let db = db::connect(&settings.database_url, settings.max_connections)
        .await
        .unwrap();
    db::create_tables(&db).await.unwrap();

    let state = AppState {
        settings,
        db: db.clone(),
    };
    (build_router(state), db)
}

async fn seed_member(db: &DatabaseConnection, name: &str, email: &str) -> i64 {
    member::ActiveModel {
        name: Set(name.to_string()),
        email: Set(email.to_string()),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
    .id
}

async fn seed_membership_type(db: &DatabaseConnection, name: &str, price: f64) -> i64 {
    membership_type::ActiveModel {
        name: Set(name.to_string()),
        price: Set(price),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
    .id
}

async fn get(app: &mut Router, uri: &str) -> Response {
    app.call(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn post_form(app: &mut Router, uri: &str, body: &str) -> Response {
    app.call(
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

/// Helper to extract response body as JSON
async fn response_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn location(response: &Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap()
}

#[tokio::test]
async fn test_root_and_health_endpoints() {
    // Arrange
    let (mut app, _db) = create_test_app().await;

    // Act
    let root = get(&mut app, "/").await;
    let live = get(&mut app, "/healthz/live").await;
    let ready = get(&mut app, "/healthz/ready").await;

    // Assert
    assert_eq!(root.status(), StatusCode::OK);
    let body = response_json(root).await;
    assert_eq!(body["message"], "Gym Admin");
    assert_eq!(live.status(), StatusCode::OK);
    assert_eq!(ready.status(), StatusCode::OK);
    assert_eq!(response_json(ready).await["status"], "ok");
}

#[tokio::test]
async fn test_openapi_document_served() {
    let (mut app, _db) = create_test_app().await;

    let response = get(&mut app, "/openapi.json").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = response_json(response).await;
    assert!(body["paths"]["/schedules/store"].is_object());
}

#[tokio::test]
async fn test_schedule_lifecycle() {
    // Arrange
    let (mut app, _db) = create_test_app().await;
    let form = "day_of_week=Lunes&opening_time=07%3A00&closing_time=21%3A00&is_active=on";

    // Act - create
    let response = post_form(&mut app, "/schedules/store", form).await;

    // Assert
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/schedules?success=created");

    let index = response_json(get(&mut app, "/schedules?success=created").await).await;
    assert_eq!(index["flash"]["kind"], "success");
    assert_eq!(index["flash"]["message"], "Horario creado exitosamente");
    assert_eq!(index["items"].as_array().unwrap().len(), 1);
    assert_eq!(index["items"][0]["day_of_week"], "Lunes");
    assert_eq!(index["items"][0]["is_active"], true);
    let id = index["items"][0]["id"].as_i64().unwrap();

    // Act - second Monday is rejected and the input is echoed back
    let response = post_form(&mut app, "/schedules/store", form).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = response_json(response).await;
    assert_eq!(body["errors"]["day_of_week"], DAY_TAKEN);
    assert_eq!(body["values"]["opening_time"], "07:00");

    // Act - resubmitting Monday for the same row is fine
    let update = format!("id={id}&day_of_week=Lunes&opening_time=08%3A00&closing_time=20%3A00");
    let response = post_form(&mut app, "/schedules/update", &update).await;
    assert_eq!(location(&response), "/schedules?success=updated");

    let edit = response_json(get(&mut app, &format!("/schedules/edit?id={id}")).await).await;
    assert_eq!(edit["values"]["opening_time"], "08:00:00");
    // checkbox left out of the update form
    assert_eq!(edit["values"]["is_active"], false);

    // Act - delete twice
    let first = get(&mut app, &format!("/schedules/delete?id={id}")).await;
    let second = get(&mut app, &format!("/schedules/delete?id={id}")).await;
    assert_eq!(location(&first), "/schedules?success=deleted");
    assert_eq!(location(&second), "/schedules?error=delete_failed");
}

#[tokio::test]
async fn test_schedule_closing_before_opening() {
    let (mut app, _db) = create_test_app().await;

    let response = post_form(
        &mut app,
        "/schedules/store",
        "day_of_week=Martes&opening_time=17%3A00&closing_time=09%3A00",
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = response_json(response).await;
    let errors = body["errors"].as_object().unwrap();
    assert_eq!(errors.len(), 1);
    assert!(errors.contains_key("closing_time"));
}

#[tokio::test]
async fn test_edit_and_delete_without_valid_id_redirect() {
    let (mut app, _db) = create_test_app().await;

    let missing = get(&mut app, "/classes/edit").await;
    let unknown = get(&mut app, "/instructors/edit?id=99").await;
    let garbage = get(&mut app, "/schedules/delete?id=abc").await;
    let no_id_update = post_form(&mut app, "/classes/update", "name=Yoga").await;

    assert_eq!(location(&missing), "/classes?error=not_found");
    assert_eq!(location(&unknown), "/instructors?error=not_found");
    assert_eq!(location(&garbage), "/schedules?error=delete_failed");
    assert_eq!(location(&no_id_update), "/classes?error=not_found");

    let index = response_json(get(&mut app, "/classes?error=not_found").await).await;
    assert_eq!(index["flash"]["kind"], "error");
    assert_eq!(index["flash"]["message"], "Clase no encontrada");
}

#[tokio::test]
async fn test_class_create_and_invalid_update() {
    // Arrange
    let (mut app, _db) = create_test_app().await;
    let form = "name=Spinning&instructor=Laura&schedule_time=18%3A30&schedule_days=Lunes%2C+Jueves&capacity=20";

    // Act
    let created = post_form(&mut app, "/classes/store", form).await;
    let index = response_json(get(&mut app, "/classes").await).await;
    let id = index["items"][0]["id"].as_i64().unwrap();
    let rejected = post_form(
        &mut app,
        "/classes/update",
        &format!("id={id}&name=&instructor=Laura&schedule_time=18%3A30&schedule_days=Lunes&capacity=0"),
    )
    .await;

    // Assert
    assert_eq!(location(&created), "/classes?success=created");
    assert_eq!(index["items"][0]["name"], "Spinning");
    assert_eq!(index["items"][0]["capacity"], 20);
    assert!(index["flash"].is_null());

    assert_eq!(rejected.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = response_json(rejected).await;
    // the form shows the stored class again, not the rejected input
    assert_eq!(body["values"]["name"], "Spinning");
    assert_eq!(body["values"]["capacity"], 20);
    let errors = body["errors"].as_object().unwrap();
    assert_eq!(errors.len(), 2);
    assert!(errors.contains_key("name"));
    assert!(errors.contains_key("capacity"));
}

#[tokio::test]
async fn test_class_store_reports_every_missing_field() {
    let (mut app, _db) = create_test_app().await;

    let fresh = get(&mut app, "/classes/create").await;
    let response = post_form(&mut app, "/classes/store", "description=Nada").await;

    assert_eq!(fresh.status(), StatusCode::OK);
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = response_json(response).await;
    let errors = body["errors"].as_object().unwrap();
    for field in ["name", "instructor", "schedule_time", "schedule_days", "capacity"] {
        assert!(errors.contains_key(field), "missing error for {field}");
    }
    assert_eq!(body["values"]["description"], "Nada");
}

#[tokio::test]
async fn test_instructor_email_must_be_unique() {
    // Arrange
    let (mut app, _db) = create_test_app().await;
    let form = "name=Carlos&email=a%40x.com&hire_date=2024-01-15&specialization=Crossfit";

    // Act
    let first = post_form(&mut app, "/instructors/store", form).await;
    let second = post_form(&mut app, "/instructors/store", form).await;

    // Assert
    assert_eq!(location(&first), "/instructors?success=created");
    assert_eq!(second.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = response_json(second).await;
    assert_eq!(body["errors"]["email"], EMAIL_TAKEN);

    let index = response_json(get(&mut app, "/instructors").await).await;
    let id = index["items"][0]["id"].as_i64().unwrap();
    assert_eq!(index["items"][0]["status"], "active");

    let updated = post_form(
        &mut app,
        "/instructors/update",
        &format!("id={id}&name=Carlos+Ruiz&email=a%40x.com&hire_date=2024-01-15&status=inactive"),
    )
    .await;
    assert_eq!(location(&updated), "/instructors?success=updated");

    let edit = response_json(get(&mut app, &format!("/instructors/edit?id={id}")).await).await;
    assert_eq!(edit["values"]["name"], "Carlos Ruiz");
    assert_eq!(edit["values"]["status"], "inactive");
    assert!(edit["values"]["specialization"].is_null());
}

#[tokio::test]
async fn test_payment_flow_with_joined_listing() {
    // Arrange
    let (mut app, db) = create_test_app().await;
    let ana = seed_member(&db, "Ana", "ana@mail.com").await;
    let monthly = seed_membership_type(&db, "Mensual", 50.0).await;
    seed_membership_type(&db, "Día", 8.0).await;

    // Act
    let form = get(&mut app, "/payments/create").await;
    let stored = post_form(
        &mut app,
        "/payments/store",
        &format!("member_id={ana}&membership_type_id={monthly}&amount=50.00&payment_date=2025-03-01"),
    )
    .await;
    let index = response_json(get(&mut app, "/payments?success=created").await).await;

    // Assert
    assert_eq!(form.status(), StatusCode::OK);
    let form = response_json(form).await;
    assert_eq!(form["members"][0]["name"], "Ana");
    assert_eq!(form["membership_types"][0]["name"], "Día");

    assert_eq!(location(&stored), "/payments?success=created");
    assert_eq!(index["flash"]["message"], "Pago registrado exitosamente");
    let payment = &index["items"][0];
    assert_eq!(payment["member_name"], "Ana");
    assert_eq!(payment["member_email"], "ana@mail.com");
    assert_eq!(payment["membership_type_name"], "Mensual");
    assert_eq!(payment["membership_price"], 50.0);
    assert_eq!(payment["payment_method"], "cash");

    let history = response_json(get(&mut app, &format!("/payments/member?member_id={ana}")).await).await;
    assert_eq!(history.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_payment_for_unknown_member_is_a_field_error() {
    let (mut app, db) = create_test_app().await;
    let monthly = seed_membership_type(&db, "Mensual", 50.0).await;

    let response = post_form(
        &mut app,
        "/payments/store",
        &format!("member_id=404&membership_type_id={monthly}&amount=50&payment_date=2025-03-01"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = response_json(response).await;
    assert_eq!(body["errors"]["member_id"], MEMBER_REQUIRED);
    assert!(body["errors"].get("membership_type_id").is_none());
    assert_eq!(body["values"]["member_id"], "404");
}

#[tokio::test]
async fn test_storage_failure_returns_generic_error() {
    // Arrange
    let (mut app, db) = create_test_app().await;
    db.execute_unprepared("DROP TABLE classes").await.unwrap();

    // Act
    let response = get(&mut app, "/classes").await;

    // Assert
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = response_json(response).await;
    assert!(!body["error"].as_str().unwrap().contains("classes"));
}

#[tokio::test]
async fn test_repeated_form_keys_keep_last_value() {
    // Arrange
    let (mut app, _db) = create_test_app().await;

    // Act - hidden input followed by the ticked checkbox
    let schedule = post_form(
        &mut app,
        "/schedules/store",
        "day_of_week=Lunes&opening_time=07%3A00&closing_time=21%3A00&is_active=0&is_active=1",
    )
    .await;
    // Act - hidden input alone
    let unticked = post_form(
        &mut app,
        "/schedules/store",
        "day_of_week=Martes&opening_time=07%3A00&closing_time=21%3A00&is_active=0",
    )
    .await;
    let class = post_form(
        &mut app,
        "/classes/store",
        "name=A&name=Pilates&instructor=Marta&schedule_time=10%3A00&schedule_days=Lunes&capacity=12",
    )
    .await;

    // Assert
    assert_eq!(location(&schedule), "/schedules?success=created");
    assert_eq!(location(&unticked), "/schedules?success=created");
    assert_eq!(location(&class), "/classes?success=created");

    let schedules = response_json(get(&mut app, "/schedules").await).await;
    assert_eq!(schedules["items"][0]["day_of_week"], "Lunes");
    assert_eq!(schedules["items"][0]["is_active"], true);
    assert_eq!(schedules["items"][1]["day_of_week"], "Martes");
    assert_eq!(schedules["items"][1]["is_active"], false);

    let classes = response_json(get(&mut app, "/classes").await).await;
    assert_eq!(classes["items"][0]["name"], "Pilates");
}

#[tokio::test]
async fn test_unreadable_form_body_rerenders_form() {
    let (mut app, _db) = create_test_app().await;

    let response = app
        .call(
            Request::builder()
                .method("POST")
                .uri("/schedules/store")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"day_of_week":"Lunes"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = response_json(response).await;
    assert!(body["values"].is_object());
    let errors = body["errors"].as_object().unwrap();
    assert!(errors.contains_key("day_of_week"));
    assert!(errors.contains_key("opening_time"));
    assert!(errors.contains_key("closing_time"));
}

#[tokio::test]
async fn test_instructor_email_ignores_case() {
    let (mut app, _db) = create_test_app().await;

    let first = post_form(
        &mut app,
        "/instructors/store",
        "name=Ana&email=Ana%40Gym.com&hire_date=2024-03-01",
    )
    .await;
    let second = post_form(
        &mut app,
        "/instructors/store",
        "name=Otra&email=ANA%40GYM.COM&hire_date=2024-03-02",
    )
    .await;

    assert_eq!(location(&first), "/instructors?success=created");
    assert_eq!(second.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response_json(second).await["errors"]["email"], EMAIL_TAKEN);

    let index = response_json(get(&mut app, "/instructors").await).await;
    assert_eq!(index["items"].as_array().unwrap().len(), 1);
    assert_eq!(index["items"][0]["email"], "ana@gym.com");
}
