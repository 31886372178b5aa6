// darkroom_service/src/web/routes.rs

use actix_web::web;

use crate::web::handlers::{draft_handlers, order_handlers, schedule_handlers};

async fn health_check_handler() -> actix_web::HttpResponse {
  actix_web::HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg.service(
    web::scope("/api/v1")
      .route("/health", web::get().to(health_check_handler))
      .service(
        web::scope("/orders")
          .route("", web::post().to(order_handlers::create_order_handler))
          .route("/{order_number}", web::get().to(order_handlers::get_order_handler)),
      )
      .route("/eta", web::get().to(schedule_handlers::eta_handler))
      .route("/drafts/preview", web::post().to(draft_handlers::preview_draft_handler)),
  );
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::AppConfig;
  use crate::state::AppState;
  use actix_web::http::StatusCode;
  use actix_web::{test, App};
  use chrono::{DateTime, TimeZone, Utc};
  use darkroom::services::memory::{MemoryOrderStore, MemoryProfiles};
  use serde_json::{json, Value};
  use tempfile::TempDir;
  use std::sync::Arc;
  use uuid::Uuid;

  struct TestEnv {
    _dir: TempDir,
    state: AppState,
  }

  impl TestEnv {
    async fn new() -> Self {
      let dir = tempfile::tempdir().unwrap();
      let root = dir.path();
      let staging = root.join("staging");
      tokio::fs::create_dir_all(staging.join("s1")).await.unwrap();
      tokio::fs::write(staging.join("s1/a.jpg"), b"raw bytes").await.unwrap();

      let config = AppConfig {
        server_host: "127.0.0.1".to_string(),
        server_port: 0,
        database_url: None,
        run_migrations: false,
        blob_root: root.join("blobs"),
        staging_root: staging,
        mail_sender: "orders@darkroom.local".to_string(),
        staff_notify_address: "studio@darkroom.local".to_string(),
        service_principal: "darkroom-intake".to_string(),
        business_utc_offset_minutes: 0,
        coupon_code: "DARKROOM10".to_string(),
        coupon_percent_off: 10,
      };
      let state = AppState::build(
        Arc::new(config),
        Arc::new(MemoryOrderStore::new()),
        Arc::new(MemoryProfiles::new()),
      )
      .unwrap();
      Self { _dir: dir, state }
    }
  }

  fn draft(terms_accepted: bool) -> Value {
    json!({
      "version": 1,
      "inputs": {
        "photo_type": "camera",
        "files": [{ "name": "a.jpg", "size_bytes": 9, "mime_type": "image/jpeg", "path": "s1/a.jpg" }],
        "package": "basic",
        "contact_email": "client@example.com",
        "terms_accepted": terms_accepted,
        "coupon_code": "darkroom10"
      }
    })
  }

  #[actix_web::test]
  async fn order_is_created_and_readable_by_its_owner_only() {
    let env = TestEnv::new().await;
    let app = test::init_service(
      App::new()
        .app_data(web::Data::new(env.state.clone()))
        .configure(configure_app_routes),
    )
    .await;
    let owner = Uuid::new_v4();

    let req = test::TestRequest::post()
      .uri("/api/v1/orders")
      .insert_header(("X-User-ID", owner.to_string()))
      .set_json(json!({ "draft": draft(true), "settlement_method": "card" }))
      .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(resp).await;
    assert_eq!(created["total_price_cents"], 1350);
    assert_eq!(created["discount_cents"], 150);
    assert_eq!(created["payment_flow_status"], "awaiting_gateway");
    assert!(created.get("notices").is_none());
    let number = created["order_number"].as_str().unwrap().to_string();

    let req = test::TestRequest::get()
      .uri(&format!("/api/v1/orders/{number}"))
      .insert_header(("X-User-ID", owner.to_string()))
      .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let fetched: Value = test::read_body_json(resp).await;
    assert_eq!(fetched["order_number"], number.as_str());
    assert_eq!(fetched["total_price"], "13.50");

    let req = test::TestRequest::get()
      .uri(&format!("/api/v1/orders/{number}"))
      .insert_header(("X-User-ID", Uuid::new_v4().to_string()))
      .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::get().uri(&format!("/api/v1/orders/{number}")).to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);

  }

  #[actix_web::test]
  async fn invalid_drafts_and_escaping_paths_are_rejected() {
    let env = TestEnv::new().await;
    let app = test::init_service(
      App::new()
        .app_data(web::Data::new(env.state.clone()))
        .configure(configure_app_routes),
    )
    .await;
    let owner = Uuid::new_v4().to_string();

    let req = test::TestRequest::post()
      .uri("/api/v1/orders")
      .insert_header(("X-User-ID", owner.clone()))
      .set_json(json!({ "draft": draft(false), "settlement_method": "invoice" }))
      .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

    let mut escaping = draft(true);
    escaping["inputs"]["files"][0]["path"] = json!("../../etc/passwd");
    let req = test::TestRequest::post()
      .uri("/api/v1/orders")
      .insert_header(("X-User-ID", owner))
      .set_json(json!({ "draft": escaping, "settlement_method": "invoice" }))
      .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

  }

  #[actix_web::test]
  async fn eta_and_preview_are_computed_server_side() {
    let env = TestEnv::new().await;
    let app = test::init_service(
      App::new()
        .app_data(web::Data::new(env.state.clone()))
        .configure(configure_app_routes),
    )
    .await;

    // 2024-01-01 is a Monday.
    let req = test::TestRequest::get()
      .uri("/api/v1/eta?created_at=2024-01-01T09:00:00Z&express=false")
      .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let eta: DateTime<Utc> = serde_json::from_value(body["eta"].clone()).unwrap();
    assert_eq!(eta, Utc.with_ymd_and_hms(2024, 1, 3, 10, 0, 0).unwrap());

    let mut no_package = draft(true);
    no_package["inputs"]["package"] = Value::Null;
    let req = test::TestRequest::post()
      .uri("/api/v1/drafts/preview")
      .set_json(no_package)
      .to_request();
    let preview: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(preview["resume_step"], "package");
    assert_eq!(preview["effective_unit_count"], 1);
    assert_eq!(preview["ready_to_submit"], false);
    assert!(preview["price"].is_null());

    let req = test::TestRequest::post()
      .uri("/api/v1/drafts/preview")
      .set_json(draft(true))
      .to_request();
    let preview: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(preview["resume_step"], "summary");
    assert_eq!(preview["total_price"], "13.50");
    assert_eq!(preview["is_valid"], true);

    let req = test::TestRequest::get().uri("/api/v1/health").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

  }
}
