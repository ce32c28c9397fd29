// src/routes.rs

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{config::AppState, docs::ApiDoc, handlers};

pub fn build_router(app_state: AppState) -> Router {
    let job_routes = Router::new()
        .route(
            "/",
            post(handlers::jobs::create_job)
                .get(handlers::jobs::list_jobs)
                .put(handlers::jobs::update_job),
        )
        .route("/start", post(handlers::jobs::start_job))
        .route("/form-data", get(handlers::jobs::form_data))
        .route("/pending", get(handlers::jobs::pending_jobs));

    let machine_routes = Router::new().route(
        "/",
        get(handlers::machines::list_machines)
            .post(handlers::machines::create_machine)
            .put(handlers::machines::update_machine),
    );

    let product_routes = Router::new()
        .route(
            "/",
            get(handlers::products::list_products)
                .post(handlers::products::create_product)
                .put(handlers::products::update_product),
        )
        .route("/count", get(handlers::products::product_counts))
        .route("/active", get(handlers::products::active_products))
        .route("/details", get(handlers::products::product_details));

    let operator_routes = Router::new().route(
        "/",
        get(handlers::operators::list_operators)
            .post(handlers::operators::create_operator)
            .put(handlers::operators::update_operator),
    );

    let report_routes = Router::new()
        .route("/", get(handlers::reports::production_report))
        .route("/export", get(handlers::reports::export_report));

    let dispatch_routes = Router::new()
        .route("/", get(handlers::dispatch::dispatch_report))
        .route("/slip", get(handlers::dispatch::dispatch_slip));

    // Combina tudo no router principal
    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/jobs", job_routes)
        .nest("/api/machines", machine_routes)
        .nest("/api/products", product_routes)
        .nest("/api/operators", operator_routes)
        .route(
            "/api/alerts",
            get(handlers::alerts::list_alerts).post(handlers::alerts::create_alert),
        )
        .nest("/api/reports", report_routes)
        .nest("/api/dispatch", dispatch_routes)
        .route("/api/manager/workpanel", get(handlers::workpanel::workpanel))
        .route(
            "/api/users",
            get(handlers::users::list_users).post(handlers::users::register_user),
        )
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // A UI roda em outra origem
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}
