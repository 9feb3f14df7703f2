use crate::pipeline::{MatchRequest, Pipeline};
use actix_cors::Cors;
use actix_web::http::StatusCode;
use actix_web::{web, App, HttpResponse, HttpServer, Result as ActixResult};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::info;
use vecmatch_core::Error;
use vecmatch_storage::Scope;

/// Request bodies may carry large batches of vectors
const JSON_LIMIT: usize = 16 * 1024 * 1024;

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    code: &'static str,
}

pub struct RestApi;

impl RestApi {
    pub async fn start(pipeline: Arc<Pipeline>, port: u16) -> std::io::Result<()> {
        info!("REST API listening on 0.0.0.0:{}", port);
        HttpServer::new(move || {
            let cors = Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
                .max_age(3600);

            App::new()
                .wrap(cors)
                .app_data(web::Data::new(pipeline.clone()))
                .configure(Self::configure)
        })
        .bind(("0.0.0.0", port))?
        .run()
        .await
    }

    /// Register routes; expects `web::Data<Arc<Pipeline>>` in app data
    pub fn configure(cfg: &mut web::ServiceConfig) {
        cfg.app_data(web::JsonConfig::default().limit(JSON_LIMIT))
            .route("/match", web::post().to(match_vectors))
            .route("/context/{scope}", web::get().to(list_variables))
            .route("/context/{scope}/{name}", web::get().to(get_variable))
            .route("/context/{scope}/{name}", web::put().to(set_variable))
            .route("/context/{scope}/{name}", web::delete().to(delete_variable));
    }
}

fn status_for(error: &Error) -> StatusCode {
    match error {
        Error::InvalidInput(_) | Error::InvalidConfig(_) => StatusCode::BAD_REQUEST,
        Error::CatalogNotFound(_) | Error::NoResultsAboveThreshold { .. } => StatusCode::NOT_FOUND,
        Error::CatalogParseFailure(_)
        | Error::CatalogShapeInvalid(_)
        | Error::DegenerateVector { .. }
        | Error::NonNumericSimilarity { .. }
        | Error::VectorLengthMismatch { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        Error::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(error: &Error) -> HttpResponse {
    HttpResponse::build(status_for(error)).json(ErrorResponse {
        error: error.to_string(),
        code: error.code(),
    })
}

async fn match_vectors(
    pipeline: web::Data<Arc<Pipeline>>,
    req: web::Json<MatchRequest>,
) -> ActixResult<HttpResponse> {
    match pipeline.invoke(&req).await {
        Ok(output) => Ok(HttpResponse::Ok().json(output)),
        Err(e) => Ok(error_response(&e)),
    }
}

async fn list_variables(
    pipeline: web::Data<Arc<Pipeline>>,
    path: web::Path<String>,
) -> ActixResult<HttpResponse> {
    let scope = match path.into_inner().parse::<Scope>() {
        Ok(scope) => scope,
        Err(e) => return Ok(error_response(&e)),
    };

    let keys = pipeline.loader().stores().scope(scope).keys();
    Ok(HttpResponse::Ok().json(keys))
}

async fn get_variable(
    pipeline: web::Data<Arc<Pipeline>>,
    path: web::Path<(String, String)>,
) -> ActixResult<HttpResponse> {
    let (scope, name) = path.into_inner();
    let scope = match scope.parse::<Scope>() {
        Ok(scope) => scope,
        Err(e) => return Ok(error_response(&e)),
    };

    match pipeline.loader().stores().scope(scope).get(&name) {
        Some(value) => Ok(HttpResponse::Ok().json(value)),
        None => Ok(error_response(&Error::CatalogNotFound(format!("{scope}.{name}")))),
    }
}

async fn set_variable(
    pipeline: web::Data<Arc<Pipeline>>,
    path: web::Path<(String, String)>,
    body: web::Json<Value>,
) -> ActixResult<HttpResponse> {
    let (scope, name) = path.into_inner();
    let scope = match scope.parse::<Scope>() {
        Ok(scope) => scope,
        Err(e) => return Ok(error_response(&e)),
    };

    pipeline
        .loader()
        .stores()
        .scope(scope)
        .set(&name, body.into_inner());
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "result": true
    })))
}

async fn delete_variable(
    pipeline: web::Data<Arc<Pipeline>>,
    path: web::Path<(String, String)>,
) -> ActixResult<HttpResponse> {
    let (scope, name) = path.into_inner();
    let scope = match scope.parse::<Scope>() {
        Ok(scope) => scope,
        Err(e) => return Ok(error_response(&e)),
    };

    match pipeline.loader().stores().scope(scope).remove(&name) {
        Some(_) => Ok(HttpResponse::Ok().json(serde_json::json!({
            "result": true
        }))),
        None => Ok(error_response(&Error::CatalogNotFound(format!("{scope}.{name}")))),
    }
}
