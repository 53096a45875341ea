use std::net::SocketAddr;

use axum::{
    extract::{rejection::{JsonRejection, PathRejection}, ConnectInfo, Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use service::company::domain::{Company, CompanyUpdate, NewCompany};

use crate::errors::JsonApiError;
use crate::metrics::ORIGIN_DENIED_TOTAL;
use crate::routes::auth::ServerState;

#[derive(Debug, Serialize, Deserialize)]
pub struct CompanyCreated { pub id: i32, pub name: String }

async fn ensure_origin(state: &ServerState, addr: SocketAddr) -> Result<(), JsonApiError> {
    if state.origin.is_allowed(addr).await {
        return Ok(());
    }
    ORIGIN_DENIED_TOTAL.inc();
    warn!(ip = %addr.ip(), "origin denied");
    Err(JsonApiError::forbidden())
}

#[utoipa::path(get, path = "/v1/companies", tag = "companies", responses((status = 200, description = "List OK", body = [crate::openapi::CompanyDoc]), (status = 500, description = "List Failed")))]
pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<Company>>, JsonApiError> {
    let list = state.companies.list_companies().await?;
    Ok(Json(list))
}

#[utoipa::path(get, path = "/v1/companies/{id}", tag = "companies", params(("id" = i32, Path, description = "Company id")), responses((status = 200, description = "Found", body = crate::openapi::CompanyDoc), (status = 404, description = "Not Found")))]
pub async fn get(
    State(state): State<ServerState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<Company>, JsonApiError> {
    let Path(id) = id?;
    Ok(Json(state.companies.get_company(id).await?))
}

#[utoipa::path(
    post, path = "/v1/companies", tag = "companies",
    request_body = crate::openapi::NewCompanyDoc,
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Created", body = crate::openapi::CompanyCreatedDoc),
        (status = 400, description = "Validation Error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Origin Not Allowed"),
        (status = 500, description = "Create Failed")
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    body: Result<Json<NewCompany>, JsonRejection>,
) -> Result<Json<CompanyCreated>, JsonApiError> {
    ensure_origin(&state, addr).await?;
    let user_id = state.authorize(&headers)?;
    let Json(input) = body?;

    let country_id = state.companies.resolve_country(&input.country).await?;
    let id = state.companies.create_company(&input, country_id).await?;
    info!(%user_id, company_id = id, "company created");
    Ok(Json(CompanyCreated { id, name: input.name.trim().to_string() }))
}

#[utoipa::path(
    put, path = "/v1/companies/{id}", tag = "companies",
    params(("id" = i32, Path, description = "Company id")),
    request_body = crate::openapi::CompanyUpdateDoc,
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Updated", body = crate::openapi::CompanyDoc),
        (status = 400, description = "Validation Error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    headers: HeaderMap,
    id: Result<Path<i32>, PathRejection>,
    body: Result<Json<CompanyUpdate>, JsonRejection>,
) -> Result<Json<Company>, JsonApiError> {
    let user_id = state.authorize(&headers)?;
    let Path(id) = id?;
    let Json(input) = body?;

    let company = state.companies.update_company(id, &input).await?;
    info!(%user_id, company_id = id, "company updated");
    Ok(Json(company))
}

#[utoipa::path(
    delete, path = "/v1/companies/{id}", tag = "companies",
    params(("id" = i32, Path, description = "Company id")),
    security(("bearer" = [])),
    responses(
        (status = 204, description = "Deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Origin Not Allowed"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete(
    State(state): State<ServerState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    id: Result<Path<i32>, PathRejection>,
) -> Result<StatusCode, JsonApiError> {
    ensure_origin(&state, addr).await?;
    let user_id = state.authorize(&headers)?;
    let Path(id) = id?;

    state.companies.delete_company(id).await?;
    info!(%user_id, company_id = id, "company deleted");
    Ok(StatusCode::NO_CONTENT)
}
