use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, ToSchema};
use uuid::Uuid;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct CredentialsDoc { pub name: String, pub password: String }

#[derive(ToSchema)]
pub struct RegisterOutputDoc { pub id: Uuid, pub name: String }

#[derive(ToSchema)]
pub struct LoginOutputDoc {
    pub token: String,
    pub user_id: Uuid,
    /// Token expiry, epoch seconds
    pub expires_at: i64,
}

#[derive(ToSchema)]
pub struct NewCompanyDoc {
    pub name: String,
    pub code: i32,
    /// Country name, created on first use
    pub country: String,
    pub website: String,
    /// E.164, e.g. +35799123456
    pub phone: String,
}

#[derive(ToSchema)]
pub struct CompanyUpdateDoc {
    pub name: String,
    pub code: i32,
    pub country_id: i32,
    pub website: String,
    pub phone: String,
}

#[derive(ToSchema)]
pub struct CompanyCreatedDoc { pub id: i32, pub name: String }

#[derive(ToSchema)]
pub struct CompanyDoc {
    pub id: i32,
    pub name: String,
    pub code: i32,
    pub country_id: i32,
    pub website: String,
    pub phone: String,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(ToSchema)]
pub struct ErrorBodyDoc { pub code: u16, pub error: String }

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).bearer_format("JWT").build()),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::auth::register,
        crate::routes::auth::login,
        crate::routes::companies::list,
        crate::routes::companies::get,
        crate::routes::companies::create,
        crate::routes::companies::update,
        crate::routes::companies::delete,
    ),
    components(
        schemas(
            HealthResponse,
            CredentialsDoc,
            RegisterOutputDoc,
            LoginOutputDoc,
            NewCompanyDoc,
            CompanyUpdateDoc,
            CompanyCreatedDoc,
            CompanyDoc,
            ErrorBodyDoc,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "health"),
        (name = "auth"),
        (name = "companies")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();
        for p in ["/health", "/v1/users", "/v1/users/login", "/v1/companies", "/v1/companies/{id}"] {
            assert!(paths.iter().any(|k| k.as_str() == p), "missing {p}");
        }
        let schemes = doc.components.as_ref().map(|c| c.security_schemes.contains_key("bearer"));
        assert_eq!(schemes, Some(true));
    }
}
