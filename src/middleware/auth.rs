use std::{
    env,
    future::{ready, Ready},
    rc::Rc,
};

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::Method,
    Error, HttpMessage, HttpRequest,
};
use futures_util::future::LocalBoxFuture;
use uuid::Uuid;

use crate::utils::error::AppError;
use crate::utils::jwt::decode_jwt;

/// Server-verified identity attached to every authenticated request.
/// Handlers must derive authorization from this, never from any role the
/// client asserts in the payload or claims.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: Uuid,
    pub parent_user_id: Option<Uuid>,
}

pub fn authenticated_user(req: &HttpRequest) -> Result<AuthContext, AppError> {
    req.extensions()
        .get::<AuthContext>()
        .cloned()
        .ok_or_else(|| AppError::Auth("Authentication failed".to_string()))
}

/// Routes served without an identity: account entry points and the
/// public read surface. Everything else demands a token. The gate wraps
/// the whole app, so a write on a path whose read is public (POST
/// /venues, POST /reviews) still goes through the token checks.
fn is_public_route(req: &ServiceRequest) -> bool {
    let method = req.method();
    match req.path() {
        "/signup" | "/login" => *method == Method::POST,
        "/verify-email" | "/venues" | "/reviews" | "/health" => *method == Method::GET,
        _ => false,
    }
}

pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if is_public_route(&req) {
            let service = self.service.clone();
            return Box::pin(async move { service.call(req).await });
        }

        let header = match req.headers().get("Authorization") {
            Some(h) => h.to_str().unwrap_or("").to_owned(),
            None => {
                return reject(AppError::Auth(
                    "Authorization header is missing".to_string(),
                ));
            }
        };

        // The header carries "<scheme> <token>"; only the token matters.
        let token = match header.split(' ').nth(1) {
            Some(t) if !t.is_empty() => t.to_owned(),
            _ => return reject(AppError::Auth("Token not provided.".to_string())),
        };

        let secret = match env::var("JWT_SECRET") {
            Ok(s) => s,
            Err(_) => {
                return reject(AppError::Internal("JWT_SECRET is not configured".to_string()));
            }
        };

        let claims = match decode_jwt(&token, &secret) {
            Ok(claims) => claims,
            Err(_) => {
                return reject(AppError::Auth(
                    "Authentication failed. Json decode failure.".to_string(),
                ));
            }
        };

        let user_id = match claims.user_id.as_deref().and_then(|id| id.parse().ok()) {
            Some(id) => id,
            None => return reject(AppError::Auth("Authentication failed".to_string())),
        };
        let parent_user_id = claims
            .parent_user_id
            .as_deref()
            .and_then(|id| id.parse().ok());

        req.extensions_mut().insert(AuthContext {
            user_id,
            parent_user_id,
        });

        let service = self.service.clone();
        Box::pin(async move { service.call(req).await })
    }
}

fn reject<B>(err: AppError) -> LocalBoxFuture<'static, Result<ServiceResponse<B>, Error>> {
    Box::pin(async move { Err(err.into()) })
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{guard, http::StatusCode, test, web, App, HttpResponse};

    use crate::utils::jwt::create_jwt;

    const SECRET: &str = "middleware-test-secret";

    async fn whoami(req: HttpRequest) -> Result<HttpResponse, AppError> {
        let auth = authenticated_user(&req)?;
        Ok(HttpResponse::Ok().body(auth.user_id.to_string()))
    }

    macro_rules! guarded_app {
        () => {{
            env::set_var("JWT_SECRET", SECRET);
            test::init_service(
                App::new().service(
                    web::scope("")
                        .wrap(AuthMiddleware)
                        .route("/whoami", web::get().to(whoami)),
                ),
            )
            .await
        }};
    }

    #[actix_web::test]
    async fn missing_header_is_rejected() {
        let app = guarded_app!();
        let req = test::TestRequest::get().uri("/whoami").to_request();
        let err = test::try_call_service(&app, req).await.unwrap_err();
        assert_eq!(err.error_response().status(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.to_string(), "Authorization header is missing");
    }

    #[actix_web::test]
    async fn missing_token_segment_is_rejected() {
        let app = guarded_app!();
        let req = test::TestRequest::get()
            .uri("/whoami")
            .insert_header(("Authorization", "Bearer"))
            .to_request();
        let err = test::try_call_service(&app, req).await.unwrap_err();
        assert_eq!(err.error_response().status(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.to_string(), "Token not provided.");
    }

    #[actix_web::test]
    async fn malformed_token_is_rejected() {
        let app = guarded_app!();
        let req = test::TestRequest::get()
            .uri("/whoami")
            .insert_header(("Authorization", "Bearer not-a-jwt"))
            .to_request();
        let err = test::try_call_service(&app, req).await.unwrap_err();
        assert_eq!(err.error_response().status(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.to_string(), "Authentication failed. Json decode failure.");
    }

    #[actix_web::test]
    async fn token_without_user_id_claim_is_rejected() {
        use crate::utils::jwt::Claims;
        use chrono::{Duration, Utc};
        use jsonwebtoken::{encode, EncodingKey, Header};

        let claims = Claims {
            user_id: None,
            parent_user_id: None,
            account_type: None,
            exp: (Utc::now() + Duration::hours(1)).timestamp() as usize,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_ref()),
        )
        .unwrap();

        let app = guarded_app!();
        let req = test::TestRequest::get()
            .uri("/whoami")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_request();
        let err = test::try_call_service(&app, req).await.unwrap_err();
        assert_eq!(err.error_response().status(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.to_string(), "Authentication failed");
    }

    #[actix_web::test]
    async fn public_paths_bypass_the_gate() {
        env::set_var("JWT_SECRET", SECRET);
        let app = test::init_service(
            App::new()
                .wrap(AuthMiddleware)
                .route(
                    "/health",
                    web::get().to(|| async { HttpResponse::Ok().body("ok") }),
                )
                .route("/whoami", web::get().to(whoami)),
        )
        .await;

        let resp = test::call_service(
            &app,
            test::TestRequest::get().uri("/health").to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);

        let err = test::try_call_service(
            &app,
            test::TestRequest::get().uri("/whoami").to_request(),
        )
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), "Authorization header is missing");
    }

    // App-level wiring: a public GET and a gated POST share one path,
    // and the gated one must be reachable, not shadowed into a 404.
    #[actix_web::test]
    async fn same_path_mixes_public_get_with_gated_post() {
        env::set_var("JWT_SECRET", SECRET);
        let app = test::init_service(
            App::new()
                .wrap(AuthMiddleware)
                .service(
                    web::resource("/venues")
                        .guard(guard::Get())
                        .to(|| async { HttpResponse::Ok().body("listing") }),
                )
                .service(web::resource("/venues").guard(guard::Post()).to(whoami)),
        )
        .await;

        let resp = test::call_service(
            &app,
            test::TestRequest::get().uri("/venues").to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);

        let err = test::try_call_service(
            &app,
            test::TestRequest::post().uri("/venues").to_request(),
        )
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), "Authorization header is missing");

        let user_id = Uuid::new_v4();
        let token = create_jwt(user_id, "OWNER", SECRET).unwrap();
        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/venues")
                .insert_header(("Authorization", format!("Bearer {}", token)))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = test::read_body(resp).await;
        assert_eq!(body, user_id.to_string().as_bytes());
    }

    #[actix_web::test]
    async fn valid_token_passes_identity_through() {
        let user_id = Uuid::new_v4();
        let token = create_jwt(user_id, "USER", SECRET).unwrap();

        let app = guarded_app!();
        let req = test::TestRequest::get()
            .uri("/whoami")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = test::read_body(resp).await;
        assert_eq!(body, user_id.to_string().as_bytes());
    }
}
