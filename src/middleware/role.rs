use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpMessage,
};
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};

use crate::models::{AuthContext, Role};
use crate::utils::error::RequestError;

/// Guard de role: rejeita com 403 quando o contexto autenticado não tem o
/// role exigido pela rota. Pressupõe AuthMiddleware aplicado antes; sem
/// contexto estabelecido responde 401.
pub struct RoleGuard {
    required: Role,
}

impl RoleGuard {
    pub fn new(required: Role) -> Self {
        Self { required }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RoleGuard
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RoleGuardService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RoleGuardService {
            service,
            required: self.required,
        }))
    }
}

pub struct RoleGuardService<S> {
    service: S,
    required: Role,
}

impl<S, B> Service<ServiceRequest> for RoleGuardService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let ctx = req.extensions().get::<AuthContext>().cloned();

        match ctx {
            None => Box::pin(ready(Err(RequestError::unauthorized().into()))),
            Some(ctx) if ctx.role != self.required => Box::pin(ready(Err(
                RequestError::role_not_authorized(self.required).into(),
            ))),
            Some(_) => {
                let fut = self.service.call(req);
                Box::pin(async move { fut.await })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::auth::AuthMiddleware;
    use crate::services::token_service;
    use actix_web::{test, web, App, HttpResponse};

    async fn ok_handler() -> HttpResponse {
        HttpResponse::Ok().finish()
    }

    macro_rules! talent_only_app {
        () => {
            test::init_service(
                App::new().service(
                    web::scope("/p").wrap(AuthMiddleware).service(
                        web::resource("/talent")
                            .wrap(RoleGuard::new(Role::Talent))
                            .route(web::patch().to(ok_handler)),
                    ),
                ),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn wrong_role_is_403() {
        let token = token_service::issue_token("w1", Role::Employee).unwrap();

        let app = talent_only_app!();
        let req = test::TestRequest::patch()
            .uri("/p/talent")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_request();

        let err = test::try_call_service(&app, req).await.unwrap_err();
        assert_eq!(
            err.error_response().status(),
            actix_web::http::StatusCode::FORBIDDEN
        );
    }

    #[actix_web::test]
    async fn matching_role_passes() {
        let token = token_service::issue_token("w1", Role::Talent).unwrap();

        let app = talent_only_app!();
        let req = test::TestRequest::patch()
            .uri("/p/talent")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());
    }

    #[actix_web::test]
    async fn guard_without_context_is_401() {
        // Guard sozinho, sem AuthMiddleware antes: nenhum contexto estabelecido.
        let app = test::init_service(
            App::new().service(
                web::resource("/talent")
                    .wrap(RoleGuard::new(Role::Talent))
                    .route(web::patch().to(ok_handler)),
            ),
        )
        .await;

        let req = test::TestRequest::patch().uri("/talent").to_request();
        let err = test::try_call_service(&app, req).await.unwrap_err();
        assert_eq!(
            err.error_response().status(),
            actix_web::http::StatusCode::UNAUTHORIZED
        );
    }
}
