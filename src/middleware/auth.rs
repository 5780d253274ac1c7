use actix_web::{
    dev::{forward_ready, Payload, Service, ServiceRequest, ServiceResponse, Transform},
    Error, FromRequest, HttpMessage, HttpRequest,
};
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};

use crate::models::AuthContext;
use crate::services::token_service;
use crate::utils::error::RequestError;

/// Exige bearer token válido e estabelece o AuthContext da request.
/// Aplicado no scope de profile - tudo depois da rota de auth.
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService { service }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
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
        let header = req
            .headers()
            .get("Authorization")
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);

        match token_service::authenticate(header.as_deref()) {
            Ok(ctx) => {
                // Escopo por request: as extensions morrem com a request,
                // nada vaza entre requests concorrentes.
                req.extensions_mut().insert(ctx);

                let fut = self.service.call(req);
                Box::pin(async move { fut.await })
            }
            Err(e) => Box::pin(ready(Err(e.into()))),
        }
    }
}

/// Leitura do contexto pelos handlers. Sem contexto estabelecido
/// (rota dependente de contexto alcançada sem autenticação) → 401.
impl FromRequest for AuthContext {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let ctx = req.extensions().get::<AuthContext>().cloned();
        ready(ctx.ok_or_else(|| RequestError::unauthorized().into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use actix_web::{test, web, App, HttpResponse};

    async fn whoami(ctx: AuthContext) -> HttpResponse {
        HttpResponse::Ok().body(ctx.wallet_id)
    }

    macro_rules! protected_app {
        () => {
            test::init_service(App::new().service(
                web::scope("/p").wrap(AuthMiddleware).route("", web::get().to(whoami)),
            ))
            .await
        };
    }

    #[actix_web::test]
    async fn missing_header_is_401_unauthorized() {
        let app = protected_app!();
        let req = test::TestRequest::get().uri("/p").to_request();

        let err = test::try_call_service(&app, req).await.unwrap_err();
        let resp = err.error_response();
        assert_eq!(resp.status(), actix_web::http::StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn malformed_scheme_is_401() {
        let app = protected_app!();
        let req = test::TestRequest::get()
            .uri("/p")
            .insert_header(("Authorization", "Basic abc"))
            .to_request();

        let err = test::try_call_service(&app, req).await.unwrap_err();
        assert_eq!(
            err.error_response().status(),
            actix_web::http::StatusCode::UNAUTHORIZED
        );
    }

    #[actix_web::test]
    async fn valid_token_reaches_handler_with_context() {
        let token = token_service::issue_token("w1", Role::Talent).unwrap();

        let app = protected_app!();
        let req = test::TestRequest::get()
            .uri("/p")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());
        let body = test::read_body(resp).await;
        assert_eq!(&body[..], b"w1");
    }
}
