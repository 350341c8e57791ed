use std::{
    future::{ready, Ready},
    rc::Rc,
};

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, FromRequest, HttpMessage, HttpRequest, ResponseError,
};
use futures::future::LocalBoxFuture;

use crate::{
    auth::{
        guard::{AuthContext, GuardChain, InjectUserId, RequireRole},
        session::{SessionAttributes, SESSION_USER_ID_COOKIE},
    },
    errors::AuthorizationDenied,
    models::domain::UserRole,
    services::role_service::Actor,
};

/// Runs a [`GuardChain`] in front of a resource. Denied requests are redirected
/// to the login page and never reach the handler.
pub struct AuthGate {
    chain: Rc<GuardChain>,
}

impl AuthGate {
    pub fn new(chain: GuardChain) -> Self {
        Self {
            chain: Rc::new(chain),
        }
    }

    /// Super users and admins, with the user id injected.
    pub fn super_user() -> Self {
        Self::new(
            GuardChain::new()
                .with(RequireRole::new(UserRole::SuperUser))
                .with(InjectUserId),
        )
    }

    /// Admins only, with the user id injected.
    pub fn admin() -> Self {
        Self::new(
            GuardChain::new()
                .with(RequireRole::new(UserRole::Admin))
                .with(InjectUserId),
        )
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthGate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthGateService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthGateService {
            service: Rc::new(service),
            chain: Rc::clone(&self.chain),
        }))
    }
}

pub struct AuthGateService<S> {
    service: Rc<S>,
    chain: Rc<GuardChain>,
}

impl<S, B> Service<ServiceRequest> for AuthGateService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let session = SessionAttributes::from_request(req.request());

        match self.chain.evaluate(&session) {
            Ok(context) => {
                req.extensions_mut().insert(context);
                let service = Rc::clone(&self.service);

                Box::pin(async move {
                    let res = service.call(req).await?;
                    Ok(res.map_into_left_body())
                })
            }
            Err(denied) => {
                log::debug!("Denied {} {}: {}", req.method(), req.path(), denied);
                let response = denied.error_response();

                Box::pin(async move { Ok(req.into_response(response).map_into_right_body()) })
            }
        }
    }
}

/// Extractor for the context the gate attached to the request.
pub struct SessionContext(pub AuthContext);

impl SessionContext {
    pub fn user_id(&self) -> Result<&str, AuthorizationDenied> {
        self.0
            .user_id
            .as_deref()
            .ok_or(AuthorizationDenied::MissingAttribute(SESSION_USER_ID_COOKIE))
    }

    /// The acting identity for role transitions. Only the user id is known from the session.
    pub fn actor(&self) -> Result<Actor, AuthorizationDenied> {
        Ok(Actor::from_user_id(self.user_id()?))
    }
}

impl FromRequest for SessionContext {
    type Error = AuthorizationDenied;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        let context = req
            .extensions()
            .get::<AuthContext>()
            .cloned()
            .map(SessionContext)
            .ok_or(AuthorizationDenied::MissingAttribute(SESSION_USER_ID_COOKIE));

        ready(context)
    }
}
