use std::marker::PhantomData;
use std::sync::Arc;

use axum::extract::Request;
use axum::extract::State;
use axum::middleware;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Router;

use super::AuthenticationGate;
use super::AuthorizationGate;
use super::Interceptor;

/// Pipeline stage before an authentication gate has been added.
pub struct Unauthenticated;

/// Pipeline stage once requests carry a verified identity.
pub struct Authenticated;

type Chain = Arc<[Arc<dyn Interceptor>]>;

/// Ordered chain of interceptors guarding a group of routes.
///
/// The stage parameter makes an authorization gate without a preceding
/// authentication gate a compile error:
///
/// ```compile_fail
/// use account_service::domain::user::models::Role;
/// use account_service::inbound::http::middleware::AuthorizationGate;
/// use account_service::inbound::http::middleware::Pipeline;
///
/// let _ = Pipeline::new().authorize(AuthorizationGate::new(Role::Admin));
/// ```
pub struct Pipeline<Stage> {
    interceptors: Vec<Arc<dyn Interceptor>>,
    _stage: PhantomData<Stage>,
}

impl Pipeline<Unauthenticated> {
    pub fn new() -> Self {
        Self {
            interceptors: Vec::new(),
            _stage: PhantomData,
        }
    }

    pub fn authenticate(mut self, gate: AuthenticationGate) -> Pipeline<Authenticated> {
        self.interceptors.push(Arc::new(gate));
        Pipeline {
            interceptors: self.interceptors,
            _stage: PhantomData,
        }
    }
}

impl Default for Pipeline<Unauthenticated> {
    fn default() -> Self {
        Self::new()
    }
}

impl Pipeline<Authenticated> {
    pub fn authorize(mut self, gate: AuthorizationGate) -> Self {
        self.interceptors.push(Arc::new(gate));
        self
    }

    /// Run the chain in front of every route of `router`.
    ///
    /// Must be called after the routes are added; unmatched paths still 404.
    pub fn guard<S>(self, router: Router<S>) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        let chain: Chain = self.interceptors.into();
        router.route_layer(middleware::from_fn_with_state(chain, run_chain))
    }
}

async fn run_chain(State(chain): State<Chain>, mut request: Request, next: Next) -> Response {
    for interceptor in chain.iter() {
        if let Err(rejection) = interceptor.intercept(&mut request) {
            return rejection.into_response();
        }
    }

    next.run(request).await
}
