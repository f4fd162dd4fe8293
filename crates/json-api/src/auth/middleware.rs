//! Auth middleware.

use std::sync::Arc;

use salvo::{
    http::header::{AUTHORIZATION, HeaderValue, WWW_AUTHENTICATE},
    prelude::*,
};
use tracing::{debug, error};

use storefront_app::auth::{AuthServiceError, Principal};

use crate::{extensions::*, state::State};

/// Resolve the bearer token into a [`storefront_app::auth::Principal`] for the rest of the chain.
///
/// 401 responses carry `WWW-Authenticate: Bearer`.
#[salvo::handler]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    match authenticate(req, depot).await {
        Ok(principal) => {
            depot.insert_principal(principal);

            ctrl.call_next(req, depot, res).await;
        }
        Err(status) => {
            if status.code == StatusCode::UNAUTHORIZED {
                res.headers_mut()
                    .insert(WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
            }

            res.render(status);
            ctrl.skip_rest();
        }
    }
}

async fn authenticate(req: &Request, depot: &Depot) -> Result<Principal, StatusError> {
    let token = bearer_token(req)
        .ok_or_else(|| StatusError::unauthorized().brief("Missing or invalid Authorization header"))?;

    let state = depot.obtain_or_500::<Arc<State>>()?;

    state
        .app
        .auth
        .authenticate_bearer(token)
        .await
        .map_err(|error| match error {
            AuthServiceError::Rejected(reason) => {
                debug!(%reason, "bearer token rejected");

                StatusError::unauthorized().brief("Invalid API token")
            }
            other => {
                error!("failed to validate api token: {other}");

                StatusError::internal_server_error()
            }
        })
}

/// Reject callers that are not staff. Must run after [`handler`].
#[salvo::handler]
pub(crate) async fn require_staff(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    if let Err(status) = depot.staff_or_403() {
        res.render(status);
        ctrl.skip_rest();

        return;
    }

    ctrl.call_next(req, depot, res).await;
}

fn bearer_token(req: &Request) -> Option<&str> {
    let value = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let mut parts = value.splitn(2, ' ');

    let scheme = parts.next()?;
    let token = parts.next()?.trim();

    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return None;
    }

    Some(token)
}
