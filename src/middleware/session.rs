use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use ulid::Ulid;

use crate::{
    routes::AppState,
    session::{SessionId, build_cookie},
};

/// Resolves the session id from its cookie and inserts a [`SessionId`]
/// extension.
///
/// A missing or malformed cookie starts a new session; its cookie is set on
/// the way out.
pub async fn session_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Response {
    let cookie_name = state.config.session.cookie_name.as_str();

    let existing = jar
        .get(cookie_name)
        .map(|cookie| cookie.value().to_owned())
        .filter(|id| Ulid::from_string(id).is_ok());

    let (id, fresh) = match existing {
        Some(id) => (id, false),
        None => (Ulid::new().to_string(), true),
    };

    req.extensions_mut().insert(SessionId(id.to_owned()));

    let response = next.run(req).await;

    if !fresh {
        return response;
    }

    tracing::debug!(session = %id, "Started session");

    (jar.add(build_cookie(cookie_name, &id)), response).into_response()
}
