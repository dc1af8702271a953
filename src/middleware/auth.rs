use axum::{extract::Request, http::HeaderMap, middleware::Next, response::Response};

pub const USER_ID_HEADER: &str = "x-user-id";
pub const ANONYMOUS: &str = "anonymous";

/// Acting user, as asserted by the upstream auth proxy.
#[derive(Clone, Debug)]
pub struct Auth {
    pub user_id: String,
}

impl Auth {
    fn from_headers(headers: &HeaderMap) -> Self {
        let user_id = headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or(ANONYMOUS);

        Self {
            user_id: user_id.to_owned(),
        }
    }
}

/// Inserts the [`Auth`] extension. Requests without the header act as
/// `anonymous`; nothing is rejected here.
pub async fn auth_middleware(mut req: Request, next: Next) -> Response {
    let auth = Auth::from_headers(req.headers());
    tracing::debug!(user_id = %auth.user_id, "acting user resolved");

    req.extensions_mut().insert(auth);

    next.run(req).await
}
