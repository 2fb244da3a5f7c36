use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::sessions::issuer::SessionToken;

pub const SESSION_COOKIE: &str = "resume_session";

/// HTTP-only, same-site cookie carrying the session token.
/// `secure` is on in production so the token never travels over plain HTTP.
pub fn session_cookie(token: SessionToken, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token.into_inner()))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .build()
}

pub fn clear_session(jar: CookieJar) -> CookieJar {
    jar.remove(Cookie::build(SESSION_COOKIE).path("/"))
}

pub fn session_token(jar: &CookieJar) -> Option<SessionToken> {
    jar.get(SESSION_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
        .map(SessionToken::from)
}
