// region:    --- Imports
use crate::config::{SessionConfig, MAX_SESSION_TTL_HOURS};
use crate::store::{MarketStore, StoreError, StoreResult};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::{DateTime, Duration, Utc};
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

// endregion: --- Imports

/// 세션 쿠키 이름
pub const SESSION_COOKIE: &str = "sessionid";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session lifetime of {0} hours is out of range")]
    InvalidTtl(i64),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// 새 세션 토큰
pub fn new_token() -> String {
    format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple())
}

fn session_cookie(token: String, config: &SessionConfig) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.cookie_secure)
        .build()
}

/// 세션 만료 시각 (유효 시간이 허용 범위를 벗어나면 None)
pub fn session_expiry(now: DateTime<Utc>, ttl_hours: i64) -> Option<DateTime<Utc>> {
    if !(1..=MAX_SESSION_TTL_HOURS).contains(&ttl_hours) {
        return None;
    }
    Duration::try_hours(ttl_hours).and_then(|ttl| now.checked_add_signed(ttl))
}

/// 로그인 처리: 세션 저장 후 쿠키 설정
pub async fn start_session(
    store: &dyn MarketStore,
    config: &SessionConfig,
    jar: CookieJar,
    user_id: i64,
    username: &str,
) -> Result<CookieJar, SessionError> {
    let token = new_token();
    let expires_at = session_expiry(Utc::now(), config.ttl_hours)
        .ok_or(SessionError::InvalidTtl(config.ttl_hours))?;
    store.create_session(&token, user_id, expires_at).await?;
    info!("{:<12} --> 로그인: {}", "Session", username);
    Ok(jar.add(session_cookie(token, config)))
}

/// 로그아웃 처리: 세션 삭제 후 쿠키 제거
pub async fn end_session(store: &dyn MarketStore, jar: CookieJar) -> StoreResult<CookieJar> {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        store.delete_session(cookie.value()).await?;
    }
    Ok(jar.remove(Cookie::build(SESSION_COOKIE).path("/")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_unique_and_long() {
        let a = new_token();
        let b = new_token();
        assert_ne!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn session_cookie_is_http_only() {
        let config = SessionConfig {
            ttl_hours: 2,
            sweep_interval_seconds: 60,
            cookie_secure: false,
        };
        let cookie = session_cookie("abc".to_string(), &config);
        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.path(), Some("/"));
    }

    #[test]
    fn expiry_lies_in_the_future_within_bounds() {
        let now = Utc::now();
        assert_eq!(session_expiry(now, 2), Some(now + Duration::hours(2)));
        assert!(session_expiry(now, MAX_SESSION_TTL_HOURS).is_some());
    }

    #[test]
    fn expiry_rejects_out_of_range_lifetimes() {
        let now = Utc::now();
        assert_eq!(session_expiry(now, 0), None);
        assert_eq!(session_expiry(now, -5), None);
        assert_eq!(session_expiry(now, MAX_SESSION_TTL_HOURS + 1), None);
        assert_eq!(session_expiry(now, i64::MAX), None);
    }

    #[tokio::test]
    async fn start_session_with_invalid_lifetime_fails_without_storing() {
        use crate::auction::model::NewUser;
        use crate::store::InMemoryMarketStore;

        let store = InMemoryMarketStore::new();
        let user = store
            .create_user(NewUser {
                username: "night-owl".to_string(),
                email: String::new(),
                password_hash: "hash".to_string(),
            })
            .await
            .unwrap();
        let config = SessionConfig {
            ttl_hours: i64::MAX,
            sweep_interval_seconds: 60,
            cookie_secure: false,
        };

        let result =
            start_session(&store, &config, CookieJar::new(), user.id, &user.username).await;
        assert!(matches!(result, Err(SessionError::InvalidTtl(i64::MAX))));
        assert_eq!(store.delete_expired_sessions(Utc::now() + Duration::days(3650)).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn started_session_is_found_immediately() {
        use crate::auction::model::NewUser;
        use crate::store::InMemoryMarketStore;

        let store = InMemoryMarketStore::new();
        let user = store
            .create_user(NewUser {
                username: "early-bird".to_string(),
                email: String::new(),
                password_hash: "hash".to_string(),
            })
            .await
            .unwrap();
        let config = SessionConfig {
            ttl_hours: 1,
            sweep_interval_seconds: 60,
            cookie_secure: false,
        };

        let jar = start_session(&store, &config, CookieJar::new(), user.id, &user.username)
            .await
            .unwrap();
        let token = jar.get(SESSION_COOKIE).unwrap().value().to_string();
        let found = store.find_session_user(&token, Utc::now()).await.unwrap();
        assert_eq!(found, Some(user));
    }
}
