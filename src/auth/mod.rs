/// 인증
/// 세션 쿠키로 현재 사용자를 찾는 추출기
use crate::app::AppState;
use crate::auction::model::User;
use crate::error::AppError;
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::CookieJar;
use chrono::Utc;

pub mod form;
pub mod password;
pub mod session;

/// 로그인한 사용자 (없으면 로그인 페이지로 리다이렉트)
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// 로그인 여부와 무관한 페이지용
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<User>);

#[async_trait]
impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let Some(cookie) = jar.get(session::SESSION_COOKIE) else {
            return Ok(MaybeUser(None));
        };

        let user = state
            .store
            .find_session_user(cookie.value(), Utc::now())
            .await?;
        Ok(MaybeUser(user))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match MaybeUser::from_request_parts(parts, state).await? {
            MaybeUser(Some(user)) => Ok(CurrentUser(user)),
            MaybeUser(None) => Err(AppError::LoginRequired),
        }
    }
}
