/// 웹 계층 오류
/// 상태 코드와 오류 페이지로 변환하고, 내부 오류는 로그로만 남긴다.
// region:    --- Imports
use crate::auth::password::PasswordError;
use crate::auth::session::SessionError;
use crate::store::StoreError;
use crate::views;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use tracing::error;

// endregion: --- Imports

// region:    --- App Error
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("GET method not allowed.")]
    MethodNotAllowed,

    #[error("login required")]
    LoginRequired,

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("password error: {0}")]
    Password(#[from] PasswordError),

    #[error("session error: {0}")]
    Session(#[from] SessionError),
}

impl AppError {
    pub fn listing_not_found() -> Self {
        AppError::NotFound("The listing does not exist.".to_string())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::LoginRequired => StatusCode::SEE_OTHER,
            AppError::Store(StoreError::NotFound) => StatusCode::NOT_FOUND,
            AppError::Store(_) | AppError::Password(_) | AppError::Session(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

// endregion: --- App Error

// region:    --- Response
const INTERNAL_MESSAGE: &str = "Something went wrong. Please try again later.";

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            AppError::LoginRequired => return Redirect::to("/login").into_response(),
            AppError::Store(StoreError::NotFound) => "The requested page does not exist.".to_string(),
            AppError::Store(e) => {
                error!("{:<12} --> 저장소 오류: {:?}", "Error", e);
                INTERNAL_MESSAGE.to_string()
            }
            AppError::Password(e) => {
                error!("{:<12} --> 비밀번호 처리 오류: {:?}", "Error", e);
                INTERNAL_MESSAGE.to_string()
            }
            AppError::Session(e) => {
                error!("{:<12} --> 세션 생성 오류: {:?}", "Error", e);
                INTERNAL_MESSAGE.to_string()
            }
            other => other.to_string(),
        };

        (status, views::error_page(status.as_u16(), &message)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

// endregion: --- Response

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_required_redirects_to_login() {
        let response = AppError::LoginRequired.into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()["location"], "/login");
    }

    #[test]
    fn session_errors_are_internal() {
        let err = AppError::from(SessionError::InvalidTtl(0));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(AppError::MethodNotAllowed.status_code(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
