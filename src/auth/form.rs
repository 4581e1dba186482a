/// 회원 가입 폼 검증
/// 길이 제한은 users 테이블 컬럼 크기와 같다.
use serde::Deserialize;

pub const USERNAME_MAX_CHARS: usize = 150;
pub const EMAIL_MAX_CHARS: usize = 254;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirmation: String,
}

/// 검증된 가입 정보 (앞뒤 공백 제거)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidRegistration {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl RegisterForm {
    /// 실패 시 가입 페이지에 보여줄 메시지 반환
    pub fn validate(&self) -> Result<ValidRegistration, &'static str> {
        let username = self.username.trim();
        let email = self.email.trim();

        if username.is_empty() || self.password.is_empty() {
            return Err("Username and password are required.");
        }
        if username.chars().count() > USERNAME_MAX_CHARS {
            return Err("Username must be at most 150 characters.");
        }
        if email.chars().count() > EMAIL_MAX_CHARS {
            return Err("Email must be at most 254 characters.");
        }
        if self.password != self.confirmation {
            return Err("Passwords must match.");
        }

        Ok(ValidRegistration {
            username: username.to_string(),
            email: email.to_string(),
            password: self.password.clone(),
        })
    }
}
