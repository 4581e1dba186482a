/// 애플리케이션 설정
/// 환경 변수(.env 포함)에서 읽고, 범위를 벗어난 값은 시작 시점에 거부한다.
// region:    --- Imports
use std::env;
use std::ops::RangeInclusive;
use std::str::FromStr;
use thiserror::Error;

// endregion: --- Imports

// region:    --- Config Types
/// 세션 유효 시간 상한 (1년)
pub const MAX_SESSION_TTL_HOURS: i64 = 24 * 365;

/// 만료 세션 정리 주기 상한 (1일)
pub const MAX_SESSION_SWEEP_SECONDS: u64 = 24 * 60 * 60;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub session: SessionConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_body_bytes: usize,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    // 시작 시 sql/ 스크립트 실행 여부
    pub initialize_schema: bool,
}

/// 세션 설정 (`from_lookup`을 거친 값은 항상 허용 범위 안)
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub ttl_hours: i64,
    pub sweep_interval_seconds: u64,
    pub cookie_secure: bool,
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} must be a valid {expected}, got {value:?}")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
}

// endregion: --- Config Types

// region:    --- Loading
impl AppConfig {
    /// 환경 변수로 설정 생성
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// 임의의 조회 함수로 설정 생성 (환경 변수, 테스트 값)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            server: ServerConfig {
                host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                port: parse_or(&lookup, "PORT", "port number", 3000)?,
                max_body_bytes: parse_or(&lookup, "MAX_BODY_BYTES", "byte count", 64 * 1024)?,
            },
            database: DatabaseConfig {
                url: lookup("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?,
                max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", "number", 5)?,
                initialize_schema: parse_bool_or(&lookup, "INITIALIZE_SCHEMA", true)?,
            },
            session: SessionConfig {
                ttl_hours: parse_in_range_or(
                    &lookup,
                    "SESSION_TTL_HOURS",
                    "number of hours between 1 and 8760",
                    1..=MAX_SESSION_TTL_HOURS,
                    336,
                )?,
                sweep_interval_seconds: parse_in_range_or(
                    &lookup,
                    "SESSION_SWEEP_SECONDS",
                    "number of seconds between 1 and 86400",
                    1..=MAX_SESSION_SWEEP_SECONDS,
                    3600,
                )?,
                cookie_secure: parse_bool_or(&lookup, "COOKIE_SECURE", false)?,
            },
            logging: LoggingConfig {
                level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            },
        })
    }
}

fn parse_or<F, T>(
    lookup: &F,
    name: &'static str,
    expected: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
            name,
            expected,
            value,
        }),
    }
}

/// 숫자 값 파싱 후 허용 범위 검사
fn parse_in_range_or<F, T>(
    lookup: &F,
    name: &'static str,
    expected: &'static str,
    range: RangeInclusive<T>,
    default: T,
) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + PartialOrd,
{
    let value = parse_or(lookup, name, expected, default)?;
    if range.contains(&value) {
        return Ok(value);
    }
    Err(ConfigError::Invalid {
        name,
        expected,
        value: lookup(name).unwrap_or_default(),
    })
}

fn parse_bool_or<F>(lookup: &F, name: &'static str, default: bool) -> Result<bool, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(default),
        Some(value) => match value.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::Invalid {
                name,
                expected: "boolean",
                value,
            }),
        },
    }
}

// endregion: --- Loading

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn defaults_apply_when_only_database_url_is_set() {
        let config =
            AppConfig::from_lookup(lookup_from(&[("DATABASE_URL", "postgres://localhost/market")]))
                .unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.database.max_connections, 5);
        assert!(config.database.initialize_schema);
        assert_eq!(config.session.ttl_hours, 336);
        assert!(!config.session.cookie_secure);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn missing_database_url_is_reported() {
        let err = AppConfig::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("DATABASE_URL")));
    }

    #[test]
    fn invalid_values_name_the_variable() {
        let err = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/market"),
            ("PORT", "eighty"),
        ]))
        .unwrap_err();
        assert_eq!(err.to_string(), "PORT must be a valid port number, got \"eighty\"");

        let err = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/market"),
            ("COOKIE_SECURE", "maybe"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "COOKIE_SECURE", .. }));
    }

    #[test]
    fn session_values_out_of_range_are_rejected() {
        for (name, value) in [
            ("SESSION_SWEEP_SECONDS", "0"),
            ("SESSION_SWEEP_SECONDS", "86401"),
            ("SESSION_TTL_HOURS", "0"),
            ("SESSION_TTL_HOURS", "-5"),
            ("SESSION_TTL_HOURS", "8761"),
            ("SESSION_TTL_HOURS", "9223372036854775807"),
        ] {
            let err = AppConfig::from_lookup(lookup_from(&[
                ("DATABASE_URL", "postgres://localhost/market"),
                (name, value),
            ]))
            .unwrap_err();
            match err {
                ConfigError::Invalid { name: reported, value: got, .. } => {
                    assert_eq!(reported, name);
                    assert_eq!(got, value);
                }
                other => panic!("unexpected error for {}={}: {:?}", name, value, other),
            }
        }
    }

    #[test]
    fn session_values_at_the_bounds_are_accepted() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/market"),
            ("SESSION_TTL_HOURS", "8760"),
            ("SESSION_SWEEP_SECONDS", "1"),
        ]))
        .unwrap();
        assert_eq!(config.session.ttl_hours, MAX_SESSION_TTL_HOURS);
        assert_eq!(config.session.sweep_interval_seconds, 1);
    }
}
