/// 만료 세션 정리 스케줄러
/// 세션 조회 시 만료 여부를 검사하므로, 여기서는 만료된 행만 주기적으로 지운다.
// region:    --- Imports
use crate::store::{MarketStore, StoreResult};
use chrono::Utc;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration};
use tracing::{debug, error, info};

// endregion: --- Imports

// region:    --- Session Sweeper
/// 만료 세션 정리 스케줄러
pub struct SessionSweeper {
    store: Arc<dyn MarketStore>,
    period: Duration,
}

/// 만료 세션 정리 스케줄러 생성
impl SessionSweeper {
    pub fn new(store: Arc<dyn MarketStore>, period: Duration) -> Self {
        Self { store, period }
    }

    /// 만료 세션 정리 스케줄러 시작
    pub fn start(&self) -> JoinHandle<()> {
        let store = Arc::clone(&self.store);
        let period = self.period;
        info!(
            "{:<12} --> 세션 정리 시작 (주기: {}초)",
            "Scheduler",
            period.as_secs()
        );
        tokio::spawn(async move {
            let mut interval = interval(period);
            loop {
                interval.tick().await;
                if let Err(e) = Self::sweep_once(store.as_ref()).await {
                    error!(
                        "{:<12} --> 만료 세션 정리 중 오류 발생: {:?}",
                        "Scheduler", e
                    );
                }
            }
        })
    }

    /// 만료 세션 정리
    pub async fn sweep_once(store: &dyn MarketStore) -> StoreResult<u64> {
        let removed = store.delete_expired_sessions(Utc::now()).await?;
        debug!(
            "{:<12} --> 만료 세션 {}개가 정리되었습니다.",
            "Scheduler", removed
        );
        Ok(removed)
    }
}
// endregion: --- Session Sweeper

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auction::model::NewUser;
    use crate::store::InMemoryMarketStore;

    #[tokio::test]
    async fn sweep_removes_only_expired_sessions() {
        let store = InMemoryMarketStore::new();
        let user = store
            .create_user(NewUser {
                username: "sleepy".to_string(),
                email: String::new(),
                password_hash: "hash".to_string(),
            })
            .await
            .unwrap();
        let now = Utc::now();
        store
            .create_session("old", user.id, now - chrono::Duration::minutes(5))
            .await
            .unwrap();
        store
            .create_session("new", user.id, now + chrono::Duration::minutes(5))
            .await
            .unwrap();

        assert_eq!(SessionSweeper::sweep_once(&store).await.unwrap(), 1);
        assert!(store.find_session_user("new", Utc::now()).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn started_sweeper_runs_immediately() {
        let store = Arc::new(InMemoryMarketStore::new());
        let user = store
            .create_user(NewUser {
                username: "sleepy".to_string(),
                email: String::new(),
                password_hash: "hash".to_string(),
            })
            .await
            .unwrap();
        store
            .create_session("old", user.id, Utc::now() - chrono::Duration::minutes(5))
            .await
            .unwrap();

        let handle = SessionSweeper::new(store.clone(), Duration::from_secs(3600)).start();
        tokio::time::sleep(Duration::from_millis(100)).await;
        handle.abort();

        assert_eq!(store.delete_expired_sessions(Utc::now()).await.unwrap(), 0);
    }
}
