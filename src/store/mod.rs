/// 마켓 저장소
/// 핸들러와 커맨드는 이 트레이트만 사용한다. (PostgreSQL 구현체, 메모리 구현체)
// region:    --- Imports
use crate::auction::category::Category;
use crate::auction::model::{
    Bid, Comment, Credentials, Listing, ListingFilter, ListingUpdate, NewBid, NewComment,
    NewListing, NewUser, User,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

// endregion: --- Imports

pub mod memory;
pub mod postgres;

pub use memory::InMemoryMarketStore;
pub use postgres::PostgresMarketStore;

// region:    --- Store Error
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("not found")]
    NotFound,
}

pub type StoreResult<T> = Result<T, StoreError>;

// endregion: --- Store Error

// region:    --- Market Store Trait
/// 마켓 저장소 트레이트
#[async_trait]
pub trait MarketStore: Send + Sync {
    // -- 사용자
    /// 중복된 사용자 이름이면 `StoreError::Conflict`
    async fn create_user(&self, user: NewUser) -> StoreResult<User>;
    async fn find_credentials(&self, username: &str) -> StoreResult<Option<Credentials>>;

    // -- 세션
    async fn create_session(
        &self,
        token: &str,
        user_id: i64,
        expires_at: DateTime<Utc>,
    ) -> StoreResult<()>;
    async fn find_session_user(&self, token: &str, now: DateTime<Utc>)
        -> StoreResult<Option<User>>;
    async fn delete_session(&self, token: &str) -> StoreResult<()>;
    async fn delete_expired_sessions(&self, now: DateTime<Utc>) -> StoreResult<u64>;

    // -- 카테고리
    async fn list_categories(&self) -> StoreResult<Vec<Category>>;
    async fn find_category(&self, category_id: i64) -> StoreResult<Option<Category>>;
    async fn find_category_by_code(&self, code: &str) -> StoreResult<Option<Category>>;

    // -- 경매 물품
    async fn create_listing(&self, listing: NewListing) -> StoreResult<Listing>;
    async fn find_listing(&self, listing_id: i64) -> StoreResult<Option<Listing>>;
    async fn list_listings(&self, filter: ListingFilter) -> StoreResult<Vec<Listing>>;
    /// 진행 중인 물품만 수정된다. 수정 여부 반환
    async fn update_listing(&self, listing_id: i64, update: ListingUpdate) -> StoreResult<bool>;
    /// 판매자 본인이고 진행 중인 경우에만 종료된다. 종료 여부 반환
    async fn close_listing(&self, listing_id: i64, seller_id: i64) -> StoreResult<bool>;

    // -- 입찰
    /// 입찰 조건을 원자적으로 다시 검사한 뒤 현재 가격 갱신과 입찰 기록을 함께 저장한다.
    /// 조건이 맞지 않으면 `None`
    async fn place_bid(&self, bid: NewBid) -> StoreResult<Option<Bid>>;
    /// 높은 금액 순
    async fn list_bids(&self, listing_id: i64) -> StoreResult<Vec<Bid>>;
    async fn highest_bid(&self, listing_id: i64) -> StoreResult<Option<Bid>>;

    // -- 댓글
    async fn add_comment(&self, comment: NewComment) -> StoreResult<Comment>;
    /// 최신 순
    async fn list_comments(&self, listing_id: i64) -> StoreResult<Vec<Comment>>;

    // -- 관심 목록
    /// 이미 등록된 경우 `false`
    async fn add_to_watchlist(&self, user_id: i64, listing_id: i64) -> StoreResult<bool>;
    /// 등록되지 않은 경우 `false`
    async fn remove_from_watchlist(&self, user_id: i64, listing_id: i64) -> StoreResult<bool>;
    async fn is_watching(&self, user_id: i64, listing_id: i64) -> StoreResult<bool>;
}

// endregion: --- Market Store Trait
