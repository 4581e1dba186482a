// region:    --- Imports
use super::{MarketStore, StoreError, StoreResult};
use crate::auction::category::Category;
use crate::auction::model::{
    Bid, Comment, Credentials, Listing, ListingFilter, ListingUpdate, NewBid, NewComment,
    NewListing, NewUser, User,
};
use crate::database::{queries, DatabaseManager};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::Row;
use std::sync::Arc;
use tracing::{debug, info};

// endregion: --- Imports

// region:    --- Postgres Market Store
/// PostgreSQL 저장소 구현체
pub struct PostgresMarketStore {
    db_manager: Arc<DatabaseManager>,
}

/// PostgreSQL 저장소 생성
impl PostgresMarketStore {
    pub fn new(db_manager: Arc<DatabaseManager>) -> Self {
        Self { db_manager }
    }
}

/// 유니크 제약 위반을 충돌 오류로 변환
fn map_unique_violation(e: sqlx::Error, what: &str) -> StoreError {
    match &e {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            StoreError::Conflict(format!("{} already exists", what))
        }
        _ => StoreError::Database(e),
    }
}

#[async_trait]
impl MarketStore for PostgresMarketStore {
    // region:    --- Users
    async fn create_user(&self, user: NewUser) -> StoreResult<User> {
        info!("{:<12} --> 사용자 생성: {}", "Store", user.username);
        sqlx::query_as::<_, User>(queries::INSERT_USER)
            .bind(&user.username)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(Utc::now())
            .fetch_one(self.db_manager.pool())
            .await
            .map_err(|e| map_unique_violation(e, "username"))
    }

    async fn find_credentials(&self, username: &str) -> StoreResult<Option<Credentials>> {
        let credentials = sqlx::query_as::<_, Credentials>(queries::GET_CREDENTIALS)
            .bind(username)
            .fetch_optional(self.db_manager.pool())
            .await?;
        Ok(credentials)
    }
    // endregion: --- Users

    // region:    --- Sessions
    async fn create_session(
        &self,
        token: &str,
        user_id: i64,
        expires_at: DateTime<Utc>,
    ) -> StoreResult<()> {
        sqlx::query(queries::INSERT_SESSION)
            .bind(token)
            .bind(user_id)
            .bind(Utc::now())
            .bind(expires_at)
            .execute(self.db_manager.pool())
            .await?;
        Ok(())
    }

    async fn find_session_user(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(queries::GET_SESSION_USER)
            .bind(token)
            .bind(now)
            .fetch_optional(self.db_manager.pool())
            .await?;
        Ok(user)
    }

    async fn delete_session(&self, token: &str) -> StoreResult<()> {
        sqlx::query(queries::DELETE_SESSION)
            .bind(token)
            .execute(self.db_manager.pool())
            .await?;
        Ok(())
    }

    async fn delete_expired_sessions(&self, now: DateTime<Utc>) -> StoreResult<u64> {
        let result = sqlx::query(queries::DELETE_EXPIRED_SESSIONS)
            .bind(now)
            .execute(self.db_manager.pool())
            .await?;
        Ok(result.rows_affected())
    }
    // endregion: --- Sessions

    // region:    --- Categories
    async fn list_categories(&self) -> StoreResult<Vec<Category>> {
        let categories = sqlx::query_as::<_, Category>(queries::GET_ALL_CATEGORIES)
            .fetch_all(self.db_manager.pool())
            .await?;
        Ok(categories)
    }

    async fn find_category(&self, category_id: i64) -> StoreResult<Option<Category>> {
        let category = sqlx::query_as::<_, Category>(queries::GET_CATEGORY)
            .bind(category_id)
            .fetch_optional(self.db_manager.pool())
            .await?;
        Ok(category)
    }

    async fn find_category_by_code(&self, code: &str) -> StoreResult<Option<Category>> {
        let category = sqlx::query_as::<_, Category>(queries::GET_CATEGORY_BY_CODE)
            .bind(code)
            .fetch_optional(self.db_manager.pool())
            .await?;
        Ok(category)
    }
    // endregion: --- Categories

    // region:    --- Listings
    async fn create_listing(&self, listing: NewListing) -> StoreResult<Listing> {
        info!("{:<12} --> 물품 생성: {}", "Store", listing.title);
        self.db_manager
            .transaction(|tx| {
                Box::pin(async move {
                    let listing_id: i64 = sqlx::query_scalar(queries::INSERT_LISTING)
                        .bind(&listing.title)
                        .bind(&listing.description)
                        .bind(listing.starting_bid)
                        .bind(&listing.image_url)
                        .bind(listing.category_id)
                        .bind(listing.seller_id)
                        .bind(Utc::now())
                        .fetch_one(&mut **tx)
                        .await?;

                    let created = sqlx::query_as::<_, Listing>(queries::GET_LISTING)
                        .bind(listing_id)
                        .fetch_one(&mut **tx)
                        .await?;
                    Ok::<_, StoreError>(created)
                })
            })
            .await
    }

    async fn find_listing(&self, listing_id: i64) -> StoreResult<Option<Listing>> {
        let listing = sqlx::query_as::<_, Listing>(queries::GET_LISTING)
            .bind(listing_id)
            .fetch_optional(self.db_manager.pool())
            .await?;
        Ok(listing)
    }

    async fn list_listings(&self, filter: ListingFilter) -> StoreResult<Vec<Listing>> {
        debug!("{:<12} --> 물품 목록 조회: {:?}", "Store", filter);
        let query = match filter {
            ListingFilter::Active => sqlx::query_as::<_, Listing>(queries::GET_ACTIVE_LISTINGS),
            ListingFilter::Closed => sqlx::query_as::<_, Listing>(queries::GET_CLOSED_LISTINGS),
            ListingFilter::Category(category_id) => {
                sqlx::query_as::<_, Listing>(queries::GET_CATEGORY_LISTINGS).bind(category_id)
            }
            ListingFilter::WatchedBy(user_id) => {
                sqlx::query_as::<_, Listing>(queries::GET_WATCHED_LISTINGS).bind(user_id)
            }
        };
        let listings = query.fetch_all(self.db_manager.pool()).await?;
        Ok(listings)
    }

    async fn update_listing(&self, listing_id: i64, update: ListingUpdate) -> StoreResult<bool> {
        let result = sqlx::query(queries::UPDATE_LISTING)
            .bind(&update.title)
            .bind(&update.description)
            .bind(&update.image_url)
            .bind(update.category_id)
            .bind(Utc::now())
            .bind(listing_id)
            .execute(self.db_manager.pool())
            .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn close_listing(&self, listing_id: i64, seller_id: i64) -> StoreResult<bool> {
        let result = sqlx::query(queries::CLOSE_LISTING)
            .bind(Utc::now())
            .bind(listing_id)
            .bind(seller_id)
            .execute(self.db_manager.pool())
            .await?;
        Ok(result.rows_affected() == 1)
    }
    // endregion: --- Listings

    // region:    --- Bids
    async fn place_bid(&self, bid: NewBid) -> StoreResult<Option<Bid>> {
        self.db_manager
            .transaction(|tx| {
                Box::pin(async move {
                    // 현재 가격 확인 및 업데이트
                    let accepted = sqlx::query(queries::ACCEPT_BID)
                        .bind(bid.amount)
                        .bind(bid.listing_id)
                        .bind(bid.bidder_id)
                        .bind(bid.bid_date)
                        .fetch_optional(&mut **tx)
                        .await?;

                    if accepted.is_none() {
                        debug!(
                            "{:<12} --> 입찰 조건 불충족: listing={}, amount={}",
                            "Store", bid.listing_id, bid.amount
                        );
                        return Ok::<_, StoreError>(None);
                    }

                    // 입찰 기록 추가
                    let stored = sqlx::query_as::<_, Bid>(queries::INSERT_BID)
                        .bind(bid.listing_id)
                        .bind(bid.bidder_id)
                        .bind(bid.amount)
                        .bind(bid.bid_date)
                        .fetch_one(&mut **tx)
                        .await?;
                    Ok(Some(stored))
                })
            })
            .await
    }

    async fn list_bids(&self, listing_id: i64) -> StoreResult<Vec<Bid>> {
        let bids = sqlx::query_as::<_, Bid>(queries::GET_LISTING_BIDS)
            .bind(listing_id)
            .fetch_all(self.db_manager.pool())
            .await?;
        Ok(bids)
    }

    async fn highest_bid(&self, listing_id: i64) -> StoreResult<Option<Bid>> {
        let bid = sqlx::query_as::<_, Bid>(queries::GET_HIGHEST_BID)
            .bind(listing_id)
            .fetch_optional(self.db_manager.pool())
            .await?;
        Ok(bid)
    }
    // endregion: --- Bids

    // region:    --- Comments
    async fn add_comment(&self, comment: NewComment) -> StoreResult<Comment> {
        let stored = sqlx::query_as::<_, Comment>(queries::INSERT_COMMENT)
            .bind(comment.listing_id)
            .bind(comment.user_id)
            .bind(&comment.title)
            .bind(&comment.content)
            .bind(Utc::now())
            .fetch_one(self.db_manager.pool())
            .await?;
        Ok(stored)
    }

    async fn list_comments(&self, listing_id: i64) -> StoreResult<Vec<Comment>> {
        let comments = sqlx::query_as::<_, Comment>(queries::GET_LISTING_COMMENTS)
            .bind(listing_id)
            .fetch_all(self.db_manager.pool())
            .await?;
        Ok(comments)
    }
    // endregion: --- Comments

    // region:    --- Watchlists
    async fn add_to_watchlist(&self, user_id: i64, listing_id: i64) -> StoreResult<bool> {
        self.db_manager
            .transaction(|tx| {
                Box::pin(async move {
                    // 사용자 관심 목록이 없으면 생성
                    let watchlist_id: i64 = sqlx::query_scalar(queries::UPSERT_WATCHLIST)
                        .bind(user_id)
                        .fetch_one(&mut **tx)
                        .await?;

                    let result = sqlx::query(queries::INSERT_WATCHLIST_LISTING)
                        .bind(watchlist_id)
                        .bind(listing_id)
                        .bind(Utc::now())
                        .execute(&mut **tx)
                        .await?;
                    Ok::<_, StoreError>(result.rows_affected() == 1)
                })
            })
            .await
    }

    async fn remove_from_watchlist(&self, user_id: i64, listing_id: i64) -> StoreResult<bool> {
        let result = sqlx::query(queries::DELETE_WATCHLIST_LISTING)
            .bind(user_id)
            .bind(listing_id)
            .execute(self.db_manager.pool())
            .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn is_watching(&self, user_id: i64, listing_id: i64) -> StoreResult<bool> {
        let row = sqlx::query(queries::IS_WATCHING)
            .bind(user_id)
            .bind(listing_id)
            .fetch_one(self.db_manager.pool())
            .await?;
        Ok(row.get("watching"))
    }
    // endregion: --- Watchlists
}

// endregion: --- Postgres Market Store
