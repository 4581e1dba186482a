/// 메모리 저장소
/// 모든 연산을 하나의 뮤텍스로 직렬화한다. 테스트용.
// region:    --- Imports
use super::{MarketStore, StoreError, StoreResult};
use crate::auction::category::{Category, CategoryCode};
use crate::auction::model::{
    Bid, Comment, Credentials, Listing, ListingFilter, ListingUpdate, NewBid, NewComment,
    NewListing, NewUser, User,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

// endregion: --- Imports

// region:    --- State
#[derive(Default)]
struct MemoryState {
    users: Vec<(User, String)>,
    sessions: HashMap<String, (i64, DateTime<Utc>)>,
    categories: Vec<Category>,
    listings: Vec<Listing>,
    bids: Vec<Bid>,
    comments: Vec<Comment>,
    // 사용자별 (물품 id, 추가 시각)
    watchlists: HashMap<i64, Vec<(i64, DateTime<Utc>)>>,
    next_id: i64,
}

impl MemoryState {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn user(&self, user_id: i64) -> StoreResult<&User> {
        self.users
            .iter()
            .map(|(user, _)| user)
            .find(|user| user.id == user_id)
            .ok_or(StoreError::NotFound)
    }

    fn listing_mut(&mut self, listing_id: i64) -> Option<&mut Listing> {
        self.listings.iter_mut().find(|l| l.id == listing_id)
    }
}

// endregion: --- State

// region:    --- In Memory Market Store
pub struct InMemoryMarketStore {
    state: Mutex<MemoryState>,
}

impl InMemoryMarketStore {
    /// 카테고리가 시드된 빈 저장소 생성
    pub fn new() -> Self {
        let mut state = MemoryState::default();
        for code in CategoryCode::ALL {
            let id = state.next_id();
            state.categories.push(Category {
                id,
                code: code.code().to_string(),
            });
        }
        Self {
            state: Mutex::new(state),
        }
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for InMemoryMarketStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MarketStore for InMemoryMarketStore {
    async fn create_user(&self, user: NewUser) -> StoreResult<User> {
        let mut state = self.lock();
        if state.users.iter().any(|(u, _)| u.username == user.username) {
            return Err(StoreError::Conflict("username already exists".to_string()));
        }
        let created = User {
            id: state.next_id(),
            username: user.username,
            email: user.email,
            created_at: Utc::now(),
        };
        state.users.push((created.clone(), user.password_hash));
        Ok(created)
    }

    async fn find_credentials(&self, username: &str) -> StoreResult<Option<Credentials>> {
        let state = self.lock();
        Ok(state
            .users
            .iter()
            .find(|(u, _)| u.username == username)
            .map(|(u, hash)| Credentials {
                id: u.id,
                username: u.username.clone(),
                password_hash: hash.clone(),
            }))
    }

    async fn create_session(
        &self,
        token: &str,
        user_id: i64,
        expires_at: DateTime<Utc>,
    ) -> StoreResult<()> {
        let mut state = self.lock();
        state.user(user_id)?;
        state
            .sessions
            .insert(token.to_string(), (user_id, expires_at));
        Ok(())
    }

    async fn find_session_user(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> StoreResult<Option<User>> {
        let state = self.lock();
        match state.sessions.get(token) {
            Some((user_id, expires_at)) if *expires_at > now => {
                Ok(state.user(*user_id).ok().cloned())
            }
            _ => Ok(None),
        }
    }

    async fn delete_session(&self, token: &str) -> StoreResult<()> {
        self.lock().sessions.remove(token);
        Ok(())
    }

    async fn delete_expired_sessions(&self, now: DateTime<Utc>) -> StoreResult<u64> {
        let mut state = self.lock();
        let before = state.sessions.len();
        state.sessions.retain(|_, (_, expires_at)| *expires_at > now);
        Ok((before - state.sessions.len()) as u64)
    }

    async fn list_categories(&self) -> StoreResult<Vec<Category>> {
        Ok(self.lock().categories.clone())
    }

    async fn find_category(&self, category_id: i64) -> StoreResult<Option<Category>> {
        Ok(self
            .lock()
            .categories
            .iter()
            .find(|c| c.id == category_id)
            .cloned())
    }

    async fn find_category_by_code(&self, code: &str) -> StoreResult<Option<Category>> {
        Ok(self
            .lock()
            .categories
            .iter()
            .find(|c| c.code == code)
            .cloned())
    }

    async fn create_listing(&self, listing: NewListing) -> StoreResult<Listing> {
        let mut state = self.lock();
        let seller_username = state.user(listing.seller_id)?.username.clone();
        let category_code = state
            .categories
            .iter()
            .find(|c| c.id == listing.category_id)
            .map(|c| c.code.clone())
            .ok_or(StoreError::NotFound)?;
        let now = Utc::now();
        let created = Listing {
            id: state.next_id(),
            title: listing.title,
            description: listing.description,
            starting_bid: listing.starting_bid,
            current_bid: listing.starting_bid,
            image_url: listing.image_url,
            category_id: listing.category_id,
            category_code,
            seller_id: listing.seller_id,
            seller_username,
            closed: false,
            bid_count: 0,
            creation_date: now,
            update_date: now,
        };
        state.listings.push(created.clone());
        Ok(created)
    }

    async fn find_listing(&self, listing_id: i64) -> StoreResult<Option<Listing>> {
        Ok(self
            .lock()
            .listings
            .iter()
            .find(|l| l.id == listing_id)
            .cloned())
    }

    async fn list_listings(&self, filter: ListingFilter) -> StoreResult<Vec<Listing>> {
        let state = self.lock();
        let mut listings: Vec<Listing> = match filter {
            ListingFilter::Active => state.listings.iter().filter(|l| !l.closed).cloned().collect(),
            ListingFilter::Closed => state.listings.iter().filter(|l| l.closed).cloned().collect(),
            ListingFilter::Category(category_id) => state
                .listings
                .iter()
                .filter(|l| !l.closed && l.category_id == category_id)
                .cloned()
                .collect(),
            ListingFilter::WatchedBy(user_id) => {
                let mut entries = state.watchlists.get(&user_id).cloned().unwrap_or_default();
                entries.sort_by(|a, b| b.1.cmp(&a.1).then(b.0.cmp(&a.0)));
                return Ok(entries
                    .into_iter()
                    .filter_map(|(listing_id, _)| {
                        state.listings.iter().find(|l| l.id == listing_id).cloned()
                    })
                    .collect());
            }
        };
        // 최신 순 (id는 생성 순서대로 증가)
        listings.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(listings)
    }

    async fn update_listing(&self, listing_id: i64, update: ListingUpdate) -> StoreResult<bool> {
        let mut state = self.lock();
        let category_code = state
            .categories
            .iter()
            .find(|c| c.id == update.category_id)
            .map(|c| c.code.clone())
            .ok_or(StoreError::NotFound)?;
        match state.listing_mut(listing_id) {
            Some(listing) if !listing.closed => {
                listing.title = update.title;
                listing.description = update.description;
                listing.image_url = update.image_url;
                listing.category_id = update.category_id;
                listing.category_code = category_code;
                listing.update_date = Utc::now();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn close_listing(&self, listing_id: i64, seller_id: i64) -> StoreResult<bool> {
        let mut state = self.lock();
        match state.listing_mut(listing_id) {
            Some(listing) if listing.seller_id == seller_id && !listing.closed => {
                listing.closed = true;
                listing.update_date = Utc::now();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn place_bid(&self, bid: NewBid) -> StoreResult<Option<Bid>> {
        let mut state = self.lock();
        let bidder_username = state.user(bid.bidder_id)?.username.clone();
        let id = state.next_id();
        let Some(listing) = state.listing_mut(bid.listing_id) else {
            return Ok(None);
        };

        let acceptable = !listing.closed
            && listing.seller_id != bid.bidder_id
            && bid.amount >= listing.starting_bid
            && (bid.amount > listing.current_bid || !listing.has_bids());
        if !acceptable {
            return Ok(None);
        }

        listing.current_bid = bid.amount;
        listing.bid_count += 1;
        listing.update_date = bid.bid_date;

        let stored = Bid {
            id,
            listing_id: bid.listing_id,
            bidder_id: bid.bidder_id,
            bidder_username,
            amount: bid.amount,
            bid_date: bid.bid_date,
        };
        state.bids.push(stored.clone());
        Ok(Some(stored))
    }

    async fn list_bids(&self, listing_id: i64) -> StoreResult<Vec<Bid>> {
        let state = self.lock();
        let mut bids: Vec<Bid> = state
            .bids
            .iter()
            .filter(|b| b.listing_id == listing_id)
            .cloned()
            .collect();
        bids.sort_by(|a, b| b.amount.cmp(&a.amount).then(a.id.cmp(&b.id)));
        Ok(bids)
    }

    async fn highest_bid(&self, listing_id: i64) -> StoreResult<Option<Bid>> {
        Ok(self.list_bids(listing_id).await?.into_iter().next())
    }

    async fn add_comment(&self, comment: NewComment) -> StoreResult<Comment> {
        let mut state = self.lock();
        let username = state.user(comment.user_id)?.username.clone();
        let stored = Comment {
            id: state.next_id(),
            listing_id: comment.listing_id,
            user_id: comment.user_id,
            username,
            title: comment.title,
            content: comment.content,
            date: Utc::now(),
        };
        state.comments.push(stored.clone());
        Ok(stored)
    }

    async fn list_comments(&self, listing_id: i64) -> StoreResult<Vec<Comment>> {
        let state = self.lock();
        let mut comments: Vec<Comment> = state
            .comments
            .iter()
            .filter(|c| c.listing_id == listing_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(comments)
    }

    async fn add_to_watchlist(&self, user_id: i64, listing_id: i64) -> StoreResult<bool> {
        let mut state = self.lock();
        let entries = state.watchlists.entry(user_id).or_default();
        if entries.iter().any(|(id, _)| *id == listing_id) {
            return Ok(false);
        }
        entries.push((listing_id, Utc::now()));
        Ok(true)
    }

    async fn remove_from_watchlist(&self, user_id: i64, listing_id: i64) -> StoreResult<bool> {
        let mut state = self.lock();
        let Some(entries) = state.watchlists.get_mut(&user_id) else {
            return Ok(false);
        };
        let before = entries.len();
        entries.retain(|(id, _)| *id != listing_id);
        Ok(entries.len() < before)
    }

    async fn is_watching(&self, user_id: i64, listing_id: i64) -> StoreResult<bool> {
        Ok(self
            .lock()
            .watchlists
            .get(&user_id)
            .is_some_and(|entries| entries.iter().any(|(id, _)| *id == listing_id)))
    }
}

// endregion: --- In Memory Market Store

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auction::money::Money;

    async fn seed_user(store: &InMemoryMarketStore, username: &str) -> User {
        store
            .create_user(NewUser {
                username: username.to_string(),
                email: format!("{}@example.com", username),
                password_hash: "hash".to_string(),
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn duplicate_username_is_a_conflict() {
        let store = InMemoryMarketStore::new();
        seed_user(&store, "alice").await;
        let result = store
            .create_user(NewUser {
                username: "alice".to_string(),
                email: String::new(),
                password_hash: "hash".to_string(),
            })
            .await;
        assert!(matches!(result, Err(StoreError::Conflict(_))));
    }

    #[tokio::test]
    async fn expired_sessions_are_invisible_and_swept() {
        let store = InMemoryMarketStore::new();
        let user = seed_user(&store, "alice").await;
        let now = Utc::now();
        store
            .create_session("live", user.id, now + chrono::Duration::hours(1))
            .await
            .unwrap();
        store
            .create_session("stale", user.id, now - chrono::Duration::hours(1))
            .await
            .unwrap();

        assert_eq!(store.find_session_user("live", now).await.unwrap(), Some(user));
        assert_eq!(store.find_session_user("stale", now).await.unwrap(), None);
        assert_eq!(store.delete_expired_sessions(now).await.unwrap(), 1);
        assert_eq!(store.delete_expired_sessions(now).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn place_bid_rechecks_price_conditions() {
        let store = InMemoryMarketStore::new();
        let seller = seed_user(&store, "seller").await;
        let bidder = seed_user(&store, "bidder").await;
        let category = store.find_category_by_code("NONE").await.unwrap().unwrap();
        let listing = store
            .create_listing(NewListing {
                title: "Lamp".to_string(),
                description: "Brass lamp".to_string(),
                starting_bid: Money::from_cents(1000),
                image_url: String::new(),
                category_id: category.id,
                seller_id: seller.id,
            })
            .await
            .unwrap();

        let bid = |amount| NewBid {
            listing_id: listing.id,
            bidder_id: bidder.id,
            amount: Money::from_cents(amount),
            bid_date: Utc::now(),
        };

        // 첫 입찰은 시작가와 같아도 된다
        assert!(store.place_bid(bid(1000)).await.unwrap().is_some());
        assert!(store.place_bid(bid(1000)).await.unwrap().is_none());
        assert!(store.place_bid(bid(1500)).await.unwrap().is_some());

        let updated = store.find_listing(listing.id).await.unwrap().unwrap();
        assert_eq!(updated.current_bid, Money::from_cents(1500));
        assert_eq!(updated.bid_count, 2);
        let highest = store.highest_bid(listing.id).await.unwrap().unwrap();
        assert_eq!(highest.bidder_username, "bidder");
    }
}
