/// 관심 목록 커맨드 처리
/// 중복 추가, 없는 물품 제거는 무시하지 않고 사용자에게 알린다.
// region:    --- Imports
use crate::store::{MarketStore, StoreError};
use thiserror::Error;
use tracing::info;

// endregion: --- Imports

#[derive(Debug, Error)]
pub enum WatchlistError {
    #[error("The listing does not exist.")]
    ListingNotFound,

    #[error("This listing is already in your watchlist.")]
    AlreadyWatching,

    #[error("Cannot remove listing not in your watchlist.")]
    NotWatching,

    #[error(transparent)]
    Store(#[from] StoreError),
}

async fn ensure_listing(store: &dyn MarketStore, listing_id: i64) -> Result<(), WatchlistError> {
    store
        .find_listing(listing_id)
        .await?
        .map(|_| ())
        .ok_or(WatchlistError::ListingNotFound)
}

/// 관심 목록에 추가 (관심 목록은 첫 추가 시 생성)
pub async fn add_to_watchlist(
    store: &dyn MarketStore,
    user_id: i64,
    listing_id: i64,
) -> Result<(), WatchlistError> {
    ensure_listing(store, listing_id).await?;
    if !store.add_to_watchlist(user_id, listing_id).await? {
        return Err(WatchlistError::AlreadyWatching);
    }
    info!(
        "{:<12} --> 관심 목록 추가: user={}, listing={}",
        "Command", user_id, listing_id
    );
    Ok(())
}

/// 관심 목록에서 제거
pub async fn remove_from_watchlist(
    store: &dyn MarketStore,
    user_id: i64,
    listing_id: i64,
) -> Result<(), WatchlistError> {
    ensure_listing(store, listing_id).await?;
    if !store.remove_from_watchlist(user_id, listing_id).await? {
        return Err(WatchlistError::NotWatching);
    }
    info!(
        "{:<12} --> 관심 목록 제거: user={}, listing={}",
        "Command", user_id, listing_id
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auction::model::{ListingFilter, NewListing, NewUser};
    use crate::auction::money::Money;
    use crate::store::InMemoryMarketStore;

    async fn seed(store: &InMemoryMarketStore) -> (i64, i64) {
        let user = store
            .create_user(NewUser {
                username: "watcher".to_string(),
                email: String::new(),
                password_hash: "hash".to_string(),
            })
            .await
            .unwrap();
        let category = store.find_category_by_code("TOYS").await.unwrap().unwrap();
        let listing = store
            .create_listing(NewListing {
                title: "Kite".to_string(),
                description: "Blue kite".to_string(),
                starting_bid: Money::from_cents(300),
                image_url: String::new(),
                category_id: category.id,
                seller_id: user.id,
            })
            .await
            .unwrap();
        (user.id, listing.id)
    }

    #[tokio::test]
    async fn duplicate_add_is_rejected() {
        let store = InMemoryMarketStore::new();
        let (user_id, listing_id) = seed(&store).await;

        add_to_watchlist(&store, user_id, listing_id).await.unwrap();
        let again = add_to_watchlist(&store, user_id, listing_id).await;
        assert!(matches!(again, Err(WatchlistError::AlreadyWatching)));

        let watched = store
            .list_listings(ListingFilter::WatchedBy(user_id))
            .await
            .unwrap();
        assert_eq!(watched.len(), 1);
    }

    #[tokio::test]
    async fn removing_unwatched_listing_is_rejected() {
        let store = InMemoryMarketStore::new();
        let (user_id, listing_id) = seed(&store).await;

        let missing = remove_from_watchlist(&store, user_id, listing_id).await;
        assert!(matches!(missing, Err(WatchlistError::NotWatching)));

        add_to_watchlist(&store, user_id, listing_id).await.unwrap();
        remove_from_watchlist(&store, user_id, listing_id).await.unwrap();
        assert!(!store.is_watching(user_id, listing_id).await.unwrap());
    }

    #[tokio::test]
    async fn unknown_listing_is_reported() {
        let store = InMemoryMarketStore::new();
        let (user_id, _) = seed(&store).await;
        let result = add_to_watchlist(&store, user_id, 9999).await;
        assert!(matches!(result, Err(WatchlistError::ListingNotFound)));
    }
}
