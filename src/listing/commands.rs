/// 물품 관련 커맨드 처리
/// 1. 등록
/// 2. 수정
/// 3. 종료
/// 4. 댓글
// region:    --- Imports
use super::form::{CommentForm, EditListingForm, FieldErrors, ListingForm};
use crate::auction::category::{Category, CategoryCode};
use crate::auction::model::{Comment, Listing, ListingUpdate, NewComment, NewListing, User};
use crate::store::{MarketStore, StoreError};
use thiserror::Error;
use tracing::info;

// endregion: --- Imports

#[derive(Debug, Error)]
pub enum ListingError {
    #[error("The listing does not exist.")]
    NotFound,

    #[error("Only the seller can {0} this listing.")]
    NotSeller(&'static str),

    #[error("This listing is already closed.")]
    AlreadyClosed,

    #[error("Invalid form. Please resubmit.")]
    InvalidForm(FieldErrors),

    #[error("Invalid comment. Please resubmit.")]
    InvalidComment(FieldErrors),

    #[error(transparent)]
    Store(#[from] StoreError),
}

// region:    --- Helpers
/// 폼의 카테고리 id 확인 (미선택 시 기본 카테고리)
async fn resolve_category(
    store: &dyn MarketStore,
    category_id: Option<i64>,
) -> Result<Option<Category>, StoreError> {
    match category_id {
        Some(id) => store.find_category(id).await,
        None => store.find_category_by_code(CategoryCode::DEFAULT.code()).await,
    }
}

async fn owned_open_listing(
    store: &dyn MarketStore,
    user: &User,
    listing_id: i64,
    action: &'static str,
) -> Result<Listing, ListingError> {
    let listing = store
        .find_listing(listing_id)
        .await?
        .ok_or(ListingError::NotFound)?;
    if !listing.is_seller(user.id) {
        return Err(ListingError::NotSeller(action));
    }
    if listing.closed {
        return Err(ListingError::AlreadyClosed);
    }
    Ok(listing)
}

fn unknown_category() -> FieldErrors {
    let mut errors = FieldErrors::default();
    errors.add("category", "Select a valid choice.");
    errors
}

// endregion: --- Helpers

// region:    --- Commands
/// 1. 물품 등록 (현재 가격 = 시작가)
pub async fn create_listing(
    store: &dyn MarketStore,
    seller: &User,
    form: &ListingForm,
) -> Result<Listing, ListingError> {
    let valid = form.validate().map_err(ListingError::InvalidForm)?;
    let category = resolve_category(store, valid.category_id)
        .await?
        .ok_or_else(|| ListingError::InvalidForm(unknown_category()))?;

    let listing = store
        .create_listing(NewListing {
            title: valid.title,
            description: valid.description,
            starting_bid: valid.starting_bid,
            image_url: valid.image_url,
            category_id: category.id,
            seller_id: seller.id,
        })
        .await?;
    info!(
        "{:<12} --> 물품 등록: id={}, seller={}",
        "Command", listing.id, seller.username
    );
    Ok(listing)
}

/// 2. 물품 수정 (판매자 본인, 진행 중인 물품만)
pub async fn edit_listing(
    store: &dyn MarketStore,
    user: &User,
    listing_id: i64,
    form: &EditListingForm,
) -> Result<Listing, ListingError> {
    owned_open_listing(store, user, listing_id, "edit").await?;
    let valid = form.validate().map_err(ListingError::InvalidForm)?;
    let category = resolve_category(store, valid.category_id)
        .await?
        .ok_or_else(|| ListingError::InvalidForm(unknown_category()))?;

    let updated = store
        .update_listing(
            listing_id,
            ListingUpdate {
                title: valid.title,
                description: valid.description,
                image_url: valid.image_url,
                category_id: category.id,
            },
        )
        .await?;
    if !updated {
        return Err(ListingError::AlreadyClosed);
    }
    info!("{:<12} --> 물품 수정: id={}", "Command", listing_id);

    store
        .find_listing(listing_id)
        .await?
        .ok_or(ListingError::NotFound)
}

/// 3. 물품 종료 (판매자 본인만, 되돌릴 수 없음)
pub async fn close_listing(
    store: &dyn MarketStore,
    user: &User,
    listing_id: i64,
) -> Result<(), ListingError> {
    owned_open_listing(store, user, listing_id, "close").await?;
    if !store.close_listing(listing_id, user.id).await? {
        // 그 사이 다른 요청이 먼저 종료한 경우
        return Err(ListingError::AlreadyClosed);
    }
    info!("{:<12} --> 물품 종료: id={}", "Command", listing_id);
    Ok(())
}

/// 4. 댓글 작성
pub async fn add_comment(
    store: &dyn MarketStore,
    user: &User,
    listing_id: i64,
    form: &CommentForm,
) -> Result<Comment, ListingError> {
    store
        .find_listing(listing_id)
        .await?
        .ok_or(ListingError::NotFound)?;
    let (title, content) = form.validate().map_err(ListingError::InvalidComment)?;

    let comment = store
        .add_comment(NewComment {
            listing_id,
            user_id: user.id,
            title,
            content,
        })
        .await?;
    info!(
        "{:<12} --> 댓글 작성: listing={}, user={}",
        "Command", listing_id, user.username
    );
    Ok(comment)
}

// endregion: --- Commands

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auction::model::NewUser;
    use crate::auction::money::Money;
    use crate::store::InMemoryMarketStore;

    async fn user(store: &InMemoryMarketStore, name: &str) -> User {
        store
            .create_user(NewUser {
                username: name.to_string(),
                email: String::new(),
                password_hash: "hash".to_string(),
            })
            .await
            .unwrap()
    }

    fn listing_form(category: &str) -> ListingForm {
        ListingForm {
            title: "Desk".to_string(),
            description: "Oak desk".to_string(),
            starting_bid: "40".to_string(),
            image_url: String::new(),
            category: category.to_string(),
        }
    }

    #[tokio::test]
    async fn created_listing_starts_at_starting_bid_in_default_category() {
        let store = InMemoryMarketStore::new();
        let seller = user(&store, "seller").await;

        let listing = create_listing(&store, &seller, &listing_form("")).await.unwrap();
        assert_eq!(listing.current_bid, Money::from_cents(4000));
        assert_eq!(listing.starting_bid, listing.current_bid);
        assert_eq!(listing.category_code, "NONE");
        assert_eq!(listing.seller_username, "seller");
        assert!(!listing.closed);
    }

    #[tokio::test]
    async fn unknown_category_is_a_form_error() {
        let store = InMemoryMarketStore::new();
        let seller = user(&store, "seller").await;
        let result = create_listing(&store, &seller, &listing_form("4242")).await;
        match result {
            Err(ListingError::InvalidForm(errors)) => {
                assert_eq!(errors.get("category"), Some("Select a valid choice."))
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn only_the_seller_can_close() {
        let store = InMemoryMarketStore::new();
        let seller = user(&store, "seller").await;
        let other = user(&store, "other").await;
        let listing = create_listing(&store, &seller, &listing_form("")).await.unwrap();

        let denied = close_listing(&store, &other, listing.id).await;
        assert!(matches!(denied, Err(ListingError::NotSeller("close"))));
        assert!(!store.find_listing(listing.id).await.unwrap().unwrap().closed);

        close_listing(&store, &seller, listing.id).await.unwrap();
        assert!(store.find_listing(listing.id).await.unwrap().unwrap().closed);

        // 종료는 단방향
        let again = close_listing(&store, &seller, listing.id).await;
        assert!(matches!(again, Err(ListingError::AlreadyClosed)));
    }

    #[tokio::test]
    async fn edit_keeps_prices_and_rejects_strangers() {
        let store = InMemoryMarketStore::new();
        let seller = user(&store, "seller").await;
        let other = user(&store, "other").await;
        let listing = create_listing(&store, &seller, &listing_form("")).await.unwrap();
        let garden = store.find_category_by_code("GARD").await.unwrap().unwrap();

        let form = EditListingForm {
            title: "Garden desk".to_string(),
            description: "Weatherproof".to_string(),
            image_url: "https://example.com/desk.png".to_string(),
            category: garden.id.to_string(),
        };
        let denied = edit_listing(&store, &other, listing.id, &form).await;
        assert!(matches!(denied, Err(ListingError::NotSeller("edit"))));

        let edited = edit_listing(&store, &seller, listing.id, &form).await.unwrap();
        assert_eq!(edited.title, "Garden desk");
        assert_eq!(edited.category_code, "GARD");
        assert_eq!(edited.starting_bid, listing.starting_bid);
    }

    #[tokio::test]
    async fn comments_need_an_existing_listing() {
        let store = InMemoryMarketStore::new();
        let commenter = user(&store, "commenter").await;
        let form = CommentForm {
            title: "Question".to_string(),
            content: "Is it still available?".to_string(),
        };
        let missing = add_comment(&store, &commenter, 404, &form).await;
        assert!(matches!(missing, Err(ListingError::NotFound)));

        let listing = create_listing(&store, &commenter, &listing_form("")).await.unwrap();
        let comment = add_comment(&store, &commenter, listing.id, &form).await.unwrap();
        assert_eq!(comment.username, "commenter");
        assert_eq!(store.list_comments(listing.id).await.unwrap().len(), 1);
    }
}
