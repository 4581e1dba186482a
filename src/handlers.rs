// region:    --- Imports
use crate::app::AppState;
use crate::auction::model::{Bid, ListingFilter, NewUser, User};
use crate::auction::money::Money;
use crate::auth::form::RegisterForm;
use crate::auth::password::{self, PasswordError};
use crate::auth::{session, CurrentUser, MaybeUser};
use crate::bidding::commands::{handle_place_bid, BidError, BidRejection, PlaceBidCommand};
use crate::error::{AppError, AppResult};
use crate::flash::{self, Flash};
use crate::listing::commands::{self as listing_commands, ListingError};
use crate::listing::form::{CommentForm, EditListingForm, ListingForm};
use crate::store::StoreError;
use crate::views::{self, ListingView, PageContext};
use crate::watchlist::commands::{self as watchlist_commands, WatchlistError};
use axum::extract::{Path, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use tracing::info;

// endregion: --- Imports

// region:    --- Helpers
type Page = (CookieJar, Html<String>);

/// 쿠키의 플래시 메시지를 꺼내 페이지 렌더링
fn render(
    jar: CookieJar,
    user: Option<&User>,
    page: impl FnOnce(&PageContext<'_>) -> Html<String>,
) -> Page {
    let (jar, flash) = flash::take(jar);
    let ctx = PageContext {
        user,
        flash: flash.as_ref(),
    };
    (jar, page(&ctx))
}

/// 플래시 메시지와 함께 리다이렉트
fn redirect_with(jar: CookieJar, flash: Flash, to: &str) -> Response {
    (flash::push(jar, flash), Redirect::to(to)).into_response()
}

fn listing_url(listing_id: i64) -> String {
    format!("/listings/{}", listing_id)
}

/// 플래시로 처리하지 않는 물품 오류를 오류 페이지로 변환
fn listing_error(e: ListingError) -> AppError {
    match e {
        ListingError::NotFound => AppError::listing_not_found(),
        ListingError::Store(e) => AppError::Store(e),
        other => AppError::Forbidden(other.to_string()),
    }
}

// endregion: --- Helpers

// region:    --- Browse Handlers

/// 진행 중인 물품 목록
pub async fn index(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    jar: CookieJar,
) -> AppResult<Page> {
    let listings = state.store.list_listings(ListingFilter::Active).await?;
    Ok(render(jar, user.as_ref(), |ctx| {
        views::listings_page(ctx, "Active Listings", &listings)
    }))
}

/// 종료된 물품 목록
pub async fn closed(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    jar: CookieJar,
) -> AppResult<Page> {
    let listings = state.store.list_listings(ListingFilter::Closed).await?;
    Ok(render(jar, user.as_ref(), |ctx| {
        views::listings_page(ctx, "Closed Listings", &listings)
    }))
}

/// 카테고리 목록
pub async fn categories(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    jar: CookieJar,
) -> AppResult<Page> {
    let categories = state.store.list_categories().await?;
    Ok(render(jar, user.as_ref(), |ctx| {
        views::categories_page(ctx, &categories)
    }))
}

/// 카테고리별 진행 중인 물품 목록
pub async fn category(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    jar: CookieJar,
    Path(category_id): Path<i64>,
) -> AppResult<Page> {
    let category = state
        .store
        .find_category(category_id)
        .await?
        .ok_or_else(|| AppError::NotFound("The category does not exist.".to_string()))?;
    let listings = state
        .store
        .list_listings(ListingFilter::Category(category.id))
        .await?;
    let heading = format!("Category: {}", category.display_name());
    Ok(render(jar, user.as_ref(), |ctx| {
        views::listings_page(ctx, &heading, &listings)
    }))
}

/// 관심 목록
pub async fn watchlist(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    jar: CookieJar,
) -> AppResult<Page> {
    let listings = state
        .store
        .list_listings(ListingFilter::WatchedBy(user.id))
        .await?;
    Ok(render(jar, Some(&user), |ctx| {
        views::listings_page(ctx, "Watchlist", &listings)
    }))
}

/// 물품 상세
pub async fn listing(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    jar: CookieJar,
    Path(listing_id): Path<i64>,
) -> AppResult<Page> {
    let listing = state
        .store
        .find_listing(listing_id)
        .await?
        .ok_or_else(AppError::listing_not_found)?;

    let watching = match &user {
        Some(user) => state.store.is_watching(user.id, listing.id).await?,
        None => false,
    };
    let comments = state.store.list_comments(listing.id).await?;
    let winner = if listing.closed {
        state.store.highest_bid(listing.id).await?
    } else {
        None
    };

    let view = ListingView {
        listing: &listing,
        watching,
        comments: &comments,
        winner: winner.as_ref(),
    };
    Ok(render(jar, user.as_ref(), |ctx| views::listing_page(ctx, &view)))
}

// endregion: --- Browse Handlers

// region:    --- Listing Handlers

/// 물품 등록 폼
pub async fn create_form(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    jar: CookieJar,
) -> AppResult<Page> {
    let categories = state.store.list_categories().await?;
    Ok(render(jar, Some(&user), |ctx| {
        views::create_page(ctx, &ListingForm::default(), None, &categories)
    }))
}

/// 물품 등록
pub async fn create(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    jar: CookieJar,
    Form(form): Form<ListingForm>,
) -> AppResult<Response> {
    match listing_commands::create_listing(state.store.as_ref(), &user, &form).await {
        Ok(listing) => Ok(redirect_with(
            jar,
            Flash::success("New Listing created."),
            &listing_url(listing.id),
        )),
        Err(ListingError::InvalidForm(errors)) => {
            let categories = state.store.list_categories().await?;
            let (jar, _) = flash::take(jar);
            let flash = Flash::error("Invalid form. Please resubmit.");
            let ctx = PageContext {
                user: Some(&user),
                flash: Some(&flash),
            };
            let page = views::create_page(&ctx, &form, Some(&errors), &categories);
            Ok((jar, page).into_response())
        }
        Err(e) => Err(listing_error(e)),
    }
}

/// 물품 수정 폼 (판매자 본인, 진행 중인 물품만)
pub async fn edit_form(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    jar: CookieJar,
    Path(listing_id): Path<i64>,
) -> AppResult<Response> {
    let listing = state
        .store
        .find_listing(listing_id)
        .await?
        .ok_or_else(AppError::listing_not_found)?;
    if !listing.is_seller(user.id) {
        return Err(AppError::Forbidden(
            ListingError::NotSeller("edit").to_string(),
        ));
    }
    if listing.closed {
        return Ok(redirect_with(
            jar,
            Flash::error(ListingError::AlreadyClosed.to_string()),
            &listing_url(listing.id),
        ));
    }

    let form = EditListingForm {
        title: listing.title.clone(),
        description: listing.description.clone(),
        image_url: listing.image_url.clone(),
        category: listing.category_id.to_string(),
    };
    let categories = state.store.list_categories().await?;
    Ok(render(jar, Some(&user), |ctx| {
        views::edit_page(ctx, listing.id, &form, None, &categories)
    })
    .into_response())
}

/// 물품 수정
pub async fn edit(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    jar: CookieJar,
    Path(listing_id): Path<i64>,
    Form(form): Form<EditListingForm>,
) -> AppResult<Response> {
    match listing_commands::edit_listing(state.store.as_ref(), &user, listing_id, &form).await {
        Ok(listing) => Ok(redirect_with(
            jar,
            Flash::success("Listing updated."),
            &listing_url(listing.id),
        )),
        Err(e @ ListingError::AlreadyClosed) => Ok(redirect_with(
            jar,
            Flash::error(e.to_string()),
            &listing_url(listing_id),
        )),
        Err(ListingError::InvalidForm(errors)) => {
            let categories = state.store.list_categories().await?;
            let (jar, _) = flash::take(jar);
            let flash = Flash::error("Invalid form. Please resubmit.");
            let ctx = PageContext {
                user: Some(&user),
                flash: Some(&flash),
            };
            let page = views::edit_page(&ctx, listing_id, &form, Some(&errors), &categories);
            Ok((jar, page).into_response())
        }
        Err(e) => Err(listing_error(e)),
    }
}

/// 물품 종료
pub async fn close(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    jar: CookieJar,
    Path(listing_id): Path<i64>,
) -> AppResult<Response> {
    let flash = match listing_commands::close_listing(state.store.as_ref(), &user, listing_id).await
    {
        Ok(()) => Flash::success("Listing closed."),
        Err(e @ (ListingError::NotSeller(_) | ListingError::AlreadyClosed)) => {
            Flash::error(e.to_string())
        }
        Err(e) => return Err(listing_error(e)),
    };
    Ok(redirect_with(jar, flash, &listing_url(listing_id)))
}

/// 댓글 작성
pub async fn comment(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    jar: CookieJar,
    Path(listing_id): Path<i64>,
    Form(form): Form<CommentForm>,
) -> AppResult<Response> {
    let flash = match listing_commands::add_comment(state.store.as_ref(), &user, listing_id, &form)
        .await
    {
        Ok(_) => Flash::success("Comment added."),
        Err(e @ ListingError::InvalidComment(_)) => Flash::error(e.to_string()),
        Err(e) => return Err(listing_error(e)),
    };
    Ok(redirect_with(jar, flash, &listing_url(listing_id)))
}

// endregion: --- Listing Handlers

// region:    --- Bid Handlers

#[derive(Debug, Deserialize)]
pub struct BidForm {
    #[serde(default)]
    pub bid: String,
}

/// 입찰 요청 처리
pub async fn bid(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    jar: CookieJar,
    Path(listing_id): Path<i64>,
    Form(form): Form<BidForm>,
) -> AppResult<Response> {
    let result = match Money::parse(&form.bid) {
        Ok(amount) => {
            let cmd = PlaceBidCommand {
                listing_id,
                bidder_id: user.id,
                amount,
            };
            handle_place_bid(cmd, state.store.as_ref()).await
        }
        Err(e) => Err(BidError::from(e)),
    };

    let flash = bid_flash(result)?;
    Ok(redirect_with(jar, flash, &listing_url(listing_id)))
}

/// 입찰 결과를 플래시 메시지로 변환
fn bid_flash(result: Result<Bid, BidError>) -> AppResult<Flash> {
    match result {
        Ok(_) => Ok(Flash::success("Your bid was placed.")),
        Err(BidError::ListingNotFound) => Err(AppError::listing_not_found()),
        Err(BidError::Store(e)) => Err(AppError::Store(e)),
        // 재시도 중에도 더 높은 입찰이 계속 들어온 경우
        Err(BidError::MaxRetriesExceeded(_)) => {
            Ok(Flash::error(BidRejection::NotAboveCurrentBid.to_string()))
        }
        Err(e @ (BidError::InvalidAmount(_) | BidError::Rejected(_))) => {
            Ok(Flash::error(e.to_string()))
        }
    }
}

// endregion: --- Bid Handlers

// region:    --- Watchlist Handlers

fn watchlist_flash(result: Result<(), WatchlistError>, success: &str) -> AppResult<Flash> {
    match result {
        Ok(()) => Ok(Flash::success(success)),
        Err(e @ (WatchlistError::AlreadyWatching | WatchlistError::NotWatching)) => {
            Ok(Flash::error(e.to_string()))
        }
        Err(WatchlistError::ListingNotFound) => Err(AppError::listing_not_found()),
        Err(WatchlistError::Store(e)) => Err(AppError::Store(e)),
    }
}

/// 관심 목록 추가
pub async fn watch(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    jar: CookieJar,
    Path(listing_id): Path<i64>,
) -> AppResult<Response> {
    let result =
        watchlist_commands::add_to_watchlist(state.store.as_ref(), user.id, listing_id).await;
    let flash = watchlist_flash(result, "Listing added to your watchlist.")?;
    Ok(redirect_with(jar, flash, &listing_url(listing_id)))
}

/// 관심 목록 제거
pub async fn unwatch(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    jar: CookieJar,
    Path(listing_id): Path<i64>,
) -> AppResult<Response> {
    let result =
        watchlist_commands::remove_from_watchlist(state.store.as_ref(), user.id, listing_id).await;
    let flash = watchlist_flash(result, "Listing removed from your watchlist.")?;
    Ok(redirect_with(jar, flash, &listing_url(listing_id)))
}

/// 관심 목록 추가/제거는 POST 전용 (로그인 확인이 먼저)
pub async fn method_not_allowed(CurrentUser(_): CurrentUser) -> AppError {
    AppError::MethodNotAllowed
}

// endregion: --- Watchlist Handlers

// region:    --- Account Handlers

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

pub async fn login_form(MaybeUser(user): MaybeUser, jar: CookieJar) -> Page {
    render(jar, user.as_ref(), |ctx| views::login_page(ctx, None))
}

/// 로그인
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> AppResult<Response> {
    let credentials = state.store.find_credentials(form.username.trim()).await?;
    let verified = match &credentials {
        Some(c) => match password::verify_password(&form.password, &c.password_hash) {
            Ok(()) => true,
            Err(PasswordError::Mismatch) => false,
            Err(e) => return Err(e.into()),
        },
        None => false,
    };

    match credentials {
        Some(c) if verified => {
            let jar = session::start_session(
                state.store.as_ref(),
                &state.config.session,
                jar,
                c.id,
                &c.username,
            )
            .await?;
            Ok((jar, Redirect::to("/")).into_response())
        }
        _ => {
            info!("{:<12} --> 로그인 실패: {}", "Account", form.username);
            Ok(render(jar, None, |ctx| {
                views::login_page(ctx, Some("Invalid username and/or password."))
            })
            .into_response())
        }
    }
}

/// 로그아웃
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> AppResult<Response> {
    let jar = session::end_session(state.store.as_ref(), jar).await?;
    Ok((jar, Redirect::to("/")).into_response())
}

pub async fn register_form(MaybeUser(user): MaybeUser, jar: CookieJar) -> Page {
    render(jar, user.as_ref(), |ctx| views::register_page(ctx, None))
}

/// 회원 가입 후 바로 로그인
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<RegisterForm>,
) -> AppResult<Response> {
    let valid = match form.validate() {
        Ok(valid) => valid,
        Err(message) => {
            return Ok(
                render(jar, None, |ctx| views::register_page(ctx, Some(message))).into_response(),
            );
        }
    };

    let password_hash = password::hash_password(&valid.password)?;
    let created = state
        .store
        .create_user(NewUser {
            username: valid.username,
            email: valid.email,
            password_hash,
        })
        .await;
    let user = match created {
        Ok(user) => user,
        Err(StoreError::Conflict(_)) => {
            return Ok(render(jar, None, |ctx| {
                views::register_page(ctx, Some("Username already taken."))
            })
            .into_response());
        }
        Err(e) => return Err(e.into()),
    };
    info!("{:<12} --> 회원 가입: {}", "Account", user.username);

    let jar = session::start_session(
        state.store.as_ref(),
        &state.config.session,
        jar,
        user.id,
        &user.username,
    )
    .await?;
    Ok((jar, Redirect::to("/")).into_response())
}

// endregion: --- Account Handlers

pub async fn health() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auction::money::MoneyError;
    use crate::flash::FlashLevel;

    #[test]
    fn exhausted_retries_read_as_outbid() {
        let flash = bid_flash(Err(BidError::MaxRetriesExceeded(3))).unwrap();
        assert_eq!(flash.level, FlashLevel::Error);
        assert_eq!(flash.message, "Your bid must be higher than the current bid.");
    }

    #[test]
    fn rejections_and_bad_amounts_become_error_flashes() {
        let flash = bid_flash(Err(BidError::Rejected(BidRejection::OwnListing))).unwrap();
        assert_eq!(flash, Flash::error("You cannot bid on your own listing."));

        let flash = bid_flash(Err(BidError::InvalidAmount(MoneyError::Invalid))).unwrap();
        assert_eq!(flash, Flash::error("Please enter a valid bid amount."));
    }

    #[test]
    fn missing_listing_is_a_not_found_page() {
        let err = bid_flash(Err(BidError::ListingNotFound)).unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
