/// 입찰 관련 커맨드 처리
/// 1. 입찰 조건 검사
/// 2. 입찰
// region:    --- Imports
use crate::auction::model::{Bid, Listing, NewBid};
use crate::auction::money::{Money, MoneyError};
use crate::store::{MarketStore, StoreError};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

// endregion: --- Imports

// region:    --- Bid Rules
/// 입찰 거절 사유
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BidRejection {
    #[error("This listing is closed.")]
    ListingClosed,

    #[error("You cannot bid on your own listing.")]
    OwnListing,

    #[error("Your bid must be at least the starting bid.")]
    BelowStartingBid,

    #[error("Your bid must be higher than the current bid.")]
    NotAboveCurrentBid,
}

/// 1. 입찰 조건 검사
/// 첫 입찰은 시작가 이상, 이후 입찰은 현재 최고가 초과
pub fn evaluate_bid(listing: &Listing, bidder_id: i64, amount: Money) -> Result<(), BidRejection> {
    if listing.closed {
        return Err(BidRejection::ListingClosed);
    }
    if listing.is_seller(bidder_id) {
        return Err(BidRejection::OwnListing);
    }
    if amount < listing.starting_bid {
        return Err(BidRejection::BelowStartingBid);
    }
    if listing.has_bids() && amount <= listing.current_bid {
        return Err(BidRejection::NotAboveCurrentBid);
    }
    Ok(())
}

// endregion: --- Bid Rules

// region:    --- Commands
/// 입찰 명령
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PlaceBidCommand {
    pub listing_id: i64,
    pub bidder_id: i64,
    pub amount: Money,
}

#[derive(Debug, Error)]
pub enum BidError {
    #[error("The listing does not exist.")]
    ListingNotFound,

    #[error("Please enter a valid bid amount.")]
    InvalidAmount(#[from] MoneyError),

    #[error("{0}")]
    Rejected(#[from] BidRejection),

    #[error("the bid could not be stored after {0} attempts")]
    MaxRetriesExceeded(u32),

    #[error(transparent)]
    Store(#[from] StoreError),
}

// 최대 재시도 횟수
const MAX_RETRIES: u32 = 3;

/// 2. 입찰
/// 저장소가 조건을 원자적으로 다시 검사하므로, 그 사이 다른 입찰이 들어오면 최신 상태로 다시 평가한다.
pub async fn handle_place_bid(
    cmd: PlaceBidCommand,
    store: &dyn MarketStore,
) -> Result<Bid, BidError> {
    info!("{:<12} --> 입찰 요청 처리 시작: {:?}", "Command", cmd);
    let mut retries = 0;

    while retries < MAX_RETRIES {
        // 물품 정보 조회
        let listing = store
            .find_listing(cmd.listing_id)
            .await?
            .ok_or(BidError::ListingNotFound)?;

        // 입찰 조건 검사
        if let Err(rejection) = evaluate_bid(&listing, cmd.bidder_id, cmd.amount) {
            info!(
                "{:<12} --> 입찰 거절: listing={}, amount={}, reason={:?}",
                "Command", cmd.listing_id, cmd.amount, rejection
            );
            return Err(rejection.into());
        }

        let new_bid = NewBid {
            listing_id: cmd.listing_id,
            bidder_id: cmd.bidder_id,
            amount: cmd.amount,
            bid_date: Utc::now(),
        };

        match store.place_bid(new_bid).await? {
            Some(bid) => {
                info!(
                    "{:<12} --> 입찰 성공: listing={}, 현재 가격 {}",
                    "Command", bid.listing_id, bid.amount
                );
                return Ok(bid);
            }
            None => {
                warn!(
                    "{:<12} --> 동시 입찰로 인한 조건 변경: 재시도",
                    "Command"
                );
                retries += 1;
            }
        }
    }

    Err(BidError::MaxRetriesExceeded(MAX_RETRIES))
}

// endregion: --- Commands
