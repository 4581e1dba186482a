use super::money::Money;
use chrono::{DateTime, Utc};

/// 이미지 주소를 입력하지 않은 물품에 사용하는 기본 이미지
pub const DEFAULT_IMAGE_URL: &str =
    "https://t3.ftcdn.net/jpg/04/34/72/82/240_F_434728286_OWQQvAFoXZLdGHlObozsolNeuSxhpr84.jpg";

// 사용자 모델
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

// 로그인 검증용 (비밀번호 해시 포함)
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Credentials {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

// 경매 물품 모델 (판매자 이름, 카테고리 코드 포함)
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Listing {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub starting_bid: Money,
    pub current_bid: Money,
    pub image_url: String,
    pub category_id: i64,
    pub category_code: String,
    pub seller_id: i64,
    pub seller_username: String,
    pub closed: bool,
    pub bid_count: i64,
    pub creation_date: DateTime<Utc>,
    pub update_date: DateTime<Utc>,
}

impl Listing {
    pub fn has_bids(&self) -> bool {
        self.bid_count > 0
    }

    pub fn is_seller(&self, user_id: i64) -> bool {
        self.seller_id == user_id
    }
}

#[derive(Debug, Clone)]
pub struct NewListing {
    pub title: String,
    pub description: String,
    pub starting_bid: Money,
    pub image_url: String,
    pub category_id: i64,
    pub seller_id: i64,
}

/// 판매자가 수정할 수 있는 필드
#[derive(Debug, Clone)]
pub struct ListingUpdate {
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub category_id: i64,
}

/// 물품 목록 조회 조건
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingFilter {
    Active,
    Closed,
    Category(i64),
    WatchedBy(i64),
}

// 입찰 모델
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Bid {
    pub id: i64,
    pub listing_id: i64,
    pub bidder_id: i64,
    pub bidder_username: String,
    pub amount: Money,
    pub bid_date: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewBid {
    pub listing_id: i64,
    pub bidder_id: i64,
    pub amount: Money,
    pub bid_date: DateTime<Utc>,
}

// 댓글 모델
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Comment {
    pub id: i64,
    pub listing_id: i64,
    pub user_id: i64,
    pub username: String,
    pub title: String,
    pub content: String,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub listing_id: i64,
    pub user_id: i64,
    pub title: String,
    pub content: String,
}
