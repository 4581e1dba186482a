// region:    --- Users

/// 사용자 생성
pub const INSERT_USER: &str = r#"
    INSERT INTO users (username, email, password_hash, created_at)
    VALUES ($1, $2, $3, $4)
    RETURNING id, username, email, created_at
"#;

/// 로그인 정보 조회
pub const GET_CREDENTIALS: &str =
    "SELECT id, username, password_hash FROM users WHERE username = $1";

// endregion: --- Users

// region:    --- Sessions

/// 세션 생성
pub const INSERT_SESSION: &str =
    "INSERT INTO sessions (token, user_id, created_at, expires_at) VALUES ($1, $2, $3, $4)";

/// 세션 사용자 조회 (만료되지 않은 세션만)
pub const GET_SESSION_USER: &str = r#"
    SELECT u.id, u.username, u.email, u.created_at
    FROM sessions s
    JOIN users u ON u.id = s.user_id
    WHERE s.token = $1 AND s.expires_at > $2
"#;

/// 세션 삭제
pub const DELETE_SESSION: &str = "DELETE FROM sessions WHERE token = $1";

/// 만료된 세션 삭제
pub const DELETE_EXPIRED_SESSIONS: &str = "DELETE FROM sessions WHERE expires_at <= $1";

// endregion: --- Sessions

// region:    --- Categories

/// 모든 카테고리 조회
pub const GET_ALL_CATEGORIES: &str = "SELECT id, code FROM categories ORDER BY id";

/// 카테고리 조회
pub const GET_CATEGORY: &str = "SELECT id, code FROM categories WHERE id = $1";

/// 코드로 카테고리 조회
pub const GET_CATEGORY_BY_CODE: &str = "SELECT id, code FROM categories WHERE code = $1";

// endregion: --- Categories

// region:    --- Listings

/// 물품 생성
pub const INSERT_LISTING: &str = r#"
    INSERT INTO listings (title, description, starting_bid, current_bid, image_url, category_id, seller_id, creation_date, update_date)
    VALUES ($1, $2, $3, $3, $4, $5, $6, $7, $7)
    RETURNING id
"#;

/// 물품 조회
pub const GET_LISTING: &str = r#"
    SELECT l.id, l.title, l.description, l.starting_bid, l.current_bid, l.image_url,
           l.category_id, c.code AS category_code, l.seller_id, u.username AS seller_username,
           l.closed, l.bid_count, l.creation_date, l.update_date
    FROM listings l
    JOIN categories c ON c.id = l.category_id
    JOIN users u ON u.id = l.seller_id
    WHERE l.id = $1
"#;

/// 진행 중인 물품 조회
pub const GET_ACTIVE_LISTINGS: &str = r#"
    SELECT l.id, l.title, l.description, l.starting_bid, l.current_bid, l.image_url,
           l.category_id, c.code AS category_code, l.seller_id, u.username AS seller_username,
           l.closed, l.bid_count, l.creation_date, l.update_date
    FROM listings l
    JOIN categories c ON c.id = l.category_id
    JOIN users u ON u.id = l.seller_id
    WHERE l.closed = FALSE
    ORDER BY l.creation_date DESC, l.id DESC
"#;

/// 종료된 물품 조회
pub const GET_CLOSED_LISTINGS: &str = r#"
    SELECT l.id, l.title, l.description, l.starting_bid, l.current_bid, l.image_url,
           l.category_id, c.code AS category_code, l.seller_id, u.username AS seller_username,
           l.closed, l.bid_count, l.creation_date, l.update_date
    FROM listings l
    JOIN categories c ON c.id = l.category_id
    JOIN users u ON u.id = l.seller_id
    WHERE l.closed = TRUE
    ORDER BY l.update_date DESC, l.id DESC
"#;

/// 카테고리별 진행 중인 물품 조회
pub const GET_CATEGORY_LISTINGS: &str = r#"
    SELECT l.id, l.title, l.description, l.starting_bid, l.current_bid, l.image_url,
           l.category_id, c.code AS category_code, l.seller_id, u.username AS seller_username,
           l.closed, l.bid_count, l.creation_date, l.update_date
    FROM listings l
    JOIN categories c ON c.id = l.category_id
    JOIN users u ON u.id = l.seller_id
    WHERE l.closed = FALSE AND l.category_id = $1
    ORDER BY l.creation_date DESC, l.id DESC
"#;

/// 관심 목록 물품 조회
pub const GET_WATCHED_LISTINGS: &str = r#"
    SELECT l.id, l.title, l.description, l.starting_bid, l.current_bid, l.image_url,
           l.category_id, c.code AS category_code, l.seller_id, u.username AS seller_username,
           l.closed, l.bid_count, l.creation_date, l.update_date
    FROM watchlists w
    JOIN watchlist_listings wl ON wl.watchlist_id = w.id
    JOIN listings l ON l.id = wl.listing_id
    JOIN categories c ON c.id = l.category_id
    JOIN users u ON u.id = l.seller_id
    WHERE w.user_id = $1
    ORDER BY wl.added_at DESC, l.id DESC
"#;

/// 물품 수정 (진행 중인 물품만)
pub const UPDATE_LISTING: &str = r#"
    UPDATE listings
    SET title = $1, description = $2, image_url = $3, category_id = $4, update_date = $5
    WHERE id = $6 AND closed = FALSE
"#;

/// 물품 종료 (판매자 본인, 진행 중인 물품만)
pub const CLOSE_LISTING: &str = r#"
    UPDATE listings SET closed = TRUE, update_date = $1
    WHERE id = $2 AND seller_id = $3 AND closed = FALSE
"#;

// endregion: --- Listings

// region:    --- Bids

/// 입찰 조건 검사 및 현재 가격 갱신
/// 동시 입찰 시 행 잠금 후 조건을 다시 평가하므로 낮은 입찰이 덮어쓰지 못한다.
pub const ACCEPT_BID: &str = r#"
    UPDATE listings
    SET current_bid = $1, bid_count = bid_count + 1, update_date = $4
    WHERE id = $2
      AND closed = FALSE
      AND seller_id <> $3
      AND $1 >= starting_bid
      AND ($1 > current_bid OR bid_count = 0)
    RETURNING id
"#;

/// 입찰 기록 추가
pub const INSERT_BID: &str = r#"
    WITH inserted AS (
        INSERT INTO bids (listing_id, bidder_id, amount, bid_date)
        VALUES ($1, $2, $3, $4)
        RETURNING id, listing_id, bidder_id, amount, bid_date
    )
    SELECT i.id, i.listing_id, i.bidder_id, u.username AS bidder_username, i.amount, i.bid_date
    FROM inserted i
    JOIN users u ON u.id = i.bidder_id
"#;

/// 입찰 이력 조회
pub const GET_LISTING_BIDS: &str = r#"
    SELECT b.id, b.listing_id, b.bidder_id, u.username AS bidder_username, b.amount, b.bid_date
    FROM bids b
    JOIN users u ON u.id = b.bidder_id
    WHERE b.listing_id = $1
    ORDER BY b.amount DESC, b.bid_date ASC
"#;

/// 최고 입찰 조회
pub const GET_HIGHEST_BID: &str = r#"
    SELECT b.id, b.listing_id, b.bidder_id, u.username AS bidder_username, b.amount, b.bid_date
    FROM bids b
    JOIN users u ON u.id = b.bidder_id
    WHERE b.listing_id = $1
    ORDER BY b.amount DESC, b.bid_date ASC
    LIMIT 1
"#;

// endregion: --- Bids

// region:    --- Comments

/// 댓글 추가
pub const INSERT_COMMENT: &str = r#"
    WITH inserted AS (
        INSERT INTO comments (listing_id, user_id, title, content, date)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, listing_id, user_id, title, content, date
    )
    SELECT i.id, i.listing_id, i.user_id, u.username, i.title, i.content, i.date
    FROM inserted i
    JOIN users u ON u.id = i.user_id
"#;

/// 댓글 조회
pub const GET_LISTING_COMMENTS: &str = r#"
    SELECT c.id, c.listing_id, c.user_id, u.username, c.title, c.content, c.date
    FROM comments c
    JOIN users u ON u.id = c.user_id
    WHERE c.listing_id = $1
    ORDER BY c.date DESC, c.id DESC
"#;

// endregion: --- Comments

// region:    --- Watchlists

/// 관심 목록 조회 또는 생성
pub const UPSERT_WATCHLIST: &str = r#"
    INSERT INTO watchlists (user_id) VALUES ($1)
    ON CONFLICT (user_id) DO UPDATE SET user_id = EXCLUDED.user_id
    RETURNING id
"#;

/// 관심 목록에 물품 추가
pub const INSERT_WATCHLIST_LISTING: &str = r#"
    INSERT INTO watchlist_listings (watchlist_id, listing_id, added_at)
    VALUES ($1, $2, $3)
    ON CONFLICT (watchlist_id, listing_id) DO NOTHING
"#;

/// 관심 목록에서 물품 제거
pub const DELETE_WATCHLIST_LISTING: &str = r#"
    DELETE FROM watchlist_listings wl
    USING watchlists w
    WHERE wl.watchlist_id = w.id AND w.user_id = $1 AND wl.listing_id = $2
"#;

/// 관심 목록 포함 여부
pub const IS_WATCHING: &str = r#"
    SELECT EXISTS (
        SELECT 1
        FROM watchlists w
        JOIN watchlist_listings wl ON wl.watchlist_id = w.id
        WHERE w.user_id = $1 AND wl.listing_id = $2
    ) AS watching
"#;

// endregion: --- Watchlists
