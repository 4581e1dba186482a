/// HTML 페이지 렌더링
use crate::auction::category::{Category, CategoryCode};
use crate::auction::model::{Bid, Comment, Listing, User};
use crate::flash::Flash;
use crate::listing::form::{EditListingForm, FieldErrors, ListingForm};
use axum::response::Html;
use std::fmt::Write;

/// 페이지 공통 정보 (로그인 사용자, 플래시 메시지)
#[derive(Debug, Default, Clone, Copy)]
pub struct PageContext<'a> {
    pub user: Option<&'a User>,
    pub flash: Option<&'a Flash>,
}

/// 물품 상세 페이지 데이터
pub struct ListingView<'a> {
    pub listing: &'a Listing,
    pub watching: bool,
    pub comments: &'a [Comment],
    pub winner: Option<&'a Bid>,
}

pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

// region:    --- Layout
pub fn layout(title: &str, ctx: &PageContext<'_>, body: &str) -> Html<String> {
    let mut nav = String::from(
        r#"<a href="/">Active Listings</a> <a href="/categories">Categories</a> <a href="/closed">Closed Listings</a>"#,
    );
    match ctx.user {
        Some(user) => {
            let _ = write!(
                nav,
                r#" <a href="/create">Create Listing</a> <a href="/watchlist">Watchlist</a> <span class="user">Signed in as <strong>{}</strong>.</span> <a href="/logout">Log Out</a>"#,
                escape(&user.username)
            );
        }
        None => {
            nav.push_str(r#" <span class="user">Not signed in.</span> <a href="/login">Log In</a> <a href="/register">Register</a>"#);
        }
    }

    let flash = ctx
        .flash
        .map(|f| {
            format!(
                r#"<div class="alert alert-{}">{}</div>"#,
                f.level.as_str(),
                escape(&f.message)
            )
        })
        .unwrap_or_default();

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title} | Auctions</title>
</head>
<body>
<h1>Auctions</h1>
<nav>{nav}</nav>
<hr>
{flash}
{body}
</body>
</html>"#,
        title = escape(title),
    ))
}

pub fn error_page(code: u16, message: &str) -> Html<String> {
    let body = format!(
        r#"<h2>Error {}</h2><p class="error-message">{}</p><a href="/">Back to Active Listings</a>"#,
        code,
        escape(message)
    );
    layout("Error", &PageContext::default(), &body)
}

// endregion: --- Layout

// region:    --- Listing Pages
fn listing_card(listing: &Listing) -> String {
    format!(
        r#"<div class="listing">
<a href="/listings/{id}"><img src="{image}" alt="{title}" width="200"></a>
<h3><a href="/listings/{id}">{title}</a></h3>
<p>{description}</p>
<p><strong>Current bid:</strong> ${current}</p>
<p class="meta">Listed by {seller} on {date}{closed}</p>
</div>"#,
        id = listing.id,
        image = escape(&listing.image_url),
        title = escape(&listing.title),
        description = escape(&listing.description),
        current = listing.current_bid,
        seller = escape(&listing.seller_username),
        date = listing.creation_date.format("%Y-%m-%d %H:%M"),
        closed = if listing.closed { " (closed)" } else { "" },
    )
}

pub fn listings_page(ctx: &PageContext<'_>, heading: &str, listings: &[Listing]) -> Html<String> {
    let mut body = format!("<h2>{}</h2>", escape(heading));
    if listings.is_empty() {
        body.push_str("<p>No listings.</p>");
    }
    for listing in listings {
        body.push_str(&listing_card(listing));
    }
    layout(heading, ctx, &body)
}

pub fn categories_page(ctx: &PageContext<'_>, categories: &[Category]) -> Html<String> {
    let mut body = String::from("<h2>Categories</h2><ul>");
    for category in categories {
        let _ = write!(
            body,
            r#"<li><a href="/categories/{}">{}</a></li>"#,
            category.id,
            escape(category.display_name())
        );
    }
    body.push_str("</ul>");
    layout("Categories", ctx, &body)
}

pub fn listing_page(ctx: &PageContext<'_>, view: &ListingView<'_>) -> Html<String> {
    let listing = view.listing;
    let mut body = format!(
        r#"<h2>Listing: {title}</h2>
<img src="{image}" alt="{title}" width="400">
<p>{description}</p>
<h3>${current}</h3>
<p>{bid_count} bid(s) so far. Starting bid: ${starting}</p>
<ul class="details">
<li>Listed by: {seller}</li>
<li>Category: {category}</li>
<li>Created: {created}</li>
</ul>"#,
        title = escape(&listing.title),
        image = escape(&listing.image_url),
        description = escape(&listing.description),
        current = listing.current_bid,
        starting = listing.starting_bid,
        bid_count = listing.bid_count,
        seller = escape(&listing.seller_username),
        category = escape(
            CategoryCode::from_code(&listing.category_code)
                .map(|c| c.display_name())
                .unwrap_or(listing.category_code.as_str())
        ),
        created = listing.creation_date.format("%Y-%m-%d %H:%M"),
    );

    if listing.closed {
        body.push_str(r#"<p class="closed">This listing is closed.</p>"#);
        match view.winner {
            Some(winner) if ctx.user.is_some_and(|u| u.id == winner.bidder_id) => {
                body.push_str(r#"<p class="winner">You won this auction!</p>"#);
            }
            Some(winner) => {
                let _ = write!(
                    body,
                    r#"<p class="winner">Won by {} for ${}.</p>"#,
                    escape(&winner.bidder_username),
                    winner.amount
                );
            }
            None => body.push_str("<p>No bids were placed.</p>"),
        }
    }

    if let Some(user) = ctx.user {
        let id = listing.id;
        if view.watching {
            let _ = write!(
                body,
                r#"<form action="/listings/{id}/remove" method="post"><button type="submit">Remove from Watchlist</button></form>"#
            );
        } else {
            let _ = write!(
                body,
                r#"<form action="/listings/{id}/add" method="post"><button type="submit">Add to Watchlist</button></form>"#
            );
        }

        if !listing.closed {
            if listing.is_seller(user.id) {
                let _ = write!(
                    body,
                    r#"<a href="/listings/{id}/edit">Edit Listing</a>
<form action="/listings/{id}/close" method="post"><button type="submit">Close Listing</button></form>"#
                );
            } else {
                let _ = write!(
                    body,
                    r#"<form action="/listings/{id}/bid" method="post">
<input type="text" name="bid" placeholder="Bid" inputmode="decimal">
<button type="submit">Place Bid</button>
</form>"#
                );
            }
        }

        let _ = write!(
            body,
            r#"<h3>Add a Comment</h3>
<form action="/listings/{id}/comment" method="post">
<input type="text" name="title" placeholder="Title" maxlength="64">
<textarea name="content" placeholder="Comment" maxlength="255"></textarea>
<button type="submit">Comment</button>
</form>"#
        );
    }

    body.push_str("<h3>Comments</h3>");
    if view.comments.is_empty() {
        body.push_str("<p>No comments yet.</p>");
    }
    for comment in view.comments {
        let _ = write!(
            body,
            r#"<div class="comment"><h4>{}</h4><p>{}</p><p class="meta">{} on {}</p></div>"#,
            escape(&comment.title),
            escape(&comment.content),
            escape(&comment.username),
            comment.date.format("%Y-%m-%d %H:%M")
        );
    }

    layout(&listing.title, ctx, &body)
}

// endregion: --- Listing Pages

// region:    --- Forms
fn field_error(errors: Option<&FieldErrors>, field: &str) -> String {
    errors
        .and_then(|e| e.get(field))
        .map(|message| format!(r#"<span class="field-error">{}</span>"#, escape(message)))
        .unwrap_or_default()
}

fn category_select(categories: &[Category], selected: &str) -> String {
    let mut select = String::from(r#"<select name="category"><option value="">---------</option>"#);
    for category in categories {
        let id = category.id.to_string();
        let _ = write!(
            select,
            r#"<option value="{}"{}>{}</option>"#,
            id,
            if id == selected { " selected" } else { "" },
            escape(category.display_name())
        );
    }
    select.push_str("</select>");
    select
}

pub fn create_page(
    ctx: &PageContext<'_>,
    form: &ListingForm,
    errors: Option<&FieldErrors>,
    categories: &[Category],
) -> Html<String> {
    let body = format!(
        r#"<h2>Create Listing</h2>
<form action="/create" method="post">
<label>Title <input type="text" name="title" maxlength="64" value="{title}"></label>{title_error}
<label>Description <textarea name="description" maxlength="255">{description}</textarea></label>{description_error}
<label>Starting bid <input type="text" name="starting_bid" inputmode="decimal" value="{starting_bid}"></label>{starting_bid_error}
<label>Image URL <input type="url" name="image_url" maxlength="255" value="{image_url}"></label>{image_url_error}
<label>Category {category}</label>{category_error}
<button type="submit">Create</button>
</form>"#,
        title = escape(&form.title),
        description = escape(&form.description),
        starting_bid = escape(&form.starting_bid),
        image_url = escape(&form.image_url),
        category = category_select(categories, &form.category),
        title_error = field_error(errors, "title"),
        description_error = field_error(errors, "description"),
        starting_bid_error = field_error(errors, "starting_bid"),
        image_url_error = field_error(errors, "image_url"),
        category_error = field_error(errors, "category"),
    );
    layout("Create Listing", ctx, &body)
}

pub fn edit_page(
    ctx: &PageContext<'_>,
    listing_id: i64,
    form: &EditListingForm,
    errors: Option<&FieldErrors>,
    categories: &[Category],
) -> Html<String> {
    let body = format!(
        r#"<h2>Edit Listing</h2>
<form action="/listings/{listing_id}/edit" method="post">
<label>Title <input type="text" name="title" maxlength="64" value="{title}"></label>{title_error}
<label>Description <textarea name="description" maxlength="255">{description}</textarea></label>{description_error}
<label>Image URL <input type="url" name="image_url" maxlength="255" value="{image_url}"></label>{image_url_error}
<label>Category {category}</label>{category_error}
<button type="submit">Save</button>
</form>
<a href="/listings/{listing_id}">Cancel</a>"#,
        title = escape(&form.title),
        description = escape(&form.description),
        image_url = escape(&form.image_url),
        category = category_select(categories, &form.category),
        title_error = field_error(errors, "title"),
        description_error = field_error(errors, "description"),
        image_url_error = field_error(errors, "image_url"),
        category_error = field_error(errors, "category"),
    );
    layout("Edit Listing", ctx, &body)
}

pub fn login_page(ctx: &PageContext<'_>, message: Option<&str>) -> Html<String> {
    let message = message
        .map(|m| format!(r#"<div class="alert alert-error">{}</div>"#, escape(m)))
        .unwrap_or_default();
    let body = format!(
        r#"<h2>Login</h2>
{message}
<form action="/login" method="post">
<input autofocus type="text" name="username" placeholder="Username">
<input type="password" name="password" placeholder="Password">
<button type="submit">Login</button>
</form>
Don't have an account? <a href="/register">Register here.</a>"#
    );
    layout("Login", ctx, &body)
}

pub fn register_page(ctx: &PageContext<'_>, message: Option<&str>) -> Html<String> {
    let message = message
        .map(|m| format!(r#"<div class="alert alert-error">{}</div>"#, escape(m)))
        .unwrap_or_default();
    let body = format!(
        r#"<h2>Register</h2>
{message}
<form action="/register" method="post">
<input autofocus type="text" name="username" placeholder="Username">
<input type="email" name="email" placeholder="Email Address">
<input type="password" name="password" placeholder="Password">
<input type="password" name="confirmation" placeholder="Confirm Password">
<button type="submit">Register</button>
</form>
Already have an account? <a href="/login">Log In here.</a>"#
    );
    layout("Register", ctx, &body)
}

// endregion: --- Forms
