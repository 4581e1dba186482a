/// 물품 등록/수정, 댓글 폼 검증
use crate::auction::model::DEFAULT_IMAGE_URL;
use crate::auction::money::Money;
use serde::Deserialize;

pub const TITLE_MAX_CHARS: usize = 64;
pub const TEXT_MAX_CHARS: usize = 255;
pub const URL_MAX_CHARS: usize = 255;

/// 필드별 오류 메시지
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(Vec<(&'static str, String)>);

impl FieldErrors {
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push((field, message.into()));
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, message)| message.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// region:    --- Field Validation
fn required_text(
    errors: &mut FieldErrors,
    field: &'static str,
    value: &str,
    max_chars: usize,
) -> String {
    let value = value.trim();
    if value.is_empty() {
        errors.add(field, "This field is required.");
    } else if value.chars().count() > max_chars {
        errors.add(
            field,
            format!("Ensure this value has at most {} characters.", max_chars),
        );
    }
    value.to_string()
}

fn image_url(errors: &mut FieldErrors, value: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        return DEFAULT_IMAGE_URL.to_string();
    }
    if value.chars().count() > URL_MAX_CHARS {
        errors.add(
            "image_url",
            format!("Ensure this value has at most {} characters.", URL_MAX_CHARS),
        );
    } else if !(value.starts_with("http://") || value.starts_with("https://"))
        || value.contains(char::is_whitespace)
    {
        errors.add("image_url", "Enter a valid URL.");
    }
    value.to_string()
}

fn category_id(errors: &mut FieldErrors, value: &str) -> Option<i64> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    match value.parse() {
        Ok(id) => Some(id),
        Err(_) => {
            errors.add("category", "Select a valid choice.");
            None
        }
    }
}

// endregion: --- Field Validation

// region:    --- Listing Form
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListingForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub starting_bid: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub category: String,
}

/// 검증된 물품 등록 입력 (카테고리 미선택 시 `None`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidListing {
    pub title: String,
    pub description: String,
    pub starting_bid: Money,
    pub image_url: String,
    pub category_id: Option<i64>,
}

impl ListingForm {
    pub fn validate(&self) -> Result<ValidListing, FieldErrors> {
        let mut errors = FieldErrors::default();
        let title = required_text(&mut errors, "title", &self.title, TITLE_MAX_CHARS);
        let description =
            required_text(&mut errors, "description", &self.description, TEXT_MAX_CHARS);
        let starting_bid = match Money::parse(&self.starting_bid) {
            Ok(amount) => amount,
            Err(e) => {
                errors.add("starting_bid", format!("Enter a valid amount: {}.", e));
                Money::ZERO
            }
        };
        let image_url = image_url(&mut errors, &self.image_url);
        let category_id = category_id(&mut errors, &self.category);

        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(ValidListing {
            title,
            description,
            starting_bid,
            image_url,
            category_id,
        })
    }
}

// endregion: --- Listing Form

// region:    --- Edit Form
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EditListingForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidEdit {
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub category_id: Option<i64>,
}

impl EditListingForm {
    pub fn validate(&self) -> Result<ValidEdit, FieldErrors> {
        let mut errors = FieldErrors::default();
        let title = required_text(&mut errors, "title", &self.title, TITLE_MAX_CHARS);
        let description =
            required_text(&mut errors, "description", &self.description, TEXT_MAX_CHARS);
        let image_url = image_url(&mut errors, &self.image_url);
        let category_id = category_id(&mut errors, &self.category);

        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(ValidEdit {
            title,
            description,
            image_url,
            category_id,
        })
    }
}

// endregion: --- Edit Form

// region:    --- Comment Form
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommentForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

impl CommentForm {
    pub fn validate(&self) -> Result<(String, String), FieldErrors> {
        let mut errors = FieldErrors::default();
        let title = required_text(&mut errors, "title", &self.title, TITLE_MAX_CHARS);
        let content = required_text(&mut errors, "content", &self.content, TEXT_MAX_CHARS);
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok((title, content))
    }
}

// endregion: --- Comment Form
