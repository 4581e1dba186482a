/// 카테고리 코드
/// 서버 시작 시 categories 테이블에 시드된다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoryCode {
    None,
    Fashion,
    Toys,
    Electronics,
    Pets,
    Garden,
}

impl CategoryCode {
    pub const ALL: [CategoryCode; 6] = [
        CategoryCode::None,
        CategoryCode::Fashion,
        CategoryCode::Toys,
        CategoryCode::Electronics,
        CategoryCode::Pets,
        CategoryCode::Garden,
    ];

    /// 물품 등록 시 카테고리를 선택하지 않은 경우
    pub const DEFAULT: CategoryCode = CategoryCode::None;

    pub fn code(self) -> &'static str {
        match self {
            CategoryCode::None => "NONE",
            CategoryCode::Fashion => "FASH",
            CategoryCode::Toys => "TOYS",
            CategoryCode::Electronics => "ELEC",
            CategoryCode::Pets => "PETS",
            CategoryCode::Garden => "GARD",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            CategoryCode::None => "No Category Listed",
            CategoryCode::Fashion => "Fashion",
            CategoryCode::Toys => "Toys",
            CategoryCode::Electronics => "Electronics",
            CategoryCode::Pets => "Pets",
            CategoryCode::Garden => "Garden",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        CategoryCode::ALL.into_iter().find(|c| c.code() == code)
    }
}

/// 카테고리 모델
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Category {
    pub id: i64,
    pub code: String,
}

impl Category {
    pub fn display_name(&self) -> &str {
        CategoryCode::from_code(&self.code)
            .map(CategoryCode::display_name)
            .unwrap_or(self.code.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip_through_lookup() {
        for code in CategoryCode::ALL {
            assert_eq!(CategoryCode::from_code(code.code()), Some(code));
        }
        assert_eq!(CategoryCode::from_code("ELEC"), Some(CategoryCode::Electronics));
        assert_eq!(CategoryCode::from_code("HOME"), None);
    }

    #[test]
    fn unknown_code_displays_raw_value() {
        let known = Category { id: 1, code: "PETS".to_string() };
        let unknown = Category { id: 2, code: "XXXX".to_string() };
        assert_eq!(known.display_name(), "Pets");
        assert_eq!(unknown.display_name(), "XXXX");
    }
}
