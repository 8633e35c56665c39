//! Types shared by every sorted/paginated listing.
//!
//! A listing is described by an optional [`SortOrder`] and an optional
//! [`PageRequest`]. Sort fields are validated against [`Sortable::SORT_FIELDS`]
//! before they reach a store, so stores can splice the resolved field into
//! their queries.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A record with a stable, unique identifier.
pub trait Entity {
    fn id(&self) -> i64;
}

/// An entity that can be listed in a requested order.
pub trait Sortable: Entity {
    /// Fields a client may sort by. Each is also the storage column name.
    const SORT_FIELDS: &'static [&'static str];

    fn sort_field(field: &str) -> Option<&'static str> {
        Self::SORT_FIELDS
            .iter()
            .copied()
            .find(|candidate| *candidate == field)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    #[must_use]
    pub const fn reverse(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

impl std::str::FromStr for SortDirection {
    type Err = SortError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(Self::Asc),
            "desc" | "descending" => Ok(Self::Desc),
            _ => Err(SortError::UnknownDirection(value.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SortError {
    #[error("unknown sort field: {0}")]
    UnknownField(String),
    #[error("unknown sort direction: {0}")]
    UnknownDirection(String),
}

/// A validated sort request. Ties on `field` are broken by id in the same
/// direction, so a descending listing is the exact reverse of the ascending one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder {
    field: &'static str,
    direction: SortDirection,
}

impl SortOrder {
    pub fn parse<T: Sortable>(field: &str, direction: &str) -> Result<Self, SortError> {
        let field =
            T::sort_field(field).ok_or_else(|| SortError::UnknownField(field.to_string()))?;
        let direction = direction.parse()?;
        Ok(Self { field, direction })
    }

    /// Default listing order: ascending id.
    #[must_use]
    pub const fn by_id() -> Self {
        Self {
            field: "id",
            direction: SortDirection::Asc,
        }
    }

    #[must_use]
    pub const fn field(&self) -> &'static str {
        self.field
    }

    #[must_use]
    pub const fn direction(&self) -> SortDirection {
        self.direction
    }

    /// `ORDER BY` body for SQL stores.
    #[must_use]
    pub fn to_sql(&self) -> String {
        let direction = self.direction.as_sql();
        if self.field == "id" {
            format!("id {direction}")
        } else {
            format!("{} {direction}, id {direction}", self.field)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
}

impl PageRequest {
    pub fn new(page: u32, size: u32) -> Result<Self, PageError> {
        if size == 0 {
            return Err(PageError::ZeroSize);
        }
        Ok(Self { page, size })
    }

    #[must_use]
    pub fn offset(&self) -> i64 {
        i64::from(self.page) * i64::from(self.size)
    }

    /// Window that fetches one row past the page, to detect a following page.
    #[must_use]
    pub fn probe_window(&self) -> Window {
        Window {
            offset: self.offset(),
            limit: i64::from(self.size) + 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PageError {
    #[error("page size must be positive")]
    ZeroSize,
}

/// Row window passed to stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub offset: i64,
    pub limit: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub size: u32,
    pub has_next: bool,
}

impl<T> Page<T> {
    /// Builds a page from rows fetched with [`PageRequest::probe_window`].
    #[must_use]
    pub fn from_probe(mut rows: Vec<T>, request: PageRequest) -> Self {
        let size = request.size as usize;
        let has_next = rows.len() > size;
        rows.truncate(size);
        Self {
            items: rows,
            page: request.page,
            size: request.size,
            has_next,
        }
    }

    #[must_use]
    pub fn has_prev(&self) -> bool {
        self.page > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Widget;

    impl Entity for Widget {
        fn id(&self) -> i64 {
            0
        }
    }

    impl Sortable for Widget {
        const SORT_FIELDS: &'static [&'static str] = &["id", "name"];
    }

    #[test]
    fn parses_directions_case_insensitively() {
        assert_eq!("ASC".parse::<SortDirection>(), Ok(SortDirection::Asc));
        assert_eq!("desc".parse::<SortDirection>(), Ok(SortDirection::Desc));
        assert_eq!(
            "Descending".parse::<SortDirection>(),
            Ok(SortDirection::Desc)
        );
        assert!("sideways".parse::<SortDirection>().is_err());
    }

    #[test]
    fn sort_order_rejects_unknown_field() {
        let err = SortOrder::parse::<Widget>("bogus_field", "asc").expect_err("must fail");
        assert_eq!(err, SortError::UnknownField("bogus_field".to_string()));
    }

    #[test]
    fn sort_order_breaks_ties_by_id_in_same_direction() {
        let order = SortOrder::parse::<Widget>("name", "desc").expect("valid");
        assert_eq!(order.to_sql(), "name DESC, id DESC");
        let order = SortOrder::parse::<Widget>("id", "asc").expect("valid");
        assert_eq!(order.to_sql(), "id ASC");
    }

    #[test]
    fn page_request_rejects_zero_size() {
        assert_eq!(PageRequest::new(0, 0), Err(PageError::ZeroSize));
    }

    #[test]
    fn probe_window_fetches_one_extra_row() {
        let request = PageRequest::new(2, 5).expect("valid");
        assert_eq!(
            request.probe_window(),
            Window {
                offset: 10,
                limit: 6
            }
        );
    }

    #[test]
    fn page_from_probe_detects_next_page() {
        let request = PageRequest::new(0, 3).expect("valid");
        let exact = Page::from_probe(vec![1, 2, 3], request);
        assert_eq!(exact.items, vec![1, 2, 3]);
        assert!(!exact.has_next);

        let overflow = Page::from_probe(vec![1, 2, 3, 4], request);
        assert_eq!(overflow.items, vec![1, 2, 3]);
        assert!(overflow.has_next);
        assert!(!overflow.has_prev());
    }
}
