use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE: usize = 1;
pub const DEFAULT_LIMIT: usize = 50;
pub const MAX_LIMIT: usize = 1000;

/// A contact record as held by the contact source. Read-only here; any
/// field may be missing from the upstream payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: Option<String>,
    pub email: Option<String>,
    pub created_at: Option<String>,
}

impl Contact {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            id: None,
            email: Some(email.into()),
            created_at: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_created_at(mut self, created_at: impl Into<String>) -> Self {
        self.created_at = Some(created_at.into());
        self
    }
}

/// Field the contact list is ordered by.
///
/// Both fields compare as plain strings. `CreatedAt` therefore orders
/// chronologically only while the source emits fixed-width ISO-8601
/// timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    Email,
    #[default]
    CreatedAt,
}

impl SortField {
    /// Accepts the dashboard's `createdAt` and the upstream `created_at`.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "email" => Some(SortField::Email),
            "createdAt" | "created_at" => Some(SortField::CreatedAt),
            _ => None,
        }
    }

    pub fn key<'a>(&self, contact: &'a Contact) -> &'a str {
        match self {
            SortField::Email => contact.email.as_deref().unwrap_or(""),
            SortField::CreatedAt => contact.created_at.as_deref().unwrap_or(""),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Some(SortOrder::Asc),
            "desc" => Some(SortOrder::Desc),
            _ => None,
        }
    }
}

/// Request-scoped list parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub search: String,
    pub page: usize,
    pub limit: usize,
    pub sort_by: SortField,
    pub sort_order: SortOrder,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            sort_by: SortField::default(),
            sort_order: SortOrder::default(),
        }
    }
}

impl ListQuery {
    /// Clamp `page` to at least 1 and `limit` into `1..=MAX_LIMIT`.
    pub fn normalized(mut self) -> Self {
        self.page = self.page.max(1);
        self.limit = self.limit.clamp(1, MAX_LIMIT);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: usize,
    pub limit: usize,
    pub total: usize,
    pub total_pages: usize,
}

impl Pagination {
    /// Shape returned alongside degraded or failed list responses.
    pub fn empty() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            total: 0,
            total_pages: 0,
        }
    }
}

/// A contact as the dashboard displays it. Defaults for missing fields are
/// cosmetic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactView {
    pub email: String,
    pub created_at: String,
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactPage {
    pub data: Vec<ContactView>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaitlistStats {
    pub total: usize,
    pub today: usize,
    pub this_week: usize,
    pub this_month: usize,
}
