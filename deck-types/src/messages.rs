//! Request and response bodies for the people API.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::SwipeError;

/// One page of a paginated listing.
///
/// Serialized as `{data, page, limit, total, hasMore}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Items on this page.
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    /// 1-based page number.
    pub page: u32,
    /// Requested page size.
    pub limit: u32,
    /// Total number of items across all pages.
    #[serde(default)]
    pub total: u64,
    /// Whether a further page exists.
    #[serde(rename = "hasMore", default)]
    pub has_more: bool,
}

impl<T> Page<T> {
    /// Build a page, deriving `has_more` from the totals.
    pub fn new(data: Vec<T>, page: u32, limit: u32, total: u64) -> Self {
        let has_more = u64::from(page) * u64::from(limit) < total;
        Self {
            data,
            page,
            limit,
            total,
            has_more,
        }
    }

    /// An empty page.
    pub fn empty(page: u32, limit: u32) -> Self {
        Self::new(Vec::new(), page, limit, 0)
    }

    /// The page number to request next, if any.
    pub fn next_page(&self) -> Option<u32> {
        self.has_more.then(|| self.page.saturating_add(1))
    }
}

/// The two swipe decisions a device can record for a person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwipeAction {
    /// Swipe right.
    Like,
    /// Swipe left.
    Dislike,
}

impl SwipeAction {
    /// Lowercase wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Like => "like",
            Self::Dislike => "dislike",
        }
    }
}

impl fmt::Display for SwipeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SwipeAction {
    type Err = SwipeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "like" => Ok(Self::Like),
            "dislike" => Ok(Self::Dislike),
            other => Err(SwipeError::UnknownAction(other.to_string())),
        }
    }
}

/// Response to `POST /people/{id}/like`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeResponse {
    /// Whether the like was recorded.
    pub success: bool,
    /// Human-readable outcome.
    #[serde(default)]
    pub message: String,
    /// Mutual match flag. Always `false`: devices are not mapped to people.
    #[serde(rename = "match", default, skip_serializing_if = "Option::is_none")]
    pub is_match: Option<bool>,
    /// Number of devices currently liking the person.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub like_count: Option<u64>,
}

/// Response to `POST /people/{id}/dislike`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DislikeResponse {
    /// Whether the dislike was recorded.
    pub success: bool,
    /// Human-readable outcome.
    #[serde(default)]
    pub message: String,
}

/// Error body returned with non-2xx statuses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Always `false`.
    pub success: bool,
    /// What went wrong.
    pub message: String,
}

impl ErrorBody {
    /// Build a failure body.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_has_more_from_totals() {
        let page: Page<u8> = Page::new(vec![1, 2], 1, 2, 5);
        assert!(page.has_more);
        assert_eq!(page.next_page(), Some(2));

        let last: Page<u8> = Page::new(vec![5], 3, 2, 5);
        assert!(!last.has_more);
        assert_eq!(last.next_page(), None);
    }

    #[test]
    fn page_uses_camel_case_has_more() {
        let page: Page<u8> = Page::new(vec![], 1, 10, 11);
        let json = serde_json::to_string(&page).unwrap();
        assert!(json.contains("\"hasMore\":true"));
        assert!(!json.contains("has_more"));
    }

    #[test]
    fn page_tolerates_missing_fields() {
        let page: Page<u8> = serde_json::from_str(r#"{"page":2,"limit":10}"#).unwrap();
        assert!(page.data.is_empty());
        assert!(!page.has_more);
        assert_eq!(page.total, 0);
    }

    #[test]
    fn swipe_action_parses() {
        assert_eq!("like".parse::<SwipeAction>().unwrap(), SwipeAction::Like);
        assert_eq!(
            "dislike".parse::<SwipeAction>().unwrap(),
            SwipeAction::Dislike
        );
        assert!("LIKE".parse::<SwipeAction>().is_err());
    }

    #[test]
    fn like_response_uses_match_key() {
        let resp = LikeResponse {
            success: true,
            message: "Person liked successfully".into(),
            is_match: Some(false),
            like_count: Some(3),
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("\"match\":false"));
        assert!(json.contains("\"like_count\":3"));
    }

    #[test]
    fn rejected_like_omits_optional_fields() {
        let resp: LikeResponse =
            serde_json::from_str(r#"{"success":false,"message":"Already liked this person"}"#)
                .unwrap();
        assert!(!resp.success);
        assert_eq!(resp.is_match, None);
        assert_eq!(resp.like_count, None);
        let json = serde_json::to_string(&resp).unwrap();
        assert!(!json.contains("match"));
    }
}
