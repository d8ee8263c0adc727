//! Domain DTOs for the book API.
//!
//! # Design
//! These types mirror the backend's JSON schema but are defined independently
//! of the mock-server crate; integration tests catch any schema drift. Field
//! names follow the backend exactly: the embedded model columns are
//! PascalCase (`ID`, `CreatedAt`), everything else is camelCase.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A book record. Used both as the payload for create/update and as the
/// record returned by `findBook` and `getBookList`.
///
/// Every column except the identifier is optional on the wire; unset fields
/// are omitted from the serialized body so the backend leaves them alone on
/// update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Book {
    #[serde(rename = "ID", default, skip_serializing_if = "is_zero")]
    pub id: u64,
    #[serde(rename = "CreatedAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "UpdatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    /// Free-form content column, a JSON array of objects in practice.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<Value>,
    /// Cover image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pic: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

fn is_zero(id: &u64) -> bool {
    *id == 0
}

/// Query parameters addressing a single book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookId {
    #[serde(rename = "ID")]
    pub id: u64,
}

impl BookId {
    pub fn new(id: u64) -> Self {
        Self { id }
    }
}

/// Query parameters addressing a set of books. Goes on the wire as repeated
/// `IDs[]` entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookIds {
    #[serde(rename = "IDs")]
    pub ids: Vec<u64>,
}

impl BookIds {
    pub fn new(ids: impl IntoIterator<Item = u64>) -> Self {
        Self {
            ids: ids.into_iter().collect(),
        }
    }
}

/// Pagination descriptor and filters for `getBookList`.
///
/// Unset fields are left out of the query. Without `page_size` (or with
/// zero) the backend returns every match on one page. Range filters only
/// apply when both ends are set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookSearch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_created_at: Option<DateTime<Utc>>,
}

impl BookSearch {
    pub fn page(page: u32, page_size: u32) -> Self {
        Self {
            page: Some(page),
            page_size: Some(page_size),
            ..Self::default()
        }
    }
}

/// The backend's response envelope. `code` 0 is success, anything else
/// (7 in practice) is a business failure described by `msg`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T = Value> {
    pub code: i64,
    #[serde(default)]
    pub data: T,
    #[serde(default)]
    pub msg: String,
}

/// One page of a list query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResult<T> {
    pub list: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
}

/// Payload of the unauthenticated `getBookPublic` endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicInfo {
    pub info: String,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn new_book_omits_unset_columns() {
        let book = Book {
            title: Some("Dune".to_string()),
            ..Book::default()
        };
        assert_eq!(serde_json::to_value(&book).unwrap(), json!({"title": "Dune"}));
    }

    #[test]
    fn book_uses_backend_field_names() {
        let raw = r#"{"ID":3,"CreatedAt":"2024-05-01T10:00:00Z","UpdatedAt":"2024-05-01T10:00:00Z",
            "title":"Dune","desc":"","price":9.5,"info":[{"k":"v"}],"pic":"","type":"novel"}"#;
        let book: Book = serde_json::from_str(raw).unwrap();
        assert_eq!(book.id, 3);
        assert_eq!(book.kind.as_deref(), Some("novel"));
        assert_eq!(book.price, Some(9.5));
        assert_eq!(book.info, Some(json!([{"k": "v"}])));
        assert!(book.created_at.is_some());
    }

    #[test]
    fn book_ids_serialize_under_backend_key() {
        let ids = BookIds::new([1, 2, 3]);
        assert_eq!(serde_json::to_value(&ids).unwrap(), json!({"IDs": [1, 2, 3]}));
    }

    #[test]
    fn search_omits_unset_filters() {
        let search = BookSearch {
            title: Some("war".to_string()),
            ..BookSearch::page(2, 10)
        };
        assert_eq!(
            serde_json::to_value(&search).unwrap(),
            json!({"page": 2, "pageSize": 10, "title": "war"})
        );
    }

    #[test]
    fn default_search_sends_no_paging() {
        assert_eq!(serde_json::to_value(BookSearch::default()).unwrap(), json!({}));
    }

    #[test]
    fn envelope_tolerates_missing_data() {
        let envelope: ApiResponse = serde_json::from_str(r#"{"code":7,"msg":"failed"}"#).unwrap();
        assert_eq!(envelope.code, 7);
        assert!(envelope.data.is_null());
    }
}
