//! Stateless request builder and response decoder for the book API.
//!
//! # Design
//! `BookClient` carries no state at all. Each endpoint is split into a
//! `build_*` method that produces a `RequestDescriptor` and a `parse_*`
//! method that decodes an `HttpResponse`. Builders pass the caller's value
//! through as-is: no validation, no defaults. Whoever executes the
//! descriptor owns base-URL resolution, auth and the network round trip.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpResponse, RequestDescriptor};
use crate::types::{ApiResponse, Book, BookId, BookIds, BookSearch, PageResult, PublicInfo};

pub const CREATE_BOOK: &str = "/book/createBook";
pub const DELETE_BOOK: &str = "/book/deleteBook";
pub const DELETE_BOOK_BY_IDS: &str = "/book/deleteBookByIds";
pub const UPDATE_BOOK: &str = "/book/updateBook";
pub const FIND_BOOK: &str = "/book/findBook";
pub const GET_BOOK_LIST: &str = "/book/getBookList";
pub const GET_BOOK_PUBLIC: &str = "/book/getBookPublic";

/// Builds descriptors for, and decodes responses from, the book endpoints.
#[derive(Debug, Clone, Copy, Default)]
pub struct BookClient;

impl BookClient {
    pub fn new() -> Self {
        Self
    }

    pub fn build_create_book(&self, book: &Book) -> Result<RequestDescriptor, ApiError> {
        Ok(with_data(CREATE_BOOK, HttpMethod::Post, to_json(book)?))
    }

    pub fn build_delete_book(&self, id: &BookId) -> Result<RequestDescriptor, ApiError> {
        Ok(with_params(DELETE_BOOK, HttpMethod::Delete, to_json(id)?))
    }

    pub fn build_delete_book_by_ids(&self, ids: &BookIds) -> Result<RequestDescriptor, ApiError> {
        Ok(with_params(DELETE_BOOK_BY_IDS, HttpMethod::Delete, to_json(ids)?))
    }

    pub fn build_update_book(&self, book: &Book) -> Result<RequestDescriptor, ApiError> {
        Ok(with_data(UPDATE_BOOK, HttpMethod::Put, to_json(book)?))
    }

    pub fn build_find_book(&self, id: &BookId) -> Result<RequestDescriptor, ApiError> {
        Ok(with_params(FIND_BOOK, HttpMethod::Get, to_json(id)?))
    }

    pub fn build_get_book_list(&self, search: &BookSearch) -> Result<RequestDescriptor, ApiError> {
        Ok(with_params(GET_BOOK_LIST, HttpMethod::Get, to_json(search)?))
    }

    pub fn build_get_book_public(&self) -> RequestDescriptor {
        RequestDescriptor {
            url: GET_BOOK_PUBLIC.to_string(),
            method: HttpMethod::Get,
            data: None,
            params: None,
        }
    }

    pub fn parse_create_book(&self, response: HttpResponse) -> Result<(), ApiError> {
        open_envelope(&response).map(|_| ())
    }

    pub fn parse_delete_book(&self, response: HttpResponse) -> Result<(), ApiError> {
        open_envelope(&response).map(|_| ())
    }

    pub fn parse_delete_book_by_ids(&self, response: HttpResponse) -> Result<(), ApiError> {
        open_envelope(&response).map(|_| ())
    }

    pub fn parse_update_book(&self, response: HttpResponse) -> Result<(), ApiError> {
        open_envelope(&response).map(|_| ())
    }

    pub fn parse_find_book(&self, response: HttpResponse) -> Result<Book, ApiError> {
        decode_data(open_envelope(&response)?)
    }

    pub fn parse_get_book_list(&self, response: HttpResponse) -> Result<PageResult<Book>, ApiError> {
        decode_data(open_envelope(&response)?)
    }

    pub fn parse_get_book_public(&self, response: HttpResponse) -> Result<PublicInfo, ApiError> {
        decode_data(open_envelope(&response)?)
    }
}

fn with_data(url: &str, method: HttpMethod, data: Value) -> RequestDescriptor {
    RequestDescriptor {
        url: url.to_string(),
        method,
        data: Some(data),
        params: None,
    }
}

fn with_params(url: &str, method: HttpMethod, params: Value) -> RequestDescriptor {
    RequestDescriptor {
        url: url.to_string(),
        method,
        data: None,
        params: Some(params),
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<Value, ApiError> {
    serde_json::to_value(value).map_err(|e| ApiError::Serialization(e.to_string()))
}

/// Check the HTTP status, then unwrap the envelope and return its `data`.
fn open_envelope(response: &HttpResponse) -> Result<Value, ApiError> {
    match response.status {
        200 => {}
        401 => return Err(ApiError::Unauthorized),
        status => {
            return Err(ApiError::Http {
                status,
                body: response.body.clone(),
            })
        }
    }

    let envelope: ApiResponse =
        serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))?;
    if envelope.code != 0 {
        return Err(ApiError::Rejected {
            code: envelope.code,
            msg: envelope.msg,
        });
    }
    Ok(envelope.data)
}

fn decode_data<T: DeserializeOwned>(data: Value) -> Result<T, ApiError> {
    serde_json::from_value(data).map_err(|e| ApiError::Deserialization(e.to_string()))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn client() -> BookClient {
        BookClient::new()
    }

    fn ok(body: &str) -> HttpResponse {
        HttpResponse {
            status: 200,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    #[test]
    fn build_create_book_carries_record_as_data() {
        let book = Book {
            title: Some("X".to_string()),
            ..Book::default()
        };
        let req = client().build_create_book(&book).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, "/book/createBook");
        assert_eq!(req.data, Some(json!({"title": "X"})));
        assert!(req.params.is_none());
    }

    #[test]
    fn build_delete_book_carries_id_as_params() {
        let req = client().build_delete_book(&BookId::new(4)).unwrap();
        assert_eq!(req.method, HttpMethod::Delete);
        assert_eq!(req.url, "/book/deleteBook");
        assert_eq!(req.params, Some(json!({"ID": 4})));
        assert!(req.data.is_none());
    }

    #[test]
    fn build_delete_book_by_ids_carries_id_set() {
        let req = client().build_delete_book_by_ids(&BookIds::new([1, 2, 3])).unwrap();
        assert_eq!(req.method, HttpMethod::Delete);
        assert_eq!(req.url, "/book/deleteBookByIds");
        assert_eq!(req.params, Some(json!({"IDs": [1, 2, 3]})));
    }

    #[test]
    fn build_update_book_uses_put() {
        let book = Book {
            id: 9,
            price: Some(12.0),
            ..Book::default()
        };
        let req = client().build_update_book(&book).unwrap();
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.url, "/book/updateBook");
        assert_eq!(req.data, Some(json!({"ID": 9, "price": 12.0})));
    }

    #[test]
    fn build_find_book_uses_get_with_params() {
        let req = client().build_find_book(&BookId::new(1)).unwrap();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "/book/findBook");
        assert_eq!(req.params, Some(json!({"ID": 1})));
    }

    #[test]
    fn build_get_book_list_passes_pagination_through() {
        let req = client().build_get_book_list(&BookSearch::page(1, 10)).unwrap();
        assert_eq!(req.url, "/book/getBookList");
        assert_eq!(req.params, Some(json!({"page": 1, "pageSize": 10})));
    }

    #[test]
    fn build_get_book_public_has_no_payload() {
        let req = client().build_get_book_public();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "/book/getBookPublic");
        assert!(req.data.is_none());
        assert!(req.params.is_none());
        let wire = serde_json::to_value(&req).unwrap();
        assert_eq!(wire, json!({"url": "/book/getBookPublic", "method": "get"}));
    }

    #[test]
    fn parse_create_book_success() {
        let response = ok(r#"{"code":0,"data":{},"msg":"created"}"#);
        assert!(client().parse_create_book(response).is_ok());
    }

    #[test]
    fn parse_find_book_success() {
        let response = ok(r#"{"code":0,"data":{"ID":1,"title":"Dune","price":9.5},"msg":"ok"}"#);
        let book = client().parse_find_book(response).unwrap();
        assert_eq!(book.id, 1);
        assert_eq!(book.title.as_deref(), Some("Dune"));
    }

    #[test]
    fn parse_find_book_rejected() {
        let response = ok(r#"{"code":7,"data":{},"msg":"record not found"}"#);
        let err = client().parse_find_book(response).unwrap_err();
        assert_eq!(
            err,
            ApiError::Rejected {
                code: 7,
                msg: "record not found".to_string()
            }
        );
    }

    #[test]
    fn parse_get_book_list_success() {
        let response = ok(
            r#"{"code":0,"data":{"list":[{"ID":2,"title":"Emma"}],"total":5,"page":2,"pageSize":1},"msg":"ok"}"#,
        );
        let page = client().parse_get_book_list(response).unwrap();
        assert_eq!(page.total, 5);
        assert_eq!(page.page, 2);
        assert_eq!(page.list.len(), 1);
        assert_eq!(page.list[0].id, 2);
    }

    #[test]
    fn parse_get_book_public_success() {
        let response = ok(r#"{"code":0,"data":{"info":"public"},"msg":"ok"}"#);
        let info = client().parse_get_book_public(response).unwrap();
        assert_eq!(info.info, "public");
    }

    #[test]
    fn parse_unauthorized() {
        let response = HttpResponse {
            status: 401,
            headers: Vec::new(),
            body: r#"{"code":7,"data":{"reload":true},"msg":"not logged in"}"#.to_string(),
        };
        let err = client().parse_update_book(response).unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized));
    }

    #[test]
    fn parse_unexpected_status() {
        let response = HttpResponse {
            status: 500,
            headers: Vec::new(),
            body: "internal error".to_string(),
        };
        let err = client().parse_delete_book(response).unwrap_err();
        assert!(matches!(err, ApiError::Http { status: 500, .. }));
    }

    #[test]
    fn parse_bad_json() {
        let err = client().parse_get_book_list(ok("not json")).unwrap_err();
        assert!(matches!(err, ApiError::Deserialization(_)));
    }

    #[test]
    fn parse_list_with_wrong_payload_shape() {
        let response = ok(r#"{"code":0,"data":{"info":"not a page"},"msg":"ok"}"#);
        let err = client().parse_get_book_list(response).unwrap_err();
        assert!(matches!(err, ApiError::Deserialization(_)));
    }
}
