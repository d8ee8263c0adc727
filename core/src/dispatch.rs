//! Forwarding API over an injected dispatcher.
//!
//! # Design
//! `BookApi` owns a `Dispatch` implementation and nothing else. Every method
//! builds exactly one `RequestDescriptor` with `BookClient` and hands it to
//! the dispatcher, returning the dispatcher's result untouched. Retries,
//! caching, auth and status interpretation all belong to the dispatcher or
//! to the caller.

use async_trait::async_trait;

use crate::client::BookClient;
use crate::error::ApiError;
use crate::http::RequestDescriptor;
use crate::types::{Book, BookId, BookIds, BookSearch};

/// Executes a `RequestDescriptor`.
///
/// `Output` is whatever the dispatcher resolves with (usually an
/// `HttpResponse`). `Error` must absorb `ApiError` because turning a record
/// into JSON is the one thing that can fail before dispatch.
#[async_trait]
pub trait Dispatch: Send + Sync {
    type Output: Send;
    type Error: From<ApiError> + Send;

    async fn dispatch(&self, request: RequestDescriptor) -> Result<Self::Output, Self::Error>;
}

#[async_trait]
impl<D: Dispatch + ?Sized> Dispatch for std::sync::Arc<D> {
    type Output = D::Output;
    type Error = D::Error;

    async fn dispatch(&self, request: RequestDescriptor) -> Result<Self::Output, Self::Error> {
        (**self).dispatch(request).await
    }
}

/// One method per book endpoint, each a single forwarded call.
#[derive(Debug, Clone)]
pub struct BookApi<D> {
    client: BookClient,
    dispatcher: D,
}

impl<D: Dispatch> BookApi<D> {
    pub fn new(dispatcher: D) -> Self {
        Self {
            client: BookClient::new(),
            dispatcher,
        }
    }

    pub fn dispatcher(&self) -> &D {
        &self.dispatcher
    }

    pub async fn create_book(&self, book: &Book) -> Result<D::Output, D::Error> {
        let request = self.client.build_create_book(book)?;
        self.dispatcher.dispatch(request).await
    }

    pub async fn delete_book(&self, id: &BookId) -> Result<D::Output, D::Error> {
        let request = self.client.build_delete_book(id)?;
        self.dispatcher.dispatch(request).await
    }

    pub async fn delete_book_by_ids(&self, ids: &BookIds) -> Result<D::Output, D::Error> {
        let request = self.client.build_delete_book_by_ids(ids)?;
        self.dispatcher.dispatch(request).await
    }

    pub async fn update_book(&self, book: &Book) -> Result<D::Output, D::Error> {
        let request = self.client.build_update_book(book)?;
        self.dispatcher.dispatch(request).await
    }

    pub async fn find_book(&self, id: &BookId) -> Result<D::Output, D::Error> {
        let request = self.client.build_find_book(id)?;
        self.dispatcher.dispatch(request).await
    }

    pub async fn get_book_list(&self, search: &BookSearch) -> Result<D::Output, D::Error> {
        let request = self.client.build_get_book_list(search)?;
        self.dispatcher.dispatch(request).await
    }

    pub async fn get_book_public(&self) -> Result<D::Output, D::Error> {
        self.dispatcher.dispatch(self.client.build_get_book_public()).await
    }
}
