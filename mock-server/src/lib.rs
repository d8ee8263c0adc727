use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Query, RawQuery, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{info, warn};

pub const SUCCESS: i64 = 0;
pub const ERROR: i64 = 7;
pub const TOKEN_HEADER: &str = "x-token";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Book {
    #[serde(rename = "ID")]
    pub id: u64,
    #[serde(rename = "CreatedAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "UpdatedAt")]
    pub updated_at: DateTime<Utc>,
    pub title: Option<String>,
    pub desc: Option<String>,
    pub price: Option<f64>,
    pub info: Option<Value>,
    #[serde(default)]
    pub pic: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// Body accepted by create and update. `title` is required by both. On
/// update, absent fields and an empty `pic` leave the stored value alone.
#[derive(Debug, Default, Deserialize)]
pub struct BookInput {
    #[serde(rename = "ID", default)]
    pub id: u64,
    pub title: Option<String>,
    pub desc: Option<String>,
    pub price: Option<f64>,
    pub info: Option<Value>,
    pub pic: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct IdQuery {
    #[serde(rename = "ID")]
    pub id: u64,
}

/// `deleteBook` takes `ID` as an opaque string; a missing or non-numeric
/// value matches no row and still succeeds.
#[derive(Debug, Default, Deserialize)]
pub struct DeleteQuery {
    #[serde(rename = "ID")]
    pub id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookSearch {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub page_size: u32,
    pub keyword: Option<String>,
    pub title: Option<String>,
    pub start_price: Option<f64>,
    pub end_price: Option<f64>,
    pub start_created_at: Option<DateTime<Utc>>,
    pub end_created_at: Option<DateTime<Utc>>,
}

impl BookSearch {
    pub fn matches(&self, book: &Book) -> bool {
        if let Some(title) = self.title.as_deref().filter(|t| !t.is_empty()) {
            if !book.title.as_deref().is_some_and(|t| t.contains(title)) {
                return false;
            }
        }
        if let (Some(start), Some(end)) = (self.start_price, self.end_price) {
            if !book.price.is_some_and(|p| p >= start && p <= end) {
                return false;
            }
        }
        if let (Some(start), Some(end)) = (self.start_created_at, self.end_created_at) {
            if book.created_at < start || book.created_at > end {
                return false;
            }
        }
        true
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Envelope<T = Value> {
    pub code: i64,
    pub data: T,
    pub msg: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResult<T> {
    pub list: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
}

#[derive(Debug, Default)]
pub struct Store {
    books: BTreeMap<u64, Book>,
    next_id: u64,
}

impl Store {
    fn insert(&mut self, input: BookInput) -> Book {
        self.next_id += 1;
        let now = Utc::now();
        let book = Book {
            id: self.next_id,
            created_at: now,
            updated_at: now,
            title: input.title,
            desc: input.desc,
            price: input.price,
            info: input.info,
            pic: input.pic.unwrap_or_default(),
            kind: input.kind,
        };
        self.books.insert(book.id, book.clone());
        book
    }

    fn apply(&mut self, input: BookInput) -> bool {
        let Some(book) = self.books.get_mut(&input.id) else {
            return false;
        };
        if input.title.is_some() {
            book.title = input.title;
        }
        if input.desc.is_some() {
            book.desc = input.desc;
        }
        if input.price.is_some() {
            book.price = input.price;
        }
        if input.info.is_some() {
            book.info = input.info;
        }
        if let Some(pic) = input.pic.filter(|pic| !pic.is_empty()) {
            book.pic = pic;
        }
        if input.kind.is_some() {
            book.kind = input.kind;
        }
        book.updated_at = Utc::now();
        true
    }
}

pub type Db = Arc<RwLock<Store>>;

#[derive(Clone)]
pub struct AppState {
    db: Db,
    token: Option<Arc<str>>,
}

pub fn app() -> Router {
    app_with_token(None)
}

/// Router that requires `x-token: <token>` on every route except
/// `getBookPublic` when `token` is set.
pub fn app_with_token(token: Option<String>) -> Router {
    let state = AppState {
        db: Arc::new(RwLock::new(Store::default())),
        token: token.map(Arc::from),
    };

    let private = Router::new()
        .route("/book/createBook", post(create_book))
        .route("/book/deleteBook", delete(delete_book))
        .route("/book/deleteBookByIds", delete(delete_book_by_ids))
        .route("/book/updateBook", put(update_book))
        .route("/book/findBook", get(find_book))
        .route("/book/getBookList", get(get_book_list))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_token));

    Router::new()
        .merge(private)
        .route("/book/getBookPublic", get(get_book_public))
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    serve(listener, app()).await
}

pub async fn serve(listener: TcpListener, app: Router) -> Result<(), std::io::Error> {
    axum::serve(listener, app).await
}

fn ok_with_message(msg: &str) -> Json<Envelope> {
    ok_with_detailed(json!({}), msg)
}

fn ok_with_detailed<T: Serialize>(data: T, msg: &str) -> Json<Envelope<T>> {
    Json(Envelope {
        code: SUCCESS,
        data,
        msg: msg.to_string(),
    })
}

fn fail_with_message(msg: impl Into<String>) -> Json<Envelope> {
    Json(Envelope {
        code: ERROR,
        data: json!({}),
        msg: msg.into(),
    })
}

async fn require_token(State(state): State<AppState>, request: Request, next: Next) -> Response {
    if let Some(expected) = state.token.as_deref() {
        let supplied = request
            .headers()
            .get(TOKEN_HEADER)
            .and_then(|value| value.to_str().ok());
        if supplied != Some(expected) {
            warn!(path = %request.uri().path(), "rejected request without a valid token");
            let body = Envelope {
                code: ERROR,
                data: json!({"reload": true}),
                msg: "not logged in or illegal access".to_string(),
            };
            return (StatusCode::UNAUTHORIZED, Json(body)).into_response();
        }
    }
    next.run(request).await
}

async fn create_book(
    State(state): State<AppState>,
    input: Result<Json<BookInput>, JsonRejection>,
) -> Json<Envelope> {
    let Json(input) = match input {
        Ok(input) => input,
        Err(rejection) => return fail_with_message(rejection.body_text()),
    };
    if input.title.is_none() {
        return fail_with_message("title is required");
    }
    let book = state.db.write().await.insert(input);
    info!(id = book.id, "created book");
    ok_with_message("created successfully")
}

async fn delete_book(State(state): State<AppState>, Query(query): Query<DeleteQuery>) -> Json<Envelope> {
    let id = query.id.as_deref().and_then(|id| id.parse::<u64>().ok());
    let removed = match id {
        Some(id) => state.db.write().await.books.remove(&id).is_some(),
        None => false,
    };
    info!(id = ?query.id, removed, "deleted book");
    ok_with_message("deleted successfully")
}

async fn delete_book_by_ids(State(state): State<AppState>, RawQuery(query): RawQuery) -> Json<Envelope> {
    let raw = query.unwrap_or_default();
    let ids: Result<Vec<u64>, _> = url::form_urlencoded::parse(raw.as_bytes())
        .filter(|(key, _)| key == "IDs[]")
        .map(|(_, value)| value.parse::<u64>())
        .collect();
    let ids = match ids {
        Ok(ids) => ids,
        Err(e) => return fail_with_message(format!("batch delete failed: {e}")),
    };

    let mut store = state.db.write().await;
    let removed = ids.iter().filter(|id| store.books.remove(*id).is_some()).count();
    info!(requested = ids.len(), removed, "batch deleted books");
    ok_with_message("batch deleted successfully")
}

async fn update_book(
    State(state): State<AppState>,
    input: Result<Json<BookInput>, JsonRejection>,
) -> Json<Envelope> {
    let Json(input) = match input {
        Ok(input) => input,
        Err(rejection) => return fail_with_message(rejection.body_text()),
    };
    if input.title.is_none() {
        return fail_with_message("title is required");
    }
    let id = input.id;
    let updated = state.db.write().await.apply(input);
    info!(id, updated, "updated book");
    ok_with_message("updated successfully")
}

async fn find_book(
    State(state): State<AppState>,
    query: Result<Query<IdQuery>, QueryRejection>,
) -> Response {
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => {
            return fail_with_message(format!("query failed: {}", rejection.body_text())).into_response()
        }
    };
    match state.db.read().await.books.get(&query.id) {
        Some(book) => ok_with_detailed(book.clone(), "fetched successfully").into_response(),
        None => fail_with_message("query failed: record not found").into_response(),
    }
}

async fn get_book_list(
    State(state): State<AppState>,
    search: Result<Query<BookSearch>, QueryRejection>,
) -> Response {
    let Query(search) = match search {
        Ok(search) => search,
        Err(rejection) => return fail_with_message(rejection.body_text()).into_response(),
    };

    let store = state.db.read().await;
    let matches: Vec<Book> = store
        .books
        .values()
        .filter(|book| search.matches(book))
        .cloned()
        .collect();
    let total = matches.len() as u64;

    let list = if search.page_size == 0 {
        matches
    } else {
        let size = search.page_size as usize;
        let offset = (search.page.max(1) as usize - 1) * size;
        matches.into_iter().skip(offset).take(size).collect()
    };

    let page = PageResult {
        list,
        total,
        page: search.page,
        page_size: search.page_size,
    };
    ok_with_detailed(page, "fetched successfully").into_response()
}

async fn get_book_public() -> Json<Envelope> {
    ok_with_detailed(
        json!({"info": "public book endpoint, no auth required"}),
        "fetched successfully",
    )
}
