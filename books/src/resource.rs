//! `/books` request handlers.

use std::sync::Arc;

use apigw_core::{HandlerError, HttpRequest, HttpResponse, Route, Router, FORM_URLENCODED};
use thiserror::Error;
use tracing::{error, info};
use uuid::Uuid;

use crate::model::{BookFieldError, NewBook};
use crate::store::{BookStore, StoreError};
use crate::templates::{BookView, Model, RenderError, TemplateEngine, BOOKS_TEMPLATE, BOOK_SAVED_TEMPLATE};

#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("request carries no invocation context")]
    MissingContext,

    #[error(transparent)]
    Field(#[from] BookFieldError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Handlers for the book collection.
pub struct BooksResource {
    store: Arc<dyn BookStore>,
    templates: Arc<dyn TemplateEngine>,
}

impl BooksResource {
    pub fn new(store: Arc<dyn BookStore>, templates: Arc<dyn TemplateEngine>) -> Self {
        Self { store, templates }
    }

    /// Route table: `GET /books` for any content type, `POST /books` for
    /// form submissions only.
    pub fn routes(self: Arc<Self>) -> Router {
        let list = Arc::clone(&self);
        let create = self;
        Router::new()
            .route(Route::get("/books", move |req: &HttpRequest| list.list(req)))
            .route(
                Route::post("/books", move |req: &HttpRequest| -> Result<HttpResponse, HandlerError> {
                    Ok(create.create(req))
                })
                .content_type(FORM_URLENCODED),
            )
    }

    /// Render every stored book.
    pub fn list(&self, request: &HttpRequest) -> Result<HttpResponse, HandlerError> {
        self.try_list(request).map_err(HandlerError::new)
    }

    fn try_list(&self, request: &HttpRequest) -> Result<HttpResponse, ResourceError> {
        let request_id = request
            .invocation_context()
            .ok_or(ResourceError::MissingContext)?
            .request_id
            .clone();
        let books: Vec<BookView> = self.store.scan_all()?.iter().map(BookView::from).collect();
        let html = self
            .templates
            .render(BOOKS_TEMPLATE, &Model::Books { books, request_id })?;
        Ok(HttpResponse::html(html))
    }

    /// Store a submitted book under a fresh id.
    ///
    /// Any failure is logged and answered with a bodiless 500; the caller
    /// never sees why.
    pub fn create(&self, request: &HttpRequest) -> HttpResponse {
        match self.try_create(request) {
            Ok(response) => response,
            Err(e) => {
                error!(error = %e, "failed to save book");
                HttpResponse::internal_server_error()
            }
        }
    }

    fn try_create(&self, request: &HttpRequest) -> Result<HttpResponse, ResourceError> {
        info!(params = ?request.form, "request params");
        let book = NewBook::from_form(&request.form)?;
        let id = Uuid::new_v4();
        let record = book.into_record(id);
        let title = record.title.clone();
        self.store.put(record)?;
        let html = self
            .templates
            .render(BOOK_SAVED_TEMPLATE, &Model::BookSaved { id, title })?;
        Ok(HttpResponse::html(html))
    }
}
