//! Book catalogue served through the proxy adapter.
//!
//! # Overview
//! Two routes: `GET /books` lists every stored book as an HTML page, and
//! `POST /books` stores a book submitted as an HTML form.
//!
//! # Design
//! - Storage and templating are traits (`BookStore`, `TemplateEngine`)
//!   passed to `BooksResource::new`; nothing is looked up globally.
//! - `InMemoryBookStore` and `AskamaTemplates` are the bundled
//!   implementations.
//! - `app` wires everything into a ready `ProxyAdapter`.

pub mod model;
pub mod resource;
pub mod store;
pub mod templates;

use std::sync::Arc;

use apigw_core::ProxyAdapter;

pub use model::{BookFieldError, BookRecord, NewBook};
pub use resource::{BooksResource, ResourceError};
pub use store::{BookStore, InMemoryBookStore, StoreError};
pub use templates::{AskamaTemplates, BookView, Model, RenderError, TemplateEngine};

/// Build the adapter serving the book routes.
pub fn app(store: Arc<dyn BookStore>, templates: Arc<dyn TemplateEngine>) -> ProxyAdapter {
    let resource = Arc::new(BooksResource::new(store, templates));
    ProxyAdapter::new(resource.routes())
}
