//! HTML rendering.
//!
//! `TemplateEngine::render` takes a template name and a model, mirroring a
//! name-addressed template engine. `AskamaTemplates` backs it with
//! compile-time Askama templates from `templates/`; a name paired with the
//! wrong model is an error rather than a panic.

use askama::Template;
use thiserror::Error;
use uuid::Uuid;

use crate::model::BookRecord;

pub const BOOKS_TEMPLATE: &str = "books.html";
pub const BOOK_SAVED_TEMPLATE: &str = "book_saved.html";

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("unknown template {0:?}")]
    UnknownTemplate(String),

    #[error("model does not fit template {0:?}")]
    ModelMismatch(String),

    #[error(transparent)]
    Engine(#[from] askama::Error),
}

/// One row of the book list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookView {
    pub id: String,
    pub title: String,
    pub authors: String,
    pub release_date: String,
}

impl From<&BookRecord> for BookView {
    fn from(record: &BookRecord) -> Self {
        Self {
            id: record.id.to_string(),
            title: record.title.clone(),
            authors: record.authors.clone(),
            release_date: record
                .release_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
        }
    }
}

/// Data handed to a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Model {
    Books { books: Vec<BookView>, request_id: String },
    BookSaved { id: Uuid, title: String },
}

pub trait TemplateEngine: Send + Sync {
    fn render(&self, template: &str, model: &Model) -> Result<String, RenderError>;
}

#[derive(Template)]
#[template(path = "books.html")]
struct BooksPage<'a> {
    books: &'a [BookView],
    request_id: &'a str,
}

#[derive(Template)]
#[template(path = "book_saved.html")]
struct BookSavedPage<'a> {
    id: &'a Uuid,
    title: &'a str,
}

/// Templates compiled into the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct AskamaTemplates;

impl TemplateEngine for AskamaTemplates {
    fn render(&self, template: &str, model: &Model) -> Result<String, RenderError> {
        let html = match (template, model) {
            (BOOKS_TEMPLATE, Model::Books { books, request_id }) => BooksPage {
                books,
                request_id,
            }
            .render()?,
            (BOOK_SAVED_TEMPLATE, Model::BookSaved { id, title }) => {
                BookSavedPage { id, title }.render()?
            }
            (BOOKS_TEMPLATE | BOOK_SAVED_TEMPLATE, _) => {
                return Err(RenderError::ModelMismatch(template.to_string()))
            }
            _ => return Err(RenderError::UnknownTemplate(template.to_string())),
        };
        Ok(html)
    }
}
