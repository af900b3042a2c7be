//! Book records and the form-to-record mapping.

use apigw_core::FormFields;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Date format accepted for `releaseDate`.
const RELEASE_DATE_FORMAT: &str = "%Y-%m-%d";

/// A stored book, keyed by `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookRecord {
    pub id: Uuid,
    pub title: String,
    pub authors: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<NaiveDate>,
}

/// A book submitted by a client, before it has an id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub authors: String,
    pub release_date: Option<NaiveDate>,
}

#[derive(Debug, Error)]
pub enum BookFieldError {
    #[error("invalid releaseDate {value:?}: {source}")]
    ReleaseDate {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}

impl NewBook {
    /// Map submitted form fields onto a book, one field at a time.
    ///
    /// Only the first value of each field is used. `title` and `authors`
    /// default to empty; `releaseDate` is optional but must be `YYYY-MM-DD`
    /// when non-empty. An `id` field and any unknown field are ignored.
    pub fn from_form(form: &FormFields) -> Result<Self, BookFieldError> {
        let title = form.first("title").unwrap_or_default().to_string();
        let authors = form.first("authors").unwrap_or_default().to_string();
        let release_date = match form.first("releaseDate").map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(NaiveDate::parse_from_str(raw, RELEASE_DATE_FORMAT).map_err(
                |source| BookFieldError::ReleaseDate {
                    value: raw.to_string(),
                    source,
                },
            )?),
        };
        Ok(Self {
            title,
            authors,
            release_date,
        })
    }

    pub fn into_record(self, id: Uuid) -> BookRecord {
        BookRecord {
            id,
            title: self.title,
            authors: self.authors,
            release_date: self.release_date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use apigw_core::parse_form_body;

    #[test]
    fn maps_known_fields() {
        let form = parse_form_body("title=Dune&authors=Frank+Herbert&releaseDate=1965-08-01").unwrap();
        let book = NewBook::from_form(&form).unwrap();
        assert_eq!(book.title, "Dune");
        assert_eq!(book.authors, "Frank Herbert");
        assert_eq!(book.release_date, NaiveDate::from_ymd_opt(1965, 8, 1));
    }

    #[test]
    fn missing_fields_get_defaults() {
        let book = NewBook::from_form(&parse_form_body("").unwrap()).unwrap();
        assert_eq!(book, NewBook::default());
    }

    #[test]
    fn empty_release_date_is_none() {
        let book = NewBook::from_form(&parse_form_body("title=Dune&releaseDate=").unwrap()).unwrap();
        assert!(book.release_date.is_none());
    }

    #[test]
    fn bad_release_date_is_rejected() {
        let err = NewBook::from_form(&parse_form_body("releaseDate=01%2F08%2F1965").unwrap()).unwrap_err();
        assert!(err.to_string().contains("01/08/1965"));
    }

    #[test]
    fn caller_id_and_unknown_fields_are_ignored() {
        let form = parse_form_body("id=00000000-0000-0000-0000-000000000001&title=Dune&isbn=123").unwrap();
        let id = Uuid::new_v4();
        let record = NewBook::from_form(&form).unwrap().into_record(id);
        assert_eq!(record.id, id);
        assert_eq!(record.title, "Dune");
    }

    #[test]
    fn first_value_wins_for_repeated_fields() {
        let book = NewBook::from_form(&parse_form_body("title=First&title=Second").unwrap()).unwrap();
        assert_eq!(book.title, "First");
    }

    #[test]
    fn record_serializes_with_camel_case() {
        let record = NewBook {
            title: "Dune".to_string(),
            authors: "Herbert".to_string(),
            release_date: NaiveDate::from_ymd_opt(1965, 8, 1),
        }
        .into_record(Uuid::nil());
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["releaseDate"], "1965-08-01");
        assert_eq!(json["id"], "00000000-0000-0000-0000-000000000000");
    }
}
