use std::{io, result, str::Utf8Error};
use thiserror::Error;

pub type Result<T> = result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("tag <{tag}> is not permitted")]
    TagNotAllowed { tag: String },
    #[error("attribute \"{attribute}\" is not permitted on <{tag}>")]
    AttributeNotAllowed { tag: String, attribute: String },
    #[error("value \"{value}\" is not permitted for \"{attribute}\" on <{tag}>")]
    ValueNotAllowed {
        tag: String,
        attribute: String,
        value: String,
    },
    #[error("required attribute \"{attribute}\" is missing on <{tag}>")]
    MissingAttribute { tag: String, attribute: String },
    #[error("value of \"{attribute}\" on <{tag}> exceeds {limit} characters")]
    ValueTooLong {
        tag: String,
        attribute: String,
        limit: usize,
    },
    #[error("entry \"{token}\" is not permitted in \"{attribute}\" on <{tag}>")]
    SetEntryNotAllowed {
        tag: String,
        attribute: String,
        token: String,
    },
    #[error("pair \"{key}\"=\"{value}\" is not permitted in \"{attribute}\" on <{tag}>")]
    PairNotAllowed {
        tag: String,
        attribute: String,
        key: String,
        value: String,
    },
    #[error("duplicate key \"{key}\" in \"{attribute}\" on <{tag}>")]
    DuplicateKey {
        tag: String,
        attribute: String,
        key: String,
    },
    #[error("\"{attribute}\" on <{tag}> has {count} entries, limit is {limit}")]
    TooManyEntries {
        tag: String,
        attribute: String,
        count: usize,
        limit: usize,
    },
    #[error("<{tag}> has {count} children, limit is {limit}")]
    TooManyChildren {
        tag: String,
        count: usize,
        limit: usize,
    },
    #[error("<{tag}> exceeds the top-level nesting limit of {limit}")]
    NestingTooDeep { tag: String, limit: usize },
    #[error("<{tag}> is nested too deeply inside <{ancestor}>")]
    TagNestingTooDeep { tag: String, ancestor: String },

    #[error("invalid UTF-8 character at position {position}")]
    Utf8 { source: Utf8Error, position: usize },
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Regex(#[from] regex::Error),

    #[cfg(feature = "json")]
    #[error(transparent)]
    PolicyParse(#[from] serde_json::Error),

    #[cfg(feature = "url")]
    #[error("invalid protocol \"{0}\"")]
    InvalidProtocol(String),
    #[cfg(feature = "url")]
    #[error("invalid host \"{0}\"")]
    InvalidHost(String),
}

impl From<Utf8Error> for Error {
    fn from(source: Utf8Error) -> Self {
        Self::Utf8 {
            position: source.valid_up_to(),
            source,
        }
    }
}
