#![doc = include_str!("../README.md")]

use crate::spanned::Location;
use std::fmt::{Display, Formatter};

pub mod spanned;
pub mod token;

/// An error with a location
#[derive(Debug, thiserror::Error)]
pub struct SpannedError<E> {
    error: E,
    location: Option<Location>,
}

impl<E> SpannedError<E> {
    pub fn new(error: E, location: impl Into<Option<Location>>) -> Self {
        Self {
            error,
            location: location.into(),
        }
    }

    /// The error itself, without its location
    pub fn error(&self) -> &E {
        &self.error
    }

    /// Where the error occurred, if known
    pub fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }
}

impl<E: Display> Display for SpannedError<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.error)?;
        if let Some(location) = &self.location {
            write!(f, "\n  -> {location}")?;
        }
        Ok(())
    }
}
