//! Row label abstraction.

use std::{fmt, str::FromStr};

/// A value usable as a row label of a [`Frame`](crate::Frame).
///
/// Labels must print and parse losslessly so tables can be persisted and
/// reloaded with identical axes. Dates render as ISO-8601 (`%Y-%m-%d`).
pub trait Label: Clone + PartialEq + fmt::Debug + fmt::Display + FromStr + Send + Sync {}

impl<T> Label for T where
    T: Clone + PartialEq + fmt::Debug + fmt::Display + FromStr + Send + Sync
{
}
