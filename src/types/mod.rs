//! Engine value types that have no direct standard-library counterpart
//!
//! This module provides the large-object handles, interval values and the
//! time-with-offset type carried inside [`crate::Value`].

mod interval;
mod lob;
pub(crate) mod temporal;

pub use interval::{IntervalDaySecond, IntervalYearMonth};
pub use lob::{Blob, Clob, NClob};
pub use temporal::OffsetTime;
