//! In-memory query engine for record collections.
//!
//! A [`Query`] is a lazily-built description of how to narrow a slice of
//! records: a list of clauses that must all match, a list of clauses that
//! must not match, an ordering and an optional limit. Nothing is evaluated
//! until one of the execution methods ([`Query::filter`], [`Query::count`],
//! ...) is called, so a query can be threaded through many independent
//! narrowing steps cheaply.
//!
//! # Quick Start
//!
//! ```rust
//! use chrono::NaiveDate;
//! use schemafilter_query::{Query, Record, Timestamp, Value};
//!
//! struct Item {
//!     title: String,
//!     item_date: NaiveDate,
//! }
//!
//! impl Record for Item {
//!     fn field_value(&self, field: &str) -> Value<'_> {
//!         match field {
//!             "title" => Value::String(&self.title),
//!             "item_date" => Value::Timestamp(Timestamp::from_date(self.item_date)),
//!             _ => Value::None,
//!         }
//!     }
//! }
//!
//! let day = |d| NaiveDate::from_ymd_opt(2024, 3, d).unwrap();
//! let items = vec![
//!     Item { title: "Pothole reported".into(), item_date: day(1) },
//!     Item { title: "Restaurant inspection".into(), item_date: day(5) },
//! ];
//!
//! let query = Query::new()
//!     .and_gte("item_date", Timestamp::from_date(day(1)))
//!     .and_lt("item_date", Timestamp::from_date(day(2)));
//!
//! let results = query.filter(&items);
//! assert_eq!(results.len(), 1);
//! assert_eq!(results[0].title, "Pothole reported");
//! ```
//!
//! # Query Semantics
//!
//! ```text
//! match = (all AND clauses match) ∧ (no NOT clause matches)
//! ```
//!
//! | Type | Operators |
//! |------|-----------|
//! | String | `Eq`, `Ne`, `Contains`, `IContains` |
//! | Number | `Eq`, `Ne`, `Gt`, `Gte`, `Lt`, `Lte`, `In` |
//! | Timestamp | `Eq`, `Ne`, `Gt`, `Gte`, `Lt`, `Lte` |
//! | Bool | `Eq`, `Ne` |
//! | List | `Contains`, `In` |
//! | any | `IsNone` |

mod clause;
mod error;
mod op;
mod ordering;
mod query;
mod record;
mod value;

pub use clause::{Clause, ClauseValue};
pub use error::{QueryError, Result};
pub use op::Op;
pub use ordering::{Dir, OrderBy};
pub use query::Query;
pub use record::Record;
pub use value::{Timestamp, Value};
