//! In-memory table transformations used by the preview and plot layers.
//!
//! - [`filter()`]: row filtering by predicate, and [`filter_eq()`] for class grouping
//! - [`reduce()`]: common reductions (count/sum/min/max)
//!
//! ## Example: filter → reduce
//!
//! ```rust
//! use tabular_explorer::processing::{filter_eq, reduce, ReduceOp};
//! use tabular_explorer::types::{DataType, Field, Schema, Table, Value};
//!
//! let schema = Schema::new(vec![
//!     Field::new("species", DataType::Utf8),
//!     Field::new("petal", DataType::Float64),
//! ]);
//! let table = Table::new(
//!     schema,
//!     vec![
//!         vec![Value::Utf8("setosa".into()), Value::Float64(1.4)],
//!         vec![Value::Utf8("virginica".into()), Value::Float64(6.0)],
//!         vec![Value::Utf8("setosa".into()), Value::Null],
//!     ],
//! );
//!
//! let setosa = filter_eq(&table, "species", &Value::Utf8("setosa".into())).unwrap();
//! assert_eq!(setosa.row_count(), 2);
//!
//! // Nulls are ignored.
//! let max = reduce(&setosa, "petal", ReduceOp::Max).unwrap();
//! assert_eq!(max, Value::Float64(1.4));
//! ```

pub mod filter;
pub mod reduce;

pub use filter::{filter, filter_eq};
pub use reduce::{reduce, ReduceOp};
