//! rowtree core - hierarchical materialization of flat join rows.
//!
//! A join query returns one denormalized row per combination of matching
//! records. This crate rebuilds the record tree such rows came from:
//!
//! 1. Describe the join with a tree of [`JoinNode`]s (or a [`JoinSpec`]).
//! 2. Build a [`RecordCursor`] for the tree.
//! 3. Populate it with the flat rows and walk records and child joins.
//!
//! ```
//! use std::sync::Arc;
//! use rowtree_core::{Cursor, JoinNode, RecordCursor};
//! use rowtree_core::proto::{flat_row, Value};
//!
//! let tree = JoinNode::tabular("p", ["id"])?
//!     .with_join("children", JoinNode::tabular("c", ["id"])?)?;
//!
//! let rows = vec![
//!     flat_row([("p_T_id", Value::Int64(1)), ("c_T_id", Value::Int64(10))]),
//!     flat_row([("p_T_id", Value::Int64(1)), ("c_T_id", Value::Int64(11))]),
//! ];
//!
//! let mut cursor = RecordCursor::from_rows(Arc::new(tree), &rows)?;
//! assert_eq!(cursor.len(), 1);
//! assert_eq!(cursor.child("Children")?.len(), 2);
//! # Ok::<(), rowtree_core::Error>(())
//! ```

pub mod arranged;
pub mod config;
pub mod cursor;
pub mod error;
pub mod join;

pub use arranged::{ArrangedRecord, ArrangedSet, Fields};
pub use config::{JoinConfig, JoinMatching};
pub use cursor::{Cursor, CursorDecorator, RecordCursor, SelectionCursor};
pub use error::{Error, Result};
pub use join::{
    canonical_name, ChildSpec, ColumnarJoin, JoinNode, JoinRegistry, JoinSpec, JoinStrategy,
    StrategyKind, TabularJoin,
};

/// Re-export boundary types.
pub use rowtree_proto as proto;
