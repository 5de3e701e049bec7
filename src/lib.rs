#![doc = include_str!("../README.md")]
#![warn(missing_docs)]
#![allow(clippy::module_inception)]

//! Crate root: wires the parser, structural model, comparator, auxiliary-file reconciler, and
//! Dataplane client into the [`sync::Synchronizer`] public entry point.

pub mod aux;
pub mod client;
pub mod compare;
pub mod error;
pub mod model;
pub mod operation;
pub mod parser;
pub mod sync;

pub use aux::{compare_by_content, compare_certificates, AuxDiff, AuxOpKind, AuxOperation, FileKind};
pub use client::{DataplaneClientConfig, DataplaneTransport, HttpDataplaneClient};
pub use compare::{compare, Diff, DiffSummary};
pub use error::{Error, ErrorKind, Result};
pub use model::StructuredConfig;
pub use operation::{OpKind, Operation, ParentRef, Payload};
pub use parser::{parse, ParseDiagnostic};
pub use sync::{SyncContext, SyncOptions, SyncOutcome, SyncPolicy, SyncResult, Synchronizer};
