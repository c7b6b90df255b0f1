// src/jobs/mod.rs

//! Asynchronous job layer.
//!
//! - [`record`] defines [`JobId`], [`JobRecord`] and [`JobResult`], and
//!   enforces the forward-only status lifecycle.
//! - [`store`] keeps records in memory behind a `tokio::sync::RwLock`.
//! - [`dispatcher`] defines the [`JobDispatcher`] capability and the
//!   in-process [`LocalDispatcher`].
//! - [`reaper`] evicts finished jobs once their retention period passes.

pub mod dispatcher;
pub mod reaper;
pub mod record;
pub mod store;

pub use dispatcher::{DispatchFuture, DispatcherOptions, JobDispatcher, LocalDispatcher};
pub use reaper::spawn_reaper;
pub use record::{JobId, JobRecord, JobResult};
pub use store::JobStore;
