//! Core types and utilities for Hovertip.
//!
//! This crate decides *when* a hover tooltip should appear, independent of
//! any UI toolkit:
//!
//! - **policy**: Adaptive delay between the cold and warm regimes
//! - **scheduler**: Pending request, single background waiter, hover capability
//! - **request**: Element identity and lazily computed tooltip content
//! - **sink**: Rendering contract and the idempotent [`TooltipSlot`]
//! - **config**: Delay settings and behavior switches
//! - **state**: Application state owning the waiter runtime
//! - **logging**: Structured logging setup

pub mod config;
pub mod error;
pub mod logging;
pub mod policy;
pub mod request;
pub mod scheduler;
pub mod sink;
pub mod state;

#[cfg(test)]
mod verification_tests;

pub use config::{LeavePolicy, ReenterPolicy, ShownRecording, TooltipBehavior, TooltipConfig};
pub use error::HovertipError;
pub use policy::DelayPolicy;
pub use request::{content_fn, ContentFn, TargetId, TooltipContent, TooltipPosition, TooltipRequest};
pub use scheduler::{HoverTarget, SchedulerStats, TooltipHandle, TooltipScheduler};
pub use sink::{RenderSink, TooltipSlot};
pub use state::HovertipState;
