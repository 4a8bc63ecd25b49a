//! Reading acquisition and reconciliation

pub mod parser;
pub mod reconcile;
pub mod telemetry;

pub use parser::PayloadParser;
pub use reconcile::{reconcile, CameraIntent, ReconciliationEngine, StateChange, Transition};
pub use telemetry::TelemetryClient;
