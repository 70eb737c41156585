//! CI/CD Fixer Dashboard Client Library
//!
//! This library provides a typed client for the CI/CD Fixer Agent backend
//! (pipeline failures, AI-suggested fixes, approval workflow, analytics)
//! together with the derived-metrics transforms the dashboard views render.

pub mod analytics;
pub mod client;
pub mod config;
pub mod errors;
pub mod models;

pub use analytics::FixStatistics;
pub use client::{AnalyticsOverview, FixerClient};
pub use config::Config;
pub use errors::{ClientError, Result};
pub use models::{
    DashboardSummary, EffectivenessMetrics, Failure, Fix, FixStatus, HealthStatus, PatternsReport,
    RepositoryProfile,
};
