//! Scoring engines for MSME financial health.
//!
//! Two independent pipelines share this namespace: invoice-driven credit
//! scoring and insurance risk assessment with cover recommendations.

pub mod credit;
pub mod insurance;

use serde::{Deserialize, Serialize};

/// Identifier for the business owner all scoring data hangs off.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);
