//! Aggregation core: the treasury, governance and community aggregators,
//! the analytics engine composing them, and the operation dispatcher.

pub mod analytics;
pub mod community;
pub mod dispatch;
pub mod governance;
pub mod treasury;

pub use analytics::AnalyticsEngine;
pub use community::CommunityAggregator;
pub use dispatch::{OperationDispatcher, OperationRequest};
pub use governance::GovernanceAggregator;
pub use treasury::TreasuryAggregator;
