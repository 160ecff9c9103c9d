//! Driving port for the dashboard overview.

use async_trait::async_trait;
use std::collections::BTreeMap;

use crate::domain::error::Error;
use crate::domain::overview::CrmOverview;

/// Driving port producing the point-in-time dashboard snapshot.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OverviewQuery: Send + Sync {
    /// Recompute the overview from current store state.
    async fn overview(&self) -> Result<CrmOverview, Error>;
}

/// Fixture implementation for handler tests: an empty store.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureOverviewQuery;

#[async_trait]
impl OverviewQuery for FixtureOverviewQuery {
    async fn overview(&self) -> Result<CrmOverview, Error> {
        Ok(CrmOverview {
            total_contacts: 0,
            active_campaigns: 0,
            stage_counts: BTreeMap::new(),
            tag_counts: BTreeMap::new(),
            recent_actions: Vec::new(),
            daily_action_counts: Vec::new(),
        })
    }
}
