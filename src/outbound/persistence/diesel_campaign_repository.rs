//! PostgreSQL-backed `CampaignRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::Campaign;
use crate::domain::ports::{CampaignRepository, CampaignRepositoryError};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{CampaignRow, NewCampaignRow};
use super::pool::{DbPool, PoolError};
use super::schema::campaigns;

/// Diesel-backed implementation of the campaign repository port.
#[derive(Clone)]
pub struct DieselCampaignRepository {
    pool: DbPool,
}

impl DieselCampaignRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool(error: PoolError) -> CampaignRepositoryError {
    map_pool_error(error, CampaignRepositoryError::connection)
}

fn map_db_error(error: diesel::result::Error) -> CampaignRepositoryError {
    map_diesel_error(
        error,
        CampaignRepositoryError::query,
        CampaignRepositoryError::connection,
    )
}

fn row_to_campaign(row: CampaignRow) -> Campaign {
    Campaign {
        id: row.id,
        user_prompt: row.user_prompt,
        target_tags: row.target_tags,
        created_at: row.created_at,
        started_at: row.started_at,
        completed_at: row.completed_at,
    }
}

#[async_trait]
impl CampaignRepository for DieselCampaignRepository {
    async fn insert(&self, campaign: &Campaign) -> Result<Campaign, CampaignRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let new_row = NewCampaignRow {
            id: campaign.id,
            user_prompt: &campaign.user_prompt,
            target_tags: &campaign.target_tags,
            created_at: campaign.created_at,
            started_at: campaign.started_at,
            completed_at: campaign.completed_at,
        };

        let row = diesel::insert_into(campaigns::table)
            .values(&new_row)
            .returning(CampaignRow::as_returning())
            .get_result::<CampaignRow>(&mut conn)
            .await
            .map_err(map_db_error)?;

        Ok(row_to_campaign(row))
    }

    async fn list(&self) -> Result<Vec<Campaign>, CampaignRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let rows: Vec<CampaignRow> = campaigns::table
            .order((campaigns::created_at.desc(), campaigns::id.desc()))
            .select(CampaignRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_db_error)?;

        Ok(rows.into_iter().map(row_to_campaign).collect())
    }

    async fn count_active(&self) -> Result<i64, CampaignRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        campaigns::table
            .filter(campaigns::completed_at.is_null())
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_db_error)
    }
}
