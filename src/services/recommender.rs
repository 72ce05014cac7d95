use crate::core::Ranker;
use crate::models::{Category, ScoredVendor};
use crate::services::{SessionContext, VendorSource};
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecommendError {
    /// Reading from the data store failed; distinct from an empty ranking
    #[error("Failed to fetch {resource}: {source}")]
    FetchFailed {
        resource: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl RecommendError {
    fn fetch_failed<E>(resource: &'static str, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        RecommendError::FetchFailed {
            resource,
            source: Box::new(source),
        }
    }
}

/// Parameters of a flat ranking request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VendorQuery {
    pub category: Option<Category>,
    pub limit: Option<usize>,
    pub exclude_ids: Vec<String>,
}

/// Fetches vendors once per request and ranks them locally
pub struct Recommender<S> {
    source: Arc<S>,
    ranker: Ranker,
}

impl<S> Clone for Recommender<S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            ranker: self.ranker.clone(),
        }
    }
}

impl<S: VendorSource> Recommender<S> {
    pub fn new(source: Arc<S>, ranker: Ranker) -> Self {
        Self { source, ranker }
    }

    pub fn ranker(&self) -> &Ranker {
        &self.ranker
    }

    /// Load the signed-in user's profile into the session
    ///
    /// No-op for anonymous sessions or when a profile is already present.
    /// A user without a profile row keeps `profile == None`.
    pub async fn resolve_profile(&self, session: &mut SessionContext) -> Result<(), RecommendError> {
        if session.profile.is_some() {
            return Ok(());
        }
        let Some(user_id) = session.user_id.as_deref() else {
            return Ok(());
        };

        let profile = self
            .source
            .fetch_user_profile(user_id)
            .await
            .map_err(|e| RecommendError::fetch_failed("profile", e))?;

        if profile.is_none() {
            tracing::debug!("No profile found for user {}", user_id);
        }

        session.profile = profile;
        Ok(())
    }

    /// Flat top-N ranking for the session
    pub async fn recommend(
        &self,
        session: &SessionContext,
        query: &VendorQuery,
    ) -> Result<Vec<ScoredVendor>, RecommendError> {
        let categories: Vec<Category> = query.category.into_iter().collect();

        let vendors = self
            .source
            .fetch_approved_vendors(&categories)
            .await
            .map_err(|e| RecommendError::fetch_failed("vendors", e))?;

        let ranked = self.ranker.rank(
            &vendors,
            session.profile.as_ref(),
            query.category,
            query.limit,
            &query.exclude_ids,
        );

        tracing::debug!(
            "Ranked {} of {} vendors (category: {:?})",
            ranked.len(),
            vendors.len(),
            query.category
        );

        Ok(ranked)
    }

    /// Per-category top-N ranking for the session
    pub async fn recommend_by_category(
        &self,
        session: &SessionContext,
        categories: &[Category],
        limit: Option<usize>,
    ) -> Result<BTreeMap<Category, Vec<ScoredVendor>>, RecommendError> {
        let vendors = if categories.is_empty() {
            Vec::new()
        } else {
            self.source
                .fetch_approved_vendors(categories)
                .await
                .map_err(|e| RecommendError::fetch_failed("vendors", e))?
        };

        Ok(self
            .ranker
            .rank_by_category(&vendors, session.profile.as_ref(), categories, limit))
    }
}

/// Client-side ranking that survives failed refreshes
///
/// A refresh that fails to fetch reports the error and keeps the previous
/// ranking in place.
pub struct RecommendationFeed<S> {
    recommender: Recommender<S>,
    query: VendorQuery,
    current: Option<Vec<ScoredVendor>>,
}

impl<S: VendorSource> RecommendationFeed<S> {
    pub fn new(recommender: Recommender<S>, query: VendorQuery) -> Self {
        Self {
            recommender,
            query,
            current: None,
        }
    }

    /// Last successful ranking, if any
    pub fn current(&self) -> Option<&[ScoredVendor]> {
        self.current.as_deref()
    }

    pub async fn refresh(
        &mut self,
        session: &SessionContext,
    ) -> Result<&[ScoredVendor], RecommendError> {
        match self.recommender.recommend(session, &self.query).await {
            Ok(ranked) => Ok(self.current.insert(ranked).as_slice()),
            Err(e) => {
                tracing::warn!("Keeping previous ranking after failed refresh: {}", e);
                Err(e)
            }
        }
    }
}
