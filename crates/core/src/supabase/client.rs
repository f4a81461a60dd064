//! Client for the hosted backend (PostgREST over HTTPS)

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

use super::types::*;
use crate::dna::{Baseline, PartialBaseline};
use crate::error::{Error, Result};
use crate::metrics::{BoutMeta, FightId, FightStatus, NormalizedFightMetric, RawRoundStat};
use crate::recommend::{ProfileScalars, RankedFight};
use crate::store::FightStore;
use crate::votes::{FightListing, Vote, VoteType};

const RATINGS_EMBED: &str = "fight_ratings(likes_count,dislikes_count,favorites_count)";

pub struct SupabaseClient {
    client: Client,
    base_url: String,
    api_key: String,
    access_token: Option<String>,
}

impl SupabaseClient {
    /// `base_url` is the project URL, e.g. `https://<ref>.supabase.co`
    pub fn new(base_url: &str, api_key: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            access_token: None,
        })
    }

    /// Act as a signed-in user so row-level policies apply to their votes
    pub fn with_access_token(mut self, token: String) -> Self {
        self.access_token = Some(token);
        self
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        if let Ok(value) = HeaderValue::from_str(&self.api_key) {
            headers.insert("apikey", value);
        }
        let bearer = self.access_token.as_deref().unwrap_or(&self.api_key);
        if let Ok(value) = HeaderValue::from_str(&format!("Bearer {}", bearer)) {
            headers.insert(AUTHORIZATION, value);
        }

        headers
    }

    fn rest_url(&self, path: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, path)
    }

    async fn check(response: Response, what: &str) -> Result<Response> {
        if !response.status().is_success() {
            return Err(Error::Store(format!(
                "{} failed: {} - {}",
                what,
                response.status(),
                response.text().await.unwrap_or_default()
            )));
        }
        Ok(response)
    }

    async fn fetch_rows<T: DeserializeOwned>(&self, request: RequestBuilder, what: &str) -> Result<Vec<T>> {
        let response = Self::check(request.send().await?, what).await?;
        let rows: Vec<T> = response.json().await?;
        debug!("{} returned {} rows", what, rows.len());
        Ok(rows)
    }

    fn select(&self, table: &str, columns: &str) -> RequestBuilder {
        self.client
            .get(self.rest_url(table))
            .headers(self.headers())
            .query(&[("select", columns)])
    }
}

#[async_trait]
impl FightStore for SupabaseClient {
    async fn fetch_raw_round_stats(&self, event_names: &[String]) -> Result<Vec<RawRoundStat>> {
        if event_names.is_empty() {
            return Ok(Vec::new());
        }
        let request = self
            .select("round_fight_stats", "*")
            .query(&[("event_name", in_filter(event_names))]);
        self.fetch_rows(request, "round_fight_stats").await
    }

    async fn fetch_bout_meta(&self, event_names: &[String]) -> Result<Vec<BoutMeta>> {
        if event_names.is_empty() {
            return Ok(Vec::new());
        }
        let request = self
            .select("fight_meta_details", "event_name,bout,round,time,method")
            .query(&[("event_name", in_filter(event_names))]);
        self.fetch_rows(request, "fight_meta_details").await
    }

    async fn fetch_precomputed_metrics(
        &self,
        fight_ids: &[FightId],
        status: FightStatus,
    ) -> Result<Vec<NormalizedFightMetric>> {
        if fight_ids.is_empty() {
            return Ok(Vec::new());
        }
        let request = self.select("fight_dna_metrics", "*").query(&[
            ("fight_id", in_filter(fight_ids)),
            ("status", format!("eq.{}", status.as_str())),
        ]);
        let rows: Vec<PrecomputedMetricRow> = self.fetch_rows(request, "fight_dna_metrics").await?;
        Ok(rows
            .into_iter()
            .filter_map(|row| {
                let fight_id = row.fight_id.clone();
                let metric = row.into_metric();
                if metric.is_none() {
                    warn!(fight_id = %fight_id, "Excluding precomputed row with missing duration or rates");
                }
                metric
            })
            .collect())
    }

    async fn fetch_baseline(&self) -> Result<Option<Baseline>> {
        let request = self.select("ufc_baselines", "*").query(&[("limit", "1")]);
        let rows: Vec<PartialBaseline> = self.fetch_rows(request, "ufc_baselines").await?;
        Ok(rows.into_iter().next().map(Baseline::from_partial))
    }

    async fn fetch_community_favorites(&self, limit: u32) -> Result<Vec<FightListing>> {
        let request = self
            .select(
                "fight_ratings",
                "likes_count,dislikes_count,favorites_count,fights!inner(*)",
            )
            .query(&[
                ("order", "favorites_count.desc,likes_count.desc,dislikes_count.asc".to_string()),
                ("limit", limit.to_string()),
            ]);
        let rows: Vec<RatingRow> = self.fetch_rows(request, "community favorites").await?;
        Ok(rows.into_iter().filter_map(RatingRow::into_listing).collect())
    }

    async fn request_style_recommendations(
        &self,
        user_id: &str,
        scalars: &ProfileScalars,
    ) -> Result<Vec<RankedFight>> {
        let request = self
            .client
            .post(self.rest_url("rpc/get_fight_recommendations"))
            .headers(self.headers())
            .json(&RecommendationArgs::new(user_id, scalars));
        let rows: Vec<RecommendationRow> = self.fetch_rows(request, "get_fight_recommendations").await?;
        Ok(rows.into_iter().map(RankedFight::from).collect())
    }

    async fn cast_vote(&self, user_id: &str, fight_id: &str, vote: Option<VoteType>) -> Result<()> {
        let request = match vote {
            None => self
                .client
                .delete(self.rest_url("user_votes"))
                .headers(self.headers())
                .query(&[
                    ("user_id", format!("eq.{}", user_id)),
                    ("fight_id", format!("eq.{}", fight_id)),
                ]),
            Some(vote_type) => self
                .client
                .post(self.rest_url("user_votes"))
                .headers(self.headers())
                .header(CONTENT_TYPE, "application/json")
                .header("Prefer", "resolution=merge-duplicates")
                .json(&VoteUpsert {
                    user_id,
                    fight_id,
                    vote_type,
                }),
        };

        Self::check(request.send().await?, "user_votes write").await?;
        debug!(user_id, fight_id, vote = ?vote, "Vote stored");
        Ok(())
    }

    async fn fetch_user_votes(&self, user_id: &str) -> Result<Vec<Vote>> {
        let request = self
            .select("user_votes", "user_id,fight_id,vote_type")
            .query(&[("user_id", format!("eq.{}", user_id))]);
        self.fetch_rows(request, "user_votes").await
    }

    async fn fetch_fights(&self, fight_ids: &[FightId]) -> Result<Vec<FightListing>> {
        if fight_ids.is_empty() {
            return Ok(Vec::new());
        }
        let request = self
            .select("fights", &format!("*,{}", RATINGS_EMBED))
            .query(&[("id", in_filter(fight_ids))]);
        let rows: Vec<FightRow> = self.fetch_rows(request, "fights").await?;
        Ok(rows.into_iter().map(FightListing::from).collect())
    }
}
