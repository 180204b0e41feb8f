// Copyright (C) 2026  winnyboy5
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.
//! Fan-out collection of the general chain metrics
//!
//! One scrape launches every [`QueryKind`] as its own task on a
//! [`JoinSet`] and waits for all of them. A task that fails, times out or
//! panics only affects its own slots; siblings run to completion.

use stakewatch_upstream::{
    voting_period_proposals, DenomAmount, UpstreamError, UpstreamResult, Upstreams,
};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinSet;
use tracing::{debug, error, warn, Instrument};

use crate::registry::ScrapeRegistry;
use crate::types::{Metric, QueryKind, ScrapeSettings};

/// Collector for the general chain metrics
#[derive(Clone)]
pub struct GeneralCollector {
    upstreams: Upstreams,
    settings: Arc<ScrapeSettings>,
}

impl GeneralCollector {
    /// Create a collector over `upstreams`
    pub fn new(upstreams: Upstreams, settings: ScrapeSettings) -> Self {
        Self {
            upstreams,
            settings: Arc::new(settings),
        }
    }

    /// Settings shared by every scrape
    pub fn settings(&self) -> &ScrapeSettings {
        &self.settings
    }

    /// Queries launched per scrape
    pub fn queries(&self) -> Vec<QueryKind> {
        QueryKind::ALL
            .into_iter()
            .filter(|kind| *kind != QueryKind::TokenPrice || self.upstreams.price.is_some())
            .collect()
    }

    /// Run one scrape into a fresh registry
    pub async fn scrape(&self) -> ScrapeRegistry {
        let registry = ScrapeRegistry::new();
        self.collect_into(&registry).await;
        registry
    }

    /// Run one scrape, writing into `registry` as results arrive
    pub async fn collect_into(&self, registry: &ScrapeRegistry) {
        let started = Instant::now();
        let mut tasks = JoinSet::new();
        let mut pending: HashSet<QueryKind> = HashSet::new();

        for kind in self.queries() {
            let task = run_query(
                kind,
                self.upstreams.clone(),
                Arc::clone(&self.settings),
                registry.clone(),
            );
            tasks.spawn(task.in_current_span());
            pending.insert(kind);
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(kind) => {
                    pending.remove(&kind);
                }
                Err(err) => error!(error = %err, "Query task aborted"),
            }
        }

        // Tasks that never returned their kind panicked
        for kind in pending {
            record_failure(registry, kind);
        }

        let request_time = started.elapsed().as_secs_f64();
        registry.set(Metric::ScrapeDuration, request_time);
        debug!(request_time, slots = registry.len(), "Collected general metrics");
    }
}

async fn run_query(
    kind: QueryKind,
    upstreams: Upstreams,
    settings: Arc<ScrapeSettings>,
    registry: ScrapeRegistry,
) -> QueryKind {
    let started = Instant::now();
    debug!(query = kind.as_label(), "Started querying");

    let outcome = match tokio::time::timeout(
        settings.query_timeout,
        execute(kind, &upstreams, &settings, &registry),
    )
    .await
    {
        Ok(result) => result,
        Err(_) => Err(UpstreamError::Timeout(settings.query_timeout)),
    };

    let request_time = started.elapsed().as_secs_f64();
    match outcome {
        Ok(()) => {
            registry.set_labeled(Metric::QuerySuccess, &[kind.as_label()], 1.0);
            debug!(query = kind.as_label(), request_time, "Finished querying");
        }
        Err(err) => {
            record_failure(&registry, kind);
            error!(query = kind.as_label(), request_time, error = %err, "Could not complete query");
        }
    }
    kind
}

fn record_failure(registry: &ScrapeRegistry, kind: QueryKind) {
    registry.set_labeled(Metric::QuerySuccess, &[kind.as_label()], 0.0);
    if let Some((metric, value)) = kind.failure_sentinel() {
        registry.set(metric, value);
    }
}

async fn execute(
    kind: QueryKind,
    upstreams: &Upstreams,
    settings: &ScrapeSettings,
    registry: &ScrapeRegistry,
) -> UpstreamResult<()> {
    match kind {
        QueryKind::BlockHeight => {
            let height = upstreams.status.latest_block_height().await?;
            registry.set(Metric::LatestBlockHeight, height as f64);
        }
        QueryKind::TokenPrice => {
            let price = upstreams
                .price
                .as_ref()
                .ok_or_else(|| UpstreamError::Config("price lookup disabled".to_string()))?;
            let usd = price.price_usd(&settings.chain_id).await?;
            registry.set(Metric::TokenPrice, usd);
        }
        QueryKind::StakingPool => {
            let pool = upstreams.chain.staking_pool().await?;
            let bonded = parse_amount(&pool.bonded_tokens)?;
            let not_bonded = parse_amount(&pool.not_bonded_tokens)?;
            registry.set(Metric::BondedTokens, settings.denominate(bonded));
            registry.set(Metric::NotBondedTokens, settings.denominate(not_bonded));
        }
        QueryKind::CommunityPool => {
            let pool = upstreams.chain.community_pool().await?;
            write_collection(Metric::CommunityPool, &pool, settings, registry);
        }
        QueryKind::TotalSupply => {
            let supply = upstreams.chain.total_supply().await?;
            write_collection(Metric::SupplyTotal, &supply, settings, registry);
        }
        QueryKind::Inflation => {
            let inflation = parse_amount(&upstreams.chain.inflation().await?)?;
            registry.set(Metric::Inflation, inflation);
        }
        QueryKind::AnnualProvisions => {
            let provisions = parse_amount(&upstreams.chain.annual_provisions().await?)?;
            registry.set_labeled(
                Metric::AnnualProvisions,
                &[settings.denom.as_str()],
                settings.denominate(provisions),
            );
        }
        QueryKind::GovProposals => {
            let count = voting_period_proposals(upstreams.chain.as_ref()).await?;
            registry.set(Metric::GovVotingPeriodProposals, count as f64);
        }
    }
    Ok(())
}

/// Write each entry under the display denom; unparseable entries are skipped
fn write_collection(
    metric: Metric,
    entries: &[DenomAmount],
    settings: &ScrapeSettings,
    registry: &ScrapeRegistry,
) {
    for entry in entries {
        if let Some(base_denom) = settings.base_denom.as_deref() {
            if entry.denom != base_denom {
                debug!(metric = metric.name(), denom = %entry.denom, "Skipping foreign denom");
                continue;
            }
        }

        match parse_amount(&entry.amount) {
            Ok(amount) => registry.set_labeled(
                metric,
                &[settings.denom.as_str()],
                settings.denominate(amount),
            ),
            Err(err) => warn!(
                metric = metric.name(),
                denom = %entry.denom,
                error = %err,
                "Could not parse amount, skipping entry"
            ),
        }
    }
}

fn parse_amount(raw: &str) -> UpstreamResult<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| UpstreamError::InvalidDecimal(raw.to_string()))
}
