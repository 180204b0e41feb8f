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
//! Voting-period proposal count across gov module versions.
//!
//! Nodes running Cosmos SDK 0.46+ store `gov/v1` proposals and refuse to
//! serve some of them through the `v1beta1` service. That refusal is the
//! signal to ask the `v1` service instead; any other failure ends the probe.

use crate::error::{UpstreamError, UpstreamResult};
use crate::proto::ProposalStatus;
use crate::ChainQueries;
use tracing::{debug, info};

/// Message fragment a `v1beta1` endpoint returns for proposals it cannot convert
pub const GOV_V1_CONVERSION_MARKER: &str = "can't convert a gov/v1 Proposal to gov/v1beta1 Proposal";

/// Gov module query service version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GovSchema {
    /// `cosmos.gov.v1beta1`
    V1Beta1,
    /// `cosmos.gov.v1`
    V1,
}

impl GovSchema {
    /// Probe order
    pub const PROBE_ORDER: [GovSchema; 2] = [GovSchema::V1Beta1, GovSchema::V1];

    /// gRPC method path of the `Proposals` query
    pub fn path(self) -> &'static str {
        match self {
            GovSchema::V1Beta1 => "/cosmos.gov.v1beta1.Query/Proposals",
            GovSchema::V1 => "/cosmos.gov.v1.Query/Proposals",
        }
    }

    /// Schema to try when this one reports the conversion error
    pub fn fallback(self) -> Option<GovSchema> {
        match self {
            GovSchema::V1Beta1 => Some(GovSchema::V1),
            GovSchema::V1 => None,
        }
    }

    /// Short name for logs
    pub fn as_str(self) -> &'static str {
        match self {
            GovSchema::V1Beta1 => "v1beta1",
            GovSchema::V1 => "v1",
        }
    }
}

/// Result of asking one schema
#[derive(Debug)]
pub enum ProbeOutcome {
    /// The schema answered
    Counted(usize),
    /// The node speaks the newer schema
    Retry(GovSchema),
    /// Nothing more to try
    Fatal(UpstreamError),
}

/// Classify the result of querying with `schema`
pub fn classify(schema: GovSchema, result: UpstreamResult<usize>) -> ProbeOutcome {
    match result {
        Ok(count) => ProbeOutcome::Counted(count),
        Err(err) => match schema.fallback() {
            Some(next) if err.to_string().contains(GOV_V1_CONVERSION_MARKER) => {
                ProbeOutcome::Retry(next)
            }
            _ => ProbeOutcome::Fatal(err),
        },
    }
}

/// Number of proposals currently in voting period
pub async fn voting_period_proposals(chain: &dyn ChainQueries) -> UpstreamResult<usize> {
    let mut schema = GovSchema::V1Beta1;
    loop {
        let result = chain.proposals(schema, ProposalStatus::VotingPeriod).await;
        match classify(schema, result) {
            ProbeOutcome::Counted(count) => {
                debug!(schema = schema.as_str(), count, "Counted voting period proposals");
                return Ok(count);
            }
            ProbeOutcome::Retry(next) => {
                info!(
                    from = schema.as_str(),
                    to = next.as_str(),
                    "Node serves gov/v1 proposals, retrying with newer schema"
                );
                schema = next;
            }
            ProbeOutcome::Fatal(err) => return Err(err),
        }
    }
}
