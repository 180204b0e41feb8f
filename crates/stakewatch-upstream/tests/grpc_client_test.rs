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
//! gRPC client against an in-process node serving the Cosmos query services

#![allow(clippy::unwrap_used)]

use stakewatch_upstream::governance::GOV_V1_CONVERSION_MARKER;
use stakewatch_upstream::proto::{
    Coin, DecCoin, PageRequest, PageResponse, Pool, ProposalId, QueryAnnualProvisionsRequest,
    QueryAnnualProvisionsResponse, QueryCommunityPoolRequest, QueryCommunityPoolResponse,
    QueryInflationRequest, QueryInflationResponse, QueryPoolRequest, QueryPoolResponse,
    QueryProposalsRequest, QueryProposalsResponse, QueryTotalSupplyRequest,
    QueryTotalSupplyResponse,
};
use stakewatch_upstream::{
    voting_period_proposals, ChainQueries, DenomAmount, GovSchema, GrpcChainClient, Paging,
    ProposalStatus, UpstreamError,
};
use std::convert::Infallible;
use std::marker::PhantomData;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::body::BoxBody;
use tonic::codec::ProstCodec;
use tonic::codegen::{empty_body, http, Body, BoxFuture, Service, StdError};
use tonic::server::{Grpc, NamedService};
use tonic::transport::Server;
use tonic::{Code, Status};

const TOTAL_SUPPLY: &str = "/cosmos.bank.v1beta1.Query/TotalSupply";
const GOV_V1BETA1: &str = "/cosmos.gov.v1beta1.Query/Proposals";
const GOV_V1: &str = "/cosmos.gov.v1.Query/Proposals";

/// One request as the node saw it
#[derive(Debug, Clone, PartialEq)]
struct Served {
    path: &'static str,
    page_key: Vec<u8>,
    limit: u64,
}

/// Scripted node state shared by every mounted query service
#[derive(Default)]
struct FakeNode {
    supply_pages: Vec<Vec<Coin>>,
    proposal_pages: Vec<Vec<u64>>,
    v1beta1_failure: Option<(Code, String)>,
    inflation: Vec<u8>,
    annual_provisions: Vec<u8>,
    served: Mutex<Vec<Served>>,
}

impl FakeNode {
    fn served(&self) -> Vec<Served> {
        self.served.lock().unwrap().clone()
    }

    fn record(&self, path: &'static str, pagination: &Option<PageRequest>) {
        let (page_key, limit) = pagination
            .as_ref()
            .map(|page| (page.key.clone(), page.limit))
            .unwrap_or_default();
        self.served.lock().unwrap().push(Served {
            path,
            page_key,
            limit,
        });
    }

    fn total_supply(
        &self,
        request: QueryTotalSupplyRequest,
    ) -> Result<QueryTotalSupplyResponse, Status> {
        self.record(TOTAL_SUPPLY, &request.pagination);
        let (supply, pagination) = page(&self.supply_pages, request.pagination);
        Ok(QueryTotalSupplyResponse { supply, pagination })
    }

    fn proposals(
        &self,
        path: &'static str,
        request: QueryProposalsRequest,
    ) -> Result<QueryProposalsResponse, Status> {
        self.record(path, &request.pagination);
        if request.proposal_status != ProposalStatus::VotingPeriod as i32 {
            return Err(Status::invalid_argument("unexpected proposal status filter"));
        }
        if path == GOV_V1BETA1 {
            if let Some((code, message)) = &self.v1beta1_failure {
                return Err(Status::new(*code, message.clone()));
            }
        }

        let (ids, pagination) = page(&self.proposal_pages, request.pagination);
        Ok(QueryProposalsResponse {
            proposals: ids.into_iter().map(|id| ProposalId { id }).collect(),
            pagination,
        })
    }
}

/// Serve page `key` of `pages`; keys are the page index in decimal
fn page<T: Clone>(
    pages: &[Vec<T>],
    request: Option<PageRequest>,
) -> (Vec<T>, Option<PageResponse>) {
    let key = request.map(|page| page.key).unwrap_or_default();
    let index: usize = if key.is_empty() {
        0
    } else {
        String::from_utf8(key).unwrap().parse().unwrap()
    };

    let entries = pages.get(index).cloned().unwrap_or_default();
    let next_key = if index + 1 < pages.len() {
        (index + 1).to_string().into_bytes()
    } else {
        Vec::new()
    };
    (entries, Some(PageResponse { next_key, total: 0 }))
}

async fn unary<Req, Resp, B, F>(request: http::Request<B>, mut handler: F) -> http::Response<BoxBody>
where
    Req: prost::Message + Default + Send + 'static,
    Resp: prost::Message + Send + 'static,
    B: Body + Send + 'static,
    B::Error: Into<StdError> + Send + 'static,
    F: FnMut(Req) -> Result<Resp, Status> + Send + 'static,
{
    let method = tower::service_fn(move |request: tonic::Request<Req>| {
        std::future::ready(handler(request.into_inner()).map(tonic::Response::new))
    });
    let mut grpc = Grpc::new(ProstCodec::<Resp, Req>::default());
    grpc.unary(method, request).await
}

async fn dispatch<B>(node: Arc<FakeNode>, request: http::Request<B>) -> http::Response<BoxBody>
where
    B: Body + Send + 'static,
    B::Error: Into<StdError> + Send + 'static,
{
    match request.uri().path() {
        TOTAL_SUPPLY => {
            unary(request, move |r: QueryTotalSupplyRequest| node.total_supply(r)).await
        }
        GOV_V1BETA1 => {
            unary(request, move |r: QueryProposalsRequest| {
                node.proposals(GOV_V1BETA1, r)
            })
            .await
        }
        GOV_V1 => {
            unary(request, move |r: QueryProposalsRequest| node.proposals(GOV_V1, r)).await
        }
        "/cosmos.mint.v1beta1.Query/Inflation" => {
            unary(request, move |_: QueryInflationRequest| {
                Ok(QueryInflationResponse {
                    inflation: node.inflation.clone(),
                })
            })
            .await
        }
        "/cosmos.mint.v1beta1.Query/AnnualProvisions" => {
            unary(request, move |_: QueryAnnualProvisionsRequest| {
                Ok(QueryAnnualProvisionsResponse {
                    annual_provisions: node.annual_provisions.clone(),
                })
            })
            .await
        }
        "/cosmos.staking.v1beta1.Query/Pool" => {
            unary(request, |_: QueryPoolRequest| {
                Ok(QueryPoolResponse {
                    pool: Some(Pool {
                        not_bonded_tokens: "12000000000000".to_string(),
                        bonded_tokens: "250000000000000".to_string(),
                    }),
                })
            })
            .await
        }
        "/cosmos.distribution.v1beta1.Query/CommunityPool" => {
            unary(request, |_: QueryCommunityPoolRequest| {
                Ok(QueryCommunityPoolResponse {
                    pool: vec![DecCoin {
                        denom: "uatom".to_string(),
                        amount: "1500000000000000000000000".to_string(),
                    }],
                })
            })
            .await
        }
        _ => http::Response::builder()
            .status(200)
            .header("grpc-status", (Code::Unimplemented as i32).to_string())
            .header("content-type", "application/grpc")
            .body(empty_body())
            .unwrap(),
    }
}

trait QueryModule: Send + Sync + 'static {
    const NAME: &'static str;
}

struct Bank;
struct Mint;
struct Staking;
struct Distribution;
struct GovV1Beta1;
struct GovV1;

impl QueryModule for Bank {
    const NAME: &'static str = "cosmos.bank.v1beta1.Query";
}
impl QueryModule for Mint {
    const NAME: &'static str = "cosmos.mint.v1beta1.Query";
}
impl QueryModule for Staking {
    const NAME: &'static str = "cosmos.staking.v1beta1.Query";
}
impl QueryModule for Distribution {
    const NAME: &'static str = "cosmos.distribution.v1beta1.Query";
}
impl QueryModule for GovV1Beta1 {
    const NAME: &'static str = "cosmos.gov.v1beta1.Query";
}
impl QueryModule for GovV1 {
    const NAME: &'static str = "cosmos.gov.v1.Query";
}

/// A query service mounted under `M::NAME`, answering from the shared node
struct Mounted<M> {
    node: Arc<FakeNode>,
    module: PhantomData<fn() -> M>,
}

impl<M> Mounted<M> {
    fn new(node: &Arc<FakeNode>) -> Self {
        Self {
            node: Arc::clone(node),
            module: PhantomData,
        }
    }
}

impl<M> Clone for Mounted<M> {
    fn clone(&self) -> Self {
        Self::new(&self.node)
    }
}

impl<M: QueryModule> NamedService for Mounted<M> {
    const NAME: &'static str = M::NAME;
}

impl<M, B> Service<http::Request<B>> for Mounted<M>
where
    M: QueryModule,
    B: Body + Send + 'static,
    B::Error: Into<StdError> + Send + 'static,
{
    type Response = http::Response<BoxBody>;
    type Error = Infallible;
    type Future = BoxFuture<Self::Response, Self::Error>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: http::Request<B>) -> Self::Future {
        let node = Arc::clone(&self.node);
        Box::pin(async move { Ok(dispatch(node, request).await) })
    }
}

/// Serve `node` on an ephemeral port and return a client for it
async fn spawn(node: FakeNode, paging: Paging) -> (GrpcChainClient, Arc<FakeNode>) {
    let node = Arc::new(node);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let router = Server::builder()
        .add_service(Mounted::<Bank>::new(&node))
        .add_service(Mounted::<Mint>::new(&node))
        .add_service(Mounted::<Staking>::new(&node))
        .add_service(Mounted::<Distribution>::new(&node))
        .add_service(Mounted::<GovV1Beta1>::new(&node))
        .add_service(Mounted::<GovV1>::new(&node));
    tokio::spawn(async move {
        router
            .serve_with_incoming(TcpListenerStream::new(listener))
            .await
            .unwrap();
    });

    let client =
        GrpcChainClient::connect_lazy(&format!("http://{addr}"), Duration::from_secs(5), paging)
            .unwrap();
    (client, node)
}

fn coin(denom: &str, amount: &str) -> Coin {
    Coin {
        denom: denom.to_string(),
        amount: amount.to_string(),
    }
}

fn paging(page_limit: u64, max_pages: usize) -> Paging {
    Paging {
        page_limit,
        max_pages,
    }
}

#[tokio::test]
async fn test_total_supply_follows_next_key() {
    let node = FakeNode {
        supply_pages: vec![
            vec![coin("ibc/27394FB0", "5"), coin("uatom", "390000000000000")],
            vec![coin("uosmo", "7")],
        ],
        ..Default::default()
    };
    let (client, node) = spawn(node, paging(2, 50)).await;

    let supply = client.total_supply().await.unwrap();
    assert_eq!(
        supply,
        vec![
            DenomAmount::new("ibc/27394FB0", "5"),
            DenomAmount::new("uatom", "390000000000000"),
            DenomAmount::new("uosmo", "7"),
        ]
    );

    let served = node.served();
    assert_eq!(served.len(), 2);
    assert!(served[0].page_key.is_empty());
    assert_eq!(served[1].page_key, b"1".to_vec());
    assert!(served.iter().all(|s| s.path == TOTAL_SUPPLY && s.limit == 2));
}

#[tokio::test]
async fn test_total_supply_stops_at_max_pages() {
    let node = FakeNode {
        supply_pages: vec![
            vec![coin("uatom", "1")],
            vec![coin("uatom", "2")],
            vec![coin("uatom", "3")],
        ],
        ..Default::default()
    };
    let (client, node) = spawn(node, paging(1, 1)).await;

    let supply = client.total_supply().await.unwrap();
    assert_eq!(supply, vec![DenomAmount::new("uatom", "1")]);
    assert_eq!(node.served().len(), 1);
}

#[tokio::test]
async fn test_gov_conversion_status_falls_back_to_v1() {
    let node = FakeNode {
        proposal_pages: vec![vec![101, 102], vec![103]],
        v1beta1_failure: Some((
            Code::Unknown,
            format!("invalid type: {GOV_V1_CONVERSION_MARKER}: unknown request"),
        )),
        ..Default::default()
    };
    let (client, node) = spawn(node, Paging::default()).await;

    assert_eq!(voting_period_proposals(&client).await.unwrap(), 3);

    let paths: Vec<_> = node.served().into_iter().map(|s| s.path).collect();
    assert_eq!(paths, vec![GOV_V1BETA1, GOV_V1, GOV_V1]);
}

#[tokio::test]
async fn test_gov_v1beta1_answer_skips_v1() {
    let node = FakeNode {
        proposal_pages: vec![vec![7]],
        ..Default::default()
    };
    let (client, node) = spawn(node, Paging::default()).await;

    assert_eq!(voting_period_proposals(&client).await.unwrap(), 1);
    assert!(node.served().iter().all(|s| s.path == GOV_V1BETA1));
}

#[tokio::test]
async fn test_node_status_maps_to_upstream_error() {
    let node = FakeNode {
        proposal_pages: vec![vec![1]],
        v1beta1_failure: Some((Code::Unavailable, "node is catching up".to_string())),
        ..Default::default()
    };
    let (client, node) = spawn(node, Paging::default()).await;

    match client
        .proposals(GovSchema::V1Beta1, ProposalStatus::VotingPeriod)
        .await
    {
        Err(UpstreamError::Status { code, message }) => {
            assert_eq!(code, Code::Unavailable);
            assert_eq!(message, "node is catching up");
        }
        other => panic!("unexpected result: {other:?}"),
    }

    // Not the conversion error, so no second schema is tried
    assert!(voting_period_proposals(&client).await.is_err());
    assert!(node.served().iter().all(|s| s.path == GOV_V1BETA1));
}

#[tokio::test]
async fn test_mint_dec_bytes_are_converted() {
    let node = FakeNode {
        inflation: b"130000000000000000".to_vec(),
        annual_provisions: b"39000000000000000000000000000000".to_vec(),
        ..Default::default()
    };
    let (client, _node) = spawn(node, Paging::default()).await;

    assert_eq!(client.inflation().await.unwrap(), "0.130000000000000000");
    assert_eq!(
        client.annual_provisions().await.unwrap(),
        "39000000000000.000000000000000000"
    );
}

#[tokio::test]
async fn test_staking_and_community_pool() {
    let (client, _node) = spawn(FakeNode::default(), Paging::default()).await;

    let pool = client.staking_pool().await.unwrap();
    assert_eq!(pool.bonded_tokens, "250000000000000");
    assert_eq!(pool.not_bonded_tokens, "12000000000000");

    assert_eq!(
        client.community_pool().await.unwrap(),
        vec![DenomAmount::new("uatom", "1500000.000000000000000000")]
    );
}
