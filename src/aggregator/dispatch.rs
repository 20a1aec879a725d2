//! Typed operation routing for the conversational layer and direct API
//! callers: `{service, method, params}` in, aggregator result out.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::{configuration::State, error::Error};

use super::{
    community::CommunityAggregator,
    governance::{GovernanceAggregator, DEFAULT_PROPOSAL_PAGE_LIMIT},
    treasury::TreasuryAggregator,
};

const DEFAULT_TRANSACTION_PAGE_LIMIT: i64 = 20;

#[derive(Debug, Clone, Deserialize)]
pub struct OperationRequest {
    pub service: String,
    pub method: String,
    #[serde(default)]
    pub params: Map<String, Value>,
}

fn str_param<'a>(
    params: &'a Map<String, Value>,
    name: &str,
) -> Result<&'a str, Error> {
    params
        .get(name)
        .and_then(Value::as_str)
        .ok_or_else(|| Error::MissingParams(name.to_owned()))
}

fn i64_param_or(
    params: &Map<String, Value>,
    name: &str,
    default: i64,
) -> i64 {
    params.get(name).and_then(Value::as_i64).unwrap_or(default)
}

pub struct OperationDispatcher<'a> {
    state: &'a State,
}

impl<'a> OperationDispatcher<'a> {
    pub fn new(state: &'a State) -> Self {
        Self { state }
    }

    /// Routes one operation to its aggregator. Unknown service or method
    /// names are contract bugs on the caller's side and fail fast; they
    /// are never degraded.
    pub async fn execute(
        &self,
        request: &OperationRequest,
    ) -> Result<Value, Error> {
        match request.service.as_str() {
            "treasury" => self.treasury(request).await,
            "governance" => self.governance(request).await,
            "community" => self.community(request).await,
            _ => Err(unknown(request)),
        }
    }

    async fn treasury(
        &self,
        request: &OperationRequest,
    ) -> Result<Value, Error> {
        let aggregator = TreasuryAggregator::new(self.state);
        let params = &request.params;

        match request.method.as_str() {
            "getBalance" => {
                let dao_id = str_param(params, "daoId")?;
                Ok(serde_json::to_value(aggregator.balance(dao_id).await?)?)
            },
            "getTransactions" => {
                let dao_id = str_param(params, "daoId")?;
                let limit = i64_param_or(
                    params,
                    "limit",
                    DEFAULT_TRANSACTION_PAGE_LIMIT,
                );
                Ok(serde_json::to_value(
                    aggregator.transactions(dao_id, limit).await?,
                )?)
            },
            "getMetrics" => {
                let dao_id = str_param(params, "daoId")?;
                Ok(serde_json::to_value(aggregator.metrics(dao_id).await?)?)
            },
            _ => Err(unknown(request)),
        }
    }

    async fn governance(
        &self,
        request: &OperationRequest,
    ) -> Result<Value, Error> {
        let aggregator = GovernanceAggregator::new(self.state);
        let params = &request.params;

        match request.method.as_str() {
            "getProposals" => {
                let dao_id = str_param(params, "daoId")?;
                let status = match params.get("status").and_then(Value::as_str)
                {
                    Some(raw) => Some(raw.parse()?),
                    None => None,
                };
                let limit = i64_param_or(
                    params,
                    "limit",
                    DEFAULT_PROPOSAL_PAGE_LIMIT,
                );
                let offset = i64_param_or(params, "offset", 0);
                Ok(serde_json::to_value(
                    aggregator.proposals(dao_id, status, limit, offset).await?,
                )?)
            },
            "getProposalById" => {
                let proposal_id = str_param(params, "proposalId")?;
                Ok(serde_json::to_value(
                    aggregator.proposal_by_id(proposal_id).await?,
                )?)
            },
            "getVotingPower" => {
                let user_id = str_param(params, "userId")?;
                let dao_id = str_param(params, "daoId")?;
                Ok(serde_json::to_value(
                    aggregator.voting_power(user_id, dao_id).await?,
                )?)
            },
            _ => Err(unknown(request)),
        }
    }

    async fn community(
        &self,
        request: &OperationRequest,
    ) -> Result<Value, Error> {
        let aggregator = CommunityAggregator::new(self.state);
        let params = &request.params;

        match request.method.as_str() {
            "getMemberCount" => {
                let dao_id = str_param(params, "daoId")?;
                let count = aggregator.member_count(dao_id).await?;
                Ok(serde_json::json!({ "memberCount": count }))
            },
            "getMemberStats" => {
                let user_id = str_param(params, "userId")?;
                let dao_id = str_param(params, "daoId")?;
                Ok(serde_json::to_value(
                    aggregator.member_stats(user_id, dao_id).await?,
                )?)
            },
            "getEngagementMetrics" => {
                let dao_id = str_param(params, "daoId")?;
                Ok(serde_json::to_value(
                    aggregator.engagement(dao_id).await?,
                )?)
            },
            _ => Err(unknown(request)),
        }
    }
}

fn unknown(request: &OperationRequest) -> Error {
    Error::UnknownOperation {
        service: request.service.clone(),
        method: request.method.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, Value)]) -> Map<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn str_param_requires_a_string_value() {
        let map = params(&[("daoId", Value::String("dao-1".into()))]);
        assert_eq!(str_param(&map, "daoId").unwrap(), "dao-1");

        let missing = str_param(&map, "userId");
        assert!(matches!(missing, Err(Error::MissingParams(name)) if name == "userId"));

        let wrong_type = params(&[("daoId", Value::from(7))]);
        assert!(str_param(&wrong_type, "daoId").is_err());
    }

    #[test]
    fn i64_param_falls_back_to_default() {
        let map = params(&[("limit", Value::from(5))]);
        assert_eq!(i64_param_or(&map, "limit", 20), 5);
        assert_eq!(i64_param_or(&map, "offset", 0), 0);
    }

    #[test]
    fn unknown_operation_names_the_pair() {
        let request = OperationRequest {
            service: "vault".to_string(),
            method: "getBalance".to_string(),
            params: Map::new(),
        };
        let err = unknown(&request);
        assert!(matches!(
            err,
            Error::UnknownOperation { service, method }
                if service == "vault" && method == "getBalance"
        ));
    }

    #[test]
    fn operation_request_deserializes_without_params() {
        let request: OperationRequest = serde_json::from_str(
            r#"{"service": "treasury", "method": "getBalance"}"#,
        )
        .unwrap();
        assert!(request.params.is_empty());
    }
}
