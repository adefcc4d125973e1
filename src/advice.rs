use std::sync::atomic::{AtomicU64, Ordering};

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::range_engine::{
    config::TrainerConfig,
    error::AdviceError,
    hand_key::Hand169,
    models::{Action, Scenario},
    quiz::Question,
    summary::{range_matrix, rfi_matrix, summarize, AdviceSummary},
    table::StrategyTable,
};

/// Body POSTed to the advice relay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdviceRequest {
    pub scenario: Scenario,
    pub hand: Hand169,
    pub user_action: Action,
    /// 13×13 labels for the scenario ("R", "R/C", "F", ...).
    pub range_matrix: Vec<Vec<String>>,
    /// Opener's RFI as "R"/"-", only for `VsOpen` spots.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opener_rfi_matrix: Option<Vec<Vec<String>>>,
    pub summary: AdviceSummary,
}

impl AdviceRequest {
    pub fn build(table: &StrategyTable, question: &Question, user_action: Action) -> Self {
        let scenario = question.scenario;
        AdviceRequest {
            scenario,
            hand: question.hand,
            user_action,
            range_matrix: range_matrix(table, scenario),
            opener_rfi_matrix: scenario.opener().map(|opener| rfi_matrix(table, opener)),
            summary: summarize(table, scenario, question.hand),
        }
    }
}

/// Turn a relay response into advice text or an error.
///
/// A failed status surfaces the body verbatim, or a status message when the
/// body is empty. A successful body is `{"advice": "..."}`. Any other JSON
/// value yields empty advice; a body that is not JSON is taken as the advice
/// text itself.
pub fn interpret_response(status: u16, body: &str) -> Result<String, AdviceError> {
    if !(200..300).contains(&status) {
        let message = if body.is_empty() {
            format!("Advice API error: {status}")
        } else {
            body.to_string()
        };
        return Err(AdviceError::Relay { status, message });
    }
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(reply) => Ok(reply
            .get("advice")
            .and_then(serde_json::Value::as_str)
            .unwrap_or_default()
            .to_string()),
        Err(_) => Ok(body.to_string()),
    }
}

/// Thin client for the advice relay. No retries; failures go to the caller.
#[derive(Debug, Clone)]
pub struct AdviceClient {
    http: reqwest::Client,
    endpoint: String,
}

impl AdviceClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        AdviceClient { http: reqwest::Client::new(), endpoint: endpoint.into() }
    }

    pub fn from_config(config: &TrainerConfig) -> Self {
        Self::new(config.relay_url.clone())
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub async fn fetch(&self, request: &AdviceRequest) -> Result<String, AdviceError> {
        debug!("requesting advice for {} / {}", request.scenario, request.hand);
        let response = self.http.post(&self.endpoint).json(request).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        let result = interpret_response(status, &body);
        if let Err(e) = &result {
            warn!("advice relay failed: {e}");
        }
        result
    }
}

/// Issued by [`AdviceGate::begin`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdviceTicket(u64);

/// Last-write-wins guard for overlapping advice requests: only the reply to
/// the most recent request should be shown.
#[derive(Debug, Default)]
pub struct AdviceGate {
    latest: AtomicU64,
}

impl AdviceGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self) -> AdviceTicket {
        AdviceTicket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: AdviceTicket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }

    /// Pass `result` through if `ticket` is still current, otherwise drop it.
    pub fn accept<T>(&self, ticket: AdviceTicket, result: T) -> Option<T> {
        if self.is_current(ticket) {
            Some(result)
        } else {
            debug!("dropping superseded advice reply {}", ticket.0);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::range_engine::{
        hand_key::encode,
        models::{ActionSet, Position},
        table::key_for,
    };

    fn table() -> StrategyTable {
        let rfi = Scenario::Unopened { hero: Position::CO };
        let vs = Scenario::VsOpen { hero: Position::BTN, opener: Position::CO };
        [
            (key_for(rfi, encode(0, 0)), [Action::Raise].into_iter().collect::<ActionSet>()),
            (key_for(vs, encode(0, 0)), [Action::Raise, Action::Call].into_iter().collect()),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn request_carries_opener_matrix_for_vs_open() {
        let q = Question {
            scenario: Scenario::VsOpen { hero: Position::BTN, opener: Position::CO },
            hand: encode(0, 0),
        };
        let req = AdviceRequest::build(&table(), &q, Action::Call);
        assert_eq!(req.range_matrix[0][0], "R/C");
        assert_eq!(req.opener_rfi_matrix.as_ref().unwrap()[0][0], "R");
        assert_eq!(req.summary.hand_label, "R/C");

        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["userAction"], "call");
        assert_eq!(json["hand"], "AA");
        assert_eq!(json["scenario"]["kind"], "vs_open");
        assert!(json["openerRfiMatrix"].is_array());
    }

    #[test]
    fn request_omits_opener_matrix_for_unopened() {
        let q = Question { scenario: Scenario::Unopened { hero: Position::CO }, hand: encode(5, 2) };
        let req = AdviceRequest::build(&table(), &q, Action::Fold);
        assert!(req.opener_rfi_matrix.is_none());
        let json = serde_json::to_value(&req).unwrap();
        assert!(json.get("openerRfiMatrix").is_none());
    }

    #[test]
    fn success_bodies() {
        assert_eq!(interpret_response(200, r#"{"advice":"3bet for value"}"#).unwrap(), "3bet for value");
        assert_eq!(interpret_response(200, r#"{"other":1}"#).unwrap(), "");
        assert_eq!(interpret_response(200, "plain text").unwrap(), "plain text");
    }

    #[test]
    fn non_object_json_gives_empty_advice() {
        assert_eq!(interpret_response(200, "null").unwrap(), "");
        assert_eq!(interpret_response(200, "42").unwrap(), "");
        assert_eq!(interpret_response(200, r#"["advice"]"#).unwrap(), "");
        assert_eq!(interpret_response(200, r#"{"advice":null}"#).unwrap(), "");
    }

    #[test]
    fn client_uses_configured_endpoint() {
        let client = AdviceClient::from_config(&TrainerConfig::default());
        assert_eq!(client.endpoint(), "http://localhost:8787/api/advice");
        let config = TrainerConfig { relay_url: "https://relay.test/advice".into(), ..TrainerConfig::default() };
        assert_eq!(AdviceClient::from_config(&config).endpoint(), "https://relay.test/advice");
    }

    #[test]
    fn failure_bodies() {
        let err = interpret_response(500, r#"{"error":"OPENAI_API_KEY not set"}"#).unwrap_err();
        assert_eq!(err.to_string(), r#"{"error":"OPENAI_API_KEY not set"}"#);
        let err = interpret_response(502, "").unwrap_err();
        assert_eq!(err.to_string(), "Advice API error: 502");
        assert!(matches!(err, AdviceError::Relay { status: 502, .. }));
    }

    #[test]
    fn gate_keeps_only_latest_reply() {
        let gate = AdviceGate::new();
        let first = gate.begin();
        let second = gate.begin();
        assert_eq!(gate.accept(first, "old"), None);
        assert_eq!(gate.accept(second, "new"), Some("new"));
    }

    #[tokio::test]
    async fn unreachable_relay_is_a_transport_error() {
        let client = AdviceClient::new("http://127.0.0.1:9/api/advice");
        let q = Question { scenario: Scenario::Unopened { hero: Position::CO }, hand: encode(0, 0) };
        let req = AdviceRequest::build(&table(), &q, Action::Raise);
        let err = client.fetch(&req).await.unwrap_err();
        assert!(matches!(err, AdviceError::Transport(_)), "{err}");
    }
}
