//! INDRA DB REST API client.
//!
//! Endpoints: `GET /statements/from_agents` and `POST /statements/from_papers`.
//! Both answer with a `statements` object keyed by statement hash.

use std::time::Duration;

use async_trait::async_trait;
use belrich_common::{BelrichError, IndraConfig, Result};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{json, Value};
use tracing::{debug, instrument};
use url::Url;

use super::StatementSource;
use crate::models::Statement;

pub struct IndraDbClient {
    client: Client,
    base: Url,
    api_key: Option<SecretString>,
    ev_limit: u32,
    best_first: bool,
}

impl IndraDbClient {
    pub fn new(config: &IndraConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        // A trailing slash keeps the last path segment when joining endpoints.
        let base = Url::parse(&format!("{}/", config.url()))
            .map_err(|e| BelrichError::Config(format!("invalid INDRA URL {}: {e}", config.url())))?;
        Ok(Self {
            client,
            base,
            api_key: config.api_key.clone(),
            ev_limit: config.ev_limit,
            best_first: config.best_first,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base
            .join(path)
            .map_err(|e| BelrichError::Config(format!("invalid INDRA endpoint {path}: {e}")))
    }

    fn common_params(&self) -> Vec<(String, String)> {
        let mut params = vec![
            ("format".to_string(), "json".to_string()),
            ("ev_limit".to_string(), self.ev_limit.to_string()),
            ("best_first".to_string(), self.best_first.to_string()),
        ];
        if let Some(key) = &self.api_key {
            params.push(("api_key".to_string(), key.expose_secret().to_string()));
        }
        params
    }
}

/// Flatten the `statements` object of a response into a list.
pub fn parse_statements(body: Value) -> Result<Vec<Statement>> {
    let Value::Object(mut body) = body else {
        return Err(BelrichError::Service("response is not a JSON object".into()));
    };
    match body.remove("statements") {
        Some(Value::Object(statements)) => statements
            .into_iter()
            .map(|(_, s)| serde_json::from_value(s).map_err(BelrichError::from))
            .collect(),
        Some(Value::Array(statements)) => statements
            .into_iter()
            .map(|s| serde_json::from_value(s).map_err(BelrichError::from))
            .collect(),
        Some(Value::Null) | None => Ok(Vec::new()),
        Some(_) => Err(BelrichError::Service("unexpected `statements` field".into())),
    }
}

#[async_trait]
impl StatementSource for IndraDbClient {
    #[instrument(skip(self))]
    async fn from_agents(&self, agents: &[String]) -> Result<Vec<Statement>> {
        let mut params: Vec<(String, String)> = agents
            .iter()
            .enumerate()
            .map(|(i, agent)| (format!("agent{i}"), agent.clone()))
            .collect();
        params.extend(self.common_params());

        let body = self
            .client
            .get(self.endpoint("statements/from_agents")?)
            .query(&params)
            .send()
            .await?
            .error_for_status()?
            .json::<Value>()
            .await?;

        let statements = parse_statements(body)?;
        debug!(count = statements.len(), "INDRA returned statements for agents");
        Ok(statements)
    }

    #[instrument(skip(self))]
    async fn from_papers(&self, pmids: &[String]) -> Result<Vec<Statement>> {
        let ids: Vec<Value> = pmids
            .iter()
            .map(|pmid| json!({"id": pmid.trim(), "type": "pmid"}))
            .collect();

        let body = self
            .client
            .post(self.endpoint("statements/from_papers")?)
            .query(&self.common_params())
            .json(&json!({ "ids": ids }))
            .send()
            .await?
            .error_for_status()?
            .json::<Value>()
            .await?;

        let statements = parse_statements(body)?;
        debug!(count = statements.len(), "INDRA returned statements for papers");
        Ok(statements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn statements_body() -> Value {
        json!({
            "statements": {
                "-111": {
                    "type": "Activation",
                    "id": "u1",
                    "belief": 0.8,
                    "matches_hash": "-111",
                    "subj": {"name": "AKT1", "db_refs": {"HGNC": "391"}},
                    "obj": {"name": "MTOR", "db_refs": {"HGNC": "3942"}},
                    "evidence": [{"source_api": "reach", "pmid": "1", "text": "AKT1 activates MTOR."}]
                }
            },
            "offset": 0,
            "evidence_totals": {"-111": 4}
        })
    }

    fn client(uri: String) -> IndraDbClient {
        IndraDbClient::new(&IndraConfig::with_url(uri)).unwrap()
    }

    #[tokio::test]
    async fn test_from_agents_query() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/statements/from_agents"))
            .and(query_param("agent0", "AKT1"))
            .and(query_param("agent1", "MTOR"))
            .and(query_param("format", "json"))
            .and(query_param("ev_limit", "10"))
            .and(query_param("best_first", "true"))
            .respond_with(ResponseTemplate::new(200).set_body_json(statements_body()))
            .expect(1)
            .mount(&mock_server)
            .await;

        let statements = client(mock_server.uri())
            .from_agents(&["AKT1".to_string(), "MTOR".to_string()])
            .await
            .unwrap();
        assert_eq!(statements.len(), 1);
        assert_eq!(statements[0].uuid, "u1");
    }

    #[tokio::test]
    async fn test_from_papers_posts_ids() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/statements/from_papers"))
            .and(body_json(json!({"ids": [{"id": "123", "type": "pmid"}]})))
            .respond_with(ResponseTemplate::new(200).set_body_json(statements_body()))
            .expect(1)
            .mount(&mock_server)
            .await;

        let statements = client(mock_server.uri())
            .from_papers(&[" 123 ".to_string()])
            .await
            .unwrap();
        assert_eq!(statements.len(), 1);
    }

    #[tokio::test]
    async fn test_api_key_is_sent() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/statements/from_agents"))
            .and(query_param("api_key", "secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"statements": {}})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let mut config = IndraConfig::with_url(mock_server.uri());
        config.api_key = Some(SecretString::from("secret".to_string()));
        let statements = IndraDbClient::new(&config)
            .unwrap()
            .from_agents(&["AKT1".to_string()])
            .await
            .unwrap();
        assert!(statements.is_empty());
    }

    #[tokio::test]
    async fn test_server_error_is_http_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let err = client(mock_server.uri())
            .from_agents(&["AKT1".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, BelrichError::Http(_)));
    }

    #[test]
    fn test_parse_statements_shapes() {
        assert!(parse_statements(json!({})).unwrap().is_empty());
        assert!(parse_statements(json!([])).is_err());
        assert_eq!(parse_statements(statements_body()).unwrap().len(), 1);
    }
}
