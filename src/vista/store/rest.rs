use super::path::NodePath;
use super::tree;
use super::TreeStore;
use crate::error::{Result, VistaError};
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::{StatusCode, Url};
use serde_json::{Map, Value};
use std::time::Duration;

/// The hosted realtime database, spoken to over its REST interface.
///
/// Every node is reachable as `{base}/{path}.json`. Reads are `GET`, partial
/// updates `PATCH`, overwrites `PUT` and deletes `DELETE`. Each request carries
/// the client timeout, so a stalled network surfaces as a transport error
/// instead of hanging the console.
pub struct RestStore {
    client: Client,
    base: Url,
    auth_token: Option<String>,
}

impl RestStore {
    pub fn new(base_url: &str, auth_token: Option<String>, timeout: Duration) -> Result<Self> {
        let base = Url::parse(base_url)
            .map_err(|e| VistaError::Config(format!("invalid database url {base_url:?}: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(VistaError::Config(format!(
                "database url {base_url:?} cannot hold paths"
            )));
        }
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base,
            auth_token,
        })
    }

    /// `{base}/{segments...}.json`, with the auth token when one is configured.
    pub fn node_url(&self, path: &NodePath) -> Result<Url> {
        let mut url = self.base.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| VistaError::Config("database url cannot hold paths".to_string()))?;
            segments.pop_if_empty();
            match path.segments().split_last() {
                Some((last, parents)) => {
                    segments.extend(parents);
                    segments.push(&format!("{last}.json"));
                }
                None => {
                    segments.push(".json");
                }
            }
        }
        if let Some(token) = &self.auth_token {
            url.query_pairs_mut().append_pair("auth", token);
        }
        Ok(url)
    }

    /// Node URL plus the `orderBy`/`equalTo` equality query.
    pub fn query_url(&self, collection: &NodePath, field: &str, value: &str) -> Result<Url> {
        let mut url = self.node_url(collection)?;
        url.query_pairs_mut()
            .append_pair("orderBy", &Value::String(field.to_string()).to_string())
            .append_pair("equalTo", &Value::String(value.to_string()).to_string());
        Ok(url)
    }

    fn send(&self, request: RequestBuilder) -> Result<Value> {
        let response = request.send()?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(VistaError::Transport(format!(
                "database answered {status}: {}",
                body.trim()
            )));
        }
        let text = response.text()?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }
}

impl TreeStore for RestStore {
    fn read(&self, path: &NodePath) -> Result<Option<Value>> {
        tracing::debug!(%path, "GET");
        let value = self.send(self.client.get(self.node_url(path)?))?;
        Ok(Some(value).filter(|v| !tree::is_empty_node(v)))
    }

    fn read_filtered(
        &self,
        collection: &NodePath,
        field: &str,
        value: &str,
    ) -> Result<Map<String, Value>> {
        tracing::debug!(%collection, field, value, "GET filtered");
        let url = self.query_url(collection, field, value)?;
        let response = self.client.get(url).send()?;
        // Without an `.indexOn` rule the database refuses the query; scan instead.
        if response.status() == StatusCode::BAD_REQUEST {
            tracing::warn!(%collection, field, "no index for filtered read, scanning collection");
            let all = self.read(collection)?;
            return Ok(tree::filter_children(all.as_ref(), field, value));
        }
        if !response.status().is_success() {
            return Err(VistaError::Transport(format!(
                "database answered {}",
                response.status()
            )));
        }
        match response.json::<Value>()? {
            Value::Object(map) => Ok(map),
            _ => Ok(Map::new()),
        }
    }

    fn update(&mut self, path: &NodePath, fields: Map<String, Value>) -> Result<()> {
        tracing::debug!(%path, "PATCH");
        self.send(self.client.patch(self.node_url(path)?).json(&fields))?;
        Ok(())
    }

    fn delete(&mut self, path: &NodePath) -> Result<()> {
        tracing::debug!(%path, "DELETE");
        self.send(self.client.delete(self.node_url(path)?))?;
        Ok(())
    }

    fn set(&mut self, path: &NodePath, value: Value) -> Result<()> {
        tracing::debug!(%path, "PUT");
        self.send(self.client.put(self.node_url(path)?).json(&value))?;
        Ok(())
    }
}
