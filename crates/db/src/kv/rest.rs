//! Redis REST backend (Upstash / Vercel KV wire format).
//!
//! Commands are sent as a JSON array in a `POST` to the base URL and answered
//! with `{"result": ...}` or `{"error": "..."}`. The value lives at `key` and
//! its revision at `key:rev`; writes run as a Lua script so both change
//! together on the server.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{KvStore, StoreError, Versioned};

/// Unconditional write: bump the revision and store the value.
const SET_SCRIPT: &str = "\
local rev = redis.call('INCR', KEYS[2])
redis.call('SET', KEYS[1], ARGV[1])
return rev";

/// Conditional write. Returns -1 when the revision has moved.
const CAS_SCRIPT: &str = "\
local current = tonumber(redis.call('GET', KEYS[2]) or '0')
if current ~= tonumber(ARGV[2]) then
  return -1
end
local rev = redis.call('INCR', KEYS[2])
redis.call('SET', KEYS[1], ARGV[1])
return rev";

#[derive(Debug, Deserialize)]
struct RestReply {
    result: Option<Value>,
    error: Option<String>,
}

/// HTTP client for a Redis-compatible REST endpoint.
pub struct RestStore {
    client: reqwest::Client,
    url: String,
    token: String,
}

fn revision_key(key: &str) -> String {
    format!("{key}:rev")
}

impl RestStore {
    /// Create a client for the endpoint at `url`, authenticating with `token`.
    pub fn new(url: String, token: String, timeout: Duration) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StoreError::Protocol(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            url: url.trim_end_matches('/').to_string(),
            token,
        })
    }

    /// Send one command and return its `result` value.
    async fn command(&self, args: Value) -> Result<Value, StoreError> {
        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.token)
            .json(&args)
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        let status = response.status();
        if status.is_server_error() {
            return Err(StoreError::Unavailable(format!(
                "store returned HTTP {}",
                status.as_u16()
            )));
        }
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(StoreError::Protocol(format!(
                "store rejected credentials (HTTP {})",
                status.as_u16()
            )));
        }

        let reply: RestReply = response
            .json()
            .await
            .map_err(|e| StoreError::Protocol(format!("unreadable store reply: {e}")))?;

        if let Some(err) = reply.error {
            return Err(StoreError::Protocol(err));
        }
        Ok(reply.result.unwrap_or(Value::Null))
    }

    async fn eval(&self, script: &str, key: &str, args: &[String]) -> Result<i64, StoreError> {
        let mut cmd = vec![
            json!("EVAL"),
            json!(script),
            json!("2"),
            json!(key),
            json!(revision_key(key)),
        ];
        cmd.extend(args.iter().map(|a| json!(a)));

        let result = self.command(Value::Array(cmd)).await?;
        result
            .as_i64()
            .ok_or_else(|| StoreError::Protocol(format!("expected integer reply, got {result}")))
    }
}

/// Parse a revision counter, which Redis hands back as a string.
fn parse_revision(value: &Value) -> Result<u64, StoreError> {
    match value {
        Value::Null => Ok(0),
        Value::String(s) => s
            .parse()
            .map_err(|_| StoreError::Protocol(format!("invalid revision '{s}'"))),
        Value::Number(n) => n
            .as_u64()
            .ok_or_else(|| StoreError::Protocol(format!("invalid revision {n}"))),
        other => Err(StoreError::Protocol(format!("invalid revision {other}"))),
    }
}

fn parse_get_reply(result: Value) -> Result<Option<Versioned<String>>, StoreError> {
    let items = match result {
        Value::Array(items) => items,
        other => {
            return Err(StoreError::Protocol(format!(
                "expected array reply to MGET, got {other}"
            )))
        }
    };
    match items.as_slice() {
        [Value::Null, _] => Ok(None),
        [Value::String(value), rev] => Ok(Some(Versioned {
            value: value.clone(),
            revision: parse_revision(rev)?,
        })),
        _ => Err(StoreError::Protocol("unexpected MGET reply shape".into())),
    }
}

#[async_trait]
impl KvStore for RestStore {
    async fn get(&self, key: &str) -> Result<Option<Versioned<String>>, StoreError> {
        let result = self
            .command(json!(["MGET", key, revision_key(key)]))
            .await?;
        parse_get_reply(result)
    }

    async fn set(&self, key: &str, value: &str) -> Result<u64, StoreError> {
        let rev = self.eval(SET_SCRIPT, key, &[value.to_string()]).await?;
        u64::try_from(rev).map_err(|_| StoreError::Protocol(format!("invalid revision {rev}")))
    }

    async fn compare_and_set(
        &self,
        key: &str,
        value: &str,
        expected_revision: u64,
    ) -> Result<u64, StoreError> {
        let rev = self
            .eval(
                CAS_SCRIPT,
                key,
                &[value.to_string(), expected_revision.to_string()],
            )
            .await?;
        if rev < 0 {
            tracing::debug!(key, expected_revision, "Conditional write lost the race");
            return Err(StoreError::Conflict {
                key: key.to_string(),
            });
        }
        Ok(rev as u64)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let result = self.command(json!(["PING"])).await?;
        match result.as_str() {
            Some("PONG") => Ok(()),
            _ => Err(StoreError::Protocol(format!(
                "unexpected PING reply {result}"
            ))),
        }
    }
}
