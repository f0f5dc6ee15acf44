use std::time::Duration;

use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::net::TcpStream;
use tokio::time::{self, Instant};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use super::DevtoolsError;

const TASK_DURATION: &str = "TaskDuration";

/// `TaskDuration` read at the start and the end of one measurement window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaskDurationReadings {
    pub first: f64,
    pub second: f64,
}

#[derive(Debug, Deserialize)]
struct CdpResponse {
    id: Option<u64>,
    result: Option<Value>,
    error: Option<CdpError>,
}

#[derive(Debug, Deserialize)]
struct CdpError {
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct MetricsResult {
    #[serde(default)]
    metrics: Vec<Metric>,
}

#[derive(Debug, Deserialize)]
struct Metric {
    name: String,
    value: f64,
}

/// A single remote-debugging session attached to one page.
pub struct Session {
    ws: WebSocketStream<MaybeTlsStream<TcpStream>>,
    next_id: u64,
    timeout: Duration,
}

impl Session {
    pub async fn connect(ws_url: &str, timeout: Duration) -> Result<Self, DevtoolsError> {
        let (ws, _) = time::timeout(timeout, connect_async(ws_url))
            .await
            .map_err(|_| DevtoolsError::Timeout("session connect"))??;
        Ok(Session {
            ws,
            next_id: 1,
            timeout,
        })
    }

    /// Send one command and wait for the response carrying the same id.
    ///
    /// Protocol events (frames without an id) and stale responses are
    /// skipped; the whole exchange shares a single deadline.
    pub async fn call(&mut self, method: &str) -> Result<Value, DevtoolsError> {
        let id = self.next_id;
        self.next_id += 1;

        let deadline = Instant::now() + self.timeout;
        let request = json!({ "id": id, "method": method }).to_string();
        time::timeout_at(deadline, self.ws.send(Message::text(request)))
            .await
            .map_err(|_| DevtoolsError::Timeout("session write"))??;

        loop {
            let frame = time::timeout_at(deadline, self.ws.next())
                .await
                .map_err(|_| DevtoolsError::Timeout("session read"))?;
            let message = match frame {
                Some(message) => message?,
                None => return Err(DevtoolsError::Closed),
            };
            let text = match &message {
                Message::Text(_) => message.to_text()?,
                Message::Close(_) => return Err(DevtoolsError::Closed),
                _ => continue,
            };

            let response: CdpResponse = serde_json::from_str(text)?;
            if response.id != Some(id) {
                continue;
            }
            if let Some(error) = response.error {
                return Err(DevtoolsError::Protocol {
                    method: method.to_string(),
                    message: error.message,
                });
            }
            return Ok(response.result.unwrap_or(Value::Null));
        }
    }

    pub async fn task_duration(&mut self) -> Result<f64, DevtoolsError> {
        let result = self.call("Performance.getMetrics").await?;
        let metrics: MetricsResult = serde_json::from_value(result)?;
        Ok(task_duration_of(&metrics.metrics))
    }

    pub async fn close(mut self) {
        let _ = time::timeout(self.timeout, self.ws.close(None)).await;
    }
}

fn task_duration_of(metrics: &[Metric]) -> f64 {
    metrics
        .iter()
        .find(|m| m.name == TASK_DURATION)
        .map(|m| m.value)
        .unwrap_or(0.0)
}

/// Open a session on one page and read `TaskDuration` twice, `interval` apart.
pub async fn measure(
    ws_url: &str,
    interval: Duration,
    timeout: Duration,
) -> Result<TaskDurationReadings, DevtoolsError> {
    let mut session = Session::connect(ws_url, timeout).await?;
    session.call("Performance.enable").await?;
    let first = session.task_duration().await?;
    time::sleep(interval).await;
    let second = session.task_duration().await?;
    session.close().await;
    Ok(TaskDurationReadings { first, second })
}
