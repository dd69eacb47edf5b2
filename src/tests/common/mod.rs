// tests/common/mod.rs
pub use axum::Router;
pub use serde_json::json;
pub use tokio::task::JoinHandle;

use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::fetch::error::FetchError;
use crate::fetch::transport::{Transport, TransportRequest, TransportResponse};

/// Spawn an Axum router on an ephemeral port and return (JoinHandle, SocketAddr)
pub async fn spawn_axum(router: Router) -> (JoinHandle<()>, SocketAddr) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind failed");
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.expect("server failed");
    });
    (handle, addr)
}

/// What a scripted endpoint does on its next call.
#[derive(Debug, Clone)]
pub enum Reply {
    Respond { status: u16, body: Vec<u8>, delay: Duration },
    Fail(String),
    Hang,
}

impl Reply {
    pub fn json(status: u16, body: Value) -> Self {
        Reply::json_after(status, body, 0)
    }

    pub fn json_after(status: u16, body: Value, delay_ms: u64) -> Self {
        Reply::Respond {
            status,
            body: body.to_string().into_bytes(),
            delay: Duration::from_millis(delay_ms),
        }
    }

    pub fn raw(status: u16, body: &[u8]) -> Self {
        Reply::Respond {
            status,
            body: body.to_vec(),
            delay: Duration::ZERO,
        }
    }
}

#[derive(Default)]
struct ScriptState {
    replies: HashMap<String, VecDeque<Reply>>,
    calls: Vec<TransportRequest>,
    completed: usize,
}

/// In-process transport answering from per-url queues and recording every call.
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    state: Arc<Mutex<ScriptState>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, url: &str, reply: Reply) -> Self {
        self.state
            .lock()
            .unwrap()
            .replies
            .entry(url.to_owned())
            .or_default()
            .push_back(reply);
        self
    }

    pub fn calls(&self) -> Vec<TransportRequest> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn called_urls(&self) -> Vec<String> {
        self.calls().into_iter().map(|call| call.url).collect()
    }

    /// Calls that ran to completion, including ones nobody waited for.
    pub fn completed(&self) -> usize {
        self.state.lock().unwrap().completed
    }
}

impl Transport for ScriptedTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, FetchError> {
        let url = request.url.clone();
        let reply = {
            let mut state = self.state.lock().unwrap();
            state.calls.push(request);
            let next = state.replies.get_mut(&url).and_then(VecDeque::pop_front);
            next
        };

        match reply {
            Some(Reply::Respond { status, body, delay }) => {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                self.state.lock().unwrap().completed += 1;
                Ok(TransportResponse::new(status, body))
            }
            Some(Reply::Fail(message)) => Err(FetchError::Transport { url, message }),
            Some(Reply::Hang) => std::future::pending().await,
            None => Err(FetchError::Transport {
                url,
                message: "no scripted reply".to_owned(),
            }),
        }
    }
}
