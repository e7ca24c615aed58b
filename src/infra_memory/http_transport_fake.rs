use crate::domain_model::*;
use crate::domain_port::*;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

type Route = (Method, String);
type Scripted = Result<ApiResponse, TransportError>;

/// Replays scripted answers per route and records every request it sees.
///
/// Answers for a route are consumed in order. An unscripted route answers 404.
#[derive(Debug, Default)]
pub struct FakeHttpTransport {
    script: Mutex<HashMap<Route, VecDeque<Scripted>>>,
    delays: Mutex<HashMap<Route, Duration>>,
    calls: Mutex<Vec<ApiRequest>>,
}

impl FakeHttpTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, method: Method, path: &str, response: ApiResponse) -> &Self {
        self.push(method, path, Ok(response))
    }

    pub fn respond_json(
        &self,
        method: Method,
        path: &str,
        status: u16,
        body: serde_json::Value,
    ) -> &Self {
        self.push(method, path, Ok(ApiResponse::json(status, &body)))
    }

    pub fn fail(&self, method: Method, path: &str, error: TransportError) -> &Self {
        self.push(method, path, Err(error))
    }

    /// Holds every answer on this route for `delay` before returning it.
    pub fn delay(&self, method: Method, path: &str, delay: Duration) -> &Self {
        lock(&self.delays).insert((method, path.to_owned()), delay);
        self
    }

    pub fn calls(&self) -> Vec<ApiRequest> {
        lock(&self.calls).clone()
    }

    pub fn calls_to(&self, method: Method, path: &str) -> Vec<ApiRequest> {
        lock(&self.calls)
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .cloned()
            .collect()
    }

    fn push(&self, method: Method, path: &str, answer: Scripted) -> &Self {
        lock(&self.script)
            .entry((method, path.to_owned()))
            .or_default()
            .push_back(answer);
        self
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

#[async_trait::async_trait]
impl HttpTransport for FakeHttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let route = (request.method, request.path.clone());
        let answer = lock(&self.script)
            .get_mut(&route)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| Ok(ApiResponse::new(404, "not scripted")));
        let delay = lock(&self.delays).get(&route).copied();
        lock(&self.calls).push(request);

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        answer
    }
}
