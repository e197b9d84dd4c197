//! Scripted in-memory [`RemoteApi`] for tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tokio::time::Instant;

use tfrun_client::{ClientError, RemoteApi};
use tfrun_core::{Output, OutputSet, RunId, RunRequest, RunStatus, WorkspaceId, WorkspaceRef};

pub const WORKSPACE_ID: &str = "ws-SihZTyXKfNXUWuUa";
pub const RUN_ID: &str = "run-CZcmD7eagjhyX0vN";

/// A scripted reply: a value or an HTTP status failure.
#[derive(Debug, Clone)]
pub enum Reply<T> {
    Ok(T),
    Fail(u16),
}

impl<T> Reply<T> {
    fn into_result(self, url: &str) -> Result<T, ClientError> {
        match self {
            Reply::Ok(v) => Ok(v),
            Reply::Fail(status) => Err(ClientError::Status {
                status,
                url: url.to_string(),
                body: String::new(),
            }),
        }
    }
}

/// Replies handed out in order; the last one repeats forever.
enum Script<T> {
    Sequence(VecDeque<Reply<T>>),
    /// Reply with the latest entry whose offset has elapsed.
    Timeline(Instant, Vec<(Duration, Reply<T>)>),
}

impl<T: Clone> Script<T> {
    fn sequence(replies: Vec<Reply<T>>) -> Self {
        Self::Sequence(replies.into())
    }

    fn next(&mut self) -> Reply<T> {
        match self {
            Script::Sequence(replies) => {
                if replies.len() > 1 {
                    replies.pop_front().expect("non-empty script")
                } else {
                    replies.front().cloned().expect("empty script")
                }
            }
            Script::Timeline(start, points) => {
                let elapsed = start.elapsed();
                points
                    .iter()
                    .rev()
                    .find(|(at, _)| *at <= elapsed)
                    .or_else(|| points.first())
                    .map(|(_, reply)| reply.clone())
                    .expect("empty timeline")
            }
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CallCounts {
    pub read_workspace_id: u32,
    pub create_run: u32,
    pub read_run_status: u32,
    pub read_resources_processed: u32,
    pub read_state_version_outputs: u32,
}

pub struct MockApi {
    workspace: Mutex<Script<String>>,
    create: Mutex<Script<String>>,
    statuses: Mutex<Script<String>>,
    processed: Mutex<Script<bool>>,
    outputs: Mutex<Script<OutputSet>>,
    pub calls: Mutex<CallCounts>,
    pub created: Mutex<Vec<RunRequest>>,
    pub resolved: Mutex<Vec<WorkspaceRef>>,
}

impl MockApi {
    /// Workspace resolves, run applies immediately, outputs ready with the
    /// `foo`/`bar`/`foobar` fixture.
    pub fn new() -> Self {
        Self {
            workspace: Mutex::new(Script::sequence(vec![Reply::Ok(WORKSPACE_ID.into())])),
            create: Mutex::new(Script::sequence(vec![Reply::Ok(RUN_ID.into())])),
            statuses: Mutex::new(Script::sequence(vec![Reply::Ok("applied".into())])),
            processed: Mutex::new(Script::sequence(vec![Reply::Ok(true)])),
            outputs: Mutex::new(Script::sequence(vec![Reply::Ok(fixture_outputs())])),
            calls: Mutex::new(CallCounts::default()),
            created: Mutex::new(Vec::new()),
            resolved: Mutex::new(Vec::new()),
        }
    }

    pub fn with_workspace(self, reply: Reply<&str>) -> Self {
        *self.workspace.lock().unwrap() = Script::sequence(vec![map_str(reply)]);
        self
    }

    pub fn with_create(self, reply: Reply<&str>) -> Self {
        *self.create.lock().unwrap() = Script::sequence(vec![map_str(reply)]);
        self
    }

    pub fn with_statuses(self, replies: Vec<Reply<&str>>) -> Self {
        *self.statuses.lock().unwrap() =
            Script::sequence(replies.into_iter().map(map_str).collect());
        self
    }

    /// Status changes at fixed offsets from now.
    pub fn with_status_timeline(self, points: Vec<(Duration, &str)>) -> Self {
        let points = points
            .into_iter()
            .map(|(at, s)| (at, Reply::Ok(s.to_string())))
            .collect();
        *self.statuses.lock().unwrap() = Script::Timeline(Instant::now(), points);
        self
    }

    pub fn with_processed(self, replies: Vec<Reply<bool>>) -> Self {
        *self.processed.lock().unwrap() = Script::sequence(replies);
        self
    }

    pub fn with_outputs(self, outputs: OutputSet) -> Self {
        *self.outputs.lock().unwrap() = Script::sequence(vec![Reply::Ok(outputs)]);
        self
    }

    pub fn with_outputs_failure(self, status: u16) -> Self {
        *self.outputs.lock().unwrap() = Script::sequence(vec![Reply::Fail(status)]);
        self
    }

    pub fn calls(&self) -> CallCounts {
        self.calls.lock().unwrap().clone()
    }
}

fn map_str(reply: Reply<&str>) -> Reply<String> {
    match reply {
        Reply::Ok(s) => Reply::Ok(s.to_string()),
        Reply::Fail(status) => Reply::Fail(status),
    }
}

/// `foo` (string), `bar` (sensitive string), `foobar` (array).
pub fn fixture_outputs() -> OutputSet {
    vec![
        Output::new("foo", "string", json!("example-output")),
        Output::new("bar", "string", json!("some-sensitive-output")).sensitive(),
        Output::new("foobar", "array", json!(["some", "arr", "val"])),
    ]
}

#[async_trait]
impl RemoteApi for MockApi {
    async fn create_run(&self, request: &RunRequest) -> Result<RunId, ClientError> {
        self.calls.lock().unwrap().create_run += 1;
        self.created.lock().unwrap().push(request.clone());
        let reply = self.create.lock().unwrap().next();
        reply.into_result("runs").map(RunId::new)
    }

    async fn read_workspace_id(
        &self,
        workspace: &WorkspaceRef,
    ) -> Result<WorkspaceId, ClientError> {
        self.calls.lock().unwrap().read_workspace_id += 1;
        self.resolved.lock().unwrap().push(workspace.clone());
        let reply = self.workspace.lock().unwrap().next();
        reply.into_result("organizations").map(WorkspaceId::new)
    }

    async fn read_run_status(&self, run_id: &RunId) -> Result<RunStatus, ClientError> {
        self.calls.lock().unwrap().read_run_status += 1;
        let reply = self.statuses.lock().unwrap().next();
        reply.into_result(&format!("runs/{run_id}")).map(RunStatus::new)
    }

    async fn read_resources_processed(
        &self,
        workspace_id: &WorkspaceId,
    ) -> Result<bool, ClientError> {
        self.calls.lock().unwrap().read_resources_processed += 1;
        let reply = self.processed.lock().unwrap().next();
        reply.into_result(&format!("workspaces/{workspace_id}/current-state-version"))
    }

    async fn read_state_version_outputs(
        &self,
        workspace_id: &WorkspaceId,
    ) -> Result<OutputSet, ClientError> {
        self.calls.lock().unwrap().read_state_version_outputs += 1;
        let reply = self.outputs.lock().unwrap().next();
        reply.into_result(&format!("workspaces/{workspace_id}/current-state-version"))
    }
}
