//! In-memory collaborators and stub HTTP servers for unit tests

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{HeaderMap, Method, Response, StatusCode, Uri};
use axum::Router;
use clamtag_core::types::{ObjectRef, TagSet};
use clamtag_core::{Error, Result};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

use crate::scanner::{ScanResponse, ScanService};
use crate::secrets::SecretSource;
use crate::tagging::ObjectTagger;

/// Value of the tag named `key`, if present
pub fn tag_value<'a>(tags: &'a TagSet, key: &str) -> Option<&'a str> {
    tags.iter().find(|t| t.key == key).map(|t| t.value.as_str())
}

/// Scan service answering every request with the same status
pub struct StaticScanService {
    status: Option<u16>,
    calls: Mutex<Vec<(String, ObjectRef)>>,
}

impl StaticScanService {
    pub fn new(status: Option<u16>) -> Self {
        Self {
            status,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(String, ObjectRef)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ScanService for StaticScanService {
    async fn start_scan(&self, api_key: &str, object: &ObjectRef) -> ScanResponse {
        self.calls
            .lock()
            .unwrap()
            .push((api_key.to_string(), object.clone()));
        match self.status {
            Some(status) => ScanResponse::from_status(status),
            None => ScanResponse::unreachable(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaggerMode {
    /// Bucket versioning on: writes return a version id
    Versioned,
    /// Bucket versioning off: writes succeed without a version id
    Unversioned,
    /// Every write fails
    Failing,
}

/// Tagger keeping tag sets in memory, replacing on every write like S3
pub struct MemoryTagger {
    mode: TaggerMode,
    objects: Mutex<HashMap<ObjectRef, TagSet>>,
    calls: Mutex<Vec<(ObjectRef, TagSet)>>,
}

impl MemoryTagger {
    pub fn new(mode: TaggerMode) -> Self {
        Self {
            mode,
            objects: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(ObjectRef, TagSet)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn tags_of(&self, object: &ObjectRef) -> Option<TagSet> {
        self.objects.lock().unwrap().get(object).cloned()
    }
}

#[async_trait]
impl ObjectTagger for MemoryTagger {
    async fn put_tags(&self, object: &ObjectRef, tags: &TagSet) -> Result<Option<String>> {
        let version = {
            let mut calls = self.calls.lock().unwrap();
            calls.push((object.clone(), tags.clone()));
            calls.len()
        };

        match self.mode {
            TaggerMode::Failing => Err(Error::TagWriteFailure("Access Denied".into())),
            mode => {
                self.objects
                    .lock()
                    .unwrap()
                    .insert(object.clone(), tags.clone());
                Ok((mode == TaggerMode::Versioned).then(|| format!("v{}", version)))
            }
        }
    }
}

/// Secret source returning a configurable value, or failing when unset
pub struct StaticSecrets {
    value: Mutex<Option<String>>,
    requested: Mutex<Vec<String>>,
    calls: AtomicUsize,
}

impl StaticSecrets {
    pub fn new(value: Option<&str>) -> Self {
        Self {
            value: Mutex::new(value.map(str::to_string)),
            requested: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn set(&self, value: Option<&str>) {
        *self.value.lock().unwrap() = value.map(str::to_string);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl SecretSource for StaticSecrets {
    async fn get_secret(&self, name: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requested.lock().unwrap().push(name.to_string());
        self.value
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| Error::CredentialUnavailable(format!("parameter '{}' not found", name)))
    }
}

/// Request captured by [`spawn_stub`]
#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
    pub body: String,
}

/// Canned answer returned by [`spawn_stub`] for every request
#[derive(Debug, Clone)]
pub struct StubResponse {
    pub status: StatusCode,
    pub headers: Vec<(&'static str, String)>,
    pub body: String,
}

impl StubResponse {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: String::new(),
        }
    }

    pub fn header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    fn to_response(&self) -> Response<Body> {
        let mut builder = Response::builder().status(self.status);
        for (name, value) in &self.headers {
            builder = builder.header(*name, value.as_str());
        }
        builder.body(Body::from(self.body.clone())).unwrap()
    }
}

pub type SeenRequests = Arc<Mutex<Vec<SeenRequest>>>;

/// Serve `response` to any request on an ephemeral port, recording what
/// arrives. Returns the base URL.
pub async fn spawn_stub(response: StubResponse) -> (String, SeenRequests) {
    let seen: SeenRequests = Arc::new(Mutex::new(Vec::new()));
    let recorder = seen.clone();
    let response = Arc::new(response);

    let app = Router::new().fallback(
        move |method: Method, uri: Uri, headers: HeaderMap, body: String| {
            let recorder = recorder.clone();
            let response = response.clone();
            async move {
                recorder.lock().unwrap().push(SeenRequest {
                    method,
                    uri,
                    headers,
                    body,
                });
                response.to_response()
            }
        },
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), seen)
}
