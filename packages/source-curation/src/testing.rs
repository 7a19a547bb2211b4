//! In-memory stand-ins for the LLM, the web and discovery strategies.
//!
//! Used by unit tests, the integration suites and the server's route tests.

use async_trait::async_trait;
use llm_client::LlmError;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::{CurationError, FetchError, FetchResult, Result};
use crate::traits::{CompletionRequest, FetchedPage, Llm, PageFetcher, SourceStrategy};
use crate::types::{CharacterProfile, SourceCandidate, Subject};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Scripted LLM.
///
/// Replies are chosen by the first rule whose key appears in the system or
/// user prompt, then the default reply. With neither, the call fails.
#[derive(Default)]
pub struct MockLlm {
    rules: Vec<(String, String)>,
    default_reply: Option<String>,
    failing: bool,
    calls: Mutex<Vec<CompletionRequest>>,
}

impl MockLlm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reply(mut self, key: impl Into<String>, reply: impl Into<String>) -> Self {
        self.rules.push((key.into(), reply.into()));
        self
    }

    pub fn with_default_reply(mut self, reply: impl Into<String>) -> Self {
        self.default_reply = Some(reply.into());
        self
    }

    /// Every call fails with a network error.
    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    pub fn calls(&self) -> Vec<CompletionRequest> {
        lock(&self.calls).clone()
    }

    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }
}

#[async_trait]
impl Llm for MockLlm {
    async fn complete(&self, request: CompletionRequest) -> std::result::Result<String, LlmError> {
        lock(&self.calls).push(request.clone());
        if self.failing {
            return Err(LlmError::Network("connection refused".into()));
        }
        self.rules
            .iter()
            .find(|(key, _)| request.system.contains(key) || request.user.contains(key))
            .map(|(_, reply)| reply.clone())
            .or_else(|| self.default_reply.clone())
            .ok_or_else(|| LlmError::Parse("no scripted reply".into()))
    }
}

#[derive(Debug, Clone)]
enum Scripted {
    Page { status: u16, html: String },
    Unreachable,
}

/// Scripted web.
///
/// Unknown URLs get the default page when one is set, otherwise a 404.
#[derive(Default)]
pub struct MockFetcher {
    pages: HashMap<String, Scripted>,
    default_page: Option<String>,
    calls: Mutex<Vec<String>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.pages.insert(
            url.into(),
            Scripted::Page {
                status: 200,
                html: html.into(),
            },
        );
        self
    }

    pub fn with_status(mut self, url: impl Into<String>, status: u16) -> Self {
        self.pages.insert(
            url.into(),
            Scripted::Page {
                status,
                html: String::new(),
            },
        );
        self
    }

    /// The URL times out.
    pub fn with_unreachable(mut self, url: impl Into<String>) -> Self {
        self.pages.insert(url.into(), Scripted::Unreachable);
        self
    }

    pub fn with_default_page(mut self, html: impl Into<String>) -> Self {
        self.default_page = Some(html.into());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        lock(&self.calls).clone()
    }
}

#[async_trait]
impl PageFetcher for MockFetcher {
    async fn fetch(&self, url: &str) -> FetchResult<FetchedPage> {
        lock(&self.calls).push(url.to_string());
        let scripted = self.pages.get(url).cloned().unwrap_or_else(|| match &self.default_page {
            Some(html) => Scripted::Page {
                status: 200,
                html: html.clone(),
            },
            None => Scripted::Page {
                status: 404,
                html: String::new(),
            },
        });

        match scripted {
            Scripted::Unreachable => Err(FetchError::Timeout {
                url: url.to_string(),
            }),
            Scripted::Page { status, html } => Ok(FetchedPage {
                final_url: url.to_string(),
                status,
                content_type: Some("text/html".into()),
                last_modified: None,
                metadata: crate::fetch::page_metadata(&html),
                html,
            }),
        }
    }
}

type Generator = dyn Fn(&Subject) -> Vec<SourceCandidate> + Send + Sync;

/// Strategy returning fixed or generated candidates.
#[derive(Clone)]
pub struct MockStrategy {
    name: String,
    generator: Option<Arc<Generator>>,
    calls: Arc<Mutex<Vec<Subject>>>,
}

impl MockStrategy {
    pub fn new(name: impl Into<String>, candidates: Vec<SourceCandidate>) -> Self {
        Self::from_fn(name, move |_| candidates.clone())
    }

    pub fn from_fn(
        name: impl Into<String>,
        generator: impl Fn(&Subject) -> Vec<SourceCandidate> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            generator: Some(Arc::new(generator)),
            calls: Arc::default(),
        }
    }

    /// Every search fails.
    pub fn failing(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            generator: None,
            calls: Arc::default(),
        }
    }

    /// Subjects searched so far.
    pub fn calls(&self) -> Vec<Subject> {
        lock(&self.calls).clone()
    }
}

#[async_trait]
impl SourceStrategy for MockStrategy {
    fn name(&self) -> &str {
        &self.name
    }

    async fn search(
        &self,
        subject: &Subject,
        _profile: Option<&CharacterProfile>,
    ) -> Result<Vec<SourceCandidate>> {
        lock(&self.calls).push(subject.clone());
        match &self.generator {
            Some(generate) => Ok(generate(subject)),
            None => Err(CurationError::strategy(&self.name, "upstream unavailable")),
        }
    }
}
