//! Resume Provider — decides per request whether a resume is generated or
//! served from the fallback pool. Never fails outward.
//!
//! Flow: credential check → generator (under the overall deadline) →
//!       Generated | Fallback(reason).

pub mod fallback;

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

use anyhow::Result;
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::llm_client::{
    worst_case_generation_time, FailureKind, GeminiClient, GenerationError, ResumeGenerator,
};
use crate::models::resume::{GeneratedResume, Resume};
use fallback::{FallbackPool, FallbackSelector, RandomSelector, SeededSelector};

/// Why a fallback resume was served instead of a generated one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    MissingCredential,
    Generation(FailureKind),
    DeadlineExceeded,
}

impl FallbackReason {
    pub fn label(&self) -> &'static str {
        match self {
            FallbackReason::MissingCredential => "missing_credential",
            FallbackReason::Generation(kind) => kind.as_str(),
            FallbackReason::DeadlineExceeded => "deadline_exceeded",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResumeOutcome {
    /// Served exactly as the model produced it.
    Generated(GeneratedResume),
    Fallback {
        resume: Resume,
        reason: FallbackReason,
    },
}

#[derive(Clone)]
pub struct ResumeProvider {
    /// `None` when no API key is configured (fallback-only mode).
    generator: Option<Arc<dyn ResumeGenerator>>,
    pool: Arc<FallbackPool>,
    selector: Arc<dyn FallbackSelector>,
    deadline: Duration,
}

impl ResumeProvider {
    pub fn new(
        generator: Option<Arc<dyn ResumeGenerator>>,
        pool: FallbackPool,
        selector: Arc<dyn FallbackSelector>,
        deadline: Duration,
    ) -> Self {
        Self {
            generator,
            pool: Arc::new(pool),
            selector,
            deadline,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let generator: Option<Arc<dyn ResumeGenerator>> = match &config.gemini_api_key {
            Some(key) => Some(Arc::new(GeminiClient::new(
                key.clone(),
                config.gemini_api_url.clone(),
            )?)),
            None => None,
        };

        let budget = worst_case_generation_time();
        if generator.is_some() && config.generation_deadline < budget {
            warn!(
                deadline_secs = config.generation_deadline.as_secs(),
                budget_secs = budget.as_secs(),
                "Generation deadline is shorter than the retry budget; later attempts will be cut off"
            );
        }

        let selector: Arc<dyn FallbackSelector> = match config.fallback_seed {
            Some(seed) => Arc::new(SeededSelector::new(seed)),
            None => Arc::new(RandomSelector),
        };

        let pool = FallbackPool::builtin();
        debug!(resumes = pool.resumes().len(), "Fallback pool loaded");

        Ok(Self::new(
            generator,
            pool,
            selector,
            config.generation_deadline,
        ))
    }

    pub fn generation_enabled(&self) -> bool {
        self.generator.is_some()
    }

    /// Returns a resume for one request. All failures degrade to the pool.
    pub async fn provide(&self) -> ResumeOutcome {
        let Some(generator) = &self.generator else {
            info!("API key not found, serving cached resume");
            return self.fallback(FallbackReason::MissingCredential);
        };

        // Spawned so a panicking generator surfaces as a JoinError; the guard
        // aborts the task if this future is dropped (deadline or client gone).
        let generator = Arc::clone(generator);
        let task = AbortOnDrop(tokio::spawn(async move { generator.generate().await }));

        match tokio::time::timeout(self.deadline, task).await {
            Ok(Ok(Ok(generated))) => {
                info!("Successfully generated resume");
                ResumeOutcome::Generated(generated)
            }
            Ok(Ok(Err(e))) => self.generation_failed(e),
            Ok(Err(join_error)) => {
                self.generation_failed(GenerationError::Unexpected(join_error.to_string()))
            }
            Err(_) => {
                warn!(
                    deadline_secs = self.deadline.as_secs(),
                    "Generation exceeded overall deadline, serving cached resume"
                );
                self.fallback(FallbackReason::DeadlineExceeded)
            }
        }
    }

    fn generation_failed(&self, error: GenerationError) -> ResumeOutcome {
        let kind = error.kind();
        warn!(
            failure_kind = kind.as_str(),
            "API generation failed, serving cached resume: {error}"
        );
        self.fallback(FallbackReason::Generation(kind))
    }

    fn fallback(&self, reason: FallbackReason) -> ResumeOutcome {
        let resume = self.pool.choose(self.selector.as_ref()).clone();
        ResumeOutcome::Fallback { resume, reason }
    }
}

/// Aborts the wrapped task when dropped.
struct AbortOnDrop<T>(JoinHandle<T>);

impl<T> Future for AbortOnDrop<T> {
    type Output = Result<T, JoinError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.0).poll(cx)
    }
}

impl<T> Drop for AbortOnDrop<T> {
    fn drop(&mut self) {
        self.0.abort();
    }
}
