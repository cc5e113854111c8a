use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

use crate::llm_client::FailureKind;
use crate::provider::{FallbackReason, ResumeOutcome};

/// Process-wide counters of how resume requests were served.
#[derive(Debug, Default)]
pub struct ResumeStats {
    generated: AtomicU64,
    missing_credential: AtomicU64,
    deadline_exceeded: AtomicU64,
    failures: [AtomicU64; FailureKind::ALL.len()],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsSnapshot {
    pub generated: u64,
    pub fallback: u64,
    pub fallback_missing_credential: u64,
    pub fallback_deadline_exceeded: u64,
    pub generation_failures: BTreeMap<&'static str, u64>,
}

impl ResumeStats {
    pub fn record(&self, outcome: &ResumeOutcome) {
        let counter = match outcome {
            ResumeOutcome::Generated(_) => &self.generated,
            ResumeOutcome::Fallback { reason, .. } => match reason {
                FallbackReason::MissingCredential => &self.missing_credential,
                FallbackReason::DeadlineExceeded => &self.deadline_exceeded,
                FallbackReason::Generation(kind) => &self.failures[*kind as usize],
            },
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        let generation_failures: BTreeMap<&'static str, u64> = FailureKind::ALL
            .iter()
            .map(|kind| {
                (
                    kind.as_str(),
                    self.failures[*kind as usize].load(Ordering::Relaxed),
                )
            })
            .collect();

        let missing_credential = self.missing_credential.load(Ordering::Relaxed);
        let deadline_exceeded = self.deadline_exceeded.load(Ordering::Relaxed);

        StatsSnapshot {
            generated: self.generated.load(Ordering::Relaxed),
            fallback: missing_credential
                + deadline_exceeded
                + generation_failures.values().sum::<u64>(),
            fallback_missing_credential: missing_credential,
            fallback_deadline_exceeded: deadline_exceeded,
            generation_failures,
        }
    }
}
