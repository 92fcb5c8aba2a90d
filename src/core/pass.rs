use crate::core::detector::MatchDetector;
use crate::models::{DetectedMatch, MatchRecord, Profile};
use crate::services::ports::{MatchRecordStore, Notifier, PortError, ProfileDirectory, Severity};
use std::collections::HashSet;

/// Outcome of one detection-and-record pass.
#[derive(Debug, Clone, Copy)]
pub struct PassOutcome {
    pub candidates: usize,
    pub detected: usize,
    pub created: usize,
}

/// Run one complete detection-and-record pass for a subject snapshot.
///
/// Fetches the candidate pool fresh (other profiles may have changed since
/// the last pass), detects matches at or above the detector's threshold, then
/// persists and notifies them. A pool fetch failure aborts the pass with one
/// error notification; everything downstream is per-candidate best-effort.
pub async fn run_pass(
    subject: &Profile,
    detector: &MatchDetector,
    directory: &dyn ProfileDirectory,
    store: &dyn MatchRecordStore,
    notifier: &dyn Notifier,
) -> Result<PassOutcome, PortError> {
    let candidates = match directory.list_profiles(&subject.id).await {
        Ok(candidates) => candidates,
        Err(e) => {
            tracing::error!("Candidate pool fetch failed for {}: {}", subject.id, e);
            notifier
                .notify("Matching is temporarily unavailable", Severity::Error)
                .await;
            return Err(e);
        }
    };

    // Known pairs pre-filter detection; if the lookup fails we proceed with
    // an empty set and let the store's uniqueness constraint dedup instead.
    let already_matched: HashSet<String> = match store.matched_candidates(&subject.id).await {
        Ok(ids) => ids.into_iter().collect(),
        Err(e) => {
            tracing::warn!(
                "Failed to load existing matches for {}, proceeding unfiltered: {}",
                subject.id,
                e
            );
            HashSet::new()
        }
    };

    let detected = detector.detect(&subject.id, subject, &candidates, &already_matched);

    tracing::debug!(
        "Detection pass for {}: {} candidates, {} above threshold",
        subject.id,
        candidates.len(),
        detected.len()
    );

    let created = record_matches(&subject.id, &detected, store, notifier).await;

    Ok(PassOutcome {
        candidates: candidates.len(),
        detected: detected.len(),
        created,
    })
}

/// Persist detected matches and notify each newly created one.
///
/// Returns the number of records actually created. At-most-once per ordered
/// pair: an existence check (plus the store's own uniqueness guarantee)
/// skips pairs recorded by earlier passes, so calling this twice with the
/// same input creates nothing the second time. A failure on one candidate
/// never aborts the rest.
pub async fn record_matches(
    subject_id: &str,
    matches: &[DetectedMatch],
    store: &dyn MatchRecordStore,
    notifier: &dyn Notifier,
) -> usize {
    let mut created = 0;

    for m in matches {
        match store.exists(subject_id, &m.candidate_id).await {
            Ok(true) => continue,
            Ok(false) => {}
            Err(e) => {
                // Best-effort check; the create below still dedups.
                tracing::warn!(
                    "Existence check failed for {} -> {}: {}",
                    subject_id,
                    m.candidate_id,
                    e
                );
            }
        }

        let record = MatchRecord::pending(subject_id, &m.candidate_id, m.score);

        match store.create(&record).await {
            Ok(true) => {
                created += 1;

                let who = if m.display_name.is_empty() {
                    m.candidate_id.as_str()
                } else {
                    m.display_name.as_str()
                };
                let message = format!(
                    "New match found! You matched with {} ({:.0}% compatibility)",
                    who, m.score
                );
                notifier.notify(&message, Severity::Success).await;
            }
            Ok(false) => {
                tracing::debug!(
                    "Match {} -> {} already recorded, skipping",
                    subject_id,
                    m.candidate_id
                );
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to persist match {} -> {}: {}",
                    subject_id,
                    m.candidate_id,
                    e
                );
            }
        }
    }

    created
}
