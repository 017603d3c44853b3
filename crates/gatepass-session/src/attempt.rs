//! Per-attempt check-in state machine.
//!
//! One `CheckinAttempt` covers one try at one gate:
//!
//!   AwaitingVenueScan -> BoundToVenue -> PresentationIssued
//!                                         -> Consumed | Expired | Rejected
//!
//! A failed scan leaves the attempt in AwaitingVenueScan (retry by scanning
//! again). Binding is at-most-once per attempt: a second scan while bound is
//! ignored. Consumed, Expired, and Rejected are terminal; the holder restarts
//! from a fresh attempt, which forces a fresh venue scan and a fresh nonce.

use gatepass_core::{Signer, Timestamp, VenueId};
use gatepass_cred::Credential;

use crate::beacon::parse_venue_beacon;
use crate::error::{SessionError, SessionResult};
use crate::presentation::{issue_presentation, PresentationArtifact, SessionPolicy};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptState {
    AwaitingVenueScan,
    BoundToVenue,
    PresentationIssued,
    Consumed,
    Expired,
    Rejected,
}

/// What a scan call did to the attempt.
#[derive(Debug, PartialEq, Eq)]
pub enum ScanOutcome {
    /// Beacon bound and an artifact minted; ready to render.
    PresentationReady,
    /// The attempt already holds a binding (or is finished); scan ignored.
    Ignored,
}

#[derive(Debug)]
pub struct CheckinAttempt {
    credential: Credential,
    policy: SessionPolicy,
    state: AttemptState,
    venue_id: Option<VenueId>,
    artifact: Option<PresentationArtifact>,
}

impl CheckinAttempt {
    /// Start a fresh attempt for a credential. No venue bound yet.
    pub fn new(credential: Credential, policy: SessionPolicy) -> Self {
        Self {
            credential,
            policy,
            state: AttemptState::AwaitingVenueScan,
            venue_id: None,
            artifact: None,
        }
    }

    pub fn state(&self) -> AttemptState {
        self.state
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    pub fn venue_id(&self) -> Option<&VenueId> {
        self.venue_id.as_ref()
    }

    /// The live artifact, present once the state is PresentationIssued.
    pub fn artifact(&self) -> Option<&PresentationArtifact> {
        self.artifact.as_ref()
    }

    /// Feed a decoded scanner payload into the attempt.
    ///
    /// On a valid venue beacon the attempt binds to the venue and
    /// synchronously mints a signed presentation artifact. Parse failures
    /// leave the state untouched; a policy failure (credential no longer
    /// valid) moves the attempt to Rejected.
    pub fn handle_scan(
        &mut self,
        payload: &str,
        signer: &dyn Signer,
        now: Timestamp,
    ) -> SessionResult<ScanOutcome> {
        if self.state != AttemptState::AwaitingVenueScan {
            return Ok(ScanOutcome::Ignored);
        }

        let beacon = parse_venue_beacon(payload)?;
        self.state = AttemptState::BoundToVenue;
        self.venue_id = Some(beacon.venue_id.clone());

        match issue_presentation(&self.credential, &beacon.venue_id, &self.policy, signer, now) {
            Ok(artifact) => {
                tracing::debug!(
                    ticket_id = %self.credential.ticket_id,
                    venue_id = %beacon.venue_id,
                    "presentation issued"
                );
                self.artifact = Some(artifact);
                self.state = AttemptState::PresentationIssued;
                Ok(ScanOutcome::PresentationReady)
            }
            Err(err @ SessionError::CredentialNotValid { .. }) => {
                self.state = AttemptState::Rejected;
                Err(err)
            }
            // Signing is infrastructure, not policy; the attempt stays bound
            // but unusable, and the holder abandons it.
            Err(err) => Err(err),
        }
    }

    /// Re-evaluate expiry against the clock. Lazy and pure: no timer runs
    /// behind this, callers invoke it when they care.
    pub fn refresh(&mut self, now: Timestamp) -> AttemptState {
        if self.state == AttemptState::PresentationIssued {
            if let Some(artifact) = &self.artifact {
                if artifact.is_expired(now) {
                    self.state = AttemptState::Expired;
                    self.artifact = None;
                }
            }
        }
        self.state
    }

    /// Seconds until the artifact expires; cosmetic countdown input only.
    pub fn seconds_remaining(&self, now: Timestamp) -> Option<u64> {
        self.artifact.as_ref().map(|a| {
            a.expires_at
                .seconds_since_epoch
                .saturating_sub(now.seconds_since_epoch)
        })
    }

    /// Record that the gate accepted the presentation. Terminal.
    pub fn mark_consumed(&mut self) {
        self.state = AttemptState::Consumed;
        self.artifact = None;
    }

    /// Record that the gate rejected the presentation. Terminal.
    pub fn mark_rejected(&mut self) {
        self.state = AttemptState::Rejected;
        self.artifact = None;
    }
}
