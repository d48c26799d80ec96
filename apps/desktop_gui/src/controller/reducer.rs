//! Lookup form state machine: idle -> loading -> loaded | failed -> idle.

use client_core::{normalize_address, LookupError};
use shared::protocol::LookupData;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub enum FormPhase {
    Idle,
    Loading { request_id: Uuid },
    Loaded { request_id: Uuid, data: LookupData },
    Failed(LookupError),
}

/// A lookup the form has committed to; exactly one settle is expected for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupTicket {
    pub request_id: Uuid,
    pub address: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettleOutcome {
    Applied,
    Stale,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LookupForm {
    address: String,
    phase: FormPhase,
}

impl Default for LookupForm {
    fn default() -> Self {
        Self {
            address: String::new(),
            phase: FormPhase::Idle,
        }
    }
}

impl LookupForm {
    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn address_mut(&mut self) -> &mut String {
        &mut self.address
    }

    pub fn phase(&self) -> &FormPhase {
        &self.phase
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, FormPhase::Loading { .. })
    }

    pub fn result(&self) -> Option<&LookupData> {
        match &self.phase {
            FormPhase::Loaded { data, .. } => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&LookupError> {
        match &self.phase {
            FormPhase::Failed(err) => Some(err),
            _ => None,
        }
    }

    pub fn can_submit(&self) -> bool {
        !self.is_loading() && normalize_address(&self.address).is_some()
    }

    pub fn shows_clear(&self) -> bool {
        matches!(self.phase, FormPhase::Loaded { .. } | FormPhase::Failed(_))
    }

    /// Validates the address and enters `Loading`. A submission issued while
    /// another is in flight supersedes it: the older settle becomes stale.
    pub fn submit(&mut self) -> Option<LookupTicket> {
        let Some(address) = normalize_address(&self.address) else {
            self.phase = FormPhase::Failed(LookupError::EmptyAddress);
            return None;
        };

        let ticket = LookupTicket {
            request_id: Uuid::new_v4(),
            address: address.to_string(),
        };
        self.phase = FormPhase::Loading {
            request_id: ticket.request_id,
        };
        Some(ticket)
    }

    /// Applies the outcome of the in-flight lookup. Outcomes for any other
    /// request are dropped.
    pub fn settle(
        &mut self,
        request_id: Uuid,
        outcome: Result<LookupData, LookupError>,
    ) -> SettleOutcome {
        match self.phase {
            FormPhase::Loading { request_id: current } if current == request_id => {}
            _ => return SettleOutcome::Stale,
        }

        self.phase = match outcome {
            Ok(data) => FormPhase::Loaded { request_id, data },
            Err(err) => FormPhase::Failed(err),
        };
        SettleOutcome::Applied
    }

    pub fn clear(&mut self) {
        self.address.clear();
        self.phase = FormPhase::Idle;
    }
}
