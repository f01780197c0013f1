use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::errors::FormError;

/// Shared "still mounted" flag of a component.
///
/// Tickets handed out for in-flight requests hold a clone, so a response that
/// arrives after `unmount()` can be recognised and dropped.
#[derive(Debug, Clone)]
pub struct Liveness(Arc<AtomicBool>);

impl Liveness {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }

    pub fn is_alive(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    pub fn unmount(&self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Default for Liveness {
    fn default() -> Self {
        Self::new()
    }
}

/// Proof that a submission was admitted by a `SubmitGate`.
/// Must be handed back when the response is applied.
#[derive(Debug)]
pub struct Ticket {
    liveness: Liveness,
}

impl Ticket {
    pub fn is_current(&self) -> bool {
        self.liveness.is_alive()
    }
}

/// Admits at most one in-flight submission per component.
#[derive(Debug, Default)]
pub struct SubmitGate {
    busy: bool,
    liveness: Liveness,
}

impl SubmitGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn liveness(&self) -> &Liveness {
        &self.liveness
    }

    pub fn try_begin(&mut self) -> Result<Ticket, FormError> {
        if self.busy {
            return Err(FormError::Busy);
        }
        self.busy = true;
        Ok(Ticket {
            liveness: self.liveness.clone(),
        })
    }

    /// Closes the submission opened by `ticket`.
    /// Fails with `Unmounted` when the component went away meanwhile.
    pub fn finish(&mut self, ticket: Ticket) -> Result<(), FormError> {
        self.busy = false;
        if ticket.is_current() {
            Ok(())
        } else {
            Err(FormError::Unmounted)
        }
    }

    pub fn unmount(&self) {
        self.liveness.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_begin_is_busy() {
        let mut gate = SubmitGate::new();
        let ticket = gate.try_begin().unwrap();
        assert_eq!(gate.try_begin().unwrap_err(), FormError::Busy);
        gate.finish(ticket).unwrap();
        assert!(gate.try_begin().is_ok());
    }

    #[test]
    fn test_finish_after_unmount_reports_unmounted() {
        let mut gate = SubmitGate::new();
        let ticket = gate.try_begin().unwrap();
        gate.unmount();
        assert_eq!(gate.finish(ticket).unwrap_err(), FormError::Unmounted);
        assert!(!gate.is_busy());
    }

    #[test]
    fn test_liveness_clones_share_state() {
        let a = Liveness::new();
        let b = a.clone();
        b.unmount();
        assert!(!a.is_alive());
    }
}
