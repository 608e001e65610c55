//! Per-operation state machines with request fencing.
//!
//! Every operation kind moves `Idle -> Pending -> Succeeded | Failed`.
//! Starting a request issues a new [`RequestToken`]; only the response
//! carrying the latest token may update the state. Older responses are
//! discarded and reported as [`RefinerError::Superseded`].

use refiner_core::error::{RefinerError, Result};
use refiner_core::operation::OperationKind;
use refiner_core::warning::Generated;
use serde::Serialize;

/// Identifies one request of one operation kind.
///
/// Tokens increase monotonically per slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn value(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum OperationState<T> {
    Idle,
    Pending { token: RequestToken },
    Succeeded(T),
    Failed(RefinerError),
}

impl<T> Default for OperationState<T> {
    fn default() -> Self {
        OperationState::Idle
    }
}

impl<T> OperationState<T> {
    pub fn is_idle(&self) -> bool {
        matches!(self, OperationState::Idle)
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, OperationState::Pending { .. })
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            OperationState::Succeeded(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&RefinerError> {
        match self {
            OperationState::Failed(err) => Some(err),
            _ => None,
        }
    }
}

/// State of one operation kind plus its token counter.
#[derive(Debug, Clone)]
pub struct OperationSlot<T> {
    kind: OperationKind,
    issued: u64,
    current: Option<RequestToken>,
    state: OperationState<T>,
}

impl<T: Clone> OperationSlot<T> {
    pub fn new(kind: OperationKind) -> Self {
        Self {
            kind,
            issued: 0,
            current: None,
            state: OperationState::Idle,
        }
    }

    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    pub fn state(&self) -> &OperationState<T> {
        &self.state
    }

    pub fn value(&self) -> Option<&T> {
        self.state.value()
    }

    /// Starts a request, superseding any request still in flight.
    pub fn begin(&mut self) -> RequestToken {
        self.issued += 1;
        let token = RequestToken(self.issued);
        self.current = Some(token);
        self.state = OperationState::Pending { token };
        token
    }

    /// Whether `token` is the request the slot is waiting for.
    pub fn is_current(&self, token: RequestToken) -> bool {
        self.current == Some(token)
    }

    /// Records the response of `token` and passes it through.
    ///
    /// A stale token leaves the state untouched and yields `Superseded`.
    pub fn resolve(
        &mut self,
        token: RequestToken,
        result: Result<Generated<T>>,
    ) -> Result<Generated<T>> {
        match result {
            Ok(generated) => {
                self.check_current(token)?;
                self.current = None;
                self.state = OperationState::Succeeded(generated.value.clone());
                Ok(generated)
            }
            Err(err) => Err(self.fail(token, err)),
        }
    }

    /// Records a failure of `token` and returns the error to report.
    pub fn fail(&mut self, token: RequestToken, err: RefinerError) -> RefinerError {
        if let Err(superseded) = self.check_current(token) {
            return superseded;
        }
        self.current = None;
        self.state = OperationState::Failed(err.clone());
        err
    }

    /// Errors with `Superseded` unless `token` is current.
    pub fn check_current(&self, token: RequestToken) -> Result<()> {
        if self.is_current(token) {
            return Ok(());
        }
        tracing::warn!(
            operation = %self.kind,
            token = token.value(),
            "Discarding response of a superseded request"
        );
        Err(RefinerError::Superseded {
            operation: self.kind,
        })
    }

    /// Sets a value directly, e.g. when reloading from history.
    pub fn restore(&mut self, value: T) {
        self.current = None;
        self.state = OperationState::Succeeded(value);
    }

    /// Back to `Idle`; in-flight requests become stale.
    pub fn reset(&mut self) {
        self.current = None;
        self.state = OperationState::Idle;
    }
}
