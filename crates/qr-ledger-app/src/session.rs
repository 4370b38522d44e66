//! Scan session: owns the controller and funnels input and lookup completions
//! through one channel.
//!
//! Lookups run on short-lived worker threads. The session thread is the only
//! writer of [`ScanState`], so completions are applied strictly in arrival
//! order and a late response still lands after a dismiss.

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::{Duration, Instant};

use qr_ledger_core::ScanEvent;
use qr_ledger_lookup::{LookupError, RecordLookup};
use qr_ledger_scanner::{PermissionProvider, ScanInput, ScanSource, ScanSourceError};
use qr_ledger_ui::{
    ControllerOptions, LookupRequest, ScanController, ScanDecision, ScanState, Screen, Transition,
};
use tracing::{debug, info, warn};

use crate::AppError;

/// Event consumed by the session loop.
#[derive(Debug)]
pub enum SessionEvent {
    /// Input from the scanning front-end.
    Input(ScanInput),
    /// Scan source is exhausted.
    InputClosed,
    /// Scan source failed and stopped.
    InputFailed(ScanSourceError),
    /// One lookup worker finished.
    LookupFinished {
        /// Request handed out by the controller.
        request: LookupRequest,
        /// Decoded text or lookup failure.
        outcome: Result<String, LookupError>,
        /// Wall time spent in the lookup.
        elapsed: Duration,
    },
}

/// What the loop should do after one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStep {
    /// State may have changed; re-render.
    Render(Option<Transition>),
    /// Nothing visible changed.
    Idle,
    /// Stop the loop.
    Quit,
}

/// Single owner of scan state.
pub struct ScanSession {
    controller: ScanController,
    lookup: Arc<dyn RecordLookup>,
    events_tx: Sender<SessionEvent>,
    events_rx: Receiver<SessionEvent>,
    input_closed: bool,
}

impl ScanSession {
    /// Creates a session with an injected lookup client.
    pub fn new(lookup: Arc<dyn RecordLookup>, options: ControllerOptions) -> Self {
        let (events_tx, events_rx) = mpsc::channel();
        Self {
            controller: ScanController::new(options),
            lookup,
            events_tx,
            events_rx,
            input_closed: false,
        }
    }

    /// Returns current state snapshot.
    pub fn state(&self) -> &ScanState {
        self.controller.state()
    }

    /// Returns the number of lookups still running.
    pub fn pending_lookups(&self) -> usize {
        self.controller.in_flight().len()
    }

    /// Projects state into the view model.
    pub fn render(&self) -> Screen {
        self.controller.render()
    }

    /// Requests camera permission once at startup.
    ///
    /// A provider failure counts as a denial.
    pub fn mount(&mut self, provider: &dyn PermissionProvider) -> Screen {
        let granted = match provider.request_camera() {
            Ok(granted) => granted,
            Err(error) => {
                warn!(%error, "camera permission request failed");
                false
            }
        };
        self.controller.on_permission_resolved(granted);
        self.render()
    }

    /// Feeds one scan to the controller and starts the lookup it asks for.
    ///
    /// # Errors
    /// Returns [`AppError::Worker`] when the lookup thread cannot be spawned.
    pub fn handle_scan(&mut self, event: &ScanEvent) -> Result<ScanDecision, AppError> {
        let decision = self.controller.on_scan(&event.data);
        if let ScanDecision::Lookup(request) = &decision {
            self.spawn_lookup(request.clone())?;
        }
        Ok(decision)
    }

    /// Dismisses the popup.
    pub fn dismiss(&mut self) -> Screen {
        self.controller.on_dismiss();
        self.render()
    }

    /// Applies one event.
    ///
    /// # Errors
    /// Propagates lookup spawn failures and scan source failures.
    pub fn apply(&mut self, event: SessionEvent) -> Result<SessionStep, AppError> {
        match event {
            SessionEvent::Input(ScanInput::Scan(scan)) => {
                let decision = self.handle_scan(&scan)?;
                if !matches!(decision, ScanDecision::Lookup(_)) {
                    debug!(?decision, "scan produced no lookup");
                }
                Ok(SessionStep::Idle)
            }
            SessionEvent::Input(ScanInput::Tap) => {
                self.dismiss();
                Ok(SessionStep::Render(None))
            }
            SessionEvent::Input(ScanInput::Quit) => Ok(SessionStep::Quit),
            SessionEvent::InputClosed => {
                self.input_closed = true;
                debug!(pending = self.pending_lookups(), "scan input closed");
                Ok(SessionStep::Idle)
            }
            SessionEvent::InputFailed(error) => Err(AppError::Scanner(error)),
            SessionEvent::LookupFinished {
                request,
                outcome,
                elapsed,
            } => {
                info!(
                    ticket = %request.ticket,
                    elapsed_ms = elapsed.as_millis() as u64,
                    ok = outcome.is_ok(),
                    "lookup finished"
                );
                let transition = self.controller.on_lookup_resolved(&request, outcome);
                Ok(SessionStep::Render(Some(transition)))
            }
        }
    }

    /// Waits up to `timeout` for one event and applies it.
    ///
    /// # Returns
    /// `Ok(None)` when no event arrived in time.
    ///
    /// # Errors
    /// See [`ScanSession::apply`].
    pub fn pump(&mut self, timeout: Duration) -> Result<Option<SessionStep>, AppError> {
        // The session owns a sender, so the channel only ever times out.
        match self.events_rx.recv_timeout(timeout) {
            Ok(event) => self.apply(event).map(Some),
            Err(_) => Ok(None),
        }
    }

    /// Runs until the source quits, or is exhausted and all lookups have
    /// finished.
    ///
    /// `on_render` is called with the initial screen and after every visible
    /// state change.
    ///
    /// # Errors
    /// Returns [`AppError`] on worker spawn or scan source failure.
    pub fn run(
        &mut self,
        source: Box<dyn ScanSource>,
        on_render: &mut dyn FnMut(&Screen, Option<Transition>),
    ) -> Result<(), AppError> {
        self.spawn_reader(source)?;
        on_render(&self.render(), None);

        loop {
            let event = self.events_rx.recv().map_err(|_| {
                AppError::Worker("session event channel closed unexpectedly".to_string())
            })?;
            match self.apply(event)? {
                SessionStep::Render(transition) => on_render(&self.render(), transition),
                SessionStep::Idle => {}
                SessionStep::Quit => break,
            }
            if self.is_drained() {
                break;
            }
        }

        info!(pending = self.pending_lookups(), "scan session finished");
        Ok(())
    }

    /// Returns `true` once input is exhausted and no lookup is running.
    pub fn is_drained(&self) -> bool {
        self.input_closed && self.pending_lookups() == 0
    }

    fn spawn_lookup(&self, request: LookupRequest) -> Result<(), AppError> {
        let lookup = Arc::clone(&self.lookup);
        let events_tx = self.events_tx.clone();

        std::thread::Builder::new()
            .name(format!("qr-ledger-lookup-{}", request.ticket.0))
            .spawn(move || {
                let started = Instant::now();
                let outcome = lookup.get_record_by_id(&request.identifier);
                let _ = events_tx.send(SessionEvent::LookupFinished {
                    request,
                    outcome,
                    elapsed: started.elapsed(),
                });
            })
            .map_err(|error| AppError::Worker(format!("failed to spawn lookup thread: {error}")))?;
        Ok(())
    }

    fn spawn_reader(&self, mut source: Box<dyn ScanSource>) -> Result<(), AppError> {
        let events_tx = self.events_tx.clone();

        // Detached: a reader blocked on stdin must not hold up shutdown.
        std::thread::Builder::new()
            .name("qr-ledger-scan-reader".to_string())
            .spawn(move || {
                loop {
                    let event = match source.next_input() {
                        Ok(Some(input)) => SessionEvent::Input(input),
                        Ok(None) => SessionEvent::InputClosed,
                        Err(error) => SessionEvent::InputFailed(error),
                    };
                    let last = !matches!(event, SessionEvent::Input(_));
                    if events_tx.send(event).is_err() || last {
                        break;
                    }
                }
            })
            .map_err(|error| AppError::Worker(format!("failed to spawn scan reader: {error}")))?;
        Ok(())
    }
}
