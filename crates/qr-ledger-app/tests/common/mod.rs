//! Shared fixtures for app integration tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use qr_ledger_app::{ScanSession, SessionStep};
use qr_ledger_lookup::{LookupError, RecordLookup};

/// Lookup answering from a fixed table and recording every call.
#[derive(Debug, Default)]
pub struct ScriptedLookup {
    answers: HashMap<String, String>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedLookup {
    /// Creates a lookup resolving each `(identifier, text)` pair.
    #[allow(dead_code)]
    pub fn with_answers(answers: &[(&str, &str)]) -> Self {
        Self {
            answers: answers
                .iter()
                .map(|(id, text)| (id.to_string(), text.to_string()))
                .collect(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Returns identifiers looked up so far.
    #[allow(dead_code)]
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("call lock should work").clone()
    }
}

impl RecordLookup for ScriptedLookup {
    fn get_record_by_id(&self, id: &str) -> Result<String, LookupError> {
        self.calls
            .lock()
            .expect("call lock should work")
            .push(id.to_string());
        self.answers
            .get(id)
            .cloned()
            .ok_or_else(|| LookupError::NotFound(id.to_string()))
    }
}

/// Pumps the session until a lookup completion has been rendered.
#[allow(dead_code)]
pub fn wait_for_lookup(session: &mut ScanSession) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        let step = session
            .pump(Duration::from_millis(50))
            .expect("session event should apply");
        if matches!(step, Some(SessionStep::Render(Some(_)))) {
            return;
        }
    }
    panic!("lookup did not complete in time");
}
