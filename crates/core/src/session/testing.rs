//! Scripted transport and recording sink shared by the session tests.

use std::{
    collections::VecDeque,
    sync::Arc,
    thread::{self, ThreadId},
    time::{Duration, Instant},
};

use parking_lot::Mutex;

use crate::{
    events::{EventSink, SessionEvent},
    models::{Endpoint, TransportResult, TransportStatus},
    transport::Transport,
};

/// Stack size no OS will map, used to make a poller spawn fail.
pub(crate) const UNSPAWNABLE_STACK: usize = (isize::MAX as usize) & !0xFFFF;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Call {
    Open,
    Send,
    Receive,
    Close,
}

#[derive(Default)]
struct Script {
    open: VecDeque<TransportStatus>,
    send: VecDeque<TransportResult>,
    receive: VecDeque<TransportResult>,
    calls: Vec<Call>,
    receivers: Vec<(ThreadId, Option<String>)>,
    panic_on_receive: bool,
}

/// Transport whose answers are queued up front. Unscripted calls succeed
/// with an empty payload.
#[derive(Clone, Default)]
pub(crate) struct ScriptedTransport {
    script: Arc<Mutex<Script>>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push_open(&self, status: TransportStatus) {
        self.script.lock().open.push_back(status);
    }

    pub(crate) fn push_send(&self, result: TransportResult) {
        self.script.lock().send.push_back(result);
    }

    pub(crate) fn push_receive(&self, result: TransportResult) {
        self.script.lock().receive.push_back(result);
    }

    pub(crate) fn panic_on_receive(&self) {
        self.script.lock().panic_on_receive = true;
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.script.lock().calls.clone()
    }

    /// Id and name of the thread behind every `receive` call, in order.
    pub(crate) fn receivers(&self) -> Vec<(ThreadId, Option<String>)> {
        self.script.lock().receivers.clone()
    }

    pub(crate) fn count(&self, call: Call) -> usize {
        self.script
            .lock()
            .calls
            .iter()
            .filter(|recorded| **recorded == call)
            .count()
    }
}

impl Transport for ScriptedTransport {
    fn open(&self, _endpoint: &Endpoint) -> TransportStatus {
        let mut script = self.script.lock();
        script.calls.push(Call::Open);
        script.open.pop_front().unwrap_or(TransportStatus::Success)
    }

    fn send(&self, _endpoint: &Endpoint, _data: &[u8]) -> TransportResult {
        let mut script = self.script.lock();
        script.calls.push(Call::Send);
        script
            .send
            .pop_front()
            .unwrap_or_else(|| TransportResult::success(Vec::new()))
    }

    fn receive(&self, _endpoint: &Endpoint) -> TransportResult {
        let mut script = self.script.lock();
        script.calls.push(Call::Receive);
        let current = thread::current();
        script
            .receivers
            .push((current.id(), current.name().map(str::to_string)));
        if script.panic_on_receive {
            drop(script);
            panic!("scripted receive failure");
        }
        script
            .receive
            .pop_front()
            .unwrap_or_else(|| TransportResult::success(Vec::new()))
    }

    fn close(&self, _endpoint: &Endpoint) {
        self.script.lock().calls.push(Call::Close);
    }
}

/// Sink that keeps every event for later inspection.
#[derive(Clone, Default)]
pub(crate) struct RecordingSink {
    events: Arc<Mutex<Vec<SessionEvent>>>,
}

impl RecordingSink {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn events(&self) -> Vec<SessionEvent> {
        self.events.lock().clone()
    }

    pub(crate) fn count(&self, event: &SessionEvent) -> usize {
        self.events
            .lock()
            .iter()
            .filter(|recorded| *recorded == event)
            .count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: SessionEvent) {
        self.events.lock().push(event);
    }
}

/// Poll `condition` for up to two seconds.
pub(crate) fn wait_until(mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(2);
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(1));
    }
    condition()
}
