/// The ambient room recording made while a survey is filled in.
///
/// The embedding UI owns the actual microphone; this object only tracks the
/// lifecycle so the track can be attached to exactly one submission. The old
/// implementation wired this to a one-shot global click listener; here the UI
/// calls [`RecordingSession::start`] on first interaction instead.
#[derive(Debug, Default)]
pub struct RecordingSession {
    started: bool,
    track: Option<String>,
}

impl RecordingSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the session started. Returns `true` only on the first call, so
    /// the UI knows whether to actually open the microphone.
    pub fn start(&mut self) -> bool {
        !std::mem::replace(&mut self.started, true)
    }

    pub fn is_recording(&self) -> bool {
        self.started && self.track.is_none()
    }

    /// Store the captured track as a data URI. Ignored when the session was
    /// never started; capture failures just leave the track absent.
    pub fn stop(&mut self, data_uri: String) {
        if self.started {
            self.track = Some(data_uri);
        }
    }

    /// Take the track for attachment. At most one submission receives it.
    pub fn flush(&mut self) -> Option<String> {
        self.track.take()
    }
}
