/// Recorder state machine.
///
/// State transitions:
/// ```text
/// idle ──start()──→ capturing
///   ↑                   │
///   └── stop() / handler requested stop / failed device switch
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecorderState {
    #[default]
    Idle,
    Capturing,
}

impl RecorderState {
    pub fn is_capturing(&self) -> bool {
        matches!(self, Self::Capturing)
    }
}
