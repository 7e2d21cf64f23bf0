/// Tray icon states corresponding to application workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayIconState {
    /// Ready to capture.
    Idle,
    /// A capture session is running.
    Capturing,
}

impl TrayIconState {
    /// Tooltip shown for this state.
    pub fn tooltip(self) -> &'static str {
        match self {
            TrayIconState::Idle => "Flicker - Ready",
            TrayIconState::Capturing => "Flicker - Capturing...",
        }
    }

    /// Fill colour of the generated icon.
    pub fn color(self) -> [u8; 3] {
        match self {
            TrayIconState::Idle => [0xF9, 0x73, 0x16],
            TrayIconState::Capturing => [0xEF, 0x44, 0x44],
        }
    }
}
