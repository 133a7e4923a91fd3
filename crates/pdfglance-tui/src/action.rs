/// A user intent decoded from a terminal event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    /// Ctrl+C: leave without the confirmation dialog.
    ForceQuit,
    MoveDown,
    MoveUp,
    PageDown,
    PageUp,
    GoTop,
    GoBottom,
    DrillIn,
    NavigateBack,
    OpenFile,
    ExtractText,
    CopyText,
    ToggleHelp,
    Resize(u16, u16),
    Tick,
    None,
}
