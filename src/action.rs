/// Application actions representing all possible state transitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // Core events
    Tick,
    Quit,

    // Navigation
    NextField,
    PrevField,
    Up,
    Down,
    Left,
    Right,
    Confirm,
    Cancel,

    // Text input
    InputChar(char),
    InputBackspace,

    // Destination list
    AddDestination,
    RemoveDestination,

    // Budget screen
    EditTrip,
    Refresh,
    ToggleViewAll,

    // UI toggles
    ToggleHelp,
}
