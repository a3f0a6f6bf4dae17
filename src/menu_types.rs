// Which screen the session is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Menu,
    Records,
    Playing,
    GameOver,
}

// Clickable buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Start,
    Records,
    Exit,
    Back,
}

// Main menu entries, in display order
pub const MENU_BUTTONS: [Button; 3] = [Button::Start, Button::Records, Button::Exit];

impl Button {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Button::Start => "START",
            Button::Records => "RECORDS",
            Button::Exit => "EXIT",
            Button::Back => "BACK",
        }
    }
}

// Keys the session reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameKey {
    Left,
    Right,
    Up,
    Down,
    Confirm,
    Back,
    Other,
}

// Sound settings the player can change from any screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioControl {
    ToggleMusic,
    ToggleSound,
    VolumeUp,
    VolumeDown,
}

// Everything the main loop feeds into the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    Quit,
    Tick,
    Key(GameKey),
    Click(Button),
    Audio(AudioControl),
}
