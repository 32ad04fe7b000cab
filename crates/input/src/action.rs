use glam::Vec2;
use std::collections::BTreeMap;

/// A high-level action produced from raw input.
///
/// The kernel consumes actions, never raw window events, so the desktop app
/// and the headless runner drive the same logic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Send every exhibit back to its home position.
    Reset,
    /// Orbit the camera by a pointer drag in pixels.
    Orbit(Vec2),
    /// Zoom the camera; positive moves away from the target.
    Zoom(f32),
    /// Input with no binding.
    Noop,
}

/// Keys the showcase can bind. Windowing backends translate into these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    Enter,
    Space,
    Escape,
    Backspace,
    F1,
    Char(char),
}

impl std::str::FromStr for Key {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Enter" => Ok(Self::Enter),
            "Space" => Ok(Self::Space),
            "Escape" => Ok(Self::Escape),
            "Backspace" => Ok(Self::Backspace),
            "F1" => Ok(Self::F1),
            _ => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Ok(Self::Char(c.to_ascii_lowercase())),
                    _ => Err(format!("unknown key name '{s}'")),
                }
            }
        }
    }
}

/// Discrete actions a key press can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Reset,
}

impl From<KeyAction> for Action {
    fn from(action: KeyAction) -> Self {
        match action {
            KeyAction::Reset => Action::Reset,
        }
    }
}

/// Key-press to action table.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyBindings {
    bindings: BTreeMap<Key, KeyAction>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        let mut bindings = BTreeMap::new();
        bindings.insert(Key::Enter, KeyAction::Reset);
        Self { bindings }
    }
}

impl KeyBindings {
    /// No keys bound.
    pub fn empty() -> Self {
        Self {
            bindings: BTreeMap::new(),
        }
    }

    pub fn bind(&mut self, key: Key, action: KeyAction) {
        self.bindings.insert(key, action);
    }

    /// Action for a key press; unbound keys map to [`Action::Noop`].
    pub fn map_key(&self, key: Key) -> Action {
        match self.bindings.get(&key) {
            Some(action) => (*action).into(),
            None => {
                tracing::trace!(?key, "unbound key");
                Action::Noop
            }
        }
    }

    /// Pointer drag while the orbit button is held.
    pub fn map_drag(&self, delta: Vec2) -> Action {
        if delta == Vec2::ZERO {
            Action::Noop
        } else {
            Action::Orbit(delta)
        }
    }

    /// Scroll wheel; scrolling up zooms in.
    pub fn map_scroll(&self, lines: f32) -> Action {
        if lines == 0.0 {
            Action::Noop
        } else {
            Action::Zoom(-lines)
        }
    }
}
