//! Input handling and per-tick glue.

pub mod camera_controller;
pub mod session;

/// Logical keys the core reacts to.
///
/// Hosts map their own key codes onto these, see [`Ctx::event`] for the crossterm mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Key {
    RotateLeft = 0,
    RotateRight,
    LookUp,
    LookDown,
    MoveForward,
    MoveBack,
    StrafeLeft,
    StrafeRight,
}

/// Snapshot of which [`Key`]s are held down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyboardState {
    pressed: u8,
}

impl KeyboardState {
    pub fn set(&mut self, key: Key, pressed: bool) {
        let bit = 1 << key as u8;
        if pressed {
            self.pressed |= bit;
        } else {
            self.pressed &= !bit;
        }
    }

    pub fn is_pressed(&self, key: Key) -> bool {
        self.pressed & (1 << key as u8) != 0
    }

    pub fn any(&self) -> bool {
        self.pressed != 0
    }

    /// Releases every key.
    pub fn clear(&mut self) {
        self.pressed = 0;
    }
}

/// Defines a context state.
///
/// The context accumulates host input between ticks. It is up to the user to decide how to fill
/// it, however, with `crossterm` feature enabled, [`Ctx::event`] processes raw terminal events.
///
/// Terminals that do not report key releases only send repeated presses. Leave
/// `release_events` unset for those, and [`Ctx::new_frame`] will treat every press as lasting a
/// single tick.
#[derive(Debug, Default)]
pub struct Ctx {
    pub keys: KeyboardState,
    pub release_events: bool,
    pub should_stop: bool,
}

impl Ctx {
    pub fn new(release_events: bool) -> Self {
        Self {
            release_events,
            ..Default::default()
        }
    }

    /// Prepares input state for the next tick.
    ///
    /// Call after the current tick consumed [`Ctx::keys`].
    pub fn new_frame(&mut self) {
        if !self.release_events {
            self.keys.clear();
        }
    }
}

#[cfg(feature = "crossterm")]
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

#[cfg(feature = "crossterm")]
impl Key {
    pub fn from_crossterm(code: KeyCode) -> Option<Self> {
        let key = match code {
            KeyCode::Left => Self::RotateLeft,
            KeyCode::Right => Self::RotateRight,
            KeyCode::Up => Self::LookUp,
            KeyCode::Down => Self::LookDown,
            KeyCode::Char(c) => match c.to_ascii_lowercase() {
                'w' => Self::MoveForward,
                's' => Self::MoveBack,
                'a' => Self::StrafeLeft,
                'd' => Self::StrafeRight,
                _ => return None,
            },
            _ => return None,
        };
        Some(key)
    }
}

#[cfg(feature = "crossterm")]
impl Ctx {
    /// Processes a crossterm event.
    pub fn event(&mut self, e: Event) {
        let Event::Key(KeyEvent {
            code,
            modifiers,
            kind,
            ..
        }) = e
        else {
            return;
        };

        if code == KeyCode::Esc
            || code == KeyCode::Char('q')
            || (code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL))
        {
            self.should_stop = true;
            return;
        }

        if let Some(key) = Key::from_crossterm(code) {
            self.keys.set(key, kind != KeyEventKind::Release);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_independent() {
        let mut keys = KeyboardState::default();
        assert!(!keys.any());

        keys.set(Key::LookUp, true);
        keys.set(Key::StrafeRight, true);
        assert!(keys.is_pressed(Key::LookUp));
        assert!(keys.is_pressed(Key::StrafeRight));
        assert!(!keys.is_pressed(Key::LookDown));

        keys.set(Key::LookUp, false);
        assert!(!keys.is_pressed(Key::LookUp));
        assert!(keys.is_pressed(Key::StrafeRight));

        keys.clear();
        assert!(!keys.any());
    }

    #[test]
    fn presses_last_one_tick_without_releases() {
        let mut ctx = Ctx::new(false);
        ctx.keys.set(Key::MoveForward, true);
        ctx.new_frame();
        assert!(!ctx.keys.any());

        let mut ctx = Ctx::new(true);
        ctx.keys.set(Key::MoveForward, true);
        ctx.new_frame();
        assert!(ctx.keys.is_pressed(Key::MoveForward));
    }

    #[cfg(feature = "crossterm")]
    #[test]
    fn crossterm_events() {
        use crossterm::event::KeyEventState;

        let ev = |code, kind| {
            Event::Key(KeyEvent {
                code,
                modifiers: KeyModifiers::NONE,
                kind,
                state: KeyEventState::NONE,
            })
        };

        let mut ctx = Ctx::new(true);
        ctx.event(ev(KeyCode::Char('W'), KeyEventKind::Press));
        ctx.event(ev(KeyCode::Left, KeyEventKind::Repeat));
        assert!(ctx.keys.is_pressed(Key::MoveForward));
        assert!(ctx.keys.is_pressed(Key::RotateLeft));

        ctx.event(ev(KeyCode::Char('w'), KeyEventKind::Release));
        assert!(!ctx.keys.is_pressed(Key::MoveForward));
        assert!(!ctx.should_stop);

        ctx.event(ev(KeyCode::Esc, KeyEventKind::Press));
        assert!(ctx.should_stop);
    }
}
