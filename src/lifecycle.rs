use winit::keyboard::KeyCode;

use crate::input::InputEvent;

/// Render loop state. `Closing` is terminal.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopState {
    #[default]
    Running,
    Closing,
}

/// Why the loop left `Running`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CloseReason {
    Window,
    Escape,
    Fatal,
}

impl LoopState {
    pub(crate) fn should_close(self) -> bool {
        self == Self::Closing
    }

    pub(crate) fn should_draw(self) -> bool {
        self == Self::Running
    }

    /// Idempotent. Returns true only on the transition out of `Running`.
    pub(crate) fn request_close(&mut self, reason: CloseReason) -> bool {
        if self.should_close() {
            return false;
        }

        log::info!("closing: {reason:?}");
        *self = Self::Closing;
        true
    }

    pub(crate) fn handle(&mut self, event: &InputEvent) {
        match event {
            InputEvent::CloseRequested => {
                self.request_close(CloseReason::Window);
            }
            InputEvent::Key {
                code: KeyCode::Escape,
                pressed: true,
            } => {
                self.request_close(CloseReason::Escape);
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, pressed: bool) -> InputEvent {
        InputEvent::Key { code, pressed }
    }

    #[test]
    fn starts_running() {
        let state = LoopState::default();
        assert_eq!(state, LoopState::Running);
        assert!(state.should_draw());
        assert!(!state.should_close());
    }

    #[test]
    fn escape_press_closes() {
        let mut state = LoopState::default();
        state.handle(&key(KeyCode::Escape, true));
        assert_eq!(state, LoopState::Closing);
        assert!(!state.should_draw());
    }

    #[test]
    fn window_close_matches_escape() {
        let mut by_window = LoopState::default();
        by_window.handle(&InputEvent::CloseRequested);

        let mut by_escape = LoopState::default();
        by_escape.handle(&key(KeyCode::Escape, true));

        assert_eq!(by_window, by_escape);
        assert!(by_window.should_close());
    }

    #[test]
    fn escape_release_and_other_keys_are_ignored() {
        let mut state = LoopState::default();
        state.handle(&key(KeyCode::Escape, false));
        state.handle(&key(KeyCode::Space, true));
        state.handle(&InputEvent::Resized {
            width: 10,
            height: 10,
        });
        state.handle(&InputEvent::Redraw);
        assert_eq!(state, LoopState::Running);
    }

    #[test]
    fn close_is_idempotent_and_terminal() {
        let mut state = LoopState::default();
        assert!(state.request_close(CloseReason::Escape));
        assert!(!state.request_close(CloseReason::Window));

        state.handle(&key(KeyCode::Enter, true));
        state.handle(&InputEvent::Redraw);
        assert_eq!(state, LoopState::Closing);
        assert!(!state.should_draw());
    }
}
