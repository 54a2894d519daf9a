use crate::ports::{Edge, Level};

/// Turns a bouncing button signal into clean press events.
///
/// A falling edge opens a debounce window during which further edges are not observed (the
/// caller disables the edge interrupt). When the window's one-shot timer expires the pin is
/// sampled again and a press is reported only if it is still asserted. Either way edge detection
/// is re-enabled afterwards, so bounce shorter than the window produces at most one press.
#[derive(Debug, Default)]
pub struct DebounceGuard {
    state: DebounceState,
}

impl DebounceGuard {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: DebounceState::Armed,
        }
    }

    #[inline]
    #[must_use]
    pub fn state(&self) -> DebounceState {
        self.state
    }

    /// Handles an edge interrupt.
    ///
    /// On [`GuardAction::StartWindow`] the caller must disable the edge interrupt and start the
    /// one-shot debounce timer.
    pub fn on_edge(&mut self, edge: Edge) -> GuardAction {
        match (self.state, edge) {
            (DebounceState::Armed | DebounceState::Confirmed, Edge::Falling) => {
                self.state = DebounceState::Debouncing;
                transition!("debounce window opened");
                GuardAction::StartWindow
            }
            _ => GuardAction::Ignore,
        }
    }

    /// Handles the debounce timer expiry with the pin level sampled at that moment.
    ///
    /// The caller stops the timer and re-enables the edge interrupt regardless of the outcome.
    #[must_use]
    pub fn on_expiry(&mut self, level: Level) -> Option<ButtonPress> {
        if self.state != DebounceState::Debouncing {
            return None;
        }

        match level {
            Level::Asserted => {
                self.state = DebounceState::Confirmed;
                transition!("button press confirmed");
                Some(ButtonPress)
            }
            Level::Released => {
                self.state = DebounceState::Armed;
                transition!("button bounce rejected");
                None
            }
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DebounceState {
    /// Waiting for a falling edge.
    #[default]
    Armed,
    /// Edge interrupt disabled, waiting for the one-shot timer.
    Debouncing,
    /// The last window ended with the button still pressed. Behaves like [`DebounceState::Armed`].
    Confirmed,
}

/// What the caller must do after feeding an edge to the guard.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardAction {
    StartWindow,
    Ignore,
}

/// A debounced button press.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ButtonPress;

#[cfg(test)]
mod tests {
    use super::{ButtonPress, DebounceGuard, DebounceState, GuardAction};
    use crate::ports::{Edge, Level};

    #[test]
    fn test_clean_press() {
        let mut guard = DebounceGuard::new();

        assert_eq!(guard.on_edge(Edge::Falling), GuardAction::StartWindow);
        assert_eq!(guard.state(), DebounceState::Debouncing);
        assert_eq!(guard.on_expiry(Level::Asserted), Some(ButtonPress));
        assert_eq!(guard.state(), DebounceState::Confirmed);
    }

    #[test]
    fn test_bounce_inside_window_ignored() {
        let mut guard = DebounceGuard::new();

        assert_eq!(guard.on_edge(Edge::Falling), GuardAction::StartWindow);
        for _ in 0..5 {
            assert_eq!(guard.on_edge(Edge::Rising), GuardAction::Ignore);
            assert_eq!(guard.on_edge(Edge::Falling), GuardAction::Ignore);
        }
        assert_eq!(guard.on_expiry(Level::Asserted), Some(ButtonPress));
    }

    #[test]
    fn test_glitch_rejected_and_rearmed() {
        let mut guard = DebounceGuard::new();

        guard.on_edge(Edge::Falling);
        assert_eq!(guard.on_expiry(Level::Released), None);
        assert_eq!(guard.state(), DebounceState::Armed);

        assert_eq!(guard.on_edge(Edge::Falling), GuardAction::StartWindow);
    }

    #[test]
    fn test_confirmed_accepts_next_press() {
        let mut guard = DebounceGuard::new();

        guard.on_edge(Edge::Falling);
        let _ = guard.on_expiry(Level::Asserted);

        assert_eq!(guard.on_edge(Edge::Rising), GuardAction::Ignore);
        assert_eq!(guard.on_edge(Edge::Falling), GuardAction::StartWindow);
        assert_eq!(guard.on_expiry(Level::Asserted), Some(ButtonPress));
    }

    #[test]
    fn test_expiry_without_window_ignored() {
        let mut guard = DebounceGuard::new();

        assert_eq!(guard.on_expiry(Level::Asserted), None);
        assert_eq!(guard.state(), DebounceState::Armed);
    }
}
