#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    MoveLeft,
    MoveRight,
    Jump,
    Shoot,
    Down,
    Exit,
}

const ACTION_COUNT: usize = 6;

impl InputAction {
    pub const ALL: [InputAction; ACTION_COUNT] = [
        InputAction::MoveLeft,
        InputAction::MoveRight,
        InputAction::Jump,
        InputAction::Shoot,
        InputAction::Down,
        InputAction::Exit,
    ];

    const fn index(self) -> usize {
        match self {
            InputAction::MoveLeft => 0,
            InputAction::MoveRight => 1,
            InputAction::Jump => 2,
            InputAction::Shoot => 3,
            InputAction::Down => 4,
            InputAction::Exit => 5,
        }
    }

    pub fn as_token(self) -> &'static str {
        match self {
            InputAction::MoveLeft => "left",
            InputAction::MoveRight => "right",
            InputAction::Jump => "jump",
            InputAction::Shoot => "shoot",
            InputAction::Down => "down",
            InputAction::Exit => "exit",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|action| action.as_token() == token)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct ActionStates {
    down: [bool; ACTION_COUNT],
}

impl ActionStates {
    pub(crate) fn set(&mut self, action: InputAction, is_down: bool) {
        self.down[action.index()] = is_down;
    }

    pub(crate) fn is_down(&self, action: InputAction) -> bool {
        self.down[action.index()]
    }
}

/// Action states for one frame: what is held right now, and what went down
/// since the previous frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    held: ActionStates,
    pressed: ActionStates,
}

impl InputSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_down(&self, action: InputAction) -> bool {
        self.held.is_down(action)
    }

    pub fn was_pressed(&self, action: InputAction) -> bool {
        self.pressed.is_down(action)
    }

    pub fn with_action_down(mut self, action: InputAction, is_down: bool) -> Self {
        self.held.set(action, is_down);
        self
    }

    /// Marks a fresh press. A pressed action is also held.
    pub fn with_action_pressed(mut self, action: InputAction) -> Self {
        self.pressed.set(action, true);
        self.held.set(action, true);
        self
    }
}

/// Folds press/release events into per-frame snapshots.
#[derive(Debug, Default)]
pub struct InputCollector {
    held: ActionStates,
    pressed_edges: ActionStates,
}

impl InputCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, action: InputAction) {
        if !self.held.is_down(action) {
            self.pressed_edges.set(action, true);
        }
        self.held.set(action, true);
    }

    pub fn release(&mut self, action: InputAction) {
        self.held.set(action, false);
    }

    pub fn release_all(&mut self) {
        self.held = ActionStates::default();
    }

    pub fn snapshot_for_frame(&mut self) -> InputSnapshot {
        let snapshot = InputSnapshot {
            held: self.held,
            pressed: self.pressed_edges,
        };
        self.pressed_edges = ActionStates::default();
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_sets_edge_once_per_hold() {
        let mut collector = InputCollector::new();
        collector.press(InputAction::Jump);
        collector.press(InputAction::Jump);

        let first = collector.snapshot_for_frame();
        assert!(first.was_pressed(InputAction::Jump));
        assert!(first.is_down(InputAction::Jump));

        let second = collector.snapshot_for_frame();
        assert!(!second.was_pressed(InputAction::Jump));
        assert!(second.is_down(InputAction::Jump));
    }

    #[test]
    fn release_then_press_produces_new_edge() {
        let mut collector = InputCollector::new();
        collector.press(InputAction::Down);
        let _ = collector.snapshot_for_frame();
        collector.release(InputAction::Down);
        collector.press(InputAction::Down);
        assert!(collector.snapshot_for_frame().was_pressed(InputAction::Down));
    }

    #[test]
    fn tap_within_one_frame_is_still_seen_as_pressed() {
        let mut collector = InputCollector::new();
        collector.press(InputAction::Exit);
        collector.release(InputAction::Exit);
        let snapshot = collector.snapshot_for_frame();
        assert!(snapshot.was_pressed(InputAction::Exit));
        assert!(!snapshot.is_down(InputAction::Exit));
    }

    #[test]
    fn release_all_keeps_pending_edges() {
        let mut collector = InputCollector::new();
        collector.press(InputAction::MoveLeft);
        collector.press(InputAction::Shoot);
        collector.release_all();
        let snapshot = collector.snapshot_for_frame();
        assert!(!snapshot.is_down(InputAction::MoveLeft));
        assert!(snapshot.was_pressed(InputAction::Shoot));
    }

    #[test]
    fn snapshot_builders_compose() {
        let snapshot = InputSnapshot::empty()
            .with_action_down(InputAction::MoveRight, true)
            .with_action_pressed(InputAction::Jump);
        assert!(snapshot.is_down(InputAction::MoveRight));
        assert!(!snapshot.was_pressed(InputAction::MoveRight));
        assert!(snapshot.was_pressed(InputAction::Jump));
        assert!(snapshot.is_down(InputAction::Jump));
    }

    #[test]
    fn tokens_round_trip_for_every_action() {
        for action in InputAction::ALL {
            assert_eq!(InputAction::from_token(action.as_token()), Some(action));
        }
        assert_eq!(InputAction::from_token("fly"), None);
    }
}
