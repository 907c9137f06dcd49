//! Arming of the reconstruction step.
//!
//! Reconstruction runs only while the trigger is armed; otherwise the session
//! reports [`SurfaceState::NotArmed`](crate::SurfaceState::NotArmed).

use serde::{Deserialize, Serialize};

/// How presses of the generate button arm reconstruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TriggerMode {
    /// Odd press counts arm, even counts disarm.
    #[default]
    Toggle,
    /// A press arms until the surface's inputs (cloud or selections) change.
    OneShot,
}

/// Armed/disarmed state of the generate button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Trigger {
    mode: TriggerMode,
    presses: u64,
    armed: bool,
}

impl Trigger {
    /// Creates a disarmed trigger.
    pub fn new(mode: TriggerMode) -> Self {
        Self {
            mode,
            presses: 0,
            armed: false,
        }
    }

    /// Returns the trigger mode.
    pub fn mode(&self) -> TriggerMode {
        self.mode
    }

    /// Returns how often the button has been pressed.
    pub fn presses(&self) -> u64 {
        self.presses
    }

    /// Returns whether reconstruction should run.
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Registers a button press.
    pub fn press(&mut self) {
        self.presses += 1;
        self.armed = match self.mode {
            TriggerMode::Toggle => self.presses % 2 == 1,
            TriggerMode::OneShot => true,
        };
    }

    /// Called when the cloud or a selection changes.
    pub fn inputs_changed(&mut self) {
        if self.mode == TriggerMode::OneShot {
            self.armed = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_parity() {
        let mut trigger = Trigger::new(TriggerMode::Toggle);
        assert!(!trigger.is_armed());
        trigger.press();
        assert!(trigger.is_armed());
        trigger.inputs_changed();
        assert!(trigger.is_armed());
        trigger.press();
        assert!(!trigger.is_armed());
        trigger.press();
        assert!(trigger.is_armed());
        assert_eq!(trigger.presses(), 3);
    }

    #[test]
    fn test_one_shot() {
        let mut trigger = Trigger::new(TriggerMode::OneShot);
        trigger.press();
        assert!(trigger.is_armed());
        trigger.press();
        assert!(trigger.is_armed());
        trigger.inputs_changed();
        assert!(!trigger.is_armed());
    }
}
