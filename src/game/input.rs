//! The input provider boundary.
//!
//! The simulation never touches devices; it only reads [`ControlState`],
//! refreshed once per frame. A connected gamepad is the preferred device
//! (left stick past a tilt threshold, or the d-pad); without one the
//! keyboard is used. When nothing is pressed the state is neutral, so a
//! missing or idle device always degrades to "no input" rather than an
//! error the simulation could see.

use bevy::prelude::*;

use crate::{AppSystems, screens::Screen};

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<ControlState>();
    app.register_type::<ControlState>();

    app.add_systems(
        Update,
        gather_input
            .in_set(AppSystems::RecordInput)
            .run_if(in_state(Screen::Gameplay)),
    );
    app.add_systems(OnExit(Screen::Gameplay), neutralize);
}

/// Stick deflection below this reads as centered.
const STICK_THRESHOLD: f32 = 0.25;

/// The discrete input signals the simulation consumes each tick.
#[derive(Resource, Debug, Default, Reflect)]
#[reflect(Resource)]
pub struct ControlState {
    /// Requested horizontal direction: -1, 0 or +1.
    pub dir: i8,
    /// Fire held this frame.
    pub fire: bool,
    /// Restart pressed this frame; only meaningful while dead.
    pub restart: bool,
}

fn gather_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    gamepads: Query<&Gamepad>,
    mut control: ResMut<ControlState>,
) {
    if let Some(pad) = gamepads.iter().next() {
        let left = pad.pressed(GamepadButton::DPadLeft);
        let right = pad.pressed(GamepadButton::DPadRight);
        control.dir = discrete_direction(pad.left_stick().x, left, right);
        control.fire = pad.pressed(GamepadButton::South);
        control.restart = pad.just_pressed(GamepadButton::South);
        return;
    }

    let left = keyboard.pressed(KeyCode::ArrowLeft) || keyboard.pressed(KeyCode::KeyA);
    let right = keyboard.pressed(KeyCode::ArrowRight) || keyboard.pressed(KeyCode::KeyD);
    control.dir = discrete_direction(0.0, left, right);
    control.fire = keyboard.pressed(KeyCode::Space);
    control.restart = keyboard.just_pressed(KeyCode::Space);
}

fn neutralize(mut control: ResMut<ControlState>) {
    *control = ControlState::default();
}

/// Collapse an analog deflection plus digital presses into {-1, 0, +1}.
/// Opposite digital presses cancel out.
fn discrete_direction(stick_x: f32, left: bool, right: bool) -> i8 {
    if left && !right {
        return -1;
    }
    if right && !left {
        return 1;
    }
    if stick_x <= -STICK_THRESHOLD {
        -1
    } else if stick_x >= STICK_THRESHOLD {
        1
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_stick_is_neutral() {
        assert_eq!(discrete_direction(0.0, false, false), 0);
        assert_eq!(discrete_direction(0.2, false, false), 0);
        assert_eq!(discrete_direction(-0.2, false, false), 0);
    }

    #[test]
    fn tilt_past_threshold_moves() {
        assert_eq!(discrete_direction(-0.6, false, false), -1);
        assert_eq!(discrete_direction(0.6, false, false), 1);
    }

    #[test]
    fn digital_presses_override_stick() {
        assert_eq!(discrete_direction(0.9, true, false), -1);
        assert_eq!(discrete_direction(-0.9, false, true), 1);
        assert_eq!(discrete_direction(0.9, true, true), 1);
    }
}
