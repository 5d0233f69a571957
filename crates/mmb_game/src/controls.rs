//! Keyboard state turned into a per-tick movement intent.
//!
//! Window events only update `InputState`. Once per tick the game reads the
//! edges that arrived since the previous tick, plus the keys still held, and
//! turns them into one `TickIntent`, so the simulation never sees input
//! mid-step.

use mmb_core::input::{InputState, Key};

const RIGHT_KEYS: [Key; 2] = [Key::Right, Key::D];
const LEFT_KEYS: [Key; 2] = [Key::Left, Key::A];
const JUMP_KEYS: [Key; 3] = [Key::Space, Key::Up, Key::W];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveCommand {
    Left,
    Right,
    Stop,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickIntent {
    /// `None` keeps the current horizontal velocity.
    pub movement: Option<MoveCommand>,
    pub jump: bool,
}

impl TickIntent {
    /// A fresh press wins, Right over Left when both arrive in one tick.
    /// Otherwise the held keys decide: one direction held walks that way,
    /// none held stops, both held keeps the current velocity. A release whose
    /// edge was consumed during a pause still stops the player afterwards.
    pub fn from_input(input: &InputState) -> Self {
        let movement = if input.any_just_pressed(&RIGHT_KEYS) {
            Some(MoveCommand::Right)
        } else if input.any_just_pressed(&LEFT_KEYS) {
            Some(MoveCommand::Left)
        } else {
            held_movement(input)
        };
        Self {
            movement,
            jump: input.any_just_pressed(&JUMP_KEYS),
        }
    }
}

fn held_movement(input: &InputState) -> Option<MoveCommand> {
    let left = LEFT_KEYS.iter().any(|k| input.is_held(*k));
    let right = RIGHT_KEYS.iter().any(|k| input.is_held(*k));
    match (left, right) {
        (true, false) => Some(MoveCommand::Left),
        (false, true) => Some(MoveCommand::Right),
        (false, false) => Some(MoveCommand::Stop),
        (true, true) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_input_stops() {
        let input = InputState::new();
        assert_eq!(
            TickIntent::from_input(&input),
            TickIntent {
                movement: Some(MoveCommand::Stop),
                jump: false,
            }
        );
    }

    #[test]
    fn press_hold_and_release() {
        let mut input = InputState::new();
        input.key_down(Key::D);
        assert_eq!(
            TickIntent::from_input(&input).movement,
            Some(MoveCommand::Right)
        );
        input.end_tick();

        assert_eq!(
            TickIntent::from_input(&input).movement,
            Some(MoveCommand::Right)
        );

        input.key_up(Key::D);
        assert_eq!(
            TickIntent::from_input(&input).movement,
            Some(MoveCommand::Stop)
        );
    }

    #[test]
    fn release_then_press_in_same_tick_switches_direction() {
        let mut input = InputState::new();
        input.key_down(Key::Right);
        input.end_tick();

        input.key_up(Key::Right);
        input.key_down(Key::Left);
        assert_eq!(
            TickIntent::from_input(&input).movement,
            Some(MoveCommand::Left)
        );
    }

    #[test]
    fn releasing_one_direction_falls_back_to_the_other() {
        let mut input = InputState::new();
        input.key_down(Key::Left);
        input.key_down(Key::Right);
        input.end_tick();
        assert_eq!(TickIntent::from_input(&input).movement, None);

        input.key_up(Key::Right);
        assert_eq!(
            TickIntent::from_input(&input).movement,
            Some(MoveCommand::Left)
        );
    }

    #[test]
    fn release_consumed_while_paused_still_stops() {
        let mut input = InputState::new();
        input.key_down(Key::A);
        input.end_tick();
        // Paused ticks consume edges without running the world.
        input.key_up(Key::A);
        input.end_tick();

        assert_eq!(
            TickIntent::from_input(&input).movement,
            Some(MoveCommand::Stop)
        );
    }

    #[test]
    fn key_held_through_restart_keeps_walking() {
        let mut input = InputState::new();
        input.key_down(Key::Right);
        input.end_tick();
        input.end_tick();
        assert_eq!(
            TickIntent::from_input(&input).movement,
            Some(MoveCommand::Right)
        );
    }

    #[test]
    fn any_jump_key_requests_jump() {
        for key in JUMP_KEYS {
            let mut input = InputState::new();
            input.key_down(key);
            assert!(TickIntent::from_input(&input).jump, "{key:?}");
        }
    }
}
