//! Scripted input sequences for driving `GameWorld` in tests.

use crate::controls::{MoveCommand, TickIntent};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
pub struct ReplaySequence {
    pub frames: Vec<ReplayFrame>,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReplayMove {
    Left,
    Right,
    Stop,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReplayFrame {
    #[serde(default, rename = "move")]
    pub movement: Option<ReplayMove>,
    #[serde(default)]
    pub jump: bool,
    #[serde(default = "default_repeat")]
    pub repeat: u32,
}

impl ReplaySequence {
    /// One intent per tick. A frame's movement and jump fire on its first
    /// tick only; the repeats are idle ticks, like a key held down.
    pub fn expanded_intents(&self) -> Vec<TickIntent> {
        let mut out = Vec::new();
        for frame in &self.frames {
            out.push(TickIntent {
                movement: frame.movement.map(|m| match m {
                    ReplayMove::Left => MoveCommand::Left,
                    ReplayMove::Right => MoveCommand::Right,
                    ReplayMove::Stop => MoveCommand::Stop,
                }),
                jump: frame.jump,
            });
            for _ in 1..frame.repeat.max(1) {
                out.push(TickIntent::default());
            }
        }
        out
    }
}

pub fn load_replay_from_path(path: &Path) -> Result<ReplaySequence, String> {
    let raw =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    parse_replay(&raw).map_err(|e| format!("{e} ({})", path.display()))
}

pub fn parse_replay(raw: &str) -> Result<ReplaySequence, String> {
    let replay: ReplaySequence =
        serde_json::from_str(raw).map_err(|e| format!("Failed to parse replay JSON: {e}"))?;
    if replay.frames.is_empty() {
        return Err("Replay validation failed: frames list is empty".to_string());
    }
    Ok(replay)
}

const fn default_repeat() -> u32 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::{PLAYER_WIDTH, PLAYER_SPAWN};
    use crate::world::tests::RecordingAudio;
    use crate::world::GameWorld;
    use mmb_audio::{AudioSink, NullAudio, Sound};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

    fn temp_file_path(name_hint: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "mmb_replay_test_{}_{}_{}.json",
            name_hint,
            std::process::id(),
            nanos
        ))
    }

    /// Run `replay` against a fresh world, one intent per 20 ms tick.
    fn run(replay: &ReplaySequence, world: &mut GameWorld, audio: &mut dyn AudioSink) {
        let mut rng = StdRng::seed_from_u64(42);
        let start = Instant::now();
        for (i, intent) in replay.expanded_intents().into_iter().enumerate() {
            world.apply_controls(intent, audio);
            world.tick(start + Duration::from_millis(20 * i as u64), &mut rng, audio);
        }
    }

    fn quiet_world() -> GameWorld {
        let mut world = GameWorld::with_rules(1200, 700, 3, Duration::from_millis(1000));
        // Park the enemy far from the player's path.
        world.enemy.x = 1100;
        world.enemy.dx = 0;
        world
    }

    #[test]
    fn empty_replay_is_rejected() {
        let err = parse_replay(r#"{ "frames": [] }"#).expect_err("empty replay should fail");
        assert!(err.contains("frames list is empty"));
    }

    #[test]
    fn repeat_expands_into_idle_ticks() {
        let replay =
            parse_replay(r#"{ "frames": [ { "move": "right", "repeat": 3 }, { "jump": true } ] }"#)
                .expect("replay should parse");
        let intents = replay.expanded_intents();
        assert_eq!(intents.len(), 4);
        assert_eq!(intents[0].movement, Some(MoveCommand::Right));
        assert_eq!(intents[1], TickIntent::default());
        assert!(intents[3].jump);
    }

    #[test]
    fn walk_right_then_stop() {
        let path = temp_file_path("walk");
        fs::write(
            &path,
            r#"{ "frames": [
                { "repeat": 5 },
                { "move": "right", "jump": false, "repeat": 10 },
                { "move": "stop", "repeat": 5 }
            ] }"#,
        )
        .expect("write temp file");
        let replay = load_replay_from_path(&path).expect("replay should load");

        let mut world = quiet_world();
        let mut audio = RecordingAudio::default();
        run(&replay, &mut world, &mut audio);

        assert_eq!(world.player.x, PLAYER_SPAWN.0 + 10 * 5);
        assert_eq!(world.player.dx, 0);
        assert!(world.player.on_ground());
        assert!(audio.played.is_empty());

        let _ = fs::remove_file(path);
    }

    #[test]
    fn jump_lands_back_on_ground_with_one_sound() {
        let replay = parse_replay(
            r#"{ "frames": [
                { "repeat": 2 },
                { "jump": true, "repeat": 60 },
                { "jump": true }
            ] }"#,
        )
        .expect("replay should parse");

        let mut world = quiet_world();
        let mut audio = RecordingAudio::default();
        run(&replay, &mut world, &mut audio);

        // The second jump only fires if the first one has landed.
        assert_eq!(audio.played, vec![Sound::Jump, Sound::Jump]);
        assert!(!world.player.on_ground());
        assert_eq!(world.player.dy, -14);
        assert_eq!(world.player.bounds().bottom(), world.level.ground_y() - 15);
    }

    #[test]
    fn walking_into_enemy_costs_a_life() {
        let replay = parse_replay(r#"{ "frames": [ { "repeat": 2 }, { "move": "right", "repeat": 200 } ] }"#)
            .expect("replay should parse");

        let mut world = GameWorld::with_rules(1200, 700, 3, Duration::from_millis(1000));
        world.enemy.dx = 0;
        run(&replay, &mut world, &mut NullAudio);

        assert!(world.lives() < 3);
        assert_eq!(world.score.score(), 0);
        assert!(world.player.x <= 1200 - PLAYER_WIDTH);
    }
}
