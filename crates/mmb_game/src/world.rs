//! Game state and the per-tick step.
//!
//! `GameWorld` owns the level, both entities, the score and the floating
//! texts. One `tick()` runs, in order:
//!
//!   1. level, player and enemy updates
//!   2. floating-text updates and pruning
//!   3. the pending enemy respawn, if its deadline has passed
//!   4. player/enemy contact resolution
//!
//! Wall-clock time only enters through the `now` argument, and randomness
//! through the injected `Rng`, so a test can drive any scenario tick by tick.

use std::time::{Duration, Instant};

use mmb_audio::{AudioSink, Sound};
use mmb_overlay::{GameOverPanel, HudFrame};
use rand::Rng;

use crate::collision::{classify_contact, Contact, Rect};
use crate::config::GameConfig;
use crate::controls::{MoveCommand, TickIntent};
use crate::enemy::{Enemy, ENEMY_START, ENEMY_WIDTH};
use crate::floating_text::FloatingText;
use crate::level::Level;
use crate::player::Player;
use crate::respawn::RespawnTimer;
use crate::score::Score;

const STOMP_REWARD: i32 = 100;
const KILL_TEXT_LIFE: u32 = 60;
const KILL_TEXT_COLOR: [u8; 3] = [255, 215, 0];
const KILL_TEXT_SIZE: f32 = 24.0;

pub const RESTART_LABEL: &str = "RESPAWN";
const RESTART_BUTTON_SIZE: (i32, i32) = (120, 40);
/// Gap between the button's left edge and the right edge of the canvas.
const RESTART_BUTTON_INSET: i32 = 150;
const RESTART_BUTTON_TOP: i32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    GameOver,
}

pub struct GameWorld {
    pub level: Level,
    pub player: Player,
    pub enemy: Enemy,
    pub score: Score,
    pub floating_texts: Vec<FloatingText>,
    canvas: (i32, i32),
    lives: u32,
    status: GameStatus,
    respawn: RespawnTimer,
    starting_lives: u32,
    respawn_delay: Duration,
}

impl GameWorld {
    pub fn new(config: &GameConfig) -> Self {
        Self::with_rules(
            config.window.width as i32,
            config.window.height as i32,
            config.starting_lives,
            config.respawn_delay(),
        )
    }

    pub fn with_rules(width: i32, height: i32, starting_lives: u32, respawn_delay: Duration) -> Self {
        Self {
            level: Level::new(width, height),
            player: Player::spawn(),
            enemy: Enemy::new(ENEMY_START.0, ENEMY_START.1),
            score: Score::new(),
            floating_texts: Vec::new(),
            canvas: (width, height),
            lives: starting_lives,
            status: GameStatus::Playing,
            respawn: RespawnTimer::new(),
            starting_lives,
            respawn_delay,
        }
    }

    /// Apply this tick's movement intent. Ignored while the game is over.
    pub fn apply_controls(&mut self, intent: TickIntent, audio: &mut dyn AudioSink) {
        if self.status == GameStatus::GameOver {
            return;
        }
        match intent.movement {
            Some(MoveCommand::Left) => self.player.move_left(),
            Some(MoveCommand::Right) => self.player.move_right(),
            Some(MoveCommand::Stop) => self.player.stop(),
            None => {}
        }
        if intent.jump && self.player.jump() {
            audio.play(Sound::Jump);
        }
    }

    pub fn tick(&mut self, now: Instant, rng: &mut impl Rng, audio: &mut dyn AudioSink) {
        if self.status == GameStatus::GameOver {
            return;
        }

        self.level.update(self.canvas.0, self.canvas.1);
        self.player.update(&self.level);
        self.enemy.update(&self.level);

        for text in &mut self.floating_texts {
            text.update();
        }
        self.floating_texts.retain(FloatingText::is_alive);

        if self.respawn.poll(now) {
            self.enemy.respawn(&self.level, self.player.bounds(), rng);
            log::debug!("Enemy respawned at x={}", self.enemy.x);
        }

        self.resolve_contact(now, rng, audio);
    }

    /// Check the player against the enemy and apply the outcome. Returns the
    /// contact that was acted on, if any.
    pub fn resolve_contact(
        &mut self,
        now: Instant,
        rng: &mut impl Rng,
        audio: &mut dyn AudioSink,
    ) -> Option<Contact> {
        if !self.enemy.is_alive() {
            return None;
        }
        let contact = classify_contact(&self.player.bounds(), self.player.dy, &self.enemy.bounds())?;
        if contact == Contact::Hit && self.player.is_stunned() {
            return None;
        }

        match contact {
            Contact::Stomp => {
                self.enemy.die();
                self.score.add_score(STOMP_REWARD);
                self.score.add_kill();
                self.player.bounce();
                self.spawn_kill_text();
                audio.play(Sound::EnemyHit);
                if self.respawn.arm(now, self.respawn_delay) {
                    log::debug!("Enemy respawn scheduled in {:?}", self.respawn_delay);
                }
                log::info!(
                    "Stomp! score={} kills={}",
                    self.score.score(),
                    self.score.kill_count()
                );
            }
            Contact::Hit => {
                self.player.take_hit();
                self.lives = self.lives.saturating_sub(1);
                if self.lives > 0 {
                    self.enemy.respawn(&self.level, self.player.bounds(), rng);
                    log::info!("Player hit, {} lives left", self.lives);
                } else {
                    self.status = GameStatus::GameOver;
                    self.respawn.clear();
                    log::info!("Game over. Final score {}", self.score.score());
                }
            }
        }
        Some(contact)
    }

    fn spawn_kill_text(&mut self) {
        let sprite = self.enemy.sprite_rect();
        self.floating_texts.push(FloatingText::new(
            format!("+{} Kill", self.score.kill_count()),
            (sprite.x + ENEMY_WIDTH / 2) as f32,
            sprite.y as f32,
            KILL_TEXT_LIFE,
            KILL_TEXT_COLOR,
            KILL_TEXT_SIZE,
        ));
    }

    /// Handle a left click at canvas position `(x, y)`. Restarts the game when
    /// the click lands on the restart button during game over.
    pub fn click(&mut self, x: f32, y: f32, rng: &mut impl Rng) -> bool {
        if self.status != GameStatus::GameOver || !self.restart_button_rect().contains(x, y) {
            return false;
        }
        self.restart(rng);
        true
    }

    pub fn restart(&mut self, rng: &mut impl Rng) {
        self.lives = self.starting_lives;
        self.status = GameStatus::Playing;
        self.player = Player::spawn();
        self.enemy.respawn(&self.level, self.player.bounds(), rng);
        self.score.reset();
        self.floating_texts.clear();
        self.respawn.clear();
        log::info!("Game restarted");
    }

    pub fn resize(&mut self, width: i32, height: i32) {
        self.canvas = (width, height);
        self.level.update(width, height);
    }

    pub fn restart_button_rect(&self) -> Rect {
        Rect::new(
            self.canvas.0 - RESTART_BUTTON_INSET,
            RESTART_BUTTON_TOP,
            RESTART_BUTTON_SIZE.0,
            RESTART_BUTTON_SIZE.1,
        )
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_game_over(&self) -> bool {
        self.status() == GameStatus::GameOver
    }

    pub fn respawn_pending(&self) -> bool {
        self.respawn.is_pending()
    }

    pub fn canvas(&self) -> (i32, i32) {
        self.canvas
    }

    pub fn hud_frame(&self) -> HudFrame {
        let game_over = self.is_game_over().then(|| {
            let r = self.restart_button_rect();
            GameOverPanel {
                button: [r.x as f32, r.y as f32, r.w as f32, r.h as f32],
                button_label: RESTART_LABEL.to_string(),
            }
        });
        HudFrame {
            score: self.score.score(),
            kills: self.score.kill_count(),
            lives: self.lives(),
            labels: self.floating_texts.iter().map(FloatingText::to_label).collect(),
            game_over,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::enemy::EnemyAnim;
    use crate::player::PlayerAnim;
    use mmb_audio::NullAudio;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Sink that remembers every cue it was asked to play.
    #[derive(Default)]
    pub(crate) struct RecordingAudio {
        pub played: Vec<Sound>,
    }

    impl AudioSink for RecordingAudio {
        fn play(&mut self, sound: Sound) {
            self.played.push(sound);
        }
    }

    fn world() -> GameWorld {
        GameWorld::with_rules(1200, 700, 3, Duration::from_millis(1000))
    }

    /// Player falling onto the enemy's head: feet 10px into the hitbox.
    fn stage_stomp(world: &mut GameWorld, dy: i32) {
        world.enemy.x = 600;
        world.enemy.y = world.level.ground_y() - 60;
        world.player.x = 600;
        world.player.y = world.enemy.bounds().y + 10 - 60;
        world.player.dy = dy;
    }

    #[test]
    fn falling_contact_stomps_the_enemy() {
        let mut world = world();
        let mut rng = StdRng::seed_from_u64(1);
        let mut audio = RecordingAudio::default();
        stage_stomp(&mut world, 3);

        let contact = world.resolve_contact(Instant::now(), &mut rng, &mut audio);
        assert_eq!(contact, Some(Contact::Stomp));
        assert!(!world.enemy.is_alive());
        assert_eq!(world.score.score(), 100);
        assert_eq!(world.score.kill_count(), 1);
        assert_eq!(world.player.dy, -10);
        assert_eq!(world.floating_texts.len(), 1);
        assert_eq!(world.floating_texts[0].text, "+1 Kill");
        assert!(world.respawn_pending());
        assert_eq!(audio.played, vec![Sound::EnemyHit]);
        assert_eq!(world.lives(), 3);
    }

    #[test]
    fn rising_contact_costs_a_life_and_respawns_enemy() {
        let mut world = world();
        let mut rng = StdRng::seed_from_u64(2);
        let mut audio = RecordingAudio::default();
        stage_stomp(&mut world, 0);
        world.enemy.x = 640;
        let before = world.enemy.sprite_rect();

        let contact = world.resolve_contact(Instant::now(), &mut rng, &mut audio);
        assert_eq!(contact, Some(Contact::Hit));
        assert_eq!(world.player.anim_state(), PlayerAnim::Hit);
        assert_eq!(world.lives(), 2);
        assert_eq!(world.score.score(), 0);
        assert!(!world.respawn_pending());
        assert!(audio.played.is_empty());

        assert!(world.enemy.is_alive());
        assert_eq!(world.enemy.anim_state(), EnemyAnim::Idle);
        assert_ne!(world.enemy.sprite_rect(), before);
        assert_eq!(world.enemy.sprite_rect().bottom(), world.level.ground_y());
        assert!(!world.enemy.bounds().intersects(&world.player.bounds()));
    }

    #[test]
    fn stunned_player_ignores_side_contact() {
        let mut world = world();
        let mut rng = StdRng::seed_from_u64(3);
        let mut audio = RecordingAudio::default();
        world.player.take_hit();
        stage_stomp(&mut world, 0);

        assert_eq!(world.resolve_contact(Instant::now(), &mut rng, &mut audio), None);
        assert_eq!(world.lives(), 3);
        assert!(world.enemy.is_alive());
    }

    #[test]
    fn stunned_player_can_still_stomp() {
        let mut world = world();
        let mut rng = StdRng::seed_from_u64(3);
        let mut audio = RecordingAudio::default();
        world.player.take_hit();
        stage_stomp(&mut world, 4);

        let contact = world.resolve_contact(Instant::now(), &mut rng, &mut audio);
        assert_eq!(contact, Some(Contact::Stomp));
        assert!(!world.enemy.is_alive());
        assert_eq!(world.score.kill_count(), 1);
        assert_eq!(world.lives(), 3);
    }

    #[test]
    fn restarted_game_survives_its_first_ticks() {
        let mut audio = NullAudio;
        for seed in 0..500 {
            let mut world = GameWorld::with_rules(1200, 700, 1, Duration::from_millis(1000));
            let mut rng = StdRng::seed_from_u64(seed);
            stage_stomp(&mut world, 0);
            world.resolve_contact(Instant::now(), &mut rng, &mut audio);
            assert!(world.is_game_over());

            world.restart(&mut rng);
            for _ in 0..5 {
                world.tick(Instant::now(), &mut rng, &mut audio);
            }
            assert_eq!(world.lives(), 1, "seed {seed}");
            assert!(!world.is_game_over(), "seed {seed}");
        }
    }

    #[test]
    fn delayed_revival_never_lands_on_standing_player() {
        let mut audio = NullAudio;
        for seed in 0..500 {
            let mut world = world();
            let mut rng = StdRng::seed_from_u64(seed);
            let start = Instant::now();
            stage_stomp(&mut world, 3);
            world.resolve_contact(start, &mut rng, &mut audio);
            assert!(world.respawn_pending());

            // Let the bounce play out so the player is standing again.
            world.player.x = (seed as i32 * 53) % 1140;
            for _ in 0..40 {
                world.tick(start, &mut rng, &mut audio);
            }
            assert!(world.player.on_ground());

            world.tick(start + Duration::from_millis(1000), &mut rng, &mut audio);
            assert!(world.enemy.is_alive(), "seed {seed}");
            assert_eq!(world.lives(), 3, "seed {seed}");
        }
    }

    #[test]
    fn only_one_respawn_is_pending() {
        let mut world = world();
        let mut rng = StdRng::seed_from_u64(4);
        let mut audio = RecordingAudio::default();
        let start = Instant::now();

        stage_stomp(&mut world, 3);
        world.resolve_contact(start, &mut rng, &mut audio);
        assert!(world.respawn_pending());

        // Dead enemy cannot be stomped again.
        stage_stomp(&mut world, 3);
        assert_eq!(world.resolve_contact(start, &mut rng, &mut audio), None);
        assert_eq!(world.score.kill_count(), 1);
    }

    #[test]
    fn enemy_returns_after_respawn_delay() {
        let mut world = world();
        let mut rng = StdRng::seed_from_u64(5);
        let mut audio = RecordingAudio::default();
        let start = Instant::now();
        stage_stomp(&mut world, 3);
        world.resolve_contact(start, &mut rng, &mut audio);
        world.player = Player::new(0, 0);

        world.tick(start + Duration::from_millis(500), &mut rng, &mut audio);
        assert!(!world.enemy.is_alive());

        world.tick(start + Duration::from_millis(1000), &mut rng, &mut audio);
        assert!(world.enemy.is_alive());
        assert!(!world.respawn_pending());
    }

    #[test]
    fn losing_last_life_freezes_the_world() {
        let mut world = GameWorld::with_rules(1200, 700, 1, Duration::from_millis(1000));
        let mut rng = StdRng::seed_from_u64(6);
        let mut audio = RecordingAudio::default();
        stage_stomp(&mut world, 0);

        world.resolve_contact(Instant::now(), &mut rng, &mut audio);
        assert!(world.is_game_over());
        assert_eq!(world.lives(), 0);

        let (px, py, ex) = (world.player.x, world.player.y, world.enemy.x);
        world.apply_controls(
            TickIntent {
                movement: Some(MoveCommand::Right),
                jump: true,
            },
            &mut audio,
        );
        for _ in 0..20 {
            world.tick(Instant::now(), &mut rng, &mut audio);
        }
        assert_eq!((world.player.x, world.player.y, world.enemy.x), (px, py, ex));
        assert!(audio.played.is_empty());
        assert!(world.hud_frame().game_over.is_some());
    }

    #[test]
    fn restart_button_only_works_when_game_over() {
        let mut world = GameWorld::with_rules(1200, 700, 1, Duration::from_millis(1000));
        let mut rng = StdRng::seed_from_u64(7);
        let mut audio = RecordingAudio::default();

        assert!(!world.click(1100.0, 40.0, &mut rng));

        stage_stomp(&mut world, 0);
        world.resolve_contact(Instant::now(), &mut rng, &mut audio);
        assert!(world.is_game_over());

        assert!(!world.click(10.0, 10.0, &mut rng), "outside the button");
        assert!(world.click(1100.0, 40.0, &mut rng));
        assert_eq!(world.status(), GameStatus::Playing);
        assert_eq!(world.lives(), 1);
        assert_eq!(world.score.score(), 0);
        assert!(world.floating_texts.is_empty());
        assert_eq!((world.player.x, world.player.y), (100, 500));
    }

    #[test]
    fn restart_clears_pending_respawn_and_texts() {
        let mut world = world();
        let mut rng = StdRng::seed_from_u64(8);
        let mut audio = RecordingAudio::default();
        stage_stomp(&mut world, 3);
        world.resolve_contact(Instant::now(), &mut rng, &mut audio);

        world.restart(&mut rng);
        assert!(!world.respawn_pending());
        assert!(world.floating_texts.is_empty());
        assert!(world.enemy.is_alive());
        assert_eq!(world.score.kill_count(), 0);
    }

    #[test]
    fn jump_plays_sound_only_when_it_happens() {
        let mut world = world();
        let mut rng = StdRng::seed_from_u64(9);
        let mut audio = RecordingAudio::default();
        let jump = TickIntent {
            movement: None,
            jump: true,
        };

        // Spawn point is above the ground; not standing yet.
        world.apply_controls(jump, &mut audio);
        assert!(audio.played.is_empty());

        world.tick(Instant::now(), &mut rng, &mut audio);
        world.apply_controls(jump, &mut audio);
        assert_eq!(audio.played, vec![Sound::Jump]);
    }

    #[test]
    fn kill_texts_expire() {
        let mut world = world();
        let mut rng = StdRng::seed_from_u64(10);
        let mut audio = RecordingAudio::default();
        let start = Instant::now();
        stage_stomp(&mut world, 3);
        world.resolve_contact(start, &mut rng, &mut audio);
        world.player = Player::new(0, 0);

        for _ in 0..KILL_TEXT_LIFE {
            world.tick(start, &mut rng, &mut audio);
        }
        assert!(world.floating_texts.is_empty());
    }

    #[test]
    fn resize_moves_ground_and_button() {
        let mut world = world();
        world.resize(800, 600);
        assert_eq!(world.level.ground_y(), 450);
        assert_eq!(world.restart_button_rect(), Rect::new(650, 20, 120, 40));
    }
}
