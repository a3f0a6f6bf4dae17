#![warn(clippy::all, clippy::pedantic)]

use bevy_ecs::prelude::*;
use log::{debug, info};
use std::error;
use std::time::Duration;

use crate::components::{Board, Direction, GameState, PieceRng};
use crate::config::Config;
use crate::game::VOLUME_STEP;
use crate::menu_types::{AudioControl, Button, GameKey, MENU_BUTTONS, Mode, SessionEvent};
use crate::records::RecordStore;
use crate::sound::AudioState;
use crate::systems::{
    clear_full_rows, gravity_step, hard_drop, has_active_piece, move_tetromino, restart_game,
    rotate_tetromino, spawn_tetromino,
};

pub type AppResult<T> = std::result::Result<T, Box<dyn error::Error>>;

pub struct App {
    pub world: World,
    pub mode: Mode,
    pub selected: usize,
    pub should_quit: bool,
    gravity_interval: Duration,
}

impl App {
    pub fn new(config: &Config, records: RecordStore, audio: AudioState) -> Self {
        let mut world = World::new();
        world.insert_resource(Board::new(config.board.width, config.board.height));
        world.insert_resource(GameState::default());
        world.insert_resource(PieceRng::default());
        world.insert_resource(records);
        world.insert_resource(audio);

        Self {
            world,
            mode: Mode::Menu,
            selected: 0,
            should_quit: false,
            gravity_interval: config.gravity_interval(),
        }
    }

    /// Replaces the piece source with a seeded one.
    pub fn seed(&mut self, seed: u64) {
        self.world.insert_resource(PieceRng::with_seed(seed));
    }

    pub fn gravity_interval(&self) -> Duration {
        self.gravity_interval
    }

    pub fn selected_button(&self) -> Button {
        MENU_BUTTONS[self.selected % MENU_BUTTONS.len()]
    }

    pub fn board(&self) -> &Board {
        self.world.resource::<Board>()
    }

    pub fn game_state(&self) -> &GameState {
        self.world.resource::<GameState>()
    }

    pub fn records(&self) -> &[u32] {
        self.world.resource::<RecordStore>().scores()
    }

    pub fn audio(&self) -> &AudioState {
        self.world.resource::<AudioState>()
    }

    /// Routes one event to whatever the current mode does with it.
    pub fn dispatch(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::Quit => {
                info!("Quit requested");
                self.should_quit = true;
                return;
            }
            SessionEvent::Audio(control) => {
                self.adjust_audio(control);
                return;
            }
            _ => {}
        }

        match self.mode {
            Mode::Menu => self.dispatch_menu(event),
            Mode::Records => self.dispatch_records(event),
            Mode::Playing => self.dispatch_playing(event),
            Mode::GameOver => self.dispatch_game_over(event),
        }
    }

    fn dispatch_menu(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::Key(GameKey::Up) => {
                self.selected = (self.selected + MENU_BUTTONS.len() - 1) % MENU_BUTTONS.len();
            }
            SessionEvent::Key(GameKey::Down) => {
                self.selected = (self.selected + 1) % MENU_BUTTONS.len();
            }
            SessionEvent::Key(GameKey::Confirm) => self.press(self.selected_button()),
            SessionEvent::Click(button) => self.press(button),
            _ => {}
        }
    }

    fn adjust_audio(&mut self, control: AudioControl) {
        let mut audio = self.world.resource_mut::<AudioState>();
        match control {
            AudioControl::ToggleMusic => audio.toggle_music(),
            AudioControl::ToggleSound => audio.toggle_sound(),
            AudioControl::VolumeUp => {
                let volume = audio.get_volume() + VOLUME_STEP;
                audio.set_volume(volume);
            }
            AudioControl::VolumeDown => {
                let volume = audio.get_volume() - VOLUME_STEP;
                audio.set_volume(volume);
            }
        }
        debug!(
            "Audio: music {}, sound {}, volume {:.1}",
            audio.is_music_enabled(),
            audio.is_sound_enabled(),
            audio.get_volume()
        );
    }

    fn press(&mut self, button: Button) {
        match button {
            Button::Start => {
                debug!("Entering game");
                self.mode = Mode::Playing;
            }
            Button::Records => self.mode = Mode::Records,
            Button::Exit => self.should_quit = true,
            Button::Back => {}
        }
    }

    fn dispatch_records(&mut self, event: SessionEvent) {
        if matches!(
            event,
            SessionEvent::Click(Button::Back)
                | SessionEvent::Key(GameKey::Back | GameKey::Confirm)
        ) {
            self.mode = Mode::Menu;
        }
    }

    fn dispatch_playing(&mut self, event: SessionEvent) {
        if !has_active_piece(&mut self.world) {
            spawn_tetromino(&mut self.world);
            if self.world.resource::<GameState>().is_over() {
                self.mode = Mode::GameOver;
                return;
            }
        }

        match event {
            SessionEvent::Tick => {
                gravity_step(&mut self.world);
            }
            SessionEvent::Key(GameKey::Left) => {
                move_tetromino(&mut self.world, Direction::Left);
            }
            SessionEvent::Key(GameKey::Right) => {
                move_tetromino(&mut self.world, Direction::Right);
            }
            SessionEvent::Key(GameKey::Up) => {
                rotate_tetromino(&mut self.world);
            }
            SessionEvent::Key(GameKey::Down) => {
                hard_drop(&mut self.world);
            }
            _ => {}
        }

        // Rows are only checked between pieces
        if !has_active_piece(&mut self.world) {
            clear_full_rows(&mut self.world);
        }
    }

    fn dispatch_game_over(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::Key(_) => {
                restart_game(&mut self.world);
                self.mode = Mode::Playing;
            }
            SessionEvent::Click(Button::Back) => {
                restart_game(&mut self.world);
                self.mode = Mode::Menu;
            }
            _ => {}
        }
    }
}
