//! Narrow interfaces to the audio and input collaborators

use ahash::AHashSet;
use glam::Vec2;

/// Plays named sound effects; fire and forget
pub trait AudioSink {
    fn play_sfx(&mut self, name: &str);
}

/// Discards every cue
#[derive(Debug, Default, Clone, Copy)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play_sfx(&mut self, _name: &str) {}
}

/// Keeps every cue in order, for headless runs and tests
#[derive(Debug, Default, Clone)]
pub struct RecordingAudio {
    pub played: Vec<String>,
}

impl AudioSink for RecordingAudio {
    fn play_sfx(&mut self, name: &str) {
        self.played.push(name.to_string());
    }
}

pub trait InputSource {
    fn is_pressed(&self, key: char) -> bool;

    /// Cursor position in world coordinates
    fn cursor_world(&self) -> Vec2;

    fn attack_held(&self) -> bool;
}

/// Input state captured for one frame
#[derive(Debug, Clone, Default)]
pub struct KeySnapshot {
    pub keys: AHashSet<char>,
    pub cursor: Vec2,
    pub attack: bool,
}

impl KeySnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(mut self, key: char) -> Self {
        self.keys.insert(key.to_ascii_uppercase());
        self
    }

    pub fn aim_at(mut self, cursor: Vec2) -> Self {
        self.cursor = cursor;
        self
    }

    pub fn firing(mut self) -> Self {
        self.attack = true;
        self
    }
}

impl InputSource for KeySnapshot {
    fn is_pressed(&self, key: char) -> bool {
        self.keys.contains(&key.to_ascii_uppercase())
    }

    fn cursor_world(&self) -> Vec2 {
        self.cursor
    }

    fn attack_held(&self) -> bool {
        self.attack
    }
}
