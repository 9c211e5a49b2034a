use crate::spawn::SpawnSettings;

/// State shared by every scene for the lifetime of the process: the spawn
/// table edited on the settings screen and the running score.
#[derive(Clone, Debug, Default)]
pub struct Session {
    pub settings: SpawnSettings,
    pub score: u32,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_score(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }
}
