use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::shapes::PieceId;

/// Returned when every family is disabled.
pub const FALLBACK_PIECE: PieceId = PieceId::Larry;

// ============================================================================
// Families
// ============================================================================

/// Pieces sharing one spawn weight. Each enabled family is equally likely, and
/// so is each enabled member inside the chosen family.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Family {
    I,
    O,
    S,
    Z,
    LongL,
    ShortL,
}

impl Family {
    pub const ALL: [Family; 6] = [
        Family::I,
        Family::O,
        Family::S,
        Family::Z,
        Family::LongL,
        Family::ShortL,
    ];

    pub fn members(self) -> &'static [PieceId] {
        match self {
            Family::I => &[PieceId::Ivan],
            Family::O => &[PieceId::Griffin],
            Family::S => &[PieceId::Berry],
            Family::Z => &[PieceId::Gerry],
            Family::LongL => &[PieceId::Larry, PieceId::Terry],
            Family::ShortL => &[PieceId::Zach, PieceId::Pip, PieceId::Pop, PieceId::Zup],
        }
    }

    pub fn of(piece: PieceId) -> Family {
        match piece {
            PieceId::Ivan => Family::I,
            PieceId::Griffin => Family::O,
            PieceId::Berry => Family::S,
            PieceId::Gerry => Family::Z,
            PieceId::Larry | PieceId::Terry => Family::LongL,
            PieceId::Zach | PieceId::Pip | PieceId::Pop | PieceId::Zup => Family::ShortL,
        }
    }
}

// ============================================================================
// Spawn Settings
// ============================================================================

/// Per-piece enable table, read at every spawn.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct SpawnSettings {
    enabled: [bool; PieceId::COUNT],
}

impl Default for SpawnSettings {
    fn default() -> Self {
        Self {
            enabled: [true; PieceId::COUNT],
        }
    }
}

impl SpawnSettings {
    pub fn is_enabled(&self, piece: PieceId) -> bool {
        self.enabled[piece.index()]
    }

    pub fn set_enabled(&mut self, piece: PieceId, enabled: bool) {
        self.enabled[piece.index()] = enabled;
    }

    pub fn toggle(&mut self, piece: PieceId) {
        self.enabled[piece.index()] ^= true;
        debug!(piece = piece.name(), enabled = self.enabled[piece.index()], "spawn setting toggled");
    }

    pub fn set_family(&mut self, family: Family, enabled: bool) {
        for &piece in family.members() {
            self.set_enabled(piece, enabled);
        }
    }

    /// Families with at least one enabled member, each with only those members.
    pub fn enabled_families(&self) -> Vec<(Family, Vec<PieceId>)> {
        Family::ALL
            .iter()
            .filter_map(|&family| {
                let members: Vec<PieceId> = family
                    .members()
                    .iter()
                    .copied()
                    .filter(|&piece| self.is_enabled(piece))
                    .collect();
                (!members.is_empty()).then_some((family, members))
            })
            .collect()
    }
}

/// Two-level draw: a uniform enabled family, then a uniform enabled member.
pub fn draw_piece<R: Rng + ?Sized>(settings: &SpawnSettings, rng: &mut R) -> PieceId {
    let families = settings.enabled_families();
    let Some((_, members)) = families.choose(rng) else {
        return FALLBACK_PIECE;
    };
    members.choose(rng).copied().unwrap_or(FALLBACK_PIECE)
}

// ============================================================================
// Piece Provider Trait
// ============================================================================

pub trait PieceProvider {
    fn next_piece(&mut self, settings: &SpawnSettings) -> PieceId;
}

/// Draws from its own generator, seeded once when the provider is created
/// and never reseeded.
#[derive(Debug, Clone)]
pub struct RandomPieceProvider {
    rng: StdRng,
}

impl RandomPieceProvider {
    /// Seeds from the OS's random data source.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn with_rng(rng: StdRng) -> Self {
        Self { rng }
    }
}

impl Default for RandomPieceProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl PieceProvider for RandomPieceProvider {
    fn next_piece(&mut self, settings: &SpawnSettings) -> PieceId {
        draw_piece(settings, &mut self.rng)
    }
}

/// Cycles through a fixed list, ignoring the settings.
pub struct SequencePieceProvider {
    pieces: Vec<PieceId>,
    index: usize,
}

impl SequencePieceProvider {
    pub fn new(pieces: Vec<PieceId>) -> Self {
        Self { pieces, index: 0 }
    }
}

impl PieceProvider for SequencePieceProvider {
    fn next_piece(&mut self, _settings: &SpawnSettings) -> PieceId {
        let Some(&piece) = self.pieces.get(self.index % self.pieces.len().max(1)) else {
            return FALLBACK_PIECE;
        };
        self.index += 1;
        piece
    }
}
