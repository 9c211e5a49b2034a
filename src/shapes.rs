// ============================================================================
// Configuration
// ============================================================================

pub const BLOCK_SIZE: f32 = 0.1;
pub const MINI_BLOCK_SIZE: f32 = 0.04;

const SPAWN_BASE_Y: f32 = 0.7;
const TALL_SPAWN_BASE_Y: f32 = 0.6;

const WALL_THICKNESS: f32 = 0.005;
const WALL_COLOR: Rgb = Rgb::new(0.3, 0.2, 0.1);

// ============================================================================
// Types
// ============================================================================

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Multiplies every channel, clamping to `[0, 1]`.
    pub fn scaled(self, factor: f32) -> Self {
        Self {
            r: (self.r * factor).clamp(0.0, 1.0),
            g: (self.g * factor).clamp(0.0, 1.0),
            b: (self.b * factor).clamp(0.0, 1.0),
        }
    }
}

/// What a block is for. Drives rendering style and which blocks take part in
/// row counting.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum BlockKind {
    /// A standard piece cell.
    Cell,
    /// The duplicated fourth block of a three-cell piece. It sits on top of a
    /// real cell, collides like one, but is never drawn or counted in a row.
    Ghost,
    /// Playfield wall geometry.
    Boundary,
}

#[derive(Clone, PartialEq, Debug)]
pub struct Block {
    pub x: f32,
    pub y: f32,
    pub color: Rgb,
    /// Corner offsets relative to `(x, y)`, counter-clockwise from bottom-left.
    pub outline: [(f32, f32); 4],
    pub kind: BlockKind,
}

impl Block {
    pub fn quad(x: f32, y: f32, half_w: f32, half_h: f32, color: Rgb, kind: BlockKind) -> Self {
        Self {
            x,
            y,
            color,
            outline: [
                (-half_w, -half_h),
                (half_w, -half_h),
                (half_w, half_h),
                (-half_w, half_h),
            ],
            kind,
        }
    }

    pub fn cell(x: f32, y: f32, size: f32, color: Rgb) -> Self {
        Self::quad(x, y, size / 2.0, size / 2.0, color, BlockKind::Cell)
    }

    pub fn ghost(x: f32, y: f32, size: f32, color: Rgb) -> Self {
        Self::quad(x, y, size / 2.0, size / 2.0, color, BlockKind::Ghost)
    }

    /// World-space bounds as `(left, bottom, right, top)`.
    pub fn bounds(&self) -> (f32, f32, f32, f32) {
        let (mut left, mut bottom) = (f32::MAX, f32::MAX);
        let (mut right, mut top) = (f32::MIN, f32::MIN);
        for (vx, vy) in self.outline {
            left = left.min(self.x + vx);
            right = right.max(self.x + vx);
            bottom = bottom.min(self.y + vy);
            top = top.max(self.y + vy);
        }
        (left, bottom, right, top)
    }

    pub fn counts_toward_row(&self) -> bool {
        self.kind == BlockKind::Cell
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum PieceId {
    Larry,
    Terry,
    Ivan,
    Griffin,
    Berry,
    Gerry,
    Zach,
    Pip,
    Pop,
    Zup,
}

impl PieceId {
    pub const COUNT: usize = 10;

    pub const ALL: [PieceId; Self::COUNT] = [
        PieceId::Larry,
        PieceId::Terry,
        PieceId::Ivan,
        PieceId::Griffin,
        PieceId::Berry,
        PieceId::Gerry,
        PieceId::Zach,
        PieceId::Pip,
        PieceId::Pop,
        PieceId::Zup,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            PieceId::Larry => "Larry",
            PieceId::Terry => "Terry",
            PieceId::Ivan => "Ivan",
            PieceId::Griffin => "Griffin",
            PieceId::Berry => "Berry",
            PieceId::Gerry => "Gerry",
            PieceId::Zach => "Zach",
            PieceId::Pip => "Pip",
            PieceId::Pop => "Pop",
            PieceId::Zup => "Zup",
        }
    }

    pub fn color(self) -> Rgb {
        match self {
            PieceId::Larry => Rgb::new(1.0, 0.5, 0.0),
            PieceId::Terry => Rgb::new(0.0, 0.4, 1.0),
            PieceId::Ivan => Rgb::new(0.0, 0.9, 0.9),
            PieceId::Griffin => Rgb::new(1.0, 0.9, 0.0),
            PieceId::Berry => Rgb::new(1.0, 0.4, 1.0),
            PieceId::Gerry => Rgb::new(1.0, 0.4, 0.35),
            PieceId::Zach => Rgb::new(0.5, 0.9, 0.7),
            PieceId::Pip => Rgb::new(0.5, 1.0, 0.3),
            PieceId::Pop => Rgb::new(1.0, 0.65, 0.5),
            PieceId::Zup => Rgb::new(0.6, 0.6, 1.0),
        }
    }

    pub fn spawn_base_y(self) -> f32 {
        match self {
            PieceId::Ivan => TALL_SPAWN_BASE_Y,
            _ => SPAWN_BASE_Y,
        }
    }

    /// Block centres in block units. Columns sit half a block either side of
    /// the origin; rows count up from the base.
    fn layout(self) -> [(f32, f32); 4] {
        const L: f32 = -0.5;
        const R: f32 = 0.5;
        match self {
            PieceId::Larry => [(L, 0.0), (R, 0.0), (R, 1.0), (R, 2.0)],
            PieceId::Terry => [(R, 0.0), (L, 0.0), (L, 1.0), (L, 2.0)],
            PieceId::Ivan => [(L, 0.0), (L, 1.0), (L, 2.0), (L, 3.0)],
            PieceId::Griffin => [(L, 0.0), (R, 0.0), (L, 1.0), (R, 1.0)],
            PieceId::Berry => [(R, 2.0), (L, 2.0), (L, 1.0), (L, 0.0)],
            PieceId::Gerry => [(L, 2.0), (R, 2.0), (R, 1.0), (R, 0.0)],
            // [X]
            // [X][X]
            PieceId::Zach => [(L, 0.0), (R, 0.0), (L, 1.0), (L, 1.0)],
            //    [X]
            // [X][X]
            PieceId::Pip => [(L, 0.0), (R, 0.0), (R, 1.0), (R, 1.0)],
            // [X][X]
            //    [X]
            PieceId::Pop => [(L, 1.0), (R, 1.0), (R, 0.0), (R, 0.0)],
            // [X][X]
            // [X]
            PieceId::Zup => [(L, 1.0), (R, 1.0), (L, 0.0), (L, 0.0)],
        }
    }

    /// Index of the block that duplicates another one, for three-cell pieces.
    pub fn ghost_index(self) -> Option<usize> {
        match self {
            PieceId::Zach | PieceId::Pip | PieceId::Pop | PieceId::Zup => Some(3),
            _ => None,
        }
    }
}

// ============================================================================
// Catalog
// ============================================================================

/// The four blocks of `id` at its spawn position, full size.
pub fn shape(id: PieceId) -> [Block; 4] {
    shape_sized(id, 0.0, id.spawn_base_y(), BLOCK_SIZE)
}

/// The four blocks of `id` laid out around `(x, y)` with edge length `size`.
pub fn shape_sized(id: PieceId, x: f32, y: f32, size: f32) -> [Block; 4] {
    let layout = id.layout();
    let ghost = id.ghost_index();
    let color = id.color();
    std::array::from_fn(|i| {
        let (dx, dy) = layout[i];
        let (bx, by) = (x + dx * size, y + dy * size);
        if ghost == Some(i) {
            Block::ghost(bx, by, size, color)
        } else {
            Block::cell(bx, by, size, color)
        }
    })
}

/// Left, right, bottom and top walls framing a playfield of the given half
/// extents.
pub fn walls(half_width: f32, half_height: f32) -> [Block; 4] {
    let half_t = WALL_THICKNESS / 2.0;
    let side_h = half_height + WALL_THICKNESS;
    [
        Block::quad(-(half_width + half_t), 0.0, half_t, side_h, WALL_COLOR, BlockKind::Boundary),
        Block::quad(half_width + half_t, 0.0, half_t, side_h, WALL_COLOR, BlockKind::Boundary),
        Block::quad(0.0, -(half_height + half_t), half_width, half_t, WALL_COLOR, BlockKind::Boundary),
        Block::quad(0.0, half_height + half_t, half_width, half_t, WALL_COLOR, BlockKind::Boundary),
    ]
}
