//! Shape catalog and spawn policy tests

use rand::rngs::StdRng;
use rand::SeedableRng;

use blockfall::game::STORE_CAPACITY;
use blockfall::shapes::{self, Block, BlockKind, PieceId, BLOCK_SIZE};
use blockfall::spawn::{
    draw_piece, Family, PieceProvider, SequencePieceProvider, SpawnSettings, FALLBACK_PIECE,
};
use blockfall::store::BlockStore;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-4
}

/// Offsets of every block from the first, in block units.
fn offsets(blocks: &[Block; 4]) -> Vec<(i32, i32)> {
    let (x0, y0) = (blocks[0].x, blocks[0].y);
    blocks
        .iter()
        .map(|block| {
            (
                ((block.x - x0) / BLOCK_SIZE).round() as i32,
                ((block.y - y0) / BLOCK_SIZE).round() as i32,
            )
        })
        .collect()
}

// ============================================================================
// Catalog Tests
// ============================================================================

mod catalog {
    use super::*;

    #[test]
    fn every_piece_fits_a_playfield_store() {
        for piece in PieceId::ALL {
            let mut store = BlockStore::with_capacity(STORE_CAPACITY);
            let handles = shapes::shape(piece).map(|block| store.store(block));
            assert_eq!(store.len(), 4);
            assert!(handles.iter().all(|&handle| store.get(handle).is_some()));
        }
    }

    #[test]
    fn pieces_share_their_colour() {
        for piece in PieceId::ALL {
            let blocks = shapes::shape(piece);
            assert!(blocks.iter().all(|block| block.color == piece.color()));
        }
    }

    #[test]
    fn pieces_straddle_the_centre_line() {
        for piece in PieceId::ALL {
            for block in shapes::shape(piece) {
                assert!(approx(block.x.abs(), BLOCK_SIZE / 2.0), "{piece:?} at {}", block.x);
            }
        }
    }

    #[test]
    fn tall_piece_spawns_one_row_lower() {
        let ivan = shapes::shape(PieceId::Ivan);
        let larry = shapes::shape(PieceId::Larry);
        assert!(approx(ivan[0].y, 0.6));
        assert!(approx(larry[0].y, 0.7));
        assert!(approx(ivan[3].y, 0.9));
    }

    #[test]
    fn short_pieces_point_the_right_way() {
        assert_eq!(offsets(&shapes::shape(PieceId::Zach)), vec![(0, 0), (1, 0), (0, 1), (0, 1)]);
        assert_eq!(offsets(&shapes::shape(PieceId::Pip)), vec![(0, 0), (1, 0), (1, 1), (1, 1)]);
        assert_eq!(offsets(&shapes::shape(PieceId::Pop)), vec![(0, 0), (1, 0), (1, -1), (1, -1)]);
        assert_eq!(offsets(&shapes::shape(PieceId::Zup)), vec![(0, 0), (1, 0), (0, -1), (0, -1)]);
    }

    #[test]
    fn only_short_pieces_carry_a_ghost() {
        for piece in PieceId::ALL {
            let blocks = shapes::shape(piece);
            let ghosts: Vec<usize> = blocks
                .iter()
                .enumerate()
                .filter(|(_, block)| block.kind == BlockKind::Ghost)
                .map(|(i, _)| i)
                .collect();
            match piece.ghost_index() {
                Some(index) => {
                    assert_eq!(ghosts, vec![index]);
                    assert_eq!((blocks[index].x, blocks[index].y), (blocks[2].x, blocks[2].y));
                }
                None => assert!(ghosts.is_empty(), "{piece:?} has a ghost"),
            }
        }
    }

    #[test]
    fn mini_shapes_scale_around_the_anchor() {
        let blocks = shapes::shape_sized(PieceId::Griffin, 0.5, -0.5, shapes::MINI_BLOCK_SIZE);
        let (left, bottom, _, _) = blocks[0].bounds();
        assert!(approx(left, 0.5 - shapes::MINI_BLOCK_SIZE));
        assert!(approx(bottom, -0.5 - shapes::MINI_BLOCK_SIZE / 2.0));
    }

    #[test]
    fn walls_enclose_the_playfield() {
        let walls = shapes::walls(0.9, 0.95);
        assert!(walls.iter().all(|wall| wall.kind == BlockKind::Boundary));
        let (_, _, left_wall_right, _) = walls[0].bounds();
        let (right_wall_left, _, _, _) = walls[1].bounds();
        assert!(approx(left_wall_right, -0.9));
        assert!(approx(right_wall_left, 0.9));
    }
}

// ============================================================================
// Settings Tests
// ============================================================================

mod settings {
    use super::*;

    #[test]
    fn everything_starts_enabled() {
        let settings = SpawnSettings::default();
        assert!(PieceId::ALL.iter().all(|&piece| settings.is_enabled(piece)));
        assert_eq!(settings.enabled_families().len(), Family::ALL.len());
    }

    #[test]
    fn toggle_flips_one_piece() {
        let mut settings = SpawnSettings::default();
        settings.toggle(PieceId::Pop);
        assert!(!settings.is_enabled(PieceId::Pop));
        assert!(settings.is_enabled(PieceId::Pip));

        settings.toggle(PieceId::Pop);
        assert!(settings.is_enabled(PieceId::Pop));
    }

    #[test]
    fn family_drops_out_with_its_last_member() {
        let mut settings = SpawnSettings::default();
        settings.set_enabled(PieceId::Larry, false);
        assert!(settings
            .enabled_families()
            .iter()
            .any(|(family, members)| *family == Family::LongL && *members == vec![PieceId::Terry]));

        settings.set_enabled(PieceId::Terry, false);
        assert!(settings.enabled_families().iter().all(|(family, _)| *family != Family::LongL));
    }

    #[test]
    fn families_cover_every_piece_once() {
        for piece in PieceId::ALL {
            let owners = Family::ALL
                .iter()
                .filter(|family| family.members().contains(&piece))
                .count();
            assert_eq!(owners, 1, "{piece:?}");
            assert!(Family::of(piece).members().contains(&piece));
        }
    }
}

// ============================================================================
// Draw Tests
// ============================================================================

mod drawing {
    use super::*;

    #[test]
    fn disabled_family_is_never_drawn() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut settings = SpawnSettings::default();
        settings.set_family(Family::ShortL, false);
        settings.set_enabled(PieceId::Ivan, false);

        for _ in 0..100 {
            let piece = draw_piece(&settings, &mut rng);
            assert!(settings.is_enabled(piece), "drew disabled {piece:?}");
        }
    }

    #[test]
    fn nothing_enabled_falls_back() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut settings = SpawnSettings::default();
        for piece in PieceId::ALL {
            settings.set_enabled(piece, false);
        }

        assert_eq!(draw_piece(&settings, &mut rng), FALLBACK_PIECE);
    }

    #[test]
    fn families_are_weighted_equally() {
        let mut rng = StdRng::seed_from_u64(42);
        let settings = SpawnSettings::default();
        let draws = 6000;

        let mut counts = [0usize; PieceId::COUNT];
        for _ in 0..draws {
            counts[draw_piece(&settings, &mut rng).index()] += 1;
        }

        // A lone I piece takes a sixth of draws; each of the four short pieces
        // takes a quarter of that.
        let ivan = counts[PieceId::Ivan.index()];
        let pip = counts[PieceId::Pip.index()];
        assert!((800..1200).contains(&ivan), "ivan drawn {ivan} times");
        assert!((150..350).contains(&pip), "pip drawn {pip} times");
    }

    #[test]
    fn sequence_provider_cycles() {
        let settings = SpawnSettings::default();
        let mut provider = SequencePieceProvider::new(vec![PieceId::Gerry, PieceId::Zup]);

        let drawn: Vec<PieceId> = (0..5).map(|_| provider.next_piece(&settings)).collect();
        assert_eq!(
            drawn,
            vec![PieceId::Gerry, PieceId::Zup, PieceId::Gerry, PieceId::Zup, PieceId::Gerry]
        );
    }

    #[test]
    fn empty_sequence_falls_back() {
        let mut provider = SequencePieceProvider::new(vec![]);
        assert_eq!(provider.next_piece(&SpawnSettings::default()), FALLBACK_PIECE);
    }
}
