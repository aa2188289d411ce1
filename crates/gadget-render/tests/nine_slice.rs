//! Partition properties of stretch-middle slicing.

use gadget_render::blit::{NineSlice, StretchBorders, StretchPlan, stretch_middle_slices};
use gadget_render::{Rect, Size};

fn slices(src: Size, dest: Rect, borders: StretchBorders) -> [NineSlice; 9] {
    match stretch_middle_slices(src, dest, borders) {
        StretchPlan::Sliced(s) => s,
        other => panic!("expected slices for {src:?} -> {dest:?}, got {other:?}"),
    }
}

/// Cells tile `outer` exactly: rows and columns share edges and the areas sum up.
fn assert_tiles(cells: [Rect; 9], outer: Rect) {
    for row in 0..3 {
        let r = &cells[row * 3..row * 3 + 3];
        assert_eq!(r[0].left(), outer.left());
        assert_eq!(r[0].right(), r[1].left());
        assert_eq!(r[1].right(), r[2].left());
        assert_eq!(r[2].right(), outer.right());
        assert!(r.iter().all(|c| c.top() == r[0].top() && c.height() == r[0].height()));
    }
    for col in 0..3 {
        assert_eq!(cells[col].top(), outer.top());
        assert_eq!(cells[col].bottom(), cells[col + 3].top());
        assert_eq!(cells[col + 3].bottom(), cells[col + 6].top());
        assert_eq!(cells[col + 6].bottom(), outer.bottom());
    }
    let area: f64 = cells.iter().map(|c| c.width() * c.height()).sum();
    assert_eq!(area, outer.width() * outer.height());
    assert!(cells.iter().all(|c| c.width() >= 0.0 && c.height() >= 0.0));
}

#[test]
fn test_destination_partition_without_seams() {
    let src = Size::new(16.0, 12.0);
    let borders = [
        StretchBorders::uniform(3.0),
        StretchBorders::new(1.0, 2.0, 5.0, 4.0),
        StretchBorders::new(0.0, 6.0, 0.0, 2.0),
        StretchBorders::uniform(-1.0),
    ];
    for b in borders {
        for w in [20.0, 33.0, 64.0, 101.0] {
            for h in [16.0, 17.0, 40.0] {
                let dest = Rect::new(7.0, 11.0, w, h);
                let s = slices(src, dest, b);
                assert_tiles(s.map(|c| c.dest), dest);
            }
        }
    }
}

#[test]
fn test_source_partition() {
    let src = Size::new(16.0, 12.0);
    let s = slices(src, Rect::new(0.0, 0.0, 50.0, 50.0), StretchBorders::new(2.0, 3.0, 4.0, 5.0));
    assert_tiles(s.map(|c| c.src), Rect::new(0.0, 0.0, 16.0, 12.0));
}

#[test]
fn test_corners_are_unscaled() {
    let src = Size::new(10.0, 10.0);
    for b in [StretchBorders::uniform(2.0), StretchBorders::new(1.0, 4.0, 3.0, 2.0)] {
        let s = slices(src, Rect::new(0.0, 0.0, 80.0, 30.0), b);
        for corner in [0, 2, 6, 8] {
            assert_eq!(s[corner].src.size, s[corner].dest.size);
        }
        // Edges scale along one axis only.
        assert_eq!(s[1].src.height(), s[1].dest.height());
        assert_eq!(s[3].src.width(), s[3].dest.width());
    }
}
