//! The section packer: computes non-overlapping positions for a section's
//! member cards and the resulting interior content height.
//!
//! Two modes cover the interaction model. The row-flow pack is the full
//! deterministic reflow used after structural changes: cards are visited in
//! display order and flowed left to right, wrapping to a new row when the
//! interior width runs out. Fixed-card packing holds one card at a pinned
//! position (a live drag or a fresh drop) and arranges every other card
//! around it with a best-position grid scan.

use crate::card::CardId;
use crate::geometry::{self, COLUMN_STEP, GAP};
use kurbo::{Point, Rect, Size};
use std::collections::{HashMap, HashSet};

/// Correction passes `fix_overlaps` runs before accepting residual overlap
/// as diagnosable-but-non-fatal.
const MAX_OVERLAP_PASSES: usize = 4;

/// One card as the packer sees it.
#[derive(Debug, Clone, Copy)]
pub struct PackItem {
    pub id: CardId,
    pub size: Size,
    /// Pre-pack position, consulted only to break ties for cards missing
    /// from the display order.
    pub position: Point,
}

impl PackItem {
    pub fn new(id: CardId, size: Size, position: Point) -> Self {
        Self { id, size, position }
    }
}

/// A card held at a pinned position while the rest pack around it.
#[derive(Debug, Clone, Copy)]
pub struct FixedCard {
    pub id: CardId,
    pub position: Point,
    pub size: Size,
}

/// Result of packing one section.
#[derive(Debug, Clone, Default)]
pub struct Packing {
    /// Interior position per card.
    pub positions: HashMap<CardId, Point>,
    /// Interior content height: lowest card bottom plus a trailing gap,
    /// zero when the section has no cards. Callers clamp to the section's
    /// configured minimum.
    pub height: f64,
}

/// Row-flow pack: flow cards left to right in display order, wrapping when
/// the next card would exceed `inner_width`.
pub fn pack(inner_width: f64, items: &[PackItem], order: &[CardId]) -> Packing {
    let mut positions = HashMap::with_capacity(items.len());
    let mut cursor = Point::new(0.0, GAP);
    let mut bottom: f64 = 0.0;

    for item in resolve_order(items, order) {
        let w = item.size.width;
        if cursor.x > 0.0 && cursor.x + w > inner_width {
            cursor.x = 0.0;
            cursor.y = bottom + GAP;
        }
        positions.insert(item.id, cursor);
        bottom = bottom.max(cursor.y + item.size.height);
        cursor.x += w + GAP;
    }

    let height = if positions.is_empty() { 0.0 } else { bottom + GAP };
    Packing { positions, height }
}

/// Fixed-card pack: clamp the fixed card into the interior, mark it
/// occupied, then place every other card at the first free slot found by a
/// coarse grid scan in reading order.
pub fn pack_with_fixed(
    inner_width: f64,
    items: &[PackItem],
    order: &[CardId],
    fixed: &FixedCard,
) -> Packing {
    let pinned = Point::new(
        geometry::clamp_x(fixed.position.x, fixed.size.width, inner_width),
        fixed.position.y.max(GAP),
    );
    let mut positions = HashMap::with_capacity(items.len() + 1);
    positions.insert(fixed.id, pinned);
    let mut occupied = vec![geometry::rect_at(pinned, fixed.size)];

    let ceiling = scan_ceiling(items) + fixed.size.height + GAP + pinned.y;
    for item in resolve_order(items, order) {
        if item.id == fixed.id {
            continue;
        }
        let pos = find_free_position(&occupied, item.size, inner_width, ceiling)
            .unwrap_or_else(|| Point::new(0.0, max_bottom(&occupied) + GAP));
        occupied.push(geometry::rect_at(pos, item.size));
        positions.insert(item.id, pos);
    }

    Packing {
        height: max_bottom(&occupied) + GAP,
        positions,
    }
}

/// First position, scanning rows top to bottom and columns left to right,
/// where `size` fits without coming within [`GAP`] of any occupied
/// rectangle. `None` when the scan exhausts `ceiling`.
pub(crate) fn find_free_position(
    occupied: &[Rect],
    size: Size,
    inner_width: f64,
    ceiling: f64,
) -> Option<Point> {
    let max_x = (inner_width - size.width).max(0.0);
    let mut y = GAP;
    while y <= ceiling {
        let mut x = 0.0;
        while x <= max_x {
            let candidate = Rect::new(x, y, x + size.width, y + size.height);
            if !occupied
                .iter()
                .any(|r| geometry::overlaps_with_gap(*r, candidate, GAP))
            {
                return Some(Point::new(x, y));
            }
            x += COLUMN_STEP;
        }
        y += GAP;
    }
    None
}

/// Self-correction pass over an existing packing: scan pairwise in reading
/// order and relocate the later card of any colliding pair to the nearest
/// free slot. Bounded by [`MAX_OVERLAP_PASSES`]; residual overlap beyond
/// the cap is logged and accepted. Returns whether the result is clean.
pub fn fix_overlaps(inner_width: f64, items: &[PackItem], packing: &mut Packing) -> bool {
    let sizes: HashMap<CardId, Size> = items.iter().map(|i| (i.id, i.size)).collect();
    let ceiling = scan_ceiling(items) + max_bottom_of(packing, &sizes);
    let mut clean = false;

    for _ in 0..MAX_OVERLAP_PASSES {
        let ordered = reading_order(&entries_of(packing, &sizes));
        let mut moved = false;
        for j in 1..ordered.len() {
            let rects: HashMap<CardId, Rect> = entries_of(packing, &sizes).into_iter().collect();
            let rect_j = rects[&ordered[j]];
            let collides = ordered[..j]
                .iter()
                .any(|i| geometry::overlaps_with_gap(rects[i], rect_j, GAP));
            if collides {
                let others: Vec<Rect> = rects
                    .iter()
                    .filter(|(id, _)| **id != ordered[j])
                    .map(|(_, r)| *r)
                    .collect();
                let size = sizes[&ordered[j]];
                let pos = find_free_position(&others, size, inner_width, ceiling)
                    .unwrap_or_else(|| Point::new(0.0, max_bottom(&others) + GAP));
                packing.positions.insert(ordered[j], pos);
                moved = true;
            }
        }
        if !moved {
            clean = true;
            break;
        }
    }

    if !clean {
        clean = !has_overlap(&entries_of(packing, &sizes));
        if !clean {
            log::warn!(
                "residual card overlap after {} correction passes",
                MAX_OVERLAP_PASSES
            );
        }
    }

    let entries = entries_of(packing, &sizes);
    packing.height = if entries.is_empty() {
        0.0
    } else {
        entries.iter().fold(0.0f64, |acc, (_, r)| acc.max(r.y1)) + GAP
    };
    clean
}

/// Reading order of positioned cards: top to bottom in quantized row bands,
/// left to right inside a band.
pub fn reading_order(entries: &[(CardId, Rect)]) -> Vec<CardId> {
    let mut sorted = entries.to_vec();
    sorted.sort_by(|a, b| {
        geometry::row_band(a.1.y0)
            .cmp(&geometry::row_band(b.1.y0))
            .then(a.1.x0.total_cmp(&b.1.x0))
            .then(a.1.y0.total_cmp(&b.1.y0))
    });
    sorted.into_iter().map(|(id, _)| id).collect()
}

/// Visit order for packing: the display order first, then any card absent
/// from it in reading order of its pre-pack position.
fn resolve_order<'a>(items: &'a [PackItem], order: &[CardId]) -> Vec<&'a PackItem> {
    let by_id: HashMap<CardId, &PackItem> = items.iter().map(|i| (i.id, i)).collect();
    let mut seen = HashSet::with_capacity(items.len());
    let mut out = Vec::with_capacity(items.len());
    for id in order {
        if let Some(item) = by_id.get(id) {
            if seen.insert(*id) {
                out.push(*item);
            }
        }
    }
    let mut rest: Vec<&PackItem> = items.iter().filter(|i| !seen.contains(&i.id)).collect();
    rest.sort_by(|a, b| {
        geometry::row_band(a.position.y)
            .cmp(&geometry::row_band(b.position.y))
            .then(a.position.x.total_cmp(&b.position.x))
    });
    out.extend(rest);
    out
}

/// Scan bound: every card stacked in its own row still fits below this.
fn scan_ceiling(items: &[PackItem]) -> f64 {
    GAP + items.iter().map(|i| i.size.height + GAP).sum::<f64>()
}

fn max_bottom(rects: &[Rect]) -> f64 {
    rects.iter().fold(0.0f64, |acc, r| acc.max(r.y1))
}

fn max_bottom_of(packing: &Packing, sizes: &HashMap<CardId, Size>) -> f64 {
    entries_of(packing, sizes)
        .iter()
        .fold(0.0f64, |acc, (_, r)| acc.max(r.y1))
}

fn entries_of(packing: &Packing, sizes: &HashMap<CardId, Size>) -> Vec<(CardId, Rect)> {
    packing
        .positions
        .iter()
        .filter_map(|(id, pos)| sizes.get(id).map(|s| (*id, geometry::rect_at(*pos, *s))))
        .collect()
}

fn has_overlap(entries: &[(CardId, Rect)]) -> bool {
    for (i, (_, a)) in entries.iter().enumerate() {
        for (_, b) in entries.iter().skip(i + 1) {
            if geometry::overlaps_with_gap(*a, *b, GAP) {
                return true;
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn item(w: f64, h: f64) -> PackItem {
        PackItem::new(Uuid::new_v4(), Size::new(w, h), Point::ZERO)
    }

    fn assert_invariants(inner_width: f64, items: &[PackItem], packing: &Packing) {
        let sizes: HashMap<CardId, Size> = items.iter().map(|i| (i.id, i.size)).collect();
        let entries = entries_of(packing, &sizes);
        // No two cards come within the gap of each other.
        assert!(!has_overlap(&entries), "cards overlap: {entries:?}");
        let mut bottom: f64 = 0.0;
        for (_, rect) in &entries {
            // Containment: within [0, inner_width] horizontally, below the
            // top gap vertically. Oversized cards are pinned at x = 0.
            assert!(rect.x0 >= 0.0);
            if rect.width() < inner_width {
                assert!(rect.x1 <= inner_width + 1e-9, "card exceeds width: {rect:?}");
            }
            assert!(rect.y0 >= GAP - 1e-9);
            bottom = bottom.max(rect.y1);
        }
        // Height sufficiency.
        assert!(packing.height >= bottom + GAP - 1e-9);
    }

    #[test]
    fn test_two_cards_share_a_row() {
        // 200x150 and 220x160 into a 460-wide interior: same row, second
        // card at x = 200 + 16, content height = tallest card framed by the
        // top and trailing gaps.
        let items = vec![item(200.0, 150.0), item(220.0, 160.0)];
        let order: Vec<CardId> = items.iter().map(|i| i.id).collect();
        let packing = pack(460.0, &items, &order);

        let first = packing.positions[&items[0].id];
        let second = packing.positions[&items[1].id];
        assert!((first.x).abs() < f64::EPSILON);
        assert!((first.y - GAP).abs() < f64::EPSILON);
        assert!((second.x - 216.0).abs() < f64::EPSILON);
        assert!((second.y - GAP).abs() < f64::EPSILON);
        assert!((packing.height - (160.0 + 2.0 * GAP)).abs() < f64::EPSILON);
        assert_invariants(460.0, &items, &packing);
    }

    #[test]
    fn test_wrap_to_new_row() {
        // The second card no longer fits next to the first once the
        // interior narrows.
        let items = vec![item(200.0, 150.0), item(220.0, 160.0)];
        let order: Vec<CardId> = items.iter().map(|i| i.id).collect();
        let packing = pack(400.0, &items, &order);

        let first = packing.positions[&items[0].id];
        let second = packing.positions[&items[1].id];
        assert!((first.y - GAP).abs() < f64::EPSILON);
        assert!((second.x).abs() < f64::EPSILON);
        assert!((second.y - (GAP + 150.0 + GAP)).abs() < f64::EPSILON);
        assert!((packing.height - (GAP + 150.0 + GAP + 160.0 + GAP)).abs() < f64::EPSILON);
        assert_invariants(400.0, &items, &packing);
    }

    #[test]
    fn test_empty_section_collapses() {
        let packing = pack(460.0, &[], &[]);
        assert!(packing.positions.is_empty());
        assert!(packing.height.abs() < f64::EPSILON);
    }

    #[test]
    fn test_oversized_card_pins_left() {
        let items = vec![item(600.0, 100.0)];
        let packing = pack(460.0, &items, &[items[0].id]);
        let pos = packing.positions[&items[0].id];
        assert!(pos.x.abs() < f64::EPSILON);
        assert_invariants(460.0, &items, &packing);
    }

    #[test]
    fn test_pack_is_idempotent() {
        let items: Vec<PackItem> = vec![
            item(200.0, 150.0),
            item(120.0, 90.0),
            item(300.0, 80.0),
            item(90.0, 200.0),
        ];
        let order: Vec<CardId> = items.iter().map(|i| i.id).collect();
        let first = pack(460.0, &items, &order);

        // Feed the packed positions back in as the pre-pack state.
        let repacked_items: Vec<PackItem> = items
            .iter()
            .map(|i| PackItem::new(i.id, i.size, first.positions[&i.id]))
            .collect();
        let second = pack(460.0, &repacked_items, &order);

        assert!((first.height - second.height).abs() < f64::EPSILON);
        for i in &items {
            assert_eq!(first.positions[&i.id], second.positions[&i.id]);
        }
    }

    #[test]
    fn test_order_preserved_without_membership_change() {
        let items: Vec<PackItem> = (0..5).map(|_| item(120.0, 90.0)).collect();
        let order: Vec<CardId> = items.iter().map(|i| i.id).collect();
        let packing = pack(460.0, &items, &order);

        let sizes: HashMap<CardId, Size> = items.iter().map(|i| (i.id, i.size)).collect();
        let observed = reading_order(&entries_of(&packing, &sizes));
        assert_eq!(observed, order);
    }

    #[test]
    fn test_cards_missing_from_order_fall_back_to_reading_order() {
        let mut a = item(100.0, 80.0);
        let mut b = item(100.0, 80.0);
        a.position = Point::new(0.0, 200.0);
        b.position = Point::new(0.0, 16.0);
        // Empty order list: b sits higher, so b packs first.
        let packing = pack(460.0, &[a, b], &[]);
        assert!(packing.positions[&b.id].x < packing.positions[&a.id].x);
    }

    #[test]
    fn test_fixed_card_holds_position() {
        let items = vec![item(200.0, 150.0), item(120.0, 90.0)];
        let order: Vec<CardId> = items.iter().map(|i| i.id).collect();
        let fixed = FixedCard {
            id: items[0].id,
            position: Point::new(100.0, 60.0),
            size: items[0].size,
        };
        let packing = pack_with_fixed(460.0, &items, &order, &fixed);

        let pinned = packing.positions[&fixed.id];
        assert!((pinned.x - 100.0).abs() < f64::EPSILON);
        assert!((pinned.y - 60.0).abs() < f64::EPSILON);
        assert_invariants(460.0, &items, &packing);
    }

    #[test]
    fn test_fixed_card_clamped_into_interior() {
        let items = vec![item(200.0, 150.0)];
        let fixed = FixedCard {
            id: items[0].id,
            position: Point::new(9999.0, -50.0),
            size: items[0].size,
        };
        let packing = pack_with_fixed(460.0, &items, &[items[0].id], &fixed);
        let pinned = packing.positions[&fixed.id];
        assert!((pinned.x - 260.0).abs() < f64::EPSILON);
        assert!((pinned.y - GAP).abs() < f64::EPSILON);
    }

    #[test]
    fn test_fixed_card_wider_than_interior_pins_left() {
        let items = vec![item(600.0, 100.0)];
        let fixed = FixedCard {
            id: items[0].id,
            position: Point::new(200.0, 40.0),
            size: items[0].size,
        };
        let packing = pack_with_fixed(460.0, &items, &[], &fixed);
        assert!(packing.positions[&fixed.id].x.abs() < f64::EPSILON);
    }

    #[test]
    fn test_fixed_pack_avoids_resident_card() {
        // A resident card occupies the top-left corner; dropping another
        // card right on top of it must relocate the resident, not stack.
        let resident = item(200.0, 150.0);
        let dropped = item(200.0, 150.0);
        let items = vec![resident, dropped];
        let fixed = FixedCard {
            id: dropped.id,
            position: Point::new(0.0, GAP),
            size: dropped.size,
        };
        let packing = pack_with_fixed(460.0, &items, &[resident.id, dropped.id], &fixed);
        assert_invariants(460.0, &items, &packing);
        // The dropped card kept the pinned slot.
        assert_eq!(packing.positions[&dropped.id], Point::new(0.0, GAP));
    }

    #[test]
    fn test_fixed_pack_many_cards_stays_bounded() {
        let items: Vec<PackItem> = (0..12).map(|_| item(150.0, 100.0)).collect();
        let order: Vec<CardId> = items.iter().map(|i| i.id).collect();
        let fixed = FixedCard {
            id: items[0].id,
            position: Point::new(80.0, 300.0),
            size: items[0].size,
        };
        let packing = pack_with_fixed(460.0, &items, &order, &fixed);
        assert_eq!(packing.positions.len(), items.len());
        assert_invariants(460.0, &items, &packing);
    }

    #[test]
    fn test_fix_overlaps_separates_identical_coordinates() {
        // Upstream state assigned two cards the same slot.
        let items = vec![item(200.0, 150.0), item(200.0, 150.0)];
        let mut packing = Packing::default();
        packing.positions.insert(items[0].id, Point::new(0.0, GAP));
        packing.positions.insert(items[1].id, Point::new(0.0, GAP));

        let clean = fix_overlaps(460.0, &items, &mut packing);
        assert!(clean);
        let sizes: HashMap<CardId, Size> = items.iter().map(|i| (i.id, i.size)).collect();
        assert!(!has_overlap(&entries_of(&packing, &sizes)));
        assert!(packing.height > 150.0);
    }

    #[test]
    fn test_fix_overlaps_leaves_valid_layout_alone() {
        let items = vec![item(200.0, 150.0), item(220.0, 160.0)];
        let order: Vec<CardId> = items.iter().map(|i| i.id).collect();
        let mut packing = pack(460.0, &items, &order);
        let before = packing.positions.clone();

        assert!(fix_overlaps(460.0, &items, &mut packing));
        assert_eq!(before, packing.positions);
    }

    #[test]
    fn test_reading_order_bands_rows() {
        let a = (Uuid::new_v4(), Rect::new(216.0, 16.0, 416.0, 166.0));
        let b = (Uuid::new_v4(), Rect::new(0.0, 18.0, 200.0, 168.0));
        let c = (Uuid::new_v4(), Rect::new(0.0, 198.0, 200.0, 348.0));
        // b sits a couple of units lower than a but in the same band, so it
        // still precedes a by virtue of being further left.
        assert_eq!(reading_order(&[a, b, c]), vec![b.0, a.0, c.0]);
    }
}
