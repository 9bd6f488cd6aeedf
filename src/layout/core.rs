use crate::geometry::Rect;

/// Vertical space rule for one zone row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    /// Exact number of terminal rows.
    Fixed(u16),
    /// Weighted share of whatever height the fixed rows leave over.
    Flex(u16),
}

/// Split `area` into stacked rows, one per constraint, top to bottom.
///
/// Fixed rows take their height first, clamped to what remains; leftover
/// height is distributed across flex rows by weight, remainder cells going
/// to the earliest flex rows. The result always has one rect per
/// constraint, possibly zero-height when the area is too small.
pub fn split_rows(area: Rect, constraints: &[Constraint]) -> Vec<Rect> {
    let mut heights = vec![0u16; constraints.len()];

    let mut remaining = area.height;
    for (idx, constraint) in constraints.iter().enumerate() {
        if let Constraint::Fixed(rows) = constraint {
            let take = (*rows).min(remaining);
            heights[idx] = take;
            remaining -= take;
        }
    }

    let total_flex: u32 = constraints
        .iter()
        .map(|c| match c {
            Constraint::Flex(weight) => (*weight).max(1) as u32,
            Constraint::Fixed(_) => 0,
        })
        .sum();

    if total_flex > 0 {
        let pool = remaining;
        let mut assigned = 0u16;
        for (idx, constraint) in constraints.iter().enumerate() {
            if let Constraint::Flex(weight) = constraint {
                let share = (pool as u32 * (*weight).max(1) as u32 / total_flex) as u16;
                heights[idx] = share;
                assigned += share;
            }
        }

        let mut leftover = pool - assigned;
        for (idx, constraint) in constraints.iter().enumerate() {
            if leftover == 0 {
                break;
            }
            if matches!(constraint, Constraint::Flex(_)) {
                heights[idx] += 1;
                leftover -= 1;
            }
        }
    }

    let mut rects = Vec::with_capacity(constraints.len());
    let mut cursor = area.y;
    for height in heights {
        rects.push(Rect::new(area.x, cursor, area.width, height));
        cursor = cursor.saturating_add(height);
    }
    rects
}
