//! Slot grid initialization

use crate::config::GridConfig;
use crate::types::{Result, Slot};

/// Build the empty conceptual grid in row-major order
///
/// Produces exactly `rows * cols` slots, ids "R1C1", "R1C2", ... with every
/// signal field cleared.
pub fn initialize_slots(grid: &GridConfig) -> Result<Vec<Slot>> {
    grid.validate()?;

    let mut slots = Vec::with_capacity(grid.total_slots());
    for row in 1..=grid.rows {
        for col in 1..=grid.cols {
            slots.push(Slot::empty(row, col));
        }
    }

    log::debug!(
        "Initialized {} conceptual slots ({}x{})",
        slots.len(),
        grid.rows,
        grid.cols
    );
    Ok(slots)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_grid_layout() {
        let slots = initialize_slots(&GridConfig::new()).unwrap();
        assert_eq!(slots.len(), 90);
        assert_eq!(slots[0].id, "R1C1");
        assert_eq!(slots[4].id, "R1C5");
        assert_eq!(slots[5].id, "R2C1");
        assert_eq!(slots[89].id, "R18C5");
        assert!(slots.iter().all(|s| !s.is_used && s.signal_name.is_none()));
    }

    #[test]
    fn test_row_major_order() {
        let slots = initialize_slots(&GridConfig::new().with_dimensions(3, 2)).unwrap();
        let positions: Vec<(usize, usize)> = slots.iter().map(|s| (s.row, s.col)).collect();
        assert_eq!(positions, vec![(1, 1), (1, 2), (2, 1), (2, 2), (3, 1), (3, 2)]);
    }

    #[test]
    fn test_invalid_dimensions() {
        assert!(initialize_slots(&GridConfig::new().with_dimensions(0, 0)).is_err());
    }
}
