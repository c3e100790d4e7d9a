//! Volume-floor pooling.
//!
//! Near-zero-traffic entities are kept out of threshold computation and
//! headline selection. If the floor would leave nothing, it is waived and
//! every entity is pooled.

/// Which entities take part in thresholds and selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FloorMask {
    pub included: Vec<bool>,
    /// True when nothing cleared the floor and all entities were pooled
    pub waived: bool,
}

impl FloorMask {
    /// Apply `floor` to per-entity volumes (`volume >= floor` passes).
    pub fn new(volumes: &[f64], floor: f64, selector: &'static str) -> Self {
        let passes: Vec<bool> = volumes.iter().map(|v| *v >= floor).collect();
        if volumes.is_empty() || passes.iter().any(|&p| p) {
            return Self {
                included: passes,
                waived: false,
            };
        }

        tracing::warn!(
            selector,
            floor,
            entities = volumes.len(),
            "nothing clears the volume floor, waiving it"
        );
        Self {
            included: vec![true; volumes.len()],
            waived: true,
        }
    }

    pub fn contains(&self, index: usize) -> bool {
        self.included.get(index).copied().unwrap_or(false)
    }

    /// Pooled subset of `items`, in input order.
    pub fn select<T: Clone>(&self, items: &[T]) -> Vec<T> {
        items
            .iter()
            .enumerate()
            .filter(|(i, _)| self.contains(*i))
            .map(|(_, item)| item.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.included.iter().filter(|&&b| b).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floor_filters() {
        let mask = FloorMask::new(&[5.0, 2_000.0, 1_000.0], 1_000.0, "test");
        assert_eq!(mask.included, vec![false, true, true]);
        assert!(!mask.waived);
        assert_eq!(mask.select(&["a", "b", "c"]), vec!["b", "c"]);
    }

    #[test]
    fn test_floor_waived_instead_of_emptying() {
        let mask = FloorMask::new(&[5.0, 10.0], 1_000.0, "test");
        assert!(mask.waived);
        assert_eq!(mask.len(), 2);
    }

    #[test]
    fn test_empty_input_is_empty_pool() {
        let mask = FloorMask::new(&[], 1_000.0, "test");
        assert!(mask.is_empty());
        assert!(!mask.waived);
        assert!(!mask.contains(0));
    }
}
