//! Tests for minimum-entropy selection, weighted collapse and the random source

#[cfg(test)]
mod tests {
    use simpletiled::algorithm::adjacency::{CompiledRules, NeighborSpec, TileSpec};
    use simpletiled::algorithm::selection::{RandomSelector, Selection, collapse, select_next};
    use simpletiled::algorithm::wave::Wave;
    use std::sync::Arc;

    fn free_rules(names: &[&str]) -> Arc<CompiledRules> {
        let tiles = names
            .iter()
            .map(|name| TileSpec::new(*name, "X", None).unwrap())
            .collect();
        let mut neighbors = Vec::new();
        for a in names {
            for b in names {
                neighbors.push(NeighborSpec::horizontal(*a, 0, *b, 0));
            }
        }
        Arc::new(CompiledRules::compile(tiles, &neighbors).unwrap())
    }

    // Tests identical seeds produce identical draw sequences
    // Verified by seeding from system entropy
    #[test]
    fn test_selector_is_reproducible() {
        let mut first = RandomSelector::new(17);
        let mut second = RandomSelector::new(17);
        let a: Vec<f64> = (0..5).map(|_| first.unit()).collect();
        let b: Vec<f64> = (0..5).map(|_| second.unit()).collect();
        assert_eq!(a, b);
        assert!(a.iter().all(|value| (0.0..1.0).contains(value)));

        first.reseed(17);
        assert!((first.unit() - a[0]).abs() < f64::EPSILON);
    }

    // Tests zero-weight entries are never chosen
    #[test]
    fn test_weighted_choice_skips_zero_weights() {
        let mut selector = RandomSelector::new(3);
        for _ in 0..50 {
            assert_eq!(selector.weighted_choice(&[0.0, 2.0, 0.0]), 1);
        }
    }

    // Tests the lowest-entropy undecided cell is selected
    // Verified by selecting the maximum instead of the minimum
    #[test]
    fn test_selects_lowest_entropy() {
        let mut wave = Wave::new(free_rules(&["a", "b", "c"]), 3, 3, false);
        wave.ban(4, 2);
        let mut selector = RandomSelector::new(1);

        assert_eq!(select_next(&wave, &mut selector), Selection::Cell(4));
    }

    // Tests completion and contradiction are reported
    #[test]
    fn test_terminal_selections() {
        let mut selector = RandomSelector::new(1);

        let single = Wave::new(free_rules(&["only"]), 4, 4, false);
        assert_eq!(select_next(&single, &mut selector), Selection::Complete);

        let mut broken = Wave::new(free_rules(&["a", "b"]), 2, 2, false);
        broken.ban(3, 0);
        broken.ban(3, 1);
        assert_eq!(
            select_next(&broken, &mut selector),
            Selection::Contradiction(3)
        );
    }

    // Tests only undecided cells consume random draws
    // Verified by drawing noise for every cell
    #[test]
    fn test_decided_cells_draw_nothing() {
        let mut wave = Wave::new(free_rules(&["a", "b"]), 3, 1, false);
        wave.ban(0, 1);
        wave.ban(2, 0);

        let mut selector = RandomSelector::new(9);
        let mut reference = selector.clone();
        assert_eq!(select_next(&wave, &mut selector), Selection::Cell(1));

        let _ = reference.unit();
        assert!((selector.unit() - reference.unit()).abs() < f64::EPSILON);
    }

    // Tests collapse leaves exactly one tile from the original domain
    // Verified by keeping the other tiles after sampling
    #[test]
    fn test_collapse_observes_cell() {
        let mut wave = Wave::new(free_rules(&["a", "b", "c"]), 2, 2, true);
        let mut selector = RandomSelector::new(21);

        let chosen = collapse(&mut wave, 2, &mut selector).unwrap();
        assert!(chosen < 3);
        assert_eq!(wave.observed(2), Some(chosen));
        assert_eq!(wave.decided_count(), 1);
        assert!(wave.is_arc_consistent());
    }

    // Tests noise alone breaks ties between equal-entropy cells
    // Verified by scanning cells in reverse order
    #[test]
    fn test_tie_break_follows_draws() {
        let wave = Wave::new(free_rules(&["a", "b"]), 3, 1, false);
        let mut selector = RandomSelector::new(0);

        // Seed 0 draws its smallest value for the third cell
        assert_eq!(select_next(&wave, &mut selector), Selection::Cell(2));
    }

    // Tests candidates are sampled by cumulative weight in ascending id order
    // Verified by walking the candidates from the highest id
    #[test]
    fn test_collapse_sampling_order() {
        let tiles = ["one", "two", "three", "four"]
            .iter()
            .zip(1..)
            .map(|(name, weight)| TileSpec::new(*name, "X", Some(f64::from(weight))).unwrap())
            .collect();
        let rules = Arc::new(CompiledRules::compile(tiles, &[]).unwrap());
        let mut selector = RandomSelector::new(7);

        let chosen: Vec<_> = (0..3)
            .map(|_| {
                let mut wave = Wave::new(Arc::clone(&rules), 1, 1, false);
                collapse(&mut wave, 0, &mut selector).unwrap()
            })
            .collect();
        assert_eq!(chosen, vec![0, 2, 1]);
    }

    // Tests collapse follows tile weights
    #[test]
    fn test_collapse_respects_weights() {
        let tiles = vec![
            TileSpec::new("rare", "X", Some(1e-9)).unwrap(),
            TileSpec::new("common", "X", Some(1e9)).unwrap(),
        ];
        let neighbors = [
            NeighborSpec::horizontal("rare", 0, "common", 0),
            NeighborSpec::horizontal("common", 0, "common", 0),
        ];
        let rules = Arc::new(CompiledRules::compile(tiles, &neighbors).unwrap());
        let mut selector = RandomSelector::new(4);

        for _ in 0..20 {
            let mut wave = Wave::new(Arc::clone(&rules), 1, 1, false);
            assert_eq!(collapse(&mut wave, 0, &mut selector), Some(1));
        }
    }
}
