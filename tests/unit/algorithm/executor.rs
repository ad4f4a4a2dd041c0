//! Tests for the model controller lifecycle and its generation entry points

#[cfg(test)]
mod tests {
    use simpletiled::algorithm::adjacency::{CompiledRules, NeighborSpec, TileSpec};
    use simpletiled::algorithm::executor::{GenerationProgress, ModelState, SimpleTiledModel};
    use simpletiled::io::configuration::{DEFAULT_SEED, MAX_ATTEMPTS, MAX_GRID_DIMENSION};
    use simpletiled::AlgorithmError;
    use std::sync::Arc;

    fn checker_rules() -> Arc<CompiledRules> {
        let tiles = vec![
            TileSpec::new("black", "X", None).unwrap(),
            TileSpec::new("white", "X", None).unwrap(),
        ];
        let neighbors = [NeighborSpec::horizontal("black", 0, "white", 0)];
        Arc::new(CompiledRules::compile(tiles, &neighbors).unwrap())
    }

    // Tests dimensions are validated at construction
    // Verified by accepting zero-sized grids
    #[test]
    fn test_dimension_validation() {
        for (width, height) in [(0, 4), (4, 0), (MAX_GRID_DIMENSION + 1, 1)] {
            let result = SimpleTiledModel::from_rules(checker_rules(), width, height, false);
            assert!(matches!(
                result,
                Err(AlgorithmError::InvalidParameter { .. })
            ));
        }
        assert!(SimpleTiledModel::from_rules(checker_rules(), 1, 1, false).is_ok());
    }

    // Tests a new model has no wave and the default seed
    #[test]
    fn test_new_model_state() {
        let model = SimpleTiledModel::from_rules(checker_rules(), 4, 3, true).unwrap();
        assert_eq!(model.state(), ModelState::Uninitialized);
        assert_eq!(model.seed(), DEFAULT_SEED);
        assert_eq!((model.width(), model.height()), (4, 3));
        assert!(model.periodic());
        assert!(model.wave().is_none());
        assert_eq!(model.grid().resolved_count(), 0);
        assert_eq!(model.rules().oriented_count(), 2);
    }

    // Tests a checkerboard is the only solution and is found
    // Verified by inverting the compatibility check during propagation
    #[test]
    fn test_checkerboard_generation() {
        let mut model = SimpleTiledModel::from_rules(checker_rules(), 4, 4, true).unwrap();
        let (grid, success) = model.generate();
        assert!(success);

        let first = grid.get(0, 0).unwrap();
        for y in 0..4 {
            for x in 0..4 {
                let expected = if (x + y) % 2 == 0 { first } else { 1 - first };
                assert_eq!(grid.get(x, y), Some(expected));
            }
        }
    }

    // Tests progress reports grow within an attempt and end at the full grid
    #[test]
    fn test_generation_progress_reports() {
        let mut model = SimpleTiledModel::from_rules(checker_rules(), 6, 2, false).unwrap();
        let mut reports: Vec<GenerationProgress> = Vec::new();

        let (_, success) = model.generate_with_progress(|report| reports.push(report));
        assert!(success);

        let last = reports.last().copied().unwrap();
        assert_eq!(last.decided, last.total);
        assert_eq!(last.total, 12);
        assert!(reports.windows(2).all(|pair| {
            pair[0].attempt != pair[1].attempt || pair[0].decided <= pair[1].decided
        }));
    }

    // Tests an odd periodic ring of alternating tiles always fails
    // Verified by returning success after the attempt cap
    #[test]
    fn test_attempt_cap() {
        let mut model = SimpleTiledModel::from_rules(checker_rules(), 3, 1, true).unwrap();
        let mut attempts = 0;
        let (_, success) = model.generate_with_progress(|report| attempts = report.attempt);

        assert!(!success);
        assert_eq!(attempts, MAX_ATTEMPTS);
        assert_eq!(model.state(), ModelState::Contradiction);
    }

    // Tests stepping reports a contradiction only on the call that hit it
    // Verified by checking the wave instead of the state at call start
    #[test]
    fn test_iterate_reports_contradiction_once() {
        let mut model = SimpleTiledModel::from_rules(checker_rules(), 3, 1, true).unwrap();

        let (first_grid, finished, error) = model.iterate(1);
        assert!(!finished);
        assert!(matches!(error, Some(AlgorithmError::Contradiction { .. })));
        assert_eq!(model.state(), ModelState::Contradiction);

        let (again_grid, again_finished, again) = model.iterate(1);
        assert!(!again_finished);
        assert!(again.is_none());
        assert_eq!(again_grid, first_grid);
        assert_eq!(model.state(), ModelState::Contradiction);

        model.clear();
        let (_, _, fresh) = model.iterate(1);
        assert!(fresh.is_some());
    }

    // Tests stepping after a failed generation reports no new error
    #[test]
    fn test_iterate_after_failed_generate() {
        let mut model = SimpleTiledModel::from_rules(checker_rules(), 3, 1, true).unwrap();
        let (_, success) = model.generate();
        assert!(!success);

        let (_, finished, error) = model.iterate(1);
        assert!(!finished);
        assert!(error.is_none());
    }

    // Tests zero steps build the wave without collapsing
    #[test]
    fn test_iterate_zero_steps() {
        let mut model = SimpleTiledModel::from_rules(checker_rules(), 4, 4, false).unwrap();
        let (grid, finished, error) = model.iterate(0);

        assert!(!finished);
        assert!(error.is_none());
        assert_eq!(grid.resolved_count(), 0);
        assert_eq!(model.state(), ModelState::Running);
        assert!(model.wave().is_some());
    }

    // Tests models built from tile lists match shared-rule models
    #[test]
    fn test_new_matches_from_rules() {
        let tiles = vec![
            TileSpec::new("black", "X", None).unwrap(),
            TileSpec::new("white", "X", None).unwrap(),
        ];
        let neighbors = [NeighborSpec::horizontal("black", 0, "white", 0)];
        let mut built = SimpleTiledModel::new(tiles, &neighbors, 4, 4, false).unwrap();
        let mut shared = SimpleTiledModel::from_rules(checker_rules(), 4, 4, false).unwrap();
        built.set_seed(12);
        shared.set_seed(12);

        assert_eq!(built.generate(), shared.generate());
    }
}
