#[cfg(test)]
mod tests {
    use std::time::Duration;

    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use unordered_pair::UnorderedPair;

    use crate::builder::{BoardBuilder, BuilderInvalidReason};
    use crate::{Board, BoardSnapshot, Cell, ConnectionTable, Phase, PathValidator, Position, Puzzle, PuzzleConfig, PuzzleError, Settings, Side};

    fn table() -> ConnectionTable {
        PuzzleConfig::bundled().unwrap().table().unwrap()
    }

    fn layout(table: &ConnectionTable) -> Board {
        PuzzleConfig::bundled().unwrap().board(table).unwrap()
    }

    // start along the top row, down the right column, gap at (3, 2)
    fn corner_road(table: &ConnectionTable) -> Board {
        BoardBuilder::new(table)
            .row(0, [Some("start_right"), Some("horizontal"), Some("horizontal"), Some("curve_bottom_left")])
            .place(Position(1, 3), "vertical")
            .place(Position(2, 3), "vertical")
            .place(Position(3, 3), "end_up")
            .leave_empty(Position(3, 2))
            .fill("grass")
            .build()
            .unwrap()
    }

    fn settings() -> Settings {
        Settings {
            seed: Some(7),
            shuffle_on_start: false,
            ..Default::default()
        }
    }

    #[test_log::test]
    fn straight_row_reaches_end() {
        let table = table();
        let board = BoardBuilder::new(&table)
            .row(1, [Some("start_right"), Some("horizontal"), Some("horizontal"), Some("end_left")])
            .leave_empty(Position(0, 0))
            .fill("grass")
            .build()
            .unwrap();

        let validator = PathValidator::new(&table);
        assert!(validator.validate(&board, Position(1, 0), Position(1, 3)).unwrap());
        assert_eq!(
            validator.route(&board, Position(1, 0), Position(1, 3)).unwrap(),
            Some(vec![Position(1, 0), Position(1, 1), Position(1, 2), Position(1, 3)])
        );
    }

    #[test_log::test]
    fn corner_road_reaches_end() {
        let table = table();
        let board = corner_road(&table);

        assert_eq!(board.render(&table).unwrap(), "S──┐
###│
###│
##.E
");
        assert!(PathValidator::new(&table).validate(&board, Position::START, Position::END).unwrap());
    }

    #[test_log::test]
    fn incompatible_tile_breaks_road() {
        let table = table();
        let board = BoardBuilder::new(&table)
            .row(0, [Some("start_right"), Some("horizontal"), Some("vertical"), Some("curve_bottom_left")])
            .place(Position(1, 3), "vertical")
            .place(Position(2, 3), "vertical")
            .place(Position(3, 3), "end_up")
            .leave_empty(Position(3, 2))
            .fill("grass")
            .build()
            .unwrap();

        let validator = PathValidator::new(&table);
        assert!(!validator.validate(&board, Position::START, Position::END).unwrap());
        assert_eq!(validator.route(&board, Position::START, Position::END).unwrap(), None);
    }

    #[test_log::test]
    fn plain_tile_on_start_fails_immediately() {
        let table = table();
        let board = BoardBuilder::new(&table)
            .row(0, [Some("horizontal"), Some("horizontal"), Some("horizontal"), Some("curve_bottom_left")])
            .place(Position(1, 3), "vertical")
            .place(Position(2, 3), "vertical")
            .place(Position(3, 3), "end_up")
            .leave_empty(Position(3, 2))
            .fill("grass")
            .build()
            .unwrap();

        assert!(!PathValidator::new(&table).validate(&board, Position::START, Position::END).unwrap());
    }

    #[test_log::test]
    fn wrong_end_tile_fails() {
        let table = table();
        let board = BoardBuilder::new(&table)
            .row(0, [Some("start_right"), Some("horizontal"), Some("horizontal"), Some("curve_bottom_left")])
            .place(Position(1, 3), "vertical")
            .place(Position(2, 3), "vertical")
            .place(Position(3, 3), "vertical")
            .leave_empty(Position(3, 2))
            .fill("grass")
            .build()
            .unwrap();

        assert!(!PathValidator::new(&table).validate(&board, Position::START, Position::END).unwrap());
    }

    #[test_log::test]
    fn disconnected_board_fails() {
        let table = table();
        let board = BoardBuilder::new(&table)
            .place(Position::START, "start_right")
            .place(Position::END, "end_up")
            .leave_empty(Position(1, 1))
            .fill("grass")
            .build()
            .unwrap();

        let validator = PathValidator::new(&table);
        assert!(!validator.validate(&board, Position::START, Position::END).unwrap());
        assert!(validator.connections(&board).unwrap().is_empty());
    }

    #[test_log::test]
    fn gap_is_never_the_goal() {
        let table = table();
        let board = BoardBuilder::new(&table)
            .row(0, [Some("start_right"), Some("horizontal"), Some("horizontal"), Some("curve_bottom_left")])
            .place(Position(1, 3), "vertical")
            .place(Position(2, 3), "vertical")
            .leave_empty(Position::END)
            .fill("grass")
            .build()
            .unwrap();

        assert!(!PathValidator::new(&table).validate(&board, Position::START, Position::END).unwrap());
    }

    #[test_log::test]
    fn validation_is_repeatable() {
        let table = table();
        let validator = PathValidator::new(&table);

        for board in [layout(&table), corner_road(&table)] {
            let first = validator.validate(&board, Position::START, Position::END).unwrap();
            let again = validator.validate(&board, Position::START, Position::END).unwrap();
            assert_eq!(first, again);
            assert_eq!(
                validator.route(&board, Position::START, Position::END).unwrap(),
                validator.route(&board, Position::START, Position::END).unwrap()
            );
        }
    }

    #[test_log::test]
    fn one_sided_listing_does_not_join() {
        let table = table();
        let mut editor = table.edit();
        // horizontal still lists horizontal to its right, but not to its left
        editor.forbid("horizontal", Side::Left, "horizontal", false).unwrap();
        let edited = editor.commit().unwrap();

        let board = Board::from_snapshot(&edited, &corner_road(&table).snapshot(&table).unwrap()).unwrap();
        let validator = PathValidator::new(&edited);
        assert!(!validator.validate(&board, Position::START, Position::END).unwrap());
        assert!(!validator.connections(&board).unwrap().contains(&UnorderedPair(Position(0, 1), Position(0, 2))));
        assert!(validator.connections(&board).unwrap().contains(&UnorderedPair(Position(0, 0), Position(0, 1))));
    }

    #[test_log::test]
    fn bundled_layout_route() {
        let table = table();
        let board = layout(&table);

        assert_eq!(board.render(&table).unwrap(), "S──┐
#│┘│
└#─│
#┌.E
");
        assert_eq!(
            PathValidator::new(&table).route(&board, Position::START, Position::END).unwrap(),
            Some(vec![Position(0, 0), Position(0, 1), Position(0, 2), Position(0, 3), Position(1, 3), Position(2, 3), Position(3, 3)])
        );
    }

    #[test_log::test]
    fn validator_rejects_malformed_input() {
        let table = table();
        let board = layout(&table);
        let validator = PathValidator::new(&table);

        assert!(matches!(
            validator.validate(&board, Position(4, 0), Position::END),
            Err(PuzzleError::OutOfBounds(Position(4, 0)))
        ));

        let small = ConnectionTable::from_json(r#"{
            "start_tiles": ["a"],
            "end_tiles": ["a"],
            "tiles": { "a": {} }
        }"#).unwrap();
        assert!(matches!(
            PathValidator::new(&small).validate(&board, Position::START, Position::END),
            Err(PuzzleError::MissingTileData(_))
        ));
    }

    #[test]
    fn snapshot_shape_errors() {
        let table = table();
        let row = || vec![Some("grass"); 4];

        let three_rows = BoardSnapshot::from_rows(vec![row(), row(), row()]);
        assert!(matches!(Board::from_snapshot(&table, &three_rows), Err(PuzzleError::WrongRowCount(3))));

        let mut long = row();
        long.push(None);
        let ragged = BoardSnapshot::from_rows(vec![row(), long, row(), row()]);
        assert!(matches!(Board::from_snapshot(&table, &ragged), Err(PuzzleError::RaggedRow { row: 1, found: 5 })));

        let full = BoardSnapshot::from_rows(vec![row(), row(), row(), row()]);
        assert!(matches!(Board::from_snapshot(&table, &full), Err(PuzzleError::EmptyCellCount(0))));

        let two_gaps = BoardSnapshot::from_rows(vec![vec![None, None, Some("grass"), Some("grass")], row(), row(), row()]);
        assert!(matches!(Board::from_snapshot(&table, &two_gaps), Err(PuzzleError::EmptyCellCount(2))));

        let unknown = BoardSnapshot::from_rows(vec![vec![None, Some("lava"), Some("grass"), Some("grass")], row(), row(), row()]);
        assert!(matches!(Board::from_snapshot(&table, &unknown), Err(PuzzleError::UnknownTile(ref key)) if key == "lava"));
    }

    #[test]
    fn builder_invalid_states() {
        let table = table();

        let unfilled = BoardBuilder::new(&table).leave_empty(Position::START).build();
        assert!(matches!(unfilled, Err(PuzzleError::InvalidBuilder(ref reasons)) if *reasons == vec![BuilderInvalidReason::Unfilled]));

        let mut builder = BoardBuilder::new(&table);
        builder.place(Position(0, 7), "grass");
        assert_eq!(builder.is_valid(), Some(&vec![BuilderInvalidReason::OutOfBounds]));
        // further calls are ignored once invalid
        builder.place(Position(0, 0), "lava").fill("grass");
        assert_eq!(builder.is_valid(), Some(&vec![BuilderInvalidReason::OutOfBounds]));

        let unknown = BoardBuilder::new(&table).place(Position::START, "lava").build();
        assert!(matches!(unknown, Err(PuzzleError::InvalidBuilder(ref reasons)) if *reasons == vec![BuilderInvalidReason::UnknownTile]));
    }

    #[test]
    fn slide_rules() {
        let table = table();
        let mut board = layout(&table);
        assert_eq!(board.empty(), Position(3, 2));

        assert!(matches!(board.slide(Position(3, 2)), Err(PuzzleError::NotATile(_))));
        assert!(matches!(board.slide(Position(0, 0)), Err(PuzzleError::NotAdjacentToEmpty(_))));
        assert!(matches!(board.slide(Position(3, 4)), Err(PuzzleError::OutOfBounds(_))));

        let end_up = board.cell(Position::END).unwrap();
        board.slide(Position::END).unwrap();
        assert_eq!(board.empty(), Position::END);
        assert_eq!(board.cell(Position(3, 2)).unwrap(), end_up);
        assert!(!PathValidator::new(&table).validate(&board, Position::START, Position::END).unwrap());

        board.slide(Position(3, 2)).unwrap();
        assert_eq!(board, layout(&table));
    }

    #[test]
    fn shuffle_conserves_tiles() {
        let table = table();
        let original = layout(&table);
        let mut board = original.clone();
        board.shuffle(&mut StdRng::seed_from_u64(42), 200);

        assert_eq!(board.tile_counts(), original.tile_counts());
        assert_eq!(board.cells().filter(|(_, cell)| *cell == Cell::Empty).count(), 1);
        assert_eq!(board.cell(board.empty()).unwrap(), Cell::Empty);

        let mut same_seed = original.clone();
        same_seed.shuffle(&mut StdRng::seed_from_u64(42), 200);
        assert_eq!(board, same_seed);
    }

    #[test]
    fn movable_tiles_surround_gap() {
        let table = table();
        let board = layout(&table);
        let mut movable = board.movable();
        movable.sort();
        assert_eq!(movable, vec![Position(2, 2), Position(3, 1), Position(3, 3)]);
    }

    #[test_log::test]
    fn winning_round() {
        let table = table();
        let board = layout(&table);
        let mut puzzle = Puzzle::new(table, board, settings());

        assert!(puzzle.drive().unwrap());
        assert_eq!(puzzle.phase(), Phase::Testing);
        assert_eq!(puzzle.route().map(<[Position]>::len), Some(7));
        assert!(matches!(puzzle.click(Position(3, 3)), Err(PuzzleError::WrongPhase(Phase::Testing))));

        assert_eq!(puzzle.advance(Duration::from_millis(1000)), Phase::Testing);
        assert_eq!(puzzle.remaining(), Duration::from_millis(500));
        assert_eq!(puzzle.advance(Duration::from_millis(500)), Phase::Won);
        assert_eq!(puzzle.advance(Duration::from_millis(2000)), Phase::Playing);

        assert_eq!(puzzle.moves(), 0);
        assert_eq!(puzzle.route(), None);
        assert_eq!(puzzle.board().tile_counts(), layout(puzzle.table()).tile_counts());
    }

    #[test_log::test]
    fn losing_round_keeps_board() {
        let table = table();
        let mut puzzle = Puzzle::new(table.clone(), layout(&table), settings());

        puzzle.click(Position::END).unwrap();
        assert_eq!(puzzle.moves(), 1);
        let before = puzzle.board().clone();

        assert!(!puzzle.drive().unwrap());
        assert_eq!(puzzle.route(), None);
        // one call covers the drive and the result display
        assert_eq!(puzzle.advance(Duration::from_secs(10)), Phase::Playing);
        assert_eq!(puzzle.board(), &before);
        assert_eq!(puzzle.moves(), 1);
    }

    #[test_log::test]
    fn zero_durations_resolve_at_once() {
        let table = table();
        let settings = Settings {
            drive_duration_ms: 0,
            result_duration_ms: 0,
            ..settings()
        };
        let mut puzzle = Puzzle::new(table.clone(), layout(&table), settings);

        puzzle.drive().unwrap();
        assert_eq!(puzzle.advance(Duration::ZERO), Phase::Playing);
    }

    #[test_log::test]
    fn bad_click_does_not_count() {
        let table = table();
        let mut puzzle = Puzzle::new(table.clone(), layout(&table), settings());

        assert!(puzzle.click(Position(0, 0)).is_err());
        assert_eq!(puzzle.moves(), 0);
        assert_eq!(puzzle.advance(Duration::from_secs(1)), Phase::Playing);
    }

    #[test_log::test]
    fn editor_suspends_play() {
        let table = table();
        let mut puzzle = Puzzle::new(table.clone(), layout(&table), settings());

        let _editor = puzzle.enter_editor().unwrap();
        assert_eq!(puzzle.phase(), Phase::Editor);
        assert!(matches!(puzzle.click(Position::END), Err(PuzzleError::WrongPhase(Phase::Editor))));
        assert!(matches!(puzzle.drive(), Err(PuzzleError::WrongPhase(Phase::Editor))));
        assert!(puzzle.enter_editor().is_err());

        puzzle.cancel_editor().unwrap();
        assert_eq!(puzzle.phase(), Phase::Playing);
        assert!(puzzle.drive().unwrap());
    }

    #[test_log::test]
    fn committed_edits_change_verdict() {
        let table = table();
        let mut puzzle = Puzzle::new(table.clone(), layout(&table), settings());

        let mut editor = puzzle.enter_editor().unwrap();
        editor.forbid("vertical", Side::Bottom, "vertical", true).unwrap();
        puzzle.commit_editor(editor).unwrap();

        assert_eq!(puzzle.phase(), Phase::Playing);
        assert!(!puzzle.drive().unwrap());
        // the table the puzzle started from is untouched
        assert!(PathValidator::new(&table).validate(&layout(&table), Position::START, Position::END).unwrap());
    }

    #[test_log::test]
    fn rejected_edits_stay_in_editor() {
        let table = table();
        let mut puzzle = Puzzle::new(table.clone(), layout(&table), settings());

        let mut editor = puzzle.enter_editor().unwrap();
        editor.set_start_tiles(Vec::<String>::new()).unwrap();
        assert!(matches!(puzzle.commit_editor(editor), Err(PuzzleError::EmptyAllowList("start"))));
        assert_eq!(puzzle.phase(), Phase::Editor);
        assert_eq!(puzzle.table().to_spec(), table.to_spec());
    }

    #[test]
    fn settings_default_when_missing() {
        let bundled = PuzzleConfig::bundled().unwrap();
        let json = format!(
            r#"{{ "table": {}, "layout": {} }}"#,
            serde_json::to_string(&bundled.table).unwrap(),
            serde_json::to_string(&bundled.layout).unwrap(),
        );

        let config = PuzzleConfig::from_json(&json).unwrap();
        assert_eq!(config.settings, Settings::default());
        assert_eq!(config.settings.start, Position::START);
        assert_eq!(config.settings.end, Position::END);
    }

    #[test]
    fn unshuffled_puzzle_keeps_layout() {
        let mut config = PuzzleConfig::bundled().unwrap();
        config.settings.shuffle_on_start = false;
        let expected = config.layout.clone();

        let puzzle = config.into_puzzle().unwrap();
        assert_eq!(puzzle.board().snapshot(puzzle.table()).unwrap(), expected);
        assert_eq!(puzzle.phase(), Phase::Playing);
    }
}
