//! Stepwise N-Queens backtracking search.
//!
//! The engine owns the board and the search cursor and advances by exactly
//! one unit of work per [`Engine::step`] call, so an external render loop can
//! animate the search instead of running it to completion. The driver decides
//! pacing; the engine only guarantees what a single step does and how it
//! counts.

use log::{debug, info};

/// Where a search run currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchState {
    /// Fresh board, no step taken yet.
    #[default]
    Idle,
    /// At least one step taken, outcome still open.
    Running,
    /// Every row holds a queen.
    Solved,
    /// Row 0 exhausted with no safe column.
    Failed,
    /// Halted by the driver; resumable.
    Stopped,
}

/// What a single [`Engine::step`] call did, with the square it touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepAction {
    /// Queen placed at (row, col); the cursor moved down one row.
    Placed { row: usize, col: usize },
    /// Queen removed from (row, col); that row's scan resumes right of col.
    Backtracked { row: usize, col: usize },
    /// All rows are filled.
    Solved,
    /// No solution from this state.
    Failed,
    /// Call ignored because the run already ended.
    Terminal,
}

/// Read-only view of the observable state after a step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub row: usize,
    pub positions: Vec<Option<usize>>,
    pub steps: u64,
    pub state: SearchState,
}

/// Board state plus search cursor.
///
/// `positions[r]` is the column of the queen in row `r`, `None` while the row
/// is unplaced. Rows above the cursor always hold a mutually non-attacking
/// placement; rows at or below it are `None` while the search runs.
pub struct Engine {
    pub n: usize,
    pub positions: Vec<Option<usize>>,
    pub row: usize,
    pub resume_col: usize,
    pub steps: u64,
    pub state: SearchState,
}

impl Engine {
    /// Fresh engine for an `n` x `n` board.
    ///
    /// The engine does not validate `n`; callers reject `n < 4` before
    /// constructing one.
    pub fn new(n: usize) -> Self {
        Self {
            n,
            positions: vec![None; n],
            row: 0,
            resume_col: 0,
            steps: 0,
            state: SearchState::Idle,
        }
    }

    /// Discard all progress and start over on an `n` x `n` board.
    pub fn reset(&mut self, n: usize) {
        *self = Self::new(n);
    }

    /// True if a queen at (row, col) attacks no queen in rows `0..row`.
    pub fn is_safe(&self, row: usize, col: usize) -> bool {
        for (r, pos) in self.positions[..row].iter().enumerate() {
            if let Some(c) = *pos {
                if c == col || row.abs_diff(r) == col.abs_diff(c) {
                    return false;
                }
            }
        }
        true
    }

    /// Advance the search by one unit of work.
    ///
    /// Counting policy: the counter goes up once for the call itself, then
    /// once per column probed during the call. Solved and Failed are
    /// terminal; a Stopped engine resumes from its preserved cursor.
    pub fn step(&mut self) -> StepAction {
        if matches!(self.state, SearchState::Solved | SearchState::Failed) {
            return StepAction::Terminal;
        }
        self.state = SearchState::Running;
        self.steps += 1;

        if self.row >= self.n {
            self.state = SearchState::Solved;
            info!("solved n={} in {} steps", self.n, self.steps);
            return StepAction::Solved;
        }

        for col in self.resume_col..self.n {
            self.steps += 1;
            if self.is_safe(self.row, col) {
                let row = self.row;
                self.positions[row] = Some(col);
                self.row += 1;
                self.resume_col = 0;
                debug!("placed queen at ({row}, {col})");
                return StepAction::Placed { row, col };
            }
        }

        if self.row == 0 {
            self.state = SearchState::Failed;
            info!("no solution from this state, n={}, {} steps", self.n, self.steps);
            return StepAction::Failed;
        }
        self.row -= 1;
        let prev = self.positions[self.row].take();
        self.resume_col = prev.map_or(0, |c| c + 1);
        debug!("backtracked to row {}", self.row);
        StepAction::Backtracked {
            row: self.row,
            col: prev.unwrap_or(0),
        }
    }

    /// Halt the run. Terminal outcomes stick; stopping twice is a no-op.
    pub fn stop(&mut self) {
        if !matches!(self.state, SearchState::Solved | SearchState::Failed) {
            self.state = SearchState::Stopped;
        }
    }

    /// The completed placement, once the run is solved.
    pub fn solution(&self) -> Option<Vec<usize>> {
        if self.state != SearchState::Solved {
            return None;
        }
        self.positions.iter().copied().collect()
    }

    /// Observable state for the render loop and for tests.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            row: self.row,
            positions: self.positions.clone(),
            steps: self.steps,
            state: self.state,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solve(n: usize) -> Engine {
        let mut engine = Engine::new(n);
        for _ in 0..500_000 {
            if engine.state == SearchState::Solved {
                return engine;
            }
            engine.step();
        }
        panic!("search for n={n} did not terminate");
    }

    fn attacks(a: (usize, usize), b: (usize, usize)) -> bool {
        a.1 == b.1 || a.0.abs_diff(b.0) == a.1.abs_diff(b.1)
    }

    #[test]
    fn first_solution_for_n4() {
        // Row-major, leftmost-column-first order lands on this one first.
        let engine = solve(4);
        assert_eq!(engine.solution(), Some(vec![1, 3, 0, 2]));
    }

    #[test]
    fn n4_step_count_matches_counting_policy() {
        let mut engine = Engine::new(4);
        let mut calls = 0;
        while engine.state != SearchState::Solved {
            engine.step();
            calls += 1;
        }
        // One increment per call plus one per probed column.
        assert_eq!(calls, 13);
        assert_eq!(engine.steps, 39);
    }

    #[test]
    fn solutions_are_non_attacking_up_to_n12() {
        for n in 4..=12 {
            let engine = solve(n);
            let cols = engine.solution().unwrap();
            for r1 in 0..n {
                for r2 in r1 + 1..n {
                    assert!(
                        !attacks((r1, cols[r1]), (r2, cols[r2])),
                        "n={n}: rows {r1} and {r2} attack each other"
                    );
                }
            }
        }
    }

    #[test]
    fn is_safe_matches_pairwise_predicate() {
        let mut engine = Engine::new(6);
        engine.positions[0] = Some(3);
        engine.positions[1] = Some(0);
        engine.row = 2;
        for row in 2..6 {
            for col in 0..6 {
                let expected = !attacks((row, col), (0, 3)) && !attacks((row, col), (1, 0));
                assert_eq!(engine.is_safe(row, col), expected, "square ({row}, {col})");
            }
        }
    }

    #[test]
    fn counter_is_monotonic_and_resets_only_on_reset() {
        let mut engine = Engine::new(5);
        let mut last = 0;
        for _ in 0..50 {
            engine.step();
            assert!(engine.steps >= last);
            last = engine.steps;
        }
        engine.stop();
        assert_eq!(engine.steps, last);
        engine.reset(5);
        assert_eq!(engine.steps, 0);
        assert_eq!(engine.state, SearchState::Idle);
    }

    #[test]
    fn stop_is_idempotent_and_resumable() {
        let mut engine = Engine::new(8);
        for _ in 0..5 {
            engine.step();
        }
        engine.stop();
        let frozen = engine.snapshot();
        engine.stop();
        assert_eq!(engine.state, SearchState::Stopped);
        assert_eq!(engine.snapshot(), frozen);

        // The next step picks the search back up from the preserved cursor.
        engine.step();
        assert_eq!(engine.state, SearchState::Running);
        assert!(engine.steps > frozen.steps);
    }

    #[test]
    fn terminal_states_ignore_further_steps() {
        let mut engine = solve(4);
        let frozen = engine.snapshot();
        assert_eq!(engine.step(), StepAction::Terminal);
        assert_eq!(engine.snapshot(), frozen);

        // stop() never downgrades a terminal outcome either.
        engine.stop();
        assert_eq!(engine.state, SearchState::Solved);
    }

    #[test]
    fn exhausted_row_backtracks_before_retrying() {
        // Mid-search state: queens at (0,0) and (1,2), about to scan row 2.
        let mut engine = Engine::new(4);
        engine.positions[0] = Some(0);
        engine.positions[1] = Some(2);
        engine.row = 2;
        engine.state = SearchState::Running;

        // Every column of row 2 is attacked (0 and 2 by column, 1 and 3
        // diagonally by the row-1 queen), so this step must retract the
        // row-1 queen and resume its scan right of column 2.
        let action = engine.step();
        assert_eq!(action, StepAction::Backtracked { row: 1, col: 2 });
        assert_eq!(engine.row, 1);
        assert_eq!(engine.resume_col, 3);
        assert_eq!(engine.positions[1], None);
        // One for the call, four for the probed columns.
        assert_eq!(engine.steps, 5);
    }

    #[test]
    fn exhausting_row_zero_fails() {
        let mut engine = Engine::new(4);
        engine.resume_col = 4;
        assert_eq!(engine.step(), StepAction::Failed);
        assert_eq!(engine.state, SearchState::Failed);
        assert_eq!(engine.step(), StepAction::Terminal);
    }

    #[test]
    fn solved_is_reported_on_the_call_after_the_last_placement() {
        let mut engine = Engine::new(4);
        while engine.row < 4 {
            engine.step();
        }
        assert_eq!(engine.state, SearchState::Running);
        assert_eq!(engine.step(), StepAction::Solved);
        assert_eq!(engine.state, SearchState::Solved);
    }
}
