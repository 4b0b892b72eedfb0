//! Bounded cursor over an exam's questions.

/// Tracks the question currently on screen.
///
/// Every move is bounds-checked; an out-of-range request leaves the cursor
/// where it was and reports `false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Navigator {
    current: usize,
    question_count: usize,
}

impl Navigator {
    /// Creates a cursor on the first of `question_count` questions.
    #[must_use]
    pub fn new(question_count: usize) -> Self {
        Self {
            current: 0,
            question_count,
        }
    }

    #[must_use]
    pub fn current(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.question_count
    }

    #[must_use]
    pub fn is_first(&self) -> bool {
        self.current == 0
    }

    #[must_use]
    pub fn is_last(&self) -> bool {
        self.current + 1 >= self.question_count
    }

    /// Moves to `index` if it names a question.
    pub fn jump(&mut self, index: usize) -> bool {
        if index >= self.question_count {
            return false;
        }
        self.current = index;
        true
    }

    /// Moves one question forward. No wraparound.
    pub fn advance(&mut self) -> bool {
        if self.is_last() {
            return false;
        }
        self.current += 1;
        true
    }

    /// Moves one question back. No wraparound.
    pub fn retreat(&mut self) -> bool {
        if self.is_first() {
            return false;
        }
        self.current -= 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn starts_on_first_question() {
        let nav = Navigator::new(3);
        assert_eq!(nav.current(), 0);
        assert!(nav.is_first());
        assert!(!nav.is_last());
    }

    #[test]
    fn advance_stops_at_last_question() {
        let mut nav = Navigator::new(2);
        assert!(nav.advance());
        assert_eq!(nav.current(), 1);
        assert!(!nav.advance());
        assert_eq!(nav.current(), 1);
    }

    #[test]
    fn retreat_stops_at_first_question() {
        let mut nav = Navigator::new(2);
        assert!(!nav.retreat());
        nav.jump(1);
        assert!(nav.retreat());
        assert_eq!(nav.current(), 0);
    }

    #[test]
    fn jump_to_last_valid_index() {
        let mut nav = Navigator::new(5);
        assert!(nav.jump(4));
        assert!(nav.is_last());
    }

    #[test]
    fn empty_navigator_never_moves() {
        let mut nav = Navigator::new(0);
        assert!(!nav.jump(0));
        assert!(!nav.advance());
        assert!(!nav.retreat());
        assert_eq!(nav.current(), 0);
    }

    proptest! {
        #[test]
        fn out_of_range_jump_keeps_position(
            count in 1usize..50,
            start in 0usize..50,
            offset in 0usize..1000,
        ) {
            let mut nav = Navigator::new(count);
            nav.jump(start % count);
            let before = nav.current();

            prop_assert!(!nav.jump(count + offset));
            prop_assert_eq!(nav.current(), before);
        }

        #[test]
        fn cursor_stays_in_bounds(count in 1usize..20, moves in prop::collection::vec(0u8..3, 0..64)) {
            let mut nav = Navigator::new(count);
            for m in moves {
                match m {
                    0 => { nav.advance(); }
                    1 => { nav.retreat(); }
                    _ => { nav.jump(count / 2); }
                }
                prop_assert!(nav.current() < count);
            }
        }
    }
}
