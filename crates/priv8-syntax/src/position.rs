//! One-based line and column numbers for reports.

use tree_sitter::Point;

/// Returns `(line, column)` for a zero-based Tree-sitter point, both counted
/// from one. Values past `u32::MAX` clamp to it.
pub(crate) fn point_to_one_based(point: Point) -> (u32, u32) {
    (one_based(point.row), one_based(point.column))
}

fn one_based(zero_based: usize) -> u32 {
    u32::try_from(zero_based).map_or(u32::MAX, |value| value.saturating_add(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, 0, (1, 1))]
    #[case(4, 12, (5, 13))]
    #[case(usize::MAX, 0, (u32::MAX, 1))]
    #[case(0, u32::MAX as usize, (1, u32::MAX))]
    fn converts_zero_based_points(
        #[case] row: usize,
        #[case] column: usize,
        #[case] expected: (u32, u32),
    ) {
        let point = Point { row, column };
        assert_eq!(point_to_one_based(point), expected);
    }
}
