//! Maximum-cardinality, maximum-weight bipartite assignment
//!
//! Hungarian algorithm (shortest augmenting paths with row/column potentials)
//! on a square matrix padded with zero-valued dummy cells. Ineligible cells
//! get the same value as a dummy cell, i.e. "leave unassigned", so they act
//! as a hard constraint without entering the arithmetic as a huge penalty.
//! Every eligible cell carries a uniform bonus larger than any possible score
//! difference, so the solver first pairs as many rows as it can and only then
//! maximizes the total score.

use crate::core::error::MatchError;
use crate::core::scoring::is_ineligible_score;

/// Largest score magnitude the solver accepts
///
/// Keeps the eligibility bonus and potentials well inside `f64` precision
/// for pool sizes in the thousands.
pub const MAX_ABS_SCORE: f64 = 1e6;

/// Solve the assignment problem for a rows × columns score matrix
///
/// Returns one entry per row: the assigned column, or `None`. Among all
/// one-to-one partial assignments that avoid ineligible cells, the result
/// pairs the largest possible number of rows and, among those, has the
/// highest total score. Zero and negative scores are disfavored but still
/// assigned when that is the only way to pair a row.
///
/// Fails fast on ragged rows, NaN or `+inf` cells, and cells whose magnitude
/// exceeds [`MAX_ABS_SCORE`].
pub fn solve_assignment(matrix: &[Vec<f64>]) -> Result<Vec<Option<usize>>, MatchError> {
    let rows = matrix.len();
    let cols = validate_matrix(matrix)?;

    if rows == 0 {
        return Ok(Vec::new());
    }
    if cols == 0 {
        return Ok(vec![None; rows]);
    }

    let Some((min_score, max_score)) = eligible_range(matrix) else {
        return Ok(vec![None; rows]);
    };

    // One more pair must outweigh any spread of scores across the others
    let span = max_score - min_score;
    let bonus = span * rows.min(cols) as f64 + 1.0;

    let size = rows.max(cols);
    let value = |row: usize, col: usize| -> f64 {
        if row >= rows || col >= cols {
            return 0.0;
        }
        let score = matrix[row][col];
        if is_ineligible_score(score) {
            0.0
        } else {
            bonus + (score - min_score)
        }
    };

    let column_owner = hungarian_min_cost(size, |row, col| -value(row, col))?;

    let mut assignment = vec![None; rows];
    for (col, &row) in column_owner.iter().enumerate() {
        if row >= rows || col >= cols || is_ineligible_score(matrix[row][col]) {
            continue;
        }
        assignment[row] = Some(col);
    }

    verify_assignment(&assignment, cols)?;
    Ok(assignment)
}

/// Smallest and largest eligible score, or `None` if every cell is ineligible
fn eligible_range(matrix: &[Vec<f64>]) -> Option<(f64, f64)> {
    matrix
        .iter()
        .flatten()
        .copied()
        .filter(|score| !is_ineligible_score(*score))
        .fold(None, |range, score| match range {
            None => Some((score, score)),
            Some((lo, hi)) => Some((lo.min(score), hi.max(score))),
        })
}

/// Sum of the scores selected by an assignment
///
/// Ineligible cells contribute nothing; callers that need to detect them
/// should check [`is_ineligible_score`] themselves.
pub fn assignment_total(matrix: &[Vec<f64>], assignment: &[Option<usize>]) -> f64 {
    assignment
        .iter()
        .enumerate()
        .filter_map(|(row, col)| col.map(|col| matrix[row][col]))
        .filter(|score| !is_ineligible_score(*score))
        .sum()
}

/// Check shape and cell values; returns the column count
fn validate_matrix(matrix: &[Vec<f64>]) -> Result<usize, MatchError> {
    let cols = matrix.first().map_or(0, Vec::len);

    for (row, values) in matrix.iter().enumerate() {
        if values.len() != cols {
            return Err(MatchError::RaggedMatrix {
                row,
                expected: cols,
                found: values.len(),
            });
        }
        for (col, &score) in values.iter().enumerate() {
            let out_of_range = score > MAX_ABS_SCORE || (score < -MAX_ABS_SCORE && !is_ineligible_score(score));
            if score.is_nan() || out_of_range {
                return Err(MatchError::InvalidScore { row, col });
            }
        }
    }

    Ok(cols)
}

/// Minimum-cost perfect assignment on a size × size matrix
///
/// Returns, for each column, the row assigned to it. O(size³).
fn hungarian_min_cost<F>(size: usize, cost: F) -> Result<Vec<usize>, MatchError>
where
    F: Fn(usize, usize) -> f64,
{
    // 1-based internally; index 0 is the virtual source column/row
    let mut u = vec![0.0_f64; size + 1];
    let mut v = vec![0.0_f64; size + 1];
    let mut owner = vec![0_usize; size + 1];
    let mut way = vec![0_usize; size + 1];

    for row in 1..=size {
        owner[0] = row;
        let mut col0 = 0;
        let mut min_slack = vec![f64::INFINITY; size + 1];
        let mut used = vec![false; size + 1];

        loop {
            used[col0] = true;
            let row0 = owner[col0];
            let mut delta = f64::INFINITY;
            let mut col1 = 0;

            for col in 1..=size {
                if used[col] {
                    continue;
                }
                let reduced = cost(row0 - 1, col - 1) - u[row0] - v[col];
                if reduced < min_slack[col] {
                    min_slack[col] = reduced;
                    way[col] = col0;
                }
                if min_slack[col] < delta {
                    delta = min_slack[col];
                    col1 = col;
                }
            }

            if col1 == 0 || !delta.is_finite() {
                return Err(MatchError::Solver(format!(
                    "no augmenting path found for row {}",
                    row - 1
                )));
            }

            for col in 0..=size {
                if used[col] {
                    u[owner[col]] += delta;
                    v[col] -= delta;
                } else {
                    min_slack[col] -= delta;
                }
            }

            col0 = col1;
            if owner[col0] == 0 {
                break;
            }
        }

        // Flip the augmenting path
        loop {
            let col1 = way[col0];
            owner[col0] = owner[col1];
            col0 = col1;
            if col0 == 0 {
                break;
            }
        }
    }

    Ok(owner[1..].iter().map(|&row| row.wrapping_sub(1)).collect())
}

/// Reject anything that is not a one-to-one assignment into `0..cols`
fn verify_assignment(assignment: &[Option<usize>], cols: usize) -> Result<(), MatchError> {
    let mut taken = vec![false; cols];
    for (row, col) in assignment.iter().enumerate() {
        let Some(col) = *col else { continue };
        if col >= cols || taken[col] {
            return Err(MatchError::Solver(format!(
                "row {} received invalid or duplicate column {}",
                row, col
            )));
        }
        taken[col] = true;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::scoring::INELIGIBLE_SCORE;

    const X: f64 = f64::NEG_INFINITY;

    /// Best (pair count, total) over every partial one-to-one assignment
    /// avoiding sentinels, compared lexicographically
    fn brute_force_best(matrix: &[Vec<f64>]) -> (usize, f64) {
        fn better(a: (usize, f64), b: (usize, f64)) -> (usize, f64) {
            if a.0 != b.0 {
                return if a.0 > b.0 { a } else { b };
            }
            if a.1 >= b.1 { a } else { b }
        }

        fn walk(matrix: &[Vec<f64>], row: usize, used: &mut Vec<bool>) -> (usize, f64) {
            if row == matrix.len() {
                return (0, 0.0);
            }
            // Leave this row unassigned
            let mut best = walk(matrix, row + 1, used);
            for col in 0..used.len() {
                let score = matrix[row][col];
                if used[col] || is_ineligible_score(score) {
                    continue;
                }
                used[col] = true;
                let (count, total) = walk(matrix, row + 1, used);
                best = better(best, (count + 1, total + score));
                used[col] = false;
            }
            best
        }

        let cols = matrix.first().map_or(0, Vec::len);
        walk(matrix, 0, &mut vec![false; cols])
    }

    /// Small deterministic generator so the grid is reproducible
    struct Lcg(u64);

    impl Lcg {
        fn next(&mut self) -> u64 {
            self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            self.0 >> 33
        }
    }

    fn random_matrix(rng: &mut Lcg, rows: usize, cols: usize) -> Vec<Vec<f64>> {
        (0..rows)
            .map(|_| {
                (0..cols)
                    .map(|_| match rng.next() % 10 {
                        0 | 1 => INELIGIBLE_SCORE,
                        2 => -((rng.next() % 50) as f64) / 10.0,
                        _ => (rng.next() % 100) as f64 / 10.0,
                    })
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_sentinel_diagonal() {
        let matrix = vec![vec![5.0, X], vec![X, 5.0]];
        assert_eq!(solve_assignment(&matrix).unwrap(), vec![Some(0), Some(1)]);

        let matrix = vec![vec![5.0, INELIGIBLE_SCORE], vec![INELIGIBLE_SCORE, 5.0]];
        assert_eq!(solve_assignment(&matrix).unwrap(), vec![Some(0), Some(1)]);
    }

    #[test]
    fn test_prefers_higher_total() {
        let matrix = vec![vec![4.0, 3.0], vec![3.0, 1.0]];
        // 3 + 3 beats 4 + 1
        assert_eq!(solve_assignment(&matrix).unwrap(), vec![Some(1), Some(0)]);
    }

    #[test]
    fn test_sentinel_never_selected_even_if_smaller() {
        let matrix = vec![vec![1.0, X], vec![2.0, X]];
        let result = solve_assignment(&matrix).unwrap();

        assert_eq!(result, vec![None, Some(0)]);
    }

    #[test]
    fn test_all_ineligible() {
        let matrix = vec![vec![X, INELIGIBLE_SCORE], vec![X, X]];
        assert_eq!(solve_assignment(&matrix).unwrap(), vec![None, None]);
    }

    #[test]
    fn test_rectangular_more_rows() {
        let matrix = vec![vec![1.0], vec![3.0], vec![2.0]];
        assert_eq!(solve_assignment(&matrix).unwrap(), vec![None, Some(0), None]);
    }

    #[test]
    fn test_rectangular_more_columns() {
        let matrix = vec![vec![1.0, 9.0, 2.0], vec![8.0, 9.5, X]];
        assert_eq!(solve_assignment(&matrix).unwrap(), vec![Some(1), Some(0)]);
    }

    #[test]
    fn test_negative_scores_are_still_assigned() {
        let matrix = vec![vec![-1.0, -2.0], vec![-3.0, 4.0]];
        let result = solve_assignment(&matrix).unwrap();

        // Both rows paired; -1 + 4 beats -2 + -3
        assert_eq!(result, vec![Some(0), Some(1)]);
        assert_eq!(assignment_total(&matrix, &result), 3.0);

        assert_eq!(solve_assignment(&[vec![-1.0]]).unwrap(), vec![Some(0)]);

        let matrix = vec![vec![-1.0, X], vec![X, -2.0]];
        assert_eq!(solve_assignment(&matrix).unwrap(), vec![Some(0), Some(1)]);
    }

    #[test]
    fn test_zero_scores_are_assigned() {
        assert_eq!(solve_assignment(&[vec![X, 0.0]]).unwrap(), vec![Some(1)]);
        assert_eq!(solve_assignment(&[vec![INELIGIBLE_SCORE, 0.0]]).unwrap(), vec![Some(1)]);

        let matrix = vec![vec![0.0, 0.0], vec![0.0, 0.0], vec![0.0, 0.0]];
        let result = solve_assignment(&matrix).unwrap();
        assert_eq!(result.iter().flatten().count(), 2);
    }

    #[test]
    fn test_more_pairs_beat_higher_total() {
        // Taking the 10 alone would strand row 1
        let matrix = vec![vec![10.0, 1.0], vec![0.5, X]];
        assert_eq!(solve_assignment(&matrix).unwrap(), vec![Some(1), Some(0)]);
    }

    #[test]
    fn test_empty_matrices() {
        assert_eq!(solve_assignment(&[]).unwrap(), Vec::<Option<usize>>::new());
        assert_eq!(solve_assignment(&[vec![], vec![]]).unwrap(), vec![None, None]);
    }

    #[test]
    fn test_ragged_matrix_fails_fast() {
        let matrix = vec![vec![1.0, 2.0], vec![3.0]];
        assert_eq!(
            solve_assignment(&matrix),
            Err(MatchError::RaggedMatrix { row: 1, expected: 2, found: 1 })
        );
    }

    #[test]
    fn test_invalid_cells_fail_fast() {
        assert_eq!(
            solve_assignment(&[vec![1.0, f64::NAN]]),
            Err(MatchError::InvalidScore { row: 0, col: 1 })
        );
        assert_eq!(
            solve_assignment(&[vec![f64::INFINITY]]),
            Err(MatchError::InvalidScore { row: 0, col: 0 })
        );
        assert_eq!(
            solve_assignment(&[vec![0.0, -2.0 * MAX_ABS_SCORE]]),
            Err(MatchError::InvalidScore { row: 0, col: 1 })
        );
    }

    #[test]
    fn test_deterministic() {
        let matrix = vec![vec![1.0; 4]; 4];
        let first = solve_assignment(&matrix).unwrap();
        for _ in 0..5 {
            assert_eq!(solve_assignment(&matrix).unwrap(), first);
        }
    }

    #[test]
    fn test_matches_brute_force() {
        let mut rng = Lcg(42);

        for rows in 1..=5 {
            for cols in 1..=5 {
                for _ in 0..8 {
                    let matrix = random_matrix(&mut rng, rows, cols);
                    let result = solve_assignment(&matrix).unwrap();

                    assert_eq!(result.len(), rows);
                    let mut seen = vec![false; cols];
                    for col in result.iter().flatten() {
                        assert!(*col < cols);
                        assert!(!seen[*col], "column {} assigned twice", col);
                        seen[*col] = true;
                    }
                    for (row, col) in result.iter().enumerate() {
                        if let Some(col) = col {
                            assert!(!is_ineligible_score(matrix[row][*col]));
                        }
                    }

                    let count = result.iter().flatten().count();
                    let total = assignment_total(&matrix, &result);
                    let (best_count, best_total) = brute_force_best(&matrix);
                    assert_eq!(count, best_count, "pair count differs for {:?}", matrix);
                    assert!(
                        (total - best_total).abs() < 1e-9,
                        "solver total {} != best {} for {:?}",
                        total,
                        best_total,
                        matrix
                    );
                }
            }
        }
    }
}
