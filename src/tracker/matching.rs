//! Nearest-neighbour association between tracked hands and new detections.

use ndarray::Array2;

use crate::geometry::{Point, distance};

/// Compute the centre distance matrix between tracks (rows) and detections (columns).
pub fn distance_matrix(track_positions: &[Point], det_positions: &[Point]) -> Array2<f32> {
    let mut dists = Array2::zeros((track_positions.len(), det_positions.len()));
    for (i, t) in track_positions.iter().enumerate() {
        for (j, d) in det_positions.iter().enumerate() {
            dists[[i, j]] = distance(t, d);
        }
    }
    dists
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentResult {
    /// (track row, detection column) pairs
    pub matches: Vec<(usize, usize)>,
    pub unmatched_tracks: Vec<usize>,
    pub unmatched_detections: Vec<usize>,
}

/// Greedy nearest-neighbour assignment.
///
/// Each detection picks its closest track; the pick only counts when the
/// distance is strictly below `radius`. A track claimed by several detections
/// keeps the closest one and the others stay unmatched, so they become new
/// tracks rather than falling back to their second-best candidate. Ties go to
/// the lower index on both axes.
pub fn nearest_neighbor_assignment(cost_matrix: &Array2<f32>, radius: f32) -> AssignmentResult {
    let (num_rows, num_cols) = cost_matrix.dim();

    // Best (row, cost) per detection column.
    let mut claims: Vec<Option<(usize, f32)>> = vec![None; num_cols];
    for (j, claim) in claims.iter_mut().enumerate() {
        for i in 0..num_rows {
            let cost = cost_matrix[[i, j]];
            if !cost.is_finite() {
                continue;
            }
            let closer = match claim {
                Some((_, best)) => cost < *best,
                None => true,
            };
            if closer {
                *claim = Some((i, cost));
            }
        }
        if matches!(claim, Some((_, cost)) if *cost >= radius) {
            *claim = None;
        }
    }

    // Winning detection per track row.
    let mut winners: Vec<Option<(usize, f32)>> = vec![None; num_rows];
    for (j, claim) in claims.iter().enumerate() {
        if let Some((i, cost)) = *claim {
            let closer = match winners[i] {
                Some((_, best)) => cost < best,
                None => true,
            };
            if closer {
                winners[i] = Some((j, cost));
            }
        }
    }

    let mut matches = Vec::new();
    let mut unmatched_tracks = Vec::new();
    let mut matched_cols = vec![false; num_cols];
    for (i, winner) in winners.iter().enumerate() {
        match winner {
            Some((j, _)) => {
                matches.push((i, *j));
                matched_cols[*j] = true;
            }
            None => unmatched_tracks.push(i),
        }
    }

    let unmatched_detections = matched_cols
        .iter()
        .enumerate()
        .filter_map(|(j, &m)| if m { None } else { Some(j) })
        .collect();

    AssignmentResult {
        matches,
        unmatched_tracks,
        unmatched_detections,
    }
}
