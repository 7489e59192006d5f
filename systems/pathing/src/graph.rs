//! Adjacency graph over the traversable tiles of one generation attempt.

use std::collections::{HashSet, VecDeque};

use rand::{seq::SliceRandom, Rng};
use tower_defence_core::{Tile, TileGrid};

const DIRECTIONS: [(i64, i64); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// Dense adjacency lists indexed by tile, rebuilt for every attempt.
///
/// Edges connect orthogonal neighbours that both lie in interior rows and are
/// both unblocked. Each tile's neighbour order is shuffled on construction so
/// that breadth-first search breaks ties differently between attempts.
#[derive(Clone, Debug)]
pub(crate) struct PathGraph {
    columns: u32,
    rows: u32,
    adjacency: Vec<Vec<Tile>>,
}

impl PathGraph {
    pub(crate) fn build<R>(grid: &TileGrid, blocked: &HashSet<Tile>, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let columns = grid.columns().get();
        let rows = grid.rows().get();
        let count = usize::try_from(u64::from(columns) * u64::from(rows)).unwrap_or(0);
        let mut graph = Self {
            columns,
            rows,
            adjacency: vec![Vec::new(); count],
        };

        let mut directions = DIRECTIONS;
        for column in 0..columns {
            for row in 1..rows.saturating_sub(1) {
                let tile = Tile::new(column, row);
                if blocked.contains(&tile) {
                    continue;
                }

                directions.shuffle(rng);
                let neighbors: Vec<Tile> = directions
                    .iter()
                    .filter_map(|&(dx, dy)| offset(tile, dx, dy))
                    .filter(|neighbor| {
                        neighbor.column() < columns
                            && grid.is_interior_row(neighbor.row())
                            && !blocked.contains(neighbor)
                    })
                    .collect();

                if let Some(index) = graph.index(tile) {
                    graph.adjacency[index] = neighbors;
                }
            }
        }

        graph
    }

    pub(crate) fn neighbors(&self, tile: Tile) -> &[Tile] {
        match self.index(tile) {
            Some(index) => &self.adjacency[index],
            None => &[],
        }
    }

    /// One shortest path from `start` to `goal`, both inclusive.
    pub(crate) fn shortest_path(&self, start: Tile, goal: Tile) -> Option<Vec<Tile>> {
        let start_index = self.index(start)?;
        let goal_index = self.index(goal)?;

        let mut parents: Vec<Option<usize>> = vec![None; self.adjacency.len()];
        let mut visited = vec![false; self.adjacency.len()];
        let mut queue = VecDeque::new();
        visited[start_index] = true;
        queue.push_back(start);

        while let Some(current) = queue.pop_front() {
            if current == goal {
                break;
            }
            let Some(current_index) = self.index(current) else {
                continue;
            };
            for &next in self.neighbors(current) {
                let Some(next_index) = self.index(next) else {
                    continue;
                };
                if visited[next_index] {
                    continue;
                }
                visited[next_index] = true;
                parents[next_index] = Some(current_index);
                queue.push_back(next);
            }
        }

        if !visited[goal_index] {
            return None;
        }

        let mut path = vec![goal];
        let mut cursor = goal_index;
        while let Some(parent) = parents[cursor] {
            path.push(self.tile(parent));
            cursor = parent;
        }
        path.reverse();
        Some(path)
    }

    fn index(&self, tile: Tile) -> Option<usize> {
        if tile.column() >= self.columns || tile.row() >= self.rows {
            return None;
        }
        let row = usize::try_from(tile.row()).ok()?;
        let column = usize::try_from(tile.column()).ok()?;
        let width = usize::try_from(self.columns).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }

    fn tile(&self, index: usize) -> Tile {
        let width = usize::try_from(self.columns).unwrap_or(1).max(1);
        let column = u32::try_from(index % width).unwrap_or(u32::MAX);
        let row = u32::try_from(index / width).unwrap_or(u32::MAX);
        Tile::new(column, row)
    }
}

fn offset(tile: Tile, dx: i64, dy: i64) -> Option<Tile> {
    let column = u32::try_from(i64::from(tile.column()) + dx).ok()?;
    let row = u32::try_from(i64::from(tile.row()) + dy).ok()?;
    Some(Tile::new(column, row))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use tower_defence_core::TileCoord;

    fn grid() -> TileGrid {
        TileGrid::new(TileCoord::new(6), TileCoord::new(5), 10)
    }

    #[test]
    fn border_rows_and_blocked_tiles_have_no_edges() {
        let blocked: HashSet<Tile> = [Tile::new(2, 2)].into_iter().collect();
        let graph = PathGraph::build(&grid(), &blocked, &mut ChaCha8Rng::seed_from_u64(1));

        assert!(graph.neighbors(Tile::new(0, 0)).is_empty());
        assert!(graph.neighbors(Tile::new(0, 4)).is_empty());
        assert!(graph.neighbors(Tile::new(2, 2)).is_empty());

        let mut around: Vec<Tile> = graph.neighbors(Tile::new(2, 1)).to_vec();
        around.sort();
        assert_eq!(around, vec![Tile::new(1, 1), Tile::new(3, 1)]);
    }

    #[test]
    fn shortest_path_routes_around_obstacles() {
        let blocked: HashSet<Tile> = [Tile::new(1, 1), Tile::new(1, 2)].into_iter().collect();
        let graph = PathGraph::build(&grid(), &blocked, &mut ChaCha8Rng::seed_from_u64(7));

        let path = graph
            .shortest_path(Tile::new(0, 1), Tile::new(2, 1))
            .expect("path exists");

        assert_eq!(path.first(), Some(&Tile::new(0, 1)));
        assert_eq!(path.last(), Some(&Tile::new(2, 1)));
        assert_eq!(path.len(), 7);
        assert!(path.windows(2).all(|pair| pair[0].is_orthogonal_neighbor(pair[1])));
        assert!(path.iter().all(|tile| !blocked.contains(tile)));
    }

    #[test]
    fn shortest_path_to_self_is_single_tile() {
        let graph = PathGraph::build(&grid(), &HashSet::new(), &mut ChaCha8Rng::seed_from_u64(3));
        assert_eq!(
            graph.shortest_path(Tile::new(3, 2), Tile::new(3, 2)),
            Some(vec![Tile::new(3, 2)])
        );
    }

    #[test]
    fn walled_off_goal_is_unreachable() {
        let blocked: HashSet<Tile> = (1..4).map(|row| Tile::new(3, row)).collect();
        let graph = PathGraph::build(&grid(), &blocked, &mut ChaCha8Rng::seed_from_u64(9));
        assert_eq!(graph.shortest_path(Tile::new(0, 1), Tile::new(5, 3)), None);
    }
}
