use std::sync::Arc;

use geo::Point;

const CHUNK_LEN: usize = 128;

/// Append-only list of positions that is cheap to clone.
///
/// Full chunks are frozen behind `Arc`s and shared by every clone, so a
/// snapshot copies at most one chunk's worth of points however long the
/// path gets.
#[derive(Clone, Debug, Default)]
pub struct RecordedPath {
    sealed: Arc<Vec<Arc<[Point]>>>,
    tail: Vec<Point>,
}

impl RecordedPath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, position: Point) {
        self.tail.push(position);
        if self.tail.len() == CHUNK_LEN {
            let chunk: Arc<[Point]> = std::mem::take(&mut self.tail).into();
            Arc::make_mut(&mut self.sealed).push(chunk);
        }
    }

    pub fn len(&self) -> usize {
        self.sealed.len() * CHUNK_LEN + self.tail.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = &Point> + '_ {
        self.sealed
            .iter()
            .flat_map(|chunk| chunk.iter())
            .chain(self.tail.iter())
    }

    pub fn last(&self) -> Option<Point> {
        self.tail
            .last()
            .or_else(|| self.sealed.last().and_then(|chunk| chunk.last()))
            .copied()
    }

    pub fn to_vec(&self) -> Vec<Point> {
        let mut points = Vec::with_capacity(self.len());
        points.extend(self.iter().copied());
        points
    }
}

impl PartialEq for RecordedPath {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}
