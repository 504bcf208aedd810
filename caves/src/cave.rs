use crate::error::{CaveError, Result};
use crate::find::{MapTrait, NodeReference};
use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Identity of a cavern, assigned 1..=n in construction order
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CavernId(pub usize);

impl NodeReference for CavernId {}

impl Display for CavernId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for Position {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// A positioned vertex together with the caverns it links to
#[derive(Clone, Debug, Serialize)]
pub struct Cavern {
    pub id: CavernId,
    pub position: Position,
    paths: Vec<CavernId>,
}

impl Cavern {
    pub fn paths(&self) -> &[CavernId] {
        &self.paths
    }
}

// caverns are the same when their ids are, regardless of where they are
impl PartialEq for Cavern {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Cavern {}

/// A directed graph of caverns, immutable once built
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "CaveData")]
pub struct Cave {
    caverns: Vec<Cavern>,
}

#[derive(Deserialize)]
struct CavernData {
    id: CavernId,
    position: Position,
    paths: Vec<CavernId>,
}

#[derive(Deserialize)]
struct CaveData {
    caverns: Vec<CavernData>,
}

// deserialized caves go through the same checks as built ones
impl TryFrom<CaveData> for Cave {
    type Error = CaveError;

    fn try_from(data: CaveData) -> Result<Self> {
        let mut positions = Vec::with_capacity(data.caverns.len());
        let mut edges = Vec::new();

        for (index, cavern) in data.caverns.into_iter().enumerate() {
            if cavern.id != CavernId(index + 1) {
                return Err(CaveError::UnknownCavern(cavern.id));
            }
            positions.push(cavern.position);
            edges.extend(cavern.paths.into_iter().map(|to| (cavern.id, to)));
        }

        Self::from_edges(positions, &edges)
    }
}

impl Cave {
    /// Build a cave from a flattened adjacency matrix. Entry `k` describes the edge from
    /// cavern index `k % n` to cavern index `k / n`.
    pub fn from_matrix(positions: Vec<Position>, matrix: &[bool]) -> Result<Self> {
        let mut cave = Self::with_positions(positions)?;
        let n = cave.caverns.len();

        if matrix.len() != n * n {
            return Err(CaveError::MatrixSize {
                caverns: n,
                expected: n * n,
                found: matrix.len(),
            });
        }

        for (k, _) in matrix.iter().enumerate().filter(|(_, linked)| **linked) {
            let to = cave.caverns[k / n].id;
            cave.caverns[k % n].paths.push(to);
        }

        Ok(cave)
    }

    /// Build a cave from explicit `(from, to)` edges, kept in the order given
    pub fn from_edges(positions: Vec<Position>, edges: &[(CavernId, CavernId)]) -> Result<Self> {
        let mut cave = Self::with_positions(positions)?;

        for &(from, to) in edges {
            cave.cavern(to)?;
            let index = cave.index_of(from)?;
            cave.caverns[index].paths.push(to);
        }

        Ok(cave)
    }

    fn with_positions(positions: Vec<Position>) -> Result<Self> {
        if positions.is_empty() {
            return Err(CaveError::EmptyCave);
        }

        let caverns = positions
            .into_iter()
            .enumerate()
            .map(|(index, position)| Cavern {
                id: CavernId(index + 1),
                position,
                paths: Vec::new(),
            })
            .collect();

        Ok(Self { caverns })
    }

    fn index_of(&self, id: CavernId) -> Result<usize> {
        if id.0 >= 1 && id.0 <= self.caverns.len() {
            Ok(id.0 - 1)
        } else {
            Err(CaveError::UnknownCavern(id))
        }
    }

    pub fn cavern(&self, id: CavernId) -> Result<&Cavern> {
        self.index_of(id).map(|index| &self.caverns[index])
    }

    pub fn caverns(&self) -> &[Cavern] {
        &self.caverns
    }

    pub fn len(&self) -> usize {
        self.caverns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.caverns.is_empty()
    }

    /// The conventional start of a search
    pub fn first(&self) -> CavernId {
        self.caverns[0].id
    }

    /// The conventional goal of a search
    pub fn last(&self) -> CavernId {
        self.caverns[self.caverns.len() - 1].id
    }

    /// All edges as `(from, to)` pairs, grouped by source cavern
    pub fn edges(&self) -> impl Iterator<Item = (CavernId, CavernId)> + '_ {
        self.caverns
            .iter()
            .flat_map(|c| c.paths.iter().map(move |to| (c.id, *to)))
    }

    pub fn has_edge(&self, from: CavernId, to: CavernId) -> bool {
        self.cavern(from)
            .map(|c| c.paths.contains(&to))
            .unwrap_or(false)
    }
}

impl MapTrait for Cave {
    type Reference = CavernId;

    fn is_valid(&self, node: Self::Reference) -> bool {
        self.index_of(node).is_ok()
    }

    fn position_of(&self, node: Self::Reference) -> Position {
        self.caverns[node.0 - 1].position
    }

    fn neighbors_of(&self, node: Self::Reference) -> impl Iterator<Item = Self::Reference> {
        self.caverns[node.0 - 1].paths.iter().copied()
    }
}
