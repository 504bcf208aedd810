//! Random cave generation.
//!
//! The first cavern is placed in the top left third of the area and the last one in the
//! bottom right third, so the conventional start and goal lie far apart. Caverns closer
//! than `radius` to each other are linked at random.

use std::collections::HashSet;

use log::debug;
use rand::Rng;

use crate::cave::{Cave, Position};
use crate::cost::distance;
use crate::error::{CaveError, Result};

#[derive(Clone, Debug, PartialEq)]
pub struct GeneratorOptions {
    /// number of caverns, at least 2
    pub count: usize,
    pub width: i32,
    pub height: i32,
    /// chance in percent that two caverns within range are linked
    pub connectivity: u32,
    /// maximum length of a link
    pub radius: u32,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            count: 100,
            width: 400,
            height: 200,
            connectivity: 50,
            radius: 30,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Region {
    min: Position,
    max: Position,
}

impl Region {
    fn area(&self) -> u64 {
        let span = |min: i32, max: i32| (i64::from(max) - i64::from(min) + 1) as u64;
        span(self.min.x, self.max.x) * span(self.min.y, self.max.y)
    }

    fn contains(&self, p: Position) -> bool {
        (self.min.x..=self.max.x).contains(&p.x) && (self.min.y..=self.max.y).contains(&p.y)
    }

    /// Pick a random position in the region that is not taken yet
    fn sample<G: Rng + ?Sized>(
        &self,
        rng: &mut G,
        taken: &HashSet<(i32, i32)>,
    ) -> Result<Position> {
        let occupied = taken
            .iter()
            .filter(|&&(x, y)| self.contains(Position { x, y }))
            .count() as u64;
        if occupied >= self.area() {
            return Err(CaveError::Generate(format!(
                "no free position left between {:?} and {:?}",
                self.min, self.max
            )));
        }

        loop {
            let x = rng.gen_range(self.min.x..=self.max.x);
            let y = rng.gen_range(self.min.y..=self.max.y);
            if !taken.contains(&(x, y)) {
                return Ok(Position { x, y });
            }
        }
    }
}

pub fn generate<G: Rng + ?Sized>(options: &GeneratorOptions, rng: &mut G) -> Result<Cave> {
    let GeneratorOptions {
        count,
        width,
        height,
        connectivity,
        radius,
    } = *options;

    if count < 2 {
        return Err(CaveError::Generate(format!(
            "need at least 2 caverns, got {}",
            count
        )));
    }
    if width < 0 || height < 0 {
        return Err(CaveError::Generate(format!(
            "invalid area {}x{}",
            width, height
        )));
    }

    let anywhere = Region {
        min: Position::new(0, 0),
        max: Position::new(width, height),
    };
    let start = Region {
        min: Position::new(0, 0),
        max: Position::new(width / 3, height / 3),
    };
    let goal = Region {
        min: Position::new(width / 3 * 2, height / 3 * 2),
        max: Position::new(width, height),
    };

    let mut taken = HashSet::new();
    let mut positions = Vec::with_capacity(count);
    for n in 0..count {
        let region = match n {
            0 => start,
            n if n == count - 1 => goal,
            _ => anywhere,
        };
        let position = region.sample(rng, &taken)?;
        taken.insert((position.x, position.y));
        positions.push(position);
    }

    let mut matrix = vec![false; count * count];
    for n in 0..count {
        for i in 0..count {
            if n == i || distance(positions[n], positions[i]) > radius as f64 {
                continue;
            }
            matrix[n * count + i] = rng.gen_range(0..=100) <= connectivity;
        }
    }

    debug!(
        "generated {} caverns with {} links",
        count,
        matrix.iter().filter(|linked| **linked).count()
    );

    Cave::from_matrix(positions, &matrix)
}

#[cfg(test)]
mod test {

    use super::*;
    use crate::cave::CavernId;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_generate_layout() {
        let options = GeneratorOptions::default();
        let cave = generate(&options, &mut StdRng::seed_from_u64(7)).unwrap();

        assert_eq!(cave.len(), 100);

        let positions: HashSet<_> = cave
            .caverns()
            .iter()
            .map(|c| (c.position.x, c.position.y))
            .collect();
        assert_eq!(positions.len(), 100);

        for cavern in cave.caverns() {
            assert!((0..=400).contains(&cavern.position.x));
            assert!((0..=200).contains(&cavern.position.y));
        }

        let first = cave.cavern(cave.first()).unwrap().position;
        assert!(first.x <= 133 && first.y <= 66);
        let last = cave.cavern(cave.last()).unwrap().position;
        assert!(last.x >= 266 && last.y >= 132);
    }

    #[test]
    fn test_links_respect_radius() {
        let options = GeneratorOptions {
            count: 50,
            width: 100,
            height: 100,
            connectivity: 100,
            radius: 20,
        };
        let cave = generate(&options, &mut StdRng::seed_from_u64(3)).unwrap();

        let mut links = 0;
        for (from, to) in cave.edges() {
            assert_ne!(from, to);
            let a = cave.cavern(from).unwrap().position;
            let b = cave.cavern(to).unwrap().position;
            assert!(distance(a, b) <= 20.0);
            links += 1;
        }

        // full connectivity links every pair in range, both ways
        for a in cave.caverns() {
            for b in cave.caverns() {
                if a.id != b.id && distance(a.position, b.position) <= 20.0 {
                    assert!(cave.has_edge(a.id, b.id));
                }
            }
        }
        assert!(links > 0);
    }

    #[test]
    fn test_connectivity_controls_links() {
        let options = |connectivity| GeneratorOptions {
            count: 30,
            width: 60,
            height: 60,
            connectivity,
            radius: 25,
        };
        let none = generate(&options(0), &mut StdRng::seed_from_u64(11)).unwrap();
        let all = generate(&options(100), &mut StdRng::seed_from_u64(11)).unwrap();

        // positions are drawn before any link
        for (a, b) in none.caverns().iter().zip(all.caverns()) {
            assert_eq!(a.position, b.position);
        }

        let in_range: Vec<_> = all
            .caverns()
            .iter()
            .flat_map(|from| all.caverns().iter().map(move |to| (from, to)))
            .filter(|(from, to)| from.id != to.id && distance(from.position, to.position) <= 25.0)
            .map(|(from, to)| (from.id, to.id))
            .collect();
        assert!(!in_range.is_empty());

        let mut linked: Vec<_> = all.edges().collect();
        linked.sort();
        let mut expected = in_range.clone();
        expected.sort();
        assert_eq!(linked, expected);

        // only a draw of exactly 0 links at 0%
        let sparse: Vec<_> = none.edges().collect();
        assert!(sparse.iter().all(|edge| in_range.contains(edge)));
        assert!(sparse.len() * 10 < in_range.len());
    }

    #[test]
    fn test_same_seed_same_cave() {
        let options = GeneratorOptions {
            count: 20,
            ..Default::default()
        };
        let a = generate(&options, &mut StdRng::seed_from_u64(42)).unwrap();
        let b = generate(&options, &mut StdRng::seed_from_u64(42)).unwrap();

        assert_eq!(
            crate::util::to_cav_string(&a),
            crate::util::to_cav_string(&b)
        );
    }

    #[test]
    fn test_rejects_impossible_options() {
        let mut rng = StdRng::seed_from_u64(0);

        let options = GeneratorOptions {
            count: 1,
            ..Default::default()
        };
        assert!(matches!(
            generate(&options, &mut rng),
            Err(CaveError::Generate(_))
        ));

        // a 2x2 area has room for 4 caverns only
        let options = GeneratorOptions {
            count: 5,
            width: 1,
            height: 1,
            ..Default::default()
        };
        assert!(matches!(
            generate(&options, &mut rng),
            Err(CaveError::Generate(_))
        ));

        // start and goal regions collapse onto the same spot
        let options = GeneratorOptions {
            count: 2,
            width: 0,
            height: 0,
            ..Default::default()
        };
        assert!(matches!(
            generate(&options, &mut rng),
            Err(CaveError::Generate(_))
        ));
    }

    #[test]
    fn test_tiny_area() {
        let options = GeneratorOptions {
            count: 4,
            width: 1,
            height: 1,
            connectivity: 100,
            radius: 2,
        };
        let cave = generate(&options, &mut StdRng::seed_from_u64(5)).unwrap();
        assert_eq!(cave.len(), 4);
        assert_eq!(cave.first(), CavernId(1));
        assert_eq!(cave.edges().count(), 12);
    }
}
