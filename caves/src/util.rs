use std::str::FromStr;

use crate::cave::{Cave, Position};
use crate::error::{CaveError, Result};

struct Tokens<'a> {
    inner: std::iter::Enumerate<std::str::Split<'a, char>>,
    last_index: usize,
}

impl<'a> Tokens<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            inner: input.trim().split(',').enumerate(),
            last_index: 0,
        }
    }

    fn next_value<T>(&mut self, what: &str) -> Result<T>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.inner.next() {
            Some((index, token)) => {
                self.last_index = index;
                token.trim().parse().map_err(|e: T::Err| CaveError::Parse {
                    index,
                    token: token.trim().to_string(),
                    reason: format!("{} ({})", e, what),
                })
            }
            None => Err(CaveError::Parse {
                index: self.last_index + 1,
                token: String::new(),
                reason: format!("missing {}", what),
            }),
        }
    }
}

/// Parse a cave description: the number of caverns, the x and y coordinate of every cavern
/// and finally the flattened adjacency matrix, all separated by commas.
pub fn parse_cav(input: &str) -> Result<Cave> {
    let mut tokens = Tokens::new(input);

    let count: usize = tokens.next_value("cavern count")?;

    let mut positions = Vec::new();
    for _ in 0..count {
        let x = tokens.next_value("x coordinate")?;
        let y = tokens.next_value("y coordinate")?;
        positions.push(Position { x, y });
    }

    let mut matrix = Vec::new();
    let mut rest = tokens.inner.peekable();
    while let Some((index, token)) = rest.next() {
        // a single trailing comma is tolerated
        if token.trim().is_empty() && rest.peek().is_none() {
            break;
        }
        matrix.push(match token.trim() {
            "0" => false,
            "1" => true,
            other => {
                return Err(CaveError::Parse {
                    index,
                    token: other.to_string(),
                    reason: "connections must be 0 or 1".to_string(),
                })
            }
        });
    }

    Cave::from_matrix(positions, &matrix)
}

/// Serialize a cave in the format read by [`parse_cav`]
pub fn to_cav_string(cave: &Cave) -> String {
    let n = cave.len();
    let mut out = vec![n.to_string()];

    for cavern in cave.caverns() {
        out.push(cavern.position.x.to_string());
        out.push(cavern.position.y.to_string());
    }

    let mut matrix = vec!["0"; n * n];
    for cavern in cave.caverns() {
        let from = cavern.id.0 - 1;
        for to in cavern.paths() {
            matrix[(to.0 - 1) * n + from] = "1";
        }
    }
    out.extend(matrix.into_iter().map(String::from));

    out.join(",")
}

#[cfg(test)]
mod test {

    use super::*;
    use crate::cave::CavernId;

    #[test]
    fn test_parse() {
        let cave = parse_cav("3,0,0,1,0,2,0,0,0,0,1,0,0,0,1,0\n").unwrap();

        assert_eq!(cave.len(), 3);
        assert_eq!(
            cave.cavern(CavernId(2)).unwrap().position,
            Position::new(1, 0)
        );
        assert_eq!(
            cave.edges().collect::<Vec<_>>(),
            vec![(CavernId(1), CavernId(2)), (CavernId(2), CavernId(3))]
        );
    }

    #[test]
    fn test_parse_whitespace_and_negatives() {
        let cave = parse_cav(" 2, -3 ,4,\n5, -6, 0, 0, 1, 0 ").unwrap();

        assert_eq!(
            cave.cavern(CavernId(1)).unwrap().position,
            Position::new(-3, 4)
        );
        assert_eq!(
            cave.cavern(CavernId(2)).unwrap().position,
            Position::new(5, -6)
        );
        assert_eq!(
            cave.edges().collect::<Vec<_>>(),
            vec![(CavernId(1), CavernId(2))]
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            parse_cav("two,0,0"),
            Err(CaveError::Parse { index: 0, token, .. }) if token == "two"
        ));

        assert!(matches!(
            parse_cav("2,0,0,1"),
            Err(CaveError::Parse { index: 4, token, .. }) if token.is_empty()
        ));

        assert!(matches!(
            parse_cav("1,0,0,2"),
            Err(CaveError::Parse { index: 3, token, .. }) if token == "2"
        ));

        assert_eq!(
            parse_cav("2,0,0,1,1,0,1,0").unwrap_err(),
            CaveError::MatrixSize {
                caverns: 2,
                expected: 4,
                found: 3
            }
        );

        assert_eq!(parse_cav("0").unwrap_err(), CaveError::EmptyCave);
    }

    #[test]
    fn test_parse_trailing_comma() {
        let cave = parse_cav("2,0,0,3,4,0,0,1,0,\n").unwrap();
        assert_eq!(
            cave.edges().collect::<Vec<_>>(),
            vec![(CavernId(1), CavernId(2))]
        );

        assert!(matches!(
            parse_cav("2,0,0,3,4,0,0,1,0,,"),
            Err(CaveError::Parse { index: 9, token, .. }) if token.is_empty()
        ));
    }

    #[test]
    fn test_round_trip() {
        let input = "4,0,0,5,5,-2,7,9,9,0,0,1,0,1,0,0,0,0,1,0,0,1,0,1,1";
        let cave = parse_cav(input).unwrap();

        assert_eq!(to_cav_string(&cave), input);

        let again = parse_cav(&to_cav_string(&cave)).unwrap();
        assert_eq!(
            again.edges().collect::<Vec<_>>(),
            cave.edges().collect::<Vec<_>>()
        );
    }
}
