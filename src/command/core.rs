use crate::geometry::Point;

/// One parsed input line.
///
/// Numeric fields are carried verbatim from the text; range checking against
/// the live canvas happens in the engine's validation pass, not here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    CreateCanvas { width: u16, height: u16 },
    DrawLine { from: Point, to: Point },
    DrawRectangle { corner_a: Point, corner_b: Point },
    Fill { seed: Point, glyph: char },
    Quit,
    Unrecognized,
}

impl Command {
    /// Parse a whole input line. Never fails: anything that does not match
    /// the grammar exactly comes back as [`Command::Unrecognized`].
    ///
    /// Matching is anchored at both ends — single spaces between tokens, no
    /// leading or trailing content, case-sensitive opcodes. The fill glyph is
    /// the verbatim remainder after the third space, so a literal space is
    /// expressible as a fill character.
    pub fn parse(line: &str) -> Self {
        if line == "Q" {
            return Self::Quit;
        }

        let Some((opcode, args)) = line.split_once(' ') else {
            return Self::Unrecognized;
        };

        match opcode {
            "C" => parse_create(args),
            "L" => match parse_segment(args) {
                Some((from, to)) => Self::DrawLine { from, to },
                None => Self::Unrecognized,
            },
            "R" => match parse_segment(args) {
                Some((corner_a, corner_b)) => Self::DrawRectangle { corner_a, corner_b },
                None => Self::Unrecognized,
            },
            "B" => parse_fill(args),
            _ => Self::Unrecognized,
        }
    }
}

/// Digits-only `u16`. Overflowing or signed tokens fail the grammar; there
/// is no clamping.
fn coordinate(token: &str) -> Option<u16> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}

/// Canvas dimensions are typed ≥ 1 by the grammar.
fn dimension(token: &str) -> Option<u16> {
    coordinate(token).filter(|value| *value >= 1)
}

fn parse_create(args: &str) -> Command {
    let mut tokens = args.split(' ');
    match (tokens.next(), tokens.next(), tokens.next()) {
        (Some(w), Some(h), None) => match (dimension(w), dimension(h)) {
            (Some(width), Some(height)) => Command::CreateCanvas { width, height },
            _ => Command::Unrecognized,
        },
        _ => Command::Unrecognized,
    }
}

fn parse_segment(args: &str) -> Option<(Point, Point)> {
    let mut tokens = args.split(' ');
    match (
        tokens.next(),
        tokens.next(),
        tokens.next(),
        tokens.next(),
        tokens.next(),
    ) {
        (Some(x1), Some(y1), Some(x2), Some(y2), None) => {
            let from = Point::new(coordinate(x1)?, coordinate(y1)?);
            let to = Point::new(coordinate(x2)?, coordinate(y2)?);
            Some((from, to))
        }
        _ => None,
    }
}

fn parse_fill(args: &str) -> Command {
    let mut tokens = args.splitn(3, ' ');
    let (Some(x), Some(y), Some(rest)) = (tokens.next(), tokens.next(), tokens.next()) else {
        return Command::Unrecognized;
    };
    let (Some(x), Some(y)) = (coordinate(x), coordinate(y)) else {
        return Command::Unrecognized;
    };

    let mut glyphs = rest.chars();
    match (glyphs.next(), glyphs.next()) {
        (Some(glyph), None) => Command::Fill {
            seed: Point::new(x, y),
            glyph,
        },
        _ => Command::Unrecognized,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_parses_dimensions() {
        assert_eq!(
            Command::parse("C 20 4"),
            Command::CreateCanvas {
                width: 20,
                height: 4
            }
        );
    }

    #[test]
    fn create_rejects_zero_dimensions() {
        assert_eq!(Command::parse("C 0 4"), Command::Unrecognized);
        assert_eq!(Command::parse("C 20 0"), Command::Unrecognized);
    }

    #[test]
    fn line_and_rectangle_parse_endpoints() {
        assert_eq!(
            Command::parse("L 1 2 6 2"),
            Command::DrawLine {
                from: Point::new(1, 2),
                to: Point::new(6, 2),
            }
        );
        assert_eq!(
            Command::parse("R 14 1 18 3"),
            Command::DrawRectangle {
                corner_a: Point::new(14, 1),
                corner_b: Point::new(18, 3),
            }
        );
    }

    #[test]
    fn fill_takes_exactly_one_glyph() {
        assert_eq!(
            Command::parse("B 10 3 o"),
            Command::Fill {
                seed: Point::new(10, 3),
                glyph: 'o',
            }
        );
        assert_eq!(Command::parse("B 10 3 oo"), Command::Unrecognized);
        assert_eq!(Command::parse("B 10 3"), Command::Unrecognized);
    }

    #[test]
    fn fill_glyph_may_be_a_space() {
        assert_eq!(
            Command::parse("B 2 2  "),
            Command::Fill {
                seed: Point::new(2, 2),
                glyph: ' ',
            }
        );
    }

    #[test]
    fn quit_is_the_bare_opcode() {
        assert_eq!(Command::parse("Q"), Command::Quit);
        assert_eq!(Command::parse("Q "), Command::Unrecognized);
        assert_eq!(Command::parse("q"), Command::Unrecognized);
    }

    #[test]
    fn matching_is_anchored() {
        assert_eq!(Command::parse(" C 20 4"), Command::Unrecognized);
        assert_eq!(Command::parse("C 20 4 "), Command::Unrecognized);
        assert_eq!(Command::parse("C  20 4"), Command::Unrecognized);
        assert_eq!(Command::parse("L 1 2 6 2 extra"), Command::Unrecognized);
    }

    #[test]
    fn numeric_tokens_are_unsigned_digits_only() {
        assert_eq!(Command::parse("C +2 4"), Command::Unrecognized);
        assert_eq!(Command::parse("C 70000 4"), Command::Unrecognized);
        assert_eq!(Command::parse("L 1 2 6 -2"), Command::Unrecognized);
    }

    #[test]
    fn unknown_opcodes_are_unrecognized() {
        assert_eq!(Command::parse(""), Command::Unrecognized);
        assert_eq!(Command::parse("Z 1 2"), Command::Unrecognized);
        assert_eq!(Command::parse("hello"), Command::Unrecognized);
    }
}
