//! Run-length encoded pattern reader (the `.rle` format used by LifeWiki).

use super::life::{Rule, RuleError};

/// Most live cells a single pattern may expand to.
pub const MAX_RLE_CELLS: usize = 1 << 24;

/// Decoded RLE pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RlePattern {
    /// Declared width (`x = ..`).
    pub width: u32,
    /// Declared height (`y = ..`).
    pub height: u32,
    /// Rule from the header, if present.
    pub rule: Option<Rule>,
    /// Live cells relative to the pattern's top-left corner.
    pub cells: Vec<(i64, i64)>,
}

/// RLE parsing errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RleError {
    #[error("Missing RLE header line (x = .., y = ..)")]
    MissingHeader,
    #[error("Invalid RLE header field: {0}")]
    InvalidHeader(String),
    #[error("Unexpected character {0:?} in RLE body")]
    InvalidToken(char),
    #[error("Run count does not fit in 32 bits")]
    RunTooLong,
    #[error("Row {row} runs past the declared width of {width} cells")]
    RowTooWide { row: i64, width: u32 },
    #[error("Live cell on row {row}, outside the declared height of {height} rows")]
    RowOutOfBounds { row: i64, height: u32 },
    #[error("Pattern expands to more than {max} live cells", max = MAX_RLE_CELLS)]
    TooManyCells,
    #[error(transparent)]
    Rule(#[from] RuleError),
}

/// Parse an RLE document.
pub fn parse_rle(text: &str) -> Result<RlePattern, RleError> {
    let mut lines = text.lines().map(str::trim).filter(|l| !l.starts_with('#'));

    let header = lines
        .by_ref()
        .find(|l| !l.is_empty())
        .ok_or(RleError::MissingHeader)?;
    if !header.starts_with('x') {
        return Err(RleError::MissingHeader);
    }

    let mut width = None;
    let mut height = None;
    let mut rule = None;
    for field in header.split(',') {
        let (key, value) = field
            .split_once('=')
            .ok_or_else(|| RleError::InvalidHeader(field.trim().to_string()))?;
        let value = value.trim();
        let number = || {
            value
                .parse::<u32>()
                .map_err(|_| RleError::InvalidHeader(field.trim().to_string()))
        };
        match key.trim() {
            "x" => width = Some(number()?),
            "y" => height = Some(number()?),
            "rule" => rule = Some(value.parse::<Rule>()?),
            _ => {}
        }
    }
    let (Some(width), Some(height)) = (width, height) else {
        return Err(RleError::MissingHeader);
    };

    let mut cells = Vec::new();
    let (mut x, mut y) = (0i64, 0i64);
    let mut run: Option<u32> = None;
    // Cells `x..x + n` of the current row, checked against the header.
    let span = |x: i64, y: i64, n: u32| {
        let end = x + n as i64;
        if end > width as i64 {
            return Err(RleError::RowTooWide { row: y, width });
        }
        Ok(end)
    };
    'body: for line in lines {
        for c in line.chars() {
            match c {
                '0'..='9' => {
                    let d = c as u32 - '0' as u32;
                    let next = run.unwrap_or(0).checked_mul(10).and_then(|r| r.checked_add(d));
                    run = Some(next.ok_or(RleError::RunTooLong)?);
                    continue;
                }
                'b' | '.' => x = span(x, y, run.unwrap_or(1))?,
                '$' => {
                    y = y
                        .checked_add(run.unwrap_or(1) as i64)
                        .ok_or(RleError::RunTooLong)?;
                    x = 0;
                }
                '!' => break 'body,
                c if c.is_ascii_alphabetic() => {
                    let n = run.unwrap_or(1);
                    let end = span(x, y, n)?;
                    if y >= height as i64 {
                        return Err(RleError::RowOutOfBounds { row: y, height });
                    }
                    if cells.len() + n as usize > MAX_RLE_CELLS {
                        return Err(RleError::TooManyCells);
                    }
                    cells.extend((x..end).map(|cx| (cx, y)));
                    x = end;
                }
                c if c.is_whitespace() => continue,
                c => return Err(RleError::InvalidToken(c)),
            }
            run = None;
        }
    }

    Ok(RlePattern {
        width,
        height,
        rule,
        cells,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const GLIDER: &str = "#N Glider\n#C comment\nx = 3, y = 3, rule = B3/S23\nbob$2bo$3o!\n";

    #[test]
    fn test_parse_glider() {
        let p = parse_rle(GLIDER).unwrap();
        assert_eq!((p.width, p.height), (3, 3));
        assert_eq!(p.rule, Some(Rule::CONWAY));
        assert_eq!(p.cells, vec![(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)]);
    }

    #[test]
    fn test_parse_multiline_runs() {
        let p = parse_rle("x = 12, y = 4\n12o\n$\n2$o!").unwrap();
        assert_eq!(p.rule, None);
        assert_eq!(p.cells.len(), 13);
        assert_eq!(p.cells.last(), Some(&(0, 3)));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(parse_rle("bo$!"), Err(RleError::MissingHeader));
        assert_eq!(parse_rle(""), Err(RleError::MissingHeader));
        assert!(matches!(
            parse_rle("x = a, y = 1\no!"),
            Err(RleError::InvalidHeader(_))
        ));
        assert_eq!(
            parse_rle("x = 1, y = 1\no*!"),
            Err(RleError::InvalidToken('*'))
        );
        assert!(matches!(
            parse_rle("x = 1, y = 1, rule = Q\no!"),
            Err(RleError::Rule(_))
        ));
    }

    #[test]
    fn test_run_count_overflow() {
        assert_eq!(
            parse_rle("x = 1, y = 1\n99999999999999999999b!"),
            Err(RleError::RunTooLong)
        );
        assert_eq!(
            parse_rle("x = 1, y = 1\n4294967296$!"),
            Err(RleError::RunTooLong)
        );
    }

    #[test]
    fn test_runs_stay_inside_header() {
        assert_eq!(
            parse_rle("x = 2, y = 1\n3o!"),
            Err(RleError::RowTooWide { row: 0, width: 2 })
        );
        assert_eq!(
            parse_rle("x = 1, y = 1\n4000000000o!"),
            Err(RleError::RowTooWide { row: 0, width: 1 })
        );
        assert_eq!(
            parse_rle("x = 3, y = 2\nbo$2bo$o!"),
            Err(RleError::RowOutOfBounds { row: 2, height: 2 })
        );
        // Dead runs and line ends past the last row are harmless.
        let p = parse_rle("x = 2, y = 1\n2o$3$!").unwrap();
        assert_eq!(p.cells, vec![(0, 0), (1, 0)]);
    }

    #[test]
    fn test_cell_limit() {
        let big = format!("x = 4294967295, y = 1\n{}o!", MAX_RLE_CELLS + 1);
        assert_eq!(parse_rle(&big), Err(RleError::TooManyCells));
    }
}
