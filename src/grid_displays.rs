use itertools::Itertools;
use std::fmt;

use crate::cells::GridCoordinate;
use crate::grid::Labyrinth;

const WALL_LR: &str = "─";
const WALL_UD: &str = "│";
const WALL_RD: &str = "┌";
const WALL_LD: &str = "┐";
const WALL_RU: &str = "└";
const WALL_LU: &str = "┘";

const HIGHLIGHT_ON: &str = "\x1b[32m";
const HIGHLIGHT_OFF: &str = "\x1b[0m";

fn horizontal_wall(width: usize, left: &str, right: &str) -> String {
    format!("{}{}{}\n", left, WALL_LR.repeat(width), right)
}

// Row-major, one text line per grid row.
fn render(labyrinth: &Labyrinth, highlight: Option<GridCoordinate>) -> String {
    let width = labyrinth.row_length().0;
    let mut output = horizontal_wall(width, WALL_RD, WALL_LD);

    for row in labyrinth.iter_row() {
        let body = row.into_iter()
            .map(|coord| {
                let glyph = labyrinth.cell_at(coord).map_or(' ', |cell| cell.glyph());
                if highlight == Some(coord) {
                    format!("{}{}{}", HIGHLIGHT_ON, glyph, HIGHLIGHT_OFF)
                } else {
                    glyph.to_string()
                }
            })
            .join("");
        output.push_str(WALL_UD);
        output.push_str(&body);
        output.push_str(WALL_UD);
        output.push('\n');
    }

    output.push_str(&horizontal_wall(width, WALL_RU, WALL_LU));
    output
}

impl fmt::Display for Labyrinth {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", render(self, None))
    }
}

/// Renders a labyrinth with one cell picked out in green, used to step along a path.
#[derive(Debug)]
pub struct HighlightDisplay<'a> {
    labyrinth: &'a Labyrinth,
    highlight: GridCoordinate,
}

impl<'a> HighlightDisplay<'a> {
    pub fn new(labyrinth: &'a Labyrinth, highlight: GridCoordinate) -> HighlightDisplay<'a> {
        HighlightDisplay { labyrinth, highlight }
    }
}

impl<'a> fmt::Display for HighlightDisplay<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", render(self.labyrinth, Some(self.highlight)))
    }
}
