//! 5x5 bingo board: generation, square marking, and win-line detection.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::pool::{BOARD_PROMPTS, PoolError, QuestionPool};
use crate::shuffle::shuffled;

/// Side length of the board.
pub const GRID: usize = 5;
/// Total cell count.
pub const CELLS: usize = GRID * GRID;
/// Flat index of the pre-marked free space: row 2, column 2.
pub const FREE_INDEX: usize = CELLS / 2;
/// Winning lines on a 5x5 board: 5 rows, 5 columns, 2 diagonals.
pub const LINE_COUNT: usize = 2 * GRID + 2;

/// One cell of the board. `id` is the flat row-major grid index, so
/// row = id / 5 and column = id % 5.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Square {
    pub id: usize,
    pub text: String,
    pub is_marked: bool,
    pub is_free_space: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineKind {
    Row,
    Column,
    Diagonal,
}

impl LineKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Row => "row",
            Self::Column => "column",
            Self::Diagonal => "diagonal",
        }
    }
}

impl fmt::Display for LineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LineKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "row" => Ok(Self::Row),
            "column" => Ok(Self::Column),
            "diagonal" => Ok(Self::Diagonal),
            _ => Err(()),
        }
    }
}

/// One of the twelve possible winning lines, holding the ids of its five
/// squares in grid order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    #[serde(rename = "type")]
    pub kind: LineKind,
    pub index: usize,
    pub squares: SmallVec<[usize; GRID]>,
}

impl Line {
    fn new(kind: LineKind, index: usize, squares: impl Iterator<Item = usize>) -> Self {
        Self {
            kind,
            index,
            squares: squares.collect(),
        }
    }
}

/// The canonical line table: rows 0-4, columns 0-4, main diagonal, then
/// anti-diagonal. Win detection scans this order, so the first fully marked
/// line by this ordering is always the one reported.
#[must_use]
pub fn all_lines() -> Vec<Line> {
    let mut lines = Vec::with_capacity(LINE_COUNT);
    for r in 0..GRID {
        lines.push(Line::new(LineKind::Row, r, (0..GRID).map(move |c| r * GRID + c)));
    }
    for c in 0..GRID {
        lines.push(Line::new(
            LineKind::Column,
            c,
            (0..GRID).map(move |r| r * GRID + c),
        ));
    }
    lines.push(Line::new(
        LineKind::Diagonal,
        0,
        (0..GRID).map(|i| i * GRID + i),
    ));
    lines.push(Line::new(
        LineKind::Diagonal,
        1,
        (0..GRID).map(|i| i * GRID + (GRID - 1 - i)),
    ));
    lines
}

/// Build a fresh board: 24 shuffled prompts around a pre-marked free space
/// at the center cell.
///
/// # Errors
///
/// Returns [`PoolError::Insufficient`] when the pool holds fewer than 24
/// usable prompts.
pub fn generate_board(
    pool: &QuestionPool,
    rng: &mut impl Rng,
) -> Result<Vec<Square>, PoolError> {
    let usable: Vec<&str> = pool.usable().collect();
    if usable.len() < BOARD_PROMPTS {
        return Err(PoolError::Insufficient {
            required: BOARD_PROMPTS,
            available: usable.len(),
        });
    }

    let picks = shuffled(&usable, rng);
    let mut board = Vec::with_capacity(CELLS);
    let mut next_pick = 0;
    for id in 0..CELLS {
        if id == FREE_INDEX {
            board.push(Square {
                id,
                text: pool.free_space.clone(),
                is_marked: true,
                is_free_space: true,
            });
        } else {
            board.push(Square {
                id,
                text: picks[next_pick].to_string(),
                is_marked: false,
                is_free_space: false,
            });
            next_pick += 1;
        }
    }
    Ok(board)
}

/// Return a new board with the matching square's mark flipped. Unknown ids
/// and the free space (permanently marked) come back as an unchanged copy.
#[must_use]
pub fn toggle_square(board: &[Square], id: usize) -> Vec<Square> {
    board
        .iter()
        .map(|sq| {
            let mut sq = sq.clone();
            if sq.id == id && !sq.is_free_space {
                sq.is_marked = !sq.is_marked;
            }
            sq
        })
        .collect()
}

/// First fully marked line in canonical order, or `None`. Detection reads
/// only the marked-id set, so equal boards always report the same line.
#[must_use]
pub fn check_bingo(board: &[Square]) -> Option<Line> {
    let marked: HashSet<usize> = board
        .iter()
        .filter(|sq| sq.is_marked)
        .map(|sq| sq.id)
        .collect();
    all_lines()
        .into_iter()
        .find(|line| line.squares.iter().all(|id| marked.contains(id)))
}

/// Ids belonging to the winning line; empty when there is no win yet.
#[must_use]
pub fn winning_square_ids(line: Option<&Line>) -> HashSet<usize> {
    line.map(|l| l.squares.iter().copied().collect())
        .unwrap_or_default()
}
