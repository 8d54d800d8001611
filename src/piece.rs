//! Tetromino shapes, their colours, and the active piece.

/// Display colour of a shape. Opaque to the simulation; the theme maps it to a terminal colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceColor {
    Cyan,
    Yellow,
    Magenta,
    Orange,
    Blue,
    Green,
    Red,
}

impl PieceColor {
    pub const ALL: [Self; 7] = [
        Self::Cyan,
        Self::Yellow,
        Self::Magenta,
        Self::Orange,
        Self::Blue,
        Self::Green,
        Self::Red,
    ];

    /// Position in [`PieceColor::ALL`], used to index theme tables.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Tetromino kinds in shape-table order (I, O, T, L, J, S, Z).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    I,
    O,
    T,
    L,
    J,
    S,
    Z,
}

impl ShapeKind {
    pub const ALL: [Self; 7] = [
        Self::I,
        Self::O,
        Self::T,
        Self::L,
        Self::J,
        Self::S,
        Self::Z,
    ];

    /// Kind for a shape-table index. Panics past the seven shapes.
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index]
    }

    /// Spawn orientation, one string per row; `#` is a block.
    fn pattern(self) -> &'static [&'static str] {
        match self {
            Self::I => &["####"],
            Self::O => &["##", "##"],
            Self::T => &["###", ".#."],
            Self::L => &["###", "#.."],
            Self::J => &["###", "..#"],
            Self::S => &[".##", "##."],
            Self::Z => &["##.", ".##"],
        }
    }

    pub fn color(self) -> PieceColor {
        match self {
            Self::I => PieceColor::Cyan,
            Self::O => PieceColor::Yellow,
            Self::T => PieceColor::Magenta,
            Self::L => PieceColor::Orange,
            Self::J => PieceColor::Blue,
            Self::S => PieceColor::Green,
            Self::Z => PieceColor::Red,
        }
    }

    pub fn matrix(self) -> ShapeMatrix {
        ShapeMatrix::from_pattern(self.pattern())
    }
}

/// Rectangular boolean matrix, row-major. Never edited in place; rotation builds a new one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeMatrix {
    rows: usize,
    cols: usize,
    cells: Vec<bool>,
}

impl ShapeMatrix {
    fn from_pattern(pattern: &[&str]) -> Self {
        let rows = pattern.len();
        let cols = pattern.first().map_or(0, |r| r.len());
        let cells = pattern
            .iter()
            .flat_map(|row| row.bytes().map(|b| b == b'#'))
            .collect();
        Self { rows, cols, cells }
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// 90° clockwise: `rotated[x][y] = self[rows - 1 - y][x]`, giving `cols` rows by `rows` columns.
    pub fn rotated_cw(&self) -> Self {
        let (r, c) = (self.rows, self.cols);
        let mut cells = Vec::with_capacity(self.cells.len());
        for x in 0..c {
            for y in 0..r {
                cells.push(self.cells[(r - 1 - y) * c + x]);
            }
        }
        Self {
            rows: c,
            cols: r,
            cells,
        }
    }

    /// `(col, row)` of every block, relative to the top-left corner.
    pub fn blocks(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &filled)| filled)
            .map(|(i, _)| ((i % self.cols) as i32, (i / self.cols) as i32))
    }
}

/// The active tetromino: shape, top-left anchor in grid space, colour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    pub kind: ShapeKind,
    pub shape: ShapeMatrix,
    pub x: i32,
    pub y: i32,
    pub color: PieceColor,
}

impl Piece {
    /// Horizontally centred on a grid of `grid_width` columns, top row 0.
    pub fn spawn(kind: ShapeKind, grid_width: usize) -> Self {
        let shape = kind.matrix();
        let x = (grid_width / 2) as i32 - (shape.cols() / 2) as i32;
        Self {
            kind,
            shape,
            x,
            y: 0,
            color: kind.color(),
        }
    }

    /// Absolute grid coordinates of every block after applying `(dx, dy)`.
    pub fn cells_at(&self, dx: i32, dy: i32) -> impl Iterator<Item = (i32, i32)> + '_ {
        let (ox, oy) = (self.x + dx, self.y + dy);
        self.shape.blocks().map(move |(cx, cy)| (ox + cx, oy + cy))
    }

    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.cells_at(0, 0)
    }
}
