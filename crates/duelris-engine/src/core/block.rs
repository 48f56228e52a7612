use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use super::board::Board;

/// A falling block (tetromino) with kind, rotation state and board position.
///
/// Blocks are immutable values: movement and rotation return new `Block`s,
/// which the caller then checks against a [`Board`] before committing.
///
/// # Coordinate System
///
/// - `(x, y)` is the top-left corner of the block's bounding box
/// - X increases rightward, Y increases downward (row 0 is the top)
/// - Coordinates are signed so a candidate may point outside the board
///
/// # Example
///
/// ```
/// use duelris_engine::{Block, BlockKind};
///
/// let block = Block::spawn(BlockKind::T);
/// let moved = block.moved(1, 0);
/// let rotated = moved.rotated();
/// assert_eq!(rotated.x(), moved.x());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    kind: BlockKind,
    rotation: Rotation,
    x: i32,
    y: i32,
    item_cell: Option<u8>,
}

impl Block {
    /// Creates a block in its spawn orientation at the origin.
    #[must_use]
    pub fn new(kind: BlockKind) -> Self {
        Self::at(kind, Rotation::default(), 0, 0)
    }

    /// Creates a block horizontally centred on the top row.
    #[must_use]
    pub fn spawn(kind: BlockKind) -> Self {
        let width = kind.shape(Rotation::default()).width;
        let x = (Board::WIDTH - usize::from(width)) / 2;
        Self::at(kind, Rotation::default(), i32::try_from(x).unwrap_or(0), 0)
    }

    #[must_use]
    pub fn at(kind: BlockKind, rotation: Rotation, x: i32, y: i32) -> Self {
        Self {
            kind,
            rotation,
            x,
            y,
            item_cell: None,
        }
    }

    /// Marks one of the four cells as an item cell.
    #[must_use]
    pub fn with_item_cell(self, index: u8) -> Self {
        assert!(index < 4, "item cell index out of range: {index}");
        Self {
            item_cell: Some(index),
            ..self
        }
    }

    #[must_use]
    pub fn kind(&self) -> BlockKind {
        self.kind
    }

    #[must_use]
    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    #[must_use]
    pub fn x(&self) -> i32 {
        self.x
    }

    #[must_use]
    pub fn y(&self) -> i32 {
        self.y
    }

    #[must_use]
    pub fn has_item(&self) -> bool {
        self.item_cell.is_some()
    }

    #[must_use]
    pub fn width(&self) -> usize {
        usize::from(self.shape().width)
    }

    #[must_use]
    pub fn height(&self) -> usize {
        usize::from(self.shape().height)
    }

    /// Returns whether the shape occupies `(col, row)` of its bounding box.
    #[must_use]
    pub fn is_occupied(&self, col: usize, row: usize) -> bool {
        self.shape().contains(col, row)
    }

    /// Returns the occupied cells relative to the bounding box origin.
    ///
    /// The second element is `true` for the item cell.
    pub fn cells(&self) -> impl Iterator<Item = ((usize, usize), bool)> + '_ {
        self.shape()
            .cells
            .iter()
            .enumerate()
            .map(|(i, &(dx, dy))| {
                let is_item = self.item_cell.is_some_and(|item| usize::from(item) == i);
                ((usize::from(dx), usize::from(dy)), is_item)
            })
    }

    /// Returns the occupied cells as absolute board coordinates at the block's position.
    pub fn board_cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.cells()
            .map(|((dx, dy), _)| (self.x + offset(dx), self.y + offset(dy)))
    }

    #[must_use]
    pub fn moved(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    /// Advances the rotation state by one step clockwise, keeping the position.
    #[must_use]
    pub fn rotated(&self) -> Self {
        Self {
            rotation: self.rotation.rotated_right(),
            ..*self
        }
    }

    /// Rotates clockwise, falling back to the kind's wall-kick offsets.
    ///
    /// The base rotated position is tried first, then each offset of
    /// [`BlockKind::kick_offsets`] in order. Returns `None` when every
    /// candidate collides, in which case the rotation is a no-op.
    #[must_use]
    pub fn rotated_with_kicks(&self, board: &Board) -> Option<Self> {
        let rotated = self.rotated();
        if board.fits(&rotated) {
            return Some(rotated);
        }
        self.kind
            .kick_offsets()
            .iter()
            .map(|&(dx, dy)| rotated.moved(dx, dy))
            .find(|candidate| board.fits(candidate))
    }

    /// Moves the block down until it rests on the stack or the floor.
    #[must_use]
    pub fn dropped(&self, board: &Board) -> Self {
        let mut dropped = *self;
        while board.fits(&dropped.moved(0, 1)) {
            dropped = dropped.moved(0, 1);
        }
        dropped
    }

    /// Returns whether both blocks cover the same cells of their bounding box.
    #[must_use]
    pub fn has_same_shape(&self, other: &Self) -> bool {
        self.kind.shape(self.rotation) == other.kind.shape(other.rotation)
    }

    fn shape(&self) -> &'static Shape {
        self.kind.shape(self.rotation)
    }
}

fn offset(d: usize) -> i32 {
    i32::try_from(d).unwrap_or(i32::MAX)
}

/// Rotation state of a block.
///
/// - `0`: spawn orientation
/// - `1`: 90° clockwise
/// - `2`: 180°
/// - `3`: 270° clockwise
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rotation(u8);

impl Rotation {
    /// All four rotation states in clockwise order from spawn.
    pub const ALL: [Self; 4] = [Self(0), Self(1), Self(2), Self(3)];

    #[must_use]
    pub fn rotated_right(self) -> Self {
        Rotation((self.0 + 1) % 4)
    }

    /// Number of clockwise steps needed to reach `target` from `self`.
    #[must_use]
    pub fn steps_to(self, target: Self) -> u8 {
        (target.0 + 4 - self.0) % 4
    }

    #[must_use]
    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }
}

/// The seven block kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum BlockKind {
    /// I-block.
    I = 0,
    /// O-block (square).
    O = 1,
    /// S-block.
    S = 2,
    /// Z-block.
    Z = 3,
    /// J-block.
    J = 4,
    /// L-block.
    L = 5,
    /// T-block.
    T = 6,
}

impl BlockKind {
    /// Number of block kinds (7).
    pub const LEN: usize = 7;

    pub const ALL: [Self; Self::LEN] = [
        BlockKind::I,
        BlockKind::O,
        BlockKind::S,
        BlockKind::Z,
        BlockKind::J,
        BlockKind::L,
        BlockKind::T,
    ];

    fn shape(self, rotation: Rotation) -> &'static Shape {
        &SHAPES[self as usize][rotation.as_usize()]
    }

    /// Ordered wall-kick offsets tried after the base rotation collides.
    #[must_use]
    pub fn kick_offsets(self) -> &'static [(i32, i32)] {
        match self {
            BlockKind::O => &[],
            BlockKind::I => &I_KICKS,
            BlockKind::S | BlockKind::Z | BlockKind::J | BlockKind::L | BlockKind::T => {
                &JLSTZ_KICKS
            }
        }
    }

    /// Rotation states with pairwise different shapes, in clockwise order.
    ///
    /// The O-block yields only its spawn state.
    #[must_use]
    pub fn distinct_rotations(self) -> ArrayVec<Rotation, 4> {
        let mut rotations: ArrayVec<Rotation, 4> = ArrayVec::new();
        for rotation in Rotation::ALL {
            let shape = self.shape(rotation);
            if rotations.iter().all(|r| self.shape(*r) != shape) {
                rotations.push(rotation);
            }
        }
        rotations
    }

    /// Returns the single character representation of this block kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use duelris_engine::BlockKind;
    ///
    /// assert_eq!(BlockKind::I.as_char(), 'I');
    /// assert_eq!(BlockKind::T.as_char(), 'T');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            BlockKind::I => 'I',
            BlockKind::O => 'O',
            BlockKind::S => 'S',
            BlockKind::Z => 'Z',
            BlockKind::J => 'J',
            BlockKind::L => 'L',
            BlockKind::T => 'T',
        }
    }
}

const I_KICKS: [(i32, i32); 6] = [(-1, 0), (1, 0), (-2, 0), (2, 0), (0, -1), (0, -2)];
const JLSTZ_KICKS: [(i32, i32); 5] = [(-1, 0), (1, 0), (0, -1), (-1, -1), (1, -1)];

/// Occupied cells of one rotation state inside its minimal bounding box.
///
/// Cell order is preserved across rotations, so the n-th cell of every
/// rotation state is the image of the same physical cell. This keeps an item
/// marker attached to one cell while the block turns.
#[derive(Debug, Clone, Copy)]
struct Shape {
    cells: [(u8, u8); 4],
    width: u8,
    height: u8,
}

impl Shape {
    fn contains(&self, col: usize, row: usize) -> bool {
        self.cells
            .iter()
            .any(|&(x, y)| usize::from(x) == col && usize::from(y) == row)
    }
}

impl PartialEq for Shape {
    fn eq(&self, other: &Self) -> bool {
        self.width == other.width
            && self.height == other.height
            && self
                .cells
                .iter()
                .all(|&(x, y)| other.contains(usize::from(x), usize::from(y)))
    }
}

/// Rotates a shape 90° clockwise: `(x, y)` in a `w×h` box maps to `(h-1-y, x)` in `h×w`.
const fn rotate_right(shape: Shape) -> Shape {
    let mut cells = shape.cells;
    let mut i = 0;
    while i < 4 {
        let (x, y) = shape.cells[i];
        cells[i] = (shape.height - 1 - y, x);
        i += 1;
    }
    Shape {
        cells,
        width: shape.height,
        height: shape.width,
    }
}

const fn shape_rotations(cells: [(u8, u8); 4], width: u8, height: u8) -> [Shape; 4] {
    let r0 = Shape {
        cells,
        width,
        height,
    };
    let r1 = rotate_right(r0);
    let r2 = rotate_right(r1);
    let r3 = rotate_right(r2);
    [r0, r1, r2, r3]
}

static SHAPES: [[Shape; 4]; BlockKind::LEN] = [
    // I: ####
    shape_rotations([(0, 0), (1, 0), (2, 0), (3, 0)], 4, 1),
    // O: ##
    //    ##
    shape_rotations([(0, 0), (1, 0), (0, 1), (1, 1)], 2, 2),
    // S: .##
    //    ##.
    shape_rotations([(1, 0), (2, 0), (0, 1), (1, 1)], 3, 2),
    // Z: ##.
    //    .##
    shape_rotations([(0, 0), (1, 0), (1, 1), (2, 1)], 3, 2),
    // J: #..
    //    ###
    shape_rotations([(0, 0), (0, 1), (1, 1), (2, 1)], 3, 2),
    // L: ..#
    //    ###
    shape_rotations([(2, 0), (0, 1), (1, 1), (2, 1)], 3, 2),
    // T: .#.
    //    ###
    shape_rotations([(1, 0), (0, 1), (1, 1), (2, 1)], 3, 2),
];
