/// Progress eyes drawn under the hub board.
///
/// Two identical eyes share one mask. Iris cells light up nearest the
/// pupil first as letters are completed, so a full alphabet gives a full
/// iris. A blink value in [0, 1] lowers lids over the iris rows from both
/// ends; the hub animates it with tweens.

/// `x` and `p` are iris cells, `p` the pupil. `-` is a static lid cell.
const SHAPE: [&str; 9] = [
    "   -----------   ",
    "   ---xxxxx---   ",
    "   --x     x--   ",
    "   -x       x-   ",
    "   -x   p   x-   ",
    "   -x       x-   ",
    "   --x     x--   ",
    "   ---xxxxx---   ",
    "   -----------   ",
];

pub const FILL: char = 'Щ';
pub const LID: char = '─';
const EMPTY: char = ' ';

#[derive(Clone, Debug)]
pub struct Eyes {
    width: usize,
    /// Iris cells as (x, y), in reveal order.
    order: Vec<(usize, usize)>,
    lids: Vec<(usize, usize)>,
    revealed: usize,
    blink: f32,
    iris_top: usize,
    iris_bottom: usize,
}

impl Eyes {
    pub fn new() -> Self {
        let mut iris = Vec::new();
        let mut lids = Vec::new();
        let mut pupils = Vec::new();
        for (y, row) in SHAPE.iter().enumerate() {
            for (x, c) in row.chars().enumerate() {
                match c {
                    'x' => iris.push((x, y)),
                    'p' => {
                        iris.push((x, y));
                        pupils.push((x, y));
                    }
                    '-' => lids.push((x, y)),
                    _ => {}
                }
            }
        }

        let width = SHAPE[0].chars().count();
        if pupils.is_empty() {
            pupils.push((width / 2, SHAPE.len() / 2));
        }
        // Stable sort keeps row-major order among equal distances
        iris.sort_by_key(|&(x, y)| {
            pupils
                .iter()
                .map(|&(px, py)| {
                    let dx = x as i64 - px as i64;
                    let dy = y as i64 - py as i64;
                    dx * dx + dy * dy
                })
                .min()
                .unwrap_or(0)
        });

        let iris_top = iris.iter().map(|c| c.1).min().unwrap_or(0);
        let iris_bottom = iris.iter().map(|c| c.1).max().unwrap_or(SHAPE.len() - 1);

        Eyes { width, order: iris, lids, revealed: 0, blink: 0.0, iris_top, iris_bottom }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Iris cells per eye.
    pub fn cell_count(&self) -> usize {
        self.order.len()
    }

    pub fn revealed(&self) -> usize {
        self.revealed
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn blink(&self) -> f32 {
        self.blink
    }

    /// Light `completed / total` of the iris, rounded to the nearest cell.
    pub fn set_progress(&mut self, completed: usize, total: usize) {
        if total == 0 {
            return;
        }
        let cells = self.order.len();
        self.revealed = ((cells * completed.min(total) + total / 2) / total).min(cells);
    }

    pub fn set_blink(&mut self, t: f32) {
        self.blink = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    }

    /// One eye as text rows, lids and blink applied.
    pub fn rows(&self) -> Vec<String> {
        let h = SHAPE.len();
        let mut grid = vec![vec![EMPTY; self.width]; h];
        for &(x, y) in &self.lids {
            grid[y][x] = LID;
        }
        for &(x, y) in &self.order[..self.revealed] {
            grid[y][x] = FILL;
        }

        let inner = self.iris_bottom + 1 - self.iris_top;
        let cover = (self.blink * inner as f32 * 0.5).round() as usize;
        if cover > 0 {
            let top_end = self.iris_top + cover - 1;
            let bottom_start = (self.iris_bottom + 1).saturating_sub(cover);
            for (y, row) in grid.iter_mut().enumerate() {
                let in_iris = y >= self.iris_top && y <= self.iris_bottom;
                if in_iris && (y <= top_end || y >= bottom_start) {
                    row.fill(LID);
                }
            }
        }

        grid.into_iter().map(|row| row.into_iter().collect()).collect()
    }
}

impl Default for Eyes {
    fn default() -> Self {
        Self::new()
    }
}
