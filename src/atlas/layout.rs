/// Fixed-size grid of glyph cells, one cell per unique character
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AtlasLayout {
    pub columns: u32,
    pub rows: u32,
    pub cell_width: u32,
    pub cell_height: u32,
}

impl AtlasLayout {
    /// Picks a column count that keeps the atlas roughly square in pixels.
    ///
    /// `cell_width` must be nonzero.
    pub fn new(glyph_count: usize, cell_width: u16, cell_height: u16) -> Self {
        let ratio = glyph_count as f64 * f64::from(cell_height) / f64::from(cell_width);
        let columns = (ratio.sqrt().ceil() as u32).max(1);
        let rows = (glyph_count as u32).div_ceil(columns);

        Self {
            columns,
            rows,
            cell_width: u32::from(cell_width),
            cell_height: u32::from(cell_height),
        }
    }

    pub fn width(&self) -> u64 {
        u64::from(self.columns) * u64::from(self.cell_width)
    }

    pub fn height(&self) -> u64 {
        u64::from(self.rows) * u64::from(self.cell_height)
    }

    /// Pixel position of the top-left corner of cell `slot`. Only valid once
    /// the layout's atlas has been allocated, which bounds it to `u32`.
    pub fn cell_origin(&self, slot: usize) -> (u32, u32) {
        let slot = slot as u32;
        let column = slot % self.columns;
        let row = slot / self.columns;

        (column * self.cell_width, row * self.cell_height)
    }
}
