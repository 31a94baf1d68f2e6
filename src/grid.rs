use crate::parser::FeedItem;

/// A feed item together with its position in the grid.
#[derive(Debug, Clone)]
pub struct GridCell {
    pub row: usize,
    pub column: usize,
    pub item: FeedItem,
}

/// Items laid out column by column. Item `i` sits in column `i % n`,
/// row `i / n`.
#[derive(Debug, Clone, Default)]
pub struct Grid {
    pub columns: Vec<Vec<GridCell>>,
}

impl Grid {
    pub fn layout(items: Vec<FeedItem>, columns: usize) -> Self {
        let n = columns.max(1);
        let mut grid: Vec<Vec<GridCell>> = (0..n).map(|_| Vec::new()).collect();

        for (index, item) in items.into_iter().enumerate() {
            let cell = GridCell {
                row: index / n,
                column: index % n,
                item,
            };
            grid[cell.column].push(cell);
        }

        Self { columns: grid }
    }

    pub fn is_empty(&self) -> bool {
        self.columns.iter().all(Vec::is_empty)
    }

    pub fn len(&self) -> usize {
        self.columns.iter().map(Vec::len).sum()
    }

    /// Cells in reading order (row by row).
    pub fn cells(&self) -> Vec<&GridCell> {
        let mut cells: Vec<&GridCell> = self.columns.iter().flatten().collect();
        cells.sort_by_key(|cell| (cell.row, cell.column));
        cells
    }
}
