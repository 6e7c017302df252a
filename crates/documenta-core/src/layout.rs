//! Vertical stack layout and the coordinate to index mapping behind drops.

/// Vertical extent of one block in the stack.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Span {
    pub top: f64,
    pub height: f64,
}

impl Span {
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn center(&self) -> f64 {
        self.top + self.height / 2.0
    }

    pub fn contains(&self, y: f64) -> bool {
        y >= self.top && y < self.bottom()
    }
}

/// Blocks stacked contiguously from y = 0, top to bottom, in sequence order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StackLayout {
    spans: Vec<Span>,
}

impl StackLayout {
    /// Lay out blocks of the given heights.
    pub fn from_heights<I: IntoIterator<Item = f64>>(heights: I) -> Self {
        let mut top = 0.0;
        let spans = heights
            .into_iter()
            .map(|height| {
                let span = Span { top, height };
                top += height;
                span
            })
            .collect();
        Self { spans }
    }

    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Total height of the stack.
    pub fn height(&self) -> f64 {
        self.spans.last().map(Span::bottom).unwrap_or(0.0)
    }

    /// Insertion index for a drop at `y`: the first block whose centre lies
    /// below `y`, or `len` when the drop is past every centre.
    pub fn index_for_position(&self, y: f64) -> usize {
        self.spans
            .iter()
            .position(|span| y < span.center())
            .unwrap_or(self.spans.len())
    }

    /// Index of the block covering `y`, if any.
    pub fn index_at(&self, y: f64) -> Option<usize> {
        self.spans.iter().position(|span| span.contains(y))
    }
}
