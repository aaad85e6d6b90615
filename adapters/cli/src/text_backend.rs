use std::io::Write;

use anyhow::{Context, Result as AnyResult};
use ball_drop_core::Event;
use ball_drop_rendering::{CellStyle, Palette, Presentation, RenderingBackend};

/// Backend that prints boards as rows of palette indices.
///
/// Tokens print as the index of their palette slot, selected tokens are
/// prefixed with `*`, and holes print as `.`.
#[derive(Debug)]
pub(crate) struct TextBackend<W> {
    out: W,
    palette: Palette,
}

impl<W: Write> TextBackend<W> {
    pub(crate) fn new(out: W, palette: Palette) -> Self {
        Self { out, palette }
    }

    /// Prints each event on its own line.
    pub(crate) fn write_events(&mut self, events: &[Event]) -> AnyResult<()> {
        for event in events {
            writeln!(self.out, "{event:?}").context("failed to write event")?;
        }
        Ok(())
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }

    fn glyph(&self, style: &CellStyle) -> String {
        match style {
            CellStyle::Token { fill, halo } => {
                let symbol = self
                    .palette
                    .position(*fill)
                    .and_then(|index| u32::try_from(index).ok())
                    .and_then(|index| char::from_digit(index, 36))
                    .unwrap_or('?');
                let marker = if halo.is_some() { '*' } else { ' ' };
                format!("{marker}{symbol}")
            }
            CellStyle::Hole { .. } => " .".to_owned(),
        }
    }
}

impl<W: Write> RenderingBackend for TextBackend<W> {
    fn present(&mut self, presentation: &Presentation) -> AnyResult<()> {
        let scene = &presentation.scene;
        let columns = scene.sizing.num_items().max(1) as usize;

        writeln!(self.out, "{}", presentation.window_title).context("failed to write title")?;
        for row in scene.cells.chunks(columns) {
            let line: String = row.iter().map(|cell| self.glyph(&cell.style)).collect();
            writeln!(self.out, "{}", line.trim_end()).context("failed to write board row")?;
        }
        self.out.flush().context("failed to flush board")
    }
}
