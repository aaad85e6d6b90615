use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use ball_drop_core::{BoardSizing, CellCoord, PixelPosition, PointerId, PointerInput, PointerKind};
use serde::Deserialize;

/// Pointer events recorded in a TOML document.
///
/// ```toml
/// [[events]]
/// kind = "touchstart"
/// pointer = 0
/// x = 20.0
/// y = 20.0
///
/// [[events]]
/// kind = "touchcancel"
/// pointer = 0
/// ```
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct PointerScript {
    #[serde(default)]
    events: Vec<ScriptedEvent>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ScriptedEvent {
    kind: String,
    #[serde(default)]
    pointer: u64,
    x: Option<f32>,
    y: Option<f32>,
}

impl PointerScript {
    /// Reads a script from disk.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let source = fs::read_to_string(path)
            .with_context(|| format!("failed to read pointer script {}", path.display()))?;
        Self::parse(&source)
            .with_context(|| format!("failed to load pointer script {}", path.display()))
    }

    /// Parses a script from TOML text.
    pub(crate) fn parse(source: &str) -> Result<Self> {
        toml::from_str(source).context("pointer script is not valid TOML")
    }

    /// Classifies every scripted event.
    ///
    /// Unknown kinds abort the whole script.
    pub(crate) fn inputs(&self) -> Result<Vec<PointerInput>> {
        self.events
            .iter()
            .enumerate()
            .map(|(index, event)| {
                event
                    .to_input()
                    .with_context(|| format!("invalid pointer event #{index}"))
            })
            .collect()
    }
}

impl ScriptedEvent {
    fn to_input(&self) -> Result<PointerInput> {
        let kind: PointerKind = self.kind.parse()?;
        let pointer = PointerId::new(self.pointer);
        let position = match (kind, self.x, self.y) {
            (PointerKind::Cancel, _, _) => PixelPosition::default(),
            (_, Some(x), Some(y)) => PixelPosition::new(x, y),
            _ => bail!("`{}` events need both x and y", self.kind),
        };
        Ok(PointerInput::from_kind(kind, pointer, position))
    }
}

/// Parses a grid-space drag written as `row,column:row,column:...`.
pub(crate) fn parse_drag(path: &str) -> Result<Vec<CellCoord>> {
    let cells = path
        .split(':')
        .map(|step| {
            let (row, column) = step
                .split_once(',')
                .with_context(|| format!("drag step `{step}` is not `row,column`"))?;
            let row = row
                .trim()
                .parse()
                .with_context(|| format!("drag step `{step}` has an invalid row"))?;
            let column = column
                .trim()
                .parse()
                .with_context(|| format!("drag step `{step}` has an invalid column"))?;
            Ok::<_, anyhow::Error>(CellCoord::new(row, column))
        })
        .collect::<Result<Vec<_>>>()?;
    if cells.is_empty() {
        bail!("drag path is empty");
    }
    Ok(cells)
}

/// Pointer inputs that press the first cell, move across the rest, and
/// release on the last one.
pub(crate) fn drag_inputs(
    sizing: &BoardSizing,
    path: &[CellCoord],
    pointer: PointerId,
) -> Vec<PointerInput> {
    let (Some(first), Some(last)) = (path.first(), path.last()) else {
        return Vec::new();
    };

    let mut inputs = Vec::with_capacity(path.len() + 1);
    inputs.push(PointerInput::Down {
        pointer,
        position: sizing.grid_to_pixel(*first),
    });
    inputs.extend(path.iter().skip(1).map(|cell| PointerInput::Move {
        pointer,
        position: sizing.grid_to_pixel(*cell),
    }));
    inputs.push(PointerInput::Up {
        pointer,
        position: sizing.grid_to_pixel(*last),
    });
    inputs
}
