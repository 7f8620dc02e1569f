//! Board placements supplied on the command line as `x,y,value` triples.

use std::{error::Error, fmt, str::FromStr};

use serde::Deserialize;
use signal_grid_core::{CellCoord, Command, CoreError, Direction, ElementKind};

const FIELD_DELIMITER: char = ',';

/// Arrow requested for a single cell, written as `x,y,direction` on the
/// command line or as a `[[arrows]]` table in the config file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ArrowPlacement {
    pub(crate) cell: CellCoord,
    pub(crate) arrow: Direction,
}

impl ArrowPlacement {
    pub(crate) fn command(&self) -> Command {
        Command::SetArrow {
            cell: self.cell,
            arrow: Some(self.arrow),
        }
    }
}

impl FromStr for ArrowPlacement {
    type Err = PlacementError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (cell, arrow) = split_triple(value)?;
        let arrow = arrow.parse().map_err(PlacementError::InvalidValue)?;
        Ok(Self { cell, arrow })
    }
}

/// Element requested for a single cell, written as `x,y,tool` on the
/// command line or as an `[[elements]]` table in the config file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ElementPlacement {
    pub(crate) cell: CellCoord,
    pub(crate) element: ElementKind,
}

impl ElementPlacement {
    pub(crate) fn command(&self) -> Command {
        Command::PlaceElement {
            cell: self.cell,
            element: Some(self.element),
        }
    }
}

impl FromStr for ElementPlacement {
    type Err = PlacementError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (cell, element) = split_triple(value)?;
        let element = element.parse().map_err(PlacementError::InvalidValue)?;
        Ok(Self { cell, element })
    }
}

fn split_triple(value: &str) -> Result<(CellCoord, &str), PlacementError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(PlacementError::Empty);
    }

    let mut parts = trimmed.splitn(3, FIELD_DELIMITER);
    let column = parts.next().ok_or(PlacementError::MissingField("x"))?;
    let row = parts.next().ok_or(PlacementError::MissingField("y"))?;
    let payload = parts.next().ok_or(PlacementError::MissingField("value"))?;

    let column = parse_coordinate(column)?;
    let row = parse_coordinate(row)?;
    Ok((CellCoord::new(column, row), payload.trim()))
}

fn parse_coordinate(value: &str) -> Result<u32, PlacementError> {
    value
        .trim()
        .parse()
        .map_err(|_| PlacementError::InvalidCoordinate(value.trim().to_owned()))
}

/// Errors that can occur while parsing placement triples.
#[derive(Debug, PartialEq)]
pub(crate) enum PlacementError {
    /// The provided string was empty or contained only whitespace.
    Empty,
    /// A comma separated field was missing.
    MissingField(&'static str),
    /// A coordinate was not a non-negative integer.
    InvalidCoordinate(String),
    /// The direction or tool could not be parsed.
    InvalidValue(CoreError),
}

impl fmt::Display for PlacementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "placement must not be empty"),
            Self::MissingField(field) => write!(f, "placement is missing the `{field}` field"),
            Self::InvalidCoordinate(value) => {
                write!(f, "`{value}` is not a valid cell coordinate")
            }
            Self::InvalidValue(error) => write!(f, "{error}"),
        }
    }
}

impl Error for PlacementError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidValue(error) => Some(error),
            _ => None,
        }
    }
}
