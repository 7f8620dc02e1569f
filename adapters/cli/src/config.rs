//! Simulation settings loaded from TOML and refined by command-line flags.

use std::{fs, path::Path, time::Duration};

use anyhow::{ensure, Context, Result};
use serde::Deserialize;
use signal_grid_core::MIN_BOARD_COLUMNS;
use signal_grid_rendering::CoordMapper;
use signal_grid_session::{SessionConfig, DEFAULT_TICK_INTERVAL};
use signal_grid_system_spawning::Config as SpawningConfig;

use crate::placement::{ArrowPlacement, ElementPlacement};

/// Settings that shape a headless simulation run.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct SimulationConfig {
    pub(crate) columns: u32,
    pub(crate) rows: u32,
    pub(crate) tick_interval_ms: u64,
    pub(crate) seed: u64,
    pub(crate) spawning: bool,
    pub(crate) cell_size: f32,
    pub(crate) margin: f32,
    pub(crate) arrows: Vec<ArrowPlacement>,
    pub(crate) elements: Vec<ElementPlacement>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            columns: 9,
            rows: 9,
            tick_interval_ms: u64::try_from(DEFAULT_TICK_INTERVAL.as_millis()).unwrap_or(500),
            seed: 0x5157_4e41_4c47_5249,
            spawning: true,
            cell_size: CoordMapper::DEFAULT_CELL_SIZE,
            margin: CoordMapper::DEFAULT_MARGIN,
            arrows: Vec::new(),
            elements: Vec::new(),
        }
    }
}

impl SimulationConfig {
    /// Reads a configuration file, falling back to defaults for missing keys.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    pub(crate) fn parse(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        ensure!(
            self.columns >= MIN_BOARD_COLUMNS,
            "columns must be at least {MIN_BOARD_COLUMNS} so the input queue fits"
        );
        ensure!(self.rows > 0, "rows must be positive");
        ensure!(self.tick_interval_ms > 0, "tick_interval_ms must be positive");
        Ok(())
    }

    pub(crate) fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub(crate) fn session_config(&self) -> SessionConfig {
        let spawning = if self.spawning {
            SpawningConfig::new(self.seed)
        } else {
            SpawningConfig::disabled()
        };
        SessionConfig::new(self.columns, self.rows, spawning)
            .with_tick_interval(self.tick_interval())
    }

    pub(crate) fn mapper(&self) -> Result<CoordMapper> {
        CoordMapper::new(self.columns, self.rows, self.cell_size, self.margin)
            .context("invalid canvas layout")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use signal_grid_core::{CellCoord, Direction, ElementKind};

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let config = SimulationConfig::parse("rows = 5\nspawning = false\n").expect("valid config");
        assert_eq!(config.rows, 5);
        assert_eq!(config.columns, 9);
        assert!(!config.spawning);
        assert_eq!(config.tick_interval(), Duration::from_millis(500));
        assert!(!config.session_config().spawning.is_enabled());
    }

    #[test]
    fn rejects_unknown_keys_and_narrow_boards() {
        assert!(SimulationConfig::parse("speed = 3").is_err());
        assert!(SimulationConfig::parse("columns = 0").is_err());

        let error = SimulationConfig::parse("columns = 2").expect_err("too narrow");
        assert!(error.to_string().contains("at least 3"));
        assert!(SimulationConfig::parse("columns = 3").is_ok());
    }

    #[test]
    fn placements_load_from_tables() {
        let config = SimulationConfig::parse(
            r#"
            [[arrows]]
            cell = { column = 3, row = 3 }
            arrow = "right"

            [[elements]]
            cell = { column = 5, row = 5 }
            element = { pause = 2 }

            [[elements]]
            cell = { column = 1, row = 4 }
            element = "convert"
            "#,
        )
        .expect("valid config");

        assert_eq!(
            config.arrows,
            vec![ArrowPlacement {
                cell: CellCoord::new(3, 3),
                arrow: Direction::Right,
            }]
        );
        assert_eq!(
            config.elements,
            vec![
                ElementPlacement {
                    cell: CellCoord::new(5, 5),
                    element: ElementKind::Pause(2),
                },
                ElementPlacement {
                    cell: CellCoord::new(1, 4),
                    element: ElementKind::Convert,
                },
            ]
        );
    }

    #[test]
    fn unknown_tools_in_tables_are_rejected() {
        assert!(SimulationConfig::parse(
            "[[elements]]\ncell = { column = 1, row = 1 }\nelement = \"teleport\"\n"
        )
        .is_err());
        assert!(SimulationConfig::parse(
            "[[arrows]]\ncell = { column = 1, row = 1 }\narrow = \"north\"\n"
        )
        .is_err());
    }

    #[test]
    fn invalid_canvas_layout_is_reported() {
        let config = SimulationConfig {
            cell_size: 0.0,
            ..SimulationConfig::default()
        };
        let error = config.mapper().expect_err("zero cell size is invalid");
        assert!(format!("{error:#}").contains("cell size must be positive"));
    }
}
