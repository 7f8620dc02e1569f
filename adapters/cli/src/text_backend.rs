//! Headless rendering backend that steps a fixed number of frames and can
//! print the final scene as text.

use std::{
    io::{self, Write},
    time::Duration,
};

use anyhow::Result;
use log::trace;
use signal_grid_core::{ElementKind, LanePosition};
use signal_grid_rendering::{FrameInput, Presentation, RenderingBackend, Scene};

const GRID_FILL: char = '.';
const LANE_FILL: char = '-';
const PATH_MARK: char = '*';

/// Backend that runs without a window.
#[derive(Clone, Copy, Debug)]
pub(crate) struct TextBackend {
    frames: u32,
    frame_time: Duration,
    print_frame: bool,
}

impl TextBackend {
    pub(crate) const fn new(frames: u32, frame_time: Duration, print_frame: bool) -> Self {
        Self {
            frames,
            frame_time,
            print_frame,
        }
    }
}

impl RenderingBackend for TextBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene),
    {
        let Presentation {
            window_title,
            scene,
            ..
        } = presentation;
        let mut scene = scene;

        for frame in 0..self.frames {
            update_scene(self.frame_time, FrameInput::default(), &mut scene);
            trace!("frame {frame} captured {} signals", scene.signals.len());
        }

        if self.print_frame {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{window_title}")?;
            write!(stdout, "{}", render_text(&scene))?;
        }
        Ok(())
    }
}

/// Renders the output lane, the grid and the input lane, one line per row.
pub(crate) fn render_text(scene: &Scene) -> String {
    let columns = usize::try_from(scene.grid.columns).unwrap_or(0);
    let rows = i32::try_from(scene.grid.rows).unwrap_or(0);
    let mut canvas: Vec<Vec<char>> = (-1..=rows)
        .map(|y| {
            let fill = if y < 0 || y == rows { LANE_FILL } else { GRID_FILL };
            vec![fill; columns]
        })
        .collect();

    for path in &scene.paths {
        for point in &path.points {
            if let Some(slot) = scene
                .mapper
                .lane_at(*point)
                .and_then(|lane| slot_mut(&mut canvas, lane))
            {
                if *slot == GRID_FILL || *slot == LANE_FILL {
                    *slot = PATH_MARK;
                }
            }
        }
    }

    for cell in &scene.cells {
        if let Some(slot) = slot_mut(&mut canvas, LanePosition::from(cell.cell)) {
            *slot = match (cell.element, cell.arrow) {
                (Some(element), _) => element_glyph(element),
                (None, Some(arrow)) => arrow.glyph(),
                (None, None) => *slot,
            };
        }
    }

    for signal in &scene.signals {
        if let Some(slot) = slot_mut(&mut canvas, signal.lane) {
            *slot = char::from_digit(u32::from(signal.number), 10).unwrap_or('?');
        }
    }

    let mut text = String::new();
    for (y, line) in (-1..=rows).zip(canvas) {
        let label = match y {
            -1 => "out".to_owned(),
            y if y == rows => "in".to_owned(),
            y => y.to_string(),
        };
        let line: String = line.into_iter().collect();
        text.push_str(&format!("{label:>3} |{line}|\n"));
    }
    text
}

fn slot_mut(canvas: &mut [Vec<char>], lane: LanePosition) -> Option<&mut char> {
    let row = usize::try_from(lane.y().checked_add(1)?).ok()?;
    let column = usize::try_from(lane.x()).ok()?;
    canvas.get_mut(row)?.get_mut(column)
}

fn element_glyph(element: ElementKind) -> char {
    match element {
        ElementKind::Convert => '#',
        ElementKind::Sync => 'S',
        ElementKind::Pause(_) => 'P',
    }
}
