//! Toolpath sequencer
//!
//! Turns a [`MachiningSet`] into a complete instruction program for the
//! two-tool panel router. The program is a fixed skeleton:
//!
//! 1. Work-offset header
//! 2. Drill block (T2): one plunge and retract per circle center
//! 3. Cut block (T1): one plunge and contour trace per polyline
//! 4. Footer: spindle stop, machine-coordinate park, program end
//!
//! Blocks 2 and 3 swap places with [`ProcessOrder::CutFirst`]. A block is
//! emitted only when its list is non-empty. Sequencing is a pure function of
//! its inputs, so equal inputs always give byte-identical programs.

use crate::filter::MachiningSet;
use crate::program::InstructionProgram;
use panelcam_core::geometry::{Circle, Point2, Polyline};
use panelcam_settings::{MachiningParameters, ProcessOrder};
use tracing::debug;

/// Tool number of the contour cutter
pub const CUTTER_TOOL: u32 = 1;
/// Tool number of the drill
pub const DRILL_TOOL: u32 = 2;
/// Feed used for every vertical plunge (mm/min)
pub const PLUNGE_FEED_RATE: f64 = 3000.0;
/// Machine-coordinate parking position (X, Y) after the program
pub const PARKING_POSITION: (f64, f64) = (100.0, 2850.0);

const WORK_OFFSET: &str = "G54";

/// Emits G-code for a machining set under fixed parameters
#[derive(Debug, Clone)]
pub struct ToolpathSequencer {
    params: MachiningParameters,
}

impl ToolpathSequencer {
    pub fn new(params: MachiningParameters) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &MachiningParameters {
        &self.params
    }

    /// Build the full program for `set`
    pub fn sequence(&self, set: &MachiningSet) -> InstructionProgram {
        let mut lines = vec![WORK_OFFSET.to_string()];

        match self.params.process_order {
            ProcessOrder::DrillFirst => {
                self.drill_block(set.circles(), &mut lines);
                self.cut_block(set.polylines(), &mut lines);
            }
            ProcessOrder::CutFirst => {
                self.cut_block(set.polylines(), &mut lines);
                self.drill_block(set.circles(), &mut lines);
            }
        }

        self.footer(&mut lines);

        debug!(
            order = %self.params.process_order,
            polylines = set.polylines().len(),
            circles = set.circles().len(),
            lines = lines.len(),
            "Sequenced program"
        );
        InstructionProgram::from_lines(lines)
    }

    fn tool_change(&self, tool: u32, spindle_speed: f64, lines: &mut Vec<String>) {
        lines.push(format!("M6 T{}", tool));
        lines.push(format!("M03 S{:.0}", spindle_speed));
        lines.push(format!("G43 H{}", tool));
        lines.push(self.retract());
    }

    fn retract(&self) -> String {
        format!("G00 Z{:.1}", self.params.safe_retract_height)
    }

    fn drill_block(&self, circles: &[Circle], lines: &mut Vec<String>) {
        if circles.is_empty() {
            return;
        }
        self.tool_change(DRILL_TOOL, self.params.drill_spindle_speed, lines);
        for circle in circles {
            lines.push(rapid_to(circle.center));
            lines.push(plunge(self.params.drill_depth));
            lines.push(self.retract());
        }
    }

    fn cut_block(&self, polylines: &[Polyline], lines: &mut Vec<String>) {
        if polylines.is_empty() {
            return;
        }
        self.tool_change(CUTTER_TOOL, self.params.cutter_spindle_speed, lines);
        for polyline in polylines {
            self.trace_contour(polyline, lines);
        }
    }

    fn trace_contour(&self, polyline: &Polyline, lines: &mut Vec<String>) {
        let points = polyline.points();
        let (first, rest) = match points.split_first() {
            Some(split) if points.len() >= 2 => split,
            _ => return,
        };

        lines.push(rapid_to(*first));
        lines.push(plunge(self.params.cut_depth));
        for point in rest {
            lines.push(format!(
                "G01 X{:.1} Y{:.1} F{:.0}",
                point.x, point.y, self.params.feed_rate
            ));
        }
        if polyline.is_closed() && points.len() > 2 {
            // Modal feed carries over from the trace
            lines.push(format!("G01 X{:.1} Y{:.1}", first.x, first.y));
        }
        lines.push(self.retract());
    }

    fn footer(&self, lines: &mut Vec<String>) {
        let (park_x, park_y) = PARKING_POSITION;
        lines.push("M05".to_string());
        lines.push(format!("G53 X{:.1}Y{:.1}", park_x, park_y));
        lines.push("M30".to_string());
    }
}

fn rapid_to(point: Point2) -> String {
    format!("G00 X{:.1} Y{:.1}", point.x, point.y)
}

fn plunge(depth: f64) -> String {
    format!("G01 Z{:.1} F{:.0}", depth, PLUNGE_FEED_RATE)
}

/// Sequence `set` with `params`
pub fn sequence(set: &MachiningSet, params: &MachiningParameters) -> InstructionProgram {
    ToolpathSequencer::new(params.clone()).sequence(set)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_set_is_header_and_footer() {
        let program = sequence(&MachiningSet::new(), &MachiningParameters::default());
        assert_eq!(
            program.lines(),
            ["G54", "M05", "G53 X100.0Y2850.0", "M30"]
        );
    }

    #[test]
    fn test_two_point_closed_polyline_has_no_closing_move() {
        let mut set = MachiningSet::new();
        let line = Polyline::new(
            vec![Point2::new(0.0, 0.0), Point2::new(100.0, 0.0)],
            true,
        )
        .unwrap();
        assert!(set.try_add_polyline(line));

        let program = sequence(&set, &MachiningParameters::default());
        let moves: Vec<_> = program
            .lines()
            .iter()
            .filter(|l| l.starts_with("G01 X"))
            .collect();
        assert_eq!(moves, ["G01 X100.0 Y0.0 F12000"]);
    }

    #[test]
    fn test_speeds_render_without_decimals() {
        let mut params = MachiningParameters::default();
        params.drill_spindle_speed = 16000.0;
        let mut set = MachiningSet::new();
        set.try_add_circle(Circle::new(Point2::new(10.0, 10.0), 5.0));

        let program = sequence(&set, &params);
        assert!(program.lines().iter().any(|l| l == "M03 S16000"));
    }
}
