//! Smoothed frame through which a layout is viewed

use bevy::math::DVec2;
use std::f64::consts::PI;

/// Center, rotation and scale of the view onto a layout.
///
/// A frame belongs to one [`LayoutSolver`](super::LayoutSolver) at a time.
/// Handing it to the solver of the next exploration keeps the view steady
/// when the graph is rebuilt.
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct ViewFrame {
	pub center: DVec2,
	pub angle: f64,
	/// Extent of the graph along its main axis, in average edge lengths
	pub diameter: f64,
	/// Set once a layout seen through this frame has stabilized
	pub initialized: bool,
}

/// Where the view frame should be for the current point set
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub(super) struct ViewTargets {
	pub center: DVec2,
	pub angle: f64,
	pub diameter: f64,
}

impl ViewFrame {
	pub(super) fn snap_to(&mut self, targets: ViewTargets) {
		self.center = targets.center;
		self.angle = targets.angle;
		self.diameter = targets.diameter;
	}

	/// Moves the frame the fraction `t` of the way towards its targets.
	/// The main axis has no direction, so the angle turns by less than a quarter turn.
	pub(super) fn approach(&mut self, targets: ViewTargets, t: f64) {
		self.center = self.center.lerp(targets.center, t);

		let mut target_angle = targets.angle;
		if target_angle > self.angle + PI {
			self.angle += PI * 2.0;
		}
		if target_angle < self.angle - PI {
			self.angle -= PI * 2.0;
		}
		if target_angle > self.angle + PI * 0.5 {
			target_angle -= PI;
		}
		if target_angle < self.angle - PI * 0.5 {
			target_angle += PI;
		}
		self.angle = self.angle * (1.0 - t) + target_angle * t;

		self.diameter = self.diameter * (1.0 - t) + targets.diameter * t;
	}

	/// Maps a layout point into the frame, scaled so that edges are about one unit long
	pub fn project(&self, point: DVec2, segment_length: f64) -> DVec2 {
		DVec2::from_angle(-self.angle).rotate(point - self.center) / segment_length
	}
}
