//! Element kinds and the movement rules they impose

/// Whether an element sits on a node or on an edge
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Placement {
	Node,
	Edge,
}

/// Every kind of element a puzzle node or edge can hold
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum ElementKind {
	/// Behavior of a node that holds no element
	DefaultNode,
	/// The puzzle is solved when all players stand on goals. Balls can't be brought here.
	Goal,
	/// Pressed by a player or ball standing on it. Stays on once pressed.
	Button,
	/// On while a ball lies on it, off otherwise.
	Plate,
	/// Flipped by a player standing on it, or from an adjacent node that can see it.
	Toggle,
	/// Walkable only while on. Balls can't be brought here.
	Bridge,
	/// Behavior of an edge that holds no element
	DefaultEdge,
	/// Balls can be brought or pushed one way only. No vision.
	Step,
	/// The player can jump down the steep side or push a ball down.
	/// The other way needs a ball to climb on, which stays behind. No vision.
	Wall,
	/// Players and balls go one way only. No vision.
	OneWay,
	/// Balls can't pass. No vision.
	NoBall,
	/// Vision only, nothing can pass.
	Vision,
	/// While open, lets players, balls and vision through.
	Gate,
	/// While active, players can only pass by bringing a ball for protection.
	BlockableHazard,
	/// Balls can be pushed through, players can't pass.
	BallTrack,
}

/// What a capability test may observe about a single crossing
/// from an origin node A to a destination node B
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Crossing {
	/// True if the crossing goes from the A side of the edge to its B side
	pub forward: bool,
	/// Current value of the element being asked, `false` for static elements
	pub value: bool,
	/// True if at least one ball lies on the origin node
	pub origin_has_ball: bool,
}

/// Which items stand on the node of a trigger element
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Occupancy {
	pub has_player: bool,
	pub has_ball: bool,
}

impl ElementKind {
	pub const ALL: [ElementKind; 15] = [
		Self::DefaultNode,
		Self::Goal,
		Self::Button,
		Self::Plate,
		Self::Toggle,
		Self::Bridge,
		Self::DefaultEdge,
		Self::Step,
		Self::Wall,
		Self::OneWay,
		Self::NoBall,
		Self::Vision,
		Self::Gate,
		Self::BlockableHazard,
		Self::BallTrack,
	];

	pub fn placement(self) -> Placement {
		match self {
			Self::DefaultNode
			| Self::Goal
			| Self::Button
			| Self::Plate
			| Self::Toggle
			| Self::Bridge => Placement::Node,
			Self::DefaultEdge
			| Self::Step
			| Self::Wall
			| Self::OneWay
			| Self::NoBall
			| Self::Vision
			| Self::Gate
			| Self::BlockableHazard
			| Self::BallTrack => Placement::Edge,
		}
	}

	/// Triggers change their own value and notify receivers
	pub fn is_trigger(self) -> bool {
		matches!(self, Self::Button | Self::Plate | Self::Toggle)
	}

	/// Receivers follow the triggers that notify them
	pub fn is_receiver(self) -> bool {
		matches!(self, Self::Bridge | Self::Gate | Self::BlockableHazard)
	}

	/// Dynamic elements carry a boolean value in every puzzle state
	pub fn is_dynamic(self) -> bool {
		self.is_trigger() || self.is_receiver()
	}

	pub fn can_walk(self, crossing: Crossing) -> bool {
		match self {
			Self::Bridge | Self::Gate | Self::BlockableHazard => crossing.value,
			Self::Wall => crossing.forward || crossing.origin_has_ball,
			Self::OneWay => crossing.forward,
			Self::Vision | Self::BallTrack => false,
			_ => true,
		}
	}

	pub fn can_take_ball(self, crossing: Crossing) -> bool {
		match self {
			Self::Goal | Self::Bridge | Self::NoBall | Self::Vision | Self::BallTrack => false,
			Self::Step | Self::Wall | Self::OneWay => crossing.forward,
			Self::Gate => crossing.value,
			_ => true,
		}
	}

	/// Nodes accept a pushed ball whenever they accept a carried one.
	/// Edges refuse pushing unless their kind explicitly allows it,
	/// which keeps pushable balls from multiplying the state space.
	pub fn can_push_ball(self, crossing: Crossing) -> bool {
		match self {
			Self::Step | Self::Wall | Self::OneWay => crossing.forward,
			Self::BallTrack => true,
			_ => match self.placement() {
				Placement::Node => self.can_take_ball(crossing),
				Placement::Edge => false,
			},
		}
	}

	pub fn can_see(self, crossing: Crossing) -> bool {
		match self {
			Self::Step | Self::Wall | Self::OneWay | Self::NoBall => false,
			Self::Gate => crossing.value,
			_ => true,
		}
	}

	/// Derives the value a trigger takes from the items standing on its node.
	/// `None` leaves the current value untouched.
	pub fn update_state(self, occupancy: Occupancy) -> Option<bool> {
		match self {
			Self::Button => (occupancy.has_player || occupancy.has_ball).then_some(true),
			Self::Plate => Some(occupancy.has_ball),
			_ => None,
		}
	}

	pub fn name(self) -> &'static str {
		match self {
			Self::DefaultNode => "DefaultNode",
			Self::Goal => "Goal",
			Self::Button => "Button",
			Self::Plate => "Plate",
			Self::Toggle => "Toggle",
			Self::Bridge => "Bridge",
			Self::DefaultEdge => "DefaultEdge",
			Self::Step => "Step",
			Self::Wall => "Wall",
			Self::OneWay => "OneWay",
			Self::NoBall => "NoBall",
			Self::Vision => "Vision",
			Self::Gate => "Gate",
			Self::BlockableHazard => "BlockableHazard",
			Self::BallTrack => "BallTrack",
		}
	}

	pub fn from_name(name: &str) -> Option<Self> {
		Self::ALL.into_iter().find(|kind| kind.name() == name)
	}

	/// Human-readable description of a dynamic value of this kind
	pub fn describe_value(self, value: bool) -> &'static str {
		match (self, value) {
			(Self::Bridge, true) => "Safe",
			(Self::Bridge, false) => "Hole",
			(Self::Gate, true) => "Open",
			(Self::Gate, false) => "Closed",
			(Self::BlockableHazard, true) => "Safe",
			(Self::BlockableHazard, false) => "Hazard",
			(_, true) => "On",
			(_, false) => "Off",
		}
	}
}

impl std::fmt::Display for ElementKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.name())
	}
}
