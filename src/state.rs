//! Snapshots of the dynamic parts of a puzzle

use crate::puzzle::ItemKind;
use itertools::Itertools as _;

/// Values of all dynamic elements and locations of all items.
///
/// Element values are stored in the order of
/// [`Puzzle::dynamic_elements`](crate::puzzle::Puzzle::dynamic_elements),
/// item locations are node indices in the order of
/// [`Puzzle::items`](crate::puzzle::Puzzle::items).
/// Equality of this type is representational,
/// use [`PuzzleState::key`] to compare states semantically.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Default)]
pub struct PuzzleState {
	element_values: Vec<bool>,
	item_nodes: Vec<usize>,
}

/// Canonical form of a [`PuzzleState`].
///
/// Element values keep their order, because a toggle on in node 1 and off in node 2
/// differs from the opposite. Items are sorted by kind and location,
/// because a ball in node 1 and a ball in node 2 is the same as the other way around.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct StateKey {
	element_values: Vec<bool>,
	items: Vec<(ItemKind, usize)>,
}

impl PuzzleState {
	pub fn new(element_values: Vec<bool>, item_nodes: Vec<usize>) -> Self {
		Self {
			element_values,
			item_nodes,
		}
	}

	pub fn element_values(&self) -> &[bool] {
		&self.element_values
	}

	pub fn item_nodes(&self) -> &[usize] {
		&self.item_nodes
	}

	pub fn element_value(&self, index: usize) -> Option<bool> {
		self.element_values.get(index).copied()
	}

	pub fn set_element_value(&mut self, index: usize, value: bool) {
		if let Some(slot) = self.element_values.get_mut(index) {
			*slot = value;
		}
	}

	pub fn item_node(&self, index: usize) -> Option<usize> {
		self.item_nodes.get(index).copied()
	}

	pub fn set_item_node(&mut self, index: usize, node: usize) {
		if let Some(slot) = self.item_nodes.get_mut(index) {
			*slot = node;
		}
	}

	/// Builds the canonical key, `item_kinds` lists the kind of every item in order
	pub fn key(&self, item_kinds: &[ItemKind]) -> StateKey {
		StateKey {
			element_values: self.element_values.clone(),
			items: item_kinds
				.iter()
				.copied()
				.zip(self.item_nodes.iter().copied())
				.sorted_unstable()
				.collect(),
		}
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn interchangeable_items_share_a_key() {
		let kinds = [ItemKind::Player, ItemKind::Ball, ItemKind::Ball];
		let a = PuzzleState::new(vec![true, false], vec![0, 1, 2]);
		let b = PuzzleState::new(vec![true, false], vec![0, 2, 1]);
		assert_ne!(a, b);
		assert_eq!(a.key(&kinds), b.key(&kinds));
	}

	#[test]
	fn items_of_different_kinds_are_not_interchangeable() {
		let kinds = [ItemKind::Player, ItemKind::Ball];
		let a = PuzzleState::new(vec![], vec![0, 1]);
		let b = PuzzleState::new(vec![], vec![1, 0]);
		assert_ne!(a.key(&kinds), b.key(&kinds));
	}

	#[test]
	fn element_order_matters() {
		let a = PuzzleState::new(vec![true, false], vec![]);
		let b = PuzzleState::new(vec![false, true], vec![]);
		assert_ne!(a.key(&[]), b.key(&[]));
	}

	#[test]
	fn out_of_range_access_is_ignored() {
		let mut state = PuzzleState::new(vec![false], vec![3]);
		state.set_element_value(5, true);
		state.set_item_node(2, 0);
		assert_eq!(state.element_value(5), None);
		assert_eq!(state.item_node(2), None);
		assert_eq!(state, PuzzleState::new(vec![false], vec![3]));
	}
}
