//! Arena quadtree of terrain tiles.
//!
//! Nodes live in a flat vector and refer to their children by [`NodeId`].
//! A node is either a leaf holding one tile or an internal node with exactly
//! four children, indexed `column + row * 2` within the parent quadrant.

use std::iter::FusedIterator;

use lodtiles_decode::TileCoord;

use crate::error::StructuralError;
use crate::types::TerrainTile;

/// Handle to a node of a [`TerrainQuadtree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// The root node of a non-empty tree.
    pub const ROOT: NodeId = NodeId(0);

    /// Arena index of the node.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// One node of the quadtree.
#[derive(Debug, Clone, PartialEq)]
pub enum QuadNode {
    /// A renderable tile.
    Leaf(TerrainTile),
    /// Four children in quadrant order.
    Internal([NodeId; 4]),
}

/// Quadrant slot of a cell relative to the quadrant's top-left cell.
///
/// Returns `None` if the cell lies outside the 2x2 quadrant.
#[must_use]
pub fn quadrant_index(coord: TileCoord, origin: TileCoord) -> Option<usize> {
    let column = coord.column.checked_sub(origin.column)?;
    let row = coord.row.checked_sub(origin.row)?;
    (column < 2 && row < 2).then(|| (column + row * 2) as usize)
}

/// Order four tiles into quadrant slots by their grid cell.
///
/// # Errors
///
/// Returns a [`StructuralError`] if a tile lies outside the quadrant, two
/// tiles share a slot, or a slot stays empty.
pub fn arrange_quadrant(
    tiles: Vec<TerrainTile>,
    level: u32,
    origin: TileCoord,
) -> Result<[TerrainTile; 4], StructuralError> {
    let mut slots: [Option<TerrainTile>; 4] = Default::default();

    for tile in tiles {
        let coord = tile.coord();
        let index = quadrant_index(coord, origin)
            .ok_or(StructuralError::QuadrantOutOfRange { level, coord })?;
        if slots[index].is_some() {
            return Err(StructuralError::QuadrantCollision { level, coord });
        }
        slots[index] = Some(tile);
    }

    let mut index = 0;
    let [a, b, c, d] = slots.map(|slot| {
        let coord = TileCoord::new(origin.column + index % 2, origin.row + index / 2);
        index += 1;
        slot.ok_or(StructuralError::MissingTile { level, coord })
    });
    Ok([a?, b?, c?, d?])
}

/// Quadtree of terrain tiles stored in an arena.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TerrainQuadtree {
    nodes: Vec<QuadNode>,
}

impl TerrainQuadtree {
    /// Create a tree whose root is split into four leaf tiles.
    #[must_use]
    pub fn with_root_tiles(children: [TerrainTile; 4]) -> Self {
        let mut tree = Self {
            nodes: vec![QuadNode::Internal([NodeId::ROOT; 4])],
        };
        let ids = tree.push_leaves(children);
        tree.nodes[NodeId::ROOT.0] = QuadNode::Internal(ids);
        tree
    }

    /// The root node, or `None` for an empty tree.
    #[must_use]
    pub fn root(&self) -> Option<NodeId> {
        (!self.nodes.is_empty()).then_some(NodeId::ROOT)
    }

    /// Check if the tree has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Look up a node.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&QuadNode> {
        self.nodes.get(id.0)
    }

    /// Child `quadrant` of an internal node.
    #[must_use]
    pub fn child(&self, id: NodeId, quadrant: usize) -> Option<NodeId> {
        match self.node(id)? {
            QuadNode::Internal(children) => children.get(quadrant).copied(),
            QuadNode::Leaf(_) => None,
        }
    }

    /// Tile of a leaf node.
    #[must_use]
    pub fn tile(&self, id: NodeId) -> Option<&TerrainTile> {
        match self.node(id)? {
            QuadNode::Leaf(tile) => Some(tile),
            QuadNode::Internal(_) => None,
        }
    }

    /// Replace a leaf with four child leaves, returning the replaced tile.
    ///
    /// # Errors
    ///
    /// Returns [`StructuralError::NotALeaf`] if `id` is not a leaf.
    pub fn subdivide(
        &mut self,
        id: NodeId,
        children: [TerrainTile; 4],
    ) -> Result<TerrainTile, StructuralError> {
        if !matches!(self.nodes.get(id.0), Some(QuadNode::Leaf(_))) {
            return Err(StructuralError::NotALeaf { node: id.0 });
        }

        let ids = self.push_leaves(children);
        match std::mem::replace(&mut self.nodes[id.0], QuadNode::Internal(ids)) {
            QuadNode::Leaf(tile) => Ok(tile),
            QuadNode::Internal(_) => Err(StructuralError::NotALeaf { node: id.0 }),
        }
    }

    /// Iterate over every leaf tile.
    ///
    /// The order is some depth-first order and is not part of the contract.
    #[must_use]
    pub fn leaves(&self) -> LeafView<'_> {
        LeafView {
            tree: self,
            stack: self.root().into_iter().collect(),
        }
    }

    fn push_leaves(&mut self, tiles: [TerrainTile; 4]) -> [NodeId; 4] {
        tiles.map(|tile| {
            self.nodes.push(QuadNode::Leaf(tile));
            NodeId(self.nodes.len() - 1)
        })
    }
}

/// Depth-first iterator over the leaf tiles of a [`TerrainQuadtree`].
///
/// Internal nodes are never yielded. Each call to
/// [`TerrainQuadtree::leaves`] starts a fresh traversal.
#[derive(Debug, Clone)]
pub struct LeafView<'a> {
    tree: &'a TerrainQuadtree,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for LeafView<'a> {
    type Item = &'a TerrainTile;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(id) = self.stack.pop() {
            match self.tree.node(id)? {
                QuadNode::Leaf(tile) => return Some(tile),
                QuadNode::Internal(children) => self.stack.extend_from_slice(children),
            }
        }
        None
    }
}

impl FusedIterator for LeafView<'_> {}
