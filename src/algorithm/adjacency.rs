//! Adjacency compilation from tile and neighbor declarations
//!
//! Expands every tile into its symmetry-distinct orientations, assigns them
//! dense ids, and turns each raw neighbor declaration into the full set of
//! oriented pairs obtained by rotating and reflecting both sides together.

use crate::{
    algorithm::bitset::TileBitset,
    io::configuration::MAX_VARIANT_INDEX,
    io::error::{AlgorithmError, Result, invalid_parameter, invalid_source},
    spatial::symmetry::{Direction, GROUP_ORDER, SymmetryClass},
};
use std::collections::HashMap;

/// Validated tile record consumed by the compiler
#[derive(Clone, Debug, PartialEq)]
pub struct TileSpec {
    /// Name used by neighbor declarations
    pub name: String,
    /// Orbit type under rotation and reflection
    pub symmetry: SymmetryClass,
    /// Positive relative frequency, shared by every orientation
    pub weight: f64,
}

impl TileSpec {
    /// Validate raw tile fields
    ///
    /// A missing weight defaults to 1.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The symmetry string is not a recognized class
    /// - The weight is not a positive finite number
    pub fn new(name: impl Into<String>, symmetry: &str, weight: Option<f64>) -> Result<Self> {
        let weight = weight.unwrap_or(1.0);
        if !weight.is_finite() || weight <= 0.0 {
            return Err(invalid_parameter(
                "weight",
                &weight,
                &"tile weights must be positive and finite",
            ));
        }

        Ok(Self {
            name: name.into(),
            symmetry: SymmetryClass::parse(symmetry)?,
            weight,
        })
    }
}

/// Which way a raw neighbor declaration is laid out
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Axis {
    /// The first tile sits immediately left of the second
    #[default]
    Horizontal,
    /// The first tile sits immediately above the second
    Vertical,
}

/// Raw neighbor declaration between two tile orientations
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NeighborSpec {
    /// Left (or top) tile name
    pub left: String,
    /// Orientation index applied to the left tile
    pub left_variant: usize,
    /// Right (or bottom) tile name
    pub right: String,
    /// Orientation index applied to the right tile
    pub right_variant: usize,
    /// Layout of the pair
    pub axis: Axis,
}

impl NeighborSpec {
    /// Declare `left` immediately left of `right`
    pub fn horizontal(
        left: impl Into<String>,
        left_variant: usize,
        right: impl Into<String>,
        right_variant: usize,
    ) -> Self {
        Self {
            left: left.into(),
            left_variant,
            right: right.into(),
            right_variant,
            axis: Axis::Horizontal,
        }
    }

    /// Declare `top` immediately above `bottom`
    pub fn vertical(
        top: impl Into<String>,
        top_variant: usize,
        bottom: impl Into<String>,
        bottom_variant: usize,
    ) -> Self {
        Self {
            left: top.into(),
            left_variant: top_variant,
            right: bottom.into(),
            right_variant: bottom_variant,
            axis: Axis::Vertical,
        }
    }
}

/// One orientation of one tile
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct OrientedTile {
    /// Index into the declared tile list
    pub tile: usize,
    /// Orientation index within the tile's orbit
    pub orientation: usize,
}

/// Immutable oriented-tile table and per-direction compatibility
///
/// `compatible(d, a, b)` holds when oriented tile `b` may occupy the neighbor
/// in direction `d` of a cell holding `a`. The relation is closed under the
/// square's symmetry group and under direction reversal.
#[derive(Clone, Debug)]
pub struct CompiledRules {
    tiles: Vec<TileSpec>,
    oriented: Vec<OrientedTile>,
    weights: Vec<f64>,
    first_ids: Vec<usize>,
    actions: Vec<[usize; GROUP_ORDER]>,
    compatibility: Vec<Vec<TileBitset>>,
    partners: Vec<Vec<Vec<usize>>>,
}

impl CompiledRules {
    /// Compile tiles and neighbor declarations
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The tile list is empty or contains a duplicate name
    /// - A neighbor references an unknown tile name
    /// - A neighbor variant index exceeds the orientation group
    pub fn compile(tiles: Vec<TileSpec>, neighbors: &[NeighborSpec]) -> Result<Self> {
        if tiles.is_empty() {
            return Err(invalid_source(&"tile set contains no tiles"));
        }

        let mut first_occurrence: HashMap<String, usize> = HashMap::new();
        let mut oriented = Vec::new();
        let mut weights = Vec::new();
        let mut first_ids = Vec::with_capacity(tiles.len());
        let mut actions = Vec::new();

        for (index, tile) in tiles.iter().enumerate() {
            let base = oriented.len();
            if first_occurrence.insert(tile.name.clone(), base).is_some() {
                return Err(invalid_source(&format!(
                    "tile '{}' is declared more than once",
                    tile.name
                )));
            }
            first_ids.push(base);

            for orientation in 0..tile.symmetry.cardinality() {
                oriented.push(OrientedTile {
                    tile: index,
                    orientation,
                });
                weights.push(tile.weight);
                actions.push(tile.symmetry.orbit(orientation).map(|image| base + image));
            }
        }

        let count = oriented.len();
        let mut compatibility = vec![vec![TileBitset::new(count); count]; Direction::COUNT];

        for neighbor in neighbors {
            let first = resolve(
                &first_occurrence,
                &actions,
                &neighbor.left,
                neighbor.left_variant,
            )?;
            let second = resolve(
                &first_occurrence,
                &actions,
                &neighbor.right,
                neighbor.right_variant,
            )?;
            let direction = match neighbor.axis {
                Axis::Horizontal => Direction::Right,
                Axis::Vertical => Direction::Down,
            };

            for element in 0..GROUP_ORDER {
                let (Some(a), Some(b)) = (
                    image_under(&actions, first, element),
                    image_under(&actions, second, element),
                ) else {
                    continue;
                };
                let forward = direction.transformed(element);
                insert_pair(&mut compatibility, forward, a, b);
                insert_pair(&mut compatibility, forward.opposite(), b, a);
            }
        }

        let partners = compatibility
            .iter()
            .map(|per_tile| per_tile.iter().map(TileBitset::to_vec).collect())
            .collect();

        Ok(Self {
            tiles,
            oriented,
            weights,
            first_ids,
            actions,
            compatibility,
            partners,
        })
    }

    /// Number of oriented tiles (size of the id space)
    pub fn oriented_count(&self) -> usize {
        self.oriented.len()
    }

    /// Declared tiles in input order
    pub fn tiles(&self) -> &[TileSpec] {
        &self.tiles
    }

    /// All oriented tiles indexed by id
    pub fn oriented_tiles(&self) -> &[OrientedTile] {
        &self.oriented
    }

    /// Oriented tile for an id
    pub fn oriented(&self, id: usize) -> Option<OrientedTile> {
        self.oriented.get(id).copied()
    }

    /// Weight of every oriented tile indexed by id
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Weight of one oriented tile, 0 for unknown ids
    pub fn weight(&self, id: usize) -> f64 {
        self.weights.get(id).copied().unwrap_or(0.0)
    }

    /// Id of a tile name in a given orientation
    pub fn id_of(&self, name: &str, orientation: usize) -> Option<usize> {
        let index = self.tiles.iter().position(|tile| tile.name == name)?;
        let tile = self.tiles.get(index)?;
        if orientation >= tile.symmetry.cardinality() {
            return None;
        }
        self.first_ids.get(index).map(|base| base + orientation)
    }

    /// Images of an oriented tile under the eight group elements
    pub fn action(&self, id: usize) -> Option<&[usize; GROUP_ORDER]> {
        self.actions.get(id)
    }

    /// Whether `b` may sit in direction `direction` of `a`
    pub fn compatible(&self, direction: Direction, a: usize, b: usize) -> bool {
        self.compatibility(direction, a).is_some_and(|set| set.contains(b))
    }

    /// Bitset of tiles allowed in direction `direction` of `id`
    pub fn compatibility(&self, direction: Direction, id: usize) -> Option<&TileBitset> {
        self.compatibility
            .get(direction.index())
            .and_then(|per_tile| per_tile.get(id))
    }

    /// Sorted ids allowed in direction `direction` of `id`
    pub fn partners(&self, direction: Direction, id: usize) -> &[usize] {
        self.partners
            .get(direction.index())
            .and_then(|per_tile| per_tile.get(id))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Human-readable label such as `corner#2`
    pub fn label(&self, id: usize) -> String {
        self.oriented(id)
            .and_then(|oriented| {
                self.tiles
                    .get(oriented.tile)
                    .map(|tile| format!("{}#{}", tile.name, oriented.orientation))
            })
            .unwrap_or_else(|| format!("<{id}>"))
    }
}

/// Map a declared (name, variant) to its oriented id
fn resolve(
    first_occurrence: &HashMap<String, usize>,
    actions: &[[usize; GROUP_ORDER]],
    name: &str,
    variant: usize,
) -> Result<usize> {
    let base = first_occurrence
        .get(name)
        .copied()
        .ok_or_else(|| AlgorithmError::UnknownTile {
            name: name.to_string(),
        })?;
    if variant > MAX_VARIANT_INDEX {
        return Err(invalid_parameter(
            "variant",
            &variant,
            &format!("orientation indices range over 0..={MAX_VARIANT_INDEX}"),
        ));
    }
    image_under(actions, base, variant).ok_or(AlgorithmError::InvalidTileIndex {
        index: base,
        max_tiles: actions.len(),
    })
}

fn image_under(actions: &[[usize; GROUP_ORDER]], id: usize, element: usize) -> Option<usize> {
    actions.get(id).and_then(|images| images.get(element)).copied()
}

fn insert_pair(compatibility: &mut [Vec<TileBitset>], direction: Direction, a: usize, b: usize) {
    if let Some(set) = compatibility
        .get_mut(direction.index())
        .and_then(|per_tile| per_tile.get_mut(a))
    {
        set.insert(b);
    }
}
