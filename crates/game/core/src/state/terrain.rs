use crate::state::Card;

/// Closed set of tile terrains.
///
/// `Edge` exists only on the out-of-bounds sentinel tile; map generation
/// never places it.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Terrain {
    Forest,
    Farm,
    City,
    Laboratory,
    Edge,
}

/// Resource yield of a terrain: which card it grants and how many per tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TerrainReward {
    pub card: Card,
    pub amount: usize,
}

impl Terrain {
    /// Terrains eligible for random map generation.
    pub const GENERATABLE: [Terrain; 4] = [
        Terrain::Forest,
        Terrain::Farm,
        Terrain::City,
        Terrain::Laboratory,
    ];

    /// Process-wide constant resource table. `Edge` yields nothing.
    pub const fn reward(self) -> Option<TerrainReward> {
        match self {
            Terrain::Forest => Some(TerrainReward {
                card: Card::Wood,
                amount: 2,
            }),
            Terrain::Farm => Some(TerrainReward {
                card: Card::Food,
                amount: 1,
            }),
            Terrain::City => Some(TerrainReward {
                card: Card::Weapon,
                amount: 1,
            }),
            Terrain::Laboratory => Some(TerrainReward {
                card: Card::Research,
                amount: 1,
            }),
            Terrain::Edge => None,
        }
    }
}
