//! Board providers
//!
//! Map data loading lives outside the engine; a provider hands the engine a
//! validated [`Board`] at game start.

use crate::board::map::Board;
use crate::board::territory::{Territory, TerritoryCategory};
use crate::core::error::Result;
use crate::core::types::TerritoryId;

/// Supplies the territories and adjacency for a new game
pub trait BoardProvider {
    fn build_board(&self) -> Result<Board>;
}

/// The 17-territory world map
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassicBoard;

impl ClassicBoard {
    /// Name and industrial output, in id order
    pub const TERRITORIES: [(&'static str, u32); 17] = [
        ("Eastern United States", 12),
        ("Western United States", 10),
        ("Central United States", 6),
        ("Canada", 3),
        ("Mexico", 2),
        ("United Kingdom", 8),
        ("Western Europe", 6),
        ("Eastern Europe", 3),
        ("Germany", 10),
        ("Russia", 8),
        ("China", 2),
        ("Japan", 8),
        ("India", 3),
        ("Australia", 2),
        ("Southeast Asia", 1),
        ("Africa", 2),
        ("South America", 3),
    ];

    /// Undirected borders; each is inserted in both directions
    pub const BORDERS: [(&'static str, &'static str); 21] = [
        ("Eastern United States", "Western United States"),
        ("Eastern United States", "Central United States"),
        ("Eastern United States", "Canada"),
        ("Western United States", "Central United States"),
        ("Western United States", "Mexico"),
        ("United Kingdom", "Western Europe"),
        ("United Kingdom", "Eastern Europe"),
        ("Western Europe", "Germany"),
        ("Eastern Europe", "Germany"),
        ("Eastern Europe", "Russia"),
        ("Russia", "China"),
        ("China", "Japan"),
        ("China", "India"),
        ("Japan", "Southeast Asia"),
        ("Japan", "Australia"),
        ("India", "Southeast Asia"),
        ("India", "Africa"),
        ("Australia", "Southeast Asia"),
        ("Southeast Asia", "Africa"),
        ("Africa", "South America"),
        ("South America", "Mexico"),
    ];

    fn index_of(name: &str) -> Option<usize> {
        Self::TERRITORIES.iter().position(|(n, _)| *n == name)
    }
}

impl BoardProvider for ClassicBoard {
    fn build_board(&self) -> Result<Board> {
        let mut territories: Vec<Territory> = Self::TERRITORIES
            .iter()
            .enumerate()
            .map(|(i, (name, output))| {
                Territory::new(TerritoryId(i as u32), *name)
                    .with_output(*output)
                    .with_category(TerritoryCategory::Land)
            })
            .collect();

        for (a, b) in Self::BORDERS {
            if let (Some(i), Some(j)) = (Self::index_of(a), Self::index_of(b)) {
                territories[i].add_adjacent(TerritoryId(j as u32));
                territories[j].add_adjacent(TerritoryId(i as u32));
            }
        }

        Board::new(territories)
    }
}
