// src/diagram/water.rs
//! Классификация океана, озёр и побережья
//!
//! Океан — связная вода, достижимая от границы карты; остальная вода — озёра.
//! Побережье — суша, граничащая с океаном.

use std::collections::VecDeque;

use crate::biome::BiomeType;
use crate::diagram::{NO_INDEX, SITE_CARDINALS, TilesDiagram};

/// Раскладывает воду на океан и озёра, помечает побережье
///
/// Тайл считается водным, если он посеян океаном (его водный угол лежит на
/// границе карты) или как минимум `lake_threshold` из четырёх его углов —
/// вода. Океан разливается от границы по водным тайлам (4-связность); водные
/// тайлы вне разлива остаются озёрами.
pub(crate) fn assign_ocean_coast_and_land(diagram: &mut TilesDiagram, lake_threshold: u32) {
    // Водность тайлов по их углам; граничная вода сеет океан
    let mut queue = VecDeque::new();
    for i in 0..diagram.sites.len() {
        let mut site = diagram.sites[i];
        let mut num_water = 0;
        for corner_index in site.corners {
            let corner = diagram.corners[corner_index as usize];
            if corner.water {
                if corner.border && site.biome != BiomeType::Ocean {
                    site.biome = BiomeType::Ocean;
                    queue.push_back(i);
                }
                num_water += 1;
            }
        }
        site.water = site.biome == BiomeType::Ocean || num_water >= lake_threshold;
        diagram.sites[i] = site;
    }

    // Разлив океана по кардинальным водным соседям
    while let Some(index) = queue.pop_front() {
        let site = diagram.sites[index];
        for slot in SITE_CARDINALS {
            let adjacent_index = site.neighbors[slot];
            if adjacent_index == NO_INDEX {
                continue;
            }
            let mut adjacent = diagram.sites[adjacent_index as usize];
            if adjacent.water && adjacent.biome != BiomeType::Ocean {
                adjacent.biome = BiomeType::Ocean;
                diagram.sites[adjacent_index as usize] = adjacent;
                queue.push_back(adjacent_index as usize);
            }
        }
    }
    log::debug!(
        "океанских тайлов: {}, озёрных: {}",
        diagram
            .sites
            .iter()
            .filter(|s| s.biome == BiomeType::Ocean)
            .count(),
        diagram
            .sites
            .iter()
            .filter(|s| s.water && s.biome != BiomeType::Ocean)
            .count()
    );

    // Побережье тайлов: рядом есть и океан, и суша (вся окрестность 3×3)
    for i in 0..diagram.sites.len() {
        let mut site = diagram.sites[i];
        let mut num_ocean = 0;
        let mut num_land = 0;
        for adjacent_index in site.neighbors {
            if adjacent_index == NO_INDEX {
                continue;
            }
            let adjacent = diagram.sites[adjacent_index as usize];
            if adjacent.biome == BiomeType::Ocean {
                num_ocean += 1;
            }
            if !adjacent.water {
                num_land += 1;
            }
        }
        site.coast = num_ocean > 0 && num_land > 0;
        diagram.sites[i] = site;
    }

    // Побережье углов по прилегающим тайлам; отсутствующий тайл считается океаном
    for i in 0..diagram.corners.len() {
        let mut corner = diagram.corners[i];
        let mut num_ocean = 0;
        let mut num_land = 0;
        for adjacent_index in corner.sites {
            if adjacent_index == NO_INDEX {
                num_ocean += 1;
                continue;
            }
            let adjacent = diagram.sites[adjacent_index as usize];
            if adjacent.biome == BiomeType::Ocean {
                num_ocean += 1;
            }
            if !adjacent.water {
                num_land += 1;
            }
        }
        if num_ocean == 4 {
            corner.biome = BiomeType::Ocean;
        }
        corner.coast = num_ocean > 0 && num_land > 0;
        corner.water = num_land != 4 && !corner.coast;
        diagram.corners[i] = corner;
    }
}
