// src/diagram/elevation.rs
//! Высоты углов и регионов
//!
//! Три стадии:
//! 1. Релаксация от воды: каждый угол получает высоту от графового расстояния
//!    до ближайшего водного угла, так что из любого угла существует
//!    невозрастающий путь к воде (без локальных минимумов)
//! 2. Перераспределение по рангу: низины становятся типичнее возвышенностей,
//!    обратная функция к `y = 1 - (1-x)²`
//! 3. Высоты регионов: суша — среднее четырёх углов, океан — затухающая
//!    заливка от побережья вглубь

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use std::collections::VecDeque;

use crate::biome::BiomeType;
use crate::diagram::{DiagramError, NO_INDEX, SITE_CARDINALS, TilesDiagram};
use crate::land_shape::LandShape;

/// Релаксация высот углов от водных источников
///
/// Водные углы (по классификатору суши) стартуют с высоты 0, остальные — с
/// `+inf`. Пока рабочий список не пуст, сосед перезаписывается кандидатом
/// `0.01 + высота`, с надбавкой `1 (+ U(0,1) при extra_randomness)`, если оба
/// конца — суша. Высота вдоль цепочки обновлений строго растёт, поэтому
/// процесс завершается.
pub(crate) fn assign_corner_elevations(
    diagram: &mut TilesDiagram,
    shape: &mut LandShape,
    rng: &mut ChaCha8Rng,
    extra_randomness: bool,
) -> Result<(), DiagramError> {
    let mut queue = VecDeque::new();
    for i in 0..diagram.corners.len() {
        let mut corner = diagram.corners[i];
        corner.water = !shape.is_land(corner.point.0, corner.point.1);
        if corner.water {
            corner.elevation = 0.0;
            queue.push_back(i);
        } else {
            corner.elevation = f32::INFINITY;
        }
        diagram.corners[i] = corner;
    }
    // Вырожденная карта без воды оставила бы +inf во всех углах
    if queue.is_empty() {
        return Err(DiagramError::NoWaterSource);
    }
    log::debug!("водных углов-источников: {}", queue.len());

    while let Some(index) = queue.pop_front() {
        let corner = diagram.corners[index];
        for adjacent_index in corner.neighbors {
            if adjacent_index == NO_INDEX {
                continue;
            }
            let mut adjacent = diagram.corners[adjacent_index as usize];
            let mut new_elevation = 0.01 + corner.elevation;
            if !corner.water && !adjacent.water {
                new_elevation += 1.0;
                if extra_randomness {
                    new_elevation += rng.gen_range(0.0..1.0);
                }
            }
            // Угол изменился — кладём обратно, чтобы обработать и его соседей
            if new_elevation < adjacent.elevation {
                adjacent.elevation = new_elevation;
                diagram.corners[adjacent_index as usize] = adjacent;
                queue.push_back(adjacent_index as usize);
            }
        }
    }
    Ok(())
}

/// Перераспределяет высоты сухопутных углов по рангу
///
/// Отсортированные по возрастанию углы получают `x = sqrt(S) - sqrt(S(1-y))`,
/// где `y` — нормированный ранг, `S = scale_factor`. Это обратная функция к
/// `y = 1 - (1-x)²`: большинство суши оказывается низиной. Прибрежные и
/// океанские углы затем прижимаются к уровню моря.
pub(crate) fn redistribute_corner_elevations(diagram: &mut TilesDiagram, scale_factor: f32) {
    let mut land: Vec<usize> = (0..diagram.corners.len())
        .filter(|&i| {
            let corner = &diagram.corners[i];
            !corner.coast && corner.biome != BiomeType::Ocean
        })
        .collect();
    land.sort_by(|&a, &b| {
        diagram.corners[a]
            .elevation
            .partial_cmp(&diagram.corners[b].elevation)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let denominator = land.len().saturating_sub(1).max(1) as f32;
    for (rank, &index) in land.iter().enumerate() {
        let y = rank as f32 / denominator;
        let x = scale_factor.sqrt() - (scale_factor * (1.0 - y)).sqrt();
        diagram.corners[index].elevation = x.min(1.0);
    }

    // Уровень моря
    for corner in &mut diagram.corners {
        if corner.coast || corner.biome == BiomeType::Ocean {
            corner.elevation = 0.0;
        }
    }
}

/// Высота региона суши — среднее высот его четырёх углов
pub(crate) fn assign_land_region_elevations(diagram: &mut TilesDiagram) {
    for i in 0..diagram.sites.len() {
        let mut site = diagram.sites[i];
        let mut sum = 0.0;
        for corner_index in site.corners {
            sum += diagram.corners[corner_index as usize].elevation;
        }
        site.elevation = sum / site.corners.len() as f32;
        diagram.sites[i] = site;
    }
}

/// Глубина океанских регионов
///
/// Прибрежные океанские тайлы получают мелководье `-0.2` и сеют заливку;
/// каждый шаг вглубь умножает глубину родителя на `scale_factor` (floor `-1`),
/// так что глубина монотонно растёт с расстоянием от берега.
pub(crate) fn assign_ocean_region_elevations(diagram: &mut TilesDiagram, scale_factor: f32) {
    let mut queue = VecDeque::new();
    for i in 0..diagram.sites.len() {
        let mut site = diagram.sites[i];
        if site.biome != BiomeType::Ocean {
            continue;
        }
        if site.coast {
            site.elevation = -0.2;
            queue.push_back(i);
        } else {
            site.elevation = f32::NEG_INFINITY;
        }
        diagram.sites[i] = site;
    }

    while let Some(index) = queue.pop_front() {
        let site = diagram.sites[index];
        for slot in SITE_CARDINALS {
            let adjacent_index = site.neighbors[slot];
            if adjacent_index == NO_INDEX {
                continue;
            }
            let mut adjacent = diagram.sites[adjacent_index as usize];
            if adjacent.elevation < -1.0 {
                adjacent.elevation = (site.elevation * scale_factor).max(-1.0);
                diagram.sites[adjacent_index as usize] = adjacent;
                queue.push_back(adjacent_index as usize);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MapGenerationParams;
    use crate::diagram::builder;
    use rand::SeedableRng;

    fn small_diagram() -> TilesDiagram {
        let params = MapGenerationParams {
            width: 40,
            height: 40,
            num_x: 10,
            num_y: 10,
            ..MapGenerationParams::default()
        };
        builder::build(&params).unwrap()
    }

    /// Вода у границ, суша внутри: |x| и |y| меньше 12 от центра (20, 20)
    fn square_island() -> LandShape {
        LandShape::radial(
            crate::land_shape::RadialShape {
                bumps: 1,
                start_angle: 0.0,
                dip_angle: 0.0,
                dip_width: 0.0,
                start: 0.45,
                end: 0.75,
                land_factor: 1.03,
                land_scale: 0.5,
                land_slope: 0.7,
                width: 40.0,
                height: 40.0,
                offset_x: 2.0,
                offset_y: 2.0,
            },
            false,
            3,
        )
    }

    #[test]
    fn no_water_source_is_an_error() {
        let mut diagram = small_diagram();
        let mut shape = LandShape::uniform(true);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let result = assign_corner_elevations(&mut diagram, &mut shape, &mut rng, true);
        assert_eq!(result.unwrap_err(), DiagramError::NoWaterSource);
    }

    #[test]
    fn every_corner_has_a_path_down_to_water() {
        let mut diagram = small_diagram();
        let mut shape = square_island();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        assign_corner_elevations(&mut diagram, &mut shape, &mut rng, true).unwrap();

        for corner in &diagram.corners {
            assert!(corner.elevation.is_finite(), "угол {}", corner.index);
            if corner.water {
                assert_eq!(corner.elevation, 0.0);
                continue;
            }
            // Спуск по минимальному соседу достигает воды, не поднимаясь
            let mut current = corner.index as usize;
            for _ in 0..diagram.corners.len() {
                if diagram.corners[current].water {
                    break;
                }
                let here = diagram.corners[current].elevation;
                let lowest = diagram.corners[current]
                    .neighbors
                    .iter()
                    .filter(|&&n| n != NO_INDEX)
                    .min_by(|&&a, &&b| {
                        diagram.corners[a as usize]
                            .elevation
                            .partial_cmp(&diagram.corners[b as usize].elevation)
                            .unwrap()
                    })
                    .copied()
                    .unwrap();
                assert!(
                    diagram.corners[lowest as usize].elevation <= here,
                    "локальный минимум в углу {current}"
                );
                current = lowest as usize;
            }
            assert!(diagram.corners[current].water, "угол {} не достиг воды", corner.index);
        }
    }

    #[test]
    fn redistribution_is_rank_preserving_and_bounded() {
        let mut diagram = small_diagram();
        let mut shape = square_island();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        assign_corner_elevations(&mut diagram, &mut shape, &mut rng, true).unwrap();
        crate::diagram::water::assign_ocean_coast_and_land(&mut diagram, 2);

        let mut before: Vec<(usize, f32)> = diagram
            .corners
            .iter()
            .enumerate()
            .filter(|(_, c)| !c.coast && c.biome != BiomeType::Ocean)
            .map(|(i, c)| (i, c.elevation))
            .collect();
        redistribute_corner_elevations(&mut diagram, 1.1);

        before.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap());
        let mut previous = -1.0;
        for &(index, _) in &before {
            let now = diagram.corners[index].elevation;
            assert!((0.0..=1.0).contains(&now));
            assert!(now >= previous, "порядок рангов нарушен в углу {index}");
            previous = now;
        }

        for corner in &diagram.corners {
            if corner.coast || corner.biome == BiomeType::Ocean {
                assert_eq!(corner.elevation, 0.0);
            }
        }
    }

    #[test]
    fn ocean_depth_grows_away_from_the_coast() {
        let mut diagram = small_diagram();
        let mut shape = square_island();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        assign_corner_elevations(&mut diagram, &mut shape, &mut rng, true).unwrap();
        crate::diagram::water::assign_ocean_coast_and_land(&mut diagram, 2);
        redistribute_corner_elevations(&mut diagram, 1.1);
        assign_land_region_elevations(&mut diagram);
        assign_ocean_region_elevations(&mut diagram, 1.1);

        for site in &diagram.sites {
            if site.biome != BiomeType::Ocean {
                continue;
            }
            assert!(site.elevation <= -0.2 && site.elevation >= -1.0);
            if site.coast {
                assert_eq!(site.elevation, -0.2);
            } else {
                // Глубже любого прибрежного соседа
                for slot in SITE_CARDINALS {
                    let neighbor = site.neighbors[slot];
                    if neighbor != NO_INDEX {
                        let neighbor = &diagram.sites[neighbor as usize];
                        if neighbor.biome == BiomeType::Ocean && neighbor.coast {
                            assert!(site.elevation <= neighbor.elevation);
                        }
                    }
                }
            }
        }
    }
}
