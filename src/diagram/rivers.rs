// src/diagram/rivers.rs
//! Стоки, водоразделы и реки
//!
//! Сначала каждый угол получает `downslope` — соседа с минимальной высотой
//! (или себя во впадине). Затем цепочки стоков агрегируются в водоразделы,
//! и случайно выбранные углы прослеживаются вниз по цепочкам, помечая
//! пройденные углы и рёбра счётчиком `river`.

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::biome::BiomeType;
use crate::diagram::{NO_INDEX, TilesDiagram};

/// Вычисляет направление стока каждого угла
///
/// Сосед с минимальной высотой (нестрогое сравнение, при равенстве побеждает
/// последний в порядке обхода; сам угол участвует) становится `downslope`.
pub(crate) fn calculate_downslopes(diagram: &mut TilesDiagram) {
    for i in 0..diagram.corners.len() {
        let mut corner = diagram.corners[i];
        let mut min_elevation = corner.elevation;
        corner.downslope = corner.index;
        for adjacent_index in corner.neighbors {
            if adjacent_index == NO_INDEX {
                continue;
            }
            let adjacent = diagram.corners[adjacent_index as usize];
            if adjacent.elevation <= min_elevation {
                min_elevation = adjacent.elevation;
                corner.downslope = adjacent_index;
            }
        }
        diagram.corners[i] = corner;
    }
}

/// Вычисляет водоразделы — конечные точки цепочек стоков
///
/// Итерации ограничены сотней кругов; обычно хватает пары десятков, потому
/// что большинство углов недалеко от берега. Круг без изменений завершает
/// процесс досрочно.
pub(crate) fn calculate_watersheds(diagram: &mut TilesDiagram) {
    for i in 0..diagram.corners.len() {
        let mut corner = diagram.corners[i];
        corner.watershed = corner.index;
        if corner.biome != BiomeType::Ocean && !corner.coast {
            corner.watershed = corner.downslope;
        }
        diagram.corners[i] = corner;
    }

    for round in 0..100 {
        let mut changed = false;
        for j in 0..diagram.corners.len() {
            let mut corner = diagram.corners[j];
            if corner.watershed == NO_INDEX {
                continue;
            }
            let watershed_corner = diagram.corners[corner.watershed as usize];
            if corner.biome != BiomeType::Ocean && corner.coast && !watershed_corner.coast {
                if corner.downslope == NO_INDEX {
                    continue;
                }
                let downslope_corner = diagram.corners[corner.downslope as usize];
                if downslope_corner.watershed != NO_INDEX {
                    let candidate = diagram.corners[downslope_corner.watershed as usize];
                    if candidate.biome != BiomeType::Ocean {
                        corner.watershed = downslope_corner.watershed;
                        diagram.corners[j] = corner;
                        changed = true;
                    }
                }
            }
        }
        if !changed {
            log::debug!("водоразделы сошлись за {round} кругов");
            break;
        }
    }

    // Размер бассейна: сколько углов стекает в водораздел
    for i in 0..diagram.corners.len() {
        let corner = diagram.corners[i];
        if corner.watershed == NO_INDEX {
            continue;
        }
        let mut watershed_corner = diagram.corners[corner.watershed as usize];
        if watershed_corner.water {
            watershed_corner.watershed_size = -1;
        } else {
            watershed_corner.watershed_size += 1;
        }
        diagram.corners[corner.watershed as usize] = watershed_corner;
    }
}

/// Прокладывает реки вниз по цепочкам стоков
///
/// Берётся `samples` случайных углов; океанские и лежащие вне диапазона
/// высот `(0.3, 0.9)` пропускаются. Принятый угол прослеживается по
/// `downslope` до прибрежного угла или устья во впадине, с инкрементом
/// счётчиков на пройденных углах и соединяющих рёбрах.
pub(crate) fn create_rivers(diagram: &mut TilesDiagram, rng: &mut ChaCha8Rng, samples: usize) {
    for _ in 0..samples {
        let start = rng.gen_range(0..diagram.corners.len());
        let corner = diagram.corners[start];
        if corner.biome == BiomeType::Ocean || corner.elevation < 0.3 || corner.elevation > 0.9 {
            continue;
        }

        let mut current = start;
        let mut steps = 0;
        while !diagram.corners[current].coast {
            let corner = diagram.corners[current];
            if corner.downslope == corner.index || corner.downslope == NO_INDEX {
                // Устье во впадине: помечаем, если река в него уже вошла
                if steps > 0 {
                    diagram.corners[current].river += 1;
                }
                break;
            }
            // Защита от колец из углов равной высоты
            if steps > diagram.corners.len() {
                break;
            }
            for edge_index in corner.edges {
                if edge_index == NO_INDEX {
                    continue;
                }
                let edge = diagram.edges[edge_index as usize];
                if edge.corners[0] == corner.downslope || edge.corners[1] == corner.downslope {
                    diagram.edges[edge_index as usize].river += 1;
                }
            }
            diagram.corners[current].river += 1;
            current = corner.downslope as usize;
            steps += 1;
        }
    }
    log::debug!(
        "речных рёбер: {}",
        diagram.edges.iter().filter(|e| e.river > 0).count()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MapGenerationParams;
    use crate::diagram::builder;
    use rand::SeedableRng;

    /// Сетка 4×4 тайла (углы 5×5), высоты задаются руками
    fn diagram_with_elevations<F: Fn(i32, i32) -> f32>(elevation: F) -> TilesDiagram {
        let params = MapGenerationParams {
            width: 16,
            height: 16,
            num_x: 4,
            num_y: 4,
            ..MapGenerationParams::default()
        };
        let mut diagram = builder::build(&params).unwrap();
        for corner in &mut diagram.corners {
            let j = corner.index % 5;
            let i = corner.index / 5;
            corner.elevation = elevation(i, j);
        }
        diagram
    }

    #[test]
    fn downslope_points_to_the_lowest_neighbor() {
        // Воронка с минимумом в центре (2,2), высота — L1-расстояние
        let mut diagram = diagram_with_elevations(|i, j| ((i - 2).abs() + (j - 2).abs()) as f32);
        calculate_downslopes(&mut diagram);

        let center = 2 * 5 + 2;
        // Кардинальные соседи центра стекают прямо в него
        for &index in &[2 * 5 + 1, 2 * 5 + 3, 5 + 2, 3 * 5 + 2] {
            assert_eq!(diagram.corners[index].downslope, center as i32);
        }
        // Сам центр — впадина
        assert_eq!(diagram.corners[center].downslope, center as i32);
        // Высота по стоку не растёт ни для одного угла
        for corner in &diagram.corners {
            let down = &diagram.corners[corner.downslope as usize];
            assert!(down.elevation <= corner.elevation);
        }
    }

    #[test]
    fn watershed_sizes_count_upstream_corners() {
        let mut diagram = diagram_with_elevations(|i, j| ((i - 2).abs() + (j - 2).abs()) as f32);
        let center = 2 * 5 + 2;
        diagram.corners[center].water = true;
        calculate_downslopes(&mut diagram);
        calculate_watersheds(&mut diagram);

        // Водораздел-вода помечается -1
        assert_eq!(diagram.corners[center].watershed_size, -1);
        // В угол (2,1) стекают (1,1), (3,1) и (2,0): равные кандидаты
        // разрешаются последним в порядке обхода (лево, право, верх, низ)
        assert_eq!(diagram.corners[2 * 5 + 1].watershed_size, 3);
        assert_eq!(diagram.corners[5 + 1].watershed, (2 * 5 + 1) as i32);
    }

    #[test]
    fn rivers_run_downhill_to_the_coast() {
        // Ровный уклон слева направо, правая колонка — побережье
        let mut diagram = diagram_with_elevations(|_, j| 0.85 - 0.125 * j as f32);
        for corner in &mut diagram.corners {
            if corner.index % 5 == 4 {
                corner.coast = true;
                corner.elevation = 0.0;
            }
        }
        calculate_downslopes(&mut diagram);
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        create_rivers(&mut diagram, &mut rng, 50);

        let traced: i32 = diagram.edges.iter().map(|e| e.river).sum();
        assert!(traced > 0);
        for edge in &diagram.edges {
            assert!(edge.river >= 0);
            if edge.river > 0 {
                for &corner in &edge.corners {
                    let corner = &diagram.corners[corner as usize];
                    assert!(corner.river > 0 || corner.coast);
                }
            }
        }
        // Река не трогает углы выше диапазона выбора и не идёт вверх
        for corner in &diagram.corners {
            if corner.river > 0 && !corner.coast {
                let down = &diagram.corners[corner.downslope as usize];
                assert!(down.elevation <= corner.elevation);
            }
        }
    }
}
