// src/diagram/builder.rs
//! Построение топологии сетки
//!
//! Чистая функция от `(width, height, num_x, num_y)`: позиции, флаги границы
//! и все индексы соседей выводятся из координат `(i, j)` без случайности.
//!
//! Нумерация:
//! - тайл `(i, j)` → `i * num_x + j`
//! - угол `(i, j)` → `i * (num_x + 1) + j`
//! - вертикальное ребро `(i, j)` → `i * (num_x + 1) + j`
//! - горизонтальное ребро `(i, j)` → `(num_x + 1) * num_y + i * num_x + j`
//!
//! ```text
//!   c----e----c
//!   |         |
//!   e    x    e
//!   |         |
//!   c----e----c
//! ```

use crate::biome::BiomeType;
use crate::config::MapGenerationParams;
use crate::diagram::{Corner, DiagramError, Edge, NO_INDEX, Site, TilesDiagram};

/// Закрытые формулы индексов элементов сетки с проверкой границ
struct GridIndex {
    num_x: i64,
    num_y: i64,
}

impl GridIndex {
    fn site(&self, i: i64, j: i64) -> i32 {
        if i < 0 || i >= self.num_y || j < 0 || j >= self.num_x {
            return NO_INDEX;
        }
        (i * self.num_x + j) as i32
    }

    fn corner(&self, i: i64, j: i64) -> i32 {
        if i < 0 || i > self.num_y || j < 0 || j > self.num_x {
            return NO_INDEX;
        }
        (i * (self.num_x + 1) + j) as i32
    }

    /// Вертикальное ребро между углами `(i, j)` и `(i + 1, j)`
    fn v_edge(&self, i: i64, j: i64) -> i32 {
        if i < 0 || i >= self.num_y || j < 0 || j > self.num_x {
            return NO_INDEX;
        }
        (i * (self.num_x + 1) + j) as i32
    }

    /// Горизонтальное ребро между углами `(i, j)` и `(i, j + 1)`
    fn h_edge(&self, i: i64, j: i64) -> i32 {
        if i < 0 || i > self.num_y || j < 0 || j >= self.num_x {
            return NO_INDEX;
        }
        ((self.num_x + 1) * self.num_y + i * self.num_x + j) as i32
    }
}

/// Строит пустую диаграмму: вся топология готова, атрибуты по умолчанию
pub(crate) fn build(params: &MapGenerationParams) -> Result<TilesDiagram, DiagramError> {
    if params.num_x == 0
        || params.num_y == 0
        || params.width % params.num_x != 0
        || params.height % params.num_y != 0
    {
        return Err(DiagramError::InvalidGridDimensions {
            width: params.width,
            height: params.height,
            num_x: params.num_x,
            num_y: params.num_y,
        });
    }

    let num_x = params.num_x as i64;
    let num_y = params.num_y as i64;
    let tile_width = params.width / params.num_x;
    let tile_height = params.height / params.num_y;
    let tw = tile_width as f32;
    let th = tile_height as f32;
    let grid = GridIndex { num_x, num_y };

    /*
     *  Тайлы и их окрестность 3×3:
     *  s0 s1 s2
     *  s3  x s4
     *  s5 s6 s7
     */
    let mut sites = Vec::with_capacity((num_x * num_y) as usize);
    for i in 0..num_y {
        for j in 0..num_x {
            let index = grid.site(i, j);
            sites.push(Site {
                index,
                point: (j as f32 * tw, i as f32 * th),
                water: false,
                island: false,
                coast: false,
                border: j == 0 || j == num_x - 1 || i == 0 || i == num_y - 1,
                biome: BiomeType::Cliff,
                neighbors: [
                    grid.site(i - 1, j - 1),
                    grid.site(i - 1, j),
                    grid.site(i - 1, j + 1),
                    grid.site(i, j - 1),
                    grid.site(i, j + 1),
                    grid.site(i + 1, j - 1),
                    grid.site(i + 1, j),
                    grid.site(i + 1, j + 1),
                ],
                edges: [
                    grid.v_edge(i, j),
                    grid.v_edge(i, j + 1),
                    grid.h_edge(i, j),
                    grid.h_edge(i + 1, j),
                ],
                corners: [
                    grid.corner(i, j),
                    grid.corner(i, j + 1),
                    grid.corner(i + 1, j),
                    grid.corner(i + 1, j + 1),
                ],
                elevation: 0.0,
                moisture: 0.0,
                flux: 0.0,
            });
        }
    }

    /*
     *  Углы сдвинуты на полтайла от сетки тайлов:
     *  0----1----2
     *  | x  |  x |
     *  3----4----5
     *  | x  |  x |
     *  6----7----8
     */
    let mut corners = Vec::with_capacity(((num_x + 1) * (num_y + 1)) as usize);
    for i in 0..=num_y {
        for j in 0..=num_x {
            let index = grid.corner(i, j);
            corners.push(Corner {
                index,
                point: (j as f32 * tw - 0.5 * tw, i as f32 * th - 0.5 * th),
                water: false,
                coast: false,
                border: j == 0 || j == num_x || i == 0 || i == num_y,
                biome: BiomeType::Cliff,
                sites: [
                    grid.site(i - 1, j - 1),
                    grid.site(i - 1, j),
                    grid.site(i, j - 1),
                    grid.site(i, j),
                ],
                edges: [
                    grid.h_edge(i, j - 1),
                    grid.h_edge(i, j),
                    grid.v_edge(i - 1, j),
                    grid.v_edge(i, j),
                ],
                neighbors: [
                    grid.corner(i, j - 1),
                    grid.corner(i, j + 1),
                    grid.corner(i - 1, j),
                    grid.corner(i + 1, j),
                ],
                elevation: 0.0,
                moisture: 0.0,
                flux: 0.0,
                downslope: index,
                watershed: NO_INDEX,
                watershed_size: 0,
                river: 0,
            });
        }
    }

    // Рёбра: сперва вертикальные, затем горизонтальные
    let mut edges = Vec::with_capacity(((num_x + 1) * num_y + num_x * (num_y + 1)) as usize);
    for i in 0..num_y {
        for j in 0..=num_x {
            let index = grid.v_edge(i, j);
            edges.push(Edge {
                index,
                midpoint: (j as f32 * tw - 0.5 * tw, i as f32 * th),
                border: j == 0 || j == num_x,
                sites: [grid.site(i, j - 1), grid.site(i, j)],
                corners: [grid.corner(i, j), grid.corner(i + 1, j)],
                elevation: 0.0,
                moisture: 0.0,
                flux: 0.0,
                river: 0,
            });
        }
    }
    for i in 0..=num_y {
        for j in 0..num_x {
            let index = grid.h_edge(i, j);
            edges.push(Edge {
                index,
                midpoint: (j as f32 * tw, i as f32 * th - 0.5 * th),
                border: i == 0 || i == num_y,
                sites: [grid.site(i - 1, j), grid.site(i, j)],
                corners: [grid.corner(i, j), grid.corner(i, j + 1)],
                elevation: 0.0,
                moisture: 0.0,
                flux: 0.0,
                river: 0,
            });
        }
    }

    Ok(TilesDiagram {
        sites,
        corners,
        edges,
        tile_width,
        tile_height,
        num_x: params.num_x,
        num_y: params.num_y,
        width: params.width,
        height: params.height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(width: u32, height: u32, num_x: u32, num_y: u32) -> MapGenerationParams {
        MapGenerationParams {
            width,
            height,
            num_x,
            num_y,
            ..MapGenerationParams::default()
        }
    }

    #[test]
    fn element_counts_match_grid() {
        let diagram = build(&params(800, 600, 4, 3)).unwrap();
        assert_eq!(diagram.sites.len(), 12);
        assert_eq!(diagram.corners.len(), 5 * 4);
        // (num_x + 1) * num_y вертикальных + num_x * (num_y + 1) горизонтальных
        assert_eq!(diagram.edges.len(), 5 * 3 + 4 * 4);
        assert_eq!(diagram.tile_width, 200);
        assert_eq!(diagram.tile_height, 200);
    }

    #[test]
    fn rejects_non_divisible_dimensions() {
        assert!(build(&params(801, 600, 4, 3)).is_err());
        assert!(build(&params(800, 601, 4, 3)).is_err());
        assert!(build(&params(800, 600, 0, 3)).is_err());
    }

    #[test]
    fn border_flags_only_on_boundary() {
        let diagram = build(&params(800, 600, 4, 4)).unwrap();
        for site in &diagram.sites {
            let interior = site.neighbors.iter().all(|&s| s != NO_INDEX);
            assert_eq!(site.border, !interior, "тайл {}", site.index);
        }
        for corner in &diagram.corners {
            let interior = corner.neighbors.iter().all(|&c| c != NO_INDEX)
                && corner.sites.iter().all(|&s| s != NO_INDEX)
                && corner.edges.iter().all(|&e| e != NO_INDEX);
            assert_eq!(corner.border, !interior, "угол {}", corner.index);
        }
    }

    #[test]
    fn edge_corner_references_are_symmetric() {
        let diagram = build(&params(800, 600, 5, 4)).unwrap();
        for edge in &diagram.edges {
            for &corner in &edge.corners {
                assert_ne!(corner, NO_INDEX);
                let corner = &diagram.corners[corner as usize];
                assert!(
                    corner.edges.contains(&edge.index),
                    "угол {} не знает о ребре {}",
                    corner.index,
                    edge.index
                );
            }
        }
    }

    #[test]
    fn site_corner_references_are_symmetric() {
        let diagram = build(&params(800, 600, 5, 4)).unwrap();
        for site in &diagram.sites {
            for &corner in &site.corners {
                assert_ne!(corner, NO_INDEX);
                let corner = &diagram.corners[corner as usize];
                assert!(corner.sites.contains(&site.index));
            }
            for &edge in &site.edges {
                assert_ne!(edge, NO_INDEX);
                let edge = &diagram.edges[edge as usize];
                assert!(edge.sites.contains(&site.index));
            }
        }
    }

    #[test]
    fn site_neighborhood_is_mutual() {
        let diagram = build(&params(800, 600, 5, 4)).unwrap();
        for site in &diagram.sites {
            for &neighbor in &site.neighbors {
                if neighbor != NO_INDEX {
                    let neighbor = &diagram.sites[neighbor as usize];
                    assert!(neighbor.neighbors.contains(&site.index));
                }
            }
        }
    }

    #[test]
    fn corner_positions_are_offset_by_half_a_tile() {
        let diagram = build(&params(8, 8, 2, 2)).unwrap();
        // Угол (0,0) лежит на полтайла левее и выше тайла (0,0)
        assert_eq!(diagram.sites[0].point, (0.0, 0.0));
        assert_eq!(diagram.corners[0].point, (-2.0, -2.0));
        // Вертикальное ребро (0,0): середина между углами (0,0) и (1,0)
        assert_eq!(diagram.edges[0].midpoint, (-2.0, 0.0));
        assert_eq!(diagram.edges[0].corners, [0, 3]);
        assert_eq!(diagram.edges[0].sites, [NO_INDEX, 0]);
    }
}
