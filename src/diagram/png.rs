// src/diagram/png.rs
//! Визуализация диаграммы в изображение
//!
//! Каждый пиксель относится к своему тайлу и красится цветом биома,
//! затенённым по высоте: суша светлеет к вершинам, океан темнеет с
//! глубиной. Поверх тайлов рисуются реки — отрезки по рёбрам с
//! ненулевым счётчиком и кружки в проточных углах, толщина растёт
//! с числом проходов. Сохранение в PNG через библиотеку `image`.

use image::{ImageBuffer, Rgba};
use imageproc::drawing::{draw_filled_circle_mut, draw_line_segment_mut};
use rayon::prelude::*;

use crate::diagram::TilesDiagram;

/// Цвет рек поверх биомов
const RIVER_COLOR: Rgba<u8> = Rgba([40, 90, 160, 255]);

/// Затеняет цвет биома по высоте
///
/// Суша: от 70% яркости у нуля до полной на вершинах. Вода: до 40%
/// затемнения на дне океана (высота `-1`).
fn shade(rgb: [u8; 3], elevation: f32, water: bool) -> [u8; 4] {
    let factor = if water {
        (1.0 + elevation * 0.4).clamp(0.5, 1.0)
    } else {
        0.7 + 0.3 * elevation.clamp(0.0, 1.0)
    };
    [
        (f32::from(rgb[0]) * factor) as u8,
        (f32::from(rgb[1]) * factor) as u8,
        (f32::from(rgb[2]) * factor) as u8,
        255,
    ]
}

impl TilesDiagram {
    /// Преобразует диаграмму в RGBA-пиксели построчно
    ///
    /// Вектор длиной `width × height × 4` в порядке `[R, G, B, A, ...]`.
    #[must_use]
    pub fn to_rgba_image(&self) -> Vec<u8> {
        let width = self.width as usize;
        let half_w = f64::from(self.tile_width) * 0.5;
        let half_h = f64::from(self.tile_height) * 0.5;

        (0..width * self.height as usize)
            .into_par_iter()
            .flat_map_iter(|idx| {
                let x = (idx % width) as f64;
                let y = (idx / width) as f64;
                // Тайл (i, j) покрывает полтайла вокруг своей опорной точки
                let j = (((x + half_w) / f64::from(self.tile_width)) as u32).min(self.num_x - 1);
                let i = (((y + half_h) / f64::from(self.tile_height)) as u32).min(self.num_y - 1);
                let site = &self.sites[(i * self.num_x + j) as usize];
                shade(site.biome.to_rgb(), site.elevation, site.water)
            })
            .collect()
    }

    /// Сохраняет диаграмму в PNG-файл с наложением рек
    ///
    /// # Ошибки
    /// Возвращает ошибку в случае:
    /// - Невозможно создать буфер изображения (некорректные размеры)
    /// - Невозможно записать файл (нет прав, недостаточно места и т.д.)
    pub fn save_as_png(&self, path: &str) -> Result<(), Box<dyn std::error::Error>> {
        let rgba_data = self.to_rgba_image();
        let mut img: ImageBuffer<Rgba<u8>, Vec<u8>> =
            ImageBuffer::from_raw(self.width, self.height, rgba_data)
                .ok_or("Failed to create image buffer")?;

        for edge in &self.edges {
            if edge.river > 0 {
                let start = self.corners[edge.corners[0] as usize].point;
                let end = self.corners[edge.corners[1] as usize].point;
                draw_line_segment_mut(&mut img, start, end, RIVER_COLOR);
            }
        }
        for corner in &self.corners {
            if corner.river > 0 {
                // Толщина русла растёт с числом проходов, но не бесконечно
                let radius = (1.0 + corner.river as f32 / 3.0).min(3.0) as i32;
                draw_filled_circle_mut(
                    &mut img,
                    (corner.point.0 as i32, corner.point.1 as i32),
                    radius,
                    RIVER_COLOR,
                );
            }
        }

        img.save(path)?;
        Ok(())
    }
}
