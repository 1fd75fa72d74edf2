use serde::{Deserialize, Serialize};

use crate::diagram::TilesDiagram;

/// Тип биома поверхности
///
/// Полная таблица из 23 категорий под будущую классификацию по высоте и
/// влажности; текущий классификатор назначает только упрощённую лестницу по
/// высоте (океан/болото/лёд/озеро/река/снег/пустошь/степь).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum BiomeType {
    /// Стартовое значение до классификации
    #[default]
    Cliff,
    Ocean,
    Coast,
    LakeShore,
    Marsh,
    Ice,
    Lake,
    River,
    Beach,
    Lava,
    Snow,
    Tundra,
    Bare,
    Scorched,
    Taiga,
    Shrubland,
    TemperateDesert,
    TemperateRainForest,
    TemperateDeciduousForest,
    Grassland,
    TropicalRainForest,
    TropicalSeasonalForest,
    SubtropicalDesert,
}

impl BiomeType {
    /// Отладочный цвет биома для рендера карты
    #[must_use]
    pub fn to_rgb(self) -> [u8; 3] {
        match self {
            BiomeType::Cliff => [90, 90, 90],
            BiomeType::Ocean => [0, 64, 128],
            BiomeType::Coast => [220, 210, 160],
            BiomeType::LakeShore => [130, 160, 120],
            BiomeType::Marsh => [80, 100, 60],
            BiomeType::Ice => [220, 220, 255],
            BiomeType::Lake => [60, 110, 180],
            BiomeType::River => [40, 90, 160],
            BiomeType::Beach => [230, 215, 170],
            BiomeType::Lava => [200, 60, 20],
            BiomeType::Snow => [245, 245, 250],
            BiomeType::Tundra => [200, 220, 180],
            BiomeType::Bare => [150, 150, 150],
            BiomeType::Scorched => [110, 95, 85],
            BiomeType::Taiga => [100, 150, 100],
            BiomeType::Shrubland => [140, 160, 110],
            BiomeType::TemperateDesert => [210, 195, 140],
            BiomeType::TemperateRainForest => [50, 110, 60],
            BiomeType::TemperateDeciduousForest => [60, 120, 60],
            BiomeType::Grassland => [150, 200, 100],
            BiomeType::TropicalRainForest => [30, 100, 30],
            BiomeType::TropicalSeasonalForest => [70, 130, 50],
            BiomeType::SubtropicalDesert => [200, 180, 120],
        }
    }
}

/// Назначает биомы тайлов лестницей по высоте
///
/// Океан остаётся океаном. Остальная вода делится по высоте на болото, лёд
/// и озеро. Суша делится на снег, пустошь и степь; низины ниже порога степи
/// становятся реками и помечаются водой.
pub(crate) fn assign_site_biomes(diagram: &mut TilesDiagram) {
    for site in &mut diagram.sites {
        if site.water {
            if site.biome == BiomeType::Ocean {
                continue;
            }
            site.biome = if site.elevation < 0.1 {
                BiomeType::Marsh
            } else if site.elevation > 0.8 {
                BiomeType::Ice
            } else {
                BiomeType::Lake
            };
        } else if site.elevation > 0.8 {
            site.biome = BiomeType::Snow;
        } else if site.elevation > 0.5 {
            site.biome = BiomeType::Bare;
        } else if site.elevation > 0.1 {
            site.biome = BiomeType::Grassland;
        } else {
            site.water = true;
            site.biome = BiomeType::River;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MapGenerationParams;
    use crate::diagram::builder;

    #[test]
    fn biome_ladder_splits_water_and_land_by_elevation() {
        let params = MapGenerationParams {
            width: 16,
            height: 8,
            num_x: 8,
            num_y: 4,
            ..MapGenerationParams::default()
        };
        let mut diagram = builder::build(&params).unwrap();

        let cases = [
            (true, BiomeType::Ocean, 0.5, BiomeType::Ocean, true),
            (true, BiomeType::Cliff, 0.05, BiomeType::Marsh, true),
            (true, BiomeType::Cliff, 0.9, BiomeType::Ice, true),
            (true, BiomeType::Cliff, 0.5, BiomeType::Lake, true),
            (false, BiomeType::Cliff, 0.9, BiomeType::Snow, false),
            (false, BiomeType::Cliff, 0.6, BiomeType::Bare, false),
            (false, BiomeType::Cliff, 0.3, BiomeType::Grassland, false),
            (false, BiomeType::Cliff, 0.05, BiomeType::River, true),
        ];
        for (i, &(water, biome, elevation, _, _)) in cases.iter().enumerate() {
            diagram.sites[i].water = water;
            diagram.sites[i].biome = biome;
            diagram.sites[i].elevation = elevation;
        }

        assign_site_biomes(&mut diagram);

        for (i, &(_, _, _, expected_biome, expected_water)) in cases.iter().enumerate() {
            assert_eq!(diagram.sites[i].biome, expected_biome, "тайл {i}");
            assert_eq!(diagram.sites[i].water, expected_water, "тайл {i}");
        }
    }
}
