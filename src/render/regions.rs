//! Location-region rectangles drawn behind the device scene.
//!
//! Regions are pure layout output — redrawn from the latest pass each
//! frame, never interacted with. Their header labels are Text2d entities
//! owned by the scene sync (`render::scene`).

use bevy::prelude::*;

use crate::core::config::NetmapConfig;
use crate::core::resources::Regions;
use crate::render::scene::model_to_world;

pub fn draw_regions_system(
    mut gizmos: Gizmos,
    regions: Res<Regions>,
    config: Res<NetmapConfig>,
) {
    let color = config.region_color();
    for region in &regions.0 {
        let center = model_to_world(Vec2::new(
            region.x + region.w * 0.5,
            region.y + region.h * 0.5,
        ));
        gizmos.rect_2d(
            Isometry2d::from_translation(center),
            Vec2::new(region.w, region.h),
            color,
        );
    }
}
