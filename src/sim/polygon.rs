//! The player's shape: one regular polygon per side count
//!
//! Each polygon's edges are painted in palette order, so the edge facing down
//! (the one the player lands on) is `palette[rotation_index]`. Rotating the
//! polygon picks which color/collision layer the player lands with.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::MIN_SIDES;
use crate::error::ConfigError;
use crate::{apothem, edge_step_degrees};

/// Collision layer ids, one per edge color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColorLayer {
    Red = 6,
    Blue,
    Yellow,
    Purple,
    Green,
    Orange,
}

/// One palette slot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EdgeColor {
    /// RGBA
    pub color: u32,
    pub layer: ColorLayer,
}

/// Ordered edge colors; index = rotation index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorPalette {
    pub entries: Vec<EdgeColor>,
}

impl Default for ColorPalette {
    fn default() -> Self {
        let entries = vec![
            EdgeColor { color: 0xE74C3CFF, layer: ColorLayer::Red },
            EdgeColor { color: 0x3498DBFF, layer: ColorLayer::Blue },
            EdgeColor { color: 0xF1C40FFF, layer: ColorLayer::Yellow },
            EdgeColor { color: 0x9B59B6FF, layer: ColorLayer::Purple },
            EdgeColor { color: 0x2ECC71FF, layer: ColorLayer::Green },
            EdgeColor { color: 0xE67E22FF, layer: ColorLayer::Orange },
        ];
        Self { entries }
    }
}

impl ColorPalette {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn layer(&self, index: usize) -> ColorLayer {
        self.entries[index].layer
    }
}

/// Rotation direction (left = counterclockwise)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RotationDirection {
    Left,
    Right,
}

/// A single regular polygon
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Polygon {
    pub sides: u32,
    /// Center offset above the player root
    pub center: Vec2,
    rotation_index: u32,
    /// Accumulated visual rotation in degrees
    pub angle_deg: f32,
    pub active: bool,
}

impl Polygon {
    fn new(sides: u32, edge_length: f32, edge_depth_offset: f32) -> Self {
        let height = apothem(sides, edge_length) + edge_depth_offset;
        Self {
            sides,
            center: Vec2::new(0.0, height),
            rotation_index: 0,
            angle_deg: 0.0,
            active: false,
        }
    }

    pub fn rotation_index(&self) -> u32 {
        self.rotation_index
    }

    /// Counterclockwise by one edge. Returns the visual step in degrees.
    pub fn rotate_left(&mut self) -> f32 {
        self.rotation_index = (self.rotation_index + 1) % self.sides;
        let step = edge_step_degrees(self.sides);
        self.angle_deg += step;
        step
    }

    /// Clockwise by one edge. Returns the visual step in degrees.
    pub fn rotate_right(&mut self) -> f32 {
        self.rotation_index = (self.rotation_index + self.sides - 1) % self.sides;
        let step = -edge_step_degrees(self.sides);
        self.angle_deg += step;
        step
    }
}

/// All polygons for a session plus which one is current
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolygonSet {
    polygons: Vec<Polygon>,
    palette: ColorPalette,
    index: usize,
}

impl PolygonSet {
    /// Build polygons for 3..=max_sides; only the triangle starts active
    pub fn build(
        max_sides: u32,
        edge_length: f32,
        edge_depth_offset: f32,
        palette: ColorPalette,
    ) -> Result<Self, ConfigError> {
        if max_sides < MIN_SIDES {
            return Err(ConfigError::TooFewSides(max_sides));
        }
        if palette.len() < max_sides as usize {
            return Err(ConfigError::PaletteTooShort {
                len: palette.len(),
                max_sides,
            });
        }

        let mut polygons: Vec<Polygon> = (MIN_SIDES..=max_sides)
            .map(|sides| Polygon::new(sides, edge_length, edge_depth_offset))
            .collect();
        polygons[0].active = true;

        Ok(Self {
            polygons,
            palette,
            index: 0,
        })
    }

    pub fn current(&self) -> &Polygon {
        &self.polygons[self.index]
    }

    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    pub fn palette(&self) -> &ColorPalette {
        &self.palette
    }

    pub fn max_sides(&self) -> u32 {
        MIN_SIDES + self.polygons.len() as u32 - 1
    }

    /// Side count of the current polygon
    pub fn level(&self) -> u32 {
        self.current().sides
    }

    pub fn color_layer(&self) -> ColorLayer {
        let polygon = self.current();
        debug_assert!(polygon.rotation_index < polygon.sides);
        self.palette.layer(polygon.rotation_index as usize)
    }

    pub fn rotate(&mut self, direction: RotationDirection) -> f32 {
        match direction {
            RotationDirection::Left => self.rotate_left(),
            RotationDirection::Right => self.rotate_right(),
        }
    }

    pub fn rotate_left(&mut self) -> f32 {
        self.polygons[self.index].rotate_left()
    }

    pub fn rotate_right(&mut self) -> f32 {
        self.polygons[self.index].rotate_right()
    }

    /// Swap to the next polygon, keeping the landing color
    ///
    /// Does nothing and returns false at max sides.
    pub fn level_up(&mut self, previous_layer: ColorLayer) -> bool {
        if self.index + 1 >= self.polygons.len() {
            return false;
        }

        self.polygons[self.index].active = false;
        self.index += 1;
        let palette = &self.palette;
        let polygon = &mut self.polygons[self.index];
        polygon.active = true;

        // Replay rotations from the polygon's own resting orientation.
        // Relies on every polygon painting its edges in the same palette order.
        let mut steps = 0;
        while palette.layer(polygon.rotation_index as usize) != previous_layer
            && steps < polygon.sides
        {
            polygon.rotate_left();
            steps += 1;
        }
        debug_assert_eq!(
            palette.layer(polygon.rotation_index as usize),
            previous_layer,
            "previous color must exist on the larger polygon"
        );

        log::debug!(
            "polygon level up to {} sides, rotation index {}",
            polygon.sides,
            polygon.rotation_index
        );
        true
    }
}
