use foundation::math::{Mat4, Vec3};
use scene::World;
use scene::camera::PerspectiveCamera;
use scene::components::{LineMaterial, MeshMaterial, Rgb};
use scene::entity::EntityId;
use scene::world::NodeGeometry;

pub const DEFAULT_BACKGROUND: Rgb = Rgb(0x000814);

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct AmbientLight {
    pub color: Rgb,
    pub intensity: f32,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DirectionalLight {
    pub color: Rgb,
    pub intensity: f32,
    pub position: Vec3,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Lighting {
    pub ambient: AmbientLight,
    pub directional: DirectionalLight,
}

impl Default for Lighting {
    fn default() -> Self {
        Self {
            ambient: AmbientLight {
                color: Rgb::WHITE,
                intensity: 0.7,
            },
            directional: DirectionalLight {
                color: Rgb::WHITE,
                intensity: 0.6,
                position: Vec3::new(10.0, 20.0, 15.0),
            },
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum RenderCommand {
    Mesh {
        entity: EntityId,
        material: MeshMaterial,
        triangles: usize,
        render_order: i32,
    },
    Lines {
        entity: EntityId,
        material: LineMaterial,
        segments: usize,
        render_order: i32,
    },
}

impl RenderCommand {
    pub fn render_order(&self) -> i32 {
        match self {
            RenderCommand::Mesh { render_order, .. } | RenderCommand::Lines { render_order, .. } => {
                *render_order
            }
        }
    }

    pub fn entity(&self) -> EntityId {
        match self {
            RenderCommand::Mesh { entity, .. } | RenderCommand::Lines { entity, .. } => *entity,
        }
    }
}

/// Everything needed to draw one frame, in draw order.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    pub output_size: (u32, u32),
    pub clear_color: Rgb,
    pub lighting: Lighting,
    pub view_proj: Mat4,
    pub commands: Vec<RenderCommand>,
}

/// Headless renderer: tracks the drawing surface and builds draw lists.
///
/// Output size is the CSS size scaled by the device pixel ratio.
#[derive(Debug, Clone, PartialEq)]
pub struct Renderer {
    css_width: f64,
    css_height: f64,
    pixel_ratio: f64,
    pub background: Rgb,
    pub lighting: Lighting,
}

impl Renderer {
    pub fn new(css_width: f64, css_height: f64, pixel_ratio: f64) -> Self {
        Self {
            css_width: css_width.max(0.0),
            css_height: css_height.max(0.0),
            pixel_ratio: if pixel_ratio > 0.0 { pixel_ratio } else { 1.0 },
            background: DEFAULT_BACKGROUND,
            lighting: Lighting::default(),
        }
    }

    pub fn set_size(&mut self, css_width: f64, css_height: f64) {
        self.css_width = css_width.max(0.0);
        self.css_height = css_height.max(0.0);
    }

    pub fn set_pixel_ratio(&mut self, pixel_ratio: f64) {
        if pixel_ratio > 0.0 {
            self.pixel_ratio = pixel_ratio;
        }
    }

    pub fn css_size(&self) -> (f64, f64) {
        (self.css_width, self.css_height)
    }

    pub fn output_size(&self) -> (u32, u32) {
        (
            (self.css_width * self.pixel_ratio).round() as u32,
            (self.css_height * self.pixel_ratio).round() as u32,
        )
    }

    /// Draw list for `world` seen from `camera`.
    ///
    /// Ordering contract:
    /// - Commands are sorted by `render_order`, then by entity index.
    /// - Outlines (render order 999, no depth test) therefore draw last.
    pub fn render(&self, world: &World, camera: &PerspectiveCamera) -> RenderFrame {
        let mut commands: Vec<RenderCommand> = world
            .iter()
            .filter_map(|(entity, node)| match &node.geometry {
                NodeGeometry::Mesh { mesh, material } => {
                    (mesh.triangle_count() > 0).then_some(RenderCommand::Mesh {
                        entity,
                        material: *material,
                        triangles: mesh.triangle_count(),
                        render_order: node.render_order,
                    })
                }
                NodeGeometry::Lines { edges, material } => {
                    (!edges.is_empty()).then_some(RenderCommand::Lines {
                        entity,
                        material: *material,
                        segments: edges.len(),
                        render_order: node.render_order,
                    })
                }
            })
            .collect();
        commands.sort_by_key(|c| (c.render_order(), c.entity()));

        RenderFrame {
            output_size: self.output_size(),
            clear_color: self.background,
            lighting: self.lighting,
            view_proj: camera.view_proj_matrix(),
            commands,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{RenderCommand, Renderer};
    use foundation::ids::RegionId;
    use foundation::math::Vec3;
    use scene::World;
    use scene::camera::PerspectiveCamera;
    use scene::components::{EdgeSegments, Mesh, MeshMaterial, Rgb, SolidGeometry};

    fn solid() -> SolidGeometry {
        SolidGeometry {
            mesh: Mesh {
                positions: vec![
                    Vec3::new(0.0, 0.0, 0.0),
                    Vec3::new(1.0, 0.0, 0.0),
                    Vec3::new(0.0, 1.0, 0.0),
                ],
                triangles: vec![[0, 1, 2]],
            },
            outline: EdgeSegments {
                segments: vec![[Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0)]],
            },
            depth: 0.0,
        }
    }

    #[test]
    fn output_size_follows_pixel_ratio() {
        let mut r = Renderer::new(800.0, 600.0, 2.0);
        assert_eq!(r.output_size(), (1600, 1200));
        r.set_size(1024.0, 768.0);
        assert_eq!(r.output_size(), (2048, 1536));
        r.set_pixel_ratio(0.0);
        assert_eq!(r.output_size(), (2048, 1536));
    }

    #[test]
    fn outlines_draw_after_solids_without_depth_test() {
        let mut world = World::new();
        for name in ["A", "B"] {
            world.spawn_solid(
                RegionId::from(name),
                solid(),
                MeshMaterial::phong(Rgb(0x888888), 30.0),
            );
        }
        let cam = PerspectiveCamera::new(35.0, 1.0, 0.1, 1000.0);
        let frame = Renderer::new(10.0, 10.0, 1.0).render(&world, &cam);
        assert_eq!(frame.commands.len(), 4);
        assert!(matches!(
            frame.commands.as_slice(),
            [
                RenderCommand::Mesh { .. },
                RenderCommand::Mesh { .. },
                RenderCommand::Lines { .. },
                RenderCommand::Lines { .. }
            ]
        ));
        if let RenderCommand::Lines {
            material,
            render_order,
            ..
        } = frame.commands[3]
        {
            assert!(!material.depth_test);
            assert_eq!(render_order, 999);
        }
        assert_eq!(frame.clear_color, Rgb(0x000814));
        assert_eq!(frame.lighting.ambient.intensity, 0.7);
    }

    #[test]
    fn empty_geometry_is_not_drawn() {
        let mut world = World::new();
        world.spawn_solid(
            RegionId::from("A"),
            SolidGeometry::default(),
            MeshMaterial::phong(Rgb::WHITE, 30.0),
        );
        let cam = PerspectiveCamera::new(35.0, 1.0, 0.1, 1000.0);
        assert!(
            Renderer::new(10.0, 10.0, 1.0)
                .render(&world, &cam)
                .commands
                .is_empty()
        );
    }
}
