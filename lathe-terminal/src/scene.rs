/// Demo scenes and display modes for the viewer
use clap::ValueEnum;
use lathe_core::{
    revolve_profile_with_options, Mesh, MeshDiagnostics, ProfileCurve, RevolveOptions,
};
use nalgebra::Point3;
use tracing::info;

/// The active mesh, selected with the number keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Scene {
    Sphere,
    Torus,
    Spikes,
    SpikesHighRes,
}

impl Scene {
    pub const ALL: [Scene; 4] = [
        Scene::Sphere,
        Scene::Torus,
        Scene::Spikes,
        Scene::SpikesHighRes,
    ];

    pub fn from_key(key: char) -> Option<Self> {
        match key {
            '1' => Some(Scene::Sphere),
            '2' => Some(Scene::Torus),
            '3' => Some(Scene::Spikes),
            '4' => Some(Scene::SpikesHighRes),
            _ => None,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Scene::Sphere => "Sphere",
            Scene::Torus => "Torus",
            Scene::Spikes => "Spikes",
            Scene::SpikesHighRes => "Spikes (shared seam)",
        }
    }

    fn index(&self) -> usize {
        match self {
            Scene::Sphere => 0,
            Scene::Torus => 1,
            Scene::Spikes => 2,
            Scene::SpikesHighRes => 3,
        }
    }

    /// Profile, grid resolution and seam policy for this scene
    fn recipe(&self, config: &SceneConfig) -> (ProfileCurve, u32, u32, RevolveOptions) {
        match self {
            Scene::Sphere => (ProfileCurve::HalfCircle, 16, 16, RevolveOptions::DUPLICATED_SEAM),
            Scene::Torus => (ProfileCurve::Circle, 16, 16, RevolveOptions::DUPLICATED_SEAM),
            Scene::Spikes => (ProfileCurve::spikes(), 64, 32, RevolveOptions::DUPLICATED_SEAM),
            Scene::SpikesHighRes => (
                ProfileCurve::spikes(),
                config.high_res_steps,
                config.high_res_steps,
                RevolveOptions::SHARED_SEAM,
            ),
        }
    }
}

/// How the active mesh is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DisplayMode {
    /// Triangle edges only
    Wireframe,
    /// Lambert shading from interpolated vertex normals
    Shaded,
    /// Glyph and colour by dominant normal axis
    Normals,
}

impl DisplayMode {
    pub fn next(self) -> Self {
        match self {
            DisplayMode::Wireframe => DisplayMode::Shaded,
            DisplayMode::Shaded => DisplayMode::Normals,
            DisplayMode::Normals => DisplayMode::Wireframe,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            DisplayMode::Wireframe => "wireframe",
            DisplayMode::Shaded => "shaded",
            DisplayMode::Normals => "normals",
        }
    }
}

/// Scene generation settings
#[derive(Debug, Clone, Copy)]
pub struct SceneConfig {
    /// Profile and revolution steps of the high-resolution scene
    pub high_res_steps: u32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            high_res_steps: 256,
        }
    }
}

/// A generated mesh with its bounding sphere
pub struct SceneMesh {
    pub mesh: Mesh,
    pub diagnostics: MeshDiagnostics,
    pub center: Point3<f32>,
    pub radius: f32,
}

impl SceneMesh {
    pub fn new(mesh: Mesh, diagnostics: MeshDiagnostics) -> Self {
        let (center, radius) = match mesh.bounds() {
            Some((min, max)) => {
                let center = nalgebra::center(&min, &max);
                let radius = mesh
                    .positions
                    .iter()
                    .map(|p| (p - center).norm())
                    .fold(0.0f32, f32::max);
                (center, radius)
            }
            None => (Point3::origin(), 1.0),
        };

        Self {
            mesh,
            diagnostics,
            center,
            radius,
        }
    }
}

/// Every scene's mesh, generated once up front
pub struct SceneSet {
    meshes: Vec<SceneMesh>,
}

impl SceneSet {
    pub fn build(config: &SceneConfig) -> lathe_core::Result<Self> {
        let meshes = Scene::ALL
            .iter()
            .map(|scene| {
                let (profile, profile_steps, revolution_steps, options) = scene.recipe(config);
                let (mesh, diagnostics) = revolve_profile_with_options(
                    &profile,
                    profile_steps,
                    revolution_steps,
                    options,
                )?;
                info!(
                    scene = scene.title(),
                    profile = profile.name(),
                    vertices = mesh.vertex_count(),
                    triangles = mesh.triangle_count(),
                    fallback_normals = diagnostics.fallback_normals,
                    "generated scene mesh"
                );
                Ok(SceneMesh::new(mesh, diagnostics))
            })
            .collect::<lathe_core::Result<Vec<_>>>()?;

        Ok(Self { meshes })
    }

    pub fn get(&self, scene: Scene) -> &SceneMesh {
        &self.meshes[scene.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scene_keys() {
        for (key, scene) in ['1', '2', '3', '4'].into_iter().zip(Scene::ALL) {
            assert_eq!(Scene::from_key(key), Some(scene));
            assert_eq!(scene.index(), Scene::ALL.iter().position(|s| *s == scene).unwrap());
        }
        assert_eq!(Scene::from_key('5'), None);
    }

    #[test]
    fn test_display_mode_cycles() {
        let mut mode = DisplayMode::Wireframe;
        for _ in 0..3 {
            mode = mode.next();
        }
        assert_eq!(mode, DisplayMode::Wireframe);
    }

    #[test]
    fn test_scene_set_builds_all_meshes() {
        let set = SceneSet::build(&SceneConfig { high_res_steps: 32 }).unwrap();

        let sphere = set.get(Scene::Sphere);
        assert_eq!(sphere.mesh.vertex_count(), 17 * 17);
        assert!((sphere.radius - 1.0).abs() < 1e-4);

        let high_res = set.get(Scene::SpikesHighRes);
        assert_eq!(high_res.mesh.vertex_count(), 33 * 32);
        assert_eq!(high_res.mesh.indices.len(), 6 * 32 * 32);

        for scene in Scene::ALL {
            assert_eq!(set.get(scene).mesh.validate(), Ok(()));
        }
    }
}
