/// Example: Print buffer sizes and diagnostics for every viewer scene
///
/// Usage: cargo run --example mesh_stats -- [high-res-steps]
use std::env;
use std::process;

use lathe_terminal::{Scene, SceneConfig, SceneSet};

fn main() {
    let mut config = SceneConfig::default();
    if let Some(arg) = env::args().nth(1) {
        config.high_res_steps = match arg.parse() {
            Ok(steps) => steps,
            Err(e) => {
                eprintln!("Invalid step count '{}': {}", arg, e);
                process::exit(2);
            }
        };
    }

    let scenes = match SceneSet::build(&config) {
        Ok(scenes) => scenes,
        Err(e) => {
            eprintln!("Failed to generate meshes: {}", e);
            process::exit(1);
        }
    };

    for scene in Scene::ALL {
        let entry = scenes.get(scene);
        println!("{}", scene.title());
        println!("  vertices:             {}", entry.mesh.vertex_count());
        println!("  indices:              {}", entry.mesh.indices.len());
        println!("  fallback normals:     {}", entry.diagnostics.fallback_normals);
        println!("  degenerate triangles: {}", entry.diagnostics.degenerate_triangles);
        println!("  bounding radius:      {:.3}", entry.radius);
    }
}
