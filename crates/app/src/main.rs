//! Scene bootstrap: loads OBJ meshes, lays them out as scene objects and
//! reports what a renderer would upload.

use anyhow::{Result, bail};
use asset::{LoadOptions, Mesh, Weld};
use corelib::{
    Vec3,
    scene::{MeshId, Renderable, Scene},
    transform::Transform,
};

fn parse_weld_arg() -> Weld {
    // Accept: --weld=off|linear|hash
    let mut weld = Weld::default();
    for arg in std::env::args() {
        if let Some(val) = arg.strip_prefix("--weld=") {
            weld = match val.to_ascii_lowercase().as_str() {
                "off" | "none" => Weld::Off,
                "linear" | "scan" => Weld::LinearScan,
                "hash" | "hashed" => Weld::Hashed,
                other => {
                    log::warn!("Unknown weld mode '{}', falling back to hash.", other);
                    Weld::Hashed
                }
            };
        }
    }
    weld
}

fn parse_tangents_arg() -> bool {
    std::env::args().any(|arg| arg == "--tangents")
}

fn parse_spin_args() -> (f32, u32) {
    let mut speed = 0.0;
    let mut frames = 0;
    for arg in std::env::args() {
        if let Some(v) = arg.strip_prefix("--spin=") {
            if let Ok(s) = v.parse::<f32>() {
                speed = s;
            }
        } else if let Some(v) = arg.strip_prefix("--frames=") {
            if let Ok(n) = v.parse::<u32>() {
                frames = n;
            }
        }
    }
    (speed, frames)
}

fn mesh_paths() -> Vec<String> {
    std::env::args().skip(1).filter(|a| !a.starts_with("--")).collect()
}

fn log_mesh(name: &str, mesh: &Mesh, tangents: bool) {
    let indices = mesh.index_buffer();
    log::info!(
        "{}: {} triangles, {} vertices ({} bytes), {} indices as {:?} ({} bytes)",
        name,
        mesh.triangle_count(),
        mesh.vertices.len(),
        mesh.vertex_bytes().len(),
        indices.len(),
        indices.format(),
        indices.as_bytes().len()
    );
    if let Some(bounds) = mesh.bounds() {
        log::info!("{}: bounds center={} extent={}", name, bounds.center(), bounds.extent());
    }
    if tangents {
        let frames = asset::compute_tangents(mesh);
        let mirrored = frames.iter().filter(|t| t[3] < 0.0).count();
        log::info!("{}: {} tangents, {} mirrored", name, frames.len(), mirrored);
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let options = LoadOptions::default().with_weld(parse_weld_arg());
    let tangents = parse_tangents_arg();
    let (spin, frames) = parse_spin_args();
    let paths = mesh_paths();
    if paths.is_empty() {
        bail!("usage: app [--weld=off|linear|hash] [--tangents] [--spin=<rad/s> --frames=<n>] <file.obj>...");
    }
    log::info!("Loading {} mesh(es), weld={:?}", paths.len(), options.weld);

    let mut meshes: Vec<Mesh> = Vec::new();
    let mut scene = Scene::new();
    for path in &paths {
        let mesh = match asset::load_mesh_with(path, &options) {
            Ok(mesh) => mesh,
            Err(err) => {
                // A failed load only drops this object from the scene.
                log::warn!("Skipping {}: {}", path, err);
                continue;
            }
        };
        log_mesh(path, &mesh, tangents);

        let id = MeshId(meshes.len() as u32);
        let slot = scene.len() as f32;
        scene.spawn(
            path.as_str(),
            Transform::from_translation(Vec3::new(slot * 3.0, 0.0, -5.0)),
            Some(Renderable { mesh: id }),
        );
        meshes.push(mesh);
    }

    let dt = 1.0 / 60.0;
    for _ in 0..frames {
        scene.system_spin_y(dt, spin);
    }

    for (entity, transform, renderable) in scene.iter_renderables() {
        let mesh = &meshes[renderable.mesh.0 as usize];
        log::info!(
            "Object {} '{}': mesh {:?}, {} indices, translation={}",
            entity,
            scene.name(entity).unwrap_or("?"),
            renderable.mesh,
            mesh.indices.len(),
            transform.translation
        );
    }

    if scene.is_empty() {
        bail!("No meshes could be loaded");
    }
    log::info!("Scene ready with {} object(s). Bye!", scene.len());
    Ok(())
}
