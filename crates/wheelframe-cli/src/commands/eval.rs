use std::path::Path;

use anyhow::{anyhow, Result};

use wheelframe_core::Scene;

pub fn run(scene_path: &Path, position: f64, layer: Option<&str>) -> Result<()> {
    let scene = Scene::load(scene_path)?;

    let results = scene.evaluate_layers(position);
    let results: Vec<_> = match layer {
        Some(name) => {
            let found: Vec<_> = results.into_iter().filter(|(n, _)| *n == name).collect();
            if found.is_empty() {
                return Err(anyhow!(
                    "Layer '{}' not found in {}",
                    name,
                    scene_path.display()
                ));
            }
            found
        }
        None => results,
    };

    if results.is_empty() {
        println!("Scene has no layers.");
        return Ok(());
    }

    for (name, transform) in results {
        match transform {
            Some(transform) => println!("{}: {}", name, transform),
            None => println!("{}: (none)", name),
        }
    }

    Ok(())
}
