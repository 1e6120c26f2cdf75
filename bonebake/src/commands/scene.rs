//! Scene description command implementations

use anyhow::{Context, Result};
use bonebake_scene::Scene;
use clap::Subcommand;
use std::path::{Path, PathBuf};

use crate::utils::{
    TreeOptions, add_indexed_row, create_table, format_ticks, render_tree, scene_tree,
};

#[derive(Subcommand)]
pub enum SceneCommands {
    /// Display information about a scene description
    Info {
        /// Path to the scene file (.json, .yaml, .yml)
        file: PathBuf,

        /// Show bones and channels as well
        #[arg(short, long)]
        detailed: bool,
    },

    /// Display the node hierarchy as a tree
    Tree {
        /// Path to the scene file
        file: PathBuf,

        /// Maximum depth to display
        #[arg(short, long)]
        depth: Option<usize>,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,

        /// Show node annotations on the node line
        #[arg(short, long)]
        compact: bool,
    },
}

pub fn execute(cmd: SceneCommands) -> Result<()> {
    match cmd {
        SceneCommands::Info { file, detailed } => handle_info(&file, detailed),
        SceneCommands::Tree {
            file,
            depth,
            no_color,
            compact,
        } => handle_tree(&file, depth, no_color, compact),
    }
}

/// Load a scene with file context on failure
pub fn load_scene(path: &Path) -> Result<Scene> {
    log::info!("Loading scene: {}", path.display());
    Scene::load(path).with_context(|| format!("Failed to load scene from {}", path.display()))
}

fn handle_info(path: &Path, detailed: bool) -> Result<()> {
    let scene = load_scene(path)?;

    println!("=== Scene Information ===");
    println!("File: {}", path.display());
    println!("Nodes: {}", scene.node_count());
    println!("Meshes: {}", scene.mesh_count());
    println!("Animations: {}", scene.animation_count());

    if scene.mesh_count() > 0 {
        println!("\n=== Meshes ===");
        let mut table = create_table(&["#", "Name", "Vertices", "Bones", "Placed at"]);
        for (index, mesh) in scene.meshes().iter().enumerate() {
            let placed_at = scene
                .iter_nodes()
                .find(|(_, n)| n.meshes.contains(&index))
                .map_or_else(|| "-".to_string(), |(_, n)| n.name.clone());
            add_indexed_row(
                &mut table,
                index,
                [
                    mesh.name.clone(),
                    mesh.vertex_count.to_string(),
                    mesh.bones.len().to_string(),
                    placed_at,
                ],
            );
        }
        table.printstd();
    }

    if scene.has_animations() {
        println!("\n=== Animations ===");
        let mut table = create_table(&["#", "Name", "Duration", "Ticks/s", "Channels"]);
        for (index, animation) in scene.animations().iter().enumerate() {
            add_indexed_row(
                &mut table,
                index,
                [
                    animation.name.clone(),
                    format_ticks(animation.duration, animation.ticks_per_second),
                    format!("{}", animation.ticks_per_second),
                    animation.channels.len().to_string(),
                ],
            );
        }
        table.printstd();
    }

    if detailed {
        for (index, mesh) in scene.meshes().iter().enumerate() {
            println!("\n=== Bones of mesh {index} '{}' ===", mesh.name);
            let mut table = create_table(&["#", "Bone", "Weights"]);
            for (bone_index, bone) in mesh.bones.iter().enumerate() {
                add_indexed_row(
                    &mut table,
                    bone_index,
                    [bone.name.clone(), bone.weights.len().to_string()],
                );
            }
            table.printstd();
        }

        for (index, animation) in scene.animations().iter().enumerate() {
            println!("\n=== Channels of animation {index} '{}' ===", animation.name);
            let mut table = create_table(&["#", "Node", "Position", "Rotation", "Scaling"]);
            for (channel_index, channel) in animation.channels.iter().enumerate() {
                add_indexed_row(
                    &mut table,
                    channel_index,
                    [
                        channel.node_name.clone(),
                        channel.position_keys.len().to_string(),
                        channel.rotation_keys.len().to_string(),
                        channel.scaling_keys.len().to_string(),
                    ],
                );
            }
            table.printstd();
        }
    }

    Ok(())
}

fn handle_tree(
    path: &Path,
    max_depth: Option<usize>,
    no_color: bool,
    compact: bool,
) -> Result<()> {
    let scene = load_scene(path)?;

    let options = TreeOptions {
        max_depth,
        no_color,
        show_metadata: true,
        compact,
    };

    let tree_output = render_tree(&scene_tree(&scene), &options);
    print!("{tree_output}");
    Ok(())
}
