//! Animation plan command implementations

use anyhow::{Context, Result, bail};
use bonebake_anim::{AnimationClip, AnimationPlan, BoneMatrixLayout};
use bonebake_scene::Scene;
use clap::{Args, Subcommand};
use glam::Mat4;
use serde::Serialize;
use std::path::PathBuf;

use crate::commands::scene::load_scene;
use crate::utils::{
    add_indexed_row, add_table_row, create_table, format_matrix_rows, format_optional_index,
    format_ticks,
};

#[derive(Subcommand)]
pub enum AnimCommands {
    /// Build an animation plan and list its records
    Plan {
        #[command(flatten)]
        target: PlanTarget,
    },

    /// Evaluate an animation plan and print the bone matrices
    Sample {
        #[command(flatten)]
        target: PlanTarget,

        /// Time to sample, in seconds unless --ticks is given
        #[arg(short, long, allow_negative_numbers = true)]
        time: f64,

        /// Interpret --time as ticks
        #[arg(long)]
        ticks: bool,

        /// Wrap the time into the animation instead of holding the last pose
        #[arg(long = "loop")]
        looped: bool,

        /// Print the matrices as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Scene, animation and meshes a plan is built for
#[derive(Args)]
pub struct PlanTarget {
    /// Path to the scene file
    file: PathBuf,

    /// Animation index
    #[arg(short, long, default_value = "0")]
    animation: usize,

    /// Mesh index to animate (repeatable, defaults to all meshes)
    #[arg(short, long = "mesh")]
    meshes: Vec<usize>,

    /// Matrices between consecutive meshes (defaults to the largest bone count)
    #[arg(long)]
    stride: Option<usize>,

    /// Matrices reserved per mesh (defaults to the stride)
    #[arg(long)]
    max_bones: Option<usize>,
}

pub fn execute(cmd: AnimCommands) -> Result<()> {
    match cmd {
        AnimCommands::Plan { target } => handle_plan(&target),
        AnimCommands::Sample {
            target,
            time,
            ticks,
            looped,
            json,
        } => handle_sample(&target, time, ticks, looped, json),
    }
}

struct PreparedPlan {
    scene: Scene,
    plan: AnimationPlan,
    storage: Vec<Mat4>,
}

fn prepare(target: &PlanTarget) -> Result<PreparedPlan> {
    let scene = load_scene(&target.file)?;

    let meshes = if target.meshes.is_empty() {
        scene.select_all_meshes()
    } else {
        target.meshes.clone()
    };
    if meshes.is_empty() {
        bail!("Scene {} has no meshes to animate", target.file.display());
    }

    let widest = meshes
        .iter()
        .filter_map(|&m| scene.mesh(m))
        .map(|m| m.bones.len())
        .max()
        .unwrap_or(0)
        .max(1);
    let stride = target.stride.unwrap_or(widest);
    let layout = BoneMatrixLayout::strided(0, stride)
        .with_max_bone_matrices(target.max_bones.unwrap_or(stride));

    let mut storage = vec![Mat4::IDENTITY; layout.required_len(meshes.len())];
    let plan = AnimationPlan::build(&scene, target.animation, &meshes, layout, &mut storage)
        .with_context(|| {
            format!(
                "Failed to plan animation {} for meshes {:?}",
                target.animation, meshes
            )
        })?;

    Ok(PreparedPlan {
        scene,
        plan,
        storage,
    })
}

fn handle_plan(target: &PlanTarget) -> Result<()> {
    let PreparedPlan { scene, plan, .. } = prepare(target)?;
    let layout = plan.layout();

    let animation_name = scene
        .animation(plan.animation_index())
        .map_or("", |a| a.name.as_str());
    println!("=== Animation Plan ===");
    println!("Animation: {} '{}'", plan.animation_index(), animation_name);
    println!(
        "Layout: base {}, stride {}, max bones {}",
        layout.base, layout.stride, layout.max_bone_matrices
    );
    println!("Required storage: {} matrices", plan.required_len());
    println!("Bone targets: {}", plan.bone_target_count());

    println!("\n=== Meshes ===");
    let mut table = create_table(&["Mesh", "Name", "Base slot", "Bones"]);
    for mesh in plan.mesh_targets() {
        add_table_row(
            &mut table,
            [
                mesh.mesh_index.to_string(),
                scene.name_of_mesh(mesh.mesh_index)?.to_string(),
                mesh.base_slot.to_string(),
                mesh.bone_count.to_string(),
            ],
        );
    }
    table.printstd();

    println!("\n=== Records ===");
    let mut table = create_table(&[
        "#",
        "Node",
        "Channel",
        "Animated parent",
        "Keys (P/R/S)",
        "Slots",
    ]);
    for (index, record) in plan.records().iter().enumerate() {
        let slots: Vec<String> = record
            .bone_targets()
            .iter()
            .map(|t| t.slot.to_string())
            .collect();
        add_indexed_row(
            &mut table,
            index,
            [
                record.name().to_string(),
                record
                    .channel()
                    .map_or_else(|| "synthesized".to_string(), |c| c.to_string()),
                format_optional_index(record.animated_parent()),
                format!(
                    "{}/{}/{}",
                    record.position_keys().len(),
                    record.rotation_keys().len(),
                    record.scaling_keys().len()
                ),
                slots.join(", "),
            ],
        );
    }
    table.printstd();

    Ok(())
}

#[derive(Serialize)]
struct SampleReport<'a> {
    animation: usize,
    animation_name: &'a str,
    time_ticks: f64,
    layout: BoneMatrixLayout,
    meshes: Vec<MeshReport<'a>>,
}

#[derive(Serialize)]
struct MeshReport<'a> {
    mesh_index: usize,
    name: &'a str,
    base_slot: usize,
    bones: Vec<BoneReport<'a>>,
}

#[derive(Serialize)]
struct BoneReport<'a> {
    bone_index: usize,
    name: &'a str,
    slot: usize,
    /// Column-major
    matrix: [f32; 16],
}

fn handle_sample(
    target: &PlanTarget,
    time: f64,
    ticks: bool,
    looped: bool,
    json: bool,
) -> Result<()> {
    let PreparedPlan {
        scene,
        mut plan,
        mut storage,
    } = prepare(target)?;
    let animation_index = plan.animation_index();

    let time_ticks = if ticks && !looped {
        plan.evaluate(time, &mut storage)?;
        time
    } else {
        let clip = AnimationClip::full(&scene, animation_index)
            .with_context(|| format!("Failed to load clip of animation {animation_index}"))?;
        match (ticks, looped) {
            (false, false) => {
                plan.animate(&clip, time, &mut storage)?;
                clip.ticks_at(time)
            }
            (true, _) => {
                let wrapped = clip.looped_ticks(time / clip.ticks_per_second);
                plan.evaluate(wrapped, &mut storage)?;
                wrapped
            }
            (false, true) => {
                let wrapped = clip.looped_ticks(time);
                plan.evaluate(wrapped, &mut storage)?;
                wrapped
            }
        }
    };

    let report = build_report(&scene, &plan, &storage, time_ticks)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let ticks_per_second = scene
        .animation(animation_index)
        .map_or(0.0, |a| a.ticks_per_second);
    println!(
        "=== Bone matrices of animation {} '{}' at {} ===",
        report.animation,
        report.animation_name,
        format_ticks(time_ticks, ticks_per_second)
    );
    for mesh in &report.meshes {
        println!(
            "\nMesh {} '{}' (base slot {})",
            mesh.mesh_index, mesh.name, mesh.base_slot
        );
        for bone in &mesh.bones {
            println!("  [{}] {}", bone.slot, bone.name);
            for row in format_matrix_rows(&Mat4::from_cols_array(&bone.matrix)) {
                println!("      {row}");
            }
        }
    }

    Ok(())
}

fn build_report<'a>(
    scene: &'a Scene,
    plan: &AnimationPlan,
    storage: &[Mat4],
    time_ticks: f64,
) -> Result<SampleReport<'a>> {
    let animation_name = scene
        .animation(plan.animation_index())
        .map_or("", |a| a.name.as_str());

    let mut meshes = Vec::with_capacity(plan.mesh_targets().len());
    for target in plan.mesh_targets() {
        let mesh = scene
            .mesh(target.mesh_index)
            .with_context(|| format!("Mesh {} disappeared", target.mesh_index))?;
        let bones = mesh
            .bones
            .iter()
            .enumerate()
            .map(|(bone_index, bone)| {
                let slot = target.base_slot + bone_index;
                BoneReport {
                    bone_index,
                    name: bone.name.as_str(),
                    slot,
                    matrix: storage
                        .get(slot)
                        .copied()
                        .unwrap_or(Mat4::IDENTITY)
                        .to_cols_array(),
                }
            })
            .collect();
        meshes.push(MeshReport {
            mesh_index: target.mesh_index,
            name: mesh.name.as_str(),
            base_slot: target.base_slot,
            bones,
        });
    }

    Ok(SampleReport {
        animation: plan.animation_index(),
        animation_name,
        time_ticks,
        layout: plan.layout(),
        meshes,
    })
}
