use bonebake_anim::{AnimationPlan, BoneMatrixLayout};
use bonebake_scene::{
    Animation, Bone, Channel, Mesh, NodeDescription, QuatKey, Scene, SceneDescription, VectorKey,
};
use criterion::{Criterion, criterion_group, criterion_main};
use glam::{Mat4, Quat, Vec3};
use std::hint::black_box;

const BONES: usize = 64;

/// A single chain of `BONES` animated joints skinning one mesh
fn create_test_scene() -> Scene {
    let mut joint = NodeDescription::new(format!("joint_{}", BONES - 1));
    for i in (0..BONES - 1).rev() {
        joint = NodeDescription::new(format!("joint_{i}"))
            .with_transform(Mat4::from_translation(Vec3::Y))
            .with_child(joint);
    }

    let channels = (0..BONES)
        .map(|i| {
            let mut channel = Channel::new(format!("joint_{i}"));
            for k in 0..30 {
                let t = f64::from(k);
                channel
                    .position_keys
                    .push(VectorKey::new(t, Vec3::new(0.0, 1.0, k as f32 * 0.01)));
                channel
                    .rotation_keys
                    .push(QuatKey::new(t, Quat::from_rotation_x(k as f32 * 0.05)));
            }
            channel
        })
        .collect();

    let mesh = Mesh {
        name: "body".to_string(),
        vertex_count: 0,
        bones: (0..BONES)
            .map(|i| Bone::new(format!("joint_{i}"), Mat4::IDENTITY))
            .collect(),
    };

    Scene::from_description(SceneDescription {
        root: NodeDescription::new("root").with_mesh(0).with_child(joint),
        meshes: vec![mesh],
        animations: vec![Animation {
            name: "bench".to_string(),
            duration: 29.0,
            ticks_per_second: 30.0,
            channels,
        }],
    })
    .unwrap()
}

fn bench_plan_build(c: &mut Criterion) {
    let scene = create_test_scene();
    let layout = BoneMatrixLayout::tightly_packed(BONES);
    let mut storage = vec![Mat4::IDENTITY; BONES];

    c.bench_function("build_plan", |b| {
        b.iter(|| {
            let _plan =
                AnimationPlan::build(black_box(&scene), 0, &[0], layout, &mut storage).unwrap();
        })
    });
}

fn bench_evaluate(c: &mut Criterion) {
    let scene = create_test_scene();
    let layout = BoneMatrixLayout::tightly_packed(BONES);
    let mut storage = vec![Mat4::IDENTITY; BONES];
    let mut plan = AnimationPlan::build(&scene, 0, &[0], layout, &mut storage).unwrap();

    let mut time = 0.0;
    c.bench_function("evaluate_plan", |b| {
        b.iter(|| {
            time = (time + 0.7) % 29.0;
            plan.evaluate(black_box(time), &mut storage).unwrap();
        })
    });
}

criterion_group!(benches, bench_plan_build, bench_evaluate);
criterion_main!(benches);
