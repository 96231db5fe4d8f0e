//! Built-in demo scenes.

use anyhow::Result;
use lumen_renderer::{
    AxisRect, Camera, CameraSettings, Color, Cuboid, Dielectric, DiffuseLight, FlipFace,
    Hittable, HittableList, Lambertian, Material, Metal, RectPlane, RotateY, Scene, Sphere,
    Translate, Vec3,
};
use std::sync::Arc;

/// Side length of the Cornell room.
const ROOM: f32 = 555.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SceneKind {
    /// Cornell box with an aluminium block and a glass sphere; both the
    /// ceiling light and the sphere are importance-sampled
    Cornell,
    /// Cornell box with a white block; only the glass sphere is sampled
    CornellGlass,
    /// A single emissive panel filling the frame
    LightPanel,
}

/// Build the scene and a camera matching `aspect_ratio`.
pub fn build(kind: SceneKind, aspect_ratio: f32) -> Result<(Scene, Camera)> {
    match kind {
        SceneKind::Cornell => cornell_box(false, aspect_ratio),
        SceneKind::CornellGlass => cornell_box(true, aspect_ratio),
        SceneKind::LightPanel => light_panel(aspect_ratio),
    }
}

fn cornell_box(glass_only: bool, aspect_ratio: f32) -> Result<(Scene, Camera)> {
    let red: Arc<dyn Material> = Arc::new(Lambertian::new(Color::new(0.65, 0.05, 0.05)));
    let white: Arc<dyn Material> = Arc::new(Lambertian::new(Color::splat(0.73)));
    let green: Arc<dyn Material> = Arc::new(Lambertian::new(Color::new(0.12, 0.45, 0.15)));
    let light: Arc<dyn Material> = Arc::new(DiffuseLight::new(Color::splat(15.0)));
    let aluminum: Arc<dyn Material> = Arc::new(Metal::new(Color::new(0.8, 0.85, 0.88), 0.0));
    let glass: Arc<dyn Material> = Arc::new(Dielectric::new(1.5));

    // Faces down into the room.
    let ceiling_light: Arc<dyn Hittable> = Arc::new(FlipFace::new(Arc::new(AxisRect::new(
        RectPlane::XZ,
        (213.0, 343.0),
        (227.0, 332.0),
        554.0,
        light,
    ))));

    let (block_material, block_angle) = if glass_only {
        (white.clone(), 15.0)
    } else {
        (aluminum, 45.0)
    };
    let block: Arc<dyn Hittable> = Arc::new(Cuboid::new(
        Vec3::ZERO,
        Vec3::new(165.0, 330.0, 165.0),
        block_material,
    ));
    let block: Arc<dyn Hittable> = Arc::new(RotateY::new(block, block_angle));
    let block: Arc<dyn Hittable> = Arc::new(Translate::new(block, Vec3::new(265.0, 0.0, 295.0)));

    let glass_sphere: Arc<dyn Hittable> =
        Arc::new(Sphere::new(Vec3::new(190.0, 90.0, 190.0), 90.0, glass));

    let mut world = HittableList::new();
    world.add(Arc::new(AxisRect::new(RectPlane::YZ, (0.0, ROOM), (0.0, ROOM), ROOM, green)));
    world.add(Arc::new(AxisRect::new(RectPlane::YZ, (0.0, ROOM), (0.0, ROOM), 0.0, red)));
    world.add(ceiling_light.clone());
    world.add(Arc::new(AxisRect::new(
        RectPlane::XZ,
        (0.0, ROOM),
        (0.0, ROOM),
        0.0,
        white.clone(),
    )));
    world.add(Arc::new(AxisRect::new(
        RectPlane::XZ,
        (0.0, ROOM),
        (0.0, ROOM),
        ROOM,
        white.clone(),
    )));
    world.add(Arc::new(AxisRect::new(RectPlane::XY, (0.0, ROOM), (0.0, ROOM), ROOM, white)));
    world.add(block);
    world.add(glass_sphere.clone());

    let mut lights = HittableList::new();
    if !glass_only {
        lights.add(ceiling_light);
    }
    lights.add(glass_sphere);

    let scene = Scene::new(world, lights, Color::ZERO)?;
    let camera = CameraSettings::new()
        .with_position(Vec3::new(278.0, 278.0, -800.0), Vec3::new(278.0, 278.0, 0.0), Vec3::Y)
        .with_lens(40.0, 0.0, 10.0)
        .with_aspect_ratio(aspect_ratio)
        .with_shutter(0.0, 1.0)
        .build()?;

    Ok((scene, camera))
}

fn light_panel(aspect_ratio: f32) -> Result<(Scene, Camera)> {
    let panel: Arc<dyn Hittable> = Arc::new(AxisRect::new(
        RectPlane::XY,
        (-10.0, 10.0),
        (-10.0, 10.0),
        0.0,
        Arc::new(DiffuseLight::new(Color::new(1.0, 0.9, 0.7))),
    ));

    let world: HittableList = [panel.clone()].into_iter().collect();
    let lights: HittableList = [panel].into_iter().collect();
    let scene = Scene::new(world, lights, Color::ZERO)?;
    let camera = CameraSettings::new()
        .with_position(Vec3::new(0.0, 0.0, 2.0), Vec3::ZERO, Vec3::Y)
        .with_lens(60.0, 0.0, 2.0)
        .with_aspect_ratio(aspect_ratio)
        .build()?;

    Ok((scene, camera))
}
