//! Demo scene assembly.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use lumen_core::ImageData;
use lumen_renderer::sampling::{gen_f32, gen_range_f32, random_color};
use lumen_math::{Color, Point3, Vec3};
use lumen_renderer::{
    load_triangles, make_box, make_pyramid, transform_triangles, BvhNode, Camera, CheckerTexture,
    ConstantMedium, Dielectric, DiffuseLight, Hittable, HittableList, ImageTexture, Lambertian,
    Material, Metal, NoiseTexture, Quad, RotateY, Sphere, Texture, Translate,
};
use rand::RngCore;

use crate::cli::SceneKind;

const SKY: Color = Color::new(0.70, 0.80, 1.00);

/// External files some scenes need.
#[derive(Debug, Clone, Default)]
pub struct SceneAssets {
    pub model: Option<PathBuf>,
    pub texture: Option<PathBuf>,
}

/// A camera with its default settings plus the objects it looks at.
pub struct Scene {
    pub camera: Camera,
    pub world: HittableList,
}

/// Assemble the named scene. `rng` drives random placement and noise tables.
pub fn build(kind: SceneKind, assets: &SceneAssets, rng: &mut dyn RngCore) -> Result<Scene> {
    let scene = match kind {
        SceneKind::Spheres => spheres(rng),
        SceneKind::Checkered => checkered(),
        SceneKind::Earth => earth(assets)?,
        SceneKind::Perlin => perlin(rng),
        SceneKind::Quads => quads(),
        SceneKind::Light => simple_light(rng),
        SceneKind::Cornell => cornell(),
        SceneKind::Final => final_scene(assets, rng)?,
        SceneKind::Model => model(assets)?,
    };
    log::info!("Built scene {:?} with {} top-level objects", kind, scene.world.len());
    Ok(scene)
}

fn lambertian(albedo: Color) -> Arc<dyn Material> {
    Arc::new(Lambertian::new(albedo))
}

fn textured(tex: Arc<dyn Texture>) -> Arc<dyn Material> {
    Arc::new(Lambertian::from_texture(tex))
}

/// Open an image by path, falling back to the image search directories.
fn load_image(path: &Path) -> Result<ImageData> {
    if path.exists() {
        return ImageData::open(path).with_context(|| format!("failed to load {}", path.display()));
    }
    let name = path.to_string_lossy();
    ImageData::find(&name).with_context(|| format!("failed to find image {}", name))
}

/// Sky-lit camera looking at the origin from (13, 2, 3).
fn sky_camera() -> Camera {
    Camera::new()
        .with_image(1000, 16.0 / 9.0)
        .with_quality(100, 50)
        .with_position(Point3::new(13.0, 2.0, 3.0), Point3::ZERO, Vec3::Y)
        .with_lens(20.0, 0.0, 10.0)
        .with_background(SKY)
}

fn box_camera(output: &str) -> Camera {
    Camera::new()
        .with_image(600, 1.0)
        .with_quality(200, 50)
        .with_position(
            Point3::new(278.0, 278.0, -800.0),
            Point3::new(278.0, 278.0, 0.0),
            Vec3::Y,
        )
        .with_lens(40.0, 0.0, 10.0)
        .with_output(output)
}

fn spheres(rng: &mut dyn RngCore) -> Scene {
    let mut world = HittableList::new();

    let ground = Arc::new(CheckerTexture::from_colors(
        0.32,
        Color::splat(0.9),
        Color::splat(0.5),
    ));
    world.add(Arc::new(Sphere::new(
        Point3::new(0.0, -1000.0, 0.0),
        1000.0,
        textured(ground),
    )));

    for a in -11..11 {
        for b in -11..11 {
            let choose_mat = gen_f32(rng);
            let center = Point3::new(
                a as f32 + 0.9 * gen_f32(rng),
                0.2,
                b as f32 + 0.9 * gen_f32(rng),
            );

            if (center - Point3::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            if choose_mat < 0.8 {
                let albedo = random_color(rng, 0.0, 1.0) * random_color(rng, 0.0, 1.0);
                let bounce = center + Vec3::new(0.0, gen_range_f32(rng, 0.0, 0.5), 0.0);
                world.add(Arc::new(Sphere::moving(center, bounce, 0.2, lambertian(albedo))));
            } else if choose_mat < 0.95 {
                let albedo = random_color(rng, 0.5, 1.0);
                let fuzz = gen_range_f32(rng, 0.0, 0.5);
                world.add(Arc::new(Sphere::new(center, 0.2, Arc::new(Metal::new(albedo, fuzz)))));
            } else {
                world.add(Arc::new(Sphere::new(center, 0.2, Arc::new(Dielectric::new(1.5)))));
            }
        }
    }

    world.add(Arc::new(Sphere::new(
        Point3::new(0.0, 1.0, 0.0),
        1.0,
        Arc::new(Dielectric::new(1.5)),
    )));
    world.add(Arc::new(Sphere::new(
        Point3::new(-4.0, 1.0, 0.0),
        1.0,
        lambertian(Color::new(0.4, 0.2, 0.1)),
    )));
    world.add(Arc::new(Sphere::new(
        Point3::new(4.0, 1.0, 0.0),
        1.0,
        Arc::new(Metal::new(Color::new(0.7, 0.6, 0.5), 0.0)),
    )));

    Scene {
        camera: sky_camera().with_lens(20.0, 0.6, 10.0).with_output("spheres.png"),
        world,
    }
}

fn checkered() -> Scene {
    let checker: Arc<dyn Texture> = Arc::new(CheckerTexture::from_colors(
        0.32,
        Color::new(0.2, 0.3, 0.1),
        Color::splat(0.9),
    ));

    let mut world = HittableList::new();
    world.add(Arc::new(Sphere::new(
        Point3::new(0.0, -10.0, 0.0),
        10.0,
        textured(Arc::clone(&checker)),
    )));
    world.add(Arc::new(Sphere::new(
        Point3::new(0.0, 10.0, 0.0),
        10.0,
        textured(checker),
    )));

    Scene {
        camera: sky_camera().with_output("checkered_spheres.png"),
        world,
    }
}

fn earth(assets: &SceneAssets) -> Result<Scene> {
    let path = assets
        .texture
        .as_deref()
        .context("the earth scene needs --texture <image>")?;
    let surface = textured(Arc::new(ImageTexture::new(load_image(path)?)));

    let mut world = HittableList::new();
    world.add(Arc::new(Sphere::new(Point3::ZERO, 2.0, surface)));

    Ok(Scene {
        camera: sky_camera()
            .with_position(Point3::new(0.0, 0.0, 12.0), Point3::ZERO, Vec3::Y)
            .with_output("earth.png"),
        world,
    })
}

fn perlin(rng: &mut dyn RngCore) -> Scene {
    let marble: Arc<dyn Texture> = Arc::new(NoiseTexture::new(4.0, rng));

    let mut world = HittableList::new();
    world.add(Arc::new(Sphere::new(
        Point3::new(0.0, -1000.0, 0.0),
        1000.0,
        textured(Arc::clone(&marble)),
    )));
    world.add(Arc::new(Sphere::new(
        Point3::new(0.0, 2.0, 0.0),
        2.0,
        textured(marble),
    )));

    Scene {
        camera: sky_camera().with_output("perlin_spheres.png"),
        world,
    }
}

fn quads() -> Scene {
    let mut world = HittableList::new();

    let faces = [
        (Point3::new(-3.0, -2.0, 5.0), Vec3::new(0.0, 0.0, -4.0), Vec3::new(0.0, 4.0, 0.0), Color::new(1.0, 0.2, 0.2)),
        (Point3::new(-2.0, -2.0, 0.0), Vec3::new(4.0, 0.0, 0.0), Vec3::new(0.0, 4.0, 0.0), Color::new(0.2, 1.0, 0.2)),
        (Point3::new(3.0, -2.0, 1.0), Vec3::new(0.0, 0.0, 4.0), Vec3::new(0.0, 4.0, 0.0), Color::new(0.2, 0.2, 1.0)),
        (Point3::new(-2.0, 3.0, 1.0), Vec3::new(4.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 4.0), Color::new(1.0, 0.5, 0.0)),
        (Point3::new(-2.0, -3.0, 5.0), Vec3::new(4.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -4.0), Color::new(0.2, 0.8, 0.8)),
    ];
    for (q, u, v, albedo) in faces {
        world.add(Arc::new(Quad::new(q, u, v, lambertian(albedo))));
    }

    Scene {
        camera: sky_camera()
            .with_image(1000, 1.0)
            .with_position(Point3::new(0.0, 0.0, 9.0), Point3::ZERO, Vec3::Y)
            .with_lens(80.0, 0.0, 10.0)
            .with_output("quads.png"),
        world,
    }
}

fn simple_light(rng: &mut dyn RngCore) -> Scene {
    let mut scene = perlin(rng);

    let light: Arc<dyn Material> = Arc::new(DiffuseLight::new(Color::splat(4.0)));
    scene.world.add(Arc::new(Sphere::new(
        Point3::new(0.0, 7.0, 0.0),
        2.0,
        Arc::clone(&light),
    )));
    scene.world.add(Arc::new(Quad::new(
        Point3::new(3.0, 1.0, -2.0),
        Vec3::new(2.0, 0.0, 0.0),
        Vec3::new(0.0, 2.0, 0.0),
        light,
    )));

    scene.camera = scene
        .camera
        .with_background(Color::ZERO)
        .with_position(Point3::new(26.0, 3.0, 6.0), Point3::new(0.0, 2.0, 0.0), Vec3::Y)
        .with_output("simple_light.png");
    scene
}

/// The five walls and ceiling light of a 555-unit Cornell box.
fn cornell_walls(back: Color) -> HittableList {
    let red = lambertian(Color::new(0.65, 0.05, 0.05));
    let white = lambertian(Color::splat(0.73));
    let green = lambertian(Color::new(0.12, 0.45, 0.15));
    let light: Arc<dyn Material> = Arc::new(DiffuseLight::new(Color::splat(15.0)));

    let mut walls = HittableList::new();
    walls.add(Arc::new(Quad::new(
        Point3::new(555.0, 0.0, 0.0),
        Vec3::new(0.0, 555.0, 0.0),
        Vec3::new(0.0, 0.0, 555.0),
        green,
    )));
    walls.add(Arc::new(Quad::new(
        Point3::ZERO,
        Vec3::new(0.0, 555.0, 0.0),
        Vec3::new(0.0, 0.0, 555.0),
        red,
    )));
    walls.add(Arc::new(Quad::new(
        Point3::new(343.0, 554.0, 332.0),
        Vec3::new(-130.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, -105.0),
        light,
    )));
    walls.add(Arc::new(Quad::new(
        Point3::ZERO,
        Vec3::new(555.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 555.0),
        Arc::clone(&white),
    )));
    walls.add(Arc::new(Quad::new(
        Point3::splat(555.0),
        Vec3::new(-555.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, -555.0),
        white,
    )));
    walls.add(Arc::new(Quad::new(
        Point3::new(0.0, 0.0, 555.0),
        Vec3::new(555.0, 0.0, 0.0),
        Vec3::new(0.0, 555.0, 0.0),
        lambertian(back),
    )));
    walls
}

/// Axis-aligned box from the origin to `size`, turned about Y then moved.
fn placed_box(size: Point3, degrees: f32, offset: Vec3, material: Arc<dyn Material>) -> Arc<dyn Hittable> {
    let shape: Arc<dyn Hittable> = Arc::new(make_box(Point3::ZERO, size, material));
    let turned: Arc<dyn Hittable> = Arc::new(RotateY::new(shape, degrees));
    Arc::new(Translate::new(turned, offset))
}

fn cornell() -> Scene {
    let white = lambertian(Color::splat(0.73));
    let mut world = cornell_walls(Color::splat(0.73));

    world.add(placed_box(
        Point3::new(165.0, 330.0, 165.0),
        15.0,
        Vec3::new(265.0, 0.0, 295.0),
        Arc::clone(&white),
    ));
    world.add(placed_box(
        Point3::splat(165.0),
        -18.0,
        Vec3::new(130.0, 0.0, 65.0),
        white,
    ));
    world.add(Arc::new(Sphere::new(
        Point3::new(200.0, 215.0, 200.0),
        50.0,
        lambertian(Color::new(0.4, 0.2, 0.1)),
    )));
    world.add(Arc::new(make_pyramid(
        Point3::new(325.0, 0.0, 100.0),
        Point3::new(475.0, 0.0, 200.0),
        Point3::new(400.0, 150.0, 150.0),
        lambertian(Color::new(0.12, 0.45, 0.5)),
    )));

    Scene {
        camera: box_camera("cornell_box.png"),
        world,
    }
}

fn final_scene(assets: &SceneAssets, rng: &mut dyn RngCore) -> Result<Scene> {
    let ground = lambertian(Color::new(0.48, 0.83, 0.53));
    let mut floor = HittableList::new();
    let boxes_per_side = 20;
    for i in 0..boxes_per_side {
        for j in 0..boxes_per_side {
            let w = 100.0;
            let x0 = -1000.0 + i as f32 * w;
            let z0 = -1000.0 + j as f32 * w;
            let y1 = gen_range_f32(rng, 1.0, 101.0);
            floor.extend(&make_box(
                Point3::new(x0, 0.0, z0),
                Point3::new(x0 + w, y1, z0 + w),
                Arc::clone(&ground),
            ));
        }
    }

    let mut world = HittableList::new();
    world.add(Arc::new(BvhNode::new(&floor)));

    world.add(Arc::new(Quad::new(
        Point3::new(123.0, 554.0, 147.0),
        Vec3::new(300.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 265.0),
        Arc::new(DiffuseLight::new(Color::splat(7.0))),
    )));

    let center = Point3::new(400.0, 400.0, 200.0);
    world.add(Arc::new(Sphere::moving(
        center,
        center + Vec3::new(30.0, 0.0, 0.0),
        50.0,
        lambertian(Color::new(0.7, 0.3, 0.1)),
    )));
    world.add(Arc::new(Sphere::new(
        Point3::new(260.0, 150.0, 45.0),
        50.0,
        Arc::new(Dielectric::new(1.5)),
    )));
    world.add(Arc::new(Sphere::new(
        Point3::new(0.0, 150.0, 145.0),
        50.0,
        Arc::new(Metal::new(Color::new(0.8, 0.8, 0.9), 1.0)),
    )));

    // Glass shell around blue fog, and a thin haze over everything
    let boundary: Arc<dyn Hittable> = Arc::new(Sphere::new(
        Point3::new(360.0, 150.0, 145.0),
        70.0,
        Arc::new(Dielectric::new(1.5)),
    ));
    world.add(Arc::clone(&boundary));
    world.add(Arc::new(ConstantMedium::new(boundary, 0.2, Color::new(0.2, 0.4, 0.9))));
    let haze: Arc<dyn Hittable> = Arc::new(Sphere::new(
        Point3::ZERO,
        5000.0,
        Arc::new(Dielectric::new(1.5)),
    ));
    world.add(Arc::new(ConstantMedium::new(haze, 0.0001, Color::ONE)));

    // Without --texture the globe renders in the missing-image debug colour
    let globe = match assets.texture.as_deref() {
        Some(path) => ImageTexture::new(load_image(path)?),
        None => ImageTexture::new(ImageData::new(0, 0, Vec::new(), "<none>")),
    };
    world.add(Arc::new(Sphere::new(
        Point3::new(400.0, 200.0, 400.0),
        100.0,
        textured(Arc::new(globe)),
    )));
    world.add(Arc::new(Sphere::new(
        Point3::new(220.0, 280.0, 300.0),
        80.0,
        textured(Arc::new(NoiseTexture::new(0.2, rng))),
    )));

    let white = lambertian(Color::splat(0.73));
    let mut cluster = HittableList::new();
    for _ in 0..1000 {
        let center = random_color(rng, 0.0, 165.0);
        cluster.add(Arc::new(Sphere::new(center, 10.0, Arc::clone(&white))));
    }
    let cluster: Arc<dyn Hittable> = Arc::new(BvhNode::new(&cluster));
    let cluster: Arc<dyn Hittable> = Arc::new(RotateY::new(cluster, 15.0));
    world.add(Arc::new(Translate::new(cluster, Vec3::new(-100.0, 270.0, 395.0))));

    Ok(Scene {
        camera: box_camera("final_scene.png")
            .with_image(800, 1.0)
            .with_quality(1000, 40)
            .with_position(
                Point3::new(478.0, 278.0, -600.0),
                Point3::new(278.0, 278.0, 0.0),
                Vec3::Y,
            ),
        world,
    })
}

fn model(assets: &SceneAssets) -> Result<Scene> {
    let path = assets
        .model
        .as_deref()
        .context("the model scene needs --model <file.obj>")?;

    let mut world = cornell_walls(Color::new(0.4, 0.6, 0.9));

    let material: Arc<dyn Material> = Arc::new(Metal::new(Color::new(0.0, 0.0, 0.8), 0.0));
    let triangles = load_triangles(path, material)
        .with_context(|| format!("failed to load model {}", path.display()))?;
    let placed = transform_triangles(&triangles, Vec3::splat(80.0), Vec3::new(278.0, 0.0, 278.0));
    let objects = placed
        .into_iter()
        .map(|tri| Arc::new(tri) as Arc<dyn Hittable>)
        .collect();
    world.add(Arc::new(BvhNode::from_objects(objects)));

    Ok(Scene {
        camera: box_camera("model.png"),
        world,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::io::Write;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn test_asset_free_scenes_build() {
        let assets = SceneAssets::default();
        for kind in [
            SceneKind::Spheres,
            SceneKind::Checkered,
            SceneKind::Perlin,
            SceneKind::Quads,
            SceneKind::Light,
            SceneKind::Cornell,
            SceneKind::Final,
        ] {
            let mut scene_rng = rng();
            let mut scene = build(kind, &assets, &mut scene_rng).unwrap();
            assert!(!scene.world.is_empty(), "{:?} is empty", kind);
            scene.camera.initialize().unwrap();
        }
    }

    #[test]
    fn test_scene_contents() {
        let assets = SceneAssets::default();
        assert_eq!(build(SceneKind::Quads, &assets, &mut rng()).unwrap().world.len(), 5);
        assert_eq!(build(SceneKind::Light, &assets, &mut rng()).unwrap().world.len(), 4);
        // Walls, light, two boxes, sphere, pyramid
        assert_eq!(build(SceneKind::Cornell, &assets, &mut rng()).unwrap().world.len(), 10);
        // Three feature spheres on top of the ground and the random grid
        assert!(build(SceneKind::Spheres, &assets, &mut rng()).unwrap().world.len() > 300);
    }

    #[test]
    fn test_seeded_scene_is_reproducible() {
        let assets = SceneAssets::default();
        let a = build(SceneKind::Spheres, &assets, &mut rng()).unwrap();
        let b = build(SceneKind::Spheres, &assets, &mut rng()).unwrap();
        assert_eq!(a.world.len(), b.world.len());
        assert_eq!(a.world.bounding_box(), b.world.bounding_box());
    }

    #[test]
    fn test_missing_assets() {
        let assets = SceneAssets::default();
        let err = build(SceneKind::Earth, &assets, &mut rng()).err().unwrap();
        assert!(err.to_string().contains("--texture"));
        let err = build(SceneKind::Model, &assets, &mut rng()).err().unwrap();
        assert!(err.to_string().contains("--model"));

        let assets = SceneAssets {
            model: Some(PathBuf::from("/no/such/model.obj")),
            texture: Some(PathBuf::from("/no/such/earth.png")),
        };
        assert!(build(SceneKind::Earth, &assets, &mut rng()).is_err());
        assert!(build(SceneKind::Model, &assets, &mut rng()).is_err());
    }

    #[test]
    fn test_model_scene() {
        let path = std::env::temp_dir().join(format!("lumen_scene_{}.obj", std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(b"v 0 0 0\nv 1 0 0\nv 0 1 0\nv 0 0 1\nf 1 3 2\nf 1 2 4\nf 1 4 3\nf 2 3 4\n")
            .unwrap();
        drop(file);

        let assets = SceneAssets {
            model: Some(path.clone()),
            texture: None,
        };
        let scene = build(SceneKind::Model, &assets, &mut rng()).unwrap();
        std::fs::remove_file(&path).ok();

        // Six box faces plus the light, then the model BVH
        assert_eq!(scene.world.len(), 7);
        let bbox = scene.world.objects()[6].bounding_box();
        assert!((bbox.x.min - 278.0).abs() < 1e-2);
        assert!((bbox.y.max - 80.0).abs() < 1e-2);
    }
}
