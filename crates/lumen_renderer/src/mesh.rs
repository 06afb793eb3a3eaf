//! Triangle meshes loaded from OBJ files.

use std::path::Path;
use std::sync::Arc;

use lumen_math::Vec3;

use crate::error::RenderResult;
use crate::{Material, Triangle};

/// Load an OBJ file as a flat list of world-space triangles sharing `material`.
pub fn load_triangles<P: AsRef<Path>>(
    path: P,
    material: Arc<dyn Material>,
) -> RenderResult<Vec<Triangle>> {
    let mesh = lumen_core::load_obj(path)?;

    Ok(mesh
        .extract_triangle_vertices()
        .into_iter()
        .map(|[v0, v1, v2]| Triangle::new(v0, v1, v2, Arc::clone(&material)))
        .collect())
}

/// Scale every vertex per axis, then translate. Use `Vec3::splat` for a uniform scale.
pub fn transform_triangles(triangles: &[Triangle], scale: Vec3, translate: Vec3) -> Vec<Triangle> {
    triangles
        .iter()
        .map(|tri| tri.transformed(scale, translate))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Hittable, HittableList, Lambertian, RenderError};
    use lumen_math::{Color, Interval, Ray};
    use rand::rngs::mock::StepRng;
    use std::io::Write;

    fn write_obj(name: &str, body: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("lumen_{}_{}.obj", name, std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(body.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_load_and_transform() {
        let path = write_obj(
            "tetra",
            "v 0 0 0\nv 1 0 0\nv 0 1 0\nv 0 0 1\nf 1 3 2\nf 1 2 4\nf 1 4 3\nf 2 3 4\n",
        );
        let material: Arc<dyn Material> = Arc::new(Lambertian::new(Color::splat(0.5)));
        let triangles = load_triangles(&path, material).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(triangles.len(), 4);

        let moved = transform_triangles(&triangles, Vec3::splat(2.0), Vec3::new(0.0, 0.0, -10.0));
        let list: HittableList = moved.into_iter().collect();
        let bbox = list.bounding_box();
        assert!((bbox.x.max - 2.0).abs() < 1e-3);
        assert!((bbox.z.min - (-10.0)).abs() < 1e-3);

        let ray = Ray::new(Vec3::new(0.2, 0.2, 5.0), Vec3::new(0.0, 0.0, -1.0), 0.0);
        let rec = list
            .hit(&ray, Interval::new(0.001, f32::INFINITY), &mut StepRng::new(0, 1))
            .unwrap();
        // Slanted face x + y + z = 2 after scaling, shifted to z = 1.6 - 10
        assert!((rec.p.z - (-8.4)).abs() < 1e-3);
    }

    #[test]
    fn test_anisotropic_scale() {
        let path = write_obj("tri", "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n");
        let triangles =
            load_triangles(&path, Arc::new(Lambertian::new(Color::ONE))).unwrap();
        std::fs::remove_file(&path).ok();

        let scaled = transform_triangles(&triangles, Vec3::new(3.0, 0.5, 1.0), Vec3::ONE);
        assert_eq!(
            scaled[0].vertices(),
            [Vec3::ONE, Vec3::new(4.0, 1.0, 1.0), Vec3::new(1.0, 1.5, 1.0)]
        );
    }

    #[test]
    fn test_missing_file_propagates() {
        let err = load_triangles("/no/such/model.obj", Arc::new(Lambertian::new(Color::ONE)))
            .err()
            .unwrap();
        assert!(matches!(err, RenderError::Mesh(_)));
        assert!(err.to_string().contains("/no/such/model.obj"));
    }
}
