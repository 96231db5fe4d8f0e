//! Material trait for surface scattering and emission.

use crate::hittable::HitRecord;
use crate::pdf::{CosinePdf, Pdf};
use crate::sampling::{gen_f32, random_unit_vector};
use lumen_math::{Ray, Vec3, EPSILON};
use rand::RngCore;
use std::f32::consts::PI;

/// Color type alias (linear RGB)
pub type Color = Vec3;

/// Outcome of a scatter event.
pub enum ScatterRecord {
    /// One deterministic outgoing ray; no density bookkeeping.
    Specular { attenuation: Color, ray: Ray },
    /// Outgoing direction is to be importance-sampled from `pdf`.
    Diffuse {
        attenuation: Color,
        pdf: Box<dyn Pdf>,
    },
}

impl ScatterRecord {
    pub fn attenuation(&self) -> Color {
        match self {
            ScatterRecord::Specular { attenuation, .. }
            | ScatterRecord::Diffuse { attenuation, .. } => *attenuation,
        }
    }

    pub fn is_specular(&self) -> bool {
        matches!(self, ScatterRecord::Specular { .. })
    }
}

/// Trait for materials that describe how light interacts with surfaces.
pub trait Material: Send + Sync {
    /// Scatter an incoming ray, or `None` if the path ends here.
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore)
        -> Option<ScatterRecord>;

    /// Light emitted by the surface at the hit. Black for everything but emitters.
    fn emitted(&self, _ray_in: &Ray, _rec: &HitRecord) -> Color {
        Color::ZERO
    }

    /// BRDF-side density of scattering `ray_in` into `scattered`.
    fn scattering_pdf(&self, _ray_in: &Ray, _rec: &HitRecord, _scattered: &Ray) -> f32 {
        0.0
    }
}

/// Lambertian (diffuse) material.
#[derive(Debug, Clone)]
pub struct Lambertian {
    albedo: Color,
}

impl Lambertian {
    pub fn new(albedo: Color) -> Self {
        Self { albedo }
    }
}

impl Material for Lambertian {
    fn scatter(
        &self,
        _ray_in: &Ray,
        rec: &HitRecord,
        _rng: &mut dyn RngCore,
    ) -> Option<ScatterRecord> {
        Some(ScatterRecord::Diffuse {
            attenuation: self.albedo,
            pdf: Box::new(CosinePdf::new(rec.normal)),
        })
    }

    /// `max(0, cos θ) / π` between the outgoing direction and the normal.
    fn scattering_pdf(&self, _ray_in: &Ray, rec: &HitRecord, scattered: &Ray) -> f32 {
        let length = scattered.direction().length();
        if length < EPSILON {
            return 0.0;
        }
        let cosine = rec.normal.dot(scattered.direction()) / length;
        cosine.max(0.0) / PI
    }
}

/// Metal (specular) material.
#[derive(Debug, Clone)]
pub struct Metal {
    albedo: Color,
    fuzz: f32,
}

impl Metal {
    /// - `albedo`: The color of the metal
    /// - `fuzz`: Roughness, 0.0 = perfect mirror, 1.0 = very rough
    pub fn new(albedo: Color, fuzz: f32) -> Self {
        Self {
            albedo,
            fuzz: fuzz.clamp(0.0, 1.0),
        }
    }
}

impl Material for Metal {
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterRecord> {
        let reflected = reflect(ray_in.direction().normalize(), rec.normal);
        let direction = reflected + self.fuzz * random_unit_vector(rng);

        // Fuzz that pushes the ray below the surface absorbs it
        if direction.dot(rec.normal) <= 0.0 {
            return None;
        }

        Some(ScatterRecord::Specular {
            attenuation: self.albedo,
            ray: Ray::new(rec.p, direction, ray_in.time()),
        })
    }
}

/// Dielectric (glass) material.
#[derive(Debug, Clone)]
pub struct Dielectric {
    /// Index of refraction
    ior: f32,
}

impl Dielectric {
    /// - `ior`: Index of refraction (1.0 = air, 1.5 = glass, 2.4 = diamond)
    pub fn new(ior: f32) -> Self {
        Self { ior }
    }

    /// Schlick's approximation for reflectance
    fn reflectance(cosine: f32, ior: f32) -> f32 {
        let r0 = ((1.0 - ior) / (1.0 + ior)).powi(2);
        r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
    }
}

impl Material for Dielectric {
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterRecord> {
        let refraction_ratio = if rec.front_face {
            1.0 / self.ior
        } else {
            self.ior
        };

        let unit_direction = ray_in.direction().normalize();
        let cos_theta = (-unit_direction).dot(rec.normal).min(1.0);
        let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();

        // Total internal reflection
        let cannot_refract = refraction_ratio * sin_theta > 1.0;

        let direction = if cannot_refract
            || Self::reflectance(cos_theta, refraction_ratio) > gen_f32(rng)
        {
            reflect(unit_direction, rec.normal)
        } else {
            refract(unit_direction, rec.normal, refraction_ratio)
        };

        Some(ScatterRecord::Specular {
            attenuation: Color::ONE,
            ray: Ray::new(rec.p, direction, ray_in.time()),
        })
    }
}

/// Diffuse light emitter, one-sided.
#[derive(Debug, Clone)]
pub struct DiffuseLight {
    emit: Color,
}

impl DiffuseLight {
    pub fn new(emit: Color) -> Self {
        Self { emit }
    }
}

impl Material for DiffuseLight {
    fn scatter(
        &self,
        _ray_in: &Ray,
        _rec: &HitRecord,
        _rng: &mut dyn RngCore,
    ) -> Option<ScatterRecord> {
        None
    }

    /// Emits only from the front face; back-face hits are black.
    fn emitted(&self, _ray_in: &Ray, rec: &HitRecord) -> Color {
        if rec.front_face {
            self.emit
        } else {
            Color::ZERO
        }
    }
}

/// Reflect a vector about a normal.
#[inline]
fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract a unit vector through a surface.
#[inline]
fn refract(uv: Vec3, n: Vec3, etai_over_etat: f32) -> Vec3 {
    let cos_theta = (-uv).dot(n).min(1.0);
    let r_out_perp = etai_over_etat * (uv + cos_theta * n);
    let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
    r_out_perp + r_out_parallel
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn record<'a>(material: &'a dyn Material, front_face: bool) -> HitRecord<'a> {
        HitRecord {
            p: Vec3::ZERO,
            normal: Vec3::Y,
            material,
            u: 0.0,
            v: 0.0,
            t: 1.0,
            front_face,
        }
    }

    fn incoming() -> Ray {
        Ray::new(Vec3::new(-1.0, 1.0, 0.0), Vec3::new(1.0, -1.0, 0.0), 0.25)
    }

    #[test]
    fn test_lambertian_scatters_with_cosine_pdf() {
        let mat = Lambertian::new(Color::new(0.5, 0.6, 0.7));
        let rec = record(&mat, true);
        let mut rng = StdRng::seed_from_u64(1);

        let srec = mat.scatter(&incoming(), &rec, &mut rng).unwrap();
        assert!(!srec.is_specular());
        assert_eq!(srec.attenuation(), Color::new(0.5, 0.6, 0.7));
        let ScatterRecord::Diffuse { pdf, .. } = srec else {
            panic!("lambertian must scatter diffusely");
        };
        assert!((pdf.value(Vec3::Y) - 1.0 / PI).abs() < 1e-6);
    }

    #[test]
    fn test_lambertian_scattering_pdf() {
        let mat = Lambertian::new(Color::ONE);
        let rec = record(&mat, true);
        let up = Ray::new(Vec3::ZERO, Vec3::new(0.0, 2.0, 0.0), 0.0);
        let down = Ray::new(Vec3::ZERO, -Vec3::Y, 0.0);
        let degenerate = Ray::new(Vec3::ZERO, Vec3::ZERO, 0.0);

        assert!((mat.scattering_pdf(&incoming(), &rec, &up) - 1.0 / PI).abs() < 1e-6);
        assert_eq!(mat.scattering_pdf(&incoming(), &rec, &down), 0.0);
        assert_eq!(mat.scattering_pdf(&incoming(), &rec, &degenerate), 0.0);
    }

    #[test]
    fn test_metal_mirror_reflection() {
        let mat = Metal::new(Color::splat(0.8), 0.0);
        let rec = record(&mat, true);
        let mut rng = StdRng::seed_from_u64(1);

        match mat.scatter(&incoming(), &rec, &mut rng) {
            Some(ScatterRecord::Specular { attenuation, ray }) => {
                assert_eq!(attenuation, Color::splat(0.8));
                let expected = Vec3::new(1.0, 1.0, 0.0).normalize();
                assert!((ray.direction() - expected).length() < 1e-5);
                assert_eq!(ray.time(), 0.25);
            }
            _ => panic!("mirror must reflect specularly"),
        }
    }

    #[test]
    fn test_metal_fuzz_never_goes_below_surface() {
        // Grazing incidence with heavy fuzz: some samples are absorbed.
        let mat = Metal::new(Color::ONE, 1.0);
        let rec = record(&mat, true);
        let grazing = Ray::new(Vec3::new(-1.0, 0.01, 0.0), Vec3::new(1.0, -0.01, 0.0), 0.0);
        let mut rng = StdRng::seed_from_u64(3);

        let mut absorbed = 0;
        for _ in 0..1000 {
            match mat.scatter(&grazing, &rec, &mut rng) {
                Some(srec) => {
                    let ScatterRecord::Specular { ray, .. } = srec else {
                        panic!("metal is specular");
                    };
                    assert!(ray.direction().dot(rec.normal) > 0.0);
                }
                None => absorbed += 1,
            }
        }
        assert!(absorbed > 0);
    }

    #[test]
    fn test_dielectric_total_internal_reflection() {
        let mat = Dielectric::new(1.5);
        // Inside the glass (back face) at a steep angle: sin θ * 1.5 > 1.
        let rec = record(&mat, false);
        let ray = Ray::new(Vec3::new(-1.0, 0.2, 0.0), Vec3::new(1.0, -0.2, 0.0), 0.0);
        let mut rng = StdRng::seed_from_u64(4);

        for _ in 0..100 {
            let Some(ScatterRecord::Specular { attenuation, ray: out }) =
                mat.scatter(&ray, &rec, &mut rng)
            else {
                panic!("dielectric always scatters specularly");
            };
            assert_eq!(attenuation, Color::ONE);
            assert!(out.direction().y > 0.0);
        }
    }

    #[test]
    fn test_dielectric_head_on_mostly_refracts() {
        let mat = Dielectric::new(1.5);
        let rec = record(&mat, true);
        let ray = Ray::new(Vec3::new(0.0, 1.0, 0.0), -Vec3::Y, 0.0);
        let mut rng = StdRng::seed_from_u64(5);

        let refracted = (0..1000)
            .filter(|_| match mat.scatter(&ray, &rec, &mut rng) {
                Some(ScatterRecord::Specular { ray, .. }) => ray.direction().y < 0.0,
                _ => false,
            })
            .count();
        // Normal-incidence reflectance of glass is 4%.
        assert!(refracted > 900, "refracted = {refracted}");
    }

    #[test]
    fn test_diffuse_light_is_one_sided() {
        let mat = DiffuseLight::new(Color::splat(15.0));
        let mut rng = StdRng::seed_from_u64(1);

        assert_eq!(mat.emitted(&incoming(), &record(&mat, true)), Color::splat(15.0));
        assert_eq!(mat.emitted(&incoming(), &record(&mat, false)), Color::ZERO);
        assert!(mat.scatter(&incoming(), &record(&mat, true), &mut rng).is_none());
    }
}
