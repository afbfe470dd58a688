use crate::color::Color;
use crate::consts::{ SPECTRUM_SAMPLES, VISIBLE_SPECTRUM_START, VISIBLE_SPECTRUM_END };
use crate::intersect::Intersection;
use crate::light::phong;
use crate::ray::{ Ray, RayWave, reflect, refract };
use crate::world::World;

/// `count` evenly stepped values from `a` toward `b`, endpoints inclusive.
pub fn interpolate(a: f32, b: f32, count: usize) -> Vec<f32> {
    let step = (b - a) / count.saturating_sub(1).max(1) as f32;

    (0..count).map(|i| a + step * i as f32).collect()
}

/// Approximate response of the eye to a single wavelength, as linear RGB.
///
/// A piecewise-linear band table over the visible spectrum; wavelengths
/// outside [380, 780) nanometers map to black.
pub fn wavelength_rgb_filter(wavelength: f32) -> Color {
    let w = wavelength;

    if 380.0 <= w && w < 410.0 {
        Color::rgb(
            0.6 - 0.41 * (410.0 - w) / 30.0,
            0.0,
            0.39 + 0.6 * (410.0 - w) / 30.0,
        )
    } else if 410.0 <= w && w < 440.0 {
        Color::rgb(0.19 - 0.19 * (440.0 - w) / 30.0, 0.0, 1.0)
    } else if 440.0 <= w && w < 490.0 {
        Color::rgb(0.0, 1.0 - (490.0 - w) / 50.0, 1.0)
    } else if 490.0 <= w && w < 510.0 {
        Color::rgb(0.0, 1.0, (510.0 - w) / 20.0)
    } else if 510.0 <= w && w < 580.0 {
        Color::rgb(1.0 - (580.0 - w) / 70.0, 1.0, 0.0)
    } else if 580.0 <= w && w < 640.0 {
        Color::rgb(1.0, (640.0 - w) / 60.0, 0.0)
    } else if 640.0 <= w && w < 700.0 {
        Color::rgb(1.0, 0.0, 0.0)
    } else if 700.0 <= w && w < 780.0 {
        Color::rgb(0.35 - 0.65 * (780.0 - w) / 80.0, 0.0, 0.0)
    } else {
        Color::black()
    }
}

impl World {
    /// Shades a spectral ray recursively up to `depth_max` bounces.
    ///
    /// The dispersion-aware variant of `color_at_recursive`: same control
    /// flow, except every ray carries its spectral tag. A broadband ray
    /// refracting through a dispersive material fans into
    /// `SPECTRUM_SAMPLES` monochromatic sub-rays whose results are averaged;
    /// a monochromatic ray refracts exactly once, with its own Cauchy
    /// index, and its accumulated color is weighted by the eye's response
    /// to that wavelength.
    pub fn color_at_dispersive(&self, wave: &RayWave, depth_max: u32, depth: u32) -> Color {
        if depth >= depth_max {
            return Color::black();
        }

        let hit = {
            let mut intersections = self.intersect(&wave.ray);
            intersections.hit()
        };

        let hit = match hit {
            Some(hit) => hit,
            None => return Color::black(),
        };

        let material = *self.material_of(&hit);
        let normal = self.normal_of(&hit);

        // the spectral tag survives a mirror bounce unchanged
        let mut reflected = Color::black();
        if material.reflection > 0.0 {
            let reflected_wave = RayWave {
                ray: Ray::new(hit.position, reflect(wave.ray.direction, normal)),
                is_monochromatic: wave.is_monochromatic,
                wavelength: wave.wavelength,
            };
            reflected = self.color_at_dispersive(&reflected_wave, depth_max, depth + 1);
        }

        let mut refracted = Color::black();
        if material.refraction > 0.0 {
            if wave.is_monochromatic || material.refractive_index() == 1.0 {
                // already a single wavelength, or nothing to disperse
                refracted = self.refracted_wave(&hit, wave, depth_max, depth);
            } else {
                let wavelengths = interpolate(
                    VISIBLE_SPECTRUM_START,
                    VISIBLE_SPECTRUM_END,
                    SPECTRUM_SAMPLES,
                );

                // additive mixing of the monochromatic sub-rays
                for wavelength in wavelengths {
                    let monochromatic = wave.with_wavelength(wavelength);
                    refracted = refracted
                        + self.refracted_wave(&hit, &monochromatic, depth_max, depth);
                }

                // spectral average, so the fan preserves energy
                refracted = refracted * (1.0 / SPECTRUM_SAMPLES as f32);
            }
        }

        let direct = self.direct_light(&hit);
        let light_direction = -self.light.incident_direction(hit.position);
        let illumination = phong(&material, normal, wave.ray.direction,
            self.ambient, direct, light_direction);

        let mut color = illumination
            + reflected * material.reflection
            + refracted * material.refraction;

        if wave.is_monochromatic {
            color = color * wavelength_rgb_filter(wave.wavelength);
        }

        color
    }

    /// The refracted branch of the dispersive driver.
    ///
    /// A monochromatic ray bends by its own Cauchy index; a broadband ray
    /// (on a non-dispersive material) bends by the base index. The sub-ray
    /// inherits the incident ray's spectral tag. Total internal reflection
    /// transmits nothing, as in the plain driver.
    fn refracted_wave(&self, hit: &Intersection, incident: &RayWave,
        depth_max: u32, depth: u32) -> Color {
        let material = self.material_of(hit);
        let normal = self.normal_of(hit);

        let index = if incident.is_monochromatic {
            material.cauchy_refractive_index(incident.wavelength)
        } else {
            material.refractive_index()
        };

        let ratio = if incident.ray.direction.dot(normal) <= 0.0 {
            1.0 / index
        } else {
            index
        };

        match refract(incident.ray.direction, normal, ratio) {
            Some(direction) => {
                let refracted_wave = RayWave {
                    ray: Ray::new(hit.position, direction),
                    is_monochromatic: incident.is_monochromatic,
                    wavelength: incident.wavelength,
                };
                self.color_at_dispersive(&refracted_wave, depth_max, depth + 1)
            }
            None => Color::black(),
        }
    }
}

/* Tests */

#[test]
fn interpolate_spans_both_endpoints() {
    let values = interpolate(VISIBLE_SPECTRUM_START, VISIBLE_SPECTRUM_END, SPECTRUM_SAMPLES);

    assert_eq!(values.len(), SPECTRUM_SAMPLES);
    assert!(crate::feq(values[0], VISIBLE_SPECTRUM_START));
    assert!(crate::feq(*values.last().unwrap(), VISIBLE_SPECTRUM_END));

    // constant step
    let step = values[1] - values[0];
    for pair in values.windows(2) {
        assert!(crate::feq(pair[1] - pair[0], step));
    }
}

#[test]
fn interpolate_single_value() {
    let values = interpolate(380.0, 780.0, 1);

    assert_eq!(values, vec![380.0]);
}

#[test]
fn filter_green_band() {
    let c = wavelength_rgb_filter(550.0);

    assert!(crate::feq(c.g, 1.0));
    assert!(c.r < 0.6);
    assert!(crate::feq(c.b, 0.0));
}

#[test]
fn filter_pure_red_band() {
    assert_eq!(wavelength_rgb_filter(660.0), Color::red());
}

#[test]
fn filter_black_outside_visible_spectrum() {
    assert_eq!(wavelength_rgb_filter(200.0), Color::black());
    assert_eq!(wavelength_rgb_filter(800.0), Color::black());
}

#[cfg(test)]
mod transport {
    use glam::Vec3;

    use super::*;
    use crate::geometry::Triangle;
    use crate::light::{ Light, Material };

    /// A glass pane at `z = 1` facing the camera, an ambient-lit white
    /// wall at `z = 3` behind it.
    fn pane_and_wall(cauchy_a: f32, cauchy_b: f32) -> World {
        let mut world = World::new(
            Light::point(Vec3::new(0.0, 10.0, 0.0), Color::white()),
            Color::rgb(0.5, 0.5, 0.5),
        );

        let mut glass = Material::flat(Color::white());
        glass.ambient = 0.0;
        glass.diffuse = 0.0;
        glass.specular = 0.0;
        glass.reflection = 0.0;
        glass.refraction = 1.0;
        glass.cauchy_a = cauchy_a;
        glass.cauchy_b = cauchy_b;
        let glass = world.add_material(glass);

        let mut white = Material::flat(Color::white());
        white.ambient = 1.0;
        white.diffuse = 0.0;
        white.specular = 0.0;
        white.reflection = 0.0;
        white.refraction = 0.0;
        let white = world.add_material(white);

        world.triangles.push(Triangle::new(
            Vec3::new(-5.0, -5.0, 1.0),
            Vec3::new(5.0, -5.0, 1.0),
            Vec3::new(0.0, 5.0, 1.0),
            glass,
        ));
        world.triangles.push(Triangle::new(
            Vec3::new(-20.0, -20.0, 3.0),
            Vec3::new(20.0, -20.0, 3.0),
            Vec3::new(0.0, 20.0, 3.0),
            white,
        ));

        world
    }

    /// What the ambient-lit wall shades to, before any spectral filtering.
    fn wall_color(world: &World) -> Color {
        Color::white() * world.ambient
    }

    #[test]
    fn monochromatic_ray_never_fans() {
        let world = pane_and_wall(1.5, 30_000.0);

        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0));
        let mono = RayWave::monochromatic(ray, 550.0);

        // head-on incidence passes straight through regardless of index,
        // reaching the wall; the wall result is filtered at the wall's own
        // monochromatic evaluation, and again at the pane
        let at_wall = wall_color(&world) * wavelength_rgb_filter(550.0);
        let expected = at_wall * wavelength_rgb_filter(550.0);

        assert_eq!(world.color_at_dispersive(&mono, 5, 0), expected);
    }

    #[test]
    fn broadband_ray_fans_and_averages() {
        // dispersive check looks at the base index only; with B = 0 every
        // sub-ray bends identically and the average is over the filter
        let world = pane_and_wall(1.5, 0.0);

        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0));
        let broadband = RayWave::broadband(ray);

        let wavelengths = interpolate(
            VISIBLE_SPECTRUM_START,
            VISIBLE_SPECTRUM_END,
            SPECTRUM_SAMPLES,
        );
        let mut expected = Color::black();
        for wavelength in wavelengths {
            expected = expected + wall_color(&world) * wavelength_rgb_filter(wavelength);
        }
        expected = expected * (1.0 / SPECTRUM_SAMPLES as f32);

        assert_eq!(world.color_at_dispersive(&broadband, 5, 0), expected);
    }

    #[test]
    fn non_dispersive_material_keeps_ray_broadband() {
        // base index 1: no fan, no filter anywhere along the path
        let world = pane_and_wall(1.0, 0.0);

        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0));
        let broadband = RayWave::broadband(ray);

        assert_eq!(world.color_at_dispersive(&broadband, 5, 0), wall_color(&world));
    }

    #[test]
    fn dispersive_depth_bound_still_terminates() {
        let world = pane_and_wall(1.5, 30_000.0);

        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0));
        let broadband = RayWave::broadband(ray);

        assert_eq!(world.color_at_dispersive(&broadband, 0, 0), Color::black());
    }
}
