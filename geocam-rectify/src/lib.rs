//! Approximates a camera with an [`AffineCamera`] over a bounded region of the world.
//!
//! Over a small enough scene, even a rational polynomial camera behaves like a parallel
//! projection. [`AffineRectification`] samples world points uniformly in a [`BoundingBox3`],
//! projects them through the camera and fits the two free rows of an affine camera to the
//! correspondences by linear least squares.
//!
//! The random generator is supplied by the caller, so a fixed seed gives a reproducible fit.
//!
//! ```
//! use geocam_camera::AffineCamera;
//! use geocam_core::nalgebra::{Point3, RowVector4};
//! use geocam_core::Camera;
//! use geocam_rectify::{AffineRectification, BoundingBox3};
//!
//! let truth = AffineCamera::from_rows(
//!     RowVector4::new(2.0, 0.1, -0.3, 500.0),
//!     RowVector4::new(-0.2, 1.8, 0.6, 400.0),
//! )
//! .unwrap();
//! let bbox = BoundingBox3::new(Point3::new(-100.0, -100.0, 0.0), Point3::new(100.0, 100.0, 30.0));
//! let fitted = AffineRectification::new()
//!     .compute_affine_camera_seeded(&truth, &bbox, 50, 0)
//!     .unwrap();
//! let x = Point3::new(12.0, -40.0, 5.0);
//! assert!((fitted.project(x).unwrap() - truth.project(x).unwrap()).norm() < 1e-6);
//! ```

mod bbox;
mod error;

pub use bbox::*;
pub use error::*;

use float_ord::FloatOrd;
use geocam_camera::AffineCamera;
use geocam_core::nalgebra::{DMatrix, Matrix2x3, Point2, Point3, RowVector4, Vector3};
use geocam_core::Camera;
use rand::{rngs::SmallRng, Rng, SeedableRng};

#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

/// Default for [`AffineRectification::min_points`]. Fewer samples are raised to this count.
///
/// An affine camera has 8 degrees of freedom and each sample provides 2 equations, so 4 points
/// determine it exactly; the extra samples average out the non-affine part of the camera.
pub const MIN_POINTS: usize = 10;

/// Fewest correspondences [`AffineRectification::fit_affine_camera`] accepts.
pub const MIN_CORRESPONDENCES: usize = 4;

/// Fits affine cameras to other cameras.
///
/// ```
/// use geocam_rectify::AffineRectification;
///
/// let rectification = AffineRectification::new().min_points(25).rank_epsilon(1e-10);
/// assert_eq!(rectification.get_min_points(), 25);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct AffineRectification {
    min_points: usize,
    rank_epsilon: f64,
}

impl AffineRectification {
    /// Creates an `AffineRectification` with default values.
    ///
    /// Same as calling [`Default::default`].
    pub fn new() -> Self {
        Default::default()
    }

    /// Set the number of samples requests are raised to.
    ///
    /// Default is [`MIN_POINTS`]. Values below [`MIN_CORRESPONDENCES`] are raised to it.
    #[must_use]
    pub fn min_points(self, min_points: usize) -> Self {
        Self {
            min_points: min_points.max(MIN_CORRESPONDENCES),
            ..self
        }
    }

    /// Set the smallest accepted ratio between the smallest and largest singular value of the
    /// least squares system and of the fitted camera.
    ///
    /// Default is `1e-9`.
    #[must_use]
    pub fn rank_epsilon(self, rank_epsilon: f64) -> Self {
        Self {
            rank_epsilon,
            ..self
        }
    }

    pub fn get_min_points(&self) -> usize {
        self.min_points
    }

    pub fn get_rank_epsilon(&self) -> f64 {
        self.rank_epsilon
    }

    /// Approximates `camera` inside `bbox` with an affine camera fitted to `n_points` random
    /// samples drawn with `rng`.
    ///
    /// `n_points` below the configured minimum is raised to it. Samples that `camera` fails to
    /// project are dropped; the fit fails only when fewer than [`MIN_CORRESPONDENCES`] remain.
    pub fn compute_affine_camera<C>(
        &self,
        camera: &C,
        bbox: &BoundingBox3,
        n_points: usize,
        rng: &mut impl Rng,
    ) -> Result<AffineCamera, RectifyError>
    where
        C: Camera + ?Sized,
    {
        if !bbox.has_volume() {
            return Err(RectifyError::DegenerateBoundingBox {
                min: bbox.min,
                max: bbox.max,
            });
        }
        let n_points = if n_points < self.min_points {
            log::warn!(
                "raising affine rectification samples from {} to {}",
                n_points,
                self.min_points
            );
            self.min_points
        } else {
            n_points
        };
        log::debug!(
            "sampling {} points in box {} .. {} (extent {:?})",
            n_points,
            bbox.min,
            bbox.max,
            bbox.extent().as_slice()
        );

        let mut world = Vec::with_capacity(n_points);
        let mut image = Vec::with_capacity(n_points);
        for _ in 0..n_points {
            let x = bbox.sample(rng);
            match camera.project(x) {
                Ok(u) => {
                    log::trace!("sample {} projects to {}", x, u);
                    world.push(x);
                    image.push(u);
                }
                Err(e) => log::debug!("dropping sample {}: {}", x, e),
            }
        }
        if world.len() < MIN_CORRESPONDENCES {
            return Err(RectifyError::InsufficientCorrespondences {
                required: MIN_CORRESPONDENCES,
                got: world.len(),
            });
        }
        if world.len() < n_points {
            log::debug!(
                "{} of {} samples failed to project",
                n_points - world.len(),
                n_points
            );
        }

        let affine = self.fit_affine_camera(&world, &image)?;
        if log::log_enabled!(log::Level::Debug) {
            let rms = reprojection_rms(&affine, &world, &image)?;
            log::debug!("affine approximation RMS error is {} pixels", rms);
        }
        Ok(affine)
    }

    /// [`AffineRectification::compute_affine_camera`] with a generator seeded from `seed`.
    pub fn compute_affine_camera_seeded<C>(
        &self,
        camera: &C,
        bbox: &BoundingBox3,
        n_points: usize,
        seed: u64,
    ) -> Result<AffineCamera, RectifyError>
    where
        C: Camera + ?Sized,
    {
        self.compute_affine_camera(camera, bbox, n_points, &mut SmallRng::seed_from_u64(seed))
    }

    /// Least squares affine camera through `world[i] -> image[i]`.
    ///
    /// World points are centered and scaled to unit RMS distance first, which keeps the system
    /// well conditioned for geodetic scale coordinates.
    pub fn fit_affine_camera(
        &self,
        world: &[Point3<f64>],
        image: &[Point2<f64>],
    ) -> Result<AffineCamera, RectifyError> {
        if world.len() != image.len() {
            return Err(RectifyError::MismatchedLengths {
                world: world.len(),
                image: image.len(),
            });
        }
        if world.len() < MIN_CORRESPONDENCES {
            return Err(RectifyError::InsufficientCorrespondences {
                required: MIN_CORRESPONDENCES,
                got: world.len(),
            });
        }
        let n = world.len();

        let centroid = world
            .iter()
            .fold(Vector3::zeros(), |sum, p| sum + p.coords)
            / n as f64;
        let spread = (world
            .iter()
            .map(|p| (p.coords - centroid).norm_squared())
            .sum::<f64>()
            / n as f64)
            .sqrt();
        if !(spread > 0.0 && spread.is_finite()) {
            return Err(RectifyError::RankDeficient { ratio: 0.0 });
        }

        let design = DMatrix::from_fn(n, 4, |row, col| match col {
            3 => 1.0,
            axis => (world[row][axis] - centroid[axis]) / spread,
        });
        let targets = DMatrix::from_fn(n, 2, |row, col| image[row][col]);

        let svd = design.svd(true, true);
        let (smallest, largest) = singular_value_range(svd.singular_values.iter().copied());
        let ratio = smallest / largest;
        if !(ratio >= self.rank_epsilon) {
            return Err(RectifyError::RankDeficient { ratio });
        }
        let solution = svd
            .solve(&targets, f64::EPSILON)
            .map_err(RectifyError::SvdFailed)?;

        // Undo the normalization: r . ((x - c) / s, 1) = (r / s) . x + (r3 - r . c / s)
        let row = |col: usize| {
            let linear = Vector3::new(solution[(0, col)], solution[(1, col)], solution[(2, col)])
                / spread;
            RowVector4::new(
                linear.x,
                linear.y,
                linear.z,
                solution[(3, col)] - linear.dot(&centroid),
            )
        };
        let (u_row, v_row) = (row(0), row(1));

        // Both image axes must move, independently and by more than rounding noise, across the
        // sampled region.
        let block = Matrix2x3::new(u_row.x, u_row.y, u_row.z, v_row.x, v_row.y, v_row.z);
        let (smallest, largest) = singular_value_range(block.singular_values().iter().copied());
        let ratio = smallest / largest;
        let image_scale = image
            .iter()
            .map(|p| FloatOrd(p.coords.amax()))
            .max()
            .map_or(1.0, |m| m.0.max(1.0));
        if !(ratio >= self.rank_epsilon) || !(largest * spread > self.rank_epsilon * image_scale) {
            return Err(RectifyError::DegenerateProjection { ratio });
        }

        log::debug!("fitted affine camera to {} correspondences", n);
        Ok(AffineCamera::from_rows(u_row, v_row)?)
    }
}

impl Default for AffineRectification {
    fn default() -> Self {
        Self {
            min_points: MIN_POINTS,
            rank_epsilon: 1e-9,
        }
    }
}

/// `(smallest, largest)` singular value.
fn singular_value_range(values: impl Iterator<Item = f64> + Clone) -> (f64, f64) {
    let largest = values.clone().map(FloatOrd).max().map_or(0.0, |v| v.0);
    let smallest = values.map(FloatOrd).min().map_or(0.0, |v| v.0);
    (smallest, largest)
}

/// Fits an affine camera to `camera` inside `bbox` with the default [`AffineRectification`].
pub fn compute_affine_camera<C>(
    camera: &C,
    bbox: &BoundingBox3,
    n_points: usize,
    rng: &mut impl Rng,
) -> Result<AffineCamera, RectifyError>
where
    C: Camera + ?Sized,
{
    AffineRectification::new().compute_affine_camera(camera, bbox, n_points, rng)
}

/// Root mean square distance in pixels between `camera.project(world[i])` and `image[i]`.
pub fn reprojection_rms<C>(
    camera: &C,
    world: &[Point3<f64>],
    image: &[Point2<f64>],
) -> Result<f64, RectifyError>
where
    C: Camera + ?Sized,
{
    if world.len() != image.len() {
        return Err(RectifyError::MismatchedLengths {
            world: world.len(),
            image: image.len(),
        });
    }
    if world.is_empty() {
        return Ok(0.0);
    }
    let mut sum = 0.0;
    for (x, u) in world.iter().zip(image) {
        sum += (camera.project(*x)? - u).norm_squared();
    }
    Ok((sum / world.len() as f64).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn truth() -> AffineCamera {
        AffineCamera::from_rows(
            RowVector4::new(0.9, 0.05, -0.2, 1500.0),
            RowVector4::new(-0.03, -0.95, 0.4, 2500.0),
        )
        .unwrap()
    }

    fn grid() -> Vec<Point3<f64>> {
        let mut points = Vec::new();
        for x in [-300.0, 0.0, 250.0] {
            for y in [-100.0, 400.0] {
                for z in [0.0, 60.0] {
                    points.push(Point3::new(x, y, z));
                }
            }
        }
        points
    }

    #[test]
    fn exact_correspondences_are_recovered() {
        let world = grid();
        let image: Vec<_> = world.iter().map(|&x| truth().project(x).unwrap()).collect();
        let fitted = AffineRectification::new()
            .fit_affine_camera(&world, &image)
            .unwrap();
        assert_relative_eq!(fitted.matrix(), truth().matrix(), epsilon = 1e-8);
        assert!(reprojection_rms(&fitted, &world, &image).unwrap() < 1e-8);
    }

    #[test]
    fn coplanar_points_are_rank_deficient() {
        let world: Vec<_> = grid().into_iter().filter(|p| p.z == 0.0).collect();
        let image: Vec<_> = world.iter().map(|&x| truth().project(x).unwrap()).collect();
        assert!(matches!(
            AffineRectification::new().fit_affine_camera(&world, &image),
            Err(RectifyError::RankDeficient { .. })
        ));
    }

    #[test]
    fn constant_image_is_degenerate() {
        let world = grid();
        let image = vec![Point2::new(10.0, 20.0); world.len()];
        assert!(matches!(
            AffineRectification::new().fit_affine_camera(&world, &image),
            Err(RectifyError::DegenerateProjection { .. })
        ));
    }

    #[test]
    fn input_lengths_are_checked() {
        let world = grid();
        let image = vec![Point2::origin(); 3];
        assert!(matches!(
            AffineRectification::new().fit_affine_camera(&world, &image),
            Err(RectifyError::MismatchedLengths { world: 12, image: 3 })
        ));
        assert!(matches!(
            AffineRectification::new().fit_affine_camera(&world[..3], &image),
            Err(RectifyError::InsufficientCorrespondences { required: 4, got: 3 })
        ));
    }

    #[test]
    fn min_points_never_drops_below_solvable() {
        assert_eq!(AffineRectification::new().min_points(1).get_min_points(), MIN_CORRESPONDENCES);
        assert_eq!(AffineRectification::default().get_min_points(), MIN_POINTS);
    }
}
