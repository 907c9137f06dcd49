//! Projection of a point cloud onto a coordinate plane.
//!
//! Projection never filters: every point of the cloud appears exactly once,
//! with the coordinate on the dropped axis kept as its depth.

use glam::DVec2;
use serde::Serialize;

use crate::axis::PlaneSpec;
use crate::point_cloud::{GenerationKey, PointCloud, PointId};

/// One point as seen from a 2D view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProjectedPoint {
    /// Identifier of the source point.
    pub id: PointId,
    /// Coordinates on the view's horizontal and vertical axes.
    pub planar: DVec2,
    /// Coordinate on the view's depth axis.
    pub depth: f64,
}

/// A cloud seen through a [`PlaneSpec`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Projection {
    plane: PlaneSpec,
    generation: GenerationKey,
    points: Vec<ProjectedPoint>,
}

impl Projection {
    /// Returns the plane this projection was computed for.
    pub fn plane(&self) -> PlaneSpec {
        self.plane
    }

    /// Returns the generation key of the source cloud.
    pub fn generation(&self) -> GenerationKey {
        self.generation
    }

    /// Returns the projected points in cloud order.
    pub fn points(&self) -> &[ProjectedPoint] {
        &self.points
    }

    /// Returns the number of projected points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns true if the projection is empty.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Looks up a projected point by id.
    pub fn get(&self, id: PointId) -> Option<&ProjectedPoint> {
        // Ids are contiguous, so the id is the index.
        self.points.get(id)
    }

    /// Returns the smallest and largest depth, or `None` when empty.
    pub fn depth_range(&self) -> Option<(f64, f64)> {
        let first = self.points.first()?.depth;
        Some(
            self.points
                .iter()
                .fold((first, first), |(lo, hi), p| (lo.min(p.depth), hi.max(p.depth))),
        )
    }

    /// Returns the planar bounding rectangle, or `None` when empty.
    pub fn planar_bounds(&self) -> Option<(DVec2, DVec2)> {
        let first = self.points.first()?.planar;
        Some(
            self.points
                .iter()
                .fold((first, first), |(min, max), p| {
                    (min.min(p.planar), max.max(p.planar))
                }),
        )
    }
}

/// Projects every point of `cloud` onto `plane`.
pub fn project(cloud: &PointCloud, plane: PlaneSpec) -> Projection {
    let points = cloud
        .points()
        .iter()
        .map(|point| {
            let (planar, depth) = plane.split(point.position());
            ProjectedPoint {
                id: point.id(),
                planar,
                depth,
            }
        })
        .collect();

    Projection {
        plane,
        generation: cloud.generation(),
        points,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::axis::Axis;
    use glam::DVec3;

    fn sample_cloud() -> PointCloud {
        PointCloud::from_points([
            ("a", DVec3::new(1.0, 2.0, 3.0)),
            ("a", DVec3::new(-1.0, 0.5, 4.0)),
            ("b", DVec3::new(0.0, -2.0, -3.0)),
        ])
        .unwrap()
    }

    #[test]
    fn test_projection_is_total() {
        let cloud = sample_cloud();
        let proj = project(&cloud, PlaneSpec::XZ);
        assert_eq!(proj.len(), cloud.len());
        assert_eq!(proj.plane(), PlaneSpec::XZ);
        assert_eq!(proj.generation(), cloud.generation());
    }

    #[test]
    fn test_projection_keeps_pair_order() {
        let cloud = sample_cloud();
        let plane = PlaneSpec::new(Axis::Z, Axis::X).unwrap();
        let proj = project(&cloud, plane);

        let first = proj.get(0).unwrap();
        assert_eq!(first.planar, DVec2::new(3.0, 1.0));
        assert_eq!(first.depth, 2.0);
    }

    #[test]
    fn test_ranges() {
        let proj = project(&sample_cloud(), PlaneSpec::XY);
        assert_eq!(proj.depth_range(), Some((-3.0, 4.0)));
        assert_eq!(
            proj.planar_bounds(),
            Some((DVec2::new(-1.0, -2.0), DVec2::new(1.0, 2.0)))
        );

        let empty = PointCloud::from_points(Vec::<(String, DVec3)>::new()).unwrap();
        assert_eq!(project(&empty, PlaneSpec::XY).depth_range(), None);
    }

    #[test]
    fn test_projection_round_trips_positions() {
        let cloud = sample_cloud();
        let plane = PlaneSpec::YZ;
        let proj = project(&cloud, plane);
        for (point, projected) in cloud.points().iter().zip(proj.points()) {
            assert_eq!(plane.compose(projected.planar, projected.depth), point.position());
        }
    }
}
