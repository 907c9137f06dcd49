//! Cross-section reconstruction.
//!
//! Two selections, each captured at its own depth, become the two boundary
//! rings of a ruled surface. Vertex `i` of the first ring is connected to
//! vertex `i` of the second, and consecutive pairs are joined by two
//! triangles.

use std::cmp::Ordering;
use std::fmt;

use glam::{DVec2, DVec3, UVec3};
use serde::{Deserialize, Serialize};
use slicelink_core::{
    ConfigurationError, PlaneSpec, PointCloud, PointId, ReconstructionError,
};

use crate::selection::Selection;

/// Which boundary ring a vertex belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RingSide {
    First,
    Second,
}

/// Where a surface vertex came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VertexSource {
    /// The cloud point the vertex was built from. Swept profiles carry none.
    pub point: Option<PointId>,
    /// The ring the vertex belongs to.
    pub ring: RingSide,
}

/// Whether the last pair connects back to the first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RingClosure {
    /// An open strip between the rings.
    #[default]
    Open,
    /// A band that also joins the last pair to the first (needs 3 pairs).
    Closed,
}

/// How ring vertices are ordered before pairing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RingOrder {
    /// Keep the order in which points were selected.
    #[default]
    AsSelected,
    /// Sort by angle around the ring's planar centroid.
    Angular,
}

/// Options for [`reconstruct_surface`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconstructionOptions {
    pub closure: RingClosure,
    pub order: RingOrder,
}

/// A triangulated surface connecting two rings.
///
/// The first ring occupies vertices `0..n` and the second `n..2n`, where `n`
/// is the number of connected pairs.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReconstructedSurface {
    vertices: Vec<DVec3>,
    sources: Vec<VertexSource>,
    faces: Vec<UVec3>,
    rulings: Vec<[u32; 2]>,
}

impl ReconstructedSurface {
    /// The explicit empty surface.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns true if the surface has no vertices.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Returns the vertex positions.
    pub fn vertices(&self) -> &[DVec3] {
        &self.vertices
    }

    /// Returns the source of each vertex.
    pub fn sources(&self) -> &[VertexSource] {
        &self.sources
    }

    /// Returns the triangle faces as vertex indices.
    pub fn faces(&self) -> &[UVec3] {
        &self.faces
    }

    /// Returns the `i ↔ i` connections between the rings.
    pub fn rulings(&self) -> &[[u32; 2]] {
        &self.rulings
    }

    /// Returns the number of vertices.
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the number of triangle faces.
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Returns the number of connected pairs.
    pub fn num_pairs(&self) -> usize {
        self.rulings.len()
    }

    /// Returns the axis-aligned bounding box, or `None` when empty.
    pub fn bounding_box(&self) -> Option<(DVec3, DVec3)> {
        let first = *self.vertices.first()?;
        Some(
            self.vertices
                .iter()
                .fold((first, first), |(min, max), v| (min.min(*v), max.max(*v))),
        )
    }
}

/// Best-effort reconstruction of rings with different sizes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartialReconstructionWarning {
    /// Number of pairs that were connected.
    pub connected: usize,
    /// First-ring points beyond the shorter ring.
    pub unconnected_first: Vec<PointId>,
    /// Second-ring points beyond the shorter ring.
    pub unconnected_second: Vec<PointId>,
}

impl PartialReconstructionWarning {
    /// Returns the number of points left out of the surface.
    pub fn num_unconnected(&self) -> usize {
        self.unconnected_first.len() + self.unconnected_second.len()
    }
}

impl fmt::Display for PartialReconstructionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rings differ in size: connected {} pairs, {} points left unconnected",
            self.connected,
            self.num_unconnected()
        )
    }
}

/// A successful reconstruction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reconstruction {
    pub surface: ReconstructedSurface,
    pub warning: Option<PartialReconstructionWarning>,
}

struct RingVertex {
    point: Option<PointId>,
    planar: DVec2,
}

/// Builds the surface connecting two selections.
///
/// Each ring lies in its own depth plane: the planar coordinates of every
/// point come from the cloud, and the depth captured with the selection is
/// substituted on the selection's depth axis.
pub fn reconstruct_surface(
    first: &Selection,
    second: &Selection,
    cloud: &PointCloud,
    options: &ReconstructionOptions,
) -> Result<Reconstruction, ReconstructionError> {
    let ring_a = resolve_ring(first, cloud, options.order);
    let ring_b = resolve_ring(second, cloud, options.order);

    let empty_views: Vec<String> = [(first, &ring_a), (second, &ring_b)]
        .into_iter()
        .filter(|(_, ring)| ring.is_empty())
        .map(|(selection, _)| selection.view().to_string())
        .collect();
    if !empty_views.is_empty() {
        return Err(ReconstructionError::NoDataSelected { empty_views });
    }

    if first.generation() != second.generation() {
        return Err(ReconstructionError::GenerationMismatch {
            first: first.view().to_string(),
            second: second.view().to_string(),
        });
    }
    if first.generation() != cloud.generation() {
        return Err(ReconstructionError::StaleSelection(first.view().to_string()));
    }

    let pairs = ring_a.len().min(ring_b.len());
    let warning = (ring_a.len() != ring_b.len()).then(|| PartialReconstructionWarning {
        connected: pairs,
        unconnected_first: ring_a[pairs..].iter().filter_map(|v| v.point).collect(),
        unconnected_second: ring_b[pairs..].iter().filter_map(|v| v.point).collect(),
    });

    let surface = ruled_strip(
        (&ring_a[..pairs], first.plane(), first.depth()),
        (&ring_b[..pairs], second.plane(), second.depth()),
        options.closure,
    );

    match &warning {
        Some(w) => log::warn!("reconstruction between '{}' and '{}': {w}", first.view(), second.view()),
        None => log::info!(
            "reconstructed surface between '{}' and '{}': {} faces",
            first.view(),
            second.view(),
            surface.face_count()
        ),
    }

    Ok(Reconstruction { surface, warning })
}

/// Sweeps a 2D profile between two depths.
///
/// The profile is placed at `depth_a` and at `depth_b` on `plane`'s depth axis
/// and the two copies are joined like reconstructed rings. An empty profile
/// gives the empty surface.
pub fn extrude_profile(
    profile: &[DVec2],
    plane: PlaneSpec,
    depth_a: f64,
    depth_b: f64,
    closure: RingClosure,
) -> Result<ReconstructedSurface, ConfigurationError> {
    for depth in [depth_a, depth_b] {
        if !depth.is_finite() {
            return Err(ConfigurationError::NonFiniteDepth(depth));
        }
    }
    if let Some(bad) = profile.iter().position(|p| !p.is_finite()) {
        return Err(ConfigurationError::NonFinitePoint(bad));
    }

    let ring: Vec<RingVertex> = profile
        .iter()
        .map(|planar| RingVertex {
            point: None,
            planar: *planar,
        })
        .collect();
    Ok(ruled_strip(
        (&ring[..], plane, depth_a),
        (&ring[..], plane, depth_b),
        closure,
    ))
}

fn resolve_ring(selection: &Selection, cloud: &PointCloud, order: RingOrder) -> Vec<RingVertex> {
    let mut ring: Vec<RingVertex> = selection
        .ids()
        .iter()
        .filter_map(|id| {
            let point = cloud.get(*id)?;
            let (planar, _) = selection.plane().split(point.position());
            Some(RingVertex {
                point: Some(*id),
                planar,
            })
        })
        .collect();

    if order == RingOrder::Angular && !ring.is_empty() {
        let centroid = ring.iter().map(|v| v.planar).sum::<DVec2>() / ring.len() as f64;
        let angle = |v: &RingVertex| {
            let d = v.planar - centroid;
            d.y.atan2(d.x)
        };
        ring.sort_by(|a, b| match angle(a).total_cmp(&angle(b)) {
            Ordering::Equal => a.point.cmp(&b.point),
            other => other,
        });
    }
    ring
}

fn ruled_strip(
    (ring_a, plane_a, depth_a): (&[RingVertex], PlaneSpec, f64),
    (ring_b, plane_b, depth_b): (&[RingVertex], PlaneSpec, f64),
    closure: RingClosure,
) -> ReconstructedSurface {
    let n = ring_a.len().min(ring_b.len());
    if n == 0 {
        return ReconstructedSurface::empty();
    }

    let mut surface = ReconstructedSurface {
        vertices: Vec::with_capacity(2 * n),
        sources: Vec::with_capacity(2 * n),
        faces: Vec::new(),
        rulings: Vec::with_capacity(n),
    };

    for (ring, plane, depth, side) in [
        (&ring_a[..n], plane_a, depth_a, RingSide::First),
        (&ring_b[..n], plane_b, depth_b, RingSide::Second),
    ] {
        for vertex in ring {
            surface.vertices.push(plane.compose(vertex.planar, depth));
            surface.sources.push(VertexSource {
                point: vertex.point,
                ring: side,
            });
        }
    }

    let n = n as u32;
    for i in 0..n {
        surface.rulings.push([i, n + i]);
    }

    let quads = match closure {
        RingClosure::Closed if n >= 3 => n,
        _ => n - 1,
    };
    for i in 0..quads {
        let next = (i + 1) % n;
        let (a0, a1) = (i, next);
        let (b0, b1) = (n + i, n + next);

        // Two triangles for this quad
        surface.faces.push(UVec3::new(a0, b0, a1));
        surface.faces.push(UVec3::new(a1, b0, b1));
    }

    surface
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ViewSpec;
    use crate::selection::SelectionManager;
    use proptest::prelude::*;
    use slicelink_core::{generate, GroupSpec};

    fn four_points() -> PointCloud {
        PointCloud::from_points([
            ("outer", DVec3::new(0.0, 0.0, 1.0)),
            ("outer", DVec3::new(1.0, 0.0, 1.0)),
            ("inner", DVec3::new(0.0, 1.0, 5.0)),
            ("inner", DVec3::new(1.0, 1.0, 5.0)),
        ])
        .unwrap()
    }

    fn manager() -> SelectionManager {
        SelectionManager::with_views([ViewSpec::new("view-1"), ViewSpec::new("view-2")]).unwrap()
    }

    fn select(
        manager: &mut SelectionManager,
        view: &str,
        ids: &[PointId],
        depth: f64,
        cloud: &PointCloud,
    ) -> Selection {
        manager
            .set_selection(view, ids.iter().copied(), depth, PlaneSpec::XY, cloud)
            .unwrap()
            .clone()
    }

    #[test]
    fn test_equal_rings() {
        let cloud = four_points();
        let mut manager = manager();
        let a = select(&mut manager, "view-1", &[0, 1], 1.0, &cloud);
        let b = select(&mut manager, "view-2", &[2, 3], 5.0, &cloud);

        let result = reconstruct_surface(&a, &b, &cloud, &ReconstructionOptions::default()).unwrap();
        assert!(result.warning.is_none());
        assert_eq!(result.surface.face_count(), 2);
        assert_eq!(result.surface.num_pairs(), 2);
        assert_eq!(result.surface.num_vertices(), 4);

        // Vertices are real points with the ring depth substituted
        for (vertex, source) in result.surface.vertices().iter().zip(result.surface.sources()) {
            let point = cloud.get(source.point.unwrap()).unwrap().position();
            assert_eq!(vertex.x, point.x);
            assert_eq!(vertex.y, point.y);
            let depth = match source.ring {
                RingSide::First => 1.0,
                RingSide::Second => 5.0,
            };
            assert_eq!(vertex.z, depth);
        }
    }

    #[test]
    fn test_depth_comes_from_selection() {
        let cloud = four_points();
        let mut manager = manager();
        let a = select(&mut manager, "view-1", &[0, 1], -2.0, &cloud);
        let b = select(&mut manager, "view-2", &[2, 3], 9.0, &cloud);

        let result = reconstruct_surface(&a, &b, &cloud, &ReconstructionOptions::default()).unwrap();
        let (min, max) = result.surface.bounding_box().unwrap();
        assert_eq!(min.z, -2.0);
        assert_eq!(max.z, 9.0);
    }

    #[test]
    fn test_unequal_rings_warn() {
        let cloud = generate(4, &[GroupSpec::new("g", DVec3::ZERO, 1.0, 10)]).unwrap();
        let mut manager = manager();
        let a = select(&mut manager, "view-1", &[0, 1, 2], 0.0, &cloud);
        let b = select(&mut manager, "view-2", &[5, 6], 1.0, &cloud);

        let result = reconstruct_surface(&a, &b, &cloud, &ReconstructionOptions::default()).unwrap();
        let warning = result.warning.unwrap();
        assert_eq!(warning.connected, 2);
        assert_eq!(warning.unconnected_first, vec![2]);
        assert!(warning.unconnected_second.is_empty());
        assert_eq!(result.surface.num_pairs(), 2);
        assert_eq!(result.surface.face_count(), 2);
        assert!(result
            .surface
            .sources()
            .iter()
            .all(|s| s.point != Some(2)));
    }

    #[test]
    fn test_empty_ring_is_an_error() {
        let cloud = four_points();
        let mut manager = manager();
        let a = select(&mut manager, "view-1", &[0, 1], 1.0, &cloud);
        let b = select(&mut manager, "view-2", &[], 5.0, &cloud);

        let err = reconstruct_surface(&a, &b, &cloud, &ReconstructionOptions::default()).unwrap_err();
        assert_eq!(
            err,
            ReconstructionError::NoDataSelected {
                empty_views: vec!["view-2".to_string()]
            }
        );
        assert_eq!(err.to_string(), "no data selected");
    }

    #[test]
    fn test_mismatched_generations() {
        let old = generate(1, &[GroupSpec::new("g", DVec3::ZERO, 1.0, 10)]).unwrap();
        let new = generate(2, &[GroupSpec::new("g", DVec3::ZERO, 1.0, 10)]).unwrap();
        let mut manager = manager();
        let a = select(&mut manager, "view-1", &[0, 1], 0.0, &old);
        let b = select(&mut manager, "view-2", &[2, 3], 1.0, &new);

        let opts = ReconstructionOptions::default();
        assert!(matches!(
            reconstruct_surface(&a, &b, &new, &opts),
            Err(ReconstructionError::GenerationMismatch { .. })
        ));

        let a = select(&mut manager, "view-1", &[0, 1], 0.0, &old);
        let b = select(&mut manager, "view-2", &[2, 3], 1.0, &old);
        assert_eq!(
            reconstruct_surface(&a, &b, &new, &opts),
            Err(ReconstructionError::StaleSelection("view-1".to_string()))
        );
    }

    #[test]
    fn test_closed_band() {
        let cloud = generate(4, &[GroupSpec::new("g", DVec3::ZERO, 1.0, 10)]).unwrap();
        let mut manager = manager();
        let a = select(&mut manager, "view-1", &[0, 1, 2, 3], 0.0, &cloud);
        let b = select(&mut manager, "view-2", &[4, 5, 6, 7], 1.0, &cloud);

        let opts = ReconstructionOptions {
            closure: RingClosure::Closed,
            ..ReconstructionOptions::default()
        };
        let result = reconstruct_surface(&a, &b, &cloud, &opts).unwrap();
        assert_eq!(result.surface.face_count(), 8);

        // Two pairs cannot close
        let a = select(&mut manager, "view-1", &[0, 1], 0.0, &cloud);
        let b = select(&mut manager, "view-2", &[4, 5], 1.0, &cloud);
        let result = reconstruct_surface(&a, &b, &cloud, &opts).unwrap();
        assert_eq!(result.surface.face_count(), 2);
    }

    #[test]
    fn test_single_pair_has_no_faces() {
        let cloud = four_points();
        let mut manager = manager();
        let a = select(&mut manager, "view-1", &[0], 1.0, &cloud);
        let b = select(&mut manager, "view-2", &[3], 5.0, &cloud);
        let result = reconstruct_surface(&a, &b, &cloud, &ReconstructionOptions::default()).unwrap();
        assert!(!result.surface.is_empty());
        assert_eq!(result.surface.face_count(), 0);
        assert_eq!(result.surface.rulings(), &[[0, 1]]);
    }

    #[test]
    fn test_angular_order() {
        // Square corners selected in a scrambled order
        let cloud = PointCloud::from_points([
            ("g", DVec3::new(1.0, 1.0, 0.0)),
            ("g", DVec3::new(-1.0, -1.0, 0.0)),
            ("g", DVec3::new(-1.0, 1.0, 0.0)),
            ("g", DVec3::new(1.0, -1.0, 0.0)),
        ])
        .unwrap();
        let mut manager = manager();
        let a = select(&mut manager, "view-1", &[0, 1, 2, 3], 0.0, &cloud);
        let b = select(&mut manager, "view-2", &[3, 2, 1, 0], 2.0, &cloud);

        let opts = ReconstructionOptions {
            order: RingOrder::Angular,
            ..ReconstructionOptions::default()
        };
        let result = reconstruct_surface(&a, &b, &cloud, &opts).unwrap();
        let sources = result.surface.sources();
        // Both rings sorted the same way, so each ruling joins the same point
        for [i, j] in result.surface.rulings() {
            assert_eq!(sources[*i as usize].point, sources[*j as usize].point);
        }
        assert_eq!(sources[0].point, Some(1));
    }

    #[test]
    fn test_extrude_profile() {
        let profile: Vec<DVec2> = (0..10_i32)
            .map(|i| {
                let x = f64::from(i);
                DVec2::new(x, x.sin())
            })
            .collect();
        let surface = extrude_profile(&profile, PlaneSpec::XZ, 3.0, 7.0, RingClosure::Open).unwrap();
        assert_eq!(surface.num_vertices(), 20);
        assert_eq!(surface.face_count(), 18);
        assert!(surface.sources().iter().all(|s| s.point.is_none()));
        assert_eq!(surface.vertices()[0].y, 3.0);
        assert_eq!(surface.vertices()[10].y, 7.0);

        let empty = extrude_profile(&[], PlaneSpec::XY, 0.0, 1.0, RingClosure::Open).unwrap();
        assert!(empty.is_empty());
        assert!(extrude_profile(&profile, PlaneSpec::XY, f64::NAN, 1.0, RingClosure::Open).is_err());
    }

    proptest! {
        #[test]
        fn prop_strip_counts(
            seed in any::<u64>(),
            len_a in 1usize..=12,
            len_b in 1usize..=12,
            closed in any::<bool>(),
        ) {
            let cloud = generate(seed, &[GroupSpec::new("g", DVec3::ZERO, 1.0, 30)]).unwrap();
            let mut manager = manager();
            let ids_a: Vec<PointId> = (0..len_a).collect();
            let ids_b: Vec<PointId> = (15..15 + len_b).collect();
            let a = select(&mut manager, "view-1", &ids_a, -1.0, &cloud);
            let b = select(&mut manager, "view-2", &ids_b, 1.0, &cloud);

            let closure = if closed { RingClosure::Closed } else { RingClosure::Open };
            let opts = ReconstructionOptions { closure, ..ReconstructionOptions::default() };
            let result = reconstruct_surface(&a, &b, &cloud, &opts).unwrap();
            let surface = &result.surface;

            let pairs = len_a.min(len_b);
            let quads = if closed && pairs >= 3 { pairs } else { pairs - 1 };
            prop_assert_eq!(surface.num_pairs(), pairs);
            prop_assert_eq!(surface.num_vertices(), 2 * pairs);
            prop_assert_eq!(surface.face_count(), 2 * quads);
            prop_assert_eq!(result.warning.is_some(), len_a != len_b);
            if let Some(warning) = &result.warning {
                prop_assert_eq!(warning.num_unconnected(), len_a.abs_diff(len_b));
            }
            let bound = u32::try_from(2 * pairs).unwrap();
            prop_assert!(surface.faces().iter().all(|f| f.max_element() < bound));
        }
    }
}
