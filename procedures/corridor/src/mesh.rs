use bevy::asset::RenderAssetUsages;
use bevy::mesh::{Indices, PrimitiveTopology};
use bevy::prelude::*;
use sdf::{Bounds, CapsuleSdf, OrientedBoxSdf, Sdf};

/// Geometry that can be turned into a renderable bevy mesh.
pub trait MeshBuilder {
	/// Builds the mesh, or `None` when there is nothing to render.
	fn build_mesh(&self) -> Option<Mesh>;
}

/// Assembles an indexed triangle list with computed normals.
pub fn triangle_mesh(positions: &[Vec3], indices: &[u32], uvs: Option<&[[f32; 2]]>) -> Option<Mesh> {
	if positions.is_empty() || indices.is_empty() || indices.len() % 3 != 0 {
		return None;
	}

	let mut mesh = Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default());
	mesh.insert_attribute(
		Mesh::ATTRIBUTE_POSITION,
		positions.iter().map(|p| p.to_array()).collect::<Vec<[f32; 3]>>(),
	);
	if let Some(uvs) = uvs {
		mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, uvs.to_vec());
	}
	mesh.insert_indices(Indices::U32(indices.to_vec()));
	mesh.compute_normals();
	Some(mesh)
}

/// Collision shapes emitted alongside generated geometry.
#[derive(Debug, Clone, PartialEq)]
pub enum Collider {
	Capsule(CapsuleSdf),
	/// Point cloud whose convex hull is the collision shape.
	ConvexHull { points: Vec<Vec3> },
	Box { shape: OrientedBoxSdf, trigger: bool },
	TriMesh { positions: Vec<Vec3>, indices: Vec<u32> },
}

impl Collider {
	pub fn is_trigger(&self) -> bool {
		matches!(self, Collider::Box { trigger: true, .. })
	}

	pub fn bounds(&self) -> Bounds {
		match self {
			Collider::Capsule(capsule) => capsule.bounds(),
			Collider::ConvexHull { points } => Bounds::from_points(points.iter().copied()),
			Collider::Box { shape, .. } => shape.bounds(),
			Collider::TriMesh { positions, .. } => Bounds::from_points(positions.iter().copied()),
		}
	}

	/// The same collider expressed in the space `transform` maps into.
	pub fn transformed(&self, transform: &Transform) -> Collider {
		match self {
			Collider::Capsule(capsule) => Collider::Capsule(capsule.transformed(transform)),
			Collider::ConvexHull { points } => Collider::ConvexHull {
				points: points.iter().map(|p| transform.transform_point(*p)).collect(),
			},
			Collider::Box { shape, trigger } => Collider::Box {
				shape: OrientedBoxSdf {
					center: transform.transform_point(shape.center),
					rotation: transform.rotation * shape.rotation,
					half_extents: shape.half_extents * transform.scale.abs(),
				},
				trigger: *trigger,
			},
			Collider::TriMesh { positions, indices } => Collider::TriMesh {
				positions: positions.iter().map(|p| transform.transform_point(*p)).collect(),
				indices: indices.clone(),
			},
		}
	}
}
