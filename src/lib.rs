pub mod vector;
pub use vector::*;

pub mod axis;
pub use axis::*;

pub mod ray;
pub use ray::*;

pub mod aabb;
pub use aabb::*;

pub mod hit_info;
pub use hit_info::*;

pub mod shape;
pub use shape::*;

pub mod sphere;
pub use sphere::*;

pub mod triangle;
pub use triangle::*;

pub mod intersections;
pub use intersections::*;

pub mod error;
pub use error::*;

pub mod config;
pub use config::*;

pub mod bvh_strategy;
pub use bvh_strategy::BuildMethod;

mod bvh_builder;

pub mod bvh_flatten;
pub use bvh_flatten::{LinearNode, LinearNodeKind};

pub mod bvh;
pub use bvh::*;
