//! Dependent transform hierarchy and the scene objects that hang off it.
//!
//! Every transform parameter, light color and camera lens setting is an
//! animation listener, so an [`Evaluator`](kinema_animation::Evaluator)
//! tick followed by [`TransformGraph::update_all`] brings the whole scene
//! up to date.

pub mod camera;
pub mod graph;
pub mod light;
pub mod node;
pub mod transform;

pub use camera::{Camera, FovAxis, Frustum, FrustumPlane};
pub use graph::{NodeKey, TransformGraph};
pub use light::{Light, LightKind, PointLight, SpotLight};
pub use node::TransformNode;
pub use transform::{Transform, TransformKind};
