//! Kinema: Bezier keyframe animation driving a dependent transform hierarchy.
//!
//! The crate re-exports the workspace members:
//!
//! - [`core`]: spline math, errors and settings
//! - [`animation`]: samplers, channels, listener slots and the evaluator
//! - [`scene`]: transform nodes, lights and cameras
//!
//! ```rust,ignore
//! use kinema::prelude::*;
//!
//! let mut evaluator = Evaluator::new();
//! let mut graph = TransformGraph::new();
//!
//! let node = graph.insert("box", None)?;
//! graph.get_mut(node).unwrap().add_translate("box/t", Vec3::ZERO, &evaluator)?;
//!
//! evaluator.add_animation(Arc::new(animation), 0.0);
//! evaluator.update(1.0 / 60.0);
//! graph.update_all();
//! ```

pub use kinema_animation as animation;
pub use kinema_core as core;
pub use kinema_scene as scene;

pub use kinema_animation::{
    AnimListener, Animation, ChannelDescriptor, Evaluator, ListenerRegistry, Sampler,
};
pub use kinema_core::{EvaluatorSettings, KinemaError, Result};
pub use kinema_scene::{Camera, Light, NodeKey, Transform, TransformGraph, TransformNode};

pub mod prelude {
    pub use crate::animation::{AnimListener, Animation, ChannelDescriptor, Evaluator, Sampler};
    pub use crate::core::{EvaluatorSettings, KinemaError};
    pub use crate::scene::{Camera, FovAxis, Light, LightKind, NodeKey, TransformGraph};
    pub use glam::{Mat4, Quat, Vec2, Vec3, Vec4};
    pub use std::sync::Arc;
}
