//! Component trait and per-component bookkeeping

use super::{NodeId, UpdateContext};
use std::any::{Any, TypeId};

/// Upcast helper so trait objects can be downcast to their concrete type
///
/// Implemented for every `'static` type; never implement it by hand.
pub trait AsAny: Any {
    /// Borrow as `&dyn Any`
    fn as_any(&self) -> &dyn Any;

    /// Borrow as `&mut dyn Any`
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Behaviour or data attached to exactly one scene node
///
/// The concrete type is the component's type tag: queries such as
/// [`SceneGraph::get_component`](super::SceneGraph::get_component) select by
/// it, and it is fixed for the component's lifetime.
///
/// ```
/// use scene_engine::foundation::math::{utils::axis_angle, Vec3};
/// use scene_engine::scene::{Component, UpdateContext};
///
/// #[derive(Clone)]
/// struct Spin {
///     speed: f32,
/// }
///
/// impl Component for Spin {
///     fn update(&mut self, ctx: &mut UpdateContext<'_>) {
///         let angle = self.speed * ctx.delta_time();
///         if let Some(node) = ctx.node_mut() {
///             node.rotate_by(axis_angle(Vec3::y(), angle));
///         }
///     }
///
///     fn clone_box(&self) -> Option<Box<dyn Component>> {
///         Some(Box::new(self.clone()))
///     }
/// }
/// ```
pub trait Component: AsAny {
    /// Per-tick hook, called once per tick after the owning node's sweep
    fn update(&mut self, ctx: &mut UpdateContext<'_>) {
        let _ = ctx;
    }

    /// Polymorphic clone used by deep copies of the owning node
    ///
    /// Kinds that cannot be duplicated keep the default, which makes any
    /// deep copy containing them fail with
    /// [`SceneError::ComponentNotClonable`](super::SceneError::ComponentNotClonable).
    fn clone_box(&self) -> Option<Box<dyn Component>> {
        None
    }

    /// Human readable name of the concrete type
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Downcast a component trait object to its concrete kind
pub(crate) fn downcast_ref<K: Component>(component: &dyn Component) -> Option<&K> {
    component.as_any().downcast_ref::<K>()
}

/// Mutable counterpart of [`downcast_ref`]
pub(crate) fn downcast_mut<K: Component>(component: &mut dyn Component) -> Option<&mut K> {
    component.as_any_mut().downcast_mut::<K>()
}

/// Type tag of a boxed component
pub(crate) fn tag_of(component: &dyn Component) -> TypeId {
    component.as_any().type_id()
}

/// Arena entry for one attached component
///
/// `component` is `None` only while the component's own update hook runs.
pub(crate) struct ComponentSlot {
    pub(crate) owner: NodeId,
    pub(crate) tag: TypeId,
    pub(crate) type_name: &'static str,
    pub(crate) component: Option<Box<dyn Component>>,
}

impl ComponentSlot {
    pub(crate) fn new(owner: NodeId, component: Box<dyn Component>) -> Self {
        Self {
            owner,
            tag: tag_of(component.as_ref()),
            type_name: component.type_name(),
            component: Some(component),
        }
    }
}
