//! The graphics device context.
//!
//! [`GraphicsContext`] holds the one active [`GpuBackend`] and turns reflected
//! uniform type codes into upload closures. The mapping from a type code to
//! its element kind, arity and upload primitive lives in the GLSL type table
//! of `glint-core`; this module only dispatches on that table.

use std::cell::OnceCell;
use std::rc::Rc;

use glint_core::CoreError;
use glint_core::glsl::GlslType;
use glint_core::uniform::{UniformData, UniformValue};

use crate::backend::{GpuBackend, UniformLocation};
use crate::error::GraphicsError;

/// Uploads one value to one uniform location of one program.
///
/// Only meaningful while that program is current.
pub type UniformSetter = Rc<dyn Fn(&UniformValue) -> Result<(), CoreError>>;

/// Something a graphics context can be acquired from.
pub trait DeviceSurface {
    /// Acquire a backend, or `None` if the surface cannot provide a context.
    fn acquire(self) -> Option<Rc<dyn GpuBackend>>;
}

impl<B: GpuBackend> DeviceSurface for Rc<B> {
    fn acquire(self) -> Option<Rc<dyn GpuBackend>> {
        Some(self as Rc<dyn GpuBackend>)
    }
}

impl<S: DeviceSurface> DeviceSurface for Option<S> {
    fn acquire(self) -> Option<Rc<dyn GpuBackend>> {
        self.and_then(DeviceSurface::acquire)
    }
}

#[cfg(feature = "glow-backend")]
impl DeviceSurface for glow::Context {
    fn acquire(self) -> Option<Rc<dyn GpuBackend>> {
        Some(Rc::new(crate::backend::glow_backend::GlowBackend::new(self)))
    }
}

#[cfg(all(feature = "glow-backend", target_arch = "wasm32"))]
impl DeviceSurface for web_sys::HtmlCanvasElement {
    fn acquire(self) -> Option<Rc<dyn GpuBackend>> {
        use wasm_bindgen::JsCast;

        let context = self
            .get_context("webgl2")
            .ok()
            .flatten()?
            .dyn_into::<web_sys::WebGl2RenderingContext>()
            .ok()?;
        glow::Context::from_webgl2_context(context).acquire()
    }
}

/// Holder of the active graphics backend.
///
/// Created empty and initialized exactly once from a [`DeviceSurface`].
#[derive(Default)]
pub struct GraphicsContext {
    backend: OnceCell<Rc<dyn GpuBackend>>,
}

impl GraphicsContext {
    /// Create an uninitialized context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the backend from `surface`.
    ///
    /// Fails with [`GraphicsError::AlreadyInitialized`] on a second call and
    /// with [`GraphicsError::ContextUnavailable`] if the surface has no context.
    pub fn initialize(&self, surface: impl DeviceSurface) -> Result<(), GraphicsError> {
        if self.backend.get().is_some() {
            return Err(GraphicsError::AlreadyInitialized);
        }
        let backend = surface.acquire().ok_or(GraphicsError::ContextUnavailable)?;
        log::info!("Graphics context initialized ({} backend)", backend.name());
        self.backend
            .set(backend)
            .map_err(|_| GraphicsError::AlreadyInitialized)
    }

    /// Whether a backend has been installed.
    pub fn is_initialized(&self) -> bool {
        self.backend.get().is_some()
    }

    /// The active backend.
    pub fn current(&self) -> Result<Rc<dyn GpuBackend>, GraphicsError> {
        self.backend.get().cloned().ok_or(GraphicsError::NotInitialized)
    }

    /// Build the upload closure for a uniform of native type `type_code` at
    /// `location`.
    ///
    /// The closure converts its argument to the element kind and arity of
    /// the type, then invokes the type's upload primitive. Matrices are
    /// uploaded with `transpose = false`.
    pub fn build_uniform_setter(
        &self,
        type_code: u32,
        location: UniformLocation,
    ) -> Result<UniformSetter, GraphicsError> {
        let backend = self.current()?;
        let info = GlslType::from_code(type_code)
            .ok_or(GraphicsError::UnsupportedUniformType(type_code))?
            .info();

        Ok(Rc::new(move |value: &UniformValue| {
            let data = value.convert(info.element, info.upload.arity())?;
            match data {
                UniformData::Float(values) if info.upload.is_matrix() => {
                    backend.upload_uniform_matrix(location, info.upload, false, &values)
                }
                data => backend.upload_uniform(location, info.upload, &data),
            }
            Ok(())
        }))
    }
}
