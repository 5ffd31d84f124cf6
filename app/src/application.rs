//! Service wiring and the per-frame draw.

use std::cell::RefCell;
use std::rc::Rc;

use glint_core::uniform::UniformMap;
use glint_graphics::{
    DeviceSurface, GraphicsContext, MaterialCache, Model, ModelCache, ShaderCache,
};
use glint_vfs::{AssetStore, VfsProvider};

use crate::config::AppConfig;
use crate::error::AppError;

/// Install the logger for the current target at `level`.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logging(level: log::LevelFilter) {
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = env_logger::Builder::new().filter_level(level).try_init();
    }

    #[cfg(target_arch = "wasm32")]
    {
        console_error_panic_hook::set_once();
        let level = level.to_level().unwrap_or(log::Level::Error);
        let _ = console_log::init_with_level(level);
    }
}

/// The application: one graphics context, one asset store and the caches
/// built on them, plus the model being drawn.
///
/// Everything is constructed once here and handed down; nothing is global.
pub struct Application {
    config: AppConfig,
    context: Rc<GraphicsContext>,
    store: AssetStore,
    shaders: Rc<ShaderCache>,
    materials: Rc<MaterialCache>,
    models: ModelCache,
    current: RefCell<Option<Rc<Model>>>,
}

impl Application {
    /// Acquire the graphics context from `surface` and build the services.
    pub fn new(
        config: AppConfig,
        provider: impl VfsProvider,
        surface: impl DeviceSurface,
    ) -> Result<Self, AppError> {
        let context = Rc::new(GraphicsContext::new());
        context.initialize(surface)?;

        let store = AssetStore::new(provider);
        let shaders = Rc::new(ShaderCache::new(
            context.clone(),
            store.clone(),
            config.assets.shader_path(),
        ));
        let materials = Rc::new(MaterialCache::new(shaders.clone()));
        let models = ModelCache::new(
            context.clone(),
            store.clone(),
            materials.clone(),
            config.assets.model_path(),
        );

        log::info!(
            "Glint v{} ready, assets under {:?}",
            crate::VERSION,
            config.assets.asset_root
        );

        Ok(Self {
            config,
            context,
            store,
            shaders,
            materials,
            models,
            current: RefCell::new(None),
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn context(&self) -> &Rc<GraphicsContext> {
        &self.context
    }

    pub fn store(&self) -> &AssetStore {
        &self.store
    }

    pub fn shaders(&self) -> &Rc<ShaderCache> {
        &self.shaders
    }

    pub fn materials(&self) -> &Rc<MaterialCache> {
        &self.materials
    }

    pub fn models(&self) -> &ModelCache {
        &self.models
    }

    /// The model drawn by [`render_frame`](Self::render_frame), once loaded.
    pub fn current_model(&self) -> Option<Rc<Model>> {
        self.current.borrow().clone()
    }

    /// Load the configured model and make it the one drawn each frame.
    pub async fn load_model(&self) -> Result<Rc<Model>, AppError> {
        let model = self.models.load(&self.config.model).await?;
        *self.current.borrow_mut() = Some(model.clone());
        Ok(model)
    }

    /// Draw the current model with `frame_uniforms`.
    ///
    /// Returns `false` without drawing while no model is loaded.
    pub fn render_frame(&self, frame_uniforms: &UniformMap) -> Result<bool, AppError> {
        let Some(model) = self.current_model() else {
            return Ok(false);
        };
        let backend = self.context.current()?;
        model.draw(backend.as_ref(), frame_uniforms)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glint_core::glsl::GlslType;
    use glint_core::uniform::UniformValue;
    use glint_graphics::GraphicsError;
    use glint_graphics::backend::dummy::{BackendCall, DummyBackend, ProgramInterface};
    use glint_vfs::MemoryProvider;
    use pollster::block_on;

    const SHADER: &str = "__VERTEX__ void main() {} __FRAGMENT__ void main() {}";
    const MODEL: &str = r#"{
        "name": "quad",
        "materials": [{ "name": "flat", "shader": { "name": "flat" }, "properties": {} }],
        "meshes": [{
            "name": "quad",
            "material": "flat",
            "buffers": { "vertex": [0, 0, 1, 0, 1, 1, 0, 1], "index": [0, 1, 2, 2, 3, 0] }
        }]
    }"#;

    fn application() -> (Application, Rc<DummyBackend>) {
        let provider = MemoryProvider::new();
        provider.insert_str("assets/shader/flat.glsl", SHADER);
        provider.insert_str("assets/model/quad.tml", MODEL);
        let backend = Rc::new(DummyBackend::with_interface(
            ProgramInterface::new()
                .attribute("position", GlslType::Vec2, 0)
                .uniform("u_time", GlslType::Float),
        ));
        let app = Application::new(AppConfig::new("quad"), provider, backend.clone()).unwrap();
        (app, backend)
    }

    #[test]
    fn nothing_drawn_before_load() {
        let (app, backend) = application();
        assert!(!app.render_frame(&UniformMap::new()).unwrap());
        assert!(backend.calls().is_empty());
    }

    #[test]
    fn load_then_draw() {
        let (app, backend) = application();
        let model = block_on(app.load_model()).unwrap();
        assert!(Rc::ptr_eq(&model, &app.current_model().unwrap()));
        backend.clear_calls();

        let mut frame = UniformMap::new();
        frame.insert("u_time".into(), UniformValue::Float(0.5));
        assert!(app.render_frame(&frame).unwrap());

        assert_eq!(
            backend.count(|call| matches!(call, BackendCall::DrawIndexedTriangles(6))),
            1
        );
        assert_eq!(
            backend.count(|call| matches!(call, BackendCall::UploadUniform { .. })),
            1
        );
    }

    #[test]
    fn missing_surface_fails() {
        let err = Application::new(
            AppConfig::new("quad"),
            MemoryProvider::new(),
            None::<Rc<DummyBackend>>,
        )
        .err();
        assert_eq!(err, Some(AppError::Graphics(GraphicsError::ContextUnavailable)));
    }
}
