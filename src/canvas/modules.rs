// src/canvas/modules.rs

use super::CanvasApi;
use crate::{
    constants,
    error::*,
    models::{Course, Module, ModuleItem},
};
use log::{debug, info};
use url::Url;

impl CanvasApi {
    /// Lists a course's modules. An empty list means the course does not use
    /// the modules page and surfaces as [`AppError::NoModules`].
    pub async fn list_modules(&self, course: &Course) -> AppResult<Vec<Module>> {
        self.ensure_course_dir(course)?;
        let url = self
            .requester
            .course_endpoint_url(course.id, constants::api::endpoints::MODULES)?;
        let modules: Vec<Module> = self.fetch_collection(url).await?;
        if modules.is_empty() {
            info!("Course '{}' does not use the modules page", course.name);
            return Err(AppError::NoModules {
                course: course.name.clone(),
            });
        }
        debug!("Course '{}' has {} modules", course.name, modules.len());
        Ok(modules)
    }

    /// Lists a module's items through the server-supplied `items_url`.
    pub async fn list_module_items(&self, module: &Module) -> AppResult<Vec<ModuleItem>> {
        let items_url = module.items_url.trim();
        if items_url.is_empty() {
            debug!("Module '{}' has no items URL", module.name);
            return Ok(Vec::new());
        }
        let items: Vec<ModuleItem> = self.fetch_collection(Url::parse(items_url)?).await?;
        debug!("Module '{}' has {} items", module.name, items.len());
        Ok(items)
    }
}
