use crate::leaf_identifier::render::View;
use std::error::Error;

/// Somewhere a rendered [`View`] can be shown.
pub trait ViewDisplay {
    fn render(&mut self, view: &View) -> Result<(), Box<dyn Error + Send + Sync>>;
}
