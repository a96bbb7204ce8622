use crate::display::interface::ViewDisplay;
use crate::leaf_identifier::render::View;
use std::error::Error;

#[derive(Debug, Default)]
pub struct ViewDisplayFake {
    pub views: Vec<View>,
}

impl ViewDisplayFake {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<&View> {
        self.views.last()
    }
}

impl ViewDisplay for ViewDisplayFake {
    fn render(&mut self, view: &View) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.views.push(view.clone());
        Ok(())
    }
}
