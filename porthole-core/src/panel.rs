//! Registered panels and their visibility menu.

/// One togglable panel served through the remote UI.
pub trait Panel {
    /// Menu entry and window title.
    fn title(&self) -> &str;

    /// Draw the panel. Called once per frame while visible.
    fn draw(&mut self, ctx: &egui::Context, dt: f32);

    fn default_visible(&self) -> bool {
        false
    }
}

struct PanelEntry {
    panel: Box<dyn Panel>,
    visible: bool,
}

/// Panels registered with the pipeline, drawn in registration order.
#[derive(Default)]
pub struct PanelRegistry {
    entries: Vec<PanelEntry>,
}

impl PanelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, panel: Box<dyn Panel>) {
        let visible = panel.default_visible();
        self.entries.push(PanelEntry { panel, visible });
    }

    pub fn is_visible(&self, title: &str) -> bool {
        self.entries
            .iter()
            .any(|e| e.visible && e.panel.title() == title)
    }

    pub fn set_visible(&mut self, title: &str, visible: bool) {
        for entry in &mut self.entries {
            if entry.panel.title() == title {
                entry.visible = visible;
            }
        }
    }

    pub fn draw(&mut self, ctx: &egui::Context, dt: f32) {
        for entry in &mut self.entries {
            if entry.visible {
                entry.panel.draw(ctx, dt);
            }
        }
    }

    /// Visibility checkboxes, one per registered panel.
    pub fn menu_ui(&mut self, ui: &mut egui::Ui) {
        for entry in &mut self.entries {
            let title = entry.panel.title().to_string();
            ui.checkbox(&mut entry.visible, title);
        }
    }
}
