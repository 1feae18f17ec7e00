use porthole_shared::ClientId;

/// Immutable result of one UI frame, handed to the network thread.
///
/// Everything a viewer needs to rasterize the frame travels by value; the
/// pipeline never hands out references into its own egui state, so the
/// network thread works at its own pace on a frame that can never change
/// under it.
#[derive(Clone)]
pub struct DrawSnapshot {
    pub shapes: Vec<egui::epaint::ClippedShape>,
    pub textures_delta: egui::TexturesDelta,
    pub pixels_per_point: f32,
    /// Cursor icon to show on the controlling viewer.
    pub cursor: egui::CursorIcon,
    /// Which client holds the control token, if any. Non-holders render a
    /// ghost of the holder's pointer instead of their own.
    pub control: Option<ClientId>,
    /// Latest pointer position, for the ghost cursor on non-holders.
    pub pointer: Option<egui::Pos2>,
    pub viewport: egui::Vec2,
}

impl std::fmt::Debug for DrawSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DrawSnapshot")
            .field("shapes", &self.shapes.len())
            .field("pixels_per_point", &self.pixels_per_point)
            .field("control", &self.control)
            .field("viewport", &self.viewport)
            .finish_non_exhaustive()
    }
}
