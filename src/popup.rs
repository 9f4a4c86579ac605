use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PopupMode {
    #[default]
    Closed,
    History,
    Autocomplete,
    Messages,
}

#[derive(Debug, Clone, Copy)]
pub struct WidthSettings {
    pub min_width: u16,
    pub width_ratio: f32,
    pub margin: u16,
}

impl Default for WidthSettings {
    fn default() -> Self {
        Self {
            min_width: 60,
            width_ratio: 0.66,
            margin: 2,
        }
    }
}

/// Bar width for a terminal `term_width` columns wide: a share of the screen,
/// never below `min_width`, never wider than the screen minus `margin`.
pub fn bar_width(term_width: u16, settings: &WidthSettings) -> u16 {
    let scaled = (f32::from(term_width) * settings.width_ratio).floor() as u16;
    scaled
        .max(settings.min_width)
        .min(term_width.saturating_sub(settings.margin))
}

#[derive(Debug)]
pub struct PopupState {
    mode: PopupMode,
    settings: WidthSettings,
    bar_width: u16,
    popup_width: u16,
}

impl PopupState {
    pub fn new(settings: WidthSettings) -> Self {
        Self {
            mode: PopupMode::Closed,
            settings,
            bar_width: settings.min_width,
            popup_width: settings.min_width,
        }
    }

    pub fn mode(&self) -> PopupMode {
        self.mode
    }

    pub fn is_open(&self, mode: PopupMode) -> bool {
        self.mode == mode && mode != PopupMode::Closed
    }

    pub fn bar_width(&self) -> u16 {
        self.bar_width
    }

    pub fn popup_width(&self) -> u16 {
        self.popup_width
    }

    /// Opens `mode`, closing whatever else was open.
    pub fn open(&mut self, mode: PopupMode) {
        if self.mode != mode {
            debug!(from = ?self.mode, to = ?mode, "popup switched");
        }
        self.mode = mode;
        if mode != PopupMode::Closed {
            self.reposition();
        }
    }

    /// Closes `mode` if it is the open popup; leaves others alone.
    pub fn close(&mut self, mode: PopupMode) {
        if self.mode == mode {
            self.open(PopupMode::Closed);
        }
    }

    pub fn close_all(&mut self) {
        self.open(PopupMode::Closed);
    }

    /// Returns true when the popup is open after the toggle.
    pub fn toggle(&mut self, mode: PopupMode) -> bool {
        if self.mode == mode {
            self.close_all();
            false
        } else {
            self.open(mode);
            true
        }
    }

    pub fn resize(&mut self, term_width: u16) {
        self.bar_width = bar_width(term_width, &self.settings);
        self.reposition();
    }

    pub fn content_changed(&mut self) {
        if self.mode != PopupMode::Closed {
            self.reposition();
        }
    }

    fn reposition(&mut self) {
        self.popup_width = self.bar_width;
    }
}
