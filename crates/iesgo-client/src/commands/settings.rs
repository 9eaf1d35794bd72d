use tracing::info;

use iesgo_shared::types::Theme;

use crate::events::SessionEvent;
use crate::session::Session;

impl Session {
    pub fn theme(&self) -> Theme {
        self.state().theme
    }

    /// Flip between light and dark. Works signed in or out.
    pub fn toggle_theme(&self) -> Theme {
        let theme = self.theme().toggled();
        self.set_theme(theme);
        theme
    }

    pub fn set_theme(&self, theme: Theme) {
        {
            let mut st = self.state();
            st.theme = theme;
            self.persist_theme(&st);
        }

        info!(theme = theme.as_str(), "Theme changed");
        self.emit(SessionEvent::ThemeChanged { theme });
    }
}
