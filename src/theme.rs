use clap::ValueEnum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Palette {
    /// Dark background with cyan/purple accents.
    #[default]
    Neon,
    /// Light background with blue/teal accents.
    Daylight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Typography {
    #[default]
    Display,
    System,
}

#[derive(Debug, Clone, Copy)]
pub struct Colors {
    pub primary: &'static str,
    pub secondary: &'static str,
    pub background: &'static str,
    pub paper: &'static str,
    pub text: &'static str,
    pub muted: &'static str,
    pub error: &'static str,
    pub success: &'static str,
    pub warning: &'static str,
}

/// Presentation settings injected into the views at startup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Theme {
    pub palette: Palette,
    pub typography: Typography,
}

impl Theme {
    pub fn new(palette: Palette, typography: Typography) -> Self {
        Self { palette, typography }
    }

    pub fn colors(&self) -> Colors {
        match self.palette {
            Palette::Neon => Colors {
                primary: "#00f2ff",
                secondary: "#f200ff",
                background: "#0a0b1e",
                paper: "#151632",
                text: "#ffffff",
                muted: "rgba(255, 255, 255, 0.7)",
                error: "#ff0844",
                success: "#00ff9f",
                warning: "#ffd700",
            },
            Palette::Daylight => Colors {
                primary: "#2c7fb8",
                secondary: "#7dcfb6",
                background: "#f4f8fb",
                paper: "#ffffff",
                text: "#1c2b36",
                muted: "#5a6b78",
                error: "#d32f2f",
                success: "#2e7d32",
                warning: "#ed6c02",
            },
        }
    }

    pub fn font_family(&self) -> &'static str {
        match self.typography {
            Typography::Display => r#""Orbitron", "Roboto", "Helvetica", "Arial", sans-serif"#,
            Typography::System => r#"system-ui, -apple-system, "Segoe UI", sans-serif"#,
        }
    }

    /// CSS custom properties consumed by the page stylesheet.
    pub fn css_vars(&self) -> String {
        let c = self.colors();
        format!(
            ":root {{ --primary: {}; --secondary: {}; --bg: {}; --paper: {}; --text: {}; --muted: {}; \
             --error: {}; --success: {}; --warning: {}; --font: {}; }}",
            c.primary,
            c.secondary,
            c.background,
            c.paper,
            c.text,
            c.muted,
            c.error,
            c.success,
            c.warning,
            self.font_family()
        )
    }
}
