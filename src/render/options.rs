use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Display options for the ring drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RenderOptions {
    /// Draw nodes, labels and connectors in their node color. Neutral grays otherwise.
    ///
    /// Default: `true`
    pub show_node_colors: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            show_node_colors: true,
        }
    }
}

/// Partial update of [`RenderOptions`], missing fields are left untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RenderOptionsUpdate {
    #[serde(default)]
    pub show_node_colors: Option<bool>,
}

impl RenderOptions {
    pub fn apply(&mut self, update: RenderOptionsUpdate) {
        if let Some(show_node_colors) = update.show_node_colors {
            self.show_node_colors = show_node_colors;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert!(RenderOptions::default().show_node_colors);
    }

    #[test]
    fn test_partial_update() {
        let mut options = RenderOptions::default();

        options.apply(RenderOptionsUpdate {
            show_node_colors: Some(false),
        });
        assert!(!options.show_node_colors);

        options.apply(RenderOptionsUpdate::default());
        assert!(!options.show_node_colors);

        let update: RenderOptionsUpdate = serde_json::from_str("{}").unwrap();
        assert_eq!(update, RenderOptionsUpdate::default());
    }
}
