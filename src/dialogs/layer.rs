//! Dialog layering snapshot for rendering order

use super::types::DialogId;

/// One open dialog as seen by a renderer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogLayer {
    /// Dialog identifier
    dialog_id: DialogId,

    /// Z-index for rendering order (higher = on top)
    z_index: i32,

    /// Whether backdrop clicks are ignored
    is_modal: bool,

    /// Whether this is the topmost open dialog
    is_top: bool,
}

impl DialogLayer {
    pub fn new(dialog_id: DialogId, z_index: i32, is_modal: bool, is_top: bool) -> Self {
        Self {
            dialog_id,
            z_index,
            is_modal,
            is_top,
        }
    }

    pub fn dialog_id(&self) -> &DialogId {
        &self.dialog_id
    }

    pub fn z_index(&self) -> i32 {
        self.z_index
    }

    pub fn is_modal(&self) -> bool {
        self.is_modal
    }

    /// Only the topmost layer receives position-based dismissal
    pub fn is_top(&self) -> bool {
        self.is_top
    }
}

impl std::fmt::Display for DialogLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} z={}", self.dialog_id, self.z_index)?;
        if self.is_modal {
            write!(f, " modal")?;
        }
        if self.is_top {
            write!(f, " top")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_ordering_and_display() {
        let low = DialogLayer::new(DialogId::from("#a"), 101, true, false);
        let high = DialogLayer::new(DialogId::from("#b"), 102, false, true);

        assert!(high.z_index() > low.z_index());
        assert!(low.is_modal() && !low.is_top());
        assert_eq!(low.to_string(), "#a z=101 modal");
        assert_eq!(high.to_string(), "#b z=102 top");
    }
}
