//! Keyboard shortcut listing.

use inkboard_core::shortcuts::{self, Shortcut};

/// Console view of the core shortcut table.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    pub fn all() -> Vec<Shortcut> {
        shortcuts::ShortcutRegistry::all()
    }

    /// Print all shortcuts to console.
    pub fn print_all() {
        println!("\n=== Keyboard Shortcuts ===");
        for shortcut in Self::all() {
            println!("  {:20} {}", shortcut.format(), shortcut.description);
        }
        println!();
    }
}
