//! Options for saving and loading `.pzfx` files.

/// Options for writing `.pzfx` files.
#[derive(Debug, Clone)]
pub struct SaveOptions {
    /// Copy an existing target to `<file>.bak` before overwriting it.
    pub backup: bool,
    /// Spaces per indentation level; 0 writes compact XML (default: 2).
    pub indent: usize,
}

impl Default for SaveOptions {
    fn default() -> Self {
        Self {
            backup: false,
            indent: 2,
        }
    }
}

impl SaveOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_backup(mut self, backup: bool) -> Self {
        self.backup = backup;
        self
    }

    #[must_use]
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }
}

/// Options for reading `.pzfx` files.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Copy the file to `<file>.bak` once it has been read.
    pub backup: bool,
}

impl LoadOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_backup(mut self, backup: bool) -> Self {
        self.backup = backup;
        self
    }
}
