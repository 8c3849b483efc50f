use std::path::{Path, PathBuf};

/// The parts of a module description the notes manager reads
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    pub name: String,
    /// Directory holding the module map; for frameworks, the bundle root
    pub directory: PathBuf,
    pub is_framework: bool,
    pub module_map_is_private: bool,
    pub is_system: bool,
    pub submodules: Vec<Module>,
}

impl Module {
    pub fn new(name: impl Into<String>, directory: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            directory: directory.into(),
            is_framework: false,
            module_map_is_private: false,
            is_system: false,
            submodules: Vec::new(),
        }
    }

    /// A framework module rooted at `bundle` (e.g. `/Library/Foo.framework`)
    pub fn framework(name: impl Into<String>, bundle: impl Into<PathBuf>) -> Self {
        Self {
            is_framework: true,
            ..Self::new(name, bundle)
        }
    }

    pub fn with_private_module_map(mut self) -> Self {
        self.module_map_is_private = true;
        self
    }

    pub fn system(mut self) -> Self {
        self.is_system = true;
        self
    }

    pub fn with_submodule(mut self, submodule: Module) -> Self {
        self.submodules.push(submodule);
        self
    }

    /// Name of the top-level module; submodules are stored by their own
    /// short name, so this is just `name`
    pub fn top_level_name(&self) -> &str {
        &self.name
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Whether any immediate submodule is defined in a private module map
    pub fn has_private_submodules(&self) -> bool {
        self.submodules.iter().any(|m| m.module_map_is_private)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_private_submodules_are_immediate_only() {
        let nested_private =
            Module::new("Inner", "/m").with_submodule(Module::new("Deep", "/m").with_private_module_map());
        let module = Module::new("Outer", "/m").with_submodule(nested_private);
        assert!(!module.has_private_submodules());

        let module = module.with_submodule(Module::new("Private", "/m").with_private_module_map());
        assert!(module.has_private_submodules());
    }

    #[test]
    fn test_framework_constructor() {
        let module = Module::framework("Foo", "/F/Foo.framework").system();
        assert!(module.is_framework);
        assert!(module.is_system);
        assert_eq!(module.top_level_name(), "Foo");
    }
}
