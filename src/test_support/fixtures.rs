//! Test fixtures for common test scenarios.
//!
//! Recipe texts for each classification, and helpers that lay them out on
//! disk in the supported repository layouts.

use std::fs;
use std::path::{Path, PathBuf};

/// A compiled C++ library with a `shared` option.
pub const LIBRARY_RECIPE: &str = r#"from conans import ConanFile, CMake

class FmtConan(ConanFile):
    name = "fmt"
    version = "8.0.1"
    settings = "os", "arch", "compiler", "build_type"
    options = {"shared": [True, False], "fPIC": [True, False]}
    default_options = {"shared": False, "fPIC": True}

    def build(self):
        cmake = CMake(self)
        cmake.configure()
        cmake.build()
"#;

/// A C library.
pub const PURE_C_RECIPE: &str = r#"from conans import ConanFile

class ZlibConan(ConanFile):
    name = "zlib"
    version = "1.2.11"
    settings = "os", "arch", "compiler", "build_type"
    options = {"shared": [True, False]}

    def configure(self):
        del self.settings.compiler.libcxx
        del self.settings.compiler.cppstd
"#;

/// A header-only library.
pub const HEADER_ONLY_RECIPE: &str = r#"from conans import ConanFile

class CatchConan(ConanFile):
    name = "catch2"
    version = "2.13.7"
    no_copy_source = True

    def package_id(self):
        self.info.header_only()
"#;

/// A package shipping executables.
pub const INSTALLER_RECIPE: &str = r#"from conans import ConanFile

class NinjaConan(ConanFile):
    name = "ninja_installer"
    version = "1.10.2"
    settings = "os_build", "arch_build", "compiler", "arch"

    def package_id(self):
        del self.info.settings.compiler

    def package_info(self):
        self.env_info.PATH.append(self.package_folder)
"#;

/// Write a single-recipe repository (`conanfile.py` at the root).
pub fn write_single_recipe_repo(root: &Path, recipe: &str) -> PathBuf {
    let path = root.join("conanfile.py");
    fs::write(&path, recipe).expect("failed to write recipe");
    path
}

/// Write a one-recipe-many-versions repository with the recipe in `all/`.
///
/// Returns the recipe directory relative to `root`.
pub fn write_many_versions_repo(root: &Path, recipe: &str) -> PathBuf {
    fs::write(
        root.join("config.yml"),
        "versions:\n  \"1.0\":\n    folder: all\n",
    )
    .expect("failed to write config.yml");
    let dir = root.join("all");
    fs::create_dir_all(&dir).expect("failed to create recipe dir");
    fs::write(dir.join("conanfile.py"), recipe).expect("failed to write recipe");
    PathBuf::from("all")
}
