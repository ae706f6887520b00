use std::env;
use std::path::PathBuf;

fn main() {
    println!("cargo:rerun-if-env-changed=FFMPEG_DIR");
    println!("cargo:rerun-if-env-changed=VCPKG_ROOT");
    println!("cargo:rerun-if-env-changed=VCPKGRS_TRIPLET");
    println!("cargo:rerun-if-env-changed=SDL2_DIR");

    let target_os = env::var("CARGO_CFG_TARGET_OS").unwrap_or_default();
    if target_os != "windows" {
        return;
    }

    let display_enabled = env::var_os("CARGO_FEATURE_DISPLAY").is_some();
    let bundled_sdl = env::var_os("CARGO_FEATURE_BUNDLED_SDL").is_some();

    let vcpkg_root = match env::var("VCPKG_ROOT") {
        Ok(value) => value,
        Err(_) => {
            if env::var_os("FFMPEG_DIR").is_none() {
                println!(
                    "cargo:warning=FFMPEG_DIR is not set. On Windows, install FFmpeg via vcpkg and set VCPKG_ROOT + FFMPEG_DIR."
                );
            }
            return;
        }
    };

    let triplet = env::var("VCPKGRS_TRIPLET").unwrap_or_else(|_| "x64-windows".to_string());
    let installed = PathBuf::from(&vcpkg_root).join("installed").join(&triplet);

    if env::var_os("FFMPEG_DIR").is_none() {
        if installed.join("include").join("libavformat").exists() {
            println!(
                "cargo:warning=Detected vcpkg FFmpeg at {}. Set FFMPEG_DIR={} to make discovery explicit.",
                installed.display(),
                installed.display(),
            );
        } else {
            println!(
                "cargo:warning=VCPKG_ROOT is set but no FFmpeg install was found under {}.",
                installed.display(),
            );
        }
    }

    // The sdl2 crate links SDL2.lib from the library search path.
    if display_enabled && !bundled_sdl {
        let lib_dir = installed.join("lib");
        if lib_dir.join("SDL2.lib").exists() {
            println!("cargo:rustc-link-search=native={}", lib_dir.display());
        } else {
            println!(
                "cargo:warning=SDL2.lib not found under {}. Install sdl2 via vcpkg or enable the `bundled-sdl` feature.",
                lib_dir.display(),
            );
        }
    }
}
