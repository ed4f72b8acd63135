use std::path::PathBuf;

pub const DEFAULT_SERVER_PORT: u16 = 3000;
pub const DEFAULT_DIST_DIR: &str = "client/dist";
pub const DEFAULT_ASSET_DIR: &str = "client/assets";
pub const DEFAULT_ASSET_FILE: &str = "regions.svg";

/// Element name scanned for region ids when validating the asset.
pub const ASSET_REGION_TAG: &str = regionmap_shared::options::DEFAULT_REGION_TAG;

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

pub fn server_port() -> u16 {
    non_empty_var("REGIONMAP_PORT")
        .and_then(|value| value.parse::<u16>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(DEFAULT_SERVER_PORT)
}

pub fn dist_dir() -> PathBuf {
    non_empty_var("REGIONMAP_DIST_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DIST_DIR))
}

pub fn asset_dir() -> PathBuf {
    non_empty_var("REGIONMAP_ASSET_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_ASSET_DIR))
}

pub fn asset_file() -> String {
    non_empty_var("REGIONMAP_ASSET_FILE").unwrap_or_else(|| DEFAULT_ASSET_FILE.to_owned())
}
