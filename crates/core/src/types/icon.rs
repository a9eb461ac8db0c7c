//! Icon asset sizes shared by the icon generator and the web app manifest.

/// Square icon sizes (in pixels) generated from the logo.
pub const ICON_SIZES: [u32; 10] = [16, 32, 72, 96, 128, 144, 152, 192, 384, 512];

/// File name of the generated icon for a size, e.g. `icon-192x192.png`.
#[must_use]
pub fn icon_file_name(size: u32) -> String {
    format!("icon-{size}x{size}.png")
}
