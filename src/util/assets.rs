use std::sync::OnceLock;

use rust_embed::RustEmbed;
use tracing::warn;

/// Embed the `assets/` directory into the binary.
#[derive(RustEmbed)]
#[folder = "assets"]
struct EmbeddedAssets;

static MAIN_CSS: OnceLock<String> = OnceLock::new();
static FAVICON_DATA_URI: OnceLock<String> = OnceLock::new();

/// Contents of `assets/main.css`.
pub fn main_css() -> &'static str {
    MAIN_CSS.get_or_init(|| load_text("main.css")).as_str()
}

/// Inline data URI for the window favicon.
pub fn favicon_data_uri() -> &'static str {
    FAVICON_DATA_URI
        .get_or_init(|| {
            let svg = load_text("favicon.svg");
            format!("data:image/svg+xml;base64,{}", encode_base64(svg.as_bytes()))
        })
        .as_str()
}

/// Missing or non-UTF-8 assets degrade to an empty string.
fn load_text(name: &str) -> String {
    let Some(file) = EmbeddedAssets::get(name) else {
        warn!("[assets] embedded asset {name} not found");
        return String::new();
    };
    String::from_utf8(file.data.into_owned()).unwrap_or_else(|_| {
        warn!("[assets] embedded asset {name} is not UTF-8");
        String::new()
    })
}

fn encode_base64(input: &[u8]) -> String {
    const TABLE: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";
    let mut output = String::with_capacity(input.len().div_ceil(3) * 4);

    for chunk in input.chunks(3) {
        let n = chunk
            .iter()
            .enumerate()
            .fold(0_u32, |acc, (idx, byte)| acc | (*byte as u32) << (16 - 8 * idx));
        for slot in 0..4 {
            if slot <= chunk.len() {
                output.push(TABLE[((n >> (18 - 6 * slot)) & 0x3f) as usize] as char);
            } else {
                output.push('=');
            }
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base64_pads_short_chunks() {
        assert_eq!(encode_base64(b""), "");
        assert_eq!(encode_base64(b"f"), "Zg==");
        assert_eq!(encode_base64(b"fo"), "Zm8=");
        assert_eq!(encode_base64(b"foo"), "Zm9v");
        assert_eq!(encode_base64(b"foobar"), "Zm9vYmFy");
    }

    #[test]
    fn bundled_assets_are_present() {
        assert!(main_css().contains(".panel"));
        assert!(favicon_data_uri().starts_with("data:image/svg+xml;base64,"));
    }
}
