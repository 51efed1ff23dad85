//! Uploaded image reference conventions.
//!
//! Pure string functions. A reference is what a recipe stores in its
//! `imageUrl` field and is also the public path the file is served under.

/// Route prefix uploaded images are served from.
pub const UPLOADS_ROUTE: &str = "/uploads";

/// Extension used when the suggested file name carries none we accept.
pub const DEFAULT_EXTENSION: &str = "bin";

const MAX_EXTENSION_LEN: usize = 8;

pub fn image_reference(file_name: &str) -> String {
    format!("{UPLOADS_ROUTE}/{file_name}")
}

/// Extract the stored file name from a reference.
///
/// Returns `None` for anything that is not a plain `/uploads/<file>` path,
/// including external URLs and names that would escape the uploads directory.
pub fn image_file_name(reference: &str) -> Option<&str> {
    let name = reference
        .strip_prefix(UPLOADS_ROUTE)?
        .strip_prefix('/')?;
    let plain = !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\']);
    plain.then_some(name)
}

/// Lowercase extension of a client-supplied file name, if it is short and
/// alphanumeric. Falls back to [`DEFAULT_EXTENSION`].
pub fn image_extension(suggested_name: &str) -> String {
    suggested_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| {
            !ext.is_empty()
                && ext.len() <= MAX_EXTENSION_LEN
                && ext.chars().all(|c| c.is_ascii_alphanumeric())
        })
        .unwrap_or_else(|| DEFAULT_EXTENSION.to_string())
}
