//! Shader cache keys.

use xxhash_rust::xxh32::Xxh32;

/// Cache key for a shader compiled with a list of defines.
///
/// The key hashes the shader name followed by every define in order, so the
/// same defines in a different order give a different key. Defines are
/// concatenated without a separator: `["AB"]` and `["A", "B"]` collide.
pub fn shader_fingerprint(name: &str, defines: &[String]) -> u32 {
    let mut hasher = Xxh32::new(0);
    hasher.update(name.as_bytes());
    for define in defines {
        hasher.update(define.as_bytes());
    }
    hasher.digest()
}
